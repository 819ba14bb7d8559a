use derive_more::{Deref, Display};
use uuid::Uuid;

use crate::{Equipment, MuscleGroup, ReadError};

#[allow(async_fn_in_trait)]
pub trait ExerciseRepository {
    async fn read_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: String,
    pub equipment: Equipment,
    pub muscles: Vec<ExerciseMuscle>,
}

impl Exercise {
    /// Muscle group with the highest stimulus, the first one listed on a tie.
    #[must_use]
    pub fn primary_muscle(&self) -> Option<MuscleGroup> {
        self.muscles
            .iter()
            .filter(|m| m.stimulus > Stimulus::NONE)
            .fold(None::<&ExerciseMuscle>, |primary, m| match primary {
                Some(p) if p.stimulus >= m.stimulus => Some(p),
                _ => Some(m),
            })
            .map(|m| m.muscle_group)
    }

    /// All stimulated muscle groups except the primary one, in listed order.
    #[must_use]
    pub fn secondary_muscles(&self) -> Vec<MuscleGroup> {
        let primary = self.primary_muscle();
        self.muscles
            .iter()
            .filter(|m| m.stimulus > Stimulus::NONE && Some(m.muscle_group) != primary)
            .map(|m| m.muscle_group)
            .collect()
    }
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseMuscle {
    pub muscle_group: MuscleGroup,
    pub stimulus: Stimulus,
}

impl ExerciseMuscle {
    #[must_use]
    pub fn primary(muscle_group: MuscleGroup) -> Self {
        Self {
            muscle_group,
            stimulus: Stimulus::PRIMARY,
        }
    }

    #[must_use]
    pub fn secondary(muscle_group: MuscleGroup) -> Self {
        Self {
            muscle_group,
            stimulus: Stimulus::SECONDARY,
        }
    }
}

#[derive(Deref, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Stimulus(u32);

impl Stimulus {
    pub const PRIMARY: Stimulus = Stimulus(100);
    pub const SECONDARY: Stimulus = Stimulus(50);
    pub const NONE: Stimulus = Stimulus(0);

    pub fn new(value: u32) -> Result<Self, StimulusError> {
        if value > 100 {
            return Err(StimulusError::OutOfRange(value));
        }
        Ok(Self(value))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StimulusError {
    #[error("Stimulus must be 100 or less ({0} > 100)")]
    OutOfRange(u32),
}
