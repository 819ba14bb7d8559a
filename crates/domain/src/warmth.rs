//! Tracking of muscle groups already worked during a training session.
//!
//! A [`WarmupContext`] is created at the start of a session and owned by whoever runs the
//! session. It is queried before each exercise to decide how many warm-up sets are needed and
//! updated once the exercise is done.

use std::collections::BTreeSet;

use log::debug;

use crate::{Exercise, MuscleGroup};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WarmupContext {
    primary: BTreeSet<MuscleGroup>,
    secondary: BTreeSet<MuscleGroup>,
}

impl WarmupContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Muscle groups worked as prime mover.
    #[must_use]
    pub fn primary(&self) -> &BTreeSet<MuscleGroup> {
        &self.primary
    }

    /// Muscle groups only worked as assisting mover.
    #[must_use]
    pub fn secondary(&self) -> &BTreeSet<MuscleGroup> {
        &self.secondary
    }

    #[must_use]
    pub fn warmth(&self, muscle_group: MuscleGroup) -> Warmth {
        if self.primary.contains(&muscle_group) {
            Warmth::Primary
        } else if self.secondary.contains(&muscle_group) {
            Warmth::Secondary
        } else {
            Warmth::Cold
        }
    }

    #[must_use]
    pub fn next_warmup_count(&self, exercise: &Exercise) -> WarmupCount {
        exercise
            .primary_muscle()
            .map_or(WarmupCount::Three, |m| self.warmth(m).warmup_count())
    }

    /// Warm-up count for exercises performed together.
    ///
    /// All exercises are evaluated against the context as it is now, so this must be called
    /// before any of them is committed.
    #[must_use]
    pub fn superset_warmup_count<'a>(
        &self,
        exercises: impl IntoIterator<Item = &'a Exercise>,
    ) -> WarmupCount {
        exercises
            .into_iter()
            .map(|e| self.next_warmup_count(e))
            .max()
            .unwrap_or(WarmupCount::Three)
    }

    pub fn commit(&mut self, exercise: &Exercise) {
        if let Some(primary) = exercise.primary_muscle() {
            self.secondary.remove(&primary);
            self.primary.insert(primary);
        }
        for muscle_group in exercise.secondary_muscles() {
            if !self.primary.contains(&muscle_group) {
                self.secondary.insert(muscle_group);
            }
        }
        debug!(
            "committed exercise {} ({} primary, {} secondary muscle groups warm)",
            exercise.name,
            self.primary.len(),
            self.secondary.len()
        );
    }

    /// Determines the warm-up count of a superset and commits all its exercises.
    pub fn commit_superset<'a>(
        &mut self,
        exercises: impl IntoIterator<Item = &'a Exercise> + Clone,
    ) -> WarmupCount {
        let count = self.superset_warmup_count(exercises.clone());
        for exercise in exercises {
            self.commit(exercise);
        }
        count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warmth {
    Cold,
    Secondary,
    Primary,
}

impl Warmth {
    #[must_use]
    pub fn warmup_count(self) -> WarmupCount {
        match self {
            Warmth::Primary => WarmupCount::One,
            Warmth::Secondary => WarmupCount::Two,
            Warmth::Cold => WarmupCount::Three,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WarmupCount {
    One = 1,
    Two = 2,
    Three = 3,
}

impl WarmupCount {
    /// Percentages of the working weight for each warm-up set.
    #[must_use]
    pub fn percentages(self) -> &'static [u32] {
        match self {
            WarmupCount::One => &[70],
            WarmupCount::Two => &[55, 75],
            WarmupCount::Three => &[40, 60, 80],
        }
    }

    #[must_use]
    pub fn reps(self) -> &'static [u32] {
        match self {
            WarmupCount::One => &[5],
            WarmupCount::Two => &[8, 5],
            WarmupCount::Three => &[10, 8, 5],
        }
    }
}

impl From<WarmupCount> for usize {
    fn from(value: WarmupCount) -> Self {
        value as usize
    }
}

impl TryFrom<usize> for WarmupCount {
    type Error = WarmupCountError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(WarmupCount::One),
            2 => Ok(WarmupCount::Two),
            3 => Ok(WarmupCount::Three),
            _ => Err(WarmupCountError::OutOfRange(value)),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum WarmupCountError {
    #[error("Warm-up count must be 1, 2 or 3 ({0})")]
    OutOfRange(usize),
}

/// Percentages of the working weight for the given number of warm-up sets.
#[must_use]
pub fn percentages_for(count: WarmupCount) -> &'static [u32] {
    count.percentages()
}
