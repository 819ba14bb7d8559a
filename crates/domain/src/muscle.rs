use std::slice::Iter;

/// Muscle group as identified by the exercise catalog.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum MuscleGroup {
    Neck = 1,
    Chest = 11,
    UpperBack = 21,
    Lats = 22,
    Shoulders = 31,
    RearDelts = 33,
    Biceps = 41,
    Triceps = 42,
    Forearms = 51,
    Abs = 61,
    LowerBack = 62,
    Glutes = 71,
    Abductors = 72,
    Quads = 81,
    Hamstrings = 82,
    Adductors = 83,
    Calves = 91,
}

impl MuscleGroup {
    pub fn iter() -> Iter<'static, MuscleGroup> {
        static MUSCLE_GROUPS: [MuscleGroup; 17] = [
            MuscleGroup::Neck,
            MuscleGroup::Chest,
            MuscleGroup::UpperBack,
            MuscleGroup::Lats,
            MuscleGroup::Shoulders,
            MuscleGroup::RearDelts,
            MuscleGroup::Biceps,
            MuscleGroup::Triceps,
            MuscleGroup::Forearms,
            MuscleGroup::Abs,
            MuscleGroup::LowerBack,
            MuscleGroup::Glutes,
            MuscleGroup::Abductors,
            MuscleGroup::Quads,
            MuscleGroup::Hamstrings,
            MuscleGroup::Adductors,
            MuscleGroup::Calves,
        ];
        MUSCLE_GROUPS.iter()
    }

    /// Identifier used by the exercise catalog and in serialized data.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            MuscleGroup::Neck => "neck",
            MuscleGroup::Chest => "chest",
            MuscleGroup::UpperBack => "upper_back",
            MuscleGroup::Lats => "lats",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::RearDelts => "rear_delts",
            MuscleGroup::Biceps => "biceps",
            MuscleGroup::Triceps => "triceps",
            MuscleGroup::Forearms => "forearms",
            MuscleGroup::Abs => "abs",
            MuscleGroup::LowerBack => "lower_back",
            MuscleGroup::Glutes => "glutes",
            MuscleGroup::Abductors => "abductors",
            MuscleGroup::Quads => "quads",
            MuscleGroup::Hamstrings => "hamstrings",
            MuscleGroup::Adductors => "adductors",
            MuscleGroup::Calves => "calves",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            MuscleGroup::Neck => "Neck",
            MuscleGroup::Chest => "Chest",
            MuscleGroup::UpperBack => "Upper Back",
            MuscleGroup::Lats => "Lats",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::RearDelts => "Rear Delts",
            MuscleGroup::Biceps => "Biceps",
            MuscleGroup::Triceps => "Triceps",
            MuscleGroup::Forearms => "Forearms",
            MuscleGroup::Abs => "Abs",
            MuscleGroup::LowerBack => "Lower Back",
            MuscleGroup::Glutes => "Glutes",
            MuscleGroup::Abductors => "Abductors",
            MuscleGroup::Quads => "Quads",
            MuscleGroup::Hamstrings => "Hamstrings",
            MuscleGroup::Adductors => "Adductors",
            MuscleGroup::Calves => "Calves",
        }
    }
}

impl TryFrom<&str> for MuscleGroup {
    type Error = MuscleGroupError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        MuscleGroup::iter()
            .find(|m| m.id() == value)
            .copied()
            .ok_or_else(|| MuscleGroupError::Unknown(value.to_string()))
    }
}

impl TryFrom<u8> for MuscleGroup {
    type Error = MuscleGroupError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        MuscleGroup::iter()
            .find(|m| **m as u8 == value)
            .copied()
            .ok_or_else(|| MuscleGroupError::Unknown(value.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MuscleGroupError {
    #[error("Unknown muscle group \"{0}\"")]
    Unknown(String),
}
