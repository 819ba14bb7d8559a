use std::{cmp::Ordering, slice::Iter};

use derive_more::Deref;
use uuid::Uuid;

use crate::{ReadError, Unit};

#[allow(async_fn_in_trait)]
pub trait EquipmentProfileRepository {
    /// Reads the profile of a piece of equipment.
    ///
    /// A profile stored for the given gym takes precedence over the default profile of the
    /// equipment. `Ok(None)` is returned if neither exists.
    async fn read_equipment_profile(
        &self,
        equipment_id: EquipmentID,
        gym_id: Option<GymID>,
    ) -> Result<Option<EquipmentProfile>, ReadError>;
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct EquipmentID(Uuid);

impl From<Uuid> for EquipmentID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for EquipmentID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct GymID(Uuid);

impl From<Uuid> for GymID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for GymID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Discrete increments a piece of equipment offers.
///
/// All weights are given in `unit`. The resolver evaluates the lists in the order they are
/// stored, so the order is part of the contract: `plates` and `micro_plates` are expected in
/// descending order, all other lists in ascending order. [`EquipmentProfile::canonical`] brings
/// a profile into this order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct EquipmentProfile {
    pub unit: Unit,
    pub bar_weight: f64,
    /// Plates available for one side of the bar.
    pub plates: Vec<f64>,
    pub micro_plates: Vec<f64>,
    pub stack_steps: Vec<f64>,
    pub stack_add_ons: Vec<f64>,
    pub fixed_bars: Vec<f64>,
    pub dumbbells: Vec<f64>,
}

impl EquipmentProfile {
    #[must_use]
    pub fn barbell(unit: Unit, bar_weight: f64, plates: &[f64]) -> Self {
        Self {
            unit,
            bar_weight,
            plates: plates.to_vec(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn stack(unit: Unit, steps: &[f64], add_ons: &[f64]) -> Self {
        Self {
            unit,
            stack_steps: steps.to_vec(),
            stack_add_ons: add_ons.to_vec(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn canonical(mut self) -> Self {
        self.plates.sort_by(|a, b| descending(*a, *b));
        self.micro_plates.sort_by(|a, b| descending(*a, *b));
        self.stack_steps.sort_by(|a, b| a.total_cmp(b));
        self.stack_add_ons.sort_by(|a, b| a.total_cmp(b));
        self.fixed_bars.sort_by(|a, b| a.total_cmp(b));
        self.dumbbells.sort_by(|a, b| a.total_cmp(b));
        self
    }

    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.plates.is_sorted_by(|a, b| a >= b)
            && self.micro_plates.is_sorted_by(|a, b| a >= b)
            && self.stack_steps.is_sorted_by(|a, b| a <= b)
            && self.stack_add_ons.is_sorted_by(|a, b| a <= b)
            && self.fixed_bars.is_sorted_by(|a, b| a <= b)
            && self.dumbbells.is_sorted_by(|a, b| a <= b)
    }

    pub fn validate(&self) -> Result<(), EquipmentProfileError> {
        match self.weights().find(|w| !w.is_finite() || *w < 0.0) {
            Some(w) if w.is_finite() => Err(EquipmentProfileError::NegativeWeight(w)),
            Some(_) => Err(EquipmentProfileError::InvalidWeight),
            None => Ok(()),
        }
    }

    /// Fixed weights the resolver chooses from: the fixed bars if there are any, otherwise the
    /// dumbbells.
    #[must_use]
    pub fn fixed_weights(&self) -> &[f64] {
        if self.fixed_bars.is_empty() {
            &self.dumbbells
        } else {
            &self.fixed_bars
        }
    }

    /// Lightest load the equipment can produce for the given load type.
    ///
    /// Falls back to the bar weight if a stack or fixed profile has no options at all.
    #[must_use]
    pub fn minimum(&self, load_type: LoadType) -> f64 {
        let smallest = |weights: &[f64]| weights.iter().copied().reduce(f64::min);
        match load_type {
            LoadType::DualLoad | LoadType::SingleLoad => self.bar_weight,
            LoadType::Stack => smallest(&self.stack_steps).unwrap_or(self.bar_weight),
            LoadType::Fixed => smallest(self.fixed_weights()).unwrap_or(self.bar_weight),
            LoadType::Bodyweight | LoadType::Band => 0.0,
        }
    }

    /// Load type the profile can actually serve for an exercise of the given load type.
    ///
    /// A plate-loaded exercise on a profile without plates but with fixed weights (e.g. a
    /// dumbbell rack) resolves against the fixed weights.
    #[must_use]
    pub fn load_type_for(&self, load_type: LoadType) -> LoadType {
        if load_type.sides().is_some()
            && self.plates.is_empty()
            && self.micro_plates.is_empty()
            && !self.fixed_weights().is_empty()
        {
            LoadType::Fixed
        } else {
            load_type
        }
    }

    fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        std::iter::once(self.bar_weight)
            .chain(self.plates.iter().copied())
            .chain(self.micro_plates.iter().copied())
            .chain(self.stack_steps.iter().copied())
            .chain(self.stack_add_ons.iter().copied())
            .chain(self.fixed_bars.iter().copied())
            .chain(self.dumbbells.iter().copied())
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EquipmentProfileError {
    #[error("Equipment weights must be non-negative numbers ({0})")]
    NegativeWeight(f64),
    #[error("Equipment weights must be finite numbers")]
    InvalidWeight,
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LoadType {
    /// Loaded symmetrically on both sides of a bar.
    DualLoad,
    /// Loaded on one side or as a single implement.
    SingleLoad,
    /// Selectorized weight stack.
    Stack,
    /// Preset fixed weights only.
    Fixed,
    Bodyweight,
    Band,
}

impl LoadType {
    pub fn iter() -> Iter<'static, LoadType> {
        static LOAD_TYPES: [LoadType; 6] = [
            LoadType::DualLoad,
            LoadType::SingleLoad,
            LoadType::Stack,
            LoadType::Fixed,
            LoadType::Bodyweight,
            LoadType::Band,
        ];
        LOAD_TYPES.iter()
    }

    /// Number of loaded sides for plate-loaded equipment.
    #[must_use]
    pub fn sides(self) -> Option<u8> {
        match self {
            LoadType::DualLoad => Some(2),
            LoadType::SingleLoad => Some(1),
            LoadType::Stack | LoadType::Fixed | LoadType::Bodyweight | LoadType::Band => None,
        }
    }

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            LoadType::DualLoad => "dual_load",
            LoadType::SingleLoad => "single_load",
            LoadType::Stack => "stack",
            LoadType::Fixed => "fixed",
            LoadType::Bodyweight => "bodyweight",
            LoadType::Band => "band",
        }
    }
}

impl TryFrom<&str> for LoadType {
    type Error = LoadTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        LoadType::iter()
            .find(|l| l.id() == value)
            .copied()
            .ok_or_else(|| LoadTypeError::Unknown(value.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum LoadTypeError {
    #[error("Unknown load type \"{0}\"")]
    Unknown(String),
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Equipment {
    None,
    Barbell,
    Cable,
    Dumbbell,
    FixedBarbell,
    FixedDumbbell,
    Kettlebell,
    Machine,
    PlateLoadedMachine,
    ResistanceBand,
    TrapBar,
}

impl Equipment {
    pub fn iter() -> Iter<'static, Equipment> {
        static EQUIPMENT: [Equipment; 11] = [
            Equipment::None,
            Equipment::Barbell,
            Equipment::Cable,
            Equipment::Dumbbell,
            Equipment::FixedBarbell,
            Equipment::FixedDumbbell,
            Equipment::Kettlebell,
            Equipment::Machine,
            Equipment::PlateLoadedMachine,
            Equipment::ResistanceBand,
            Equipment::TrapBar,
        ];
        EQUIPMENT.iter()
    }

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Equipment::None => "none",
            Equipment::Barbell => "barbell",
            Equipment::Cable => "cable",
            Equipment::Dumbbell => "dumbbell",
            Equipment::FixedBarbell => "fixed_barbell",
            Equipment::FixedDumbbell => "fixed_dumbbell",
            Equipment::Kettlebell => "kettlebell",
            Equipment::Machine => "machine",
            Equipment::PlateLoadedMachine => "plate_loaded_machine",
            Equipment::ResistanceBand => "resistance_band",
            Equipment::TrapBar => "trap_bar",
        }
    }

    #[must_use]
    pub fn load_type(self) -> LoadType {
        match self {
            Equipment::None => LoadType::Bodyweight,
            Equipment::Barbell | Equipment::TrapBar | Equipment::PlateLoadedMachine => {
                LoadType::DualLoad
            }
            Equipment::Dumbbell => LoadType::SingleLoad,
            Equipment::Cable | Equipment::Machine => LoadType::Stack,
            Equipment::FixedBarbell | Equipment::FixedDumbbell | Equipment::Kettlebell => {
                LoadType::Fixed
            }
            Equipment::ResistanceBand => LoadType::Band,
        }
    }
}

impl TryFrom<&str> for Equipment {
    type Error = EquipmentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Equipment::iter()
            .find(|e| e.id() == value)
            .copied()
            .ok_or_else(|| EquipmentError::Unknown(value.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum EquipmentError {
    #[error("Unknown equipment \"{0}\"")]
    Unknown(String),
}
