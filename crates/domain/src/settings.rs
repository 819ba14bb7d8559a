use crate::{ReadError, Strategy, Unit, UpdateError};

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, ReadError>;
    async fn write_settings(&self, settings: Settings) -> Result<(), UpdateError>;
}

/// User preferences for planning warm-ups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Unit in which the user enters and reads weights.
    pub unit: Unit,
    /// Increment warm-up weights are rounded to if no equipment profile is known.
    pub rounding_increment: f64,
    /// Lightest warm-up weight, usually the weight of an empty bar.
    pub min_weight: f64,
    pub strategy: Strategy,
}

impl Settings {
    #[must_use]
    pub fn with_unit(self, unit: Unit) -> Self {
        if unit == self.unit {
            return self;
        }
        Self {
            unit,
            rounding_increment: self.unit.convert(self.rounding_increment, unit),
            min_weight: self.unit.convert(self.min_weight, unit),
            ..self
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            unit: Unit::Kg,
            rounding_increment: 2.5,
            min_weight: 20.0,
            strategy: Strategy::Ramped,
        }
    }
}
