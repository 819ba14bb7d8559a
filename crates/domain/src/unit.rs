use std::fmt;

/// Pounds per kilogram.
pub const LB_PER_KG: f64 = 2.204_622_62;

#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Unit {
    #[default]
    Kg,
    Lb,
}

impl Unit {
    /// Converts `value` given in `self` into `target`.
    ///
    /// The conversion is a single multiplication or division by [`LB_PER_KG`], so converting a
    /// value into another unit and back yields the original value up to floating point error.
    #[must_use]
    pub fn convert(self, value: f64, target: Unit) -> f64 {
        match (self, target) {
            (Unit::Kg, Unit::Lb) => value * LB_PER_KG,
            (Unit::Lb, Unit::Kg) => value / LB_PER_KG,
            (Unit::Kg, Unit::Kg) | (Unit::Lb, Unit::Lb) => value,
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Lb => "lb",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<&str> for Unit {
    type Error = UnitError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "kg" => Ok(Unit::Kg),
            "lb" | "lbs" => Ok(Unit::Lb),
            _ => Err(UnitError::Unknown(value.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum UnitError {
    #[error("Unknown unit \"{0}\" (expected kg or lb)")]
    Unknown(String),
}
