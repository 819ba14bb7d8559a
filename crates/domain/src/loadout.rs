//! Resolution of a desired weight to the closest load a piece of equipment can produce.
//!
//! The desired weight is converted once into the unit of the equipment profile, all searching
//! happens in profile units, and the achieved total is converted back once for display.
//!
//! Plate-loaded equipment is filled greedily: each plate, in the order the profile lists it, is
//! added as often as it fits onto the remaining per-side load, followed by the micro-plates. For
//! some plate inventories this misses a combination that would match exactly (e.g. a per-side
//! target of 8 with plates of 5 and 4 resolves to 5 instead of 4 + 4).

use log::debug;

use crate::{EquipmentProfile, LoadType, Unit};

/// Maximum deviation, in profile units, for a load to count as an exact match.
pub const TOLERANCE: f64 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchQuality {
    Exact,
    NearestUp,
    NearestDown,
}

impl MatchQuality {
    #[must_use]
    pub fn classify(achieved: f64, desired: f64) -> Self {
        if (achieved - desired).abs() <= TOLERANCE {
            MatchQuality::Exact
        } else if achieved > desired {
            MatchQuality::NearestUp
        } else {
            MatchQuality::NearestDown
        }
    }
}

/// Plates to load onto each side, heaviest first.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateBreakdown {
    pub sides: u8,
    pub per_side: Vec<f64>,
}

impl PlateBreakdown {
    #[must_use]
    pub fn per_side_total(&self) -> f64 {
        self.per_side.iter().sum()
    }
}

/// Selected stack step and the add-ons placed on top of it.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineSetting {
    pub step: f64,
    pub add_ons: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolveResult {
    /// Achievable total in the unit of the caller.
    pub target_display: f64,
    pub user_unit: Unit,
    /// Achievable total in the unit of the equipment.
    pub total_system_weight: f64,
    pub profile_unit: Unit,
    pub plates: Option<PlateBreakdown>,
    pub machine: Option<MachineSetting>,
    pub match_quality: MatchQuality,
}

impl ResolveResult {
    /// Selected stack step in the unit of the caller.
    #[must_use]
    pub fn machine_display(&self) -> Option<f64> {
        self.machine
            .as_ref()
            .map(|m| self.profile_unit.convert(m.step, self.user_unit))
    }

    #[must_use]
    pub fn used_add_ons(&self) -> &[f64] {
        self.machine.as_ref().map_or(&[], |m| &m.add_ons)
    }
}

/// Resolves `desired` (given in `user_unit`) to the nearest load `profile` can produce.
///
/// The result is never below [`EquipmentProfile::minimum`]. `desired` must be non-negative.
#[must_use]
pub fn resolve(
    desired: f64,
    user_unit: Unit,
    load_type: LoadType,
    profile: &EquipmentProfile,
) -> ResolveResult {
    let target = user_unit.convert(desired, profile.unit);

    let (total, plates, machine) = match load_type {
        LoadType::DualLoad | LoadType::SingleLoad => {
            let sides = load_type.sides().unwrap_or(1);
            let (total, breakdown) = fill_plates(target, sides, profile);
            (total, Some(breakdown), None)
        }
        LoadType::Stack => match nearest_stack_setting(target, profile) {
            Some(setting) => {
                let total = setting.step + setting.add_ons.iter().sum::<f64>();
                (total, None, Some(setting))
            }
            None => {
                debug!("no stack steps available, falling back to minimum");
                (profile.minimum(load_type), None, None)
            }
        },
        LoadType::Fixed => match nearest(target, profile.fixed_weights().iter().copied()) {
            Some(weight) => (weight, None, None),
            None => {
                debug!("no fixed weights available, falling back to minimum");
                (profile.minimum(load_type), None, None)
            }
        },
        LoadType::Bodyweight | LoadType::Band => (target, None, None),
    };

    ResolveResult {
        target_display: profile.unit.convert(total, user_unit),
        user_unit,
        total_system_weight: total,
        profile_unit: profile.unit,
        plates,
        machine,
        match_quality: MatchQuality::classify(total, target),
    }
}

fn fill_plates(target: f64, sides: u8, profile: &EquipmentProfile) -> (f64, PlateBreakdown) {
    let sides_f = f64::from(sides);
    let mut remaining = ((target - profile.bar_weight) / sides_f).max(0.0);
    let mut per_side = vec![];

    for plate in profile.plates.iter().chain(&profile.micro_plates).copied() {
        if plate <= 0.0 {
            continue;
        }
        while remaining + TOLERANCE / sides_f >= plate {
            per_side.push(plate);
            remaining -= plate;
        }
    }

    let breakdown = PlateBreakdown { sides, per_side };
    (
        profile.bar_weight + breakdown.per_side_total() * sides_f,
        breakdown,
    )
}

fn nearest_stack_setting(target: f64, profile: &EquipmentProfile) -> Option<MachineSetting> {
    let mut best: Option<(f64, MachineSetting)> = None;

    for &step in &profile.stack_steps {
        let add_ons = profile.stack_add_ons.iter().copied().map(Some);
        for add_on in std::iter::once(None).chain(add_ons) {
            let total = step + add_on.unwrap_or(0.0);
            let distance = (total - target).abs();
            if best.as_ref().is_none_or(|(d, _)| distance < *d) {
                best = Some((
                    distance,
                    MachineSetting {
                        step,
                        add_ons: add_on.into_iter().collect(),
                    },
                ));
            }
        }
    }

    best.map(|(_, setting)| setting)
}

/// Earliest value with the smallest distance to `target`.
fn nearest(target: f64, values: impl Iterator<Item = f64>) -> Option<f64> {
    values
        .fold(None::<(f64, f64)>, |best, value| {
            let distance = (value - target).abs();
            match best {
                Some((d, _)) if d <= distance => best,
                _ => Some((distance, value)),
            }
        })
        .map(|(_, value)| value)
}
