//! JSON representation of the data exchanged with collaborators.
//!
//! Field names follow the shapes used by the rest of the product (`camelCase`, snake_case
//! identifiers for enumerations).

use liftplan_domain as domain;
use uuid::Uuid;

#[derive(thiserror::Error, Debug)]
pub enum JsonError {
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Unit(#[from] domain::UnitError),
    #[error(transparent)]
    MuscleGroup(#[from] domain::MuscleGroupError),
    #[error(transparent)]
    Stimulus(#[from] domain::StimulusError),
    #[error(transparent)]
    Equipment(#[from] domain::EquipmentError),
    #[error(transparent)]
    EquipmentProfile(#[from] domain::EquipmentProfileError),
    #[error(transparent)]
    Strategy(#[from] domain::StrategyError),
    #[error(transparent)]
    Feedback(#[from] domain::FeedbackError),
}

pub fn from_str<T, D>(json: &str) -> Result<D, JsonError>
where
    T: for<'de> serde::Deserialize<'de>,
    D: TryFrom<T>,
    JsonError: From<D::Error>,
{
    let value: T = serde_json::from_str(json)?;
    Ok(D::try_from(value)?)
}

pub fn to_string<'a, V, T>(value: &'a V) -> Result<String, JsonError>
where
    T: From<&'a V> + serde::Serialize,
{
    Ok(serde_json::to_string(&T::from(value))?)
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentProfile {
    pub unit: String,
    #[serde(default)]
    pub bar_weight: f64,
    #[serde(default)]
    pub per_side_plates: Vec<f64>,
    #[serde(default)]
    pub micro_plates: Vec<f64>,
    #[serde(default)]
    pub stack_steps: Vec<f64>,
    #[serde(default)]
    pub stack_add_ons: Vec<f64>,
    #[serde(default)]
    pub fixed_bars: Vec<f64>,
    #[serde(default)]
    pub dumbbell_set: Vec<f64>,
}

impl From<&domain::EquipmentProfile> for EquipmentProfile {
    fn from(value: &domain::EquipmentProfile) -> Self {
        Self {
            unit: value.unit.to_string(),
            bar_weight: value.bar_weight,
            per_side_plates: value.plates.clone(),
            micro_plates: value.micro_plates.clone(),
            stack_steps: value.stack_steps.clone(),
            stack_add_ons: value.stack_add_ons.clone(),
            fixed_bars: value.fixed_bars.clone(),
            dumbbell_set: value.dumbbells.clone(),
        }
    }
}

impl TryFrom<EquipmentProfile> for domain::EquipmentProfile {
    type Error = JsonError;

    fn try_from(value: EquipmentProfile) -> Result<Self, Self::Error> {
        let profile = Self {
            unit: domain::Unit::try_from(value.unit.as_str())?,
            bar_weight: value.bar_weight,
            plates: value.per_side_plates,
            micro_plates: value.micro_plates,
            stack_steps: value.stack_steps,
            stack_add_ons: value.stack_add_ons,
            fixed_bars: value.fixed_bars,
            dumbbells: value.dumbbell_set,
        };
        profile.validate()?;
        Ok(profile)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MatchQuality {
    Exact,
    NearestUp,
    NearestDown,
}

impl From<domain::MatchQuality> for MatchQuality {
    fn from(value: domain::MatchQuality) -> Self {
        match value {
            domain::MatchQuality::Exact => MatchQuality::Exact,
            domain::MatchQuality::NearestUp => MatchQuality::NearestUp,
            domain::MatchQuality::NearestDown => MatchQuality::NearestDown,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResult {
    pub target_display: f64,
    pub total_system_weight: f64,
    pub per_side_plates: Option<Vec<f64>>,
    pub machine_display: Option<f64>,
    pub used_add_ons: Vec<f64>,
    pub match_quality: MatchQuality,
}

impl From<&domain::ResolveResult> for ResolveResult {
    fn from(value: &domain::ResolveResult) -> Self {
        Self {
            target_display: value.target_display,
            total_system_weight: value.total_system_weight,
            per_side_plates: value.plates.as_ref().map(|p| p.per_side.clone()),
            machine_display: value.machine_display(),
            used_add_ons: value.used_add_ons().to_vec(),
            match_quality: value.match_quality.into(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WarmupStep {
    pub id: u32,
    pub percentage: f64,
    pub weight: f64,
    pub reps: u32,
    pub rest_seconds: u32,
}

impl From<&domain::WarmupStep> for WarmupStep {
    fn from(value: &domain::WarmupStep) -> Self {
        Self {
            id: value.id,
            percentage: value.percentage,
            weight: value.weight,
            reps: value.reps,
            rest_seconds: value.rest,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub unit: String,
    pub rounding_increment: f64,
    pub min_weight: f64,
    pub strategy: String,
}

impl From<&domain::Settings> for Settings {
    fn from(value: &domain::Settings) -> Self {
        Self {
            unit: value.unit.to_string(),
            rounding_increment: value.rounding_increment,
            min_weight: value.min_weight,
            strategy: value.strategy.id().to_string(),
        }
    }
}

impl TryFrom<Settings> for domain::Settings {
    type Error = JsonError;

    fn try_from(value: Settings) -> Result<Self, Self::Error> {
        Ok(Self {
            unit: domain::Unit::try_from(value.unit.as_str())?,
            rounding_increment: value.rounding_increment,
            min_weight: value.min_weight,
            strategy: domain::Strategy::try_from(value.strategy.as_str())?,
        })
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub equipment: String,
    pub muscles: Vec<ExerciseMuscle>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseMuscle {
    pub muscle_group: String,
    pub stimulus: u32,
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: *value.id,
            name: value.name.clone(),
            equipment: value.equipment.id().to_string(),
            muscles: value
                .muscles
                .iter()
                .map(|m| ExerciseMuscle {
                    muscle_group: m.muscle_group.id().to_string(),
                    stimulus: *m.stimulus,
                })
                .collect(),
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = JsonError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: value.name,
            equipment: domain::Equipment::try_from(value.equipment.as_str())?,
            muscles: value
                .muscles
                .into_iter()
                .map(|m| {
                    Ok(domain::ExerciseMuscle {
                        muscle_group: domain::MuscleGroup::try_from(m.muscle_group.as_str())?,
                        stimulus: domain::Stimulus::new(m.stimulus)?,
                    })
                })
                .collect::<Result<Vec<_>, JsonError>>()?,
        })
    }
}

/// Equipment profile as stored for a piece of equipment, optionally specific to a gym.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredEquipmentProfile {
    pub equipment_id: Uuid,
    #[serde(default)]
    pub gym_id: Option<Uuid>,
    pub profile: EquipmentProfile,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredFeedback {
    pub exercise_id: Uuid,
    pub feedback: String,
}

/// Complete data set of the in-memory repository.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub settings: Option<Settings>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub equipment_profiles: Vec<StoredEquipmentProfile>,
    #[serde(default)]
    pub feedback: Vec<StoredFeedback>,
}
