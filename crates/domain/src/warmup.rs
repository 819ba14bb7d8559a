use std::slice::Iter;

use log::debug;

use crate::{
    EquipmentProfile, ExerciseID, LoadType, MuscleGroup, ReadError, Unit, UpdateError,
    WarmupContext, WarmupCount, loadout,
};

#[allow(async_fn_in_trait)]
pub trait FeedbackRepository {
    /// Reads the most recent warm-up feedback recorded for an exercise.
    async fn read_feedback(&self, exercise_id: ExerciseID)
    -> Result<Option<Feedback>, ReadError>;
    async fn write_feedback(
        &self,
        exercise_id: ExerciseID,
        feedback: Feedback,
    ) -> Result<(), UpdateError>;
}

/// Upper bound for the intensity of a warm-up set relative to the working weight.
pub const MAX_PERCENTAGE: f64 = 0.95;

/// Rest after each warm-up set by position; later sets rest [`DEFAULT_REST`].
pub const REST: [u32; 3] = [60, 90, 120];
pub const DEFAULT_REST: u32 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct WarmupStep {
    /// Position of the step in the plan, starting at 1.
    pub id: u32,
    /// Fraction of the working weight.
    pub percentage: f64,
    pub weight: f64,
    pub reps: u32,
    /// Rest after the step in seconds.
    pub rest: u32,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Strategy {
    #[default]
    Ramped,
    Quick,
    Power,
}

impl Strategy {
    pub fn iter() -> Iter<'static, Strategy> {
        static STRATEGIES: [Strategy; 3] = [Strategy::Ramped, Strategy::Quick, Strategy::Power];
        STRATEGIES.iter()
    }

    /// Percentage of the working weight and reps for each warm-up set.
    #[must_use]
    pub fn schedule(self) -> &'static [(u32, u32)] {
        match self {
            Strategy::Ramped => &[(40, 10), (60, 8), (80, 5)],
            Strategy::Quick => &[(50, 8), (70, 5)],
            Strategy::Power => &[(40, 5), (60, 3), (80, 1)],
        }
    }

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Strategy::Ramped => "ramped",
            Strategy::Quick => "quick",
            Strategy::Power => "power",
        }
    }
}

impl TryFrom<&str> for Strategy {
    type Error = StrategyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Strategy::iter()
            .find(|s| s.id() == value)
            .copied()
            .ok_or_else(|| StrategyError::Unknown(value.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StrategyError {
    #[error("Unknown warm-up strategy \"{0}\"")]
    Unknown(String),
}

/// Rating of the previous warm-up of an exercise.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Feedback {
    NotEnough,
    Excellent,
    TooMuch,
}

impl Feedback {
    pub fn iter() -> Iter<'static, Feedback> {
        static FEEDBACK: [Feedback; 3] =
            [Feedback::NotEnough, Feedback::Excellent, Feedback::TooMuch];
        FEEDBACK.iter()
    }

    /// Shift of the warm-up intensity as fraction of the working weight.
    #[must_use]
    pub fn bias(self) -> f64 {
        match self {
            Feedback::NotEnough => 0.05,
            Feedback::Excellent => 0.0,
            Feedback::TooMuch => -0.05,
        }
    }

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Feedback::NotEnough => "not_enough",
            Feedback::Excellent => "excellent",
            Feedback::TooMuch => "too_much",
        }
    }
}

impl TryFrom<&str> for Feedback {
    type Error = FeedbackError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Feedback::iter()
            .find(|f| f.id() == value)
            .copied()
            .ok_or_else(|| FeedbackError::Unknown(value.to_string()))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FeedbackError {
    #[error("Unknown warm-up feedback \"{0}\"")]
    Unknown(String),
}

/// Builds the warm-up sets leading up to a working weight.
///
/// The schedule is taken from the strategy unless a warm-up count was derived from the muscle
/// groups already worked in the session, which takes precedence. Feedback shifts the
/// intensity, more so for earlier sets. Each set is then snapped to a weight the equipment can
/// produce, or rounded to the rounding increment if no equipment is given.
///
/// The working weight must be greater than zero.
#[derive(Debug, Clone)]
pub struct WarmupPlanBuilder<'a> {
    top_weight: f64,
    strategy: Strategy,
    rounding_increment: f64,
    min_weight: f64,
    feedback: Option<Feedback>,
    count: Option<WarmupCount>,
    equipment: Option<(&'a EquipmentProfile, LoadType)>,
    unit: Unit,
}

impl<'a> WarmupPlanBuilder<'a> {
    #[must_use]
    pub fn new(top_weight: f64, strategy: Strategy) -> Self {
        Self {
            top_weight,
            strategy,
            rounding_increment: 0.0,
            min_weight: 0.0,
            feedback: None,
            count: None,
            equipment: None,
            unit: Unit::default(),
        }
    }

    /// Rounds weights to multiples of `increment`, but not below `min_weight`.
    #[must_use]
    pub fn rounding(mut self, increment: f64, min_weight: f64) -> Self {
        self.rounding_increment = increment;
        self.min_weight = min_weight;
        self
    }

    #[must_use]
    pub fn feedback(mut self, feedback: Option<Feedback>) -> Self {
        self.feedback = feedback;
        self
    }

    /// Derives the warm-up count from the warmth of the exercise's muscle groups.
    ///
    /// The first muscle group is taken as the primary one. An empty slice keeps the strategy.
    #[must_use]
    pub fn muscle_groups(
        mut self,
        muscle_groups: &[MuscleGroup],
        context: &WarmupContext,
    ) -> Self {
        if let Some(primary) = muscle_groups.first() {
            self.count = Some(context.warmth(*primary).warmup_count());
        }
        self
    }

    /// Uses a precomputed warm-up count, e.g. the one of a superset.
    #[must_use]
    pub fn warmup_count(mut self, count: WarmupCount) -> Self {
        self.count = Some(count);
        self
    }

    /// Snaps weights to what `profile` can produce. Weights are given in `unit`.
    ///
    /// The load type is narrowed to one the profile can serve, see
    /// [`EquipmentProfile::load_type_for`].
    #[must_use]
    pub fn equipment(
        mut self,
        profile: &'a EquipmentProfile,
        load_type: LoadType,
        unit: Unit,
    ) -> Self {
        self.equipment = Some((profile, profile.load_type_for(load_type)));
        self.unit = unit;
        self
    }

    #[must_use]
    pub fn build(&self) -> Vec<WarmupStep> {
        let schedule = self.schedule();
        #[allow(clippy::cast_precision_loss)]
        let len = schedule.len() as f64;
        let bias = self.feedback.map_or(0.0, Feedback::bias);
        let lower = (self.min_weight / self.top_weight).clamp(0.0, MAX_PERCENTAGE);
        let max_weight = self.top_weight * MAX_PERCENTAGE + loadout::TOLERANCE;

        let mut steps: Vec<WarmupStep> = vec![];

        for (i, (base, reps)) in schedule.into_iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let percentage = (base + bias * (1.0 - i as f64 / len)).clamp(lower, MAX_PERCENTAGE);
            let weight = self.snap(percentage * self.top_weight);

            if weight <= 0.0 || weight < self.min_weight - loadout::TOLERANCE {
                debug!("skipping warm-up set {weight} below minimum weight");
                continue;
            }
            if weight > max_weight {
                debug!("skipping warm-up set {weight} above {MAX_PERCENTAGE} of working weight");
                continue;
            }
            if steps
                .last()
                .is_some_and(|s| weight <= s.weight + loadout::TOLERANCE)
            {
                debug!("skipping warm-up set {weight} not heavier than previous set");
                continue;
            }

            let position = steps.len();
            steps.push(WarmupStep {
                id: u32::try_from(position + 1).unwrap_or(u32::MAX),
                percentage: weight / self.top_weight,
                weight,
                reps,
                rest: REST.get(position).copied().unwrap_or(DEFAULT_REST),
            });
        }

        steps
    }

    fn schedule(&self) -> Vec<(f64, u32)> {
        match self.count {
            Some(count) => count
                .percentages()
                .iter()
                .zip(count.reps())
                .map(|(p, r)| (f64::from(*p) / 100.0, *r))
                .collect(),
            None => self
                .strategy
                .schedule()
                .iter()
                .map(|(p, r)| (f64::from(*p) / 100.0, *r))
                .collect(),
        }
    }

    fn snap(&self, weight: f64) -> f64 {
        match self.equipment {
            Some((profile, load_type))
                if !matches!(load_type, LoadType::Bodyweight | LoadType::Band) =>
            {
                loadout::resolve(weight, self.unit, load_type, profile).target_display
            }
            _ => self.round(weight),
        }
    }

    fn round(&self, weight: f64) -> f64 {
        let increment = self.rounding_increment;
        let rounded = if increment > 0.0 {
            let nearest = (weight / increment).round() * increment;
            if nearest > self.top_weight * MAX_PERCENTAGE + loadout::TOLERANCE {
                (weight / increment).floor() * increment
            } else {
                nearest
            }
        } else {
            weight
        };
        rounded.max(self.min_weight)
    }
}
