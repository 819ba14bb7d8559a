use log::{debug, error};

use crate::{
    EquipmentID, EquipmentProfile, EquipmentProfileRepository, Exercise, ExerciseID,
    ExerciseRepository, Feedback, FeedbackRepository, GymID, LoadType, ReadError, ResolveResult,
    ServiceError, Settings, SettingsRepository, StorageError, UpdateError, ValidationError,
    WarmupContext, WarmupCount, WarmupPlanBuilder, WarmupStep, loadout,
};

pub struct Service<R> {
    repository: R,
}

/// Warm-up to plan for one exercise of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarmupRequest {
    pub exercise_id: ExerciseID,
    /// Working weight in the unit of the user settings.
    pub top_weight: f64,
    pub equipment_id: Option<EquipmentID>,
}

macro_rules! log_on_error {
    ($func: expr, $action: literal, $entity: literal) => {{
        let result = $func.await.map_err(ServiceError::from);
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                ServiceError::Read(ReadError::Storage(StorageError::NoConnection))
                | ServiceError::Update(UpdateError::Storage(StorageError::NoConnection)) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R> Service<R>
where
    R: EquipmentProfileRepository + ExerciseRepository + FeedbackRepository + SettingsRepository,
{
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Snaps a weight entered by the user to what the equipment can produce.
    pub async fn resolve_load(
        &self,
        equipment_id: EquipmentID,
        gym_id: Option<GymID>,
        desired: f64,
        load_type: LoadType,
    ) -> Result<ResolveResult, ServiceError> {
        let desired = validate_weight(desired)?;
        let settings = self.settings().await?;
        let profile = self
            .equipment_profile(equipment_id, gym_id)
            .await?
            .ok_or(ReadError::NotFound)?;
        Ok(loadout::resolve(desired, settings.unit, load_type, &profile))
    }

    pub async fn plan_warmup(
        &self,
        context: &WarmupContext,
        gym_id: Option<GymID>,
        request: WarmupRequest,
    ) -> Result<Vec<WarmupStep>, ServiceError> {
        let top_weight = validate_top_weight(request.top_weight)?;
        let settings = self.settings().await?;
        let exercise = self.exercise(request.exercise_id).await?;
        let feedback = self.feedback(request.exercise_id).await?;
        let profile = self.optional_profile(request.equipment_id, gym_id).await?;

        let muscle_groups = exercise
            .primary_muscle()
            .into_iter()
            .chain(exercise.secondary_muscles())
            .collect::<Vec<_>>();

        let builder = warmup_plan_builder(top_weight, &settings, &exercise, profile.as_ref())
            .feedback(feedback)
            .muscle_groups(&muscle_groups, context);

        Ok(builder.build())
    }

    /// Plans the warm-ups of exercises performed as a superset.
    ///
    /// All exercises get the same number of warm-up sets, determined by the coldest muscle group.
    /// If none of the exercises works a muscle group, each plan follows the configured strategy.
    pub async fn plan_superset_warmup(
        &self,
        context: &WarmupContext,
        gym_id: Option<GymID>,
        requests: &[WarmupRequest],
    ) -> Result<Vec<Vec<WarmupStep>>, ServiceError> {
        for request in requests {
            validate_top_weight(request.top_weight)?;
        }
        let settings = self.settings().await?;

        let mut exercises = vec![];
        for request in requests {
            exercises.push(self.exercise(request.exercise_id).await?);
        }
        let count: Option<WarmupCount> = exercises
            .iter()
            .any(|e| e.primary_muscle().is_some())
            .then(|| context.superset_warmup_count(&exercises));

        let mut plans = vec![];
        for (request, exercise) in requests.iter().zip(&exercises) {
            let feedback = self.feedback(request.exercise_id).await?;
            let profile = self.optional_profile(request.equipment_id, gym_id).await?;
            let builder =
                warmup_plan_builder(request.top_weight, &settings, exercise, profile.as_ref())
                    .feedback(feedback);
            plans.push(match count {
                Some(count) => builder.warmup_count(count).build(),
                None => builder.build(),
            });
        }

        Ok(plans)
    }

    /// Marks the muscle groups of finished exercises as warm.
    pub async fn finish_exercises(
        &self,
        context: &mut WarmupContext,
        exercise_ids: &[ExerciseID],
    ) -> Result<(), ServiceError> {
        let mut exercises = vec![];
        for id in exercise_ids {
            exercises.push(self.exercise(*id).await?);
        }
        for exercise in &exercises {
            context.commit(exercise);
        }
        Ok(())
    }

    pub async fn record_feedback(
        &self,
        exercise_id: ExerciseID,
        feedback: Feedback,
    ) -> Result<(), ServiceError> {
        log_on_error!(
            self.repository.write_feedback(exercise_id, feedback),
            "write",
            "warm-up feedback"
        )
    }

    async fn settings(&self) -> Result<Settings, ServiceError> {
        log_on_error!(self.repository.read_settings(), "read", "settings")
    }

    async fn exercise(&self, id: ExerciseID) -> Result<Exercise, ServiceError> {
        log_on_error!(self.repository.read_exercise(id), "read", "exercise")
    }

    async fn feedback(&self, exercise_id: ExerciseID) -> Result<Option<Feedback>, ServiceError> {
        log_on_error!(
            self.repository.read_feedback(exercise_id),
            "read",
            "warm-up feedback"
        )
    }

    async fn equipment_profile(
        &self,
        equipment_id: EquipmentID,
        gym_id: Option<GymID>,
    ) -> Result<Option<EquipmentProfile>, ServiceError> {
        let profile = log_on_error!(
            self.repository.read_equipment_profile(equipment_id, gym_id),
            "read",
            "equipment profile"
        )?;
        if let Some(ref profile) = profile {
            profile.validate().map_err(ValidationError::from)?;
        }
        Ok(profile)
    }

    async fn optional_profile(
        &self,
        equipment_id: Option<EquipmentID>,
        gym_id: Option<GymID>,
    ) -> Result<Option<EquipmentProfile>, ServiceError> {
        match equipment_id {
            Some(equipment_id) => self.equipment_profile(equipment_id, gym_id).await,
            None => Ok(None),
        }
    }
}

fn warmup_plan_builder<'a>(
    top_weight: f64,
    settings: &Settings,
    exercise: &Exercise,
    profile: Option<&'a EquipmentProfile>,
) -> WarmupPlanBuilder<'a> {
    let builder = WarmupPlanBuilder::new(top_weight, settings.strategy)
        .rounding(settings.rounding_increment, settings.min_weight);
    match profile {
        Some(profile) => builder.equipment(profile, exercise.equipment.load_type(), settings.unit),
        None => builder,
    }
}

pub fn validate_top_weight(top_weight: f64) -> Result<f64, ValidationError> {
    if top_weight.is_finite() && top_weight > 0.0 {
        Ok(top_weight)
    } else {
        Err(ValidationError::TopWeight(top_weight))
    }
}

pub fn validate_weight(weight: f64) -> Result<f64, ValidationError> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(weight)
    } else {
        Err(ValidationError::Weight(weight))
    }
}
