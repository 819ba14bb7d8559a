//! In-memory storage
//!
//! Holds all data of a single user in memory. The data can be loaded from and exported to a
//! JSON snapshot, which makes the repository usable both as a fixture and as a cache of data
//! fetched from elsewhere. While marked as offline, every access fails with
//! [`domain::StorageError::NoConnection`].

use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};

use liftplan_domain as domain;
use log::debug;

use crate::json::{self, JsonError};

type ProfileKey = (domain::EquipmentID, Option<domain::GymID>);

#[derive(Debug, Default)]
pub struct InMemory {
    settings: RefCell<Option<domain::Settings>>,
    exercises: RefCell<BTreeMap<domain::ExerciseID, domain::Exercise>>,
    profiles: RefCell<BTreeMap<ProfileKey, domain::EquipmentProfile>>,
    feedback: RefCell<BTreeMap<domain::ExerciseID, domain::Feedback>>,
    offline: Cell<bool>,
}

impl InMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(snapshot: &str) -> Result<Self, JsonError> {
        let snapshot: json::Snapshot = serde_json::from_str(snapshot)?;
        let storage = Self::new();

        if let Some(settings) = snapshot.settings {
            storage.insert_settings(settings.try_into()?);
        }
        for exercise in snapshot.exercises {
            storage.insert_exercise(exercise.try_into()?);
        }
        for stored in snapshot.equipment_profiles {
            storage.insert_equipment_profile(
                stored.equipment_id.into(),
                stored.gym_id.map(domain::GymID::from),
                stored.profile.try_into()?,
            );
        }
        for stored in snapshot.feedback {
            storage.feedback.borrow_mut().insert(
                stored.exercise_id.into(),
                domain::Feedback::try_from(stored.feedback.as_str())?,
            );
        }

        debug!(
            "loaded {} exercises and {} equipment profiles",
            storage.exercises.borrow().len(),
            storage.profiles.borrow().len()
        );

        Ok(storage)
    }

    pub fn to_json(&self) -> Result<String, JsonError> {
        let snapshot = json::Snapshot {
            settings: self.settings.borrow().as_ref().map(json::Settings::from),
            exercises: self
                .exercises
                .borrow()
                .values()
                .map(json::Exercise::from)
                .collect(),
            equipment_profiles: self
                .profiles
                .borrow()
                .iter()
                .map(
                    |((equipment_id, gym_id), profile)| json::StoredEquipmentProfile {
                        equipment_id: **equipment_id,
                        gym_id: gym_id.map(|id| *id),
                        profile: profile.into(),
                    },
                )
                .collect(),
            feedback: self
                .feedback
                .borrow()
                .iter()
                .map(|(exercise_id, feedback)| json::StoredFeedback {
                    exercise_id: **exercise_id,
                    feedback: feedback.id().to_string(),
                })
                .collect(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    pub fn insert_settings(&self, settings: domain::Settings) {
        *self.settings.borrow_mut() = Some(settings);
    }

    pub fn insert_exercise(&self, exercise: domain::Exercise) {
        self.exercises.borrow_mut().insert(exercise.id, exercise);
    }

    /// Stores the profile of a piece of equipment, either as its default or for a specific gym.
    pub fn insert_equipment_profile(
        &self,
        equipment_id: domain::EquipmentID,
        gym_id: Option<domain::GymID>,
        profile: domain::EquipmentProfile,
    ) {
        self.profiles
            .borrow_mut()
            .insert((equipment_id, gym_id), profile);
    }

    fn connection(&self) -> Result<(), domain::StorageError> {
        if self.offline.get() {
            Err(domain::StorageError::NoConnection)
        } else {
            Ok(())
        }
    }
}

impl domain::SettingsRepository for InMemory {
    async fn read_settings(&self) -> Result<domain::Settings, domain::ReadError> {
        self.connection()?;
        Ok(self.settings.borrow().unwrap_or_default())
    }

    async fn write_settings(&self, settings: domain::Settings) -> Result<(), domain::UpdateError> {
        self.connection()?;
        self.insert_settings(settings);
        Ok(())
    }
}

impl domain::ExerciseRepository for InMemory {
    async fn read_exercise(
        &self,
        id: domain::ExerciseID,
    ) -> Result<domain::Exercise, domain::ReadError> {
        self.connection()?;
        self.exercises
            .borrow()
            .get(&id)
            .cloned()
            .ok_or(domain::ReadError::NotFound)
    }
}

impl domain::EquipmentProfileRepository for InMemory {
    async fn read_equipment_profile(
        &self,
        equipment_id: domain::EquipmentID,
        gym_id: Option<domain::GymID>,
    ) -> Result<Option<domain::EquipmentProfile>, domain::ReadError> {
        self.connection()?;
        let profiles = self.profiles.borrow();
        Ok(gym_id
            .and_then(|gym_id| profiles.get(&(equipment_id, Some(gym_id))))
            .or_else(|| profiles.get(&(equipment_id, None)))
            .cloned())
    }
}

impl domain::FeedbackRepository for InMemory {
    async fn read_feedback(
        &self,
        exercise_id: domain::ExerciseID,
    ) -> Result<Option<domain::Feedback>, domain::ReadError> {
        self.connection()?;
        Ok(self.feedback.borrow().get(&exercise_id).copied())
    }

    async fn write_feedback(
        &self,
        exercise_id: domain::ExerciseID,
        feedback: domain::Feedback,
    ) -> Result<(), domain::UpdateError> {
        self.connection()?;
        self.feedback.borrow_mut().insert(exercise_id, feedback);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use liftplan_domain::{
        EquipmentProfileRepository, ExerciseRepository, FeedbackRepository, SettingsRepository,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use crate::tests::data::{
        BARBELL, BARBELL_ID, BARBELL_ROW, BENCH_PRESS, CHEST_PRESS, DUMBBELL_CURL, DUMBBELLS,
        DUMBBELLS_ID, EXERCISES, GYM_ID, HOME_BARBELL, MACHINE, MACHINE_ID,
    };

    use super::*;

    fn storage() -> InMemory {
        let storage = InMemory::new();
        for exercise in EXERCISES.iter() {
            storage.insert_exercise(exercise.clone());
        }
        storage.insert_equipment_profile(*BARBELL_ID, None, BARBELL.clone());
        storage.insert_equipment_profile(*BARBELL_ID, Some(*GYM_ID), HOME_BARBELL.clone());
        storage.insert_equipment_profile(*MACHINE_ID, None, MACHINE.clone());
        storage.insert_equipment_profile(*DUMBBELLS_ID, None, DUMBBELLS.clone());
        storage
    }

    fn service() -> domain::Service<InMemory> {
        domain::Service::new(storage())
    }

    fn weights(steps: &[domain::WarmupStep]) -> Vec<f64> {
        steps.iter().map(|s| s.weight).collect()
    }

    fn request(
        exercise: &domain::Exercise,
        top_weight: f64,
        equipment_id: Option<domain::EquipmentID>,
    ) -> domain::WarmupRequest {
        domain::WarmupRequest {
            exercise_id: exercise.id,
            top_weight,
            equipment_id,
        }
    }

    #[tokio::test]
    async fn test_read_settings_default() {
        assert_eq!(
            InMemory::new().read_settings().await.unwrap(),
            domain::Settings::default()
        );
    }

    #[tokio::test]
    async fn test_write_settings() {
        let storage = InMemory::new();
        let settings = domain::Settings::default().with_unit(domain::Unit::Lb);

        storage.write_settings(settings).await.unwrap();

        assert_eq!(storage.read_settings().await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_read_exercise() {
        let storage = storage();

        assert_eq!(
            storage.read_exercise(BENCH_PRESS.id).await.unwrap(),
            *BENCH_PRESS
        );
        assert!(matches!(
            storage.read_exercise(42.into()).await,
            Err(domain::ReadError::NotFound)
        ));
    }

    #[rstest]
    #[case(None, Some(BARBELL.clone()))]
    #[case(Some(*GYM_ID), Some(HOME_BARBELL.clone()))]
    #[case(Some(2.into()), Some(BARBELL.clone()))]
    #[tokio::test]
    async fn test_read_equipment_profile(
        #[case] gym_id: Option<domain::GymID>,
        #[case] expected: Option<domain::EquipmentProfile>,
    ) {
        assert_eq!(
            storage()
                .read_equipment_profile(*BARBELL_ID, gym_id)
                .await
                .unwrap(),
            expected
        );
    }

    #[tokio::test]
    async fn test_read_equipment_profile_unknown() {
        assert_eq!(
            storage()
                .read_equipment_profile(42.into(), Some(*GYM_ID))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_write_feedback() {
        let storage = storage();

        assert_eq!(storage.read_feedback(BENCH_PRESS.id).await.unwrap(), None);

        storage
            .write_feedback(BENCH_PRESS.id, domain::Feedback::TooMuch)
            .await
            .unwrap();
        storage
            .write_feedback(BENCH_PRESS.id, domain::Feedback::Excellent)
            .await
            .unwrap();

        assert_eq!(
            storage.read_feedback(BENCH_PRESS.id).await.unwrap(),
            Some(domain::Feedback::Excellent)
        );
    }

    #[tokio::test]
    async fn test_offline() {
        let storage = storage();
        storage.set_offline(true);

        assert!(matches!(
            storage.read_settings().await,
            Err(domain::ReadError::Storage(domain::StorageError::NoConnection))
        ));
        assert!(matches!(
            storage
                .write_feedback(BENCH_PRESS.id, domain::Feedback::TooMuch)
                .await,
            Err(domain::UpdateError::Storage(
                domain::StorageError::NoConnection
            ))
        ));

        storage.set_offline(false);

        assert!(storage.read_exercise(BENCH_PRESS.id).await.is_ok());
    }

    #[test]
    fn test_from_json() {
        let storage = InMemory::from_json(
            &json!({
                "settings": {
                    "unit": "lb",
                    "roundingIncrement": 5.0,
                    "minWeight": 45.0,
                    "strategy": "quick",
                },
                "exercises": [json::Exercise::from(&*BENCH_PRESS)],
                "equipmentProfiles": [
                    {
                        "equipmentId": **BARBELL_ID,
                        "profile": json::EquipmentProfile::from(&*BARBELL),
                    },
                    {
                        "equipmentId": **BARBELL_ID,
                        "gymId": **GYM_ID,
                        "profile": json::EquipmentProfile::from(&*HOME_BARBELL),
                    },
                ],
                "feedback": [
                    {"exerciseId": *BENCH_PRESS.id, "feedback": "not_enough"},
                ],
            })
            .to_string(),
        )
        .unwrap();

        assert_eq!(
            *storage.settings.borrow(),
            Some(domain::Settings {
                unit: domain::Unit::Lb,
                rounding_increment: 5.0,
                min_weight: 45.0,
                strategy: domain::Strategy::Quick,
            })
        );
        assert_eq!(
            storage.exercises.borrow().get(&BENCH_PRESS.id),
            Some(&*BENCH_PRESS)
        );
        assert_eq!(
            storage.profiles.borrow().get(&(*BARBELL_ID, Some(*GYM_ID))),
            Some(&*HOME_BARBELL)
        );
        assert_eq!(
            storage.feedback.borrow().get(&BENCH_PRESS.id),
            Some(&domain::Feedback::NotEnough)
        );
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            InMemory::from_json(r#"{"feedback": [{"exerciseId": "00000000-0000-0000-0000-000000000001", "feedback": "meh"}]}"#),
            Err(JsonError::Feedback(_))
        ));
        assert!(matches!(
            InMemory::from_json("42"),
            Err(JsonError::Serde(_))
        ));
    }

    #[test]
    fn test_to_json() {
        let storage = storage();
        storage.insert_settings(domain::Settings::default());
        storage
            .feedback
            .borrow_mut()
            .insert(DUMBBELL_CURL.id, domain::Feedback::TooMuch);

        let restored = InMemory::from_json(&storage.to_json().unwrap()).unwrap();

        assert_eq!(*restored.settings.borrow(), *storage.settings.borrow());
        assert_eq!(*restored.exercises.borrow(), *storage.exercises.borrow());
        assert_eq!(*restored.profiles.borrow(), *storage.profiles.borrow());
        assert_eq!(*restored.feedback.borrow(), *storage.feedback.borrow());
    }

    #[tokio::test]
    async fn test_resolve_load_plates() {
        let result = service()
            .resolve_load(*BARBELL_ID, None, 100.0, domain::LoadType::DualLoad)
            .await
            .unwrap();

        assert_eq!(result.target_display, 100.0);
        assert_eq!(
            result.plates.map(|p| p.per_side),
            Some(vec![25.0, 15.0])
        );
        assert_eq!(result.match_quality, domain::MatchQuality::Exact);
    }

    #[tokio::test]
    async fn test_resolve_load_stack() {
        let result = service()
            .resolve_load(*MACHINE_ID, None, 57.0, domain::LoadType::Stack)
            .await
            .unwrap();

        assert_eq!(result.target_display, 57.5);
        assert_eq!(result.machine_display(), Some(55.0));
        assert_eq!(result.used_add_ons(), &[2.5]);
        assert_eq!(result.match_quality, domain::MatchQuality::NearestUp);
    }

    #[tokio::test]
    async fn test_resolve_load_fixed() {
        let result = service()
            .resolve_load(*DUMBBELLS_ID, None, 23.0, domain::LoadType::Fixed)
            .await
            .unwrap();

        assert_eq!(result.target_display, 22.0);
        assert_eq!(result.match_quality, domain::MatchQuality::NearestDown);
    }

    #[tokio::test]
    async fn test_resolve_load_gym_profile() {
        let result = service()
            .resolve_load(*BARBELL_ID, Some(*GYM_ID), 100.0, domain::LoadType::DualLoad)
            .await
            .unwrap();

        assert_eq!(result.profile_unit, domain::Unit::Lb);
        assert_approx_eq!(result.total_system_weight, 220.0);
        assert_approx_eq!(result.target_display, 220.0 / domain::LB_PER_KG);
        assert_eq!(
            result.plates.map(|p| p.per_side),
            Some(vec![45.0, 35.0, 5.0, 2.5])
        );
        assert_eq!(result.match_quality, domain::MatchQuality::NearestDown);
    }

    #[tokio::test]
    async fn test_resolve_load_errors() {
        let service = service();

        assert!(matches!(
            service
                .resolve_load(42.into(), None, 100.0, domain::LoadType::DualLoad)
                .await,
            Err(domain::ServiceError::Read(domain::ReadError::NotFound))
        ));
        assert!(matches!(
            service
                .resolve_load(*BARBELL_ID, None, -1.0, domain::LoadType::DualLoad)
                .await,
            Err(domain::ServiceError::Validation(
                domain::ValidationError::Weight(_)
            ))
        ));
    }

    #[tokio::test]
    async fn test_resolve_load_invalid_profile() {
        let storage = storage();
        storage.insert_equipment_profile(
            *BARBELL_ID,
            None,
            domain::EquipmentProfile::barbell(domain::Unit::Kg, -20.0, &[25.0]),
        );

        assert!(matches!(
            domain::Service::new(storage)
                .resolve_load(*BARBELL_ID, None, 100.0, domain::LoadType::DualLoad)
                .await,
            Err(domain::ServiceError::Validation(
                domain::ValidationError::EquipmentProfile(
                    domain::EquipmentProfileError::NegativeWeight(_)
                )
            ))
        ));
    }

    #[tokio::test]
    async fn test_resolve_load_offline() {
        let storage = storage();
        storage.set_offline(true);

        assert!(matches!(
            domain::Service::new(storage)
                .resolve_load(*BARBELL_ID, None, 100.0, domain::LoadType::DualLoad)
                .await,
            Err(domain::ServiceError::Read(domain::ReadError::Storage(
                domain::StorageError::NoConnection
            )))
        ));
    }

    #[tokio::test]
    async fn test_plan_warmup_session() {
        let service = service();
        let mut context = domain::WarmupContext::new();

        let bench_press = service
            .plan_warmup(&context, None, request(&BENCH_PRESS, 100.0, Some(*BARBELL_ID)))
            .await
            .unwrap();

        assert_eq!(weights(&bench_press), vec![40.0, 60.0, 80.0]);
        assert_eq!(
            bench_press.iter().map(|s| s.reps).collect::<Vec<_>>(),
            vec![10, 8, 5]
        );
        assert_eq!(
            bench_press.iter().map(|s| s.rest).collect::<Vec<_>>(),
            vec![60, 90, 120]
        );

        service
            .finish_exercises(&mut context, &[BENCH_PRESS.id])
            .await
            .unwrap();

        let chest_press = service
            .plan_warmup(&context, None, request(&CHEST_PRESS, 100.0, Some(*MACHINE_ID)))
            .await
            .unwrap();

        assert_eq!(weights(&chest_press), vec![70.0]);
        assert_eq!(chest_press[0].reps, 5);

        let barbell_row = service
            .plan_warmup(&context, None, request(&BARBELL_ROW, 60.0, Some(*BARBELL_ID)))
            .await
            .unwrap();

        assert_eq!(weights(&barbell_row), vec![22.5, 35.0, 47.5]);
    }

    #[tokio::test]
    async fn test_plan_warmup_feedback() {
        let service = service();
        let context = domain::WarmupContext::new();

        service
            .record_feedback(BENCH_PRESS.id, domain::Feedback::NotEnough)
            .await
            .unwrap();

        assert_eq!(
            weights(
                &service
                    .plan_warmup(&context, None, request(&BENCH_PRESS, 100.0, None))
                    .await
                    .unwrap()
            ),
            vec![45.0, 62.5, 82.5]
        );

        service
            .record_feedback(BENCH_PRESS.id, domain::Feedback::TooMuch)
            .await
            .unwrap();

        assert_eq!(
            weights(
                &service
                    .plan_warmup(&context, None, request(&BENCH_PRESS, 100.0, None))
                    .await
                    .unwrap()
            ),
            vec![35.0, 57.5, 77.5]
        );
    }

    #[tokio::test]
    async fn test_plan_warmup_settings_in_lb() {
        let storage = storage();
        storage.insert_settings(domain::Settings {
            unit: domain::Unit::Lb,
            rounding_increment: 5.0,
            min_weight: 45.0,
            strategy: domain::Strategy::Ramped,
        });
        let service = domain::Service::new(storage);

        assert_eq!(
            weights(
                &service
                    .plan_warmup(
                        &domain::WarmupContext::new(),
                        None,
                        request(&BENCH_PRESS, 225.0, None)
                    )
                    .await
                    .unwrap()
            ),
            vec![90.0, 135.0, 180.0]
        );
    }

    #[tokio::test]
    async fn test_plan_warmup_errors() {
        let service = service();
        let context = domain::WarmupContext::new();

        assert!(matches!(
            service
                .plan_warmup(&context, None, request(&BENCH_PRESS, 0.0, None))
                .await,
            Err(domain::ServiceError::Validation(
                domain::ValidationError::TopWeight(_)
            ))
        ));
        assert!(matches!(
            service
                .plan_warmup(
                    &context,
                    None,
                    domain::WarmupRequest {
                        exercise_id: 42.into(),
                        top_weight: 100.0,
                        equipment_id: None,
                    }
                )
                .await,
            Err(domain::ServiceError::Read(domain::ReadError::NotFound))
        ));
    }

    #[tokio::test]
    async fn test_plan_superset_warmup() {
        let service = service();
        let mut context = domain::WarmupContext::new();

        service
            .finish_exercises(&mut context, &[BENCH_PRESS.id])
            .await
            .unwrap();

        let plans = service
            .plan_superset_warmup(
                &context,
                None,
                &[
                    request(&CHEST_PRESS, 100.0, None),
                    request(&BARBELL_ROW, 100.0, None),
                ],
            )
            .await
            .unwrap();

        assert_eq!(
            plans.iter().map(|p| weights(p)).collect::<Vec<_>>(),
            vec![vec![40.0, 60.0, 80.0], vec![40.0, 60.0, 80.0]]
        );

        service
            .finish_exercises(&mut context, &[CHEST_PRESS.id, BARBELL_ROW.id])
            .await
            .unwrap();

        let plans = service
            .plan_superset_warmup(
                &context,
                None,
                &[
                    request(&BENCH_PRESS, 100.0, None),
                    request(&DUMBBELL_CURL, 20.0, None),
                ],
            )
            .await
            .unwrap();

        assert_eq!(
            plans.iter().map(|p| weights(p)).collect::<Vec<_>>(),
            vec![vec![55.0, 75.0], vec![]]
        );
    }

    #[tokio::test]
    async fn test_plan_superset_warmup_without_muscles() {
        let storage = storage();
        storage.insert_settings(domain::Settings {
            strategy: domain::Strategy::Quick,
            ..domain::Settings::default()
        });
        storage.insert_exercise(domain::Exercise {
            id: 5.into(),
            name: "Sled Push".to_string(),
            equipment: domain::Equipment::None,
            muscles: vec![],
        });
        let service = domain::Service::new(storage);
        let context = domain::WarmupContext::new();
        let sled_push = domain::WarmupRequest {
            exercise_id: 5.into(),
            top_weight: 100.0,
            equipment_id: None,
        };

        let single = service
            .plan_warmup(&context, None, sled_push)
            .await
            .unwrap();
        let superset = service
            .plan_superset_warmup(&context, None, &[sled_push])
            .await
            .unwrap();

        assert_eq!(weights(&single), vec![50.0, 70.0]);
        assert_eq!(superset, vec![single]);
    }

    #[tokio::test]
    async fn test_plan_warmup_dumbbell_rack() {
        let storage = storage();
        storage.insert_settings(domain::Settings {
            min_weight: 0.0,
            ..domain::Settings::default()
        });
        let service = domain::Service::new(storage);
        let context = domain::WarmupContext::new();

        let steps = service
            .plan_warmup(&context, None, request(&DUMBBELL_CURL, 20.0, Some(*DUMBBELLS_ID)))
            .await
            .unwrap();

        assert_eq!(weights(&steps), vec![8.0, 12.0, 16.0]);
        assert!(steps.iter().all(|s| s.weight > 0.0 && s.percentage > 0.0));
    }

    #[tokio::test]
    async fn test_plan_warmup_dumbbell_rack_min_weight() {
        let steps = service()
            .plan_warmup(
                &domain::WarmupContext::new(),
                None,
                request(&DUMBBELL_CURL, 30.0, Some(*DUMBBELLS_ID)),
            )
            .await
            .unwrap();

        assert_eq!(weights(&steps), vec![20.0, 24.0]);
    }

    #[tokio::test]
    async fn test_finish_exercises() {
        let service = service();
        let mut context = domain::WarmupContext::new();

        service
            .finish_exercises(&mut context, &[BENCH_PRESS.id, DUMBBELL_CURL.id])
            .await
            .unwrap();

        assert_eq!(
            context.warmth(domain::MuscleGroup::Chest),
            domain::Warmth::Primary
        );
        assert_eq!(
            context.warmth(domain::MuscleGroup::Biceps),
            domain::Warmth::Primary
        );
        assert_eq!(
            context.warmth(domain::MuscleGroup::Triceps),
            domain::Warmth::Secondary
        );
        assert_eq!(
            context.warmth(domain::MuscleGroup::Quads),
            domain::Warmth::Cold
        );

        assert!(matches!(
            service.finish_exercises(&mut context, &[42.into()]).await,
            Err(domain::ServiceError::Read(domain::ReadError::NotFound))
        ));
    }
}
