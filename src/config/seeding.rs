use anyhow::Result;
use chrono::{Duration, Utc};
use std::collections::HashMap;

use crate::db::{users, Database};
use crate::models::*;
use crate::services::*;

pub const DEMO_ACCESS_KEY: &str = "dev_user_1";

const DEMO_EXERCISES: [(&str, &str, &str); 4] = [
    ("Bench Press", "Strength", "3 x 8-12, 90s rest"),
    ("Squats", "Strength", "4 x 6-8, 120s rest"),
    ("Pull-ups", "Bodyweight", "3 x max, 60s rest"),
    ("Running", "Cardio", "30 min at moderate intensity"),
];

/// Populates a development database with a small sample hierarchy.
pub struct DatabaseSeeder {
    db: Database,
}

impl DatabaseSeeder {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Returns false without writing anything when the demo user exists.
    pub async fn seed_all(&self) -> Result<bool> {
        let mut conn = self.db.read().await?;
        if users::find_user_by_access_key(&mut conn, DEMO_ACCESS_KEY)
            .await?
            .is_some()
        {
            tracing::info!("Demo data already present, skipping seeding");
            return Ok(false);
        }
        drop(conn);

        tracing::info!("Starting database seeding...");

        let user = UserService::new(self.db.clone())
            .create_user(CreateUser {
                access_key: DEMO_ACCESS_KEY.to_string(),
                nickname: "John Doe".to_string(),
            })
            .await?;
        let catalog = self.seed_exercise_types().await?;
        let block = self.seed_plan(&user).await?;
        self.seed_workouts(&block, &catalog).await?;

        tracing::info!("Database seeding completed!");
        Ok(true)
    }

    async fn seed_exercise_types(&self) -> Result<HashMap<String, i64>> {
        let service = ExerciseTypeService::new(self.db.clone());

        let mut catalog: HashMap<String, i64> = service
            .list_exercise_types()
            .await?
            .into_iter()
            .map(|exercise_type| (exercise_type.name, exercise_type.id))
            .collect();

        for (name, category, description) in DEMO_EXERCISES {
            if catalog.contains_key(name) {
                continue;
            }
            let created = service
                .create_exercise_type(CreateExerciseType {
                    name: name.to_string(),
                    category: category.to_string(),
                    description: Some(description.to_string()),
                })
                .await?;
            catalog.insert(created.name, created.id);
        }

        Ok(catalog)
    }

    async fn seed_plan(&self, user: &User) -> Result<TrainingBlock> {
        let start = Utc::now().date_naive();
        let end = start + Duration::weeks(12);

        let plan = TrainingPlanService::new(self.db.clone())
            .create_plan(CreateTrainingPlan {
                user_id: user.id,
                name: format!("{}'s Training Plan", user.nickname),
                progression_type: Some("linear".to_string()),
                target_weekly_hours: Some(5),
                start_date: Some(start.format("%Y-%m-%d").to_string()),
                end_date: Some(end.format("%Y-%m-%d").to_string()),
            })
            .await?;

        let block = TrainingBlockService::new(self.db.clone())
            .create_block(CreateTrainingBlock {
                plan_id: plan.id,
                name: "Foundation".to_string(),
                primary_focus: "Strength".to_string(),
                duration_weeks: 4,
                sequence_order: 1,
            })
            .await?;

        Ok(block)
    }

    async fn seed_workouts(&self, block: &TrainingBlock, catalog: &HashMap<String, i64>) -> Result<()> {
        let service = WorkoutService::new(self.db.clone());
        let start = Utc::now().date_naive();

        let templates: [(&str, Vec<(&str, i32, i32, Option<f64>)>); 3] = [
            ("Push Day", vec![("Bench Press", 4, 8, Some(60.0)), ("Pull-ups", 3, 12, None)]),
            ("Leg Day", vec![("Squats", 5, 5, Some(80.0)), ("Running", 1, 1, None)]),
            (
                "Full Body",
                vec![
                    ("Squats", 3, 10, Some(60.0)),
                    ("Bench Press", 3, 10, Some(45.0)),
                    ("Pull-ups", 3, 8, None),
                ],
            ),
        ];

        for (position, (name, entries)) in templates.into_iter().enumerate() {
            let exercises = entries
                .into_iter()
                .filter_map(|(exercise, sets, reps, weight)| {
                    catalog.get(exercise).map(|&exercise_type_id| ExerciseEntry {
                        exercise_type_id,
                        sets,
                        reps,
                        weight,
                        notes: None,
                        order: None,
                    })
                })
                .collect();

            let planned_date = start + Duration::days(position as i64 * 2);
            service
                .create_workout(CreateWorkout {
                    block_id: block.id,
                    name: name.to_string(),
                    planned_date: planned_date.format("%Y-%m-%d").to_string(),
                    actual_date: None,
                    status: WorkoutStatus::Planned,
                    sequence_order: position as i32 + 1,
                    exercises,
                })
                .await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{run_migrations, DatabaseConfig};

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let db = DatabaseConfig::in_memory().connect().await.unwrap();
        run_migrations(db.writer()).await.unwrap();

        let seeder = DatabaseSeeder::new(db.clone());
        assert!(seeder.seed_all().await.unwrap());
        assert!(!seeder.seed_all().await.unwrap());

        let types = ExerciseTypeService::new(db.clone())
            .list_exercise_types()
            .await
            .unwrap();
        assert_eq!(types.len(), DEMO_EXERCISES.len());

        let user = UserService::new(db.clone())
            .get_user_by_access_key(DEMO_ACCESS_KEY)
            .await
            .unwrap();
        let plans = UserService::new(db)
            .get_user_training_plans(user.id)
            .await
            .unwrap();
        assert_eq!(plans.len(), 1);
    }
}
