// Business logic services. Each mutating call runs in one transaction.

pub mod exercise_type_service;
pub mod training_block_service;
pub mod training_plan_service;
pub mod user_service;
pub mod workout_service;

pub use exercise_type_service::ExerciseTypeService;
pub use training_block_service::TrainingBlockService;
pub use training_plan_service::TrainingPlanService;
pub use user_service::UserService;
pub use workout_service::WorkoutService;
