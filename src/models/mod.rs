// Data models, request payloads and validation rules

pub mod exercise_type;
pub mod training_block;
pub mod training_plan;
pub mod user;
pub mod validation;
pub mod workout;

pub use exercise_type::*;
pub use training_block::*;
pub use training_plan::*;
pub use user::*;
pub use workout::*;

use serde::{Deserialize, Deserializer};

/// Used with `#[serde(default)]` on `Option<Option<T>>` patch fields so an
/// explicit `null` becomes `Some(None)` while an absent key stays `None`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
