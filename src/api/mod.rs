// API routes and handlers

pub mod exercise_types;
pub mod health;
pub mod routes;
pub mod training_blocks;
pub mod training_plans;
pub mod users;
pub mod workouts;

use axum::{
    extract::{Path, Query},
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::Value;

use crate::error::ApiError;

/// Raw JSON body; presence checks run on it before typed decoding.
pub type JsonBody = WithRejection<Json<Value>, ApiError>;
pub type IdPath = WithRejection<Path<i64>, ApiError>;
pub type QueryParams<T> = WithRejection<Query<T>, ApiError>;
