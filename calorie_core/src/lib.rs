#![forbid(unsafe_code)]

//! Core domain model and business logic for the calorie tracker.
//!
//! This crate provides:
//! - Domain types (profile, food entries, analysis results, views)
//! - Calorie target calculation
//! - Food log management
//! - Persistence (key-value port, file and in-memory stores)
//! - Application state and screen routing
//! - Food image analysis sessions

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod calculator;
pub mod storage;
pub mod food_log;
pub mod summary;
pub mod analysis;
pub mod router;
pub mod app;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, TargetConfig};
pub use calculator::compute_profile;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use food_log::FoodLog;
pub use summary::DailySummary;
pub use analysis::{CommandAnalyzer, FoodAnalyzer, ScanOutcome, ScanSession};
pub use app::App;
