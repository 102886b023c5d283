#![forbid(unsafe_code)]

//! Core domain model and business logic for personalized exercise
//! fueling and meal planning.
//!
//! This crate provides:
//! - Domain types (profiles, workouts, targets, plans, recipes)
//! - Deterministic fueling-target calculation
//! - Locked schedule-skeleton construction
//! - Network-free fallback plan assembly
//! - External-enhancement validation gate
//! - Recipe selection with anti-repetition guarantees
//! - Daily macro targets for meal planning
//!
//! All entry points are pure, synchronous and free of I/O; the only
//! shared mutable state is the caller-supplied title-usage map.

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod targets;
pub mod schedule;
pub mod assembly;
pub mod enhancer;
pub mod selector;
pub mod pool;
pub mod daily;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::EngineConfig;
pub use targets::calculate_targets;
pub use schedule::build_skeleton;
pub use assembly::assemble_fallback;
pub use enhancer::{enhance_or_fallback, validate_enhanced_plan, EnhancementRequest, ExternalEnhancer};
pub use selector::{normalize_title, select_recipe};
pub use pool::{fallback_recipes, validate_fallback_pool};
pub use daily::{classify_day, daily_macro_targets, meal_slot_target, DayType};
