//! Core domain types for the fueling and meal-plan engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Athlete profile and workout inputs
//! - Fueling targets and the safety cap tags
//! - Schedule skeleton events
//! - Fueling items, phases and the plan output contract
//! - Recipe candidates and pools

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Profile Types
// ============================================================================

/// Athlete sex (used for reporting; target rules are weight-driven)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Other,
}

/// Training experience level
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// Qualitative sweat-rate classification driving hydration and sodium targets
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SweatRate {
    Low,
    Medium,
    High,
}

/// Self-reported gastrointestinal tolerance to concentrated carbohydrate
/// intake during exercise
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GiSensitivity {
    Low,
    Medium,
    High,
}

/// Habitual caffeine use
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaffeineUse {
    None,
    Some,
    High,
}

/// Diet type for recipe filtering
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DietType {
    Omnivore,
    Vegetarian,
    Vegan,
    Keto,
}

/// Athlete profile, immutable per calculation call.
///
/// The core carries no persisted identity; the calling layer owns
/// authentication and storage.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AthleteProfile {
    pub weight_kg: f64,
    pub age: u32,
    pub sex: Sex,
    pub experience_level: ExperienceLevel,
    pub sweat_rate: SweatRate,
    pub gi_sensitivity: GiSensitivity,
    pub caffeine_use: CaffeineUse,
    pub primary_goal: String,
    /// Diet type for meal-plan recipe filtering (None = no restriction)
    #[serde(default)]
    pub diet: Option<DietType>,
    /// Allergen names matched case-insensitively against recipe ingredients
    #[serde(default)]
    pub allergies: Vec<String>,
}

// ============================================================================
// Workout Types
// ============================================================================

/// Workout intensity classification
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Low,
    Moderate,
    High,
    VeryHigh,
}

/// A single planned workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutInput {
    pub sport: String,
    /// Planned duration in minutes, must be > 0 (caller-validated)
    pub duration_min: u32,
    pub intensity: Intensity,
    /// Absolute start time; when absent, event times are relative ("T-40min")
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub temperature_c: Option<f64>,
    #[serde(default)]
    pub humidity_pct: Option<f64>,
}

// ============================================================================
// Fueling Targets
// ============================================================================

/// Safety clamps that can fire during target calculation.
///
/// A tag is recorded if and only if the clamp actually reduced the value.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CapTag {
    #[serde(rename = "GI_CARB_CAP_60g_per_h")]
    GiCarbCap60,
    #[serde(rename = "GI_CARB_CAP_75g_per_h")]
    GiCarbCap75,
    #[serde(rename = "GI_CARB_CAP_90g_per_h")]
    GiCarbCap90,
    #[serde(rename = "HYDRATION_CAP_1000ml_per_h")]
    HydrationCap1000,
    #[serde(rename = "SODIUM_CAP_1000mg_per_h")]
    SodiumCap1000,
    #[serde(rename = "CAFFEINE_CAP_200mg")]
    CaffeineCap200,
}

impl CapTag {
    /// Wire-format tag string (matches the serde rename)
    pub fn as_str(&self) -> &'static str {
        match self {
            CapTag::GiCarbCap60 => "GI_CARB_CAP_60g_per_h",
            CapTag::GiCarbCap75 => "GI_CARB_CAP_75g_per_h",
            CapTag::GiCarbCap90 => "GI_CARB_CAP_90g_per_h",
            CapTag::HydrationCap1000 => "HYDRATION_CAP_1000ml_per_h",
            CapTag::SodiumCap1000 => "SODIUM_CAP_1000mg_per_h",
            CapTag::CaffeineCap200 => "CAFFEINE_CAP_200mg",
        }
    }
}

/// Per-hour and total fueling targets, fully derived from profile + workout.
///
/// Recomputed fresh on every call, never mutated.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FuelingTargets {
    pub carbs_g_per_h: f64,
    pub fluids_ml_per_h: f64,
    pub sodium_mg_per_h: f64,
    pub caffeine_mg_total: f64,
    /// Total carbs, rounded to the nearest 5 g
    pub carbs_total_g: u32,
    /// Total fluids, rounded to the nearest 10 ml
    pub fluids_total_ml: u32,
    /// Total sodium, rounded to the nearest 10 mg
    pub sodium_total_mg: u32,
    pub duration_h: f64,
    pub caps_applied: Vec<CapTag>,
}

// ============================================================================
// Schedule Skeleton
// ============================================================================

/// A single timestamped consumption event
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FuelingEvent {
    /// "HH:MM" when the workout has an absolute start time, else "T±Xmin"
    pub time: String,
    pub action: String,
}

/// A during-workout consumption event with its slot index
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DuringEvent {
    /// Zero-based slot index
    pub slot: usize,
    pub time: String,
    pub action: String,
}

/// The locked set of timestamps at which fueling actions occur.
///
/// Once built, timings are authoritative: downstream components (the
/// assembler and any external enhancer) may change only the content
/// consumed at each event, never the times.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleSkeleton {
    pub pre: FuelingEvent,
    pub during: Vec<DuringEvent>,
    pub post: FuelingEvent,
}

// ============================================================================
// Fueling Plan Output Contract
// ============================================================================

/// One concrete food or drink item within a phase
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct FuelingItem {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat_g: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium_mg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluids_ml: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caffeine_mg: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
}

/// Summed macro totals for a phase
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PhaseTotals {
    pub carbs_g: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub sodium_mg: f64,
    pub fluids_ml: f64,
    pub caffeine_mg: f64,
}

/// Per-hour consumption rates reported for the during phase
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PerHourRates {
    pub carbs_g: f64,
    pub fluids_ml: f64,
    pub sodium_mg: f64,
}

/// One plan phase (pre/during/post) with its items and summed totals
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FuelingPhase {
    /// Human-readable timing description ("40 min before start", ...)
    pub timing: String,
    pub items: Vec<FuelingItem>,
    /// Computed by summing the item-level macro fields, never copied
    /// from the targets
    pub totals: PhaseTotals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_hour: Option<PerHourRates>,
    #[serde(default)]
    pub rationale: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl FuelingPhase {
    /// Sum the item-level macro fields into phase totals
    pub fn sum_items(items: &[FuelingItem]) -> PhaseTotals {
        let mut totals = PhaseTotals::default();
        for item in items {
            totals.carbs_g += item.carbs_g.unwrap_or(0.0);
            totals.protein_g += item.protein_g.unwrap_or(0.0);
            totals.fat_g += item.fat_g.unwrap_or(0.0);
            totals.sodium_mg += item.sodium_mg.unwrap_or(0.0);
            totals.fluids_ml += item.fluids_ml.unwrap_or(0.0);
            totals.caffeine_mg += item.caffeine_mg.unwrap_or(0.0);
        }
        totals
    }
}

/// Plan-level summary echoing the targets the plan was built against
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlanSummary {
    pub duration_h: f64,
    pub carbs_total_g: u32,
    pub fluids_total_ml: u32,
    pub sodium_total_mg: u32,
    pub caffeine_mg_total: f64,
    pub during_event_count: usize,
}

/// The complete fueling plan.
///
/// This shape is the stable contract consumed by UI rendering and
/// persistence; any enhancement path must preserve it exactly.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FuelingPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_workout: Option<FuelingPhase>,
    pub during_workout: FuelingPhase,
    pub post_workout: FuelingPhase,
    /// The locked timing skeleton the plan was assembled against
    pub schedule: ScheduleSkeleton,
    pub summary: PlanSummary,
    pub safety_checks: Vec<String>,
    #[serde(default)]
    pub rationale: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

// ============================================================================
// Recipe Types
// ============================================================================

/// Meal slot within a planning day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

/// Macro nutrients for one serving of a recipe, or a per-meal target
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Macros {
    pub kcal: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// A recipe available for selection
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecipeCandidate {
    pub title: String,
    pub servings: u32,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub macros: Macros,
    /// None = universal candidate, usable for any meal slot
    #[serde(default)]
    pub category: Option<MealType>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// User/catalog recipes offered to the selector.
///
/// The fixed built-in fallback pool lives in [`crate::pool`] and is
/// consulted when no candidate survives filtering.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecipePool {
    pub candidates: Vec<RecipeCandidate>,
}

/// Usage counts per normalized recipe title, shared across all selections
/// within one planning horizon. Caller-owned and caller-serialized.
pub type UsedTitles = HashMap<String, u32>;
