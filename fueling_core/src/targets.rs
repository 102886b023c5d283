//! Target calculation for workout fueling.
//!
//! This module implements the deterministic target rules:
//! - Carbohydrate rate from a duration x intensity decision table,
//!   clamped by GI sensitivity
//! - Fluid and sodium rates from sweat rate, adjusted for heat and
//!   hard-capped at physiological safety limits
//! - Caffeine total gated on habitual use, duration and intensity
//!
//! Identical inputs always yield identical outputs; callers rely on this
//! for the enhancement tolerance gate and reproducible testing.

use crate::{
    AthleteProfile, CaffeineUse, CapTag, ExperienceLevel, FuelingTargets, GiSensitivity,
    Intensity, SweatRate, WorkoutInput,
};

/// Hard hydration safety cap (ml per hour)
const FLUID_CAP_ML_PER_H: f64 = 1000.0;

/// Hard sodium safety cap (mg per hour)
const SODIUM_CAP_MG_PER_H: f64 = 1000.0;

/// Hard caffeine safety cap (mg per workout)
const CAFFEINE_CAP_MG: f64 = 200.0;

/// Compute per-hour and total fueling targets for one workout.
///
/// Pure and deterministic. Enumerated inputs are assumed well-formed;
/// values outside the defined domains are a caller validation failure.
pub fn calculate_targets(profile: &AthleteProfile, workout: &WorkoutInput) -> FuelingTargets {
    let mut caps_applied = Vec::new();
    let duration_h = f64::from(workout.duration_min) / 60.0;

    let carbs_g_per_h = carb_rate(profile, workout, &mut caps_applied);
    let fluids_ml_per_h = fluid_rate(profile, workout, &mut caps_applied);
    let sodium_mg_per_h = sodium_rate(profile, workout, &mut caps_applied);
    let caffeine_mg_total = caffeine_total(profile, workout, &mut caps_applied);

    let targets = FuelingTargets {
        carbs_g_per_h,
        fluids_ml_per_h,
        sodium_mg_per_h,
        caffeine_mg_total,
        carbs_total_g: round_to_nearest(carbs_g_per_h * duration_h, 5.0),
        fluids_total_ml: round_to_nearest(fluids_ml_per_h * duration_h, 10.0),
        sodium_total_mg: round_to_nearest(sodium_mg_per_h * duration_h, 10.0),
        duration_h,
        caps_applied,
    };

    tracing::debug!(
        "Targets for {} min {:?} session: {} g/h carbs, {} ml/h fluids, {} mg/h sodium, caps {:?}",
        workout.duration_min,
        workout.intensity,
        targets.carbs_g_per_h,
        targets.fluids_ml_per_h,
        targets.sodium_mg_per_h,
        targets.caps_applied
    );

    targets
}

/// Carbohydrate rate (g/h) from the duration x intensity table,
/// then clamped by GI sensitivity
fn carb_rate(
    profile: &AthleteProfile,
    workout: &WorkoutInput,
    caps_applied: &mut Vec<CapTag>,
) -> f64 {
    let base: f64 = match workout.intensity {
        Intensity::Low => 0.0,
        Intensity::Moderate => {
            if workout.duration_min < 60 {
                0.0
            } else if workout.duration_min <= 90 {
                30.0
            } else {
                50.0
            }
        }
        Intensity::High | Intensity::VeryHigh => {
            if workout.duration_min < 60 {
                0.0
            } else if workout.duration_min <= 90 {
                45.0
            } else {
                70.0
            }
        }
    };

    let (cap, tag) = match profile.gi_sensitivity {
        GiSensitivity::High => (60.0, CapTag::GiCarbCap60),
        GiSensitivity::Medium => (75.0, CapTag::GiCarbCap75),
        GiSensitivity::Low => (90.0, CapTag::GiCarbCap90),
    };

    if base > cap {
        tracing::info!(
            "GI clamp reduced carb rate from {} to {} g/h ({:?} sensitivity)",
            base,
            cap,
            profile.gi_sensitivity
        );
        caps_applied.push(tag);
        cap
    } else {
        base
    }
}

/// Fluid rate (ml/h): sweat-rate base, heat multiplier, hard cap.
///
/// The 30 °C multiplier supersedes the 25 °C one; they never stack.
fn fluid_rate(
    profile: &AthleteProfile,
    workout: &WorkoutInput,
    caps_applied: &mut Vec<CapTag>,
) -> f64 {
    let base = match profile.sweat_rate {
        SweatRate::Low => 475.0,
        SweatRate::Medium => 650.0,
        SweatRate::High => 850.0,
    };

    let adjusted = base * heat_multiplier(workout.temperature_c, 1.15, 1.25);

    if adjusted > FLUID_CAP_ML_PER_H {
        caps_applied.push(CapTag::HydrationCap1000);
        FLUID_CAP_ML_PER_H
    } else {
        adjusted
    }
}

/// Sodium rate (mg/h): sweat-rate base, heat multiplier, hard cap
fn sodium_rate(
    profile: &AthleteProfile,
    workout: &WorkoutInput,
    caps_applied: &mut Vec<CapTag>,
) -> f64 {
    let base = match profile.sweat_rate {
        SweatRate::Low => 300.0,
        SweatRate::Medium => 450.0,
        SweatRate::High => 600.0,
    };

    let adjusted = base * heat_multiplier(workout.temperature_c, 1.10, 1.15);

    if adjusted > SODIUM_CAP_MG_PER_H {
        caps_applied.push(CapTag::SodiumCap1000);
        SODIUM_CAP_MG_PER_H
    } else {
        adjusted
    }
}

fn heat_multiplier(temperature_c: Option<f64>, warm: f64, hot: f64) -> f64 {
    match temperature_c {
        Some(t) if t >= 30.0 => hot,
        Some(t) if t >= 25.0 => warm,
        _ => 1.0,
    }
}

/// Caffeine total (mg) for the whole workout.
///
/// Zero unless the athlete uses caffeine, the session runs at least
/// 90 minutes and the intensity is high or very high. Beginners get
/// half the dose.
fn caffeine_total(
    profile: &AthleteProfile,
    workout: &WorkoutInput,
    caps_applied: &mut Vec<CapTag>,
) -> f64 {
    if profile.caffeine_use == CaffeineUse::None
        || workout.duration_min < 90
        || !matches!(workout.intensity, Intensity::High | Intensity::VeryHigh)
    {
        return 0.0;
    }

    let mg_per_kg = if profile.caffeine_use == CaffeineUse::High {
        3.0
    } else {
        2.0
    };

    let mut dose = profile.weight_kg * mg_per_kg;

    if profile.experience_level == ExperienceLevel::Beginner {
        dose /= 2.0;
    }

    if dose > CAFFEINE_CAP_MG {
        caps_applied.push(CapTag::CaffeineCap200);
        CAFFEINE_CAP_MG
    } else {
        dose
    }
}

/// Round to the nearest multiple of `step`, never below zero
fn round_to_nearest(value: f64, step: f64) -> u32 {
    let rounded = (value / step).round() * step;
    rounded.max(0.0) as u32
}
