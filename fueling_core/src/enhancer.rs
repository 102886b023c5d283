//! External plan enhancement seam.
//!
//! The core never makes network calls. An external enhancer (typically an
//! LLM behind the calling layer) may offer a richer [`FuelingPlan`], but
//! its output is untrusted: it must parse against the fixed plan shape,
//! keep phase totals within tolerance of the deterministic targets, keep
//! event timings exactly equal to the locked skeleton, and respect
//! per-item GI carb caps. On any failure the deterministic fallback plan
//! is substituted; this substitution is mandatory, not optional.

use crate::config::EngineConfig;
use crate::{
    AthleteProfile, Error, FuelingItem, FuelingPlan, FuelingTargets, GiSensitivity, Result,
    ScheduleSkeleton,
};

/// Inputs handed to an external enhancer
pub struct EnhancementRequest<'a> {
    pub targets: &'a FuelingTargets,
    pub skeleton: &'a ScheduleSkeleton,
    /// Optional product catalog the enhancer may draw items from
    pub catalog: Option<&'a [FuelingItem]>,
}

/// A pluggable, untrusted plan enhancer.
///
/// Implementations live in the calling layer (network client, retry and
/// timeout policy included); the core only defines the contract and the
/// validation gate. The returned JSON is parsed and validated before it
/// can replace the fallback plan.
pub trait ExternalEnhancer {
    fn enhance(&self, request: &EnhancementRequest<'_>) -> Result<serde_json::Value>;
}

/// Attempt enhancement, falling back to the deterministic plan on any
/// failure. Never returns an error and never surfaces enhancement
/// problems to the end user.
pub fn enhance_or_fallback(
    enhancer: &dyn ExternalEnhancer,
    profile: &AthleteProfile,
    targets: &FuelingTargets,
    skeleton: &ScheduleSkeleton,
    catalog: Option<&[FuelingItem]>,
    config: &EngineConfig,
    fallback: FuelingPlan,
) -> FuelingPlan {
    let request = EnhancementRequest {
        targets,
        skeleton,
        catalog,
    };

    let raw = match enhancer.enhance(&request) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Enhancer call failed, using fallback plan: {}", e);
            return fallback;
        }
    };

    let enhanced: FuelingPlan = match serde_json::from_value(raw) {
        Ok(plan) => plan,
        Err(e) => {
            tracing::warn!("Enhanced plan failed shape parse, using fallback: {}", e);
            return fallback;
        }
    };

    match validate_enhanced_plan(&enhanced, profile, targets, skeleton, config) {
        Ok(()) => {
            tracing::info!("Enhanced plan accepted");
            enhanced
        }
        Err(e) => {
            tracing::warn!("Enhanced plan rejected, using fallback: {}", e);
            fallback
        }
    }
}

/// Validate an enhanced plan against the deterministic targets and the
/// locked skeleton.
///
/// Checks, in order:
/// 1. Event timings exactly match the skeleton
/// 2. During-phase totals within the configured tolerance of the targets
/// 3. Every phase has at least one item
/// 4. Per-item carb content respects the GI caps
pub fn validate_enhanced_plan(
    plan: &FuelingPlan,
    profile: &AthleteProfile,
    targets: &FuelingTargets,
    skeleton: &ScheduleSkeleton,
    config: &EngineConfig,
) -> Result<()> {
    if plan.schedule != *skeleton {
        return Err(Error::Enhancement(
            "event timings differ from the locked skeleton".into(),
        ));
    }

    let tolerance = config.enhancement.tolerance_pct;
    let totals = &plan.during_workout.totals;
    check_tolerance("carbs", totals.carbs_g, f64::from(targets.carbs_total_g), tolerance)?;
    check_tolerance(
        "fluids",
        totals.fluids_ml,
        f64::from(targets.fluids_total_ml),
        tolerance,
    )?;
    check_tolerance(
        "sodium",
        totals.sodium_mg,
        f64::from(targets.sodium_total_mg),
        tolerance,
    )?;

    let mut phases = vec![&plan.during_workout, &plan.post_workout];
    if let Some(pre) = &plan.pre_workout {
        phases.push(pre);
    }

    for phase in &phases {
        if phase.items.is_empty() {
            return Err(Error::Enhancement(format!(
                "phase '{}' has no items",
                phase.timing
            )));
        }
    }

    let item_cap = match profile.gi_sensitivity {
        GiSensitivity::High => Some(config.enhancement.item_carb_cap_gi_high_g),
        GiSensitivity::Medium => Some(config.enhancement.item_carb_cap_gi_medium_g),
        GiSensitivity::Low => None,
    };
    // GI caps govern carb intake around and during exercise; the
    // post-workout recovery meal is not dose-limited
    let mut exercise_phases = vec![&plan.during_workout];
    if let Some(pre) = &plan.pre_workout {
        exercise_phases.push(pre);
    }
    if let Some(cap) = item_cap {
        for phase in &exercise_phases {
            for item in &phase.items {
                // Items may aggregate several units (e.g. 3 gels in one
                // row); the cap governs the carbs in a single dose
                let per_unit = item.carbs_g.unwrap_or(0.0) / item.quantity.max(1.0);
                if per_unit > cap {
                    return Err(Error::Enhancement(format!(
                        "item '{}' carries {:.0} g carbs per unit, above the {:.0} g GI cap",
                        item.name, per_unit, cap
                    )));
                }
            }
        }
    }

    Ok(())
}

fn check_tolerance(label: &str, actual: f64, target: f64, tolerance_pct: f64) -> Result<()> {
    let ok = if target == 0.0 {
        actual == 0.0
    } else {
        (actual - target).abs() <= target * tolerance_pct / 100.0
    };
    if ok {
        Ok(())
    } else {
        Err(Error::Enhancement(format!(
            "{label} total {actual:.0} outside ±{tolerance_pct:.0}% of target {target:.0}"
        )))
    }
}
