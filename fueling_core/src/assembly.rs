//! Deterministic fallback plan assembly.
//!
//! Turns targets plus the locked schedule skeleton into a complete,
//! schema-valid [`FuelingPlan`] with concrete food and drink items.
//! Guaranteed network-free: this is the plan the caller falls back to
//! whenever external enhancement fails validation.
//!
//! Phase totals are always computed by summing the item-level macro
//! fields, never copied from the targets.

use crate::{
    AthleteProfile, FuelingItem, FuelingPhase, FuelingPlan, FuelingTargets, GiSensitivity,
    PerHourRates, PlanSummary, ScheduleSkeleton, WorkoutInput,
};

/// Carbohydrate content of one energy gel (g)
pub const GEL_CARBS_G: f64 = 25.0;

/// Isotonic drink concentration: grams of carbs per 100 ml
pub const ISOTONIC_CARBS_G_PER_100ML: f64 = 6.0;

/// Sodium content of one electrolyte capsule (mg)
const ELECTROLYTE_CAPSULE_SODIUM_MG: f64 = 300.0;

/// Carbohydrate content of one plain rice cake (g)
const RICE_CAKE_CARBS_G: f64 = 11.0;

/// Carbohydrate content of one medium banana (g)
const BANANA_CARBS_G: f64 = 27.0;

/// Fraction of total workout carbs consumed pre-start
const PRE_FUEL_FRACTION: f64 = 0.15;

/// Fixed pre-workout water item volume (ml)
const PRE_WATER_ML: f64 = 400.0;

/// Assemble the complete fallback plan from targets and skeleton.
///
/// Every phase yields at least one item for every input combination, and
/// quantities are rounded to realistic human units (ml multiples, whole
/// gels, whole grams).
pub fn assemble_fallback(
    profile: &AthleteProfile,
    workout: &WorkoutInput,
    targets: &FuelingTargets,
    skeleton: &ScheduleSkeleton,
) -> FuelingPlan {
    let pre_workout = if workout.duration_min >= 60 {
        Some(build_pre_phase(profile, targets, skeleton))
    } else {
        None
    };

    let during_workout = build_during_phase(profile, targets, skeleton);
    let post_workout = build_post_phase(profile, workout, skeleton);

    let safety_checks = build_safety_checks(targets);

    let mut warnings = Vec::new();
    if let Some(t) = workout.temperature_c {
        if t >= 30.0 {
            warnings.push(format!(
                "Hot conditions ({t:.0} °C): fluid and sodium targets raised, monitor for cramping"
            ));
        }
    }

    tracing::info!(
        "Assembled fallback plan: {} during-events, {} g carbs, {} ml fluids",
        skeleton.during.len(),
        targets.carbs_total_g,
        targets.fluids_total_ml
    );

    FuelingPlan {
        pre_workout,
        during_workout,
        post_workout,
        schedule: skeleton.clone(),
        summary: PlanSummary {
            duration_h: targets.duration_h,
            carbs_total_g: targets.carbs_total_g,
            fluids_total_ml: targets.fluids_total_ml,
            sodium_total_mg: targets.sodium_total_mg,
            caffeine_mg_total: targets.caffeine_mg_total,
            during_event_count: skeleton.during.len(),
        },
        safety_checks,
        rationale: vec![format!(
            "{} session, {} min at {:?} intensity",
            workout.sport, workout.duration_min, workout.intensity
        )],
        warnings,
    }
}

/// Pre-workout phase: 15% of total carbs, solids for GI-sensitive
/// athletes, an isotonic drink otherwise, plus a fixed water item
fn build_pre_phase(
    profile: &AthleteProfile,
    targets: &FuelingTargets,
    skeleton: &ScheduleSkeleton,
) -> FuelingPhase {
    let pre_carbs = (PRE_FUEL_FRACTION * f64::from(targets.carbs_total_g)).round();
    let mut items = Vec::new();
    let mut rationale = Vec::new();

    if pre_carbs > 0.0 {
        if profile.gi_sensitivity == GiSensitivity::High {
            let count = (pre_carbs / RICE_CAKE_CARBS_G).round().max(1.0);
            items.push(FuelingItem {
                name: "Rice cakes with honey".into(),
                quantity: count,
                unit: "piece".into(),
                carbs_g: Some(count * RICE_CAKE_CARBS_G),
                notes: Some("Low-fibre solid carbs, easy on a sensitive stomach".into()),
                ..Default::default()
            });
            rationale.push("Solid low-fibre pre-fuel chosen for high GI sensitivity".into());
        } else {
            let volume = round_to_step(pre_carbs / ISOTONIC_CARBS_G_PER_100ML * 100.0, 50.0);
            items.push(FuelingItem {
                name: "Isotonic drink".into(),
                quantity: volume,
                unit: "ml".into(),
                carbs_g: Some((volume * ISOTONIC_CARBS_G_PER_100ML / 100.0).round()),
                fluids_ml: Some(volume),
                notes: Some("6 g carbs per 100 ml".into()),
                ..Default::default()
            });
        }
    }

    items.push(FuelingItem {
        name: "Water".into(),
        quantity: PRE_WATER_ML,
        unit: "ml".into(),
        fluids_ml: Some(PRE_WATER_ML),
        ..Default::default()
    });

    FuelingPhase {
        timing: format!("{} (40 min before start)", skeleton.pre.time),
        totals: FuelingPhase::sum_items(&items),
        items,
        per_hour: None,
        rationale,
        warnings: vec![],
    }
}

/// During-workout phase, branching on the carb rate:
/// - zero carbs: water only, electrolytes if sodium is targeted
/// - up to 30 g/h: a single isotonic drink carries everything
/// - above 30 g/h: gels plus separate water, electrolytes when both
///   sodium and fluid volumes are high
fn build_during_phase(
    profile: &AthleteProfile,
    targets: &FuelingTargets,
    skeleton: &ScheduleSkeleton,
) -> FuelingPhase {
    let mut items = Vec::new();
    let mut rationale = Vec::new();
    let mut warnings = Vec::new();

    let carbs = f64::from(targets.carbs_total_g);
    let fluids = f64::from(targets.fluids_total_ml);
    let sodium = f64::from(targets.sodium_total_mg);
    let slot_frequency = slot_frequency(skeleton);

    if targets.carbs_total_g == 0 {
        items.push(FuelingItem {
            name: "Water".into(),
            quantity: fluids,
            unit: "ml".into(),
            fluids_ml: Some(fluids),
            frequency: slot_frequency.clone(),
            ..Default::default()
        });
        if targets.sodium_total_mg > 0 {
            let count = (sodium / ELECTROLYTE_CAPSULE_SODIUM_MG).ceil().max(1.0);
            items.push(electrolyte_capsules(count, slot_frequency));
        }
        rationale.push("No carbohydrate needed at this duration and intensity".into());
    } else if targets.carbs_g_per_h <= 30.0 {
        items.push(FuelingItem {
            name: "Isotonic drink".into(),
            quantity: fluids,
            unit: "ml".into(),
            carbs_g: Some(carbs),
            fluids_ml: Some(fluids),
            sodium_mg: Some(sodium),
            frequency: slot_frequency,
            notes: Some("Single mixed bottle covers carbs, fluids and sodium".into()),
            ..Default::default()
        });
        rationale.push("Low carb rate: one isotonic drink delivers all targets".into());
    } else {
        let gels = (carbs / GEL_CARBS_G).ceil();
        items.push(FuelingItem {
            name: "Energy gel".into(),
            quantity: gels,
            unit: "gel".into(),
            carbs_g: Some(gels * GEL_CARBS_G),
            frequency: slot_frequency.clone(),
            notes: Some(format!("{GEL_CARBS_G:.0} g carbs per gel, spread across slots")),
            ..Default::default()
        });
        items.push(FuelingItem {
            name: "Water".into(),
            quantity: fluids,
            unit: "ml".into(),
            fluids_ml: Some(fluids),
            frequency: slot_frequency.clone(),
            ..Default::default()
        });
        if targets.sodium_total_mg > 500 && targets.fluids_total_ml > 1000 {
            let count = (sodium / ELECTROLYTE_CAPSULE_SODIUM_MG).ceil().max(1.0);
            items.push(electrolyte_capsules(count, slot_frequency));
        }
        rationale.push("Carb rate above drink concentration: gel-based delivery".into());
    }

    if targets.caffeine_mg_total > 0.0 {
        rationale.push(format!(
            "Caffeine target {:.0} mg: take half 30 min pre-start, remainder mid-session",
            targets.caffeine_mg_total
        ));
    }
    if profile.gi_sensitivity == GiSensitivity::High {
        warnings.push("High GI sensitivity: keep single doses small, sip rather than gulp".into());
    }

    FuelingPhase {
        timing: during_timing(skeleton),
        totals: FuelingPhase::sum_items(&items),
        items,
        per_hour: Some(PerHourRates {
            carbs_g: targets.carbs_g_per_h,
            fluids_ml: targets.fluids_ml_per_h,
            sodium_mg: targets.sodium_mg_per_h,
        }),
        rationale,
        warnings,
    }
}

/// Post-workout phase: weight-scaled recovery carbs and protein.
/// Sessions under an hour get a light snack instead of a meal.
fn build_post_phase(
    profile: &AthleteProfile,
    workout: &WorkoutInput,
    skeleton: &ScheduleSkeleton,
) -> FuelingPhase {
    let carb_factor = if workout.duration_min > 90 { 1.2 } else { 1.0 };
    let recovery_carbs = (profile.weight_kg * carb_factor).round();
    let recovery_protein = (profile.weight_kg * 0.3).round();

    let mut items = Vec::new();
    let mut rationale = vec![format!(
        "Recovery targets: {recovery_carbs:.0} g carbs, {recovery_protein:.0} g protein"
    )];

    if workout.duration_min >= 60 {
        if profile.gi_sensitivity == GiSensitivity::High {
            // Plain solids split across rice (carbs), chicken (protein)
            // and a banana
            let rice_carbs = (recovery_carbs - BANANA_CARBS_G).max(0.0);
            let rice_g = round_to_step(rice_carbs / 0.28, 10.0);
            let chicken_g = round_to_step(recovery_protein / 0.31, 10.0);
            items.push(FuelingItem {
                name: "White rice (cooked)".into(),
                quantity: rice_g,
                unit: "g".into(),
                carbs_g: Some(rice_carbs),
                ..Default::default()
            });
            items.push(FuelingItem {
                name: "Chicken breast".into(),
                quantity: chicken_g,
                unit: "g".into(),
                protein_g: Some(recovery_protein),
                fat_g: Some(4.0),
                ..Default::default()
            });
            items.push(FuelingItem {
                name: "Banana".into(),
                quantity: 1.0,
                unit: "piece".into(),
                carbs_g: Some(BANANA_CARBS_G),
                ..Default::default()
            });
            rationale.push("Plain solid recovery meal chosen for high GI sensitivity".into());
        } else {
            items.push(FuelingItem {
                name: "Greek yogurt with granola and berries".into(),
                quantity: 1.0,
                unit: "bowl".into(),
                carbs_g: Some(recovery_carbs),
                protein_g: Some(recovery_protein),
                fat_g: Some(8.0),
                ..Default::default()
            });
        }
    } else {
        // Short session: light snack replaces the full recovery meal
        items.push(FuelingItem {
            name: "Banana with peanut butter".into(),
            quantity: 1.0,
            unit: "serving".into(),
            carbs_g: Some(BANANA_CARBS_G + 7.0),
            protein_g: Some(8.0),
            fat_g: Some(16.0),
            ..Default::default()
        });
        rationale.push("Session under an hour: light snack instead of a full meal".into());
    }

    FuelingPhase {
        timing: format!("{} (within 40 min of finishing)", skeleton.post.time),
        totals: FuelingPhase::sum_items(&items),
        items,
        per_hour: None,
        rationale,
        warnings: vec![],
    }
}

fn electrolyte_capsules(count: f64, frequency: Option<String>) -> FuelingItem {
    FuelingItem {
        name: "Electrolyte capsule".into(),
        quantity: count,
        unit: "capsule".into(),
        sodium_mg: Some(count * ELECTROLYTE_CAPSULE_SODIUM_MG),
        frequency,
        notes: Some(format!(
            "{ELECTROLYTE_CAPSULE_SODIUM_MG:.0} mg sodium per capsule"
        )),
        ..Default::default()
    }
}

fn during_timing(skeleton: &ScheduleSkeleton) -> String {
    if skeleton.during.is_empty() {
        "During workout".into()
    } else {
        format!("{} fueling slots during the workout", skeleton.during.len())
    }
}

fn slot_frequency(skeleton: &ScheduleSkeleton) -> Option<String> {
    if skeleton.during.is_empty() {
        None
    } else {
        Some(format!("split across {} slots", skeleton.during.len()))
    }
}

/// Safety-check lines for the plan: one per fired cap, plus baseline
/// confirmations of the rates actually used
fn build_safety_checks(targets: &FuelingTargets) -> Vec<String> {
    let mut checks: Vec<String> = targets
        .caps_applied
        .iter()
        .map(|tag| format!("Safety cap applied: {}", tag.as_str()))
        .collect();
    checks.push(format!(
        "Carb delivery {:.0} g/h within GI tolerance",
        targets.carbs_g_per_h
    ));
    checks.push(format!(
        "Fluid delivery {:.0} ml/h at or under 1000 ml/h",
        targets.fluids_ml_per_h
    ));
    checks.push(format!(
        "Sodium delivery {:.0} mg/h at or under 1000 mg/h",
        targets.sodium_mg_per_h
    ));
    checks
}

/// Round to the nearest multiple of `step`, never below zero
fn round_to_step(value: f64, step: f64) -> f64 {
    ((value / step).round() * step).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::build_skeleton;
    use crate::targets::calculate_targets;
    use crate::{CaffeineUse, ExperienceLevel, Intensity, Sex, SweatRate};

    fn test_profile(gi: GiSensitivity) -> AthleteProfile {
        AthleteProfile {
            weight_kg: 70.0,
            age: 35,
            sex: Sex::Male,
            experience_level: ExperienceLevel::Intermediate,
            sweat_rate: SweatRate::Medium,
            gi_sensitivity: gi,
            caffeine_use: CaffeineUse::None,
            primary_goal: "endurance".into(),
            diet: None,
            allergies: vec![],
        }
    }

    fn test_workout(duration_min: u32, intensity: Intensity) -> WorkoutInput {
        WorkoutInput {
            sport: "cycling".into(),
            duration_min,
            intensity,
            start_time: None,
            temperature_c: None,
            humidity_pct: None,
        }
    }

    fn build_plan(profile: &AthleteProfile, workout: &WorkoutInput) -> FuelingPlan {
        let targets = calculate_targets(profile, workout);
        let skeleton = build_skeleton(profile, workout, &targets);
        assemble_fallback(profile, workout, &targets, &skeleton)
    }

    fn assert_totals_match_items(phase: &FuelingPhase) {
        let summed = FuelingPhase::sum_items(&phase.items);
        assert_eq!(phase.totals, summed);
    }

    #[test]
    fn test_all_phases_nonempty_across_domain() {
        for duration in [30, 45, 60, 75, 90, 120, 180] {
            for gi in [GiSensitivity::Low, GiSensitivity::Medium, GiSensitivity::High] {
                for intensity in [
                    Intensity::Low,
                    Intensity::Moderate,
                    Intensity::High,
                    Intensity::VeryHigh,
                ] {
                    let profile = test_profile(gi);
                    let plan = build_plan(&profile, &test_workout(duration, intensity));

                    if duration >= 60 {
                        let pre = plan.pre_workout.as_ref().expect("pre phase for >=60 min");
                        assert!(!pre.items.is_empty());
                        assert_totals_match_items(pre);
                    } else {
                        assert!(plan.pre_workout.is_none());
                    }
                    assert!(!plan.during_workout.items.is_empty());
                    assert!(!plan.post_workout.items.is_empty());
                    assert_totals_match_items(&plan.during_workout);
                    assert_totals_match_items(&plan.post_workout);
                }
            }
        }
    }

    #[test]
    fn test_low_rate_single_isotonic_drink_carries_targets() {
        // 60 min moderate = 30 g/h, the single-drink branch
        let profile = test_profile(GiSensitivity::Low);
        let workout = test_workout(60, Intensity::Moderate);
        let targets = calculate_targets(&profile, &workout);
        let plan = build_plan(&profile, &workout);

        assert_eq!(plan.during_workout.items.len(), 1);
        let drink = &plan.during_workout.items[0];
        assert_eq!(drink.name, "Isotonic drink");
        assert_eq!(drink.carbs_g, Some(f64::from(targets.carbs_total_g)));
        assert_eq!(drink.fluids_ml, Some(f64::from(targets.fluids_total_ml)));
        assert_eq!(drink.sodium_mg, Some(f64::from(targets.sodium_total_mg)));
    }

    #[test]
    fn test_gel_branch_whole_gel_count() {
        // 90 min high = 45 g/h, 70 g total -> ceil(70/25) = 3 gels
        let profile = test_profile(GiSensitivity::Low);
        let plan = build_plan(&profile, &test_workout(90, Intensity::High));

        let gels = plan
            .during_workout
            .items
            .iter()
            .find(|i| i.name == "Energy gel")
            .expect("gel item");
        assert_eq!(gels.quantity, 3.0);
        assert_eq!(gels.carbs_g, Some(75.0));

        // Separate water item sized to the fluid total
        let water = plan
            .during_workout
            .items
            .iter()
            .find(|i| i.name == "Water")
            .expect("water item");
        assert_eq!(water.fluids_ml, Some(980.0));
    }

    #[test]
    fn test_electrolytes_only_when_sodium_and_fluids_high() {
        let profile = test_profile(GiSensitivity::Low);

        // 90 min high: sodium 680 > 500 but fluids 980 <= 1000 -> no capsules
        let plan = build_plan(&profile, &test_workout(90, Intensity::High));
        assert!(!plan
            .during_workout
            .items
            .iter()
            .any(|i| i.name == "Electrolyte capsule"));

        // 150 min high: sodium 1130, fluids 1630 -> capsules present
        let plan = build_plan(&profile, &test_workout(150, Intensity::High));
        assert!(plan
            .during_workout
            .items
            .iter()
            .any(|i| i.name == "Electrolyte capsule"));
    }

    #[test]
    fn test_zero_carb_water_only_branch() {
        let profile = test_profile(GiSensitivity::Low);
        let plan = build_plan(&profile, &test_workout(45, Intensity::Low));

        assert_eq!(plan.during_workout.items[0].name, "Water");
        assert!(plan
            .during_workout
            .items
            .iter()
            .all(|i| i.carbs_g.is_none()));
        // Sodium target > 0 adds capsules
        assert!(plan
            .during_workout
            .items
            .iter()
            .any(|i| i.name == "Electrolyte capsule"));
    }

    #[test]
    fn test_pre_phase_gi_high_gets_solids() {
        let profile = test_profile(GiSensitivity::High);
        let plan = build_plan(&profile, &test_workout(90, Intensity::High));

        let pre = plan.pre_workout.expect("pre phase");
        assert_eq!(pre.items[0].name, "Rice cakes with honey");
        // Fixed water item always appended
        assert_eq!(pre.items.last().unwrap().name, "Water");
        assert_eq!(pre.items.last().unwrap().fluids_ml, Some(400.0));
    }

    #[test]
    fn test_pre_phase_isotonic_sized_to_prefuel_carbs() {
        let profile = test_profile(GiSensitivity::Low);
        let plan = build_plan(&profile, &test_workout(90, Intensity::High));

        // 15% of 70 g = 10.5 -> 11 g -> 183 ml -> 200 ml at 6 g/100 ml
        let pre = plan.pre_workout.expect("pre phase");
        let drink = &pre.items[0];
        assert_eq!(drink.name, "Isotonic drink");
        assert_eq!(drink.quantity, 200.0);
        assert_eq!(drink.carbs_g, Some(12.0));
    }

    #[test]
    fn test_post_phase_short_session_snack() {
        let profile = test_profile(GiSensitivity::Low);
        let plan = build_plan(&profile, &test_workout(45, Intensity::High));

        assert_eq!(plan.post_workout.items.len(), 1);
        assert_eq!(plan.post_workout.items[0].name, "Banana with peanut butter");
    }

    #[test]
    fn test_post_phase_long_session_carb_factor() {
        let profile = test_profile(GiSensitivity::Low);

        // > 90 min uses 1.2 g/kg: 70 * 1.2 = 84 g carbs in the bowl
        let plan = build_plan(&profile, &test_workout(120, Intensity::High));
        let bowl = &plan.post_workout.items[0];
        assert_eq!(bowl.carbs_g, Some(84.0));
        assert_eq!(bowl.protein_g, Some(21.0));
    }

    #[test]
    fn test_safety_checks_report_fired_caps() {
        let mut profile = test_profile(GiSensitivity::High);
        profile.sweat_rate = SweatRate::High;
        let mut workout = test_workout(120, Intensity::VeryHigh);
        workout.temperature_c = Some(33.0);

        let plan = build_plan(&profile, &workout);
        assert!(plan
            .safety_checks
            .iter()
            .any(|c| c.contains("GI_CARB_CAP_60g_per_h")));
        assert!(plan
            .safety_checks
            .iter()
            .any(|c| c.contains("HYDRATION_CAP_1000ml_per_h")));
    }

    #[test]
    fn test_plan_serializes_to_contract_shape() {
        let profile = test_profile(GiSensitivity::Medium);
        let plan = build_plan(&profile, &test_workout(100, Intensity::High));

        let json = serde_json::to_value(&plan).unwrap();
        assert!(json.get("during_workout").is_some());
        assert!(json.get("post_workout").is_some());
        assert!(json.get("summary").is_some());
        assert!(json.get("safety_checks").is_some());

        let parsed: FuelingPlan = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, plan);
    }
}
