//! Integration tests for the full planning pipeline.
//!
//! These tests drive the library the way a server-side caller would:
//! targets -> skeleton -> fallback plan -> optional enhancement, and a
//! week of recipe selections sharing one usage map.

use fueling_core::{
    assemble_fallback, build_skeleton, calculate_targets, classify_day, daily_macro_targets,
    enhance_or_fallback, meal_slot_target, normalize_title, select_recipe, AthleteProfile,
    CaffeineUse, DietType, EngineConfig, EnhancementRequest, Error, ExperienceLevel,
    ExternalEnhancer, FuelingPlan, GiSensitivity, Intensity, MealType, RecipePool, Result, Sex,
    SweatRate, UsedTitles, WorkoutInput,
};

fn athlete() -> AthleteProfile {
    AthleteProfile {
        weight_kg: 68.0,
        age: 29,
        sex: Sex::Female,
        experience_level: ExperienceLevel::Advanced,
        sweat_rate: SweatRate::High,
        gi_sensitivity: GiSensitivity::Medium,
        caffeine_use: CaffeineUse::Some,
        primary_goal: "race_performance".into(),
        diet: Some(DietType::Omnivore),
        allergies: vec!["peanut".into()],
    }
}

fn long_ride() -> WorkoutInput {
    WorkoutInput {
        sport: "cycling".into(),
        duration_min: 150,
        intensity: Intensity::High,
        start_time: None,
        temperature_c: Some(28.0),
        humidity_pct: Some(60.0),
    }
}

fn build_fallback(profile: &AthleteProfile, workout: &WorkoutInput) -> FuelingPlan {
    let targets = calculate_targets(profile, workout);
    let skeleton = build_skeleton(profile, workout, &targets);
    assemble_fallback(profile, workout, &targets, &skeleton)
}

#[test]
fn full_pipeline_produces_schema_valid_plan() {
    let profile = athlete();
    let workout = long_ride();

    let targets = calculate_targets(&profile, &workout);
    let skeleton = build_skeleton(&profile, &workout, &targets);
    let plan = assemble_fallback(&profile, &workout, &targets, &skeleton);

    // The plan round-trips through its JSON contract
    let json = serde_json::to_string(&plan).expect("serialize");
    let parsed: FuelingPlan = serde_json::from_str(&json).expect("parse");
    assert_eq!(parsed, plan);

    // Timing skeleton is embedded unchanged
    assert_eq!(plan.schedule, skeleton);

    // Summary echoes the targets
    assert_eq!(plan.summary.carbs_total_g, targets.carbs_total_g);
    assert_eq!(plan.summary.during_event_count, skeleton.during.len());
}

#[test]
fn repeated_runs_are_deterministic() {
    let profile = athlete();
    let workout = long_ride();

    let first = build_fallback(&profile, &workout);
    let second = build_fallback(&profile, &workout);
    assert_eq!(first, second);
}

struct RejectingEnhancer;

impl ExternalEnhancer for RejectingEnhancer {
    fn enhance(&self, _request: &EnhancementRequest<'_>) -> Result<serde_json::Value> {
        Err(Error::Other("timeout".into()))
    }
}

struct TamperingEnhancer;

impl ExternalEnhancer for TamperingEnhancer {
    /// Returns a parseable plan that moves the post-event 10 minutes
    fn enhance(&self, request: &EnhancementRequest<'_>) -> Result<serde_json::Value> {
        let profile = athlete();
        let workout = long_ride();
        let fallback = assemble_fallback(&profile, &workout, request.targets, request.skeleton);
        let mut tampered = fallback;
        tampered.schedule.post.time = "T+200min".into();
        Ok(serde_json::to_value(&tampered)?)
    }
}

#[test]
fn enhancement_failures_always_yield_the_fallback() {
    let profile = athlete();
    let workout = long_ride();
    let targets = calculate_targets(&profile, &workout);
    let skeleton = build_skeleton(&profile, &workout, &targets);
    let fallback = assemble_fallback(&profile, &workout, &targets, &skeleton);
    let config = EngineConfig::default();

    let plan = enhance_or_fallback(
        &RejectingEnhancer,
        &profile,
        &targets,
        &skeleton,
        None,
        &config,
        fallback.clone(),
    );
    assert_eq!(plan, fallback);

    // A tampered skeleton is rejected even though the payload parses
    let plan = enhance_or_fallback(
        &TamperingEnhancer,
        &profile,
        &targets,
        &skeleton,
        None,
        &config,
        fallback.clone(),
    );
    assert_eq!(plan, fallback);
}

#[test]
fn week_of_selections_never_serves_a_title_three_times() {
    let profile = athlete();
    let config = EngineConfig::default();
    let pool = RecipePool { candidates: vec![] };
    let mut used = UsedTitles::new();

    let day_type = classify_day(Some(1.5));
    let daily = daily_macro_targets(profile.weight_kg, day_type);

    let mut served: Vec<String> = Vec::new();
    for _day in 0..7 {
        for meal in [MealType::Breakfast, MealType::Lunch, MealType::Dinner] {
            let target = meal_slot_target(&daily, meal);
            let recipe = select_recipe(meal, &target, &mut used, &profile, &pool, &config)
                .expect("fallback pool always yields a recipe");
            served.push(recipe.title);
        }
    }

    // No normalized title appears more than twice across the horizon
    let mut counts = std::collections::HashMap::new();
    for title in &served {
        *counts.entry(normalize_title(title)).or_insert(0u32) += 1;
    }
    for (title, count) in counts {
        assert!(count <= 2, "'{}' served {} times", title, count);
    }
}

#[test]
fn allergen_and_diet_filters_hold_across_the_pipeline() {
    let mut profile = athlete();
    profile.diet = Some(DietType::Vegetarian);
    let config = EngineConfig::default();

    let pool = RecipePool {
        candidates: vec![fueling_core::RecipeCandidate {
            title: "Peanut chicken stir fry".into(),
            servings: 1,
            ingredients: vec!["chicken".into(), "peanut sauce".into()],
            steps: vec![],
            macros: fueling_core::Macros {
                kcal: 500.0,
                protein_g: 30.0,
                carbs_g: 40.0,
                fat_g: 20.0,
            },
            category: Some(MealType::Dinner),
            tags: vec![],
        }],
    };

    let mut used = UsedTitles::new();
    let daily = daily_macro_targets(profile.weight_kg, classify_day(Some(2.5)));
    let target = meal_slot_target(&daily, MealType::Dinner);

    let recipe = select_recipe(
        MealType::Dinner,
        &target,
        &mut used,
        &profile,
        &pool,
        &config,
    )
    .expect("selection");

    // The only catalog recipe violates both filters; a fallback entry is
    // served instead
    assert_ne!(recipe.title, "Peanut chicken stir fry");
}
