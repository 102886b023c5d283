//! Recipe selection for meal-plan slots.
//!
//! Implements the selection pipeline:
//! 1. Filter by diet compatibility (keyword-based ingredient exclusion)
//! 2. Filter by allergen avoidance (case-insensitive substring match)
//! 3. Filter by usage cap (normalized title served fewer than `repeat_cap`
//!    times this horizon)
//! 4. Filter by category (category-less recipes are universal)
//! 5. Score survivors by L1 macro distance to the slot target; minimum
//!    wins, ties resolved by pool order (stable first match)
//!
//! When nothing survives, a fixed built-in pool keyed by meal type steps
//! in. Repeated titles get a " (Var N)" suffix so every served title is
//! distinctly renderable. The usage map is caller-owned and shared across
//! all selections within one planning horizon.

use crate::config::EngineConfig;
use crate::pool::fallback_recipes;
use crate::{
    AthleteProfile, DietType, Error, Macros, MealType, RecipeCandidate, RecipePool, Result,
    UsedTitles,
};

/// Ingredient keywords excluded for vegan athletes
const VEGAN_EXCLUDED: &[&str] = &[
    "chicken", "beef", "pork", "lamb", "turkey", "bacon", "ham", "fish", "salmon", "tuna",
    "shrimp", "anchovy", "egg", "milk", "cheese", "butter", "yogurt", "cream", "honey",
    "gelatin", "whey",
];

/// Ingredient keywords excluded for vegetarian athletes
const VEGETARIAN_EXCLUDED: &[&str] = &[
    "chicken", "beef", "pork", "lamb", "turkey", "bacon", "ham", "fish", "salmon", "tuna",
    "shrimp", "anchovy", "gelatin",
];

/// Ingredient keywords excluded for keto athletes
const KETO_EXCLUDED: &[&str] = &[
    "sugar", "bread", "rice", "pasta", "noodle", "potato", "flour", "oats", "banana", "honey",
    "granola",
];

/// Normalize a title for usage counting: lowercased, trimmed, internal
/// whitespace collapsed
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Select one recipe for a meal slot.
///
/// Never fails for a non-empty pool or a populated fallback entry;
/// [`Error::EmptyRecipePool`] is a configuration error (a meal type with
/// neither candidates nor fallback recipes).
pub fn select_recipe(
    meal_type: MealType,
    target: &Macros,
    used_titles: &mut UsedTitles,
    profile: &AthleteProfile,
    pool: &RecipePool,
    config: &EngineConfig,
) -> Result<RecipeCandidate> {
    let repeat_cap = config.selection.repeat_cap;

    let survivors: Vec<&RecipeCandidate> = pool
        .candidates
        .iter()
        .filter(|r| diet_compatible(profile.diet, r))
        .filter(|r| !contains_allergen(&profile.allergies, r))
        .filter(|r| usage_count(used_titles, &r.title) < repeat_cap)
        .filter(|r| r.category.map_or(true, |c| c == meal_type))
        .collect();

    let chosen = if let Some(best) = best_by_macro_distance(&survivors, target) {
        tracing::debug!(
            "Selected '{}' for {} from {} survivors",
            best.title,
            meal_type.as_str(),
            survivors.len()
        );
        best.clone()
    } else {
        select_from_fallback(meal_type, used_titles, repeat_cap)?
    };

    Ok(finalize(chosen, used_titles, repeat_cap))
}

/// Minimum L1 distance across (kcal, protein, carbs, fat); strict
/// less-than keeps the first match on ties
fn best_by_macro_distance<'a>(
    candidates: &[&'a RecipeCandidate],
    target: &Macros,
) -> Option<&'a RecipeCandidate> {
    let mut best: Option<(&RecipeCandidate, f64)> = None;
    for candidate in candidates {
        let distance = l1_distance(&candidate.macros, target);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }
    best.map(|(candidate, _)| candidate)
}

fn l1_distance(a: &Macros, b: &Macros) -> f64 {
    (a.kcal - b.kcal).abs()
        + (a.protein_g - b.protein_g).abs()
        + (a.carbs_g - b.carbs_g).abs()
        + (a.fat_g - b.fat_g).abs()
}

/// First fallback entry still under the usage cap; if every entry has
/// reached the cap, the first entry is reused and deduplication renames it
fn select_from_fallback(
    meal_type: MealType,
    used_titles: &UsedTitles,
    repeat_cap: u32,
) -> Result<RecipeCandidate> {
    let entries = fallback_recipes(meal_type)
        .ok_or_else(|| Error::EmptyRecipePool(meal_type.as_str().to_string()))?;

    let pick = entries
        .iter()
        .find(|r| usage_count(used_titles, &r.title) < repeat_cap)
        .or_else(|| entries.first())
        .ok_or_else(|| Error::EmptyRecipePool(meal_type.as_str().to_string()))?;

    tracing::debug!(
        "No catalog candidate survived for {}, using fallback '{}'",
        meal_type.as_str(),
        pick.title
    );
    Ok(pick.clone())
}

/// Apply deduplication and defaults, then record the served title in the
/// shared usage map
fn finalize(
    mut recipe: RecipeCandidate,
    used_titles: &mut UsedTitles,
    repeat_cap: u32,
) -> RecipeCandidate {
    if usage_count(used_titles, &recipe.title) >= repeat_cap {
        let base = recipe.title.clone();
        for n in 2.. {
            let variant = format!("{base} (Var {n})");
            if usage_count(used_titles, &variant) < repeat_cap {
                recipe.title = variant;
                break;
            }
        }
    }

    if recipe.steps.is_empty() {
        recipe.steps = vec![
            "Combine the ingredients.".into(),
            "Cook to preference and serve.".into(),
        ];
    }

    *used_titles.entry(normalize_title(&recipe.title)).or_insert(0) += 1;
    recipe
}

fn usage_count(used_titles: &UsedTitles, title: &str) -> u32 {
    used_titles
        .get(&normalize_title(title))
        .copied()
        .unwrap_or(0)
}

fn diet_compatible(diet: Option<DietType>, recipe: &RecipeCandidate) -> bool {
    let excluded: &[&str] = match diet {
        None | Some(DietType::Omnivore) => return true,
        Some(DietType::Vegan) => VEGAN_EXCLUDED,
        Some(DietType::Vegetarian) => VEGETARIAN_EXCLUDED,
        Some(DietType::Keto) => KETO_EXCLUDED,
    };

    !recipe.ingredients.iter().any(|ingredient| {
        let lower = ingredient.to_lowercase();
        excluded.iter().any(|keyword| lower.contains(keyword))
    })
}

fn contains_allergen(allergies: &[String], recipe: &RecipeCandidate) -> bool {
    recipe.ingredients.iter().any(|ingredient| {
        let lower = ingredient.to_lowercase();
        allergies
            .iter()
            .any(|allergen| lower.contains(&allergen.to_lowercase()))
    })
}
