//! Built-in fallback recipe pool.
//!
//! A fixed pool keyed by meal type, consulted when no catalog candidate
//! survives the selection filters. Every meal type key must be populated;
//! a missing key is a configuration error surfaced as
//! [`crate::Error::EmptyRecipePool`].

use crate::{Macros, MealType, RecipeCandidate};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached fallback pool - built once and reused across all selections
static FALLBACK_POOL: Lazy<HashMap<MealType, Vec<RecipeCandidate>>> =
    Lazy::new(build_fallback_pool);

/// Fallback recipes for a meal type, in fixed priority order
pub fn fallback_recipes(meal_type: MealType) -> Option<&'static [RecipeCandidate]> {
    FALLBACK_POOL.get(&meal_type).map(Vec::as_slice)
}

fn entry(
    title: &str,
    ingredients: &[&str],
    steps: &[&str],
    macros: Macros,
    category: MealType,
) -> RecipeCandidate {
    RecipeCandidate {
        title: title.into(),
        servings: 1,
        ingredients: ingredients.iter().map(|s| (*s).into()).collect(),
        steps: steps.iter().map(|s| (*s).into()).collect(),
        macros,
        category: Some(category),
        tags: vec!["fallback".into()],
    }
}

fn build_fallback_pool() -> HashMap<MealType, Vec<RecipeCandidate>> {
    let mut pool = HashMap::new();

    pool.insert(
        MealType::Breakfast,
        vec![
            entry(
                "Overnight oats with berries",
                &["rolled oats", "milk", "blueberries", "chia seeds"],
                &[
                    "Mix oats, milk and chia seeds in a jar and refrigerate overnight.",
                    "Top with berries before serving.",
                ],
                Macros {
                    kcal: 420.0,
                    protein_g: 16.0,
                    carbs_g: 62.0,
                    fat_g: 12.0,
                },
                MealType::Breakfast,
            ),
            entry(
                "Scrambled eggs on toast",
                &["eggs", "wholegrain bread", "butter", "chives"],
                &[
                    "Scramble the eggs in butter over low heat.",
                    "Serve on toasted bread with chives.",
                ],
                Macros {
                    kcal: 380.0,
                    protein_g: 22.0,
                    carbs_g: 28.0,
                    fat_g: 18.0,
                },
                MealType::Breakfast,
            ),
        ],
    );

    pool.insert(
        MealType::Lunch,
        vec![
            entry(
                "Chicken rice bowl",
                &["chicken breast", "white rice", "broccoli", "soy sauce"],
                &[
                    "Grill the chicken and steam the broccoli.",
                    "Serve over rice with a splash of soy sauce.",
                ],
                Macros {
                    kcal: 560.0,
                    protein_g: 42.0,
                    carbs_g: 65.0,
                    fat_g: 12.0,
                },
                MealType::Lunch,
            ),
            entry(
                "Lentil soup with bread",
                &["red lentils", "carrot", "onion", "vegetable stock", "bread"],
                &[
                    "Simmer lentils and vegetables in stock until soft.",
                    "Blend roughly and serve with bread.",
                ],
                Macros {
                    kcal: 480.0,
                    protein_g: 24.0,
                    carbs_g: 70.0,
                    fat_g: 9.0,
                },
                MealType::Lunch,
            ),
        ],
    );

    pool.insert(
        MealType::Dinner,
        vec![
            entry(
                "Salmon with roast potatoes",
                &["salmon fillet", "potatoes", "olive oil", "green beans"],
                &[
                    "Roast the potatoes until golden, add the salmon for the last 15 minutes.",
                    "Serve with steamed green beans.",
                ],
                Macros {
                    kcal: 620.0,
                    protein_g: 38.0,
                    carbs_g: 48.0,
                    fat_g: 28.0,
                },
                MealType::Dinner,
            ),
            entry(
                "Pasta with tomato sauce",
                &["pasta", "tomato passata", "garlic", "olive oil", "basil"],
                &[
                    "Cook the pasta; simmer passata with garlic and oil.",
                    "Combine and finish with basil.",
                ],
                Macros {
                    kcal: 580.0,
                    protein_g: 18.0,
                    carbs_g: 95.0,
                    fat_g: 14.0,
                },
                MealType::Dinner,
            ),
        ],
    );

    pool.insert(
        MealType::Snack,
        vec![
            entry(
                "Greek yogurt with honey",
                &["greek yogurt", "honey", "walnuts"],
                &[
                    "Spoon the yogurt into a bowl.",
                    "Drizzle with honey and scatter the walnuts.",
                ],
                Macros {
                    kcal: 260.0,
                    protein_g: 18.0,
                    carbs_g: 24.0,
                    fat_g: 10.0,
                },
                MealType::Snack,
            ),
            entry(
                "Banana and trail mix",
                &["banana", "almonds", "raisins", "dark chocolate"],
                &[
                    "Portion the trail mix.",
                    "Eat with the banana.",
                ],
                Macros {
                    kcal: 310.0,
                    protein_g: 7.0,
                    carbs_g: 45.0,
                    fat_g: 13.0,
                },
                MealType::Snack,
            ),
        ],
    );

    pool
}

/// Validate the fallback pool for consistency and completeness.
///
/// Returns a list of validation errors, or empty Vec if valid.
pub fn validate_fallback_pool() -> Vec<String> {
    let mut errors = Vec::new();

    for meal_type in [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ] {
        match fallback_recipes(meal_type) {
            None => errors.push(format!("No fallback entries for {}", meal_type.as_str())),
            Some(entries) if entries.is_empty() => {
                errors.push(format!("Empty fallback list for {}", meal_type.as_str()));
            }
            Some(entries) => {
                for recipe in entries {
                    if recipe.title.is_empty() {
                        errors.push(format!(
                            "Fallback recipe for {} has empty title",
                            meal_type.as_str()
                        ));
                    }
                    if recipe.ingredients.is_empty() {
                        errors.push(format!("'{}' has no ingredients", recipe.title));
                    }
                    if recipe.steps.is_empty() {
                        errors.push(format!("'{}' has no steps", recipe.title));
                    }
                    if recipe.macros.kcal <= 0.0 {
                        errors.push(format!("'{}' has non-positive kcal", recipe.title));
                    }
                    if recipe.category != Some(meal_type) {
                        errors.push(format!(
                            "'{}' filed under {} but categorized {:?}",
                            recipe.title,
                            meal_type.as_str(),
                            recipe.category
                        ));
                    }
                }
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_meal_type_populated() {
        for meal_type in [
            MealType::Breakfast,
            MealType::Lunch,
            MealType::Dinner,
            MealType::Snack,
        ] {
            let entries = fallback_recipes(meal_type).expect("fallback entries");
            assert!(entries.len() >= 2, "{} needs entries", meal_type.as_str());
        }
    }

    #[test]
    fn test_fallback_pool_validates() {
        let errors = validate_fallback_pool();
        assert!(errors.is_empty(), "Fallback pool errors: {:?}", errors);
    }

    #[test]
    fn test_fallback_titles_unique() {
        let mut titles = std::collections::HashSet::new();
        for meal_type in [
            MealType::Breakfast,
            MealType::Lunch,
            MealType::Dinner,
            MealType::Snack,
        ] {
            for recipe in fallback_recipes(meal_type).unwrap() {
                assert!(
                    titles.insert(recipe.title.clone()),
                    "Duplicate fallback title '{}'",
                    recipe.title
                );
            }
        }
    }
}
