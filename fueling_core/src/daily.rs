//! Daily macro targets for meal planning.
//!
//! Classifies training days by planned volume and derives whole-day
//! kcal/protein/carb/fat targets from body weight, then splits them
//! across meal slots. The per-meal [`Macros`] feed the recipe selector.
//!
//! These daily targets are a separate concern from the intra-workout
//! fueling table in [`crate::targets`]; that table alone governs
//! consumption during exercise.

use crate::{Macros, MealType};
use serde::{Deserialize, Serialize};

/// Training-day classification by planned volume
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    Rest,
    Easy,
    Moderate,
    Hard,
}

/// Classify a day from its planned training hours
pub fn classify_day(planned_hours: Option<f64>) -> DayType {
    match planned_hours {
        None => DayType::Rest,
        Some(h) if h == 0.0 => DayType::Rest,
        Some(h) if h < 1.0 => DayType::Easy,
        Some(h) if h < 2.0 => DayType::Moderate,
        Some(_) => DayType::Hard,
    }
}

/// Whole-day macro targets from body weight and day type.
///
/// Protein is fixed at 1.6 g/kg; kcal and carbs scale with the day type;
/// fat takes the remaining calories at 9 kcal/g, floored at zero. All
/// values rounded to whole units.
pub fn daily_macro_targets(weight_kg: f64, day_type: DayType) -> Macros {
    let protein_g = 1.6 * weight_kg;

    let (kcal, carbs_g) = match day_type {
        DayType::Rest => (30.0 * weight_kg, 3.0 * weight_kg),
        DayType::Easy => (30.0 * weight_kg, 4.0 * weight_kg),
        DayType::Moderate => (30.0 * weight_kg + 300.0, 5.0 * weight_kg),
        DayType::Hard => (30.0 * weight_kg + 600.0, 7.0 * weight_kg),
    };

    let fat_g = ((kcal - (protein_g * 4.0 + carbs_g * 4.0)) / 9.0).max(0.0);

    Macros {
        kcal: kcal.round(),
        protein_g: protein_g.round(),
        carbs_g: carbs_g.round(),
        fat_g: fat_g.round(),
    }
}

/// Share of the daily macros assigned to each meal slot
fn meal_share(meal_type: MealType) -> f64 {
    match meal_type {
        MealType::Breakfast => 0.25,
        MealType::Lunch => 0.35,
        MealType::Dinner => 0.30,
        MealType::Snack => 0.10,
    }
}

/// Per-slot macro target: the daily targets scaled by the slot share,
/// rounded to whole units
pub fn meal_slot_target(daily: &Macros, meal_type: MealType) -> Macros {
    let share = meal_share(meal_type);
    Macros {
        kcal: (daily.kcal * share).round(),
        protein_g: (daily.protein_g * share).round(),
        carbs_g: (daily.carbs_g * share).round(),
        fat_g: (daily.fat_g * share).round(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_day_thresholds() {
        assert_eq!(classify_day(None), DayType::Rest);
        assert_eq!(classify_day(Some(0.0)), DayType::Rest);
        assert_eq!(classify_day(Some(0.75)), DayType::Easy);
        assert_eq!(classify_day(Some(1.0)), DayType::Moderate);
        assert_eq!(classify_day(Some(1.9)), DayType::Moderate);
        assert_eq!(classify_day(Some(2.0)), DayType::Hard);
        assert_eq!(classify_day(Some(4.5)), DayType::Hard);
    }

    #[test]
    fn test_daily_targets_70kg_hard_day() {
        let macros = daily_macro_targets(70.0, DayType::Hard);
        assert_eq!(macros.kcal, 2700.0); // 30*70 + 600
        assert_eq!(macros.protein_g, 112.0); // 1.6*70
        assert_eq!(macros.carbs_g, 490.0); // 7*70
        // (2700 - (112*4 + 490*4)) / 9 = 32.4 -> 32
        assert_eq!(macros.fat_g, 32.0);
    }

    #[test]
    fn test_fat_floor_at_zero() {
        // Heavy athlete, hard day: per-kg carbs + protein exceed the
        // kcal budget; fat must floor at zero, never go negative
        let macros = daily_macro_targets(150.0, DayType::Hard);
        assert_eq!(macros.fat_g, 0.0);
    }

    #[test]
    fn test_meal_shares_cover_the_day() {
        let total: f64 = [
            MealType::Breakfast,
            MealType::Lunch,
            MealType::Dinner,
            MealType::Snack,
        ]
        .iter()
        .map(|m| meal_share(*m))
        .sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_meal_slot_target_scaling() {
        let daily = daily_macro_targets(70.0, DayType::Moderate);
        let lunch = meal_slot_target(&daily, MealType::Lunch);
        assert_eq!(lunch.kcal, (daily.kcal * 0.35).round());
        assert_eq!(lunch.protein_g, (daily.protein_g * 0.35).round());
    }
}
