//! Search filter parsing and the pure filter engine.
//!
//! Raw request parameters are loosely shaped (numbers may arrive as strings,
//! lists as comma-separated strings). They are validated and converted exactly
//! once, here, into strongly-shaped [`SearchFilters`]; everything downstream
//! works with the typed form.

use crate::types::Recipe;
use serde::Deserialize;
use serde_json::Value;

/// Raw, loosely-typed search parameters as they arrive from a request body or
/// query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawSearchParams {
    pub number: Option<Value>,
    pub query: Option<String>,
    pub diet: Option<String>,
    #[serde(alias = "max_ready_time")]
    pub max_ready_time: Option<Value>,
    #[serde(alias = "min_calories")]
    pub min_calories: Option<Value>,
    #[serde(alias = "max_calories")]
    pub max_calories: Option<Value>,
    #[serde(alias = "min_price")]
    pub min_price: Option<Value>,
    #[serde(alias = "max_price")]
    pub max_price: Option<Value>,
    /// Comma-separated string or array of strings.
    pub intolerances: Option<Value>,
    /// Comma-separated string or array of strings (ingredient search only).
    pub ingredients: Option<Value>,
    pub ranking: Option<Value>,
    #[serde(alias = "ignore_pantry")]
    pub ignore_pantry: Option<Value>,
}

/// Validated search filters for the free-text/filter search path.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    /// Requested result count, clamped to 1..=100.
    pub number: u32,
    pub query: Option<String>,
    /// Normalized diet label: lowercase, separators collapsed to spaces.
    pub diet: Option<String>,
    pub max_ready_time: Option<i32>,
    pub min_calories: Option<f64>,
    pub max_calories: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    /// Lowercased intolerance names.
    pub intolerances: Vec<String>,
}

impl SearchFilters {
    pub fn from_raw(raw: &RawSearchParams) -> Self {
        let number = number_value(raw.number.as_ref())
            .map(|n| (n as i64).clamp(1, 100) as u32)
            .unwrap_or(10);

        let (min_calories, max_calories) = ordered_bounds(
            number_value(raw.min_calories.as_ref()),
            number_value(raw.max_calories.as_ref()),
        );
        let (min_price, max_price) = ordered_bounds(
            number_value(raw.min_price.as_ref()),
            number_value(raw.max_price.as_ref()),
        );

        SearchFilters {
            number,
            query: raw
                .query
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(String::from),
            diet: raw.diet.as_deref().and_then(normalize_diet),
            max_ready_time: number_value(raw.max_ready_time.as_ref()).map(|n| n as i32),
            min_calories,
            max_calories,
            min_price,
            max_price,
            intolerances: string_list(raw.intolerances.as_ref()),
        }
    }
}

/// Validated filters for the ingredient-based search path.
#[derive(Debug, Clone, Default)]
pub struct IngredientSearchFilters {
    pub base: SearchFilters,
    /// Lowercased ingredient names.
    pub ingredients: Vec<String>,
    /// External API ranking mode (1 = maximize used ingredients).
    pub ranking: i32,
    pub ignore_pantry: bool,
}

impl IngredientSearchFilters {
    pub fn from_raw(raw: &RawSearchParams) -> Self {
        IngredientSearchFilters {
            base: SearchFilters::from_raw(raw),
            ingredients: string_list(raw.ingredients.as_ref()),
            ranking: number_value(raw.ranking.as_ref()).map(|n| n as i32).unwrap_or(1),
            ignore_pantry: bool_value(raw.ignore_pantry.as_ref()).unwrap_or(true),
        }
    }
}

/// Lowercase a diet label and collapse separators to single spaces.
/// "none" and empty strings mean no diet constraint.
fn normalize_diet(raw: &str) -> Option<String> {
    let label = raw
        .to_lowercase()
        .replace(['-', '_', ','], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if label.is_empty() || label == "none" {
        None
    } else {
        Some(label)
    }
}

/// Swap inverted min/max bounds.
fn ordered_bounds(min: Option<f64>, max: Option<f64>) -> (Option<f64>, Option<f64>) {
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => (Some(hi), Some(lo)),
        other => other,
    }
}

/// Numeric value from a loosely-typed field: numbers or numeric strings.
fn number_value(raw: Option<&Value>) -> Option<f64> {
    match raw? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bool_value(raw: Option<&Value>) -> Option<bool> {
    match raw? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Lowercased list from either an array of strings or a comma-separated
/// string.
fn string_list(raw: Option<&Value>) -> Vec<String> {
    let items: Vec<String> = match raw {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(|v| v.as_str())
            .map(String::from)
            .collect(),
        Some(Value::String(s)) => s.split(',').map(String::from).collect(),
        _ => return Vec::new(),
    };
    items
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Keep only recipes matching every constraint in `filters`.
pub fn apply_filters(mut recipes: Vec<Recipe>, filters: &SearchFilters) -> Vec<Recipe> {
    recipes.retain(|r| matches_filters(r, filters));
    recipes
}

/// True when the recipe passes all of the diet, intolerance, ready-time,
/// price, and calorie constraints.
pub fn matches_filters(recipe: &Recipe, filters: &SearchFilters) -> bool {
    if let Some(diet) = &filters.diet {
        if !matches_diet(recipe, diet) {
            return false;
        }
    }
    if !filters
        .intolerances
        .iter()
        .all(|i| passes_intolerance(recipe, i))
    {
        return false;
    }
    if let Some(max) = filters.max_ready_time {
        match recipe.ready_in_minutes {
            Some(t) if t <= max => {}
            _ => return false,
        }
    }
    if filters.min_price.is_some() || filters.max_price.is_some() {
        let Some(price) = recipe.price_per_serving else {
            return false;
        };
        if filters.min_price.is_some_and(|lo| price < lo)
            || filters.max_price.is_some_and(|hi| price > hi)
        {
            return false;
        }
    }
    if filters.min_calories.is_some() || filters.max_calories.is_some() {
        let Some(calories) = recipe.calories() else {
            return false;
        };
        if filters.min_calories.is_some_and(|lo| calories < lo)
            || filters.max_calories.is_some_and(|hi| calories > hi)
        {
            return false;
        }
    }
    true
}

fn has_diet_label(recipe: &Recipe, label: &str) -> bool {
    recipe.diets.iter().any(|d| d.to_lowercase() == label)
}

/// Diet constraint: direct diet-label containment first, then the fixed
/// diet→flag mapping. Unrecognized diet strings fall back to containment
/// alone.
fn matches_diet(recipe: &Recipe, diet: &str) -> bool {
    if has_diet_label(recipe, diet) {
        return true;
    }
    match diet {
        "vegetarian" => recipe.vegetarian == Some(true),
        "vegan" => recipe.vegan == Some(true),
        "gluten free" => recipe.gluten_free == Some(true),
        "dairy free" => recipe.dairy_free == Some(true),
        "low fodmap" => recipe.low_fodmap == Some(true),
        "whole30" | "whole 30" => recipe.whole30 == Some(true) || has_diet_label(recipe, "whole30"),
        "paleo" => has_diet_label(recipe, "paleolithic"),
        "primal" => has_diet_label(recipe, "primal"),
        "ketogenic" => recipe.ketogenic == Some(true),
        _ => false,
    }
}

/// Intolerance constraint. When the recipe exposes a matching free-flag that
/// flag governs. Without one, missing data never disqualifies: the recipe
/// passes whether or not it carries a "<intolerance> free" diet label, so the
/// check is advisory unless the API supplies explicit flags. Kept from the
/// original behavior.
fn passes_intolerance(recipe: &Recipe, intolerance: &str) -> bool {
    let flag = match intolerance {
        "gluten" => recipe.gluten_free,
        "dairy" => recipe.dairy_free,
        _ => None,
    };
    flag.unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(params: Value) -> RawSearchParams {
        serde_json::from_value(params).unwrap()
    }

    fn recipe(fields: Value) -> Recipe {
        let mut base = json!({"id": 1, "title": "Test"});
        base.as_object_mut()
            .unwrap()
            .extend(fields.as_object().unwrap().clone());
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn test_number_clamped_and_defaulted() {
        assert_eq!(SearchFilters::from_raw(&raw(json!({}))).number, 10);
        assert_eq!(
            SearchFilters::from_raw(&raw(json!({"number": 500}))).number,
            100
        );
        assert_eq!(
            SearchFilters::from_raw(&raw(json!({"number": "0"}))).number,
            1
        );
        assert_eq!(
            SearchFilters::from_raw(&raw(json!({"number": "25"}))).number,
            25
        );
    }

    #[test]
    fn test_diet_normalization() {
        let filters = SearchFilters::from_raw(&raw(json!({"diet": "Gluten-Free"})));
        assert_eq!(filters.diet.as_deref(), Some("gluten free"));
        let filters = SearchFilters::from_raw(&raw(json!({"diet": "none"})));
        assert_eq!(filters.diet, None);
        let filters = SearchFilters::from_raw(&raw(json!({"diet": "LOW_FODMAP"})));
        assert_eq!(filters.diet.as_deref(), Some("low fodmap"));
    }

    #[test]
    fn test_inverted_bounds_swapped() {
        let filters =
            SearchFilters::from_raw(&raw(json!({"minPrice": 20, "maxPrice": 5})));
        assert_eq!(filters.min_price, Some(5.0));
        assert_eq!(filters.max_price, Some(20.0));
        let filters =
            SearchFilters::from_raw(&raw(json!({"minCalories": "800", "maxCalories": "200"})));
        assert_eq!(filters.min_calories, Some(200.0));
        assert_eq!(filters.max_calories, Some(800.0));
    }

    #[test]
    fn test_intolerances_from_string_or_array() {
        let filters =
            SearchFilters::from_raw(&raw(json!({"intolerances": "Gluten, Dairy ,"})));
        assert_eq!(filters.intolerances, vec!["gluten", "dairy"]);
        let filters =
            SearchFilters::from_raw(&raw(json!({"intolerances": ["Peanut", " Soy "]})));
        assert_eq!(filters.intolerances, vec!["peanut", "soy"]);
    }

    #[test]
    fn test_ingredient_variant_defaults() {
        let filters = IngredientSearchFilters::from_raw(&raw(json!({
            "ingredients": "Chicken,rice"
        })));
        assert_eq!(filters.ingredients, vec!["chicken", "rice"]);
        assert_eq!(filters.ranking, 1);
        assert!(filters.ignore_pantry);
        let filters = IngredientSearchFilters::from_raw(&raw(json!({
            "ignorePantry": "false",
            "ranking": 2
        })));
        assert!(!filters.ignore_pantry);
        assert_eq!(filters.ranking, 2);
    }

    #[test]
    fn test_diet_flag_passes_without_label() {
        let r = recipe(json!({"vegetarian": true, "diets": []}));
        let filters = SearchFilters {
            diet: Some("vegetarian".to_string()),
            ..Default::default()
        };
        assert!(matches_filters(&r, &filters));

        let r = recipe(json!({"vegetarian": false, "diets": []}));
        assert!(!matches_filters(&r, &filters));
    }

    #[test]
    fn test_diet_label_containment() {
        let r = recipe(json!({"diets": ["Paleolithic"]}));
        let filters = SearchFilters {
            diet: Some("paleo".to_string()),
            ..Default::default()
        };
        assert!(matches_filters(&r, &filters));
    }

    #[test]
    fn test_unrecognized_diet_falls_back_to_labels() {
        let filters = SearchFilters {
            diet: Some("pescetarian".to_string()),
            ..Default::default()
        };
        assert!(matches_filters(
            &recipe(json!({"diets": ["pescetarian"]})),
            &filters
        ));
        assert!(!matches_filters(&recipe(json!({"diets": []})), &filters));
    }

    #[test]
    fn test_intolerance_flag_governs() {
        let filters = SearchFilters {
            intolerances: vec!["gluten".to_string()],
            ..Default::default()
        };
        assert!(!matches_filters(
            &recipe(json!({"gluten_free": false})),
            &filters
        ));
        assert!(matches_filters(
            &recipe(json!({"gluten_free": true})),
            &filters
        ));
    }

    #[test]
    fn test_intolerance_open_world_passes_without_metadata() {
        let filters = SearchFilters {
            intolerances: vec!["peanut".to_string()],
            ..Default::default()
        };
        assert!(matches_filters(&recipe(json!({})), &filters));
        assert!(matches_filters(
            &recipe(json!({"diets": ["peanut free"]})),
            &filters
        ));
    }

    #[test]
    fn test_ready_time_bound() {
        let filters = SearchFilters {
            max_ready_time: Some(30),
            ..Default::default()
        };
        assert!(matches_filters(
            &recipe(json!({"ready_in_minutes": 25})),
            &filters
        ));
        assert!(!matches_filters(
            &recipe(json!({"ready_in_minutes": 45})),
            &filters
        ));
        // Missing ready time excludes whenever a max is set.
        assert!(!matches_filters(&recipe(json!({})), &filters));
    }

    #[test]
    fn test_price_and_calorie_bounds_exclude_missing() {
        let filters = SearchFilters {
            min_price: Some(1.0),
            ..Default::default()
        };
        assert!(!matches_filters(&recipe(json!({})), &filters));
        assert!(matches_filters(
            &recipe(json!({"price_per_serving": 2.0})),
            &filters
        ));

        let filters = SearchFilters {
            max_calories: Some(500.0),
            ..Default::default()
        };
        assert!(!matches_filters(&recipe(json!({})), &filters));
        let r = recipe(json!({
            "nutrition": {"nutrients": [{"name": "Calories", "amount": 300.0}]}
        }));
        assert!(matches_filters(&r, &filters));
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let recipes = vec![
            recipe(json!({"ready_in_minutes": 10})),
            recipe(json!({"ready_in_minutes": 90})),
            recipe(json!({})),
        ];
        let filters = SearchFilters {
            max_ready_time: Some(30),
            ..Default::default()
        };
        let once = apply_filters(recipes, &filters);
        let twice = apply_filters(once.clone(), &filters);
        assert_eq!(once.len(), 1);
        assert_eq!(twice.len(), once.len());
    }
}
