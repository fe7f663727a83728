//! Normalization of raw external-API recipe payloads.
//!
//! The external API reports prices in minor currency units and summaries as
//! HTML. Normalization converts both exactly once, reconciles the id field,
//! and produces the canonical [`Recipe`] shape the rest of the crate works
//! with. Anything that is not an object, or carries no usable identity, yields
//! no recipe rather than an error.

use crate::types::{Ingredient, Nutrition, Recipe};
use scraper::Html;
use serde::Deserialize;
use serde_json::Value;

/// Raw external-API recipe shape: camelCase keys, every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawRecipe {
    id: Option<i64>,
    /// Alternate id field used by some endpoints.
    recipe_id: Option<i64>,
    title: Option<String>,
    summary: Option<String>,
    /// Minor currency units. Kept as a raw value so garbage normalizes to
    /// null instead of failing the whole payload.
    price_per_serving: Option<Value>,
    ready_in_minutes: Option<i32>,
    servings: Option<i32>,
    extended_ingredients: Vec<Ingredient>,
    nutrition: Option<Nutrition>,
    diets: Vec<String>,
    vegetarian: Option<bool>,
    vegan: Option<bool>,
    gluten_free: Option<bool>,
    dairy_free: Option<bool>,
    low_fodmap: Option<bool>,
    whole30: Option<bool>,
    ketogenic: Option<bool>,
    health_score: Option<f64>,
    aggregate_likes: Option<i64>,
}

/// Convert a raw external-API recipe payload to the canonical shape.
///
/// Returns `None` for non-object payloads and payloads without an id.
/// Already-canonical payloads (snake_case keys, prices in major units) pass
/// through untouched, so normalizing twice never re-divides the price.
pub fn normalize_recipe(raw: &Value) -> Option<Recipe> {
    let obj = raw.as_object()?;

    // The raw API shape always uses camelCase keys; snake_case keys mean the
    // payload is already canonical and must not be converted again.
    if obj.contains_key("price_per_serving") || obj.contains_key("extended_ingredients") {
        return serde_json::from_value(raw.clone()).ok();
    }

    let parsed: RawRecipe = match serde_json::from_value(raw.clone()) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "unparseable recipe payload, skipping");
            return None;
        }
    };
    let id = parsed.id.or(parsed.recipe_id)?;

    Some(Recipe {
        id,
        title: parsed.title.unwrap_or_default(),
        summary: parsed
            .summary
            .as_deref()
            .map(strip_html)
            .filter(|s| !s.is_empty()),
        price_per_serving: normalize_price(parsed.price_per_serving.as_ref()),
        ready_in_minutes: parsed.ready_in_minutes,
        servings: parsed.servings,
        extended_ingredients: parsed.extended_ingredients,
        nutrition: parsed.nutrition,
        diets: parsed.diets,
        vegetarian: parsed.vegetarian,
        vegan: parsed.vegan,
        gluten_free: parsed.gluten_free,
        dairy_free: parsed.dairy_free,
        low_fodmap: parsed.low_fodmap,
        whole30: parsed.whole30,
        ketogenic: parsed.ketogenic,
        health_score: parsed.health_score,
        aggregate_likes: parsed.aggregate_likes,
        price_breakdown: None,
        total_ingredient_cost: None,
        total_cost_per_serving: None,
    })
}

/// Minor units → major units, rounded to 2 decimal places.
/// Unparseable values normalize to null.
fn normalize_price(raw: Option<&Value>) -> Option<f64> {
    let minor = match raw? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    Some(minor.round() / 100.0)
}

/// Strip HTML tags from a summary, collapsing whitespace and trimming.
pub fn strip_html(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_converted_from_minor_units() {
        let recipe = normalize_recipe(&json!({
            "id": 1,
            "title": "Stew",
            "pricePerServing": 285.45
        }))
        .unwrap();
        assert_eq!(recipe.price_per_serving, Some(2.85));
    }

    #[test]
    fn test_price_from_numeric_string() {
        let recipe = normalize_recipe(&json!({"id": 1, "pricePerServing": "150"})).unwrap();
        assert_eq!(recipe.price_per_serving, Some(1.5));
    }

    #[test]
    fn test_invalid_price_normalizes_to_null() {
        let recipe = normalize_recipe(&json!({"id": 1, "pricePerServing": "cheap"})).unwrap();
        assert_eq!(recipe.price_per_serving, None);
        let recipe = normalize_recipe(&json!({"id": 1, "pricePerServing": [1, 2]})).unwrap();
        assert_eq!(recipe.price_per_serving, None);
    }

    #[test]
    fn test_id_falls_back_to_alternate_field() {
        let recipe = normalize_recipe(&json!({"recipeId": 42, "title": "Pie"})).unwrap();
        assert_eq!(recipe.id, 42);
    }

    #[test]
    fn test_non_object_yields_no_recipe() {
        assert!(normalize_recipe(&json!("recipe")).is_none());
        assert!(normalize_recipe(&json!(null)).is_none());
        assert!(normalize_recipe(&json!([{"id": 1}])).is_none());
    }

    #[test]
    fn test_missing_id_yields_no_recipe() {
        assert!(normalize_recipe(&json!({"title": "Mystery"})).is_none());
    }

    #[test]
    fn test_summary_html_stripped() {
        let recipe = normalize_recipe(&json!({
            "id": 1,
            "summary": "  <b>Rich</b> and\n<i>creamy</i>.  "
        }))
        .unwrap();
        assert_eq!(recipe.summary.as_deref(), Some("Rich and creamy."));
    }

    #[test]
    fn test_normalize_is_idempotent_on_canonical_input() {
        let once = normalize_recipe(&json!({
            "id": 9,
            "title": "Curry",
            "pricePerServing": 412.0,
            "readyInMinutes": 30
        }))
        .unwrap();
        let canonical = serde_json::to_value(&once).unwrap();
        let twice = normalize_recipe(&canonical).unwrap();
        assert_eq!(twice.price_per_serving, Some(4.12));
        assert_eq!(twice.ready_in_minutes, Some(30));
        assert_eq!(twice.title, "Curry");
    }

    #[test]
    fn test_ingredients_carried_through() {
        let recipe = normalize_recipe(&json!({
            "id": 3,
            "extendedIngredients": [
                {"id": 10, "name": "onion", "amount": 2.0, "unit": "", "aisle": "Produce"}
            ]
        }))
        .unwrap();
        assert_eq!(recipe.extended_ingredients.len(), 1);
        assert_eq!(
            recipe.extended_ingredients[0].name.as_deref(),
            Some("onion")
        );
    }

    #[test]
    fn test_strip_html_collapses_whitespace() {
        assert_eq!(strip_html("a   b\n\nc"), "a b c");
        assert_eq!(strip_html("<p>plain</p>"), "plain");
        assert_eq!(strip_html(""), "");
    }
}
