//! Ingredient cost enrichment.
//!
//! Merges the external price breakdown into a recipe's ingredient list.
//! Enrichment never fails the caller: a fetch failure returns the recipe
//! unmodified, and a recipe that already carries cost data is returned as-is
//! without an external call.

use crate::service::RecipeService;
use crate::types::{EstimatedCost, Recipe};
use serde_json::Value;
use std::collections::HashMap;

impl RecipeService {
    /// Ensure the recipe carries per-ingredient estimated costs, fetching the
    /// price breakdown when missing. The enriched result is persisted.
    pub async fn ensure_cost_data(&self, recipe: Recipe) -> Recipe {
        if recipe.has_cost_data() {
            return recipe;
        }

        let breakdown = match self.api.price_breakdown(recipe.id).await {
            Ok(breakdown) => breakdown,
            Err(e) => {
                tracing::warn!(
                    external_id = recipe.id,
                    error = %e,
                    "price breakdown fetch failed, returning recipe without cost data"
                );
                return recipe;
            }
        };

        let enriched = merge_price_breakdown(recipe, &breakdown);
        self.store.upsert(&enriched).await;
        enriched
    }
}

/// Merge a raw price-breakdown payload into a recipe, producing a new value.
///
/// Breakdown ingredients are keyed by lowercased-trimmed name; recipe
/// ingredients look up by `name` first, then `original`. The raw payload is
/// always attached as `price_breakdown`.
pub(crate) fn merge_price_breakdown(mut recipe: Recipe, breakdown: &Value) -> Recipe {
    let mut costs: HashMap<String, EstimatedCost> = HashMap::new();
    if let Some(entries) = breakdown.get("ingredients").and_then(Value::as_array) {
        for entry in entries {
            let Some(name) = entry.get("name").and_then(Value::as_str) else {
                continue;
            };
            let Some(price) = entry.get("price").and_then(Value::as_f64) else {
                continue;
            };
            costs.insert(
                name.trim().to_lowercase(),
                EstimatedCost {
                    value: price,
                    unit: Some(
                        entry
                            .get("unit")
                            .and_then(Value::as_str)
                            .unwrap_or("cents")
                            .to_string(),
                    ),
                    amount: entry.get("amount").and_then(Value::as_f64),
                    image: entry
                        .get("image")
                        .and_then(Value::as_str)
                        .map(String::from),
                },
            );
        }
    }

    for ingredient in &mut recipe.extended_ingredients {
        let by_name = ingredient
            .name
            .as_deref()
            .and_then(|n| costs.get(&n.trim().to_lowercase()));
        let by_original = ingredient
            .original
            .as_deref()
            .and_then(|o| costs.get(&o.trim().to_lowercase()));
        if let Some(cost) = by_name.or(by_original) {
            ingredient.estimated_cost = Some(cost.clone());
        }
    }

    recipe.total_ingredient_cost = breakdown.get("totalCost").and_then(Value::as_f64);
    recipe.total_cost_per_serving = breakdown.get("totalCostPerServing").and_then(Value::as_f64);
    recipe.price_breakdown = Some(breakdown.clone());
    recipe
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recipe_with_ingredients() -> Recipe {
        serde_json::from_value(json!({
            "id": 5,
            "title": "Salad",
            "extended_ingredients": [
                {"name": "Tomato", "original": "2 ripe tomatoes"},
                {"name": null, "original": "Olive Oil"},
                {"name": "feta", "original": "100g feta"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_merge_matches_by_name_then_original() {
        let breakdown = json!({
            "ingredients": [
                {"name": "tomato", "price": 120.0, "amount": 2.0},
                {"name": "olive oil", "price": 35.5}
            ],
            "totalCost": 155.5,
            "totalCostPerServing": 77.75
        });
        let enriched = merge_price_breakdown(recipe_with_ingredients(), &breakdown);

        let costs: Vec<Option<f64>> = enriched
            .extended_ingredients
            .iter()
            .map(|i| i.estimated_cost.as_ref().map(|c| c.value))
            .collect();
        assert_eq!(costs, vec![Some(120.0), Some(35.5), None]);
        assert_eq!(enriched.total_ingredient_cost, Some(155.5));
        assert_eq!(enriched.total_cost_per_serving, Some(77.75));
        assert!(enriched.price_breakdown.is_some());
    }

    #[test]
    fn test_merge_without_ingredient_list_still_attaches_raw_breakdown() {
        let breakdown = json!({"totalCost": 10.0});
        let enriched = merge_price_breakdown(recipe_with_ingredients(), &breakdown);
        assert!(enriched
            .extended_ingredients
            .iter()
            .all(|i| i.estimated_cost.is_none()));
        assert_eq!(enriched.price_breakdown, Some(breakdown));
    }

    #[test]
    fn test_entries_without_price_are_skipped() {
        let breakdown = json!({
            "ingredients": [{"name": "tomato", "price": "n/a"}]
        });
        let enriched = merge_price_breakdown(recipe_with_ingredients(), &breakdown);
        assert!(enriched.extended_ingredients[0].estimated_cost.is_none());
    }
}
