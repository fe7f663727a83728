use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical recipe shape used everywhere inside the crate.
///
/// Produced exactly once per external payload by [`crate::normalize`]; the
/// cache stores this shape as a JSON blob and parses it straight back. Prices
/// are always in major currency units here; the minor-unit conversion happens
/// at normalization and never again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// External-system id. Globally unique, used as the cache key.
    pub id: i64,
    #[serde(default)]
    pub title: String,
    /// Plain-text summary (HTML stripped at normalization).
    #[serde(default)]
    pub summary: Option<String>,
    /// Price per serving in major currency units.
    #[serde(default)]
    pub price_per_serving: Option<f64>,
    #[serde(default)]
    pub ready_in_minutes: Option<i32>,
    #[serde(default)]
    pub servings: Option<i32>,
    #[serde(default)]
    pub extended_ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub nutrition: Option<Nutrition>,
    /// Diet labels as reported by the external API, e.g. "vegan".
    #[serde(default)]
    pub diets: Vec<String>,
    #[serde(default)]
    pub vegetarian: Option<bool>,
    #[serde(default)]
    pub vegan: Option<bool>,
    #[serde(default)]
    pub gluten_free: Option<bool>,
    #[serde(default)]
    pub dairy_free: Option<bool>,
    #[serde(default)]
    pub low_fodmap: Option<bool>,
    #[serde(default)]
    pub whole30: Option<bool>,
    #[serde(default)]
    pub ketogenic: Option<bool>,
    #[serde(default)]
    pub health_score: Option<f64>,
    #[serde(default)]
    pub aggregate_likes: Option<i64>,
    /// Raw cost-breakdown payload, attached by the cost enricher.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_breakdown: Option<serde_json::Value>,
    #[serde(default)]
    pub total_ingredient_cost: Option<f64>,
    #[serde(default)]
    pub total_cost_per_serving: Option<f64>,
}

impl Recipe {
    /// Calorie value extracted from the nutrient list by name.
    pub fn calories(&self) -> Option<f64> {
        self.nutrition
            .as_ref()?
            .nutrients
            .iter()
            .find(|n| n.name == "Calories")
            .map(|n| n.amount)
    }

    /// True if at least one ingredient already carries a numeric estimated
    /// cost, i.e. cost enrichment would be redundant.
    pub fn has_cost_data(&self) -> bool {
        self.extended_ingredients
            .iter()
            .any(|i| i.estimated_cost.is_some())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Ingredient {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    /// Free-text form, e.g. "2 cups chopped onion".
    #[serde(default)]
    pub original: Option<String>,
    /// Unit-less quantity; aggregation sums these without unit conversion.
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    /// Store category, defaults to "Unknown" when grouping.
    #[serde(default)]
    pub aisle: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, alias = "estimatedCost")]
    pub estimated_cost: Option<EstimatedCost>,
}

impl Ingredient {
    /// Name used for grocery aggregation: `name`, falling back to `original`.
    pub fn resolved_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or(self.original.as_deref())
    }
}

/// Estimated cost of one ingredient. `value` is in minor currency units, as
/// reported by the external price breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatedCost {
    pub value: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Nutrition {
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Nutrient {
    pub name: String,
    pub amount: f64,
}

/// User ranking preferences, as stored on the account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SortPreferences {
    /// One of "relevance" (default), "price", "time", "calories", "health",
    /// "popularity".
    #[serde(default)]
    pub sort_by: Option<String>,
    /// "asc" (default) or "desc".
    #[serde(default)]
    pub sort_order: Option<String>,
    /// Weights for the relevance score terms, keyed by "price", "time",
    /// "calories", "health". Missing weights default to 1.
    #[serde(default)]
    pub priority_factors: Option<HashMap<String, f64>>,
}
