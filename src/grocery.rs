//! Grocery list aggregation.
//!
//! Ingredients are merged across recipes by lowercased-trimmed name. Amounts
//! are summed without unit conversion, a deliberate simplification, since
//! the source amounts rarely share units anyway. Costs are rendered as
//! 2-decimal strings for display.

use crate::types::Recipe;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// One aggregated shopping-list entry.
#[derive(Debug, Clone, Serialize)]
pub struct GroceryItem {
    pub name: String,
    /// Unit-less sum of the contributing amounts.
    pub amount: f64,
    pub unit: Option<String>,
    /// Store aisle, "Unknown" when the source carries none.
    pub aisle: String,
    /// Accumulated cost in major currency units, rendered to 2 decimals.
    pub estimated_cost: String,
    /// Titles of the recipes that contributed this ingredient.
    pub recipes: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroceryList {
    /// All items, stably sorted by aisle name.
    pub grocery_list: Vec<GroceryItem>,
    /// The same items bucketed by aisle, insertion order preserved within
    /// each bucket.
    pub grouped_by_aisle: BTreeMap<String, Vec<GroceryItem>>,
    /// Grand total in major currency units, rendered to 2 decimals.
    pub total_estimated_cost: String,
}

struct Entry {
    name: String,
    amount: f64,
    unit: Option<String>,
    aisle: String,
    cost: f64,
    recipes: Vec<String>,
}

/// Aggregate the ingredients of a recipe set into a shopping list grouped by
/// store aisle, with cost rollups.
pub fn build_grocery_list(recipes: &[Recipe]) -> GroceryList {
    let mut entries: Vec<Entry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut total = 0.0f64;

    for recipe in recipes {
        for ingredient in &recipe.extended_ingredients {
            let Some(resolved) = ingredient.resolved_name() else {
                continue;
            };
            let key = resolved.trim().to_lowercase();
            if key.is_empty() {
                continue;
            }

            // Ingredient costs arrive in minor units.
            let cost = ingredient
                .estimated_cost
                .as_ref()
                .map(|c| c.value / 100.0)
                .unwrap_or(0.0);
            total += cost;

            match index.get(&key) {
                Some(&slot) => {
                    let entry = &mut entries[slot];
                    entry.amount += ingredient.amount.unwrap_or(0.0);
                    entry.cost += cost;
                    entry.recipes.push(recipe.title.clone());
                }
                None => {
                    index.insert(key, entries.len());
                    entries.push(Entry {
                        name: resolved.trim().to_string(),
                        amount: ingredient.amount.unwrap_or(0.0),
                        unit: ingredient.unit.clone(),
                        aisle: ingredient
                            .aisle
                            .clone()
                            .filter(|a| !a.trim().is_empty())
                            .unwrap_or_else(|| "Unknown".to_string()),
                        cost,
                        recipes: vec![recipe.title.clone()],
                    });
                }
            }
        }
    }

    let mut grocery_list: Vec<GroceryItem> = entries
        .into_iter()
        .map(|e| GroceryItem {
            name: e.name,
            amount: e.amount,
            unit: e.unit,
            aisle: e.aisle,
            estimated_cost: format!("{:.2}", e.cost),
            recipes: e.recipes,
        })
        .collect();
    // Stable sort keeps first-seen order within each aisle.
    grocery_list.sort_by(|a, b| a.aisle.cmp(&b.aisle));

    let mut grouped_by_aisle: BTreeMap<String, Vec<GroceryItem>> = BTreeMap::new();
    for item in &grocery_list {
        grouped_by_aisle
            .entry(item.aisle.clone())
            .or_default()
            .push(item.clone());
    }

    GroceryList {
        grocery_list,
        grouped_by_aisle,
        total_estimated_cost: format!("{total:.2}"),
    }
}
