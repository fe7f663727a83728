//! Preference-based re-ranking of recipe lists.

use crate::types::{Recipe, SortPreferences};
use std::cmp::Ordering;
use std::collections::HashMap;

impl SortPreferences {
    fn is_empty(&self) -> bool {
        self.sort_by.is_none() && self.sort_order.is_none() && self.priority_factors.is_none()
    }
}

/// Reorder recipes by the user's configured sort key.
///
/// Returns a sorted copy; the input order is never mutated. Absent or empty
/// preferences return the list unchanged. `sort_order: "desc"` inverts
/// whatever the key's natural comparator produces.
pub fn sort_by_preferences(recipes: &[Recipe], preferences: Option<&SortPreferences>) -> Vec<Recipe> {
    let mut sorted = recipes.to_vec();
    let Some(preferences) = preferences else {
        return sorted;
    };
    if sorted.is_empty() || preferences.is_empty() {
        return sorted;
    }

    let sort_by = preferences.sort_by.as_deref().unwrap_or("relevance");
    let descending = preferences.sort_order.as_deref() == Some("desc");
    let no_factors = HashMap::new();
    let factors = preferences.priority_factors.as_ref().unwrap_or(&no_factors);

    sorted.sort_by(|a, b| {
        let ordering = compare_by_key(sort_by, factors, a, b);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
    sorted
}

fn compare_by_key(
    key: &str,
    factors: &HashMap<String, f64>,
    a: &Recipe,
    b: &Recipe,
) -> Ordering {
    match key {
        // Missing price/time sorts last under the natural ascending order.
        "price" => price_key(a).total_cmp(&price_key(b)),
        "time" => time_key(a).total_cmp(&time_key(b)),
        "calories" => a
            .calories()
            .unwrap_or(0.0)
            .total_cmp(&b.calories().unwrap_or(0.0)),
        // Health and popularity are naturally descending.
        "health" => b
            .health_score
            .unwrap_or(0.0)
            .total_cmp(&a.health_score.unwrap_or(0.0)),
        "popularity" => b
            .aggregate_likes
            .unwrap_or(0)
            .cmp(&a.aggregate_likes.unwrap_or(0)),
        // "relevance" and anything unrecognized: weighted score, descending.
        _ => relevance_score(b, factors).total_cmp(&relevance_score(a, factors)),
    }
}

fn price_key(recipe: &Recipe) -> f64 {
    recipe.price_per_serving.unwrap_or(f64::INFINITY)
}

fn time_key(recipe: &Recipe) -> f64 {
    recipe
        .ready_in_minutes
        .map(f64::from)
        .unwrap_or(f64::INFINITY)
}

/// Weighted relevance score. Terms whose underlying field or weight is zero
/// or absent contribute nothing.
fn relevance_score(recipe: &Recipe, factors: &HashMap<String, f64>) -> f64 {
    let weight = |key: &str| factors.get(key).copied().unwrap_or(1.0);
    let mut score = 0.0;

    if let Some(price) = recipe.price_per_serving {
        let w = weight("price");
        if price != 0.0 && w != 0.0 {
            score += w * (100.0 - price * 10.0);
        }
    }
    if let Some(time) = recipe.ready_in_minutes {
        let w = weight("time");
        if time != 0 && w != 0.0 {
            score += w * (100.0 - f64::from(time));
        }
    }
    if let Some(calories) = recipe.calories() {
        let w = weight("calories");
        if calories != 0.0 && w != 0.0 {
            score += w * (calories / 10.0);
        }
    }
    if let Some(health) = recipe.health_score {
        let w = weight("health");
        if health != 0.0 && w != 0.0 {
            score += w * health;
        }
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn recipe(id: i64, fields: serde_json::Value) -> Recipe {
        let mut base = json!({"id": id, "title": format!("R{id}")});
        base.as_object_mut()
            .unwrap()
            .extend(fields.as_object().unwrap().clone());
        serde_json::from_value(base).unwrap()
    }

    fn prefs(sort_by: &str, sort_order: &str) -> SortPreferences {
        SortPreferences {
            sort_by: Some(sort_by.to_string()),
            sort_order: Some(sort_order.to_string()),
            priority_factors: None,
        }
    }

    fn ids(recipes: &[Recipe]) -> Vec<i64> {
        recipes.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_no_preferences_returns_input_order() {
        let recipes = vec![
            recipe(2, json!({"price_per_serving": 9.0})),
            recipe(1, json!({"price_per_serving": 1.0})),
        ];
        assert_eq!(ids(&sort_by_preferences(&recipes, None)), vec![2, 1]);
        assert_eq!(
            ids(&sort_by_preferences(&recipes, Some(&SortPreferences::default()))),
            vec![2, 1]
        );
    }

    #[test]
    fn test_price_ascending_with_missing_last() {
        let recipes = vec![
            recipe(1, json!({"price_per_serving": 4.5})),
            recipe(2, json!({})),
            recipe(3, json!({"price_per_serving": 1.2})),
        ];
        let sorted = sort_by_preferences(&recipes, Some(&prefs("price", "asc")));
        assert_eq!(ids(&sorted), vec![3, 1, 2]);
    }

    #[test]
    fn test_desc_inverts_comparator() {
        let recipes = vec![
            recipe(1, json!({"ready_in_minutes": 15})),
            recipe(2, json!({"ready_in_minutes": 60})),
        ];
        let sorted = sort_by_preferences(&recipes, Some(&prefs("time", "desc")));
        assert_eq!(ids(&sorted), vec![2, 1]);
    }

    #[test]
    fn test_health_descending_by_default() {
        let recipes = vec![
            recipe(1, json!({"health_score": 20.0})),
            recipe(2, json!({"health_score": 80.0})),
            recipe(3, json!({})),
        ];
        let sorted = sort_by_preferences(&recipes, Some(&prefs("health", "asc")));
        assert_eq!(ids(&sorted), vec![2, 1, 3]);
    }

    #[test]
    fn test_popularity_descending() {
        let recipes = vec![
            recipe(1, json!({"aggregate_likes": 5})),
            recipe(2, json!({"aggregate_likes": 500})),
        ];
        let sorted = sort_by_preferences(&recipes, Some(&prefs("popularity", "asc")));
        assert_eq!(ids(&sorted), vec![2, 1]);
    }

    #[test]
    fn test_relevance_uses_priority_factors() {
        // Cheap-but-slow vs expensive-but-fast; weighting time heavily should
        // favor the fast one.
        let recipes = vec![
            recipe(1, json!({"price_per_serving": 1.0, "ready_in_minutes": 90})),
            recipe(2, json!({"price_per_serving": 8.0, "ready_in_minutes": 10})),
        ];
        let mut factors = HashMap::new();
        factors.insert("time".to_string(), 10.0);
        let preferences = SortPreferences {
            sort_by: Some("relevance".to_string()),
            sort_order: None,
            priority_factors: Some(factors),
        };
        let sorted = sort_by_preferences(&recipes, Some(&preferences));
        assert_eq!(ids(&sorted), vec![2, 1]);
    }

    #[test]
    fn test_relevance_skips_zero_weight_terms() {
        let recipes = vec![
            recipe(1, json!({"price_per_serving": 1.0, "health_score": 5.0})),
            recipe(2, json!({"price_per_serving": 9.0, "health_score": 90.0})),
        ];
        let mut factors = HashMap::new();
        factors.insert("price".to_string(), 0.0);
        let preferences = SortPreferences {
            sort_by: Some("relevance".to_string()),
            sort_order: None,
            priority_factors: Some(factors),
        };
        let sorted = sort_by_preferences(&recipes, Some(&preferences));
        assert_eq!(ids(&sorted), vec![2, 1]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let recipes = vec![
            recipe(1, json!({"price_per_serving": 2.0})),
            recipe(2, json!({"price_per_serving": 2.0})),
            recipe(3, json!({"price_per_serving": 2.0})),
        ];
        let sorted = sort_by_preferences(&recipes, Some(&prefs("price", "asc")));
        assert_eq!(ids(&sorted), vec![1, 2, 3]);
    }
}
