//! In-memory recipe cache.
//!
//! Used by tests and by embedders that don't want a database. Applies the
//! same denormalized-column semantics as the Postgres store: only ready-time
//! and price bounds are checked here, the filter engine does the rest.

use super::RecipeStore;
use crate::filter::SearchFilters;
use crate::types::Recipe;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

struct MemoryRow {
    record_id: Uuid,
    recipe: Recipe,
}

#[derive(Default)]
pub struct MemoryStore {
    // Vec keeps insertion order so local search is deterministic.
    rows: Mutex<Vec<MemoryRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn upsert(&self, recipe: &Recipe) -> Option<Uuid> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|r| r.recipe.id == recipe.id) {
            row.recipe = recipe.clone();
            return Some(row.record_id);
        }
        let record_id = Uuid::new_v4();
        rows.push(MemoryRow {
            record_id,
            recipe: recipe.clone(),
        });
        Some(record_id)
    }

    async fn find_by_ids(&self, ids: &[i64]) -> HashMap<i64, Recipe> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .filter(|r| ids.contains(&r.recipe.id))
            .map(|r| (r.recipe.id, r.recipe.clone()))
            .collect()
    }

    async fn search_by_filters(&self, filters: &SearchFilters, limit: i64) -> Vec<Recipe> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .filter(|r| {
                let recipe = &r.recipe;
                if let Some(max) = filters.max_ready_time {
                    match recipe.ready_in_minutes {
                        Some(t) if t <= max => {}
                        _ => return false,
                    }
                }
                if let Some(lo) = filters.min_price {
                    match recipe.price_per_serving {
                        Some(p) if p >= lo => {}
                        _ => return false,
                    }
                }
                if let Some(hi) = filters.max_price {
                    match recipe.price_per_serving {
                        Some(p) if p <= hi => {}
                        _ => return false,
                    }
                }
                true
            })
            .take(limit.max(0) as usize)
            .map(|r| r.recipe.clone())
            .collect()
    }

    async fn record_id(&self, external_id: i64) -> Option<Uuid> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|r| r.recipe.id == external_id)
            .map(|r| r.record_id)
    }
}
