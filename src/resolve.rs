//! Detail resolution: ordered id list → fully detailed, cost-enriched
//! recipes.

use crate::service::RecipeService;
use crate::types::Recipe;
use std::collections::HashSet;
use tokio::task::JoinSet;

impl RecipeService {
    /// Resolve a list of external ids to detailed recipes, preserving the
    /// input order and skipping ids that cannot be resolved.
    ///
    /// Cache hits are served locally; misses are fetched from the external
    /// API concurrently, one task per id, and persisted. Cost enrichment then
    /// runs concurrently across all resolved recipes. One id's failure never
    /// aborts the others.
    pub async fn detailed_recipes(&self, ids: &[i64]) -> Vec<Recipe> {
        if ids.is_empty() {
            return Vec::new();
        }

        let mut found = self.store.find_by_ids(ids).await;

        let mut missing = Vec::new();
        let mut queued = HashSet::new();
        for &id in ids {
            if !found.contains_key(&id) && queued.insert(id) {
                missing.push(id);
            }
        }

        let mut fetches = JoinSet::new();
        for id in missing {
            let service = self.clone();
            fetches.spawn(async move { (id, service.fetch_normalize_store(id).await) });
        }
        while let Some(joined) = fetches.join_next().await {
            // A panicked fetch task degrades to an omitted id.
            if let Ok((id, Some((recipe, _)))) = joined {
                found.insert(id, recipe);
            }
        }

        // Re-project into the caller's id order before fan-out, so slot
        // indexes restore the order regardless of completion order.
        let ordered: Vec<Recipe> = ids.iter().filter_map(|id| found.get(id).cloned()).collect();
        let mut slots: Vec<Option<Recipe>> = vec![None; ordered.len()];

        let mut enrichments = JoinSet::new();
        for (slot, recipe) in ordered.into_iter().enumerate() {
            let service = self.clone();
            enrichments.spawn(async move { (slot, service.ensure_cost_data(recipe).await) });
        }
        while let Some(joined) = enrichments.join_next().await {
            if let Ok((slot, recipe)) = joined {
                slots[slot] = Some(recipe);
            }
        }

        slots.into_iter().flatten().collect()
    }
}
