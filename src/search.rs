//! Fallback search orchestration.
//!
//! Both search variants are local-first: the cache is consulted for up to
//! three times the requested count, and the external API is only asked to
//! cover the shortfall. Results are deduplicated by external id in encounter
//! order and truncated to the requested count.

use crate::filter::{self, IngredientSearchFilters, RawSearchParams, SearchFilters};
use crate::normalize::normalize_recipe;
use crate::service::RecipeService;
use crate::types::Recipe;
use serde_json::Value;
use std::collections::HashSet;

/// Cap on how many rows the local cache is asked for.
fn local_fetch_cap(number: u32) -> i64 {
    (number * 3).min(90) as i64
}

impl RecipeService {
    /// Free-text/filter search. Returns up to `number` recipes; fewer when
    /// both the cache and the external API are exhausted.
    pub async fn search_with_fallback(&self, raw: &RawSearchParams) -> Vec<Recipe> {
        let filters = SearchFilters::from_raw(raw);
        let number = filters.number as usize;

        let local = self
            .store
            .search_by_filters(&filters, local_fetch_cap(filters.number))
            .await;
        let mut results = Vec::new();
        let mut seen = HashSet::new();
        for recipe in filter::apply_filters(local, &filters) {
            if seen.insert(recipe.id) {
                results.push(recipe);
            }
        }

        if results.len() < number {
            let needed = number - results.len();
            let top_up = (needed * 2).max(5) as u32;
            match self.api.search_recipes(&filters, top_up).await {
                Ok(hits) => {
                    let ids = self.persist_hits(&hits, None).await;
                    let detailed = self.detailed_recipes(&ids).await;
                    for recipe in filter::apply_filters(detailed, &filters) {
                        if seen.insert(recipe.id) {
                            results.push(recipe);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "external search failed, returning local matches only");
                }
            }
        }

        results.truncate(number);
        results
    }

    /// Ingredient-based search. Returns empty immediately when no
    /// ingredients are given.
    pub async fn search_by_ingredients_with_fallback(
        &self,
        raw: &RawSearchParams,
    ) -> Vec<Recipe> {
        let filters = IngredientSearchFilters::from_raw(raw);
        if filters.ingredients.is_empty() {
            return Vec::new();
        }
        let number = filters.base.number as usize;

        let local = self
            .store
            .search_by_filters(&filters.base, local_fetch_cap(filters.base.number))
            .await;
        let mut results = Vec::new();
        let mut seen = HashSet::new();
        for recipe in filter::apply_filters(local, &filters.base) {
            if seen.insert(recipe.id) {
                results.push(recipe);
            }
        }

        if results.len() < number {
            let needed = number - results.len();
            let top_up = (needed * 2).max(10) as u32;
            match self.api.search_by_ingredients(&filters, top_up).await {
                Ok(hits) => {
                    // Ids already seen locally are excluded before resolving.
                    let ids = self.persist_hits(&hits, Some(&seen)).await;
                    let detailed = self.detailed_recipes(&ids).await;
                    for recipe in filter::apply_filters(detailed, &filters.base) {
                        if seen.insert(recipe.id) {
                            results.push(recipe);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "ingredient search failed, returning local matches only");
                }
            }
        }

        results.truncate(number);
        results
    }

    /// Normalize and persist raw search hits, returning their external ids in
    /// encounter order without duplicates. Ids in `exclude` are dropped.
    async fn persist_hits(&self, hits: &[Value], exclude: Option<&HashSet<i64>>) -> Vec<i64> {
        let mut ids = Vec::new();
        let mut queued = HashSet::new();
        for hit in hits {
            let Some(recipe) = normalize_recipe(hit) else {
                continue;
            };
            self.store.upsert(&recipe).await;
            if exclude.is_some_and(|seen| seen.contains(&recipe.id)) {
                continue;
            }
            if queued.insert(recipe.id) {
                ids.push(recipe.id);
            }
        }
        ids
    }
}
