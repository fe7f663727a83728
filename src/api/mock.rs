//! Mock recipe API for testing.

use super::RecipeApi;
use crate::error::ApiError;
use crate::filter::{IngredientSearchFilters, SearchFilters};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Mock API with canned responses and per-endpoint call counters, so tests
/// can assert which external calls were (not) made.
#[derive(Default)]
pub struct MockRecipeApi {
    information: HashMap<i64, Value>,
    failing_information: HashSet<i64>,
    breakdowns: HashMap<i64, Value>,
    search_results: Vec<Value>,
    ingredient_results: Vec<Value>,
    information_calls: AtomicUsize,
    breakdown_calls: AtomicUsize,
    search_calls: AtomicUsize,
    ingredient_search_calls: AtomicUsize,
    /// Requested result counts, in call order.
    search_numbers: Mutex<Vec<u32>>,
}

impl MockRecipeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detail response for an external id.
    pub fn with_information(mut self, id: i64, payload: Value) -> Self {
        self.information.insert(id, payload);
        self
    }

    /// Make detail fetches for an id fail with a 500.
    pub fn with_failing_information(mut self, id: i64) -> Self {
        self.failing_information.insert(id);
        self
    }

    /// Add a price breakdown response for an external id.
    pub fn with_breakdown(mut self, id: i64, payload: Value) -> Self {
        self.breakdowns.insert(id, payload);
        self
    }

    /// Set the results returned by text search.
    pub fn with_search_results(mut self, results: Vec<Value>) -> Self {
        self.search_results = results;
        self
    }

    /// Set the results returned by ingredient search.
    pub fn with_ingredient_results(mut self, results: Vec<Value>) -> Self {
        self.ingredient_results = results;
        self
    }

    pub fn information_calls(&self) -> usize {
        self.information_calls.load(Ordering::Relaxed)
    }

    pub fn breakdown_calls(&self) -> usize {
        self.breakdown_calls.load(Ordering::Relaxed)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::Relaxed)
    }

    pub fn ingredient_search_calls(&self) -> usize {
        self.ingredient_search_calls.load(Ordering::Relaxed)
    }

    /// Result counts requested from either search endpoint, in call order.
    pub fn search_numbers(&self) -> Vec<u32> {
        self.search_numbers.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecipeApi for MockRecipeApi {
    async fn recipe_information(
        &self,
        id: i64,
        _include_nutrition: bool,
    ) -> Result<Value, ApiError> {
        self.information_calls.fetch_add(1, Ordering::Relaxed);
        if self.failing_information.contains(&id) {
            return Err(ApiError::Status(500));
        }
        self.information
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NoMockResponse(format!("recipe {id}")))
    }

    async fn price_breakdown(&self, id: i64) -> Result<Value, ApiError> {
        self.breakdown_calls.fetch_add(1, Ordering::Relaxed);
        self.breakdowns
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NoMockResponse(format!("breakdown {id}")))
    }

    async fn search_recipes(
        &self,
        _filters: &SearchFilters,
        number: u32,
    ) -> Result<Vec<Value>, ApiError> {
        self.search_calls.fetch_add(1, Ordering::Relaxed);
        self.search_numbers.lock().unwrap().push(number);
        Ok(self.search_results.clone())
    }

    async fn search_by_ingredients(
        &self,
        _filters: &IngredientSearchFilters,
        number: u32,
    ) -> Result<Vec<Value>, ApiError> {
        self.ingredient_search_calls.fetch_add(1, Ordering::Relaxed);
        self.search_numbers.lock().unwrap().push(number);
        Ok(self.ingredient_results.clone())
    }
}
