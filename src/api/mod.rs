//! External recipe API seam.
//!
//! The trait keeps the aggregation core mockable in tests; the REST client is
//! the production implementation. Payloads cross this boundary as raw
//! `serde_json::Value` and are shaped exactly once by [`crate::normalize`].

mod client;
mod mock;

pub use client::{RestClient, RestClientBuilder};
pub use mock::MockRecipeApi;

use crate::error::ApiError;
use crate::filter::{IngredientSearchFilters, SearchFilters};
use async_trait::async_trait;
use serde_json::Value;

/// Client for the third-party recipe API.
///
/// Every call may fail with a transient error; callers catch at the call
/// site and degrade to partial results rather than propagating.
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Full recipe details for one external id.
    async fn recipe_information(&self, id: i64, include_nutrition: bool)
        -> Result<Value, ApiError>;

    /// Per-ingredient price breakdown for one external id.
    async fn price_breakdown(&self, id: i64) -> Result<Value, ApiError>;

    /// Free-text/filter search. Returns raw recipe payloads.
    async fn search_recipes(
        &self,
        filters: &SearchFilters,
        number: u32,
    ) -> Result<Vec<Value>, ApiError>;

    /// Ingredient-based search. Returns raw recipe payloads.
    async fn search_by_ingredients(
        &self,
        filters: &IngredientSearchFilters,
        number: u32,
    ) -> Result<Vec<Value>, ApiError>;
}
