//! Local recipe cache store.
//!
//! The store is the single owner of persistence: every other component reads
//! and writes recipes through it. Persistence failures never propagate:
//! they are logged and converted to empty results, so callers treat "cache
//! unavailable" exactly like "cache empty".

mod memory;
pub mod models;
mod pg;
pub mod schema;

pub use memory::MemoryStore;
pub use pg::{create_pool, DbPool, PgStore};

use crate::filter::SearchFilters;
use crate::types::Recipe;
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// Read-through cache of normalized recipes, keyed by external id.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Insert or update the row for `recipe.id`, refreshing the denormalized
    /// columns and the JSON blob. Returns the internal record id, or `None`
    /// when persistence failed.
    async fn upsert(&self, recipe: &Recipe) -> Option<Uuid>;

    /// Batch lookup by external id. Rows that don't exist, or whose blob is
    /// malformed, are simply absent from the result.
    async fn find_by_ids(&self, ids: &[i64]) -> HashMap<i64, Recipe>;

    /// Up to `limit` stored recipes matching the denormalized filterable
    /// columns (ready time and price bounds). Query and diet constraints are
    /// not applied here; full matching happens in the filter engine.
    async fn search_by_filters(&self, filters: &SearchFilters, limit: i64) -> Vec<Recipe>;

    /// Internal record id for an external id, if a row exists.
    async fn record_id(&self, external_id: i64) -> Option<Uuid>;
}
