//! Postgres-backed recipe cache.

use super::models::{CachedRecipeRow, NewCachedRecipe};
use super::RecipeStore;
use crate::filter::SearchFilters;
use crate::types::Recipe;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub fn create_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    r2d2::Pool::builder()
        .build(manager)
        .expect("Failed to create database pool")
}

#[derive(Debug, Error)]
enum PgStoreError {
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("query error: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("recipe serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Recipe cache over a Postgres pool.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn try_upsert(&self, recipe: &Recipe) -> Result<Uuid, PgStoreError> {
        use super::schema::cached_recipes::dsl::*;

        let mut conn = self.pool.get()?;
        let blob = serde_json::to_value(recipe)?;
        let row = NewCachedRecipe {
            external_id: recipe.id,
            title: &recipe.title,
            price_per_serving: recipe.price_per_serving,
            ready_in_minutes: recipe.ready_in_minutes,
            summary: recipe.summary.as_deref(),
            data: blob.clone(),
        };

        let record_id = diesel::insert_into(cached_recipes)
            .values(&row)
            .on_conflict(external_id)
            .do_update()
            .set((
                title.eq(&recipe.title),
                price_per_serving.eq(recipe.price_per_serving),
                ready_in_minutes.eq(recipe.ready_in_minutes),
                summary.eq(recipe.summary.as_deref()),
                data.eq(&blob),
                updated_at.eq(diesel::dsl::now),
            ))
            .returning(id)
            .get_result(&mut conn)?;
        Ok(record_id)
    }

    fn try_find_by_ids(&self, ids: &[i64]) -> Result<HashMap<i64, Recipe>, PgStoreError> {
        use super::schema::cached_recipes::dsl::*;

        let mut conn = self.pool.get()?;
        let rows: Vec<CachedRecipeRow> = cached_recipes
            .filter(external_id.eq_any(ids.iter().copied()))
            .select(CachedRecipeRow::as_select())
            .load(&mut conn)?;

        let found = rows
            .into_iter()
            .filter_map(|row| {
                let ext_id = row.external_id;
                parse_row(row).map(|recipe| (ext_id, recipe))
            })
            .collect();
        Ok(found)
    }

    fn try_search(&self, filters: &SearchFilters, max_rows: i64) -> Result<Vec<Recipe>, PgStoreError> {
        use super::schema::cached_recipes::dsl::*;

        let mut conn = self.pool.get()?;
        let mut query = cached_recipes
            .select(CachedRecipeRow::as_select())
            .into_boxed();
        if let Some(max) = filters.max_ready_time {
            query = query.filter(ready_in_minutes.le(max));
        }
        if let Some(lo) = filters.min_price {
            query = query.filter(price_per_serving.ge(lo));
        }
        if let Some(hi) = filters.max_price {
            query = query.filter(price_per_serving.le(hi));
        }

        let rows: Vec<CachedRecipeRow> = query
            .order(updated_at.desc())
            .limit(max_rows)
            .load(&mut conn)?;

        Ok(rows.into_iter().filter_map(parse_row).collect())
    }

    fn try_record_id(&self, ext_id: i64) -> Result<Option<Uuid>, PgStoreError> {
        use super::schema::cached_recipes::dsl::*;

        let mut conn = self.pool.get()?;
        let record_id = cached_recipes
            .filter(external_id.eq(ext_id))
            .select(id)
            .first::<Uuid>(&mut conn)
            .optional()?;
        Ok(record_id)
    }
}

/// Parse a row's JSON blob back into the canonical shape. A malformed blob
/// is logged and the row skipped, never raised to the caller.
fn parse_row(row: CachedRecipeRow) -> Option<Recipe> {
    match serde_json::from_value::<Recipe>(row.data) {
        Ok(recipe) => Some(recipe),
        Err(e) => {
            tracing::warn!(
                external_id = row.external_id,
                error = %e,
                "malformed cached recipe blob, skipping row"
            );
            None
        }
    }
}

#[async_trait]
impl RecipeStore for PgStore {
    async fn upsert(&self, recipe: &Recipe) -> Option<Uuid> {
        match self.try_upsert(recipe) {
            Ok(record_id) => Some(record_id),
            Err(e) => {
                tracing::warn!(external_id = recipe.id, error = %e, "recipe upsert failed");
                None
            }
        }
    }

    async fn find_by_ids(&self, ids: &[i64]) -> HashMap<i64, Recipe> {
        if ids.is_empty() {
            return HashMap::new();
        }
        match self.try_find_by_ids(ids) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(error = %e, "recipe batch lookup failed, treating cache as empty");
                HashMap::new()
            }
        }
    }

    async fn search_by_filters(&self, filters: &SearchFilters, limit: i64) -> Vec<Recipe> {
        match self.try_search(filters, limit) {
            Ok(recipes) => recipes,
            Err(e) => {
                tracing::warn!(error = %e, "local recipe search failed, treating cache as empty");
                Vec::new()
            }
        }
    }

    async fn record_id(&self, external_id: i64) -> Option<Uuid> {
        match self.try_record_id(external_id) {
            Ok(record_id) => record_id,
            Err(e) => {
                tracing::warn!(external_id, error = %e, "record id lookup failed");
                None
            }
        }
    }
}
