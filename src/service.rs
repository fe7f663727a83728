//! The aggregation service tying the external API and the local cache
//! together. The search orchestrators, detail resolver, and cost enricher
//! live in their own modules as further `impl RecipeService` blocks.

use crate::api::RecipeApi;
use crate::normalize::normalize_recipe;
use crate::store::RecipeStore;
use crate::types::Recipe;
use std::sync::Arc;
use uuid::Uuid;

/// Recipe aggregation core: reconciles the local cache with the external
/// recipe API. Cheap to clone; clones share the underlying collaborators.
#[derive(Clone)]
pub struct RecipeService {
    pub(crate) api: Arc<dyn RecipeApi>,
    pub(crate) store: Arc<dyn RecipeStore>,
}

impl RecipeService {
    pub fn new(api: Arc<dyn RecipeApi>, store: Arc<dyn RecipeStore>) -> Self {
        Self { api, store }
    }

    /// Resolve or create a local cache record for an external id, returning
    /// the internal record id. Used to map external ids to internal foreign
    /// keys. Returns `None` when the recipe cannot be fetched or persisted.
    pub async fn ensure_recipe_record(&self, external_id: i64) -> Option<Uuid> {
        if let Some(record_id) = self.store.record_id(external_id).await {
            return Some(record_id);
        }
        let (_, record_id) = self.fetch_normalize_store(external_id).await?;
        record_id
    }

    /// Fetch one recipe from the external API, normalize it, and persist it.
    /// Failures degrade to `None`; they never abort a batch.
    pub(crate) async fn fetch_normalize_store(
        &self,
        external_id: i64,
    ) -> Option<(Recipe, Option<Uuid>)> {
        let payload = match self.api.recipe_information(external_id, true).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(external_id, error = %e, "recipe fetch failed, omitting");
                return None;
            }
        };
        let recipe = normalize_recipe(&payload)?;
        let record_id = self.store.upsert(&recipe).await;
        Some((recipe, record_id))
    }
}
