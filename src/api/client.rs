//! REST client for the external recipe API.

use super::RecipeApi;
use crate::error::ApiError;
use crate::filter::{IngredientSearchFilters, SearchFilters};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Configuration for [`RestClient`].
#[derive(Clone)]
pub struct RestClientBuilder {
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    user_agent: String,
}

impl Default for RestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RestClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Environment variables:
    /// - `LARDER_API_BASE`: base URL of the recipe API
    /// - `LARDER_API_KEY`: API key sent with every request
    pub fn new() -> Self {
        let base_url = std::env::var("LARDER_API_BASE")
            .unwrap_or_else(|_| "https://api.spoonacular.com".to_string());
        let api_key = std::env::var("LARDER_API_KEY").ok();

        Self {
            base_url,
            api_key,
            timeout: Duration::from_secs(30),
            user_agent: "larder/1.0".to_string(),
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the per-request timeout. A slow upstream call stalls only until
    /// this budget elapses, never indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<RestClient, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;

        Ok(RestClient {
            inner,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            api_key: self.api_key,
        })
    }
}

/// Production client for the external recipe API.
pub struct RestClient {
    inner: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        RestClientBuilder::new().build()
    }

    pub fn builder() -> RestClientBuilder {
        RestClientBuilder::new()
    }

    async fn get(&self, path: &str, params: &[(String, String)]) -> Result<Value, ApiError> {
        let mut request = self
            .inner
            .get(format!("{}{}", self.base_url, path))
            .query(params);
        if let Some(key) = &self.api_key {
            request = request.query(&[("apiKey", key)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(path, status = %status, "recipe API request failed");
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl RecipeApi for RestClient {
    async fn recipe_information(
        &self,
        id: i64,
        include_nutrition: bool,
    ) -> Result<Value, ApiError> {
        self.get(
            &format!("/recipes/{id}/information"),
            &[("includeNutrition".into(), include_nutrition.to_string())],
        )
        .await
    }

    async fn price_breakdown(&self, id: i64) -> Result<Value, ApiError> {
        self.get(&format!("/recipes/{id}/priceBreakdownWidget.json"), &[])
            .await
    }

    async fn search_recipes(
        &self,
        filters: &SearchFilters,
        number: u32,
    ) -> Result<Vec<Value>, ApiError> {
        let mut params = vec![
            ("number".to_string(), number.to_string()),
            ("addRecipeInformation".to_string(), "true".to_string()),
        ];
        if let Some(query) = &filters.query {
            params.push(("query".to_string(), query.clone()));
        }
        if let Some(diet) = &filters.diet {
            params.push(("diet".to_string(), diet.clone()));
        }
        if !filters.intolerances.is_empty() {
            params.push(("intolerances".to_string(), filters.intolerances.join(",")));
        }
        if let Some(max) = filters.max_ready_time {
            params.push(("maxReadyTime".to_string(), max.to_string()));
        }

        let body = self.get("/recipes/complexSearch", &params).await?;
        Ok(body
            .get("results")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    async fn search_by_ingredients(
        &self,
        filters: &IngredientSearchFilters,
        number: u32,
    ) -> Result<Vec<Value>, ApiError> {
        let params = vec![
            ("ingredients".to_string(), filters.ingredients.join(",")),
            ("number".to_string(), number.to_string()),
            ("ranking".to_string(), filters.ranking.to_string()),
            ("ignorePantry".to_string(), filters.ignore_pantry.to_string()),
        ];

        let body = self.get("/recipes/findByIngredients", &params).await?;
        Ok(body.as_array().cloned().unwrap_or_default())
    }
}
