//! Recipe aggregation, caching, and ranking core for the Larder meal
//! planner.
//!
//! The crate reconciles a local relational cache with a third-party recipe
//! API: local-first fallback search, concurrent detail resolution, ingredient
//! cost enrichment, grocery list aggregation, and preference-based ranking.
//! The HTTP route layer, auth, and schema migrations live in the server that
//! embeds this crate.

pub mod api;
pub mod error;
pub mod filter;
pub mod grocery;
pub mod normalize;
pub mod rank;
pub mod service;
pub mod store;
pub mod types;

mod enrich;
mod resolve;
mod search;

pub use api::{MockRecipeApi, RecipeApi, RestClient, RestClientBuilder};
pub use error::ApiError;
pub use filter::{
    apply_filters, matches_filters, IngredientSearchFilters, RawSearchParams, SearchFilters,
};
pub use grocery::{build_grocery_list, GroceryItem, GroceryList};
pub use normalize::{normalize_recipe, strip_html};
pub use rank::sort_by_preferences;
pub use service::RecipeService;
pub use store::{create_pool, DbPool, MemoryStore, PgStore, RecipeStore};
pub use types::{EstimatedCost, Ingredient, Nutrient, Nutrition, Recipe, SortPreferences};
