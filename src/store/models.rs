use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::store::schema::cached_recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[allow(dead_code)]
pub struct CachedRecipeRow {
    pub id: Uuid,
    pub external_id: i64,
    pub title: String,
    pub price_per_serving: Option<f64>,
    pub ready_in_minutes: Option<i32>,
    pub summary: Option<String>,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::store::schema::cached_recipes)]
pub struct NewCachedRecipe<'a> {
    pub external_id: i64,
    pub title: &'a str,
    pub price_per_serving: Option<f64>,
    pub ready_in_minutes: Option<i32>,
    pub summary: Option<&'a str>,
    pub data: serde_json::Value,
}
