// Recipe cache table: denormalized columns for cheap local filtering, plus
// the full canonical recipe as a JSONB blob.

diesel::table! {
    cached_recipes (id) {
        id -> Uuid,
        external_id -> Int8,
        title -> Varchar,
        price_per_serving -> Nullable<Float8>,
        ready_in_minutes -> Nullable<Int4>,
        summary -> Nullable<Text>,
        data -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
