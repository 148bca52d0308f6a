use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::{order_lines, orders};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: String,
    pub note: Option<String>,
    pub total: BigDecimal,
    pub tracking_code: Option<String>,
    pub invoice_url: Option<String>,
    pub payment_method: Option<String>,
    pub pix_key: Option<String>,
    pub card_number: Option<String>,
    pub authorization_code: Option<String>,
    pub payment_line: Option<String>,
    pub payment_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: String,
    pub note: Option<String>,
    pub total: BigDecimal,
    pub tracking_code: Option<String>,
    pub invoice_url: Option<String>,
    pub payment_method: Option<String>,
    pub pix_key: Option<String>,
    pub card_number: Option<String>,
    pub authorization_code: Option<String>,
    pub payment_line: Option<String>,
    pub payment_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Changeset applied when `save` hits an existing row. `created_at` is
/// deliberately absent so the original timestamp survives updates;
/// `treat_none_as_null` so cleared optional fields really clear.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = orders)]
#[diesel(treat_none_as_null = true)]
pub struct OrderChangeset {
    pub customer_id: Uuid,
    pub status: String,
    pub note: Option<String>,
    pub total: BigDecimal,
    pub tracking_code: Option<String>,
    pub invoice_url: Option<String>,
    pub payment_method: Option<String>,
    pub pix_key: Option<String>,
    pub card_number: Option<String>,
    pub authorization_code: Option<String>,
    pub payment_line: Option<String>,
    pub payment_key: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_lines)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_lines)]
pub struct NewOrderLineRow {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}
