use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::order_service::OrderService;
use crate::domain::order::{
    NewOrder, NewOrderLine, Order, OrderStatus, OrderUpdate, PaymentData, PaymentMethod,
};
use crate::errors::AppError;
use crate::infrastructure::order_repo::DieselOrderRepository;

type Orders = web::Data<OrderService<DieselOrderRepository>>;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentRequest {
    /// PIX, CREDIT_CARD or BANK_SLIP.
    #[schema(value_type = String)]
    pub method: PaymentMethod,
    pub pix_key: Option<String>,
    pub card_number: Option<String>,
    pub authorization_code: Option<String>,
    pub payment_line: Option<String>,
}

impl From<PaymentRequest> for PaymentData {
    fn from(p: PaymentRequest) -> Self {
        PaymentData {
            method: p.method,
            pix_key: p.pix_key,
            card_number: p.card_number,
            authorization_code: p.authorization_code,
            payment_line: p.payment_line,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderLineRequest {
    pub product_id: Uuid,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
}

/// Shared payload for POST and PUT. On creation, `status` and `total` are
/// ignored (the lifecycle starts at PLACED and the total is derived); on
/// update both are consumed verbatim, `total` being required.
#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderRequest {
    pub customer_id: Uuid,
    pub payment: Option<PaymentRequest>,
    pub payment_key: Option<String>,
    pub note: Option<String>,
    #[schema(value_type = Option<String>)]
    pub status: Option<OrderStatus>,
    /// Decimal total as a string, e.g. "150.00".
    pub total: Option<String>,
    pub tracking_code: Option<String>,
    pub invoice_url: Option<String>,
    pub lines: Vec<OrderLineRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentResponse {
    #[schema(value_type = String)]
    pub method: PaymentMethod,
    pub pix_key: Option<String>,
    pub card_number: Option<String>,
    pub authorization_code: Option<String>,
    pub payment_line: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderLineResponse {
    pub id: Option<Uuid>,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: String,
    pub subtotal: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    #[schema(value_type = String)]
    pub status: OrderStatus,
    pub created_at: String,
    pub note: Option<String>,
    pub total: String,
    pub tracking_code: Option<String>,
    pub invoice_url: Option<String>,
    pub payment: Option<PaymentResponse>,
    pub payment_key: Option<String>,
    pub lines: Vec<OrderLineResponse>,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        OrderResponse {
            id: order.id,
            customer_id: order.customer_id,
            status: order.status,
            created_at: order.created_at.to_rfc3339(),
            note: order.note.clone(),
            total: order.total.to_string(),
            tracking_code: order.tracking_code.clone(),
            invoice_url: order.invoice_url.clone(),
            payment: order.payment.as_ref().map(|p| PaymentResponse {
                method: p.method,
                pix_key: p.pix_key.clone(),
                card_number: p.card_number.clone(),
                authorization_code: p.authorization_code.clone(),
                payment_line: p.payment_line.clone(),
            }),
            payment_key: order.payment_key.clone(),
            lines: order
                .lines()
                .iter()
                .map(|l| OrderLineResponse {
                    id: l.id,
                    product_id: l.product_id,
                    quantity: l.quantity,
                    unit_price: l.unit_price.to_string(),
                    subtotal: l.subtotal().to_string(),
                })
                .collect(),
        }
    }
}

// ── Boundary validation ──────────────────────────────────────────────────────

fn parse_lines(lines: &[OrderLineRequest]) -> Result<Vec<NewOrderLine>, AppError> {
    lines
        .iter()
        .map(|l| {
            if l.quantity < 1 {
                return Err(AppError::Validation(format!(
                    "quantity must be at least 1, got {}",
                    l.quantity
                )));
            }
            let unit_price = BigDecimal::from_str(&l.unit_price).map_err(|e| {
                AppError::Validation(format!("Invalid unit_price '{}': {}", l.unit_price, e))
            })?;
            if unit_price < BigDecimal::from(0) {
                return Err(AppError::Validation(format!(
                    "unit_price must not be negative, got {}",
                    l.unit_price
                )));
            }
            Ok(NewOrderLine {
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price,
            })
        })
        .collect()
}

async fn run_blocking<T, F>(f: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
{
    web::block(f)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders
#[utoipa::path(
    get,
    path = "/orders",
    responses(
        (status = 200, description = "All orders with their lines", body = [OrderResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(service: Orders) -> Result<HttpResponse, AppError> {
    let orders = run_blocking(move || service.list_orders().map_err(AppError::from)).await?;
    let body: Vec<OrderResponse> = orders.iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /orders/{id}
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(service: Orders, path: web::Path<Uuid>) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let order = run_blocking(move || service.get_order(id).map_err(AppError::from)).await?;
    match order {
        Some(order) => Ok(HttpResponse::Ok().json(OrderResponse::from(&order))),
        None => Err(AppError::NotFound),
    }
}

/// GET /orders/customer/{customer_id}
#[utoipa::path(
    get,
    path = "/orders/customer/{customer_id}",
    params(
        ("customer_id" = Uuid, Path, description = "Customer UUID"),
    ),
    responses(
        (status = 200, description = "Orders for the customer", body = [OrderResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn orders_by_customer(
    service: Orders,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let customer_id = path.into_inner();
    let orders =
        run_blocking(move || service.orders_by_customer(customer_id).map_err(AppError::from))
            .await?;
    let body: Vec<OrderResponse> = orders.iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /orders/status/{status}
#[utoipa::path(
    get,
    path = "/orders/status/{status}",
    params(
        ("status" = String, Path, description = "Order status, e.g. PLACED"),
    ),
    responses(
        (status = 200, description = "Orders with the status", body = [OrderResponse]),
        (status = 400, description = "Unknown status"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn orders_by_status(
    service: Orders,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let status: OrderStatus = path.into_inner().parse().map_err(AppError::from)?;
    let orders =
        run_blocking(move || service.orders_by_status(status).map_err(AppError::from)).await?;
    let body: Vec<OrderResponse> = orders.iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /orders
///
/// Places a new order. The order, its lines and the derived total are
/// persisted in a single database transaction; client-supplied status,
/// timestamp and total are ignored.
#[utoipa::path(
    post,
    path = "/orders",
    request_body = OrderRequest,
    responses(
        (status = 201, description = "Order placed", body = OrderResponse),
        (status = 400, description = "Invalid payload"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: Orders,
    body: web::Json<OrderRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    if body.lines.is_empty() {
        return Err(AppError::Validation(
            "Order must contain at least one line".to_string(),
        ));
    }
    let lines = parse_lines(&body.lines)?;
    let draft = NewOrder {
        customer_id: body.customer_id,
        payment: body.payment.map(PaymentData::from),
        payment_key: body.payment_key,
        note: body.note,
        tracking_code: body.tracking_code,
        invoice_url: body.invoice_url,
        lines,
    };

    let order = run_blocking(move || service.create_order(draft).map_err(AppError::from)).await?;
    Ok(HttpResponse::Created().json(OrderResponse::from(&order)))
}

/// PUT /orders/{id}
///
/// Full replacement: all scalar fields are overwritten with the payload's
/// values and the line list supersedes the stored one entirely. Lines absent
/// from the payload are deleted with the same save.
#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    service: Orders,
    path: web::Path<Uuid>,
    body: web::Json<OrderRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();

    let raw_total = body
        .total
        .ok_or_else(|| AppError::Validation("total is required".to_string()))?;
    let total = BigDecimal::from_str(&raw_total)
        .map_err(|e| AppError::Validation(format!("Invalid total '{}': {}", raw_total, e)))?;
    let lines = parse_lines(&body.lines)?;

    let update = OrderUpdate {
        customer_id: body.customer_id,
        status: body.status.unwrap_or(OrderStatus::Placed),
        total,
        payment: body.payment.map(PaymentData::from),
        payment_key: body.payment_key,
        note: body.note,
        tracking_code: body.tracking_code,
        invoice_url: body.invoice_url,
        lines,
    };

    let order =
        run_blocking(move || service.update_order(id, update).map_err(AppError::from)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(&order)))
}

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub status: String,
}

/// PATCH /orders/{id}/status?status=PAID
#[utoipa::path(
    patch,
    path = "/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
        ("status" = String, Query, description = "New status, e.g. PAID"),
    ),
    responses(
        (status = 200, description = "Status updated", body = OrderResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    service: Orders,
    path: web::Path<Uuid>,
    query: web::Query<StatusParams>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let status: OrderStatus = query.into_inner().status.parse().map_err(AppError::from)?;
    let order =
        run_blocking(move || service.update_status(id, status).map_err(AppError::from)).await?;
    Ok(HttpResponse::Ok().json(OrderResponse::from(&order)))
}

/// DELETE /orders/{id}
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
    ),
    responses(
        (status = 204, description = "Order deleted together with its lines"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    service: Orders,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    run_blocking(move || service.delete_order(id).map_err(AppError::from)).await?;
    Ok(HttpResponse::NoContent().finish())
}
