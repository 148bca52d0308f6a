use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use serde::Deserialize;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::product::{NewProduct, Product, ProductChangeset};
use crate::schema::products;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub name: String,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
}

#[derive(Debug, Deserialize)]
pub struct NameSearchParams {
    pub name: String,
}

fn parse_product(body: ProductRequest) -> Result<(String, BigDecimal), AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    let unit_price = BigDecimal::from_str(&body.unit_price).map_err(|e| {
        AppError::Validation(format!("Invalid unit_price '{}': {}", body.unit_price, e))
    })?;
    if unit_price < BigDecimal::from(0) {
        return Err(AppError::Validation(format!(
            "unit_price must not be negative, got {}",
            body.unit_price
        )));
    }
    Ok((body.name, unit_price))
}

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products", body = [Product]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn list_products(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let rows = web::block(move || {
        let mut conn = pool.get()?;
        products::table
            .order(products::name.asc())
            .select(Product::as_select())
            .load(&mut conn)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(rows))
}

/// GET /products/search?name=xxx
#[utoipa::path(
    get,
    path = "/products/search",
    params(
        ("name" = String, Query, description = "Case-insensitive name fragment"),
    ),
    responses(
        (status = 200, description = "Matching products", body = [Product]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn search_products(
    pool: web::Data<DbPool>,
    query: web::Query<NameSearchParams>,
) -> Result<HttpResponse, AppError> {
    let pattern = format!("%{}%", query.into_inner().name);
    let rows = web::block(move || {
        let mut conn = pool.get()?;
        products::table
            .filter(products::name.ilike(pattern))
            .order(products::name.asc())
            .select(Product::as_select())
            .load(&mut conn)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(rows))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn get_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let row = web::block(move || {
        let mut conn = pool.get()?;
        products::table
            .find(id)
            .select(Product::as_select())
            .first(&mut conn)
            .optional()
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    match row {
        Some(product) => Ok(HttpResponse::Ok().json(product)),
        None => Err(AppError::NotFound),
    }
}

/// POST /products
#[utoipa::path(
    post,
    path = "/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid payload"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn create_product(
    pool: web::Data<DbPool>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let (name, unit_price) = parse_product(body.into_inner())?;

    let created = web::block(move || {
        let mut conn = pool.get()?;
        diesel::insert_into(products::table)
            .values(&NewProduct {
                id: Uuid::new_v4(),
                name,
                unit_price,
            })
            .returning(Product::as_returning())
            .get_result(&mut conn)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(created))
}

/// PUT /products/{id}
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn update_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let (name, unit_price) = parse_product(body.into_inner())?;

    let updated = web::block(move || {
        let mut conn = pool.get()?;
        diesel::update(products::table.find(id))
            .set(&ProductChangeset { name, unit_price })
            .returning(Product::as_returning())
            .get_result(&mut conn)
            .optional()
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    match updated {
        Some(product) => Ok(HttpResponse::Ok().json(product)),
        None => Err(AppError::NotFound),
    }
}

/// DELETE /products/{id}
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product UUID"),
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn delete_product(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || {
        let mut conn = pool.get()?;
        let deleted = diesel::delete(products::table.find(id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
