use actix_web::{web, HttpResponse};
use diesel::prelude::*;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::customer::{Customer, CustomerChangeset, NewCustomer};
use crate::schema::customers;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CustomerRequest {
    pub name: String,
    pub document: String,
    pub street: Option<String>,
    pub number: Option<String>,
    pub district: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NameSearchParams {
    pub name: String,
}

fn validate(body: &CustomerRequest) -> Result<(), AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".to_string()));
    }
    if body.document.trim().is_empty() {
        return Err(AppError::Validation("document is required".to_string()));
    }
    Ok(())
}

/// GET /customers
#[utoipa::path(
    get,
    path = "/customers",
    responses(
        (status = 200, description = "All customers", body = [Customer]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn list_customers(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let rows = web::block(move || {
        let mut conn = pool.get()?;
        customers::table
            .order(customers::name.asc())
            .select(Customer::as_select())
            .load(&mut conn)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(rows))
}

/// GET /customers/search?name=xxx
#[utoipa::path(
    get,
    path = "/customers/search",
    params(
        ("name" = String, Query, description = "Case-insensitive name fragment"),
    ),
    responses(
        (status = 200, description = "Matching customers", body = [Customer]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn search_customers(
    pool: web::Data<DbPool>,
    query: web::Query<NameSearchParams>,
) -> Result<HttpResponse, AppError> {
    let pattern = format!("%{}%", query.into_inner().name);
    let rows = web::block(move || {
        let mut conn = pool.get()?;
        customers::table
            .filter(customers::name.ilike(pattern))
            .order(customers::name.asc())
            .select(Customer::as_select())
            .load(&mut conn)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(rows))
}

/// GET /customers/{id}
#[utoipa::path(
    get,
    path = "/customers/{id}",
    params(
        ("id" = Uuid, Path, description = "Customer UUID"),
    ),
    responses(
        (status = 200, description = "Customer found", body = Customer),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn get_customer(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let row = web::block(move || {
        let mut conn = pool.get()?;
        customers::table
            .find(id)
            .select(Customer::as_select())
            .first(&mut conn)
            .optional()
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    match row {
        Some(customer) => Ok(HttpResponse::Ok().json(customer)),
        None => Err(AppError::NotFound),
    }
}

/// POST /customers
#[utoipa::path(
    post,
    path = "/customers",
    request_body = CustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, description = "Invalid payload"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn create_customer(
    pool: web::Data<DbPool>,
    body: web::Json<CustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    validate(&body)?;

    let created = web::block(move || {
        let mut conn = pool.get()?;
        diesel::insert_into(customers::table)
            .values(&NewCustomer {
                id: Uuid::new_v4(),
                name: body.name,
                document: body.document,
                street: body.street,
                number: body.number,
                district: body.district,
                email: body.email,
                phone: body.phone,
            })
            .returning(Customer::as_returning())
            .get_result(&mut conn)
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(created))
}

/// PUT /customers/{id}
#[utoipa::path(
    put,
    path = "/customers/{id}",
    params(
        ("id" = Uuid, Path, description = "Customer UUID"),
    ),
    request_body = CustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = Customer),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn update_customer(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CustomerRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    validate(&body)?;

    let updated = web::block(move || {
        let mut conn = pool.get()?;
        diesel::update(customers::table.find(id))
            .set(&CustomerChangeset {
                name: body.name,
                document: body.document,
                street: body.street,
                number: body.number,
                district: body.district,
                email: body.email,
                phone: body.phone,
            })
            .returning(Customer::as_returning())
            .get_result(&mut conn)
            .optional()
            .map_err(AppError::from)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    match updated {
        Some(customer) => Ok(HttpResponse::Ok().json(customer)),
        None => Err(AppError::NotFound),
    }
}

/// DELETE /customers/{id}
#[utoipa::path(
    delete,
    path = "/customers/{id}",
    params(
        ("id" = Uuid, Path, description = "Customer UUID"),
    ),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "Customer not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || {
        let mut conn = pool.get()?;
        let deleted = diesel::delete(customers::table.find(id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
