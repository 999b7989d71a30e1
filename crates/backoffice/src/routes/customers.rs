//! Customer routes: list, detail, create, edit, delete.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    response::Response,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use acme_core::CustomerId;

use crate::actions::customers::{create_customer, delete_customer, edit_customer};
use crate::cache::{CustomerListPage, ListKey};
use crate::db::{Customer, CustomerRepository, CustomerWithTotals, PageRequest};
use crate::error::{AppError, Result};
use crate::state::AppState;

use super::{DeleteResponse, delete_response, mutation_response, read_image_field, read_text_field};

/// Build the customer router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customers", get(index).post(create))
        .route("/customers/{id}", get(show).post(edit))
        .route("/customers/{id}/delete", post(delete))
}

/// List query parameters, raw. The page deliberately arrives as a string so
/// junk input can fall back to page 1 instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub query: Option<String>,
    pub page: Option<String>,
}

/// One page of the customer list with rollups.
#[derive(Debug, Serialize)]
pub struct CustomersListResponse {
    pub customers: Vec<CustomerWithTotals>,
    pub total_pages: u32,
}

/// Customer list: filtered, paginated, rollups recomputed per read unless
/// the cached page is still fresh.
#[instrument(skip(state))]
async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<CustomersListResponse>> {
    let request = PageRequest::from_raw(params.query.as_deref(), params.page.as_deref());
    let key = ListKey {
        query: request.query.clone(),
        page: request.page,
    };

    if let Some(cached) = state.cache().get_customers(&key).await {
        return Ok(Json(CustomersListResponse {
            customers: cached.customers.clone(),
            total_pages: cached.total_pages,
        }));
    }

    let repository = CustomerRepository::new(state.pool(), state.config().customers_per_page);
    let customers = repository.list_filtered(&request).await?;
    let total_pages = repository.count_pages(&request).await?;

    state
        .cache()
        .put_customers(
            key,
            Arc::new(CustomerListPage {
                customers: customers.clone(),
                total_pages,
            }),
        )
        .await;

    Ok(Json(CustomersListResponse {
        customers,
        total_pages,
    }))
}

/// Customer detail, or 404 when the ID matches no row.
#[instrument(skip(state))]
async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Customer>> {
    let repository = CustomerRepository::new(state.pool(), state.config().customers_per_page);
    let customer = repository
        .get_by_id(CustomerId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    Ok(Json(customer))
}

#[instrument(skip(state, multipart))]
async fn create(State(state): State<AppState>, multipart: Multipart) -> Result<Response> {
    let form = read_customer_form(multipart).await?;
    Ok(mutation_response(create_customer(&state, form).await))
}

#[instrument(skip(state, multipart))]
async fn edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Response> {
    let form = read_customer_form(multipart).await?;
    Ok(mutation_response(
        edit_customer(&state, CustomerId::new(id), form).await,
    ))
}

#[instrument(skip(state))]
async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<DeleteResponse> {
    delete_response(delete_customer(&state, CustomerId::new(id)).await)
}

/// Pull the customer form fields out of a multipart submission. Unknown
/// parts are skipped.
async fn read_customer_form(
    mut multipart: Multipart,
) -> std::result::Result<crate::forms::CustomerForm, AppError> {
    let mut form = crate::forms::CustomerForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("name") => form.name = Some(read_text_field(field).await?),
            Some("email") => form.email = Some(read_text_field(field).await?),
            Some("image") => form.image = read_image_field(field).await?,
            _ => {}
        }
    }

    Ok(form)
}
