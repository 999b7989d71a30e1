//! Product routes: list, detail, create, delete. No edit route exists.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    response::Response,
    routing::{get, post},
};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use acme_core::ProductId;

use crate::actions::products::{create_product, delete_product};
use crate::cache::{ListKey, ProductListPage};
use crate::db::{PageRequest, Product, ProductDetail, ProductRepository};
use crate::error::{AppError, Result};
use crate::state::AppState;

use super::customers::ListParams;
use super::{DeleteResponse, delete_response, mutation_response, read_image_field, read_text_field};

/// Build the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(index).post(create))
        .route("/products/{id}", get(show))
        .route("/products/{id}/delete", post(delete))
}

/// One page of the product list, amounts in raw minor units.
#[derive(Debug, Serialize)]
pub struct ProductsListResponse {
    pub products: Vec<Product>,
    pub total_pages: u32,
}

/// Product list: filtered, paginated, descending by name.
#[instrument(skip(state))]
async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ProductsListResponse>> {
    let request = PageRequest::from_raw(params.query.as_deref(), params.page.as_deref());
    let key = ListKey {
        query: request.query.clone(),
        page: request.page,
    };

    if let Some(cached) = state.cache().get_products(&key).await {
        return Ok(Json(ProductsListResponse {
            products: cached.products.clone(),
            total_pages: cached.total_pages,
        }));
    }

    let repository = ProductRepository::new(state.pool(), state.config().products_per_page);
    let products = repository.list_filtered(&request).await?;
    let total_pages = repository.count_pages(&request).await?;

    state
        .cache()
        .put_products(
            key,
            Arc::new(ProductListPage {
                products: products.clone(),
                total_pages,
            }),
        )
        .await;

    Ok(Json(ProductsListResponse {
        products,
        total_pages,
    }))
}

/// Product detail, amount converted to major units on this path only.
#[instrument(skip(state))]
async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<ProductDetail>> {
    let repository = ProductRepository::new(state.pool(), state.config().products_per_page);
    let product = repository
        .get_by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(product))
}

#[instrument(skip(state, multipart))]
async fn create(State(state): State<AppState>, multipart: Multipart) -> Result<Response> {
    let form = read_product_form(multipart).await?;
    Ok(mutation_response(create_product(&state, form).await))
}

#[instrument(skip(state))]
async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<DeleteResponse> {
    delete_response(delete_product(&state, ProductId::new(id)).await)
}

/// Pull the product form fields out of a multipart submission. Unknown
/// parts are skipped.
async fn read_product_form(
    mut multipart: Multipart,
) -> std::result::Result<crate::forms::ProductForm, AppError> {
    let mut form = crate::forms::ProductForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("name") => form.name = Some(read_text_field(field).await?),
            Some("amount") => form.amount = Some(read_text_field(field).await?),
            Some("image") => form.image = read_image_field(field).await?,
            _ => {}
        }
    }

    Ok(form)
}
