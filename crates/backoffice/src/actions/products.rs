//! Product mutations: create and delete.
//!
//! There is no edit entry point for products, despite the schema covering
//! it - the read surface never grew one, and inventing one here would change
//! the interface the presentation layer was built against.

use tracing::instrument;

use acme_core::ProductId;

use crate::assets::ResourceKind;
use crate::db::ProductRepository;
use crate::forms::{ProductForm, ProductSchema};
use crate::state::AppState;

use super::{DeleteOutcome, FormMessage, MutationOutcome};

/// Listing route products redirect to after a successful write.
pub const PRODUCTS_PATH: &str = "/products";

/// Create a product from raw form fields.
///
/// The validated amount is persisted exactly as submitted; no major-to-minor
/// unit conversion happens on this path.
#[instrument(skip(state, form))]
pub async fn create_product(state: &AppState, form: ProductForm) -> MutationOutcome {
    let schema = ProductSchema::new(state.config().image_policy);
    let fields = match schema.validate(&form, "Missing Fields. Failed to Create Product.") {
        Ok(fields) => fields,
        Err(errors) => return MutationOutcome::Invalid(errors),
    };

    let image_url = match state
        .assets()
        .save(ResourceKind::Product, form.image.as_ref())
        .await
    {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Asset write error: {e}");
            return MutationOutcome::Failed(FormMessage::database_error("Create Product"));
        }
    };

    let repository = ProductRepository::new(state.pool(), state.config().products_per_page);
    if let Err(e) = repository
        .insert(&fields.name, &image_url, fields.amount)
        .await
    {
        tracing::error!("Database error: {e}");
        return MutationOutcome::Failed(FormMessage::database_error("Create Product"));
    }

    state.cache().invalidate_products();
    MutationOutcome::Completed {
        redirect_to: PRODUCTS_PATH,
    }
}

/// Delete a product. Idempotent in effect, like customer deletes.
#[instrument(skip(state))]
pub async fn delete_product(state: &AppState, id: ProductId) -> DeleteOutcome {
    let repository = ProductRepository::new(state.pool(), state.config().products_per_page);
    if let Err(e) = repository.delete(id).await {
        tracing::error!("Database error: {e}");
        return DeleteOutcome::Failed(FormMessage::database_error("Delete Product"));
    }

    state.cache().invalidate_products();
    DeleteOutcome::Completed
}
