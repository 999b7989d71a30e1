//! Customer mutations: create, edit, delete.

use tracing::instrument;

use acme_core::CustomerId;

use crate::assets::ResourceKind;
use crate::db::CustomerRepository;
use crate::forms::{CustomerForm, CustomerSchema};
use crate::state::AppState;

use super::{DeleteOutcome, FormMessage, MutationOutcome};

/// Listing route customers redirect to after a successful write.
pub const CUSTOMERS_PATH: &str = "/customers";

/// Create a customer from raw form fields.
#[instrument(skip(state, form))]
pub async fn create_customer(state: &AppState, form: CustomerForm) -> MutationOutcome {
    let schema = CustomerSchema::new(state.config().image_policy);
    let fields = match schema.validate(&form, "Missing Fields. Failed to Create Customer.") {
        Ok(fields) => fields,
        Err(errors) => return MutationOutcome::Invalid(errors),
    };

    let image_url = match state
        .assets()
        .save(ResourceKind::Customer, form.image.as_ref())
        .await
    {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Asset write error: {e}");
            return MutationOutcome::Failed(FormMessage::database_error("Create Customer"));
        }
    };

    let repository = CustomerRepository::new(state.pool(), state.config().customers_per_page);
    if let Err(e) = repository
        .insert(&fields.name, &fields.email, &image_url)
        .await
    {
        tracing::error!("Database error: {e}");
        return MutationOutcome::Failed(FormMessage::database_error("Create Customer"));
    }

    state.cache().invalidate_customers();
    MutationOutcome::Completed {
        redirect_to: CUSTOMERS_PATH,
    }
}

/// Edit a customer, replacing every editable field.
///
/// The edit form always resubmits all fields, so `image_url` ends up empty
/// when no new file was uploaded.
#[instrument(skip(state, form))]
pub async fn edit_customer(
    state: &AppState,
    id: CustomerId,
    form: CustomerForm,
) -> MutationOutcome {
    let schema = CustomerSchema::new(state.config().image_policy);
    let fields = match schema.validate(&form, "Missing Fields. Failed to Edit Customer.") {
        Ok(fields) => fields,
        Err(errors) => return MutationOutcome::Invalid(errors),
    };

    let image_url = match state
        .assets()
        .save(ResourceKind::Customer, form.image.as_ref())
        .await
    {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Asset write error: {e}");
            return MutationOutcome::Failed(FormMessage::database_error("Edit Customer"));
        }
    };

    let repository = CustomerRepository::new(state.pool(), state.config().customers_per_page);
    if let Err(e) = repository
        .update(id, &fields.name, &fields.email, &image_url)
        .await
    {
        tracing::error!("Database error: {e}");
        return MutationOutcome::Failed(FormMessage::database_error("Edit Customer"));
    }

    state.cache().invalidate_customers();
    MutationOutcome::Completed {
        redirect_to: CUSTOMERS_PATH,
    }
}

/// Delete a customer. Idempotent in effect: a nonexistent ID deletes
/// successfully and still invalidates the cached list.
#[instrument(skip(state))]
pub async fn delete_customer(state: &AppState, id: CustomerId) -> DeleteOutcome {
    let repository = CustomerRepository::new(state.pool(), state.config().customers_per_page);
    if let Err(e) = repository.delete(id).await {
        tracing::error!("Database error: {e}");
        return DeleteOutcome::Failed(FormMessage::database_error("Delete Customer"));
    }

    state.cache().invalidate_customers();
    DeleteOutcome::Completed
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::BackofficeConfig;
    use crate::forms::ImageUpload;
    use secrecy::SecretString;
    use std::path::Path;

    /// State over a lazy pool that never connects: reaching the database
    /// in these tests would hang the connect, so passing means the
    /// validation short-circuit fired before any store access.
    fn state_without_database(asset_root: &Path) -> AppState {
        let config = BackofficeConfig {
            database_url: SecretString::from("postgres://localhost/unused"),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            asset_root: asset_root.to_path_buf(),
            customers_per_page: 6,
            products_per_page: 6,
            image_policy: crate::forms::ImagePolicy::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost:1/unused")
            .unwrap();
        AppState::new(config, pool)
    }

    #[tokio::test]
    async fn test_invalid_form_short_circuits_before_any_write() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_without_database(dir.path());

        let form = CustomerForm {
            name: None,
            email: None,
            image: Some(ImageUpload {
                filename: "a.png".to_string(),
                content_type: Some("image/png".to_string()),
                bytes: b"png".to_vec(),
            }),
        };

        let outcome = create_customer(&state, form).await;

        let MutationOutcome::Invalid(errors) = outcome else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.message, "Missing Fields. Failed to Create Customer.");
        // The asset write must not have run either.
        assert!(!dir.path().join("customers").exists());
    }

    #[tokio::test]
    async fn test_edit_uses_its_own_summary_message() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_without_database(dir.path());

        let outcome =
            edit_customer(&state, CustomerId::generate(), CustomerForm::default()).await;

        let MutationOutcome::Invalid(errors) = outcome else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.message, "Missing Fields. Failed to Edit Customer.");
    }
}
