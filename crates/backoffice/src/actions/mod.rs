//! Mutation orchestration: validate, persist asset, write, invalidate.
//!
//! Every mutation runs the same state machine, each invocation independent
//! and stateless:
//!
//! 1. Validate the raw form. On failure, return the field errors
//!    immediately; no store or filesystem write happens.
//! 2. Persist the uploaded asset, if any. A filesystem failure aborts the
//!    mutation here - the database write never runs.
//! 3. Execute a single parameterized write. On failure, return a generic
//!    `Database Error: ...` message without propagating the raw error. The
//!    asset written in step 2 is not removed (known partial-failure gap; the
//!    two stores are not transactionally coordinated).
//! 4. Invalidate the resource's cached list. Create and edit then redirect
//!    to the listing route; delete returns a status for the caller to
//!    re-render with.
//!
//! Nothing here retries, and a write that has started runs to completion or
//! failure - there is no cooperative cancellation mid-mutation.

pub mod customers;
pub mod products;

use serde::Serialize;

use crate::forms::FieldErrors;

/// A soft failure message, mirroring the `{ message }` shape the forms
/// re-render from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormMessage {
    pub message: String,
}

impl FormMessage {
    fn database_error(action: &str) -> Self {
        Self {
            message: format!("Database Error: Failed to {action}."),
        }
    }
}

/// Outcome of a create or edit mutation.
#[derive(Debug)]
pub enum MutationOutcome {
    /// The write landed; the caller should transfer control to the
    /// resource's listing route.
    Completed {
        redirect_to: &'static str,
    },
    /// Validation failed; field errors for the form to re-render.
    Invalid(FieldErrors),
    /// The asset or store write failed; generic message only. Asset
    /// failures deliberately share the database wording - current behavior
    /// does not distinguish them outwardly.
    Failed(FormMessage),
}

/// Outcome of a delete mutation. No redirect: the caller re-renders the
/// list it is already on.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// Row gone (or never there - the two are indistinguishable here) and
    /// the cached list invalidated.
    Completed,
    /// The delete statement failed; generic message only.
    Failed(FormMessage),
}
