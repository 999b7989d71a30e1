//! Per-resource validation schemas for untrusted form input.
//!
//! Each schema coerces and validates raw multipart fields, producing either a
//! typed, trimmed record or a field-keyed error map plus a summary message.
//! Validation is side-effect free: nothing here touches storage or the
//! filesystem.
//!
//! The edit path reuses the create schema; forms always resubmit every
//! editable field, so there are no partial-update semantics.

use std::collections::BTreeMap;

use serde::Serialize;

// =============================================================================
// Error structure
// =============================================================================

/// Per-field validation errors plus a summary message.
///
/// Serialized as `{ "errors": { "name": ["..."] }, "message": "..." }`,
/// the shape the form components re-render from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub errors: BTreeMap<&'static str, Vec<String>>,
    pub message: String,
}

impl FieldErrors {
    fn new(errors: BTreeMap<&'static str, Vec<String>>, message: &str) -> Self {
        Self {
            errors,
            message: message.to_string(),
        }
    }
}

// =============================================================================
// Uploads
// =============================================================================

/// A raw uploaded file, as received from the form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original filename exactly as submitted.
    pub filename: String,
    /// MIME type reported by the client, if any.
    pub content_type: Option<String>,
    /// Raw file bytes.
    pub bytes: Vec<u8>,
}

/// Configurable upload validation rules.
///
/// All rules default to off, accepting any value including absent. The form
/// components were built against a surface that accepts anything; the
/// stricter checks stay available as configuration so they can be toggled
/// without code changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImagePolicy {
    /// Require a file to be present.
    pub require_file: bool,
    /// Require the file to be non-empty.
    pub require_nonempty: bool,
    /// Require a MIME type starting with `image/`.
    pub require_image_type: bool,
}

impl ImagePolicy {
    fn check(&self, image: Option<&ImageUpload>) -> Vec<String> {
        let mut errors = Vec::new();

        match image {
            None => {
                if self.require_file {
                    errors.push("Please upload an image file.".to_string());
                }
            }
            Some(upload) => {
                if self.require_nonempty && upload.bytes.is_empty() {
                    errors.push("Image file is required.".to_string());
                }
                if self.require_image_type {
                    let is_image = upload
                        .content_type
                        .as_deref()
                        .is_some_and(|ct| ct.starts_with("image/"));
                    if !is_image {
                        errors.push("File must be an image.".to_string());
                    }
                }
            }
        }

        errors
    }
}

// =============================================================================
// Customer schema
// =============================================================================

/// Raw customer form fields before validation.
#[derive(Debug, Clone, Default)]
pub struct CustomerForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub image: Option<ImageUpload>,
}

/// A validated, trimmed customer record (identifier excluded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerFields {
    pub name: String,
    pub email: String,
}

/// Validation schema for customer create/edit forms.
#[derive(Debug, Clone, Copy)]
pub struct CustomerSchema {
    image: ImagePolicy,
}

impl CustomerSchema {
    #[must_use]
    pub const fn new(image: ImagePolicy) -> Self {
        Self { image }
    }

    /// Validate a raw form, returning the typed record or the error map.
    ///
    /// `name` and `email` are required non-empty; email gets no format check
    /// beyond that. `summary` becomes the error map's message on failure.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] keyed by field name when any field fails.
    pub fn validate(
        &self,
        form: &CustomerForm,
        summary: &str,
    ) -> Result<CustomerFields, FieldErrors> {
        let mut errors: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();

        let name = trimmed(form.name.as_deref());
        if name.is_empty() {
            errors
                .entry("name")
                .or_default()
                .push("Please enter a name.".to_string());
        }

        let email = trimmed(form.email.as_deref());
        if email.is_empty() {
            errors
                .entry("email")
                .or_default()
                .push("Please enter an email.".to_string());
        }

        let image_errors = self.image.check(form.image.as_ref());
        if !image_errors.is_empty() {
            errors.insert("image", image_errors);
        }

        if errors.is_empty() {
            Ok(CustomerFields { name, email })
        } else {
            Err(FieldErrors::new(errors, summary))
        }
    }
}

// =============================================================================
// Product schema
// =============================================================================

/// Raw product form fields before validation.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: Option<String>,
    pub amount: Option<String>,
    pub image: Option<ImageUpload>,
}

/// A validated product record (identifier and opaque data payload excluded).
///
/// `amount` holds the submitted number unchanged. Forms submit major-unit
/// decimal strings, but no conversion to minor units happens on the write
/// path; only the single-record read divides by 100. Load-bearing quirk,
/// pinned by tests - do not "fix" one side without the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub amount: i32,
}

/// Validation schema for the product create form.
#[derive(Debug, Clone, Copy)]
pub struct ProductSchema {
    image: ImagePolicy,
}

impl ProductSchema {
    #[must_use]
    pub const fn new(image: ImagePolicy) -> Self {
        Self { image }
    }

    /// Validate a raw form, returning the typed record or the error map.
    ///
    /// `amount` is coerced from string to number and must be strictly greater
    /// than zero.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] keyed by field name when any field fails.
    pub fn validate(
        &self,
        form: &ProductForm,
        summary: &str,
    ) -> Result<ProductFields, FieldErrors> {
        let mut errors: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();

        let name = trimmed(form.name.as_deref());
        if name.is_empty() {
            errors
                .entry("name")
                .or_default()
                .push("Please enter a name.".to_string());
        }

        let amount = coerce_amount(form.amount.as_deref());
        if amount.is_none() {
            errors
                .entry("amount")
                .or_default()
                // Message text is load-bearing: the form components key off it.
                .push("Please enter a amount greater than $0.".to_string());
        }

        let image_errors = self.image.check(form.image.as_ref());
        if !image_errors.is_empty() {
            errors.insert("image", image_errors);
        }

        match (errors.is_empty(), amount) {
            (true, Some(amount)) => Ok(ProductFields { name, amount }),
            _ => Err(FieldErrors::new(errors, summary)),
        }
    }
}

/// Coerce a submitted amount string to a number, requiring it to be
/// strictly greater than zero and to fit the stored column type. Fractional
/// input rounds half away from zero, matching what the database cast would
/// do; a value past `i32::MAX` would only fail later at the store, so it is
/// rejected here with the same field error.
fn coerce_amount(raw: Option<&str>) -> Option<i32> {
    let value = raw?.trim().parse::<f64>().ok()?;
    if value > 0.0 && value.is_finite() {
        let rounded = value.round();
        if rounded <= f64::from(i32::MAX) {
            #[allow(clippy::cast_possible_truncation)]
            return Some(rounded as i32);
        }
    }
    None
}

fn trimmed(raw: Option<&str>) -> String {
    raw.unwrap_or_default().trim().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn customer_form(name: &str, email: &str) -> CustomerForm {
        CustomerForm {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            image: None,
        }
    }

    fn upload(filename: &str, content_type: Option<&str>, bytes: &[u8]) -> ImageUpload {
        ImageUpload {
            filename: filename.to_string(),
            content_type: content_type.map(String::from),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn test_customer_valid_form_trims_fields() {
        let schema = CustomerSchema::new(ImagePolicy::default());
        let fields = schema
            .validate(&customer_form("  Amy Burns  ", " amy@burns.com "), "nope")
            .unwrap();
        assert_eq!(fields.name, "Amy Burns");
        assert_eq!(fields.email, "amy@burns.com");
    }

    #[test]
    fn test_customer_missing_fields() {
        let schema = CustomerSchema::new(ImagePolicy::default());
        let errors = schema
            .validate(
                &CustomerForm::default(),
                "Missing Fields. Failed to Create Customer.",
            )
            .unwrap_err();

        assert_eq!(errors.message, "Missing Fields. Failed to Create Customer.");
        assert_eq!(errors.errors["name"], vec!["Please enter a name."]);
        assert_eq!(errors.errors["email"], vec!["Please enter an email."]);
    }

    #[test]
    fn test_customer_email_not_format_validated() {
        let schema = CustomerSchema::new(ImagePolicy::default());
        // Anything non-empty passes; no stricter check exists.
        assert!(schema.validate(&customer_form("Amy", "not-an-email"), "x").is_ok());
    }

    #[test]
    fn test_customer_image_accepted_unconditionally_by_default() {
        let schema = CustomerSchema::new(ImagePolicy::default());
        let mut form = customer_form("Amy", "amy@burns.com");
        form.image = Some(upload("cv.pdf", Some("application/pdf"), &[]));
        assert!(schema.validate(&form, "x").is_ok());

        form.image = None;
        assert!(schema.validate(&form, "x").is_ok());
    }

    #[test]
    fn test_image_policy_require_file() {
        let policy = ImagePolicy {
            require_file: true,
            ..ImagePolicy::default()
        };
        let schema = CustomerSchema::new(policy);
        let errors = schema.validate(&customer_form("Amy", "amy@burns.com"), "x").unwrap_err();
        assert_eq!(errors.errors["image"], vec!["Please upload an image file."]);
    }

    #[test]
    fn test_image_policy_requires_image_type_and_content() {
        let policy = ImagePolicy {
            require_file: true,
            require_nonempty: true,
            require_image_type: true,
        };
        let schema = CustomerSchema::new(policy);

        let mut form = customer_form("Amy", "amy@burns.com");
        form.image = Some(upload("cv.pdf", Some("application/pdf"), &[]));
        let errors = schema.validate(&form, "x").unwrap_err();
        assert_eq!(
            errors.errors["image"],
            vec!["Image file is required.", "File must be an image."]
        );

        form.image = Some(upload("pic.png", Some("image/png"), b"png-bytes"));
        assert!(schema.validate(&form, "x").is_ok());
    }

    #[test]
    fn test_product_valid_form() {
        let schema = ProductSchema::new(ImagePolicy::default());
        let fields = schema
            .validate(
                &ProductForm {
                    name: Some("Widget".to_string()),
                    amount: Some("25".to_string()),
                    image: None,
                },
                "x",
            )
            .unwrap();
        assert_eq!(fields.name, "Widget");
        // Submitted as-is: no conversion from dollars to cents on write.
        assert_eq!(fields.amount, 25);
    }

    #[test]
    fn test_product_amount_must_be_positive() {
        let schema = ProductSchema::new(ImagePolicy::default());
        for bad in ["0", "-5", "abc", ""] {
            let errors = schema
                .validate(
                    &ProductForm {
                        name: Some("Widget".to_string()),
                        amount: Some(bad.to_string()),
                        image: None,
                    },
                    "Missing Fields. Failed to Create Product.",
                )
                .unwrap_err();
            assert_eq!(
                errors.errors["amount"],
                vec!["Please enter a amount greater than $0."],
                "amount {bad:?} should fail"
            );
            assert_eq!(errors.message, "Missing Fields. Failed to Create Product.");
        }
    }

    #[test]
    fn test_product_amount_overflowing_storage_is_rejected() {
        let schema = ProductSchema::new(ImagePolicy::default());
        for huge in ["1e10", "2147483648", "99999999999"] {
            let errors = schema
                .validate(
                    &ProductForm {
                        name: Some("Widget".to_string()),
                        amount: Some(huge.to_string()),
                        image: None,
                    },
                    "x",
                )
                .unwrap_err();
            assert_eq!(
                errors.errors["amount"],
                vec!["Please enter a amount greater than $0."],
                "amount {huge:?} should fail"
            );
        }
        // The largest storable value still passes.
        let fields = schema
            .validate(
                &ProductForm {
                    name: Some("Widget".to_string()),
                    amount: Some("2147483647".to_string()),
                    image: None,
                },
                "x",
            )
            .unwrap();
        assert_eq!(fields.amount, i32::MAX);
    }

    #[test]
    fn test_product_amount_missing() {
        let schema = ProductSchema::new(ImagePolicy::default());
        let errors = schema.validate(&ProductForm::default(), "x").unwrap_err();
        assert!(errors.errors.contains_key("amount"));
        assert!(errors.errors.contains_key("name"));
    }

    #[test]
    fn test_product_fractional_amount_rounds() {
        let schema = ProductSchema::new(ImagePolicy::default());
        let fields = schema
            .validate(
                &ProductForm {
                    name: Some("Widget".to_string()),
                    amount: Some("12.5".to_string()),
                    image: None,
                },
                "x",
            )
            .unwrap();
        assert_eq!(fields.amount, 13);
    }

    #[test]
    fn test_field_errors_serialize_shape() {
        let schema = CustomerSchema::new(ImagePolicy::default());
        let errors = schema
            .validate(&CustomerForm::default(), "Missing Fields. Failed to Create Customer.")
            .unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["errors"]["name"][0], "Please enter a name.");
        assert_eq!(json["message"], "Missing Fields. Failed to Create Customer.");
    }
}
