//! Invoice status values.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Payment status of an invoice.
///
/// Only `pending` and `paid` participate in customer rollups; any other
/// stored value is carried through untouched and excluded from aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
    /// A status value outside the aggregated set.
    #[serde(untagged)]
    Other(String),
}

impl InvoiceStatus {
    /// The stored string form of this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for InvoiceStatus {
    fn from(value: &str) -> Self {
        match value {
            "pending" => Self::Pending,
            "paid" => Self::Paid,
            other => Self::Other(other.to_owned()),
        }
    }
}
