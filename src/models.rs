//! Domain types that sit around the persisted entities.
//!
//! The AI annotations (`aiInsight`, `isKeyRecord`) are view-layer state and live on
//! [`AnnotatedRecord`], a wrapper that can always be stripped back to the stored row.

use crate::{
    entities::{RecordType, customer, financial_record},
    errors::{Error, Result},
};
use rust_decimal::{Decimal, RoundingStrategy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Generates a fresh customer id.
#[must_use]
pub fn new_customer_id() -> String {
    format!("C{}", Uuid::new_v4().simple())
}

/// Generates a fresh financial record id.
#[must_use]
pub fn new_record_id() -> String {
    format!("R{}", Uuid::new_v4().simple())
}

impl RecordType {
    /// Every record type, in display order.
    pub const ALL: [Self; 4] = [Self::Invoice, Self::Payment, Self::Refund, Self::Credit];

    /// Lowercase name as stored and serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Payment => "payment",
            Self::Refund => "refund",
            Self::Credit => "credit",
        }
    }

    /// Payments and credits reduce what the customer owes and are stored negative.
    #[must_use]
    pub const fn is_outflow(self) -> bool {
        matches!(self, Self::Payment | Self::Credit)
    }

    /// Applies the sign convention to `amount`, ignoring whatever sign the caller gave.
    #[must_use]
    pub fn normalize_amount(self, amount: Decimal) -> Decimal {
        if self.is_outflow() {
            -amount.abs()
        } else {
            amount.abs()
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::validation(format!(
                    "Unrecognized record type '{s}': expected invoice, payment, refund or credit"
                ))
            })
    }
}

/// Input for creating a customer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewCustomer {
    /// Display name
    pub name: String,
    /// Contact email
    #[serde(default)]
    pub email: String,
    /// Contact phone
    #[serde(default)]
    pub phone: String,
}

/// Raw, unvalidated record input as it arrives from a form or API body.
///
/// `date` and `record_type` stay strings here so malformed values become
/// [`Error::Validation`] instead of a deserialization failure.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInput {
    /// Date as `YYYY-MM-DD`
    pub date: String,
    /// Amount in any sign; normalized from the type
    ///
    /// Accepts a JSON number or a decimal string.
    pub amount: Decimal,
    /// One of invoice, payment, refund, credit
    #[serde(rename = "type")]
    pub record_type: String,
    /// Optional description, stored as empty text when absent
    #[serde(default)]
    pub description: String,
}

/// A stored record plus the transient AI annotation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedRecord {
    /// The authoritative stored record
    #[serde(flatten)]
    pub record: financial_record::Model,
    /// Short AI explanation, present only after a highlight pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_insight: Option<String>,
    /// Whether the AI judged the record noteworthy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_key_record: Option<bool>,
}

impl AnnotatedRecord {
    /// Drops the annotations and returns the stored record.
    #[must_use]
    pub fn into_record(self) -> financial_record::Model {
        self.record
    }

    /// Record id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.record.id
    }
}

impl From<financial_record::Model> for AnnotatedRecord {
    fn from(record: financial_record::Model) -> Self {
        Self {
            record,
            ai_insight: None,
            is_key_record: None,
        }
    }
}

/// Anything that exposes the stored fields of a financial record.
///
/// Lets the aggregation and view engines accept plain and annotated records alike.
pub trait RecordFields {
    /// The stored record
    fn record(&self) -> &financial_record::Model;
}

impl RecordFields for financial_record::Model {
    fn record(&self) -> &financial_record::Model {
        self
    }
}

impl RecordFields for AnnotatedRecord {
    fn record(&self) -> &financial_record::Model {
        &self.record
    }
}

/// AI-derived fields for one record, keyed by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordAnnotation {
    /// Id of the annotated record
    pub id: String,
    /// Short explanation of why the record matters
    #[serde(default)]
    pub ai_insight: Option<String>,
    /// Whether the record was flagged as a key record
    pub is_key_record: bool,
}

/// Customer plus its records, as shown on a profile page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerProfile {
    /// The customer
    pub customer: customer::Model,
    /// The customer's records in store order
    pub records: Vec<financial_record::Model>,
    /// Totals over `records`
    pub stats: crate::core::aggregate::Stats,
}

/// Formats an amount as US dollars, e.g. `$1,234.50` or `-$20.00`.
///
/// Rounds half away from zero to whole cents.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let cents = format!("{rounded:.2}");
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{frac}")
}
