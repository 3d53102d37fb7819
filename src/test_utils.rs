//! Shared test utilities for LedgerEdge.
//!
//! Helpers for in-memory databases, entity builders with sensible defaults, and a
//! scripted [`TextGenerator`] standing in for the remote model.

use crate::{
    config::database,
    core::{customer, record as records},
    entities::{self, RecordType, financial_record},
    errors::{Error, Result},
    gateway::{InsightGateway, TextGenerator},
    models::NewCustomer,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::Notify;

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = database::create_connection("sqlite::memory:").await?;
    database::create_tables(&db).await?;
    Ok(db)
}

/// Parses a `YYYY-MM-DD` literal.
///
/// # Panics
/// Panics on a malformed literal; test input only.
#[allow(clippy::expect_used)]
#[must_use]
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid test date")
}

/// Parses an exact decimal literal such as `"-120.50"`.
///
/// # Panics
/// Panics on a malformed literal; test input only.
#[allow(clippy::expect_used)]
#[must_use]
pub fn amount(value: &str) -> Decimal {
    Decimal::from_str_exact(value).expect("valid test amount")
}

/// Customer input with placeholder contact details.
#[must_use]
pub fn new_customer(name: &str) -> NewCustomer {
    NewCustomer {
        name: name.to_string(),
        email: format!("{}@example.test", name.to_lowercase().replace(' ', ".")),
        phone: "555-0100".to_string(),
    }
}

/// An unsaved record owned by customer `C1` with an empty description.
#[must_use]
pub fn record(id: &str, on: &str, value: &str, record_type: RecordType) -> financial_record::Model {
    financial_record::Model {
        id: id.to_string(),
        customer_id: "C1".to_string(),
        date: date(on),
        amount: amount(value),
        record_type,
        description: String::new(),
    }
}

/// Creates a test customer with placeholder contact details.
pub async fn create_test_customer(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::customer::Model> {
    customer::create_customer(db, new_customer(name)).await
}

/// Creates a test record with description `"Test record"`.
pub async fn create_test_record(
    db: &DatabaseConnection,
    customer_id: &str,
    on: &str,
    value: &str,
    record_type: RecordType,
) -> Result<financial_record::Model> {
    records::create_record(
        db,
        customer_id,
        date(on),
        amount(value),
        record_type,
        "Test record".to_string(),
    )
    .await
}

/// Sets up a database with one customer.
/// Returns (db, customer) for common test scenarios.
pub async fn setup_with_customer() -> Result<(DatabaseConnection, entities::customer::Model)> {
    let db = setup_test_db().await?;
    let customer = create_test_customer(&db, "Test Customer").await?;
    Ok((db, customer))
}

/// A scripted reply from [`ScriptedGenerator`].
#[derive(Debug, Clone)]
pub enum Reply {
    /// Return this text
    Text(String),
    /// Fail with a gateway error
    Fail(String),
    /// Sleep before returning the text
    Slow(Duration, String),
    /// Return the text once the [`Notify`] is signalled
    Gated(Arc<Notify>, String),
}

/// [`TextGenerator`] that replays queued replies and records every prompt.
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Generator that answers with `replies` in order, then fails.
    #[must_use]
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::default(),
        })
    }

    /// Prompts received so far.
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    #[allow(clippy::unwrap_used)]
    async fn generate(&self, prompt: &str, _response_schema: &serde_json::Value) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(message)) => Err(Error::gateway(message)),
            Some(Reply::Slow(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            Some(Reply::Gated(gate, text)) => {
                gate.notified().await;
                Ok(text)
            }
            None => Err(Error::gateway("no scripted reply left")),
        }
    }
}

/// Gateway over `generator` with a short timeout.
#[must_use]
pub fn scripted_gateway(generator: Arc<ScriptedGenerator>) -> InsightGateway {
    InsightGateway::new(generator, Duration::from_millis(200))
}
