//! Storage abstraction for customers and financial records.
//!
//! [`LedgerStore`] is the capability the orchestration layer depends on.
//! [`SqlStore`] persists through `SeaORM`; [`MemoryStore`] keeps everything in a
//! process-local map for demos and tests. Both honor the same contract:
//! customers list by name, records list newest date first with insertion order
//! breaking ties, updates and deletes of unknown ids are `NotFound`, and deleting
//! a customer removes its records atomically.

pub mod memory;
pub mod sql;

pub use memory::MemoryStore;
pub use sql::SqlStore;

use crate::{
    entities::{RecordType, customer, financial_record},
    errors::Result,
    models::NewCustomer,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Persistence operations for the two ledger entities.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// All customers ordered by name ascending.
    async fn list_customers(&self) -> Result<Vec<customer::Model>>;

    /// One customer, or `NotFound`.
    async fn get_customer(&self, id: &str) -> Result<customer::Model>;

    /// Inserts a customer with a fresh id.
    async fn create_customer(&self, input: NewCustomer) -> Result<customer::Model>;

    /// Replaces the mutable fields of an existing customer.
    async fn update_customer(&self, customer: customer::Model) -> Result<customer::Model>;

    /// Deletes a customer and all of its records.
    async fn delete_customer(&self, id: &str) -> Result<()>;

    /// A customer's records, date descending.
    async fn list_records(&self, customer_id: &str) -> Result<Vec<financial_record::Model>>;

    /// One record, or `NotFound`.
    async fn get_record(&self, id: &str) -> Result<financial_record::Model>;

    /// Inserts a record for an existing customer, storing `amount` as given.
    async fn create_record(
        &self,
        customer_id: &str,
        date: NaiveDate,
        amount: Decimal,
        record_type: RecordType,
        description: String,
    ) -> Result<financial_record::Model>;

    /// Replaces date, amount, type and description of an existing record.
    async fn update_record(&self, record: financial_record::Model)
    -> Result<financial_record::Model>;

    /// Deletes one record.
    async fn delete_record(&self, id: &str) -> Result<()>;
}
