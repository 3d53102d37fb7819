//! [`LedgerStore`] backed by a `SeaORM` database connection.

use super::LedgerStore;
use crate::{
    core::{customer as customers, record as records},
    entities::{RecordType, customer, financial_record},
    errors::{Error, Result},
    models::NewCustomer,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Relational store over the `customers` and `financial_records` tables.
#[derive(Debug)]
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    /// Wraps an open connection whose tables already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LedgerStore for SqlStore {
    async fn list_customers(&self) -> Result<Vec<customer::Model>> {
        customers::list_customers(&self.db).await
    }

    async fn get_customer(&self, id: &str) -> Result<customer::Model> {
        customers::get_customer_by_id(&self.db, id)
            .await?
            .ok_or_else(|| Error::customer_not_found(id))
    }

    async fn create_customer(&self, input: NewCustomer) -> Result<customer::Model> {
        customers::create_customer(&self.db, input).await
    }

    async fn update_customer(&self, customer: customer::Model) -> Result<customer::Model> {
        customers::update_customer(&self.db, customer).await
    }

    async fn delete_customer(&self, id: &str) -> Result<()> {
        customers::delete_customer(&self.db, id).await
    }

    async fn list_records(&self, customer_id: &str) -> Result<Vec<financial_record::Model>> {
        records::list_records_for_customer(&self.db, customer_id).await
    }

    async fn get_record(&self, id: &str) -> Result<financial_record::Model> {
        records::get_record_by_id(&self.db, id)
            .await?
            .ok_or_else(|| Error::record_not_found(id))
    }

    async fn create_record(
        &self,
        customer_id: &str,
        date: NaiveDate,
        amount: Decimal,
        record_type: RecordType,
        description: String,
    ) -> Result<financial_record::Model> {
        records::create_record(&self.db, customer_id, date, amount, record_type, description).await
    }

    async fn update_record(
        &self,
        record: financial_record::Model,
    ) -> Result<financial_record::Model> {
        records::update_record(&self.db, record).await
    }

    async fn delete_record(&self, id: &str) -> Result<()> {
        records::delete_record(&self.db, id).await
    }
}
