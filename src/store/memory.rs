//! [`LedgerStore`] held entirely in process memory.
//!
//! Useful for demos and tests. A single mutex guards both maps, so customer
//! deletion and its cascade are atomic with respect to every other call.

use super::LedgerStore;
use crate::{
    entities::{RecordType, customer, financial_record},
    errors::{Error, Result},
    models::{NewCustomer, new_customer_id, new_record_id},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::{
    cmp::Reverse,
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

#[derive(Debug, Default)]
struct State {
    customers: HashMap<String, customer::Model>,
    /// Record plus its insertion sequence number
    records: HashMap<String, (u64, financial_record::Model)>,
    next_seq: u64,
}

/// In-memory store keyed by id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state.lock().map_err(|e| Error::Storage {
            message: format!("memory store lock poisoned: {e}"),
        })
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn list_customers(&self) -> Result<Vec<customer::Model>> {
        let state = self.lock()?;
        let mut customers: Vec<customer::Model> = state.customers.values().cloned().collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(customers)
    }

    async fn get_customer(&self, id: &str) -> Result<customer::Model> {
        self.lock()?
            .customers
            .get(id)
            .cloned()
            .ok_or_else(|| Error::customer_not_found(id))
    }

    async fn create_customer(&self, input: NewCustomer) -> Result<customer::Model> {
        let customer = customer::Model {
            id: new_customer_id(),
            name: input.name,
            email: input.email,
            phone: input.phone,
        };
        self.lock()?
            .customers
            .insert(customer.id.clone(), customer.clone());
        Ok(customer)
    }

    async fn update_customer(&self, customer: customer::Model) -> Result<customer::Model> {
        let mut state = self.lock()?;
        let slot = state
            .customers
            .get_mut(&customer.id)
            .ok_or_else(|| Error::customer_not_found(&customer.id))?;
        *slot = customer.clone();
        Ok(customer)
    }

    async fn delete_customer(&self, id: &str) -> Result<()> {
        let mut state = self.lock()?;
        if state.customers.remove(id).is_none() {
            return Err(Error::customer_not_found(id));
        }
        state.records.retain(|_, (_, record)| record.customer_id != id);
        Ok(())
    }

    async fn list_records(&self, customer_id: &str) -> Result<Vec<financial_record::Model>> {
        let state = self.lock()?;
        let mut owned: Vec<&(u64, financial_record::Model)> = state
            .records
            .values()
            .filter(|(_, record)| record.customer_id == customer_id)
            .collect();
        owned.sort_by_key(|(seq, record)| (Reverse(record.date), Reverse(*seq)));
        Ok(owned.into_iter().map(|(_, record)| record.clone()).collect())
    }

    async fn get_record(&self, id: &str) -> Result<financial_record::Model> {
        self.lock()?
            .records
            .get(id)
            .map(|(_, record)| record.clone())
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
        let mut state = self.lock()?;
        if !state.customers.contains_key(customer_id) {
            return Err(Error::customer_not_found(customer_id));
        }

        let record = financial_record::Model {
            id: new_record_id(),
            customer_id: customer_id.to_string(),
            date,
            amount,
            record_type,
            description,
        };
        let seq = state.next_seq;
        state.next_seq += 1;
        state
            .records
            .insert(record.id.clone(), (seq, record.clone()));
        Ok(record)
    }

    async fn update_record(
        &self,
        record: financial_record::Model,
    ) -> Result<financial_record::Model> {
        let mut state = self.lock()?;
        let (_, stored) = state
            .records
            .get_mut(&record.id)
            .ok_or_else(|| Error::record_not_found(&record.id))?;

        stored.date = record.date;
        stored.amount = record.amount;
        stored.record_type = record.record_type;
        stored.description = record.description;
        Ok(stored.clone())
    }

    async fn delete_record(&self, id: &str) -> Result<()> {
        self.lock()?
            .records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Error::record_not_found(id))
    }
}
