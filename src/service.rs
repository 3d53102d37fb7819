//! Orchestration layer - the boundary operations a UI or API calls.
//!
//! [`Ledger`] validates primitive input, applies the sign convention, calls the
//! store, engines and gateway, and returns results or safe fallbacks. Validation
//! errors never reach the store; AI failures never surface as errors.

use crate::{
    config::SeedCustomer,
    core::{
        aggregate::{Stats, aggregate},
        view::{SortSpec, view},
    },
    entities::{RecordType, customer, financial_record},
    errors::{Error, Result},
    gateway::InsightGateway,
    models::{AnnotatedRecord, CustomerProfile, NewCustomer, RecordInput, format_currency},
    store::LedgerStore,
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::{
    collections::HashSet,
    sync::{Arc, Mutex, PoisonError},
};
use tracing::{info, instrument};

/// Customer ids with an AI request in flight.
#[derive(Debug, Default)]
struct InFlight {
    customers: Mutex<HashSet<String>>,
}

/// Releases a customer's AI slot when dropped.
struct InFlightGuard<'a> {
    in_flight: &'a InFlight,
    customer_id: String,
}

impl InFlight {
    fn acquire(&self, customer_id: &str) -> Result<InFlightGuard<'_>> {
        let mut customers = self
            .customers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if !customers.insert(customer_id.to_string()) {
            return Err(Error::Busy {
                customer_id: customer_id.to_string(),
            });
        }
        Ok(InFlightGuard {
            in_flight: self,
            customer_id: customer_id.to_string(),
        })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight
            .customers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.customer_id);
    }
}

/// Parses a `YYYY-MM-DD` date with a four-digit year.
///
/// Stored dates sort as text, so signed or five-digit years are rejected.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let invalid = || Error::validation(format!("Invalid date '{value}'. Use YYYY-MM-DD."));
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| invalid())?;
    if !(1..=9999).contains(&date.year()) {
        return Err(invalid());
    }
    Ok(date)
}

/// Rejects zero amounts.
pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount.is_zero() {
        return Err(Error::validation("Amount cannot be zero."));
    }
    Ok(())
}

fn validate_customer_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("Customer name cannot be empty."));
    }
    Ok(())
}

/// A validated, sign-normalized record input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRecord {
    /// Parsed date
    pub date: NaiveDate,
    /// Amount with the sign implied by `record_type`
    pub amount: Decimal,
    /// Parsed type
    pub record_type: RecordType,
    /// Description, empty if none was given
    pub description: String,
}

impl TryFrom<RecordInput> for ValidRecord {
    type Error = Error;

    fn try_from(input: RecordInput) -> Result<Self> {
        let date = parse_date(&input.date)?;
        validate_amount(input.amount)?;
        let record_type: RecordType = input.record_type.parse()?;
        Ok(Self {
            date,
            amount: record_type.normalize_amount(input.amount),
            record_type,
            description: input.description,
        })
    }
}

/// The ledger's boundary operations.
pub struct Ledger {
    store: Arc<dyn LedgerStore>,
    gateway: InsightGateway,
    in_flight: InFlight,
}

impl Ledger {
    /// Ledger over `store`, using `gateway` for AI operations.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>, gateway: InsightGateway) -> Self {
        Self {
            store,
            gateway,
            in_flight: InFlight::default(),
        }
    }

    /// All customers ordered by name.
    pub async fn list_customers(&self) -> Result<Vec<customer::Model>> {
        self.store.list_customers().await
    }

    /// One customer.
    pub async fn get_customer(&self, id: &str) -> Result<customer::Model> {
        self.store.get_customer(id).await
    }

    /// Creates a customer after checking the name is not blank.
    #[instrument(skip(self, input))]
    pub async fn add_customer(&self, input: NewCustomer) -> Result<customer::Model> {
        validate_customer_name(&input.name)?;
        let customer = self
            .store
            .create_customer(NewCustomer {
                name: input.name.trim().to_string(),
                ..input
            })
            .await?;
        info!(customer_id = %customer.id, "Customer added");
        Ok(customer)
    }

    /// Replaces a customer's name, email and phone.
    #[instrument(skip(self, customer), fields(customer_id = %customer.id))]
    pub async fn update_customer(&self, customer: customer::Model) -> Result<customer::Model> {
        validate_customer_name(&customer.name)?;
        self.store
            .update_customer(customer::Model {
                name: customer.name.trim().to_string(),
                ..customer
            })
            .await
    }

    /// Deletes a customer and its records; returns the deleted id.
    #[instrument(skip(self))]
    pub async fn delete_customer(&self, id: &str) -> Result<String> {
        self.store.delete_customer(id).await?;
        info!("Customer deleted");
        Ok(id.to_string())
    }

    /// A customer's records in store order (date descending).
    pub async fn list_records(&self, customer_id: &str) -> Result<Vec<financial_record::Model>> {
        self.store.get_customer(customer_id).await?;
        self.store.list_records(customer_id).await
    }

    /// A customer's records filtered and sorted for display.
    pub async fn view_records(
        &self,
        customer_id: &str,
        filter: &str,
        sort: Option<SortSpec>,
    ) -> Result<Vec<financial_record::Model>> {
        let records = self.list_records(customer_id).await?;
        Ok(view(&records, filter, sort))
    }

    /// Validates, sign-normalizes and stores a new record.
    #[instrument(skip(self, input))]
    pub async fn add_record(
        &self,
        customer_id: &str,
        input: RecordInput,
    ) -> Result<financial_record::Model> {
        let valid = ValidRecord::try_from(input)?;
        let record = self
            .store
            .create_record(
                customer_id,
                valid.date,
                valid.amount,
                valid.record_type,
                valid.description,
            )
            .await?;
        info!(record_id = %record.id, amount = %format_currency(record.amount), "Record added");
        Ok(record)
    }

    /// Stores an edited record, re-applying the sign convention.
    ///
    /// Any AI annotations on the input are dropped; they are never persisted.
    #[instrument(skip(self, record), fields(record_id = %record.record.id))]
    pub async fn update_record(&self, record: AnnotatedRecord) -> Result<financial_record::Model> {
        let record = record.into_record();
        validate_amount(record.amount)?;
        let amount = record.record_type.normalize_amount(record.amount);
        self.store
            .update_record(financial_record::Model { amount, ..record })
            .await
    }

    /// Applies form input to an existing record.
    #[instrument(skip(self, input))]
    pub async fn edit_record(&self, id: &str, input: RecordInput) -> Result<financial_record::Model> {
        let valid = ValidRecord::try_from(input)?;
        let stored = self.store.get_record(id).await?;
        self.store
            .update_record(financial_record::Model {
                date: valid.date,
                amount: valid.amount,
                record_type: valid.record_type,
                description: valid.description,
                ..stored
            })
            .await
    }

    /// Deletes a record; returns the deleted id.
    #[instrument(skip(self))]
    pub async fn delete_record(&self, id: &str) -> Result<String> {
        self.store.delete_record(id).await?;
        Ok(id.to_string())
    }

    /// Totals for a customer's records.
    pub async fn stats(&self, customer_id: &str) -> Result<Stats> {
        let records = self.list_records(customer_id).await?;
        Ok(aggregate(&records))
    }

    /// Customer, records and totals in one call.
    pub async fn profile(&self, customer_id: &str) -> Result<CustomerProfile> {
        let customer = self.store.get_customer(customer_id).await?;
        let records = self.store.list_records(customer_id).await?;
        let stats = aggregate(&records);
        Ok(CustomerProfile {
            customer,
            records,
            stats,
        })
    }

    /// Summarizes the given records for a customer.
    ///
    /// Only `Busy` can fail here; gateway errors become the fallback text.
    pub async fn summarize_records(
        &self,
        customer_id: &str,
        records: &[financial_record::Model],
    ) -> Result<String> {
        let _slot = self.in_flight.acquire(customer_id)?;
        Ok(self.gateway.summarize(customer_id, records).await)
    }

    /// Summarizes a customer's stored records.
    pub async fn summarize(&self, customer_id: &str) -> Result<String> {
        let records = self.list_records(customer_id).await?;
        self.summarize_records(customer_id, &records).await
    }

    /// Highlights key records in `records`, returning them in the same order.
    ///
    /// All records must belong to one customer, whose in-flight slot is taken.
    pub async fn highlight_records(
        &self,
        records: Vec<AnnotatedRecord>,
    ) -> Result<Vec<AnnotatedRecord>> {
        let Some(owner) = records.first().map(|r| r.record.customer_id.clone()) else {
            return Ok(records);
        };
        if records.iter().any(|r| r.record.customer_id != owner) {
            return Err(Error::validation(
                "Records to highlight must belong to a single customer.",
            ));
        }
        let _slot = self.in_flight.acquire(&owner)?;
        Ok(self.gateway.highlight(records).await)
    }

    /// Highlights a customer's stored records.
    pub async fn highlight(&self, customer_id: &str) -> Result<Vec<AnnotatedRecord>> {
        let records = self.list_records(customer_id).await?;
        let _slot = self.in_flight.acquire(customer_id)?;
        Ok(self
            .gateway
            .highlight(records.into_iter().map(AnnotatedRecord::from).collect())
            .await)
    }

    /// Inserts the configured demo customers when the store is empty.
    ///
    /// Every entry is validated before anything is written, so a bad entry
    /// leaves the store untouched. Returns the number of customers created.
    #[instrument(skip_all, fields(configured = seeds.len()))]
    pub async fn seed(&self, seeds: &[SeedCustomer]) -> Result<usize> {
        if seeds.is_empty() || !self.store.list_customers().await?.is_empty() {
            return Ok(0);
        }

        let mut validated = Vec::with_capacity(seeds.len());
        for seed in seeds {
            validate_customer_name(&seed.customer.name)?;
            let records = seed
                .records
                .iter()
                .cloned()
                .map(ValidRecord::try_from)
                .collect::<Result<Vec<_>>>()?;
            validated.push((&seed.customer, records));
        }

        for (new_customer, records) in validated {
            let customer = self.add_customer(new_customer.clone()).await?;
            for record in records {
                self.store
                    .create_record(
                        &customer.id,
                        record.date,
                        record.amount,
                        record.record_type,
                        record.description,
                    )
                    .await?;
            }
        }
        info!(customers = seeds.len(), "Seeded initial customers");
        Ok(seeds.len())
    }
}
