//! Customer business logic - `SeaORM` queries over the `customers` table.
//!
//! Deleting a customer removes its financial records inside the same database
//! transaction, so a record never outlives its owner.

use crate::{
    entities::{Customer, FinancialRecord, customer, financial_record},
    errors::{Error, Result},
    models::{NewCustomer, new_customer_id},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, instrument};

/// Retrieves all customers ordered by name (ties by id).
pub async fn list_customers(db: &DatabaseConnection) -> Result<Vec<customer::Model>> {
    Customer::find()
        .order_by_asc(customer::Column::Name)
        .order_by_asc(customer::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a customer by id, returning None if absent.
pub async fn get_customer_by_id(
    db: &DatabaseConnection,
    customer_id: &str,
) -> Result<Option<customer::Model>> {
    Customer::find_by_id(customer_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Inserts a new customer with a freshly generated id.
#[instrument(skip(db))]
pub async fn create_customer(db: &DatabaseConnection, input: NewCustomer) -> Result<customer::Model> {
    let customer = customer::ActiveModel {
        id: Set(new_customer_id()),
        name: Set(input.name),
        email: Set(input.email),
        phone: Set(input.phone),
    };

    let result = customer.insert(db).await?;
    debug!(customer_id = %result.id, "Customer created");
    Ok(result)
}

/// Replaces name, email and phone of an existing customer.
///
/// Returns [`Error::NotFound`] when no customer has this id.
#[instrument(skip(db, updated), fields(customer_id = %updated.id))]
pub async fn update_customer(
    db: &DatabaseConnection,
    updated: customer::Model,
) -> Result<customer::Model> {
    let mut customer: customer::ActiveModel = Customer::find_by_id(updated.id.clone())
        .one(db)
        .await?
        .ok_or_else(|| Error::customer_not_found(&updated.id))?
        .into();

    customer.name = Set(updated.name);
    customer.email = Set(updated.email);
    customer.phone = Set(updated.phone);

    customer.update(db).await.map_err(Into::into)
}

/// Deletes a customer and every record it owns, atomically.
#[instrument(skip(db))]
pub async fn delete_customer(db: &DatabaseConnection, customer_id: &str) -> Result<()> {
    let txn = db.begin().await?;

    let customer = Customer::find_by_id(customer_id.to_string())
        .one(&txn)
        .await?
        .ok_or_else(|| Error::customer_not_found(customer_id))?;

    let removed = FinancialRecord::delete_many()
        .filter(financial_record::Column::CustomerId.eq(customer_id))
        .exec(&txn)
        .await?;
    customer.delete(&txn).await?;

    txn.commit().await?;
    debug!(records_removed = removed.rows_affected, "Customer deleted");
    Ok(())
}
