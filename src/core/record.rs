//! Financial record business logic - `SeaORM` queries over `financial_records`.
//!
//! These functions store amounts exactly as given. Sign normalization and input
//! validation happen in [`crate::service`] before anything reaches this layer.

use crate::{
    entities::{Customer, FinancialRecord, RecordType, financial_record},
    errors::{Error, Result},
    models::new_record_id,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{Order, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};
use tracing::{debug, instrument};

/// Retrieves a customer's records, newest date first.
///
/// Records sharing a date come back in reverse insertion order (`rowid`), so the
/// ordering is stable across calls.
pub async fn list_records_for_customer(
    db: &DatabaseConnection,
    customer_id: &str,
) -> Result<Vec<financial_record::Model>> {
    FinancialRecord::find()
        .filter(financial_record::Column::CustomerId.eq(customer_id))
        .order_by_desc(financial_record::Column::Date)
        .order_by(Expr::cust("rowid"), Order::Desc)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a record by id, returning None if absent.
pub async fn get_record_by_id(
    db: &DatabaseConnection,
    record_id: &str,
) -> Result<Option<financial_record::Model>> {
    FinancialRecord::find_by_id(record_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Inserts a record for an existing customer.
///
/// Returns [`Error::NotFound`] if the customer does not exist.
#[instrument(skip(db, description))]
pub async fn create_record(
    db: &DatabaseConnection,
    customer_id: &str,
    date: NaiveDate,
    amount: Decimal,
    record_type: RecordType,
    description: String,
) -> Result<financial_record::Model> {
    let txn = db.begin().await?;

    Customer::find_by_id(customer_id.to_string())
        .one(&txn)
        .await?
        .ok_or_else(|| Error::customer_not_found(customer_id))?;

    let record = financial_record::ActiveModel {
        id: Set(new_record_id()),
        customer_id: Set(customer_id.to_string()),
        date: Set(date),
        amount: Set(amount),
        record_type: Set(record_type),
        description: Set(description),
    };
    let result = record.insert(&txn).await?;

    txn.commit().await?;
    debug!(record_id = %result.id, "Record created");
    Ok(result)
}

/// Replaces date, amount, type and description of an existing record.
///
/// The owning customer is never changed. Returns [`Error::NotFound`] when no
/// record has this id.
#[instrument(skip(db, updated), fields(record_id = %updated.id))]
pub async fn update_record(
    db: &DatabaseConnection,
    updated: financial_record::Model,
) -> Result<financial_record::Model> {
    let mut record: financial_record::ActiveModel = FinancialRecord::find_by_id(updated.id.clone())
        .one(db)
        .await?
        .ok_or_else(|| Error::record_not_found(&updated.id))?
        .into();

    record.date = Set(updated.date);
    record.amount = Set(updated.amount);
    record.record_type = Set(updated.record_type);
    record.description = Set(updated.description);

    record.update(db).await.map_err(Into::into)
}

/// Deletes a single record.
#[instrument(skip(db))]
pub async fn delete_record(db: &DatabaseConnection, record_id: &str) -> Result<()> {
    let result = FinancialRecord::delete_by_id(record_id.to_string())
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(Error::record_not_found(record_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_update_record_not_found_with_mock() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([Vec::<financial_record::Model>::new()])
            .into_connection();

        let result = update_record(&db, record("R-gone", "2024-01-01", "10", RecordType::Invoice)).await;
        assert!(matches!(result, Err(Error::NotFound { entity: "record", .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_record_for_missing_customer() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_record(
            &db,
            "C-missing",
            date("2024-01-01"),
            amount("100"),
            RecordType::Invoice,
            String::new(),
        )
        .await;
        assert!(matches!(result, Err(Error::NotFound { entity: "customer", .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_record_persists_fields() -> Result<()> {
        let (db, customer) = setup_with_customer().await?;
        let record = create_record(
            &db,
            &customer.id,
            date("2024-03-15"),
            amount("-250.75"),
            RecordType::Payment,
            "Wire transfer".to_string(),
        )
        .await?;

        assert!(record.id.starts_with('R'));
        assert_eq!(record.customer_id, customer.id);
        assert_eq!(record.amount, amount("-250.75"));
        assert_eq!(record.record_type, RecordType::Payment);

        let found = get_record_by_id(&db, &record.id).await?.unwrap();
        assert_eq!(found, record);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_records_date_descending_with_stable_ties() -> Result<()> {
        let (db, customer) = setup_with_customer().await?;
        let old = create_test_record(&db, &customer.id, "2024-01-01", "10", RecordType::Invoice).await?;
        let tie_first =
            create_test_record(&db, &customer.id, "2024-02-01", "20", RecordType::Invoice).await?;
        let tie_second =
            create_test_record(&db, &customer.id, "2024-02-01", "-5", RecordType::Credit).await?;
        let newest =
            create_test_record(&db, &customer.id, "2024-03-01", "30", RecordType::Refund).await?;

        let ids: Vec<String> = list_records_for_customer(&db, &customer.id)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![newest.id, tie_second.id, tie_first.id, old.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_records_only_for_customer() -> Result<()> {
        let db = setup_test_db().await?;
        let first = create_test_customer(&db, "First").await?;
        let second = create_test_customer(&db, "Second").await?;
        let mine = create_test_record(&db, &first.id, "2024-01-01", "10", RecordType::Invoice).await?;
        create_test_record(&db, &second.id, "2024-01-01", "99", RecordType::Invoice).await?;

        let records = list_records_for_customer(&db, &first.id).await?;
        assert_eq!(records, vec![mine]);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_record_keeps_owner() -> Result<()> {
        let db = setup_test_db().await?;
        let owner = create_test_customer(&db, "Owner").await?;
        let other = create_test_customer(&db, "Other").await?;
        let record = create_test_record(&db, &owner.id, "2024-01-01", "10", RecordType::Invoice).await?;

        let updated = update_record(
            &db,
            financial_record::Model {
                customer_id: other.id.clone(),
                amount: amount("42.25"),
                description: "Corrected".to_string(),
                ..record.clone()
            },
        )
        .await?;

        assert_eq!(updated.customer_id, owner.id);
        assert_eq!(updated.amount, amount("42.25"));
        assert_eq!(updated.description, "Corrected");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_record() -> Result<()> {
        let (db, customer) = setup_with_customer().await?;
        let ghost = financial_record::Model {
            id: "R-missing".to_string(),
            customer_id: customer.id,
            date: date("2024-01-01"),
            amount: Decimal::ONE,
            record_type: RecordType::Invoice,
            description: String::new(),
        };

        assert!(matches!(
            update_record(&db, ghost).await,
            Err(Error::NotFound { entity: "record", .. })
        ));
        assert!(matches!(
            delete_record(&db, "R-missing").await,
            Err(Error::NotFound { entity: "record", .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_record() -> Result<()> {
        let (db, customer) = setup_with_customer().await?;
        let record = create_test_record(&db, &customer.id, "2024-01-01", "10", RecordType::Invoice).await?;

        delete_record(&db, &record.id).await?;
        assert!(get_record_by_id(&db, &record.id).await?.is_none());
        Ok(())
    }
}
