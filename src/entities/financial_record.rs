//! Financial record entity - one invoice, payment, refund or credit line.
//!
//! The `amount` sign is derived from `record_type`: payments and credits are
//! stored negative, invoices and refunds positive. The AI annotation fields live
//! in [`crate::models::AnnotatedRecord`], never in this table.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Closed set of record kinds, stored as lowercase text.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    /// Money owed by the customer
    #[sea_orm(string_value = "invoice")]
    Invoice,
    /// Money received from the customer (stored negative)
    #[sea_orm(string_value = "payment")]
    Payment,
    /// Money returned to the customer
    #[sea_orm(string_value = "refund")]
    Refund,
    /// Credit granted to the customer (stored negative)
    #[sea_orm(string_value = "credit")]
    Credit,
}

/// Financial record database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "financial_records")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Opaque identifier assigned at creation (`R` + uuid)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Owning customer
    pub customer_id: String,
    /// Calendar date of the transaction, stored as `YYYY-MM-DD`
    pub date: Date,
    /// Signed amount, sign normalized from `record_type`
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    /// Kind of record
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Free-text description, possibly empty
    #[serde(default)]
    pub description: String,
}

/// Defines relationships between `FinancialRecord` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each record belongs to one customer
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id",
        on_delete = "Cascade"
    )]
    Customer,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
