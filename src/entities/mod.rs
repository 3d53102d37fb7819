//! Entity module - SeaORM entity definitions for the two ledger tables.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod customer;
pub mod financial_record;

// Re-export specific types to avoid conflicts
pub use customer::{Column as CustomerColumn, Entity as Customer, Model as CustomerModel};
pub use financial_record::{
    Column as FinancialRecordColumn, Entity as FinancialRecord, Model as FinancialRecordModel,
    RecordType,
};
