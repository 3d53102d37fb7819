//! Customer entity - a business counterparty owning financial records.
//!
//! Name, email and phone are free text with no uniqueness constraint.
//! Deleting a customer removes every record that references it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Opaque identifier assigned at creation (`C` + uuid)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name, used as the list ordering key
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
}

/// Defines relationships between Customer and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One customer has many financial records
    #[sea_orm(has_many = "super::financial_record::Entity")]
    FinancialRecords,
}

impl Related<super::financial_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinancialRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
