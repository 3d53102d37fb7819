//! Running totals over a customer's records.

use crate::{entities::RecordType, models::RecordFields};
use rust_decimal::Decimal;
use serde::Serialize;

/// Totals shown on a customer profile.
///
/// `total_paid` and `total_credited` are reported as positive magnitudes even
/// though the underlying amounts are stored negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Sum of invoice amounts
    pub total_invoiced: Decimal,
    /// Sum of payment magnitudes
    pub total_paid: Decimal,
    /// Sum of refund amounts
    pub total_refunded: Decimal,
    /// Sum of credit magnitudes
    pub total_credited: Decimal,
    /// Signed sum of every amount
    pub balance: Decimal,
}

/// Folds `records` into [`Stats`] in a single pass.
#[must_use]
pub fn aggregate<R: RecordFields>(records: &[R]) -> Stats {
    records.iter().fold(Stats::default(), |mut stats, item| {
        let record = item.record();
        stats.balance += record.amount;
        match record.record_type {
            RecordType::Invoice => stats.total_invoiced += record.amount,
            RecordType::Payment => stats.total_paid += record.amount.abs(),
            RecordType::Refund => stats.total_refunded += record.amount,
            RecordType::Credit => stats.total_credited += record.amount.abs(),
        }
        stats
    })
}
