//! Diagnostics over the derived state of a ledger.

use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::core::balance::BalanceBook;
use crate::currency::Cents;
use crate::domain::account::Account;
use crate::domain::bucket::Bucket;
use crate::domain::transaction::{LedgerSide, Transaction};
use crate::errors::{CoreError, CoreResult};

/// Aggregate view of the dual-ledger invariant.
///
/// Every transaction moves account totals and bucket totals by the same
/// signed amount (or not at all), so `drift` stays zero unless the stored
/// log itself has been corrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    pub total_cash: Cents,
    pub total_budgeted: Cents,
    pub drift: Cents,
}

impl ConsistencyReport {
    pub fn from_book(book: &BalanceBook) -> Self {
        let total_cash = book.total_cash();
        let total_budgeted = book.total_budgeted();
        let report = Self {
            total_cash,
            total_budgeted,
            drift: total_cash - total_budgeted,
        };
        if !report.is_balanced() {
            warn!(drift = report.drift, "account and bucket totals diverged");
        }
        report
    }

    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        Self::from_book(&BalanceBook::derive(transactions))
    }

    pub fn is_balanced(&self) -> bool {
        self.drift == 0
    }

    /// Escalates nonzero drift for callers that require a balanced ledger.
    pub fn verify(&self) -> CoreResult<()> {
        if self.is_balanced() {
            Ok(())
        } else {
            Err(CoreError::Consistency { drift: self.drift })
        }
    }
}

/// Scans the log for references that no longer resolve.
///
/// Dangling references cannot be produced through the services, which
/// refuse to delete referenced rows; a non-empty result points at data
/// edited outside the core.
pub fn referential_warnings(
    accounts: &[Account],
    buckets: &[Bucket],
    transactions: &[Transaction],
) -> Vec<String> {
    let account_ids: HashSet<Uuid> = accounts.iter().map(|account| account.id).collect();
    let bucket_ids: HashSet<Uuid> = buckets.iter().map(|bucket| bucket.id).collect();
    let mut warnings = Vec::new();

    for transaction in transactions {
        for posting in transaction.postings() {
            let known = match posting.side {
                LedgerSide::Account => account_ids.contains(&posting.entity_id),
                LedgerSide::Bucket => bucket_ids.contains(&posting.entity_id),
            };
            if !known {
                let side = match posting.side {
                    LedgerSide::Account => "account",
                    LedgerSide::Bucket => "bucket",
                };
                warnings.push(format!(
                    "transaction {} references unknown {} {}",
                    transaction.id, side, posting.entity_id
                ));
            }
        }
    }
    warnings
}
