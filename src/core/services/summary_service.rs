use serde::Serialize;
use uuid::Uuid;

use crate::core::balance::BalanceBook;
use crate::core::consistency::{referential_warnings, ConsistencyReport};
use crate::currency::Cents;
use crate::domain::account::Account;
use crate::domain::bucket::Bucket;
use crate::errors::CoreResult;
use crate::storage::Datastore;

/// Read-side reporting over derived balances.
pub struct SummaryService;

/// An account alongside its derived balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountBalance {
    pub account: Account,
    pub balance: Cents,
}

/// A bucket alongside its derived balance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketBalance {
    pub bucket: Bucket,
    pub balance: Cents,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_cash: Cents,
    pub total_budgeted: Cents,
    /// Balance of the system bucket: money not yet given a job.
    pub unallocated: Cents,
    pub drift: Cents,
}

impl SummaryService {
    /// Folds the owner's full log into a balance book.
    pub fn balance_book(store: &dyn Datastore, owner: Uuid) -> CoreResult<BalanceBook> {
        Ok(BalanceBook::derive(store.list_transactions(owner)?.iter()))
    }

    /// Every account with its balance, in display order.
    pub fn account_balances(store: &dyn Datastore, owner: Uuid) -> CoreResult<Vec<AccountBalance>> {
        let book = Self::balance_book(store, owner)?;
        Ok(store
            .list_accounts(owner)?
            .into_iter()
            .map(|account| AccountBalance {
                balance: book.account_balance(account.id),
                account,
            })
            .collect())
    }

    /// Every bucket with its balance, in display order.
    pub fn bucket_balances(store: &dyn Datastore, owner: Uuid) -> CoreResult<Vec<BucketBalance>> {
        let book = Self::balance_book(store, owner)?;
        Ok(store
            .list_buckets(owner)?
            .into_iter()
            .map(|bucket| BucketBalance {
                balance: book.bucket_balance(bucket.id),
                bucket,
            })
            .collect())
    }

    /// Totals for the dashboard header.
    pub fn dashboard(store: &dyn Datastore, owner: Uuid) -> CoreResult<DashboardSummary> {
        let book = Self::balance_book(store, owner)?;
        let unallocated = store
            .list_buckets(owner)?
            .iter()
            .find(|bucket| bucket.is_system())
            .map(|bucket| book.bucket_balance(bucket.id))
            .unwrap_or(0);
        let report = ConsistencyReport::from_book(&book);
        Ok(DashboardSummary {
            total_cash: report.total_cash,
            total_budgeted: report.total_budgeted,
            unallocated,
            drift: report.drift,
        })
    }

    /// Recomputes both ledger totals from scratch and reports any drift.
    pub fn check_consistency(store: &dyn Datastore, owner: Uuid) -> CoreResult<ConsistencyReport> {
        Ok(ConsistencyReport::from_book(&Self::balance_book(
            store, owner,
        )?))
    }

    /// Referential scan of the stored log for dangling ids.
    pub fn integrity_warnings(store: &dyn Datastore, owner: Uuid) -> CoreResult<Vec<String>> {
        Ok(referential_warnings(
            &store.list_accounts(owner)?,
            &store.list_buckets(owner)?,
            &store.list_transactions(owner)?,
        ))
    }
}
