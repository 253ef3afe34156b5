//! Derived balances for accounts and buckets.
//!
//! Balances are never stored. They are folded from the transaction log on
//! demand, so a balance can only ever disagree with the log by way of a bug
//! in this module, not by way of a missed update.

use std::collections::HashMap;

use uuid::Uuid;

use crate::currency::Cents;
use crate::domain::transaction::{LedgerSide, Posting, Transaction};

/// Cent balances for every account and bucket touched by the ledger.
///
/// Entries that net back to zero are dropped, so a book maintained
/// incrementally through [`BalanceBook::post`] and [`BalanceBook::unpost`]
/// compares equal to one freshly derived from the surviving transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceBook {
    accounts: HashMap<Uuid, Cents>,
    buckets: HashMap<Uuid, Cents>,
}

impl BalanceBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds every transaction into a fresh book.
    pub fn derive<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut book = Self::new();
        for transaction in transactions {
            book.post(transaction);
        }
        book
    }

    /// Applies one admitted transaction to the book.
    pub fn post(&mut self, transaction: &Transaction) {
        for posting in transaction.postings() {
            self.adjust(posting);
        }
    }

    /// Reverses a previously posted transaction exactly.
    pub fn unpost(&mut self, transaction: &Transaction) {
        for posting in transaction.postings() {
            self.adjust(Posting {
                delta: -posting.delta,
                ..posting
            });
        }
    }

    fn adjust(&mut self, posting: Posting) {
        let side = match posting.side {
            LedgerSide::Account => &mut self.accounts,
            LedgerSide::Bucket => &mut self.buckets,
        };
        let entry = side.entry(posting.entity_id).or_insert(0);
        *entry += posting.delta;
        if *entry == 0 {
            side.remove(&posting.entity_id);
        }
    }

    /// Balance of one account; zero when the account never moved.
    pub fn account_balance(&self, id: Uuid) -> Cents {
        self.accounts.get(&id).copied().unwrap_or(0)
    }

    /// Balance of one bucket; zero when the bucket never moved.
    pub fn bucket_balance(&self, id: Uuid) -> Cents {
        self.buckets.get(&id).copied().unwrap_or(0)
    }

    /// Sum of all account balances: total cash under management.
    pub fn total_cash(&self) -> Cents {
        self.accounts.values().sum()
    }

    /// Sum of all bucket balances: total money assigned to intentions.
    pub fn total_budgeted(&self) -> Cents {
        self.buckets.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.buckets.is_empty()
    }
}
