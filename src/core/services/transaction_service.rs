//! Business logic for admitting and removing ledger entries.

use tracing::info;
use uuid::Uuid;

use crate::core::services::require;
use crate::domain::transaction::{Transaction, TransactionDraft, TransactionKind};
use crate::errors::{CoreResult, EntityKind};
use crate::storage::Datastore;

/// Gatekeeper for the append-only transaction log.
pub struct TransactionService;

impl TransactionService {
    /// Validates the draft, resolves its references and appends the entry.
    ///
    /// References must exist and belong to `owner`; archived rows are still
    /// valid targets so history can be corrected after archiving.
    pub fn log(
        store: &mut dyn Datastore,
        owner: Uuid,
        draft: TransactionDraft,
    ) -> CoreResult<Transaction> {
        let validated = draft.validate()?;
        Self::resolve_references(store, owner, &validated.kind)?;
        let transaction = Transaction::new(owner, validated.date, validated.amount, validated.kind)
            .with_description(validated.description);
        store.insert_transaction(transaction.clone())?;
        info!(
            transaction = %transaction.id,
            kind = %transaction.transaction_type(),
            amount = transaction.amount,
            "logged transaction"
        );
        Ok(transaction)
    }

    /// Deletes an entry, returning the removed row. Derived balances move
    /// back exactly as if the entry had never been logged.
    pub fn delete(store: &mut dyn Datastore, owner: Uuid, id: Uuid) -> CoreResult<Transaction> {
        let removed = store.delete_transaction(owner, id)?;
        info!(transaction = %removed.id, "deleted transaction");
        Ok(removed)
    }

    pub fn get(store: &dyn Datastore, owner: Uuid, id: Uuid) -> CoreResult<Transaction> {
        require(store.transaction(owner, id)?, EntityKind::Transaction, id)
    }

    /// Newest entries first; `limit` caps the page size.
    pub fn list_recent(
        store: &dyn Datastore,
        owner: Uuid,
        limit: usize,
    ) -> CoreResult<Vec<Transaction>> {
        let mut rows = store.list_transactions(owner)?;
        rows.truncate(limit);
        Ok(rows)
    }

    fn resolve_references(
        store: &dyn Datastore,
        owner: Uuid,
        kind: &TransactionKind,
    ) -> CoreResult<()> {
        match *kind {
            TransactionKind::Expense {
                from_account,
                from_bucket,
            } => {
                require_account(store, owner, from_account)?;
                require_bucket(store, owner, from_bucket)
            }
            TransactionKind::Income {
                to_account,
                to_bucket,
            } => {
                require_account(store, owner, to_account)?;
                require_bucket(store, owner, to_bucket)
            }
            TransactionKind::Transfer {
                from_account,
                to_account,
            } => {
                require_account(store, owner, from_account)?;
                require_account(store, owner, to_account)
            }
            TransactionKind::BucketMove {
                from_bucket,
                to_bucket,
            } => {
                require_bucket(store, owner, from_bucket)?;
                require_bucket(store, owner, to_bucket)
            }
        }
    }
}

fn require_account(store: &dyn Datastore, owner: Uuid, id: Uuid) -> CoreResult<()> {
    require(store.account(owner, id)?, EntityKind::Account, id).map(|_| ())
}

fn require_bucket(store: &dyn Datastore, owner: Uuid, id: Uuid) -> CoreResult<()> {
    require(store.bucket(owner, id)?, EntityKind::Bucket, id).map(|_| ())
}
