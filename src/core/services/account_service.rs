use tracing::info;
use uuid::Uuid;

use crate::core::services::{next_sort_order, require, required_name};
use crate::domain::account::{Account, AccountKind};
use crate::errors::{ConflictError, CoreResult, EntityKind};
use crate::storage::{AccountPatch, Datastore};

/// Validated CRUD operations for accounts.
pub struct AccountService;

impl AccountService {
    /// Creates an account, returning the stored row.
    pub fn create(
        store: &mut dyn Datastore,
        owner: Uuid,
        name: &str,
        kind: AccountKind,
    ) -> CoreResult<Account> {
        let name = required_name(name, "name")?;
        Self::ensure_name_free(store, owner, None, &name)?;
        let sort_order = next_sort_order(
            store
                .list_accounts(owner)?
                .iter()
                .map(|account| account.sort_order),
        );
        let account = Account::new(owner, name, kind).with_sort_order(sort_order);
        store.insert_account(account.clone())?;
        info!(account = %account.id, name = %account.name, "created account");
        Ok(account)
    }

    /// Renames the account, keeping names unique per owner.
    pub fn rename(
        store: &mut dyn Datastore,
        owner: Uuid,
        id: Uuid,
        new_name: &str,
    ) -> CoreResult<()> {
        let name = required_name(new_name, "name")?;
        require(store.account(owner, id)?, EntityKind::Account, id)?;
        Self::ensure_name_free(store, owner, Some(id), &name)?;
        store.update_account(
            owner,
            id,
            AccountPatch {
                name: Some(name),
                ..AccountPatch::default()
            },
        )
    }

    /// Archives or unarchives the account. Archived accounts keep their
    /// history and balance; they only leave the entry-form pickers.
    pub fn set_archived(
        store: &mut dyn Datastore,
        owner: Uuid,
        id: Uuid,
        archived: bool,
    ) -> CoreResult<()> {
        require(store.account(owner, id)?, EntityKind::Account, id)?;
        store.update_account(
            owner,
            id,
            AccountPatch {
                is_archived: Some(archived),
                ..AccountPatch::default()
            },
        )
    }

    /// Removes an account that no transaction references.
    pub fn delete(store: &mut dyn Datastore, owner: Uuid, id: Uuid) -> CoreResult<()> {
        require(store.account(owner, id)?, EntityKind::Account, id)?;
        let linked = store
            .list_transactions(owner)?
            .iter()
            .filter(|transaction| transaction.references_account(id))
            .count();
        if linked > 0 {
            return Err(ConflictError::AccountInUse {
                id,
                transactions: linked,
            }
            .into());
        }
        store.delete_account(owner, id)
    }

    /// Applies a new display order in a single datastore call.
    pub fn reorder(store: &mut dyn Datastore, owner: Uuid, ordered_ids: &[Uuid]) -> CoreResult<()> {
        store.reorder_accounts(owner, ordered_ids)
    }

    pub fn list(store: &dyn Datastore, owner: Uuid) -> CoreResult<Vec<Account>> {
        store.list_accounts(owner)
    }

    fn ensure_name_free(
        store: &dyn Datastore,
        owner: Uuid,
        exclude: Option<Uuid>,
        candidate: &str,
    ) -> CoreResult<()> {
        let normalized = candidate.trim().to_ascii_lowercase();
        let duplicate = store.list_accounts(owner)?.iter().any(|account| {
            let name = account.name.trim().to_ascii_lowercase();
            name == normalized && exclude.map_or(true, |id| account.id != id)
        });
        if duplicate {
            Err(ConflictError::DuplicateName {
                entity: EntityKind::Account,
                name: candidate.to_string(),
            }
            .into())
        } else {
            Ok(())
        }
    }
}
