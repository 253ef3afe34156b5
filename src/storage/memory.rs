//! In-memory datastore.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::account::Account;
use crate::domain::bucket::Bucket;
use crate::domain::common::{Identifiable, NamedEntity, Reorderable};
use crate::domain::group::Group;
use crate::domain::transaction::Transaction;
use crate::errors::{CoreError, CoreResult, EntityKind};
use crate::storage::{AccountPatch, BucketPatch, Datastore, GroupPatch};

/// Spacing between assigned sort positions, leaving room for manual edits.
const SORT_STRIDE: i32 = 10;

/// Datastore keeping every collection in process memory.
///
/// Backs tests directly and acts as the working cache inside
/// [`crate::storage::JsonStore`]; its serde representation is exactly the
/// on-disk snapshot shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    owners: HashMap<Uuid, OwnerShelf>,
}

/// One owner's collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct OwnerShelf {
    #[serde(default)]
    accounts: Vec<Account>,
    #[serde(default)]
    groups: Vec<Group>,
    #[serde(default)]
    buckets: Vec<Bucket>,
    #[serde(default)]
    transactions: Vec<Transaction>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn shelf(&self, owner: Uuid) -> Option<&OwnerShelf> {
        self.owners.get(&owner)
    }

    fn shelf_mut(&mut self, owner: Uuid) -> &mut OwnerShelf {
        self.owners.entry(owner).or_default()
    }
}

impl Datastore for MemoryStore {
    fn list_accounts(&self, owner: Uuid) -> CoreResult<Vec<Account>> {
        Ok(self
            .shelf(owner)
            .map(|shelf| sorted_rows(&shelf.accounts))
            .unwrap_or_default())
    }

    fn account(&self, owner: Uuid, id: Uuid) -> CoreResult<Option<Account>> {
        Ok(self.shelf(owner).and_then(|shelf| find(&shelf.accounts, id)))
    }

    fn insert_account(&mut self, account: Account) -> CoreResult<()> {
        self.shelf_mut(account.owner_id).accounts.push(account);
        Ok(())
    }

    fn update_account(&mut self, owner: Uuid, id: Uuid, patch: AccountPatch) -> CoreResult<()> {
        let accounts = &mut self.shelf_mut(owner).accounts;
        let account = find_mut(accounts, id).ok_or(CoreError::NotFound {
            entity: EntityKind::Account,
            id,
        })?;
        patch.apply_to(account);
        Ok(())
    }

    fn delete_account(&mut self, owner: Uuid, id: Uuid) -> CoreResult<()> {
        remove_row(&mut self.shelf_mut(owner).accounts, EntityKind::Account, id).map(|_| ())
    }

    fn reorder_accounts(&mut self, owner: Uuid, ordered_ids: &[Uuid]) -> CoreResult<()> {
        apply_reorder(
            &mut self.shelf_mut(owner).accounts,
            EntityKind::Account,
            ordered_ids,
        )
    }

    fn list_groups(&self, owner: Uuid) -> CoreResult<Vec<Group>> {
        Ok(self
            .shelf(owner)
            .map(|shelf| sorted_rows(&shelf.groups))
            .unwrap_or_default())
    }

    fn group(&self, owner: Uuid, id: Uuid) -> CoreResult<Option<Group>> {
        Ok(self.shelf(owner).and_then(|shelf| find(&shelf.groups, id)))
    }

    fn insert_group(&mut self, group: Group) -> CoreResult<()> {
        self.shelf_mut(group.owner_id).groups.push(group);
        Ok(())
    }

    fn update_group(&mut self, owner: Uuid, id: Uuid, patch: GroupPatch) -> CoreResult<()> {
        let groups = &mut self.shelf_mut(owner).groups;
        let group = find_mut(groups, id).ok_or(CoreError::NotFound {
            entity: EntityKind::Group,
            id,
        })?;
        patch.apply_to(group);
        Ok(())
    }

    fn delete_group(&mut self, owner: Uuid, id: Uuid) -> CoreResult<()> {
        remove_row(&mut self.shelf_mut(owner).groups, EntityKind::Group, id).map(|_| ())
    }

    fn reorder_groups(&mut self, owner: Uuid, ordered_ids: &[Uuid]) -> CoreResult<()> {
        apply_reorder(
            &mut self.shelf_mut(owner).groups,
            EntityKind::Group,
            ordered_ids,
        )
    }

    fn list_buckets(&self, owner: Uuid) -> CoreResult<Vec<Bucket>> {
        Ok(self
            .shelf(owner)
            .map(|shelf| sorted_rows(&shelf.buckets))
            .unwrap_or_default())
    }

    fn bucket(&self, owner: Uuid, id: Uuid) -> CoreResult<Option<Bucket>> {
        Ok(self.shelf(owner).and_then(|shelf| find(&shelf.buckets, id)))
    }

    fn insert_bucket(&mut self, bucket: Bucket) -> CoreResult<()> {
        self.shelf_mut(bucket.owner_id).buckets.push(bucket);
        Ok(())
    }

    fn update_bucket(&mut self, owner: Uuid, id: Uuid, patch: BucketPatch) -> CoreResult<()> {
        let buckets = &mut self.shelf_mut(owner).buckets;
        let bucket = find_mut(buckets, id).ok_or(CoreError::NotFound {
            entity: EntityKind::Bucket,
            id,
        })?;
        patch.apply_to(bucket);
        Ok(())
    }

    fn delete_bucket(&mut self, owner: Uuid, id: Uuid) -> CoreResult<()> {
        remove_row(&mut self.shelf_mut(owner).buckets, EntityKind::Bucket, id).map(|_| ())
    }

    fn reorder_buckets(&mut self, owner: Uuid, ordered_ids: &[Uuid]) -> CoreResult<()> {
        apply_reorder(
            &mut self.shelf_mut(owner).buckets,
            EntityKind::Bucket,
            ordered_ids,
        )
    }

    fn list_transactions(&self, owner: Uuid) -> CoreResult<Vec<Transaction>> {
        let mut rows = self
            .shelf(owner)
            .map(|shelf| shelf.transactions.clone())
            .unwrap_or_default();
        rows.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(rows)
    }

    fn transaction(&self, owner: Uuid, id: Uuid) -> CoreResult<Option<Transaction>> {
        Ok(self
            .shelf(owner)
            .and_then(|shelf| find(&shelf.transactions, id)))
    }

    fn insert_transaction(&mut self, transaction: Transaction) -> CoreResult<()> {
        self.shelf_mut(transaction.owner_id)
            .transactions
            .push(transaction);
        Ok(())
    }

    fn delete_transaction(&mut self, owner: Uuid, id: Uuid) -> CoreResult<Transaction> {
        remove_row(
            &mut self.shelf_mut(owner).transactions,
            EntityKind::Transaction,
            id,
        )
    }
}

fn sorted_rows<T>(rows: &[T]) -> Vec<T>
where
    T: Clone + Reorderable + NamedEntity,
{
    let mut out = rows.to_vec();
    out.sort_by(|a, b| {
        a.sort_order()
            .cmp(&b.sort_order())
            .then_with(|| a.name().cmp(b.name()))
    });
    out
}

fn find<T: Identifiable + Clone>(rows: &[T], id: Uuid) -> Option<T> {
    rows.iter().find(|row| row.id() == id).cloned()
}

fn find_mut<T: Identifiable>(rows: &mut [T], id: Uuid) -> Option<&mut T> {
    rows.iter_mut().find(|row| row.id() == id)
}

fn remove_row<T: Identifiable>(rows: &mut Vec<T>, entity: EntityKind, id: Uuid) -> CoreResult<T> {
    match rows.iter().position(|row| row.id() == id) {
        Some(index) => Ok(rows.remove(index)),
        None => Err(CoreError::NotFound { entity, id }),
    }
}

/// Validates the whole batch before touching any row, so one unknown id
/// cannot leave the collection half reordered.
fn apply_reorder<T: Reorderable>(
    rows: &mut [T],
    entity: EntityKind,
    ordered_ids: &[Uuid],
) -> CoreResult<()> {
    for id in ordered_ids {
        if !rows.iter().any(|row| row.id() == *id) {
            return Err(CoreError::NotFound { entity, id: *id });
        }
    }
    for (index, id) in ordered_ids.iter().enumerate() {
        if let Some(row) = rows.iter_mut().find(|row| row.id() == *id) {
            row.set_sort_order(index as i32 * SORT_STRIDE);
        }
    }
    Ok(())
}
