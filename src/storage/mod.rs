pub mod json_backend;
pub mod memory;

use uuid::Uuid;

use crate::currency::Cents;
use crate::domain::account::{Account, AccountKind};
use crate::domain::bucket::Bucket;
use crate::domain::group::{Group, Philosophy};
use crate::domain::transaction::Transaction;
use crate::errors::CoreResult;

/// Abstraction over persistence collaborators storing the owner-scoped
/// ledger collections.
///
/// Every method takes the acting `owner`. Rows belonging to other owners
/// are invisible, including by id: looking one up reports it as absent
/// rather than as forbidden.
///
/// List methods return display order: accounts, groups and buckets sort by
/// `(sort_order, name)`; transactions sort newest first by `(date,
/// created_at)`. There is deliberately no transaction update: the log is
/// append-and-delete only.
pub trait Datastore: Send + Sync {
    fn list_accounts(&self, owner: Uuid) -> CoreResult<Vec<Account>>;
    fn account(&self, owner: Uuid, id: Uuid) -> CoreResult<Option<Account>>;
    fn insert_account(&mut self, account: Account) -> CoreResult<()>;
    fn update_account(&mut self, owner: Uuid, id: Uuid, patch: AccountPatch) -> CoreResult<()>;
    fn delete_account(&mut self, owner: Uuid, id: Uuid) -> CoreResult<()>;
    /// Rewrites sort positions for the listed accounts in one atomic step.
    /// Unknown ids fail the whole batch; omitted rows keep their position.
    fn reorder_accounts(&mut self, owner: Uuid, ordered_ids: &[Uuid]) -> CoreResult<()>;

    fn list_groups(&self, owner: Uuid) -> CoreResult<Vec<Group>>;
    fn group(&self, owner: Uuid, id: Uuid) -> CoreResult<Option<Group>>;
    fn insert_group(&mut self, group: Group) -> CoreResult<()>;
    fn update_group(&mut self, owner: Uuid, id: Uuid, patch: GroupPatch) -> CoreResult<()>;
    fn delete_group(&mut self, owner: Uuid, id: Uuid) -> CoreResult<()>;
    fn reorder_groups(&mut self, owner: Uuid, ordered_ids: &[Uuid]) -> CoreResult<()>;

    fn list_buckets(&self, owner: Uuid) -> CoreResult<Vec<Bucket>>;
    fn bucket(&self, owner: Uuid, id: Uuid) -> CoreResult<Option<Bucket>>;
    fn insert_bucket(&mut self, bucket: Bucket) -> CoreResult<()>;
    fn update_bucket(&mut self, owner: Uuid, id: Uuid, patch: BucketPatch) -> CoreResult<()>;
    fn delete_bucket(&mut self, owner: Uuid, id: Uuid) -> CoreResult<()>;
    fn reorder_buckets(&mut self, owner: Uuid, ordered_ids: &[Uuid]) -> CoreResult<()>;

    fn list_transactions(&self, owner: Uuid) -> CoreResult<Vec<Transaction>>;
    fn transaction(&self, owner: Uuid, id: Uuid) -> CoreResult<Option<Transaction>>;
    fn insert_transaction(&mut self, transaction: Transaction) -> CoreResult<()>;
    /// Removes the row and returns it so callers can reverse its effect.
    fn delete_transaction(&mut self, owner: Uuid, id: Uuid) -> CoreResult<Transaction>;
}

/// Partial update for an account row. `None` fields keep their value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub kind: Option<AccountKind>,
    pub is_archived: Option<bool>,
    pub sort_order: Option<i32>,
}

impl AccountPatch {
    pub fn apply_to(&self, account: &mut Account) {
        if let Some(name) = &self.name {
            account.name = name.clone();
        }
        if let Some(kind) = self.kind {
            account.kind = kind;
        }
        if let Some(is_archived) = self.is_archived {
            account.is_archived = is_archived;
        }
        if let Some(sort_order) = self.sort_order {
            account.sort_order = sort_order;
        }
    }
}

/// Partial update for a group row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupPatch {
    pub title: Option<String>,
    pub philosophy: Option<Philosophy>,
    pub sort_order: Option<i32>,
}

impl GroupPatch {
    pub fn apply_to(&self, group: &mut Group) {
        if let Some(title) = &self.title {
            group.title = title.clone();
        }
        if let Some(philosophy) = self.philosophy {
            group.philosophy = Some(philosophy);
        }
        if let Some(sort_order) = self.sort_order {
            group.sort_order = sort_order;
        }
    }
}

/// Partial update for a bucket row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketPatch {
    pub name: Option<String>,
    pub group_id: Option<Uuid>,
    pub target_amount: Option<Cents>,
    pub is_archived: Option<bool>,
    pub sort_order: Option<i32>,
}

impl BucketPatch {
    pub fn apply_to(&self, bucket: &mut Bucket) {
        if let Some(name) = &self.name {
            bucket.name = name.clone();
        }
        if let Some(group_id) = self.group_id {
            bucket.group_id = group_id;
        }
        if let Some(target_amount) = self.target_amount {
            bucket.target_amount = target_amount;
        }
        if let Some(is_archived) = self.is_archived {
            bucket.is_archived = is_archived;
        }
        if let Some(sort_order) = self.sort_order {
            bucket.sort_order = sort_order;
        }
    }
}

pub use json_backend::JsonStore;
pub use memory::MemoryStore;
