//! Whole-store JSON persistence with atomic staged writes.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use uuid::Uuid;

use crate::config;
use crate::domain::account::Account;
use crate::domain::bucket::Bucket;
use crate::domain::group::Group;
use crate::domain::transaction::Transaction;
use crate::errors::CoreResult;
use crate::storage::memory::MemoryStore;
use crate::storage::{AccountPatch, BucketPatch, Datastore, GroupPatch};
use crate::utils::ensure_dir;

const TMP_SUFFIX: &str = "tmp";

/// File-backed datastore persisting a full snapshot after every mutation.
///
/// Writes stage to a sibling `.json.tmp` file and land with a rename, so a
/// crash mid-write leaves the previous snapshot intact. All queries run
/// against the in-memory cache; the file is read once at open.
pub struct JsonStore {
    path: PathBuf,
    cache: MemoryStore,
}

impl JsonStore {
    /// Opens the store at `path`, loading the existing snapshot when present.
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let cache = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            MemoryStore::new()
        };
        Ok(Self { path, cache })
    }

    /// Opens the store at the configured default location.
    pub fn open_default() -> CoreResult<Self> {
        Self::open(config::store_file())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(&self.cache)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Datastore for JsonStore {
    fn list_accounts(&self, owner: Uuid) -> CoreResult<Vec<Account>> {
        self.cache.list_accounts(owner)
    }

    fn account(&self, owner: Uuid, id: Uuid) -> CoreResult<Option<Account>> {
        self.cache.account(owner, id)
    }

    fn insert_account(&mut self, account: Account) -> CoreResult<()> {
        self.cache.insert_account(account)?;
        self.persist()
    }

    fn update_account(&mut self, owner: Uuid, id: Uuid, patch: AccountPatch) -> CoreResult<()> {
        self.cache.update_account(owner, id, patch)?;
        self.persist()
    }

    fn delete_account(&mut self, owner: Uuid, id: Uuid) -> CoreResult<()> {
        self.cache.delete_account(owner, id)?;
        self.persist()
    }

    fn reorder_accounts(&mut self, owner: Uuid, ordered_ids: &[Uuid]) -> CoreResult<()> {
        self.cache.reorder_accounts(owner, ordered_ids)?;
        self.persist()
    }

    fn list_groups(&self, owner: Uuid) -> CoreResult<Vec<Group>> {
        self.cache.list_groups(owner)
    }

    fn group(&self, owner: Uuid, id: Uuid) -> CoreResult<Option<Group>> {
        self.cache.group(owner, id)
    }

    fn insert_group(&mut self, group: Group) -> CoreResult<()> {
        self.cache.insert_group(group)?;
        self.persist()
    }

    fn update_group(&mut self, owner: Uuid, id: Uuid, patch: GroupPatch) -> CoreResult<()> {
        self.cache.update_group(owner, id, patch)?;
        self.persist()
    }

    fn delete_group(&mut self, owner: Uuid, id: Uuid) -> CoreResult<()> {
        self.cache.delete_group(owner, id)?;
        self.persist()
    }

    fn reorder_groups(&mut self, owner: Uuid, ordered_ids: &[Uuid]) -> CoreResult<()> {
        self.cache.reorder_groups(owner, ordered_ids)?;
        self.persist()
    }

    fn list_buckets(&self, owner: Uuid) -> CoreResult<Vec<Bucket>> {
        self.cache.list_buckets(owner)
    }

    fn bucket(&self, owner: Uuid, id: Uuid) -> CoreResult<Option<Bucket>> {
        self.cache.bucket(owner, id)
    }

    fn insert_bucket(&mut self, bucket: Bucket) -> CoreResult<()> {
        self.cache.insert_bucket(bucket)?;
        self.persist()
    }

    fn update_bucket(&mut self, owner: Uuid, id: Uuid, patch: BucketPatch) -> CoreResult<()> {
        self.cache.update_bucket(owner, id, patch)?;
        self.persist()
    }

    fn delete_bucket(&mut self, owner: Uuid, id: Uuid) -> CoreResult<()> {
        self.cache.delete_bucket(owner, id)?;
        self.persist()
    }

    fn reorder_buckets(&mut self, owner: Uuid, ordered_ids: &[Uuid]) -> CoreResult<()> {
        self.cache.reorder_buckets(owner, ordered_ids)?;
        self.persist()
    }

    fn list_transactions(&self, owner: Uuid) -> CoreResult<Vec<Transaction>> {
        self.cache.list_transactions(owner)
    }

    fn transaction(&self, owner: Uuid, id: Uuid) -> CoreResult<Option<Transaction>> {
        self.cache.transaction(owner, id)
    }

    fn insert_transaction(&mut self, transaction: Transaction) -> CoreResult<()> {
        self.cache.insert_transaction(transaction)?;
        self.persist()
    }

    fn delete_transaction(&mut self, owner: Uuid, id: Uuid) -> CoreResult<Transaction> {
        let removed = self.cache.delete_transaction(owner, id)?;
        self.persist()?;
        Ok(removed)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountKind;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonStore::open(temp.path().join("store.json")).expect("json store");
        (store, temp)
    }

    #[test]
    fn missing_file_opens_as_empty_store() {
        let (store, _guard) = store_with_temp_dir();
        let owner = Uuid::new_v4();
        assert!(store.list_accounts(owner).unwrap().is_empty());
    }

    #[test]
    fn mutations_survive_reopen() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("store.json");
        let owner = Uuid::new_v4();

        let mut store = JsonStore::open(&path).expect("json store");
        let account = Account::new(owner, "Checking", AccountKind::Checking);
        let account_id = account.id;
        store.insert_account(account).expect("insert account");

        let reopened = JsonStore::open(&path).expect("reopen store");
        let loaded = reopened
            .account(owner, account_id)
            .expect("lookup")
            .expect("account present");
        assert_eq!(loaded.name, "Checking");
    }

    #[test]
    fn no_staging_file_lingers_after_write() {
        let (mut store, guard) = store_with_temp_dir();
        let owner = Uuid::new_v4();
        store
            .insert_account(Account::new(owner, "Wallet", AccountKind::Cash))
            .expect("insert account");
        let tmp = tmp_path(&guard.path().join("store.json"));
        assert!(!tmp.exists(), "staged file should be renamed away");
    }
}
