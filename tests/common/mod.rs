#![allow(dead_code)]

use chrono::NaiveDate;
use uuid::Uuid;

use envelope_core::core::services::{
    AccountService, BucketService, GroupService, SummaryService, TransactionService,
};
use envelope_core::core::{BalanceBook, SeedService};
use envelope_core::domain::account::AccountKind;
use envelope_core::domain::transaction::{Transaction, TransactionDraft};
use envelope_core::storage::MemoryStore;

/// One seeded owner with two accounts and two spending buckets, the shape
/// most suites start from.
pub struct Fixture {
    pub store: MemoryStore,
    pub owner: Uuid,
    pub checking: Uuid,
    pub savings: Uuid,
    pub groceries: Uuid,
    pub rent: Uuid,
    pub unallocated: Uuid,
    pub needs_group: Uuid,
}

impl Fixture {
    pub fn log(&mut self, draft: TransactionDraft) -> Transaction {
        TransactionService::log(&mut self.store, self.owner, draft).expect("log transaction")
    }

    pub fn book(&self) -> BalanceBook {
        SummaryService::balance_book(&self.store, self.owner).expect("balance book")
    }
}

pub fn setup_budget() -> Fixture {
    let mut store = MemoryStore::new();
    let owner = Uuid::new_v4();
    SeedService::ensure(&mut store, owner).expect("seed defaults");

    let checking = AccountService::create(&mut store, owner, "Checking", AccountKind::Checking)
        .expect("create checking")
        .id;
    let savings = AccountService::create(&mut store, owner, "Savings", AccountKind::Savings)
        .expect("create savings")
        .id;

    let needs_group = GroupService::list(&store, owner)
        .expect("list groups")
        .into_iter()
        .find(|group| group.title == "Needs")
        .expect("seeded needs group")
        .id;
    let groceries = BucketService::create(&mut store, owner, "Groceries", needs_group, None)
        .expect("create groceries")
        .id;
    let rent = BucketService::create(&mut store, owner, "Rent", needs_group, Some(1200.0))
        .expect("create rent")
        .id;
    let unallocated = BucketService::list(&store, owner)
        .expect("list buckets")
        .into_iter()
        .find(|bucket| bucket.is_system())
        .expect("seeded system bucket")
        .id;

    Fixture {
        store,
        owner,
        checking,
        savings,
        groceries,
        rent,
        unallocated,
        needs_group,
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}
