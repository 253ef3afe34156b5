use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::tempdir;
use uuid::Uuid;

use envelope_core::core::services::{
    AccountService, BucketService, GroupService, SummaryService, TransactionService,
};
use envelope_core::core::{BalanceBook, SeedService};
use envelope_core::domain::account::AccountKind;
use envelope_core::domain::transaction::TransactionDraft;
use envelope_core::storage::{Datastore, JsonStore, MemoryStore};

fn build_sample_store(txn_count: usize) -> (MemoryStore, Uuid) {
    let mut store = MemoryStore::new();
    let owner = Uuid::new_v4();
    SeedService::ensure(&mut store, owner).expect("seed defaults");

    let checking = AccountService::create(&mut store, owner, "Checking", AccountKind::Checking)
        .expect("checking")
        .id;
    let savings = AccountService::create(&mut store, owner, "Savings", AccountKind::Savings)
        .expect("savings")
        .id;

    let needs = GroupService::list(&store, owner)
        .expect("groups")
        .into_iter()
        .find(|group| group.title == "Needs")
        .expect("needs group")
        .id;
    let groceries = BucketService::create(&mut store, owner, "Groceries", needs, None)
        .expect("groceries")
        .id;
    let unallocated = BucketService::list(&store, owner)
        .expect("buckets")
        .into_iter()
        .find(|bucket| bucket.is_system())
        .expect("system bucket")
        .id;

    let start_date = NaiveDate::from_ymd_opt(2026, 1, 1).expect("start date");

    for idx in 0..txn_count {
        let date = start_date + Duration::days((idx % 365) as i64);
        let amount = 10.0 + (idx % 90) as f64;
        let draft = match idx % 4 {
            0 => TransactionDraft::income(amount + 100.0, date, checking, unallocated),
            1 => TransactionDraft::expense(amount, date, checking, groceries),
            2 => TransactionDraft::bucket_move(amount, date, unallocated, groceries),
            _ => TransactionDraft::transfer(amount, date, checking, savings),
        };
        TransactionService::log(&mut store, owner, draft).expect("log transaction");
    }

    (store, owner)
}

fn bench_store_io(c: &mut Criterion) {
    let (store, owner) = build_sample_store(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("store.json");
    let snapshot = serde_json::to_string_pretty(&store).expect("encode store");
    std::fs::write(&file_path, snapshot).expect("seed store file");

    c.bench_function("store_reload_10k", |b| {
        b.iter(|| {
            let reopened = JsonStore::open(&file_path).expect("open store");
            black_box(reopened);
        })
    });

    let mut json_store = JsonStore::open(&file_path).expect("open store");
    let checking = AccountService::list(&json_store, owner)
        .expect("accounts")
        .into_iter()
        .find(|account| account.name == "Checking")
        .expect("checking")
        .id;
    let groceries = BucketService::list(&json_store, owner)
        .expect("buckets")
        .into_iter()
        .find(|bucket| bucket.name == "Groceries")
        .expect("groceries")
        .id;
    let date = NaiveDate::from_ymd_opt(2026, 6, 15).expect("date");

    c.bench_function("store_persist_10k", |b| {
        b.iter(|| {
            let draft = TransactionDraft::expense(12.5, date, checking, groceries);
            let logged = TransactionService::log(&mut json_store, owner, draft).expect("log");
            TransactionService::delete(&mut json_store, owner, logged.id).expect("delete");
        })
    });
}

fn bench_balance_reports(c: &mut Criterion) {
    let (store, owner) = build_sample_store(black_box(10_000));
    let transactions = store.list_transactions(owner).expect("transactions");

    c.bench_function("balance_fold_10k", |b| {
        b.iter(|| {
            let book = BalanceBook::derive(transactions.iter());
            black_box(book);
        })
    });

    c.bench_function("dashboard_summary_10k", |b| {
        b.iter(|| {
            let summary = SummaryService::dashboard(&store, owner).expect("dashboard");
            black_box(summary);
        })
    });

    let book = BalanceBook::derive(transactions.iter());
    let newest = transactions.first().expect("transactions").clone();

    c.bench_function("incremental_unpost_repost", |b| {
        b.iter_batched(
            || book.clone(),
            |mut working| {
                working.unpost(&newest);
                working.post(&newest);
                black_box(working);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_store_io, bench_balance_reports);
criterion_main!(benches);
