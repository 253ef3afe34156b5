mod common;

use envelope_core::core::services::{SummaryService, TransactionService};
use envelope_core::core::BalanceBook;
use envelope_core::domain::transaction::TransactionDraft;

use common::{date, setup_budget};

#[test]
fn every_entry_moves_cash_and_budget_in_lockstep() {
    let mut fx = setup_budget();

    // Spending before any income is allowed; both sides just go negative.
    fx.log(TransactionDraft::expense(
        42.50,
        date(2026, 3, 2),
        fx.checking,
        fx.groceries,
    ));
    let summary = SummaryService::dashboard(&fx.store, fx.owner).expect("dashboard");
    assert_eq!(summary.total_cash, -4_250);
    assert_eq!(summary.total_budgeted, -4_250);
    assert_eq!(summary.drift, 0);

    fx.log(TransactionDraft::income(
        1_000.0,
        date(2026, 3, 3),
        fx.checking,
        fx.unallocated,
    ));
    let summary = SummaryService::dashboard(&fx.store, fx.owner).expect("dashboard");
    assert_eq!(summary.total_cash, 95_750);
    assert_eq!(summary.total_budgeted, 95_750);
    assert_eq!(summary.unallocated, 100_000);
    assert_eq!(summary.drift, 0);

    fx.log(TransactionDraft::bucket_move(
        50.0,
        date(2026, 3, 3),
        fx.unallocated,
        fx.groceries,
    ));
    let book = fx.book();
    assert_eq!(book.account_balance(fx.checking), 95_750);
    assert_eq!(book.bucket_balance(fx.unallocated), 95_000);
    assert_eq!(book.bucket_balance(fx.groceries), 750);
    assert_eq!(book.total_cash(), book.total_budgeted());
}

#[test]
fn transfers_change_custody_without_touching_the_budget() {
    let mut fx = setup_budget();
    fx.log(TransactionDraft::income(
        500.0,
        date(2026, 4, 1),
        fx.checking,
        fx.unallocated,
    ));

    fx.log(TransactionDraft::transfer(
        200.0,
        date(2026, 4, 2),
        fx.checking,
        fx.savings,
    ));

    let book = fx.book();
    assert_eq!(book.account_balance(fx.checking), 30_000);
    assert_eq!(book.account_balance(fx.savings), 20_000);
    assert_eq!(book.total_cash(), 50_000);
    assert_eq!(book.bucket_balance(fx.unallocated), 50_000);
    assert_eq!(book.bucket_balance(fx.groceries), 0);
    assert_eq!(book.total_budgeted(), 50_000);
}

#[test]
fn deleting_an_entry_restores_the_prior_balances() {
    let mut fx = setup_budget();
    fx.log(TransactionDraft::income(
        1_000.0,
        date(2026, 3, 1),
        fx.checking,
        fx.unallocated,
    ));
    fx.log(TransactionDraft::expense(
        42.50,
        date(2026, 3, 2),
        fx.checking,
        fx.groceries,
    ));

    let before = fx.book();
    let mistake = fx.log(TransactionDraft::expense(
        99.99,
        date(2026, 3, 4),
        fx.checking,
        fx.rent,
    ));
    assert_ne!(fx.book(), before);

    let removed =
        TransactionService::delete(&mut fx.store, fx.owner, mistake.id).expect("delete entry");
    assert_eq!(removed.id, mistake.id);
    assert_eq!(fx.book(), before);
}

#[test]
fn incremental_posting_matches_a_fresh_fold() {
    let mut fx = setup_budget();
    let mut book = BalanceBook::new();

    let drafts = [
        TransactionDraft::income(1_000.0, date(2026, 5, 1), fx.checking, fx.unallocated),
        TransactionDraft::bucket_move(300.0, date(2026, 5, 1), fx.unallocated, fx.rent),
        TransactionDraft::expense(42.50, date(2026, 5, 3), fx.checking, fx.groceries),
        TransactionDraft::transfer(150.0, date(2026, 5, 4), fx.checking, fx.savings),
        TransactionDraft::expense(12.25, date(2026, 5, 5), fx.savings, fx.rent),
    ];
    for draft in drafts {
        let logged = fx.log(draft);
        book.post(&logged);
    }
    assert_eq!(book, fx.book());

    let victim = fx.log(TransactionDraft::expense(
        8.40,
        date(2026, 5, 6),
        fx.checking,
        fx.groceries,
    ));
    book.post(&victim);
    let removed =
        TransactionService::delete(&mut fx.store, fx.owner, victim.id).expect("delete entry");
    book.unpost(&removed);
    assert_eq!(book, fx.book());
}

#[test]
fn overspending_a_bucket_is_admitted_and_stays_balanced() {
    let mut fx = setup_budget();
    fx.log(TransactionDraft::income(
        100.0,
        date(2026, 6, 1),
        fx.checking,
        fx.unallocated,
    ));
    fx.log(TransactionDraft::bucket_move(
        30.0,
        date(2026, 6, 1),
        fx.unallocated,
        fx.groceries,
    ));
    fx.log(TransactionDraft::expense(
        80.0,
        date(2026, 6, 2),
        fx.checking,
        fx.groceries,
    ));

    let book = fx.book();
    assert_eq!(book.bucket_balance(fx.groceries), -5_000);
    let report = SummaryService::check_consistency(&fx.store, fx.owner).expect("consistency");
    report.verify().expect("overspend must not open drift");
}

#[test]
fn movement_that_nets_to_zero_leaves_no_trace_in_the_book() {
    let mut fx = setup_budget();
    let paycheck = fx.log(TransactionDraft::income(
        250.0,
        date(2026, 7, 1),
        fx.checking,
        fx.unallocated,
    ));
    fx.log(TransactionDraft::bucket_move(
        40.0,
        date(2026, 7, 2),
        fx.unallocated,
        fx.groceries,
    ));
    fx.log(TransactionDraft::bucket_move(
        40.0,
        date(2026, 7, 3),
        fx.groceries,
        fx.unallocated,
    ));

    // The two moves cancel, so the book must equal one derived from the
    // paycheck alone, with no lingering zero entry for the bucket.
    assert_eq!(fx.book(), BalanceBook::derive([&paycheck]));
}
