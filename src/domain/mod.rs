pub mod account;
pub mod bucket;
pub mod common;
pub mod group;
pub mod transaction;

pub use account::{Account, AccountKind};
pub use bucket::{is_system_bucket_name, Bucket, TO_BE_BUDGETED};
pub use common::{Identifiable, NamedEntity, Reorderable};
pub use group::{is_system_group_title, Group, Philosophy, SYSTEM_GROUP_TITLE};
pub use transaction::{
    LedgerSide, Posting, Transaction, TransactionDraft, TransactionKind, TransactionType,
    ValidatedTransaction,
};
