pub mod account_service;
pub mod bucket_service;
pub mod group_service;
pub mod summary_service;
pub mod transaction_service;

pub use account_service::AccountService;
pub use bucket_service::BucketService;
pub use group_service::GroupService;
pub use summary_service::{AccountBalance, BucketBalance, DashboardSummary, SummaryService};
pub use transaction_service::TransactionService;

use uuid::Uuid;

use crate::errors::{CoreError, CoreResult, EntityKind, ValidationError};

/// Resolves an optional lookup, mapping absence to [`CoreError::NotFound`].
pub(crate) fn require<T>(row: Option<T>, entity: EntityKind, id: Uuid) -> CoreResult<T> {
    row.ok_or(CoreError::NotFound { entity, id })
}

/// Trims a submitted name, rejecting the empty result.
pub(crate) fn required_name(raw: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Position for a newly appended row: one step past the current maximum.
pub(crate) fn next_sort_order<I: IntoIterator<Item = i32>>(existing: I) -> i32 {
    existing.into_iter().max().map(|max| max + 10).unwrap_or(0)
}
