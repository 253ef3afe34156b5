use std::fmt;

use thiserror::Error;
use uuid::Uuid;

use crate::currency::Cents;

pub type CoreResult<T> = Result<T, CoreError>;

/// Unified error type for the envelope core.
///
/// Every operation fails with the most specific kind that applies; callers
/// can match on the variant to decide between rejecting input, surfacing a
/// conflict, or retrying persistence.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Structural contract violation in a payload. Recoverable: correct the
    /// input and retry; no state was changed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The operation would break a protected-entity or referential rule.
    #[error(transparent)]
    Conflict(#[from] ConflictError),
    /// The referenced row does not exist or belongs to another owner.
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: Uuid },
    /// The datastore collaborator failed. The core never retries on its own.
    #[error("persistence error: {0}")]
    Persistence(String),
    /// Account and bucket totals have diverged. Diagnostic severity: reported
    /// to operators, never blocks normal usage.
    #[error("ledger drift of {drift} cent(s) between account and bucket totals")]
    Consistency { drift: Cents },
}

/// The first rule a candidate payload violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount is not a finite number")]
    AmountNotFinite,
    #[error("amount exceeds the supported range")]
    AmountOutOfRange,
    #[error("amount is not a valid decimal number")]
    AmountMalformed,
    #[error("amounts support at most two decimal places")]
    AmountPrecision,
    #[error("amount must be positive")]
    AmountNotPositive,
    #[error("target amount cannot be negative")]
    NegativeTarget,
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` is not allowed for this transaction type")]
    ForbiddenField(&'static str),
    #[error("cannot transfer to the same account")]
    SameAccountTransfer,
    #[error("cannot move to the same bucket")]
    SameBucketMove,
}

/// Structured description of a rejected write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    #[error("bucket name `{name}` is reserved for the system bucket")]
    ReservedBucketName { name: String },
    #[error("group title `{title}` is reserved for the system group")]
    ReservedGroupTitle { title: String },
    #[error("the \"To Be Budgeted\" bucket cannot be {operation}")]
    SystemBucket { operation: &'static str },
    #[error("the System group cannot be {operation}")]
    SystemGroup { operation: &'static str },
    #[error("buckets cannot be created in the System group")]
    SystemGroupBucket,
    #[error("group {id} still contains {buckets} bucket(s)")]
    GroupNotEmpty { id: Uuid, buckets: usize },
    #[error("account {id} is referenced by {transactions} transaction(s)")]
    AccountInUse { id: Uuid, transactions: usize },
    #[error("bucket {id} is referenced by {transactions} transaction(s)")]
    BucketInUse { id: Uuid, transactions: usize },
    #[error("{entity} `{name}` already exists")]
    DuplicateName { entity: EntityKind, name: String },
}

/// Names the collection a lookup failed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    Group,
    Bucket,
    Transaction,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Account => "account",
            EntityKind::Group => "group",
            EntityKind::Bucket => "bucket",
            EntityKind::Transaction => "transaction",
        };
        f.write_str(label)
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Persistence(err.to_string())
    }
}
