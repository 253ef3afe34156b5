use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::{self, Cents};
use crate::domain::common::Identifiable;
use crate::errors::ValidationError;

/// An immutable ledger entry. Rows are only ever appended or deleted;
/// corrections happen by deleting and re-logging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub date: NaiveDate,
    /// Magnitude in cents, always positive. Direction lives in the kind.
    pub amount: Cents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub kind: TransactionKind,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(owner_id: Uuid, date: NaiveDate, amount: Cents, kind: TransactionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            date,
            amount,
            description: None,
            kind,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.kind.transaction_type()
    }

    /// Decomposes the entry into its two signed postings.
    ///
    /// Every transaction type moves value in exactly two places; summing
    /// postings per side is what keeps cash and budget totals in lockstep.
    pub fn postings(&self) -> [Posting; 2] {
        let amount = self.amount;
        match self.kind {
            TransactionKind::Expense {
                from_account,
                from_bucket,
            } => [
                Posting::account(from_account, -amount),
                Posting::bucket(from_bucket, -amount),
            ],
            TransactionKind::Income {
                to_account,
                to_bucket,
            } => [
                Posting::account(to_account, amount),
                Posting::bucket(to_bucket, amount),
            ],
            TransactionKind::Transfer {
                from_account,
                to_account,
            } => [
                Posting::account(from_account, -amount),
                Posting::account(to_account, amount),
            ],
            TransactionKind::BucketMove {
                from_bucket,
                to_bucket,
            } => [
                Posting::bucket(from_bucket, -amount),
                Posting::bucket(to_bucket, amount),
            ],
        }
    }

    pub fn references_account(&self, id: Uuid) -> bool {
        self.postings()
            .iter()
            .any(|posting| posting.side == LedgerSide::Account && posting.entity_id == id)
    }

    pub fn references_bucket(&self, id: Uuid) -> bool {
        self.postings()
            .iter()
            .any(|posting| posting.side == LedgerSide::Bucket && posting.entity_id == id)
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// The movement payload of a ledger entry.
///
/// Serialized internally tagged and flattened into [`Transaction`], so the
/// wire shape stays flat: a `type` discriminator plus exactly the two
/// reference columns that type uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransactionKind {
    /// Money leaves an account and the matching intention leaves a bucket.
    Expense { from_account: Uuid, from_bucket: Uuid },
    /// Money arrives in an account and lands in a bucket, usually the
    /// system bucket until it is allocated.
    Income { to_account: Uuid, to_bucket: Uuid },
    /// Cash changes custody between two accounts; budget is untouched.
    Transfer { from_account: Uuid, to_account: Uuid },
    /// Intention moves between two buckets; cash is untouched.
    BucketMove { from_bucket: Uuid, to_bucket: Uuid },
}

impl TransactionKind {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            TransactionKind::Expense { .. } => TransactionType::Expense,
            TransactionKind::Income { .. } => TransactionType::Income,
            TransactionKind::Transfer { .. } => TransactionType::Transfer,
            TransactionKind::BucketMove { .. } => TransactionType::BucketMove,
        }
    }
}

/// Discriminator for the four supported movement shapes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Expense,
    Income,
    Transfer,
    BucketMove,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionType::Expense => "Expense",
            TransactionType::Income => "Income",
            TransactionType::Transfer => "Transfer",
            TransactionType::BucketMove => "Bucket move",
        };
        f.write_str(label)
    }
}

/// Ledger side an entity lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerSide {
    Account,
    Bucket,
}

/// One signed balance adjustment produced by a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub side: LedgerSide,
    pub entity_id: Uuid,
    pub delta: Cents,
}

impl Posting {
    pub fn account(entity_id: Uuid, delta: Cents) -> Self {
        Self {
            side: LedgerSide::Account,
            entity_id,
            delta,
        }
    }

    pub fn bucket(entity_id: Uuid, delta: Cents) -> Self {
        Self {
            side: LedgerSide::Bucket,
            entity_id,
            delta,
        }
    }
}

/// Loose transaction payload as submitted by an entry form.
///
/// The amount is still a decimal currency value and the references are all
/// optional; [`TransactionDraft::validate`] turns this into a well-formed
/// [`TransactionKind`] or reports the first violated rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionDraft {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_account: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_bucket: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_bucket: Option<Uuid>,
}

impl TransactionDraft {
    fn base(kind: TransactionType, amount: f64, date: NaiveDate) -> Self {
        Self {
            kind,
            amount,
            date,
            description: None,
            from_account: None,
            to_account: None,
            from_bucket: None,
            to_bucket: None,
        }
    }

    pub fn expense(amount: f64, date: NaiveDate, from_account: Uuid, from_bucket: Uuid) -> Self {
        Self {
            from_account: Some(from_account),
            from_bucket: Some(from_bucket),
            ..Self::base(TransactionType::Expense, amount, date)
        }
    }

    pub fn income(amount: f64, date: NaiveDate, to_account: Uuid, to_bucket: Uuid) -> Self {
        Self {
            to_account: Some(to_account),
            to_bucket: Some(to_bucket),
            ..Self::base(TransactionType::Income, amount, date)
        }
    }

    pub fn transfer(amount: f64, date: NaiveDate, from_account: Uuid, to_account: Uuid) -> Self {
        Self {
            from_account: Some(from_account),
            to_account: Some(to_account),
            ..Self::base(TransactionType::Transfer, amount, date)
        }
    }

    pub fn bucket_move(amount: f64, date: NaiveDate, from_bucket: Uuid, to_bucket: Uuid) -> Self {
        Self {
            from_bucket: Some(from_bucket),
            to_bucket: Some(to_bucket),
            ..Self::base(TransactionType::BucketMove, amount, date)
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks the per-type field contract and converts the decimal amount
    /// to cents.
    ///
    /// Rules run in a fixed order and the first violation wins: amount
    /// conversion, amount positivity, required references, forbidden
    /// references, then the same-entity checks. A `$0.00` draft therefore
    /// fails on positivity even when its references are also wrong.
    pub fn validate(&self) -> Result<ValidatedTransaction, ValidationError> {
        let amount = currency::from_decimal(self.amount)?;
        if amount <= 0 {
            return Err(ValidationError::AmountNotPositive);
        }
        let kind = match self.kind {
            TransactionType::Expense => {
                let from_account = require(self.from_account, "from_account")?;
                let from_bucket = require(self.from_bucket, "from_bucket")?;
                forbid(self.to_account, "to_account")?;
                forbid(self.to_bucket, "to_bucket")?;
                TransactionKind::Expense {
                    from_account,
                    from_bucket,
                }
            }
            TransactionType::Income => {
                let to_account = require(self.to_account, "to_account")?;
                let to_bucket = require(self.to_bucket, "to_bucket")?;
                forbid(self.from_account, "from_account")?;
                forbid(self.from_bucket, "from_bucket")?;
                TransactionKind::Income {
                    to_account,
                    to_bucket,
                }
            }
            TransactionType::Transfer => {
                let from_account = require(self.from_account, "from_account")?;
                let to_account = require(self.to_account, "to_account")?;
                forbid(self.from_bucket, "from_bucket")?;
                forbid(self.to_bucket, "to_bucket")?;
                if from_account == to_account {
                    return Err(ValidationError::SameAccountTransfer);
                }
                TransactionKind::Transfer {
                    from_account,
                    to_account,
                }
            }
            TransactionType::BucketMove => {
                let from_bucket = require(self.from_bucket, "from_bucket")?;
                let to_bucket = require(self.to_bucket, "to_bucket")?;
                forbid(self.from_account, "from_account")?;
                forbid(self.to_account, "to_account")?;
                if from_bucket == to_bucket {
                    return Err(ValidationError::SameBucketMove);
                }
                TransactionKind::BucketMove {
                    from_bucket,
                    to_bucket,
                }
            }
        };
        Ok(ValidatedTransaction {
            amount,
            date: self.date,
            description: normalized_description(self.description.as_deref()),
            kind,
        })
    }
}

/// Outcome of draft validation: the exact payload a [`Transaction`] row is
/// built from, with the amount already in cents.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTransaction {
    pub amount: Cents,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub kind: TransactionKind,
}

fn require(field: Option<Uuid>, name: &'static str) -> Result<Uuid, ValidationError> {
    field.ok_or(ValidationError::MissingField(name))
}

fn forbid(field: Option<Uuid>, name: &'static str) -> Result<(), ValidationError> {
    if field.is_some() {
        Err(ValidationError::ForbiddenField(name))
    } else {
        Ok(())
    }
}

fn normalized_description(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}
