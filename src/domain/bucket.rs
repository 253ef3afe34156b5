//! Domain types for budgeting buckets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::currency::Cents;
use crate::domain::common::*;

/// Name of the distinguished system bucket holding unallocated money.
pub const TO_BE_BUDGETED: &str = "To Be Budgeted";

/// An envelope that earmarks part of the owner's cash for a purpose.
///
/// Bucket balances never describe where money physically sits; they split
/// the same cash that accounts hold into intentions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bucket {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub group_id: Uuid,
    #[serde(default)]
    pub target_amount: Cents,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl Bucket {
    pub fn new(owner_id: Uuid, name: impl Into<String>, group_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            group_id,
            target_amount: 0,
            is_archived: false,
            sort_order: 0,
            created_at: Utc::now(),
        }
    }

    pub fn with_target(mut self, target_amount: Cents) -> Self {
        self.target_amount = target_amount;
        self
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// True for the protected "To Be Budgeted" bucket.
    pub fn is_system(&self) -> bool {
        is_system_bucket_name(&self.name)
    }
}

impl Identifiable for Bucket {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Bucket {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Reorderable for Bucket {
    fn sort_order(&self) -> i32 {
        self.sort_order
    }

    fn set_sort_order(&mut self, sort_order: i32) {
        self.sort_order = sort_order;
    }
}

/// True when the candidate names the protected "To Be Budgeted" bucket,
/// ignoring surrounding whitespace and ASCII case.
pub fn is_system_bucket_name(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(TO_BE_BUDGETED)
}
