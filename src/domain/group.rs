//! Domain types for bucket groups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// Title of the protected group that hosts the system bucket.
pub const SYSTEM_GROUP_TITLE: &str = "System";

/// Organises buckets into display sections on the budget screen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub philosophy: Option<Philosophy>,
    #[serde(default)]
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn new(owner_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            philosophy: None,
            sort_order: 0,
            created_at: Utc::now(),
        }
    }

    pub fn with_philosophy(mut self, philosophy: Philosophy) -> Self {
        self.philosophy = Some(philosophy);
        self
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// True for the protected "System" group.
    pub fn is_system(&self) -> bool {
        is_system_group_title(&self.title)
    }
}

impl Identifiable for Group {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Group {
    fn name(&self) -> &str {
        &self.title
    }
}

impl Reorderable for Group {
    fn sort_order(&self) -> i32 {
        self.sort_order
    }

    fn set_sort_order(&mut self, sort_order: i32) {
        self.sort_order = sort_order;
    }
}

/// True when the candidate title names the protected group.
///
/// Matching ignores surrounding whitespace and ASCII case so near-misses
/// cannot smuggle a second "system" group past the guard.
pub fn is_system_group_title(title: &str) -> bool {
    title.trim().eq_ignore_ascii_case(SYSTEM_GROUP_TITLE)
}

/// Budgeting philosophy a group's buckets follow.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Philosophy {
    Need,
    Want,
    Savings,
}
