//! Idempotent provisioning of the default groups and the system bucket.

use std::collections::HashSet;

use tracing::info;
use uuid::Uuid;

use crate::domain::bucket::{Bucket, TO_BE_BUDGETED};
use crate::domain::group::{Group, Philosophy, SYSTEM_GROUP_TITLE};
use crate::errors::{CoreError, CoreResult};
use crate::storage::Datastore;

/// Groups provisioned for every owner, with their display slots.
const DEFAULT_GROUPS: [(&str, i32, Option<Philosophy>); 4] = [
    (SYSTEM_GROUP_TITLE, 0, None),
    ("Needs", 10, Some(Philosophy::Need)),
    ("Wants", 20, Some(Philosophy::Want)),
    ("Savings", 30, Some(Philosophy::Savings)),
];

/// What one [`SeedService::ensure`] call had to provision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub groups_created: usize,
    pub bucket_created: bool,
}

impl SeedReport {
    pub fn created_anything(&self) -> bool {
        self.groups_created > 0 || self.bucket_created
    }
}

/// Provisions the per-owner defaults on first login.
pub struct SeedService;

impl SeedService {
    /// Ensures the default groups and the system bucket exist.
    ///
    /// Existing groups are matched by exact title and only the missing ones
    /// are inserted, so calling this on every login is safe. A lost system
    /// bucket is likewise recreated on the next call.
    pub fn ensure(store: &mut dyn Datastore, owner: Uuid) -> CoreResult<SeedReport> {
        let mut report = SeedReport::default();
        let existing: HashSet<String> = store
            .list_groups(owner)?
            .into_iter()
            .map(|group| group.title)
            .collect();
        for (title, sort_order, philosophy) in DEFAULT_GROUPS {
            if existing.contains(title) {
                continue;
            }
            let mut group = Group::new(owner, title).with_sort_order(sort_order);
            group.philosophy = philosophy;
            store.insert_group(group)?;
            report.groups_created += 1;
        }

        let groups = store.list_groups(owner)?;
        let system = groups
            .iter()
            .find(|group| group.is_system())
            .ok_or_else(|| CoreError::Persistence("System group missing after seeding".into()))?;
        let has_system_bucket = store
            .list_buckets(owner)?
            .iter()
            .any(|bucket| bucket.is_system());
        if !has_system_bucket {
            store.insert_bucket(Bucket::new(owner, TO_BE_BUDGETED, system.id))?;
            report.bucket_created = true;
        }

        if report.created_anything() {
            info!(
                owner = %owner,
                groups = report.groups_created,
                bucket = report.bucket_created,
                "seeded default envelope data"
            );
        }
        Ok(report)
    }
}
