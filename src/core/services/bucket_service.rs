use tracing::info;
use uuid::Uuid;

use crate::core::guard;
use crate::core::services::{next_sort_order, require, required_name};
use crate::currency::{self, Cents};
use crate::domain::bucket::Bucket;
use crate::errors::{ConflictError, CoreResult, EntityKind, ValidationError};
use crate::storage::{BucketPatch, Datastore};

/// Validated CRUD operations for buckets.
pub struct BucketService;

impl BucketService {
    /// Creates a bucket inside a user group, with an optional decimal
    /// target amount.
    pub fn create(
        store: &mut dyn Datastore,
        owner: Uuid,
        name: &str,
        group_id: Uuid,
        target: Option<f64>,
    ) -> CoreResult<Bucket> {
        let name = required_name(name, "name")?;
        guard::ensure_bucket_name_allowed(&name)?;
        let group = require(store.group(owner, group_id)?, EntityKind::Group, group_id)?;
        guard::ensure_group_accepts_buckets(&group)?;
        Self::ensure_name_free(store, owner, None, &name)?;
        let target_amount = match target {
            Some(value) => converted_target(value)?,
            None => 0,
        };
        let sort_order = next_sort_order(
            store
                .list_buckets(owner)?
                .iter()
                .map(|bucket| bucket.sort_order),
        );
        let bucket = Bucket::new(owner, name, group.id)
            .with_target(target_amount)
            .with_sort_order(sort_order);
        store.insert_bucket(bucket.clone())?;
        info!(bucket = %bucket.id, name = %bucket.name, "created bucket");
        Ok(bucket)
    }

    /// Renames a non-system bucket.
    pub fn rename(
        store: &mut dyn Datastore,
        owner: Uuid,
        id: Uuid,
        new_name: &str,
    ) -> CoreResult<()> {
        let name = required_name(new_name, "name")?;
        let bucket = require(store.bucket(owner, id)?, EntityKind::Bucket, id)?;
        guard::ensure_bucket_mutable(&bucket, "renamed")?;
        guard::ensure_bucket_name_allowed(&name)?;
        Self::ensure_name_free(store, owner, Some(id), &name)?;
        store.update_bucket(
            owner,
            id,
            BucketPatch {
                name: Some(name),
                ..BucketPatch::default()
            },
        )
    }

    /// Updates the target from a decimal amount. Targets are aspirations
    /// only; they never move money.
    pub fn set_target(
        store: &mut dyn Datastore,
        owner: Uuid,
        id: Uuid,
        target: f64,
    ) -> CoreResult<()> {
        let bucket = require(store.bucket(owner, id)?, EntityKind::Bucket, id)?;
        guard::ensure_bucket_mutable(&bucket, "retargeted")?;
        let target_amount = converted_target(target)?;
        store.update_bucket(
            owner,
            id,
            BucketPatch {
                target_amount: Some(target_amount),
                ..BucketPatch::default()
            },
        )
    }

    /// Moves the bucket into another user group.
    pub fn move_to_group(
        store: &mut dyn Datastore,
        owner: Uuid,
        id: Uuid,
        group_id: Uuid,
    ) -> CoreResult<()> {
        let bucket = require(store.bucket(owner, id)?, EntityKind::Bucket, id)?;
        guard::ensure_bucket_mutable(&bucket, "moved")?;
        let group = require(store.group(owner, group_id)?, EntityKind::Group, group_id)?;
        guard::ensure_group_accepts_buckets(&group)?;
        store.update_bucket(
            owner,
            id,
            BucketPatch {
                group_id: Some(group.id),
                ..BucketPatch::default()
            },
        )
    }

    /// Archives or unarchives the bucket. Archived buckets keep their
    /// balance and history.
    pub fn set_archived(
        store: &mut dyn Datastore,
        owner: Uuid,
        id: Uuid,
        archived: bool,
    ) -> CoreResult<()> {
        let bucket = require(store.bucket(owner, id)?, EntityKind::Bucket, id)?;
        let operation = if archived { "archived" } else { "unarchived" };
        guard::ensure_bucket_mutable(&bucket, operation)?;
        store.update_bucket(
            owner,
            id,
            BucketPatch {
                is_archived: Some(archived),
                ..BucketPatch::default()
            },
        )
    }

    /// Removes a bucket that no transaction references.
    pub fn delete(store: &mut dyn Datastore, owner: Uuid, id: Uuid) -> CoreResult<()> {
        let bucket = require(store.bucket(owner, id)?, EntityKind::Bucket, id)?;
        guard::ensure_bucket_mutable(&bucket, "deleted")?;
        let linked = store
            .list_transactions(owner)?
            .iter()
            .filter(|transaction| transaction.references_bucket(id))
            .count();
        if linked > 0 {
            return Err(ConflictError::BucketInUse {
                id,
                transactions: linked,
            }
            .into());
        }
        store.delete_bucket(owner, id)
    }

    /// Applies a new display order in a single datastore call.
    pub fn reorder(store: &mut dyn Datastore, owner: Uuid, ordered_ids: &[Uuid]) -> CoreResult<()> {
        store.reorder_buckets(owner, ordered_ids)
    }

    pub fn list(store: &dyn Datastore, owner: Uuid) -> CoreResult<Vec<Bucket>> {
        store.list_buckets(owner)
    }

    fn ensure_name_free(
        store: &dyn Datastore,
        owner: Uuid,
        exclude: Option<Uuid>,
        candidate: &str,
    ) -> CoreResult<()> {
        let normalized = candidate.trim().to_ascii_lowercase();
        let duplicate = store.list_buckets(owner)?.iter().any(|bucket| {
            let name = bucket.name.trim().to_ascii_lowercase();
            name == normalized && exclude.map_or(true, |id| bucket.id != id)
        });
        if duplicate {
            Err(ConflictError::DuplicateName {
                entity: EntityKind::Bucket,
                name: candidate.to_string(),
            }
            .into())
        } else {
            Ok(())
        }
    }
}

fn converted_target(value: f64) -> Result<Cents, ValidationError> {
    let cents = currency::from_decimal(value)?;
    if cents < 0 {
        Err(ValidationError::NegativeTarget)
    } else {
        Ok(cents)
    }
}
