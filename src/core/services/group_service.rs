use tracing::info;
use uuid::Uuid;

use crate::core::guard;
use crate::core::services::{next_sort_order, require, required_name};
use crate::domain::group::{Group, Philosophy};
use crate::errors::{ConflictError, CoreResult, EntityKind};
use crate::storage::{Datastore, GroupPatch};

/// Validated CRUD operations for bucket groups.
pub struct GroupService;

impl GroupService {
    /// Creates a group. The "System" title stays reserved for seeding.
    pub fn create(
        store: &mut dyn Datastore,
        owner: Uuid,
        title: &str,
        philosophy: Option<Philosophy>,
    ) -> CoreResult<Group> {
        let title = required_name(title, "title")?;
        guard::ensure_group_title_allowed(&title)?;
        Self::ensure_title_free(store, owner, None, &title)?;
        let sort_order = next_sort_order(
            store
                .list_groups(owner)?
                .iter()
                .map(|group| group.sort_order),
        );
        let mut group = Group::new(owner, title).with_sort_order(sort_order);
        group.philosophy = philosophy;
        store.insert_group(group.clone())?;
        info!(group = %group.id, title = %group.title, "created group");
        Ok(group)
    }

    /// Renames a non-system group.
    pub fn rename(
        store: &mut dyn Datastore,
        owner: Uuid,
        id: Uuid,
        new_title: &str,
    ) -> CoreResult<()> {
        let title = required_name(new_title, "title")?;
        let group = require(store.group(owner, id)?, EntityKind::Group, id)?;
        guard::ensure_group_mutable(&group, "renamed")?;
        guard::ensure_group_title_allowed(&title)?;
        Self::ensure_title_free(store, owner, Some(id), &title)?;
        store.update_group(
            owner,
            id,
            GroupPatch {
                title: Some(title),
                ..GroupPatch::default()
            },
        )
    }

    /// Reclassifies the budgeting philosophy of a non-system group.
    pub fn set_philosophy(
        store: &mut dyn Datastore,
        owner: Uuid,
        id: Uuid,
        philosophy: Philosophy,
    ) -> CoreResult<()> {
        let group = require(store.group(owner, id)?, EntityKind::Group, id)?;
        guard::ensure_group_mutable(&group, "reclassified")?;
        store.update_group(
            owner,
            id,
            GroupPatch {
                philosophy: Some(philosophy),
                ..GroupPatch::default()
            },
        )
    }

    /// Deletes an empty, non-system group. Groups still holding buckets are
    /// rejected; moving the buckets out first is the caller's job.
    pub fn delete(store: &mut dyn Datastore, owner: Uuid, id: Uuid) -> CoreResult<()> {
        let group = require(store.group(owner, id)?, EntityKind::Group, id)?;
        guard::ensure_group_mutable(&group, "deleted")?;
        let buckets = store
            .list_buckets(owner)?
            .iter()
            .filter(|bucket| bucket.group_id == id)
            .count();
        if buckets > 0 {
            return Err(ConflictError::GroupNotEmpty { id, buckets }.into());
        }
        store.delete_group(owner, id)
    }

    /// Applies a new display order in a single datastore call.
    pub fn reorder(store: &mut dyn Datastore, owner: Uuid, ordered_ids: &[Uuid]) -> CoreResult<()> {
        store.reorder_groups(owner, ordered_ids)
    }

    pub fn list(store: &dyn Datastore, owner: Uuid) -> CoreResult<Vec<Group>> {
        store.list_groups(owner)
    }

    fn ensure_title_free(
        store: &dyn Datastore,
        owner: Uuid,
        exclude: Option<Uuid>,
        candidate: &str,
    ) -> CoreResult<()> {
        let normalized = candidate.trim().to_ascii_lowercase();
        let duplicate = store.list_groups(owner)?.iter().any(|group| {
            let title = group.title.trim().to_ascii_lowercase();
            title == normalized && exclude.map_or(true, |id| group.id != id)
        });
        if duplicate {
            Err(ConflictError::DuplicateName {
                entity: EntityKind::Group,
                name: candidate.to_string(),
            }
            .into())
        } else {
            Ok(())
        }
    }
}
