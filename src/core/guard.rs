//! Write-boundary protection for the system bucket and its group.
//!
//! "To Be Budgeted" and the "System" group are ordinary rows with a
//! distinguished meaning. Nothing marks them in the data; these checks are
//! the only thing standing between them and a rename or delete.

use crate::domain::bucket::{is_system_bucket_name, Bucket};
use crate::domain::group::{is_system_group_title, Group};
use crate::errors::ConflictError;

/// Rejects bucket names that would collide with "To Be Budgeted".
pub fn ensure_bucket_name_allowed(name: &str) -> Result<(), ConflictError> {
    if is_system_bucket_name(name) {
        Err(ConflictError::ReservedBucketName {
            name: name.trim().to_string(),
        })
    } else {
        Ok(())
    }
}

/// Rejects group titles that would collide with "System".
pub fn ensure_group_title_allowed(title: &str) -> Result<(), ConflictError> {
    if is_system_group_title(title) {
        Err(ConflictError::ReservedGroupTitle {
            title: title.trim().to_string(),
        })
    } else {
        Ok(())
    }
}

/// Blocks a mutating operation aimed at the protected bucket.
pub fn ensure_bucket_mutable(bucket: &Bucket, operation: &'static str) -> Result<(), ConflictError> {
    if bucket.is_system() {
        Err(ConflictError::SystemBucket { operation })
    } else {
        Ok(())
    }
}

/// Blocks a mutating operation aimed at the protected group.
pub fn ensure_group_mutable(group: &Group, operation: &'static str) -> Result<(), ConflictError> {
    if group.is_system() {
        Err(ConflictError::SystemGroup { operation })
    } else {
        Ok(())
    }
}

/// Rejects placing user buckets inside the System group.
pub fn ensure_group_accepts_buckets(group: &Group) -> Result<(), ConflictError> {
    if group.is_system() {
        Err(ConflictError::SystemGroupBucket)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::bucket::TO_BE_BUDGETED;
    use crate::domain::group::SYSTEM_GROUP_TITLE;
    use uuid::Uuid;

    #[test]
    fn reserved_names_match_ignoring_case_and_padding() {
        assert_eq!(
            ensure_bucket_name_allowed(" TO BE budgeted "),
            Err(ConflictError::ReservedBucketName {
                name: "TO BE budgeted".to_string(),
            })
        );
        assert_eq!(ensure_bucket_name_allowed("Groceries"), Ok(()));

        assert_eq!(
            ensure_group_title_allowed("\tsystem"),
            Err(ConflictError::ReservedGroupTitle {
                title: "system".to_string(),
            })
        );
        assert_eq!(ensure_group_title_allowed("Needs"), Ok(()));
    }

    #[test]
    fn protected_rows_reject_every_named_operation() {
        let owner = Uuid::new_v4();
        let system_group = Group::new(owner, SYSTEM_GROUP_TITLE);
        let tbb = Bucket::new(owner, TO_BE_BUDGETED, system_group.id);

        for operation in ["renamed", "retargeted", "moved", "archived", "deleted"] {
            assert_eq!(
                ensure_bucket_mutable(&tbb, operation),
                Err(ConflictError::SystemBucket { operation })
            );
        }
        assert_eq!(
            ensure_group_mutable(&system_group, "deleted"),
            Err(ConflictError::SystemGroup {
                operation: "deleted",
            })
        );
        assert_eq!(
            ensure_group_accepts_buckets(&system_group),
            Err(ConflictError::SystemGroupBucket)
        );
    }

    #[test]
    fn ordinary_rows_pass_every_check() {
        let owner = Uuid::new_v4();
        let needs = Group::new(owner, "Needs");
        let groceries = Bucket::new(owner, "Groceries", needs.id);

        assert_eq!(ensure_bucket_mutable(&groceries, "renamed"), Ok(()));
        assert_eq!(ensure_group_mutable(&needs, "renamed"), Ok(()));
        assert_eq!(ensure_group_accepts_buckets(&needs), Ok(()));
    }
}
