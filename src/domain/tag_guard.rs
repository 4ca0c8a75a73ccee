//! Protects the tag of a category while public bodies still use it.

use serde::Serialize;
use thiserror::Error;

use crate::domain::category::Category;
use crate::domain::types::CategoryTag;

pub const TAG_IN_USE_MESSAGE: &str =
    "There are authorities associated with this category, so the tag can't be renamed";

/// The current tag is referenced by public bodies and cannot change.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{}", TAG_IN_USE_MESSAGE)]
pub struct TagInUse {
    pub tag: CategoryTag,
    pub references: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameDecision {
    Allow,
    Deny(TagInUse),
}

impl RenameDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Decides whether `category` may take `proposed` as its tag.
///
/// `count_references` is only called when the tag actually changes.
pub fn check_rename<F, E>(
    category: &Category,
    proposed: &CategoryTag,
    count_references: F,
) -> Result<RenameDecision, E>
where
    F: FnOnce(&CategoryTag) -> Result<usize, E>,
{
    if *proposed == category.tag {
        return Ok(RenameDecision::Allow);
    }

    let references = count_references(&category.tag)?;
    if references > 0 {
        Ok(RenameDecision::Deny(TagInUse {
            tag: category.tag.clone(),
            references,
        }))
    } else {
        Ok(RenameDecision::Allow)
    }
}
