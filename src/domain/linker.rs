//! Computes the heading links of a category from an admin selection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::category::CategoryHeadingLink;
use crate::domain::types::{CategoryId, DisplayOrder, HeadingId};

/// Position of a heading in a category's link set, before the category id is
/// known (a category being created has none yet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingPlacement {
    pub heading_id: HeadingId,
    pub display_order: DisplayOrder,
}

impl HeadingPlacement {
    pub fn link_to(self, category_id: CategoryId) -> CategoryHeadingLink {
        CategoryHeadingLink {
            category_id,
            heading_id: self.heading_id,
            display_order: self.display_order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("unknown headings: {}", format_ids(.0))]
    UnknownHeadings(Vec<HeadingId>),
    #[error("too many headings selected")]
    TooManyHeadings,
}

fn format_ids(ids: &[HeadingId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Turns the submitted heading selection into the full replacement link set.
///
/// Display orders follow submission order. Repeated ids keep their first
/// position. A single unknown id rejects the whole selection.
pub fn relink(
    submitted: &[HeadingId],
    known: &HashSet<HeadingId>,
) -> Result<Vec<HeadingPlacement>, LinkError> {
    let unknown: Vec<HeadingId> = submitted
        .iter()
        .filter(|id| !known.contains(id))
        .copied()
        .collect();
    if !unknown.is_empty() {
        return Err(LinkError::UnknownHeadings(unknown));
    }

    let mut seen = HashSet::new();
    let mut placements = Vec::with_capacity(submitted.len());
    for heading_id in submitted {
        if !seen.insert(*heading_id) {
            continue;
        }
        let position =
            i32::try_from(placements.len()).map_err(|_| LinkError::TooManyHeadings)?;
        let display_order =
            DisplayOrder::new(position).map_err(|_| LinkError::TooManyHeadings)?;
        placements.push(HeadingPlacement {
            heading_id: *heading_id,
            display_order,
        });
    }

    Ok(placements)
}
