use serde::{Deserialize, Serialize};

use crate::domain::types::{DisplayOrder, HeadingId, HeadingName};

/// Group under which categories are listed. Managed outside the category
/// screens; the category core only reads headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub id: HeadingId,
    pub name: HeadingName,
    pub display_order: DisplayOrder,
}
