use serde::{Deserialize, Serialize};

use crate::domain::types::{CategoryTag, PublicBodyId, PublicBodyName};

/// Registry record that refers to categories through its tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicBody {
    pub id: PublicBodyId,
    pub name: PublicBodyName,
    pub tags: Vec<String>,
}

impl PublicBody {
    pub fn has_tag(&self, tag: &CategoryTag) -> bool {
        self.tags.iter().any(|t| t == tag.as_str())
    }
}
