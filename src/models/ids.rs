//! Strongly-typed ID for budget items
//!
//! Items move between sheets and get reordered, so each one carries a stable
//! identity independent of its position.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const ITEM_PREFIX: &str = "itm-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", ITEM_PREFIX, &self.0.to_string()[..8])
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix(ITEM_PREFIX).unwrap_or(s);
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefix() {
        let id = ItemId::new();
        let shown = id.to_string();
        assert!(shown.starts_with("itm-"));
        assert_eq!(shown.len(), 12);
    }

    #[test]
    fn test_parse_full_uuid() {
        let id = ItemId::new();
        let parsed: ItemId = id.as_uuid().to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }
}
