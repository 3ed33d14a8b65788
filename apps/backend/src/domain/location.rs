use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a chip physically sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Location {
    /// Reserve not available for immediate play.
    Vault,
    /// Cash register: chips available for sale and buy-ins.
    Cash,
    /// Chips in players' hands at the tables.
    Circulation,
}

impl Location {
    pub const ALL: [Location; 3] = [Location::Vault, Location::Cash, Location::Circulation];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Location::Vault => "VAULT",
            Location::Cash => "CASH",
            Location::Circulation => "CIRCULATION",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
