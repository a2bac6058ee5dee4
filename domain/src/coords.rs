use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::DomainError;

/// Tile address in a z/x/y tiling scheme.
///
/// Serialized as a `[z, x, y]` triple to match sample lists in run
/// configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 3]", into = "[u32; 3]")]
pub struct TileCoord {
    pub z: u32,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    #[must_use]
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }
}

impl From<[u32; 3]> for TileCoord {
    fn from([z, x, y]: [u32; 3]) -> Self {
        Self { z, x, y }
    }
}

impl From<TileCoord> for [u32; 3] {
    fn from(coord: TileCoord) -> Self {
        [coord.z, coord.x, coord.y]
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

impl FromStr for TileCoord {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        let mut next = |name: &str| {
            let part = parts.next().ok_or_else(|| {
                DomainError::InvalidCoordinates(format!("Expected format 'z/x/y', got '{s}'"))
            })?;
            part.parse::<u32>().map_err(|e| {
                DomainError::InvalidCoordinates(format!("Invalid {name} coordinate '{part}': {e}"))
            })
        };

        let z = next("z")?;
        let x = next("x")?;
        let y = next("y")?;
        if parts.next().is_some() {
            return Err(DomainError::InvalidCoordinates(format!(
                "Expected format 'z/x/y', got '{s}'"
            )));
        }

        Ok(TileCoord::new(z, x, y))
    }
}
