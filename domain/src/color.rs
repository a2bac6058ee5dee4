use serde::{Deserialize, Serialize};
use std::{fmt, ops::Range, str::FromStr};

use crate::error::{DomainError, DomainResult};

/// One slot of an indexed color table.
///
/// The alpha component mirrors the container: entries covered by a
/// transparency chunk carry `Some(alpha)`, all others carry `None` and render
/// as plain `rrggbb`. The distinction is preserved through hex round trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaletteColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: Option<u8>,
}

impl PaletteColor {
    #[must_use]
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            alpha: None,
        }
    }

    #[must_use]
    pub fn with_alpha(r: u8, g: u8, b: u8, alpha: u8) -> Self {
        Self {
            r,
            g,
            b,
            alpha: Some(alpha),
        }
    }

    /// Lowercase hex rendering: `rrggbb` without alpha, `rrggbbaa` with.
    #[must_use]
    pub fn to_hex(&self) -> String {
        match self.alpha {
            Some(alpha) => format!("{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, alpha),
            None => format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b),
        }
    }

    /// Packed RGBA bytes; entries without an explicit alpha are fully opaque.
    #[must_use]
    pub fn to_rgba_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.alpha.unwrap_or(0xff)]
    }
}

impl fmt::Display for PaletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for PaletteColor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 6 && s.len() != 8 {
            return Err(DomainError::InvalidColorFormat(format!(
                "Expected 6 or 8 hex digits, got '{s}'"
            )));
        }
        // from_str_radix tolerates a leading `+`, so digits are checked first
        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(DomainError::InvalidColorFormat(format!(
                "Non-hex digits in '{s}'"
            )));
        }

        let channel = |range: Range<usize>| -> DomainResult<u8> {
            let digits = s.get(range).ok_or_else(|| {
                DomainError::InvalidColorFormat(format!("Non-ASCII hex string '{s}'"))
            })?;
            u8::from_str_radix(digits, 16).map_err(|_| {
                DomainError::InvalidColorFormat(format!("Invalid hex digits '{digits}' in '{s}'"))
            })
        };

        let r = channel(0..2)?;
        let g = channel(2..4)?;
        let b = channel(4..6)?;
        let alpha = if s.len() == 8 {
            Some(channel(6..8)?)
        } else {
            None
        };

        Ok(Self { r, g, b, alpha })
    }
}
