//! Decoding and encoding of the color table embedded in an indexed PNG.

use crate::chunk::ChunkScanner;
use crate::color::PaletteColor;
use crate::error::{DomainError, DomainResult};

const PALETTE_TAG: [u8; 4] = *b"PLTE";
const TRANSPARENCY_TAG: [u8; 4] = *b"tRNS";

/// Extract the ordered color table of an indexed PNG.
///
/// The first `PLTE` chunk supplies the RGB triplets, one table entry per
/// consecutive 3-byte group, in index order. The first `tRNS` chunk, when
/// present, overlays per-index alpha values onto the leading entries; table
/// entries past its end keep no alpha component at all. Entry order is the
/// quantizer's index assignment and is never reordered or deduplicated.
pub fn decode_palette(buf: &[u8]) -> DomainResult<Vec<PaletteColor>> {
    let mut plte: Option<&[u8]> = None;
    let mut trns: Option<&[u8]> = None;

    for chunk in ChunkScanner::new(buf)? {
        let chunk = chunk?;
        match chunk.tag {
            PALETTE_TAG if plte.is_none() => plte = Some(chunk.payload),
            TRANSPARENCY_TAG if trns.is_none() => trns = Some(chunk.payload),
            _ => {}
        }
    }

    let plte = plte.ok_or(DomainError::MissingPalette)?;
    let trns = trns.unwrap_or_default();

    let mut colors = Vec::with_capacity(plte.len() / 3);
    for (index, triplet) in plte.chunks_exact(3).enumerate() {
        if let &[r, g, b] = triplet {
            let color = match trns.get(index) {
                Some(&alpha) => PaletteColor::with_alpha(r, g, b, alpha),
                None => PaletteColor::opaque(r, g, b),
            };
            colors.push(color);
        }
    }

    Ok(colors)
}

/// Pack hex color strings into raw RGBA bytes, suitable as a fixed palette
/// for the quantizer. Six-digit entries are normalized to fully opaque.
/// Input order is preserved exactly; duplicates are kept.
pub fn encode_palette<S: AsRef<str>>(colors: &[S]) -> DomainResult<Vec<u8>> {
    let mut packed = Vec::with_capacity(colors.len() * 4);
    for color in colors {
        let color: PaletteColor = color.as_ref().parse()?;
        packed.extend_from_slice(&color.to_rgba_bytes());
    }
    Ok(packed)
}
