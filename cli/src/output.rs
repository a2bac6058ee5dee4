use std::io::Write;

use palettegen_application::error::AppResult;
use palettegen_application::ports::incoming::palettes::PaletteSet;

/// Render the result mapping as pretty-printed JSON, one entry per zoom key
/// in configuration order, followed by a trailing newline.
pub fn write_palettes<W: Write>(out: &mut W, palettes: &PaletteSet) -> AppResult<()> {
    serde_json::to_writer_pretty(&mut *out, palettes)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    #[test]
    fn keys_are_emitted_in_insertion_order() {
        let palettes: PaletteSet = IndexMap::from([
            ("10".to_string(), vec!["ff000080".to_string()]),
            ("2".to_string(), vec!["00ff00".to_string()]),
        ]);

        let mut out = Vec::new();
        write_palettes(&mut out, &palettes).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.find("\"10\"").unwrap() < text.find("\"2\"").unwrap());
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn values_round_trip_as_exact_strings() {
        let palettes: PaletteSet = IndexMap::from([(
            "0".to_string(),
            vec!["0a141e".to_string(), "ffffff00".to_string()],
        )]);

        let mut out = Vec::new();
        write_palettes(&mut out, &palettes).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            parsed.get("0").unwrap(),
            &serde_json::json!(["0a141e", "ffffff00"])
        );
    }
}
