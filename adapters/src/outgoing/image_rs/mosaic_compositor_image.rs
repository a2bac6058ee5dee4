use image::{Rgba, RgbaImage, imageops};
use quantette::{ImageRef, PaletteSize, Pipeline, QuantizeMethod, deps::palette::Srgb};
use tokio::task::spawn_blocking;
use tracing::{debug, instrument};

use palettegen_application::{
    error::{AppError, AppResult},
    ports::outgoing::compositor::{CompositeOptions, CompositorPort, TilePlacement},
};

/// Composites tile images onto an opaque canvas and reduces the result to an
/// indexed PNG, either by quantizing or by mapping onto a caller-fixed
/// palette. The heavy lifting runs on the blocking thread pool.
#[derive(Clone, Default)]
pub struct ImageMosaicCompositorAdapter;

impl ImageMosaicCompositorAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl CompositorPort for ImageMosaicCompositorAdapter {
    #[instrument(skip(self, tiles, options), fields(tiles = tiles.len(), colors = options.target_colors))]
    async fn composite(
        &self,
        tiles: Vec<TilePlacement>,
        options: &CompositeOptions,
    ) -> AppResult<Vec<u8>> {
        let options = options.clone();
        spawn_blocking(move || composite_blocking(&tiles, &options))
            .await
            .map_err(|e| AppError::CompositeError {
                message: format!("Compositor task failed: {e}"),
            })?
    }
}

fn composite_blocking(tiles: &[TilePlacement], options: &CompositeOptions) -> AppResult<Vec<u8>> {
    let canvas = render_canvas(tiles, options)?;

    let (palette, indices) = match &options.fixed_palette {
        Some(packed) => map_to_fixed_palette(&canvas, packed)?,
        None => quantize(&canvas, options.target_colors)?,
    };
    debug!("Mosaic reduced to {} colors", palette.len());

    write_indexed_png(options.canvas_width, options.canvas_height, &palette, &indices)
}

fn render_canvas(tiles: &[TilePlacement], options: &CompositeOptions) -> AppResult<RgbaImage> {
    if options.canvas_width == 0 || options.canvas_height == 0 {
        return Err(AppError::CompositeError {
            message: "Canvas dimensions must be positive".to_string(),
        });
    }

    let mut canvas = RgbaImage::from_pixel(
        options.canvas_width,
        options.canvas_height,
        Rgba(options.background.to_rgba_bytes()),
    );

    for (index, tile) in tiles.iter().enumerate() {
        let decoded =
            image::load_from_memory(&tile.image_bytes).map_err(|e| AppError::CompositeError {
                message: format!("Failed to decode tile {index}: {e}"),
            })?;
        imageops::overlay(
            &mut canvas,
            &decoded.to_rgba8(),
            i64::from(tile.x_offset),
            i64::from(tile.y_offset),
        );
    }

    Ok(canvas)
}

fn quantize(canvas: &RgbaImage, target_colors: u16) -> AppResult<(Vec<[u8; 4]>, Vec<u8>)> {
    let (width, height) = canvas.dimensions();
    let pixels: Vec<Srgb<u8>> = canvas
        .pixels()
        .map(|Rgba([r, g, b, _])| Srgb::new(*r, *g, *b))
        .collect();

    let max_colors = target_colors.clamp(1, 256) as u8;
    let palette_size = PaletteSize::try_from(max_colors).unwrap_or(PaletteSize::MAX);

    let image = ImageRef::new(width, height, &pixels).map_err(|e| AppError::CompositeError {
        message: format!("Quantizer rejected canvas: {e}"),
    })?;

    let indexed = Pipeline::new()
        .palette_size(palette_size)
        .quantize_method(QuantizeMethod::Wu)
        .input_image(image)
        .output_srgb8_indexed_image();

    let palette: Vec<[u8; 4]> = indexed
        .palette()
        .iter()
        .map(|color| [color.red, color.green, color.blue, 0xff])
        .collect();
    let indices = indexed.indices().to_vec();

    Ok((palette, indices))
}

/// Map every canvas pixel to its nearest fixed-palette entry by squared RGB
/// distance. Entry order is kept so palette indices stay reproducible.
fn map_to_fixed_palette(canvas: &RgbaImage, packed: &[u8]) -> AppResult<(Vec<[u8; 4]>, Vec<u8>)> {
    let palette: Vec<[u8; 4]> = packed
        .chunks_exact(4)
        .filter_map(|rgba| <[u8; 4]>::try_from(rgba).ok())
        .collect();

    if palette.is_empty() || palette.len() > 256 {
        return Err(AppError::CompositeError {
            message: format!("Fixed palette must have 1-256 entries, got {}", palette.len()),
        });
    }

    let indices = canvas
        .pixels()
        .map(|Rgba([r, g, b, _])| nearest_index(&palette, *r, *g, *b))
        .collect();

    Ok((palette, indices))
}

fn nearest_index(palette: &[[u8; 4]], r: u8, g: u8, b: u8) -> u8 {
    let mut best = 0u8;
    let mut best_distance = u32::MAX;

    for (index, [pr, pg, pb, _]) in palette.iter().enumerate() {
        let dr = i32::from(*pr) - i32::from(r);
        let dg = i32::from(*pg) - i32::from(g);
        let db = i32::from(*pb) - i32::from(b);
        #[allow(clippy::cast_sign_loss)]
        let distance = (dr * dr + dg * dg + db * db) as u32;
        if distance < best_distance {
            best_distance = distance;
            best = index as u8;
        }
    }

    best
}

/// Alpha values of the leading palette entries, trimmed after the last
/// non-opaque one. An all-opaque palette yields an empty prefix and no tRNS
/// chunk at all.
fn transparency_prefix(palette: &[[u8; 4]]) -> Vec<u8> {
    let len = palette
        .iter()
        .rposition(|[_, _, _, alpha]| *alpha != 0xff)
        .map_or(0, |index| index + 1);

    palette
        .iter()
        .take(len)
        .map(|[_, _, _, alpha]| *alpha)
        .collect()
}

fn write_indexed_png(
    width: u32,
    height: u32,
    palette: &[[u8; 4]],
    indices: &[u8],
) -> AppResult<Vec<u8>> {
    let rgb: Vec<u8> = palette
        .iter()
        .flat_map(|[r, g, b, _]| [*r, *g, *b])
        .collect();
    let trns = transparency_prefix(palette);

    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, width, height);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(rgb);
    if !trns.is_empty() {
        encoder.set_trns(trns);
    }

    let mut writer = encoder
        .write_header()
        .map_err(|e| AppError::CompositeError {
            message: format!("Failed to write PNG header: {e}"),
        })?;
    writer
        .write_image_data(indices)
        .map_err(|e| AppError::CompositeError {
            message: format!("Failed to write PNG data: {e}"),
        })?;
    writer.finish().map_err(|e| AppError::CompositeError {
        message: format!("Failed to finish PNG stream: {e}"),
    })?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use domain::color::PaletteColor;
    use domain::palette::{decode_palette, encode_palette};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn options(width: u32, height: u32, fixed_palette: Option<Vec<u8>>) -> CompositeOptions {
        CompositeOptions {
            background: PaletteColor::opaque(255, 255, 255),
            target_colors: 4,
            canvas_width: width,
            canvas_height: height,
            fixed_palette,
        }
    }

    fn solid_png_tile(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let tile = RgbaImage::from_pixel(width, height, Rgba(rgba));
        let mut bytes = Vec::new();
        tile.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn nearest_index_picks_the_closest_entry() {
        let palette = [
            [0, 0, 0, 0xff],
            [255, 0, 0, 0xff],
            [255, 255, 255, 0xff],
        ];
        assert_eq!(nearest_index(&palette, 250, 10, 10), 1);
        assert_eq!(nearest_index(&palette, 5, 5, 5), 0);
        assert_eq!(nearest_index(&palette, 240, 240, 240), 2);
    }

    #[test]
    fn nearest_index_breaks_ties_toward_the_first_entry() {
        let palette = [[10, 0, 0, 0xff], [30, 0, 0, 0xff]];
        assert_eq!(nearest_index(&palette, 20, 0, 0), 0);
    }

    #[test]
    fn transparency_prefix_stops_after_last_translucent_entry() {
        let palette = [
            [0, 0, 0, 0x80],
            [1, 1, 1, 0xff],
            [2, 2, 2, 0x00],
            [3, 3, 3, 0xff],
        ];
        assert_eq!(transparency_prefix(&palette), vec![0x80, 0xff, 0x00]);
    }

    #[test]
    fn all_opaque_palette_needs_no_transparency_chunk() {
        let palette = [[0, 0, 0, 0xff], [1, 1, 1, 0xff]];
        assert_eq!(transparency_prefix(&palette), Vec::<u8>::new());
    }

    #[test]
    fn fixed_palette_mosaic_round_trips_through_the_codec() {
        let packed = encode_palette(&["ff0000", "00ff0080", "ffffff"]).unwrap();
        let tiles = vec![TilePlacement {
            x_offset: 0,
            y_offset: 0,
            image_bytes: solid_png_tile(2, 2, [250, 5, 5, 255]),
        }];

        let container = composite_blocking(&tiles, &options(2, 2, Some(packed))).unwrap();
        let decoded = decode_palette(&container).unwrap();

        let hex: Vec<String> = decoded.iter().map(PaletteColor::to_hex).collect();
        // tRNS covers the prefix through the translucent entry; the trailing
        // opaque entry decodes without an alpha component
        assert_eq!(hex, vec!["ff0000ff", "00ff0080", "ffffff"]);
    }

    #[test]
    fn rejects_undecodable_tiles() {
        let tiles = vec![TilePlacement {
            x_offset: 0,
            y_offset: 0,
            image_bytes: vec![1, 2, 3],
        }];

        let result = composite_blocking(&tiles, &options(2, 2, None));
        assert!(matches!(result, Err(AppError::CompositeError { .. })));
    }

    #[test]
    fn rejects_oversized_fixed_palettes() {
        let packed = vec![0u8; 257 * 4];
        let tiles = vec![TilePlacement {
            x_offset: 0,
            y_offset: 0,
            image_bytes: solid_png_tile(1, 1, [0, 0, 0, 255]),
        }];

        let result = composite_blocking(&tiles, &options(1, 1, Some(packed)));
        assert!(matches!(result, Err(AppError::CompositeError { .. })));
    }
}
