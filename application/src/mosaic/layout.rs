//! Square-grid placement of sample tiles on the mosaic canvas.

/// Grid geometry for a mosaic of equally sized square tiles.
///
/// Tiles fill a roughly square grid: the side is the ceiling of the square
/// root of the tile count, and tile `i` lands at column `i % side`, row
/// `i / side`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicLayout {
    side: u32,
    tile_size: u32,
}

impl MosaicLayout {
    #[must_use]
    pub fn new(tile_count: usize, tile_size: u32) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let side = (tile_count as f64).sqrt().ceil() as u32;
        Self { side, tile_size }
    }

    /// Edge length of the square canvas in pixels.
    #[must_use]
    pub fn canvas_size(&self) -> u32 {
        self.side * self.tile_size
    }

    /// Pixel offset of the `index`-th tile's top-left corner.
    #[must_use]
    pub fn offset(&self, index: usize) -> (u32, u32) {
        let index = index as u32;
        (
            (index % self.side) * self.tile_size,
            (index / self.side) * self.tile_size,
        )
    }
}
