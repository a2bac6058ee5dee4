pub mod mosaic_compositor_image;
