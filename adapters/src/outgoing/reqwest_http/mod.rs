pub mod tile_fetch_reqwest;
