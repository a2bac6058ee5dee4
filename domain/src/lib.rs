pub mod chunk;
pub mod color;
pub mod coords;
pub mod error;
pub mod palette;
