/// Decoded source images.
pub mod image;
/// Background image decoding.
pub mod loader;
/// Order-stable named reference images.
pub mod pool;
