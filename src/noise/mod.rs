/// Perlin noise field.
pub mod field;
