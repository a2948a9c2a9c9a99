/// Layer stacking and presentation.
pub mod compositor;
pub mod display_list;
/// Output frames.
pub mod frame;
/// Offscreen layers.
pub mod layer;
/// vello_cpu painting.
pub mod painter;
