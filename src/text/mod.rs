/// Font registration and line layout.
pub mod layout;
/// Floating mood text.
pub mod mood;
