/// Key-value archive of scene records.
pub mod archive;
/// The persisted scene record.
pub mod state;
/// Thumbnails and PNG export.
pub mod thumbnail;
