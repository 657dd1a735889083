pub mod export_store;
pub mod list_tag_converter;

pub use export_store::ExportStore;
pub use list_tag_converter::{build_tags, convert, retag_tasks, slugify, Lists};
