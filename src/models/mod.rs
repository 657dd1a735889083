pub mod export;

pub use export::{ExportedDocument, ImportedDocument, Tag, Task, TaskList};
