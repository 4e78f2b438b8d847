pub mod build;
pub mod handle;
pub mod schema;
pub mod stats;
pub mod types;

pub use build::{build_index, build_index_from_sheets, IndexBuilder};
pub use handle::IndexHandle;
pub use types::*;
