pub mod cache;
pub mod enrichment;
pub mod error;
pub mod language;
pub mod pipeline;
pub mod preference;
pub mod preprocess;
pub mod prompt;
pub mod session;
pub mod speech;
pub mod storage;
pub mod view;

pub use error::LookupError;
pub use pipeline::LookupPipeline;
pub use view::EntryView;
