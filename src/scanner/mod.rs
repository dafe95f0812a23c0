pub mod document_scanner;
pub mod file_filter;

pub use document_scanner::{SourceEntry, SourceListing, SourceScanner};
pub use file_filter::FileFilter;
