pub mod file_extractor;
pub mod output_manager;
pub mod report;
pub mod resources;
pub mod sections;

pub use file_extractor::{document_base_name, DocumentOutcome, DocumentProcessor};
pub use output_manager::{move_path, validate_section_name, OriginalsArchive, OutputFolder};
pub use report::{BatchSummary, EntryReport};
pub use resources::{find_resource_urls, Localizer, ResourceEvent, ResourceScanner};
pub use sections::{extract_sections, scan_sections, RawSection};
