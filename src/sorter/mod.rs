pub mod classifier;
pub mod organizer;

pub use classifier::{FolderClassifier, Technology};
pub use organizer::{FolderMove, SortConflict, SortPlan, SortReport, Sorter, WrappedFile};
