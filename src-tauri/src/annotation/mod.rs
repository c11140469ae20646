pub mod commands;
pub mod controller;
pub mod debounce;
pub mod marks;
pub mod metadata;
pub mod session;

pub use controller::AnnotationController;
pub use debounce::DEFAULT_DEBOUNCE_SECS;
pub use marks::MarksSnapshot;
pub use metadata::MetadataSnapshot;
pub use session::{MarkOutcome, SessionInfo, UndoOutcome};
