pub mod caption;
pub mod export;
pub mod role;

pub use caption::CaptionEntry;
pub use export::{ExportReceipt, ExportRequest, ExportRow};
pub use role::{ObserverRole, PgyYear};
