pub mod csv;
pub mod naming;
pub mod sink;

pub use sink::{CsvFileSink, ExportSink};
