//! File boundaries: log import and result export

pub mod export;
pub mod log_csv;

pub use export::{write_results_csv, write_summary_csv, EvaluationReport};
pub use log_csv::{parse_log_csv, read_log_csv, LogImportError, LogImportReport};
