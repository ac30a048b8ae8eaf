pub mod anomaly;
pub mod ingest;
pub mod summary;

pub use anomaly::{detect, ZScoreDetector};
pub use ingest::{ingest, CsvIngestor};
pub use summary::{summarize_full, summarize_range, Summarizer, NO_DATA_IN_RANGE};
