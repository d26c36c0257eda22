pub mod base;
pub mod extractor;
pub mod record_loader;

pub use base::*;
pub use extractor::{record_from_raw_transaction, ExtractionStats, Extractor, DEPOSIT_TX_TYPE};
pub use record_loader::{RecordLoader, MAX_RECORD_SIZE};
