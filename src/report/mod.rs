pub mod parser;
pub mod types;

pub use parser::parse_offline_report;
pub use types::{OfflineIndex, OfflineNode};
