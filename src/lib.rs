pub mod analyzer;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod parser;
pub mod report;

pub use analyzer::{AnalysisResult, Confidence, TicketStatus};
pub use config::AnalysisConfig;
pub use error::AppError;

// ─── E2E Integration Tests ──────────────────────────────────────────────────
