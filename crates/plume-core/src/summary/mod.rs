pub mod aggregate;
pub mod compare;
pub mod engine;
pub mod outcome;
pub mod report;
pub mod resolve;

pub use engine::{summarize, summarize_matrix};
pub use outcome::{AnalyteSummary, Exceedance, MatrixReport, SummaryReport};
