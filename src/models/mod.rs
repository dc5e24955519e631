pub mod config;
pub mod element;
pub mod report;

pub use config::{AnalysisConfig, ConformanceLevel, OutputLanguage, ReportLanguage, WcagVersion};
pub use element::ElementContext;
pub use report::{AnalysisReport, Issue, RawModelResponse, Severity};
