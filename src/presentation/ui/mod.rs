pub mod display;
pub mod report;

pub use display::DisplayHelper;
pub use report::{ReportRenderer, REPORT_WIDTH};
