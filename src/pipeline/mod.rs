pub mod report;
pub mod runner;

pub use report::RunReport;
pub use runner::{PipelineRunner, RunOptions};
