pub mod app;
pub mod config;
pub mod error;
pub mod output;
pub mod report;
pub mod tables;

pub use app::{Converter, RunSummary};
pub use config::{OutputMode, ReportSettings, RunConfig};
pub use error::{AppError, Result};
pub use output::{OutputFile, OutputKind, OutputPlan, WrittenFile, write_all};
pub use report::{FeatureAdoption, ReportSummary, render_html};
pub use tables::{Column, Field, Table, TableRow, write_table};
