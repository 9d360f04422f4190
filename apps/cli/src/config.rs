use std::fs;
use std::path::{Path, PathBuf};

use metrics_app::{AppError, OutputMode, ReportSettings, RunConfig};
use serde::Deserialize;

use crate::args::CliArgs;

/// Optional defaults read from `--config`. Flags on the command line win.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub output_dir: Option<PathBuf>,
    pub mode: Option<OutputMode>,
    pub report: ReportSettings,
}

pub fn load_file_config(path: &Path) -> Result<FileConfig, AppError> {
    let contents = fs::read_to_string(path)
        .map_err(|err| AppError::InvalidConfig(format!("read config {}: {}", path.display(), err)))?;
    toml::from_str(&contents)
        .map_err(|err| AppError::InvalidConfig(format!("parse config {}: {}", path.display(), err)))
}

pub fn resolve(args: &CliArgs) -> Result<RunConfig, AppError> {
    let file = match &args.config {
        Some(path) => load_file_config(path)?,
        None => FileConfig::default(),
    };
    Ok(merge(args, file))
}

fn merge(args: &CliArgs, file: FileConfig) -> RunConfig {
    let mode = args.mode.or(file.mode).unwrap_or(OutputMode::UserSummary);
    let mut config = RunConfig::new(&args.input, mode);
    if let Some(dir) = args.output_dir.clone().or(file.output_dir) {
        config.output_dir = dir;
    }
    config.report = file.report;
    config
}
