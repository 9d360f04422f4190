use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::tables::Table;
use metrics_aggregate::Dimension;

const DEFAULT_TITLE: &str = "GitHub Copilot Usage Report";
const DEFAULT_TOP_USERS: usize = 15;
const DEFAULT_TOP_LANGUAGES: usize = 10;

/// What a run writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    Html,
    All,
    UserSummary,
    ByIde,
    ByFeature,
    ByLanguageFeature,
    ByLanguageModel,
    ByModelFeature,
    CodeCompletionSummary,
    ChatLocSummary,
    FeatureSplitSummary,
}

impl OutputMode {
    pub const ALL: [OutputMode; 11] = [
        OutputMode::Html,
        OutputMode::All,
        OutputMode::UserSummary,
        OutputMode::ByIde,
        OutputMode::ByFeature,
        OutputMode::ByLanguageFeature,
        OutputMode::ByLanguageModel,
        OutputMode::ByModelFeature,
        OutputMode::CodeCompletionSummary,
        OutputMode::ChatLocSummary,
        OutputMode::FeatureSplitSummary,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::All => "all",
            Self::UserSummary => "user_summary",
            Self::ByIde => "by_ide",
            Self::ByFeature => "by_feature",
            Self::ByLanguageFeature => "by_language_feature",
            Self::ByLanguageModel => "by_language_model",
            Self::ByModelFeature => "by_model_feature",
            Self::CodeCompletionSummary => "code_completion_summary",
            Self::ChatLocSummary => "chat_loc_summary",
            Self::FeatureSplitSummary => "feature_split_summary",
        }
    }

    /// Tables written by this mode, in output order.
    pub fn tables(self) -> Vec<Table> {
        match self {
            Self::Html => Vec::new(),
            Self::All => Table::ALL.to_vec(),
            Self::UserSummary => vec![Table::Dimension(Dimension::UserSummary)],
            Self::ByIde => vec![Table::Dimension(Dimension::ByIde)],
            Self::ByFeature => vec![Table::Dimension(Dimension::ByFeature)],
            Self::ByLanguageFeature => vec![Table::Dimension(Dimension::ByLanguageFeature)],
            Self::ByLanguageModel => vec![Table::Dimension(Dimension::ByLanguageModel)],
            Self::ByModelFeature => vec![Table::Dimension(Dimension::ByModelFeature)],
            Self::CodeCompletionSummary => vec![Table::CodeCompletionSummary],
            Self::ChatLocSummary => vec![Table::ChatLocSummary],
            Self::FeatureSplitSummary => vec![Table::FeatureSplitSummary],
        }
    }

    pub fn includes_report(self) -> bool {
        matches!(self, Self::Html | Self::All)
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name() == value)
            .ok_or_else(|| {
                let expected: Vec<&str> = Self::ALL.iter().map(|mode| mode.name()).collect();
                AppError::InvalidConfig(format!(
                    "unknown output mode `{}` (expected one of: {})",
                    value,
                    expected.join(", ")
                ))
            })
    }
}

/// Presentation knobs of the HTML report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    pub title: String,
    pub top_users: usize,
    pub top_languages: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            top_users: DEFAULT_TOP_USERS,
            top_languages: DEFAULT_TOP_LANGUAGES,
        }
    }
}

/// Everything a run needs, validated once before processing starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub output_mode: OutputMode,
    pub output_dir: PathBuf,
    pub report: ReportSettings,
}

impl RunConfig {
    pub fn new(input_path: impl Into<PathBuf>, output_mode: OutputMode) -> Self {
        Self {
            input_path: input_path.into(),
            output_mode,
            output_dir: PathBuf::from("."),
            report: ReportSettings::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.input_path.is_file() {
            let reason = if self.input_path.exists() {
                "not a regular file"
            } else {
                "no such file"
            };
            return Err(AppError::InputNotFound {
                path: self.input_path.clone(),
                reason: reason.to_string(),
            });
        }
        self.input_stem()?;
        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(AppError::OutputWrite {
                path: self.output_dir.clone(),
                source: io::Error::new(io::ErrorKind::NotADirectory, "not a directory"),
            });
        }
        if self.report.top_users == 0 || self.report.top_languages == 0 {
            return Err(AppError::InvalidConfig(
                "report rankings need at least one entry".to_string(),
            ));
        }
        Ok(())
    }

    /// File name prefix shared by every output of this run.
    pub fn input_stem(&self) -> Result<String> {
        stem_of(&self.input_path).ok_or_else(|| {
            AppError::InvalidConfig(format!(
                "cannot derive output names from {}",
                self.input_path.display()
            ))
        })
    }
}

fn stem_of(path: &Path) -> Option<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}
