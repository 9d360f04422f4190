use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::config::RunConfig;
use crate::error::{AppError, Result};
use crate::tables::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Table(Table),
    Report,
}

impl OutputKind {
    pub fn file_name(self, stem: &str) -> String {
        match self {
            Self::Table(table) => format!("{}_{}.csv", stem, table.name()),
            Self::Report => format!("{}_report.html", stem),
        }
    }
}

/// Files one run produces, in write order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPlan {
    pub dir: PathBuf,
    pub entries: Vec<(OutputKind, PathBuf)>,
}

impl OutputPlan {
    pub fn for_config(config: &RunConfig) -> Result<Self> {
        let stem = config.input_stem()?;
        let mode = config.output_mode;
        let mut kinds: Vec<OutputKind> = mode.tables().into_iter().map(OutputKind::Table).collect();
        if mode.includes_report() {
            kinds.push(OutputKind::Report);
        }
        let entries = kinds
            .into_iter()
            .map(|kind| (kind, config.output_dir.join(kind.file_name(&stem))))
            .collect();
        Ok(Self {
            dir: config.output_dir.clone(),
            entries,
        })
    }
}

/// A fully rendered output waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
    /// Data rows, for tables.
    pub rows: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub rows: Option<usize>,
    pub bytes: usize,
}

/// Writes every file or none of them.
///
/// All contents are staged as temporary files inside `dir` first, then
/// renamed into place. If a stage or rename fails, the files renamed so far
/// are removed again and the staged ones are dropped.
pub fn write_all(dir: &Path, files: Vec<OutputFile>) -> Result<Vec<WrittenFile>> {
    fs::create_dir_all(dir).map_err(|source| AppError::OutputWrite {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut staged = Vec::with_capacity(files.len());
    for file in files {
        let temp = stage(dir, &file)?;
        staged.push((file, temp));
    }

    let mut written: Vec<WrittenFile> = Vec::with_capacity(staged.len());
    for (file, temp) in staged {
        if let Err(err) = temp.persist(&file.path) {
            roll_back(&written);
            return Err(AppError::OutputWrite {
                path: file.path,
                source: err.error,
            });
        }
        debug!(path = %file.path.display(), bytes = file.contents.len(), "wrote output");
        written.push(WrittenFile {
            path: file.path,
            rows: file.rows,
            bytes: file.contents.len(),
        });
    }
    Ok(written)
}

fn stage(dir: &Path, file: &OutputFile) -> Result<NamedTempFile> {
    let to_error = |source| AppError::OutputWrite {
        path: file.path.clone(),
        source,
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(to_error)?;
    temp.write_all(&file.contents).map_err(to_error)?;
    temp.flush().map_err(to_error)?;
    Ok(temp)
}

fn roll_back(written: &[WrittenFile]) {
    for file in written {
        if let Err(err) = fs::remove_file(&file.path) {
            warn!(path = %file.path.display(), error = %err, "failed to remove partial output");
        }
    }
}
