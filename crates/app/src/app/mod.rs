use chrono::{DateTime, Utc};
use ingest::{extract, input_stats, load_records};
use metrics_aggregate::Aggregates;
use metrics_core::FlatRecord;
use tracing::info;

use crate::config::RunConfig;
use crate::error::Result;
use crate::output::{OutputFile, OutputKind, OutputPlan, WrittenFile, write_all};
use crate::report::{ReportSummary, render_html};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub records: usize,
    pub users: usize,
    pub files: Vec<WrittenFile>,
}

/// One conversion of an export into the outputs its mode asks for.
#[derive(Debug, Clone)]
pub struct Converter {
    config: RunConfig,
}

impl Converter {
    /// Rejects the configuration before any input is read.
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn run(&self) -> Result<RunSummary> {
        self.run_at(Utc::now())
    }

    /// Like [`Converter::run`], stamping the report with `generated_at`.
    pub fn run_at(&self, generated_at: DateTime<Utc>) -> Result<RunSummary> {
        let plan = OutputPlan::for_config(&self.config)?;
        let records = load_records(&self.config.input_path)?;
        let stats = input_stats(&records);

        let flat: Vec<FlatRecord> = extract(&records).collect();
        info!(
            records = stats.records,
            users = stats.users,
            flat_records = flat.len(),
            "flattened export"
        );
        let aggregates = Aggregates::build(&flat);

        let files = self.render(&plan, &aggregates, generated_at)?;
        let written = write_all(&plan.dir, files)?;
        info!(
            mode = %self.config.output_mode,
            files = written.len(),
            dir = %plan.dir.display(),
            "wrote outputs"
        );
        Ok(RunSummary {
            records: stats.records,
            users: stats.users,
            files: written,
        })
    }

    /// Renders every planned output in memory.
    pub fn render(
        &self,
        plan: &OutputPlan,
        aggregates: &Aggregates,
        generated_at: DateTime<Utc>,
    ) -> Result<Vec<OutputFile>> {
        plan.entries
            .iter()
            .map(|(kind, path)| -> Result<OutputFile> {
                let (contents, rows) = match kind {
                    OutputKind::Table(table) => {
                        let (contents, rows) = table.render(aggregates)?;
                        (contents, Some(rows))
                    }
                    OutputKind::Report => {
                        let summary =
                            ReportSummary::build(aggregates, &self.config.report, generated_at);
                        (render_html(&summary).into_bytes(), None)
                    }
                };
                Ok(OutputFile {
                    path: path.clone(),
                    contents,
                    rows,
                })
            })
            .collect()
    }
}
