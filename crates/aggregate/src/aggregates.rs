use metrics_core::{AggregateRow, FlatRecord};
use rayon::prelude::*;
use tracing::info;

use crate::dimension::Dimension;
use crate::reducer::aggregate;

/// Results of all six reducers over one export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    pub user_summary: Vec<AggregateRow>,
    pub by_ide: Vec<AggregateRow>,
    pub by_feature: Vec<AggregateRow>,
    pub by_language_feature: Vec<AggregateRow>,
    pub by_language_model: Vec<AggregateRow>,
    pub by_model_feature: Vec<AggregateRow>,
}

impl Aggregates {
    /// Runs every reducer. They only read the shared records, so they run in
    /// parallel and the result does not depend on scheduling.
    pub fn build(records: &[FlatRecord]) -> Self {
        let results = Dimension::ALL[..]
            .par_iter()
            .map(|dimension| (*dimension, aggregate(records, *dimension)))
            .collect::<Vec<_>>();

        let mut aggregates = Self::default();
        for (dimension, rows) in results {
            info!(dimension = %dimension, rows = rows.len(), "aggregated dimension");
            *aggregates.rows_mut(dimension) = rows;
        }
        aggregates
    }

    pub fn rows(&self, dimension: Dimension) -> &[AggregateRow] {
        match dimension {
            Dimension::UserSummary => &self.user_summary,
            Dimension::ByIde => &self.by_ide,
            Dimension::ByFeature => &self.by_feature,
            Dimension::ByLanguageFeature => &self.by_language_feature,
            Dimension::ByLanguageModel => &self.by_language_model,
            Dimension::ByModelFeature => &self.by_model_feature,
        }
    }

    fn rows_mut(&mut self, dimension: Dimension) -> &mut Vec<AggregateRow> {
        match dimension {
            Dimension::UserSummary => &mut self.user_summary,
            Dimension::ByIde => &mut self.by_ide,
            Dimension::ByFeature => &mut self.by_feature,
            Dimension::ByLanguageFeature => &mut self.by_language_feature,
            Dimension::ByLanguageModel => &mut self.by_language_model,
            Dimension::ByModelFeature => &mut self.by_model_feature,
        }
    }
}
