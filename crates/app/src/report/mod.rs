//! Usage report: a presentation summary over the aggregates and its HTML
//! rendering. Nothing here re-reads flat records; every number comes from
//! an aggregate row.

mod format;
mod html;

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use metrics_aggregate::{Aggregates, rank, roll_up, user_key};
use metrics_core::{AggregateRow, Counters, FeatureKind, GroupKey};

use crate::config::ReportSettings;

pub use html::render_html;

/// How many users touched each usage surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureAdoption {
    pub agent_users: usize,
    pub chat_users: usize,
    pub both_users: usize,
    /// Users whose only activity is code completion.
    pub completion_only_users: usize,
}

impl FeatureAdoption {
    pub fn from_aggregates(aggregates: &Aggregates) -> Self {
        let mut kinds: HashMap<GroupKey, HashSet<FeatureKind>> = HashMap::new();
        for row in &aggregates.by_feature {
            if let Some(feature) = row.key.feature.as_deref() {
                kinds
                    .entry(user_key(&row.key))
                    .or_default()
                    .insert(FeatureKind::classify(feature));
            }
        }

        let mut adoption = Self::default();
        let none = HashSet::new();
        for user in &aggregates.user_summary {
            let used = kinds.get(&user.key).unwrap_or(&none);
            let agent = user.used_agent || used.contains(&FeatureKind::Agent);
            let chat = user.used_chat || used.contains(&FeatureKind::Chat);
            let completion_only = !agent
                && !chat
                && used.contains(&FeatureKind::Completion)
                && !used.contains(&FeatureKind::Other);

            adoption.agent_users += usize::from(agent);
            adoption.chat_users += usize::from(chat);
            adoption.both_users += usize::from(agent && chat);
            adoption.completion_only_users += usize::from(completion_only);
        }
        adoption
    }
}

/// Everything the HTML report shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub first_day: Option<NaiveDate>,
    pub last_day: Option<NaiveDate>,
    pub user_count: usize,
    pub totals: Counters,
    pub acceptance_rate: f64,
    pub adoption: FeatureAdoption,
    pub top_users: Vec<AggregateRow>,
    pub top_languages: Vec<AggregateRow>,
    pub features: Vec<AggregateRow>,
    pub ides: Vec<AggregateRow>,
    pub models: Vec<AggregateRow>,
}

impl ReportSummary {
    pub fn build(
        aggregates: &Aggregates,
        settings: &ReportSettings,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let users = &aggregates.user_summary;
        let totals = users
            .iter()
            .fold(Counters::default(), |sum, row| sum.add(row.counters));

        let languages = roll_up(&aggregates.by_language_feature, |key| GroupKey {
            language: key.language.clone(),
            ..GroupKey::default()
        });
        let features = roll_up(&aggregates.by_feature, |key| GroupKey {
            feature: key.feature.clone(),
            ..GroupKey::default()
        });
        let ides = roll_up(&aggregates.by_ide, |key| GroupKey {
            ide: key.ide.clone(),
            ..GroupKey::default()
        });
        let models = roll_up(&aggregates.by_model_feature, |key| GroupKey {
            model: key.model.clone(),
            ..GroupKey::default()
        });

        Self {
            title: settings.title.clone(),
            generated_at,
            first_day: users.iter().map(|row| row.first_day).min(),
            last_day: users.iter().map(|row| row.last_day).max(),
            user_count: users.len(),
            totals,
            acceptance_rate: totals.acceptance_rate(),
            adoption: FeatureAdoption::from_aggregates(aggregates),
            top_users: rank(users, settings.top_users),
            top_languages: rank(&languages, settings.top_languages),
            features: rank(&features, features.len()),
            ides: rank(&ides, ides.len()),
            models: rank(&models, models.len()),
        }
    }
}
