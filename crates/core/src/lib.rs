use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Feature name used by inline code completion.
pub const CODE_COMPLETION_FEATURE: &str = "code_completion";
/// Chat panel in ask mode.
pub const CHAT_ASK_FEATURE: &str = "chat_panel_ask_mode";
pub const AGENT_EDIT_FEATURE: &str = "agent_edit";

const UNKNOWN_NAME: &str = "unknown";

fn unknown_name() -> String {
    UNKNOWN_NAME.to_string()
}

/// Activity counters reported for a day and for every breakdown entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Counters {
    pub user_initiated_interaction_count: u64,
    pub code_generation_activity_count: u64,
    pub code_acceptance_activity_count: u64,
    pub loc_suggested_to_add_sum: u64,
    pub loc_suggested_to_delete_sum: u64,
    pub loc_added_sum: u64,
    pub loc_deleted_sum: u64,
}

impl Counters {
    pub fn add(self, other: Counters) -> Counters {
        Counters {
            user_initiated_interaction_count: self
                .user_initiated_interaction_count
                .saturating_add(other.user_initiated_interaction_count),
            code_generation_activity_count: self
                .code_generation_activity_count
                .saturating_add(other.code_generation_activity_count),
            code_acceptance_activity_count: self
                .code_acceptance_activity_count
                .saturating_add(other.code_acceptance_activity_count),
            loc_suggested_to_add_sum: self
                .loc_suggested_to_add_sum
                .saturating_add(other.loc_suggested_to_add_sum),
            loc_suggested_to_delete_sum: self
                .loc_suggested_to_delete_sum
                .saturating_add(other.loc_suggested_to_delete_sum),
            loc_added_sum: self.loc_added_sum.saturating_add(other.loc_added_sum),
            loc_deleted_sum: self.loc_deleted_sum.saturating_add(other.loc_deleted_sum),
        }
    }

    /// Accepted generations as a percentage of generations.
    pub fn acceptance_rate(&self) -> f64 {
        rate_percent(
            self.code_acceptance_activity_count,
            self.code_generation_activity_count,
        )
    }

    /// Added lines as a percentage of suggested lines.
    pub fn loc_acceptance_rate(&self) -> f64 {
        rate_percent(self.loc_added_sum, self.loc_suggested_to_add_sum)
    }
}

/// Percentage rounded to two decimals; a zero denominator yields 0.
pub fn rate_percent(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let rate = (numerator as f64 / denominator as f64) * 100.0;
    (rate * 100.0).round() / 100.0
}

/// User and enterprise ids arrive as numbers or strings depending on the export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(u64),
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{}", value),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// A timestamped version observation; the newest `sampled_at` wins.
pub trait VersionSample {
    fn sampled_at(&self) -> &str;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginVersion {
    #[serde(default)]
    pub plugin: String,
    #[serde(default)]
    pub plugin_version: String,
    #[serde(default)]
    pub sampled_at: String,
}

impl VersionSample for PluginVersion {
    fn sampled_at(&self) -> &str {
        &self.sampled_at
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeVersion {
    #[serde(default)]
    pub ide_version: String,
    #[serde(default)]
    pub sampled_at: String,
}

impl VersionSample for IdeVersion {
    fn sampled_at(&self) -> &str {
        &self.sampled_at
    }
}

/// Keeps whichever sample was taken last. Ties go to the candidate.
pub fn latest_sample<T>(existing: Option<T>, candidate: Option<&T>) -> Option<T>
where
    T: VersionSample + Clone,
{
    match (existing, candidate) {
        (None, candidate) => candidate.cloned(),
        (Some(existing), None) => Some(existing),
        (Some(existing), Some(candidate)) => {
            if candidate.sampled_at() >= existing.sampled_at() {
                Some(candidate.clone())
            } else {
                Some(existing)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeTotals {
    #[serde(default = "unknown_name")]
    pub ide: String,
    #[serde(flatten)]
    pub counters: Counters,
    #[serde(default)]
    pub last_known_plugin_version: Option<PluginVersion>,
    #[serde(default)]
    pub last_known_ide_version: Option<IdeVersion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTotals {
    #[serde(default = "unknown_name")]
    pub feature: String,
    #[serde(flatten)]
    pub counters: Counters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageFeatureTotals {
    #[serde(default = "unknown_name")]
    pub language: String,
    #[serde(default = "unknown_name")]
    pub feature: String,
    #[serde(flatten)]
    pub counters: Counters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageModelTotals {
    #[serde(default = "unknown_name")]
    pub language: String,
    #[serde(default = "unknown_name")]
    pub model: String,
    #[serde(flatten)]
    pub counters: Counters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFeatureTotals {
    #[serde(default = "unknown_name")]
    pub model: String,
    #[serde(default = "unknown_name")]
    pub feature: String,
    #[serde(flatten)]
    pub counters: Counters,
}

/// One user's activity on one day, as exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    #[serde(default)]
    pub report_start_day: Option<NaiveDate>,
    #[serde(default)]
    pub report_end_day: Option<NaiveDate>,
    pub day: NaiveDate,
    #[serde(default)]
    pub enterprise_id: Option<Identifier>,
    #[serde(default)]
    pub user_id: Option<Identifier>,
    pub user_login: String,
    #[serde(flatten)]
    pub totals: Counters,
    #[serde(default)]
    pub used_agent: bool,
    #[serde(default)]
    pub used_chat: bool,
    #[serde(default)]
    pub totals_by_ide: Vec<IdeTotals>,
    #[serde(default)]
    pub totals_by_feature: Vec<FeatureTotals>,
    #[serde(default)]
    pub totals_by_language_feature: Vec<LanguageFeatureTotals>,
    #[serde(default)]
    pub totals_by_language_model: Vec<LanguageModelTotals>,
    #[serde(default)]
    pub totals_by_model_feature: Vec<ModelFeatureTotals>,
}

/// Which part of a usage record a flat record was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Breakdown {
    UserDay,
    Ide,
    Feature,
    LanguageFeature,
    LanguageModel,
    ModelFeature,
}

/// A breakdown entry with its parent user and day attached.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord {
    /// Order in which the parent record's day first appears in the input.
    pub seq: usize,
    pub breakdown: Breakdown,
    pub user_login: String,
    pub user_id: Option<String>,
    pub enterprise_id: Option<String>,
    pub day: NaiveDate,
    pub report_start_day: Option<NaiveDate>,
    pub report_end_day: Option<NaiveDate>,
    pub ide: Option<String>,
    pub language: Option<String>,
    pub model: Option<String>,
    pub feature: Option<String>,
    pub counters: Counters,
    pub used_agent: bool,
    pub used_chat: bool,
    pub plugin_version: Option<PluginVersion>,
    pub ide_version: Option<IdeVersion>,
}

impl FlatRecord {
    pub fn new(
        seq: usize,
        breakdown: Breakdown,
        user_login: &str,
        day: NaiveDate,
        counters: Counters,
    ) -> Self {
        Self {
            seq,
            breakdown,
            user_login: user_login.to_string(),
            user_id: None,
            enterprise_id: None,
            day,
            report_start_day: None,
            report_end_day: None,
            ide: None,
            language: None,
            model: None,
            feature: None,
            counters,
            used_agent: false,
            used_chat: false,
            plugin_version: None,
            ide_version: None,
        }
    }
}

/// Grouping key of an aggregate row. Parts outside the dimension stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub user_login: Option<String>,
    pub user_id: Option<String>,
    pub ide: Option<String>,
    pub language: Option<String>,
    pub model: Option<String>,
    pub feature: Option<String>,
}

impl GroupKey {
    /// Present key parts joined for display and for the last ranking tie-break.
    pub fn label(&self) -> String {
        [
            &self.user_login,
            &self.ide,
            &self.language,
            &self.model,
            &self.feature,
        ]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" / ")
    }
}

/// Summed counters for one group of flat records.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRow {
    pub key: GroupKey,
    pub counters: Counters,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub active_days: usize,
    /// First enterprise id seen for the group.
    pub enterprise_id: Option<String>,
    /// Widest report window covering the group's records.
    pub report_start_day: Option<NaiveDate>,
    pub report_end_day: Option<NaiveDate>,
    pub used_agent: bool,
    pub used_chat: bool,
    pub plugin_version: Option<PluginVersion>,
    pub ide_version: Option<IdeVersion>,
    /// Smallest `seq` contributing to this group.
    pub first_seen: usize,
}

impl AggregateRow {
    pub fn generations(&self) -> u64 {
        self.counters.code_generation_activity_count
    }

    pub fn acceptance_rate(&self) -> f64 {
        self.counters.acceptance_rate()
    }

    pub fn loc_acceptance_rate(&self) -> f64 {
        self.counters.loc_acceptance_rate()
    }
}

/// Coarse usage surface a feature name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    Agent,
    Chat,
    Completion,
    Other,
}

impl FeatureKind {
    /// `chat_panel_agent_mode` counts as agent usage, not chat.
    pub fn classify(feature: &str) -> Self {
        let feature = feature.to_ascii_lowercase();
        if feature.contains("agent") {
            Self::Agent
        } else if feature.contains("chat") {
            Self::Chat
        } else if feature == CODE_COMPLETION_FEATURE {
            Self::Completion
        } else {
            Self::Other
        }
    }
}
