//! Delimited text tables for each aggregate.
//!
//! Every table starts with a UTF-8 byte-order marker so spreadsheet tools
//! pick the right encoding, then a header record, then one record per row.

use csv::Writer;
use metrics_aggregate::{
    Aggregates, ChatLocRow, CompletionSummaryRow, Dimension, FeatureSplitRow, chat_loc_summary,
    code_completion_summary, feature_split_summary,
};
use chrono::NaiveDate;
use metrics_core::{AggregateRow, Counters, GroupKey};

use crate::error::Result;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A value a table column can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    UserLogin,
    UserId,
    EnterpriseId,
    ReportStartDay,
    ReportEndDay,
    Ide,
    Feature,
    Language,
    Model,
    FirstDay,
    LastDay,
    ActiveDays,
    UsedAgent,
    UsedChat,
    Interactions,
    Generations,
    Acceptances,
    LocSuggestedToAdd,
    LocSuggestedToDelete,
    LocAdded,
    LocDeleted,
    AcceptanceRate,
    LocAcceptanceRate,
    Plugin,
    PluginVersion,
    PluginSampledAt,
    IdeVersion,
    IdeVersionSampledAt,
    TotalLocAdded,
    CompletionLocAdded,
    ChatLocAdded,
    CompletionGenerations,
    CompletionAcceptances,
    CompletionLocSuggested,
    ChatAskInteractions,
    ChatAskAcceptances,
    ChatAskLocSuggested,
    ChatAskLocAdded,
    AgentEditLocAdded,
    AgentEditLocDeleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: Field,
    pub header: &'static str,
}

const fn col(field: Field, header: &'static str) -> Column {
    Column { field, header }
}

const INTERACTIONS: Column = col(Field::Interactions, "user_initiated_interaction_count");
const GENERATIONS: Column = col(Field::Generations, "code_generation_activity_count");
const ACCEPTANCES: Column = col(Field::Acceptances, "code_acceptance_activity_count");
const ACCEPTANCE_RATE: Column = col(Field::AcceptanceRate, "acceptance_rate");
const LOC_SUGGESTED_ADD: Column = col(Field::LocSuggestedToAdd, "loc_suggested_to_add_sum");
const LOC_SUGGESTED_DELETE: Column =
    col(Field::LocSuggestedToDelete, "loc_suggested_to_delete_sum");
const LOC_ADDED: Column = col(Field::LocAdded, "loc_added_sum");
const LOC_DELETED: Column = col(Field::LocDeleted, "loc_deleted_sum");
const USER_LOGIN: Column = col(Field::UserLogin, "user_login");
const USER_ID: Column = col(Field::UserId, "user_id");
const ENTERPRISE_ID: Column = col(Field::EnterpriseId, "enterprise_id");
const REPORT_START_DAY: Column = col(Field::ReportStartDay, "report_start_day");
const REPORT_END_DAY: Column = col(Field::ReportEndDay, "report_end_day");
const FIRST_DAY: Column = col(Field::FirstDay, "first_day");
const LAST_DAY: Column = col(Field::LastDay, "last_day");

pub const USER_SUMMARY_COLUMNS: &[Column] = &[
    USER_LOGIN,
    USER_ID,
    ENTERPRISE_ID,
    REPORT_START_DAY,
    REPORT_END_DAY,
    FIRST_DAY,
    LAST_DAY,
    col(Field::ActiveDays, "active_days"),
    col(Field::UsedAgent, "used_agent"),
    col(Field::UsedChat, "used_chat"),
    INTERACTIONS,
    GENERATIONS,
    ACCEPTANCES,
    ACCEPTANCE_RATE,
    LOC_SUGGESTED_ADD,
    LOC_SUGGESTED_DELETE,
    LOC_ADDED,
    LOC_DELETED,
    col(Field::LocAcceptanceRate, "loc_acceptance_rate"),
];

pub const BY_IDE_COLUMNS: &[Column] = &[
    USER_LOGIN,
    USER_ID,
    ENTERPRISE_ID,
    col(Field::Ide, "ide"),
    REPORT_START_DAY,
    REPORT_END_DAY,
    FIRST_DAY,
    LAST_DAY,
    INTERACTIONS,
    GENERATIONS,
    ACCEPTANCES,
    ACCEPTANCE_RATE,
    LOC_SUGGESTED_ADD,
    LOC_SUGGESTED_DELETE,
    LOC_ADDED,
    LOC_DELETED,
    col(Field::Plugin, "plugin"),
    col(Field::PluginVersion, "plugin_version"),
    col(Field::PluginSampledAt, "plugin_sampled_at"),
    col(Field::IdeVersion, "ide_version"),
    col(Field::IdeVersionSampledAt, "ide_version_sampled_at"),
];

pub const BY_FEATURE_COLUMNS: &[Column] = &[
    USER_LOGIN,
    USER_ID,
    ENTERPRISE_ID,
    col(Field::Feature, "feature"),
    REPORT_START_DAY,
    REPORT_END_DAY,
    FIRST_DAY,
    LAST_DAY,
    INTERACTIONS,
    GENERATIONS,
    ACCEPTANCES,
    ACCEPTANCE_RATE,
    LOC_SUGGESTED_ADD,
    LOC_SUGGESTED_DELETE,
    LOC_ADDED,
    LOC_DELETED,
];

// The export carries no interaction count for language breakdowns.
pub const BY_LANGUAGE_FEATURE_COLUMNS: &[Column] = &[
    col(Field::Language, "language"),
    col(Field::Feature, "feature"),
    REPORT_START_DAY,
    REPORT_END_DAY,
    FIRST_DAY,
    LAST_DAY,
    GENERATIONS,
    ACCEPTANCES,
    ACCEPTANCE_RATE,
    LOC_SUGGESTED_ADD,
    LOC_SUGGESTED_DELETE,
    LOC_ADDED,
    LOC_DELETED,
];

pub const BY_LANGUAGE_MODEL_COLUMNS: &[Column] = &[
    col(Field::Language, "language"),
    col(Field::Model, "model"),
    REPORT_START_DAY,
    REPORT_END_DAY,
    FIRST_DAY,
    LAST_DAY,
    GENERATIONS,
    ACCEPTANCES,
    ACCEPTANCE_RATE,
    LOC_SUGGESTED_ADD,
    LOC_SUGGESTED_DELETE,
    LOC_ADDED,
    LOC_DELETED,
];

pub const BY_MODEL_FEATURE_COLUMNS: &[Column] = &[
    col(Field::Model, "model"),
    col(Field::Feature, "feature"),
    REPORT_START_DAY,
    REPORT_END_DAY,
    FIRST_DAY,
    LAST_DAY,
    INTERACTIONS,
    GENERATIONS,
    ACCEPTANCES,
    ACCEPTANCE_RATE,
    LOC_SUGGESTED_ADD,
    LOC_SUGGESTED_DELETE,
    LOC_ADDED,
    LOC_DELETED,
];

pub const CODE_COMPLETION_COLUMNS: &[Column] = &[
    USER_LOGIN,
    USER_ID,
    FIRST_DAY,
    LAST_DAY,
    col(Field::Generations, "code_completion_code_generation_count"),
    col(Field::Acceptances, "code_completion_code_acceptance_count"),
    col(Field::LocSuggestedToAdd, "code_completion_loc_suggested_to_add_sum"),
    col(Field::LocAdded, "code_completion_loc_added_sum"),
    col(Field::AcceptanceRate, "code_completion_acceptance_rate"),
    col(Field::LocAcceptanceRate, "code_completion_loc_acceptance_rate"),
];

pub const CHAT_LOC_COLUMNS: &[Column] = &[
    USER_LOGIN,
    USER_ID,
    FIRST_DAY,
    LAST_DAY,
    col(Field::TotalLocAdded, "total_loc_added_sum"),
    col(Field::CompletionLocAdded, "code_completion_loc_added_sum"),
    col(Field::ChatLocAdded, "chat_loc_added_sum"),
];

pub const FEATURE_SPLIT_COLUMNS: &[Column] = &[
    USER_LOGIN,
    USER_ID,
    ENTERPRISE_ID,
    REPORT_START_DAY,
    REPORT_END_DAY,
    FIRST_DAY,
    LAST_DAY,
    col(Field::CompletionGenerations, "code_completion_code_generation_count"),
    col(Field::CompletionAcceptances, "code_completion_code_acceptance_count"),
    col(Field::CompletionLocSuggested, "code_completion_loc_suggested_to_add_sum"),
    col(Field::CompletionLocAdded, "code_completion_loc_added_sum"),
    col(Field::ChatAskInteractions, "chat_ask_interaction_count"),
    col(Field::ChatAskAcceptances, "chat_ask_code_acceptance_count"),
    col(Field::ChatAskLocSuggested, "chat_ask_loc_suggested_to_add_sum"),
    col(Field::ChatAskLocAdded, "chat_ask_loc_added_sum"),
    col(Field::AgentEditLocAdded, "agent_edit_loc_added_sum"),
    col(Field::AgentEditLocDeleted, "agent_edit_loc_deleted_sum"),
];

/// One of the tables a run can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Dimension(Dimension),
    CodeCompletionSummary,
    ChatLocSummary,
    FeatureSplitSummary,
}

impl Table {
    pub const ALL: [Table; 9] = [
        Table::Dimension(Dimension::UserSummary),
        Table::Dimension(Dimension::ByIde),
        Table::Dimension(Dimension::ByFeature),
        Table::Dimension(Dimension::ByLanguageFeature),
        Table::Dimension(Dimension::ByLanguageModel),
        Table::Dimension(Dimension::ByModelFeature),
        Table::CodeCompletionSummary,
        Table::ChatLocSummary,
        Table::FeatureSplitSummary,
    ];

    /// Suffix of the output file name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dimension(dimension) => dimension.name(),
            Self::CodeCompletionSummary => "code_completion_summary",
            Self::ChatLocSummary => "chat_loc_summary",
            Self::FeatureSplitSummary => "feature_split_summary",
        }
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            Self::Dimension(Dimension::UserSummary) => USER_SUMMARY_COLUMNS,
            Self::Dimension(Dimension::ByIde) => BY_IDE_COLUMNS,
            Self::Dimension(Dimension::ByFeature) => BY_FEATURE_COLUMNS,
            Self::Dimension(Dimension::ByLanguageFeature) => BY_LANGUAGE_FEATURE_COLUMNS,
            Self::Dimension(Dimension::ByLanguageModel) => BY_LANGUAGE_MODEL_COLUMNS,
            Self::Dimension(Dimension::ByModelFeature) => BY_MODEL_FEATURE_COLUMNS,
            Self::CodeCompletionSummary => CODE_COMPLETION_COLUMNS,
            Self::ChatLocSummary => CHAT_LOC_COLUMNS,
            Self::FeatureSplitSummary => FEATURE_SPLIT_COLUMNS,
        }
    }

    /// Serialized table and its data row count.
    pub fn render(self, aggregates: &Aggregates) -> Result<(Vec<u8>, usize)> {
        let columns = self.columns();
        match self {
            Self::Dimension(dimension) => {
                let rows = aggregates.rows(dimension);
                Ok((write_table(rows, columns)?, rows.len()))
            }
            Self::CodeCompletionSummary => {
                let rows = code_completion_summary(aggregates);
                Ok((write_table(&rows, columns)?, rows.len()))
            }
            Self::ChatLocSummary => {
                let rows = chat_loc_summary(aggregates);
                Ok((write_table(&rows, columns)?, rows.len()))
            }
            Self::FeatureSplitSummary => {
                let rows = feature_split_summary(aggregates);
                Ok((write_table(&rows, columns)?, rows.len()))
            }
        }
    }
}

/// A row that can be laid out under a column list. Fields a row does not carry
/// render as empty cells.
pub trait TableRow {
    fn cell(&self, field: Field) -> String;
}

fn rate(value: f64) -> String {
    format!("{:.2}", value)
}

fn day_cell(day: Option<NaiveDate>) -> String {
    day.map(|day| day.to_string()).unwrap_or_default()
}

fn key_cell(key: &GroupKey, field: Field) -> Option<String> {
    let part = match field {
        Field::UserLogin => &key.user_login,
        Field::UserId => &key.user_id,
        Field::Ide => &key.ide,
        Field::Feature => &key.feature,
        Field::Language => &key.language,
        Field::Model => &key.model,
        _ => return None,
    };
    Some(part.clone().unwrap_or_default())
}

fn counter_cell(counters: &Counters, field: Field) -> Option<String> {
    let value = match field {
        Field::Interactions => counters.user_initiated_interaction_count,
        Field::Generations => counters.code_generation_activity_count,
        Field::Acceptances => counters.code_acceptance_activity_count,
        Field::LocSuggestedToAdd => counters.loc_suggested_to_add_sum,
        Field::LocSuggestedToDelete => counters.loc_suggested_to_delete_sum,
        Field::LocAdded => counters.loc_added_sum,
        Field::LocDeleted => counters.loc_deleted_sum,
        Field::AcceptanceRate => return Some(rate(counters.acceptance_rate())),
        Field::LocAcceptanceRate => return Some(rate(counters.loc_acceptance_rate())),
        _ => return None,
    };
    Some(value.to_string())
}

impl TableRow for AggregateRow {
    fn cell(&self, field: Field) -> String {
        if let Some(value) = key_cell(&self.key, field).or_else(|| counter_cell(&self.counters, field))
        {
            return value;
        }
        let plugin = self.plugin_version.as_ref();
        let ide = self.ide_version.as_ref();
        match field {
            Field::FirstDay => self.first_day.to_string(),
            Field::LastDay => self.last_day.to_string(),
            Field::ActiveDays => self.active_days.to_string(),
            Field::EnterpriseId => self.enterprise_id.clone().unwrap_or_default(),
            Field::ReportStartDay => day_cell(self.report_start_day),
            Field::ReportEndDay => day_cell(self.report_end_day),
            Field::UsedAgent => self.used_agent.to_string(),
            Field::UsedChat => self.used_chat.to_string(),
            Field::Plugin => plugin.map(|p| p.plugin.clone()).unwrap_or_default(),
            Field::PluginVersion => plugin.map(|p| p.plugin_version.clone()).unwrap_or_default(),
            Field::PluginSampledAt => plugin.map(|p| p.sampled_at.clone()).unwrap_or_default(),
            Field::IdeVersion => ide.map(|v| v.ide_version.clone()).unwrap_or_default(),
            Field::IdeVersionSampledAt => ide.map(|v| v.sampled_at.clone()).unwrap_or_default(),
            _ => String::new(),
        }
    }
}

impl TableRow for CompletionSummaryRow {
    fn cell(&self, field: Field) -> String {
        if let Some(value) = key_cell(&self.user, field).or_else(|| counter_cell(&self.counters, field))
        {
            return value;
        }
        match field {
            Field::FirstDay => self.first_day.to_string(),
            Field::LastDay => self.last_day.to_string(),
            _ => String::new(),
        }
    }
}

impl TableRow for ChatLocRow {
    fn cell(&self, field: Field) -> String {
        if let Some(value) = key_cell(&self.user, field) {
            return value;
        }
        match field {
            Field::FirstDay => self.first_day.to_string(),
            Field::LastDay => self.last_day.to_string(),
            Field::TotalLocAdded => self.total_loc_added.to_string(),
            Field::CompletionLocAdded => self.completion_loc_added.to_string(),
            Field::ChatLocAdded => self.chat_loc_added().to_string(),
            _ => String::new(),
        }
    }
}

impl TableRow for FeatureSplitRow {
    fn cell(&self, field: Field) -> String {
        let value = match field {
            Field::CompletionGenerations => self.completion.code_generation_activity_count,
            Field::CompletionAcceptances => self.completion.code_acceptance_activity_count,
            Field::CompletionLocSuggested => self.completion.loc_suggested_to_add_sum,
            Field::CompletionLocAdded => self.completion.loc_added_sum,
            Field::ChatAskInteractions => self.chat_ask.user_initiated_interaction_count,
            Field::ChatAskAcceptances => self.chat_ask.code_acceptance_activity_count,
            Field::ChatAskLocSuggested => self.chat_ask.loc_suggested_to_add_sum,
            Field::ChatAskLocAdded => self.chat_ask.loc_added_sum,
            Field::AgentEditLocAdded => self.agent_edit.loc_added_sum,
            Field::AgentEditLocDeleted => self.agent_edit.loc_deleted_sum,
            // Identity and day span come from the user's summary row.
            _ => return self.user.cell(field),
        };
        value.to_string()
    }
}

/// Serializes rows under the given columns: BOM, header record, data records.
pub fn write_table<R: TableRow>(rows: &[R], columns: &[Column]) -> Result<Vec<u8>> {
    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = Writer::from_writer(&mut buffer);
        writer.write_record(columns.iter().map(|column| column.header))?;
        for row in rows {
            writer.write_record(columns.iter().map(|column| row.cell(column.field)))?;
        }
        writer.flush().map_err(csv::Error::from)?;
    }
    Ok(buffer)
}
