use std::collections::HashMap;

use chrono::NaiveDate;
use metrics_core::{
    AGENT_EDIT_FEATURE, AggregateRow, CHAT_ASK_FEATURE, CODE_COMPLETION_FEATURE, Counters,
    GroupKey,
};

use crate::aggregates::Aggregates;

/// Code completion activity of one user over the whole export.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSummaryRow {
    pub user: GroupKey,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub counters: Counters,
}

impl CompletionSummaryRow {
    pub fn acceptance_rate(&self) -> f64 {
        self.counters.acceptance_rate()
    }

    pub fn loc_acceptance_rate(&self) -> f64 {
        self.counters.loc_acceptance_rate()
    }
}

/// Lines added by one user, split into completion and chat.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatLocRow {
    pub user: GroupKey,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub total_loc_added: u64,
    pub completion_loc_added: u64,
}

impl ChatLocRow {
    /// Everything not added through completion is attributed to chat.
    pub fn chat_loc_added(&self) -> u64 {
        self.total_loc_added.saturating_sub(self.completion_loc_added)
    }
}

/// One user's activity split across completion, ask-mode chat and agent edits.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSplitRow {
    pub user: AggregateRow,
    pub completion: Counters,
    pub chat_ask: Counters,
    pub agent_edit: Counters,
}

/// User part of a key; other parts cleared.
pub fn user_key(key: &GroupKey) -> GroupKey {
    GroupKey {
        user_login: key.user_login.clone(),
        user_id: key.user_id.clone(),
        ..GroupKey::default()
    }
}

fn feature_by_user(by_feature: &[AggregateRow], feature: &str) -> HashMap<GroupKey, Counters> {
    let mut totals: HashMap<GroupKey, Counters> = HashMap::new();
    for row in by_feature
        .iter()
        .filter(|row| row.key.feature.as_deref() == Some(feature))
    {
        totals
            .entry(user_key(&row.key))
            .and_modify(|value| *value = value.add(row.counters))
            .or_insert(row.counters);
    }
    totals
}

fn completion_by_user(by_feature: &[AggregateRow]) -> HashMap<GroupKey, Counters> {
    feature_by_user(by_feature, CODE_COMPLETION_FEATURE)
}

/// One row per user, zeros for users without completion activity.
pub fn code_completion_summary(aggregates: &Aggregates) -> Vec<CompletionSummaryRow> {
    let completion = completion_by_user(&aggregates.by_feature);
    aggregates
        .user_summary
        .iter()
        .map(|user| CompletionSummaryRow {
            user: user.key.clone(),
            first_day: user.first_day,
            last_day: user.last_day,
            counters: completion.get(&user.key).copied().unwrap_or_default(),
        })
        .collect()
}

pub fn chat_loc_summary(aggregates: &Aggregates) -> Vec<ChatLocRow> {
    let completion = completion_by_user(&aggregates.by_feature);
    let mut ide_loc: HashMap<GroupKey, u64> = HashMap::new();
    for row in &aggregates.by_ide {
        let total = ide_loc.entry(user_key(&row.key)).or_default();
        *total = total.saturating_add(row.counters.loc_added_sum);
    }
    aggregates
        .user_summary
        .iter()
        .map(|user| ChatLocRow {
            user: user.key.clone(),
            first_day: user.first_day,
            last_day: user.last_day,
            total_loc_added: ide_loc.get(&user.key).copied().unwrap_or(0),
            completion_loc_added: completion
                .get(&user.key)
                .map(|counters| counters.loc_added_sum)
                .unwrap_or(0),
        })
        .collect()
}

/// One row per user with the completion, ask-mode chat and agent edit
/// counters side by side. Missing features are zeros.
pub fn feature_split_summary(aggregates: &Aggregates) -> Vec<FeatureSplitRow> {
    let completion = completion_by_user(&aggregates.by_feature);
    let chat_ask = feature_by_user(&aggregates.by_feature, CHAT_ASK_FEATURE);
    let agent_edit = feature_by_user(&aggregates.by_feature, AGENT_EDIT_FEATURE);
    let lookup = |totals: &HashMap<GroupKey, Counters>, key: &GroupKey| {
        totals.get(key).copied().unwrap_or_default()
    };
    aggregates
        .user_summary
        .iter()
        .map(|user| FeatureSplitRow {
            user: user.clone(),
            completion: lookup(&completion, &user.key),
            chat_ask: lookup(&chat_ask, &user.key),
            agent_edit: lookup(&agent_edit, &user.key),
        })
        .collect()
}
