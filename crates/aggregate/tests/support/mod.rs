#![allow(dead_code)]

use ingest::{extract, parse_records};
use metrics_aggregate::Aggregates;
use metrics_core::{AggregateRow, FlatRecord};

pub fn flat_records(input: &str) -> Vec<FlatRecord> {
    let records = parse_records(input).expect("parse records");
    extract(&records).collect()
}

pub fn build(input: &str) -> Aggregates {
    Aggregates::build(&flat_records(input))
}

pub fn generations(rows: &[AggregateRow]) -> u64 {
    rows.iter().map(|row| row.generations()).sum()
}

pub fn find<'a>(rows: &'a [AggregateRow], label: &str) -> &'a AggregateRow {
    rows.iter()
        .find(|row| row.key.label() == label)
        .unwrap_or_else(|| panic!("row {label} not found"))
}

/// Two days for alice, one for bob, with every breakdown family populated.
pub const EXPORT: &str = r#"
{"day":"2025-10-01","user_id":1,"user_login":"alice","user_initiated_interaction_count":3,"code_generation_activity_count":10,"code_acceptance_activity_count":7,"loc_suggested_to_add_sum":20,"loc_added_sum":12,"used_chat":true,"totals_by_ide":[{"ide":"vscode","code_generation_activity_count":10,"code_acceptance_activity_count":7,"loc_added_sum":12}],"totals_by_feature":[{"feature":"code_completion","code_generation_activity_count":8,"code_acceptance_activity_count":6,"loc_suggested_to_add_sum":16,"loc_added_sum":9},{"feature":"chat_panel_ask_mode","code_generation_activity_count":2,"code_acceptance_activity_count":1,"loc_added_sum":3}],"totals_by_language_feature":[{"language":"rust","feature":"code_completion","code_generation_activity_count":8},{"language":"markdown","feature":"chat_panel_ask_mode","code_generation_activity_count":2}],"totals_by_language_model":[{"language":"rust","model":"gpt-4o","code_generation_activity_count":8},{"language":"markdown","model":"claude-sonnet-4","code_generation_activity_count":2}],"totals_by_model_feature":[{"model":"gpt-4o","feature":"code_completion","code_generation_activity_count":8},{"model":"claude-sonnet-4","feature":"chat_panel_ask_mode","code_generation_activity_count":2}]}
{"day":"2025-10-01","user_id":2,"user_login":"bob","code_generation_activity_count":4,"code_acceptance_activity_count":1,"used_agent":true,"totals_by_ide":[{"ide":"jetbrains","code_generation_activity_count":4,"code_acceptance_activity_count":1,"loc_added_sum":30}],"totals_by_feature":[{"feature":"agent_edit","code_generation_activity_count":4,"code_acceptance_activity_count":1,"loc_added_sum":30}],"totals_by_language_feature":[{"language":"python","feature":"agent_edit","code_generation_activity_count":4}],"totals_by_language_model":[{"language":"python","model":"gpt-4o","code_generation_activity_count":4}],"totals_by_model_feature":[{"model":"gpt-4o","feature":"agent_edit","code_generation_activity_count":4}]}
{"day":"2025-10-02","user_id":1,"user_login":"alice","code_generation_activity_count":5,"code_acceptance_activity_count":5,"totals_by_ide":[{"ide":"vscode","code_generation_activity_count":5,"code_acceptance_activity_count":5,"loc_added_sum":4}],"totals_by_feature":[{"feature":"code_completion","code_generation_activity_count":5,"code_acceptance_activity_count":5,"loc_added_sum":4}],"totals_by_language_feature":[{"language":"rust","feature":"code_completion","code_generation_activity_count":5}],"totals_by_language_model":[{"language":"rust","model":"gpt-4o","code_generation_activity_count":5}],"totals_by_model_feature":[{"model":"gpt-4o","feature":"code_completion","code_generation_activity_count":5}]}
"#;
