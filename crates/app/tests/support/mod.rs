#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Two users over two days: alice completes code, bob chats and runs the agent.
pub const EXPORT: &str = r#"
{"day":"2025-10-01","user_id":1,"user_login":"alice","code_generation_activity_count":10,"code_acceptance_activity_count":7,"loc_suggested_to_add_sum":20,"loc_added_sum":12,"totals_by_ide":[{"ide":"vscode","code_generation_activity_count":10,"code_acceptance_activity_count":7,"loc_added_sum":12,"last_known_plugin_version":{"plugin":"copilot","plugin_version":"1.300.0","sampled_at":"2025-10-01T09:00:00Z"}}],"totals_by_feature":[{"feature":"code_completion","code_generation_activity_count":10,"code_acceptance_activity_count":7,"loc_suggested_to_add_sum":20,"loc_added_sum":12}],"totals_by_language_feature":[{"language":"rust","feature":"code_completion","code_generation_activity_count":10,"code_acceptance_activity_count":7}],"totals_by_language_model":[{"language":"rust","model":"gpt-4o","code_generation_activity_count":10,"code_acceptance_activity_count":7}],"totals_by_model_feature":[{"model":"gpt-4o","feature":"code_completion","code_generation_activity_count":10,"code_acceptance_activity_count":7}]}
{"day":"2025-10-01","user_id":2,"user_login":"bob","code_generation_activity_count":4,"code_acceptance_activity_count":1,"loc_added_sum":30,"used_agent":true,"used_chat":true,"totals_by_ide":[{"ide":"jetbrains","code_generation_activity_count":4,"code_acceptance_activity_count":1,"loc_added_sum":30}],"totals_by_feature":[{"feature":"chat_panel_agent_mode","code_generation_activity_count":3,"code_acceptance_activity_count":1,"loc_added_sum":25},{"feature":"chat_panel_ask_mode","code_generation_activity_count":1,"loc_added_sum":5}],"totals_by_language_feature":[{"language":"python","feature":"chat_panel_agent_mode","code_generation_activity_count":4,"code_acceptance_activity_count":1}],"totals_by_language_model":[{"language":"python","model":"claude-sonnet-4","code_generation_activity_count":4,"code_acceptance_activity_count":1}],"totals_by_model_feature":[{"model":"claude-sonnet-4","feature":"chat_panel_agent_mode","code_generation_activity_count":4,"code_acceptance_activity_count":1}]}
{"day":"2025-10-02","user_id":1,"user_login":"alice","code_generation_activity_count":6,"code_acceptance_activity_count":6,"loc_added_sum":8,"totals_by_ide":[{"ide":"vscode","code_generation_activity_count":6,"code_acceptance_activity_count":6,"loc_added_sum":8,"last_known_plugin_version":{"plugin":"copilot","plugin_version":"1.301.0","sampled_at":"2025-10-02T09:00:00Z"}}],"totals_by_feature":[{"feature":"code_completion","code_generation_activity_count":6,"code_acceptance_activity_count":6,"loc_added_sum":8}],"totals_by_language_feature":[{"language":"go","feature":"code_completion","code_generation_activity_count":6,"code_acceptance_activity_count":6}],"totals_by_language_model":[{"language":"go","model":"gpt-4o","code_generation_activity_count":6,"code_acceptance_activity_count":6}],"totals_by_model_feature":[{"model":"gpt-4o","feature":"code_completion","code_generation_activity_count":6,"code_acceptance_activity_count":6}]}
"#;

pub fn write_input(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write input");
    path
}

pub fn generated_at() -> DateTime<Utc> {
    DateTime::from_timestamp(1_760_000_000, 0).expect("timestamp")
}

/// Parses a written table into header-keyed rows.
pub fn read_table(path: &Path) -> Vec<HashMap<String, String>> {
    let bytes = fs::read(path).expect("read table");
    assert!(bytes.starts_with(UTF8_BOM), "{} has no BOM", path.display());
    let mut reader = csv::Reader::from_reader(&bytes[UTF8_BOM.len()..]);
    let headers = reader.headers().expect("headers").clone();
    reader
        .records()
        .map(|record| {
            let record = record.expect("record");
            headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| (header.to_string(), value.to_string()))
                .collect()
        })
        .collect()
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("list dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
