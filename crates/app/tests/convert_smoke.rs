mod support;

use std::collections::BTreeSet;
use std::fs;

use ingest::{extract, parse_records};
use metrics_aggregate::{Aggregates, Dimension};
use metrics_app::{AppError, Converter, OutputMode, RunConfig};
use metrics_core::{Counters, GroupKey};
use support::{EXPORT, file_names, generated_at, read_table, write_input};

fn converter(input: &std::path::Path, mode: OutputMode, out: &std::path::Path) -> Converter {
    let mut config = RunConfig::new(input, mode);
    config.output_dir = out.to_path_buf();
    Converter::new(config).expect("valid config")
}

#[test]
fn all_mode_writes_every_table_and_report() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "october.jsonl", EXPORT);
    let out = dir.path().join("out");

    let summary = converter(&input, OutputMode::All, &out)
        .run_at(generated_at())
        .expect("run");
    assert_eq!(summary.records, 3);
    assert_eq!(summary.users, 2);
    assert_eq!(summary.files.len(), 10);
    assert_eq!(
        file_names(&out),
        vec![
            "october_by_feature.csv",
            "october_by_ide.csv",
            "october_by_language_feature.csv",
            "october_by_language_model.csv",
            "october_by_model_feature.csv",
            "october_chat_loc_summary.csv",
            "october_code_completion_summary.csv",
            "october_feature_split_summary.csv",
            "october_report.html",
            "october_user_summary.csv",
        ]
    );
    let report = summary
        .files
        .iter()
        .find(|file| file.path.ends_with("october_report.html"))
        .expect("report entry");
    assert_eq!(report.rows, None);

    let users = read_table(&out.join("october_user_summary.csv"));
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["user_login"], "alice");
    assert_eq!(users[0]["user_id"], "1");
    assert_eq!(users[0]["active_days"], "2");
    assert_eq!(users[0]["code_generation_activity_count"], "16");
    assert_eq!(users[0]["code_acceptance_activity_count"], "13");
    assert_eq!(users[0]["acceptance_rate"], "81.25");
    assert_eq!(users[1]["user_login"], "bob");
    assert_eq!(users[1]["used_agent"], "true");
    assert_eq!(users[1]["acceptance_rate"], "25.00");

    let ides = read_table(&out.join("october_by_ide.csv"));
    assert_eq!(ides[0]["ide"], "vscode");
    assert_eq!(ides[0]["plugin_version"], "1.301.0");
    assert_eq!(ides[1]["plugin_version"], "");

    let completion = read_table(&out.join("october_code_completion_summary.csv"));
    assert_eq!(completion[0]["code_completion_acceptance_rate"], "81.25");
    assert_eq!(completion[0]["code_completion_loc_acceptance_rate"], "100.00");
    assert_eq!(completion[1]["code_completion_code_generation_count"], "0");

    let chat = read_table(&out.join("october_chat_loc_summary.csv"));
    assert_eq!(chat[0]["chat_loc_added_sum"], "0");
    assert_eq!(chat[1]["total_loc_added_sum"], "30");
    assert_eq!(chat[1]["chat_loc_added_sum"], "30");

    let split = read_table(&out.join("october_feature_split_summary.csv"));
    assert_eq!(split[0]["user_login"], "alice");
    assert_eq!(split[0]["code_completion_code_generation_count"], "16");
    assert_eq!(split[0]["code_completion_loc_suggested_to_add_sum"], "20");
    assert_eq!(split[0]["chat_ask_interaction_count"], "0");
    assert_eq!(split[1]["user_login"], "bob");
    assert_eq!(split[1]["code_completion_code_generation_count"], "0");
    assert_eq!(split[1]["chat_ask_loc_added_sum"], "5");
    assert_eq!(split[1]["agent_edit_loc_added_sum"], "0");

    let html = fs::read_to_string(out.join("october_report.html")).expect("read report");
    assert!(html.contains("GitHub Copilot Usage Report"));
    assert!(html.contains("2025-10-01 to 2025-10-02"));
    assert!(html.contains(r#"<tr class="top-rank rank-1"><td><span class="badge badge-1">1</span></td><td>alice</td>"#));
    assert!(html.contains("<h2>Features</h2>"));
}

#[test]
fn generation_is_conserved_in_written_tables() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "metrics.jsonl", EXPORT);
    converter(&input, OutputMode::All, dir.path())
        .run_at(generated_at())
        .expect("run");

    let total = |name: &str| -> u64 {
        read_table(&dir.path().join(format!("metrics_{}.csv", name)))
            .iter()
            .map(|row| row["code_generation_activity_count"].parse::<u64>().expect("count"))
            .sum()
    };
    assert_eq!(total("user_summary"), 20);
    assert_eq!(total("by_ide"), 20);
    assert_eq!(total("by_feature"), 20);
    assert_eq!(total("by_language_model"), 20);
}

#[test]
fn feature_table_round_trips_keys_and_counters() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "metrics.jsonl", EXPORT);
    converter(&input, OutputMode::ByFeature, dir.path())
        .run_at(generated_at())
        .expect("run");

    let rows: BTreeSet<(String, String, String, String)> =
        read_table(&dir.path().join("metrics_by_feature.csv"))
            .into_iter()
            .map(|row| {
                (
                    row["user_login"].clone(),
                    row["feature"].clone(),
                    row["code_generation_activity_count"].clone(),
                    row["loc_added_sum"].clone(),
                )
            })
            .collect();
    let expected: BTreeSet<(String, String, String, String)> = [
        ("alice", "code_completion", "16", "20"),
        ("bob", "chat_panel_agent_mode", "3", "25"),
        ("bob", "chat_panel_ask_mode", "1", "5"),
    ]
    .into_iter()
    .map(|(a, b, c, d)| (a.to_string(), b.to_string(), c.to_string(), d.to_string()))
    .collect();
    assert_eq!(rows, expected);
}

const COUNTER_COLUMNS: [&str; 7] = [
    "user_initiated_interaction_count",
    "code_generation_activity_count",
    "code_acceptance_activity_count",
    "loc_suggested_to_add_sum",
    "loc_suggested_to_delete_sum",
    "loc_added_sum",
    "loc_deleted_sum",
];

fn counter(counters: &Counters, column: &str) -> u64 {
    match column {
        "user_initiated_interaction_count" => counters.user_initiated_interaction_count,
        "code_generation_activity_count" => counters.code_generation_activity_count,
        "code_acceptance_activity_count" => counters.code_acceptance_activity_count,
        "loc_suggested_to_add_sum" => counters.loc_suggested_to_add_sum,
        "loc_suggested_to_delete_sum" => counters.loc_suggested_to_delete_sum,
        "loc_added_sum" => counters.loc_added_sum,
        "loc_deleted_sum" => counters.loc_deleted_sum,
        other => panic!("unknown counter column {other}"),
    }
}

fn key_columns(key: &GroupKey) -> [(&'static str, String); 5] {
    let part = |value: &Option<String>| value.clone().unwrap_or_default();
    [
        ("user_login", part(&key.user_login)),
        ("ide", part(&key.ide)),
        ("feature", part(&key.feature)),
        ("language", part(&key.language)),
        ("model", part(&key.model)),
    ]
}

#[test]
fn dimension_tables_match_aggregates_column_for_column() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "metrics.jsonl", EXPORT);
    converter(&input, OutputMode::All, dir.path())
        .run_at(generated_at())
        .expect("run");

    let records = parse_records(EXPORT).expect("parse");
    let flat: Vec<_> = extract(&records).collect();
    let aggregates = Aggregates::build(&flat);

    for dimension in Dimension::ALL {
        let name = dimension.name();
        let table = read_table(&dir.path().join(format!("metrics_{}.csv", name)));
        let rows = aggregates.rows(dimension);
        assert_eq!(table.len(), rows.len(), "{name} row count");
        for (written, row) in table.iter().zip(rows) {
            for (column, value) in key_columns(&row.key) {
                if let Some(cell) = written.get(column) {
                    assert_eq!(cell, &value, "{name}.{column}");
                }
            }
            assert!(written.contains_key("code_generation_activity_count"));
            // Language tables carry no interaction count.
            for column in COUNTER_COLUMNS {
                let Some(cell) = written.get(column) else {
                    continue;
                };
                assert_eq!(
                    cell.parse::<u64>().expect("count"),
                    counter(&row.counters, column),
                    "{name}.{column} for {}",
                    row.key.label()
                );
            }
        }
    }
}

#[test]
fn default_mode_writes_only_user_summary() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "metrics.json", EXPORT);
    let out = dir.path().join("out");
    let summary = converter(&input, OutputMode::UserSummary, &out)
        .run_at(generated_at())
        .expect("run");
    assert_eq!(summary.files.len(), 1);
    assert_eq!(summary.files[0].rows, Some(2));
    assert_eq!(file_names(&out), vec!["metrics_user_summary.csv"]);
}

#[test]
fn json_array_and_lines_give_identical_tables() {
    let dir = tempfile::tempdir().expect("temp dir");
    let lines: Vec<&str> = EXPORT.lines().filter(|line| !line.trim().is_empty()).collect();
    let array = format!("[\n{}\n]", lines.join(",\n"));
    let as_lines = write_input(dir.path(), "lines.jsonl", EXPORT);
    let as_array = write_input(dir.path(), "array.json", &array);

    converter(&as_lines, OutputMode::All, dir.path())
        .run_at(generated_at())
        .expect("run lines");
    converter(&as_array, OutputMode::All, dir.path())
        .run_at(generated_at())
        .expect("run array");

    for name in ["user_summary", "by_ide", "by_model_feature", "report"] {
        let extension = if name == "report" { "html" } else { "csv" };
        let left = fs::read(dir.path().join(format!("lines_{}.{}", name, extension))).expect("lines");
        let right = fs::read(dir.path().join(format!("array_{}.{}", name, extension))).expect("array");
        assert_eq!(left, right, "{name} differs");
    }
}

#[test]
fn missing_input_is_rejected_before_running() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = RunConfig::new(dir.path().join("absent.json"), OutputMode::All);
    let err = Converter::new(config).expect_err("missing input");
    assert!(matches!(err, AppError::InputNotFound { .. }));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn schema_violation_writes_nothing() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(
        dir.path(),
        "broken.jsonl",
        "{\"day\":\"2025-10-01\",\"user_login\":\"alice\"}\n{\"user_login\":\"bob\"}\n",
    );
    let out = dir.path().join("out");
    let err = converter(&input, OutputMode::All, &out)
        .run_at(generated_at())
        .expect_err("schema violation");
    assert!(matches!(err, AppError::SchemaViolation(_)));
    assert_eq!(err.exit_code(), 4);
    assert!(!out.exists());
}

#[test]
fn failed_write_leaves_no_partial_outputs() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_input(dir.path(), "metrics.jsonl", EXPORT);
    let out = dir.path().join("out");
    // The report is written last; a directory in its place makes the rename fail.
    fs::create_dir_all(out.join("metrics_report.html")).expect("blocker");

    let err = converter(&input, OutputMode::All, &out)
        .run_at(generated_at())
        .expect_err("blocked report");
    assert!(matches!(err, AppError::OutputWrite { .. }));
    assert_eq!(err.exit_code(), 5);
    assert_eq!(file_names(&out), vec!["metrics_report.html"]);
}
