use std::collections::HashSet;

use chrono::NaiveDate;
use metrics_core::{Counters, UsageRecord};
use serde::Serialize;

/// Quick shape of an export: how much data and what it covers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InputStats {
    pub records: usize,
    pub users: usize,
    pub first_day: Option<NaiveDate>,
    pub last_day: Option<NaiveDate>,
    pub totals: Counters,
}

pub fn input_stats(records: &[UsageRecord]) -> InputStats {
    let mut users = HashSet::new();
    let mut stats = InputStats {
        records: records.len(),
        ..InputStats::default()
    };
    for record in records {
        users.insert(record.user_login.as_str());
        stats.totals = stats.totals.add(record.totals);
        stats.first_day = Some(stats.first_day.map_or(record.day, |day| day.min(record.day)));
        stats.last_day = Some(stats.last_day.map_or(record.day, |day| day.max(record.day)));
    }
    stats.users = users.len();
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_records;

    #[test]
    fn input_stats_counts_users_and_days() {
        let input = r#"
{"day":"2025-10-03","user_login":"alice","code_generation_activity_count":2}
{"day":"2025-10-01","user_login":"bob","code_generation_activity_count":3}
{"day":"2025-10-02","user_login":"alice","code_acceptance_activity_count":1}
"#;
        let records = parse_records(input).expect("records");
        let stats = input_stats(&records);
        assert_eq!(stats.records, 3);
        assert_eq!(stats.users, 2);
        assert_eq!(stats.first_day, NaiveDate::from_ymd_opt(2025, 10, 1));
        assert_eq!(stats.last_day, NaiveDate::from_ymd_opt(2025, 10, 3));
        assert_eq!(stats.totals.code_generation_activity_count, 5);
        assert_eq!(stats.totals.code_acceptance_activity_count, 1);
    }

    #[test]
    fn input_stats_serialize_for_json_output() {
        let records =
            parse_records(r#"{"day":"2025-10-01","user_login":"alice","loc_added_sum":4}"#)
                .expect("records");
        let value = serde_json::to_value(input_stats(&records)).expect("json");
        assert_eq!(value["records"], 1);
        assert_eq!(value["users"], 1);
        assert_eq!(value["first_day"], "2025-10-01");
        assert_eq!(value["last_day"], "2025-10-01");
        assert_eq!(value["totals"]["loc_added_sum"], 4);
    }

    #[test]
    fn input_stats_empty() {
        let stats = input_stats(&[]);
        assert_eq!(stats, InputStats::default());
    }
}
