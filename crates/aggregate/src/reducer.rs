use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use metrics_core::{AggregateRow, FlatRecord, GroupKey, latest_sample};

use crate::dimension::Dimension;

struct GroupState {
    row: AggregateRow,
    days: HashSet<NaiveDate>,
}

impl GroupState {
    fn start(key: GroupKey, record: &FlatRecord) -> Self {
        Self {
            row: AggregateRow {
                key,
                counters: record.counters,
                first_day: record.day,
                last_day: record.day,
                active_days: 1,
                enterprise_id: record.enterprise_id.clone(),
                report_start_day: record.report_start_day,
                report_end_day: record.report_end_day,
                used_agent: record.used_agent,
                used_chat: record.used_chat,
                plugin_version: record.plugin_version.clone(),
                ide_version: record.ide_version.clone(),
                first_seen: record.seq,
            },
            days: HashSet::from([record.day]),
        }
    }

    fn absorb(&mut self, record: &FlatRecord) {
        let row = &mut self.row;
        row.counters = row.counters.add(record.counters);
        row.first_day = row.first_day.min(record.day);
        row.last_day = row.last_day.max(record.day);
        if row.enterprise_id.is_none() {
            row.enterprise_id = record.enterprise_id.clone();
        }
        row.report_start_day = earlier(row.report_start_day, record.report_start_day);
        row.report_end_day = row.report_end_day.max(record.report_end_day);
        row.used_agent |= record.used_agent;
        row.used_chat |= record.used_chat;
        row.plugin_version = latest_sample(row.plugin_version.take(), record.plugin_version.as_ref());
        row.ide_version = latest_sample(row.ide_version.take(), record.ide_version.as_ref());
        row.first_seen = row.first_seen.min(record.seq);
        self.days.insert(record.day);
    }

    fn finish(mut self) -> AggregateRow {
        self.row.active_days = self.days.len();
        self.row
    }
}

// `Option::min` would prefer `None`.
fn earlier(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Groups the records of one dimension and sums their counters. Groups come
/// out in the order their first record was seen.
pub fn aggregate<'a, I>(records: I, dimension: Dimension) -> Vec<AggregateRow>
where
    I: IntoIterator<Item = &'a FlatRecord>,
{
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<GroupState> = Vec::new();
    for record in records {
        let Some(key) = dimension.key_of(record) else {
            continue;
        };
        match index.get(&key) {
            Some(&slot) => groups[slot].absorb(record),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(GroupState::start(key, record));
            }
        }
    }
    groups.into_iter().map(GroupState::finish).collect()
}

/// Re-groups aggregate rows under a coarser key, keeping first-seen order.
/// `active_days` of a merged row is the largest of its parts.
pub fn roll_up<F>(rows: &[AggregateRow], project: F) -> Vec<AggregateRow>
where
    F: Fn(&GroupKey) -> GroupKey,
{
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut merged: Vec<AggregateRow> = Vec::new();
    for row in rows {
        let key = project(&row.key);
        match index.get(&key) {
            Some(&slot) => merge_into(&mut merged[slot], row),
            None => {
                index.insert(key.clone(), merged.len());
                merged.push(AggregateRow {
                    key,
                    ..row.clone()
                });
            }
        }
    }
    merged
}

fn merge_into(target: &mut AggregateRow, row: &AggregateRow) {
    target.counters = target.counters.add(row.counters);
    target.first_day = target.first_day.min(row.first_day);
    target.last_day = target.last_day.max(row.last_day);
    target.active_days = target.active_days.max(row.active_days);
    if target.enterprise_id.is_none() {
        target.enterprise_id = row.enterprise_id.clone();
    }
    target.report_start_day = earlier(target.report_start_day, row.report_start_day);
    target.report_end_day = target.report_end_day.max(row.report_end_day);
    target.used_agent |= row.used_agent;
    target.used_chat |= row.used_chat;
    target.plugin_version = latest_sample(target.plugin_version.take(), row.plugin_version.as_ref());
    target.ide_version = latest_sample(target.ide_version.take(), row.ide_version.as_ref());
    target.first_seen = target.first_seen.min(row.first_seen);
}

/// Top `limit` rows by generation count. Ties go to the group seen first in
/// the input, then to the smaller key.
pub fn rank(rows: &[AggregateRow], limit: usize) -> Vec<AggregateRow> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| {
        b.generations()
            .cmp(&a.generations())
            .then(a.first_seen.cmp(&b.first_seen))
            .then_with(|| a.key.cmp(&b.key))
    });
    ranked.truncate(limit);
    ranked
}
