use std::collections::HashMap;

use chrono::NaiveDate;
use metrics_core::{Breakdown, Counters, FlatRecord, UsageRecord};

/// Lazily flattens usage records into one flat record per day total and per
/// breakdown entry. Each breakdown family partitions the same day of activity,
/// so consumers read one family at a time.
///
/// `seq` is the order in which the record's day first appears in the input.
/// Records of the same day share it, so reordering them within a day does
/// not move any group's first-seen position.
pub fn extract(records: &[UsageRecord]) -> impl Iterator<Item = FlatRecord> + '_ {
    let day_index = first_appearance(records);
    records.iter().flat_map(move |record| {
        let seq = day_index.get(&record.day).copied().unwrap_or_default();
        flatten_record(seq, record)
    })
}

fn first_appearance(records: &[UsageRecord]) -> HashMap<NaiveDate, usize> {
    let mut index = HashMap::new();
    for record in records {
        let next = index.len();
        index.entry(record.day).or_insert(next);
    }
    index
}

fn base(seq: usize, record: &UsageRecord, breakdown: Breakdown, counters: Counters) -> FlatRecord {
    let mut flat = FlatRecord::new(seq, breakdown, &record.user_login, record.day, counters);
    flat.user_id = record.user_id.as_ref().map(ToString::to_string);
    flat.enterprise_id = record.enterprise_id.as_ref().map(ToString::to_string);
    flat.report_start_day = record.report_start_day;
    flat.report_end_day = record.report_end_day;
    flat
}

fn flatten_record(seq: usize, record: &UsageRecord) -> impl Iterator<Item = FlatRecord> + '_ {
    let day_total = std::iter::once_with(move || {
        let mut flat = base(seq, record, Breakdown::UserDay, record.totals);
        flat.used_agent = record.used_agent;
        flat.used_chat = record.used_chat;
        flat
    });

    let ides = record.totals_by_ide.iter().map(move |entry| {
        let mut flat = base(seq, record, Breakdown::Ide, entry.counters);
        flat.ide = Some(entry.ide.clone());
        flat.plugin_version = entry.last_known_plugin_version.clone();
        flat.ide_version = entry.last_known_ide_version.clone();
        flat
    });

    let features = record.totals_by_feature.iter().map(move |entry| {
        let mut flat = base(seq, record, Breakdown::Feature, entry.counters);
        flat.feature = Some(entry.feature.clone());
        flat
    });

    let language_features = record.totals_by_language_feature.iter().map(move |entry| {
        let mut flat = base(seq, record, Breakdown::LanguageFeature, entry.counters);
        flat.language = Some(entry.language.clone());
        flat.feature = Some(entry.feature.clone());
        flat
    });

    let language_models = record.totals_by_language_model.iter().map(move |entry| {
        let mut flat = base(seq, record, Breakdown::LanguageModel, entry.counters);
        flat.language = Some(entry.language.clone());
        flat.model = Some(entry.model.clone());
        flat
    });

    let model_features = record.totals_by_model_feature.iter().map(move |entry| {
        let mut flat = base(seq, record, Breakdown::ModelFeature, entry.counters);
        flat.model = Some(entry.model.clone());
        flat.feature = Some(entry.feature.clone());
        flat
    });

    day_total
        .chain(ides)
        .chain(features)
        .chain(language_features)
        .chain(language_models)
        .chain(model_features)
}
