mod aggregates;
mod dimension;
mod reducer;
mod summaries;

pub use aggregates::Aggregates;
pub use dimension::Dimension;
pub use reducer::{aggregate, rank, roll_up};
pub use summaries::{
    ChatLocRow, CompletionSummaryRow, FeatureSplitRow, chat_loc_summary, code_completion_summary,
    feature_split_summary, user_key,
};
