mod extract;
mod parser;
mod totals;
mod types;

pub use extract::extract;
pub use parser::{load_records, parse_records};
pub use totals::{InputStats, input_stats};
pub use types::{IngestError, Result};
