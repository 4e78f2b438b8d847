pub mod lookup;
pub mod search;

pub use lookup::{
    annotate_table, lookup_batch, lookup_one, BatchEntry, BatchRequest, LookupResult,
    NOT_FOUND_MESSAGE,
};
pub use search::{search_descriptions, MatchResult, SearchOutcome};
