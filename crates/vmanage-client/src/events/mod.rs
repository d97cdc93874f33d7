//! Event Log Module
//!
//! Filter construction, query execution and record decoding for
//! `dataservice/event`.

mod filter;
mod query;
mod record;

pub use filter::*;
pub use query::event_url;
pub use record::{EventRecord, DETAILS_FIELD, ENTRY_TIME_FIELD};
