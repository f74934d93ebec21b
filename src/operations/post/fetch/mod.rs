mod runner;
mod types;

pub use runner::{fetch_post_query, run, FetchPostQuery};
pub use types::*;
