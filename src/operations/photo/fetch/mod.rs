mod runner;
mod types;

pub use runner::{fetch_photo_query, run, FetchPhotoQuery};
pub use types::*;
