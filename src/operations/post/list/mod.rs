mod runner;
mod types;

pub use runner::{list_posts_query, run, ListPostsQuery};
pub use types::*;
