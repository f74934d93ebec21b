mod runner;
mod types;

pub use runner::{create_post_mutation, run, CreatePostMutation};
pub use types::*;
