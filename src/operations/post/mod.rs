/// Create a post.
pub mod create;
/// Fetch a single post by ID.
pub mod fetch;
/// Fetch a paginated list of posts.
pub mod list;
