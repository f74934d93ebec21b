/// Fetch a single photo by ID.
pub mod fetch;
