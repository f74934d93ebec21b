use super::runner::fetch_post_query;

type QueryVariables = fetch_post_query::Variables;

/// Input for the fetch-post operation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FetchPostInput {
    /// ID of the post to fetch.
    pub post_id: String,
}

impl From<FetchPostInput> for QueryVariables {
    fn from(input: FetchPostInput) -> Self {
        Self {
            post_id: input.post_id,
        }
    }
}

/// A single post.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Post {
    /// The post's ID.
    pub id: Option<String>,
    /// The post's title.
    pub title: Option<String>,
    /// The post's body text.
    pub body: Option<String>,
}

impl From<fetch_post_query::FetchPostQueryPost> for Post {
    fn from(post: fetch_post_query::FetchPostQueryPost) -> Self {
        Post {
            id: post.id,
            title: post.title,
            body: post.body,
        }
    }
}
