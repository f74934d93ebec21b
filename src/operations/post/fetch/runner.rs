use graphql_client::*;

use crate::{ClientError, GraphQlClient, Operation};

use super::types::{FetchPostInput, Post};

#[derive(GraphQLQuery)]
// The paths are relative to the directory where your `Cargo.toml` is located.
#[graphql(
    query_path = "src/operations/post/fetch/fetch_post.graphql",
    schema_path = "schema/schema.graphql",
    response_derives = "PartialEq, Debug, Serialize, Deserialize",
    deprecated = "warn"
)]
/// This struct is used to generate the module containing `Variables` and
/// `ResponseData` structs.
/// Snake case of this name is the mod name. i.e. fetch_post_query
pub struct FetchPostQuery;

/// Fetches a single post by ID. Returns `Ok(None)` when the post does not
/// exist, or when the response carried errors and the client swallows them.
pub async fn run(
    input: FetchPostInput,
    client: &GraphQlClient,
) -> Result<Option<Post>, ClientError> {
    let response_data = client.execute(Operation::<FetchPostQuery>::query(input.into())).await?;
    Ok(response_data.and_then(post_from_response_data))
}

fn post_from_response_data(response_data: fetch_post_query::ResponseData) -> Option<Post> {
    response_data.post.map(Post::from)
}
