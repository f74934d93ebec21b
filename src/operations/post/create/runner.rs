use graphql_client::*;

use crate::operations::post::fetch::Post;
use crate::{ClientError, GraphQlClient, Operation};

use super::types::CreatePostInput;

#[derive(GraphQLQuery)]
#[graphql(
    query_path = "src/operations/post/create/create_post.graphql",
    schema_path = "schema/schema.graphql",
    response_derives = "PartialEq, Debug, Serialize, Deserialize",
    deprecated = "warn"
)]
pub struct CreatePostMutation;

/// Creates a post and returns the server's view of it.
pub async fn run(
    input: CreatePostInput,
    client: &GraphQlClient,
) -> Result<Option<Post>, ClientError> {
    let response_data = client.execute(Operation::<CreatePostMutation>::mutation(input.into())).await?;
    Ok(response_data.and_then(post_from_response_data))
}

fn post_from_response_data(response_data: create_post_mutation::ResponseData) -> Option<Post> {
    response_data.create_post.map(|post| Post {
        id: post.id,
        title: post.title,
        body: post.body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn post_from_response_data_maps_created_post() {
        let json_response = json!({
            "createPost": {
                "id": "101",
                "title": "A Very Captivating Post Title",
                "body": "Some interesting content."
            }
        });
        let data: create_post_mutation::ResponseData =
            serde_json::from_value(json_response).unwrap();
        let post = post_from_response_data(data).unwrap();

        assert_eq!(
            post,
            Post {
                id: Some("101".to_string()),
                title: Some("A Very Captivating Post Title".to_string()),
                body: Some("Some interesting content.".to_string()),
            }
        );
    }

    #[test]
    fn post_from_response_data_handles_missing_post() {
        let json_response = json!({ "createPost": null });
        let data: create_post_mutation::ResponseData =
            serde_json::from_value(json_response).unwrap();
        assert_eq!(post_from_response_data(data), None);
    }
}
