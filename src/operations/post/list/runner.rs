use graphql_client::*;

use crate::{ClientError, GraphQlClient, Operation};

use super::types::{ListPostsInput, PostsPage};

#[derive(GraphQLQuery)]
#[graphql(
    query_path = "src/operations/post/list/list_posts.graphql",
    schema_path = "schema/schema.graphql",
    response_derives = "PartialEq, Debug, Serialize, Deserialize",
    deprecated = "warn"
)]
/// Paginated post listing; the response carries first/prev/next/last page
/// links and a total count, passed through unmodified.
pub struct ListPostsQuery;

/// Fetches one page of posts.
pub async fn run(
    input: ListPostsInput,
    client: &GraphQlClient,
) -> Result<Option<PostsPage>, ClientError> {
    let response_data = client.execute(Operation::<ListPostsQuery>::query(input.into())).await?;
    Ok(response_data.and_then(page_from_response_data))
}

fn page_from_response_data(response_data: list_posts_query::ResponseData) -> Option<PostsPage> {
    response_data.posts.map(PostsPage::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::post::list::PageRef;
    use serde_json::json;

    #[test]
    fn page_from_response_data_keeps_links_and_count() {
        let json_response = json!({
            "posts": {
                "data": [
                    { "id": "11", "title": "first" },
                    { "id": "12", "title": "second" }
                ],
                "links": {
                    "first": { "page": 1, "limit": 10 },
                    "prev": { "page": 1, "limit": 10 },
                    "next": { "page": 3, "limit": 10 },
                    "last": { "page": 10, "limit": 10 }
                },
                "meta": { "totalCount": 100 }
            }
        });
        let data: list_posts_query::ResponseData = serde_json::from_value(json_response).unwrap();
        let page = page_from_response_data(data).unwrap();

        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.posts[0].title.as_deref(), Some("first"));
        assert_eq!(
            page.links.next,
            Some(PageRef {
                page: Some(3),
                limit: Some(10)
            })
        );
        assert_eq!(page.total_count, Some(100));
    }

    #[test]
    fn page_from_response_data_handles_sparse_payloads() {
        let json_response = json!({
            "posts": {
                "data": null,
                "links": null,
                "meta": null
            }
        });
        let data: list_posts_query::ResponseData = serde_json::from_value(json_response).unwrap();
        let page = page_from_response_data(data).unwrap();

        assert!(page.posts.is_empty());
        assert_eq!(page.links.next, None);
        assert_eq!(page.total_count, None);
    }
}
