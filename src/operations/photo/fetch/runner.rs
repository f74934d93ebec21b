use graphql_client::*;

use crate::{ClientError, GraphQlClient, Operation};

use super::types::{FetchPhotoInput, Photo};

#[derive(GraphQLQuery)]
#[graphql(
    query_path = "src/operations/photo/fetch/fetch_photo.graphql",
    schema_path = "schema/schema.graphql",
    response_derives = "PartialEq, Debug, Serialize, Deserialize",
    deprecated = "warn"
)]
pub struct FetchPhotoQuery;

/// Fetches a single photo by ID.
pub async fn run(
    input: FetchPhotoInput,
    client: &GraphQlClient,
) -> Result<Option<Photo>, ClientError> {
    let response_data = client.execute(Operation::<FetchPhotoQuery>::query(input.into())).await?;
    Ok(response_data.and_then(photo_from_response_data))
}

fn photo_from_response_data(response_data: fetch_photo_query::ResponseData) -> Option<Photo> {
    response_data.photo.map(Photo::from)
}
