use super::runner::fetch_photo_query;

type QueryVariables = fetch_photo_query::Variables;

/// Input for the fetch-photo operation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FetchPhotoInput {
    /// ID of the photo to fetch.
    pub photo_id: String,
}

impl From<FetchPhotoInput> for QueryVariables {
    fn from(input: FetchPhotoInput) -> Self {
        Self {
            photo_id: input.photo_id,
        }
    }
}

/// A single photo.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Photo {
    /// The photo's ID.
    pub id: Option<String>,
    /// The photo's title.
    pub title: Option<String>,
    /// URL of the full-size image.
    pub url: Option<String>,
}

impl From<fetch_photo_query::FetchPhotoQueryPhoto> for Photo {
    fn from(photo: fetch_photo_query::FetchPhotoQueryPhoto) -> Self {
        Photo {
            id: photo.id,
            title: photo.title,
            url: photo.url,
        }
    }
}
