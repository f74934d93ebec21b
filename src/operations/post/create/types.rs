use super::runner::create_post_mutation;

type MutationVariables = create_post_mutation::Variables;

/// Input for the create-post operation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CreatePostInput {
    /// Title of the new post.
    pub title: String,
    /// Body text of the new post.
    pub body: String,
}

impl From<CreatePostInput> for MutationVariables {
    fn from(input: CreatePostInput) -> Self {
        Self {
            input: create_post_mutation::CreatePostInput {
                title: input.title,
                body: input.body,
            },
        }
    }
}
