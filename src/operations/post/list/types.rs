use super::runner::list_posts_query;

type QueryVariables = list_posts_query::Variables;

/// Input for the list-posts operation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ListPostsInput {
    /// 1-based page number.
    pub page: i64,
    /// Page size.
    pub limit: i64,
}

impl From<ListPostsInput> for QueryVariables {
    fn from(input: ListPostsInput) -> Self {
        Self {
            options: Some(list_posts_query::PageQueryOptions {
                paginate: Some(list_posts_query::PaginateOptions {
                    page: Some(input.page),
                    limit: Some(input.limit),
                }),
            }),
        }
    }
}

/// One post in a listing.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PostSummary {
    /// The post's ID.
    pub id: Option<String>,
    /// The post's title.
    pub title: Option<String>,
}

/// A page/limit pair pointing at another page of the listing.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PageRef {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Page size.
    pub limit: Option<i64>,
}

/// Links to the surrounding pages of a listing.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PageLinks {
    /// The first page.
    pub first: Option<PageRef>,
    /// The previous page, if any.
    pub prev: Option<PageRef>,
    /// The next page, if any.
    pub next: Option<PageRef>,
    /// The last page.
    pub last: Option<PageRef>,
}

/// One page of posts plus its pagination metadata.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct PostsPage {
    /// The posts on this page.
    pub posts: Vec<PostSummary>,
    /// Links to the surrounding pages.
    pub links: PageLinks,
    /// Total number of posts across all pages.
    pub total_count: Option<i64>,
}

impl From<list_posts_query::ListPostsQueryPosts> for PostsPage {
    fn from(posts: list_posts_query::ListPostsQueryPosts) -> Self {
        let links = posts
            .links
            .map(|links| PageLinks {
                first: links.first.map(|link| PageRef {
                    page: link.page,
                    limit: link.limit,
                }),
                prev: links.prev.map(|link| PageRef {
                    page: link.page,
                    limit: link.limit,
                }),
                next: links.next.map(|link| PageRef {
                    page: link.page,
                    limit: link.limit,
                }),
                last: links.last.map(|link| PageRef {
                    page: link.page,
                    limit: link.limit,
                }),
            })
            .unwrap_or_default();
        PostsPage {
            posts: posts
                .data
                .unwrap_or_default()
                .into_iter()
                .flatten()
                .map(|post| PostSummary {
                    id: post.id,
                    title: post.title,
                })
                .collect(),
            links,
            total_count: posts.meta.and_then(|meta| meta.total_count),
        }
    }
}
