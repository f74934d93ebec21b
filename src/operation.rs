use graphql_client::GraphQLQuery;
use http::{HeaderMap, HeaderName, HeaderValue};
use quiver_graphql::{GraphQLRequest, OperationKind};

/// A prepared operation: a GraphQL request tagged as query or mutation, plus
/// headers attached to this operation only. Construction is pure; nothing is
/// validated or sent until the operation is handed to
/// [`GraphQlClient::execute`](crate::GraphQlClient::execute).
pub struct Operation<Q: GraphQLQuery> {
    request: GraphQLRequest<Q>,
    headers: HeaderMap,
}

impl<Q: GraphQLQuery> Operation<Q> {
    /// Prepares a query.
    pub fn query(variables: Q::Variables) -> Operation<Q> {
        Operation {
            request: GraphQLRequest::query(variables),
            headers: HeaderMap::new(),
        }
    }

    /// Prepares a mutation.
    pub fn mutation(variables: Q::Variables) -> Operation<Q> {
        Operation {
            request: GraphQLRequest::mutation(variables),
            headers: HeaderMap::new(),
        }
    }

    /// Attaches a single header to this operation.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Operation<Q> {
        self.headers.append(name, value);
        self
    }

    /// Attaches a map of headers to this operation.
    pub fn headers(mut self, headers: HeaderMap) -> Operation<Q> {
        self.headers.extend(headers);
        self
    }

    /// The tagged kind of this operation.
    pub fn kind(&self) -> OperationKind {
        self.request.kind()
    }

    pub(crate) fn into_parts(self) -> (GraphQLRequest<Q>, HeaderMap) {
        (self.request, self.headers)
    }
}
