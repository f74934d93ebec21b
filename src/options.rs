use buildstructor::buildstructor;
use derive_getters::Getters;

/// Recognized per-client request options.
#[derive(Clone, Debug, Default, Getters)]
pub struct RequestOptions {
    /// Reserved identifier, threaded through but not read anywhere yet.
    cache_key: Option<String>,
    /// Enables the automatic-persisted-query stage of the transport chain.
    automatic_persisted_queries: bool,
    /// Sends hashed persisted-query attempts as GET instead of POST.
    get_automatic_persisted_queries: bool,
}

#[buildstructor]
impl RequestOptions {
    /// Constructs a new [`RequestOptions`]; every field defaults to off.
    #[builder]
    pub fn new(
        cache_key: Option<String>,
        automatic_persisted_queries: Option<bool>,
        get_automatic_persisted_queries: Option<bool>,
    ) -> RequestOptions {
        RequestOptions {
            cache_key,
            automatic_persisted_queries: automatic_persisted_queries.unwrap_or_default(),
            get_automatic_persisted_queries: get_automatic_persisted_queries.unwrap_or_default(),
        }
    }
}
