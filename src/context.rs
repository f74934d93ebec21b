/// The execution context a client is constructed in. Injected explicitly so
/// both branches can be exercised deterministically instead of reading
/// ambient process state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ExecutionMode {
    /// The process serves many requests over its lifetime, e.g. a rendering
    /// server. Persisted-query negotiation is skipped here.
    LongLivedServer,
    /// Short-lived, per-request execution.
    #[default]
    PerRequest,
}

impl ExecutionMode {
    /// Whether this is the long-lived server context.
    pub const fn is_long_lived_server(&self) -> bool {
        matches!(self, ExecutionMode::LongLivedServer)
    }
}
