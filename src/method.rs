//! The HTTP method enum used throughout the router.

/// An HTTP method, plus `Any` for build-time "bind to every unbound slot".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// Build-time only: fills every currently-unbound method slot on a node.
    Any,
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

/// The six bindable (non-`Any`) methods, in the order a node's handler table iterates them.
pub const BINDABLE_METHODS: [HttpMethod; 6] = [
    HttpMethod::Get,
    HttpMethod::Post,
    HttpMethod::Put,
    HttpMethod::Patch,
    HttpMethod::Delete,
    HttpMethod::Options,
];

impl HttpMethod {
    /// Index into a node's fixed-size handler table, or `None` for `Any`
    /// (which is never stored, only expanded at attach time).
    #[must_use]
    pub fn slot(self) -> Option<usize> {
        match self {
            HttpMethod::Get => Some(0),
            HttpMethod::Post => Some(1),
            HttpMethod::Put => Some(2),
            HttpMethod::Patch => Some(3),
            HttpMethod::Delete => Some(4),
            HttpMethod::Options => Some(5),
            HttpMethod::Any => None,
        }
    }
}
