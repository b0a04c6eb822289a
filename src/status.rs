//! The complete observable status surface of the router.
//!
//! Every outcome (compile-time pattern error, resolve-time miss, or
//! internal invariant violation) is one of these variants. The core never
//! panics and never returns a `Result`; `Status` is always handed back as
//! plain data (see [`crate::Request`] and [`crate::NodeHandle`]).

use thiserror::Error;

/// A routing outcome, positive on success and negative on failure.
///
/// Positive codes are successes (`+1`..`+3`); negative codes are failures,
/// grouped roughly by how far they are from the wire (4xx-ish pattern and
/// content errors first, then parser-internal failures).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The full path matched a node with a handler bound for the request method.
    #[error("uri matched")]
    UriMatched,
    /// The full path matched via a trailing `*` wildcard segment.
    #[error("uri matched wildcard")]
    UriMatchedWildcard,
    /// An `accept()` terminal was reached while querying acceptance.
    #[error("uri accepted")]
    UriAccepted,

    /// The node matched but has no handler bound for the request method.
    #[error("no handler bound for method")]
    NoHandler,
    /// No node in the graph matches the requested path.
    #[error("no endpoint matches this uri")]
    NoEndpoint,
    /// A node's exclusive content-type filter rejected the request.
    #[error("unsupported content type")]
    UnsupportedContentType,
    /// The same (pattern, method) pair was already bound to a different handler.
    #[error("duplicate handler binding")]
    Duplicate,
    /// A captured token's kind was incompatible with the parameter's type mask.
    #[error("invalid parameter type")]
    InvalidParameterType,
    /// A parameter was declared but no value could be captured for it.
    #[error("missing parameter")]
    MissingParameter,
    /// Two patterns disagree about the type mask of the same-position parameter.
    #[error("ambiguous parameter type")]
    AmbiguousParameter,
    /// A `/` was expected between segments but not found.
    #[error("expected path separator")]
    ExpectedPathSeparator,
    /// Trailing input remained where end-of-pattern was expected.
    #[error("expected end of pattern")]
    ExpectedEof,
    /// A type name in a `:name(type|type)` parameter segment was not recognized.
    #[error("invalid parameter type name")]
    InvalidType,
    /// A generic pattern grammar violation.
    #[error("syntax error in pattern")]
    Syntax,
    /// An invariant internal to the router was violated; indicates a bug.
    #[error("internal router error")]
    Internal,
    /// A quoted string literal in a pattern was malformed.
    #[error("malformed string literal")]
    BadString,
    /// Resolution was attempted against a router with no root node.
    #[error("null root node")]
    NullRoot,
    /// An identifier was expected but not found.
    #[error("expected identifier")]
    ExpectedIdentifier,
    /// A string literal was expected but not found.
    #[error("expected string")]
    ExpectedString,
}

impl Status {
    /// True for the three success variants.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(
            self,
            Status::UriMatched | Status::UriMatchedWildcard | Status::UriAccepted
        )
    }

    /// The recommended HTTP status code an embedding bridge should send for this outcome.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Status::UriMatched | Status::UriMatchedWildcard | Status::UriAccepted => 200,
            Status::NoEndpoint | Status::NoHandler => 404,
            Status::InvalidParameterType | Status::MissingParameter => 400,
            Status::UnsupportedContentType => 415,
            _ => 500,
        }
    }

    /// The signed numeric code for this status, kept around because a
    /// handful of tests pin exact values against the documented taxonomy.
    #[must_use]
    pub const fn code(self) -> i16 {
        match self {
            Status::UriMatched => 1,
            Status::UriMatchedWildcard => 2,
            Status::UriAccepted => 3,
            Status::NoHandler => -403,
            Status::NoEndpoint => -404,
            Status::UnsupportedContentType => -405,
            Status::Duplicate => -406,
            Status::InvalidParameterType => -501,
            Status::MissingParameter => -502,
            Status::AmbiguousParameter => -503,
            Status::ExpectedPathSeparator => -504,
            Status::ExpectedEof => -505,
            Status::InvalidType => -506,
            Status::Syntax => -507,
            Status::Internal => -508,
            Status::BadString => -509,
            Status::NullRoot => -510,
            Status::ExpectedIdentifier => -511,
            Status::ExpectedString => -512,
        }
    }
}
