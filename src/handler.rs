//! The handler call surface and the request/response boundary object.
//!
//! A handler can take one of three calling conventions, so [`Endpoint<O>`]
//! is a tagged enum over all three rather than a generic trait object.
//! Dispatch is a three-way match at call time, not a combinatorial set of
//! trait instantiations.

use crate::status::Status;
use crate::types::ArgumentList;
use std::rc::Rc;

/// A bound handler, in one of three calling conventions.
///
/// Every endpoint a pattern attaches a handler to is stored as one of
/// these; dispatch is a three-way match, not three different generic
/// instantiations of a handler trait.
pub enum Endpoint<O = i16> {
    /// Ignores the request entirely.
    ZeroArg(Box<dyn Fn() -> O>),
    /// Wants the full request (method, uri, content-type, already-captured arguments).
    WithRequest(Box<dyn Fn(&Request<O>) -> O>),
    /// Wants the request plus direct access to the captured argument list
    /// (useful when a handler wants to avoid re-borrowing through `Request`).
    WithParserContext(Box<dyn Fn(&Request<O>, &ArgumentList) -> O>),
}

impl<O> Endpoint<O> {
    #[must_use]
    pub fn zero_arg(f: impl Fn() -> O + 'static) -> Self {
        Endpoint::ZeroArg(Box::new(f))
    }

    #[must_use]
    pub fn with_request(f: impl Fn(&Request<O>) -> O + 'static) -> Self {
        Endpoint::WithRequest(Box::new(f))
    }

    #[must_use]
    pub fn with_parser_context(f: impl Fn(&Request<O>, &ArgumentList) -> O + 'static) -> Self {
        Endpoint::WithParserContext(Box::new(f))
    }

    /// Invoke this endpoint against a resolved request.
    pub fn call(&self, request: &Request<O>) -> O {
        match self {
            Endpoint::ZeroArg(f) => f(),
            Endpoint::WithRequest(f) => f(request),
            Endpoint::WithParserContext(f) => f(request, &request.arguments),
        }
    }
}

/// The boundary object between the router and a handler.
///
/// Aggregates `(method, uri, content_type, status, arguments, handler)`.
/// Its truthiness (`is_matched`) is `status == UriMatched &&
/// handler.is_some()`.
pub struct Request<O = i16> {
    pub method: crate::method::HttpMethod,
    pub uri: String,
    pub content_type: String,
    pub status: Status,
    pub arguments: ArgumentList,
    pub handler: Option<Rc<Endpoint<O>>>,
}

impl<O> Request<O> {
    #[must_use]
    pub fn new(method: crate::method::HttpMethod, uri: impl Into<String>) -> Self {
        Request {
            method,
            uri: uri.into(),
            content_type: "application/json".to_string(),
            status: Status::NoEndpoint,
            arguments: ArgumentList::new(),
            handler: None,
        }
    }

    /// `status == UriMatched && handler.is_some()`.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        matches!(self.status, Status::UriMatched) && self.handler.is_some()
    }

    /// Invoke the bound handler, if any.
    pub fn call(&self) -> Option<O> {
        self.handler.clone().map(|h| h.call(self))
    }
}
