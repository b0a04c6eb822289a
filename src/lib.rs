//! viaduct is a parsimonious, framework and IO agnostic URI routing core.
//!
//! viaduct is opinionated about being simple with a focus on bounded
//! allocation and typed path parameters.
//!
//! ## Simple
//!
//! There is one build-time DSL (`on(pattern).GET(handler)`) and two
//! resolve-time entry points (`resolve`, `query_accept`). There is no IO
//! component and no framework-specific coupling point; a handler is a
//! closure, not a trait object tied to any particular runtime.
//!
//! ## Bounded
//!
//! Every node, literal edge, and parameter slot lives in a page-backed
//! [`Pool`](pool::Pool) that is never freed piecemeal — the router owns its
//! whole graph and releases it in one shot when dropped. Literal segment
//! text is deduplicated through a per-router [`strings::StringPool`].
//!
//! ## Typed
//!
//! Path parameters declare the value kinds they accept (`:id(integer)`,
//! `:name(string)`, `:ratio(real|integer)`) instead of leaving capture
//! groups untyped. A handler reads `ArgumentList` entries by name or by
//! position; the resolver has already done the coercion and rejected
//! anything that doesn't fit.
//!
//! viaduct compiles patterns into a trie-like decision graph up front, then
//! walks that graph once per request — no regex compilation or
//! backtracking happens on the request path.

mod compiler;
mod node;
mod pool;
mod resolver;
mod strings;
mod token;

pub mod handler;
pub mod method;
pub mod status;
pub mod types;

pub use handler::{Endpoint, Request};
pub use method::HttpMethod;
pub use pool::PoolInfo;
pub use status::Status;
pub use types::{Argument, ArgumentList, Opaque, TypeMask, Value};

use node::{External, Node, NodeId};
use pool::Pool;
use std::cell::RefCell;
use std::rc::Rc;
use strings::StringPool;

/// A compiled routing graph: patterns in, typed-argument dispatch out.
///
/// Generic over the handler return type `O`, defaulting to `i16` to match
/// a status-code-as-return-value convention typical of this kind of
/// handler.
///
/// Build phase (`on`, the `NodeHandle` chain) requires `&mut Router`;
/// resolve phase (`resolve`, `query_accept`) requires only `&Router`. The
/// borrow checker, not a runtime flag, is what keeps the two phases from
/// interleaving.
pub struct Router<O = i16> {
    nodes: Pool<Node<O>>,
    strings: StringPool,
    root: NodeId<O>,
    max_args: usize,
}

impl<O> Router<O> {
    /// A fresh router with a single, empty root node.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = Pool::new();
        let root = nodes.alloc(Node::new());
        Router {
            nodes,
            strings: StringPool::new(),
            root,
            max_args: 0,
        }
    }

    pub(crate) fn root_id(&self) -> NodeId<O> {
        self.root
    }

    /// Extend the graph with `pattern`, returning a builder handle for
    /// attaching handlers and node options. Compile failures are carried on
    /// the handle, not returned directly — see [`NodeHandle::error`].
    pub fn on(&mut self, pattern: &str) -> NodeHandle<'_, O> {
        match compiler::compile_pattern(self, self.root, pattern) {
            Ok(node) => NodeHandle {
                router: self,
                node,
                error: None,
            },
            Err(status) => {
                let root = self.root;
                NodeHandle {
                    router: self,
                    node: root,
                    error: Some(status),
                }
            }
        }
    }

    /// Resolve `uri` for `method` against content type `application/json`.
    #[must_use]
    pub fn resolve(&self, method: HttpMethod, uri: &str) -> Request<O> {
        self.resolve_with_content_type(method, uri, "application/json")
    }

    /// Resolve `uri` for `method`, honoring any exclusive content-type
    /// filters against the supplied `content_type`.
    #[must_use]
    pub fn resolve_with_content_type(
        &self,
        method: HttpMethod,
        uri: &str,
        content_type: &str,
    ) -> Request<O> {
        let outcome = resolver::resolve(self, method, uri, content_type);
        let mut request = Request::new(method, uri);
        request.content_type = content_type.to_string();
        request.status = outcome.status;
        request.arguments = outcome.arguments;
        request.handler = outcome.handler;
        request
    }

    /// Ask whether `uri` could be handled here, without requiring a bound
    /// handler at the terminal node.
    #[must_use]
    pub fn query_accept(&self, method: HttpMethod, uri: &str) -> Status {
        self.query_accept_with_content_type(method, uri, "application/json")
    }

    #[must_use]
    pub fn query_accept_with_content_type(
        &self,
        method: HttpMethod,
        uri: &str,
        content_type: &str,
    ) -> Status {
        resolver::query_accept(self, method, uri, content_type)
    }

    /// A snapshot of the node arena's allocation.
    #[must_use]
    pub fn pool_info(&self) -> PoolInfo {
        self.nodes.info()
    }

    /// Number of distinct interned literal strings.
    #[must_use]
    pub fn interned_string_count(&self) -> usize {
        self.strings.len()
    }

    /// The largest number of typed parameters any single compiled pattern
    /// declares; the size an `ArgumentList` is pre-sized to on resolve.
    #[must_use]
    pub fn max_args(&self) -> usize {
        self.max_args
    }
}

impl<O> Default for Router<O> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sticky-error builder returned by [`Router::on`].
///
/// Once a compile error occurs (either from `on` itself or from a later
/// chained call such as a duplicate handler binding), every subsequent
/// chained call becomes a no-op that preserves the first error. This keeps
/// a builder block reporting only its first failure instead of cascading.
pub struct NodeHandle<'a, O> {
    router: &'a mut Router<O>,
    node: NodeId<O>,
    error: Option<Status>,
}

impl<'a, O> NodeHandle<'a, O> {
    fn attach(mut self, method: HttpMethod, handler: Endpoint<O>) -> Self {
        if self.error.is_none() {
            let ok = self
                .router
                .nodes
                .get_mut(self.node)
                .attach(method, Rc::new(handler));
            if !ok {
                self.error = Some(Status::Duplicate);
            }
        }
        self
    }

    /// Bind `handler` to `GET` at the current node.
    #[must_use]
    pub fn get(self, handler: Endpoint<O>) -> Self {
        self.attach(HttpMethod::Get, handler)
    }

    /// Bind `handler` to `POST` at the current node.
    #[must_use]
    pub fn post(self, handler: Endpoint<O>) -> Self {
        self.attach(HttpMethod::Post, handler)
    }

    /// Bind `handler` to `PUT` at the current node.
    #[must_use]
    pub fn put(self, handler: Endpoint<O>) -> Self {
        self.attach(HttpMethod::Put, handler)
    }

    /// Bind `handler` to `PATCH` at the current node.
    #[must_use]
    pub fn patch(self, handler: Endpoint<O>) -> Self {
        self.attach(HttpMethod::Patch, handler)
    }

    /// Bind `handler` to `DELETE` at the current node.
    #[must_use]
    pub fn delete(self, handler: Endpoint<O>) -> Self {
        self.attach(HttpMethod::Delete, handler)
    }

    /// Bind `handler` to `OPTIONS` at the current node.
    #[must_use]
    pub fn options(self, handler: Endpoint<O>) -> Self {
        self.attach(HttpMethod::Options, handler)
    }

    /// Bind `handler` to every currently-unbound method slot.
    #[must_use]
    pub fn any(self, handler: Endpoint<O>) -> Self {
        self.attach(HttpMethod::Any, handler)
    }

    /// Register an owned sub-router as a delegate at this node, consulted
    /// when no local edge matches.
    #[must_use]
    pub fn with(mut self, sub: Router<O>) -> Self {
        if self.error.is_none() {
            self.router
                .nodes
                .get_mut(self.node)
                .externals
                .push(External::Owned(Box::new(sub)));
        }
        self
    }

    /// Register a shared sub-router delegate, letting one sub-router be
    /// mounted at more than one point via a reference-counted handle.
    #[must_use]
    pub fn with_shared(mut self, sub: Rc<RefCell<Router<O>>>) -> Self {
        if self.error.is_none() {
            self.router
                .nodes
                .get_mut(self.node)
                .externals
                .push(External::Shared(sub));
        }
        self
    }

    /// Mark this node as an acceptance terminal: `query_accept` succeeds
    /// here even if more path remains unconsumed.
    #[must_use]
    pub fn accept(mut self) -> Self {
        if self.error.is_none() {
            self.router.nodes.get_mut(self.node).accept_terminal = true;
        }
        self
    }

    /// Restrict (optionally exclusively) this node's requests to a content type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>, exclusive: bool) -> Self {
        if self.error.is_none() {
            let node = self.router.nodes.get_mut(self.node);
            node.content_type_filter = Some(content_type.into());
            node.ct_exclusive = exclusive;
        }
        self
    }

    /// The sticky error, if any chained call so far has failed.
    #[must_use]
    pub fn error(&self) -> Option<Status> {
        self.error
    }

    /// If a sticky error is set, invoke `f` with it exactly once and clear it.
    #[must_use]
    pub fn inspect_err(mut self, f: impl FnOnce(Status)) -> Self {
        if let Some(status) = self.error.take() {
            f(status);
        }
        self
    }
}
