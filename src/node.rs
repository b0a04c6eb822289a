//! The central trie node and its edges: literals, typed parameter slots,
//! the wildcard terminal, and sub-router externals.

use crate::handler::Endpoint;
use crate::method::BINDABLE_METHODS;
use crate::pool::PoolIndex;
use crate::strings::StringId;
use crate::types::TypeMask;
use crate::Router;
use std::cell::RefCell;
use std::rc::Rc;

/// A stable handle to a [`Node`] allocated from a [`Router`]'s node pool.
pub type NodeId<O> = PoolIndex<Node<O>>;

/// A non-parameter URI segment: either an interned identifier or a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralValue {
    Str(StringId),
    Num(i64),
}

/// A literal edge: an exact-match segment with a forward pointer to the
/// node reached when it matches.
#[derive(Debug, Clone, Copy)]
pub struct Literal<O> {
    pub value: LiteralValue,
    pub forward: NodeId<O>,
}

/// A typed parameter edge: a name, a type mask, and a forward pointer.
/// Two patterns sharing prefix and parameter position share the same slot.
#[derive(Clone)]
pub struct ParameterSlot<O> {
    pub name: String,
    pub mask: TypeMask,
    pub forward: NodeId<O>,
}

/// A sub-router delegate, invoked when no local edge matches.
///
/// `Owned` is the common case (`NodeHandle::with`, moving a freshly-built
/// sub-router in); `Shared` lets one sub-router be mounted at more than one
/// point via a reference-counted handle.
pub enum External<O> {
    Owned(Box<Router<O>>),
    Shared(Rc<RefCell<Router<O>>>),
}

/// The fixed-size, per-method handler table carried by every node.
pub type HandlerTable<O> = [Option<Rc<Endpoint<O>>>; BINDABLE_METHODS.len()];

/// A point in the decision graph representing a specific path prefix.
pub struct Node<O> {
    /// Tried first, in insertion order.
    pub literals: Vec<Literal<O>>,
    pub string_slot: Option<ParameterSlot<O>>,
    pub numeric_slot: Option<ParameterSlot<O>>,
    pub boolean_slot: Option<ParameterSlot<O>>,
    /// The trailing `*` catch-all terminal, if any.
    pub wild: Option<NodeId<O>>,
    /// Sub-router delegates, tried in order after all local edges fail.
    pub externals: Vec<External<O>>,
    pub handlers: HandlerTable<O>,
    pub content_type_filter: Option<String>,
    pub ct_exclusive: bool,
    /// If set, reaching this node in `AcceptQuery` mode succeeds immediately.
    pub accept_terminal: bool,
}

impl<O> Node<O> {
    #[must_use]
    pub fn new() -> Self {
        Node {
            literals: Vec::new(),
            string_slot: None,
            numeric_slot: None,
            boolean_slot: None,
            wild: None,
            externals: Vec::new(),
            handlers: [None, None, None, None, None, None],
            content_type_filter: None,
            ct_exclusive: false,
            accept_terminal: false,
        }
    }

    #[must_use]
    pub fn handler(&self, method: crate::method::HttpMethod) -> Option<&Rc<Endpoint<O>>> {
        method.slot().and_then(|i| self.handlers[i].as_ref())
    }

    /// Bind `handler` at `method`. `Any` fills every currently-unbound slot
    /// without overwriting any that are already set.
    /// Returns `false` if a single, non-`Any` slot was already occupied by a
    /// *different* handler (the caller maps this to `Status::Duplicate`).
    pub fn attach(&mut self, method: crate::method::HttpMethod, handler: Rc<Endpoint<O>>) -> bool {
        match method.slot() {
            Some(i) => {
                if self.handlers[i].is_some() {
                    return false;
                }
                self.handlers[i] = Some(handler);
                true
            }
            None => {
                for i in 0..self.handlers.len() {
                    if self.handlers[i].is_none() {
                        self.handlers[i] = Some(handler.clone());
                    }
                }
                true
            }
        }
    }
}

impl<O> Default for Node<O> {
    fn default() -> Self {
        Self::new()
    }
}
