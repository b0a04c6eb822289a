//! The resolver: walks a compiled graph for one request, capturing
//! typed arguments and selecting a handler.

use crate::handler::Endpoint;
use crate::method::HttpMethod;
use crate::node::{LiteralValue, Node, NodeId};
use crate::status::Status;
use crate::strings::StringPool;
use crate::token::{LexMode, Lexer, Token};
use crate::types::{Argument, ArgumentList, Value};
use crate::Router;
use std::rc::Rc;

/// Which intent this walk serves: a real dispatch, or a "could this path be
/// handled here" probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolveMode {
    Resolve,
    AcceptQuery,
}

/// The result of one resolve walk: final status, whatever arguments were
/// captured before the walk concluded, and the selected handler if any.
pub(crate) struct Outcome<O> {
    pub status: Status,
    pub arguments: ArgumentList,
    pub handler: Option<Rc<Endpoint<O>>>,
}

pub(crate) fn resolve<O>(
    router: &Router<O>,
    method: HttpMethod,
    uri: &str,
    content_type: &str,
) -> Outcome<O> {
    run(router, method, uri, content_type, ResolveMode::Resolve)
}

pub(crate) fn query_accept<O>(
    router: &Router<O>,
    method: HttpMethod,
    uri: &str,
    content_type: &str,
) -> Status {
    run(router, method, uri, content_type, ResolveMode::AcceptQuery).status
}

fn run<O>(
    router: &Router<O>,
    method: HttpMethod,
    uri: &str,
    content_type: &str,
    mode: ResolveMode,
) -> Outcome<O> {
    let mut lexer = Lexer::new(uri, LexMode::Uri);
    let mut arguments = ArgumentList::with_capacity(router.max_args + 1);
    let (status, handler) = walk_from(
        router,
        router.root,
        &mut lexer,
        method,
        content_type,
        mode,
        &mut arguments,
    );
    Outcome {
        status,
        arguments,
        handler,
    }
}

/// The per-node matching order, as a loop that advances `node_id` for plain
/// literal/parameter transitions and recurses only to cross into an
/// external sub-router. Steps below follow the fixed priority: end of
/// input, content-type gate, path separator, literal edges, typed slots,
/// wildcard, externals, and finally no match. The content-type gate is
/// checked in code ahead of the end-of-input branch (a content-type filter
/// is always on the same node the handler is bound to, which is reached
/// with no path remaining) but still reports the same step-2 status.
fn walk_from<O>(
    router: &Router<O>,
    mut node_id: NodeId<O>,
    lexer: &mut Lexer<'_>,
    method: HttpMethod,
    content_type: &str,
    mode: ResolveMode,
    arguments: &mut ArgumentList,
) -> (Status, Option<Rc<Endpoint<O>>>) {
    loop {
        let node = router.nodes.get(node_id);

        if mode == ResolveMode::AcceptQuery && node.accept_terminal {
            return (Status::UriAccepted, None);
        }

        let pre_sep_remainder = lexer.remainder();
        let token = lexer.peek();

        // Step 2: exclusive content-type filter. Evaluated ahead of the Step
        // 1 Eof check below: a filter is always attached to the very node a
        // handler is bound to (`with_content_type(...).get(...)`), so by the
        // time that node is reached the path is already fully consumed.
        // Running this after the Eof branch returned would mean it never
        // fires for the one case it exists to cover.
        if let Some(filter) = &node.content_type_filter {
            if node.ct_exclusive && !filter.eq_ignore_ascii_case(content_type) {
                return (Status::UnsupportedContentType, None);
            }
        }

        // Step 1: end of input.
        if token == Token::Eof {
            return match mode {
                ResolveMode::AcceptQuery => (Status::UriAccepted, None),
                ResolveMode::Resolve => match node.handler(method) {
                    Some(h) => (Status::UriMatched, Some(h.clone())),
                    None => (Status::NoHandler, None),
                },
            };
        }

        // Step 3: consume the path separator between segments.
        if token != Token::PathSep {
            return (Status::ExpectedPathSeparator, None);
        }
        lexer.next();
        let post_sep_remainder = lexer.remainder();
        let segment = lexer.peek();

        // Step 4: literal edges, insertion order.
        if let Some(forward) = match_literal(node, &segment, &router.strings) {
            lexer.next();
            node_id = forward;
            continue;
        }

        // Step 5: typed parameter slots, numeric-then-boolean-then-string.
        match match_slot(node, &segment) {
            Ok(Some((name, value, forward))) => {
                lexer.next();
                arguments.push(Argument::new(name, value));
                node_id = forward;
                continue;
            }
            Err(status) => return (status, None),
            Ok(None) => {}
        }

        // Step 6: trailing wildcard, capturing the verbatim remainder.
        if let Some(wild) = node.wild {
            arguments.push(Argument::new("_url", Value::String(post_sep_remainder.to_string())));
            return match mode {
                ResolveMode::AcceptQuery => (Status::UriAccepted, None),
                ResolveMode::Resolve => {
                    let handler = router.nodes.get(wild).handler(method).cloned();
                    (Status::UriMatchedWildcard, handler)
                }
            };
        }

        // Step 7: sub-router delegates, first one to return a handler wins.
        if !node.externals.is_empty() {
            for external in &node.externals {
                let mut sub_lexer = Lexer::new(pre_sep_remainder, LexMode::Uri);
                let (status, handler) = match external {
                    crate::node::External::Owned(sub) => walk_from(
                        sub,
                        sub.root,
                        &mut sub_lexer,
                        method,
                        content_type,
                        mode,
                        arguments,
                    ),
                    crate::node::External::Shared(sub) => {
                        let guard = sub.borrow();
                        walk_from(
                            &guard,
                            guard.root,
                            &mut sub_lexer,
                            method,
                            content_type,
                            mode,
                            arguments,
                        )
                    }
                };
                if handler.is_some() || status != Status::NoEndpoint {
                    return (status, handler);
                }
            }
        }

        // Step 8: nothing matched.
        return (Status::NoEndpoint, None);
    }
}

fn match_literal<O>(node: &Node<O>, token: &Token, strings: &StringPool) -> Option<NodeId<O>> {
    for literal in &node.literals {
        let matches = match (&literal.value, token) {
            (LiteralValue::Num(n), Token::Integer(v)) => n == v,
            (LiteralValue::Str(id), Token::Identifier(s)) | (LiteralValue::Str(id), Token::String(s)) => {
                strings.get(*id).eq_ignore_ascii_case(s)
            }
            _ => false,
        };
        if matches {
            return Some(literal.forward);
        }
    }
    None
}

type SlotMatch<O> = Option<(String, Value, NodeId<O>)>;

/// Tries the numeric, then boolean, then string slot against `token`.
/// `Err` short-circuits the whole resolve with `InvalidParameterType` when
/// the token's kind matches a slot that exists but whose mask rejects the
/// specific value (e.g. a negative integer against an `unsigned` slot).
fn match_slot<O>(node: &Node<O>, token: &Token) -> Result<SlotMatch<O>, Status> {
    if let Some(slot) = &node.numeric_slot {
        match token {
            Token::Integer(n) => {
                if slot.mask.accepts_unsigned_only() && *n < 0 {
                    return Err(Status::InvalidParameterType);
                }
                let value = if slot.mask.accepts_unsigned_only() {
                    Value::Unsigned(*n as u64)
                } else if slot.mask.accepts_integer() {
                    Value::Integer(*n)
                } else if slot.mask.accepts_real() {
                    Value::Real(*n as f64)
                } else {
                    return Err(Status::InvalidParameterType);
                };
                return Ok(Some((slot.name.clone(), value, slot.forward)));
            }
            Token::Real(r) => {
                if !slot.mask.accepts_real() {
                    return Err(Status::InvalidParameterType);
                }
                return Ok(Some((slot.name.clone(), Value::Real(*r), slot.forward)));
            }
            _ => {}
        }
    }

    if let Some(slot) = &node.boolean_slot {
        if let Token::Bool(b) = token {
            return Ok(Some((slot.name.clone(), Value::Bool(*b), slot.forward)));
        }
    }

    if let Some(slot) = &node.string_slot {
        match token {
            Token::Identifier(s) | Token::String(s) => {
                return Ok(Some((slot.name.clone(), Value::String(s.clone()), slot.forward)));
            }
            _ => {}
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Endpoint;
    use crate::method::HttpMethod;

    fn router_with(pattern: &str, handler: Endpoint<i16>) -> Router<i16> {
        let mut router = Router::new();
        router.on(pattern).get(handler);
        router
    }

    #[test]
    fn literal_path_resolves_to_its_handler() {
        let router = router_with("/api/devices", Endpoint::zero_arg(|| 1));
        let outcome = resolve(&router, HttpMethod::Get, "/api/devices", "application/json");
        assert_eq!(outcome.status, Status::UriMatched);
        assert_eq!(outcome.handler.unwrap().call(&crate::handler::Request::new(HttpMethod::Get, "/api/devices")), 1);
    }

    #[test]
    fn missing_handler_for_method_is_no_handler() {
        let router = router_with("/api/devices", Endpoint::zero_arg(|| 1));
        let outcome = resolve(&router, HttpMethod::Post, "/api/devices", "application/json");
        assert_eq!(outcome.status, Status::NoHandler);
    }

    #[test]
    fn unknown_path_is_no_endpoint() {
        let router = router_with("/api/devices", Endpoint::zero_arg(|| 1));
        let outcome = resolve(&router, HttpMethod::Get, "/api/other", "application/json");
        assert_eq!(outcome.status, Status::NoEndpoint);
    }

    #[test]
    fn numeric_parameter_is_captured() {
        let router = router_with("/api/bus/:id(integer)", Endpoint::zero_arg(|| 1));
        let outcome = resolve(&router, HttpMethod::Get, "/api/bus/42", "application/json");
        assert_eq!(outcome.status, Status::UriMatched);
        assert_eq!(outcome.arguments.by_name("id").unwrap().value, Value::Integer(42));
    }

    #[test]
    fn negative_integer_against_unsigned_slot_is_invalid_parameter_type() {
        let router = router_with("/api/bus/:id(unsigned)", Endpoint::zero_arg(|| 1));
        let outcome = resolve(&router, HttpMethod::Get, "/api/bus/-1", "application/json");
        assert_eq!(outcome.status, Status::InvalidParameterType);
    }

    #[test]
    fn wildcard_captures_remainder_as_url() {
        let mut router = Router::new();
        router.on("/static/*").get(Endpoint::zero_arg(|| 1));
        let outcome = resolve(&router, HttpMethod::Get, "/static/css/site.css", "application/json");
        assert_eq!(outcome.status, Status::UriMatchedWildcard);
        assert_eq!(
            outcome.arguments.by_name("_url").unwrap().value,
            Value::String("css/site.css".to_string())
        );
    }

    #[test]
    fn exclusive_content_type_filter_rejects_mismatches() {
        let mut router = Router::new();
        router
            .on("/api/devices")
            .with_content_type("application/xml", true)
            .get(Endpoint::zero_arg(|| 1));
        let outcome = resolve(&router, HttpMethod::Get, "/api/devices", "application/json");
        assert_eq!(outcome.status, Status::UnsupportedContentType);
    }

    #[test]
    fn prefix_of_a_pattern_with_no_handler_is_no_handler() {
        let router = router_with("/api/devices", Endpoint::zero_arg(|| 1));
        let outcome = resolve(&router, HttpMethod::Get, "/api", "application/json");
        assert_eq!(outcome.status, Status::NoHandler);
    }

    #[test]
    fn external_sub_router_is_consulted_when_local_edges_fail() {
        let mut sub = Router::new();
        sub.on("/widgets").get(Endpoint::zero_arg(|| 7));
        let mut router: Router<i16> = Router::new();
        router.on("/api").with(sub);
        let outcome = resolve(&router, HttpMethod::Get, "/api/widgets", "application/json");
        assert_eq!(outcome.status, Status::UriMatched);
        assert_eq!(outcome.handler.unwrap().call(&crate::handler::Request::new(HttpMethod::Get, "/api/widgets")), 7);
    }

    #[test]
    fn query_accept_reaches_an_accept_terminal_without_a_handler() {
        let mut router: Router<i16> = Router::new();
        router.on("/api/devices").accept();
        let status = query_accept(&router, HttpMethod::Get, "/api/devices", "application/json");
        assert_eq!(status, Status::UriAccepted);
    }
}
