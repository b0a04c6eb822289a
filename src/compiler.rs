//! The pattern compiler: extends a router's decision graph so that a
//! given pattern expression is represented.
//!
//! Grammar:
//! ```text
//! pattern     = ['/'] segment ('/' segment)* ;
//! segment     = literal-seg | param-seg | wildcard-seg ;
//! literal-seg = identifier | integer | string ;
//! param-seg   = ':' identifier '(' type ('|' type)* ')' ;
//! type        = "integer" | "unsigned" | "real" | "number"
//!             | "boolean" | "string" ;
//! wildcard-seg= '*' ;
//! ```

use crate::node::{LiteralValue, Node, NodeId, ParameterSlot};
use crate::status::Status;
use crate::strings::StringPool;
use crate::token::{LexMode, Lexer, Token};
use crate::types::TypeMask;
use crate::Router;

/// Compile `pattern` starting at `start`, returning the node where the
/// pattern terminated (the caller's handle for attaching a handler) or the
/// first `Status` error encountered.
pub(crate) fn compile_pattern<O>(
    router: &mut Router<O>,
    start: NodeId<O>,
    pattern: &str,
) -> Result<NodeId<O>, Status> {
    let mut lexer = Lexer::new(pattern, LexMode::Pattern);
    if lexer.peek() == Token::PathSep {
        lexer.next();
    }

    let mut current = start;
    let mut arg_count = 0usize;

    loop {
        match lexer.peek() {
            Token::Eof => break,
            Token::Star => {
                lexer.next();
                if lexer.peek() != Token::Eof {
                    return Err(Status::ExpectedEof);
                }
                let terminal = router.nodes.alloc(Node::new());
                router.nodes.get_mut(current).wild = Some(terminal);
                current = terminal;
                break;
            }
            Token::Colon => {
                lexer.next();
                current = compile_parameter(router, current, &mut lexer)?;
                arg_count += 1;
                consume_segment_separator(&mut lexer)?;
            }
            Token::Identifier(_) | Token::Integer(_) | Token::String(_) => {
                let tok = lexer.next();
                current = compile_literal(&mut router.nodes, &mut router.strings, current, tok)?;
                consume_segment_separator(&mut lexer)?;
            }
            Token::Error(_) => return Err(Status::Syntax),
            _ => return Err(Status::Syntax),
        }
    }

    if arg_count > router.max_args {
        router.max_args = arg_count;
    }
    Ok(current)
}

fn consume_segment_separator(lexer: &mut Lexer<'_>) -> Result<(), Status> {
    match lexer.peek() {
        Token::PathSep => {
            lexer.next();
            Ok(())
        }
        Token::Eof => Ok(()),
        _ => Err(Status::ExpectedPathSeparator),
    }
}

fn compile_literal<O>(
    nodes: &mut crate::pool::Pool<Node<O>>,
    strings: &mut StringPool,
    current: NodeId<O>,
    token: Token,
) -> Result<NodeId<O>, Status> {
    let value = match token {
        Token::Identifier(s) | Token::String(s) => {
            let id = strings.insert_distinct(&s, |a, b| a.eq_ignore_ascii_case(b));
            LiteralValue::Str(id)
        }
        Token::Integer(n) => LiteralValue::Num(n),
        _ => return Err(Status::Syntax),
    };

    let existing = nodes
        .get(current)
        .literals
        .iter()
        .find(|l| l.value == value)
        .map(|l| l.forward);

    if let Some(next) = existing {
        return Ok(next);
    }

    let next = nodes.alloc(Node::new());
    nodes
        .get_mut(current)
        .literals
        .push(crate::node::Literal { value, forward: next });
    Ok(next)
}

fn compile_parameter<O>(
    router: &mut Router<O>,
    current: NodeId<O>,
    lexer: &mut Lexer<'_>,
) -> Result<NodeId<O>, Status> {
    let name = match lexer.next() {
        Token::Identifier(s) => s,
        _ => return Err(Status::ExpectedIdentifier),
    };
    if lexer.next() != Token::LeftParen {
        return Err(Status::Syntax);
    }

    let mut mask = TypeMask::NONE;
    loop {
        let type_name = match lexer.next() {
            Token::Identifier(s) => s,
            _ => return Err(Status::InvalidType),
        };
        let m = TypeMask::from_keyword(&type_name).ok_or(Status::InvalidType)?;
        mask = mask.union(m);
        match lexer.next() {
            Token::Pipe => continue,
            Token::RightParen => break,
            _ => return Err(Status::Syntax),
        }
    }

    let touches_string = mask.accepts_string();
    let touches_numeric = mask.accepts_integer() || mask.accepts_real();
    let touches_boolean = mask.accepts_boolean();
    if !(touches_string || touches_numeric || touches_boolean) {
        return Err(Status::InvalidType);
    }

    // A node has at most one slot per kind, so two patterns naming the same
    // parameter at the same position must agree on its mask even when they
    // touch different slot kinds (`:id(integer)` then `:id(string)` is just
    // as ambiguous as two patterns disagreeing within one kind).
    let mut forward: Option<NodeId<O>> = None;
    {
        let node = router.nodes.get(current);
        for slot in [&node.string_slot, &node.numeric_slot, &node.boolean_slot] {
            if let Some(slot) = slot {
                if slot.name != name {
                    continue;
                }
                if slot.mask != mask {
                    return Err(Status::AmbiguousParameter);
                }
                if forward.is_some_and(|f| f != slot.forward) {
                    return Err(Status::Internal);
                }
                forward = Some(slot.forward);
            }
        }
    }

    let forward = match forward {
        Some(f) => f,
        None => router.nodes.alloc(Node::new()),
    };

    let node = router.nodes.get_mut(current);
    if touches_string && node.string_slot.is_none() {
        node.string_slot = Some(ParameterSlot {
            name: name.clone(),
            mask,
            forward,
        });
    }
    if touches_numeric && node.numeric_slot.is_none() {
        node.numeric_slot = Some(ParameterSlot {
            name: name.clone(),
            mask,
            forward,
        });
    }
    if touches_boolean && node.boolean_slot.is_none() {
        node.boolean_slot = Some(ParameterSlot {
            name: name.clone(),
            mask,
            forward,
        });
    }

    Ok(forward)
}
