//! Rendering message chains back to source text.
//!
//! Chains are the only program representation there is, so rendering is
//! the inverse of parsing: the literal constructor idioms turn back into
//! literals, terminators into statement breaks, and everything else into
//! `name(arguments)`. Two registers exist. Compact code is one line per
//! statement and is what stack traces and `Debug`-ish output want.
//! Formatted code re-derives line layout from the recorded source
//! locations of arguments.

use murmur_ir::{Arg, MsgArena, MsgId, Value};

/// Compact code for a whole chain.
pub fn code(arena: &MsgArena, head: MsgId) -> String {
    let mut out = String::new();
    let mut cursor = Some(head);
    while let Some(id) = cursor {
        current_code(arena, id, &mut out);
        let next = arena.next(id);
        // Terminators render their own break; no space after them.
        if next.is_some() && !arena.node(id).is_terminator {
            out.push(' ');
        }
        cursor = next;
    }
    out
}

/// Compact code for a single node, ignoring its `next`.
pub fn this_code(arena: &MsgArena, id: MsgId) -> String {
    let mut out = String::new();
    current_code(arena, id, &mut out);
    out
}

/// Formatted code for a whole chain at the given indent.
pub fn formatted_code(arena: &MsgArena, head: MsgId, indent: usize) -> String {
    let mut out = String::new();
    let mut cursor = Some(head);
    while let Some(id) = cursor {
        current_formatted_code(arena, id, indent, &mut out);
        let next = arena.next(id);
        if next.is_some() && !arena.node(id).is_terminator {
            out.push(' ');
        }
        cursor = next;
    }
    out
}

/// One stack trace line for the node: the compact code of its statement
/// so far, padded to a fixed column, then `[file:line:position]`.
///
/// The statement starts at the first node on the same line reachable
/// through `prev` links.
pub fn stack_trace_text(arena: &MsgArena, id: MsgId) -> String {
    let loc = arena.node(id).loc;
    let mut start = id;
    while let Some(prev) = arena.prev(start) {
        if arena.node(prev).loc.line != loc.line {
            break;
        }
        start = prev;
    }
    let s1 = code(arena, start);
    let cut = match s1.find('\n') {
        None | Some(0) => s1.as_str(),
        // The character before the break is dropped along with it.
        Some(ix) => s1.get(..ix - 1).unwrap_or(&s1[..ix]),
    };
    let file = arena.text(loc.file);
    format!(" {:<48} [{}:{}:{}]", cut, file, loc.line, loc.position)
}

/// The raw text argument of a literal constructor, when it looks like
/// one.
fn text_arg(arena: &MsgArena, id: MsgId, index: usize) -> Option<String> {
    match arena.node(id).arguments.get(index) {
        Some(Arg::Value(Value::Text(raw))) => Some(raw.to_string()),
        _ => None,
    }
}

/// A cached or pre-evaluated value, rendered for embedding in code.
/// Quoted code renders as the code itself.
fn render_value(arena: &MsgArena, value: &Value) -> String {
    match value {
        Value::Message(id) => code(arena, *id),
        other => other.render(arena.interner()),
    }
}

fn current_code(arena: &MsgArena, id: MsgId, out: &mut String) {
    let node = arena.node(id);
    let name = arena.name_text(id);
    match name {
        "internal:createText" => {
            if let Some(raw) = text_arg(arena, id, 0) {
                out.push('"');
                out.push_str(&raw);
                out.push('"');
                return;
            }
        }
        "internal:createRegexp" => {
            if let (Some(pattern), Some(flags)) =
                (text_arg(arena, id, 0), text_arg(arena, id, 1))
            {
                out.push_str("#/");
                out.push_str(&pattern);
                out.push('/');
                out.push_str(&flags);
                return;
            }
        }
        "internal:createNumber" | "internal:createDecimal" => {
            if let Some(raw) = text_arg(arena, id, 0) {
                out.push_str(&raw);
                return;
            }
        }
        "cachedResult" => {
            if let Some(cached) = &node.cached {
                out.push_str(&render_value(arena, cached));
                return;
            }
        }
        _ => {}
    }
    if node.is_terminator {
        out.push_str(".\n");
        return;
    }
    generic_code(arena, id, out);
}

/// `name(arg, arg)`; parentheses appear for anonymous messages even with
/// no arguments, so `()` survives a round trip.
fn generic_code(arena: &MsgArena, id: MsgId, out: &mut String) {
    let node = arena.node(id);
    let name = arena.name_text(id);
    out.push_str(name);
    if node.arguments.is_empty() && !name.is_empty() {
        return;
    }
    out.push('(');
    for (i, arg) in node.arguments.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        match arg {
            Arg::Value(value) => out.push_str(&render_value(arena, value)),
            Arg::Message(head) => out.push_str(&code(arena, *head)),
        }
    }
    out.push(')');
}

fn current_formatted_code(arena: &MsgArena, id: MsgId, indent: usize, out: &mut String) {
    let node = arena.node(id);
    let name = arena.name_text(id);
    match name {
        "internal:createText" => {
            if let Some(raw) = text_arg(arena, id, 0) {
                out.push('"');
                out.push_str(&raw);
                out.push('"');
                return;
            }
        }
        "internal:concatenateText" => {
            out.push('"');
            for arg in &node.arguments {
                match arg {
                    Arg::Message(piece) => {
                        if let Some(raw) = literal_text_piece(arena, *piece) {
                            out.push_str(&raw);
                        } else {
                            out.push_str("#{");
                            out.push_str(&formatted_code(arena, *piece, 0));
                            out.push('}');
                        }
                    }
                    Arg::Value(value) => out.push_str(&render_value(arena, value)),
                }
            }
            out.push('"');
            return;
        }
        "internal:createRegexp" => {
            if let (Some(pattern), Some(flags)) =
                (text_arg(arena, id, 0), text_arg(arena, id, 1))
            {
                out.push_str("#/");
                out.push_str(&pattern);
                out.push('/');
                out.push_str(&flags);
                return;
            }
        }
        "internal:createNumber" | "internal:createDecimal" => {
            if let Some(raw) = text_arg(arena, id, 0) {
                out.push_str(&raw);
                return;
            }
        }
        "cachedResult" => {
            if let Some(cached) = &node.cached {
                out.push_str(&render_value(arena, cached));
                return;
            }
        }
        "=" => {
            if node.arguments.len() == 2 {
                match &node.arguments[0] {
                    Arg::Message(target) => out.push_str(&code(arena, *target)),
                    Arg::Value(value) => out.push_str(&render_value(arena, value)),
                }
                out.push_str(" = ");
                match &node.arguments[1] {
                    Arg::Message(rhs) => {
                        out.push_str(&formatted_code(arena, *rhs, indent + 2));
                    }
                    Arg::Value(value) => out.push_str(&render_value(arena, value)),
                }
                return;
            }
        }
        _ => {}
    }
    if node.is_terminator {
        out.push('\n');
        for _ in 0..indent {
            out.push(' ');
        }
        return;
    }

    out.push_str(name);
    if node.arguments.is_empty() && !name.is_empty() {
        return;
    }
    // Arguments that came from a different source line go back onto
    // their own line; the cursor chases the recorded locations.
    let mut the_line = node.loc.line;
    out.push('(');
    for (i, arg) in node.arguments.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        match arg {
            Arg::Value(value) => out.push_str(&render_value(arena, value)),
            Arg::Message(head) => {
                let arg_line = arena.node(*head).loc.line;
                if arg_line != the_line {
                    the_line = arg_line;
                    out.push('\n');
                    for _ in 0..(indent + 2) {
                        out.push(' ');
                    }
                }
                out.push_str(&formatted_code(arena, *head, indent + 2));
            }
        }
    }
    out.push(')');
}

/// A plain `internal:createText` piece inside an interpolation renders
/// as its raw text, without quotes.
fn literal_text_piece(arena: &MsgArena, id: MsgId) -> Option<String> {
    if arena.name_text(id) == "internal:createText" && arena.next(id).is_none() {
        text_arg(arena, id, 0)
    } else {
        None
    }
}
