//! Parser for Murmur: token stream to flat message chains.
//!
//! The parser knows nothing about operators; `2 + 3 * 4` comes out as
//! five sibling nodes and is reshaped afterwards by `murmur_shuffle`.
//! Literals do not become values here either: each literal token turns
//! into a call to its constructor message (`internal:createNumber` and
//! friends) carrying the raw source text, so that code-as-data
//! manipulation and rendering see exactly what was written.

use murmur_ir::{
    Arg, LineIndex, Message, MsgArena, MsgId, Name, SourceLoc, Token, TokenKind, TokenList, Value,
};
use thiserror::Error;
use tracing::debug;

/// Errors produced while building chains from tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected `)` at offset {0}")]
    UnexpectedRParen(u32),
    #[error("unexpected `,` outside argument list at offset {0}")]
    UnexpectedComma(u32),
    #[error("unclosed `(` opened at offset {0}")]
    UnclosedParen(u32),
    #[error("unrecognized input at offset {0}")]
    UnrecognizedInput(u32),
}

/// Parse source text into a chain. `Ok(None)` means the source contained
/// no nodes at all (empty or only comments and blank lines).
pub fn parse(arena: &mut MsgArena, source: &str, file: &str) -> Result<Option<MsgId>, ParseError> {
    let file = arena.intern(file);
    let tokens = murmur_lexer::lex(source, arena.interner());
    debug!(tokens = tokens.len(), "parsing source");
    let mut parser = Parser {
        tokens,
        pos: 0,
        line_index: LineIndex::new(source),
        file,
    };
    parser.parse_chain(arena, false)
}

/// Parse and shuffle in one step.
///
/// This is the canonical text-to-chain entry point. Empty input yields a
/// lone terminator node at line 0, so callers always get a chain to hang
/// onto. The returned id is the shuffled head; it may differ from the
/// parsed head when the statement starts with an assignment target.
pub fn from_text(arena: &mut MsgArena, source: &str, file: &str) -> Result<MsgId, ParseError> {
    match parse(arena, source, file)? {
        Some(head) => Ok(murmur_shuffle::shuffle_operators(arena, head)),
        None => {
            let file = arena.intern(file);
            let dot = arena.intern(".");
            let node = Message::terminator(dot, SourceLoc::synthetic(file));
            Ok(arena.alloc(node))
        }
    }
}

struct Parser {
    tokens: TokenList,
    pos: usize,
    line_index: LineIndex,
    file: Name,
}

impl Parser {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn loc_at(&self, token: Token) -> SourceLoc {
        let (line, position) = self.line_index.line_col(token.span.start);
        SourceLoc::new(self.file, line, position)
    }

    /// Parse one chain. In group position (inside parentheses) the chain
    /// ends at `,` or `)` without consuming it; at top level those are
    /// errors.
    fn parse_chain(
        &mut self,
        arena: &mut MsgArena,
        in_group: bool,
    ) -> Result<Option<MsgId>, ParseError> {
        let mut head: Option<MsgId> = None;
        let mut tail: Option<MsgId> = None;
        // Leading and doubled terminators collapse away.
        let mut after_terminator = true;

        while let Some(token) = self.peek() {
            let node = match token.kind {
                TokenKind::RParen | TokenKind::Comma if in_group => break,
                TokenKind::RParen => return Err(ParseError::UnexpectedRParen(token.span.start)),
                TokenKind::Comma => return Err(ParseError::UnexpectedComma(token.span.start)),
                TokenKind::Error => {
                    return Err(ParseError::UnrecognizedInput(token.span.start));
                }
                TokenKind::Newline | TokenKind::Terminator => {
                    self.advance();
                    if after_terminator {
                        continue;
                    }
                    after_terminator = true;
                    let dot = arena.intern(".");
                    arena.alloc(Message::terminator(dot, self.loc_at(token)))
                }
                TokenKind::Ident(name) => {
                    self.advance();
                    after_terminator = false;
                    let id = arena.alloc(Message::new(name, self.loc_at(token)));
                    self.maybe_parse_arguments(arena, id, token)?;
                    id
                }
                TokenKind::LParen => {
                    // A bare group is an anonymous message.
                    self.advance();
                    after_terminator = false;
                    let id = arena.alloc(Message::new(Name::EMPTY, self.loc_at(token)));
                    self.parse_arguments(arena, id, token.span.start)?;
                    id
                }
                TokenKind::Number(raw) => {
                    self.advance();
                    after_terminator = false;
                    self.literal(arena, "internal:createNumber", raw, token)
                }
                TokenKind::Decimal(raw) => {
                    self.advance();
                    after_terminator = false;
                    self.literal(arena, "internal:createDecimal", raw, token)
                }
                TokenKind::Str(raw) => {
                    self.advance();
                    after_terminator = false;
                    self.text_literal(arena, raw, token)?
                }
                TokenKind::Regex { pattern, flags } => {
                    self.advance();
                    after_terminator = false;
                    let name = arena.intern("internal:createRegexp");
                    let mut node = Message::new(name, self.loc_at(token));
                    node.arguments
                        .push(Arg::Value(Value::text(arena.text(pattern))));
                    node.arguments
                        .push(Arg::Value(Value::text(arena.text(flags))));
                    arena.alloc(node)
                }
            };

            match tail {
                Some(t) => arena.link(t, node),
                None => head = Some(node),
            }
            tail = Some(node);
        }
        Ok(head)
    }

    /// A `(` opens an argument list only when it hugs the name; with a
    /// space in between it is a separate anonymous message.
    fn maybe_parse_arguments(
        &mut self,
        arena: &mut MsgArena,
        node: MsgId,
        name_token: Token,
    ) -> Result<(), ParseError> {
        if let Some(next) = self.peek() {
            if next.kind == TokenKind::LParen && next.span.start == name_token.span.end {
                self.advance();
                self.parse_arguments(arena, node, next.span.start)?;
            }
        }
        Ok(())
    }

    /// Parse a comma-separated argument list up to the closing `)`.
    fn parse_arguments(
        &mut self,
        arena: &mut MsgArena,
        node: MsgId,
        open_offset: u32,
    ) -> Result<(), ParseError> {
        loop {
            if let Some(arg_head) = self.parse_chain(arena, true)? {
                arena.append_argument(node, Arg::Message(arg_head));
            }
            match self.peek() {
                Some(token) if token.kind == TokenKind::Comma => self.advance(),
                Some(token) if token.kind == TokenKind::RParen => {
                    self.advance();
                    return Ok(());
                }
                _ => return Err(ParseError::UnclosedParen(open_offset)),
            }
        }
    }

    /// A literal constructor node carrying the raw source text.
    fn literal(&self, arena: &mut MsgArena, constructor: &str, raw: Name, token: Token) -> MsgId {
        let name = arena.intern(constructor);
        let text = Value::text(arena.text(raw));
        arena.alloc(Message::with_arg(name, Arg::Value(text), self.loc_at(token)))
    }

    /// Text literals: plain ones become `internal:createText`; ones with
    /// `#{...}` interpolations become `internal:concatenateText` over
    /// alternating raw pieces and parsed fragments.
    fn text_literal(
        &mut self,
        arena: &mut MsgArena,
        raw: Name,
        token: Token,
    ) -> Result<MsgId, ParseError> {
        let content = arena.text(raw);
        if !content.contains("#{") {
            return Ok(self.literal(arena, "internal:createText", raw, token));
        }

        let loc = self.loc_at(token);
        let name = arena.intern("internal:concatenateText");
        let node = arena.alloc(Message::new(name, loc));

        let mut rest = content;
        while let Some(start) = rest.find("#{") {
            let (literal_part, tail) = rest.split_at(start);
            if !literal_part.is_empty() {
                let child = self.text_piece(arena, literal_part, loc);
                arena.append_argument(node, Arg::Message(child));
            }
            let body = &tail[2..];
            let Some(end) = body.find('}') else {
                // Unterminated interpolation; keep the rest as written.
                let child = self.text_piece(arena, tail, loc);
                arena.append_argument(node, Arg::Message(child));
                rest = "";
                break;
            };
            if let Some(fragment) = parse_fragment(arena, &body[..end], self.file, loc)? {
                arena.append_argument(node, Arg::Message(fragment));
            }
            rest = &body[end + 1..];
        }
        if !rest.is_empty() {
            let child = self.text_piece(arena, rest, loc);
            arena.append_argument(node, Arg::Message(child));
        }
        Ok(node)
    }

    fn text_piece(&self, arena: &mut MsgArena, piece: &str, loc: SourceLoc) -> MsgId {
        let name = arena.intern("internal:createText");
        let value = Value::text(piece);
        arena.alloc(Message::with_arg(name, Arg::Value(value), loc))
    }
}

/// Parse one interpolation fragment as its own little source. Every node
/// of the fragment takes the enclosing literal's location.
fn parse_fragment(
    arena: &mut MsgArena,
    source: &str,
    file: Name,
    loc: SourceLoc,
) -> Result<Option<MsgId>, ParseError> {
    let tokens = murmur_lexer::lex(source, arena.interner());
    let mut parser = Parser {
        tokens,
        pos: 0,
        line_index: LineIndex::new(source),
        file,
    };
    let head = parser.parse_chain(arena, false)?;
    if let Some(head) = head {
        murmur_ir::walk(arena, head, &mut |arena, id| {
            arena.node_mut(id).loc = loc;
        });
    }
    Ok(head)
}
