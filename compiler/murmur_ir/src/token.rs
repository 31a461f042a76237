//! Cooked tokens handed from the lexer to the parser.

use crate::{Name, Span};

/// Token kind, with interned payloads where the raw text matters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier, operator, keyword (`foo:`) or symbol literal (`:foo`).
    Ident(Name),
    /// Integer literal, raw digits.
    Number(Name),
    /// Decimal literal, raw digits with one dot.
    Decimal(Name),
    /// Text literal; payload is the raw content between the quotes,
    /// escapes and interpolations untouched.
    Str(Name),
    /// Regexp literal `#/pattern/flags`.
    Regex { pattern: Name, flags: Name },
    LParen,
    RParen,
    Comma,
    /// Explicit statement terminator `.`.
    Terminator,
    /// Line break; treated as a soft terminator.
    Newline,
    /// Unrecognized input.
    Error,
}

/// One token with its source span.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Flat token stream for one source text.
#[derive(Debug, Default)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn get(&self, index: usize) -> Option<Token> {
        self.tokens.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Token> + '_ {
        self.tokens.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_push_and_get() {
        let mut list = TokenList::new();
        assert!(list.is_empty());
        list.push(Token::new(TokenKind::LParen, Span::new(0, 1)));
        list.push(Token::new(TokenKind::RParen, Span::new(1, 2)));
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(0).map(|t| t.kind), Some(TokenKind::LParen));
        assert_eq!(list.get(2), None);
    }
}
