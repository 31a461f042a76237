//! Lexer for Murmur using logos with string interning.
//!
//! Produces a flat [`TokenList`]; names, operators, keyword messages and
//! symbol literals all cook down to `TokenKind::Ident`, because at the
//! chain level they are all just message names. Literal payloads stay
//! raw here; the parser decides how each one becomes a node.

use logos::Logos;
use murmur_ir::{Span, StringInterner, Token, TokenKind, TokenList};

/// Raw token from logos (before interning).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r]+")] // Skip horizontal whitespace
enum RawToken {
    #[regex(r";[^\n]*")]
    LineComment,

    #[token("\n")]
    Newline,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,

    // A single dot is a statement terminator; two or three dots are the
    // range operators and stay ordinary message names.
    #[token(".")]
    Terminator,
    #[token("..")]
    Range,
    #[token("...")]
    InclusiveRange,

    #[regex(r"[0-9]+\.[0-9]+")]
    Decimal,
    #[regex(r"[0-9]+")]
    Number,

    // Text literal; escapes and #{} interpolations are left raw for the
    // parser. Unescaped newlines are legal inside.
    #[regex(r#""(\\.|[^"\\])*""#)]
    Str,

    // Regexp literal #/pattern/flags
    #[regex(r"#/(\\.|[^/\\])*/[a-z]*")]
    Regex,

    // Plain names, keyword messages (foo:) and symbol literals (:foo).
    #[regex(r":?[A-Za-z_][A-Za-z0-9_]*[?!]?:*")]
    Ident,

    // Operator names are ordinary messages too; which of them bind as
    // infix operators is decided later by the shuffler.
    #[regex(r"[+\-*/%<>=!&|^~]+")]
    OperatorIdent,
}

/// Lex source code into a `TokenList`.
pub fn lex(source: &str, interner: &StringInterner) -> TokenList {
    let mut result = TokenList::new();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let range = logos.span();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "sources over u32::MAX bytes are out of scope"
        )]
        let span = Span::new(range.start as u32, range.end as u32);
        let slice = logos.slice();

        match token_result {
            Ok(raw) => match raw {
                RawToken::LineComment => {}
                _ => {
                    let kind = convert_token(raw, slice, interner);
                    result.push(Token::new(kind, span));
                }
            },
            Err(()) => {
                result.push(Token::new(TokenKind::Error, span));
            }
        }
    }

    result
}

/// Convert a raw token to a `TokenKind`, interning payloads.
fn convert_token(raw: RawToken, slice: &str, interner: &StringInterner) -> TokenKind {
    match raw {
        RawToken::Newline => TokenKind::Newline,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Terminator => TokenKind::Terminator,
        RawToken::Decimal => TokenKind::Decimal(interner.intern(slice)),
        RawToken::Number => TokenKind::Number(interner.intern(slice)),
        RawToken::Str => {
            // Keep the raw content between the quotes.
            TokenKind::Str(interner.intern(&slice[1..slice.len() - 1]))
        }
        RawToken::Regex => {
            // #/pattern/flags - flags come after the closing slash.
            let body = &slice[2..];
            let close = body.rfind('/').unwrap_or(body.len());
            TokenKind::Regex {
                pattern: interner.intern(&body[..close]),
                flags: interner.intern(&body[close + 1..]),
            }
        }
        RawToken::Range | RawToken::InclusiveRange | RawToken::Ident | RawToken::OperatorIdent => {
            TokenKind::Ident(interner.intern(slice))
        }
        RawToken::LineComment => unreachable!("comments are skipped before conversion"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str, interner: &StringInterner) -> Vec<TokenKind> {
        lex(source, interner).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_simple_chain() {
        let interner = StringInterner::new();
        let toks = kinds("foo bar(1, 2)", &interner);
        assert_eq!(
            toks,
            vec![
                TokenKind::Ident(interner.intern("foo")),
                TokenKind::Ident(interner.intern("bar")),
                TokenKind::LParen,
                TokenKind::Number(interner.intern("1")),
                TokenKind::Comma,
                TokenKind::Number(interner.intern("2")),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn dot_is_terminator_but_decimal_is_not() {
        let interner = StringInterner::new();
        let toks = kinds("a. 3.5", &interner);
        assert_eq!(
            toks,
            vec![
                TokenKind::Ident(interner.intern("a")),
                TokenKind::Terminator,
                TokenKind::Decimal(interner.intern("3.5")),
            ]
        );
    }

    #[test]
    fn ranges_stay_idents() {
        let interner = StringInterner::new();
        let toks = kinds("1 .. 5", &interner);
        assert_eq!(
            toks,
            vec![
                TokenKind::Number(interner.intern("1")),
                TokenKind::Ident(interner.intern("..")),
                TokenKind::Number(interner.intern("5")),
            ]
        );
    }

    #[test]
    fn keyword_and_symbol_names() {
        let interner = StringInterner::new();
        let toks = kinds("foo: :bar baz?", &interner);
        assert_eq!(
            toks,
            vec![
                TokenKind::Ident(interner.intern("foo:")),
                TokenKind::Ident(interner.intern(":bar")),
                TokenKind::Ident(interner.intern("baz?")),
            ]
        );
    }

    #[test]
    fn operators_lex_as_idents() {
        let interner = StringInterner::new();
        let toks = kinds("a + b == c", &interner);
        assert_eq!(
            toks,
            vec![
                TokenKind::Ident(interner.intern("a")),
                TokenKind::Ident(interner.intern("+")),
                TokenKind::Ident(interner.intern("b")),
                TokenKind::Ident(interner.intern("==")),
                TokenKind::Ident(interner.intern("c")),
            ]
        );
    }

    #[test]
    fn text_keeps_raw_content() {
        let interner = StringInterner::new();
        let toks = kinds(r#""hi \n there""#, &interner);
        assert_eq!(
            toks,
            vec![TokenKind::Str(interner.intern(r"hi \n there"))]
        );
    }

    #[test]
    fn regex_splits_pattern_and_flags() {
        let interner = StringInterner::new();
        let toks = kinds("#/a+b/ix", &interner);
        assert_eq!(
            toks,
            vec![TokenKind::Regex {
                pattern: interner.intern("a+b"),
                flags: interner.intern("ix"),
            }]
        );
    }

    #[test]
    fn comments_are_dropped_newlines_kept() {
        let interner = StringInterner::new();
        let toks = kinds("a ; comment\nb", &interner);
        assert_eq!(
            toks,
            vec![
                TokenKind::Ident(interner.intern("a")),
                TokenKind::Newline,
                TokenKind::Ident(interner.intern("b")),
            ]
        );
    }

    #[test]
    fn unknown_input_becomes_error_token() {
        let interner = StringInterner::new();
        let toks = kinds("a @", &interner);
        assert_eq!(
            toks,
            vec![
                TokenKind::Ident(interner.intern("a")),
                TokenKind::Error,
            ]
        );
    }
}
