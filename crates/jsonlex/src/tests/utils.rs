use alloc::{boxed::Box, string::String, vec::Vec};
use core::ops::ControlFlow;

use quickcheck::{Arbitrary, Gen, QuickCheck};
use serde_json::{Map, Number, Value};

use crate::{Lexer, LexerOptions, SliceSource, Token, TokenKind};

/// Bytes drawn mostly from the JSON alphabet, so that inputs reach deep into
/// the number and literal states instead of failing on the first byte.
#[derive(Debug, Clone)]
pub(crate) struct Jsonish(pub Vec<u8>);

const ALPHABET: &[u8] = b" \t\n\r{}[]:,\"\\-+.eE0123456789truefalsn";

impl Arbitrary for Jsonish {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % (g.size() + 1);
        let bytes = (0..len)
            .map(|_| {
                if u8::arbitrary(g) % 16 == 0 {
                    u8::arbitrary(g)
                } else {
                    g.choose(ALPHABET).copied().unwrap_or(b' ')
                }
            })
            .collect();
        Self(bytes)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.0.shrink().map(Self))
    }
}

/// A well-formed JSON document.
#[derive(Debug, Clone)]
pub(crate) struct JsonDoc(pub Value);

impl Arbitrary for JsonDoc {
    fn arbitrary(g: &mut Gen) -> Self {
        fn scalar(g: &mut Gen) -> Value {
            match usize::arbitrary(g) % 5 {
                0 => Value::Null,
                1 => Value::Bool(bool::arbitrary(g)),
                2 => Value::Number(i64::arbitrary(g).into()),
                3 => Number::from_f64(f64::arbitrary(g)).map_or(Value::Null, Value::Number),
                _ => Value::String(String::arbitrary(g)),
            }
        }

        fn gen_val(g: &mut Gen, depth: usize) -> Value {
            if depth == 0 {
                return scalar(g);
            }
            let len = usize::arbitrary(g) % 4;
            match usize::arbitrary(g) % 3 {
                0 => scalar(g),
                1 => Value::Array((0..len).map(|_| gen_val(g, depth - 1)).collect()),
                _ => {
                    let mut map = Map::new();
                    for _ in 0..len {
                        map.insert(String::arbitrary(g), gen_val(g, depth - 1));
                    }
                    Value::Object(map)
                }
            }
        }

        let depth = usize::arbitrary(g) % 4;
        Self(gen_val(g, depth))
    }
}

/// Number of cases per property.
pub(crate) fn quickcheck() -> QuickCheck {
    #[cfg(not(miri))]
    let tests = if is_ci::cached() { 10_000 } else { 1_000 };
    #[cfg(miri)]
    let tests = 10;

    QuickCheck::new().tests(tests)
}

/// Lexes `input` to the end of the session, copying every token.
pub(crate) fn lex_all(input: &[u8], options: LexerOptions) -> Vec<Token> {
    let mut lexer = Lexer::new(options);
    let mut src = SliceSource::new(input);
    let mut tokens = Vec::new();
    lexer.scan(&mut src, |token| {
        tokens.push(token.to_token());
        ControlFlow::Continue(())
    });
    tokens
}

/// The token kinds a well-formed document must lex to, EOF excluded.
pub(crate) fn expected_kinds(value: &Value, out: &mut Vec<TokenKind>) {
    match value {
        Value::Null | Value::Bool(_) => out.push(TokenKind::Literal),
        Value::Number(_) => out.push(TokenKind::Number),
        Value::String(_) => out.push(TokenKind::String),
        Value::Array(items) => {
            out.push(TokenKind::LBracket);
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(TokenKind::Comma);
                }
                expected_kinds(item, out);
            }
            out.push(TokenKind::RBracket);
        }
        Value::Object(map) => {
            out.push(TokenKind::LBrace);
            for (i, (_, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(TokenKind::Comma);
                }
                out.push(TokenKind::String);
                out.push(TokenKind::Colon);
                expected_kinds(item, out);
            }
            out.push(TokenKind::RBrace);
        }
    }
}
