#![no_main]
use std::cell::RefCell;

use arbitrary::Arbitrary;
use jsonlex::{
    ByteSource, Cursor, Lexer, LexerOptions, PushbackReader, SliceSource, Token, TokenKind,
};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 1; // mode flags

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// One piece of a generated input.
#[derive(Debug, Arbitrary)]
enum Segment {
    /// JSON whitespace, drawn from the low bits of each byte.
    Space(Vec<u8>),
    /// A complete document as serde_json writes it.
    Document(ArbitraryValue),
    /// Number text shaped to hit the lexer's accept and reject edges.
    Number(NumberShape),
    /// A literal, possibly misspelled or cut short.
    Literal { which: u8, cut: u8, typo: Option<u8> },
}

#[derive(Debug, Arbitrary)]
struct NumberShape {
    minus: bool,
    int: Vec<u8>,
    dot: bool,
    frac: Vec<u8>,
    exp: Option<(bool, Option<bool>, Vec<u8>)>,
}

impl Segment {
    fn write(&self, out: &mut Vec<u8>) {
        match self {
            Self::Space(bits) => out.extend(bits.iter().map(|b| b" \t\n\r"[usize::from(b & 3)])),
            Self::Document(value) => {
                out.extend(serde_json::to_vec(&value.0).expect("serializable value"));
            }
            Self::Number(shape) => shape.write(out),
            Self::Literal { which, cut, typo } => {
                let word: &[u8] = [&b"null"[..], b"true", b"false"][usize::from(which % 3)];
                let len = word.len() - usize::from(cut % 2);
                out.extend_from_slice(&word[..len]);
                if let Some(typo) = typo {
                    out.push(b'a' + typo % 26);
                }
            }
        }
    }
}

impl NumberShape {
    fn write(&self, out: &mut Vec<u8>) {
        let digits = |bytes: &[u8], out: &mut Vec<u8>| {
            out.extend(bytes.iter().take(4).map(|b| b'0' + b % 10));
        };
        if self.minus {
            out.push(b'-');
        }
        digits(self.int.as_slice(), out);
        if self.dot {
            out.push(b'.');
        }
        digits(self.frac.as_slice(), out);
        if let Some((upper, sign, exp)) = &self.exp {
            out.push(if *upper { b'E' } else { b'e' });
            match sign {
                Some(true) => out.push(b'+'),
                Some(false) => out.push(b'-'),
                None => {}
            }
            digits(exp.as_slice(), out);
        }
    }
}

/// Replaces the input with whitespace-separated segments, or falls back to the
/// default byte-level mutations.
fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size >= HEADER && !seed.is_multiple_of(10) {
        return fuzzer_mutate(data, size, max_size);
    }

    let noise: Vec<u8> = with_rng(|rng| {
        let len = rng.random_range(16..=256);
        (0..len).map(|_| rng.random::<u8>()).collect()
    });
    let mut u = arbitrary::Unstructured::new(&noise);
    let mut out = vec![with_rng(|rng| rng.next_u32() as u8 & 0x07)];
    while let Ok(segment) = u.arbitrary::<Segment>() {
        segment.write(&mut out);
        if out.len() >= max_size || u.is_empty() {
            break;
        }
        out.push(b' ');
    }

    let len = out.len().min(max_size);
    data[..len].copy_from_slice(&out[..len]);
    len
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let value = match u.choose_index(8)? {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => Value::from(u.arbitrary::<i64>()?),
            3 => serde_json::Number::from_f64(u.arbitrary()?)
                .map_or(Value::Null, Value::Number),
            4 | 5 => Value::String(u.arbitrary()?),
            6 => Value::Array(
                u.arbitrary_iter::<ArbitraryValue>()?
                    .map(|v| v.map(|v| v.0))
                    .collect::<arbitrary::Result<_>>()?,
            ),
            _ => Value::Object(
                u.arbitrary_iter::<(String, ArbitraryValue)>()?
                    .map(|kv| kv.map(|(k, v)| (k, v.0)))
                    .collect::<arbitrary::Result<Map<_, _>>>()?,
            ),
        };
        Ok(Self(value))
    }
}

/// A source that can only move forward.
struct ForwardOnly<'a>(SliceSource<'a>);

impl ByteSource for ForwardOnly<'_> {
    type Error = std::convert::Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.0.read(buf)
    }
}

fn drain<S: ByteSource>(lexer: &mut Lexer, src: &mut S) -> Vec<Token> {
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token(src).to_token();
        let done = token.is_terminal();
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

fn lexer(data: &[u8]) {
    let Some((&flags, input)) = data.split_first() else {
        return;
    };
    let options = LexerOptions {
        pushback: flags & 1 != 0,
    };

    let mut lexer = Lexer::new(options);
    let tokens = if flags & 2 != 0 {
        drain(
            &mut lexer,
            &mut PushbackReader::ensure(ForwardOnly(SliceSource::new(input))),
        )
    } else {
        drain(&mut lexer, &mut SliceSource::new(input))
    };

    let (last, body) = tokens.split_last().expect("a session emits at least one token");
    assert!(last.is_terminal());
    assert!(body.iter().all(|t| !t.is_terminal()));
    assert!(tokens.iter().all(|t| t.pos <= input.len()));
    if last.is(TokenKind::Eof) {
        assert_eq!(last.pos, input.len());
    }
    if serde_json::from_slice::<Value>(input).is_ok() {
        assert!(last.is(TokenKind::Eof), "valid JSON lexed to {last:?}");
    }
    assert_eq!(tokens, drain(&mut Lexer::default(), &mut SliceSource::new(input)));

    if flags & 4 != 0 {
        let mut cursor = Cursor::with_filter(SliceSource::new(input), |kind, _| {
            !kind.is_structural()
        });
        let expected: Vec<_> = tokens
            .iter()
            .filter(|t| t.is_terminal() || !t.kind.is_structural())
            .collect();
        for token in expected {
            assert_eq!(cursor.current(), token);
            cursor.advance();
        }
        assert_eq!(cursor.advance(), last);
    }
}

fuzz_target!(|data: &[u8]| lexer(data));
