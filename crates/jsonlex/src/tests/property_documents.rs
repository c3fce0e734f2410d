use alloc::vec::Vec;

use super::utils::{JsonDoc, Jsonish, expected_kinds, lex_all, quickcheck};
use crate::{Cursor, LexerOptions, SliceSource, Token, TokenKind};

/// Property: a well-formed document, compact or pretty-printed, lexes to the
/// token sequence its structure dictates and ends in EOF.
#[test]
fn documents_lex_to_their_structure() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: JsonDoc, pretty: bool, pushback: bool) -> bool {
        let text = if pretty {
            serde_json::to_vec_pretty(&doc.0)
        } else {
            serde_json::to_vec(&doc.0)
        };
        let Ok(text) = text else {
            return true;
        };
        let mut expected = Vec::new();
        expected_kinds(&doc.0, &mut expected);
        expected.push(TokenKind::Eof);

        let kinds: Vec<_> = lex_all(&text, LexerOptions { pushback })
            .iter()
            .map(|t| t.kind)
            .collect();
        kinds == expected
    }

    quickcheck().quickcheck(prop as fn(JsonDoc, bool, bool) -> bool);
}

/// Property: a filtering cursor shows exactly the tokens a plain lexer emits,
/// minus the rejected ones, up to the first terminal token.
#[test]
fn cursor_matches_filtered_lexer() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(input: Jsonish) -> bool {
        let expected: Vec<Token> = lex_all(&input.0, LexerOptions::default())
            .into_iter()
            .filter(|t| t.is_terminal() || !t.kind.is_structural())
            .collect();

        let mut cursor = Cursor::with_filter(SliceSource::new(&input.0), |kind, _| {
            !kind.is_structural()
        });
        let mut seen = Vec::new();
        loop {
            seen.push(cursor.current().clone());
            if cursor.current().is_terminal() {
                break;
            }
            cursor.advance();
        }
        seen == expected
    }

    quickcheck().quickcheck(prop as fn(Jsonish) -> bool);
}
