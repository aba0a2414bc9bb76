//! A char-at-a-time lexer over one source file, producing [`Token`]s
//! tagged with `codemap::Span`s.

use std::str::CharIndices;
use std::sync::Arc;

use codemap::File;

use crate::token::Token;

#[derive(Debug, Clone)]
pub(crate) struct Lexer<'a> {
    chars: CharIndices<'a>,
    file: Arc<File>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, file: Arc<File>) -> Self {
        Lexer {
            chars: input.char_indices(),
            file,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let (i, c) = self.chars.next()?;
        let span = self.file.span.subspan(i as u64, i as u64 + c.len_utf8() as u64);
        Some(Token::new(c, span))
    }
}
