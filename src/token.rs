//! Tokenizes one input line into a sequence of tagged tokens.
//!
//! The three operator lexemes `<`, `>`, `|` are recognized only when
//! they appear as a maximal run of non-whitespace exactly one character
//! long; any other run of non-whitespace, however it mixes in `<`/`>`/
//! `|` characters, becomes a single [`Token::Word`].

/// A lexeme produced by [`tokenize`]. The closed, data-carrying enum
/// keeps the tokenizer/parser boundary a plain sum type rather than
/// reaching for dynamic dispatch over a handful of variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    Lt,
    Gt,
    Pipe,
}

/// Horizontal/vertical blank characters that separate tokens: space,
/// tab, vertical tab, form feed, carriage return. Deliberately not
/// `char::is_ascii_whitespace`, which omits vertical tab (`\x0B`); it
/// must split tokens like any other blank.
fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0B' | '\x0C' | '\r')
}

/// Splits `line` into tokens. Never fails: an unparseable run of
/// characters is simply folded into a `Word`, and structural validity
/// (non-empty stages, well-formed redirections) is the parser's job.
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for run in line.split(is_blank) {
        if run.is_empty() {
            continue;
        }
        tokens.push(match run {
            "<" => Token::Lt,
            ">" => Token::Gt,
            "|" => Token::Pipe,
            word => Token::Word(word.to_string()),
        });
    }
    tokens
}
