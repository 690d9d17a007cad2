//! This lexer splits Hack assembly into instruction-level tokens.
//!
//! It does no semantic validation: a token is simply a source line with
//! its comment and surrounding whitespace removed.
use std::io::{self, BufRead, BufReader, Read};

/// A comment-stripped, trimmed source line and the (1-based) line it came from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub text: String,
    pub line: usize,
}

impl Token {
    pub fn new<S: Into<String>>(text: S, line: usize) -> Self {
        Token { text: text.into(), line }
    }
}

/// Hack only supports a single instruction per line, so every non-empty
/// line becomes exactly one token. Order is preserved.
pub fn tokenize<T: Read + ?Sized>(reader: Box<T>) -> io::Result<Vec<Token>> {
    let mut tokens: Vec<Token> = Vec::with_capacity(256);

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.map_err(|e| {
            error!("Error reading line {}: {}", index + 1, e);
            e
        })?;

        if let Some(text) = tokenize_line(&line) {
            tokens.push(Token::new(text, index + 1));
        }
    }

    debug!("Tokenizer produced {} token(s).", tokens.len());
    Ok(tokens)
}

/// Strips a `//` comment and surrounding whitespace.
/// Returns None if nothing is left.
fn tokenize_line(line: &str) -> Option<&str> {
    let code = match line.find("//") {
        Some(idx) => &line[..idx],
        None => line,
    };

    let code = code.trim();
    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}
