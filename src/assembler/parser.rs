//! The Parser module takes the token stream from the lexer and classifies
//! every token exactly once into a `Statement`.
//!
//! Classification is purely syntactic. Whether a computation or jump
//! mnemonic actually exists is decided by the encoder.
use once_cell::sync::Lazy;
use regex::Regex;

use super::ast::MAX_ADDRESS;
use super::error::{Error, LineError};
use super::lexer::Token;

/// Symbols may use letters, digits, `_`, `.`, `$` and `:`, but may not
/// begin with a digit.
const SYMBOL: &str = r"[A-Za-z_.$:][A-Za-z0-9_.$:]*";

static LABEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"^\(({})\)$", SYMBOL)).unwrap());
static LITERAL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^@([0-9]+)$").unwrap());
static SYMBOL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(&format!(r"^@({})$", SYMBOL)).unwrap());
static COMPUTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:([^=;]+)=)?([^=;]+)(?:;([^=;]+))?$").unwrap());

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Statement {
    /// `(NAME)`: binds NAME to the address of the next instruction.
    Label(String),
    /// `@123`
    AddressLiteral(u16),
    /// `@NAME`: a label or a variable.
    AddressSymbol(String),
    /// `[dest=]comp[;jump]`
    Compute {
        dest: Option<String>,
        comp: String,
        jump: Option<String>,
    },
}

impl Statement {
    /// Labels occupy no slot in instruction memory.
    pub fn is_instruction(&self) -> bool {
        !matches!(self, Statement::Label(_))
    }
}

/// A classified token, still carrying its source text for diagnostics.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Line {
    pub token: Token,
    pub statement: Statement,
}

pub struct Parser {
    tokens: Vec<Token>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens }
    }

    /// Run the parser, consuming itself and returning the classified lines.
    /// Stops at the first token that fits no instruction shape.
    pub fn run(self) -> Result<Vec<Line>, LineError> {
        let mut lines = Vec::with_capacity(self.tokens.len());

        for token in self.tokens {
            match classify(&token.text) {
                Ok(statement) => lines.push(Line { token, statement }),
                Err(e) => return Err(LineError::new(token.line, e)),
            }
        }

        Ok(lines)
    }
}

/// Determines the shape of a single token.
pub fn classify(text: &str) -> Result<Statement, Error> {
    if let Some(caps) = LABEL_RE.captures(text) {
        return Ok(Statement::Label(caps[1].to_owned()));
    }

    if let Some(caps) = LITERAL_RE.captures(text) {
        return literal(&caps[1]).map(Statement::AddressLiteral);
    }

    if let Some(caps) = SYMBOL_RE.captures(text) {
        return Ok(Statement::AddressSymbol(caps[1].to_owned()));
    }

    // Anything else starting with a sentinel is a broken label or address.
    if text.starts_with('(') || text.starts_with('@') {
        return Err(Error::Malformed(text.to_owned()));
    }

    match COMPUTE_RE.captures(text) {
        Some(caps) => Ok(Statement::Compute {
            dest: caps.get(1).map(|m| m.as_str().to_owned()),
            comp: caps[2].to_owned(),
            jump: caps.get(3).map(|m| m.as_str().to_owned()),
        }),
        None => Err(Error::Malformed(text.to_owned())),
    }
}

/// Parses a decimal literal operand. Values must fit in 15 bits.
fn literal(digits: &str) -> Result<u16, Error> {
    match digits.parse::<u16>() {
        Ok(val) if val <= MAX_ADDRESS => Ok(val),
        _ => Err(Error::AddressOutOfRange(digits.to_owned())),
    }
}
