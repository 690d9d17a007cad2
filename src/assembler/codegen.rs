//! Final pass: turns classified lines into machine words using a
//! fully resolved symbol table.
use std::convert::TryFrom;

use super::ast::{Comp, Dest, Instruction, Jump, MAX_ADDRESS};
use super::error::{Error, LineError};
use super::lexer::Token;
use super::parser::{Line, Parser, Statement};
use super::symbols::{self, SymbolTable};

/// One emitted instruction together with the source it came from.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Listing {
    pub address: u16,
    pub source: Token,
    pub instruction: Instruction,
}

/// The result of assembling a whole program.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Assembly {
    pub symbols: SymbolTable,
    pub listing: Vec<Listing>,
}

impl Assembly {
    /// Binary words in program order.
    pub fn words(&self) -> impl Iterator<Item = String> + '_ {
        self.listing.iter().map(|l| l.instruction.to_word())
    }

    /// The `.hack` file contents: one word per line, each newline-terminated.
    pub fn to_hack(&self) -> String {
        let mut out = String::with_capacity(self.listing.len() * 17);
        for word in self.words() {
            out.push_str(&word);
            out.push('\n');
        }
        out
    }
}

/// Runs the whole pipeline on a token stream.
/// Nothing is produced unless every instruction encodes.
pub fn assemble(tokens: Vec<Token>) -> Result<Assembly, LineError> {
    let lines = Parser::new(tokens).run()?;
    let symbols = symbols::resolve(&lines)?;
    let listing = generate(&lines, &symbols)?;

    info!(
        "Assembled {} instruction(s) using {} user symbol(s).",
        listing.len(),
        symbols.user_symbols().len()
    );
    Ok(Assembly { symbols, listing })
}

/// Encodes every non-label line, in order.
pub fn generate(lines: &[Line], symbols: &SymbolTable) -> Result<Vec<Listing>, LineError> {
    let mut listing = Vec::with_capacity(lines.len());
    let mut address: u16 = 0;

    for line in lines.iter().filter(|l| l.statement.is_instruction()) {
        let instruction = match encode(&line.statement, symbols) {
            Ok(Some(ins)) => ins,
            Ok(None) => continue,
            Err(e) => {
                debug!("failed to encode `{}`", line.token.text);
                return Err(LineError::new(line.token.line, e));
            }
        };

        trace!(
            "#{} {:04}: {} => {}",
            usize::from(address) + 1,
            address,
            line.token.text,
            instruction.to_word()
        );
        listing.push(Listing {
            address,
            source: line.token.clone(),
            instruction,
        });
        address = address.wrapping_add(1);
    }

    Ok(listing)
}

/// Encodes a single statement. Labels produce no instruction.
pub fn encode(statement: &Statement, symbols: &SymbolTable) -> Result<Option<Instruction>, Error> {
    match statement {
        Statement::Label(_) => Ok(None),
        Statement::AddressLiteral(value) => Ok(Some(Instruction::A(*value))),
        Statement::AddressSymbol(name) => match symbols.get(name) {
            Some(value) if value <= MAX_ADDRESS => Ok(Some(Instruction::A(value))),
            Some(_) => Err(Error::AddressOutOfRange(name.clone())),
            None => Err(Error::UnresolvedSymbol(name.clone())),
        },
        Statement::Compute { dest, comp, jump } => Ok(Some(Instruction::C {
            comp: Comp::try_from(comp.as_str())?,
            dest: Dest::from(dest.as_deref()),
            jump: Jump::try_from(jump.as_deref())?,
        })),
    }
}
