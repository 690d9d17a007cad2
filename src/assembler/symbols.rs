//! Symbol table construction.
//!
//! Resolution runs in two passes over the classified lines:
//!
//! 1. Labels are bound to the address of the instruction that follows them.
//! 2. Every other symbol used as an `@` operand becomes a variable, allocated
//!    sequentially from `FIRST_VARIABLE_ADDRESS` in order of first use.
//!
//! After `resolve` returns the table is never mutated again.
use std::collections::HashMap;
use std::convert::TryFrom;

use once_cell::sync::Lazy;

use super::ast::MAX_ADDRESS;
use super::error::{Error, LineError};
use super::parser::{Line, Statement};

/// First data memory address after the virtual registers R0-R15.
pub const FIRST_VARIABLE_ADDRESS: u16 = 16;

/// Names the Hack platform defines for every program.
pub static PREDEFINED_SYMBOLS: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for (i, name) in REGISTERS.iter().enumerate() {
        m.insert(*name, i as u16);
    }
    m.insert("SCREEN", 16384);
    m.insert("KBD", 24576);
    m.insert("SP", 0);
    m.insert("LCL", 1);
    m.insert("ARG", 2);
    m.insert("THIS", 3);
    m.insert("THAT", 4);
    m
});

const REGISTERS: [&str; 16] = [
    "R0", "R1", "R2", "R3", "R4", "R5", "R6", "R7",
    "R8", "R9", "R10", "R11", "R12", "R13", "R14", "R15",
];

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SymbolTable {
    symbols: HashMap<String, u16>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new(&PREDEFINED_SYMBOLS)
    }
}

impl SymbolTable {
    /// Creates a table seeded with the given predefined symbols.
    pub fn new(predefined: &HashMap<&'static str, u16>) -> Self {
        let symbols = predefined
            .iter()
            .map(|(name, addr)| (name.to_string(), *addr))
            .collect();
        SymbolTable { symbols }
    }

    pub fn get(&self, name: &str) -> Option<u16> {
        self.symbols.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Labels and variables defined by the program, ordered by address.
    pub fn user_symbols(&self) -> Vec<(&str, u16)> {
        let mut out: Vec<(&str, u16)> = self
            .symbols
            .iter()
            .filter(|(name, _)| !PREDEFINED_SYMBOLS.contains_key(name.as_str()))
            .map(|(name, addr)| (name.as_str(), *addr))
            .collect();
        out.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(b.0)));
        out
    }

    fn insert(&mut self, name: &str, addr: u16) {
        self.symbols.insert(name.to_owned(), addr);
    }
}

/// Builds the complete symbol table for a program.
pub fn resolve(lines: &[Line]) -> Result<SymbolTable, LineError> {
    let mut table = SymbolTable::default();
    resolve_labels(&mut table, lines)?;
    allocate_variables(&mut table, lines)?;

    debug!(
        "Resolved {} user symbol(s): {:?}",
        table.user_symbols().len(),
        table.user_symbols()
    );
    Ok(table)
}

/// First pass: bind every label to the current program counter.
fn resolve_labels(table: &mut SymbolTable, lines: &[Line]) -> Result<(), LineError> {
    let mut pc: usize = 0;

    for line in lines {
        match &line.statement {
            Statement::Label(name) => {
                if let Some(prev) = table.get(name) {
                    return Err(LineError::new(
                        line.token.line,
                        Error::RedefinedLabel(name.clone(), prev),
                    ));
                }

                let addr = checked_address(pc)
                    .ok_or_else(|| LineError::new(line.token.line, Error::AddressOutOfRange(name.clone())))?;
                trace!("label {} => {}", name, addr);
                table.insert(name, addr);
            }
            // A label is not an instruction; everything else is.
            _ => pc += 1,
        }
    }

    Ok(())
}

/// Second pass: give every still-unknown operand symbol a data address.
fn allocate_variables(table: &mut SymbolTable, lines: &[Line]) -> Result<(), LineError> {
    let mut next_free = usize::from(FIRST_VARIABLE_ADDRESS);

    for line in lines {
        if let Statement::AddressSymbol(name) = &line.statement {
            if table.contains(name) {
                continue;
            }

            let addr = checked_address(next_free)
                .ok_or_else(|| LineError::new(line.token.line, Error::AddressOutOfRange(name.clone())))?;
            trace!("variable {} => {}", name, addr);
            table.insert(name, addr);
            next_free += 1;
        }
    }

    Ok(())
}

fn checked_address(value: usize) -> Option<u16> {
    u16::try_from(value).ok().filter(|addr| *addr <= MAX_ADDRESS)
}
