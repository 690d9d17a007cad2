//! Machine-level Hack instructions and their binary encoding.
//!
//! Every instruction is one 16-bit word, written most significant bit first.
//!
//! ```text
//! A-instruction:  0vvv vvvv vvvv vvvv   v: 15-bit value
//! C-instruction:  111a cccc ccdd djjj   a: read M instead of A
//!                                       c: ALU control
//!                                       d: destination (A, D, M)
//!                                       j: jump condition
//! ```
use std::collections::HashMap;
use std::convert::TryFrom;
use std::fmt;

use once_cell::sync::Lazy;

use super::error::Error;

/// Largest value an A-instruction can load.
pub const MAX_ADDRESS: u16 = 0x7FFF;

const C_PREFIX: u16 = 0b111 << 13;
const A_BIT_SHIFT: u16 = 12;
const COMP_SHIFT: u16 = 6;
const DEST_SHIFT: u16 = 3;

/// ALU control bits, keyed by the computation written against `A`.
/// `M` computations share the same control bits and differ only in the a-bit.
static COMP_TABLE: Lazy<HashMap<&'static str, u8>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("0", 0b101010);
    m.insert("1", 0b111111);
    m.insert("-1", 0b111010);
    m.insert("D", 0b001100);
    m.insert("A", 0b110000);
    m.insert("!D", 0b001101);
    m.insert("!A", 0b110001);
    m.insert("-D", 0b001111);
    m.insert("-A", 0b110011);
    m.insert("D+1", 0b011111);
    m.insert("A+1", 0b110111);
    m.insert("D-1", 0b001110);
    m.insert("A-1", 0b110010);
    m.insert("D+A", 0b000010);
    m.insert("D-A", 0b010011);
    m.insert("A-D", 0b000111);
    m.insert("D&A", 0b000000);
    m.insert("D|A", 0b010101);
    m
});

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Instruction {
    A(u16),
    C { comp: Comp, dest: Dest, jump: Jump },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Instruction {
    /// Assembles the instruction into its 16-bit machine word.
    /// A values above `MAX_ADDRESS` must be rejected before this point.
    pub fn assemble(&self) -> u16 {
        match self {
            Instruction::A(value) => value & MAX_ADDRESS,
            Instruction::C { comp, dest, jump } => {
                C_PREFIX
                    | (u16::from(comp.memory) << A_BIT_SHIFT)
                    | (u16::from(comp.code) << COMP_SHIFT)
                    | (u16::from(dest.bits()) << DEST_SHIFT)
                    | u16::from(jump.bits())
            }
        }
    }

    /// The textual `.hack` form: sixteen `0`/`1` characters.
    pub fn to_word(&self) -> String {
        format!("{:016b}", self.assemble())
    }
}

/// The a-bit and the six ALU control bits of a C-instruction.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Comp {
    memory: bool,
    code: u8,
}

impl Comp {
    pub fn reads_memory(&self) -> bool {
        self.memory
    }

    pub fn code(&self) -> u8 {
        self.code
    }
}

impl TryFrom<&str> for Comp {
    type Error = Error;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        let memory = text.contains('M');
        let key = text.replacen('M', "A", 1);

        match COMP_TABLE.get(key.as_str()) {
            Some(&code) => Ok(Comp { memory, code }),
            None => Err(Error::UnknownComputation(text.to_owned())),
        }
    }
}

/// Destination bits, in `A D M` order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Dest(u8);

impl Dest {
    pub fn bits(&self) -> u8 {
        self.0
    }
}

impl From<Option<&str>> for Dest {
    /// Each of `A`, `D`, `M` present anywhere in the text sets its bit.
    fn from(text: Option<&str>) -> Self {
        let text = match text {
            Some(t) => t,
            None => return Dest::default(),
        };

        let mut bits = 0;
        if text.contains('A') {
            bits |= 0b100;
        }
        if text.contains('D') {
            bits |= 0b010;
        }
        if text.contains('M') {
            bits |= 0b001;
        }
        Dest(bits)
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Jump {
    Null,
    JGT,
    JEQ,
    JGE,
    JLT,
    JNE,
    JLE,
    JMP,
}

impl Default for Jump {
    fn default() -> Self {
        Jump::Null
    }
}

impl Jump {
    pub fn bits(&self) -> u8 {
        use Jump::*;
        match self {
            Null => 0b000,
            JGT => 0b001,
            JEQ => 0b010,
            JGE => 0b011,
            JLT => 0b100,
            JNE => 0b101,
            JLE => 0b110,
            JMP => 0b111,
        }
    }
}

impl TryFrom<Option<&str>> for Jump {
    type Error = Error;

    fn try_from(text: Option<&str>) -> Result<Self, Self::Error> {
        use Jump::*;
        match text {
            None => Ok(Null),
            Some("JGT") => Ok(JGT),
            Some("JEQ") => Ok(JEQ),
            Some("JGE") => Ok(JGE),
            Some("JLT") => Ok(JLT),
            Some("JNE") => Ok(JNE),
            Some("JLE") => Ok(JLE),
            Some("JMP") => Ok(JMP),
            Some(other) => Err(Error::UnknownJump(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPS: [(&str, &str); 18] = [
        ("0", "101010"),
        ("1", "111111"),
        ("-1", "111010"),
        ("D", "001100"),
        ("A", "110000"),
        ("!D", "001101"),
        ("!A", "110001"),
        ("-D", "001111"),
        ("-A", "110011"),
        ("D+1", "011111"),
        ("A+1", "110111"),
        ("D-1", "001110"),
        ("A-1", "110010"),
        ("D+A", "000010"),
        ("D-A", "010011"),
        ("A-D", "000111"),
        ("D&A", "000000"),
        ("D|A", "010101"),
    ];

    const DESTS: [(Option<&str>, &str); 8] = [
        (None, "000"),
        (Some("M"), "001"),
        (Some("D"), "010"),
        (Some("MD"), "011"),
        (Some("A"), "100"),
        (Some("AM"), "101"),
        (Some("AD"), "110"),
        (Some("AMD"), "111"),
    ];

    const JUMPS: [(Option<&str>, &str); 8] = [
        (None, "000"),
        (Some("JGT"), "001"),
        (Some("JEQ"), "010"),
        (Some("JGE"), "011"),
        (Some("JLT"), "100"),
        (Some("JNE"), "101"),
        (Some("JLE"), "110"),
        (Some("JMP"), "111"),
    ];

    fn c(comp: &str, dest: Option<&str>, jump: Option<&str>) -> Result<Instruction, Error> {
        Ok(Instruction::C {
            comp: Comp::try_from(comp)?,
            dest: Dest::from(dest),
            jump: Jump::try_from(jump)?,
        })
    }

    #[test]
    fn test_a_instruction() {
        assert_eq!(Instruction::A(0).to_word(), "0000000000000000");
        assert_eq!(Instruction::A(2).to_word(), "0000000000000010");
        assert_eq!(Instruction::A(16384).to_word(), "0100000000000000");
        assert_eq!(Instruction::A(MAX_ADDRESS).to_word(), "0111111111111111");
    }

    #[test]
    fn test_every_c_instruction() {
        for (comp, comp_bits) in COMPS.iter() {
            let m_comp = comp.replacen('A', "M", 1);
            for (dest, dest_bits) in DESTS.iter() {
                for (jump, jump_bits) in JUMPS.iter() {
                    let expected = format!("1110{}{}{}", comp_bits, dest_bits, jump_bits);
                    assert_eq!(c(comp, *dest, *jump).unwrap().to_word(), expected);

                    if m_comp.as_str() != *comp {
                        let expected = format!("1111{}{}{}", comp_bits, dest_bits, jump_bits);
                        assert_eq!(c(&m_comp, *dest, *jump).unwrap().to_word(), expected);
                    }
                }
            }
        }
    }

    #[test]
    fn test_c_instruction_examples() {
        assert_eq!(c("A", Some("D"), None).unwrap().to_word(), "1110110000010000");
        assert_eq!(c("D+A", Some("D"), None).unwrap().to_word(), "1110000010010000");
        assert_eq!(c("D", Some("M"), None).unwrap().to_word(), "1110001100001000");
        assert_eq!(c("0", None, Some("JMP")).unwrap().to_word(), "1110101010000111");
        assert_eq!(c("M-1", Some("AM"), None).unwrap().to_word(), "1111110010101000");
        assert_eq!(c("D|M", None, Some("JNE")).unwrap().to_word(), "1111010101000101");
    }

    #[test]
    fn test_comp() {
        let comp = Comp::try_from("D&M").unwrap();
        assert!(comp.reads_memory());
        assert_eq!(comp.code(), 0b000000);

        let comp = Comp::try_from("D&A").unwrap();
        assert!(!comp.reads_memory());

        for text in &["", "A+D", "D+D", "M+M", "A+M", "2", "D*A", " D", "d+1"] {
            assert_eq!(Comp::try_from(*text), Err(Error::UnknownComputation(text.to_string())));
        }
    }

    #[test]
    fn test_dest_is_order_insensitive() {
        assert_eq!(Dest::from(Some("DM")), Dest::from(Some("MD")));
        assert_eq!(Dest::from(Some("MDA")).bits(), 0b111);
        assert_eq!(Dest::from(Some("DA")).bits(), 0b110);
        assert_eq!(Dest::from(None).bits(), 0b000);
    }

    #[test]
    fn test_jump() {
        assert_eq!(Jump::try_from(None), Ok(Jump::Null));
        assert_eq!(Jump::try_from(Some("JLE")), Ok(Jump::JLE));
        assert_eq!(Jump::try_from(Some("jmp")), Err(Error::UnknownJump("jmp".to_owned())));
        assert_eq!(Jump::try_from(Some("JNZ")), Err(Error::UnknownJump("JNZ".to_owned())));
    }

    #[test]
    fn test_assemble_is_deterministic() {
        let ins = c("D-M", Some("AD"), Some("JGE")).unwrap();
        assert_eq!(ins.assemble(), ins.assemble());
        assert_eq!(ins.to_word(), ins.to_word());
        assert_eq!(ins.to_word().len(), 16);
    }
}
