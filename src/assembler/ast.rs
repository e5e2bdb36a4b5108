//! This AST describes a parsed Hack assembly program.
//!
//! Execution begins with the first instruction in the file.
//! Comments are prefixed with a double slash (//) and are single-line only.
//! Statements are delimited by newlines.
//!
//! Supported statements:
//!
//! ```nasm
//! @21          // A <= 21
//! @i           // A <= address of the variable or label `i`
//! (LOOP)       // bind LOOP to the position of the next instruction
//! D=M+1        // D <= M + 1
//! AM=M-1;JGT   // A, M <= M - 1, jump to A if the result is > 0
//! 0;JMP        // unconditionally jump to A
//! ```
use std::fmt;

/// A program is the ordered list of commands. Order defines instruction
/// positions, so it is never rearranged.
pub type Program = Vec<Command>;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Command {
    /// `(symbol)`. Declares a position, emits nothing.
    Label(String),
    /// `@value`
    Address(Address),
    /// `dest=comp;jump`
    Compute(Compute),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Command::Label(symbol) => write!(f, "({})", symbol),
            Command::Address(addr) => write!(f, "@{}", addr),
            Command::Compute(comp) => write!(f, "{}", comp),
        }
    }
}

impl Command {
    /// Whether this command occupies an instruction slot.
    pub fn is_instruction(&self) -> bool {
        !matches!(self, Command::Label(_))
    }
}

/// The operand of an address command. A command starts out `Pending` when
/// written with a symbol and becomes `Resolved` once the symbol table has
/// been consulted.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Address {
    Resolved(u32),
    Pending(String),
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Address::Resolved(value) => write!(f, "{}", value),
            Address::Pending(symbol) => write!(f, "{}", symbol),
        }
    }
}

/// The registers a compute command writes its result to.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct Dest {
    pub a: bool,
    pub d: bool,
    pub m: bool,
}

impl Dest {
    pub fn is_empty(&self) -> bool {
        !(self.a || self.d || self.m)
    }

    /// Convert the destination to its 3-bit field, A being the high bit.
    pub fn to_u16(&self) -> u16 {
        (u16::from(self.a) << 2) | (u16::from(self.d) << 1) | u16::from(self.m)
    }
}

impl fmt::Display for Dest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.a { write!(f, "A")?; }
        if self.d { write!(f, "D")?; }
        if self.m { write!(f, "M")?; }
        Ok(())
    }
}

#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct Compute {
    pub dest: Dest,
    /// Computation mnemonic exactly as written, e.g. `D+1` or `!M`.
    pub comp: String,
    pub jump: Option<String>,
}

impl fmt::Display for Compute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.dest.is_empty() {
            write!(f, "{}=", self.dest)?;
        }
        write!(f, "{}", self.comp)?;
        if let Some(jump) = &self.jump {
            write!(f, ";{}", jump)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Command::Label("LOOP".to_owned()).to_string(), "(LOOP)");
        assert_eq!(Command::Address(Address::Resolved(7)).to_string(), "@7");
        assert_eq!(Command::Address(Address::Pending("i".to_owned())).to_string(), "@i");

        let comp = Compute {
            dest: Dest { a: true, d: false, m: true },
            comp: "M-1".to_owned(),
            jump: Some("JGT".to_owned()),
        };
        assert_eq!(Command::Compute(comp).to_string(), "AM=M-1;JGT");

        let comp = Compute { comp: "0".to_owned(), jump: Some("JMP".to_owned()), ..Default::default() };
        assert_eq!(comp.to_string(), "0;JMP");
    }

    #[test]
    fn test_dest_bits() {
        assert_eq!(Dest::default().to_u16(), 0b000);
        assert_eq!(Dest { a: false, d: false, m: true }.to_u16(), 0b001);
        assert_eq!(Dest { a: false, d: true, m: false }.to_u16(), 0b010);
        assert_eq!(Dest { a: true, d: false, m: false }.to_u16(), 0b100);
        assert_eq!(Dest { a: true, d: true, m: true }.to_u16(), 0b111);
        assert!(Dest::default().is_empty());
    }

    #[test]
    fn test_is_instruction() {
        assert!(!Command::Label("END".to_owned()).is_instruction());
        assert!(Command::Address(Address::Resolved(0)).is_instruction());
        assert!(Command::Compute(Compute::default()).is_instruction());
    }
}
