//! Converts resolved commands into Hack machine words.
//!
//! Address commands assemble to `0vvvvvvvvvvvvvvv`, compute commands to
//! `111accccccdddjjj` where `a` selects M instead of A as the ALU's second
//! operand.
use super::ast::*;
use super::error::EncodingError;

/// Largest value an address command can load.
pub const MAX_ADDRESS: u32 = 0x7FFF;

const COMPUTE_PREFIX: u16 = 0b111;

/// Computation mnemonic to its 7-bit field (`a` bit followed by `cccccc`).
pub const COMP_TABLE: [(&str, u16); 28] = [
    ("0", 0b0101010),
    ("1", 0b0111111),
    ("-1", 0b0111010),
    ("D", 0b0001100),
    ("A", 0b0110000),
    ("!D", 0b0001101),
    ("!A", 0b0110001),
    ("-D", 0b0001111),
    ("-A", 0b0110011),
    ("D+1", 0b0011111),
    ("A+1", 0b0110111),
    ("D-1", 0b0001110),
    ("A-1", 0b0110010),
    ("D+A", 0b0000010),
    ("D-A", 0b0010011),
    ("A-D", 0b0000111),
    ("D&A", 0b0000000),
    ("D|A", 0b0010101),
    ("M", 0b1110000),
    ("!M", 0b1110001),
    ("-M", 0b1110011),
    ("M+1", 0b1110111),
    ("M-1", 0b1110010),
    ("D+M", 0b1000010),
    ("D-M", 0b1010011),
    ("M-D", 0b1000111),
    ("D&M", 0b1000000),
    ("D|M", 0b1010101),
];

/// Commutative spellings accepted in addition to the canonical ones.
const COMP_ALIASES: [(&str, &str); 6] = [
    ("A+D", "D+A"),
    ("M+D", "D+M"),
    ("A&D", "D&A"),
    ("M&D", "D&M"),
    ("A|D", "D|A"),
    ("M|D", "D|M"),
];

/// Returns the 7-bit field for a computation mnemonic.
pub fn comp_bits(mnemonic: &str) -> Option<u16> {
    let canonical = COMP_ALIASES
        .iter()
        .find(|(alias, _)| *alias == mnemonic)
        .map_or(mnemonic, |(_, canonical)| *canonical);

    COMP_TABLE.iter().find(|(key, _)| *key == canonical).map(|(_, bits)| *bits)
}

/// Returns the 3-bit field for a jump mnemonic.
pub fn jump_bits(mnemonic: &str) -> Option<u16> {
    match mnemonic {
        "JGT" => Some(0b001),
        "JEQ" => Some(0b010),
        "JGE" => Some(0b011),
        "JLT" => Some(0b100),
        "JNE" => Some(0b101),
        "JLE" => Some(0b110),
        "JMP" => Some(0b111),
        _ => None,
    }
}

/// Assembles one command. Labels produce no instruction.
pub fn encode(cmd: &Command) -> Result<Option<String>, EncodingError> {
    match cmd {
        Command::Label(_) => Ok(None),
        Command::Address(Address::Resolved(value)) => {
            if *value > MAX_ADDRESS {
                return Err(EncodingError::AddressOutOfRange { value: *value, command: cmd.to_string() });
            }
            Ok(Some(format!("0{:015b}", value)))
        }
        Command::Address(Address::Pending(symbol)) => {
            Err(EncodingError::UnresolvedSymbol { symbol: symbol.clone() })
        }
        Command::Compute(comp) => {
            let c = comp_bits(&comp.comp).ok_or_else(|| EncodingError::UnknownComputation {
                mnemonic: comp.comp.clone(),
                command: cmd.to_string(),
            })?;
            // Jumps the lexer did not recognize never reach here, so a
            // missing entry means no jump.
            let j = comp.jump.as_deref().and_then(jump_bits).unwrap_or(0b000);
            let word = (COMPUTE_PREFIX << 13) | (c << 6) | (comp.dest.to_u16() << 3) | j;
            Ok(Some(format!("{:016b}", word)))
        }
    }
}

/// Assembles a resolved program. Nothing is returned unless every command
/// encodes.
pub fn encode_program(program: &Program) -> Result<Vec<String>, EncodingError> {
    let mut out = Vec::with_capacity(program.len());
    for cmd in program.iter() {
        if let Some(word) = encode(cmd)? {
            debug!("{:<16} => {}", cmd.to_string(), word);
            out.push(word);
        }
    }

    info!("Encoded {} instruction(s).", out.len());
    Ok(out)
}
