//! Symbol resolution.
//!
//! Labels are collected over the whole program first so that forward
//! references work; a second walk then substitutes every pending address
//! command, allocating RAM slots for symbols that are neither predefined
//! nor labels.
use std::collections::HashMap;

use super::ast::*;

/// First RAM slot handed out to user variables.
pub const FIRST_VARIABLE: u32 = 16;

const PREDEFINED: [(&str, u32); 23] = [
    ("SP", 0),
    ("LCL", 1),
    ("ARG", 2),
    ("THIS", 3),
    ("THAT", 4),
    ("R0", 0),
    ("R1", 1),
    ("R2", 2),
    ("R3", 3),
    ("R4", 4),
    ("R5", 5),
    ("R6", 6),
    ("R7", 7),
    ("R8", 8),
    ("R9", 9),
    ("R10", 10),
    ("R11", 11),
    ("R12", 12),
    ("R13", 13),
    ("R14", 14),
    ("R15", 15),
    ("SCREEN", 16384),
    ("KBD", 24576),
];

#[derive(Clone, Debug)]
pub struct SymbolTable {
    table: HashMap<String, u32>,
    next_variable: u32,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Creates a table holding only the architecture's predefined symbols.
    pub fn new() -> Self {
        let table = PREDEFINED.iter().map(|(name, addr)| (name.to_string(), *addr)).collect();
        SymbolTable { table, next_variable: FIRST_VARIABLE }
    }

    pub fn get(&self, symbol: &str) -> Option<u32> {
        self.table.get(symbol).copied()
    }

    /// Binds a label to an instruction position. Redefinition replaces the
    /// previous binding.
    pub fn define_label(&mut self, symbol: &str, position: u32) {
        if let Some(old) = self.table.insert(symbol.to_owned(), position) {
            warn!("label `{}` redefined: {} -> {}", symbol, old, position);
        }
    }

    /// Returns the address bound to `symbol`, binding it to the next free
    /// variable slot first if it is unknown.
    pub fn resolve_or_allocate(&mut self, symbol: &str) -> u32 {
        if let Some(addr) = self.get(symbol) {
            return addr;
        }
        let addr = self.next_variable;
        self.table.insert(symbol.to_owned(), addr);
        self.next_variable += 1;
        debug!("allocated variable `{}` at {}", symbol, addr);
        addr
    }

    /// All bindings, ordered by address then name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        let mut entries: Vec<(&str, u32)> = self.table.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        entries.into_iter()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }
}

/// Pass 1: bind every label to the position of the instruction after it.
/// Labels consume no position.
pub fn collect_labels(program: &Program, symbols: &mut SymbolTable) {
    let mut position: u32 = 0;
    for cmd in program.iter() {
        match cmd {
            Command::Label(symbol) => symbols.define_label(symbol, position),
            Command::Address(_) | Command::Compute(_) => position += 1,
        }
    }
}

/// Pass 2: substitute every pending address, allocating variables in
/// first-occurrence order.
pub fn substitute(program: &mut Program, symbols: &mut SymbolTable) {
    for cmd in program.iter_mut() {
        if let Command::Address(addr) = cmd {
            if let Address::Pending(symbol) = addr {
                let value = symbols.resolve_or_allocate(symbol);
                *addr = Address::Resolved(value);
            }
        }
    }
}

/// Runs both passes over the program, leaving every address command
/// resolved. Returns the final symbol table.
pub fn resolve(program: &mut Program) -> SymbolTable {
    let mut symbols = SymbolTable::new();
    collect_labels(program, &mut symbols);
    substitute(program, &mut symbols);
    info!("Resolved {} symbol(s).", symbols.len());
    symbols
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(symbol: &str) -> Command {
        Command::Address(Address::Pending(symbol.to_owned()))
    }

    fn resolved(value: u32) -> Command {
        Command::Address(Address::Resolved(value))
    }

    fn jmp() -> Command {
        Command::Compute(Compute { comp: "0".to_owned(), jump: Some("JMP".to_owned()), ..Default::default() })
    }

    #[test]
    fn test_predefined() {
        let symbols = SymbolTable::new();
        assert_eq!(symbols.len(), 23);
        assert_eq!(symbols.get("SP"), Some(0));
        assert_eq!(symbols.get("LCL"), Some(1));
        assert_eq!(symbols.get("ARG"), Some(2));
        assert_eq!(symbols.get("THIS"), Some(3));
        assert_eq!(symbols.get("THAT"), Some(4));
        for i in 0..=15u32 {
            assert_eq!(symbols.get(&format!("R{}", i)), Some(i));
        }
        assert_eq!(symbols.get("SCREEN"), Some(16384));
        assert_eq!(symbols.get("KBD"), Some(24576));
        assert_eq!(symbols.get("R16"), None);
    }

    #[test]
    fn test_label_at_start() {
        let mut program = vec![Command::Label("LOOP".to_owned()), pending("LOOP"), jmp()];
        let symbols = resolve(&mut program);
        assert_eq!(symbols.get("LOOP"), Some(0));
        assert_eq!(program[1], resolved(0));
    }

    #[test]
    fn test_forward_reference() {
        let mut program = vec![
            pending("END"),
            jmp(),
            resolved(3),
            Command::Label("END".to_owned()),
            Command::Label("ALSO_END".to_owned()),
            pending("ALSO_END"),
            jmp(),
        ];
        let symbols = resolve(&mut program);
        assert_eq!(symbols.get("END"), Some(3));
        assert_eq!(symbols.get("ALSO_END"), Some(3));
        assert_eq!(program[0], resolved(3));
        assert_eq!(program[5], resolved(3));
    }

    #[test]
    fn test_variable_allocation() {
        let mut program = vec![pending("foo"), pending("bar"), pending("foo"), pending("KBD")];
        let symbols = resolve(&mut program);
        assert_eq!(program, vec![resolved(16), resolved(17), resolved(16), resolved(24576)]);
        assert_eq!(symbols.get("foo"), Some(16));
        assert_eq!(symbols.get("bar"), Some(17));
    }

    #[test]
    fn test_labels_are_not_variables() {
        let mut program = vec![pending("i"), pending("LOOP"), Command::Label("LOOP".to_owned()), pending("j")];
        resolve(&mut program);
        assert_eq!(program[0], resolved(16));
        assert_eq!(program[1], resolved(2));
        assert_eq!(program[3], resolved(17));
    }

    #[test]
    fn test_label_redefinition_last_wins() {
        let mut program = vec![Command::Label("X".to_owned()), jmp(), Command::Label("X".to_owned()), pending("X")];
        let symbols = resolve(&mut program);
        assert_eq!(symbols.get("X"), Some(1));
        assert_eq!(program[3], resolved(1));
    }

    #[test]
    fn test_deterministic() {
        let source = vec![pending("c"), pending("a"), pending("b"), pending("a")];
        let mut first = source.clone();
        let mut second = source;
        resolve(&mut first);
        resolve(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn test_iter_order() {
        let mut symbols = SymbolTable::new();
        symbols.resolve_or_allocate("x");
        let entries: Vec<(&str, u32)> = symbols.iter().collect();
        assert_eq!(entries[0], ("R0", 0));
        assert_eq!(entries[1], ("SP", 0));
        assert_eq!(entries.last(), Some(&("KBD", 24576)));
        assert!(entries.contains(&("x", 16)));
    }
}
