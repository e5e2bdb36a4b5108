//! The Assembler module is in charge of taking a
//! Hack assembly file and producing one 16-character
//! binary string per instruction.
//!
//! It does this by implementing a line tokenizer, a
//! small recursive descent parser, a two-pass symbol
//! resolver and a table-driven encoder.

pub mod ast;
pub mod encoder;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod symbols;

pub use error::Error;

/// The result of a successful run: the resolved program, its symbol table
/// and the machine words, in program order.
pub struct Assembly {
    pub program: ast::Program,
    pub symbols: symbols::SymbolTable,
    pub words: Vec<String>,
}

/// Runs the whole pipeline over source text. Every stage consumes the
/// previous stage's complete output, so nothing is produced on failure.
pub fn assemble_program(source: &str) -> Result<Assembly, Error> {
    let tokens = lexer::tokenize(source)?;
    let mut program = parser::parse(&tokens)?;
    let symbols = symbols::resolve(&mut program);
    let words = encoder::encode_program(&program)?;

    Ok(Assembly { program, symbols, words })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble(source: &str) -> Result<Vec<String>, Error> {
        assemble_program(source).map(|asm| asm.words)
    }

    const MAX: &str = "
        // Computes R2 = max(R0, R1)
        @R0
        D=M              // D = first number
        @R1
        D=D-M            // D = first number - second number
        @OUTPUT_FIRST
        D;JGT            // if D>0 (first is greater) goto output_first
        @R1
        D=M              // D = second number
        @OUTPUT_D
        0;JMP            // goto output_d
    (OUTPUT_FIRST)
        @R0
        D=M              // D = first number
    (OUTPUT_D)
        @R2
        M=D              // M[2] = D (greatest number)
    (INFINITE_LOOP)
        @INFINITE_LOOP
        0;JMP            // infinite loop
    ";

    const MAX_HACK: [&str; 16] = [
        "0000000000000000",
        "1111110000010000",
        "0000000000000001",
        "1111010011010000",
        "0000000000001010",
        "1110001100000001",
        "0000000000000001",
        "1111110000010000",
        "0000000000001100",
        "1110101010000111",
        "0000000000000000",
        "1111110000010000",
        "0000000000000010",
        "1110001100001000",
        "0000000000001110",
        "1110101010000111",
    ];

    #[test]
    fn test_max() {
        assert_eq!(assemble(MAX).unwrap(), MAX_HACK.to_vec());
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(assemble(MAX).unwrap(), assemble(MAX).unwrap());
    }

    #[test]
    fn test_label_loop() {
        assert_eq!(
            assemble("(LOOP)\n@LOOP\n0;JMP").unwrap(),
            vec!["0000000000000000", "1110101010000111"]
        );
    }

    #[test]
    fn test_variables() {
        let asm = assemble_program("@foo\nM=1\n@bar\nM=0\n@foo\nD=M").unwrap();
        assert_eq!(asm.words[0], "0000000000010000");
        assert_eq!(asm.words[2], "0000000000010001");
        assert_eq!(asm.words[4], "0000000000010000");
        assert_eq!(asm.symbols.get("foo"), Some(16));
        assert_eq!(asm.symbols.get("bar"), Some(17));
        assert!(asm.program.iter().all(|cmd| !matches!(cmd, ast::Command::Address(ast::Address::Pending(_)))));
    }

    #[test]
    fn test_blank_source() {
        assert_eq!(assemble("").unwrap(), Vec::<String>::new());
        assert_eq!(assemble("\n   \n// nothing here\n").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_stage_errors() {
        assert!(matches!(assemble("(foo"), Err(Error::Lex(_))));
        assert!(matches!(assemble("@"), Err(Error::Lex(_))));
        assert!(matches!(assemble("M+1=D"), Err(Error::Parse(_))));
        assert!(matches!(assemble("D=D+D"), Err(Error::Encoding(_))));
        assert!(matches!(assemble("@32768"), Err(Error::Encoding(_))));
        assert!(matches!(assemble("@99999999999"), Err(Error::Encoding(_))));
        assert!(matches!(assemble("@1\nD=A\n@2\nD=X"), Err(Error::Lex(_))));
    }

    #[test]
    fn test_error_messages() {
        let err = assemble("@1\n(foo").err().unwrap();
        assert_eq!(err.to_string(), "lexer error: line 2: malformed label `(foo`, expected `(symbol)`");

        let err = assemble("D=D+D").err().unwrap();
        assert_eq!(err.to_string(), "encoding error: unknown computation `D+D` in `D=D+D`");
    }
}
