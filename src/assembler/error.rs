//! Error types for each stage of the assembler.
//!
//! Every stage has its own error enum so a diagnostic always names the
//! stage that failed. `Error` wraps all of them for callers that run the
//! whole pipeline.
use thiserror::Error;

/// Raised while turning a source line into tokens.
#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum LexError {
    #[error("line {line}: unrecognized statement `{text}`, expected `@value`, `(label)` or `dest=comp;jump`")]
    UnrecognizedStatement { line: usize, text: String },

    #[error("line {line}: unexpected character `{ch}` in `{text}`")]
    UnexpectedChar { line: usize, ch: char, text: String },

    #[error("line {line}: malformed label `{text}`, expected `(symbol)`")]
    MalformedLabel { line: usize, text: String },

    #[error("line {line}: malformed address command `{text}`, expected `@number` or `@symbol`")]
    MalformedAddress { line: usize, text: String },
}

/// Raised while recognizing statements in the token stream.
#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum ParseError {
    #[error("line {line}: unexpected {found}, expected {expected}")]
    UnexpectedToken {
        line: usize,
        found: String,
        expected: &'static str,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("line {line}: invalid address literal `{value}`")]
    InvalidAddress { line: usize, value: String },

    #[error("line {line}: invalid destination register `{value}`, expected A, D or M")]
    InvalidDestination { line: usize, value: String },
}

/// Raised while turning resolved commands into machine words.
#[derive(Error, Clone, PartialEq, Eq, Debug)]
pub enum EncodingError {
    #[error("unknown computation `{mnemonic}` in `{command}`")]
    UnknownComputation { mnemonic: String, command: String },

    #[error("address {value} in `{command}` does not fit in 15 bits")]
    AddressOutOfRange { value: u32, command: String },

    #[error("unresolved symbol `{symbol}`")]
    UnresolvedSymbol { symbol: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("lexer error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    #[error("{0}: {1}")]
    Io(String, #[source] std::io::Error),
}
