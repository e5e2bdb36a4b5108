//! This lexer tokenizes Hack assembly.
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use super::error::LexError;

/// Valid symbol names: letters, digits, `_`, `.`, `$` and `:`, never
/// starting with a digit.
static SYMBOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_.$:][A-Za-z0-9_.$:]*$").unwrap());

const JUMPS: [&str; 7] = ["JGT", "JEQ", "JGE", "JLT", "JNE", "JLE", "JMP"];

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// `A`, `D` or `M`
    Location,
    /// `=`
    Assign,
    /// `+ - ! & |`
    Operator,
    /// `0` or `1`
    Number,
    /// One of the seven jump mnemonics.
    Jump,
    /// `@`
    At,
    Symbol,
    /// Decimal operand of an address command.
    Address,
    /// `(`
    Label,
    /// Terminates every statement.
    End,
}

// Tokens carry the line they appear on for diagnostics.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, line: usize) -> Self {
        Token { kind, value: value.into(), line }
    }

    pub fn end(line: usize) -> Self {
        Token::new(TokenKind::End, "", line)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::End => write!(f, "end of statement"),
            TokenKind::Location => write!(f, "register `{}`", self.value),
            TokenKind::Assign => write!(f, "assignment `=`"),
            TokenKind::Operator => write!(f, "operator `{}`", self.value),
            TokenKind::Number => write!(f, "constant `{}`", self.value),
            TokenKind::Jump => write!(f, "jump `{}`", self.value),
            TokenKind::At => write!(f, "`@`"),
            TokenKind::Symbol => write!(f, "symbol `{}`", self.value),
            TokenKind::Address => write!(f, "address `{}`", self.value),
            TokenKind::Label => write!(f, "label marker `(`"),
        }
    }
}

/// Hack supports a single statement per line.
/// Each line's tokens are appended to one stream and closed with an
/// End token, so the parser never needs to know about lines.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens: Vec<Token> = Vec::with_capacity(256);
    let mut line_count: usize = 0;

    // Line numbers are 1-based in diagnostics.
    for (index, line) in source.lines().enumerate() {
        let mut toks = tokenize_line(line, index + 1)?;
        tokens.append(&mut toks);
        line_count += 1;
    }

    info!("Tokenized {} line(s) into {} token(s).", line_count, tokens.len());
    Ok(tokens)
}

/// Tokenizes one line. Blank and comment-only lines produce no tokens.
pub fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, LexError> {
    let s = clean(line);
    if s.is_empty() {
        return Ok(Vec::new());
    }

    let tokens = if s.starts_with('@') {
        lex_address(s, line_num)?
    } else if s.starts_with('(') {
        lex_label(s, line_num)?
    } else if s.contains('=') || s.contains(';') {
        lex_compute(s, line_num)?
    } else {
        return Err(LexError::UnrecognizedStatement { line: line_num, text: s.to_owned() });
    };

    for tok in tokens.iter() {
        trace!("line {}: {:?} {:?}", line_num, tok.kind, tok.value);
    }
    Ok(tokens)
}

/// Strips any `//` comment and surrounding whitespace.
fn clean(line: &str) -> &str {
    match line.find("//") {
        Some(idx) => line[..idx].trim(),
        None => line.trim(),
    }
}

fn lex_address(s: &str, line: usize) -> Result<Vec<Token>, LexError> {
    let operand = &s[1..];
    let kind = if !operand.is_empty() && operand.chars().all(|c| c.is_ascii_digit()) {
        TokenKind::Address
    } else if SYMBOL.is_match(operand) {
        TokenKind::Symbol
    } else {
        return Err(LexError::MalformedAddress { line, text: s.to_owned() });
    };

    Ok(vec![
        Token::new(TokenKind::At, "@", line),
        Token::new(kind, operand, line),
        Token::end(line),
    ])
}

fn lex_label(s: &str, line: usize) -> Result<Vec<Token>, LexError> {
    // The closing paren must be the final character, and the name between
    // the two must be a plain symbol.
    if !s.ends_with(')') || s.len() < 2 {
        return Err(LexError::MalformedLabel { line, text: s.to_owned() });
    }
    let symbol = &s[1..s.len() - 1];
    if !SYMBOL.is_match(symbol) {
        return Err(LexError::MalformedLabel { line, text: s.to_owned() });
    }

    Ok(vec![
        Token::new(TokenKind::Label, "(", line),
        Token::new(TokenKind::Symbol, symbol, line),
        Token::end(line),
    ])
}

fn lex_compute(s: &str, line: usize) -> Result<Vec<Token>, LexError> {
    let (comp, jump) = match s.find(';') {
        Some(idx) => (&s[..idx], Some(&s[idx + 1..])),
        None => (s, None),
    };

    // Every character of the comp part becomes exactly one token.
    let mut out: Vec<Token> = Vec::with_capacity(comp.len() + 2);
    for c in comp.chars() {
        let kind = match c {
            '=' => TokenKind::Assign,
            '0' | '1' => TokenKind::Number,
            '+' | '-' | '!' | '&' | '|' => TokenKind::Operator,
            'A' | 'D' | 'M' => TokenKind::Location,
            _ => return Err(LexError::UnexpectedChar { line, ch: c, text: s.to_owned() }),
        };
        out.push(Token::new(kind, c.to_string(), line));
    }

    if let Some(jump) = jump {
        if JUMPS.contains(&jump) {
            out.push(Token::new(TokenKind::Jump, jump, line));
        } else if !jump.is_empty() {
            warn!("line {}: ignoring unknown jump `{}` in `{}`", line, jump, s);
        }
    }

    out.push(Token::end(line));
    Ok(out)
}
