//! The Parser module takes a token stream (Vec<Token>) from the Tokenizer
//! and converts it into a Program.
use std::num::IntErrorKind;

use super::ast::*;
use super::error::ParseError;
use super::lexer::{Token, TokenKind};

/// How far past a leading register the parser looks for `=` before
/// deciding the register starts the computation. Spans `ADM=`.
const DEST_LOOKAHEAD: usize = 3;

pub struct Parser<'a> {
    tokens: &'a [Token],
    cursor: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser { tokens, cursor: 0 }
    }

    /// Run the parser, consuming itself and returning the program.
    /// The first grammar violation aborts the whole parse.
    pub fn run(mut self) -> Result<Program, ParseError> {
        let mut program = Program::with_capacity(self.tokens.len() / 3);

        while let Some(cmd) = self.statement()? {
            debug!("parsed {}", cmd);
            program.push(cmd);
        }

        info!("Parsed {} command(s).", program.len());
        Ok(program)
    }

    /// Consumes the tokens of one statement to produce a Command.
    /// Returns None once the stream is exhausted.
    fn statement(&mut self) -> Result<Option<Command>, ParseError> {
        let tok = match self.peek() {
            Some(tok) => tok,
            None => return Ok(None),
        };

        match tok.kind {
            TokenKind::Label => self.label().map(Some),
            TokenKind::At => self.address().map(Some),
            TokenKind::Location | TokenKind::Operator | TokenKind::Number => self.compute().map(Some),
            // A trailing end marker with nothing behind it closes the program.
            TokenKind::End if self.cursor + 1 == self.tokens.len() => {
                self.consume();
                Ok(None)
            }
            _ => Err(unexpected(tok, "`@`, `(` or a computation")),
        }
    }

    fn label(&mut self) -> Result<Command, ParseError> {
        self.expect(TokenKind::Label, "label marker `(`")?;
        let symbol = self.expect(TokenKind::Symbol, "label name")?.value.clone();
        self.expect(TokenKind::End, "end of statement after label")?;
        Ok(Command::Label(symbol))
    }

    fn address(&mut self) -> Result<Command, ParseError> {
        self.expect(TokenKind::At, "`@`")?;

        let tok = self.next("address or symbol")?;
        let addr = match tok.kind {
            TokenKind::Address => match tok.value.parse::<u32>() {
                Ok(value) => Address::Resolved(value),
                // Too wide for any address; the encoder's range check
                // reports it.
                Err(e) if *e.kind() == IntErrorKind::PosOverflow => Address::Resolved(u32::MAX),
                Err(_) => {
                    return Err(ParseError::InvalidAddress { line: tok.line, value: tok.value.clone() })
                }
            },
            TokenKind::Symbol => Address::Pending(tok.value.clone()),
            _ => return Err(unexpected(tok, "address or symbol")),
        };

        self.expect(TokenKind::End, "end of statement after address")?;
        Ok(Command::Address(addr))
    }

    /// `[dest=]comp[;jump]`
    ///
    /// A leading register is ambiguous: it may open the destination list or
    /// the computation. An `=` within the lookahead window settles it.
    fn compute(&mut self) -> Result<Command, ParseError> {
        let mut cmd = Compute::default();

        if self.peek_kind() == Some(TokenKind::Location) && self.assign_ahead() {
            cmd.dest = self.dest()?;
        }
        cmd.comp = self.comp()?;

        if self.peek_kind() == Some(TokenKind::Jump) {
            cmd.jump = self.consume().map(|tok| tok.value.clone());
        }

        self.expect(TokenKind::End, "jump or end of statement")?;
        Ok(Command::Compute(cmd))
    }

    /// Accumulates destination registers up to and including the `=`.
    fn dest(&mut self) -> Result<Dest, ParseError> {
        let mut dest = Dest::default();

        loop {
            let tok = self.next("destination register or `=`")?;
            match tok.kind {
                TokenKind::Location => match tok.value.as_str() {
                    "A" => dest.a = true,
                    "D" => dest.d = true,
                    "M" => dest.m = true,
                    _ => {
                        return Err(ParseError::InvalidDestination { line: tok.line, value: tok.value.clone() })
                    }
                },
                TokenKind::Assign => return Ok(dest),
                _ => return Err(unexpected(tok, "destination register or `=`")),
            }
        }
    }

    /// One or more register, operator or constant tokens, concatenated as
    /// written.
    fn comp(&mut self) -> Result<String, ParseError> {
        let mut comp = String::new();

        while let Some(TokenKind::Location) | Some(TokenKind::Operator) | Some(TokenKind::Number) = self.peek_kind() {
            if let Some(tok) = self.consume() {
                comp.push_str(&tok.value);
            }
        }

        if comp.is_empty() {
            let expected = "computation";
            return match self.peek() {
                Some(tok) => Err(unexpected(tok, expected)),
                None => Err(ParseError::UnexpectedEof { expected }),
            };
        }
        Ok(comp)
    }

    /// Looks for an `=` in the next few tokens of the current statement.
    fn assign_ahead(&self) -> bool {
        self.tokens[self.cursor..]
            .iter()
            .skip(1)
            .take(DEST_LOOKAHEAD)
            .take_while(|tok| tok.kind != TokenKind::End)
            .any(|tok| tok.kind == TokenKind::Assign)
    }

    /// Consumes a token that must be of the given kind.
    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<&'a Token, ParseError> {
        let tok = self.next(expected)?;
        if tok.kind == kind {
            Ok(tok)
        } else {
            Err(unexpected(tok, expected))
        }
    }

    /// Consumes a token, failing if none are left.
    fn next(&mut self, expected: &'static str) -> Result<&'a Token, ParseError> {
        self.consume().ok_or(ParseError::UnexpectedEof { expected })
    }

    /// Pops a token off the input stream and returns it.
    /// Returns None if no tokens are left.
    #[inline]
    fn consume(&mut self) -> Option<&'a Token> {
        let tok = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(tok)
    }

    #[inline]
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.cursor)
    }

    #[inline]
    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|tok| tok.kind)
    }
}

fn unexpected(tok: &Token, expected: &'static str) -> ParseError {
    ParseError::UnexpectedToken { line: tok.line, found: tok.to_string(), expected }
}

/// Parses a complete token stream.
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    Parser::new(tokens).run()
}
