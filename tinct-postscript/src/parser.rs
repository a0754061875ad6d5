//! Parsing calculator programs into flat bytecode.
//!
//! Conditionals are resolved into jumps over absolute instruction indices, so
//! that the program can be executed without any nesting:
//!
//! ```text
//! { cond } if            -> JumpIfZero(end) cond
//! { t } { f } ifelse     -> JumpIfZero(f_start) t Jump(end) f
//! ```

use crate::error::SyntaxError;
use crate::lexer::{Lexer, Token};
use crate::op::PostScriptOp;

/// A single instruction of a parsed program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instr {
    /// Push a number.
    Number(f64),
    /// Apply an operator.
    Op(PostScriptOp),
    /// Continue execution at the given index.
    Jump(usize),
    /// Pop a value and continue at the given index if it is falsy.
    JumpIfZero(usize),
}

pub(crate) fn parse(data: &[u8]) -> Result<Vec<Instr>, SyntaxError> {
    let mut parser = Parser::new(Lexer::new(data))?;

    parser.expect(Token::LBrace)?;
    parser.parse_block()?;
    parser.finish()
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    token: Token,
    code: Vec<Instr>,
}

impl<'a> Parser<'a> {
    fn new(mut lexer: Lexer<'a>) -> Result<Self, SyntaxError> {
        let token = lexer.next_token()?;

        Ok(Self {
            lexer,
            token,
            code: vec![],
        })
    }

    fn advance(&mut self) -> Result<Token, SyntaxError> {
        let next = self.lexer.next_token()?;
        Ok(core::mem::replace(&mut self.token, next))
    }

    fn accept(&mut self, token: Token) -> Result<bool, SyntaxError> {
        if self.token == token {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, token: Token) -> Result<(), SyntaxError> {
        if self.accept(token)? {
            Ok(())
        } else if self.token == Token::Eof {
            Err(SyntaxError::UnexpectedEof)
        } else {
            Err(SyntaxError::UnexpectedToken {
                found: self.token.kind(),
                expected: token.kind(),
            })
        }
    }

    /// Check for the closing brace without reading past it, anything after the
    /// program is ignored.
    fn finish(self) -> Result<Vec<Instr>, SyntaxError> {
        match self.token {
            Token::RBrace => Ok(self.code),
            Token::Eof => Err(SyntaxError::UnexpectedEof),
            found => Err(SyntaxError::UnexpectedToken {
                found: found.kind(),
                expected: Token::RBrace.kind(),
            }),
        }
    }

    fn parse_block(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.token {
                Token::Number(n) => {
                    self.advance()?;
                    self.code.push(Instr::Number(n));
                }
                Token::Operator(op) => {
                    self.advance()?;
                    self.code.push(Instr::Op(op));
                }
                Token::LBrace => {
                    self.advance()?;
                    self.parse_conditional()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn parse_conditional(&mut self) -> Result<(), SyntaxError> {
        let condition = self.code.len();
        // Patched once we know where the guarded block ends.
        self.code.push(Instr::JumpIfZero(usize::MAX));

        self.parse_block()?;
        self.expect(Token::RBrace)?;

        if self.accept(Token::If)? {
            self.code[condition] = Instr::JumpIfZero(self.code.len());
        } else if self.accept(Token::LBrace)? {
            let jump = self.code.len();
            self.code.push(Instr::Jump(usize::MAX));
            let false_start = self.code.len();

            self.parse_block()?;
            self.expect(Token::RBrace)?;

            if !self.accept(Token::IfElse)? {
                return Err(SyntaxError::MalformedConditional);
            }

            self.code[jump] = Instr::Jump(self.code.len());
            self.code[condition] = Instr::JumpIfZero(false_start);
        } else {
            return Err(SyntaxError::MalformedConditional);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_program() {
        assert_eq!(parse(b"{}").unwrap(), vec![]);
    }

    #[test]
    fn numbers_and_operators() {
        assert_eq!(
            parse(b"{ 999 -3.3 sub }").unwrap(),
            vec![
                Instr::Number(999.0),
                Instr::Number(-3.3),
                Instr::Op(PostScriptOp::Sub)
            ]
        );
    }

    #[test]
    fn if_statement() {
        assert_eq!(
            parse(b"{ { 99 } if }").unwrap(),
            vec![Instr::JumpIfZero(2), Instr::Number(99.0)]
        );
    }

    #[test]
    fn ifelse_statement() {
        assert_eq!(
            parse(b"{ { 99 } { 44 } ifelse }").unwrap(),
            vec![
                Instr::JumpIfZero(3),
                Instr::Number(99.0),
                Instr::Jump(4),
                Instr::Number(44.0),
            ]
        );
    }

    #[test]
    fn nested_conditionals() {
        assert_eq!(
            parse(b"{ 1 { 1 { 77 } if } if }").unwrap(),
            vec![
                Instr::Number(1.0),
                Instr::JumpIfZero(5),
                Instr::Number(1.0),
                Instr::JumpIfZero(5),
                Instr::Number(77.0),
            ]
        );
    }

    #[test]
    fn clamp_idiom() {
        assert_eq!(
            parse(b"{ dup 1 gt { pop 1 } if }").unwrap(),
            vec![
                Instr::Op(PostScriptOp::Dup),
                Instr::Number(1.0),
                Instr::Op(PostScriptOp::Gt),
                Instr::JumpIfZero(6),
                Instr::Op(PostScriptOp::Pop),
                Instr::Number(1.0),
            ]
        );
    }

    #[test]
    fn missing_brackets() {
        assert_eq!(parse(b"{"), Err(SyntaxError::UnexpectedEof));
        assert_eq!(parse(b""), Err(SyntaxError::UnexpectedEof));
        assert_eq!(parse(b"{ { 1 } "), Err(SyntaxError::MalformedConditional));
        assert!(parse(b"1 add }").is_err());
    }

    #[test]
    fn malformed_conditional() {
        assert_eq!(
            parse(b"{ { 1 } add }"),
            Err(SyntaxError::MalformedConditional)
        );
        assert_eq!(
            parse(b"{ { 1 } { 2 } if }"),
            Err(SyntaxError::MalformedConditional)
        );
    }

    #[test]
    fn junk_after_the_end() {
        assert_eq!(parse(b"{ 3.3 }#").unwrap(), vec![Instr::Number(3.3)]);
    }
}
