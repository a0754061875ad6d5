//! Tokenizing calculator programs.

use crate::error::{SyntaxError, bail};
use crate::op::PostScriptOp;
use crate::reader::Reader;

/// A token of the calculator language.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Token {
    LBrace,
    RBrace,
    Number(f64),
    Operator(PostScriptOp),
    If,
    IfElse,
    Eof,
}

impl Token {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Number(_) => "number",
            Self::Operator(_) => "operator",
            Self::If => "'if'",
            Self::IfElse => "'ifelse'",
            Self::Eof => "end of program",
        }
    }
}

pub(crate) struct Lexer<'a> {
    reader: Reader<'a>,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self {
            reader: Reader::new(data),
        }
    }

    pub(crate) fn next_token(&mut self) -> Result<Token, SyntaxError> {
        let r = &mut self.reader;
        r.skip_white_spaces_and_comments();

        let Some(b) = r.peek_byte() else {
            return Ok(Token::Eof);
        };

        match b {
            b'{' => {
                r.forward();
                Ok(Token::LBrace)
            }
            b'}' => {
                r.forward();
                Ok(Token::RBrace)
            }
            b'0'..=b'9' | b'+' | b'-' | b'.' => self.read_number().map(Token::Number),
            b if b.is_ascii_alphabetic() => self.read_operator(),
            b => Err(SyntaxError::UnexpectedCharacter(b)),
        }
    }

    fn read_number(&mut self) -> Result<f64, SyntaxError> {
        let r = &mut self.reader;
        let start = r.offset();

        if matches!(r.peek_byte(), Some(b'+' | b'-')) {
            r.forward();
        }

        let digits_start = r.offset();
        r.forward_while(|b| b.is_ascii_digit());
        let mut num_digits = r.offset() - digits_start;

        if r.peek_byte() == Some(b'.') {
            r.forward();
            let fraction_start = r.offset();
            r.forward_while(|b| b.is_ascii_digit());
            num_digits += r.offset() - fraction_start;
        }

        // A second sign or decimal point can't start a new token, so the
        // literal as a whole is malformed.
        if num_digits == 0 || matches!(r.peek_byte(), Some(b'+' | b'-' | b'.')) {
            bail!(SyntaxError::InvalidNumber);
        }

        let token = r
            .range(start..r.offset())
            .ok_or(SyntaxError::InvalidNumber)?;
        let str = core::str::from_utf8(token).map_err(|_| SyntaxError::InvalidNumber)?;

        str.parse::<f64>().map_err(|_| SyntaxError::InvalidNumber)
    }

    fn read_operator(&mut self) -> Result<Token, SyntaxError> {
        let r = &mut self.reader;
        let start = r.offset();
        r.forward_while(|b| b.is_ascii_alphabetic());

        let name = r.range(start..r.offset()).ok_or(SyntaxError::UnexpectedEof)?;

        if name.eq_ignore_ascii_case(b"if") {
            Ok(Token::If)
        } else if name.eq_ignore_ascii_case(b"ifelse") {
            Ok(Token::IfElse)
        } else {
            PostScriptOp::from_name(name)
                .map(Token::Operator)
                .ok_or(SyntaxError::UnknownOperator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &[u8]) -> Result<Vec<Token>, SyntaxError> {
        let mut lexer = Lexer::new(input);
        let mut out = vec![];

        loop {
            let token = lexer.next_token()?;
            if token == Token::Eof {
                return Ok(out);
            }
            out.push(token);
        }
    }

    #[test]
    fn numbers() {
        assert_eq!(
            tokens(b"999 -999 3.3 +1 .5 -.25 5.").unwrap(),
            vec![
                Token::Number(999.0),
                Token::Number(-999.0),
                Token::Number(3.3),
                Token::Number(1.0),
                Token::Number(0.5),
                Token::Number(-0.25),
                Token::Number(5.0),
            ]
        );
    }

    #[test]
    fn invalid_numbers() {
        assert_eq!(tokens(b"-"), Err(SyntaxError::InvalidNumber));
        assert_eq!(tokens(b"."), Err(SyntaxError::InvalidNumber));
        assert_eq!(tokens(b"1.2.3"), Err(SyntaxError::InvalidNumber));
        assert_eq!(tokens(b"4-2"), Err(SyntaxError::InvalidNumber));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(
            tokens(b"if IF IfElse ifelse").unwrap(),
            vec![Token::If, Token::If, Token::IfElse, Token::IfElse]
        );
    }

    #[test]
    fn operators_and_braces() {
        assert_eq!(
            tokens(b"{ dup 2 exch }").unwrap(),
            vec![
                Token::LBrace,
                Token::Operator(PostScriptOp::Dup),
                Token::Number(2.0),
                Token::Operator(PostScriptOp::Exch),
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn operator_directly_after_number() {
        assert_eq!(
            tokens(b"2dup").unwrap(),
            vec![Token::Number(2.0), Token::Operator(PostScriptOp::Dup)]
        );
    }

    #[test]
    fn comments_skipped() {
        assert_eq!(
            tokens(b"% a comment\n{ 1 % trailing\n}").unwrap(),
            vec![Token::LBrace, Token::Number(1.0), Token::RBrace]
        );
    }

    #[test]
    fn unknown_operator() {
        assert_eq!(tokens(b"{ frobnicate }"), Err(SyntaxError::UnknownOperator));
        assert_eq!(tokens(b"{ # }"), Err(SyntaxError::UnexpectedCharacter(b'#')));
    }
}
