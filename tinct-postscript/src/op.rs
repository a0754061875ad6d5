//! The operators of the calculator language.

use core::fmt;

/// An operator of the calculator language.
///
/// Names are resolved into this enum once, while lexing, so that neither the
/// interpreter nor the compiler ever dispatch on strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostScriptOp {
    /// `num1 abs`
    Abs,
    /// `num1 num2 add`
    Add,
    /// `num den atan`: the angle of the vector `(den, num)` in degrees,
    /// within `[0, 360)`. Takes two operands, unlike a plain arctangent.
    Atan,
    /// `num1 ceiling`
    Ceiling,
    /// `angle cos`, with the angle in degrees rather than radians.
    Cos,
    /// `num cvi`
    Cvi,
    /// `num cvr`
    Cvr,
    /// `num1 num2 div`
    Div,
    /// `base exponent exp`
    Exp,
    /// `num1 floor`
    Floor,
    /// `int1 int2 idiv`
    Idiv,
    /// `num ln`
    Ln,
    /// `num log`
    Log,
    /// `int1 int2 mod`
    Mod,
    /// `num1 num2 mul`
    Mul,
    /// `num1 neg`
    Neg,
    /// `num1 round`
    Round,
    /// `angle sin`, with the angle in degrees rather than radians.
    Sin,
    /// `num sqrt`
    Sqrt,
    /// `num1 num2 sub`
    Sub,
    /// `num1 truncate`
    Truncate,
    /// `any1 any2 and`
    And,
    /// `int1 shift bitshift`: shifts left for a positive `shift` and right for
    /// a negative one. The sign of `int1` doesn't pick the direction.
    Bitshift,
    /// `any1 any2 eq`
    Eq,
    /// `false`
    False,
    /// `num1 num2 ge`
    Ge,
    /// `num1 num2 gt`
    Gt,
    /// `num1 num2 le`
    Le,
    /// `num1 num2 lt`
    Lt,
    /// `any1 any2 ne`
    Ne,
    /// `any not`
    Not,
    /// `any1 any2 or`
    Or,
    /// `true`
    True,
    /// `any1 any2 xor`
    Xor,
    /// `any1 .. anyn n copy`
    Copy,
    /// `any dup`
    Dup,
    /// `any1 any2 exch`
    Exch,
    /// `anyn .. any0 n index`
    Index,
    /// `any pop`
    Pop,
    /// `anyn-1 .. any0 n j roll`
    Roll,
}

impl PostScriptOp {
    /// Resolve an operator name. Returns `None` for names outside the language,
    /// including the `if` and `ifelse` keywords, which the lexer handles itself.
    pub fn from_name(name: &[u8]) -> Option<Self> {
        let op = match name {
            b"abs" => Self::Abs,
            b"add" => Self::Add,
            b"atan" => Self::Atan,
            b"ceiling" => Self::Ceiling,
            b"cos" => Self::Cos,
            b"cvi" => Self::Cvi,
            b"cvr" => Self::Cvr,
            b"div" => Self::Div,
            b"exp" => Self::Exp,
            b"floor" => Self::Floor,
            b"idiv" => Self::Idiv,
            b"ln" => Self::Ln,
            b"log" => Self::Log,
            b"mod" => Self::Mod,
            b"mul" => Self::Mul,
            b"neg" => Self::Neg,
            b"round" => Self::Round,
            b"sin" => Self::Sin,
            b"sqrt" => Self::Sqrt,
            b"sub" => Self::Sub,
            b"truncate" => Self::Truncate,
            b"and" => Self::And,
            b"bitshift" => Self::Bitshift,
            b"eq" => Self::Eq,
            b"false" => Self::False,
            b"ge" => Self::Ge,
            b"gt" => Self::Gt,
            b"le" => Self::Le,
            b"lt" => Self::Lt,
            b"ne" => Self::Ne,
            b"not" => Self::Not,
            b"or" => Self::Or,
            b"true" => Self::True,
            b"xor" => Self::Xor,
            b"copy" => Self::Copy,
            b"dup" => Self::Dup,
            b"exch" => Self::Exch,
            b"index" => Self::Index,
            b"pop" => Self::Pop,
            b"roll" => Self::Roll,
            _ => return None,
        };

        Some(op)
    }

    /// The name of the operator as written in a program.
    pub fn name(self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Add => "add",
            Self::Atan => "atan",
            Self::Ceiling => "ceiling",
            Self::Cos => "cos",
            Self::Cvi => "cvi",
            Self::Cvr => "cvr",
            Self::Div => "div",
            Self::Exp => "exp",
            Self::Floor => "floor",
            Self::Idiv => "idiv",
            Self::Ln => "ln",
            Self::Log => "log",
            Self::Mod => "mod",
            Self::Mul => "mul",
            Self::Neg => "neg",
            Self::Round => "round",
            Self::Sin => "sin",
            Self::Sqrt => "sqrt",
            Self::Sub => "sub",
            Self::Truncate => "truncate",
            Self::And => "and",
            Self::Bitshift => "bitshift",
            Self::Eq => "eq",
            Self::False => "false",
            Self::Ge => "ge",
            Self::Gt => "gt",
            Self::Le => "le",
            Self::Lt => "lt",
            Self::Ne => "ne",
            Self::Not => "not",
            Self::Or => "or",
            Self::True => "true",
            Self::Xor => "xor",
            Self::Copy => "copy",
            Self::Dup => "dup",
            Self::Exch => "exch",
            Self::Index => "index",
            Self::Pop => "pop",
            Self::Roll => "roll",
        }
    }
}

impl fmt::Display for PostScriptOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
