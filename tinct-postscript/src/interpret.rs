//! A bounded stack machine executing parsed programs directly.

use crate::error::ExecutionError;
use crate::log::lerror;
use crate::op::PostScriptOp;
use crate::parser::Instr;
use crate::{Bounds, clamp};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::array;
use std::fmt::{Debug, Formatter};
use std::sync::Mutex;

/// The maximum number of operands the stack can hold.
pub const MAX_STACK_DEPTH: usize = 100;

/// A value on the operand stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// A number.
    Number(f64),
    /// A boolean, as pushed by `true`, `false` and the relational operators.
    Bool(bool),
}

impl Default for Value {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

impl Value {
    /// Whether a conditional jump treats this value as true.
    pub fn as_bool(&self) -> bool {
        match self {
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Bool(b) => *b,
        }
    }

    /// The numeric value, booleans converting to 1 and 0.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

struct ArgumentsStack<T: Default + Copy, const C: usize> {
    stack: [T; C],
    len: usize,
}

impl<T: Default + Copy, const C: usize> ArgumentsStack<T, C> {
    fn new() -> Self {
        Self {
            stack: array::from_fn(|_| T::default()),
            len: 0,
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    #[inline]
    fn push(&mut self, n: T) -> Result<(), ExecutionError> {
        if self.len == C {
            Err(ExecutionError::StackOverflow)
        } else {
            self.stack[self.len] = n;
            self.len += 1;

            Ok(())
        }
    }

    #[inline]
    fn pop(&mut self) -> Result<T, ExecutionError> {
        if self.len == 0 {
            Err(ExecutionError::StackUnderflow)
        } else {
            self.len -= 1;
            Ok(self.stack[self.len])
        }
    }

    #[inline]
    fn items(&self) -> &[T] {
        &self.stack[..self.len]
    }

    #[inline]
    fn items_mut(&mut self) -> &mut [T] {
        &mut self.stack[..self.len]
    }
}

/// The operand stack left behind by a program.
pub struct OperandStack(ArgumentsStack<Value, MAX_STACK_DEPTH>);

impl OperandStack {
    fn new() -> Self {
        Self(ArgumentsStack::new())
    }

    /// The values on the stack, bottom first.
    pub fn values(&self) -> &[Value] {
        self.0.items()
    }

    /// Write the topmost `out.len()` values into `out`.
    pub fn write_outputs(&self, out: &mut [f64]) -> Result<(), ExecutionError> {
        let start = self
            .0
            .len()
            .checked_sub(out.len())
            .ok_or(ExecutionError::MissingOutputs)?;

        for (o, v) in out.iter_mut().zip(&self.0.items()[start..]) {
            *o = v.as_f64();
        }

        Ok(())
    }
}

pub(crate) fn execute(code: &[Instr], inputs: &[f64]) -> Result<OperandStack, ExecutionError> {
    let mut stack = OperandStack::new();

    for input in inputs {
        stack.0.push(Value::Number(*input))?;
    }

    execute_inner(code, &mut stack.0).inspect_err(|e| {
        lerror!("failed to run calculator program: {}", e);
    })?;

    Ok(stack)
}

fn execute_inner(
    code: &[Instr],
    stack: &mut ArgumentsStack<Value, MAX_STACK_DEPTH>,
) -> Result<(), ExecutionError> {
    macro_rules! one_f {
        ($eval:expr) => {{
            let n1 = stack.pop()?.as_f64();
            stack.push(Value::Number($eval(n1)))?;
        }};
    }

    macro_rules! two_f {
        ($eval:expr) => {{
            let n2 = stack.pop()?.as_f64();
            let n1 = stack.pop()?.as_f64();
            stack.push(Value::Number($eval(n1, n2)))?;
        }};
    }

    macro_rules! compare {
        ($eval:expr) => {{
            let n2 = stack.pop()?.as_f64();
            let n1 = stack.pop()?.as_f64();
            stack.push(Value::Bool($eval(n1, n2)))?;
        }};
    }

    macro_rules! logical {
        ($eval_i:expr, $eval_b:expr) => {{
            let n2 = stack.pop()?;
            let n1 = stack.pop()?;

            let res = match (n1, n2) {
                (Value::Bool(b1), Value::Bool(b2)) => Value::Bool($eval_b(b1, b2)),
                _ => Value::Number(
                    $eval_i(to_int32(n1.as_f64()), to_int32(n2.as_f64())) as f64,
                ),
            };

            stack.push(res)?;
        }};
    }

    let mut pc = 0;

    while let Some(instr) = code.get(pc) {
        pc += 1;

        let op = match instr {
            Instr::Number(n) => {
                stack.push(Value::Number(*n))?;
                continue;
            }
            Instr::Jump(target) => {
                pc = *target;
                continue;
            }
            Instr::JumpIfZero(target) => {
                if !stack.pop()?.as_bool() {
                    pc = *target;
                }
                continue;
            }
            Instr::Op(op) => *op,
        };

        match op {
            PostScriptOp::Abs => one_f!(|n: f64| n.abs()),
            PostScriptOp::Add => two_f!(|n1: f64, n2: f64| n1 + n2),
            PostScriptOp::Atan => two_f!(|n1: f64, n2: f64| {
                let res = n1.atan2(n2).to_degrees() % 360.0;
                if res < 0.0 { res + 360.0 } else { res }
            }),
            PostScriptOp::Ceiling => one_f!(|n: f64| n.ceil()),
            PostScriptOp::Cos => one_f!(|n: f64| (n % 360.0).to_radians().cos()),
            PostScriptOp::Cvi => one_f!(|n: f64| to_int32(n) as f64),
            PostScriptOp::Cvr => one_f!(|n: f64| n),
            PostScriptOp::Div => two_f!(|n1: f64, n2: f64| n1 / n2),
            PostScriptOp::Exp => two_f!(|n1: f64, n2: f64| n1.powf(n2)),
            PostScriptOp::Floor => one_f!(|n: f64| n.floor()),
            PostScriptOp::Idiv => two_f!(|n1: f64, n2: f64| to_int32(n1 / n2) as f64),
            PostScriptOp::Ln => one_f!(|n: f64| n.ln()),
            PostScriptOp::Log => one_f!(|n: f64| n.log10()),
            PostScriptOp::Mod => two_f!(|n1: f64, n2: f64| n1 % n2),
            PostScriptOp::Mul => two_f!(|n1: f64, n2: f64| n1 * n2),
            PostScriptOp::Neg => one_f!(|n: f64| -n),
            PostScriptOp::Round => one_f!(round_half_up),
            PostScriptOp::Sin => one_f!(|n: f64| (n % 360.0).to_radians().sin()),
            PostScriptOp::Sqrt => one_f!(|n: f64| n.sqrt()),
            PostScriptOp::Sub => two_f!(|n1: f64, n2: f64| n1 - n2),
            PostScriptOp::Truncate => one_f!(|n: f64| n.trunc()),
            PostScriptOp::And => logical!(|i1: i32, i2: i32| i1 & i2, |b1, b2| b1 && b2),
            PostScriptOp::Or => logical!(|i1: i32, i2: i32| i1 | i2, |b1, b2| b1 || b2),
            PostScriptOp::Xor => logical!(|i1: i32, i2: i32| i1 ^ i2, |b1, b2| b1 != b2),
            PostScriptOp::Bitshift => two_f!(|n1: f64, n2: f64| {
                let num = to_int32(n1);
                let shift = to_int32(n2);

                if shift >= 0 {
                    num.wrapping_shl(shift as u32) as f64
                } else {
                    num.wrapping_shr(shift.unsigned_abs()) as f64
                }
            }),
            PostScriptOp::Eq | PostScriptOp::Ne => {
                let n2 = stack.pop()?;
                let n1 = stack.pop()?;
                let equal = match (n1, n2) {
                    (Value::Number(f1), Value::Number(f2)) => f1 == f2,
                    (Value::Bool(b1), Value::Bool(b2)) => b1 == b2,
                    _ => false,
                };

                stack.push(Value::Bool(equal == (op == PostScriptOp::Eq)))?;
            }
            PostScriptOp::Ge => compare!(|n1: f64, n2: f64| n1 >= n2),
            PostScriptOp::Gt => compare!(|n1: f64, n2: f64| n1 > n2),
            PostScriptOp::Le => compare!(|n1: f64, n2: f64| n1 <= n2),
            PostScriptOp::Lt => compare!(|n1: f64, n2: f64| n1 < n2),
            PostScriptOp::Not => {
                let res = match stack.pop()? {
                    Value::Number(n) => Value::Number(!to_int32(n) as f64),
                    Value::Bool(b) => Value::Bool(!b),
                };

                stack.push(res)?;
            }
            PostScriptOp::True => stack.push(Value::Bool(true))?,
            PostScriptOp::False => stack.push(Value::Bool(false))?,
            PostScriptOp::Copy => {
                let n = count(stack.pop()?)?;
                let start = stack
                    .len()
                    .checked_sub(n)
                    .ok_or(ExecutionError::StackUnderflow)?;

                for i in start..start + n {
                    let item = stack.items()[i];
                    stack.push(item)?;
                }
            }
            PostScriptOp::Dup => {
                let item = stack.pop()?;
                stack.push(item)?;
                stack.push(item)?;
            }
            PostScriptOp::Exch => {
                let n2 = stack.pop()?;
                let n1 = stack.pop()?;

                stack.push(n2)?;
                stack.push(n1)?;
            }
            PostScriptOp::Index => {
                let n = count(stack.pop()?)?;
                let idx = n
                    .checked_add(1)
                    .and_then(|k| stack.len().checked_sub(k))
                    .ok_or(ExecutionError::StackUnderflow)?;
                let item = stack.items()[idx];

                stack.push(item)?;
            }
            PostScriptOp::Pop => {
                stack.pop()?;
            }
            PostScriptOp::Roll => {
                let j = stack.pop()?.as_f64();
                let n = count(stack.pop()?)?;
                let start = stack
                    .len()
                    .checked_sub(n)
                    .ok_or(ExecutionError::StackUnderflow)?;

                roll(&mut stack.items_mut()[start..], j);
            }
        }
    }

    Ok(())
}

/// Rotate `items` by `j` positions towards the top of the stack, using three
/// in-place reversals.
fn roll(items: &mut [Value], j: f64) {
    let n = items.len();

    if n == 0 {
        return;
    }

    let shift = (j.trunc() as i64).rem_euclid(n as i64) as usize;

    items.reverse();
    items[..shift].reverse();
    items[shift..].reverse();
}

/// Read a count operand of `copy`, `index` or `roll`.
fn count(value: Value) -> Result<usize, ExecutionError> {
    let n = value.as_f64().trunc();

    if n < 0.0 || n.is_nan() {
        Err(ExecutionError::RangeCheck)
    } else {
        Ok(n as usize)
    }
}

/// Convert a number to a 32-bit integer, wrapping around on overflow. NaN and
/// infinities become 0.
pub(crate) fn to_int32(n: f64) -> i32 {
    if !n.is_finite() {
        return 0;
    }

    n.trunc().rem_euclid(4_294_967_296.0) as u32 as i32
}

/// Round to the nearest integer, with halves going towards positive infinity.
fn round_half_up(n: f64) -> f64 {
    let floor = n.floor();

    if n - floor >= 0.5 { floor + 1.0 } else { floor }
}

type MemoKey = SmallVec<[u64; 4]>;
type MemoEntry = SmallVec<[f64; 4]>;

/// The default number of distinct inputs an [`Interpreter`] remembers.
pub const DEFAULT_MEMO_CAPACITY: usize = 2048 * 4;

/// Executes a program for a function with a fixed domain and range.
///
/// Shading and gradient evaluation tends to repeat identical inputs, so results
/// are memoized in a bounded table. Once the table is full, new results are not
/// remembered anymore.
pub struct Interpreter {
    code: Vec<Instr>,
    domain: Bounds,
    range: Bounds,
    memo: Mutex<Memo>,
}

struct Memo {
    entries: FxHashMap<MemoKey, MemoEntry>,
    available: usize,
}

impl Debug for Interpreter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("instructions", &self.code.len())
            .field("domain", &self.domain)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

impl Interpreter {
    pub(crate) fn new(code: Vec<Instr>, domain: Bounds, range: Bounds, capacity: usize) -> Self {
        Self {
            code,
            domain,
            range,
            memo: Mutex::new(Memo {
                entries: FxHashMap::default(),
                available: capacity,
            }),
        }
    }

    /// The number of inputs.
    pub fn num_inputs(&self) -> usize {
        self.domain.len()
    }

    /// The number of outputs.
    pub fn num_outputs(&self) -> usize {
        self.range.len()
    }

    /// The number of results that are currently memoized.
    pub fn memoized(&self) -> usize {
        self.memo.try_lock().map(|m| m.entries.len()).unwrap_or(0)
    }

    /// Evaluate the program for `src`, writing the results into `dest`.
    ///
    /// Inputs are clamped to the domain and outputs to the range.
    pub fn eval(&self, src: &[f64], dest: &mut [f64]) -> Result<(), ExecutionError> {
        if src.len() != self.num_inputs() || dest.len() != self.num_outputs() {
            return Err(ExecutionError::InputMismatch);
        }

        let mut input: SmallVec<[f64; 4]> = SmallVec::with_capacity(src.len());
        let mut key = MemoKey::with_capacity(src.len());

        for (x, (min, max)) in src.iter().zip(self.domain.iter()) {
            let x = clamp(*x, *min, *max);
            input.push(x);
            key.push(x.to_bits());
        }

        // Another thread holding the lock just means we skip the memo for this call.
        if let Ok(memo) = self.memo.try_lock()
            && let Some(cached) = memo.entries.get(&key)
        {
            dest.copy_from_slice(cached);
            return Ok(());
        }

        let stack = execute(&self.code, &input)?;
        stack.write_outputs(dest)?;

        for (y, (min, max)) in dest.iter_mut().zip(self.range.iter()) {
            *y = clamp(*y, *min, *max);
        }

        if let Ok(mut memo) = self.memo.try_lock()
            && memo.available > 0
        {
            memo.available -= 1;
            memo.entries.insert(key, MemoEntry::from_slice(dest));
        }

        Ok(())
    }
}
