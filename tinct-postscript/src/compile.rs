//! Compiling simple programs into straight-line arithmetic.
//!
//! Most calculator functions found in real documents only shuffle their inputs
//! around and combine them with `add`, `sub` and `mul`, often clamping a value
//! with the `dup N gt { pop N } if` idiom. Such programs can be executed
//! symbolically once, producing an expression for each output together with the
//! interval its values are guaranteed to fall into. The expressions are then
//! lowered into a small register program that needs neither an operand stack nor
//! any checks while running.
//!
//! Anything outside of that subset makes compilation fail, in which case the
//! program has to be interpreted instead.

use crate::clamp;
use crate::error::ExecutionError;
use crate::interpret::MAX_STACK_DEPTH;
use crate::op::PostScriptOp;
use crate::parser::Instr;
use smallvec::SmallVec;

type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
}

#[derive(Debug, Clone, Copy)]
enum Node {
    Argument {
        index: usize,
        min: f64,
        max: f64,
    },
    Literal(f64),
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
        min: f64,
        max: f64,
    },
    /// The smaller of `arg` and `max`.
    Min {
        arg: NodeId,
        max: f64,
    },
    /// A value that was duplicated and is therefore computed only once.
    Variable {
        slot: usize,
        min: f64,
        max: f64,
    },
}

struct VariableDefinition {
    slot: usize,
    expr: NodeId,
}

#[derive(Default)]
struct Ast {
    nodes: Vec<Node>,
    definitions: Vec<VariableDefinition>,
}

impl Ast {
    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn bounds(&self, id: NodeId) -> (f64, f64) {
        match self.nodes[id] {
            Node::Argument { min, max, .. } => (min, max),
            Node::Literal(n) => (n, n),
            Node::Binary { min, max, .. } => (min, max),
            Node::Min { arg, max } => (self.bounds(arg).0, max),
            Node::Variable { min, max, .. } => (min, max),
        }
    }

    fn literal(&self, id: NodeId) -> Option<f64> {
        match self.nodes[id] {
            Node::Literal(n) => Some(n),
            _ => None,
        }
    }

    fn is_literal(&self, id: NodeId, value: f64) -> bool {
        self.literal(id) == Some(value)
    }

    fn add(&mut self, a: NodeId, b: NodeId) -> NodeId {
        if let (Some(n1), Some(n2)) = (self.literal(a), self.literal(b)) {
            return self.push(Node::Literal(n1 + n2));
        }

        if self.is_literal(a, 0.0) {
            return b;
        }

        if self.is_literal(b, 0.0) {
            return a;
        }

        let (a_min, a_max) = self.bounds(a);
        let (b_min, b_max) = self.bounds(b);

        self.push(Node::Binary {
            op: BinaryOp::Add,
            lhs: a,
            rhs: b,
            min: a_min + b_min,
            max: a_max + b_max,
        })
    }

    fn mul(&mut self, a: NodeId, b: NodeId) -> NodeId {
        if let (Some(n1), Some(n2)) = (self.literal(a), self.literal(b)) {
            return self.push(Node::Literal(n1 * n2));
        }

        // Keep the literal on the right so that only one side needs checking.
        let (a, b) = if self.literal(a).is_some() {
            (b, a)
        } else {
            (a, b)
        };

        if let Some(n) = self.literal(b) {
            if n == 0.0 {
                return self.push(Node::Literal(0.0));
            } else if n == 1.0 {
                return a;
            }

            let (a_min, a_max) = self.bounds(a);
            let (min, max) = if n > 0.0 {
                (n * a_min, n * a_max)
            } else {
                (n * a_max, n * a_min)
            };

            return self.push(Node::Binary {
                op: BinaryOp::Mul,
                lhs: a,
                rhs: b,
                min,
                max,
            });
        }

        let (a_min, a_max) = self.bounds(a);
        let (b_min, b_max) = self.bounds(b);
        let products = [a_min * b_min, a_min * b_max, a_max * b_min, a_max * b_max];
        let min = products.iter().copied().fold(f64::INFINITY, f64::min);
        let max = products.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        self.push(Node::Binary {
            op: BinaryOp::Mul,
            lhs: a,
            rhs: b,
            min,
            max,
        })
    }

    fn sub(&mut self, a: NodeId, b: NodeId) -> NodeId {
        if let (Some(n1), Some(n2)) = (self.literal(a), self.literal(b)) {
            return self.push(Node::Literal(n1 - n2));
        }

        if self.is_literal(b, 0.0) {
            return a;
        }

        // Simplify `1 - (1 - x)` into `x`. Not exact for larger constants.
        if self.is_literal(a, 1.0)
            && let Node::Binary {
                op: BinaryOp::Sub,
                lhs,
                rhs,
                ..
            } = self.nodes[b]
            && self.is_literal(lhs, 1.0)
        {
            return rhs;
        }

        let (a_min, a_max) = self.bounds(a);
        let (b_min, b_max) = self.bounds(b);

        self.push(Node::Binary {
            op: BinaryOp::Sub,
            lhs: a,
            rhs: b,
            min: a_min - b_max,
            max: a_max - b_min,
        })
    }

    fn min(&mut self, arg: NodeId, max: f64) -> NodeId {
        let (arg_min, arg_max) = self.bounds(arg);

        if arg_min >= max {
            self.push(Node::Literal(max))
        } else if arg_max <= max {
            arg
        } else {
            self.push(Node::Min { arg, max })
        }
    }

    /// Replace the stack entry at `pos` with a variable unless it is cheap to
    /// evaluate twice, returning the node that may be duplicated.
    fn share(&mut self, stack: &mut [NodeId], pos: usize) -> NodeId {
        let id = stack[pos];

        if matches!(
            self.nodes[id],
            Node::Literal(_) | Node::Variable { .. } | Node::Argument { .. }
        ) {
            return id;
        }

        let (min, max) = self.bounds(id);
        let slot = self.definitions.len();
        self.definitions.push(VariableDefinition { slot, expr: id });
        let var = self.push(Node::Variable { slot, min, max });
        stack[pos] = var;

        var
    }
}

/// Read a count operand that is known at compile time.
fn literal_count(ast: &Ast, id: NodeId) -> Option<usize> {
    let n = ast.literal(id)?;

    if n < 0.0 || n.fract() != 0.0 {
        return None;
    }

    Some(n as usize)
}

/// Check whether the code at `pos`, which is a `dup`, starts the clamping idiom
/// `dup N gt { pop N } if`, returning `N`.
fn min_idiom(code: &[Instr], pos: usize) -> Option<f64> {
    match code.get(pos + 1..pos + 6)? {
        [
            Instr::Number(n1),
            Instr::Op(PostScriptOp::Gt),
            Instr::JumpIfZero(target),
            Instr::Op(PostScriptOp::Pop),
            Instr::Number(n2),
        ] if *target == pos + 6 && n1 == n2 => Some(*n1),
        _ => None,
    }
}

fn build(code: &[Instr], domain: &[(f64, f64)], num_outputs: usize) -> Option<(Ast, Vec<NodeId>)> {
    let mut ast = Ast::default();
    let mut stack = Vec::with_capacity(domain.len());

    for (index, (min, max)) in domain.iter().enumerate() {
        stack.push(ast.push(Node::Argument {
            index,
            min: *min,
            max: *max,
        }));
    }

    let mut pos = 0;

    while let Some(instr) = code.get(pos) {
        let op = match instr {
            Instr::Number(n) => {
                stack.push(ast.push(Node::Literal(*n)));
                pos += 1;

                if stack.len() > MAX_STACK_DEPTH {
                    return None;
                }

                continue;
            }
            Instr::Op(op) => *op,
            Instr::Jump(_) | Instr::JumpIfZero(_) => return None,
        };

        match op {
            PostScriptOp::Add | PostScriptOp::Sub | PostScriptOp::Mul => {
                let b = stack.pop()?;
                let a = stack.pop()?;

                stack.push(match op {
                    PostScriptOp::Add => ast.add(a, b),
                    PostScriptOp::Sub => ast.sub(a, b),
                    _ => ast.mul(a, b),
                });
            }
            PostScriptOp::Cvr => {
                stack.last()?;
            }
            PostScriptOp::Pop => {
                stack.pop()?;
            }
            PostScriptOp::Exch => {
                let len = stack.len();

                if len < 2 {
                    return None;
                }

                stack.swap(len - 1, len - 2);
            }
            PostScriptOp::Dup => {
                let top = stack.len().checked_sub(1)?;

                if let Some(n) = min_idiom(code, pos) {
                    stack[top] = ast.min(stack[top], n);
                    pos += 6;
                    continue;
                }

                let shared = ast.share(&mut stack, top);
                stack.push(shared);
            }
            PostScriptOp::Index => {
                let n = literal_count(&ast, stack.pop()?)?;
                let idx = stack.len().checked_sub(n)?.checked_sub(1)?;
                let shared = ast.share(&mut stack, idx);

                stack.push(shared);
            }
            PostScriptOp::Copy => {
                let n = literal_count(&ast, stack.pop()?)?;
                let start = stack.len().checked_sub(n)?;

                for i in start..start + n {
                    let shared = ast.share(&mut stack, i);
                    stack.push(shared);
                }
            }
            PostScriptOp::Roll => {
                let j = ast.literal(stack.pop()?)?;
                let n = literal_count(&ast, stack.pop()?)?;

                if n == 0 || j.fract() != 0.0 {
                    return None;
                }

                let start = stack.len().checked_sub(n)?;
                let shift = (j as i64).rem_euclid(n as i64) as usize;
                stack[start..].rotate_right(shift);
            }
            _ => return None,
        }

        if stack.len() > MAX_STACK_DEPTH {
            return None;
        }

        pos += 1;
    }

    if stack.len() != num_outputs {
        return None;
    }

    Some((ast, stack))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum MicroOp {
    /// Load an input, clamped to the domain.
    LoadArg {
        dst: usize,
        index: usize,
        min: f64,
        max: f64,
    },
    Const {
        dst: usize,
        value: f64,
    },
    Binary {
        op: BinaryOp,
        dst: usize,
        lhs: usize,
        rhs: usize,
    },
    Min {
        dst: usize,
        src: usize,
        bound: f64,
    },
    Max {
        dst: usize,
        src: usize,
        bound: f64,
    },
    Output {
        index: usize,
        src: usize,
    },
}

struct Emitter<'a> {
    ast: &'a Ast,
    ops: Vec<MicroOp>,
    registers: usize,
    variables: Vec<usize>,
}

impl Emitter<'_> {
    fn alloc(&mut self) -> usize {
        self.registers += 1;
        self.registers - 1
    }

    fn emit(&mut self, id: NodeId) -> usize {
        match self.ast.nodes[id] {
            Node::Argument { index, min, max } => {
                let dst = self.alloc();
                self.ops.push(MicroOp::LoadArg {
                    dst,
                    index,
                    min,
                    max,
                });
                dst
            }
            Node::Literal(value) => {
                let dst = self.alloc();
                self.ops.push(MicroOp::Const { dst, value });
                dst
            }
            Node::Binary { op, lhs, rhs, .. } => {
                let lhs = self.emit(lhs);
                let rhs = self.emit(rhs);
                let dst = self.alloc();
                self.ops.push(MicroOp::Binary { op, dst, lhs, rhs });
                dst
            }
            Node::Min { arg, max } => {
                let src = self.emit(arg);
                let dst = self.alloc();
                self.ops.push(MicroOp::Min {
                    dst,
                    src,
                    bound: max,
                });
                dst
            }
            Node::Variable { slot, .. } => self.variables[slot],
        }
    }
}

/// A calculator program lowered into straight-line register code.
///
/// Produces the same results as interpreting the program, but cannot fail once
/// the number of inputs and outputs match.
#[derive(Debug, Clone)]
pub struct CompiledProgram {
    ops: Vec<MicroOp>,
    registers: usize,
    num_inputs: usize,
    num_outputs: usize,
}

impl CompiledProgram {
    pub(crate) fn new(code: &[Instr], domain: &[(f64, f64)], range: &[(f64, f64)]) -> Option<Self> {
        let (ast, outputs) = build(code, domain, range.len())?;

        let mut emitter = Emitter {
            ast: &ast,
            ops: vec![],
            registers: 0,
            variables: vec![0; ast.definitions.len()],
        };

        for definition in &ast.definitions {
            let reg = emitter.emit(definition.expr);
            emitter.variables[definition.slot] = reg;
        }

        for (index, (expr, (range_min, range_max))) in outputs.iter().zip(range.iter()).enumerate()
        {
            let mut src = emitter.emit(*expr);
            let (min, max) = ast.bounds(*expr);

            if *range_min > min {
                let dst = emitter.alloc();
                emitter.ops.push(MicroOp::Max {
                    dst,
                    src,
                    bound: *range_min,
                });
                src = dst;
            }

            if *range_max < max {
                let dst = emitter.alloc();
                emitter.ops.push(MicroOp::Min {
                    dst,
                    src,
                    bound: *range_max,
                });
                src = dst;
            }

            emitter.ops.push(MicroOp::Output { index, src });
        }

        Some(Self {
            registers: emitter.registers,
            ops: emitter.ops,
            num_inputs: domain.len(),
            num_outputs: range.len(),
        })
    }

    /// The number of inputs.
    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    /// The number of outputs.
    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    /// Evaluate the program for `src`, writing the results into `dest`.
    pub fn eval(&self, src: &[f64], dest: &mut [f64]) -> Result<(), ExecutionError> {
        if src.len() != self.num_inputs || dest.len() != self.num_outputs {
            return Err(ExecutionError::InputMismatch);
        }

        let mut regs: SmallVec<[f64; 32]> = SmallVec::from_elem(0.0, self.registers);

        for op in &self.ops {
            match *op {
                MicroOp::LoadArg {
                    dst,
                    index,
                    min,
                    max,
                } => regs[dst] = clamp(src[index], min, max),
                MicroOp::Const { dst, value } => regs[dst] = value,
                MicroOp::Binary { op, dst, lhs, rhs } => {
                    regs[dst] = match op {
                        BinaryOp::Add => regs[lhs] + regs[rhs],
                        BinaryOp::Sub => regs[lhs] - regs[rhs],
                        BinaryOp::Mul => regs[lhs] * regs[rhs],
                    }
                }
                MicroOp::Min { dst, src, bound } => regs[dst] = regs[src].min(bound),
                MicroOp::Max { dst, src, bound } => regs[dst] = regs[src].max(bound),
                MicroOp::Output { index, src } => dest[index] = regs[src],
            }
        }

        Ok(())
    }
}
