//! Three-address instructions.
//!
//! Every instruction other than `Store` produces exactly one [`Value`];
//! `Store` is a pure side effect. `Add` and `Mul` are a narrower producer
//! pair reserved for address computation (pointer/offset arithmetic in
//! member and index lowering) and are kept distinct from the general
//! [`BinOp`]-carrying `Binop` used for ordinary arithmetic expressions,
//! matching how the lowerer that motivated this split uses them.

use std::fmt;

use super::value::{BinOp, ConstValue, Value, ValueId};

#[derive(Debug, Clone, PartialEq)]
pub enum Instr {
    /// Materializes a literal payload.
    Const { dest: Value, value: ConstValue },
    /// Reserves `size` bytes of local storage, producing its address.
    Alloc { dest: Value, size: u32 },
    /// Reads the value at `addr`.
    Load { dest: Value, addr: ValueId },
    /// General arithmetic/bitwise/shift binary operator.
    Binop { dest: Value, op: BinOp, lhs: ValueId, rhs: ValueId },
    /// Pointer-typed addition, used only for address computation.
    Add { dest: Value, lhs: ValueId, rhs: ValueId },
    /// Integer multiplication, used only for index scaling.
    Mul { dest: Value, lhs: ValueId, rhs: ValueId },
    IntToPtr { dest: Value, value: ValueId },
    PtrToInt { dest: Value, value: ValueId },
    ByteToInt { dest: Value, value: ValueId },
    IntToByte { dest: Value, value: ValueId },
    /// Takes the address of a previously emitted value (a `Const`, most
    /// commonly a packed string literal).
    Addr { dest: Value, of: ValueId },
    /// Takes the address of a module-level global by name. Kept distinct
    /// from `Addr` because a global has no single per-function value id
    /// to point at; every function that touches it re-resolves the
    /// address by name.
    GlobalAddr { dest: Value, name: String },
    /// Calls a mangled function name. The source compiler this pipeline
    /// models always gives the result a fixed `i32` type regardless of
    /// the callee's declared return type; preserved here rather than
    /// "fixed" because no caller in this pipeline currently depends on
    /// call results being anything but `i32`.
    Call { dest: Value, callee: String, args: Vec<ValueId> },
    /// Writes `value` to `addr`. Always volatile: the lowerer this is
    /// modeled on never tracks whether a store can be reordered.
    Store { value: ValueId, addr: ValueId, volatile: bool },
}

impl Instr {
    pub fn dest(&self) -> Option<Value> {
        match self {
            Instr::Const { dest, .. }
            | Instr::Alloc { dest, .. }
            | Instr::Load { dest, .. }
            | Instr::Binop { dest, .. }
            | Instr::Add { dest, .. }
            | Instr::Mul { dest, .. }
            | Instr::IntToPtr { dest, .. }
            | Instr::PtrToInt { dest, .. }
            | Instr::ByteToInt { dest, .. }
            | Instr::IntToByte { dest, .. }
            | Instr::Addr { dest, .. }
            | Instr::GlobalAddr { dest, .. }
            | Instr::Call { dest, .. } => Some(*dest),
            Instr::Store { .. } => None,
        }
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Const { dest, value } => write!(f, "{dest} = const {value:?}"),
            Instr::Alloc { dest, size } => write!(f, "{dest} = alloc {size}"),
            Instr::Load { dest, addr } => write!(f, "{dest} = load {addr}"),
            Instr::Binop { dest, op, lhs, rhs } => write!(f, "{dest} = {lhs} {op} {rhs}"),
            Instr::Add { dest, lhs, rhs } => write!(f, "{dest} = add {lhs} {rhs}"),
            Instr::Mul { dest, lhs, rhs } => write!(f, "{dest} = mul {lhs} {rhs}"),
            Instr::IntToPtr { dest, value } => write!(f, "{dest} = int_to_ptr {value}"),
            Instr::PtrToInt { dest, value } => write!(f, "{dest} = ptr_to_int {value}"),
            Instr::ByteToInt { dest, value } => write!(f, "{dest} = byte_to_int {value}"),
            Instr::IntToByte { dest, value } => write!(f, "{dest} = int_to_byte {value}"),
            Instr::Addr { dest, of } => write!(f, "{dest} = addr_of {of}"),
            Instr::GlobalAddr { dest, name } => write!(f, "{dest} = addr_of @{name}"),
            Instr::Call { dest, callee, args } => {
                write!(f, "{dest} = call {callee}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
            Instr::Store { value, addr, volatile } => {
                write!(f, "store {value} -> {addr}{}", if *volatile { " (volatile)" } else { "" })
            }
        }
    }
}
