//! Coercion: adapting a value of one source type to another at an
//! assignment, call argument, or cast site.

use crate::builder::IrBuilder;
use crate::diagnostics::{SemanticError, Span};
use crate::ir::{Instr, Value};
use crate::types::SourceType;

use super::ty::get_ir_type;

/// Coerces `value` (of source type `from`) to source type `to`.
///
/// Identity coercion is free. An integer can be coerced to a pointer
/// (`IntToPtr`). Every other pairing is a semantic error; this pipeline
/// does not do implicit numeric widening or narrowing beyond that.
pub fn do_coerce(
    builder: &mut IrBuilder,
    value: Value,
    from: &SourceType,
    to: &SourceType,
    span: Span,
) -> Result<Value, SemanticError> {
    if from == to {
        return Ok(value);
    }

    if matches!(from, SourceType::Int) && to.is_pointer() {
        let ty = get_ir_type(to, span)?;
        return Ok(builder.emit(|dest| Instr::IntToPtr { dest, value: value.id }, ty));
    }

    Err(SemanticError::new(format!("cannot use {from:?} as {to:?}"), span))
}
