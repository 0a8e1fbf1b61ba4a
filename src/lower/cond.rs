//! The conditional lowerer.
//!
//! Boolean expressions never materialize a boolean value: they are
//! lowered directly against a pair of target blocks, so `and`/`or` get
//! proper short-circuit control flow for free instead of producing an
//! intermediate `0`/`1` that a later branch would test.

use crate::ast::CondExpr;
use crate::builder::IrBuilder;
use crate::diagnostics::SemanticError;
use crate::error::LowerError;
use crate::ir::block::{BasicBlockId, Terminator};
use crate::types::TypeContext;

use super::expr::{lower_expr, make_rvalue};
use crate::symbols::SymbolMap;

fn map_cmpop(op: crate::ast::CmpOp) -> crate::ir::CmpOp {
    use crate::ast::CmpOp as A;
    use crate::ir::CmpOp as I;
    match op {
        A::Eq => I::Eq,
        A::Ne => I::Ne,
        A::Lt => I::Lt,
        A::Le => I::Le,
        A::Gt => I::Gt,
        A::Ge => I::Ge,
    }
}

pub fn lower_cond(
    builder: &mut IrBuilder,
    ctx: &dyn TypeContext,
    locals: &SymbolMap,
    cond: &CondExpr,
    if_true: BasicBlockId,
    if_false: BasicBlockId,
) -> Result<(), LowerError> {
    match cond {
        CondExpr::And(lhs, rhs) => {
            let mid = builder.new_block();
            lower_cond(builder, ctx, locals, lhs, mid, if_false)?;
            builder.set_block(mid);
            lower_cond(builder, ctx, locals, rhs, if_true, if_false)
        }
        CondExpr::Or(lhs, rhs) => {
            let mid = builder.new_block();
            lower_cond(builder, ctx, locals, lhs, if_true, mid)?;
            builder.set_block(mid);
            lower_cond(builder, ctx, locals, rhs, if_true, if_false)
        }
        CondExpr::Not(inner) => lower_cond(builder, ctx, locals, inner, if_false, if_true),
        CondExpr::Literal(b) => {
            builder.set_terminator(Terminator::Jump(if *b { if_true } else { if_false }));
            Ok(())
        }
        CondExpr::Compare { op, lhs, rhs } => {
            let span = lhs.span();
            let a = lower_expr(builder, ctx, locals, lhs)?;
            let a_ty = a.ty.clone();
            let a_val = make_rvalue(builder, a)?;
            let b = lower_expr(builder, ctx, locals, rhs)?;
            let b_ty = b.ty.clone();
            let b_val = make_rvalue(builder, b)?;

            if a_ty != b_ty {
                return Err(SemanticError::new(
                    format!("types unequal {a_ty:?} != {b_ty:?}"),
                    span,
                )
                .into());
            }

            builder.set_terminator(Terminator::CJump {
                op: map_cmpop(*op),
                lhs: a_val.id,
                rhs: b_val.id,
                if_true,
                if_false,
            });
            Ok(())
        }
    }
}
