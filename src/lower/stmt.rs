//! The statement lowerer.
//!
//! Each statement catches semantic errors at its own boundary: a failure
//! lowering one statement is reported to the diagnostics sink and
//! lowering continues with the next one, so a single bad statement
//! doesn't hide the rest of a function's errors. Only `LowerError::Unsupported`
//! escapes this boundary, since there is no sensible way to keep going
//! past a construct this pipeline cannot lower at all.

use crate::ast::Stmt;
use crate::builder::IrBuilder;
use crate::diagnostics::Diagnostics;
use crate::error::LowerError;
use crate::ir::block::Terminator;
use crate::symbols::SymbolMap;
use crate::types::TypeContext;

use super::cond::lower_cond;
use super::coerce::do_coerce;
use super::expr::{lower_expr, make_rvalue};

/// Lowers one statement, catching `Semantic` errors at this boundary.
/// Returns `Err` only for a fatal `Unsupported` construct.
pub fn lower_stmt(
    builder: &mut IrBuilder,
    ctx: &dyn TypeContext,
    diags: &mut dyn Diagnostics,
    locals: &SymbolMap,
    stmt: &Stmt,
) -> Result<(), LowerError> {
    if builder.is_current_block_terminated() {
        return Ok(());
    }
    match try_lower_stmt(builder, ctx, diags, locals, stmt) {
        Ok(()) => Ok(()),
        Err(LowerError::Semantic(e)) => {
            diags.error(e);
            Ok(())
        }
        Err(e @ LowerError::Unsupported(_)) => Err(e),
    }
}

fn try_lower_stmt(
    builder: &mut IrBuilder,
    ctx: &dyn TypeContext,
    diags: &mut dyn Diagnostics,
    locals: &SymbolMap,
    stmt: &Stmt,
) -> Result<(), LowerError> {
    match stmt {
        Stmt::Empty => Ok(()),

        Stmt::Compound(stmts) => {
            for s in stmts {
                lower_stmt(builder, ctx, diags, locals, s)?;
            }
            Ok(())
        }

        Stmt::ExpressionStatement(expr) => {
            // An expression used as a statement only ever makes sense as a
            // call for its side effects; anything else is a dead
            // computation and is rejected rather than silently lowered
            // and discarded.
            if !matches!(expr, crate::ast::Expr::Call { .. }) {
                return Err(crate::diagnostics::SemanticError::new(
                    "not a call expression",
                    expr.span(),
                )
                .into());
            }
            lower_expr(builder, ctx, locals, expr)?;
            Ok(())
        }

        Stmt::Assignment { lhs, rhs, span } => {
            let lhs_lowered = lower_expr(builder, ctx, locals, lhs)?;
            let lhs_ty = lhs_lowered.ty.clone();

            let rhs_lowered = lower_expr(builder, ctx, locals, rhs)?;
            let rhs_ty = rhs_lowered.ty.clone();
            let rhs_val = make_rvalue(builder, rhs_lowered)?;

            let coerced = do_coerce(builder, rhs_val, &rhs_ty, &lhs_ty, *span)?;

            if !lhs_lowered.lvalue {
                return Err(crate::diagnostics::SemanticError::new("no valid lvalue on the left of an assignment", *span).into());
            }
            builder.emit_store(coerced.id, lhs_lowered.value.id, true);
            Ok(())
        }

        Stmt::Return { expr, span } => {
            let value = match expr {
                Some(e) => {
                    let lowered = lower_expr(builder, ctx, locals, e)?;
                    Some(make_rvalue(builder, lowered)?.id)
                }
                None => None,
            };
            builder.set_loc(*span);
            builder.set_terminator(Terminator::Return(value));
            // A fresh, still-open block follows: an explicit return never
            // routes through the function's epilogue, it terminates
            // directly and leaves any code after it to its own block.
            let after = builder.new_block();
            builder.set_block(after);
            Ok(())
        }

        Stmt::If { cond, then_branch, else_branch } => {
            let then_block = builder.new_block();
            let else_block = builder.new_block();
            let merge_block = builder.new_block();

            lower_cond(builder, ctx, locals, cond, then_block, else_block)?;

            builder.set_block(then_block);
            lower_stmt(builder, ctx, diags, locals, then_branch)?;
            if !builder.is_current_block_terminated() {
                builder.set_terminator(Terminator::Jump(merge_block));
            }

            builder.set_block(else_block);
            lower_stmt(builder, ctx, diags, locals, else_branch)?;
            if !builder.is_current_block_terminated() {
                builder.set_terminator(Terminator::Jump(merge_block));
            }

            builder.set_block(merge_block);
            Ok(())
        }

        Stmt::While { cond, body } => {
            let header = builder.new_block();
            let body_block = builder.new_block();
            let exit_block = builder.new_block();

            builder.set_terminator(Terminator::Jump(header));

            builder.set_block(header);
            lower_cond(builder, ctx, locals, cond, body_block, exit_block)?;

            builder.set_block(body_block);
            lower_stmt(builder, ctx, diags, locals, body)?;
            if !builder.is_current_block_terminated() {
                builder.set_terminator(Terminator::Jump(header));
            }

            builder.set_block(exit_block);
            Ok(())
        }

        Stmt::For { init, cond, step, body } => {
            lower_stmt(builder, ctx, diags, locals, init)?;

            let header = builder.new_block();
            let body_block = builder.new_block();
            let step_block = builder.new_block();
            let exit_block = builder.new_block();

            builder.set_terminator(Terminator::Jump(header));

            builder.set_block(header);
            lower_cond(builder, ctx, locals, cond, body_block, exit_block)?;

            builder.set_block(body_block);
            lower_stmt(builder, ctx, diags, locals, body)?;
            if !builder.is_current_block_terminated() {
                builder.set_terminator(Terminator::Jump(step_block));
            }

            builder.set_block(step_block);
            lower_stmt(builder, ctx, diags, locals, step)?;
            if !builder.is_current_block_terminated() {
                builder.set_terminator(Terminator::Jump(header));
            }

            builder.set_block(exit_block);
            Ok(())
        }
    }
}
