//! The function lowerer.
//!
//! Builds a function's entry block, allocates storage for every
//! parameter and local, lowers the body, and closes whatever block is
//! still open by jumping into the epilogue. The epilogue itself is
//! always given a `Return(None)` terminator as soon as it is opened: a
//! function whose body falls off the end without an explicit `return`
//! still produces a structurally valid, fully terminated function. An
//! explicit `return` statement never routes through the epilogue at all
//! — it terminates its own block directly — so the epilogue is reached
//! only by functions that fall through.

use crate::ast::FunctionDecl;
use crate::builder::IrBuilder;
use crate::diagnostics::Diagnostics;
use crate::error::LowerError;
use crate::ir::block::Terminator;
use crate::ir::value::IrType;
use crate::ir::Instr;
use crate::symbols::SymbolMap;
use crate::types::TypeContext;

use super::stmt::lower_stmt;
use super::ty::get_ir_type;

pub fn lower_function(
    builder: &mut IrBuilder,
    ctx: &dyn TypeContext,
    diags: &mut dyn Diagnostics,
    func: &FunctionDecl,
) -> Result<(), LowerError> {
    builder.prepare();
    builder.set_loc(func.span);

    let mangled_name = format!("{}_{}", func.package, func.name);
    let return_ir_ty = match &func.return_type {
        Some(t) => match get_ir_type(t, func.span) {
            Ok(ty) => Some(ty),
            // A bad return type is reported and this function's lowering
            // stops here, the same way a bad statement stops its own
            // function but not the rest of the module.
            Err(e) => {
                diags.error(e);
                return Ok(());
            }
        },
        None => None,
    };

    builder.new_function(mangled_name, return_ir_ty);

    let entry = builder.new_block();
    builder.set_block(entry);

    let mut locals = SymbolMap::new();

    // Parameters arrive already materialized by the caller's convention;
    // each is spilled into its own stack slot immediately so the rest of
    // the function can treat every local uniformly through the symbol
    // map, rather than special-casing "is this name a parameter".
    for p in &func.params {
        let ty = match get_ir_type(&p.ty, func.span) {
            Ok(ty) => ty,
            Err(e) => {
                diags.error(e);
                return Ok(());
            }
        };
        let incoming = builder.add_param(ty);
        let addr = builder.emit(|dest| Instr::Alloc { dest, size: param_size(ty) }, IrType::Ptr);
        builder.emit_store(incoming.id, addr.id, true);
        locals.bind(p.symbol, addr);
    }

    for l in &func.locals {
        let size = ctx.size_of(&l.ty);
        let addr = builder.emit(|dest| Instr::Alloc { dest, size }, IrType::Ptr);
        locals.bind(l.symbol, addr);
    }

    lower_stmt(builder, ctx, diags, &locals, &func.body)?;

    if !builder.is_current_block_terminated() {
        builder.set_terminator(Terminator::Jump(builder.epilogue_block()));
    }

    let epilogue = builder.epilogue_block();
    builder.open_epilogue(epilogue);
    builder.set_terminator(Terminator::Return(None));

    builder.finish_function();
    Ok(())
}

fn param_size(ty: IrType) -> u32 {
    match ty {
        IrType::I8 | IrType::U8 => 1,
        IrType::I16 | IrType::U16 => 2,
        IrType::I32 | IrType::U32 | IrType::F32 => 4,
        IrType::I64 | IrType::U64 | IrType::F64 | IrType::Ptr => 8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, Literal, Param, Stmt};
    use crate::diagnostics::{DiagnosticBag, SemanticError, Span};
    use crate::types::{Symbol, SourceType};

    struct Ctx;
    impl TypeContext for Ctx {
        fn resolve(&self, _name: &str) -> Option<Symbol> {
            None
        }
        fn size_of(&self, _ty: &SourceType) -> u32 {
            4
        }
        fn common_type(&self, a: &SourceType, _b: &SourceType) -> Option<SourceType> {
            Some(a.clone())
        }
        fn check_type(&self, _ty: &SourceType, _span: Span) -> Result<(), SemanticError> {
            Ok(())
        }
    }

    fn decl(body: Stmt, return_type: Option<SourceType>) -> FunctionDecl {
        FunctionDecl {
            name: "f".into(),
            package: "main".into(),
            params: vec![],
            locals: vec![],
            return_type,
            body,
            span: Span::unknown(),
        }
    }

    #[test]
    fn falling_off_the_end_reaches_epilogue() {
        let mut b = IrBuilder::new("m");
        let ctx = Ctx;
        let mut diags = DiagnosticBag::new();
        let f = decl(Stmt::Compound(vec![]), Some(SourceType::Int));
        lower_function(&mut b, &ctx, &mut diags, &f).unwrap();
        assert!(!diags.has_errors());
        let func = b.m.get_function("main_f").unwrap();
        func.validate().unwrap();
    }

    #[test]
    fn explicit_return_bypasses_epilogue_but_function_stays_valid() {
        let mut b = IrBuilder::new("m");
        let ctx = Ctx;
        let mut diags = DiagnosticBag::new();
        let body = Stmt::Compound(vec![
            Stmt::Return { expr: Some(Expr::Literal(Literal::Int(1), Span::unknown())), span: Span::unknown() },
            Stmt::Empty,
        ]);
        let f = decl(body, Some(SourceType::Int));
        lower_function(&mut b, &ctx, &mut diags, &f).unwrap();
        let func = b.m.get_function("main_f").unwrap();
        func.validate().unwrap();
        // the dead block after the explicit return never reaches the
        // epilogue directly
        assert!(func.block_count() >= 3);
    }

    #[test]
    fn params_are_spilled_to_stack_slots() {
        let mut b = IrBuilder::new("m");
        let ctx = Ctx;
        let mut diags = DiagnosticBag::new();
        let mut f = decl(Stmt::Compound(vec![]), None);
        f.params.push(Param { symbol: crate::types::SymbolId(0), name: "x".into(), ty: SourceType::Int });
        lower_function(&mut b, &ctx, &mut diags, &f).unwrap();
        let func = b.m.get_function("main_f").unwrap();
        assert_eq!(func.params.len(), 1);
    }
}
