//! The lowering pipeline: a type-checked AST in, a validated IR module
//! out.
//!
//! [`gencode`] is the driver. It type-checks the module's top-level
//! declarations, registers globals, and lowers each function in turn,
//! accumulating recoverable errors into the caller's [`Diagnostics`]
//! sink. A single [`GenError::SemanticErrors`] is raised at the end if
//! anything was reported, mirroring how a whole compiler invocation
//! collapses many small diagnostics into one "did this succeed" answer.

pub mod cond;
pub mod coerce;
pub mod expr;
pub mod function;
pub mod stmt;
pub mod ty;

use crate::ast::Module;
use crate::builder::IrBuilder;
use crate::diagnostics::{Diagnostics, Span};
use crate::error::GenError;
use crate::ir::IrModule;
use crate::types::TypeContext;

use function::lower_function;

pub fn gencode(
    module: &Module,
    ctx: &dyn TypeContext,
    diags: &mut dyn Diagnostics,
) -> Result<IrModule, GenError> {
    let mut builder = IrBuilder::new(module.name.clone());

    for ty in &module.types {
        if let Err(e) = ctx.check_type(ty, Span::unknown()) {
            diags.error(e);
        }
    }

    for g in &module.globals {
        builder.m.add_variable(g.name.clone(), ctx.size_of(&g.ty));
    }

    for f in &module.functions {
        lower_function(&mut builder, ctx, diags, f).map_err(GenError::from)?;
    }

    if diags.has_errors() {
        return Err(GenError::SemanticErrors);
    }

    let module = builder.into_module();
    module.validate().map_err(GenError::Unsupported)?;
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FunctionDecl, GlobalVar, Stmt};
    use crate::diagnostics::DiagnosticBag;
    use crate::types::{Symbol, SourceType, SymbolId};

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
        fn check_type(&self, _ty: &SourceType, _span: Span) -> Result<(), crate::diagnostics::SemanticError> {
            Ok(())
        }
    }

    fn empty_module() -> Module {
        Module {
            name: "test".into(),
            types: vec![],
            globals: vec![GlobalVar { symbol: SymbolId(0), name: "g".into(), ty: SourceType::Int }],
            functions: vec![FunctionDecl {
                name: "main".into(),
                package: "test".into(),
                params: vec![],
                locals: vec![],
                return_type: Some(SourceType::Int),
                body: Stmt::Compound(vec![]),
                span: Span::unknown(),
            }],
        }
    }

    #[test]
    fn empty_function_lowers_to_a_valid_module() {
        let m = empty_module();
        let ctx = Ctx;
        let mut diags = DiagnosticBag::new();
        let ir = gencode(&m, &ctx, &mut diags).unwrap();
        assert!(ir.get_function("test_main").is_some());
        assert_eq!(ir.globals[0].name, "g");
    }

    #[test]
    fn bad_top_level_type_is_reported_and_fails_the_run() {
        struct FailingCtx;
        impl TypeContext for FailingCtx {
            fn resolve(&self, _name: &str) -> Option<Symbol> {
                None
            }
            fn size_of(&self, _ty: &SourceType) -> u32 {
                4
            }
            fn common_type(&self, a: &SourceType, _b: &SourceType) -> Option<SourceType> {
                Some(a.clone())
            }
            fn check_type(&self, _ty: &SourceType, span: Span) -> Result<(), crate::diagnostics::SemanticError> {
                Err(crate::diagnostics::SemanticError::new("bad type", span))
            }
        }
        let mut m = empty_module();
        m.types.push(SourceType::Int);
        let ctx = FailingCtx;
        let mut diags = DiagnosticBag::new();
        let result = gencode(&m, &ctx, &mut diags);
        assert!(matches!(result, Err(GenError::SemanticErrors)));
        assert!(diags.has_errors());
    }
}
