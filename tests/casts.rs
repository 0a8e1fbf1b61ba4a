//! S5: an explicit `byte -> int` cast emits `ByteToInt`; the same
//! assignment without a cast is rejected as an illegal implicit coercion.

mod common;

use c3irgen::ast::{Expr, FunctionDecl, LocalVar, Stmt};
use c3irgen::diagnostics::DiagnosticBag;
use c3irgen::ir::Instr;
use c3irgen::types::{SourceType, SymbolId};
use common::{unknown, Ctx};

fn ident(name: &str) -> Expr {
    Expr::Identifier { name: name.into(), span: unknown() }
}

fn func_assigning(rhs: Expr) -> FunctionDecl {
    FunctionDecl {
        name: "convert".into(),
        package: "main".into(),
        params: vec![],
        locals: vec![
            LocalVar { symbol: SymbolId(0), name: "b".into(), ty: SourceType::Byte },
            LocalVar { symbol: SymbolId(1), name: "v".into(), ty: SourceType::Int },
        ],
        return_type: None,
        body: Stmt::Assignment { lhs: ident("v"), rhs, span: unknown() },
        span: unknown(),
    }
}

fn ctx() -> Ctx {
    Ctx::new().with_local("b", 0, SourceType::Byte).with_local("v", 1, SourceType::Int)
}

#[test]
fn explicit_cast_from_byte_to_int_emits_byte_to_int() {
    let ctx = ctx();
    let func = func_assigning(Expr::TypeCast { expr: Box::new(ident("b")), to: SourceType::Int, span: unknown() });
    let module = c3irgen::ast::Module { name: "main".into(), types: vec![], globals: vec![], functions: vec![func] };

    let mut diags = DiagnosticBag::new();
    let ir = c3irgen::gencode(&module, &ctx, &mut diags).unwrap();
    ir.validate().unwrap();

    let f = ir.get_function("main_convert").unwrap();
    let entry = f.get_block(f.entry_block).unwrap();
    assert!(entry.instructions.iter().any(|i| matches!(i, Instr::ByteToInt { .. })));
}

#[test]
fn assigning_byte_to_int_without_a_cast_is_rejected() {
    let ctx = ctx();
    let func = func_assigning(ident("b"));
    let module = c3irgen::ast::Module { name: "main".into(), types: vec![], globals: vec![], functions: vec![func] };

    let mut diags = DiagnosticBag::new();
    let result = c3irgen::gencode(&module, &ctx, &mut diags);
    assert!(result.is_err());
    assert!(diags.has_errors());
    assert!(diags.errors()[0].message.contains("cannot use"));
}
