//! S2: `if (a < b) c := 1; else c := 2;` lowers to three blocks joined at
//! a common merge block, with no intermediate boolean value.

mod common;

use c3irgen::ast::{CmpOp, CondExpr, Expr, FunctionDecl, LocalVar, Literal, Module, Stmt};
use c3irgen::diagnostics::DiagnosticBag;
use c3irgen::ir::Terminator;
use c3irgen::types::{SourceType, SymbolId};
use common::{unknown, Ctx};

fn ident(name: &str) -> Expr {
    Expr::Identifier { name: name.into(), span: unknown() }
}

fn int_lit(v: i64) -> Expr {
    Expr::Literal(Literal::Int(v), unknown())
}

fn assign_const(target: &str, v: i64) -> Stmt {
    Stmt::Assignment { lhs: ident(target), rhs: int_lit(v), span: unknown() }
}

#[test]
fn if_else_branches_join_at_a_shared_merge_block() {
    let ctx = Ctx::new()
        .with_local("a", 0, SourceType::Int)
        .with_local("b", 1, SourceType::Int)
        .with_local("c", 2, SourceType::Int);

    let func = FunctionDecl {
        name: "choose".into(),
        package: "main".into(),
        params: vec![],
        locals: vec![
            LocalVar { symbol: SymbolId(0), name: "a".into(), ty: SourceType::Int },
            LocalVar { symbol: SymbolId(1), name: "b".into(), ty: SourceType::Int },
            LocalVar { symbol: SymbolId(2), name: "c".into(), ty: SourceType::Int },
        ],
        return_type: None,
        body: Stmt::If {
            cond: CondExpr::Compare { op: CmpOp::Lt, lhs: ident("a"), rhs: ident("b") },
            then_branch: Box::new(assign_const("c", 1)),
            else_branch: Box::new(assign_const("c", 2)),
        },
        span: unknown(),
    };
    let module = Module { name: "main".into(), types: vec![], globals: vec![], functions: vec![func] };

    let mut diags = DiagnosticBag::new();
    let ir = c3irgen::gencode(&module, &ctx, &mut diags).unwrap();
    ir.validate().unwrap();

    let f = ir.get_function("main_choose").unwrap();
    let entry = f.get_block(f.entry_block).unwrap();
    let Some(Terminator::CJump { op, if_true, if_false, .. }) = &entry.terminator else {
        panic!("expected the entry block to end in a comparison, got {:?}", entry.terminator);
    };
    assert_eq!(*op, c3irgen::ir::CmpOp::Lt);

    let then_block = f.get_block(*if_true).unwrap();
    let else_block = f.get_block(*if_false).unwrap();
    assert!(then_block.instructions.iter().any(|i| i.to_string().contains("const Int(1)")));
    assert!(else_block.instructions.iter().any(|i| i.to_string().contains("const Int(2)")));

    let Some(Terminator::Jump(then_target)) = then_block.terminator else {
        panic!("then branch must jump to the merge block");
    };
    let Some(Terminator::Jump(else_target)) = else_block.terminator else {
        panic!("else branch must jump to the merge block");
    };
    assert_eq!(then_target, else_target, "both arms converge on the same merge block");
}
