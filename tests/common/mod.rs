//! Shared harness for the end-to-end scenario tests.
//!
//! There is no parser in scope for this crate, so every scenario builds
//! its AST by hand and resolves identifiers through a small in-memory
//! `TypeContext` built from a name → symbol table handed in up front.

use std::collections::HashMap;
use std::rc::Rc;

use c3irgen::diagnostics::{SemanticError, Span};
use c3irgen::types::{SourceType, Storage, Symbol, SymbolId, TypeContext};

pub struct Ctx {
    symbols: HashMap<String, Symbol>,
}

impl Ctx {
    pub fn new() -> Self {
        Ctx { symbols: HashMap::new() }
    }

    pub fn with_local(mut self, name: &str, id: u32, ty: SourceType) -> Self {
        self.symbols.insert(
            name.into(),
            Symbol::Variable { id: SymbolId(id), ty, storage: Storage::Local },
        );
        self
    }

    pub fn with_global(mut self, name: &str, id: u32, ty: SourceType) -> Self {
        self.symbols.insert(
            name.into(),
            Symbol::Variable {
                id: SymbolId(id),
                ty,
                storage: Storage::Global { name: name.into() },
            },
        );
        self
    }

    pub fn with_function(
        mut self,
        name: &str,
        mangled_name: &str,
        params: Vec<SourceType>,
        return_type: SourceType,
    ) -> Self {
        self.symbols
            .insert(name.into(), Symbol::Function { mangled_name: mangled_name.into(), params, return_type });
        self
    }
}

impl TypeContext for Ctx {
    fn resolve(&self, name: &str) -> Option<Symbol> {
        self.symbols.get(name).cloned()
    }

    fn size_of(&self, ty: &SourceType) -> u32 {
        match ty {
            SourceType::Int | SourceType::Bool => 4,
            SourceType::Double => 8,
            SourceType::Byte => 1,
            SourceType::Pointer(_) => 8,
            SourceType::Struct(s) => s.size,
            SourceType::Array(a) => a.size * self.size_of(&a.element),
            SourceType::Function(_) => 8,
        }
    }

    fn common_type(&self, a: &SourceType, b: &SourceType) -> Option<SourceType> {
        if a == b {
            Some(a.clone())
        } else {
            None
        }
    }

    fn check_type(&self, _ty: &SourceType, _span: Span) -> Result<(), SemanticError> {
        Ok(())
    }
}

pub fn ptr_to(ty: SourceType) -> SourceType {
    SourceType::Pointer(Rc::new(ty))
}

pub fn unknown() -> Span {
    Span::unknown()
}
