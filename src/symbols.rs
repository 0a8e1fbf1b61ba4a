//! The symbol map: where a declared source variable currently lives.
//!
//! Populated before a function's body is lowered (one entry per
//! parameter and per local, plus whatever globals the module registered
//! up front) and read during expression lowering whenever an identifier
//! needs to resolve to its storage address. Keyed by [`SymbolId`] rather
//! than by name, since two locals in different functions can share a
//! name without being the same storage.

use rustc_hash::FxHashMap;

use crate::ir::Value;
use crate::types::SymbolId;

#[derive(Debug, Default)]
pub struct SymbolMap {
    storage: FxHashMap<SymbolId, Value>,
}

impl SymbolMap {
    pub fn new() -> Self {
        SymbolMap::default()
    }

    pub fn bind(&mut self, id: SymbolId, storage: Value) {
        self.storage.insert(id, storage);
    }

    pub fn get(&self, id: SymbolId) -> Option<Value> {
        self.storage.get(&id).copied()
    }
}
