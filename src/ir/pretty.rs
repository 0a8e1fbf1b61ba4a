//! Textual pretty-printing for IR modules.
//!
//! Not a stable wire format: this exists so a lowering run's output can
//! be read by a human and asserted against in tests.

use std::fmt::Write as _;

use super::function::IrFunction;
use super::module::IrModule;

pub trait PrettyPrint {
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for IrModule {
    fn pretty_print(&self) -> String {
        let mut out = String::new();
        writeln!(out, "; module {}", self.name).unwrap();
        for g in &self.globals {
            writeln!(out, "; global {} : {} bytes", g.name, g.size).unwrap();
        }
        for f in &self.functions {
            out.push('\n');
            out.push_str(&f.pretty_print());
        }
        out
    }
}

impl PrettyPrint for IrFunction {
    fn pretty_print(&self) -> String {
        let mut out = String::new();
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        let ret = self
            .return_type
            .map(|t| t.to_string())
            .unwrap_or_else(|| "void".to_string());
        writeln!(out, "fn {}({}) -> {} {{", self.name, params.join(", "), ret).unwrap();

        for block in self.blocks() {
            writeln!(out, "{}:", block.id).unwrap();
            for instr in &block.instructions {
                writeln!(out, "  {instr}").unwrap();
            }
            if let Some(term) = &block.terminator {
                writeln!(out, "  {term}").unwrap();
            }
        }
        writeln!(out, "}}").unwrap();
        out
    }
}
