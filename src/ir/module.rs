//! The top-level IR container produced by a single code generation run.

use rustc_hash::FxHashMap;

use super::function::IrFunction;

#[derive(Debug, Clone)]
pub struct GlobalVariable {
    pub name: String,
    pub size: u32,
}

#[derive(Debug, Clone)]
pub struct IrModule {
    pub name: String,
    pub globals: Vec<GlobalVariable>,
    pub functions: Vec<IrFunction>,
    function_map: FxHashMap<String, usize>,
}

impl IrModule {
    pub fn new(name: impl Into<String>) -> Self {
        IrModule {
            name: name.into(),
            globals: Vec::new(),
            functions: Vec::new(),
            function_map: FxHashMap::default(),
        }
    }

    pub fn add_variable(&mut self, name: impl Into<String>, size: u32) {
        self.globals.push(GlobalVariable { name: name.into(), size });
    }

    pub fn add_function(&mut self, function: IrFunction) {
        self.function_map.insert(function.name.clone(), self.functions.len());
        self.functions.push(function);
    }

    pub fn get_function(&self, name: &str) -> Option<&IrFunction> {
        self.function_map.get(name).map(|&idx| &self.functions[idx])
    }

    pub fn validate(&self) -> Result<(), String> {
        for f in &self.functions {
            f.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::value::IrType;

    #[test]
    fn add_and_lookup_function() {
        let mut m = IrModule::new("m");
        m.add_function(IrFunction::new("main", vec![], Some(IrType::I32)));
        assert!(m.get_function("main").is_some());
        assert!(m.get_function("missing").is_none());
    }

    #[test]
    fn add_variable_tracks_size() {
        let mut m = IrModule::new("m");
        m.add_variable("counter", 4);
        assert_eq!(m.globals[0].size, 4);
    }
}
