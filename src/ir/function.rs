//! IR functions: parameters, basic blocks, and the distinguished entry and
//! epilogue blocks.

use rustc_hash::FxHashMap;

use super::block::{BasicBlock, BasicBlockId};
use super::value::{IrType, Value};

#[derive(Debug, Clone)]
pub struct IrFunction {
    pub name: String,
    pub params: Vec<Value>,
    pub return_type: Option<IrType>,
    pub blocks: Vec<BasicBlock>,
    pub entry_block: BasicBlockId,
    pub epilogue_block: BasicBlockId,
    block_map: FxHashMap<BasicBlockId, usize>,
}

impl IrFunction {
    pub fn new(name: impl Into<String>, params: Vec<Value>, return_type: Option<IrType>) -> Self {
        IrFunction {
            name: name.into(),
            params,
            return_type,
            blocks: Vec::new(),
            entry_block: BasicBlockId(0),
            epilogue_block: BasicBlockId(0),
            block_map: FxHashMap::default(),
        }
    }

    /// Appends a block and returns its id. The first block ever appended
    /// becomes the entry block.
    pub fn add_block(&mut self, block: BasicBlock) -> BasicBlockId {
        let id = block.id;
        if self.blocks.is_empty() {
            self.entry_block = id;
        }
        let index = self.blocks.len();
        self.block_map.insert(id, index);
        self.blocks.push(block);
        id
    }

    pub fn get_block(&self, id: BasicBlockId) -> Option<&BasicBlock> {
        self.block_map.get(&id).map(|&idx| &self.blocks[idx])
    }

    pub fn get_block_mut(&mut self, id: BasicBlockId) -> Option<&mut BasicBlock> {
        self.block_map.get(&id).copied().map(move |idx| &mut self.blocks[idx])
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &BasicBlock> {
        self.blocks.iter()
    }

    /// Checks the structural invariants every function must satisfy once
    /// lowering is done: non-empty, a resolvable entry and epilogue, every
    /// block terminated, and every successor resolvable.
    pub fn validate(&self) -> Result<(), String> {
        if self.blocks.is_empty() {
            return Err(format!("function {} has no blocks", self.name));
        }
        if self.get_block(self.entry_block).is_none() {
            return Err(format!("function {} entry block {} missing", self.name, self.entry_block));
        }
        if self.get_block(self.epilogue_block).is_none() {
            return Err(format!("function {} epilogue block {} missing", self.name, self.epilogue_block));
        }
        for block in &self.blocks {
            if !block.is_terminated() {
                return Err(format!("block {} in function {} is not terminated", block.id, self.name));
            }
            if block.is_empty() {
                return Err(format!("block {} in function {} is empty", block.id, self.name));
            }
            for succ in block.successors() {
                if self.get_block(succ).is_none() {
                    return Err(format!(
                        "block {} in function {} references non-existent successor {}",
                        block.id, self.name, succ
                    ));
                }
            }
        }
        Ok(())
    }
}
