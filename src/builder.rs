//! The IR builder: a cursor over the module currently being generated.
//!
//! Mirrors the small, stateful builder interface the lowerer drives:
//! `prepare`/`new_function`/`new_block`/`set_block`/`set_loc`/`emit`, plus
//! direct access to the module under construction (`m`) for registering
//! globals. Lowering code never constructs blocks or functions by hand;
//! it only ever goes through this cursor.

use crate::diagnostics::Span;
use crate::ir::block::{BasicBlock, BasicBlockId, Terminator};
use crate::ir::function::IrFunction;
use crate::ir::instr::Instr;
use crate::ir::module::IrModule;
use crate::ir::value::{IrType, Value, ValueId};

pub struct IrBuilder {
    /// The module under construction. Public so callers can register
    /// globals directly, the way the original driver does.
    pub m: IrModule,
    function: Option<IrFunction>,
    block: Option<BasicBlockId>,
    next_value: u32,
    next_block: u32,
    loc: Span,
}

impl IrBuilder {
    pub fn new(module_name: impl Into<String>) -> Self {
        IrBuilder {
            m: IrModule::new(module_name),
            function: None,
            block: None,
            next_value: 0,
            next_block: 0,
            loc: Span::unknown(),
        }
    }

    /// Resets per-function cursor state. Called once per function, before
    /// `new_function`.
    pub fn prepare(&mut self) {
        self.function = None;
        self.block = None;
        self.next_value = 0;
        self.next_block = 0;
    }

    pub fn set_loc(&mut self, span: Span) {
        self.loc = span;
    }

    pub fn loc(&self) -> Span {
        self.loc
    }

    /// Starts a new function, reserving (but not opening) its epilogue
    /// block. The entry block must still be created with `new_block` and
    /// opened with `set_block`.
    pub fn new_function(&mut self, name: impl Into<String>, return_type: Option<IrType>) {
        let mut f = IrFunction::new(name, Vec::new(), return_type);
        let epilogue = self.alloc_block_id();
        f.epilogue_block = epilogue;
        self.function = Some(f);
    }

    /// Registers an incoming parameter, allocating the value the calling
    /// convention is assumed to hand over directly (no instruction backs
    /// it; it simply exists at function entry).
    pub fn add_param(&mut self, ty: IrType) -> Value {
        let value = self.alloc_value(ty);
        self.current_function_mut().params.push(value);
        value
    }

    pub fn epilogue_block(&self) -> BasicBlockId {
        self.function.as_ref().expect("no current function").epilogue_block
    }

    /// Opens the function's reserved epilogue block, appending it now
    /// that the body has been lowered.
    pub fn open_epilogue(&mut self, epilogue: BasicBlockId) {
        self.current_function_mut().add_block(BasicBlock::new(epilogue));
        self.block = Some(epilogue);
    }

    fn alloc_block_id(&mut self) -> BasicBlockId {
        let id = BasicBlockId(self.next_block);
        self.next_block += 1;
        id
    }

    /// Allocates a new block id and appends an empty block to the current
    /// function immediately. The first block appended to a function
    /// becomes its entry block.
    pub fn new_block(&mut self) -> BasicBlockId {
        let id = self.alloc_block_id();
        self.current_function_mut().add_block(BasicBlock::new(id));
        id
    }

    /// Moves the cursor to an already-appended block.
    pub fn set_block(&mut self, id: BasicBlockId) {
        debug_assert!(self.current_function().get_block(id).is_some());
        self.block = Some(id);
    }

    pub fn current_block(&self) -> BasicBlockId {
        self.block.expect("no current block")
    }

    pub fn is_current_block_terminated(&self) -> bool {
        let id = self.current_block();
        self.current_function()
            .get_block(id)
            .map(|b| b.is_terminated())
            .unwrap_or(false)
    }

    fn alloc_value(&mut self, ty: IrType) -> Value {
        let id = ValueId(self.next_value);
        self.next_value += 1;
        Value { id, ty }
    }

    fn current_function(&self) -> &IrFunction {
        self.function.as_ref().expect("no current function")
    }

    fn current_function_mut(&mut self) -> &mut IrFunction {
        self.function.as_mut().expect("no current function")
    }

    fn current_block_mut(&mut self) -> &mut BasicBlock {
        let id = self.current_block();
        self.current_function_mut()
            .get_block_mut(id)
            .expect("current block not found in current function")
    }

    /// Appends a producer instruction to the current block and returns
    /// the value it produces. Panics if given a non-producer instruction
    /// (`Store`); use `emit_store` for that.
    pub fn emit(&mut self, build: impl FnOnce(Value) -> Instr, ty: IrType) -> Value {
        let dest = self.alloc_value(ty);
        let instr = build(dest);
        debug_assert!(instr.dest().is_some(), "emit() requires a producer instruction");
        self.current_block_mut().push(instr);
        dest
    }

    pub fn emit_store(&mut self, value: ValueId, addr: ValueId, volatile: bool) {
        self.current_block_mut().push(Instr::Store { value, addr, volatile });
    }

    pub fn set_terminator(&mut self, term: Terminator) {
        self.current_block_mut().set_terminator(term);
    }

    /// Finishes the current function, moving it into the module and
    /// returning its name.
    pub fn finish_function(&mut self) -> String {
        let f = self.function.take().expect("no current function to finish");
        let name = f.name.clone();
        self.m.add_function(f);
        self.block = None;
        name
    }

    /// Consumes the builder, returning the module it has accumulated.
    pub fn into_module(self) -> IrModule {
        self.m
    }
}
