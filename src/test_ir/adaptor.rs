//! TestIR adaptor implementation.
//!
//! Lets the feature extractor walk a parsed [`TestIR`] exactly like an LLVM module.

use super::TestIR;
use crate::core::{InstKind, IrAdaptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstRef(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockRef(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FuncRef(pub u32);

/// Adaptor that implements IrAdaptor for TestIR
pub struct TestIRAdaptor<'ir> {
    ir: &'ir TestIR,
    cur_func: u32,
}

impl<'ir> TestIRAdaptor<'ir> {
    pub fn new(ir: &'ir TestIR) -> Self {
        Self { ir, cur_func: 0 }
    }

    /// Get the current function index
    pub fn cur_func(&self) -> u32 {
        self.cur_func
    }

    /// Get the name of a block
    pub fn block_name(&self, block: BlockRef) -> &str {
        &self.ir.blocks[block.0 as usize].name
    }

    /// Check if a function is extern
    pub fn func_extern(&self, func: FuncRef) -> bool {
        self.ir.functions[func.0 as usize].declaration
    }
}

impl<'ir> IrAdaptor for TestIRAdaptor<'ir> {
    type InstRef = InstRef;
    type BlockRef = BlockRef;
    type FuncRef = FuncRef;

    fn func_count(&self) -> u32 {
        self.ir.functions.len() as u32
    }

    fn funcs(&self) -> Box<dyn Iterator<Item = FuncRef> + '_> {
        Box::new((0..self.ir.functions.len() as u32).map(FuncRef))
    }

    fn func_link_name(&self, func: FuncRef) -> &str {
        &self.ir.functions[func.0 as usize].name
    }

    fn switch_func(&mut self, func: FuncRef) -> bool {
        if (func.0 as usize) < self.ir.functions.len() {
            self.cur_func = func.0;
            true
        } else {
            false
        }
    }

    fn blocks(&self) -> Box<dyn Iterator<Item = BlockRef> + '_> {
        match self.ir.functions.get(self.cur_func as usize) {
            Some(func) => Box::new((func.block_begin_idx..func.block_end_idx).map(BlockRef)),
            None => Box::new(std::iter::empty()),
        }
    }

    fn block_insts(&self, block: BlockRef) -> Box<dyn Iterator<Item = InstRef> + '_> {
        let info = &self.ir.blocks[block.0 as usize];
        Box::new((info.inst_begin_idx..info.inst_end_idx).map(InstRef))
    }

    fn inst_mnemonic(&self, inst: InstRef) -> &str {
        &self.ir.insts[inst.0 as usize].mnemonic
    }

    fn inst_kind(&self, inst: InstRef) -> InstKind {
        self.ir.insts[inst.0 as usize].kind()
    }

    fn inst_display(&self, inst: InstRef) -> String {
        self.ir.insts[inst.0 as usize].render()
    }
}
