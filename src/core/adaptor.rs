// This module defines the IrAdaptor trait, the bridge between the feature extractor and
// any IR that has the shape module -> functions -> basic blocks -> instructions. The
// trait exposes just enough structure for a read-only counting pass: enumerate functions
// in declaration order, switch to one of them, iterate its blocks and their instructions,
// and for each instruction report its mnemonic and its structural kind (load, store or
// anything else, with the pointer address space for memory operations). Implementations
// exist for LLVM modules (through inkwell) and for the textual test IR.

//! IrAdaptor responsibilities.
//!
//! The adaptor is the glue between the extractor and an IR. The extractor assumes:
//! - Functions, blocks and instructions are visited in declaration order.
//! - A function without a body (a declaration) simply has no blocks.
//! - Load and store instructions know the address space of their pointer operand.
//!
//! Implementations may preprocess data in `switch_func` to speed up later calls.

/// Structural kind of an instruction.
///
/// Only memory operations need structural information beyond the mnemonic, so
/// the kind doubles as the carrier of the pointer operand's address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstKind {
    /// Reads memory through a pointer in the given address space.
    Load { address_space: u32 },
    /// Writes memory through a pointer in the given address space.
    Store { address_space: u32 },
    /// Anything else.
    Other,
}

impl InstKind {
    /// Address space of the pointer operand, for memory operations.
    pub fn address_space(self) -> Option<u32> {
        match self {
            InstKind::Load { address_space } | InstKind::Store { address_space } => {
                Some(address_space)
            }
            InstKind::Other => None,
        }
    }
}

/// Bridge between an IR and the feature extractor.
pub trait IrAdaptor {
    type InstRef: Copy;
    type BlockRef: Copy;
    type FuncRef: Copy;

    /// Number of functions contained in the module.
    fn func_count(&self) -> u32;

    /// Iterator over all functions in the module, in declaration order.
    fn funcs(&self) -> Box<dyn Iterator<Item = Self::FuncRef> + '_>;

    /// Linkage name of the function.
    fn func_link_name(&self, func: Self::FuncRef) -> &str;

    /// Switch to the given function before walking its blocks.
    fn switch_func(&mut self, func: Self::FuncRef) -> bool;

    /// Iterator over blocks in the current function.
    ///
    /// ```ignore
    /// let func = adaptor.funcs().next().unwrap();
    /// adaptor.switch_func(func);
    /// for block in adaptor.blocks() {
    ///     for inst in adaptor.block_insts(block) {
    ///         let _ = adaptor.inst_mnemonic(inst);
    ///     }
    /// }
    /// ```
    fn blocks(&self) -> Box<dyn Iterator<Item = Self::BlockRef> + '_>;

    /// Iterator over instructions of the given block.
    fn block_insts(&self, block: Self::BlockRef) -> Box<dyn Iterator<Item = Self::InstRef> + '_>;

    /// Operation mnemonic, e.g. `add` or `load`.
    fn inst_mnemonic(&self, inst: Self::InstRef) -> &str;

    /// Structural kind of the instruction.
    fn inst_kind(&self, inst: Self::InstRef) -> InstKind;

    /// Printable form of the instruction for verbose tracing.
    fn inst_display(&self, inst: Self::InstRef) -> String {
        self.inst_mnemonic(inst).to_string()
    }
}
