// This module implements the IrAdaptor trait over an inkwell Module. Functions are collected
// once in declaration order together with their linkage names; blocks and instructions are
// walked lazily through inkwell. The mnemonic of an instruction is the LLVM opcode name
// (the same spelling `opt` prints), and loads/stores report the address space of their
// pointer operand, which is read from the operand's pointer type through the LLVM C API.

//! LLVM IR adaptor.

use crate::core::{InstKind, IrAdaptor};
use inkwell::basic_block::BasicBlock;
use inkwell::module::Module;
use inkwell::types::AsTypeRef;
use inkwell::values::{AnyValue, BasicValueEnum, FunctionValue, InstructionOpcode, InstructionValue};

/// Reported for a memory operation whose pointer operand cannot be inspected.
///
/// Falls outside the known address spaces, so it is counted as unrecognized.
pub const UNKNOWN_ADDRESS_SPACE: u32 = u32::MAX;

/// Adaptor walking an LLVM [`Module`] using `inkwell`.
pub struct LlvmAdaptor<'ctx> {
    funcs: Vec<FunctionValue<'ctx>>,
    names: Vec<String>,
    current: Option<FunctionValue<'ctx>>,
}

impl<'ctx> LlvmAdaptor<'ctx> {
    /// Create a new adaptor collecting all functions in the module.
    pub fn new(module: &Module<'ctx>) -> Self {
        let funcs: Vec<_> = module.get_functions().collect();
        let names = funcs
            .iter()
            .map(|f| f.get_name().to_string_lossy().into_owned())
            .collect();
        Self {
            funcs,
            names,
            current: None,
        }
    }
}

impl<'ctx> IrAdaptor for LlvmAdaptor<'ctx> {
    type InstRef = InstructionValue<'ctx>;
    type BlockRef = BasicBlock<'ctx>;
    type FuncRef = usize;

    fn func_count(&self) -> u32 {
        self.funcs.len() as u32
    }

    fn funcs(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        Box::new(0..self.funcs.len())
    }

    fn func_link_name(&self, func: usize) -> &str {
        self.names.get(func).map_or("", String::as_str)
    }

    fn switch_func(&mut self, func: usize) -> bool {
        match self.funcs.get(func) {
            Some(&f) => {
                self.current = Some(f);
                true
            }
            None => false,
        }
    }

    fn blocks(&self) -> Box<dyn Iterator<Item = BasicBlock<'ctx>> + '_> {
        Box::new(
            self.current
                .map(|f| f.get_basic_blocks())
                .unwrap_or_default()
                .into_iter(),
        )
    }

    fn block_insts(&self, block: BasicBlock<'ctx>) -> Box<dyn Iterator<Item = InstructionValue<'ctx>> + '_> {
        Box::new(block.get_instructions())
    }

    fn inst_mnemonic(&self, inst: InstructionValue<'ctx>) -> &str {
        opcode_name(inst.get_opcode())
    }

    fn inst_kind(&self, inst: InstructionValue<'ctx>) -> InstKind {
        match inst.get_opcode() {
            InstructionOpcode::Load => InstKind::Load {
                address_space: pointer_address_space(inst, 0),
            },
            InstructionOpcode::Store => InstKind::Store {
                address_space: pointer_address_space(inst, 1),
            },
            _ => InstKind::Other,
        }
    }

    fn inst_display(&self, inst: InstructionValue<'ctx>) -> String {
        inst.print_to_string().to_string()
    }
}

/// Address space of the pointer operand at `index`.
fn pointer_address_space(inst: InstructionValue<'_>, index: u32) -> u32 {
    match inst.get_operand(index).and_then(|op| op.left()) {
        Some(BasicValueEnum::PointerValue(ptr)) => {
            // SAFETY: the type ref comes from a live pointer value owned by the module.
            unsafe { inkwell::llvm_sys::core::LLVMGetPointerAddressSpace(ptr.get_type().as_type_ref()) }
        }
        _ => {
            log::warn!(
                "Operand {} of {} is not a pointer",
                index,
                inst.print_to_string().to_string()
            );
            UNKNOWN_ADDRESS_SPACE
        }
    }
}

/// LLVM's textual opcode name.
#[allow(unreachable_patterns)]
pub fn opcode_name(opcode: InstructionOpcode) -> &'static str {
    use InstructionOpcode::*;

    match opcode {
        Return => "ret",
        Br => "br",
        Switch => "switch",
        IndirectBr => "indirectbr",
        Invoke => "invoke",
        Resume => "resume",
        Unreachable => "unreachable",
        CleanupRet => "cleanupret",
        CatchRet => "catchret",
        CatchSwitch => "catchswitch",
        CallBr => "callbr",
        FNeg => "fneg",
        Add => "add",
        FAdd => "fadd",
        Sub => "sub",
        FSub => "fsub",
        Mul => "mul",
        FMul => "fmul",
        UDiv => "udiv",
        SDiv => "sdiv",
        FDiv => "fdiv",
        URem => "urem",
        SRem => "srem",
        FRem => "frem",
        Shl => "shl",
        LShr => "lshr",
        AShr => "ashr",
        And => "and",
        Or => "or",
        Xor => "xor",
        Alloca => "alloca",
        Load => "load",
        Store => "store",
        GetElementPtr => "getelementptr",
        Fence => "fence",
        AtomicCmpXchg => "cmpxchg",
        AtomicRMW => "atomicrmw",
        Trunc => "trunc",
        ZExt => "zext",
        SExt => "sext",
        FPToUI => "fptoui",
        FPToSI => "fptosi",
        UIToFP => "uitofp",
        SIToFP => "sitofp",
        FPTrunc => "fptrunc",
        FPExt => "fpext",
        PtrToInt => "ptrtoint",
        IntToPtr => "inttoptr",
        BitCast => "bitcast",
        AddrSpaceCast => "addrspacecast",
        CleanupPad => "cleanuppad",
        CatchPad => "catchpad",
        ICmp => "icmp",
        FCmp => "fcmp",
        Phi => "phi",
        Call => "call",
        Select => "select",
        UserOp1 => "userop1",
        UserOp2 => "userop2",
        VAArg => "va_arg",
        ExtractElement => "extractelement",
        InsertElement => "insertelement",
        ShuffleVector => "shufflevector",
        ExtractValue => "extractvalue",
        InsertValue => "insertvalue",
        LandingPad => "landingpad",
        Freeze => "freeze",
        _ => "<unknown>",
    }
}
