//! Test IR (TIR): a small textual IR for writing extraction tests and fixtures
//! without going through clang and LLVM bitcode.
//!
//! # TIR Format
//!
//! ```text
//! ; Comments start with semicolon
//! declare get_global_id(%dim)
//!
//! kernel(%a, %p) {
//! entry:
//!     %s = fadd %a, %a
//!     %v = load addrspace(1) %p
//!     store addrspace(2) %s, %p
//!     br ^exit
//! exit:
//!     ret
//! }
//! ```
//!
//! Every instruction is `[%result =] mnemonic [addrspace(N)] [operands]` on a
//! single line. `load` and `store` are structurally memory operations; without
//! an explicit `addrspace` they target address space 0, as in LLVM.

pub mod parser;
pub mod adaptor;

pub use adaptor::TestIRAdaptor;

use crate::core::error::FeatureResult;
use crate::core::InstKind;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestIR {
    pub functions: Vec<Function>,
    pub blocks: Vec<Block>,
    pub insts: Vec<Inst>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub declaration: bool,
    pub args: Vec<String>,
    pub block_begin_idx: u32,
    pub block_end_idx: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub name: String,
    pub inst_begin_idx: u32,
    pub inst_end_idx: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inst {
    pub result: Option<String>,
    pub mnemonic: String,
    /// Explicit `addrspace(N)` annotation, only allowed on loads and stores.
    pub address_space: Option<u32>,
    /// Operand tokens as written (`%val`, `^block`, `$imm`).
    pub operands: Vec<String>,
}

impl Inst {
    pub fn kind(&self) -> InstKind {
        let address_space = self.address_space.unwrap_or(0);
        match self.mnemonic.as_str() {
            "load" => InstKind::Load { address_space },
            "store" => InstKind::Store { address_space },
            _ => InstKind::Other,
        }
    }

    /// Source form of the instruction.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(result) = &self.result {
            out.push_str(&format!("%{result} = "));
        }
        out.push_str(&self.mnemonic);
        if let Some(space) = self.address_space {
            out.push_str(&format!(" addrspace({space})"));
        }
        if !self.operands.is_empty() {
            out.push(' ');
            out.push_str(&self.operands.join(", "));
        }
        out
    }
}

impl TestIR {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(text: &str) -> FeatureResult<Self> {
        parser::parse_ir(text)
    }

    pub fn function_blocks(&self, func: &Function) -> &[Block] {
        &self.blocks[func.block_begin_idx as usize..func.block_end_idx as usize]
    }

    pub fn block_insts(&self, block: &Block) -> &[Inst] {
        &self.insts[block.inst_begin_idx as usize..block.inst_end_idx as usize]
    }

    pub fn print(&self) -> String {
        let mut output = String::new();
        output.push_str("Printing IR\n");

        for func in &self.functions {
            if func.declaration {
                output.push_str(&format!("Extern function {}\n", func.name));
            } else {
                output.push_str(&format!("Function {}\n", func.name));
            }
            for arg in &func.args {
                output.push_str(&format!("Argument {arg}\n"));
            }
            for block in self.function_blocks(func) {
                output.push_str(&format!("Block {}\n", block.name));
                for inst in self.block_insts(block) {
                    match &inst.result {
                        Some(name) => output.push_str(&format!("Value {} ({})\n", name, inst.mnemonic)),
                        None => output.push_str(&format!("Value ({})\n", inst.mnemonic)),
                    }
                    if let Some(space) = inst.address_space {
                        output.push_str(&format!("AddrSpace {space}\n"));
                    }
                    for op in &inst.operands {
                        output.push_str(&format!("Op {}\n", op.trim_start_matches('%')));
                    }
                }
            }
        }

        output
    }
}

impl std::fmt::Display for TestIR {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.print())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inst_kind_defaults_to_private() {
        let inst = Inst {
            result: Some("v".into()),
            mnemonic: "load".into(),
            address_space: None,
            operands: vec!["%p".into()],
        };
        assert_eq!(inst.kind(), InstKind::Load { address_space: 0 });
        assert_eq!(inst.render(), "%v = load %p");
    }

    #[test]
    fn test_render_store_with_address_space() {
        let inst = Inst {
            result: None,
            mnemonic: "store".into(),
            address_space: Some(2),
            operands: vec!["%v".into(), "%p".into()],
        };
        assert_eq!(inst.kind(), InstKind::Store { address_space: 2 });
        assert_eq!(inst.render(), "store addrspace(2) %v, %p");
    }

    #[test]
    fn test_print_lists_functions_blocks_and_values() {
        let text = "declare get_global_id(%dim)\nsaxpy(%a, %p) {\nentry:\n  %m = load addrspace(2) %p\n  %s = fadd %a, %m\n  store %s, %p\n  ret\n}\n";
        let ir = TestIR::parse(text).unwrap();
        let expected = "\
Printing IR
Extern function get_global_id
Argument dim
Function saxpy
Argument a
Argument p
Block entry
Value m (load)
AddrSpace 2
Op p
Value s (fadd)
Op a
Op m
Value (store)
Op s
Op p
Value (ret)
";
        assert_eq!(ir.print(), expected);
        assert_eq!(ir.to_string(), expected);
    }
}
