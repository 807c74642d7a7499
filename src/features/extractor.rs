// This module drives one analysis run. It walks an IrAdaptor in strict nested order
// (functions, then blocks of each function, then instructions of each block), classifies
// every instruction and feeds the result to a FeatureAggregator that it owns for the
// duration of the walk. Loads and stores are counted first and then handed to the
// address-space accountant; an unrecognized address space is logged as a warning that
// carries the instruction's printable form. When trace logging is enabled every visited instruction is
// logged in its printable form. The walk never fails: the IR is fully materialized
// before it starts, and anomalies are counted rather than raised.

//! Traversal driver tying classification and aggregation together.

use super::address_space::{account, unhandled_address_space_message, AddressSpace};
use super::aggregator::{FeatureAggregator, FeatureSnapshot};
use super::classifier::{classify_full, InstructionInfo};
use crate::core::IrAdaptor;

/// Walks a module and accumulates its features.
pub struct FeatureExtractor<'a, A: IrAdaptor> {
    adaptor: &'a mut A,
    aggregator: FeatureAggregator,
}

impl<'a, A: IrAdaptor> FeatureExtractor<'a, A> {
    pub fn new(adaptor: &'a mut A) -> Self {
        Self {
            adaptor,
            aggregator: FeatureAggregator::new(),
        }
    }

    /// Walk the whole module and produce the finalized snapshot.
    pub fn run(mut self) -> FeatureSnapshot {
        let funcs: Vec<A::FuncRef> = self.adaptor.funcs().collect();
        log::debug!("Extracting features from {} functions", funcs.len());
        for func in funcs {
            self.visit_function(func);
        }
        self.aggregator.finalize()
    }

    fn visit_function(&mut self, func: A::FuncRef) {
        self.aggregator.observe_function();
        if !self.adaptor.switch_func(func) {
            log::warn!("Could not switch to function {}", self.adaptor.func_link_name(func));
            return;
        }
        log::trace!("Function {}", self.adaptor.func_link_name(func));

        let adaptor = &*self.adaptor;
        let aggregator = &mut self.aggregator;
        for block in adaptor.blocks() {
            aggregator.observe_block();
            for inst in adaptor.block_insts(block) {
                if log::log_enabled!(log::Level::Trace) {
                    log::trace!("Found an instruction: {}", adaptor.inst_display(inst));
                }
                let info = InstructionInfo::new(adaptor.inst_mnemonic(inst), adaptor.inst_kind(inst));
                if let Some(AddressSpace::Unrecognized(id)) = observe_instruction(aggregator, &info) {
                    log::warn!("{}", unrecognized_access_warning(adaptor, inst, id));
                }
            }
        }
    }
}

fn unrecognized_access_warning<A: IrAdaptor>(adaptor: &A, inst: A::InstRef, address_space_id: u32) -> String {
    unhandled_address_space_message(address_space_id, &adaptor.inst_display(inst))
}

/// Classify one instruction and record it, including its address space for
/// loads and stores. Returns the address space that was accounted, if any.
pub fn observe_instruction(aggregator: &mut FeatureAggregator, info: &InstructionInfo<'_>) -> Option<AddressSpace> {
    let classification = classify_full(info);
    aggregator.observe_instruction(classification);
    if !classification.category.is_memory() {
        return None;
    }
    info.kind.address_space().map(|id| account(id, aggregator))
}

/// Convenience wrapper around [`FeatureExtractor`].
pub fn extract_features<A: IrAdaptor>(adaptor: &mut A) -> FeatureSnapshot {
    FeatureExtractor::new(adaptor).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::InstKind;
    use crate::test_ir::{TestIR, TestIRAdaptor};

    #[test]
    fn test_observe_load_accounts_address_space() {
        let mut agg = FeatureAggregator::new();
        observe_instruction(&mut agg, &InstructionInfo::new("load", InstKind::Load { address_space: 1 }));
        let s = agg.finalize();
        assert_eq!(s.load_ops, 1);
        assert_eq!(s.local_mem_accesses, 1);
        assert_eq!(s.global_mem_accesses + s.private_mem_accesses, 0);
    }

    #[test]
    fn test_observe_non_memory_leaves_address_spaces_alone() {
        let mut agg = FeatureAggregator::new();
        observe_instruction(&mut agg, &InstructionInfo::new("add", InstKind::Other));
        let s = agg.finalize();
        assert_eq!(s.binary_ops, 1);
        assert_eq!(s.recognized_mem_accesses() + s.unrecognized_address_spaces, 0);
    }

    #[test]
    fn test_unrecognized_store_warning_names_instruction() {
        let ir = TestIR::parse("k(%p) {\nentry:\n  %v = load addrspace(2) %p\n  store addrspace(5) %v, %p\n  ret\n}\n").unwrap();
        let mut adaptor = TestIRAdaptor::new(&ir);
        let func = adaptor.funcs().next().unwrap();
        assert!(adaptor.switch_func(func));

        let mut agg = FeatureAggregator::new();
        let mut warnings = Vec::new();
        for block in adaptor.blocks() {
            for inst in adaptor.block_insts(block) {
                let info = InstructionInfo::new(adaptor.inst_mnemonic(inst), adaptor.inst_kind(inst));
                if let Some(AddressSpace::Unrecognized(id)) = observe_instruction(&mut agg, &info) {
                    warnings.push(unrecognized_access_warning(&adaptor, inst, id));
                }
            }
        }

        assert_eq!(warnings, vec!["unhandled address space id 5 in: store addrspace(5) %v, %p"]);
        let s = agg.finalize();
        assert_eq!(s.unrecognized_address_spaces, 1);
        assert_eq!(s.global_mem_accesses, 1);
    }
}
