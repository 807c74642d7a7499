// This module implements the feature aggregator, the single owner of all running counters
// during one traversal. The extractor feeds it functions, blocks and classified
// instructions in traversal order, and the address-space accountant feeds it the memory
// region of every load and store. finalize consumes the aggregator and produces an
// immutable FeatureSnapshot, so a snapshot can only be finalized once per traversal.
// partial_snapshot exists for progress reporting mid-traversal; its invariants are not
// guaranteed until traversal completes. merge folds another aggregator into this one,
// which is how per-function accumulators would be combined by a parallel traversal.

//! Running feature counters and the finalized snapshot.

use super::address_space::AddressSpace;
use super::classifier::{Category, Classification, FloatOp};

/// Immutable record of all counters for one module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureSnapshot {
    pub functions: u64,
    pub basic_blocks: u64,

    pub binary_ops: u64,
    pub bitwise_ops: u64,
    pub vector_ops: u64,
    pub aggregate_ops: u64,
    pub load_ops: u64,
    pub store_ops: u64,
    pub other_ops: u64,

    pub global_mem_accesses: u64,
    pub local_mem_accesses: u64,
    pub private_mem_accesses: u64,
    /// Loads and stores whose address space was not recognized.
    pub unrecognized_address_spaces: u64,

    pub float_adds: u64,
    pub float_subs: u64,
    pub float_muls: u64,
    pub float_divs: u64,
    pub float_rems: u64,
}

impl FeatureSnapshot {
    /// Count for one category.
    pub fn category_count(&self, category: Category) -> u64 {
        match category {
            Category::BinaryArithmetic => self.binary_ops,
            Category::BitwiseBinary => self.bitwise_ops,
            Category::VectorOp => self.vector_ops,
            Category::AggregateOp => self.aggregate_ops,
            Category::Load => self.load_ops,
            Category::Store => self.store_ops,
            Category::Other => self.other_ops,
        }
    }

    /// Count for one floating point overlay tag.
    pub fn float_op_count(&self, op: FloatOp) -> u64 {
        match op {
            FloatOp::FAdd => self.float_adds,
            FloatOp::FSub => self.float_subs,
            FloatOp::FMul => self.float_muls,
            FloatOp::FDiv => self.float_divs,
            FloatOp::FRem => self.float_rems,
        }
    }

    /// Total number of classified instructions.
    pub fn total_ops(&self) -> u64 {
        Category::ALL.iter().map(|&c| self.category_count(c)).sum()
    }

    /// Total number of floating point arithmetic instructions.
    pub fn total_float_ops(&self) -> u64 {
        FloatOp::ALL.iter().map(|&op| self.float_op_count(op)).sum()
    }

    /// Memory accesses attributed to a known address space.
    pub fn recognized_mem_accesses(&self) -> u64 {
        self.global_mem_accesses + self.local_mem_accesses + self.private_mem_accesses
    }
}

/// Single-owner accumulator for one traversal.
#[derive(Debug, Clone, Default)]
pub struct FeatureAggregator {
    functions: u64,
    blocks: u64,
    categories: [u64; Category::COUNT],
    float_ops: [u64; FloatOp::COUNT],
    private: u64,
    local: u64,
    global: u64,
    unrecognized: u64,
}

impl FeatureAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe_function(&mut self) {
        self.functions += 1;
    }

    pub fn observe_block(&mut self) {
        self.blocks += 1;
    }

    /// Count one classified instruction.
    pub fn observe_instruction(&mut self, classification: Classification) {
        self.categories[classification.category.index()] += 1;
        if let Some(op) = classification.float_op {
            self.float_ops[op.index()] += 1;
        }
    }

    /// Count the address space of a load or store.
    pub fn observe_address_space(&mut self, space: AddressSpace) {
        match space {
            AddressSpace::Private => self.private += 1,
            AddressSpace::Local => self.local += 1,
            AddressSpace::Global => self.global += 1,
            AddressSpace::Unrecognized(_) => self.unrecognized += 1,
        }
    }

    /// Number of instructions observed so far.
    pub fn instructions_seen(&self) -> u64 {
        self.categories.iter().sum()
    }

    /// Fold another accumulator into this one.
    pub fn merge(&mut self, other: &FeatureAggregator) {
        self.functions += other.functions;
        self.blocks += other.blocks;
        for (dst, src) in self.categories.iter_mut().zip(other.categories) {
            *dst += src;
        }
        for (dst, src) in self.float_ops.iter_mut().zip(other.float_ops) {
            *dst += src;
        }
        self.private += other.private;
        self.local += other.local;
        self.global += other.global;
        self.unrecognized += other.unrecognized;
    }

    /// Snapshot of the counters so far.
    ///
    /// Partial: taken mid-traversal, the block/function counts and the
    /// load/store to address-space correspondence may not hold yet.
    pub fn partial_snapshot(&self) -> FeatureSnapshot {
        let cat = |c: Category| self.categories[c.index()];
        let fop = |op: FloatOp| self.float_ops[op.index()];
        FeatureSnapshot {
            functions: self.functions,
            basic_blocks: self.blocks,
            binary_ops: cat(Category::BinaryArithmetic),
            bitwise_ops: cat(Category::BitwiseBinary),
            vector_ops: cat(Category::VectorOp),
            aggregate_ops: cat(Category::AggregateOp),
            load_ops: cat(Category::Load),
            store_ops: cat(Category::Store),
            other_ops: cat(Category::Other),
            global_mem_accesses: self.global,
            local_mem_accesses: self.local,
            private_mem_accesses: self.private,
            unrecognized_address_spaces: self.unrecognized,
            float_adds: fop(FloatOp::FAdd),
            float_subs: fop(FloatOp::FSub),
            float_muls: fop(FloatOp::FMul),
            float_divs: fop(FloatOp::FDiv),
            float_rems: fop(FloatOp::FRem),
        }
    }

    /// Consume the aggregator and produce the final snapshot.
    pub fn finalize(self) -> FeatureSnapshot {
        let snapshot = self.partial_snapshot();
        debug_assert_eq!(
            snapshot.load_ops + snapshot.store_ops,
            snapshot.recognized_mem_accesses() + snapshot.unrecognized_address_spaces,
            "every load/store must be accounted exactly once"
        );
        snapshot
    }
}
