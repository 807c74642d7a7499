// This module implements the instruction classifier. Each instruction falls into exactly
// one Category, decided by an ordered list of rules: the curated mnemonic tables for binary
// arithmetic, bitwise, aggregate and vector operations are checked first (in that order),
// then the structural load/store kind, and everything else is Other. The order matters
// because the tables are curated rather than derived from disjoint predicates. Floating
// point arithmetic additionally carries a FloatOp overlay tag, which feeds a secondary
// counter and never changes the primary category.

//! Instruction classification.

use crate::core::InstKind;

/// Binary arithmetic mnemonics.
pub const BINARY_ARITHMETIC_OPS: &[&str] = &[
    "add", "fadd", "sub", "fsub", "mul", "fmul", "udiv", "sdiv", "fdiv", "urem", "srem", "frem",
];

/// Bitwise binary mnemonics.
pub const BITWISE_BINARY_OPS: &[&str] = &["shl", "lshr", "ashr", "and", "or", "xor"];

/// Aggregate mnemonics.
pub const AGGREGATE_OPS: &[&str] = &["extractvalue", "insertvalue"];

/// Vector mnemonics.
pub const VECTOR_OPS: &[&str] = &["extractelement", "insertelement", "shufflevector"];

/// Primary category of an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    BinaryArithmetic,
    BitwiseBinary,
    VectorOp,
    AggregateOp,
    Load,
    Store,
    Other,
}

impl Category {
    pub const COUNT: usize = 7;

    /// All categories, in report order.
    pub const ALL: [Category; Self::COUNT] = [
        Category::BinaryArithmetic,
        Category::BitwiseBinary,
        Category::VectorOp,
        Category::AggregateOp,
        Category::Load,
        Category::Store,
        Category::Other,
    ];

    /// Dense index used by the aggregator's counter array.
    pub const fn index(self) -> usize {
        match self {
            Category::BinaryArithmetic => 0,
            Category::BitwiseBinary => 1,
            Category::VectorOp => 2,
            Category::AggregateOp => 3,
            Category::Load => 4,
            Category::Store => 5,
            Category::Other => 6,
        }
    }

    pub const fn is_memory(self) -> bool {
        matches!(self, Category::Load | Category::Store)
    }
}

/// Floating point overlay tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatOp {
    FAdd,
    FSub,
    FMul,
    FDiv,
    FRem,
}

impl FloatOp {
    pub const COUNT: usize = 5;

    pub const ALL: [FloatOp; Self::COUNT] = [FloatOp::FAdd, FloatOp::FSub, FloatOp::FMul, FloatOp::FDiv, FloatOp::FRem];

    pub const fn index(self) -> usize {
        match self {
            FloatOp::FAdd => 0,
            FloatOp::FSub => 1,
            FloatOp::FMul => 2,
            FloatOp::FDiv => 3,
            FloatOp::FRem => 4,
        }
    }

    pub fn from_mnemonic(mnemonic: &str) -> Option<Self> {
        match mnemonic {
            "fadd" => Some(FloatOp::FAdd),
            "fsub" => Some(FloatOp::FSub),
            "fmul" => Some(FloatOp::FMul),
            "fdiv" => Some(FloatOp::FDiv),
            "frem" => Some(FloatOp::FRem),
            _ => None,
        }
    }
}

/// The two facts the classifier needs about an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionInfo<'a> {
    pub mnemonic: &'a str,
    pub kind: InstKind,
}

impl<'a> InstructionInfo<'a> {
    pub fn new(mnemonic: &'a str, kind: InstKind) -> Self {
        Self { mnemonic, kind }
    }
}

/// Result of classifying one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub float_op: Option<FloatOp>,
}

/// Primary category of the instruction. First matching rule wins.
pub fn classify(inst: &InstructionInfo<'_>) -> Category {
    let mnemonic = inst.mnemonic;
    if BINARY_ARITHMETIC_OPS.contains(&mnemonic) {
        Category::BinaryArithmetic
    } else if BITWISE_BINARY_OPS.contains(&mnemonic) {
        Category::BitwiseBinary
    } else if AGGREGATE_OPS.contains(&mnemonic) {
        Category::AggregateOp
    } else if VECTOR_OPS.contains(&mnemonic) {
        Category::VectorOp
    } else {
        match inst.kind {
            InstKind::Load { .. } => Category::Load,
            InstKind::Store { .. } => Category::Store,
            InstKind::Other => Category::Other,
        }
    }
}

/// Category plus floating point overlay.
pub fn classify_full(inst: &InstructionInfo<'_>) -> Classification {
    let category = classify(inst);
    // Only binary arithmetic can carry the overlay.
    let float_op = match category {
        Category::BinaryArithmetic => FloatOp::from_mnemonic(inst.mnemonic),
        _ => None,
    };
    Classification { category, float_op }
}
