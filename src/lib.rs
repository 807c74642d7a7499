//! oclfeat - static instruction features for compiled kernels.
//!
//! Walks an IR module (functions, basic blocks, instructions), classifies
//! every instruction into a fixed category taxonomy, accounts memory
//! operations by address space, and reports the counts as one CSV row.
//!
//! # Primary Usage
//!
//! ```ignore
//! use oclfeat::analyze::analyze_file;
//! use oclfeat::features::{to_csv, Summary};
//!
//! let snapshot = analyze_file(Path::new("kernel.bc"))?;
//! println!("{}", Summary(&snapshot));
//! std::fs::write("features.csv", to_csv(&snapshot))?;
//! ```
//!
//! # Architecture
//!
//! - [`core`] - IR adaptor trait and error types
//! - [`features`] - Classifier, address-space accountant, aggregator, reports
//! - [`llvm`] - LLVM bitcode/textual IR provider
//! - [`test_ir`] - Small textual IR for tests and fixtures
//! - [`collect`] - Batch collection over a kernel directory

pub mod core;
pub mod features;
pub mod llvm;
pub mod test_ir;
pub mod analyze;
pub mod collect;
pub mod logging;

pub use core::{FeatureError, FeatureResult, InstKind, IrAdaptor};
pub use features::{
    classify, extract_features, AddressSpace, Category, FeatureAggregator, FeatureSnapshot, FloatOp,
};
pub use analyze::analyze_file;
