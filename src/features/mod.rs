//! Instruction classification and feature aggregation.
//!
//! # Key Components
//!
//! ## Classifier (`classifier`)
//! - Curated mnemonic tables checked in a fixed order
//! - Structural load/store fallback
//! - Floating point overlay tags
//!
//! ## Address-Space Accountant (`address_space`)
//! - Private (0), local (1) and global (2) memory
//! - Unknown ids are counted as warnings, never fatal
//!
//! ## Aggregator (`aggregator`)
//! - Single-owner running counters
//! - `finalize` consumes the aggregator into an immutable snapshot
//!
//! ## Report Emitter (`report`)
//! - CSV record with a fixed, append-only column order
//! - Labeled console summary
//!
//! ## Extractor (`extractor`)
//! - Nested traversal over any [`IrAdaptor`](crate::core::IrAdaptor)

pub mod classifier;
pub mod address_space;
pub mod aggregator;
pub mod report;
pub mod extractor;

pub use classifier::{classify, classify_full, Category, Classification, FloatOp, InstructionInfo};
pub use address_space::{account, AddressSpace};
pub use aggregator::{FeatureAggregator, FeatureSnapshot};
pub use report::{csv_row, summary, to_csv, write_csv, Summary, CSV_HEADER};
pub use extractor::{extract_features, FeatureExtractor};
