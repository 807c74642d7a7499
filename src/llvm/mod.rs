//! LLVM IR provider.
//!
//! Loads bitcode or textual LLVM IR through `inkwell` and exposes it to the
//! feature extractor through [`LlvmAdaptor`].
//!
//! # Example
//! ```ignore
//! use inkwell::context::Context;
//! use oclfeat::llvm::{load_module, LlvmAdaptor};
//! use oclfeat::features::extract_features;
//!
//! let context = Context::create();
//! let module = load_module(&context, path)?;
//! let snapshot = extract_features(&mut LlvmAdaptor::new(&module));
//! ```

pub mod adaptor;
pub mod loader;

pub use adaptor::{opcode_name, LlvmAdaptor};
pub use loader::{is_bitcode, load, load_module, parse, parse_ir_text};
