//! One analysis run: pick the IR provider for a file, load it, and extract
//! its features.

use crate::core::error::{FeatureError, FeatureResult};
use crate::features::{extract_features, FeatureSnapshot};
use crate::llvm::{load_module, LlvmAdaptor};
use crate::test_ir::{TestIR, TestIRAdaptor};
use inkwell::context::Context;
use std::fs;
use std::path::Path;

/// Input formats understood by [`analyze_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IrFormat {
    /// LLVM bitcode or textual LLVM IR; the loader tells them apart by content.
    Llvm,
    /// The textual test IR.
    TestIr,
}

impl IrFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("tir") => IrFormat::TestIr,
            _ => IrFormat::Llvm,
        }
    }
}

/// Load `path` and extract the features of the module it contains.
pub fn analyze_file(path: &Path) -> FeatureResult<FeatureSnapshot> {
    match IrFormat::from_path(path) {
        IrFormat::Llvm => {
            let context = Context::create();
            let module = load_module(&context, path)?;
            let mut adaptor = LlvmAdaptor::new(&module);
            Ok(extract_features(&mut adaptor))
        }
        IrFormat::TestIr => {
            let text = fs::read_to_string(path).map_err(|e| FeatureError::Load {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            let ir = TestIR::parse(&text).map_err(|e| match e {
                FeatureError::Parse { reason, .. } => FeatureError::Parse {
                    source_name: path.display().to_string(),
                    reason,
                },
                other => other,
            })?;
            if log::log_enabled!(log::Level::Trace) {
                log::trace!("{ir}");
            }
            let mut adaptor = TestIRAdaptor::new(&ir);
            Ok(extract_features(&mut adaptor))
        }
    }
}
