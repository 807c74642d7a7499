//! Loading and parsing LLVM modules.
//!
//! `load` reads a file into a [`MemoryBuffer`]; `parse` turns a buffer into a
//! [`Module`], accepting both bitcode and textual IR. Both failures are fatal
//! for a run and are reported before any traversal starts.

use crate::core::error::{FeatureError, FeatureResult};
use inkwell::context::Context;
use inkwell::memory_buffer::MemoryBuffer;
use inkwell::module::Module;
use std::path::Path;

/// Raw bitcode magic: `BC 0xC0DE`.
pub const BITCODE_MAGIC: [u8; 4] = [b'B', b'C', 0xC0, 0xDE];

/// Magic of the bitcode wrapper header used by some toolchains.
pub const BITCODE_WRAPPER_MAGIC: [u8; 4] = [0xDE, 0xC0, 0x17, 0x0B];

/// Whether the bytes look like LLVM bitcode rather than textual IR.
pub fn is_bitcode(bytes: &[u8]) -> bool {
    bytes.starts_with(&BITCODE_MAGIC) || bytes.starts_with(&BITCODE_WRAPPER_MAGIC)
}

/// Read an IR file into memory.
pub fn load(path: &Path) -> FeatureResult<MemoryBuffer> {
    let buffer = MemoryBuffer::create_from_file(path).map_err(|e| FeatureError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    log::info!("Bitcode file loaded: {}", path.display());
    Ok(buffer)
}

/// Parse a buffer holding bitcode or textual IR.
pub fn parse<'ctx>(
    context: &'ctx Context,
    buffer: MemoryBuffer,
    source_name: &str,
) -> FeatureResult<Module<'ctx>> {
    let parsed = if is_bitcode(buffer.as_slice()) {
        Module::parse_bitcode_from_buffer(&buffer, context)
    } else {
        context.create_module_from_ir(buffer)
    };
    let module = parsed.map_err(|e| FeatureError::Parse {
        source_name: source_name.to_string(),
        reason: e.to_string(),
    })?;
    log::info!("Bitcode parsed successfully!");
    Ok(module)
}

/// Parse a textual LLVM IR module held in a string.
pub fn parse_ir_text<'ctx>(
    context: &'ctx Context,
    ir: &str,
    source_name: &str,
) -> FeatureResult<Module<'ctx>> {
    let buffer = MemoryBuffer::create_from_memory_range_copy(ir.as_bytes(), source_name);
    parse(context, buffer, source_name)
}

/// Load and parse in one step.
pub fn load_module<'ctx>(context: &'ctx Context, path: &Path) -> FeatureResult<Module<'ctx>> {
    let buffer = load(path)?;
    parse(context, buffer, &path.display().to_string())
}
