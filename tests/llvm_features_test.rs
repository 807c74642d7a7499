//! Feature extraction over real LLVM modules.
//!
//! Modules are written as textual IR, and round-tripped through bitcode files
//! to check that both input forms produce the same feature vector.

use inkwell::context::Context;
use oclfeat::analyze::analyze_file;
use oclfeat::llvm::{parse_ir_text, LlvmAdaptor};
use oclfeat::{extract_features, FeatureError, FeatureSnapshot};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const VECTOR_ADD: &str = r#"
declare i64 @get_global_id(i32)

define void @vector_add(ptr addrspace(2) %a, ptr addrspace(2) %b, ptr addrspace(2) %c, ptr addrspace(1) %tile) {
entry:
  %id = call i64 @get_global_id(i32 0)
  %pa = getelementptr float, ptr addrspace(2) %a, i64 %id
  %pb = getelementptr float, ptr addrspace(2) %b, i64 %id
  %va = load float, ptr addrspace(2) %pa
  %vb = load float, ptr addrspace(2) %pb
  %sum = fadd float %va, %vb
  %scaled = fmul float %sum, 2.0
  %tmp = alloca float
  store float %scaled, ptr %tmp
  %back = load float, ptr %tmp
  store float %back, ptr addrspace(1) %tile
  %pc = getelementptr float, ptr addrspace(2) %c, i64 %id
  store float %back, ptr addrspace(2) %pc
  %odd = and i64 %id, 1
  %is_odd = icmp ne i64 %odd, 0
  br i1 %is_odd, label %vec, label %done

vec:
  %v0 = insertelement <4 x float> undef, float %back, i32 0
  %v1 = shufflevector <4 x float> %v0, <4 x float> undef, <4 x i32> zeroinitializer
  %e = extractelement <4 x float> %v1, i32 3
  %agg = insertvalue { float, i32 } undef, float %e, 0
  %f = extractvalue { float, i32 } %agg, 0
  br label %done

done:
  ret void
}
"#;

const ODD_ADDRESS_SPACE: &str = r#"
define void @odd(ptr addrspace(5) %p, i32 %v) {
entry:
  store i32 %v, ptr addrspace(5) %p
  ret void
}
"#;

fn extract_text(ir: &str) -> FeatureSnapshot {
    let _ = env_logger::builder().is_test(true).try_init();
    let context = Context::create();
    let module = parse_ir_text(&context, ir, "test").unwrap();
    extract_features(&mut LlvmAdaptor::new(&module))
}

#[test]
fn test_vector_add_counts() {
    let s = extract_text(VECTOR_ADD);
    assert_eq!(s.functions, 2, "declarations count as functions");
    assert_eq!(s.basic_blocks, 3);
    assert_eq!(s.binary_ops, 2);
    assert_eq!(s.bitwise_ops, 1);
    assert_eq!(s.vector_ops, 3);
    assert_eq!(s.aggregate_ops, 2);
    assert_eq!(s.load_ops, 3);
    assert_eq!(s.store_ops, 3);
    // call, 3 x gep, alloca, icmp, br, br, ret
    assert_eq!(s.other_ops, 9);
    assert_eq!(s.total_ops(), 23);

    assert_eq!(s.global_mem_accesses, 3);
    assert_eq!(s.local_mem_accesses, 1);
    assert_eq!(s.private_mem_accesses, 2);
    assert_eq!(s.unrecognized_address_spaces, 0);

    assert_eq!(s.float_adds, 1);
    assert_eq!(s.float_muls, 1);
    assert_eq!(s.total_float_ops(), 2);
}

#[test]
fn test_unrecognized_address_space_is_not_fatal() {
    let s = extract_text(ODD_ADDRESS_SPACE);
    assert_eq!(s.store_ops, 1);
    assert_eq!(s.other_ops, 1);
    assert_eq!(s.recognized_mem_accesses(), 0);
    assert_eq!(s.unrecognized_address_spaces, 1);
}

#[test]
fn test_bitcode_and_text_agree() {
    let dir = TempDir::new().unwrap();
    let ll_path = dir.path().join("vector_add.ll");
    let bc_path = dir.path().join("vector_add.bc");
    fs::write(&ll_path, VECTOR_ADD).unwrap();

    let context = Context::create();
    let module = parse_ir_text(&context, VECTOR_ADD, "vector_add").unwrap();
    assert!(module.write_bitcode_to_path(&bc_path));

    let from_text = analyze_file(&ll_path).unwrap();
    let from_bitcode = analyze_file(&bc_path).unwrap();
    assert_eq!(from_text, from_bitcode);
    assert_eq!(from_text, extract_text(VECTOR_ADD));
}

#[test]
fn test_garbage_file_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.bc");
    fs::write(&path, b"BC\xC0\xDEnot really bitcode").unwrap();

    let err = analyze_file(&path).unwrap_err();
    assert!(matches!(err, FeatureError::Parse { .. }), "{err}");
    assert!(err.is_input_error());
}

#[test]
fn test_missing_file_is_load_error() {
    let err = analyze_file(std::path::Path::new("/nonexistent/kernel.bc")).unwrap_err();
    assert!(matches!(err, FeatureError::Load { .. }), "{err}");
}
