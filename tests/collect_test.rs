//! Batch collection over a directory of ready-made kernels.
//!
//! Uses textual LLVM IR and test IR so no clang installation is needed.

use oclfeat::collect::{discover_kernels, CollectReport, Collector, CompileConfig};
use oclfeat::features::CSV_HEADER;
use oclfeat::FeatureError;
use std::fs;
use tempfile::TempDir;

const ADD_LL: &str = "define i32 @add(i32 %a, i32 %b) {\nentry:\n  %c = add i32 %a, %b\n  ret i32 %c\n}\n";
const LOAD_TIR: &str = "k(%p) {\nentry:\n  %v = load addrspace(1) %p\n}\n";

fn kernel_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("b_add.ll"), ADD_LL).unwrap();
    fs::write(dir.path().join("nested").join("a_load.tir"), LOAD_TIR).unwrap();
    fs::write(dir.path().join("README.md"), "not a kernel").unwrap();
    dir
}

#[test]
fn test_discover_filters_and_sorts() {
    let dir = kernel_dir();
    let kernels = discover_kernels(dir.path()).unwrap();
    let names: Vec<_> = kernels
        .iter()
        .map(|k| k.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["b_add.ll", "nested/a_load.tir"]);
}

#[test]
fn test_collect_writes_one_row_per_kernel() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = kernel_dir();
    let mut collector = Collector::new(CompileConfig::default()).unwrap();
    let report = collector.collect(dir.path()).unwrap();

    assert!(report.failures.is_empty());
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.rows[0].snapshot.binary_ops, 1);
    assert_eq!(report.rows[1].snapshot.local_mem_accesses, 1);

    let out = dir.path().join("features.csv");
    report.write_csv(&out).unwrap();
    let csv = fs::read_to_string(&out).unwrap();
    let lines: Vec<_> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], format!("kernel,{CSV_HEADER}"));
    assert!(lines[1].ends_with("b_add.ll,1,1,1,0,0,0,0,0,1,2,0,0,0,0"), "{}", lines[1]);
    assert!(lines[2].contains("a_load.tir,1,1,0,0,0,0,1,0,0,1,0,1,0,0"), "{}", lines[2]);
}

#[test]
fn test_broken_kernel_is_skipped() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = kernel_dir();
    fs::write(dir.path().join("broken.ll"), "define i32 @oops( {").unwrap();

    let mut collector = Collector::new(CompileConfig::default()).unwrap();
    let report = collector.collect(dir.path()).unwrap();
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].0.ends_with("broken.ll"));
    assert!(matches!(report.failures[0].1, FeatureError::Parse { .. }));
}

#[test]
fn test_opencl_source_without_libclc_fails_cleanly() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("k.cl"), "__kernel void k() {}\n").unwrap();

    let mut collector = Collector::new(CompileConfig::default()).unwrap();
    let report = collector.collect(dir.path()).unwrap();
    assert!(report.rows.is_empty());
    assert!(matches!(report.failures[0].1, FeatureError::Compile { .. }));
}

#[test]
fn test_empty_report_has_header_only() {
    let report = CollectReport::default();
    assert_eq!(report.to_csv(), format!("kernel,{CSV_HEADER}\n"));
}
