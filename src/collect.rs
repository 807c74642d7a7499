// This module implements batch feature collection over a directory of kernels. Kernels are
// discovered recursively; OpenCL sources (*.cl) are compiled to bitcode with clang against
// the libclc headers, with an injected header that maps __local to address space 1 and
// __global to address space 2 so the extractor can tell the memory regions apart. Ready
// made bitcode, textual LLVM IR and test IR files are analyzed as they are. Each kernel
// gets its own LLVM context and aggregator; a kernel that fails to compile or parse is
// logged and skipped, and the rest of the batch carries on. Scratch files live in a
// temporary directory that disappears with the Collector.

//! Batch collection of kernel features into one CSV file.

use crate::analyze::analyze_file;
use crate::core::error::{FeatureError, FeatureResult};
use crate::features::{csv_row, FeatureSnapshot, CSV_HEADER};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Header injected into every OpenCL compilation.
pub const KERNEL_HEADER: &str = r#"
#ifndef ADDRESS_SPACE_H
#define ADDRESS_SPACE_H

#define __local __attribute__((address_space(1)))
#define __global __attribute__((address_space(2)))

#endif
"#;

/// File extensions picked up by [`discover_kernels`].
pub const KERNEL_EXTENSIONS: &[&str] = &["cl", "bc", "ll", "tir"];

/// How OpenCL kernels are turned into bitcode.
#[derive(Debug, Clone)]
pub struct CompileConfig {
    /// clang executable.
    pub clang: PathBuf,
    /// libclc checkout; required only when `.cl` sources are present.
    pub libclc_home: Option<PathBuf>,
    /// Preprocessor definitions, without the `-D` prefix.
    pub defines: Vec<String>,
    pub opt_level: String,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            clang: PathBuf::from("clang"),
            libclc_home: None,
            defines: vec![
                "BLOCK_SIZE=16".to_string(),
                "cl_clang_storage_class_specifiers".to_string(),
            ],
            opt_level: "-O3".to_string(),
        }
    }
}

impl CompileConfig {
    /// The clang invocation compiling `kernel` to bitcode at `output`.
    pub fn command(&self, header: &Path, kernel: &Path, output: &Path) -> FeatureResult<Command> {
        let libclc = self.libclc_home.as_ref().ok_or_else(|| FeatureError::Compile {
            kernel: kernel.to_path_buf(),
            reason: "libclc home is required to compile OpenCL sources".to_string(),
        })?;
        let include_dir = libclc.join("generic").join("include");

        let mut cmd = Command::new(&self.clang);
        cmd.arg("-include")
            .arg(header)
            .arg("-include")
            .arg(include_dir.join("clc").join("clc.h"))
            .arg("-I")
            .arg(&include_dir);
        for define in &self.defines {
            cmd.arg(format!("-D{define}"));
        }
        cmd.args(["-emit-llvm", "-c", self.opt_level.as_str(), "-w", "-x", "cl"])
            .arg(kernel)
            .arg("-o")
            .arg(output);
        Ok(cmd)
    }
}

/// Features of one kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelFeatures {
    pub kernel: PathBuf,
    pub snapshot: FeatureSnapshot,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct CollectReport {
    /// Successful kernels, sorted by path.
    pub rows: Vec<KernelFeatures>,
    pub failures: Vec<(PathBuf, FeatureError)>,
}

impl CollectReport {
    /// Combined CSV: a `kernel` column followed by the per-module columns.
    pub fn to_csv(&self) -> String {
        let mut out = format!("kernel,{}\n", CSV_HEADER);
        for row in &self.rows {
            out.push_str(&csv_field(&row.kernel.display().to_string()));
            out.push(',');
            out.push_str(&csv_row(&row.snapshot));
            out.push('\n');
        }
        out
    }

    pub fn write_csv(&self, path: &Path) -> FeatureResult<()> {
        fs::write(path, self.to_csv())?;
        log::info!("{} feature vectors written to: {}", self.rows.len(), path.display());
        Ok(())
    }
}

/// Quote a CSV field when it needs it.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Delete a scratch file. A failure is logged; the scratch directory still
/// goes away with the Collector.
fn remove_scratch(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Could not remove scratch file {}: {}", path.display(), e);
            false
        }
    }
}

/// All kernel files below `root`, sorted by path.
pub fn discover_kernels(root: &Path) -> FeatureResult<Vec<PathBuf>> {
    let mut kernels = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                log::warn!("Skipping directory entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let wanted = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| KERNEL_EXTENSIONS.contains(&ext));
        if wanted {
            kernels.push(path.to_path_buf());
        }
    }
    kernels.sort();
    Ok(kernels)
}

/// Compiles and analyzes kernels, keeping scratch files in a temporary directory.
pub struct Collector {
    config: CompileConfig,
    scratch: TempDir,
    header: PathBuf,
    compiled: usize,
}

impl Collector {
    pub fn new(config: CompileConfig) -> FeatureResult<Self> {
        let scratch = TempDir::new()?;
        let header = scratch.path().join("kernel.h");
        fs::write(&header, KERNEL_HEADER)?;
        Ok(Self {
            config,
            scratch,
            header,
            compiled: 0,
        })
    }

    /// Compile one OpenCL source to bitcode in the scratch directory.
    pub fn compile(&mut self, kernel: &Path) -> FeatureResult<PathBuf> {
        let output = self.scratch.path().join(format!("kernel_{}.bc", self.compiled));
        self.compiled += 1;

        let mut cmd = self.config.command(&self.header, kernel, &output)?;
        log::info!("COMPILING: {:?}", cmd);
        let result = cmd.output().map_err(|e| FeatureError::Compile {
            kernel: kernel.to_path_buf(),
            reason: format!("failed to run {}: {}", self.config.clang.display(), e),
        })?;
        if !result.status.success() {
            return Err(FeatureError::Compile {
                kernel: kernel.to_path_buf(),
                reason: format!(
                    "{}: {}",
                    result.status,
                    String::from_utf8_lossy(&result.stderr).trim()
                ),
            });
        }
        Ok(output)
    }

    /// Features of one kernel, compiling it first if it is an OpenCL source.
    pub fn analyze_kernel(&mut self, kernel: &Path) -> FeatureResult<FeatureSnapshot> {
        let is_source = kernel.extension().and_then(|e| e.to_str()) == Some("cl");
        if is_source {
            let bitcode = self.compile(kernel)?;
            let snapshot = analyze_file(&bitcode);
            // Scratch bitcode is not needed once analyzed.
            remove_scratch(&bitcode);
            snapshot
        } else {
            analyze_file(kernel)
        }
    }

    /// Analyze every kernel below `root`.
    pub fn collect(&mut self, root: &Path) -> FeatureResult<CollectReport> {
        let kernels = discover_kernels(root)?;
        log::info!("Kernels found: {}", kernels.len());
        for kernel in &kernels {
            log::debug!("  {}", kernel.display());
        }

        let mut report = CollectReport::default();
        for kernel in kernels {
            log::info!("GETTING FEATURES: {}", kernel.display());
            match self.analyze_kernel(&kernel) {
                Ok(snapshot) => report.rows.push(KernelFeatures { kernel, snapshot }),
                Err(err) => {
                    log::error!("Skipping {}: {}", kernel.display(), err);
                    report.failures.push((kernel, err));
                }
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_requires_libclc() {
        let config = CompileConfig::default();
        let err = config
            .command(Path::new("kernel.h"), Path::new("k.cl"), Path::new("k.bc"))
            .unwrap_err();
        assert!(matches!(err, FeatureError::Compile { .. }));
    }

    #[test]
    fn test_command_arguments() {
        let config = CompileConfig {
            libclc_home: Some(PathBuf::from("/opt/libclc")),
            ..CompileConfig::default()
        };
        let cmd = config
            .command(Path::new("/tmp/kernel.h"), Path::new("k.cl"), Path::new("k.bc"))
            .unwrap();
        assert_eq!(cmd.get_program(), "clang");
        let args: Vec<String> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args[0..2], ["-include", "/tmp/kernel.h"]);
        assert!(args.contains(&"/opt/libclc/generic/include/clc/clc.h".to_string()));
        assert!(args.contains(&"-DBLOCK_SIZE=16".to_string()));
        assert!(args.contains(&"-emit-llvm".to_string()));
        let x = args.iter().position(|a| a == "-x").unwrap();
        let input = args.iter().position(|a| a == "k.cl").unwrap();
        assert!(x < input, "language must be set before the input file");
        assert_eq!(args[args.len() - 2..], ["-o", "k.bc"]);
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("a/b.cl"), "a/b.cl");
        assert_eq!(csv_field("a,b.cl"), "\"a,b.cl\"");
        assert_eq!(csv_field("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_header_maps_address_spaces() {
        assert!(KERNEL_HEADER.contains("__local __attribute__((address_space(1)))"));
        assert!(KERNEL_HEADER.contains("__global __attribute__((address_space(2)))"));
    }

    #[test]
    fn test_remove_scratch_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let bitcode = dir.path().join("k.bc");
        fs::write(&bitcode, b"BC").unwrap();
        assert!(remove_scratch(&bitcode));
        assert!(!bitcode.exists());
        // Already gone: logged and reported, not silently dropped.
        assert!(!remove_scratch(&bitcode));
    }

    #[test]
    fn test_discover_missing_root_is_error() {
        let err = discover_kernels(Path::new("/nonexistent/kernels")).unwrap_err();
        assert!(matches!(err, FeatureError::Walk(_)));
    }
}
