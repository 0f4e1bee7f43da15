//! End-to-end incremental build behavior over an in-memory file system,
//! driving the real reference compiler through a call-counting wrapper.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use veld_compiler::{Compiler, ModuleAst};
use veld_config::MakeConfig;
use veld_make::{
    build, BufferProgress, BuildSummary, CompiledArtifact, CompileError, CompilerBackend,
    MakeError, Module, ModuleInterface, ParseError, SilentProgress, SourceOrigin,
};
use veld_vfs::{FileSystem, MemoryFileSystem};

/// Counts backend compile invocations; parsing is delegated untouched.
struct CountingBackend {
    inner: Compiler,
    compiles: Cell<usize>,
}

impl CountingBackend {
    fn new() -> Self {
        Self {
            inner: Compiler::default(),
            compiles: Cell::new(0),
        }
    }
}

impl CompilerBackend for CountingBackend {
    type Ast = ModuleAst;

    fn parse_module(
        &self,
        origin: &SourceOrigin,
        text: &str,
    ) -> Result<Module<ModuleAst>, ParseError> {
        self.inner.parse_module(origin, text)
    }

    fn compile(
        &self,
        module: &Module<ModuleAst>,
        deps: &[ModuleInterface],
    ) -> Result<CompiledArtifact, CompileError> {
        self.compiles.set(self.compiles.get() + 1);
        self.inner.compile(module, deps)
    }
}

fn config() -> MakeConfig {
    MakeConfig {
        output_dir: PathBuf::from("output"),
        header_lines: Vec::new(),
        include_prelude: false,
    }
}

fn two_module_fs() -> MemoryFileSystem {
    MemoryFileSystem::with_files([
        (
            "/src/X.veld",
            b"module X\n\ndef twice n = __prim_add n n\n".to_vec(),
        ),
        (
            "/src/Y.veld",
            b"module Y\n\nimport X\n\ndef four = twice 2\n".to_vec(),
        ),
    ])
}

fn two_module_paths() -> Vec<PathBuf> {
    vec![PathBuf::from("/src/X.veld"), PathBuf::from("/src/Y.veld")]
}

fn run(fs: &MemoryFileSystem, cfg: &MakeConfig, paths: &[PathBuf]) -> (BuildSummary, usize) {
    let backend = CountingBackend::new();
    let summary = build(fs, &backend, &SilentProgress, cfg, paths).unwrap();
    (summary, backend.compiles.get())
}

fn rebuilt_names(summary: &BuildSummary) -> Vec<String> {
    summary.rebuilt.iter().map(|m| m.to_string()).collect()
}

fn skipped_names(summary: &BuildSummary) -> Vec<String> {
    summary.skipped.iter().map(|m| m.to_string()).collect()
}

#[test]
fn test_first_build_compiles_everything() {
    let fs = two_module_fs();
    let (summary, compiles) = run(&fs, &config(), &two_module_paths());

    assert_eq!(rebuilt_names(&summary), vec!["X", "Y"]);
    assert_eq!(compiles, 2);
    assert!(fs.exists(Path::new("output/X/index.js")));
    assert!(fs.exists(Path::new("output/X/externs.json")));
    assert!(fs.exists(Path::new("output/Y/index.js")));
    assert!(fs.exists(Path::new("output/Y/externs.json")));
}

#[test]
fn test_second_build_skips_everything_and_is_byte_identical() {
    let fs = two_module_fs();
    let cfg = config();
    let paths = two_module_paths();

    run(&fs, &cfg, &paths);
    let x_before = fs.read_file(Path::new("output/X/index.js")).unwrap();
    let y_before = fs.read_file(Path::new("output/Y/index.js")).unwrap();

    let (summary, compiles) = run(&fs, &cfg, &paths);

    assert!(summary.rebuilt.is_empty());
    assert_eq!(skipped_names(&summary), vec!["X", "Y"]);
    assert_eq!(compiles, 0);
    assert_eq!(
        fs.read_file(Path::new("output/X/index.js")).unwrap(),
        x_before
    );
    assert_eq!(
        fs.read_file(Path::new("output/Y/index.js")).unwrap(),
        y_before
    );
}

#[test]
fn test_touching_a_dependency_rebuilds_dependents() {
    let fs = two_module_fs();
    let cfg = config();
    let paths = two_module_paths();

    run(&fs, &cfg, &paths);
    fs.touch(Path::new("/src/X.veld")).unwrap();
    let (summary, compiles) = run(&fs, &cfg, &paths);

    // Y's own artifact is still newer than Y's source, but X was rebuilt
    // in this run, so Y must be rebuilt too.
    assert_eq!(rebuilt_names(&summary), vec!["X", "Y"]);
    assert_eq!(compiles, 2);
}

#[test]
fn test_touching_a_leaf_rebuilds_only_it() {
    let fs = two_module_fs();
    let cfg = config();
    let paths = two_module_paths();

    run(&fs, &cfg, &paths);
    fs.touch(Path::new("/src/Y.veld")).unwrap();
    let (summary, compiles) = run(&fs, &cfg, &paths);

    assert_eq!(rebuilt_names(&summary), vec!["Y"]);
    assert_eq!(skipped_names(&summary), vec!["X"]);
    assert_eq!(compiles, 1);
}

#[test]
fn test_cycle_aborts_with_zero_writes() {
    let fs = MemoryFileSystem::with_files([
        ("/src/A.veld", b"module A\n\nimport B\n\ndef a x = x\n".to_vec()),
        ("/src/B.veld", b"module B\n\nimport A\n\ndef b x = x\n".to_vec()),
    ]);
    let paths = vec![PathBuf::from("/src/A.veld"), PathBuf::from("/src/B.veld")];

    let backend = CountingBackend::new();
    let result = build(&fs, &backend, &SilentProgress, &config(), &paths);

    match result {
        Err(MakeError::Cycle(modules)) => {
            let names: Vec<String> = modules.iter().map(|m| m.to_string()).collect();
            assert_eq!(names, vec!["A", "B"]);
        }
        other => panic!("expected cycle error, got ok={}", other.is_ok()),
    }
    assert_eq!(backend.compiles.get(), 0);
    // Only the two sources exist; nothing was written.
    assert_eq!(fs.file_paths(), vec!["/src/A.veld", "/src/B.veld"]);
}

#[test]
fn test_missing_input_aborts_with_zero_writes() {
    let fs = two_module_fs();
    let paths = vec![
        PathBuf::from("/src/X.veld"),
        PathBuf::from("/src/Missing.veld"),
    ];

    let backend = CountingBackend::new();
    let result = build(&fs, &backend, &SilentProgress, &config(), &paths);

    match result {
        Err(MakeError::Io { path, .. }) => assert_eq!(path, "/src/Missing.veld"),
        other => panic!("expected IO error, got ok={}", other.is_ok()),
    }
    assert_eq!(backend.compiles.get(), 0);
    assert_eq!(fs.file_paths(), vec!["/src/X.veld", "/src/Y.veld"]);
}

#[test]
fn test_prelude_is_never_written() {
    let fs = MemoryFileSystem::with_files([(
        "/src/Main.veld",
        b"module Main\n\nimport Prelude\n\ndef ten = mul 5 2\n".to_vec(),
    )]);
    let cfg = MakeConfig {
        include_prelude: true,
        ..config()
    };
    let paths = vec![PathBuf::from("/src/Main.veld")];

    let (summary, _) = run(&fs, &cfg, &paths);

    assert_eq!(rebuilt_names(&summary), vec!["Main"]);
    assert_eq!(skipped_names(&summary), vec!["Prelude"]);
    assert!(fs.exists(Path::new("output/Main/index.js")));
    assert!(!fs.exists(Path::new("output/Prelude/index.js")));
    assert!(!fs.exists(Path::new("output/Prelude/externs.json")));
}

#[test]
fn test_prelude_stays_unwritten_on_rebuild() {
    let fs = MemoryFileSystem::with_files([(
        "/src/Main.veld",
        b"module Main\n\nimport Prelude\n\ndef ten = mul 5 2\n".to_vec(),
    )]);
    let cfg = MakeConfig {
        include_prelude: true,
        ..config()
    };
    let paths = vec![PathBuf::from("/src/Main.veld")];

    run(&fs, &cfg, &paths);
    fs.touch(Path::new("/src/Main.veld")).unwrap();
    run(&fs, &cfg, &paths);

    assert!(!fs.exists(Path::new("output/Prelude/index.js")));
}

#[test]
fn test_parse_failures_are_aggregated_with_zero_writes() {
    let fs = MemoryFileSystem::with_files([
        ("/src/A.veld", b"not a module\n".to_vec()),
        ("/src/B.veld", b"module B\n\ndef ok x = x\n".to_vec()),
        ("/src/C.veld", b"module C\n\ndef broken x\n".to_vec()),
    ]);
    let paths = vec![
        PathBuf::from("/src/A.veld"),
        PathBuf::from("/src/B.veld"),
        PathBuf::from("/src/C.veld"),
    ];

    let backend = CountingBackend::new();
    let result = build(&fs, &backend, &SilentProgress, &config(), &paths);

    match result {
        Err(MakeError::Parse(failures)) => {
            assert_eq!(failures.len(), 2);
            assert_eq!(failures[0].origin, "/src/A.veld");
            assert_eq!(failures[1].origin, "/src/C.veld");
        }
        other => panic!("expected parse failure, got ok={}", other.is_ok()),
    }
    assert_eq!(backend.compiles.get(), 0);
    assert_eq!(fs.file_paths().len(), 3);
}

#[test]
fn test_compile_error_aborts_but_keeps_earlier_artifacts() {
    let fs = MemoryFileSystem::with_files([
        (
            "/src/X.veld",
            b"module X\n\ndef twice n = __prim_add n n\n".to_vec(),
        ),
        (
            "/src/Y.veld",
            b"module Y\n\nimport X\n\ndef bad = unknown_name\n".to_vec(),
        ),
    ]);
    let paths = two_module_paths();

    let backend = CountingBackend::new();
    let result = build(&fs, &backend, &SilentProgress, &config(), &paths);

    match result {
        Err(MakeError::Compile { module, .. }) => assert_eq!(module, "Y"),
        other => panic!("expected compile error, got ok={}", other.is_ok()),
    }
    // X succeeded before Y failed; its artifact stays in place.
    assert!(fs.exists(Path::new("output/X/index.js")));
    assert!(!fs.exists(Path::new("output/Y/index.js")));
}

#[test]
fn test_header_lines_are_prepended() {
    let fs = two_module_fs();
    let cfg = MakeConfig {
        header_lines: vec!["// Generated by veld 0.1.0".to_string()],
        ..config()
    };

    run(&fs, &cfg, &two_module_paths());

    let code = fs.read_text(Path::new("output/X/index.js")).unwrap();
    assert!(code.starts_with("// Generated by veld 0.1.0\n\"use strict\";"));
}

#[test]
fn test_progress_messages_follow_the_schedule() {
    let fs = two_module_fs();
    let cfg = config();
    let paths = two_module_paths();

    let backend = CountingBackend::new();
    let first = BufferProgress::new();
    build(&fs, &backend, &first, &cfg, &paths).unwrap();
    let messages = first.messages();
    assert_eq!(messages[0], "Compiling X");
    assert!(messages.contains(&"Compiling Y".to_string()));
    assert!(messages.iter().any(|m| m.contains("output/X/index.js")));

    let second = BufferProgress::new();
    build(&fs, &backend, &second, &cfg, &paths).unwrap();
    let messages = second.messages();
    assert!(messages.contains(&"Skipping X (up to date)".to_string()));
    assert!(messages.contains(&"Skipping Y (up to date)".to_string()));
    // Skipped modules still read their stored interfaces.
    assert!(messages
        .iter()
        .any(|m| m == "Reading output/X/externs.json"));
}

#[test]
fn test_missing_artifact_directory_forces_full_rebuild() {
    // Same sources, fresh file system with no output tree at all: absence
    // of artifacts implies staleness for every module.
    let fs = two_module_fs();
    let cfg = config();
    let paths = two_module_paths();

    let (summary, compiles) = run(&fs, &cfg, &paths);
    assert_eq!(summary.rebuilt.len(), 2);
    assert_eq!(compiles, 2);
}
