//! End-to-end test suite for declscope-core.

use crate::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

fn write_file(file: &Path, content: &str) {
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(file, content).unwrap();
}

fn setup_temp_tree() -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir()
        .join("declscope_tests")
        .join(format!("{}_{}", timestamp, id));

    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }
    fs::create_dir_all(dir.join("all")).unwrap();
    dir
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

const WIDGET_CPP: &str = "\
#include <vector>
#include <boost/any.hpp>
#include \"widget.h\"

namespace ui {
class Widget {
public:
    Widget() {
        init();
    }
    int width;
};
}

int helper(int x) {
    return x * 2;
}
";

const WIDGET_H: &str = "\
#include <string>
  class Widget {
    void draw() { paint(); }
  };
";

fn run_in(root: &Path, manifest: &str, options: EngineOptions) -> RunSummary {
    write_file(&root.join("content.txt"), manifest);
    Declscope::new(root.join("content.txt"))
        .input_root(root.join("all"))
        .output_root(root.join("new"))
        .options(options)
        .run()
        .unwrap()
}

// Core Test 1: Spec example - class method body pruned
#[test]
fn test_class_example() {
    let src = "class Foo {\npublic:\n  void bar() {\n    doStuff();\n  }\n  int x;\n};\n";
    let out = extract_lines(src, &EngineOptions::legacy());
    assert!(out.contains(&"class Foo {".to_string()));
    assert!(out.contains(&"public:".to_string()));
    assert!(out.contains(&"void bar() {".to_string()));
    assert!(out.contains(&"int x;".to_string()));
    assert!(out.contains(&"};".to_string()));
    assert!(!out.contains(&"doStuff();".to_string()));
}

// Core Test 2: Output never grows
#[test]
fn test_output_not_longer_than_input() {
    for src in [WIDGET_CPP, WIDGET_H, "", "}}}}", "{{{{\n}}}}", "struct A {\nstruct B {\n"] {
        for options in [EngineOptions::legacy(), EngineOptions::legacy().with_class_rule(ClassRule::Flat)] {
            let out = extract_lines(src, &options);
            assert!(out.len() <= src.lines().count(), "grew on {:?}", src);
        }
    }
}

// Core Test 3: Struct preserved in full, arbitrarily nested
#[test]
fn test_struct_preserved_with_nesting() {
    let src = "\
struct Outer {
    int a;
    struct Mid {
        struct Inner {
            int deep;
            void f() { if (x) { y(); } }
        };
        int m;
    };
    union { int u; float v; };
};";
    let out = extract_lines(src, &EngineOptions::legacy());
    let expected: Vec<String> = src.lines().map(|l| l.trim().to_string()).collect();
    assert_eq!(out, expected);
}

// Core Test 4: Boundary reset after a class closes
#[test]
fn test_boundary_reset_prunes_free_function() {
    let src = "\
namespace a {
class B {
    void m() {
        body();
    }
};
}
void free_fn() {
    int local = 1;
    use(local);
}";
    let out = extract_lines(src, &EngineOptions::legacy());
    let tail: Vec<&str> = out.iter().rev().take(2).map(String::as_str).collect();
    assert_eq!(tail, vec!["}", "void free_fn() {"]);
    assert!(!out.iter().any(|l| l == "int local = 1;" || l == "use(local);"));
}

// Core Test 5: Include rewriting through the pipeline
#[test]
fn test_include_rewriting() {
    let out = extract_lines(
        "#include <vector>\n#include <boost/any.hpp>\n#include \"local.h\"",
        &EngineOptions::legacy(),
    );
    assert_eq!(out, vec!["#include \"vector\"", "#include \"local.h\""]);
}

// Core Test 6: Each file starts from a fresh engine state
#[test]
fn test_state_does_not_cross_files() {
    let options = EngineOptions::legacy();
    let first = extract_lines("namespace n {\nclass C {\n", &options);
    assert_eq!(first.len(), 2);
    // unterminated scopes above must not affect the next file
    assert_eq!(
        extract_lines("int f() {\n  x();\n}", &options),
        vec!["int f() {", "}"]
    );
}

// Mirror Test 1: Legacy run copies headers, prunes compilable units
#[test]
fn test_mirror_run_legacy() {
    let root = setup_temp_tree();
    write_file(&root.join("all/src/widget.cpp"), WIDGET_CPP);
    write_file(&root.join("all/src/widget.h"), WIDGET_H);

    let summary = run_in(
        &root,
        "/src\n/src/widget.cpp\n/src/widget.h\n/README.md\n",
        EngineOptions::legacy(),
    );

    assert_eq!(summary.directories_created, 1);
    assert_eq!(summary.compilable_units, 1);
    assert_eq!(summary.headers, 1);
    assert_eq!(summary.skipped, vec!["/README.md".to_string()]);
    assert_eq!(summary.files[1].handler, Handler::PassThrough);

    assert_eq!(
        lines(&root.join("new/src/widget.cpp")),
        vec![
            "#include \"vector\"",
            "#include \"widget.h\"",
            "",
            "namespace ui {",
            "class Widget {",
            "public:",
            "Widget() {",
            "}",
            "int width;",
            "};",
            "}",
            "",
            "int helper(int x) {",
            "}",
        ]
    );
    assert_eq!(
        lines(&root.join("new/src/widget.h")),
        vec!["#include <string>", "class Widget {", "void draw() { paint(); }", "};"]
    );
    assert_eq!(summary.lines_written, 14 + 4);
}

// Mirror Test 2: Revised run extracts headers too
#[test]
fn test_mirror_run_revised() {
    let root = setup_temp_tree();
    write_file(&root.join("all/inc/big.h"), "#include <map>\nvoid f() {\n  g();\n}\n");

    let summary = run_in(&root, "/inc\n/inc/big.h\n", EngineOptions::revised());
    assert_eq!(summary.files[0].handler, Handler::Extract);
    assert_eq!(
        lines(&root.join("new/inc/big.h")),
        vec!["#include \"map\"", "void f() {", "}"]
    );
}

// Mirror Test 3: Directory creation is idempotent across runs
#[test]
fn test_mirror_rerun_idempotent() {
    let root = setup_temp_tree();
    write_file(&root.join("all/src/a.c"), "int a;\n");

    let first = run_in(&root, "/src\n/src/a.c\n", EngineOptions::legacy());
    let second = run_in(&root, "/src\n/src/a.c\n", EngineOptions::legacy());
    assert_eq!(first.directories_created, 1);
    assert_eq!(second.directories_created, 0);
    assert_eq!(second.directories_existing, 1);
    assert_eq!(lines(&root.join("new/src/a.c")), vec!["int a;"]);
}

// Mirror Test 4: Missing input aborts the run
#[test]
fn test_missing_input_is_fatal() {
    let root = setup_temp_tree();
    write_file(&root.join("content.txt"), "/src\n/src/gone.cpp\n");
    let err = Declscope::new(root.join("content.txt"))
        .input_root(root.join("all"))
        .output_root(root.join("new"))
        .run()
        .unwrap_err();
    assert!(err.is_missing_input());
}

// Mirror Test 5: Missing manifest aborts the run
#[test]
fn test_missing_manifest_is_fatal() {
    let root = setup_temp_tree();
    let err = Declscope::new(root.join("nope.txt")).run().unwrap_err();
    assert!(matches!(err, DeclscopeError::Manifest { .. }));
}

// Mirror Test 6: Traversal entries are rejected
#[test]
fn test_traversal_entry_rejected() {
    let root = setup_temp_tree();
    write_file(&root.join("content.txt"), "/../escape.cpp\n");
    let err = Declscope::new(root.join("content.txt"))
        .input_root(root.join("all"))
        .output_root(root.join("new"))
        .run()
        .unwrap_err();
    assert!(matches!(err, DeclscopeError::Path { .. }));
}

// Mirror Test 7: Trace file records every extracted file
#[test]
fn test_mirror_trace() {
    let root = setup_temp_tree();
    write_file(&root.join("all/a.cpp"), "int a;\n");
    write_file(&root.join("all/b.h"), "int b;\n");
    write_file(&root.join("content.txt"), "/a.cpp\n/b.h\n");

    Declscope::new(root.join("content.txt"))
        .input_root(root.join("all"))
        .output_root(root.join("new"))
        .trace(root.join("trace.txt"))
        .parallel(true)
        .run()
        .unwrap();

    let trace = fs::read_to_string(root.join("trace.txt")).unwrap();
    assert!(trace.contains("== /a.cpp\nint a; boundary=1 previous_depth=0 depth=0 structs=0 cursor=0\n"));
    // pass-through headers produce no engine records
    assert!(trace.ends_with("== /b.h\n"));
}

// Mirror Test 8: Parallel and sequential runs agree
#[cfg(feature = "parallel")]
#[test]
fn test_parallel_matches_sequential() {
    let root = setup_temp_tree();
    let mut manifest = String::from("/src\n");
    for i in 0..20 {
        write_file(
            &root.join(format!("all/src/f{}.cpp", i)),
            &format!("namespace n{} {{\nvoid f() {{\n  g();\n}}\n}}\n", i),
        );
        manifest.push_str(&format!("/src/f{}.cpp\n", i));
    }
    write_file(&root.join("content.txt"), &manifest);

    let sequential = Declscope::new(root.join("content.txt"))
        .input_root(root.join("all"))
        .output_root(root.join("seq"))
        .run()
        .unwrap();
    let parallel = Declscope::new(root.join("content.txt"))
        .input_root(root.join("all"))
        .output_root(root.join("par"))
        .parallel(true)
        .run()
        .unwrap();

    assert_eq!(sequential.files, parallel.files);
    for i in 0..20 {
        let name = format!("src/f{}.cpp", i);
        assert_eq!(lines(&root.join("seq").join(&name)), lines(&root.join("par").join(&name)));
    }
}

// Single-file extraction picks the handler from the suffix
#[test]
fn test_extract_file_by_suffix() {
    let root = setup_temp_tree();
    let header = root.join("all/x.h");
    write_file(&header, "void f() {\n  g();\n}\n");

    let mut out = Vec::new();
    extract_file(&header, &mut out, &EngineOptions::legacy(), &ExtensionSet::default(), None).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "void f() {\ng();\n}\n");

    let mut out = Vec::new();
    extract_file(&header, &mut out, &EngineOptions::revised(), &ExtensionSet::default(), None).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "void f() {\n}\n");
}

// Scan output feeds a mirror run
#[cfg(feature = "scan")]
#[test]
fn test_scan_then_run() {
    let root = setup_temp_tree();
    write_file(&root.join("all/lib/core/a.cpp"), "int a() {\n  return 1;\n}\n");
    write_file(&root.join("all/lib/b.h"), "int b;\n");

    let entries = scan_manifest(&root.join("all"), &ExtensionSet::default()).unwrap();
    let mut manifest = Vec::new();
    write_manifest(&entries, &mut manifest).unwrap();
    let summary = run_in(&root, &String::from_utf8(manifest).unwrap(), EngineOptions::legacy());

    assert_eq!(summary.directories_created, 2);
    assert_eq!(lines(&root.join("new/lib/core/a.cpp")), vec!["int a() {", "}"]);
    assert_eq!(lines(&root.join("new/lib/b.h")), vec!["int b;"]);
}

// Logging: files at info, run steps at debug
#[test]
fn test_run_log_levels() {
    let root = setup_temp_tree();
    write_file(&root.join("all/a.cpp"), "int a;\n");
    write_file(&root.join("content.txt"), "/a.cpp\n");

    let logged = crate::logging::tests::capture(|| {
        Declscope::new(root.join("content.txt"))
            .input_root(root.join("all"))
            .output_root(root.join("new"))
            .run()
            .unwrap();
    });
    let level_of = |message: &str| -> String {
        logged
            .lines()
            .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap())
            .find(|e| e["fields"]["message"] == message)
            .map(|e| e["level"].as_str().unwrap_or_default().to_string())
            .unwrap_or_default()
    };
    assert_eq!(level_of("file handled"), "INFO");
    assert_eq!(level_of("starting mirror run"), "DEBUG");
    assert_eq!(level_of("mirror run finished"), "DEBUG");
}
