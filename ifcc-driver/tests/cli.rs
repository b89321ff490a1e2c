//! End-to-end tests of the `ifcc` binary

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn write_source(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("input.c");
    fs::write(&path, format!("int main() {{\n{body}\n}}\n")).unwrap();
    path
}

fn ifcc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ifcc"))
        .args(args)
        .output()
        .expect("failed to run ifcc")
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_success_prints_assembly() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path(), "int a;\na = 2 + 3;\nreturn a;");
    let output = ifcc(&[input.to_str().unwrap(), "--target", "linux"]);

    assert_eq!(output.status.code(), Some(0));
    let asm = String::from_utf8(output.stdout).unwrap();
    assert!(asm.starts_with(".text\n.globl main\nmain:\n"));
    assert!(asm.contains("\tjmp .Lmain_epilogue\n"));
    assert!(asm.ends_with("\tpopq %rbp\n\tret\n.section .note.GNU-stack,\"\",@progbits\n"));
}

#[test]
fn test_unused_variable_warns() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path(), "int x = 3;\nreturn 0;");
    let output = ifcc(&[input.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    let stderr = stderr(&output);
    assert_eq!(stderr.matches("warning:").count(), 1);
    assert!(stderr.contains("2:5: warning: variable 'x' is never used"));
    assert!(!output.stdout.is_empty());
}

#[test]
fn test_undeclared_variable_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path(), "return y;");
    let asm = dir.path().join("out.s");
    let output = ifcc(&[input.to_str().unwrap(), "-o", asm.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("2:8: error: variable 'y' is not declared"));
    assert!(output.stdout.is_empty());
    assert!(!asm.exists());
}

#[test]
fn test_break_outside_loop_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path(), "break;\nreturn 0;");
    let output = ifcc(&[input.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("2:1: error: 'break' statement not within a loop"));
}

#[test]
fn test_syntax_error_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path(), "return 1");
    let output = ifcc(&[input.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error: syntax error"));
}

#[test]
fn test_missing_file_fails() {
    let output = ifcc(&["/nonexistent/ifcc/input.c"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("error: IO error"));
}

#[test]
fn test_ir_artifacts() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path(), "int i = 0;\nwhile (i < 3) { i = i + 1; }\nreturn i;");
    let asm = dir.path().join("out.s");
    let json = dir.path().join("cfg.json");
    let output = ifcc(&[
        input.to_str().unwrap(),
        "-o",
        asm.to_str().unwrap(),
        "--save-ir",
        "--emit-cfg-json",
        json.to_str().unwrap(),
        "--print-ir",
    ]);

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
    assert!(fs::read_to_string(&asm).unwrap().contains(".globl main"));

    let ir = fs::read_to_string(input.with_extension("ir")).unwrap();
    assert!(ir.starts_with("function main"));
    assert!(ir.contains("lt %t1, i, $3"));
    assert!(stderr(&output).contains("ret i"));

    let cfg: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
    assert_eq!(cfg["name"], "main");
    assert!(cfg["blocks"].as_array().unwrap().len() >= 5);
}

#[test]
fn test_macos_target() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path(), "return 0;");
    let output = ifcc(&[input.to_str().unwrap(), "--target", "macos"]);

    assert_eq!(output.status.code(), Some(0));
    let asm = String::from_utf8(output.stdout).unwrap();
    assert!(asm.contains(".globl _main\n_main:\n"));
    assert!(!asm.contains(".note.GNU-stack"));
}

#[test]
fn test_unknown_target_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_source(dir.path(), "return 0;");
    let output = ifcc(&[input.to_str().unwrap(), "--target", "vax"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("vax"));
}

#[test]
fn test_missing_argument_fails() {
    let output = ifcc(&[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Usage"));
}

#[test]
fn test_help_succeeds() {
    let output = ifcc(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Usage"));
}

/// Assemble with the host C compiler and check the exit status
#[test]
#[cfg(all(target_arch = "x86_64", unix))]
fn test_native_execution() {
    let has_cc = Command::new("cc")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false);
    if !has_cc {
        eprintln!("skipping: no `cc` on PATH");
        return;
    }

    let cases = [
        ("native-add", "int a;\na = 2 + 3;\nreturn a;", 5),
        ("native-arith", "int a; int b = 4; a = b * 2 - 1; return a;", 7),
        ("native-loop", "int i = 0; while (i < 3) { i = i + 1; } return i;", 3),
        ("native-char", "char c = 127; c += 1; return c == -128;", 1),
        ("native-div", "int a = -7; return a / 2 + 10 + a % 2;", 6),
    ];

    for (name, body, expected) in cases {
        let dir = TempDir::new().unwrap();
        let input = write_source(dir.path(), body);
        let asm = dir.path().join("out.s");
        let exe = dir.path().join("out");

        let output = ifcc(&[input.to_str().unwrap(), "-o", asm.to_str().unwrap()]);
        assert_eq!(output.status.code(), Some(0), "{}", stderr(&output));

        let status = Command::new("cc").arg(&asm).arg("-o").arg(&exe).status().unwrap();
        assert!(status.success());

        let status = Command::new(&exe).status().unwrap();
        assert_eq!(status.code(), Some(expected), "{name}");
    }
}
