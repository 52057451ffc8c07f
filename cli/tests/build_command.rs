use std::fs;

use assert_cmd::Command;
use tempfile::tempdir;

const PROGRAM: &str = "func main() {\n    let x = 10;\n    print(x * 2,)\n}\n";

fn ssalang() -> Command {
    Command::cargo_bin("ssalang").expect("binary")
}

#[test]
fn build_prints_ir_to_stdout() {
    let td = tempdir().expect("tempdir");
    let src = td.path().join("main.sl");
    fs::write(&src, PROGRAM).expect("write source");

    let output = ssalang().arg("build").arg(&src).output().expect("run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("define i32 @print(i32 %value)"));
    assert!(stdout.contains("define i32 @main() {"));
    assert!(stdout.contains("%x.slot = alloca i32, align 4"));
}

#[test]
fn build_writes_output_file_without_runtime() {
    let td = tempdir().expect("tempdir");
    let src = td.path().join("main.sl");
    let out = td.path().join("main.ll");
    fs::write(&src, PROGRAM).expect("write source");

    ssalang()
        .args(["build", "--no-runtime", "-o"])
        .arg(&out)
        .arg(&src)
        .assert()
        .success();

    let ir = fs::read_to_string(&out).expect("read output");
    assert!(ir.starts_with("define i32 @main()"), "{}", ir);
    assert!(!ir.contains("@printf"));
}

#[test]
fn build_reads_stdin() {
    let output = ssalang()
        .args(["build", "-", "--no-runtime"])
        .write_stdin("func main() { 7 / 2 }")
        .output()
        .expect("run");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("sdiv i32 7, 2"));
}

#[test]
fn dump_tokens_prints_table() {
    let output = ssalang()
        .args(["build", "-", "--dump", "tokens"])
        .write_stdin("let x = 1")
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Identifier"));
    assert!(stdout.contains("Lexeme"));
}

#[test]
fn dump_ast_for_a_single_rule() {
    let output = ssalang()
        .args(["build", "-", "--dump", "ast", "--rule", "block"])
        .write_stdin("1+2+3")
        .output()
        .expect("run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["rule"], "Block");
    assert_eq!(json["ast"]["kind"], "BinaryOp");
    assert_eq!(json["ast"]["rhs"]["kind"], "BinaryOp");
}

#[test]
fn rule_requires_ast_dump() {
    ssalang()
        .args(["build", "-", "--rule", "block"])
        .write_stdin("1")
        .assert()
        .failure();
}

#[test]
fn compile_error_is_reported_on_stderr() {
    let output = ssalang()
        .args(["build", "-"])
        .write_stdin("func main() { nope(1,) }")
        .output()
        .expect("run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SSALANG | ERROR"), "{}", stderr);
    assert!(stderr.contains("nope"), "{}", stderr);
    assert!(output.stdout.is_empty());
}

#[test]
fn missing_file_fails() {
    let td = tempdir().expect("tempdir");
    ssalang()
        .arg("build")
        .arg(td.path().join("absent.sl"))
        .assert()
        .failure();
}

#[test]
fn long_operator_chain_fails_cleanly() {
    let terms = vec!["1"; 5000].join("+");
    let output = ssalang()
        .args(["build", "-", "--no-runtime"])
        .write_stdin(format!("func main() {{ {} }}", terms))
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nested too deeply"), "{}", stderr);
}

#[test]
fn moderately_long_chain_compiles() {
    let terms = vec!["1"; 1000].join("+");
    ssalang()
        .args(["build", "-", "--no-runtime"])
        .write_stdin(format!("func main() {{ {} }}", terms))
        .assert()
        .success();
}
