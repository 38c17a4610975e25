use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn called_with_no_args() {
    Command::cargo_bin("deft-expression")
        .unwrap()
        .assert()
        .failure()
        .stderr(contains("<PROGRAM_FILE>"));
}

#[test]
fn prints_help() {
    Command::cargo_bin("deft-expression")
        .unwrap()
        .arg("-h")
        .assert()
        .success()
        .stdout(contains("Common-subexpression code generator"));
}

#[test]
fn executes_inline_program() {
    Command::cargo_bin("deft-expression")
        .unwrap()
        .args(["-e", "exp(a * b) + exp(a * b) + c"])
        .assert()
        .success()
        .stdout("const double t0 = exp(a * b);\nreturn t0 + t0 + c;\n");
}

#[test]
fn plain_style() {
    Command::cargo_bin("deft-expression")
        .unwrap()
        .args(["--style", "plain", "-e", "sqr(n) * sqr(n)"])
        .assert()
        .success()
        .stdout("t0 = sqr(n)\nt0 * t0\n");
}

#[test]
fn derives_before_generating() {
    Command::cargo_bin("deft-expression")
        .unwrap()
        .args(["--derive", "x", "--style", "plain", "-e", "x * x"])
        .assert()
        .success()
        .stdout("x + x\n");
}

#[test]
fn parse_error() {
    Command::cargo_bin("deft-expression")
        .unwrap()
        .args(["-e", "exp(x"])
        .assert()
        .success()
        .stdout("Parsing error: Premature end of expression.\n");
}

#[test]
fn differentiation_error() {
    Command::cargo_bin("deft-expression")
        .unwrap()
        .args(["--derive", "x", "-e", "gamma(x)"])
        .assert()
        .success()
        .stdout("Differentiation error: Cannot differentiate gamma(x) with respect to x.\n");
}

#[test]
fn executes_program_from_file() {
    Command::cargo_bin("deft-expression")
        .unwrap()
        .args(["./demos/ideal_gas.txt"])
        .assert()
        .success()
        .stdout("const double t0 = exp(-V / kT);\nreturn kT * t0 * (log(t0 / nQ) - 1.0);\n");
}

#[test]
fn long_chain_parse_error() {
    let source = format!("x{}", "+x".repeat(20_000));
    Command::cargo_bin("deft-expression")
        .unwrap()
        .args(["-e", source.as_str()])
        .assert()
        .success()
        .stdout("Parsing error: Expression is too deep: depth 257 exceeds limit 256.\n");
}
