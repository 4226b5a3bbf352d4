//! End-to-end programs: source in, program output and diagnostics out.

use victoria_cli::{CapturedOutput, Interpreter, InterpreterConfig, RunError};
use victoria_diagnostics::{ErrorCode, Renderer};

fn run(src: &str) -> (Result<(), RunError>, String) {
    let out = CapturedOutput::default();
    let mut interp =
        Interpreter::new(InterpreterConfig::quiet()).with_output(Box::new(out.clone()));
    let result = interp.run_source("scenario.vic", src).map(|_| ());
    (result, out.contents())
}

fn runtime_error(src: &str) -> victoria_diagnostics::Diagnostic {
    match run(src).0 {
        Err(RunError::Runtime(err)) => err.diagnostic,
        other => panic!("expected a runtime error, got {other:?}"),
    }
}

#[test]
fn arithmetic_and_precedence() {
    let (result, out) = run("let x = 2 + 3 * 4; print(x);");
    assert!(result.is_ok());
    assert_eq!(out, "14\n");
}

#[test]
fn closure_over_parameter() {
    let (result, out) = run(
        "define makeAdder(n) { define(x) { x + n } }\nlet add5 = makeAdder(5); print(add5(3));",
    );
    assert!(result.is_ok(), "{result:?}");
    assert_eq!(out, "8\n");
}

#[test]
fn typed_parameter_mismatch() {
    let diag = runtime_error(r#"define f(x:int) -> int { x + 1 } f("hi");"#);
    assert_eq!(diag.code, ErrorCode::ParameterTypeMismatch);
    assert!(diag.message.contains("`x`"), "{}", diag.message);
    assert!(diag.message.contains("int"), "{}", diag.message);
    assert!(diag.message.contains("string"), "{}", diag.message);
    // reported at the call, not the definition
    let loc = diag.location().expect("primary label");
    assert_eq!(loc.line, 1);
    assert!(loc.column > 30, "column {}", loc.column);
}

#[test]
fn division_by_zero_caught_by_try() {
    let (result, out) = run("let r = try { 10 / 0 } catch(e) { e }; print(r);");
    assert!(result.is_ok());
    assert_eq!(out, "division by zero\n");
}

#[test]
fn slice_and_spread() {
    let (result, out) = run("let a = [1,2,3,4,5]; let b = [...a[1:4], 99]; print(b);");
    assert!(result.is_ok());
    assert_eq!(out, "[2, 3, 4, 99]\n");
}

#[test]
fn undefined_variable_suggests_print() {
    let diag = runtime_error(r#"println("hi");"#);
    assert_eq!(diag.code, ErrorCode::UndefinedVariable);
    assert!(diag.help.as_deref().unwrap_or("").contains("print"));
}

#[test]
fn output_before_an_error_is_kept() {
    let (result, out) = run("print(1); let x = 1 / 0; print(2);");
    assert!(matches!(result, Err(RunError::Runtime(_))));
    assert_eq!(out, "1\n");
}

#[test]
fn parse_errors_skip_evaluation() {
    let (result, out) = run("print(1); let = ;");
    match result {
        Err(err @ RunError::Parse(_)) => assert!(!err.diagnostics().is_empty()),
        other => panic!("expected a parse failure, got {other:?}"),
    }
    assert_eq!(out, "");
}

#[test]
fn structs_methods_and_enums() {
    let src = r#"
struct Point { x, y }
define Point.norm1() { abs(self.x) + abs(self.y) }
define abs(n) { if (n < 0) { return -n; } n }
enum Color { Red, Green = 5, Blue }
let p = Point { x: -2, y: 3 };
print(p.norm1(), Color.Blue.value, Color.Green);
"#;
    let (result, out) = run(src);
    assert!(result.is_ok(), "{result:?}");
    assert_eq!(out, "5 6 Color.Green\n");
}

#[test]
fn runtime_report_is_stable() {
    let render = || {
        let diag = runtime_error("let a = [1, 2];\nprint(a[5]);");
        Renderer::render_plain(&diag)
    };
    let first = render();
    assert_eq!(first, render());
    assert!(first.contains("E0006"));
    assert!(first.contains("scenario.vic:2:"), "{first}");
}
