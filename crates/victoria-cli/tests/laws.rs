//! Scoping, closures, control flow, hash keys and type checks, observed
//! through whole programs.

use victoria_ast::ast::TypeAnnotation;
use victoria_ast::location::SourceLocation;
use victoria_cli::typecheck::check_type;
use victoria_cli::{CapturedOutput, Interpreter, InterpreterConfig, Object, RunError};
use victoria_diagnostics::ErrorCode;

fn output(src: &str) -> String {
    let out = CapturedOutput::default();
    let mut interp =
        Interpreter::new(InterpreterConfig::quiet()).with_output(Box::new(out.clone()));
    if let Err(err) = interp.run_source("law.vic", src) {
        panic!("{src}\n{err}");
    }
    out.contents()
}

fn error_code(src: &str) -> ErrorCode {
    let mut interp =
        Interpreter::new(InterpreterConfig::quiet()).with_output(Box::new(std::io::sink()));
    match interp.run_source("law.vic", src) {
        Err(RunError::Runtime(err)) => err.diagnostic.code,
        other => panic!("expected a runtime error, got {other:?}"),
    }
}

// ======= scope =======

#[test]
fn block_locals_do_not_escape() {
    assert_eq!(error_code("if (true) { let y = 1; } y;"), ErrorCode::UndefinedVariable);
    assert_eq!(
        error_code("let i = 0; while (i < 1) { let y = 1; i++; } y;"),
        ErrorCode::UndefinedVariable
    );
}

#[test]
fn assignment_updates_the_nearest_binding() {
    assert_eq!(output("let z = 1; if (true) { z = 2; } print(z);"), "2\n");
    assert_eq!(
        output("let z = 1; if (true) { let z = 5; z = 6; } print(z);"),
        "1\n"
    );
    assert_eq!(
        output("let n = 0; define bump() { n = n + 1; } bump(); bump(); print(n);"),
        "2\n"
    );
}

#[test]
fn assignment_without_binding_defines_locally() {
    assert_eq!(output("fresh = 3; print(fresh);"), "3\n");
    assert_eq!(
        error_code("if (true) { inner = 1; } inner;"),
        ErrorCode::UndefinedVariable
    );
}

#[test]
fn constants_cannot_be_reassigned() {
    assert_eq!(error_code("const k = 1; k = 2;"), ErrorCode::ConstantReassignment);
    assert_eq!(error_code("const k = 1; k += 2;"), ErrorCode::ConstantReassignment);
    assert_eq!(error_code("const k = 1; k++;"), ErrorCode::ConstantReassignment);
    // a new scope may shadow
    assert_eq!(output("const k = 1; if (true) { let k = 2; print(k); }"), "2\n");
}

// ======= closures =======

#[test]
fn closures_see_later_mutation() {
    let src = "let x = 1; define get() { x } x = 5; print(get());";
    assert_eq!(output(src), "5\n");
}

#[test]
fn closures_keep_private_state() {
    let src = r#"
define counter() {
    let c = 0;
    define() { c = c + 1; c }
}
let a = counter();
let b = counter();
a(); a();
print(a(), b());
"#;
    assert_eq!(output(src), "3 1\n");
}

#[test]
fn loop_closures_capture_each_iteration() {
    let src = r#"
let fns = [];
for (i in 0..3) { push(fns, () => i * 10); }
print(map(fns, f => f()));
"#;
    assert_eq!(output(src), "[0, 10, 20]\n");
}

// ======= control flow =======

#[test]
fn continue_affects_innermost_loop() {
    let src = r#"
let out = [];
for (i in 0..2) {
    for (j in 0..3) {
        if (j == 1) { continue; }
        push(out, i * 10 + j);
    }
}
print(out);
"#;
    assert_eq!(output(src), "[0, 2, 10, 12]\n");
}

#[test]
fn return_unwinds_nested_loops() {
    let src = r#"
define find(target) {
    for (i in 0..10) {
        let j = 0;
        while (j < 10) {
            if (i * j == target) { return [i, j]; }
            j++;
        }
    }
    return [];
}
print(find(12));
"#;
    assert_eq!(output(src), "[2, 6]\n");
}

#[test]
fn break_outside_function_call_does_not_leak() {
    let src = r#"
define stop() { break; }
let n = 0;
while (n < 3) { stop(); n++; }
print(n);
"#;
    assert_eq!(output(src), "3\n");
}

// ======= cycles =======

#[test]
fn self_containing_values_print_and_compare() {
    assert_eq!(
        output("let a = [1]; push(a, a); print(len(a)); print(a); print(a == a);"),
        "2\n[1, [...]]\ntrue\n"
    );
    assert_eq!(
        output(r#"let h = {"n": 1}; h["me"] = h; print(h);"#),
        "{\"me\": {...}, \"n\": 1}\n"
    );
    assert_eq!(
        output("struct Node { next } let n = Node { next: 0 }; n.next = n; print(n);"),
        "Node {next: Node {...}}\n"
    );
    assert_eq!(
        output("let a = [1]; push(a, a); let b = [1]; push(b, b); print(a == b);"),
        "true\n"
    );
}

// ======= hash keys =======

#[test]
fn equal_values_share_hash_keys() {
    let pairs = [
        (Object::Integer(7), Object::Integer(7)),
        (Object::str("k"), Object::str("k")),
        (Object::Boolean(true), Object::Boolean(true)),
        (Object::Char('x'), Object::Char('x')),
    ];
    for (a, b) in pairs {
        assert_eq!(a.hash_key(), b.hash_key(), "{a:?}");
    }
    assert_ne!(Object::Integer(1).hash_key(), Object::str("1").hash_key());
    assert_ne!(Object::str("a").hash_key(), Object::str("b").hash_key());
    assert!(Object::array(vec![]).hash_key().is_none());
}

#[test]
fn hash_literals_overwrite_equal_keys() {
    assert_eq!(output(r#"let h = {"a": 1, "a": 2}; print(len(h), h["a"]);"#), "1 2\n");
    assert_eq!(output(r#"let h = {1: "int", true: "bool"}; print(h[1], h[true]);"#), "int bool\n");
}

// ======= type checks =======

fn annotation(name: &str) -> TypeAnnotation {
    TypeAnnotation::named(name, SourceLocation::unknown())
}

#[test]
fn check_type_follows_the_table() {
    let cases = [
        (Object::Integer(1), "int", true),
        (Object::Float(1.0), "int", false),
        (Object::Float(1.0), "float", true),
        (Object::str("s"), "string", true),
        (Object::str("s"), "char", true),
        (Object::str("st"), "char", false),
        (Object::Boolean(false), "bool", true),
        (Object::Integer(65), "rune", true),
        (Object::Null, "any", true),
        (Object::Null, "int", false),
        (Object::array(vec![Object::Integer(1)]), "array", true),
    ];
    for (value, name, expected) in cases {
        let ann = annotation(name);
        assert_eq!(check_type(&value, Some(&ann)), expected, "{value:?} as {name}");
        // deterministic
        assert_eq!(check_type(&value, Some(&ann)), expected);
    }
    assert!(check_type(&Object::Integer(1), None));
}

#[test]
fn array_annotations_check_elements() {
    let ints = TypeAnnotation::array_of(annotation("int"), SourceLocation::unknown());
    assert!(check_type(&Object::array(vec![Object::Integer(1)]), Some(&ints)));
    assert!(!check_type(
        &Object::array(vec![Object::Integer(1), Object::str("x")]),
        Some(&ints)
    ));
    assert_eq!(
        error_code(r#"let xs: []int = [1, "two"];"#),
        ErrorCode::ArrayTypeMismatch
    );
    assert_eq!(error_code(r#"let n: int = "two";"#), ErrorCode::VariableTypeMismatch);
    assert_eq!(error_code("let n: Widget = 1;"), ErrorCode::InvalidTypeAnnotation);
}
