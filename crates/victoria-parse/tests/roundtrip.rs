//! Printing a parsed program and parsing the output again gives the same
//! tree (compared with source positions removed), and a second print is
//! identical to the first.

use serde_json::Value;
use victoria_ast::ast::Program;
use victoria_parse::parse_str;

/// The tree as JSON with every source location replaced by `null`.
fn shape(program: &Program) -> Value {
    fn strip(value: &mut Value) {
        match value {
            Value::Object(map) => {
                let is_location = map.contains_key("filename") && map.contains_key("end_column");
                if is_location {
                    *value = Value::Null;
                    return;
                }
                map.remove("location");
                map.values_mut().for_each(strip);
            }
            Value::Array(items) => items.iter_mut().for_each(strip),
            _ => {}
        }
    }
    let mut value = serde_json::to_value(program).expect("ast serializes");
    strip(&mut value);
    value
}

fn assert_fixpoint(src: &str) {
    let first = parse_str("<rt>", src).unwrap_or_else(|e| panic!("{src:?} failed: {e}"));
    let once = first.to_string();
    let second = parse_str("<rt>", &once).unwrap_or_else(|e| panic!("reprint {once:?} failed: {e}"));
    assert_eq!(shape(&first), shape(&second), "tree changed after reprinting {src:?} as {once:?}");
    assert_eq!(once, second.to_string());
}

#[test]
fn reprinting_keeps_grouping() {
    // A printer that dropped parentheses would still reach a text fixpoint.
    let first = parse_str("<rt>", "let v = (1 + 2) * 3;").expect("parses");
    let regrouped = parse_str("<rt>", "let v = 1 + 2 * 3;").expect("parses");
    assert_ne!(shape(&first), shape(&regrouped));
    assert_fixpoint("let v = (1 + 2) * 3;");
    assert_fixpoint("let w = -(a - b) - c;");
}

#[test]
fn expressions_round_trip() {
    for src in [
        "let x = 2 + 3 * 4; print(x);",
        "a = b = 1;",
        "let f = (a, b) => a * b;",
        "let g = () => 1;",
        "let h = x => x + 1;",
        "let v = c ? 1 : -2;",
        "let r = a..b + 1;",
        "let s = xs[1:3]; let t = xs[:2]; let u = xs[1:]; let w = xs[:];",
        "let b = [...a[1:4], 99];",
        "let m = {\"k\": 1, 2: [3]};",
        "let p = Point {x: 1, y: 2}; p.x += 1;",
        "i++; --j; !ok;",
        "let e = .5 + 1.25;",
        "let q = \"a\\\"b\\n\";",
    ] {
        assert_fixpoint(src);
    }
}

#[test]
fn statements_round_trip() {
    for src in [
        "define makeAdder(n) { define(x) { x + n } }",
        "define f(x: int, y) -> int { return x + 1; }",
        "define pair() -> (int, string) { return [1, \"a\"]; }",
        "struct Point { x, y }\ndefine Point.norm() { return self.x; }",
        "enum Color { Red, Green = 5, Blue }",
        "const PI: float = 3.14;",
        "include \"math\";\ninclude (\"a\", \"b\");",
        "if (x > 1) { print(1); } else if (x < 0) { print(2); } else { print(3); }",
        "while (true) { break; }",
        "for (x in xs) { continue; }",
        "for (i, x in xs) { print(i, x); }",
        "for (let i = 0; i < 10; i++) { print(i); }",
        "switch (n) { case 1, 2 { print(\"a\"); } default { print(\"b\"); } }",
        "let r = try { 10 / 0 } catch (e) { e };",
        "try { risky(); }",
        "let xs: []int = [1]; let m: map[string]int = {};",
        "return;",
    ] {
        assert_fixpoint(src);
    }
}
