//! Source locations are 1-based; `end_column` is exclusive.

use victoria_ast::ast::{Expression, Statement};
use victoria_parse::parse_str;

#[test]
fn let_spans_from_keyword_to_value() {
    let program = parse_str("<test>", "let x = 1;\nlet y = 22;").unwrap();
    let first = program.statements[0].location();
    assert_eq!((first.line, first.column, first.end_column), (1, 1, 10));
    let second = program.statements[1].location();
    assert_eq!((second.line, second.column, second.end_column), (2, 1, 11));
}

#[test]
fn call_spans_end_after_rparen() {
    // "let x = foo(1, 2);"
    //  123456789012345678
    let program = parse_str("<test>", "let x = foo(1, 2);").unwrap();
    let Statement::Let(decl) = &program.statements[0] else {
        panic!("expected let");
    };
    let loc = decl.value.location();
    assert_eq!((loc.column, loc.end_column), (9, 18));
}

#[test]
fn infix_spans_cover_both_operands() {
    // "a + foobar;"
    let program = parse_str("<test>", "a + foobar;").unwrap();
    let Statement::Expression(s) = &program.statements[0] else {
        panic!("expected expression");
    };
    let Expression::Infix(inf) = &s.expression else {
        panic!("expected infix");
    };
    assert_eq!((inf.location.column, inf.location.end_column), (1, 11));
    assert_eq!(
        (inf.right.location().column, inf.right.location().end_column),
        (5, 11)
    );
}

#[test]
fn multi_line_function_spans_lines() {
    let src = "define f(x) {\n  return x;\n}\n";
    let program = parse_str("f.vic", src).unwrap();
    let loc = program.statements[0].location();
    assert_eq!((loc.line, loc.end_line), (1, 3));
    assert_eq!(&*loc.filename, "f.vic");
}

#[test]
fn columns_count_characters() {
    let program = parse_str("<test>", "let s = \"héllo\"; let t = 1;").unwrap();
    let t = program.statements[1].location();
    assert_eq!(t.column, 18);
}
