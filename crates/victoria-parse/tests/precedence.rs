use victoria_ast::ast::{Expression, Statement};
use victoria_parse::parse_str;

fn val(src: &str) -> Expression {
    let program = parse_str("<mem>", &format!("let v = {src};")).unwrap();
    let Statement::Let(decl) = &program.statements[0] else {
        panic!("expected let statement");
    };
    decl.value.clone()
}

fn shape(src: &str) -> String {
    val(src).to_string()
}

#[test]
fn product_binds_tighter_than_sum() {
    assert_eq!(shape("1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(shape("1 * 2 + 3"), "((1 * 2) + 3)");
    assert_eq!(shape("10 % 3 - 1"), "((10 % 3) - 1)");
}

#[test]
fn assignment_is_right_associative() {
    let program = parse_str("<mem>", "a = b = 1;").unwrap();
    assert_eq!(program.statements[0].to_string(), "(a = (b = 1));");
    let program = parse_str("<mem>", "x += y -= 2;").unwrap();
    assert_eq!(program.statements[0].to_string(), "(x += (y -= 2));");
}

#[test]
fn logical_layers() {
    assert_eq!(shape("a && b || c"), "((a && b) || c)");
    assert_eq!(shape("a || b && c"), "(a || (b && c))");
    assert_eq!(shape("a and b or not c"), "((a && b) || (!c))");
    assert_eq!(shape("1 < 2 == true"), "((1 < 2) == true)");
}

#[test]
fn range_sits_below_sum() {
    assert_eq!(shape("a..b+1"), "(a..(b + 1))");
    assert_eq!(shape("0..len(xs) - 1"), "(0..(len(xs) - 1))");
}

#[test]
fn comparison_is_left_associative() {
    assert_eq!(shape("1 == 1 == 1"), "((1 == 1) == 1)");
}

#[test]
fn prefix_postfix_and_calls() {
    assert_eq!(shape("-a * b"), "((-a) * b)");
    assert_eq!(shape("!f(x)"), "(!f(x))");
    assert_eq!(shape("a.b(c)[0]"), "(a.b(c)[0])");
    assert_eq!(shape("i++ + 1"), "((i++) + 1)");
    assert_eq!(shape("-xs[0]"), "(-(xs[0]))");
}

#[test]
fn ternary_is_lowest_but_one() {
    assert_eq!(shape("a == b ? 1 : 2"), "((a == b) ? 1 : 2)");
    assert_eq!(shape("a ? b : c ? d : e"), "(a ? b : (c ? d : e))");
    assert_eq!(shape("x || y ? 1 + 2 : 3"), "((x || y) ? (1 + 2) : 3)");
}

#[test]
fn arrow_body_extends_right() {
    assert_eq!(shape("x => x * 2 + 1"), "((x) => ((x * 2) + 1))");
    assert_eq!(shape("map(xs, (a, b) => a + b)"), "map(xs, ((a, b) => (a + b)))");
}
