use std::sync::Arc;
use victoria_ast::location::SourceLocation;
use victoria_diagnostics::{catalog, DiagnosticKind, ErrorCode, JokePolicy, Renderer};

fn loc(line: usize, col: usize, end: usize) -> SourceLocation {
    SourceLocation::new(Arc::from("prog.vic"), line, col, end)
}

#[test]
fn plain_rendering_is_byte_stable() {
    let diag = catalog::type_mismatch("STRING", "+", "INTEGER", loc(1, 9, 16))
        .with_source(Arc::from("let x = \"a\" + 1;\n"));
    let first = Renderer::render_plain(&diag);
    for _ in 0..10 {
        assert_eq!(Renderer::render_plain(&diag), first);
    }
    let human = Renderer::new(false, JokePolicy::Off);
    assert_eq!(human.render(&diag), human.render(&diag));
}

#[test]
fn every_constructor_sets_a_primary_label() {
    let l = || loc(3, 2, 5);
    let diags = vec![
        catalog::type_mismatch("INTEGER", "-", "BOOLEAN", l()),
        catalog::undefined_variable("x", l()),
        catalog::unknown_operator("-", "STRING", l()),
        catalog::unexpected_token(")", "}", l()),
        catalog::not_a_function("INTEGER", l()),
        catalog::index_out_of_bounds(4, 2, l()),
        catalog::division_by_zero(l()),
        catalog::property_not_found("z", "Point", l()),
        catalog::struct_not_found("Pt", l()),
        catalog::invalid_argument("len", "1 argument", "2", l()),
        catalog::slice_error("bounds must be integers", l()),
        catalog::spread_error("INTEGER", l()),
        catalog::hash_key_error("ARRAY", l()),
        catalog::argument_type_error("upper", 1, "string", "int", l()),
        catalog::not_iterable("INTEGER", l()),
        catalog::range_error("start must be an integer", l()),
        catalog::conversion_error("\"abc\"", "int", l()),
        catalog::assignment_error("literal", l()),
        catalog::operator_error("++", "operand must be a variable", l()),
        catalog::member_access_error("INTEGER", "x", l()),
        catalog::module_not_found("nope", l()),
        catalog::type_annotation_mismatch("int", "string", l()),
        catalog::variable_type_mismatch("x", "int", "string", l()),
        catalog::parameter_type_mismatch("f", "x", "int", "string", l()),
        catalog::return_type_mismatch("f", "int", "string", l()),
        catalog::invalid_type_annotation("Foo", l()),
        catalog::type_annotation_required("x", l()),
        catalog::array_type_mismatch("int", "string", 1, l()),
        catalog::void_return("f", "int", l()),
        catalog::missing_return("f", "int", l()),
        catalog::recursion_depth(1000, "f", l()),
        catalog::empty_collection("pop", l()),
        catalog::negative_index(-1, l()),
        catalog::constant_reassignment("PI", l()),
        catalog::character_conversion("\"ab\"", l()),
        catalog::illegal_character("@", l()),
        catalog::unterminated_string(l()),
        catalog::invalid_integer_literal("99999999999999999999", l()),
        catalog::invalid_float_literal("1.2.3", l()),
        catalog::infinite_loop(l()),
        catalog::time_complexity(3, l()),
        catalog::integer_overflow(i64::MAX, "+", 1, l()),
        catalog::comparison_with_null("==", l()),
        catalog::modulo_with_negative(l()),
        catalog::memoization_suggestion("fib", 2, l()),
    ];
    for d in diags {
        assert!(
            d.labels.iter().any(|label| label.primary),
            "{} has no primary label",
            d.code
        );
        assert_eq!(d.location(), Some(&l()));
    }
}

#[test]
fn advisory_constructors_are_not_errors() {
    let d = catalog::integer_overflow(i64::MAX, "+", 1, loc(1, 1, 2));
    assert_eq!(d.kind, DiagnosticKind::Warning);
    assert!(!d.is_error());
    let d = catalog::memoization_suggestion("fib", 2, loc(1, 1, 2));
    assert_eq!(d.kind, DiagnosticKind::Note);
}

#[test]
fn diagnostics_serialize_to_json() {
    let d = catalog::division_by_zero(loc(2, 10, 11));
    let json = serde_json::to_value(&d).unwrap();
    assert_eq!(json["kind"], "error");
    assert_eq!(json["code"], "E0007");
    assert_eq!(json["message"], "division by zero");
    assert_eq!(json["labels"][0]["location"]["line"], 2);
    assert_eq!(json["labels"][0]["location"]["filename"], "prog.vic");
    assert_eq!(json["labels"][0]["primary"], true);
    assert!(json.get("source").is_none());
}

#[test]
fn codes_render_in_header() {
    let d = catalog::undefined_variable("println", loc(1, 1, 8));
    assert_eq!(d.code, ErrorCode::UndefinedVariable);
    let out = Renderer::render_plain(&d);
    assert!(out.starts_with("error[E0002]: undefined variable `println`"));
    assert!(out.contains("= help: use `print(...)`"));
}
