use victoria_diagnostics::ErrorCode;
use victoria_parse::parse_str;

fn codes(src: &str) -> Vec<ErrorCode> {
    parse_str("<mem>", src)
        .unwrap_err()
        .diagnostics
        .iter()
        .map(|d| d.code)
        .collect()
}

#[test]
fn missing_initializer_is_unexpected_token() {
    let err = parse_str("<mem>", "let a 1").unwrap_err();
    assert_eq!(err.diagnostics[0].code, ErrorCode::UnexpectedToken);
    assert_eq!(err.diagnostics[0].message, "expected `=`, found `1`");
    assert!(err.errors[0].starts_with("<mem>:1:7: "));
    assert!(err.to_string().starts_with("1 parse error(s)"));
}

#[test]
fn illegal_character_reported_by_parser() {
    assert_eq!(codes("let a = 1 @ 2;")[0], ErrorCode::IllegalCharacter);
    assert_eq!(codes("let a = @;")[0], ErrorCode::IllegalCharacter);
}

#[test]
fn unterminated_string() {
    assert_eq!(codes("let s = \"abc")[0], ErrorCode::UnterminatedString);
}

#[test]
fn literal_errors() {
    assert_eq!(
        codes("let n = 99999999999999999999;")[0],
        ErrorCode::InvalidIntegerLiteral
    );
}

#[test]
fn no_prefix_is_generic_parse_error() {
    let err = parse_str("<mem>", "let x = );").unwrap_err();
    assert_eq!(err.diagnostics[0].code, ErrorCode::ParseError);
    assert!(err.diagnostics[0].help.is_some());
}

#[test]
fn unclosed_block_expects_brace() {
    let err = parse_str("<mem>", "if (x) { print(1);").unwrap_err();
    assert!(err
        .diagnostics
        .iter()
        .any(|d| d.code == ErrorCode::UnexpectedToken && d.message.contains("`}`")));
}

#[test]
fn several_errors_in_one_pass() {
    let err = parse_str("<mem>", "let = 1;\nlet y = ;\nlet z 3;").unwrap_err();
    assert!(err.errors.len() >= 3);
    assert_eq!(err.errors.len(), err.diagnostics.len());
}

#[test]
fn bad_arrow_parameters() {
    assert_eq!(codes("let f = 1 => 2;")[0], ErrorCode::Operator);
}
