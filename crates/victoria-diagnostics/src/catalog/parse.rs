use crate::{Diagnostic, ErrorCode};
use victoria_ast::location::SourceLocation;

/// E0100: a structural error with no more specific code.
pub fn parse_error(message: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(ErrorCode::ParseError, message.to_string()).with_primary(loc, "here")
}

/// E0100 for a token that cannot start an expression.
pub fn no_prefix_parse(found: &str, loc: SourceLocation) -> Diagnostic {
    let help = match found {
        ")" | "]" | "}" => "this closing bracket has no matching opening bracket",
        "=" => "`=` needs a target on its left, e.g. `x = 1`",
        "=>" => "arrow functions start with a parameter list: `(x) => x + 1`",
        "else" => "`else` must follow the closing `}` of an `if` block",
        "case" | "default" => "`case` and `default` belong inside a `switch` block",
        "catch" => "`catch` must follow the closing `}` of a `try` block",
        _ => "an expression was expected here",
    };
    Diagnostic::new(
        ErrorCode::ParseError,
        format!("expected an expression, found `{found}`"),
    )
    .with_primary(loc, "not the start of an expression")
    .with_help(help)
}

/// E0101: a character no token starts with.
pub fn illegal_character(ch: &str, loc: SourceLocation) -> Diagnostic {
    let help = match ch {
        "&" => "logical and is `&&` or `and`",
        "|" => "logical or is `||` or `or`",
        "'" => "strings use double quotes or back-ticks: \"text\"",
        "#" => "comments start with `//` or are wrapped in `/* */`",
        "@" => "decorators are not supported",
        "$" => "variable names do not take a `$` prefix",
        "\\" => "backslashes are only valid inside strings",
        "^" => "there is no exponent operator; multiply in a loop",
        "~" => "bitwise operators are not supported",
        _ => "remove this character",
    };
    Diagnostic::new(
        ErrorCode::IllegalCharacter,
        format!("illegal character `{ch}`"),
    )
    .with_primary(loc, "not valid here")
    .with_help(help)
}

/// E0102: a string literal still open at end of input.
pub fn unterminated_string(loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(ErrorCode::UnterminatedString, "unterminated string literal")
        .with_primary(loc, "string starts here")
        .with_help("close the string with a matching quote; use back-ticks for strings that span lines")
}

/// E0103
pub fn invalid_integer_literal(literal: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::InvalidIntegerLiteral,
        format!("could not parse `{literal}` as an integer"),
    )
    .with_primary(loc, "invalid integer")
    .with_note(format!(
        "integers range from {} to {}",
        i64::MIN,
        i64::MAX
    ))
    .with_help("use a float for values outside this range")
}

/// E0104
pub fn invalid_float_literal(literal: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::InvalidFloatLiteral,
        format!("could not parse `{literal}` as a float"),
    )
    .with_primary(loc, "invalid float")
    .with_help("floats are written as digits around a single `.`, e.g. `3.14` or `.5`")
}
