use super::conversion_hint;
use crate::{Diagnostic, ErrorCode};
use victoria_ast::location::SourceLocation;

fn with_conversion(diag: Diagnostic, expected: &str, got: &str) -> Diagnostic {
    match conversion_hint(expected, got) {
        Some(hint) => diag.with_help(hint),
        None => diag,
    }
}

/// E0030: a value does not satisfy an annotation in a position with no more
/// specific code.
pub fn type_annotation_mismatch(expected: &str, got: &str, loc: SourceLocation) -> Diagnostic {
    let diag = Diagnostic::new(
        ErrorCode::TypeAnnotationMismatch,
        format!("type mismatch: expected `{expected}`, got `{got}`"),
    )
    .with_primary(loc, format!("this is `{got}`"));
    with_conversion(diag, expected, got)
}

/// E0031: the initializer of a typed `let`/`const`.
pub fn variable_type_mismatch(
    name: &str,
    expected: &str,
    got: &str,
    loc: SourceLocation,
) -> Diagnostic {
    let diag = Diagnostic::new(
        ErrorCode::VariableTypeMismatch,
        format!("type mismatch for variable `{name}`: expected `{expected}`, got `{got}`"),
    )
    .with_primary(loc, format!("expected `{expected}` because of this annotation"))
    .with_note(format!("`{name}` is declared as `{expected}`"));
    match conversion_hint(expected, got) {
        Some(hint) => diag.with_help(hint),
        None => diag.with_help(format!(
            "change the annotation to `{got}` or remove it to accept any type"
        )),
    }
}

/// E0032: an argument bound to a typed parameter.
pub fn parameter_type_mismatch(
    func: &str,
    param: &str,
    expected: &str,
    got: &str,
    loc: SourceLocation,
) -> Diagnostic {
    let diag = Diagnostic::new(
        ErrorCode::ParameterTypeMismatch,
        format!(
            "type mismatch for parameter `{param}` of `{func}`: expected `{expected}`, got `{got}`"
        ),
    )
    .with_primary(loc, format!("argument for `{param}` is `{got}`"))
    .with_note(format!("`{func}` declares `{param}: {expected}`"));
    with_conversion(diag, expected, got)
}

/// E0033: the value a typed function returned.
pub fn return_type_mismatch(
    func: &str,
    expected: &str,
    got: &str,
    loc: SourceLocation,
) -> Diagnostic {
    let diag = Diagnostic::new(
        ErrorCode::ReturnTypeMismatch,
        format!("`{func}` returned `{got}`, but its return type is `{expected}`"),
    )
    .with_primary(loc, format!("returns `{got}`"))
    .with_note(format!("declared with `-> {expected}`"));
    with_conversion(diag, expected, got)
}

/// E0034: an annotation that names no known type.
pub fn invalid_type_annotation(name: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::InvalidTypeAnnotation,
        format!("unknown type `{name}`"),
    )
    .with_primary(loc, "not a type")
    .with_note("built-in types: int, float, string, bool, char, byte, rune, array, map, any, void")
    .with_help("custom types are declared with `struct` or `enum` before use")
}

/// E0035: some parameters are annotated and this one is not, where the
/// annotation cannot be inferred.
pub fn type_annotation_required(name: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::TypeAnnotationRequired,
        format!("`{name}` needs a type annotation"),
    )
    .with_primary(loc, "annotation required here")
    .with_help(format!("write `{name}: any` to accept any value"))
}

/// E0036: an element of an annotated array has the wrong type.
pub fn array_type_mismatch(
    expected: &str,
    got: &str,
    position: usize,
    loc: SourceLocation,
) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::ArrayTypeMismatch,
        format!("array element {position} is `{got}`, expected `{expected}`"),
    )
    .with_primary(loc, format!("expected every element to be `{expected}`"))
    .with_help("arrays annotated `[]T` hold only values of type T; use `[]any` to mix types")
}

/// E0037: a `-> void` function returned a value.
pub fn void_return(func: &str, got: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::VoidReturn,
        format!("`{func}` is declared `void` but returned `{got}`"),
    )
    .with_primary(loc, "value returned here")
    .with_help("remove the returned value, or change the return type")
}

/// E0038: a function with a non-void return type produced nothing.
pub fn missing_return(func: &str, expected: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::MissingReturn,
        format!("`{func}` must return `{expected}`, but returned nothing"),
    )
    .with_primary(loc, "function ends without a value")
    .with_help(format!(
        "end every path with `return` followed by a `{expected}` value"
    ))
}
