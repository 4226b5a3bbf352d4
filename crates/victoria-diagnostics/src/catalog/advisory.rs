use crate::{Diagnostic, ErrorCode};
use victoria_ast::location::SourceLocation;

/// W0001
pub fn infinite_loop(loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::InfiniteLoop,
        "this loop never ends: `while (true)` without `break` or `return`",
    )
    .with_primary(loc, "loop condition is always true")
    .with_help("add a `break` inside the loop, or loop on a condition that becomes false")
}

/// W0002
pub fn time_complexity(depth: usize, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::TimeComplexity,
        format!("loop nested {depth} levels deep"),
    )
    .with_primary(loc, "innermost loop")
    .with_note(format!("running time grows as O(n^{depth})"))
    .with_help("a map lookup can often replace an inner loop")
}

/// W0003
pub fn integer_overflow(left: i64, op: &str, right: i64, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::IntegerOverflow,
        format!("integer overflow in `{left} {op} {right}`"),
    )
    .with_primary(loc, "result wrapped around")
    .with_note(format!(
        "integers range from {} to {}",
        i64::MIN,
        i64::MAX
    ))
    .with_help("use floats for values this large")
}

/// W0004
pub fn comparison_with_null(op: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::ComparisonWithNull,
        format!("comparison with null using `{op}`"),
    )
    .with_primary(loc, "one side is null")
    .with_note("null usually means a function returned nothing or a map key is missing")
}

/// W0005
pub fn modulo_with_negative(loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::ModuloWithNegative,
        "`%` with a negative operand",
    )
    .with_primary(loc, "negative operand")
    .with_note("the result takes the sign of the left operand: -7 % 3 is -1")
    .with_help("for a result that is never negative, write `((a % n) + n) % n`")
}

/// N0001
pub fn memoization_suggestion(func: &str, calls: usize, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::MemoizationSuggestion,
        format!("`{func}` calls itself {calls} times per invocation"),
    )
    .with_primary(loc, "tree recursion")
    .with_note("the number of calls can grow exponentially with the input")
    .with_help("cache results in a map keyed by the arguments")
}
