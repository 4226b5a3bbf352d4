use super::builtin_usage;
use crate::suggestions::suggestion_for;
use crate::{Diagnostic, ErrorCode};
use victoria_ast::location::SourceLocation;

/// E0001: operands of a binary operator have incompatible types.
pub fn type_mismatch(left: &str, op: &str, right: &str, loc: SourceLocation) -> Diagnostic {
    let help = match (left, right) {
        ("STRING", "INTEGER") | ("INTEGER", "STRING") if op == "+" => {
            "convert explicitly: `string(n)` to concatenate the number, or `int(s)` to add numerically"
                .to_string()
        }
        ("STRING", "FLOAT") | ("FLOAT", "STRING") if op == "+" => {
            "convert explicitly: `string(x)` to concatenate, or `float(s)` to add numerically"
                .to_string()
        }
        ("STRING", "INTEGER") | ("INTEGER", "STRING") | ("STRING", "FLOAT") | ("FLOAT", "STRING") => {
            "strings and numbers never compare equal; convert one side with `int`, `float` or `string`"
                .to_string()
        }
        ("ARRAY", _) | (_, "ARRAY") if op == "+" => {
            "use `push(array, value)` to append one element, or `[...a, ...b]` to combine arrays"
                .to_string()
        }
        ("BOOLEAN", "INTEGER") | ("INTEGER", "BOOLEAN") => {
            "booleans are not numbers; choose a number with `cond ? 1 : 0`".to_string()
        }
        ("NULL", _) | (_, "NULL") => {
            "one operand is null; check that the value was assigned and that the function returned something"
                .to_string()
        }
        ("HASH", "HASH") => {
            "maps cannot be combined with operators; copy entries in a `for (k, v in m)` loop"
                .to_string()
        }
        _ => format!("both operands of `{op}` must have compatible types"),
    };
    Diagnostic::new(
        ErrorCode::TypeMismatch,
        format!("type mismatch: {left} {op} {right}"),
    )
    .with_primary(loc, format!("cannot apply `{op}` to {left} and {right}"))
    .with_note(format!("left operand is {left}, right operand is {right}"))
    .with_help(help)
}

/// E0002: a name that is bound nowhere in the scope chain.
pub fn undefined_variable(name: &str, loc: SourceLocation) -> Diagnostic {
    let help = match suggestion_for(name) {
        Some(s) => s.to_string(),
        None => format!("declare it before use: `let {name} = ...`"),
    };
    Diagnostic::new(
        ErrorCode::UndefinedVariable,
        format!("undefined variable `{name}`"),
    )
    .with_primary(loc, "not found in this scope")
    .with_note("names must be declared with `let`, `const` or `define` before they are used")
    .with_help(help)
}

fn operators_for(ty: &str) -> &'static str {
    match ty {
        "INTEGER" | "FLOAT" => "+ - * / % < > <= >= == != and unary -",
        "STRING" => "+ (concatenation) == != < > <= >=",
        "BOOLEAN" => "! && || == !=",
        "ARRAY" => "+ (concatenation) [] (index) [:] (slice) == !=",
        "HASH" => "[] (lookup) . (member) == !=",
        "CHAR" | "RUNE" | "BYTE" => "== != < > <= >=",
        _ => "== !=",
    }
}

/// E0003: an operator applied to a type that does not support it.
pub fn unknown_operator(op: &str, ty: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::UnknownOperator,
        format!("unknown operator: {op}{ty}"),
    )
    .with_primary(loc, format!("`{op}` is not defined for {ty}"))
    .with_help(format!("operators valid for {ty}: {}", operators_for(ty)))
}

/// E0004: the parser wanted one token and saw another.
pub fn unexpected_token(expected: &str, found: &str, loc: SourceLocation) -> Diagnostic {
    let help = match expected {
        ")" => Some("add the missing `)`; every `(` needs a matching `)`"),
        "}" => Some("add the missing `}`; every `{` needs a matching `}`"),
        "]" => Some("add the missing `]`; every `[` needs a matching `]`"),
        "=" => Some("a declaration needs an initializer: `let name = value`"),
        ";" => Some("separate statements with `;` or a new line"),
        "identifier" => {
            Some("names start with a letter or `_`; keywords cannot be used as names")
        }
        "{" => Some("blocks start with `{`, e.g. `if (cond) { ... }`"),
        "(" => Some("conditions and parameter lists are wrapped in parentheses"),
        _ => None,
    };
    let diag = Diagnostic::new(
        ErrorCode::UnexpectedToken,
        format!("expected `{expected}`, found `{found}`"),
    )
    .with_primary(loc, format!("unexpected `{found}`"));
    match help {
        Some(h) => diag.with_help(h),
        None => diag,
    }
}

/// E0005: call syntax applied to something that cannot be called.
pub fn not_a_function(ty: &str, loc: SourceLocation) -> Diagnostic {
    let diag = Diagnostic::new(ErrorCode::NotAFunction, format!("not a function: {ty}"))
        .with_primary(loc, format!("{ty} is not callable"))
        .with_help("only functions, arrow functions and built-ins can be called");
    match ty {
        "STRING" | "ARRAY" => diag.with_note("to read an element, index with `[]` instead of `()`"),
        "HASH" => diag.with_note("to read an entry, use `m[key]` or `m.key`"),
        "STRUCT" => diag.with_note("instantiate a struct with `Name { field: value }`"),
        _ => diag,
    }
}

/// E0006: index past the end of an array or string.
pub fn index_out_of_bounds(index: i64, length: usize, loc: SourceLocation) -> Diagnostic {
    let note = if length == 0 {
        "the collection is empty".to_string()
    } else {
        format!("valid indices are 0 to {}", length - 1)
    };
    let help = if length > 0 && index == length as i64 {
        format!(
            "off by one? the last element is at index {}; use `len(x) - 1` or `last(x)`",
            length - 1
        )
    } else {
        "check the index against `len(x)` before indexing".to_string()
    };
    Diagnostic::new(
        ErrorCode::IndexOutOfBounds,
        format!("index out of bounds: index {index}, length {length}"),
    )
    .with_primary(loc, "index out of range")
    .with_note(note)
    .with_help(help)
}

/// E0007: `/` or `%` by zero.
pub fn division_by_zero(loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(ErrorCode::DivisionByZero, "division by zero")
        .with_primary(loc, "divisor evaluates to zero")
        .with_help("check the divisor first: `if (d != 0) { ... }`")
}

/// E0008: a field or key that the value does not have.
pub fn property_not_found(prop: &str, ty: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::PropertyNotFound,
        format!("property `{prop}` not found on {ty}"),
    )
    .with_primary(loc, format!("{ty} has no `{prop}`"))
    .with_help("check the spelling against the fields declared in the struct")
}

/// E0009: instantiation or method definition for a struct that does not exist.
pub fn struct_not_found(name: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::StructNotFound,
        format!("struct `{name}` is not defined"),
    )
    .with_primary(loc, "unknown struct")
    .with_help(format!(
        "declare it first: `struct {name} {{ field1, field2 }}`"
    ))
}

/// E0010: wrong number or shape of arguments.
pub fn invalid_argument(func: &str, expected: &str, got: &str, loc: SourceLocation) -> Diagnostic {
    let diag = Diagnostic::new(
        ErrorCode::InvalidArgument,
        format!("wrong arguments to `{func}`: expected {expected}, got {got}"),
    )
    .with_primary(loc, "in this call");
    match builtin_usage(func) {
        Some(usage) => diag.with_help(format!("usage: {usage}")),
        None => diag.with_help(format!("check the parameter list of `{func}`")),
    }
}

/// E0011: slice of an unsliceable value or with non-integer bounds.
pub fn slice_error(detail: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(ErrorCode::Slice, format!("invalid slice: {detail}"))
        .with_primary(loc, "in this slice")
        .with_help("slices take integer bounds on arrays and strings: `x[start:end]`, `x[:end]`, `x[start:]`")
}

/// E0012: spread of a non-array, or spread outside an array literal.
pub fn spread_error(ty: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(ErrorCode::Spread, format!("cannot spread {ty}"))
        .with_primary(loc, "spread here")
        .with_help("only arrays can be spread, and only inside an array literal: `[...items, 4]`")
}

/// E0013: a map key of a type that cannot be hashed.
pub fn hash_key_error(ty: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(ErrorCode::HashKey, format!("unusable as map key: {ty}"))
        .with_primary(loc, "this key")
        .with_note("map keys must be int, bool, string, char, byte, rune or enum values")
        .with_help("convert the key with `string(value)`")
}

/// E0014: a built-in received an argument of the wrong type.
pub fn argument_type_error(
    func: &str,
    position: usize,
    expected: &str,
    got: &str,
    loc: SourceLocation,
) -> Diagnostic {
    let diag = Diagnostic::new(
        ErrorCode::ArgumentType,
        format!("argument {position} to `{func}` must be {expected}, got {got}"),
    )
    .with_primary(loc, "in this call");
    match builtin_usage(func) {
        Some(usage) => diag.with_help(format!("usage: {usage}")),
        None => diag,
    }
}

/// E0015: `for ... in` over something that cannot be iterated.
pub fn not_iterable(ty: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(ErrorCode::NotIterable, format!("{ty} is not iterable"))
        .with_primary(loc, "iterated here")
        .with_help("for-in loops accept arrays, strings, maps and ranges such as `0..10`")
}

/// E0016: range with non-integer bounds.
pub fn range_error(detail: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(ErrorCode::Range, format!("invalid range: {detail}"))
        .with_primary(loc, "in this range")
        .with_help("range bounds must be integers: `start..end`")
}

/// E0017: a conversion built-in could not convert its input.
pub fn conversion_error(value: &str, target: &str, loc: SourceLocation) -> Diagnostic {
    let help = match target {
        "int" => "only whole numbers such as \"42\" or \"-7\" convert to int",
        "float" => "only numbers such as \"3.14\" or \"2\" convert to float",
        "bool" => "only \"true\" and \"false\" convert to bool",
        _ => "check the value before converting it",
    };
    Diagnostic::new(
        ErrorCode::Conversion,
        format!("cannot convert {value} to {target}"),
    )
    .with_primary(loc, "conversion fails here")
    .with_help(help)
}

/// E0018: assignment to something that is not a variable, index or field.
pub fn assignment_error(target: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::Assignment,
        format!("invalid assignment target: {target}"),
    )
    .with_primary(loc, "cannot assign to this")
    .with_help("only variables, index expressions (`a[i]`) and fields (`p.x`) can be assigned")
}

/// E0019: an operator used in a position it does not support.
pub fn operator_error(op: &str, detail: &str, loc: SourceLocation) -> Diagnostic {
    let help = match op {
        "++" | "--" => "`++` and `--` apply to a variable holding an integer",
        "=>" => "arrow functions take identifiers as parameters: `(a, b) => a + b`",
        _ => "check the operands of this operator",
    };
    Diagnostic::new(
        ErrorCode::Operator,
        format!("invalid use of `{op}`: {detail}"),
    )
    .with_primary(loc, "here")
    .with_help(help)
}

/// E0020: `.name` on a value that has no members.
pub fn member_access_error(ty: &str, prop: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::MemberAccess,
        format!("cannot access `.{prop}` on {ty}"),
    )
    .with_primary(loc, "member access here")
    .with_help("member access works on maps, struct instances and enums")
}

/// E0020: a struct method read as a value instead of called.
pub fn detached_method(method: &str, struct_name: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::MemberAccess,
        format!("method `{method}` of {struct_name} must be called, not read"),
    )
    .with_primary(loc, "method read here")
    .with_help(format!(
        "call it as `.{method}(...)`, or wrap the call in a lambda: `x => value.{method}(x)`"
    ))
}

/// E0021: `include` named a module the registry does not provide.
pub fn module_not_found(name: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::ModuleNotFound,
        format!("module `{name}` not found"),
    )
    .with_primary(loc, "included here")
    .with_help("check the module name passed to `include`")
}
