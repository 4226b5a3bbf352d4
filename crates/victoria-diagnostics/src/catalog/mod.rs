//! One constructor per error code.
//!
//! Constructors are pure: the same arguments always produce the same
//! diagnostic. Each one attaches a primary label at the given location plus
//! notes and help chosen from the specific operator, type or name involved.

mod advisory;
mod dsa;
mod parse;
mod runtime;
mod types;

pub use advisory::*;
pub use dsa::*;
pub use parse::*;
pub use runtime::*;
pub use types::*;

/// Usage line for a built-in function, shown when it is called wrongly.
pub fn builtin_usage(name: &str) -> Option<&'static str> {
    let usage = match name {
        "len" => "len(collection) -> int",
        "push" => "push(array, value) -> array",
        "pop" => "pop(array) -> value",
        "first" => "first(array) -> value",
        "last" => "last(array) -> value",
        "rest" => "rest(array) -> array",
        "split" => "split(string, separator) -> array",
        "join" => "join(array, separator) -> string",
        "upper" => "upper(string) -> string",
        "lower" => "lower(string) -> string",
        "contains" => "contains(collection, value) -> bool",
        "index" => "index(collection, value) -> int",
        "map" => "map(array, fn) -> array",
        "filter" => "filter(array, fn) -> array",
        "reduce" => "reduce(array, fn, initial) -> value",
        "range" => "range(end) or range(start, end) -> range",
        "format" => "format(template, args...) -> string",
        "int" => "int(value) -> int",
        "string" => "string(value) -> string",
        "float" => "float(value) -> float",
        "bool" => "bool(value) -> bool",
        "char" => "char(string or int) -> char",
        "byte" => "byte(int) -> byte",
        "rune" => "rune(string or int) -> rune",
        "type" => "type(value) -> string",
        "keys" => "keys(map) -> array",
        "values" => "values(map) -> array",
        "print" => "print(values...)",
        "input" => "input(prompt?) -> string",
        _ => return None,
    };
    Some(usage)
}

/// Suggested conversion between two annotation-style type names.
pub(crate) fn conversion_hint(expected: &str, got: &str) -> Option<String> {
    let hint = match (expected, got) {
        ("int", "string") => "convert with `int(value)` first",
        ("int", "float") => "truncate with `int(value)` first",
        ("float", "string") => "convert with `float(value)` first",
        ("string", "int") | ("string", "float") | ("string", "bool") => {
            "convert with `string(value)` first"
        }
        ("bool", _) => "produce a boolean with a comparison or `bool(value)`",
        ("char", "int") => "convert a code point with `char(value)`",
        ("array", _) => "wrap the value in brackets: `[value]`",
        _ => return None,
    };
    Some(hint.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_builtins_have_usage() {
        for name in ["len", "push", "reduce", "print", "format", "keys"] {
            assert!(builtin_usage(name).is_some(), "{name} has no usage line");
        }
        assert!(builtin_usage("println").is_none());
    }
}
