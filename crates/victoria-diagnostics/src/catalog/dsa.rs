use crate::{Diagnostic, ErrorCode};
use victoria_ast::location::SourceLocation;

/// E0040: the call-depth guard tripped.
pub fn recursion_depth(limit: usize, func: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::RecursionDepth,
        format!("maximum recursion depth of {limit} exceeded in `{func}`"),
    )
    .with_primary(loc, "recursive call here")
    .with_note("every recursive function needs a base case that stops calling itself")
    .with_help("check that the base case is reachable, or rewrite the recursion as a loop")
}

/// E0041: a loop bound that walks one past the end.
pub fn off_by_one(detail: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(ErrorCode::OffByOne, format!("off-by-one: {detail}"))
        .with_primary(loc, "this bound")
        .with_help("indices run from 0 to `len(x) - 1`; use `<` rather than `<=` against the length")
}

/// E0042: an operation that needs at least one element.
pub fn empty_collection(op: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::EmptyCollection,
        format!("cannot {op} from an empty collection"),
    )
    .with_primary(loc, "collection is empty here")
    .with_help("check `len(x) > 0` first")
}

/// E0043: binary search over data that does not support it.
pub fn binary_search(detail: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::BinarySearch,
        format!("binary search misuse: {detail}"),
    )
    .with_primary(loc, "in this search")
    .with_note("binary search needs a sorted array and `low <= high` bounds")
    .with_help("compute the midpoint as `low + (high - low) / 2`")
}

/// E0044: a traversal revisited a node on its current path.
pub fn graph_cycle(node: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::GraphCycle,
        format!("cycle detected at `{node}`"),
    )
    .with_primary(loc, "revisited here")
    .with_help("track visited nodes in a map and skip the ones already seen")
}

/// E0045: an algorithm that needs its input sorted.
pub fn sorted_array_required(func: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::SortedArrayRequired,
        format!("`{func}` requires a sorted array"),
    )
    .with_primary(loc, "this array is not sorted")
    .with_help("sort the array before calling this function")
}

/// E0046: a negative index into an array or string.
pub fn negative_index(index: i64, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::NegativeIndex,
        format!("negative index {index}"),
    )
    .with_primary(loc, "index must be zero or greater")
    .with_note("Victoria does not count from the end with negative indices")
    .with_help("use `len(x) - n` to count from the end, or `last(x)` for the final element")
}

/// E0047: assignment to a `const` binding.
pub fn constant_reassignment(name: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::ConstantReassignment,
        format!("cannot reassign constant `{name}`"),
    )
    .with_primary(loc, "assignment to a constant")
    .with_note(format!("`{name}` was declared with `const`"))
    .with_help(format!("declare it with `let {name} = ...` if it needs to change"))
}

/// E0048: an enum variant that was never declared.
pub fn enum_value(enum_name: &str, variant: &str, known: &[String], loc: SourceLocation) -> Diagnostic {
    let diag = Diagnostic::new(
        ErrorCode::EnumValue,
        format!("enum `{enum_name}` has no variant `{variant}`"),
    )
    .with_primary(loc, "unknown variant");
    if known.is_empty() {
        diag
    } else {
        diag.with_note(format!("variants of `{enum_name}`: {}", known.join(", ")))
    }
}

/// E0049: `char`/`rune` conversion of something that is not one character.
pub fn character_conversion(value: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::CharacterConversion,
        format!("cannot convert {value} to a character"),
    )
    .with_primary(loc, "conversion fails here")
    .with_note("a character comes from a one-character string or a valid Unicode code point")
    .with_help("index a string with `s[i]` to take one character")
}

/// E0050: a malformed `make` directive.
pub fn make_directive(detail: &str, loc: SourceLocation) -> Diagnostic {
    Diagnostic::new(
        ErrorCode::MakeDirective,
        format!("invalid make directive: {detail}"),
    )
    .with_primary(loc, "here")
    .with_help("write `make(type, size)` with an integer size")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn enum_value_lists_known_variants() {
        let loc = SourceLocation::new(Arc::from("t.vic"), 1, 1, 2);
        let known = vec!["Red".to_string(), "Green".to_string()];
        let d = enum_value("Color", "Blue", &known, loc);
        assert_eq!(d.notes, vec!["variants of `Color`: Red, Green".to_string()]);
    }
}
