//! Built-in functions available to every program without `include`.
//!
//! Each built-in is a plain function over already-evaluated arguments. It
//! checks its own arity and argument types and reports misuse through the
//! diagnostic catalog, so the message carries the built-in's usage line.

use std::collections::HashMap;
use std::ops::RangeInclusive;

use victoria_ast::location::SourceLocation;
use victoria_diagnostics::catalog;

use crate::eval::{ControlFlow, EvalResult, Interpreter};
use crate::object::{Builtin, BuiltinFn, HashKey, HashPair, Object};

const BUILTINS: &[(&str, BuiltinFn)] = &[
    ("len", len),
    ("push", push),
    ("pop", pop),
    ("first", first),
    ("last", last),
    ("rest", rest),
    ("split", split),
    ("join", join),
    ("upper", upper),
    ("lower", lower),
    ("contains", contains),
    ("index", index),
    ("map", map),
    ("filter", filter),
    ("reduce", reduce),
    ("range", range),
    ("format", format),
    ("int", to_int),
    ("string", to_string),
    ("float", to_float),
    ("bool", to_bool),
    ("char", to_char),
    ("byte", to_byte),
    ("rune", to_rune),
    ("type", type_of),
    ("keys", keys),
    ("values", values),
    ("print", print),
    ("input", input),
];

/// The built-in called `name`, if there is one.
pub fn lookup(name: &str) -> Option<Builtin> {
    BUILTINS
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|&(name, func)| Builtin { name, func })
}

/// Names of every built-in, in registration order.
pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|(name, _)| *name)
}

// ---------------------------------------------------------------------------
// Argument checking
// ---------------------------------------------------------------------------

pub(crate) fn arity(
    func: &str,
    args: &[Object],
    expected: RangeInclusive<usize>,
    loc: &SourceLocation,
) -> Result<(), ControlFlow> {
    if expected.contains(&args.len()) {
        return Ok(());
    }
    let (min, max) = (*expected.start(), *expected.end());
    let expected = if min == max {
        plural(min)
    } else if max == usize::MAX {
        format!("at least {}", plural(min))
    } else {
        format!("{min} to {}", plural(max))
    };
    Err(catalog::invalid_argument(func, &expected, &plural(args.len()), loc.clone()).into())
}

fn plural(count: usize) -> String {
    if count == 1 {
        "1 argument".to_string()
    } else {
        format!("{count} arguments")
    }
}

/// E0014 for the argument at zero-based `index`.
pub(crate) fn wrong_type(func: &str, index: usize, expected: &str, got: &Object, loc: &SourceLocation) -> ControlFlow {
    catalog::argument_type_error(func, index + 1, expected, &got.type_name(), loc.clone()).into()
}

pub(crate) fn string_arg<'a>(func: &str, args: &'a [Object], index: usize, loc: &SourceLocation) -> Result<&'a str, ControlFlow> {
    match &args[index] {
        Object::Str(s) => Ok(s),
        other => Err(wrong_type(func, index, "string", other, loc)),
    }
}

pub(crate) fn int_arg(func: &str, args: &[Object], index: usize, loc: &SourceLocation) -> Result<i64, ControlFlow> {
    match &args[index] {
        Object::Integer(i) => Ok(*i),
        other => Err(wrong_type(func, index, "int", other, loc)),
    }
}

/// A snapshot of the array argument at `index`.
fn array_arg(func: &str, args: &[Object], index: usize, loc: &SourceLocation) -> Result<Vec<Object>, ControlFlow> {
    match &args[index] {
        Object::Array(items) => Ok(items.borrow().clone()),
        other => Err(wrong_type(func, index, "array", other, loc)),
    }
}

fn callable_arg(func: &str, args: &[Object], index: usize, loc: &SourceLocation) -> Result<Object, ControlFlow> {
    let value = &args[index];
    if value.is_callable() {
        Ok(value.clone())
    } else {
        Err(wrong_type(func, index, "function", value, loc))
    }
}

/// Hash entries ordered by key, the iteration order `keys` and `values`
/// promise.
fn sorted_entries(pairs: &HashMap<HashKey, HashPair>) -> Vec<(Object, Object)> {
    let mut entries: Vec<(Object, Object)> = pairs
        .values()
        .map(|pair| (pair.key.clone(), pair.value.clone()))
        .collect();
    entries.sort_by_key(|(key, _)| key.repr());
    entries
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

fn len(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("len", args, 1..=1, loc)?;
    let n = match &args[0] {
        Object::Str(s) => s.chars().count(),
        Object::Array(items) => items.borrow().len(),
        Object::Hash(pairs) => pairs.borrow().len(),
        Object::Range(start, end) => start.abs_diff(*end) as usize,
        other => return Err(wrong_type("len", 0, "string, array, map or range", other, loc)),
    };
    Ok(Object::Integer(n as i64))
}

fn push(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("push", args, 2..=2, loc)?;
    match &args[0] {
        Object::Array(items) => {
            items.borrow_mut().push(args[1].clone());
            Ok(args[0].clone())
        }
        other => Err(wrong_type("push", 0, "array", other, loc)),
    }
}

fn pop(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("pop", args, 1..=1, loc)?;
    match &args[0] {
        Object::Array(items) => items
            .borrow_mut()
            .pop()
            .ok_or_else(|| catalog::empty_collection("pop", loc.clone()).into()),
        other => Err(wrong_type("pop", 0, "array", other, loc)),
    }
}

fn first(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("first", args, 1..=1, loc)?;
    match &args[0] {
        Object::Array(items) => Ok(items.borrow().first().cloned().unwrap_or(Object::Null)),
        Object::Str(s) => Ok(s.chars().next().map(Object::Char).unwrap_or(Object::Null)),
        other => Err(wrong_type("first", 0, "array", other, loc)),
    }
}

fn last(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("last", args, 1..=1, loc)?;
    match &args[0] {
        Object::Array(items) => Ok(items.borrow().last().cloned().unwrap_or(Object::Null)),
        Object::Str(s) => Ok(s.chars().last().map(Object::Char).unwrap_or(Object::Null)),
        other => Err(wrong_type("last", 0, "array", other, loc)),
    }
}

fn rest(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("rest", args, 1..=1, loc)?;
    let items = array_arg("rest", args, 0, loc)?;
    if items.is_empty() {
        return Ok(Object::Null);
    }
    Ok(Object::array(items[1..].to_vec()))
}

fn contains(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("contains", args, 2..=2, loc)?;
    let needle = &args[1];
    let found = match (&args[0], needle) {
        (Object::Str(s), Object::Str(sub)) => s.contains(sub.as_str()),
        (Object::Str(s), Object::Char(c)) => s.contains(*c),
        (Object::Str(_), other) => return Err(wrong_type("contains", 1, "string", other, loc)),
        (Object::Array(items), _) => items
            .borrow()
            .iter()
            .any(|item| item.equals(needle) == Some(true)),
        (Object::Hash(pairs), key) => match key.hash_key() {
            Some(hk) => pairs.borrow().contains_key(&hk),
            None => false,
        },
        (Object::Range(start, end), Object::Integer(i)) => {
            if start <= end {
                (*start..*end).contains(i)
            } else {
                (*end + 1..=*start).contains(i)
            }
        }
        (other, _) => return Err(wrong_type("contains", 0, "string, array, map or range", other, loc)),
    };
    Ok(Object::Boolean(found))
}

/// Position of the first match, or -1.
fn index(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("index", args, 2..=2, loc)?;
    let position = match (&args[0], &args[1]) {
        (Object::Array(items), needle) => items
            .borrow()
            .iter()
            .position(|item| item.equals(needle) == Some(true)),
        (Object::Str(s), Object::Str(sub)) => s
            .find(sub.as_str())
            .map(|byte| s[..byte].chars().count()),
        (Object::Str(s), Object::Char(c)) => s.chars().position(|ch| ch == *c),
        (Object::Str(_), other) => return Err(wrong_type("index", 1, "string", other, loc)),
        (other, _) => return Err(wrong_type("index", 0, "array or string", other, loc)),
    };
    Ok(Object::Integer(position.map_or(-1, |p| p as i64)))
}

fn keys(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("keys", args, 1..=1, loc)?;
    match &args[0] {
        Object::Hash(pairs) => Ok(Object::array(
            sorted_entries(&pairs.borrow()).into_iter().map(|(k, _)| k).collect(),
        )),
        other => Err(wrong_type("keys", 0, "map", other, loc)),
    }
}

fn values(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("values", args, 1..=1, loc)?;
    match &args[0] {
        Object::Hash(pairs) => Ok(Object::array(
            sorted_entries(&pairs.borrow()).into_iter().map(|(_, v)| v).collect(),
        )),
        other => Err(wrong_type("values", 0, "map", other, loc)),
    }
}

fn range(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("range", args, 1..=2, loc)?;
    if args.len() == 1 {
        return Ok(Object::Range(0, int_arg("range", args, 0, loc)?));
    }
    let start = int_arg("range", args, 0, loc)?;
    let end = int_arg("range", args, 1, loc)?;
    Ok(Object::Range(start, end))
}

// ---------------------------------------------------------------------------
// Higher-order
// ---------------------------------------------------------------------------

fn map(interp: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("map", args, 2..=2, loc)?;
    let items = array_arg("map", args, 0, loc)?;
    let func = callable_arg("map", args, 1, loc)?;
    let mut mapped = Vec::with_capacity(items.len());
    for item in items {
        mapped.push(interp.apply_function(&func, vec![item], loc)?);
    }
    Ok(Object::array(mapped))
}

fn filter(interp: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("filter", args, 2..=2, loc)?;
    let items = array_arg("filter", args, 0, loc)?;
    let func = callable_arg("filter", args, 1, loc)?;
    let mut kept = Vec::new();
    for item in items {
        if interp.apply_function(&func, vec![item.clone()], loc)?.is_truthy() {
            kept.push(item);
        }
    }
    Ok(Object::array(kept))
}

fn reduce(interp: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("reduce", args, 3..=3, loc)?;
    let items = array_arg("reduce", args, 0, loc)?;
    let func = callable_arg("reduce", args, 1, loc)?;
    let mut acc = args[2].clone();
    for item in items {
        acc = interp.apply_function(&func, vec![acc, item], loc)?;
    }
    Ok(acc)
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

fn split(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("split", args, 1..=2, loc)?;
    let s = string_arg("split", args, 0, loc)?;
    let sep = if args.len() == 2 {
        string_arg("split", args, 1, loc)?
    } else {
        " "
    };
    let parts: Vec<Object> = if sep.is_empty() {
        s.chars().map(|c| Object::Str(c.to_string())).collect()
    } else {
        s.split(sep).map(Object::str).collect()
    };
    Ok(Object::array(parts))
}

fn join(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("join", args, 1..=2, loc)?;
    let items = array_arg("join", args, 0, loc)?;
    let sep = if args.len() == 2 {
        string_arg("join", args, 1, loc)?
    } else {
        ""
    };
    let parts: Vec<String> = items.iter().map(ToString::to_string).collect();
    Ok(Object::Str(parts.join(sep)))
}

fn upper(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("upper", args, 1..=1, loc)?;
    Ok(Object::Str(string_arg("upper", args, 0, loc)?.to_uppercase()))
}

fn lower(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("lower", args, 1..=1, loc)?;
    Ok(Object::Str(string_arg("lower", args, 0, loc)?.to_lowercase()))
}

/// Replaces each `{}` in the template with the next argument's display
/// form. Placeholders beyond the last argument stay as written.
fn format(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("format", args, 1..=usize::MAX, loc)?;
    let template = string_arg("format", args, 0, loc)?;
    let mut values = args[1..].iter();
    let mut out = String::with_capacity(template.len());
    let mut pieces = template.split("{}");
    if let Some(head) = pieces.next() {
        out.push_str(head);
    }
    for piece in pieces {
        match values.next() {
            Some(value) => out.push_str(&value.to_string()),
            None => out.push_str("{}"),
        }
        out.push_str(piece);
    }
    Ok(Object::Str(out))
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn to_int(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("int", args, 1..=1, loc)?;
    let value = match &args[0] {
        Object::Integer(i) => *i,
        Object::Float(f) if f.is_finite() => f.trunc() as i64,
        Object::Boolean(b) => i64::from(*b),
        Object::Char(c) | Object::Rune(c) => i64::from(u32::from(*c)),
        Object::Byte(b) => i64::from(*b),
        Object::EnumValue(v) => v.value,
        Object::Str(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| catalog::conversion_error(&args[0].repr(), "int", loc.clone()))?,
        other => return Err(catalog::conversion_error(&other.repr(), "int", loc.clone()).into()),
    };
    Ok(Object::Integer(value))
}

fn to_float(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("float", args, 1..=1, loc)?;
    let value = match &args[0] {
        Object::Float(f) => *f,
        Object::Integer(i) => *i as f64,
        Object::Str(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| catalog::conversion_error(&args[0].repr(), "float", loc.clone()))?,
        other => return Err(catalog::conversion_error(&other.repr(), "float", loc.clone()).into()),
    };
    Ok(Object::Float(value))
}

fn to_string(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("string", args, 1..=1, loc)?;
    Ok(Object::Str(args[0].to_string()))
}

fn to_bool(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("bool", args, 1..=1, loc)?;
    match &args[0] {
        Object::Str(s) => match s.trim() {
            "true" => Ok(Object::Boolean(true)),
            "false" => Ok(Object::Boolean(false)),
            _ => Err(catalog::conversion_error(&args[0].repr(), "bool", loc.clone()).into()),
        },
        other => Ok(Object::Boolean(other.is_truthy())),
    }
}

/// The single character behind a one-character string or a code point.
fn as_char(value: &Object) -> Option<char> {
    match value {
        Object::Char(c) | Object::Rune(c) => Some(*c),
        Object::Byte(b) => Some(char::from(*b)),
        Object::Integer(i) => u32::try_from(*i).ok().and_then(char::from_u32),
        Object::Str(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        }
        _ => None,
    }
}

fn to_char(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("char", args, 1..=1, loc)?;
    as_char(&args[0])
        .map(Object::Char)
        .ok_or_else(|| catalog::character_conversion(&args[0].repr(), loc.clone()).into())
}

fn to_rune(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("rune", args, 1..=1, loc)?;
    as_char(&args[0])
        .map(Object::Rune)
        .ok_or_else(|| catalog::character_conversion(&args[0].repr(), loc.clone()).into())
}

fn to_byte(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("byte", args, 1..=1, loc)?;
    let byte = match &args[0] {
        Object::Byte(b) => Some(*b),
        Object::Integer(i) => u8::try_from(*i).ok(),
        Object::Char(c) | Object::Rune(c) => u8::try_from(u32::from(*c)).ok(),
        _ => None,
    };
    byte.map(Object::Byte)
        .ok_or_else(|| catalog::conversion_error(&args[0].repr(), "byte", loc.clone()).into())
}

fn type_of(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("type", args, 1..=1, loc)?;
    Ok(Object::Str(args[0].type_name()))
}

// ---------------------------------------------------------------------------
// I/O
// ---------------------------------------------------------------------------

fn print(interp: &mut Interpreter, args: &[Object], _: &SourceLocation) -> EvalResult {
    let line: Vec<String> = args.iter().map(ToString::to_string).collect();
    interp.write_output(&format!("{}\n", line.join(" ")));
    Ok(Object::Null)
}

fn input(interp: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("input", args, 0..=1, loc)?;
    if let Some(prompt) = args.first() {
        interp.write_output(&prompt.to_string());
    }
    Ok(Object::Str(interp.read_line()))
}
