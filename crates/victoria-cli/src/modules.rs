//! Modules that `include` can bring into scope.
//!
//! The interpreter asks a [`ModuleRegistry`] for a module's bindings each
//! time an `include` names it; nothing is cached between includes.

use victoria_ast::location::SourceLocation;

use crate::builtins::{arity, int_arg, string_arg, wrong_type};
use crate::eval::{ControlFlow, EvalResult, Interpreter};
use crate::object::{Builtin, BuiltinFn, Object};

/// Source of the bindings behind `include "name"`.
pub trait ModuleRegistry {
    /// Bindings exported by module `name`, or `None` when no such module
    /// exists.
    fn load(&self, name: &str) -> Option<Vec<(String, Object)>>;
}

/// The `math` and `strings` modules.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdModules;

/// A registry with no modules at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoModules;

impl ModuleRegistry for NoModules {
    fn load(&self, _name: &str) -> Option<Vec<(String, Object)>> {
        None
    }
}

const MATH: &[(&str, BuiltinFn)] = &[
    ("abs", math_abs),
    ("sqrt", math_sqrt),
    ("pow", math_pow),
    ("min", math_min),
    ("max", math_max),
    ("floor", math_floor),
    ("ceil", math_ceil),
];

const STRINGS: &[(&str, BuiltinFn)] = &[
    ("trim", strings_trim),
    ("repeat", strings_repeat),
    ("reverse", strings_reverse),
    ("starts_with", strings_starts_with),
    ("ends_with", strings_ends_with),
    ("replace", strings_replace),
];

fn functions(table: &[(&'static str, BuiltinFn)]) -> Vec<(String, Object)> {
    table
        .iter()
        .map(|&(name, func)| (name.to_string(), Object::Builtin(Builtin { name, func })))
        .collect()
}

impl ModuleRegistry for StdModules {
    fn load(&self, name: &str) -> Option<Vec<(String, Object)>> {
        match name {
            "math" => {
                let mut bindings = functions(MATH);
                bindings.push(("PI".to_string(), Object::Float(std::f64::consts::PI)));
                bindings.push(("E".to_string(), Object::Float(std::f64::consts::E)));
                Some(bindings)
            }
            "strings" => Some(functions(STRINGS)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// math
// ---------------------------------------------------------------------------

fn number_arg(func: &str, args: &[Object], index: usize, loc: &SourceLocation) -> Result<f64, ControlFlow> {
    match &args[index] {
        Object::Integer(i) => Ok(*i as f64),
        Object::Float(f) => Ok(*f),
        other => Err(wrong_type(func, index, "int or float", other, loc)),
    }
}

fn math_abs(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("abs", args, 1..=1, loc)?;
    match &args[0] {
        Object::Integer(i) => Ok(Object::Integer(i.wrapping_abs())),
        _ => Ok(Object::Float(number_arg("abs", args, 0, loc)?.abs())),
    }
}

fn math_sqrt(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("sqrt", args, 1..=1, loc)?;
    Ok(Object::Float(number_arg("sqrt", args, 0, loc)?.sqrt()))
}

/// Integer powers stay integers when the exponent is a non-negative int
/// and the result fits.
fn math_pow(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("pow", args, 2..=2, loc)?;
    if let (Object::Integer(base), Object::Integer(exp)) = (&args[0], &args[1]) {
        if let Some(value) = u32::try_from(*exp).ok().and_then(|e| base.checked_pow(e)) {
            return Ok(Object::Integer(value));
        }
    }
    let base = number_arg("pow", args, 0, loc)?;
    let exp = number_arg("pow", args, 1, loc)?;
    Ok(Object::Float(base.powf(exp)))
}

fn math_extreme(func: &str, args: &[Object], loc: &SourceLocation, want_max: bool) -> EvalResult {
    arity(func, args, 2..=2, loc)?;
    if let (Object::Integer(a), Object::Integer(b)) = (&args[0], &args[1]) {
        return Ok(Object::Integer(if want_max { *a.max(b) } else { *a.min(b) }));
    }
    let a = number_arg(func, args, 0, loc)?;
    let b = number_arg(func, args, 1, loc)?;
    Ok(Object::Float(if want_max { a.max(b) } else { a.min(b) }))
}

fn math_min(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    math_extreme("min", args, loc, false)
}

fn math_max(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    math_extreme("max", args, loc, true)
}

fn math_floor(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("floor", args, 1..=1, loc)?;
    match &args[0] {
        Object::Integer(i) => Ok(Object::Integer(*i)),
        _ => Ok(Object::Integer(number_arg("floor", args, 0, loc)?.floor() as i64)),
    }
}

fn math_ceil(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("ceil", args, 1..=1, loc)?;
    match &args[0] {
        Object::Integer(i) => Ok(Object::Integer(*i)),
        _ => Ok(Object::Integer(number_arg("ceil", args, 0, loc)?.ceil() as i64)),
    }
}

// ---------------------------------------------------------------------------
// strings
// ---------------------------------------------------------------------------

fn strings_trim(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("trim", args, 1..=1, loc)?;
    Ok(Object::str(string_arg("trim", args, 0, loc)?.trim()))
}

fn strings_repeat(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("repeat", args, 2..=2, loc)?;
    let s = string_arg("repeat", args, 0, loc)?;
    let times = int_arg("repeat", args, 1, loc)?;
    Ok(Object::Str(s.repeat(usize::try_from(times).unwrap_or(0))))
}

fn strings_reverse(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("reverse", args, 1..=1, loc)?;
    match &args[0] {
        Object::Str(s) => Ok(Object::Str(s.chars().rev().collect())),
        Object::Array(items) => Ok(Object::array(items.borrow().iter().rev().cloned().collect())),
        other => Err(wrong_type("reverse", 0, "string or array", other, loc)),
    }
}

fn strings_starts_with(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("starts_with", args, 2..=2, loc)?;
    let s = string_arg("starts_with", args, 0, loc)?;
    let prefix = string_arg("starts_with", args, 1, loc)?;
    Ok(Object::Boolean(s.starts_with(prefix)))
}

fn strings_ends_with(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("ends_with", args, 2..=2, loc)?;
    let s = string_arg("ends_with", args, 0, loc)?;
    let suffix = string_arg("ends_with", args, 1, loc)?;
    Ok(Object::Boolean(s.ends_with(suffix)))
}

fn strings_replace(_: &mut Interpreter, args: &[Object], loc: &SourceLocation) -> EvalResult {
    arity("replace", args, 3..=3, loc)?;
    let s = string_arg("replace", args, 0, loc)?;
    let from = string_arg("replace", args, 1, loc)?;
    let to = string_arg("replace", args, 2, loc)?;
    Ok(Object::Str(s.replace(from, to)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InterpreterConfig;
    use crate::RunError;
    use victoria_diagnostics::ErrorCode;

    fn value(src: &str) -> String {
        let mut interp =
            Interpreter::new(InterpreterConfig::quiet()).with_output(Box::new(std::io::sink()));
        match interp.run_source("modules.vic", src) {
            Ok(obj) => obj.to_string(),
            Err(err) => panic!("{src}: {err}"),
        }
    }

    #[test]
    fn std_modules_export_their_bindings() {
        let math = StdModules.load("math").unwrap();
        assert!(math.iter().any(|(name, _)| name == "PI"));
        assert!(math.iter().any(|(name, _)| name == "sqrt"));
        assert!(StdModules.load("strings").is_some());
        assert!(StdModules.load("net").is_none());
    }

    #[test]
    fn math_functions() {
        assert_eq!(value(r#"include "math"; abs(-3);"#), "3");
        assert_eq!(value(r#"include "math"; sqrt(16);"#), "4.0");
        assert_eq!(value(r#"include "math"; pow(2, 10);"#), "1024");
        assert_eq!(value(r#"include "math"; max(2, 7.5);"#), "7.5");
        assert_eq!(value(r#"include "math"; floor(2.7);"#), "2");
    }

    #[test]
    fn string_functions() {
        assert_eq!(value(r#"include ("strings"); trim("  hi ");"#), "hi");
        assert_eq!(value(r#"include "strings"; "ab".repeat(3);"#), "ababab");
        assert_eq!(value(r#"include "strings"; reverse("abc");"#), "cba");
        assert_eq!(value(r#"include "strings"; replace("a-b", "-", "+");"#), "a+b");
    }

    #[test]
    fn module_functions_are_not_global() {
        let mut interp =
            Interpreter::new(InterpreterConfig::quiet()).with_output(Box::new(std::io::sink()));
        match interp.run_source("modules.vic", "sqrt(4);") {
            Err(RunError::Runtime(err)) => {
                assert_eq!(err.diagnostic.code, ErrorCode::UndefinedVariable)
            }
            other => panic!("expected undefined variable, got {other:?}"),
        }
    }

    #[test]
    fn empty_registry_finds_nothing() {
        let mut interp = Interpreter::new(InterpreterConfig::quiet())
            .with_output(Box::new(std::io::sink()))
            .with_modules(Box::new(NoModules));
        match interp.run_source("modules.vic", r#"include "math";"#) {
            Err(RunError::Runtime(err)) => assert_eq!(err.diagnostic.code, ErrorCode::ModuleNotFound),
            other => panic!("expected module not found, got {other:?}"),
        }
    }
}
