//! Prefix, infix and postfix operators.

use victoria_ast::ast::{InfixExpression, InfixOp, PostfixExpression, PostfixOp, PrefixExpression, PrefixOp};
use victoria_ast::location::SourceLocation;
use victoria_diagnostics::catalog;

use super::{ControlFlow, EvalResult, Interpreter};
use crate::environment::EnvId;
use crate::object::Object;

impl Interpreter {
    pub(super) fn eval_prefix(&mut self, e: &PrefixExpression, env: EnvId) -> EvalResult {
        match e.operator {
            PrefixOp::Increment | PrefixOp::Decrement => {
                let delta = if e.operator == PrefixOp::Increment { 1 } else { -1 };
                let (_, updated) = self.step_place(&e.right, delta, e.operator.as_str(), env)?;
                Ok(updated)
            }
            PrefixOp::Not => {
                let value = self.eval_expression(&e.right, env)?;
                Ok(Object::Boolean(!value.is_truthy()))
            }
            PrefixOp::Minus => match self.eval_expression(&e.right, env)? {
                Object::Integer(i) => match i.checked_neg() {
                    Some(negated) => Ok(Object::Integer(negated)),
                    None => {
                        self.advise(catalog::integer_overflow(0, "-", i, e.location.clone()));
                        Ok(Object::Integer(i.wrapping_neg()))
                    }
                },
                Object::Float(f) => Ok(Object::Float(-f)),
                other => {
                    Err(catalog::unknown_operator("-", &other.type_tag(), e.location.clone()).into())
                }
            },
        }
    }

    pub(super) fn eval_postfix(&mut self, e: &PostfixExpression, env: EnvId) -> EvalResult {
        let delta = if e.operator == PostfixOp::Increment { 1 } else { -1 };
        let (previous, _) = self.step_place(&e.target, delta, e.operator.as_str(), env)?;
        Ok(previous)
    }

    pub(super) fn eval_infix_expression(&mut self, e: &InfixExpression, env: EnvId) -> EvalResult {
        // `&&` and `||` short-circuit
        match e.operator {
            InfixOp::And => {
                let left = self.eval_expression(&e.left, env)?;
                if !left.is_truthy() {
                    return Ok(Object::Boolean(false));
                }
                let right = self.eval_expression(&e.right, env)?;
                return Ok(Object::Boolean(right.is_truthy()));
            }
            InfixOp::Or => {
                let left = self.eval_expression(&e.left, env)?;
                if left.is_truthy() {
                    return Ok(Object::Boolean(true));
                }
                let right = self.eval_expression(&e.right, env)?;
                return Ok(Object::Boolean(right.is_truthy()));
            }
            _ => {}
        }
        let left = self.eval_expression(&e.left, env)?;
        let right = self.eval_expression(&e.right, env)?;
        self.binary_op(e.operator, &left, &right, &e.location)
    }

    /// Applies a non-short-circuit infix operator to two evaluated operands.
    pub(crate) fn binary_op(
        &mut self,
        op: InfixOp,
        left: &Object,
        right: &Object,
        loc: &SourceLocation,
    ) -> EvalResult {
        if matches!(op, InfixOp::Eq | InfixOp::Ne) {
            return self.equality(op, left, right, loc);
        }
        match (left, right) {
            (Object::Integer(a), Object::Integer(b)) => self.integer_op(op, *a, *b, loc),
            (Object::Float(a), Object::Float(b)) => float_op(op, *a, *b, loc),
            (Object::Integer(a), Object::Float(b)) => float_op(op, *a as f64, *b, loc),
            (Object::Float(a), Object::Integer(b)) => float_op(op, *a, *b as f64, loc),
            (Object::Str(a), Object::Str(b)) => match op {
                InfixOp::Add => Ok(Object::Str(format!("{a}{b}"))),
                _ => compare(op, a, b)
                    .ok_or_else(|| unknown(op, left, loc)),
            },
            (Object::Array(a), Object::Array(b)) if op == InfixOp::Add => {
                let mut joined = a.borrow().clone();
                joined.extend(b.borrow().iter().cloned());
                Ok(Object::array(joined))
            }
            (Object::Char(a), Object::Char(b)) | (Object::Rune(a), Object::Rune(b)) => {
                compare(op, a, b).ok_or_else(|| unknown(op, left, loc))
            }
            (Object::Byte(a), Object::Byte(b)) => {
                compare(op, a, b).ok_or_else(|| unknown(op, left, loc))
            }
            (Object::EnumValue(a), Object::EnumValue(b)) if a.enum_name == b.enum_name => {
                compare(op, &a.value, &b.value).ok_or_else(|| unknown(op, left, loc))
            }
            _ if left.object_type() == right.object_type() => Err(unknown(op, left, loc)),
            _ => Err(catalog::type_mismatch(
                &left.type_tag(),
                op.as_str(),
                &right.type_tag(),
                loc.clone(),
            )
            .into()),
        }
    }

    fn equality(&mut self, op: InfixOp, left: &Object, right: &Object, loc: &SourceLocation) -> EvalResult {
        if left.is_null() || right.is_null() {
            self.advise(catalog::comparison_with_null(op.as_str(), loc.clone()));
        }
        match left.equals(right) {
            Some(equal) => Ok(Object::Boolean(if op == InfixOp::Eq { equal } else { !equal })),
            None => Err(catalog::type_mismatch(
                &left.type_tag(),
                op.as_str(),
                &right.type_tag(),
                loc.clone(),
            )
            .into()),
        }
    }

    fn integer_op(&mut self, op: InfixOp, a: i64, b: i64, loc: &SourceLocation) -> EvalResult {
        let checked = match op {
            InfixOp::Add => a.checked_add(b),
            InfixOp::Sub => a.checked_sub(b),
            InfixOp::Mul => a.checked_mul(b),
            InfixOp::Div => {
                if b == 0 {
                    return Err(catalog::division_by_zero(loc.clone()).into());
                }
                a.checked_div(b)
            }
            InfixOp::Mod => {
                if b == 0 {
                    return Err(catalog::division_by_zero(loc.clone()).into());
                }
                if a < 0 || b < 0 {
                    self.advise(catalog::modulo_with_negative(loc.clone()));
                }
                a.checked_rem(b)
            }
            _ => {
                return compare(op, &a, &b).ok_or_else(|| {
                    catalog::unknown_operator(op.as_str(), "INTEGER", loc.clone()).into()
                })
            }
        };
        match checked {
            Some(value) => Ok(Object::Integer(value)),
            None => {
                self.advise(catalog::integer_overflow(a, op.as_str(), b, loc.clone()));
                let wrapped = match op {
                    InfixOp::Add => a.wrapping_add(b),
                    InfixOp::Sub => a.wrapping_sub(b),
                    InfixOp::Mul => a.wrapping_mul(b),
                    InfixOp::Div => a.wrapping_div(b),
                    _ => a.wrapping_rem(b),
                };
                Ok(Object::Integer(wrapped))
            }
        }
    }
}

fn float_op(op: InfixOp, a: f64, b: f64, loc: &SourceLocation) -> EvalResult {
    let value = match op {
        InfixOp::Add => a + b,
        InfixOp::Sub => a - b,
        InfixOp::Mul => a * b,
        InfixOp::Div | InfixOp::Mod if b == 0.0 => {
            return Err(catalog::division_by_zero(loc.clone()).into())
        }
        InfixOp::Div => a / b,
        InfixOp::Mod => a % b,
        _ => {
            return compare(op, &a, &b).ok_or_else(|| {
                catalog::unknown_operator(op.as_str(), "FLOAT", loc.clone()).into()
            })
        }
    };
    Ok(Object::Float(value))
}

/// Ordering comparisons; `None` for operators that are not comparisons.
fn compare<T: PartialOrd + ?Sized>(op: InfixOp, a: &T, b: &T) -> Option<Object> {
    let result = match op {
        InfixOp::Lt => a < b,
        InfixOp::Gt => a > b,
        InfixOp::Le => a <= b,
        InfixOp::Ge => a >= b,
        _ => return None,
    };
    Some(Object::Boolean(result))
}

fn unknown(op: InfixOp, operand: &Object, loc: &SourceLocation) -> ControlFlow {
    catalog::unknown_operator(op.as_str(), &operand.type_tag(), loc.clone()).into()
}

#[cfg(test)]
mod tests {
    use crate::config::InterpreterConfig;
    use crate::eval::Interpreter;
    use crate::object::Object;
    use crate::RunError;
    use victoria_diagnostics::ErrorCode;

    fn eval(src: &str) -> Result<Object, RunError> {
        Interpreter::new(InterpreterConfig::quiet())
            .with_output(Box::new(std::io::sink()))
            .run_source("ops.vic", src)
    }

    fn value(src: &str) -> String {
        match eval(src) {
            Ok(obj) => obj.to_string(),
            Err(err) => panic!("{src}: {err}"),
        }
    }

    fn code(src: &str) -> ErrorCode {
        match eval(src) {
            Err(RunError::Runtime(err)) => err.diagnostic.code,
            other => panic!("{src}: expected runtime error, got {other:?}"),
        }
    }

    fn advisories(src: &str) -> Vec<ErrorCode> {
        let mut interp =
            Interpreter::new(InterpreterConfig::quiet()).with_output(Box::new(std::io::sink()));
        let _ = interp.run_source("ops.vic", src);
        interp.advisories().iter().map(|d| d.code).collect()
    }

    #[test]
    fn integer_arithmetic() {
        assert_eq!(value("7 / 2;"), "3");
        assert_eq!(value("7 % 3;"), "1");
        assert_eq!(value("2 - 5 * 3;"), "-13");
        assert_eq!(value("-(4);"), "-4");
    }

    #[test]
    fn mixed_numbers_promote_to_float() {
        assert_eq!(value("1 + 2.5;"), "3.5");
        assert_eq!(value("3.0 * 2;"), "6.0");
        assert_eq!(value("1 < 1.5;"), "true");
    }

    #[test]
    fn concatenation() {
        assert_eq!(value(r#""ab" + "cd";"#), "abcd");
        assert_eq!(value("[1] + [2, 3];"), "[1, 2, 3]");
    }

    #[test]
    fn division_and_modulo_by_zero() {
        assert_eq!(code("1 / 0;"), ErrorCode::DivisionByZero);
        assert_eq!(code("1 % 0;"), ErrorCode::DivisionByZero);
        assert_eq!(code("1.5 / 0;"), ErrorCode::DivisionByZero);
    }

    #[test]
    fn mismatches() {
        assert_eq!(code(r#""a" + 1;"#), ErrorCode::TypeMismatch);
        assert_eq!(code(r#"1 == "1";"#), ErrorCode::TypeMismatch);
        assert_eq!(code("true + false;"), ErrorCode::UnknownOperator);
        assert_eq!(code(r#"-"a";"#), ErrorCode::UnknownOperator);
    }

    #[test]
    fn equality_and_logic() {
        assert_eq!(value("1 == 1.0;"), "true");
        assert_eq!(value(r#""a" != "b";"#), "true");
        assert_eq!(value("!0;"), "true");
        assert_eq!(value("not true;"), "false");
        assert_eq!(value("1 && 0;"), "false");
        assert_eq!(value("0 || 2;"), "true");
        // right side never evaluated
        assert_eq!(value("false && undefinedThing;"), "false");
    }

    #[test]
    fn increments() {
        assert_eq!(value("let i = 1; i++;"), "1");
        assert_eq!(value("let i = 1; i++; i;"), "2");
        assert_eq!(value("let i = 1; --i;"), "0");
        assert_eq!(value("let a = [1, 2]; a[1]++; a;"), "[1, 3]");
        assert_eq!(code("5++;"), ErrorCode::Operator);
    }

    #[test]
    fn overflow_wraps_with_a_warning() {
        assert_eq!(value("9223372036854775807 + 1;"), "-9223372036854775808");
        assert_eq!(
            advisories("9223372036854775807 + 1;"),
            vec![ErrorCode::IntegerOverflow]
        );
    }

    #[test]
    fn advisory_operators() {
        assert_eq!(advisories("-7 % 3;"), vec![ErrorCode::ModuloWithNegative]);
        let warned = advisories("let x = 1; x == 1; x != 2;");
        assert!(warned.is_empty());
    }
}
