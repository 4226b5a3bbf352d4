//! Function values, calls and method dispatch.

use std::rc::Rc;

use victoria_ast::ast::{ArrowFunction as ArrowLiteral, CallExpression, Expression, FunctionLiteral};
use victoria_ast::location::SourceLocation;
use victoria_diagnostics::catalog;

use super::{ControlFlow, EvalResult, Interpreter};
use crate::builtins;
use crate::environment::EnvId;
use crate::object::{ArrowFunction, Function, Object};
use crate::typecheck::check_type;

/// How a user function's body finished.
enum Completion {
    /// Value of the last statement.
    Implicit(Object),
    /// Value of a `return` statement.
    Explicit(Object),
}

fn arity_text(count: usize) -> String {
    if count == 1 {
        "1 argument".to_string()
    } else {
        format!("{count} arguments")
    }
}

impl Interpreter {
    /// A closure over `env`. The frame chain is pinned so the closure can
    /// outlive the block that created it; the hold it keeps releases the
    /// chain to the next sweep once the closure is dropped.
    pub(super) fn make_function(&mut self, f: &FunctionLiteral, env: EnvId) -> Rc<Function> {
        let hold = self.envs.pin(env);
        Rc::new(Function {
            name: f.name.clone(),
            parameters: f.parameters.clone(),
            typed_parameters: f.typed_parameters.clone(),
            return_types: f.return_types.clone(),
            body: f.body.clone(),
            env,
            _hold: hold,
        })
    }

    pub(super) fn make_arrow(&mut self, a: &ArrowLiteral, env: EnvId) -> Object {
        let hold = self.envs.pin(env);
        Object::Arrow(Rc::new(ArrowFunction {
            parameters: a.parameters.clone(),
            body: a.body.clone(),
            env,
            _hold: hold,
        }))
    }

    pub(super) fn eval_call(&mut self, call: &CallExpression, env: EnvId) -> EvalResult {
        if let Expression::Member(member) = call.function.as_ref() {
            let receiver = self.eval_expression(&member.object, env)?;
            let args = self.eval_arguments(&call.arguments, env)?;
            return self.call_method(receiver, &member.property.name, args, env, &call.location);
        }
        let callee = self.eval_expression(&call.function, env)?;
        let args = self.eval_arguments(&call.arguments, env)?;
        self.apply_function(&callee, args, &call.location)
    }

    /// Evaluates call arguments left to right, expanding `...array`.
    fn eval_arguments(&mut self, arguments: &[Expression], env: EnvId) -> Result<Vec<Object>, ControlFlow> {
        let mut values = Vec::with_capacity(arguments.len());
        for arg in arguments {
            match arg {
                Expression::Spread(spread) => {
                    let value = self.eval_expression(&spread.value, env)?;
                    self.spread_into(&mut values, value, &spread.location)?;
                }
                _ => values.push(self.eval_expression(arg, env)?),
            }
        }
        Ok(values)
    }

    /// `receiver.name(args)`: a struct method, a callable field, or any
    /// function in scope taking `receiver` as its first argument.
    fn call_method(
        &mut self,
        receiver: Object,
        name: &str,
        args: Vec<Object>,
        env: EnvId,
        loc: &SourceLocation,
    ) -> EvalResult {
        let free_function = self
            .envs
            .get(env, name)
            .filter(Object::is_callable)
            .or_else(|| builtins::lookup(name).map(Object::Builtin));
        match &receiver {
            Object::Instance(inst) => {
                let (method, field) = {
                    let inst = inst.borrow();
                    let method = inst.def.methods.borrow().get(name).cloned();
                    (method, inst.fields.get(name).cloned())
                };
                if let Some(method) = method {
                    return self.call_user(method, args, Some(receiver.clone()), loc);
                }
                if let Some(field) = field.filter(Object::is_callable) {
                    return self.apply_function(&field, args, loc);
                }
                if free_function.is_none() {
                    let struct_name = inst.borrow().def.name.clone();
                    return Err(catalog::property_not_found(name, &struct_name, loc.clone()).into());
                }
            }
            Object::Struct(def) => {
                let method = def.methods.borrow().get(name).cloned();
                if let Some(method) = method {
                    return self.call_user(method, args, None, loc);
                }
            }
            Object::Hash(pairs) => {
                let entry = Object::str(name).hash_key().and_then(|key| {
                    let value = pairs.borrow().get(&key).map(|pair| pair.value.clone());
                    value
                });
                if let Some(callable) = entry.filter(Object::is_callable) {
                    return self.apply_function(&callable, args, loc);
                }
            }
            _ => {}
        }
        match free_function {
            Some(func) => {
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(receiver);
                full.extend(args);
                self.apply_function(&func, full, loc)
            }
            None => Err(catalog::member_access_error(&receiver.type_tag(), name, loc.clone()).into()),
        }
    }

    /// Calls any callable value with already-evaluated arguments.
    pub(crate) fn apply_function(
        &mut self,
        callee: &Object,
        args: Vec<Object>,
        loc: &SourceLocation,
    ) -> EvalResult {
        match callee {
            Object::Function(func) => self.call_user(func.clone(), args, None, loc),
            Object::Arrow(arrow) => self.call_arrow(arrow.clone(), args, loc),
            Object::Builtin(builtin) => (builtin.func)(self, &args, loc),
            other => Err(catalog::not_a_function(&other.type_tag(), loc.clone()).into()),
        }
    }

    fn enter_call(&mut self, name: &str, loc: &SourceLocation) -> Result<(), ControlFlow> {
        let limit = self.config.max_call_depth;
        if self.call_depth >= limit {
            tracing::warn!(depth = self.call_depth, function = name, "call depth limit reached");
            return Err(catalog::recursion_depth(limit, name, loc.clone()).into());
        }
        self.call_depth += 1;
        tracing::trace!(function = name, depth = self.call_depth, "call");
        Ok(())
    }

    fn call_user(
        &mut self,
        func: Rc<Function>,
        args: Vec<Object>,
        receiver: Option<Object>,
        loc: &SourceLocation,
    ) -> EvalResult {
        let name = func.display_name();
        if args.len() != func.parameters.len() {
            return Err(catalog::invalid_argument(
                name,
                &arity_text(func.parameters.len()),
                &args.len().to_string(),
                loc.clone(),
            )
            .into());
        }
        let frame = self.envs.child(func.env);
        let bound = self.bind_parameters(&func, args, receiver, frame, loc);
        if let Err(err) = bound {
            self.envs.release(frame);
            return Err(err);
        }
        if let Err(err) = self.enter_call(name, loc) {
            self.envs.release(frame);
            return Err(err);
        }
        let result = self.eval_block(&func.body, frame);
        self.call_depth -= 1;
        self.envs.release(frame);
        let completion = match result {
            Ok(value) => Completion::Implicit(value),
            Err(ControlFlow::Return(value)) => Completion::Explicit(value),
            Err(ControlFlow::Break | ControlFlow::Continue) => Completion::Implicit(Object::Null),
            Err(err) => return Err(err),
        };
        self.check_return(&func, completion, loc)
    }

    fn bind_parameters(
        &mut self,
        func: &Function,
        args: Vec<Object>,
        receiver: Option<Object>,
        frame: EnvId,
        loc: &SourceLocation,
    ) -> Result<(), ControlFlow> {
        if let Some(receiver) = receiver {
            self.envs.set(frame, "self", receiver);
        }
        for (index, (param, arg)) in func.parameters.iter().zip(args).enumerate() {
            if let Some(typed) = func.typed_parameters.as_ref().and_then(|t| t.get(index)) {
                self.validate_annotation(&typed.annotation, frame)?;
                if !check_type(&arg, Some(&typed.annotation)) {
                    return Err(catalog::parameter_type_mismatch(
                        func.display_name(),
                        &param.name,
                        &typed.annotation.to_string(),
                        &arg.type_name(),
                        loc.clone(),
                    )
                    .into());
                }
            }
            self.envs.set(frame, &param.name, arg);
        }
        Ok(())
    }

    /// Enforces declared return types. A `void` function discards the value
    /// of its last statement but may not `return` a value.
    fn check_return(&self, func: &Function, completion: Completion, loc: &SourceLocation) -> EvalResult {
        let name = func.display_name();
        let (value, explicit) = match completion {
            Completion::Implicit(value) => (value, false),
            Completion::Explicit(value) => (value, true),
        };
        match func.return_types.as_slice() {
            [] => Ok(value),
            [single] => {
                self.validate_annotation(single, func.env)?;
                if single.name == "void" && !single.is_array && !single.is_map() {
                    if explicit && !value.is_null() {
                        return Err(catalog::void_return(name, &value.type_name(), loc.clone()).into());
                    }
                    return Ok(Object::Null);
                }
                if single.is_any() || check_type(&value, Some(single)) {
                    return Ok(value);
                }
                if value.is_null() {
                    return Err(catalog::missing_return(name, &single.to_string(), loc.clone()).into());
                }
                Err(catalog::return_type_mismatch(
                    name,
                    &single.to_string(),
                    &value.type_name(),
                    loc.clone(),
                )
                .into())
            }
            several => {
                let expected: Vec<String> = several.iter().map(ToString::to_string).collect();
                let expected = format!("({})", expected.join(", "));
                let Object::Array(items) = &value else {
                    let got = value.type_name();
                    return Err(catalog::return_type_mismatch(name, &expected, &got, loc.clone()).into());
                };
                let matches = {
                    let items = items.borrow();
                    items.len() == several.len()
                        && items
                            .iter()
                            .zip(several)
                            .all(|(item, ann)| check_type(item, Some(ann)))
                };
                if matches {
                    return Ok(value);
                }
                let got: Vec<String> = items.borrow().iter().map(Object::type_name).collect();
                let got = format!("({})", got.join(", "));
                Err(catalog::return_type_mismatch(name, &expected, &got, loc.clone()).into())
            }
        }
    }

    fn call_arrow(&mut self, arrow: Rc<ArrowFunction>, args: Vec<Object>, loc: &SourceLocation) -> EvalResult {
        if args.len() != arrow.parameters.len() {
            return Err(catalog::invalid_argument(
                "arrow function",
                &arity_text(arrow.parameters.len()),
                &args.len().to_string(),
                loc.clone(),
            )
            .into());
        }
        self.enter_call("arrow function", loc)?;
        let frame = self.envs.child(arrow.env);
        for (param, arg) in arrow.parameters.iter().zip(args) {
            self.envs.set(frame, &param.name, arg);
        }
        let result = self.eval_expression(&arrow.body, frame);
        self.call_depth -= 1;
        self.envs.release(frame);
        match result {
            Ok(value) | Err(ControlFlow::Return(value)) => Ok(value),
            Err(ControlFlow::Break | ControlFlow::Continue) => Ok(Object::Null),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::InterpreterConfig;
    use crate::eval::Interpreter;
    use crate::{CapturedOutput, RunError};
    use victoria_diagnostics::ErrorCode;

    fn output(src: &str) -> String {
        let out = CapturedOutput::default();
        let mut interp = Interpreter::new(InterpreterConfig::quiet()).with_output(Box::new(out.clone()));
        if let Err(err) = interp.run_source("call.vic", src) {
            panic!("{src}: {err}");
        }
        out.contents()
    }

    fn code(src: &str) -> ErrorCode {
        let mut interp =
            Interpreter::new(InterpreterConfig::quiet()).with_output(Box::new(std::io::sink()));
        match interp.run_source("call.vic", src) {
            Err(RunError::Runtime(err)) => err.diagnostic.code,
            other => panic!("{src}: expected runtime error, got {other:?}"),
        }
    }

    #[test]
    fn implicit_and_explicit_returns() {
        assert_eq!(output("define f(x) { x * 2 } print(f(4));"), "8\n");
        assert_eq!(output("define f(x) { return x; print(99); } print(f(1));"), "1\n");
    }

    #[test]
    fn arity_is_checked() {
        assert_eq!(code("define f(a, b) { a } f(1);"), ErrorCode::InvalidArgument);
        assert_eq!(code("let g = (a) => a; g(1, 2);"), ErrorCode::InvalidArgument);
    }

    #[test]
    fn calling_a_non_function() {
        assert_eq!(code("let x = 5; x(1);"), ErrorCode::NotAFunction);
    }

    #[test]
    fn return_types() {
        assert_eq!(output("define f() -> int { return 1; } print(f());"), "1\n");
        assert_eq!(code(r#"define f() -> int { return "a"; } f();"#), ErrorCode::ReturnTypeMismatch);
        assert_eq!(code("define f() -> int { let x = 1; } f();"), ErrorCode::MissingReturn);
        assert_eq!(code("define f() -> void { return 1; } f();"), ErrorCode::VoidReturn);
        assert_eq!(output("define f() -> void { let x = 1; x = 2; } print(f());"), "null\n");
        assert_eq!(
            output(r#"define f() -> (int, string) { return [1, "a"]; } print(f());"#),
            "[1, \"a\"]\n"
        );
        assert_eq!(
            code(r#"define f() -> (int, string) { return [1, 2]; } f();"#),
            ErrorCode::ReturnTypeMismatch
        );
    }

    #[test]
    fn methods_bind_self() {
        let src = "struct Counter { n }
            define Counter.bump(by) { self.n += by; return self.n; }
            let c = Counter { n: 1 };
            c.bump(2);
            print(c.bump(3));";
        assert_eq!(output(src), "6\n");
    }

    #[test]
    fn builtins_are_callable_as_methods() {
        assert_eq!(output("let a = [1, 2]; a.push(3); print(a.len());"), "3\n");
        assert_eq!(output(r#"print("abc".upper());"#), "ABC\n");
        assert_eq!(code("let a = [1]; a.nothing();"), ErrorCode::MemberAccess);
        assert_eq!(code("struct P { x } let p = P { x: 1 }; p.nothing();"), ErrorCode::PropertyNotFound);
    }

    #[test]
    fn spread_arguments() {
        assert_eq!(output("define add(a, b, c) { a + b + c } let xs = [1, 2, 3]; print(add(...xs));"), "6\n");
    }

    #[test]
    fn recursion_depth_is_bounded() {
        let mut config = InterpreterConfig::quiet();
        config.max_call_depth = 50;
        let mut interp = Interpreter::new(config).with_output(Box::new(std::io::sink()));
        match interp.run_source("deep.vic", "define down(n) { return down(n + 1); } down(0);") {
            Err(RunError::Runtime(err)) => assert_eq!(err.diagnostic.code, ErrorCode::RecursionDepth),
            other => panic!("expected recursion error, got {other:?}"),
        }
        // the interpreter is usable again afterwards
        assert!(matches!(
            interp.run_source("ok.vic", "define f(n) { n } f(3);"),
            Ok(crate::object::Object::Integer(3))
        ));
    }

    #[test]
    fn default_depth_limit_fires_on_the_callers_stack() {
        let mut interp = Interpreter::new(InterpreterConfig::quiet()).with_output(Box::new(std::io::sink()));
        match interp.run_source("deep.vic", "define down(n) { return down(n + 1); } down(0);") {
            Err(RunError::Runtime(err)) => {
                assert_eq!(err.diagnostic.code, ErrorCode::RecursionDepth);
                assert!(err.diagnostic.message.contains("1000"), "{}", err.diagnostic.message);
            }
            other => panic!("expected recursion error, got {other:?}"),
        }
    }

    #[test]
    fn recursion_just_under_the_default_limit_completes() {
        let src = "define count(n) { if (n == 0) { return 0; } 1 + count(n - 1) } count(990);";
        let mut interp = Interpreter::new(InterpreterConfig::quiet()).with_output(Box::new(std::io::sink()));
        assert!(matches!(
            interp.run_source("count.vic", src),
            Ok(crate::object::Object::Integer(990))
        ));
    }
}
