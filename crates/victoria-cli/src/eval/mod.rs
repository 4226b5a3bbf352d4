//! Tree-walking evaluator for Victoria programs.
//!
//! Every evaluation step returns [`EvalResult`]. The `Err` side carries the
//! non-local exits (`return`, `break`, `continue` and runtime errors), so `?`
//! unwinds them until the construct that consumes each one: the call
//! boundary, the enclosing loop, a `try`, or the top level.

mod call;
mod collections;
mod control;
mod ops;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::{BufRead, Write};
use std::rc::Rc;
use std::sync::Arc;

use victoria_ast::ast::{
    BlockStatement, EnumStatement, Expression, IncludeStatement, LetStatement, MethodDefinition,
    Program, Statement, StructStatement, TypeAnnotation,
};
use victoria_ast::location::SourceLocation;
use victoria_diagnostics::{catalog, Diagnostic, ErrorCode};

use crate::analysis;
use crate::builtins;
use crate::config::InterpreterConfig;
use crate::environment::{EnvId, Environments};
use crate::modules::{ModuleRegistry, StdModules};
use crate::object::{EnumDef, Function, Object, StructDef};
use crate::typecheck::{self, check_type};
use crate::RunError;

/// Remaining host stack below which evaluation moves to a fresh segment.
/// Program recursion becomes host recursion, so the walker grows its own
/// stack rather than relying on the caller's thread size.
const STACK_RED_ZONE: usize = 256 * 1024;
const STACK_SEGMENT: usize = 4 * 1024 * 1024;

/// A runtime failure, reported through its diagnostic.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{}", .diagnostic.message)]
pub struct RuntimeError {
    pub diagnostic: Diagnostic,
}

/// Non-local exits threaded through the `Err` side of [`EvalResult`].
#[derive(Debug, Clone)]
pub enum ControlFlow {
    Return(Object),
    Break,
    Continue,
    Error(RuntimeError),
}

impl From<RuntimeError> for ControlFlow {
    fn from(err: RuntimeError) -> Self {
        ControlFlow::Error(err)
    }
}

impl From<Diagnostic> for ControlFlow {
    fn from(diagnostic: Diagnostic) -> Self {
        ControlFlow::Error(RuntimeError { diagnostic })
    }
}

pub type EvalResult = Result<Object, ControlFlow>;

/// Owns the environment arena, the output sink and the advisories raised
/// during a run.
pub struct Interpreter {
    pub(crate) envs: Environments,
    config: InterpreterConfig,
    modules: Box<dyn ModuleRegistry>,
    output: Box<dyn Write>,
    input: Box<dyn BufRead>,
    source: Option<Arc<str>>,
    advisories: Vec<Diagnostic>,
    seen_advisories: HashSet<(ErrorCode, SourceLocation)>,
    call_depth: usize,
    loop_depth: usize,
}

impl Interpreter {
    /// An interpreter writing to stdout and reading from stdin, with the
    /// standard modules available to `include`.
    pub fn new(config: InterpreterConfig) -> Self {
        Self {
            envs: Environments::new(),
            config,
            modules: Box::new(StdModules),
            output: Box::new(std::io::stdout()),
            input: Box::new(std::io::BufReader::new(std::io::stdin())),
            source: None,
            advisories: Vec::new(),
            seen_advisories: HashSet::new(),
            call_depth: 0,
            loop_depth: 0,
        }
    }

    pub fn with_output(mut self, output: Box<dyn Write>) -> Self {
        self.output = output;
        self
    }

    pub fn with_input(mut self, input: Box<dyn BufRead>) -> Self {
        self.input = input;
        self
    }

    pub fn with_modules(mut self, modules: Box<dyn ModuleRegistry>) -> Self {
        self.modules = modules;
        self
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Warnings and notes raised so far, in the order they were first seen.
    pub fn advisories(&self) -> &[Diagnostic] {
        &self.advisories
    }

    pub fn take_advisories(&mut self) -> Vec<Diagnostic> {
        self.seen_advisories.clear();
        std::mem::take(&mut self.advisories)
    }

    /// Value bound to `name` at the top level, if any.
    pub fn global(&self, name: &str) -> Option<Object> {
        self.envs.get(self.envs.root(), name)
    }

    /// Parses and evaluates `src`. Diagnostics carry the source text.
    pub fn run_source(&mut self, file: &str, src: &str) -> Result<Object, RunError> {
        self.source = Some(Arc::from(src));
        let program = victoria_parse::parse_str(file, src)?;
        Ok(self.eval_program(&program)?)
    }

    /// Evaluates a parsed program in the top-level environment.
    pub fn eval_program(&mut self, program: &Program) -> Result<Object, RuntimeError> {
        let root = self.envs.root();
        let mut result = Object::Null;
        for stmt in &program.statements {
            match self.eval_statement(stmt, root) {
                Ok(value) => result = value,
                Err(ControlFlow::Return(value)) => {
                    result = value;
                    break;
                }
                Err(ControlFlow::Break | ControlFlow::Continue) => {
                    result = Object::Null;
                    break;
                }
                Err(ControlFlow::Error(mut err)) => {
                    tracing::debug!(
                        code = %err.diagnostic.code,
                        message = %err.diagnostic.message,
                        "runtime error reached top level"
                    );
                    self.flush_output();
                    if let Some(source) = &self.source {
                        err.diagnostic = err.diagnostic.with_source(source.clone());
                    }
                    return Err(err);
                }
            }
        }
        self.flush_output();
        Ok(result)
    }

    fn flush_output(&mut self) {
        if let Err(err) = self.output.flush() {
            tracing::warn!(%err, "failed to flush program output");
        }
    }

    pub(crate) fn write_output(&mut self, text: &str) {
        if let Err(err) = self.output.write_all(text.as_bytes()) {
            tracing::warn!(%err, "failed to write program output");
        }
    }

    /// Reads one line of input without its line terminator; empty at EOF.
    pub(crate) fn read_line(&mut self) -> String {
        self.flush_output();
        let mut line = String::new();
        if let Err(err) = self.input.read_line(&mut line) {
            tracing::warn!(%err, "failed to read program input");
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        line
    }

    /// Records an advisory once per code and location.
    pub(crate) fn advise(&mut self, diagnostic: Diagnostic) {
        let Some(location) = diagnostic.location().cloned() else {
            self.advisories.push(diagnostic);
            return;
        };
        if self.seen_advisories.insert((diagnostic.code, location)) {
            let diagnostic = match &self.source {
                Some(source) => diagnostic.with_source(source.clone()),
                None => diagnostic,
            };
            self.advisories.push(diagnostic);
        }
    }

    // ======= statements =======

    pub(crate) fn eval_statement(&mut self, stmt: &Statement, env: EnvId) -> EvalResult {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || self.eval_statement_inner(stmt, env))
    }

    fn eval_statement_inner(&mut self, stmt: &Statement, env: EnvId) -> EvalResult {
        match stmt {
            Statement::Let(s) => self.eval_let(s, env, false),
            Statement::Const(s) => self.eval_let(s, env, true),
            Statement::Return(s) => {
                let value = match &s.value {
                    Some(expr) => self.eval_expression(expr, env)?,
                    None => Object::Null,
                };
                Err(ControlFlow::Return(value))
            }
            Statement::Include(s) => self.eval_include(s, env),
            Statement::Try(t) => self.eval_try(t, env),
            Statement::Struct(s) => self.eval_struct_statement(s, env),
            Statement::Enum(s) => self.eval_enum_statement(s, env),
            Statement::Method(m) => self.eval_method_definition(m, env),
            Statement::Break(_) => Err(ControlFlow::Break),
            Statement::Continue(_) => Err(ControlFlow::Continue),
            Statement::Expression(s) => self.eval_expression(&s.expression, env),
        }
    }

    /// Evaluates `block` directly in `env`; the value is that of the last
    /// statement.
    pub(crate) fn eval_block(&mut self, block: &BlockStatement, env: EnvId) -> EvalResult {
        let mut result = Object::Null;
        for stmt in &block.statements {
            result = self.eval_statement(stmt, env)?;
        }
        Ok(result)
    }

    /// Evaluates `block` in a fresh child of `outer`, released afterwards.
    pub(crate) fn eval_scoped_block(&mut self, block: &BlockStatement, outer: EnvId) -> EvalResult {
        let scope = self.envs.child(outer);
        let result = self.eval_block(block, scope);
        self.envs.release(scope);
        result
    }

    fn eval_let(&mut self, s: &LetStatement, env: EnvId, constant: bool) -> EvalResult {
        let value = self.eval_expression(&s.value, env)?;
        let name = s.name.name.as_str();
        if let Some(annotation) = &s.annotation {
            self.validate_annotation(annotation, env)?;
            self.check_binding_type(name, annotation, &value, &s.location)?;
        }
        if self.envs.is_local_const(env, name) {
            return Err(catalog::constant_reassignment(name, s.name.location.clone()).into());
        }
        if let Object::Function(func) = &value {
            self.suggest_memoization(func, &s.location);
        }
        if constant {
            self.envs.set_const(env, name, value);
        } else {
            self.envs.set(env, name, value);
        }
        Ok(Object::Null)
    }

    fn check_binding_type(
        &self,
        name: &str,
        annotation: &TypeAnnotation,
        value: &Object,
        loc: &SourceLocation,
    ) -> Result<(), ControlFlow> {
        if check_type(value, Some(annotation)) {
            return Ok(());
        }
        if let Some((position, element)) = typecheck::first_mismatched_element(value, annotation) {
            let expected = annotation
                .element
                .as_deref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "any".into());
            return Err(catalog::array_type_mismatch(
                &expected,
                &element.type_name(),
                position,
                loc.clone(),
            )
            .into());
        }
        Err(catalog::variable_type_mismatch(
            name,
            &annotation.to_string(),
            &value.type_name(),
            loc.clone(),
        )
        .into())
    }

    /// An annotation naming neither a base type nor a struct or enum in scope
    /// is rejected before any value is checked against it.
    pub(crate) fn validate_annotation(
        &self,
        annotation: &TypeAnnotation,
        env: EnvId,
    ) -> Result<(), ControlFlow> {
        for nested in [annotation.element.as_deref(), annotation.key.as_deref()]
            .into_iter()
            .flatten()
        {
            self.validate_annotation(nested, env)?;
        }
        if annotation.is_array || annotation.is_map() || typecheck::is_base_type(&annotation.name) {
            return Ok(());
        }
        match self.envs.get(env, &annotation.name) {
            Some(Object::Struct(_) | Object::Enum(_)) => Ok(()),
            _ => Err(catalog::invalid_type_annotation(
                &annotation.name,
                annotation.location.clone(),
            )
            .into()),
        }
    }

    fn suggest_memoization(&mut self, func: &Function, loc: &SourceLocation) {
        let Some(name) = &func.name else {
            return;
        };
        let calls = analysis::count_self_calls(&func.body, name);
        if calls >= 2 {
            self.advise(catalog::memoization_suggestion(name, calls, loc.clone()));
        }
    }

    fn eval_include(&mut self, s: &IncludeStatement, env: EnvId) -> EvalResult {
        for module in &s.modules {
            let Some(bindings) = self.modules.load(module) else {
                return Err(catalog::module_not_found(module, s.location.clone()).into());
            };
            tracing::debug!(module = %module, bindings = bindings.len(), "included module");
            for (name, value) in bindings {
                self.envs.set(env, &name, value);
            }
        }
        Ok(Object::Null)
    }

    fn eval_struct_statement(&mut self, s: &StructStatement, env: EnvId) -> EvalResult {
        let def = StructDef {
            name: s.name.name.clone(),
            fields: s.fields.iter().map(|f| f.name.clone()).collect(),
            methods: RefCell::new(HashMap::new()),
        };
        self.envs
            .set(env, &s.name.name, Object::Struct(Rc::new(def)));
        Ok(Object::Null)
    }

    fn eval_enum_statement(&mut self, s: &EnumStatement, env: EnvId) -> EvalResult {
        let mut next = 0i64;
        let mut variants = Vec::with_capacity(s.variants.len());
        for variant in &s.variants {
            let value = variant.value.unwrap_or(next);
            next = value.wrapping_add(1);
            variants.push((variant.name.name.clone(), value));
        }
        let def = EnumDef {
            name: s.name.name.clone(),
            variants,
        };
        self.envs.set(env, &s.name.name, Object::Enum(Rc::new(def)));
        Ok(Object::Null)
    }

    fn eval_method_definition(&mut self, m: &MethodDefinition, env: EnvId) -> EvalResult {
        let Some(Object::Struct(def)) = self.envs.get(env, &m.struct_name.name) else {
            return Err(
                catalog::struct_not_found(&m.struct_name.name, m.struct_name.location.clone())
                    .into(),
            );
        };
        let func = self.make_function(&m.function, env);
        let name = m.function.name.clone().unwrap_or_default();
        def.methods.borrow_mut().insert(name, func);
        Ok(Object::Null)
    }

    // ======= expressions =======

    pub(crate) fn eval_expression(&mut self, expr: &Expression, env: EnvId) -> EvalResult {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || self.eval_expression_inner(expr, env))
    }

    fn eval_expression_inner(&mut self, expr: &Expression, env: EnvId) -> EvalResult {
        match expr {
            Expression::Identifier(id) => self.eval_identifier(&id.name, &id.location, env),
            Expression::Integer(lit) => Ok(Object::Integer(lit.value)),
            Expression::Float(lit) => Ok(Object::Float(lit.value)),
            Expression::Str(lit) => Ok(Object::Str(lit.value.clone())),
            Expression::Boolean(lit) => Ok(Object::Boolean(lit.value)),
            Expression::Prefix(e) => self.eval_prefix(e, env),
            Expression::Infix(e) => self.eval_infix_expression(e, env),
            Expression::Postfix(e) => self.eval_postfix(e, env),
            Expression::Assign(e) => self.eval_assign(e, env),
            Expression::If(e) => self.eval_if(e, env),
            Expression::Function(f) => Ok(Object::Function(self.make_function(f, env))),
            Expression::Arrow(a) => Ok(self.make_arrow(a, env)),
            Expression::Call(c) => self.eval_call(c, env),
            Expression::Array(a) => self.eval_array_literal(a, env),
            Expression::Index(e) => self.eval_index_expression(e, env),
            Expression::Slice(e) => self.eval_slice(e, env),
            Expression::Spread(e) => Err(catalog::operator_error(
                "...",
                "spread is only allowed inside array literals and call arguments",
                e.location.clone(),
            )
            .into()),
            Expression::Hash(h) => self.eval_hash_literal(h, env),
            Expression::Member(m) => self.eval_member(m, env),
            Expression::StructInstantiation(s) => self.eval_struct_instantiation(s, env),
            Expression::While(w) => self.eval_while(w, env),
            Expression::For(f) => self.eval_for(f, env),
            Expression::Switch(s) => self.eval_switch(s, env),
            Expression::Ternary(t) => {
                if self.eval_expression(&t.condition, env)?.is_truthy() {
                    self.eval_expression(&t.consequence, env)
                } else {
                    self.eval_expression(&t.alternative, env)
                }
            }
            Expression::Range(r) => self.eval_range(r, env),
            Expression::Try(t) => self.eval_try(t, env),
        }
    }

    fn eval_identifier(&self, name: &str, loc: &SourceLocation, env: EnvId) -> EvalResult {
        if let Some(value) = self.envs.get(env, name) {
            return Ok(value);
        }
        if let Some(builtin) = builtins::lookup(name) {
            return Ok(Object::Builtin(builtin));
        }
        Err(catalog::undefined_variable(name, loc.clone()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CapturedOutput;
    use victoria_diagnostics::ErrorCode;

    fn run(src: &str) -> (Result<Object, RunError>, String, Interpreter) {
        let out = CapturedOutput::default();
        let mut interp = Interpreter::new(InterpreterConfig::quiet())
            .with_output(Box::new(out.clone()));
        let result = interp.run_source("test.vic", src);
        (result, out.contents(), interp)
    }

    fn error_code(src: &str) -> ErrorCode {
        match run(src).0 {
            Err(RunError::Runtime(err)) => err.diagnostic.code,
            other => panic!("expected runtime error, got {other:?}"),
        }
    }

    #[test]
    fn program_value_is_last_statement() {
        let (result, _, _) = run("1; 2; 3 + 4;");
        assert!(matches!(result, Ok(Object::Integer(7))));
    }

    #[test]
    fn top_level_return_stops_the_program() {
        let (result, out, _) = run("print(1); return 5; print(2);");
        assert!(matches!(result, Ok(Object::Integer(5))));
        assert_eq!(out, "1\n");
    }

    #[test]
    fn let_binds_and_const_protects() {
        let (_, _, interp) = run("let x = 3; const Y = 4;");
        assert!(matches!(interp.global("x"), Some(Object::Integer(3))));
        assert_eq!(error_code("const Y = 4; Y = 5;"), ErrorCode::ConstantReassignment);
        assert_eq!(error_code("const Y = 4; let Y = 5;"), ErrorCode::ConstantReassignment);
    }

    #[test]
    fn typed_let_is_checked() {
        assert_eq!(error_code(r#"let x: int = "a";"#), ErrorCode::VariableTypeMismatch);
        assert_eq!(error_code(r#"let xs: []int = [1, "a"];"#), ErrorCode::ArrayTypeMismatch);
        assert_eq!(error_code("let p: Pointy = 1;"), ErrorCode::InvalidTypeAnnotation);
        let (result, _, _) = run("struct P { x } let p: P = P { x: 1 }; p.x;");
        assert!(matches!(result, Ok(Object::Integer(1))));
    }

    #[test]
    fn runtime_errors_carry_the_source() {
        match run("let a = 1;\nprint(a + foobar);").0 {
            Err(RunError::Runtime(err)) => {
                assert!(err.diagnostic.source.is_some());
                let loc = err.diagnostic.location().unwrap();
                assert_eq!((loc.line, loc.column), (2, 11));
            }
            other => panic!("expected runtime error, got {other:?}"),
        }
    }

    #[test]
    fn enums_number_their_variants() {
        let (result, _, _) = run("enum Color { Red, Green = 5, Blue } Color.Blue.value;");
        assert!(matches!(result, Ok(Object::Integer(6))));
        assert_eq!(error_code("enum Color { Red } Color.Purple;"), ErrorCode::EnumValue);
    }

    #[test]
    fn missing_module_is_reported() {
        assert_eq!(error_code(r#"include "nowhere";"#), ErrorCode::ModuleNotFound);
        let (result, _, _) = run(r#"include "math"; abs(-3);"#);
        assert!(matches!(result, Ok(Object::Integer(3))));
    }

    #[test]
    fn method_on_unknown_struct_is_reported() {
        assert_eq!(error_code("define Nope.m() { 1 }"), ErrorCode::StructNotFound);
    }

    #[test]
    fn memoization_note_for_tree_recursion() {
        let (_, _, interp) = run(
            "define fib(n) { if (n < 2) { return n; } return fib(n - 1) + fib(n - 2); }",
        );
        let codes: Vec<_> = interp.advisories().iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![ErrorCode::MemoizationSuggestion]);
    }
}
