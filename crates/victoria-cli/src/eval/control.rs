//! Conditionals, loops, `switch`, `try` and ranges.

use victoria_ast::ast::{
    BlockStatement, Expression, ForExpression, ForKind, IfExpression, RangeExpression, Statement,
    SwitchExpression, TryExpression, WhileExpression,
};
use victoria_ast::location::SourceLocation;
use victoria_diagnostics::catalog;

use super::{ControlFlow, EvalResult, Interpreter};
use crate::analysis;
use crate::environment::EnvId;
use crate::object::Object;

/// Loop nesting at which the time-complexity warning fires.
const NESTED_LOOP_WARNING_DEPTH: usize = 3;

/// What one pass through a loop body asks the loop to do next.
enum Step {
    Next,
    Stop,
}

/// The values a `for ... in` loop walks, materialized up front so the body
/// may mutate the source collection.
enum ForSource {
    /// `keyed` is set for hashes, whose item loops bind the key.
    Items {
        pairs: Vec<(Object, Object)>,
        keyed: bool,
    },
    Range { start: i64, end: i64 },
}

impl ForSource {
    fn from_object(value: &Object, loc: &SourceLocation) -> Result<Self, ControlFlow> {
        let pairs = match value {
            Object::Array(items) => items
                .borrow()
                .iter()
                .enumerate()
                .map(|(i, item)| (Object::Integer(i as i64), item.clone()))
                .collect(),
            Object::Str(s) => s
                .chars()
                .enumerate()
                .map(|(i, c)| (Object::Integer(i as i64), Object::Char(c)))
                .collect(),
            Object::Hash(pairs) => {
                let mut entries: Vec<(Object, Object)> = pairs
                    .borrow()
                    .values()
                    .map(|pair| (pair.key.clone(), pair.value.clone()))
                    .collect();
                entries.sort_by_key(|(key, _)| key.repr());
                return Ok(ForSource::Items {
                    pairs: entries,
                    keyed: true,
                });
            }
            Object::Range(start, end) => {
                return Ok(ForSource::Range {
                    start: *start,
                    end: *end,
                })
            }
            other => return Err(catalog::not_iterable(&other.type_tag(), loc.clone()).into()),
        };
        Ok(ForSource::Items {
            pairs,
            keyed: false,
        })
    }

    fn keyed(&self) -> bool {
        matches!(self, ForSource::Items { keyed: true, .. })
    }

    /// Yields `(index or key, value)` pairs. Ranges count down when
    /// `start > end`; the end is always exclusive.
    fn into_pairs(self) -> Box<dyn Iterator<Item = (Object, Object)>> {
        match self {
            ForSource::Items { pairs, .. } => Box::new(pairs.into_iter()),
            ForSource::Range { start, end } => {
                let values: Box<dyn Iterator<Item = i64>> = if start <= end {
                    Box::new(start..end)
                } else {
                    Box::new(((end + 1)..=start).rev())
                };
                Box::new(
                    values
                        .enumerate()
                        .map(|(i, v)| (Object::Integer(i as i64), Object::Integer(v))),
                )
            }
        }
    }
}

impl Interpreter {
    pub(super) fn eval_if(&mut self, e: &IfExpression, env: EnvId) -> EvalResult {
        if self.eval_expression(&e.condition, env)?.is_truthy() {
            self.eval_scoped_block(&e.consequence, env)
        } else if let Some(alternative) = &e.alternative {
            self.eval_scoped_block(alternative, env)
        } else {
            Ok(Object::Null)
        }
    }

    fn enter_loop(&mut self, loc: &SourceLocation) {
        self.loop_depth += 1;
        if self.loop_depth >= NESTED_LOOP_WARNING_DEPTH {
            self.advise(catalog::time_complexity(self.loop_depth, loc.clone()));
        }
    }

    fn leave_loop(&mut self) {
        self.loop_depth = self.loop_depth.saturating_sub(1);
    }

    /// Runs one iteration of `body` in `scope`, which is released
    /// afterwards, and consumes `break`/`continue`.
    fn run_iteration(&mut self, body: &BlockStatement, scope: EnvId) -> Result<Step, ControlFlow> {
        let result = self.eval_block(body, scope);
        self.envs.release(scope);
        match result {
            Ok(_) | Err(ControlFlow::Continue) => Ok(Step::Next),
            Err(ControlFlow::Break) => Ok(Step::Stop),
            Err(other) => Err(other),
        }
    }

    pub(super) fn eval_while(&mut self, w: &WhileExpression, env: EnvId) -> EvalResult {
        if matches!(w.condition.as_ref(), Expression::Boolean(b) if b.value)
            && !analysis::can_exit_loop(&w.body)
        {
            self.advise(catalog::infinite_loop(w.location.clone()));
        }
        self.enter_loop(&w.location);
        let result = self.while_loop(w, env);
        self.leave_loop();
        result
    }

    fn while_loop(&mut self, w: &WhileExpression, env: EnvId) -> EvalResult {
        while self.eval_expression(&w.condition, env)?.is_truthy() {
            let scope = self.envs.child(env);
            if let Step::Stop = self.run_iteration(&w.body, scope)? {
                break;
            }
        }
        Ok(Object::Null)
    }

    pub(super) fn eval_for(&mut self, f: &ForExpression, env: EnvId) -> EvalResult {
        self.enter_loop(&f.location);
        let result = match &f.kind {
            ForKind::Item { item, iterable } => {
                self.for_in(iterable, env, &f.body, |interp, scope, key, value, keyed| {
                    interp
                        .envs
                        .set(scope, &item.name, if keyed { key } else { value });
                })
            }
            ForKind::IndexValue {
                index,
                value,
                iterable,
            } => self.for_in(iterable, env, &f.body, |interp, scope, key, item, _| {
                interp.envs.set(scope, &index.name, key);
                interp.envs.set(scope, &value.name, item);
            }),
            ForKind::CStyle {
                init,
                condition,
                update,
            } => {
                let scope = self.envs.child(env);
                let result = self.c_style_loop(
                    init.as_deref(),
                    condition.as_deref(),
                    update.as_deref(),
                    &f.body,
                    scope,
                );
                self.envs.release(scope);
                result
            }
        };
        self.leave_loop();
        result
    }

    fn for_in<B>(
        &mut self,
        iterable: &Expression,
        env: EnvId,
        body: &BlockStatement,
        bind: B,
    ) -> EvalResult
    where
        B: Fn(&mut Interpreter, EnvId, Object, Object, bool),
    {
        let source = self.eval_expression(iterable, env)?;
        let source = ForSource::from_object(&source, iterable.location())?;
        let keyed = source.keyed();
        for (key, value) in source.into_pairs() {
            let scope = self.envs.child(env);
            bind(self, scope, key, value, keyed);
            if let Step::Stop = self.run_iteration(body, scope)? {
                break;
            }
        }
        Ok(Object::Null)
    }

    fn c_style_loop(
        &mut self,
        init: Option<&Statement>,
        condition: Option<&Expression>,
        update: Option<&Expression>,
        body: &BlockStatement,
        scope: EnvId,
    ) -> EvalResult {
        if let Some(init) = init {
            self.eval_statement(init, scope)?;
        }
        loop {
            if let Some(condition) = condition {
                if !self.eval_expression(condition, scope)?.is_truthy() {
                    break;
                }
            }
            let iteration = self.envs.child(scope);
            if let Step::Stop = self.run_iteration(body, iteration)? {
                break;
            }
            if let Some(update) = update {
                self.eval_expression(update, scope)?;
            }
        }
        Ok(Object::Null)
    }

    pub(super) fn eval_switch(&mut self, s: &SwitchExpression, env: EnvId) -> EvalResult {
        let subject = self.eval_expression(&s.subject, env)?;
        for case in &s.cases {
            for value_expr in &case.values {
                let value = self.eval_expression(value_expr, env)?;
                if subject.equals(&value) == Some(true) {
                    return self.eval_scoped_block(&case.body, env);
                }
            }
        }
        match &s.default {
            Some(default) => self.eval_scoped_block(default, env),
            None => Ok(Object::Null),
        }
    }

    pub(super) fn eval_try(&mut self, t: &TryExpression, env: EnvId) -> EvalResult {
        let err = match self.eval_scoped_block(&t.body, env) {
            Err(ControlFlow::Error(err)) => err,
            other => return other,
        };
        tracing::debug!(code = %err.diagnostic.code, "error caught by try");
        let Some(catch_body) = &t.catch_body else {
            return Ok(Object::Null);
        };
        let scope = self.envs.child(env);
        if let Some(param) = &t.catch_param {
            self.envs
                .set(scope, &param.name, Object::Str(err.diagnostic.message));
        }
        let result = self.eval_block(catch_body, scope);
        self.envs.release(scope);
        result
    }

    pub(super) fn eval_range(&mut self, r: &RangeExpression, env: EnvId) -> EvalResult {
        let start = self.eval_expression(&r.start, env)?;
        let end = self.eval_expression(&r.end, env)?;
        match (&start, &end) {
            (Object::Integer(a), Object::Integer(b)) => Ok(Object::Range(*a, *b)),
            _ => {
                let detail = format!(
                    "bounds must be integers, got {} and {}",
                    start.type_tag(),
                    end.type_tag()
                );
                Err(catalog::range_error(&detail, r.location.clone()).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::InterpreterConfig;
    use crate::eval::Interpreter;
    use crate::{CapturedOutput, RunError};
    use victoria_diagnostics::ErrorCode;

    fn run(src: &str) -> (Result<crate::object::Object, RunError>, String, Vec<ErrorCode>) {
        let out = CapturedOutput::default();
        let mut interp =
            Interpreter::new(InterpreterConfig::quiet()).with_output(Box::new(out.clone()));
        let result = interp.run_source("control.vic", src);
        let codes = interp.advisories().iter().map(|d| d.code).collect();
        (result, out.contents(), codes)
    }

    fn output(src: &str) -> String {
        let (result, out, _) = run(src);
        if let Err(err) = result {
            panic!("{src}: {err}");
        }
        out
    }

    fn code(src: &str) -> ErrorCode {
        match run(src).0 {
            Err(RunError::Runtime(err)) => err.diagnostic.code,
            other => panic!("{src}: expected runtime error, got {other:?}"),
        }
    }

    #[test]
    fn loop_lambdas_do_not_retain_iteration_frames() {
        let src = r#"
let total = 0;
for (i in 0..2000) {
    let doubled = map([1, 2], x => x * 2 + i);
    total += doubled[0];
}
print(total);
"#;
        let out = CapturedOutput::default();
        let mut interp =
            Interpreter::new(InterpreterConfig::quiet()).with_output(Box::new(out.clone()));
        assert!(interp.run_source("frames.vic", src).is_ok());
        assert_eq!(out.contents(), "2003000\n");
        assert!(interp.envs.live_frames() < 200, "{} frames live", interp.envs.live_frames());
    }

    #[test]
    fn kept_closures_still_see_their_iteration() {
        let src = r#"
let fns = [];
for (i in 0..300) {
    let scratch = map([1], x => x);
    push(fns, () => i);
}
print(fns[0](), fns[150](), fns[299]());
"#;
        assert_eq!(output(src), "0 150 299\n");
    }

    #[test]
    fn if_else_branches() {
        assert_eq!(output("if (0) { print(1); } else { print(2); }"), "2\n");
        assert_eq!(output(r#"if ("x") { print("yes"); }"#), "yes\n");
    }

    #[test]
    fn while_with_break_and_continue() {
        let src = "let i = 0; while (i < 10) { i++; if (i % 2 == 0) { continue; } if (i > 6) { break; } print(i); }";
        assert_eq!(output(src), "1\n3\n5\n");
    }

    #[test]
    fn for_in_sources() {
        assert_eq!(output("for (x in [1, 2]) { print(x); }"), "1\n2\n");
        assert_eq!(output(r#"for (c in "ab") { print(c); }"#), "a\nb\n");
        assert_eq!(output(r#"for (k in {"b": 2, "a": 1}) { print(k); }"#), "a\nb\n");
        assert_eq!(output(r#"for (k, v in {"a": 1}) { print(k, v); }"#), "a 1\n");
        assert_eq!(output("for (i, x in [7, 8]) { print(i, x); }"), "0 7\n1 8\n");
        assert_eq!(code("for (x in 5) { }"), ErrorCode::NotIterable);
    }

    #[test]
    fn ranges_count_both_ways() {
        assert_eq!(output("for (i in 0..3) { print(i); }"), "0\n1\n2\n");
        assert_eq!(output("for (i in 3..0) { print(i); }"), "3\n2\n1\n");
        assert_eq!(output("for (i in 2..2) { print(i); }"), "");
        assert_eq!(code(r#"let r = 1.."a";"#), ErrorCode::Range);
    }

    #[test]
    fn c_style_loop() {
        assert_eq!(output("for (let i = 0; i < 3; i++) { print(i); }"), "0\n1\n2\n");
        // the loop variable does not leak
        assert_eq!(code("for (let i = 0; i < 1; i++) { } i;"), ErrorCode::UndefinedVariable);
    }

    #[test]
    fn break_only_leaves_the_innermost_loop() {
        let src = "for (i in 0..2) { for (j in 0..5) { if (j == 1) { break; } print(i, j); } }";
        assert_eq!(output(src), "0 0\n1 0\n");
    }

    #[test]
    fn switch_picks_first_match() {
        let src = r#"let x = 2; switch (x) { case 1 { print("one"); } case 2, 3 { print("two"); } case 2 { print("again"); } default { print("other"); } }"#;
        assert_eq!(output(src), "two\n");
        assert_eq!(
            output(r#"switch (9) { case 1 { print("one"); } default { print("other"); } }"#),
            "other\n"
        );
    }

    #[test]
    fn try_catch_binds_message() {
        assert_eq!(
            output("let r = try { 10 / 0 } catch(e) { e }; print(r);"),
            "division by zero\n"
        );
        assert_eq!(output("let r = try { 5 } catch(e) { 0 }; print(r);"), "5\n");
        assert_eq!(output("let r = try { 1 / 0 }; print(r);"), "null\n");
    }

    #[test]
    fn loop_advisories() {
        let (_, _, codes) = run("let n = 0; while (true) { n++; if (n > 3) { return n; } }");
        assert!(!codes.contains(&ErrorCode::InfiniteLoop));

        let (_, _, codes) = run(
            "for (a in 0..1) { for (b in 0..1) { for (c in 0..1) { } } }",
        );
        assert_eq!(codes, vec![ErrorCode::TimeComplexity]);
    }
}
