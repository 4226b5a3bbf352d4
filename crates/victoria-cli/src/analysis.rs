//! Syntactic scans behind the advisory diagnostics.

use victoria_ast::ast::{BlockStatement, Expression, ForKind, Statement};

#[derive(Clone, Copy)]
enum Node<'a> {
    Stmt(&'a Statement),
    Expr(&'a Expression),
}

/// How deep a node sits inside loops and function literals, relative to
/// where the walk started.
#[derive(Clone, Copy, Default)]
struct Context {
    loops: usize,
    functions: usize,
}

impl Context {
    fn in_loop(self) -> Self {
        Context {
            loops: self.loops + 1,
            ..self
        }
    }

    fn in_function(self) -> Self {
        Context {
            functions: self.functions + 1,
            ..self
        }
    }
}

/// Whether a loop body contains a `break` aimed at this loop or a `return`
/// from the enclosing function.
pub fn can_exit_loop(body: &BlockStatement) -> bool {
    let mut exits = false;
    walk_block(body, Context::default(), &mut |node, ctx| {
        if ctx.functions > 0 {
            return;
        }
        match node {
            Node::Stmt(Statement::Break(_)) if ctx.loops == 0 => exits = true,
            Node::Stmt(Statement::Return(_)) => exits = true,
            _ => {}
        }
    });
    exits
}

/// Number of call sites in `body` that call `name` directly.
pub fn count_self_calls(body: &BlockStatement, name: &str) -> usize {
    let mut calls = 0;
    walk_block(body, Context::default(), &mut |node, _| {
        if let Node::Expr(Expression::Call(call)) = node {
            if matches!(call.function.as_ref(), Expression::Identifier(id) if id.name == name) {
                calls += 1;
            }
        }
    });
    calls
}

fn walk_block<F: FnMut(Node<'_>, Context)>(block: &BlockStatement, ctx: Context, f: &mut F) {
    for stmt in &block.statements {
        walk_statement(stmt, ctx, f);
    }
}

fn walk_statement<F: FnMut(Node<'_>, Context)>(stmt: &Statement, ctx: Context, f: &mut F) {
    f(Node::Stmt(stmt), ctx);
    match stmt {
        Statement::Let(s) | Statement::Const(s) => walk_expression(&s.value, ctx, f),
        Statement::Return(s) => {
            if let Some(value) = &s.value {
                walk_expression(value, ctx, f);
            }
        }
        Statement::Try(t) => {
            walk_block(&t.body, ctx, f);
            if let Some(catch) = &t.catch_body {
                walk_block(catch, ctx, f);
            }
        }
        Statement::Method(m) => walk_block(&m.function.body, ctx.in_function(), f),
        Statement::Expression(s) => walk_expression(&s.expression, ctx, f),
        Statement::Include(_)
        | Statement::Struct(_)
        | Statement::Enum(_)
        | Statement::Break(_)
        | Statement::Continue(_) => {}
    }
}

fn walk_expression<F: FnMut(Node<'_>, Context)>(expr: &Expression, ctx: Context, f: &mut F) {
    f(Node::Expr(expr), ctx);
    match expr {
        Expression::Identifier(_)
        | Expression::Integer(_)
        | Expression::Float(_)
        | Expression::Str(_)
        | Expression::Boolean(_) => {}
        Expression::Prefix(e) => walk_expression(&e.right, ctx, f),
        Expression::Infix(e) => {
            walk_expression(&e.left, ctx, f);
            walk_expression(&e.right, ctx, f);
        }
        Expression::Postfix(e) => walk_expression(&e.target, ctx, f),
        Expression::Assign(e) => {
            walk_expression(&e.target, ctx, f);
            walk_expression(&e.value, ctx, f);
        }
        Expression::If(e) => {
            walk_expression(&e.condition, ctx, f);
            walk_block(&e.consequence, ctx, f);
            if let Some(alt) = &e.alternative {
                walk_block(alt, ctx, f);
            }
        }
        Expression::Function(func) => walk_block(&func.body, ctx.in_function(), f),
        Expression::Arrow(arrow) => walk_expression(&arrow.body, ctx.in_function(), f),
        Expression::Call(call) => {
            walk_expression(&call.function, ctx, f);
            for arg in &call.arguments {
                walk_expression(arg, ctx, f);
            }
        }
        Expression::Array(arr) => {
            for element in &arr.elements {
                walk_expression(element, ctx, f);
            }
        }
        Expression::Index(e) => {
            walk_expression(&e.left, ctx, f);
            walk_expression(&e.index, ctx, f);
        }
        Expression::Slice(e) => {
            walk_expression(&e.left, ctx, f);
            if let Some(start) = &e.start {
                walk_expression(start, ctx, f);
            }
            if let Some(end) = &e.end {
                walk_expression(end, ctx, f);
            }
        }
        Expression::Spread(e) => walk_expression(&e.value, ctx, f),
        Expression::Hash(h) => {
            for (key, value) in &h.pairs {
                walk_expression(key, ctx, f);
                walk_expression(value, ctx, f);
            }
        }
        Expression::Member(m) => walk_expression(&m.object, ctx, f),
        Expression::StructInstantiation(s) => {
            for (_, value) in &s.fields {
                walk_expression(value, ctx, f);
            }
        }
        Expression::While(w) => {
            walk_expression(&w.condition, ctx, f);
            walk_block(&w.body, ctx.in_loop(), f);
        }
        Expression::For(loop_) => {
            match &loop_.kind {
                ForKind::Item { iterable, .. } | ForKind::IndexValue { iterable, .. } => {
                    walk_expression(iterable, ctx, f)
                }
                ForKind::CStyle {
                    init,
                    condition,
                    update,
                } => {
                    if let Some(init) = init {
                        walk_statement(init, ctx, f);
                    }
                    if let Some(condition) = condition {
                        walk_expression(condition, ctx, f);
                    }
                    if let Some(update) = update {
                        walk_expression(update, ctx, f);
                    }
                }
            }
            walk_block(&loop_.body, ctx.in_loop(), f);
        }
        Expression::Switch(s) => {
            walk_expression(&s.subject, ctx, f);
            for case in &s.cases {
                for value in &case.values {
                    walk_expression(value, ctx, f);
                }
                walk_block(&case.body, ctx, f);
            }
            if let Some(default) = &s.default {
                walk_block(default, ctx, f);
            }
        }
        Expression::Ternary(t) => {
            walk_expression(&t.condition, ctx, f);
            walk_expression(&t.consequence, ctx, f);
            walk_expression(&t.alternative, ctx, f);
        }
        Expression::Range(r) => {
            walk_expression(&r.start, ctx, f);
            walk_expression(&r.end, ctx, f);
        }
        Expression::Try(t) => {
            walk_block(&t.body, ctx, f);
            if let Some(catch) = &t.catch_body {
                walk_block(catch, ctx, f);
            }
        }
    }
}
