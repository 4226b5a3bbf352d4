//! Source-form printing of the tree.
//!
//! The output re-parses to the same tree: every compound expression is
//! parenthesized, so printing a reparsed program yields identical text.

use crate::ast::*;
use std::fmt::{self, Display, Formatter, Write};

fn join<T: Display>(f: &mut Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_quoted(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for ch in s.chars() {
        match ch {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            writeln!(f, "{stmt}")?;
        }
        Ok(())
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(s) => fmt_binding(f, "let", s),
            Statement::Const(s) => fmt_binding(f, "const", s),
            Statement::Return(r) => match &r.value {
                Some(v) => write!(f, "return {v};"),
                None => f.write_str("return;"),
            },
            Statement::Include(inc) => {
                f.write_str("include ")?;
                if inc.grouped {
                    f.write_char('(')?;
                }
                for (i, m) in inc.modules.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_quoted(f, m)?;
                }
                if inc.grouped {
                    f.write_char(')')?;
                }
                f.write_char(';')
            }
            Statement::Try(t) => write!(f, "{t}"),
            Statement::Struct(s) => {
                write!(f, "struct {} {{ ", s.name)?;
                join(f, &s.fields, ", ")?;
                f.write_str(" }")
            }
            Statement::Enum(e) => {
                write!(f, "enum {} {{ ", e.name)?;
                for (i, v) in e.variants.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match v.value {
                        Some(n) => write!(f, "{} = {}", v.name, n)?,
                        None => write!(f, "{}", v.name)?,
                    }
                }
                f.write_str(" }")
            }
            Statement::Method(m) => {
                write!(f, "define {}.", m.struct_name)?;
                fmt_function_tail(f, m.function.name.as_deref().unwrap_or("method"), &m.function)
            }
            Statement::Break(_) => f.write_str("break;"),
            Statement::Continue(_) => f.write_str("continue;"),
            Statement::Expression(s) => write!(f, "{};", s.expression),
        }
    }
}

fn fmt_binding(f: &mut Formatter<'_>, keyword: &str, s: &LetStatement) -> fmt::Result {
    // `define name(...)` desugars to a let; print it back in its sugared form.
    if keyword == "let" && s.annotation.is_none() {
        if let Expression::Function(func) = &s.value {
            if func.name.as_deref() == Some(s.name.name.as_str()) {
                f.write_str("define ")?;
                return fmt_function_tail(f, &s.name.name, func);
            }
        }
    }
    write!(f, "{keyword} {}", s.name)?;
    if let Some(ty) = &s.annotation {
        write!(f, ": {ty}")?;
    }
    write!(f, " = {};", s.value)
}

fn fmt_parameters(f: &mut Formatter<'_>, func: &FunctionLiteral) -> fmt::Result {
    f.write_char('(')?;
    match &func.typed_parameters {
        Some(typed) => {
            for (i, p) in typed.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: {}", p.name, p.annotation)?;
            }
        }
        None => join(f, &func.parameters, ", ")?,
    }
    f.write_char(')')?;
    match func.return_types.as_slice() {
        [] => {}
        [single] => write!(f, " -> {single}")?,
        many => {
            f.write_str(" -> (")?;
            join(f, many, ", ")?;
            f.write_char(')')?;
        }
    }
    Ok(())
}

fn fmt_function_tail(f: &mut Formatter<'_>, name: &str, func: &FunctionLiteral) -> fmt::Result {
    f.write_str(name)?;
    fmt_parameters(f, func)?;
    write!(f, " {}", func.body)
}

impl Display for BlockStatement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        for stmt in &self.statements {
            write!(f, "{stmt} ")?;
        }
        f.write_char('}')
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Display for TypeAnnotation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let (Some(key), Some(value)) = (&self.key, &self.element) {
            return write!(f, "map[{key}]{value}");
        }
        if self.is_array {
            return match &self.element {
                Some(elem) => write!(f, "[]{elem}"),
                None => f.write_str("array"),
            };
        }
        f.write_str(&self.name)
    }
}

impl Display for TryExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "try {}", self.body)?;
        if let Some(catch) = &self.catch_body {
            f.write_str(" catch ")?;
            if let Some(param) = &self.catch_param {
                write!(f, "({param}) ")?;
            }
            write!(f, "{catch}")?;
        }
        Ok(())
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(id) => write!(f, "{id}"),
            Expression::Integer(lit) => write!(f, "{}", lit.value),
            Expression::Float(lit) => f.write_str(&lit.literal),
            Expression::Str(lit) => write_quoted(f, &lit.value),
            Expression::Boolean(lit) => write!(f, "{}", lit.value),
            Expression::Prefix(p) => write!(f, "({}{})", p.operator.as_str(), p.right),
            Expression::Infix(i) => {
                write!(f, "({} {} {})", i.left, i.operator.as_str(), i.right)
            }
            Expression::Postfix(p) => write!(f, "({}{})", p.target, p.operator.as_str()),
            Expression::Assign(a) => {
                write!(f, "({} {} {})", a.target, a.operator.as_str(), a.value)
            }
            Expression::If(i) => {
                write!(f, "if ({}) {}", i.condition, i.consequence)?;
                if let Some(alt) = &i.alternative {
                    write!(f, " else {alt}")?;
                }
                Ok(())
            }
            Expression::Function(func) => {
                f.write_str("define")?;
                fmt_parameters(f, func)?;
                write!(f, " {}", func.body)
            }
            Expression::Arrow(arrow) => {
                f.write_str("((")?;
                join(f, &arrow.parameters, ", ")?;
                write!(f, ") => {})", arrow.body)
            }
            Expression::Call(call) => {
                write!(f, "{}(", call.function)?;
                join(f, &call.arguments, ", ")?;
                f.write_char(')')
            }
            Expression::Array(arr) => {
                f.write_char('[')?;
                join(f, &arr.elements, ", ")?;
                f.write_char(']')
            }
            Expression::Index(idx) => write!(f, "({}[{}])", idx.left, idx.index),
            Expression::Slice(s) => {
                write!(f, "({}[", s.left)?;
                if let Some(start) = &s.start {
                    write!(f, "{start}")?;
                }
                f.write_char(':')?;
                if let Some(end) = &s.end {
                    write!(f, "{end}")?;
                }
                f.write_str("])")
            }
            Expression::Spread(s) => write!(f, "...{}", s.value),
            Expression::Hash(h) => {
                f.write_char('{')?;
                for (i, (k, v)) in h.pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_char('}')
            }
            Expression::Member(m) => write!(f, "{}.{}", m.object, m.property),
            Expression::StructInstantiation(s) => {
                write!(f, "{} {{", s.name)?;
                for (i, (name, value)) in s.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_char('}')
            }
            Expression::While(w) => write!(f, "while ({}) {}", w.condition, w.body),
            Expression::For(fr) => {
                match &fr.kind {
                    ForKind::Item { item, iterable } => {
                        write!(f, "for ({item} in {iterable})")?;
                    }
                    ForKind::IndexValue {
                        index,
                        value,
                        iterable,
                    } => {
                        write!(f, "for ({index}, {value} in {iterable})")?;
                    }
                    ForKind::CStyle {
                        init,
                        condition,
                        update,
                    } => {
                        f.write_str("for (")?;
                        if let Some(init) = init {
                            let text = init.to_string();
                            f.write_str(text.trim_end_matches(';'))?;
                        }
                        f.write_str("; ")?;
                        if let Some(cond) = condition {
                            write!(f, "{cond}")?;
                        }
                        f.write_str("; ")?;
                        if let Some(update) = update {
                            write!(f, "{update}")?;
                        }
                        f.write_char(')')?;
                    }
                }
                write!(f, " {}", fr.body)
            }
            Expression::Switch(s) => {
                write!(f, "switch ({}) {{ ", s.subject)?;
                for case in &s.cases {
                    f.write_str("case ")?;
                    join(f, &case.values, ", ")?;
                    write!(f, " {} ", case.body)?;
                }
                if let Some(default) = &s.default {
                    write!(f, "default {default} ")?;
                }
                f.write_char('}')
            }
            Expression::Ternary(t) => write!(
                f,
                "({} ? {} : {})",
                t.condition, t.consequence, t.alternative
            ),
            Expression::Range(r) => write!(f, "({}..{})", r.start, r.end),
            Expression::Try(t) => write!(f, "{t}"),
        }
    }
}
