use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use std::rc::Rc;
use std::sync::Arc;
use victoria_ast::ast::*;
use victoria_ast::location::SourceLocation;
use victoria_diagnostics::{catalog, Diagnostic};

// ======= precedence ladder =======
//
// Ascending. Compressing or reordering levels changes which trees come out,
// so every operator family keeps its own rung.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Arrow,       // =>
    Ternary,     // ? :
    Or,          // || or
    And,         // && and
    Assign,      // = += -= *= /= %=
    Equals,      // == !=
    LessGreater, // < > <= >=
    Range,       // ..
    Sum,         // + -
    Product,     // * / %
    Prefix,      // -x !x ++x --x
    Call,        // f(x)
    Index,       // a[i]
    Postfix,     // x++ x--
    Dot,         // a.b
}

pub fn precedence_of(kind: TokenKind) -> Precedence {
    use TokenKind::*;
    match kind {
        FatArrow => Precedence::Arrow,
        Question => Precedence::Ternary,
        Or => Precedence::Or,
        And => Precedence::And,
        Assign | PlusAssign | MinusAssign | StarAssign | SlashAssign | PercentAssign => {
            Precedence::Assign
        }
        Eq | NotEq => Precedence::Equals,
        Lt | Gt | Le | Ge => Precedence::LessGreater,
        Range => Precedence::Range,
        Plus | Minus => Precedence::Sum,
        Asterisk | Slash | Percent => Precedence::Product,
        LParen => Precedence::Call,
        LBracket => Precedence::Index,
        Increment | Decrement => Precedence::Postfix,
        Dot => Precedence::Dot,
        _ => Precedence::Lowest,
    }
}

/// Pratt parser. `cur` is the token being looked at, `peek` the one after it;
/// each `parse_*` leaves `cur` on the last token of what it parsed.
///
/// A failing production records one text error and one diagnostic and
/// returns `None`; parsing then continues with the next statement.
pub struct Parser {
    lex: Lexer,
    file: Arc<str>,
    source: Arc<str>,
    cur: Token,
    peek: Token,
    errors: Vec<String>,
    diagnostics: Vec<Diagnostic>,
    /// Set while parsing `case` values, where `Name {` opens the case body.
    no_struct: bool,
}

impl Parser {
    pub fn new(file: &str, src: &str) -> Self {
        let mut lex = Lexer::new(src);
        let cur = lex.next_token();
        let peek = lex.next_token();
        Self {
            lex,
            file: Arc::from(file),
            source: Arc::from(src),
            cur,
            peek,
            errors: Vec::new(),
            diagnostics: Vec::new(),
            no_struct: false,
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> (Vec<String>, Vec<Diagnostic>) {
        (self.errors, self.diagnostics)
    }

    fn next_token(&mut self) {
        self.cur = std::mem::replace(&mut self.peek, self.lex.next_token());
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    fn expect_peek(&mut self, kind: TokenKind) -> Option<()> {
        if self.peek_is(kind) {
            self.next_token();
            Some(())
        } else {
            let diag = self.peek_error(kind.as_str());
            self.error(diag);
            None
        }
    }

    fn peek_error(&self, expected: &str) -> Diagnostic {
        match self.peek.kind {
            TokenKind::Illegal => catalog::illegal_character(&self.peek.literal, self.loc(&self.peek)),
            TokenKind::UnterminatedString => catalog::unterminated_string(self.loc(&self.peek)),
            _ => catalog::unexpected_token(expected, &self.peek.describe(), self.loc(&self.peek)),
        }
    }

    fn loc(&self, tok: &Token) -> SourceLocation {
        SourceLocation::new(self.file.clone(), tok.line, tok.column, tok.end_column)
    }

    /// From `start` through the current token.
    fn span_from(&self, start: &SourceLocation) -> SourceLocation {
        start.to(&self.loc(&self.cur))
    }

    fn error(&mut self, diag: Diagnostic) {
        let text = match diag.location() {
            Some(loc) => format!("{loc}: {}", diag.message),
            None => diag.message.clone(),
        };
        self.errors.push(text);
        self.diagnostics.push(diag.with_source(self.source.clone()));
    }

    fn identifier(&self) -> Identifier {
        Identifier {
            name: self.cur.literal.clone(),
            location: self.loc(&self.cur),
        }
    }

    // ======= program / statements =======

    pub fn parse_program(&mut self) -> Program {
        let start = self.loc(&self.cur);
        let mut statements = Vec::new();
        while !self.cur_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }
        Program {
            statements,
            location: self.span_from(&start),
        }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        use TokenKind::*;
        let stmt = match self.cur.kind {
            Let => Statement::Let(self.parse_let()?),
            Const => Statement::Const(self.parse_let()?),
            Return => self.parse_return()?,
            Include => self.parse_include()?,
            Try => Statement::Try(self.parse_try()?),
            Struct => self.parse_struct()?,
            Enum => self.parse_enum()?,
            Define if !self.peek_is(LParen) => self.parse_define()?,
            Break => Statement::Break(self.loc(&self.cur)),
            Continue => Statement::Continue(self.loc(&self.cur)),
            Semicolon => return None,
            _ => self.parse_expression_statement()?,
        };
        if self.peek_is(Semicolon) {
            self.next_token();
        }
        Some(stmt)
    }

    /// `let name (: Type)? = value`; also used for `const`.
    fn parse_let(&mut self) -> Option<LetStatement> {
        let start = self.loc(&self.cur);
        self.expect_peek(TokenKind::Ident)?;
        let name = self.identifier();
        let annotation = if self.peek_is(TokenKind::Colon) {
            self.next_token();
            self.next_token();
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect_peek(TokenKind::Assign)?;
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        Some(LetStatement {
            name,
            annotation,
            value,
            location: self.span_from(&start),
        })
    }

    fn parse_return(&mut self) -> Option<Statement> {
        let start = self.loc(&self.cur);
        if self.peek_is(TokenKind::Semicolon)
            || self.peek_is(TokenKind::RBrace)
            || self.peek_is(TokenKind::Eof)
        {
            return Some(Statement::Return(ReturnStatement {
                value: None,
                location: start,
            }));
        }
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        Some(Statement::Return(ReturnStatement {
            value: Some(value),
            location: self.span_from(&start),
        }))
    }

    /// `include "a"` or `include ("a", "b")`
    fn parse_include(&mut self) -> Option<Statement> {
        let start = self.loc(&self.cur);
        let mut modules = Vec::new();
        let grouped = self.peek_is(TokenKind::LParen);
        if grouped {
            self.next_token();
            loop {
                self.expect_peek(TokenKind::Str)?;
                modules.push(self.cur.literal.clone());
                if self.peek_is(TokenKind::Comma) {
                    self.next_token();
                } else {
                    break;
                }
            }
            self.expect_peek(TokenKind::RParen)?;
        } else {
            self.expect_peek(TokenKind::Str)?;
            modules.push(self.cur.literal.clone());
        }
        Some(Statement::Include(IncludeStatement {
            modules,
            grouped,
            location: self.span_from(&start),
        }))
    }

    /// `try { } (catch (e)? { })?`, as a statement or an expression.
    fn parse_try(&mut self) -> Option<TryExpression> {
        let start = self.loc(&self.cur);
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;
        let mut catch_param = None;
        let mut catch_body = None;
        if self.peek_is(TokenKind::Catch) {
            self.next_token();
            if self.peek_is(TokenKind::LParen) {
                self.next_token();
                self.expect_peek(TokenKind::Ident)?;
                catch_param = Some(self.identifier());
                self.expect_peek(TokenKind::RParen)?;
            }
            self.expect_peek(TokenKind::LBrace)?;
            catch_body = Some(self.parse_block()?);
        }
        Some(TryExpression {
            body,
            catch_param,
            catch_body,
            location: self.span_from(&start),
        })
    }

    /// `struct Name { field (,? field)* }`
    fn parse_struct(&mut self) -> Option<Statement> {
        let start = self.loc(&self.cur);
        self.expect_peek(TokenKind::Ident)?;
        let name = self.identifier();
        self.expect_peek(TokenKind::LBrace)?;
        let mut fields = Vec::new();
        self.next_token();
        while !self.cur_is(TokenKind::RBrace) {
            match self.cur.kind {
                TokenKind::Ident => fields.push(self.identifier()),
                TokenKind::Comma | TokenKind::Semicolon => {}
                TokenKind::Eof => {
                    let diag = catalog::unexpected_token("}", "end of input", self.loc(&self.cur));
                    self.error(diag);
                    return None;
                }
                _ => {
                    let diag = catalog::unexpected_token(
                        "identifier",
                        &self.cur.describe(),
                        self.loc(&self.cur),
                    );
                    self.error(diag);
                    return None;
                }
            }
            self.next_token();
        }
        Some(Statement::Struct(StructStatement {
            name,
            fields,
            location: self.span_from(&start),
        }))
    }

    /// `enum Name { A, B = 5, C }`
    fn parse_enum(&mut self) -> Option<Statement> {
        let start = self.loc(&self.cur);
        self.expect_peek(TokenKind::Ident)?;
        let name = self.identifier();
        self.expect_peek(TokenKind::LBrace)?;
        let mut variants = Vec::new();
        self.next_token();
        while !self.cur_is(TokenKind::RBrace) {
            match self.cur.kind {
                TokenKind::Ident => {
                    let variant = self.identifier();
                    let value = if self.peek_is(TokenKind::Assign) {
                        self.next_token();
                        self.next_token();
                        let negative = self.cur_is(TokenKind::Minus);
                        if negative {
                            self.next_token();
                        }
                        if !self.cur_is(TokenKind::Int) {
                            let diag = catalog::unexpected_token(
                                "integer",
                                &self.cur.describe(),
                                self.loc(&self.cur),
                            );
                            self.error(diag);
                            return None;
                        }
                        let n = self.integer_value()?;
                        Some(if negative { -n } else { n })
                    } else {
                        None
                    };
                    variants.push(EnumVariant {
                        name: variant,
                        value,
                    });
                }
                TokenKind::Comma => {}
                TokenKind::Eof => {
                    let diag = catalog::unexpected_token("}", "end of input", self.loc(&self.cur));
                    self.error(diag);
                    return None;
                }
                _ => {
                    let diag = catalog::unexpected_token(
                        "identifier",
                        &self.cur.describe(),
                        self.loc(&self.cur),
                    );
                    self.error(diag);
                    return None;
                }
            }
            self.next_token();
        }
        Some(Statement::Enum(EnumStatement {
            name,
            variants,
            location: self.span_from(&start),
        }))
    }

    /// `define name(...)` becomes `let name = <function>`;
    /// `define Struct.method(...)` is a method definition.
    fn parse_define(&mut self) -> Option<Statement> {
        let start = self.loc(&self.cur);
        self.expect_peek(TokenKind::Ident)?;
        let first = self.identifier();
        if self.peek_is(TokenKind::Dot) {
            self.next_token();
            self.expect_peek(TokenKind::Ident)?;
            let method = self.identifier();
            self.expect_peek(TokenKind::LParen)?;
            let function = self.parse_function_rest(Some(method.name), start.clone())?;
            return Some(Statement::Method(MethodDefinition {
                struct_name: first,
                function,
                location: self.span_from(&start),
            }));
        }
        self.expect_peek(TokenKind::LParen)?;
        let function = self.parse_function_rest(Some(first.name.clone()), start.clone())?;
        Some(Statement::Let(LetStatement {
            name: first,
            annotation: None,
            value: Expression::Function(function),
            location: self.span_from(&start),
        }))
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let expression = self.parse_expression(Precedence::Lowest)?;
        let location = expression.location().clone();
        Some(Statement::Expression(ExpressionStatement {
            expression,
            location,
        }))
    }

    /// `{ stmt* }`; `cur` is the opening brace.
    fn parse_block(&mut self) -> Option<BlockStatement> {
        let start = self.loc(&self.cur);
        let mut statements = Vec::new();
        self.next_token();
        while !self.cur_is(TokenKind::RBrace) {
            if self.cur_is(TokenKind::Eof) {
                let diag = catalog::unexpected_token("}", "end of input", self.loc(&self.cur));
                self.error(diag);
                return None;
            }
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }
        Some(BlockStatement {
            statements,
            location: self.span_from(&start),
        })
    }

    // ======= types and parameters =======

    /// `name`, `[]T` or `map[K]V`; `cur` is the first token of the type.
    fn parse_type(&mut self) -> Option<TypeAnnotation> {
        let start = self.loc(&self.cur);
        match self.cur.kind {
            TokenKind::LBracket => {
                self.expect_peek(TokenKind::RBracket)?;
                self.next_token();
                let element = self.parse_type()?;
                Some(TypeAnnotation::array_of(element, self.span_from(&start)))
            }
            TokenKind::TypeMap if self.peek_is(TokenKind::LBracket) => {
                self.next_token();
                self.next_token();
                let key = self.parse_type()?;
                self.expect_peek(TokenKind::RBracket)?;
                self.next_token();
                let value = self.parse_type()?;
                Some(TypeAnnotation::map_of(key, value, self.span_from(&start)))
            }
            kind if kind == TokenKind::Ident || kind.is_type_keyword() => {
                Some(TypeAnnotation::named(self.cur.literal.clone(), start))
            }
            _ => {
                let diag = catalog::unexpected_token("type", &self.cur.describe(), start);
                self.error(diag);
                None
            }
        }
    }

    /// `(a, b: int)`; `cur` is the opening paren. Untyped parameters in a
    /// partly typed list are typed `any`.
    fn parse_parameters(&mut self) -> Option<(Vec<Identifier>, Option<Vec<TypedParameter>>)> {
        let mut parameters = Vec::new();
        let mut annotations = Vec::new();
        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            return Some((parameters, None));
        }
        loop {
            self.expect_peek(TokenKind::Ident)?;
            let param = self.identifier();
            let annotation = if self.peek_is(TokenKind::Colon) {
                self.next_token();
                self.next_token();
                Some(self.parse_type()?)
            } else {
                None
            };
            parameters.push(param);
            annotations.push(annotation);
            if self.peek_is(TokenKind::Comma) {
                self.next_token();
            } else {
                break;
            }
        }
        self.expect_peek(TokenKind::RParen)?;

        let typed = if annotations.iter().any(Option::is_some) {
            let typed = parameters
                .iter()
                .zip(annotations)
                .map(|(name, annotation)| TypedParameter {
                    annotation: annotation
                        .unwrap_or_else(|| TypeAnnotation::named("any", name.location.clone())),
                    name: name.clone(),
                })
                .collect();
            Some(typed)
        } else {
            None
        };
        Some((parameters, typed))
    }

    /// `-> T` or `-> (T1, T2)`, if present.
    fn parse_return_types(&mut self) -> Option<Vec<TypeAnnotation>> {
        if !self.peek_is(TokenKind::Arrow) {
            return Some(Vec::new());
        }
        self.next_token();
        if self.peek_is(TokenKind::LParen) {
            self.next_token();
            let mut types = Vec::new();
            loop {
                self.next_token();
                types.push(self.parse_type()?);
                if self.peek_is(TokenKind::Comma) {
                    self.next_token();
                } else {
                    break;
                }
            }
            self.expect_peek(TokenKind::RParen)?;
            Some(types)
        } else {
            self.next_token();
            Some(vec![self.parse_type()?])
        }
    }

    /// Parameters, return types and body; `cur` is the opening paren.
    fn parse_function_rest(
        &mut self,
        name: Option<String>,
        start: SourceLocation,
    ) -> Option<FunctionLiteral> {
        let (parameters, typed_parameters) = self.parse_parameters()?;
        let return_types = self.parse_return_types()?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;
        Some(FunctionLiteral {
            name,
            parameters,
            typed_parameters,
            return_types,
            body: Rc::new(body),
            location: self.span_from(&start),
        })
    }

    // ======= expressions (Pratt parser) =======

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;
        while !self.peek_is(TokenKind::Semicolon) && precedence < precedence_of(self.peek.kind) {
            self.next_token();
            left = self.parse_infix(left)?;
        }
        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        use TokenKind::*;
        let loc = self.loc(&self.cur);
        match self.cur.kind {
            Ident => self.parse_identifier(),
            kind if kind.is_type_keyword() => Some(Expression::Identifier(self.identifier())),
            Int => {
                let value = self.integer_value()?;
                Some(Expression::Integer(IntegerLiteral {
                    value,
                    location: loc,
                }))
            }
            Float => match self.cur.literal.parse::<f64>() {
                Ok(value) => Some(Expression::Float(FloatLiteral {
                    value,
                    literal: self.cur.literal.clone(),
                    location: loc,
                })),
                Err(_) => {
                    let diag = catalog::invalid_float_literal(&self.cur.literal, loc);
                    self.error(diag);
                    None
                }
            },
            Str => Some(Expression::Str(StringLiteral {
                value: self.cur.literal.clone(),
                location: loc,
            })),
            True | False => Some(Expression::Boolean(BooleanLiteral {
                value: self.cur_is(True),
                location: loc,
            })),
            Bang | Minus | Increment | Decrement => self.parse_prefix_operator(),
            LParen => self.parse_grouped(),
            LBracket => {
                let elements = self.parse_expression_list(RBracket)?;
                Some(Expression::Array(ArrayLiteral {
                    elements,
                    location: self.span_from(&loc),
                }))
            }
            LBrace => self.parse_hash(),
            If => self.parse_if(),
            While => self.parse_while(),
            For => self.parse_for(),
            Switch => self.parse_switch(),
            Try => self.parse_try().map(Expression::Try),
            Define => self.parse_function_literal(),
            Spread => {
                self.next_token();
                let value = self.parse_expression(Precedence::Prefix)?;
                let location = loc.to(value.location());
                Some(Expression::Spread(SpreadExpression {
                    value: Box::new(value),
                    location,
                }))
            }
            Illegal => {
                let diag = catalog::illegal_character(&self.cur.literal, loc);
                self.error(diag);
                None
            }
            UnterminatedString => {
                self.error(catalog::unterminated_string(loc));
                None
            }
            _ => {
                let diag = catalog::no_prefix_parse(&self.cur.describe(), loc);
                self.error(diag);
                None
            }
        }
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        use TokenKind::*;
        match self.cur.kind {
            Plus | Minus | Asterisk | Slash | Percent | Lt | Gt | Le | Ge | Eq | NotEq | And
            | Or => self.parse_binary(left),
            Assign | PlusAssign | MinusAssign | StarAssign | SlashAssign | PercentAssign => {
                self.parse_assign(left)
            }
            Range => {
                self.next_token();
                let end = self.parse_expression(Precedence::Range)?;
                let location = left.location().to(end.location());
                Some(Expression::Range(RangeExpression {
                    start: Box::new(left),
                    end: Box::new(end),
                    location,
                }))
            }
            Question => self.parse_ternary(left),
            FatArrow => self.parse_arrow_from(left),
            LParen => {
                let arguments = self.parse_expression_list(RParen)?;
                let location = self.span_from(left.location());
                Some(Expression::Call(CallExpression {
                    function: Box::new(left),
                    arguments,
                    location,
                }))
            }
            LBracket => self.parse_index(left),
            Dot => self.parse_member(left),
            Increment | Decrement => {
                let operator = if self.cur_is(Increment) {
                    PostfixOp::Increment
                } else {
                    PostfixOp::Decrement
                };
                let location = self.span_from(left.location());
                Some(Expression::Postfix(PostfixExpression {
                    operator,
                    target: Box::new(left),
                    location,
                }))
            }
            _ => Some(left),
        }
    }

    fn integer_value(&mut self) -> Option<i64> {
        match self.cur.literal.parse::<i64>() {
            Ok(n) => Some(n),
            Err(_) => {
                let diag = catalog::invalid_integer_literal(&self.cur.literal, self.loc(&self.cur));
                self.error(diag);
                None
            }
        }
    }

    /// An identifier, or a struct instantiation when `{` follows.
    fn parse_identifier(&mut self) -> Option<Expression> {
        let name = self.identifier();
        if !self.peek_is(TokenKind::LBrace) || self.no_struct {
            return Some(Expression::Identifier(name));
        }
        self.next_token();
        let mut fields = Vec::new();
        while !self.peek_is(TokenKind::RBrace) {
            self.expect_peek(TokenKind::Ident)?;
            let field = self.identifier();
            self.expect_peek(TokenKind::Colon)?;
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            fields.push((field, value));
            if !self.peek_is(TokenKind::RBrace) {
                self.expect_peek(TokenKind::Comma)?;
            }
        }
        self.next_token();
        let location = self.span_from(&name.location);
        Some(Expression::StructInstantiation(StructInstantiation {
            name,
            fields,
            location,
        }))
    }

    fn parse_prefix_operator(&mut self) -> Option<Expression> {
        let start = self.loc(&self.cur);
        let operator = match self.cur.kind {
            TokenKind::Minus => PrefixOp::Minus,
            TokenKind::Increment => PrefixOp::Increment,
            TokenKind::Decrement => PrefixOp::Decrement,
            _ => PrefixOp::Not,
        };
        self.next_token();
        let right = self.parse_expression(Precedence::Prefix)?;
        let location = start.to(right.location());
        Some(Expression::Prefix(PrefixExpression {
            operator,
            right: Box::new(right),
            location,
        }))
    }

    fn parse_binary(&mut self, left: Expression) -> Option<Expression> {
        use TokenKind::*;
        let operator = match self.cur.kind {
            Plus => InfixOp::Add,
            Minus => InfixOp::Sub,
            Asterisk => InfixOp::Mul,
            Slash => InfixOp::Div,
            Percent => InfixOp::Mod,
            Lt => InfixOp::Lt,
            Gt => InfixOp::Gt,
            Le => InfixOp::Le,
            Ge => InfixOp::Ge,
            Eq => InfixOp::Eq,
            NotEq => InfixOp::Ne,
            And => InfixOp::And,
            _ => InfixOp::Or,
        };
        let precedence = precedence_of(self.cur.kind);
        self.next_token();
        let right = self.parse_expression(precedence)?;
        let location = left.location().to(right.location());
        Some(Expression::Infix(InfixExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            location,
        }))
    }

    /// Right-associative: the value is parsed at the lowest precedence.
    fn parse_assign(&mut self, target: Expression) -> Option<Expression> {
        use TokenKind::*;
        let operator = match self.cur.kind {
            PlusAssign => AssignOp::Add,
            MinusAssign => AssignOp::Sub,
            StarAssign => AssignOp::Mul,
            SlashAssign => AssignOp::Div,
            PercentAssign => AssignOp::Mod,
            _ => AssignOp::Assign,
        };
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        let location = target.location().to(value.location());
        Some(Expression::Assign(AssignExpression {
            target: Box::new(target),
            operator,
            value: Box::new(value),
            location,
        }))
    }

    fn parse_ternary(&mut self, condition: Expression) -> Option<Expression> {
        self.next_token();
        let consequence = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::Colon)?;
        self.next_token();
        let alternative = self.parse_expression(Precedence::Lowest)?;
        let location = condition.location().to(alternative.location());
        Some(Expression::Ternary(TernaryExpression {
            condition: Box::new(condition),
            consequence: Box::new(consequence),
            alternative: Box::new(alternative),
            location,
        }))
    }

    /// `x => body`: `cur` is the arrow and `left` must be a bare identifier.
    fn parse_arrow_from(&mut self, left: Expression) -> Option<Expression> {
        match left {
            Expression::Identifier(param) => {
                let start = param.location.clone();
                self.parse_arrow_body(vec![param], start)
            }
            other => {
                let diag = catalog::operator_error(
                    "=>",
                    "the left side of `=>` must be a parameter list",
                    other.location().clone(),
                );
                self.error(diag);
                None
            }
        }
    }

    /// `cur` is the `=>`.
    fn parse_arrow_body(
        &mut self,
        parameters: Vec<Identifier>,
        start: SourceLocation,
    ) -> Option<Expression> {
        self.next_token();
        let body = self.parse_expression(Precedence::Lowest)?;
        let location = start.to(body.location());
        Some(Expression::Arrow(ArrowFunction {
            parameters,
            body: Rc::new(body),
            location,
        }))
    }

    /// `(` starts either a grouped expression or an arrow parameter list:
    /// `() =>`, `(a) =>` and `(a, b) =>` are lambdas, anything else is a group.
    fn parse_grouped(&mut self) -> Option<Expression> {
        let start = self.loc(&self.cur);
        if self.peek_is(TokenKind::RParen) {
            self.next_token();
            self.expect_peek(TokenKind::FatArrow)?;
            return self.parse_arrow_body(Vec::new(), start);
        }
        self.next_token();
        if self.cur_is(TokenKind::Ident) && self.peek_is(TokenKind::Comma) {
            let mut parameters = vec![self.identifier()];
            while self.peek_is(TokenKind::Comma) {
                self.next_token();
                self.expect_peek(TokenKind::Ident)?;
                parameters.push(self.identifier());
            }
            self.expect_peek(TokenKind::RParen)?;
            self.expect_peek(TokenKind::FatArrow)?;
            return self.parse_arrow_body(parameters, start);
        }
        if self.cur_is(TokenKind::Ident) && self.peek_is(TokenKind::RParen) {
            let name = self.identifier();
            self.next_token();
            if self.peek_is(TokenKind::FatArrow) {
                self.next_token();
                return self.parse_arrow_body(vec![name], start);
            }
            return Some(Expression::Identifier(name));
        }
        let inner = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        Some(inner)
    }

    /// Comma-separated expressions up to `end`; a trailing comma is allowed.
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = Vec::new();
        if self.peek_is(end) {
            self.next_token();
            return Some(list);
        }
        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            if self.peek_is(end) {
                break;
            }
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }
        self.expect_peek(end)?;
        Some(list)
    }

    /// `{ key: value, ... }` in expression position.
    fn parse_hash(&mut self) -> Option<Expression> {
        let start = self.loc(&self.cur);
        let mut pairs = Vec::new();
        while !self.peek_is(TokenKind::RBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;
            self.expect_peek(TokenKind::Colon)?;
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));
            if !self.peek_is(TokenKind::RBrace) {
                self.expect_peek(TokenKind::Comma)?;
            }
        }
        self.next_token();
        Some(Expression::Hash(HashLiteral {
            pairs,
            location: self.span_from(&start),
        }))
    }

    /// `[i]`, `[s:e]`, `[:e]`, `[s:]`, `[:]`; `cur` is the opening bracket.
    fn parse_index(&mut self, left: Expression) -> Option<Expression> {
        if self.peek_is(TokenKind::Colon) {
            self.next_token();
            let end = self.parse_slice_end()?;
            return Some(self.slice(left, None, end));
        }
        self.next_token();
        let index = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenKind::Colon) {
            self.next_token();
            let end = self.parse_slice_end()?;
            return Some(self.slice(left, Some(Box::new(index)), end));
        }
        self.expect_peek(TokenKind::RBracket)?;
        let location = self.span_from(left.location());
        Some(Expression::Index(IndexExpression {
            left: Box::new(left),
            index: Box::new(index),
            location,
        }))
    }

    /// `cur` is the colon; consumes through the closing bracket.
    fn parse_slice_end(&mut self) -> Option<Option<Box<Expression>>> {
        if self.peek_is(TokenKind::RBracket) {
            self.next_token();
            return Some(None);
        }
        self.next_token();
        let end = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RBracket)?;
        Some(Some(Box::new(end)))
    }

    fn slice(
        &self,
        left: Expression,
        start: Option<Box<Expression>>,
        end: Option<Box<Expression>>,
    ) -> Expression {
        let location = self.span_from(left.location());
        Expression::Slice(SliceExpression {
            left: Box::new(left),
            start,
            end,
            location,
        })
    }

    fn parse_member(&mut self, object: Expression) -> Option<Expression> {
        if self.peek_is(TokenKind::Ident) || self.peek.kind.is_type_keyword() {
            self.next_token();
        } else {
            let diag = self.peek_error("identifier");
            self.error(diag);
            return None;
        }
        let property = self.identifier();
        let location = object.location().to(&property.location);
        Some(Expression::Member(MemberExpression {
            object: Box::new(object),
            property,
            location,
        }))
    }

    /// `( condition )`; `cur` is the keyword before it.
    fn parse_condition(&mut self) -> Option<Expression> {
        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        Some(condition)
    }

    fn parse_if(&mut self) -> Option<Expression> {
        let start = self.loc(&self.cur);
        let condition = self.parse_condition()?;
        self.expect_peek(TokenKind::LBrace)?;
        let consequence = self.parse_block()?;
        let alternative = if self.peek_is(TokenKind::Else) {
            self.next_token();
            if self.peek_is(TokenKind::If) {
                // else if: the nested if becomes the only statement of the else block
                self.next_token();
                let nested = self.parse_if()?;
                let location = nested.location().clone();
                Some(BlockStatement {
                    statements: vec![Statement::Expression(ExpressionStatement {
                        expression: nested,
                        location: location.clone(),
                    })],
                    location,
                })
            } else {
                self.expect_peek(TokenKind::LBrace)?;
                Some(self.parse_block()?)
            }
        } else {
            None
        };
        Some(Expression::If(IfExpression {
            condition: Box::new(condition),
            consequence,
            alternative,
            location: self.span_from(&start),
        }))
    }

    fn parse_while(&mut self) -> Option<Expression> {
        let start = self.loc(&self.cur);
        let condition = self.parse_condition()?;
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;
        Some(Expression::While(WhileExpression {
            condition: Box::new(condition),
            body,
            location: self.span_from(&start),
        }))
    }

    /// `for (x in it)`, `for (i, x in it)` or `for (init; cond; update)`.
    fn parse_for(&mut self) -> Option<Expression> {
        let start = self.loc(&self.cur);
        self.expect_peek(TokenKind::LParen)?;
        self.next_token();
        let kind = if self.cur_is(TokenKind::Ident) && self.peek_is(TokenKind::In) {
            let item = self.identifier();
            self.next_token();
            self.next_token();
            let iterable = self.parse_expression(Precedence::Lowest)?;
            self.expect_peek(TokenKind::RParen)?;
            ForKind::Item {
                item,
                iterable: Box::new(iterable),
            }
        } else if self.cur_is(TokenKind::Ident) && self.peek_is(TokenKind::Comma) {
            let index = self.identifier();
            self.next_token();
            self.expect_peek(TokenKind::Ident)?;
            let value = self.identifier();
            self.expect_peek(TokenKind::In)?;
            self.next_token();
            let iterable = self.parse_expression(Precedence::Lowest)?;
            self.expect_peek(TokenKind::RParen)?;
            ForKind::IndexValue {
                index,
                value,
                iterable: Box::new(iterable),
            }
        } else {
            let init = if self.cur_is(TokenKind::Semicolon) {
                None
            } else {
                let stmt = match self.cur.kind {
                    TokenKind::Let => Statement::Let(self.parse_let()?),
                    TokenKind::Const => Statement::Const(self.parse_let()?),
                    _ => self.parse_expression_statement()?,
                };
                self.expect_peek(TokenKind::Semicolon)?;
                Some(Box::new(stmt))
            };
            let condition = if self.peek_is(TokenKind::Semicolon) {
                None
            } else {
                self.next_token();
                Some(Box::new(self.parse_expression(Precedence::Lowest)?))
            };
            self.expect_peek(TokenKind::Semicolon)?;
            let update = if self.peek_is(TokenKind::RParen) {
                None
            } else {
                self.next_token();
                Some(Box::new(self.parse_expression(Precedence::Lowest)?))
            };
            self.expect_peek(TokenKind::RParen)?;
            ForKind::CStyle {
                init,
                condition,
                update,
            }
        };
        self.expect_peek(TokenKind::LBrace)?;
        let body = self.parse_block()?;
        Some(Expression::For(ForExpression {
            kind,
            body,
            location: self.span_from(&start),
        }))
    }

    /// `switch (e) { case a, b { } default { } }`
    fn parse_switch(&mut self) -> Option<Expression> {
        let start = self.loc(&self.cur);
        let subject = self.parse_condition()?;
        self.expect_peek(TokenKind::LBrace)?;
        self.next_token();
        let mut cases = Vec::new();
        let mut default = None;
        while !self.cur_is(TokenKind::RBrace) {
            match self.cur.kind {
                TokenKind::Case => {
                    let case_start = self.loc(&self.cur);
                    self.no_struct = true;
                    let values = self.parse_case_values();
                    self.no_struct = false;
                    let values = values?;
                    if self.peek_is(TokenKind::Colon) {
                        self.next_token();
                    }
                    self.expect_peek(TokenKind::LBrace)?;
                    let body = self.parse_block()?;
                    cases.push(SwitchCase {
                        values,
                        body,
                        location: self.span_from(&case_start),
                    });
                }
                TokenKind::Default => {
                    if self.peek_is(TokenKind::Colon) {
                        self.next_token();
                    }
                    self.expect_peek(TokenKind::LBrace)?;
                    default = Some(self.parse_block()?);
                }
                TokenKind::Eof => {
                    let diag = catalog::unexpected_token("}", "end of input", self.loc(&self.cur));
                    self.error(diag);
                    return None;
                }
                _ => {
                    let diag =
                        catalog::unexpected_token("case", &self.cur.describe(), self.loc(&self.cur));
                    self.error(diag);
                    return None;
                }
            }
            self.next_token();
        }
        Some(Expression::Switch(SwitchExpression {
            subject: Box::new(subject),
            cases,
            default,
            location: self.span_from(&start),
        }))
    }

    fn parse_case_values(&mut self) -> Option<Vec<Expression>> {
        let mut values = Vec::new();
        loop {
            self.next_token();
            values.push(self.parse_expression(Precedence::Lowest)?);
            if self.peek_is(TokenKind::Comma) {
                self.next_token();
            } else {
                return Some(values);
            }
        }
    }

    /// `define(params) (-> ret)? { }` or `define name(params) ...` in
    /// expression position.
    fn parse_function_literal(&mut self) -> Option<Expression> {
        let start = self.loc(&self.cur);
        let name = if self.peek_is(TokenKind::Ident) {
            self.next_token();
            Some(self.cur.literal.clone())
        } else {
            None
        };
        self.expect_peek(TokenKind::LParen)?;
        let function = self.parse_function_rest(name, start)?;
        Some(Expression::Function(function))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_is_ordered() {
        assert!(Precedence::Lowest < Precedence::Arrow);
        assert!(Precedence::Or < Precedence::And);
        assert!(Precedence::And < Precedence::Assign);
        assert!(Precedence::Range < Precedence::Sum);
        assert!(Precedence::Postfix < Precedence::Dot);
        assert_eq!(precedence_of(TokenKind::Colon), Precedence::Lowest);
    }

    #[test]
    fn errors_and_diagnostics_stay_paired() {
        let mut p = Parser::new("t.vic", "let = 5; let y = );");
        p.parse_program();
        assert!(!p.errors().is_empty());
        assert_eq!(p.errors().len(), p.diagnostics().len());
        assert!(p.diagnostics().iter().all(|d| d.source.is_some()));
    }
}
