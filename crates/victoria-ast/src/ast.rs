use super::location::SourceLocation;
use serde::Serialize;
use std::rc::Rc;

#[derive(Debug, Clone, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub enum Statement {
    Let(LetStatement),
    Const(LetStatement),
    Return(ReturnStatement),
    Include(IncludeStatement),
    Try(TryExpression),
    Struct(StructStatement),
    Enum(EnumStatement),
    Method(MethodDefinition),
    Break(SourceLocation),
    Continue(SourceLocation),
    Expression(ExpressionStatement),
}

impl Statement {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Statement::Let(s) | Statement::Const(s) => &s.location,
            Statement::Return(s) => &s.location,
            Statement::Include(s) => &s.location,
            Statement::Try(t) => &t.location,
            Statement::Struct(s) => &s.location,
            Statement::Enum(s) => &s.location,
            Statement::Method(m) => &m.location,
            Statement::Break(loc) | Statement::Continue(loc) => loc,
            Statement::Expression(s) => &s.location,
        }
    }
}

/// `let name (: Type)? = value` and its `const` twin.
#[derive(Debug, Clone, Serialize)]
pub struct LetStatement {
    pub name: Identifier,
    pub annotation: Option<TypeAnnotation>,
    pub value: Expression,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReturnStatement {
    pub value: Option<Expression>,
    pub location: SourceLocation,
}

/// `include "a"` or `include ("a", "b")`.
#[derive(Debug, Clone, Serialize)]
pub struct IncludeStatement {
    pub modules: Vec<String>,
    pub grouped: bool,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructStatement {
    pub name: Identifier,
    /// Declaration order is preserved.
    pub fields: Vec<Identifier>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumStatement {
    pub name: Identifier,
    pub variants: Vec<EnumVariant>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumVariant {
    pub name: Identifier,
    pub value: Option<i64>,
}

/// `define Struct.method(params) (-> ret)? { body }`
#[derive(Debug, Clone, Serialize)]
pub struct MethodDefinition {
    pub struct_name: Identifier,
    pub function: FunctionLiteral,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpressionStatement {
    pub expression: Expression,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct Identifier {
    pub name: String,
    pub location: SourceLocation,
}

/// Base name, `[]T`, or `map[K]V`.
#[derive(Debug, Clone, Serialize)]
pub struct TypeAnnotation {
    pub name: String,
    pub is_array: bool,
    pub element: Option<Box<TypeAnnotation>>,
    pub key: Option<Box<TypeAnnotation>>,
    pub location: SourceLocation,
}

impl TypeAnnotation {
    pub fn named(name: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            name: name.into(),
            is_array: false,
            element: None,
            key: None,
            location,
        }
    }

    pub fn array_of(element: TypeAnnotation, location: SourceLocation) -> Self {
        Self {
            name: "array".to_string(),
            is_array: true,
            element: Some(Box::new(element)),
            key: None,
            location,
        }
    }

    pub fn map_of(key: TypeAnnotation, value: TypeAnnotation, location: SourceLocation) -> Self {
        Self {
            name: "map".to_string(),
            is_array: false,
            element: Some(Box::new(value)),
            key: Some(Box::new(key)),
            location,
        }
    }

    pub fn is_map(&self) -> bool {
        self.key.is_some()
    }

    pub fn is_any(&self) -> bool {
        !self.is_array && !self.is_map() && self.name == "any"
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TypedParameter {
    pub name: Identifier,
    pub annotation: TypeAnnotation,
}

#[derive(Debug, Clone, Serialize)]
pub enum Expression {
    Identifier(Identifier),
    Integer(IntegerLiteral),
    Float(FloatLiteral),
    Str(StringLiteral),
    Boolean(BooleanLiteral),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    Postfix(PostfixExpression),
    Assign(AssignExpression),
    If(IfExpression),
    Function(FunctionLiteral),
    Arrow(ArrowFunction),
    Call(CallExpression),
    Array(ArrayLiteral),
    Index(IndexExpression),
    Slice(SliceExpression),
    Spread(SpreadExpression),
    Hash(HashLiteral),
    Member(MemberExpression),
    StructInstantiation(StructInstantiation),
    While(WhileExpression),
    For(ForExpression),
    Switch(SwitchExpression),
    Ternary(TernaryExpression),
    Range(RangeExpression),
    Try(TryExpression),
}

impl Expression {
    pub fn location(&self) -> &SourceLocation {
        match self {
            Expression::Identifier(e) => &e.location,
            Expression::Integer(e) => &e.location,
            Expression::Float(e) => &e.location,
            Expression::Str(e) => &e.location,
            Expression::Boolean(e) => &e.location,
            Expression::Prefix(e) => &e.location,
            Expression::Infix(e) => &e.location,
            Expression::Postfix(e) => &e.location,
            Expression::Assign(e) => &e.location,
            Expression::If(e) => &e.location,
            Expression::Function(e) => &e.location,
            Expression::Arrow(e) => &e.location,
            Expression::Call(e) => &e.location,
            Expression::Array(e) => &e.location,
            Expression::Index(e) => &e.location,
            Expression::Slice(e) => &e.location,
            Expression::Spread(e) => &e.location,
            Expression::Hash(e) => &e.location,
            Expression::Member(e) => &e.location,
            Expression::StructInstantiation(e) => &e.location,
            Expression::While(e) => &e.location,
            Expression::For(e) => &e.location,
            Expression::Switch(e) => &e.location,
            Expression::Ternary(e) => &e.location,
            Expression::Range(e) => &e.location,
            Expression::Try(e) => &e.location,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IntegerLiteral {
    pub value: i64,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct FloatLiteral {
    pub value: f64,
    /// Source spelling, kept so `.5` prints back as `.5`.
    pub literal: String,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct StringLiteral {
    pub value: String,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct BooleanLiteral {
    pub value: bool,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrefixOp {
    Minus,
    Not,
    Increment,
    Decrement,
}

impl PrefixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PrefixOp::Minus => "-",
            PrefixOp::Not => "!",
            PrefixOp::Increment => "++",
            PrefixOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PrefixExpression {
    pub operator: PrefixOp,
    pub right: Box<Expression>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl InfixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Mod => "%",
            InfixOp::Lt => "<",
            InfixOp::Gt => ">",
            InfixOp::Le => "<=",
            InfixOp::Ge => ">=",
            InfixOp::Eq => "==",
            InfixOp::Ne => "!=",
            InfixOp::And => "&&",
            InfixOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InfixExpression {
    pub left: Box<Expression>,
    pub operator: InfixOp,
    pub right: Box<Expression>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PostfixOp {
    Increment,
    Decrement,
}

impl PostfixOp {
    pub fn as_str(self) -> &'static str {
        match self {
            PostfixOp::Increment => "++",
            PostfixOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostfixExpression {
    pub operator: PostfixOp,
    pub target: Box<Expression>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
        }
    }

    /// The arithmetic a compound operator desugars to.
    pub fn binary(self) -> Option<InfixOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(InfixOp::Add),
            AssignOp::Sub => Some(InfixOp::Sub),
            AssignOp::Mul => Some(InfixOp::Mul),
            AssignOp::Div => Some(InfixOp::Div),
            AssignOp::Mod => Some(InfixOp::Mod),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignExpression {
    pub target: Box<Expression>,
    pub operator: AssignOp,
    pub value: Box<Expression>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct IfExpression {
    pub condition: Box<Expression>,
    pub consequence: BlockStatement,
    pub alternative: Option<BlockStatement>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionLiteral {
    /// Set for `define name(...)` and methods; anonymous literals have none.
    pub name: Option<String>,
    pub parameters: Vec<Identifier>,
    /// `None` when no parameter carries an annotation, otherwise one entry per parameter.
    pub typed_parameters: Option<Vec<TypedParameter>>,
    pub return_types: Vec<TypeAnnotation>,
    pub body: Rc<BlockStatement>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArrowFunction {
    pub parameters: Vec<Identifier>,
    pub body: Rc<Expression>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallExpression {
    pub function: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexExpression {
    pub left: Box<Expression>,
    pub index: Box<Expression>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct SliceExpression {
    pub left: Box<Expression>,
    pub start: Option<Box<Expression>>,
    pub end: Option<Box<Expression>>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpreadExpression {
    pub value: Box<Expression>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct HashLiteral {
    /// Evaluated in order; a repeated key keeps the later value.
    pub pairs: Vec<(Expression, Expression)>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: Identifier,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructInstantiation {
    pub name: Identifier,
    pub fields: Vec<(Identifier, Expression)>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct WhileExpression {
    pub condition: Box<Expression>,
    pub body: BlockStatement,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub enum ForKind {
    /// `for (item in iterable)`
    Item {
        item: Identifier,
        iterable: Box<Expression>,
    },
    /// `for (index, value in iterable)`
    IndexValue {
        index: Identifier,
        value: Identifier,
        iterable: Box<Expression>,
    },
    /// `for (init; condition; update)`
    CStyle {
        init: Option<Box<Statement>>,
        condition: Option<Box<Expression>>,
        update: Option<Box<Expression>>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct ForExpression {
    pub kind: ForKind,
    pub body: BlockStatement,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct SwitchCase {
    pub values: Vec<Expression>,
    pub body: BlockStatement,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct SwitchExpression {
    pub subject: Box<Expression>,
    pub cases: Vec<SwitchCase>,
    pub default: Option<BlockStatement>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct TernaryExpression {
    pub condition: Box<Expression>,
    pub consequence: Box<Expression>,
    pub alternative: Box<Expression>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct RangeExpression {
    pub start: Box<Expression>,
    pub end: Box<Expression>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Serialize)]
pub struct TryExpression {
    pub body: BlockStatement,
    pub catch_param: Option<Identifier>,
    pub catch_body: Option<BlockStatement>,
    pub location: SourceLocation,
}
