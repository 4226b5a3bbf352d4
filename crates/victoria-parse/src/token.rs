#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // errors / eof
    Illegal,
    UnterminatedString,
    Eof,
    // literals
    Ident,
    Int,
    Float,
    Str,
    // assignment
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    // arithmetic
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    Increment,
    Decrement,
    // comparison
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    NotEq,
    // logical; `and`, `or`, `not` lex to these too
    And,
    Or,
    Bang,
    // punctuation
    FatArrow, // =>
    Arrow,    // ->
    Range,    // ..
    Spread,   // ...
    Dot,
    Comma,
    Semicolon,
    Colon,
    Question,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    // keywords
    Let,
    Const,
    Define,
    If,
    Else,
    Return,
    True,
    False,
    While,
    For,
    In,
    Break,
    Continue,
    Switch,
    Case,
    Default,
    Try,
    Catch,
    Struct,
    Enum,
    Include,
    // type keywords
    TypeInt,
    TypeFloat,
    TypeString,
    TypeBool,
    TypeChar,
    TypeByte,
    TypeRune,
    TypeArray,
    TypeMap,
    TypeAny,
    TypeVoid,
}

impl TokenKind {
    /// Keyword table; anything else that looks like a name is `Ident`.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        use TokenKind::*;
        let kind = match word {
            "let" => Let,
            "const" => Const,
            "define" => Define,
            "if" => If,
            "else" => Else,
            "return" => Return,
            "true" => True,
            "false" => False,
            "while" => While,
            "for" => For,
            "in" => In,
            "break" => Break,
            "continue" => Continue,
            "switch" => Switch,
            "case" => Case,
            "default" => Default,
            "try" => Try,
            "catch" => Catch,
            "struct" => Struct,
            "enum" => Enum,
            "include" => Include,
            "and" => And,
            "or" => Or,
            "not" => Bang,
            "int" => TypeInt,
            "float" => TypeFloat,
            "string" => TypeString,
            "bool" => TypeBool,
            "char" => TypeChar,
            "byte" => TypeByte,
            "rune" => TypeRune,
            "array" => TypeArray,
            "map" => TypeMap,
            "any" => TypeAny,
            "void" => TypeVoid,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_type_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            TypeInt
                | TypeFloat
                | TypeString
                | TypeBool
                | TypeChar
                | TypeByte
                | TypeRune
                | TypeArray
                | TypeMap
                | TypeAny
                | TypeVoid
        )
    }

    /// How the kind reads in an "expected ..." message.
    pub fn as_str(self) -> &'static str {
        use TokenKind::*;
        match self {
            Illegal => "illegal character",
            UnterminatedString => "unterminated string",
            Eof => "end of input",
            Ident => "identifier",
            Int => "integer",
            Float => "float",
            Str => "string",
            Assign => "=",
            PlusAssign => "+=",
            MinusAssign => "-=",
            StarAssign => "*=",
            SlashAssign => "/=",
            PercentAssign => "%=",
            Plus => "+",
            Minus => "-",
            Asterisk => "*",
            Slash => "/",
            Percent => "%",
            Increment => "++",
            Decrement => "--",
            Lt => "<",
            Gt => ">",
            Le => "<=",
            Ge => ">=",
            Eq => "==",
            NotEq => "!=",
            And => "&&",
            Or => "||",
            Bang => "!",
            FatArrow => "=>",
            Arrow => "->",
            Range => "..",
            Spread => "...",
            Dot => ".",
            Comma => ",",
            Semicolon => ";",
            Colon => ":",
            Question => "?",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Let => "let",
            Const => "const",
            Define => "define",
            If => "if",
            Else => "else",
            Return => "return",
            True => "true",
            False => "false",
            While => "while",
            For => "for",
            In => "in",
            Break => "break",
            Continue => "continue",
            Switch => "switch",
            Case => "case",
            Default => "default",
            Try => "try",
            Catch => "catch",
            Struct => "struct",
            Enum => "enum",
            Include => "include",
            TypeInt => "int",
            TypeFloat => "float",
            TypeString => "string",
            TypeBool => "bool",
            TypeChar => "char",
            TypeByte => "byte",
            TypeRune => "rune",
            TypeArray => "array",
            TypeMap => "map",
            TypeAny => "any",
            TypeVoid => "void",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text; for strings, the unescaped contents.
    pub literal: String,
    pub line: usize,
    pub column: usize,
    /// Exclusive.
    pub end_column: usize,
}

impl Token {
    /// The token as it should appear in a "found ..." message.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Str => format!("\"{}\"", self.literal),
            _ => self.literal.clone(),
        }
    }
}
