use crate::diagnostic::DiagnosticKind;
use serde::{Serialize, Serializer};

/// Every diagnostic Victoria can report, keyed by its stable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // ============================================================
    // Runtime errors (E0001-E0021)
    // ============================================================
    TypeMismatch,
    UndefinedVariable,
    UnknownOperator,
    UnexpectedToken,
    NotAFunction,
    IndexOutOfBounds,
    DivisionByZero,
    PropertyNotFound,
    StructNotFound,
    InvalidArgument,
    Slice,
    Spread,
    HashKey,
    ArgumentType,
    NotIterable,
    Range,
    Conversion,
    Assignment,
    Operator,
    MemberAccess,
    ModuleNotFound,

    // ============================================================
    // Type annotations (E0030-E0038)
    // ============================================================
    TypeAnnotationMismatch,
    VariableTypeMismatch,
    ParameterTypeMismatch,
    ReturnTypeMismatch,
    InvalidTypeAnnotation,
    TypeAnnotationRequired,
    ArrayTypeMismatch,
    VoidReturn,
    MissingReturn,

    // ============================================================
    // Data structures and algorithms (E0040-E0050)
    // ============================================================
    RecursionDepth,
    OffByOne,
    EmptyCollection,
    BinarySearch,
    GraphCycle,
    SortedArrayRequired,
    NegativeIndex,
    ConstantReassignment,
    EnumValue,
    CharacterConversion,
    MakeDirective,

    // ============================================================
    // Lexer and parser (E0100-E0104)
    // ============================================================
    ParseError,
    IllegalCharacter,
    UnterminatedString,
    InvalidIntegerLiteral,
    InvalidFloatLiteral,

    // ============================================================
    // Advisory
    // ============================================================
    InfiniteLoop,
    TimeComplexity,
    IntegerOverflow,
    ComparisonWithNull,
    ModuloWithNegative,
    MemoizationSuggestion,
}

impl ErrorCode {
    /// The printed code, e.g. `E0007`.
    pub fn as_str(self) -> &'static str {
        use ErrorCode::*;
        match self {
            TypeMismatch => "E0001",
            UndefinedVariable => "E0002",
            UnknownOperator => "E0003",
            UnexpectedToken => "E0004",
            NotAFunction => "E0005",
            IndexOutOfBounds => "E0006",
            DivisionByZero => "E0007",
            PropertyNotFound => "E0008",
            StructNotFound => "E0009",
            InvalidArgument => "E0010",
            Slice => "E0011",
            Spread => "E0012",
            HashKey => "E0013",
            ArgumentType => "E0014",
            NotIterable => "E0015",
            Range => "E0016",
            Conversion => "E0017",
            Assignment => "E0018",
            Operator => "E0019",
            MemberAccess => "E0020",
            ModuleNotFound => "E0021",
            TypeAnnotationMismatch => "E0030",
            VariableTypeMismatch => "E0031",
            ParameterTypeMismatch => "E0032",
            ReturnTypeMismatch => "E0033",
            InvalidTypeAnnotation => "E0034",
            TypeAnnotationRequired => "E0035",
            ArrayTypeMismatch => "E0036",
            VoidReturn => "E0037",
            MissingReturn => "E0038",
            RecursionDepth => "E0040",
            OffByOne => "E0041",
            EmptyCollection => "E0042",
            BinarySearch => "E0043",
            GraphCycle => "E0044",
            SortedArrayRequired => "E0045",
            NegativeIndex => "E0046",
            ConstantReassignment => "E0047",
            EnumValue => "E0048",
            CharacterConversion => "E0049",
            MakeDirective => "E0050",
            ParseError => "E0100",
            IllegalCharacter => "E0101",
            UnterminatedString => "E0102",
            InvalidIntegerLiteral => "E0103",
            InvalidFloatLiteral => "E0104",
            InfiniteLoop => "W0001",
            TimeComplexity => "W0002",
            IntegerOverflow => "W0003",
            ComparisonWithNull => "W0004",
            ModuloWithNegative => "W0005",
            MemoizationSuggestion => "N0001",
        }
    }

    pub fn kind(self) -> DiagnosticKind {
        use ErrorCode::*;
        match self {
            InfiniteLoop | TimeComplexity | IntegerOverflow | ComparisonWithNull
            | ModuloWithNegative => DiagnosticKind::Warning,
            MemoizationSuggestion => DiagnosticKind::Note,
            _ => DiagnosticKind::Error,
        }
    }

    /// Short name of the category, used by the plain renderer's index.
    pub fn title(self) -> &'static str {
        use ErrorCode::*;
        match self {
            TypeMismatch => "type mismatch",
            UndefinedVariable => "undefined variable",
            UnknownOperator => "unknown operator",
            UnexpectedToken => "unexpected token",
            NotAFunction => "not a function",
            IndexOutOfBounds => "index out of bounds",
            DivisionByZero => "division by zero",
            PropertyNotFound => "property not found",
            StructNotFound => "struct not found",
            InvalidArgument => "invalid argument",
            Slice => "invalid slice",
            Spread => "invalid spread",
            HashKey => "unusable map key",
            ArgumentType => "argument type",
            NotIterable => "not iterable",
            Range => "invalid range",
            Conversion => "conversion failed",
            Assignment => "invalid assignment",
            Operator => "invalid operator use",
            MemberAccess => "invalid member access",
            ModuleNotFound => "module not found",
            TypeAnnotationMismatch => "type annotation mismatch",
            VariableTypeMismatch => "variable type mismatch",
            ParameterTypeMismatch => "parameter type mismatch",
            ReturnTypeMismatch => "return type mismatch",
            InvalidTypeAnnotation => "invalid type annotation",
            TypeAnnotationRequired => "type annotation required",
            ArrayTypeMismatch => "array element type mismatch",
            VoidReturn => "value returned from void function",
            MissingReturn => "missing return value",
            RecursionDepth => "recursion too deep",
            OffByOne => "off-by-one",
            EmptyCollection => "empty collection",
            BinarySearch => "binary search misuse",
            GraphCycle => "graph cycle",
            SortedArrayRequired => "sorted array required",
            NegativeIndex => "negative index",
            ConstantReassignment => "constant reassignment",
            EnumValue => "unknown enum variant",
            CharacterConversion => "character conversion",
            MakeDirective => "invalid make directive",
            ParseError => "parse error",
            IllegalCharacter => "illegal character",
            UnterminatedString => "unterminated string",
            InvalidIntegerLiteral => "invalid integer literal",
            InvalidFloatLiteral => "invalid float literal",
            InfiniteLoop => "possible infinite loop",
            TimeComplexity => "high time complexity",
            IntegerOverflow => "integer overflow",
            ComparisonWithNull => "comparison with null",
            ModuloWithNegative => "modulo with negative operand",
            MemoizationSuggestion => "memoization opportunity",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
