//! Runtime values.
//!
//! Scalars are held inline. Arrays, hashes and struct instances are shared
//! through `Rc<RefCell<_>>` so that `a[0] = 1`, `push(a, x)` and `p.x = 2`
//! mutate the value every binding sees. Functions carry the [`EnvId`] of the
//! frame they were defined in, plus the hold that keeps that frame alive.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use victoria_ast::ast::{BlockStatement, Expression, Identifier, TypeAnnotation, TypedParameter};
use victoria_ast::location::SourceLocation;

use crate::environment::{EnvId, FrameHold};
use crate::eval::{EvalResult, Interpreter};

/// Signature shared by every built-in and every module-provided native.
pub type BuiltinFn = fn(&mut Interpreter, &[Object], &SourceLocation) -> EvalResult;

#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
    Str(String),
    Char(char),
    Byte(u8),
    Rune(char),
    Array(Rc<RefCell<Vec<Object>>>),
    Hash(Rc<RefCell<HashMap<HashKey, HashPair>>>),
    Function(Rc<Function>),
    Arrow(Rc<ArrowFunction>),
    Builtin(Builtin),
    Struct(Rc<StructDef>),
    Instance(Rc<RefCell<StructInstance>>),
    Enum(Rc<EnumDef>),
    EnumValue(EnumValue),
    Range(i64, i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectType {
    Integer,
    Float,
    Boolean,
    Null,
    String,
    Char,
    Byte,
    Rune,
    Array,
    Hash,
    Function,
    ArrowFunction,
    Builtin,
    Struct,
    StructInstance,
    Enum,
    EnumValue,
    Range,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ObjectType::Integer => "INTEGER",
            ObjectType::Float => "FLOAT",
            ObjectType::Boolean => "BOOLEAN",
            ObjectType::Null => "NULL",
            ObjectType::String => "STRING",
            ObjectType::Char => "CHAR",
            ObjectType::Byte => "BYTE",
            ObjectType::Rune => "RUNE",
            ObjectType::Array => "ARRAY",
            ObjectType::Hash => "HASH",
            ObjectType::Function => "FUNCTION",
            ObjectType::ArrowFunction => "ARROW_FUNCTION",
            ObjectType::Builtin => "BUILTIN",
            ObjectType::Struct => "STRUCT",
            ObjectType::StructInstance => "STRUCT_INSTANCE",
            ObjectType::Enum => "ENUM",
            ObjectType::EnumValue => "ENUM_VALUE",
            ObjectType::Range => "RANGE",
        };
        f.write_str(tag)
    }
}

/// A user function: `define name(params) -> ret { body }` or an anonymous `define(...)`.
#[derive(Debug)]
pub struct Function {
    pub name: Option<String>,
    pub parameters: Vec<Identifier>,
    pub typed_parameters: Option<Vec<TypedParameter>>,
    pub return_types: Vec<TypeAnnotation>,
    pub body: Rc<BlockStatement>,
    pub env: EnvId,
    /// Keeps `env` from being swept while this closure is alive.
    pub(crate) _hold: FrameHold,
}

impl Function {
    /// Name used in diagnostics.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

#[derive(Debug)]
pub struct ArrowFunction {
    pub parameters: Vec<Identifier>,
    pub body: Rc<Expression>,
    pub env: EnvId,
    /// Keeps `env` from being swept while this closure is alive.
    pub(crate) _hold: FrameHold,
}

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

#[derive(Debug)]
pub struct StructDef {
    pub name: String,
    /// Declaration order.
    pub fields: Vec<String>,
    pub methods: RefCell<HashMap<String, Rc<Function>>>,
}

#[derive(Debug)]
pub struct StructInstance {
    pub def: Rc<StructDef>,
    /// Holds exactly the fields declared on `def`.
    pub fields: HashMap<String, Object>,
}

#[derive(Debug)]
pub struct EnumDef {
    pub name: String,
    pub variants: Vec<(String, i64)>,
}

impl EnumDef {
    pub fn variant(&self, name: &str) -> Option<EnumValue> {
        self.variants
            .iter()
            .find(|(variant, _)| variant == name)
            .map(|(variant, value)| EnumValue {
                enum_name: Rc::from(self.name.as_str()),
                variant: Rc::from(variant.as_str()),
                value: *value,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub enum_name: Rc<str>,
    pub variant: Rc<str>,
    pub value: i64,
}

/// Map key: the value's type tag plus a 64-bit hash of its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub tag: ObjectType,
    pub value: u64,
}

#[derive(Debug, Clone)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

impl Object {
    pub fn str(s: impl Into<String>) -> Object {
        Object::Str(s.into())
    }

    pub fn array(items: Vec<Object>) -> Object {
        Object::Array(Rc::new(RefCell::new(items)))
    }

    pub fn hash(pairs: HashMap<HashKey, HashPair>) -> Object {
        Object::Hash(Rc::new(RefCell::new(pairs)))
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Object::Integer(_) => ObjectType::Integer,
            Object::Float(_) => ObjectType::Float,
            Object::Boolean(_) => ObjectType::Boolean,
            Object::Null => ObjectType::Null,
            Object::Str(_) => ObjectType::String,
            Object::Char(_) => ObjectType::Char,
            Object::Byte(_) => ObjectType::Byte,
            Object::Rune(_) => ObjectType::Rune,
            Object::Array(_) => ObjectType::Array,
            Object::Hash(_) => ObjectType::Hash,
            Object::Function(_) => ObjectType::Function,
            Object::Arrow(_) => ObjectType::ArrowFunction,
            Object::Builtin(_) => ObjectType::Builtin,
            Object::Struct(_) => ObjectType::Struct,
            Object::Instance(_) => ObjectType::StructInstance,
            Object::Enum(_) => ObjectType::Enum,
            Object::EnumValue(_) => ObjectType::EnumValue,
            Object::Range(..) => ObjectType::Range,
        }
    }

    /// Uppercase tag used in operator diagnostics (`INTEGER`, `STRING`, ...).
    pub fn type_tag(&self) -> String {
        self.object_type().to_string()
    }

    /// The name a type annotation would use for this value: `int`, `string`,
    /// the struct name for an instance, the enum name for an enum value.
    pub fn type_name(&self) -> String {
        match self {
            Object::Integer(_) => "int".into(),
            Object::Float(_) => "float".into(),
            Object::Boolean(_) => "bool".into(),
            Object::Null => "null".into(),
            Object::Str(_) => "string".into(),
            Object::Char(_) => "char".into(),
            Object::Byte(_) => "byte".into(),
            Object::Rune(_) => "rune".into(),
            Object::Array(_) => "array".into(),
            Object::Hash(_) => "map".into(),
            Object::Function(_) | Object::Arrow(_) => "function".into(),
            Object::Builtin(_) => "builtin".into(),
            Object::Struct(_) => "struct".into(),
            Object::Instance(inst) => inst.borrow().def.name.clone(),
            Object::Enum(_) => "enum".into(),
            Object::EnumValue(v) => v.enum_name.to_string(),
            Object::Range(..) => "range".into(),
        }
    }

    /// Null, `false`, zero, and empty strings and collections are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Object::Null => false,
            Object::Boolean(b) => *b,
            Object::Integer(i) => *i != 0,
            Object::Float(f) => *f != 0.0,
            Object::Str(s) => !s.is_empty(),
            Object::Array(items) => !items.borrow().is_empty(),
            Object::Hash(pairs) => !pairs.borrow().is_empty(),
            _ => true,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Object::Null)
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Object::Function(_) | Object::Arrow(_) | Object::Builtin(_)
        )
    }

    /// `None` for values that cannot be map keys.
    pub fn hash_key(&self) -> Option<HashKey> {
        let value = match self {
            Object::Integer(i) => *i as u64,
            Object::Boolean(b) => u64::from(*b),
            Object::Str(s) => fnv1a(s.as_bytes()),
            Object::Char(c) | Object::Rune(c) => u64::from(*c),
            Object::Byte(b) => u64::from(*b),
            Object::EnumValue(v) => {
                fnv1a(format!("{}.{}", v.enum_name, v.variant).as_bytes())
            }
            _ => return None,
        };
        Some(HashKey {
            tag: self.object_type(),
            value,
        })
    }

    /// Equality as `==` sees it. `None` means the pair is not comparable.
    pub fn equals(&self, other: &Object) -> Option<bool> {
        self.equals_on_path(other, &mut Vec::new())
    }

    /// `path` holds the container pairs currently being compared. Meeting a
    /// pair again means a cycle that has matched so far, which counts as equal.
    fn equals_on_path(&self, other: &Object, path: &mut Vec<(usize, usize)>) -> Option<bool> {
        use Object::*;
        let eq = match (self, other) {
            (Null, Null) => true,
            (Null, _) | (_, Null) => false,
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Integer(a), Float(b)) | (Float(b), Integer(a)) => (*a as f64) == *b,
            (Boolean(a), Boolean(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (Char(a), Char(b)) | (Rune(a), Rune(b)) => a == b,
            (Char(c), Str(s)) | (Str(s), Char(c)) => {
                let mut chars = s.chars();
                chars.next() == Some(*c) && chars.next().is_none()
            }
            (Byte(a), Byte(b)) => a == b,
            (EnumValue(a), EnumValue(b)) => a == b,
            (Range(a, b), Range(c, d)) => a == c && b == d,
            (Array(a), Array(b)) => {
                let pair = (address(a), address(b));
                if Rc::ptr_eq(a, b) || path.contains(&pair) {
                    return Some(true);
                }
                path.push(pair);
                let (a, b) = (a.borrow(), b.borrow());
                let eq = a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(x, y)| x.equals_on_path(y, path).unwrap_or(false));
                path.pop();
                eq
            }
            (Hash(a), Hash(b)) => {
                let pair = (address(a), address(b));
                if Rc::ptr_eq(a, b) || path.contains(&pair) {
                    return Some(true);
                }
                path.push(pair);
                let (a, b) = (a.borrow(), b.borrow());
                let eq = a.len() == b.len()
                    && a.iter().all(|(key, pair)| {
                        b.get(key)
                            .map(|other| {
                                pair.value.equals_on_path(&other.value, path).unwrap_or(false)
                            })
                            .unwrap_or(false)
                    });
                path.pop();
                eq
            }
            (Instance(a), Instance(b)) => {
                let pair = (address(a), address(b));
                if Rc::ptr_eq(a, b) || path.contains(&pair) {
                    return Some(true);
                }
                path.push(pair);
                let (a, b) = (a.borrow(), b.borrow());
                let eq = Rc::ptr_eq(&a.def, &b.def)
                    && a.fields.iter().all(|(name, value)| {
                        b.fields
                            .get(name)
                            .map(|other| value.equals_on_path(other, path).unwrap_or(false))
                            .unwrap_or(false)
                    });
                path.pop();
                eq
            }
            (Function(a), Function(b)) => Rc::ptr_eq(a, b),
            (Arrow(a), Arrow(b)) => Rc::ptr_eq(a, b),
            (Builtin(a), Builtin(b)) => a.name == b.name,
            (Struct(a), Struct(b)) => Rc::ptr_eq(a, b),
            (Enum(a), Enum(b)) => Rc::ptr_eq(a, b),
            _ => return None,
        };
        Some(eq)
    }

    /// Form used inside collections: strings and chars are quoted.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = self.write_to(&mut out, true, &mut Vec::new());
        out
    }

    /// Shared body of Display and `repr`. `path` holds the containers being
    /// printed; one met again is a cycle and prints as `[...]`, `{...}` or
    /// `Name {...}`.
    fn write_to(&self, out: &mut impl fmt::Write, quoted: bool, path: &mut Vec<usize>) -> fmt::Result {
        match self {
            Object::Str(s) if quoted => write!(out, "{s:?}"),
            Object::Char(c) | Object::Rune(c) if quoted => write!(out, "{c:?}"),
            Object::Str(s) => out.write_str(s),
            Object::Char(c) | Object::Rune(c) => write!(out, "{c}"),
            Object::Integer(i) => write!(out, "{i}"),
            Object::Float(x) => out.write_str(&format_float(*x)),
            Object::Boolean(b) => write!(out, "{b}"),
            Object::Null => out.write_str("null"),
            Object::Byte(b) => write!(out, "{b}"),
            Object::Array(items) => {
                let addr = address(items);
                if path.contains(&addr) {
                    return out.write_str("[...]");
                }
                path.push(addr);
                out.write_str("[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        out.write_str(", ")?;
                    }
                    item.write_to(out, true, path)?;
                }
                path.pop();
                out.write_str("]")
            }
            Object::Hash(pairs) => {
                let addr = address(pairs);
                if path.contains(&addr) {
                    return out.write_str("{...}");
                }
                path.push(addr);
                // Sorted so output does not depend on hash order
                let mut entries = Vec::new();
                for pair in pairs.borrow().values() {
                    let mut entry = pair.key.repr();
                    entry.push_str(": ");
                    pair.value.write_to(&mut entry, true, path)?;
                    entries.push(entry);
                }
                entries.sort();
                path.pop();
                write!(out, "{{{}}}", entries.join(", "))
            }
            Object::Instance(inst) => {
                let addr = address(inst);
                let inst = inst.borrow();
                if path.contains(&addr) {
                    return write!(out, "{} {{...}}", inst.def.name);
                }
                path.push(addr);
                write!(out, "{} {{", inst.def.name)?;
                for (i, name) in inst.def.fields.iter().enumerate() {
                    if i > 0 {
                        out.write_str(", ")?;
                    }
                    write!(out, "{name}: ")?;
                    match inst.fields.get(name) {
                        Some(value) => value.write_to(out, true, path)?,
                        None => out.write_str("null")?,
                    }
                }
                path.pop();
                out.write_str("}")
            }
            Object::Function(func) => {
                write!(out, "<fn {}", func.display_name())?;
                write_params(out, &func.parameters)?;
                out.write_str(">")
            }
            Object::Arrow(arrow) => {
                out.write_str("<arrow")?;
                write_params(out, &arrow.parameters)?;
                out.write_str(">")
            }
            Object::Builtin(b) => write!(out, "<builtin {}>", b.name),
            Object::Struct(def) => write!(out, "<struct {}>", def.name),
            Object::Enum(def) => write!(out, "<enum {}>", def.name),
            Object::EnumValue(v) => write!(out, "{}.{}", v.enum_name, v.variant),
            Object::Range(start, end) => write!(out, "{start}..{end}"),
        }
    }
}

/// Identity of a shared container, for cycle detection.
fn address<T>(rc: &Rc<T>) -> usize {
    Rc::as_ptr(rc) as *const () as usize
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{f:.1}")
    } else {
        format!("{f}")
    }
}

fn write_params(out: &mut impl fmt::Write, params: &[Identifier]) -> fmt::Result {
    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    write!(out, "({})", names.join(", "))
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, false, &mut Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_of(pairs: Vec<(Object, Object)>) -> Object {
        let mut map = HashMap::new();
        for (key, value) in pairs {
            let hk = key.hash_key().unwrap();
            map.insert(hk, HashPair { key, value });
        }
        Object::hash(map)
    }

    #[test]
    fn equal_values_share_hash_keys() {
        assert_eq!(Object::str("name").hash_key(), Object::str("name").hash_key());
        assert_eq!(Object::Integer(7).hash_key(), Object::Integer(7).hash_key());
        assert_ne!(Object::str("a").hash_key(), Object::str("b").hash_key());
        // same payload, different tag
        assert_ne!(Object::Integer(1).hash_key(), Object::Boolean(true).hash_key());
        assert_ne!(Object::Char('a').hash_key(), Object::Rune('a').hash_key());
    }

    #[test]
    fn collections_and_functions_are_not_hashable() {
        assert!(Object::array(vec![]).hash_key().is_none());
        assert!(Object::Null.hash_key().is_none());
        assert!(Object::Float(1.5).hash_key().is_none());
    }

    #[test]
    fn truthiness() {
        for falsy in [
            Object::Null,
            Object::Boolean(false),
            Object::Integer(0),
            Object::Float(0.0),
            Object::str(""),
            Object::array(vec![]),
            hash_of(vec![]),
        ] {
            assert!(!falsy.is_truthy(), "{falsy:?} should be falsy");
        }
        for truthy in [
            Object::Boolean(true),
            Object::Integer(-1),
            Object::str("0"),
            Object::array(vec![Object::Null]),
            Object::Range(0, 0),
        ] {
            assert!(truthy.is_truthy(), "{truthy:?} should be truthy");
        }
    }

    #[test]
    fn equality_across_types() {
        assert_eq!(Object::Integer(2).equals(&Object::Float(2.0)), Some(true));
        assert_eq!(Object::Char('x').equals(&Object::str("x")), Some(true));
        assert_eq!(Object::Char('x').equals(&Object::str("xy")), Some(false));
        assert_eq!(Object::Null.equals(&Object::Integer(0)), Some(false));
        assert_eq!(Object::Integer(1).equals(&Object::str("1")), None);
        let a = Object::array(vec![Object::Integer(1), Object::str("a")]);
        let b = Object::array(vec![Object::Integer(1), Object::str("a")]);
        assert_eq!(a.equals(&b), Some(true));
    }

    #[test]
    fn display_forms() {
        assert_eq!(Object::Float(3.0).to_string(), "3.0");
        assert_eq!(Object::Float(2.5).to_string(), "2.5");
        assert_eq!(Object::str("hi").to_string(), "hi");
        let arr = Object::array(vec![Object::Integer(1), Object::str("a"), Object::Char('c')]);
        assert_eq!(arr.to_string(), r#"[1, "a", 'c']"#);
        let h = hash_of(vec![
            (Object::str("b"), Object::Integer(2)),
            (Object::str("a"), Object::Integer(1)),
        ]);
        assert_eq!(h.to_string(), r#"{"a": 1, "b": 2}"#);
        assert_eq!(Object::Range(1, 4).to_string(), "1..4");
    }

    fn self_containing_array() -> Object {
        let arr = Object::array(vec![Object::Integer(1)]);
        if let Object::Array(items) = &arr {
            items.borrow_mut().push(arr.clone());
        }
        arr
    }

    #[test]
    fn cycles_print_as_ellipses() {
        let arr = self_containing_array();
        assert_eq!(arr.to_string(), "[1, [...]]");
        assert_eq!(arr.repr(), "[1, [...]]");

        let h = hash_of(vec![(Object::str("n"), Object::Integer(1))]);
        if let Object::Hash(pairs) = &h {
            let key = Object::str("me");
            let hk = key.hash_key().unwrap();
            pairs.borrow_mut().insert(hk, HashPair { key, value: h.clone() });
        }
        assert_eq!(h.to_string(), r#"{"me": {...}, "n": 1}"#);

        // shared but acyclic values print in full every time
        let inner = Object::array(vec![Object::Integer(2)]);
        let twice = Object::array(vec![inner.clone(), inner]);
        assert_eq!(twice.to_string(), "[[2], [2]]");
    }

    #[test]
    fn cyclic_values_compare_without_looping() {
        let a = self_containing_array();
        let b = self_containing_array();
        assert_eq!(a.equals(&a), Some(true));
        assert_eq!(a.equals(&b), Some(true));
        let plain = Object::array(vec![Object::Integer(1), Object::array(vec![])]);
        assert_eq!(a.equals(&plain), Some(false));
    }

    #[test]
    fn type_names_and_tags() {
        assert_eq!(Object::Integer(1).type_tag(), "INTEGER");
        assert_eq!(Object::str("").type_tag(), "STRING");
        assert_eq!(Object::str("").type_name(), "string");
        assert_eq!(hash_of(vec![]).type_name(), "map");
    }

    #[test]
    fn fnv_matches_reference_vectors() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }
}
