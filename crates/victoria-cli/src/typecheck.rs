//! Runtime checks for optional type annotations.

use victoria_ast::ast::TypeAnnotation;

use crate::object::Object;

/// Base names an annotation may use without a struct or enum declaring them.
pub const BASE_TYPES: &[&str] = &[
    "int", "float", "string", "bool", "char", "byte", "rune", "array", "map", "any", "void",
];

pub fn is_base_type(name: &str) -> bool {
    BASE_TYPES.contains(&name)
}

/// Whether `obj` satisfies `annotation`. No annotation, and `any`, accept
/// everything. Map annotations check only that the value is a map.
pub fn check_type(obj: &Object, annotation: Option<&TypeAnnotation>) -> bool {
    let Some(annotation) = annotation else {
        return true;
    };
    if annotation.is_any() {
        return true;
    }
    if annotation.is_array {
        let Object::Array(items) = obj else {
            return false;
        };
        return match annotation.element.as_deref() {
            Some(element) => items
                .borrow()
                .iter()
                .all(|item| check_type(item, Some(element))),
            None => true,
        };
    }
    if annotation.is_map() {
        return matches!(obj, Object::Hash(_));
    }
    check_named(obj, &annotation.name)
}

fn check_named(obj: &Object, name: &str) -> bool {
    match name {
        "any" => true,
        "int" => matches!(obj, Object::Integer(_)),
        "float" => matches!(obj, Object::Float(_) | Object::Integer(_)),
        "string" => matches!(obj, Object::Str(_)),
        "bool" => matches!(obj, Object::Boolean(_)),
        "char" => match obj {
            Object::Char(_) => true,
            Object::Str(s) => s.chars().count() == 1,
            _ => false,
        },
        "byte" => matches!(obj, Object::Byte(_)),
        "rune" => matches!(obj, Object::Rune(_) | Object::Char(_) | Object::Integer(_)),
        "array" => matches!(obj, Object::Array(_)),
        "map" => matches!(obj, Object::Hash(_)),
        "void" => matches!(obj, Object::Null),
        custom => match obj {
            Object::Instance(inst) => inst.borrow().def.name == custom,
            Object::EnumValue(value) => &*value.enum_name == custom,
            _ => false,
        },
    }
}

/// Position of the first array element that fails `element`, for reporting.
pub fn first_mismatched_element(obj: &Object, annotation: &TypeAnnotation) -> Option<(usize, Object)> {
    let (Object::Array(items), Some(element)) = (obj, annotation.element.as_deref()) else {
        return None;
    };
    let items = items.borrow();
    items
        .iter()
        .position(|item| !check_type(item, Some(element)))
        .map(|index| (index, items[index].clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{EnumValue, StructDef, StructInstance};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use victoria_ast::location::SourceLocation;

    fn named(name: &str) -> TypeAnnotation {
        TypeAnnotation::named(name, SourceLocation::unknown())
    }

    fn array_of(name: &str) -> TypeAnnotation {
        TypeAnnotation::array_of(named(name), SourceLocation::unknown())
    }

    fn ok(obj: &Object, ann: &TypeAnnotation) -> bool {
        check_type(obj, Some(ann))
    }

    #[test]
    fn missing_and_any_accept_everything() {
        for obj in [Object::Null, Object::Integer(1), Object::str("s")] {
            assert!(check_type(&obj, None));
            assert!(ok(&obj, &named("any")));
        }
    }

    #[test]
    fn base_names() {
        assert!(ok(&Object::Integer(1), &named("int")));
        assert!(!ok(&Object::Float(1.0), &named("int")));
        assert!(ok(&Object::Integer(1), &named("float")));
        assert!(ok(&Object::Float(1.5), &named("float")));
        assert!(ok(&Object::str("a"), &named("char")));
        assert!(!ok(&Object::str("ab"), &named("char")));
        assert!(ok(&Object::Char('a'), &named("rune")));
        assert!(ok(&Object::Integer(97), &named("rune")));
        assert!(!ok(&Object::Integer(97), &named("byte")));
        assert!(ok(&Object::Null, &named("void")));
        assert!(!ok(&Object::Integer(0), &named("void")));
        assert!(!ok(&Object::str("true"), &named("bool")));
    }

    #[test]
    fn arrays_check_every_element() {
        let ints = Object::array(vec![Object::Integer(1), Object::Integer(2)]);
        let mixed = Object::array(vec![Object::Integer(1), Object::str("x")]);
        assert!(ok(&ints, &array_of("int")));
        assert!(!ok(&mixed, &array_of("int")));
        assert!(ok(&mixed, &named("array")));
        assert!(ok(&Object::array(vec![]), &array_of("string")));
        let (index, bad) = first_mismatched_element(&mixed, &array_of("int")).unwrap();
        assert_eq!(index, 1);
        assert_eq!(bad.type_name(), "string");
    }

    #[test]
    fn map_check_is_shallow() {
        let ann = TypeAnnotation::map_of(named("string"), named("int"), SourceLocation::unknown());
        assert!(ok(&Object::hash(HashMap::new()), &ann));
        assert!(!ok(&Object::array(vec![]), &ann));
    }

    #[test]
    fn custom_names_match_structs_and_enums() {
        let def = Rc::new(StructDef {
            name: "Point".into(),
            fields: vec![],
            methods: RefCell::new(HashMap::new()),
        });
        let p = Object::Instance(Rc::new(RefCell::new(StructInstance {
            def,
            fields: HashMap::new(),
        })));
        assert!(ok(&p, &named("Point")));
        assert!(!ok(&p, &named("Line")));
        let red = Object::EnumValue(EnumValue {
            enum_name: Rc::from("Color"),
            variant: Rc::from("Red"),
            value: 0,
        });
        assert!(ok(&red, &named("Color")));
        assert!(!ok(&Object::Integer(0), &named("Color")));
    }

    #[test]
    fn checks_are_deterministic() {
        let obj = Object::array(vec![Object::Float(1.0)]);
        let ann = array_of("float");
        let first = ok(&obj, &ann);
        assert!((0..5).all(|_| ok(&obj, &ann) == first));
    }
}
