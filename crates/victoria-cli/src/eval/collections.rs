//! Arrays, hashes, structs: literals, indexing, slicing, member access and
//! the assignable places built from them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use victoria_ast::ast::{
    ArrayLiteral, AssignExpression, Expression, HashLiteral, IndexExpression, MemberExpression,
    SliceExpression, StructInstantiation,
};
use victoria_ast::location::SourceLocation;
use victoria_diagnostics::catalog;

use super::{ControlFlow, EvalResult, Interpreter};
use crate::environment::EnvId;
use crate::object::{HashPair, Object, StructInstance};

/// Something an assignment, `++` or `--` can write to.
pub(super) enum Place {
    Name(String, SourceLocation),
    Index(Object, Object, SourceLocation),
    Field(Object, String, SourceLocation),
}

/// `index` as a position into a sequence of `len` items.
fn checked_position(index: i64, len: usize, loc: &SourceLocation) -> Result<usize, ControlFlow> {
    if index < 0 {
        return Err(catalog::negative_index(index, loc.clone()).into());
    }
    let position = index as usize;
    if position >= len {
        return Err(catalog::index_out_of_bounds(index, len, loc.clone()).into());
    }
    Ok(position)
}

fn describe_target(target: &Expression) -> &'static str {
    match target {
        Expression::Integer(_)
        | Expression::Float(_)
        | Expression::Str(_)
        | Expression::Boolean(_) => "literal",
        Expression::Call(_) => "function call",
        Expression::Slice(_) => "slice",
        _ => "expression",
    }
}

impl Interpreter {
    pub(super) fn spread_into(
        &self,
        out: &mut Vec<Object>,
        value: Object,
        loc: &SourceLocation,
    ) -> Result<(), ControlFlow> {
        match value {
            Object::Array(items) => {
                out.extend(items.borrow().iter().cloned());
                Ok(())
            }
            other => Err(catalog::spread_error(&other.type_tag(), loc.clone()).into()),
        }
    }

    pub(super) fn eval_array_literal(&mut self, a: &ArrayLiteral, env: EnvId) -> EvalResult {
        let mut items = Vec::with_capacity(a.elements.len());
        for element in &a.elements {
            match element {
                Expression::Spread(spread) => {
                    let value = self.eval_expression(&spread.value, env)?;
                    self.spread_into(&mut items, value, &spread.location)?;
                }
                _ => items.push(self.eval_expression(element, env)?),
            }
        }
        Ok(Object::array(items))
    }

    pub(super) fn eval_hash_literal(&mut self, h: &HashLiteral, env: EnvId) -> EvalResult {
        let mut pairs = HashMap::with_capacity(h.pairs.len());
        for (key_expr, value_expr) in &h.pairs {
            let key = self.eval_expression(key_expr, env)?;
            let Some(hash_key) = key.hash_key() else {
                return Err(
                    catalog::hash_key_error(&key.type_tag(), key_expr.location().clone()).into(),
                );
            };
            let value = self.eval_expression(value_expr, env)?;
            pairs.insert(hash_key, HashPair { key, value });
        }
        Ok(Object::hash(pairs))
    }

    pub(super) fn eval_index_expression(&mut self, e: &IndexExpression, env: EnvId) -> EvalResult {
        let container = self.eval_expression(&e.left, env)?;
        let index = self.eval_expression(&e.index, env)?;
        index_into(&container, &index, &e.location)
    }

    pub(super) fn eval_slice(&mut self, e: &SliceExpression, env: EnvId) -> EvalResult {
        let container = self.eval_expression(&e.left, env)?;
        let start = match &e.start {
            Some(expr) => Some(self.eval_expression(expr, env)?),
            None => None,
        };
        let end = match &e.end {
            Some(expr) => Some(self.eval_expression(expr, env)?),
            None => None,
        };
        let len = match &container {
            Object::Array(items) => items.borrow().len(),
            Object::Str(s) => s.chars().count(),
            other => {
                let detail = format!("cannot slice a value of type {}", other.type_tag());
                return Err(catalog::slice_error(&detail, e.location.clone()).into());
            }
        };
        let bound = |value: Option<Object>, default: usize| -> Result<usize, ControlFlow> {
            match value {
                None => Ok(default),
                Some(Object::Integer(i)) => Ok(i.clamp(0, len as i64) as usize),
                Some(other) => {
                    let detail = format!("slice bounds must be integers, got {}", other.type_tag());
                    Err(catalog::slice_error(&detail, e.location.clone()).into())
                }
            }
        };
        let start = bound(start, 0)?;
        let end = bound(end, len)?.max(start);
        match &container {
            Object::Array(items) => Ok(Object::array(items.borrow()[start..end].to_vec())),
            Object::Str(s) => Ok(Object::Str(s.chars().skip(start).take(end - start).collect())),
            _ => Ok(Object::Null),
        }
    }

    pub(super) fn eval_member(&mut self, m: &MemberExpression, env: EnvId) -> EvalResult {
        let object = self.eval_expression(&m.object, env)?;
        member_value(&object, &m.property.name, &m.location)
    }

    pub(super) fn eval_struct_instantiation(
        &mut self,
        s: &StructInstantiation,
        env: EnvId,
    ) -> EvalResult {
        let Some(Object::Struct(def)) = self.envs.get(env, &s.name.name) else {
            return Err(catalog::struct_not_found(&s.name.name, s.name.location.clone()).into());
        };
        let mut fields: HashMap<String, Object> = def
            .fields
            .iter()
            .map(|name| (name.clone(), Object::Null))
            .collect();
        for (field, value_expr) in &s.fields {
            if !fields.contains_key(&field.name) {
                return Err(
                    catalog::property_not_found(&field.name, &def.name, field.location.clone())
                        .into(),
                );
            }
            let value = self.eval_expression(value_expr, env)?;
            fields.insert(field.name.clone(), value);
        }
        Ok(Object::Instance(Rc::new(RefCell::new(StructInstance {
            def,
            fields,
        }))))
    }

    // ======= places =======

    /// Evaluates the container and key parts of `target`. `None` when the
    /// expression cannot be assigned to.
    pub(super) fn resolve_place(
        &mut self,
        target: &Expression,
        env: EnvId,
    ) -> Result<Option<Place>, ControlFlow> {
        let place = match target {
            Expression::Identifier(id) => Place::Name(id.name.clone(), id.location.clone()),
            Expression::Index(e) => {
                let container = self.eval_expression(&e.left, env)?;
                let index = self.eval_expression(&e.index, env)?;
                Place::Index(container, index, e.location.clone())
            }
            Expression::Member(m) => {
                let object = self.eval_expression(&m.object, env)?;
                Place::Field(object, m.property.name.clone(), m.location.clone())
            }
            _ => return Ok(None),
        };
        Ok(Some(place))
    }

    pub(super) fn read_place(&self, place: &Place, env: EnvId) -> EvalResult {
        match place {
            Place::Name(name, loc) => self.eval_identifier(name, loc, env),
            Place::Index(container, index, loc) => index_into(container, index, loc),
            Place::Field(object, field, loc) => member_value(object, field, loc),
        }
    }

    pub(super) fn write_place(&mut self, place: Place, value: Object, env: EnvId) -> Result<(), ControlFlow> {
        match place {
            Place::Name(name, loc) => {
                if self.envs.is_const(env, &name) {
                    return Err(catalog::constant_reassignment(&name, loc).into());
                }
                // assigning an unbound name defines it here
                if !self.envs.update(env, &name, value.clone()) {
                    self.envs.set(env, &name, value);
                }
                Ok(())
            }
            Place::Index(container, index, loc) => match &container {
                Object::Array(items) => {
                    let Object::Integer(i) = index else {
                        let detail = format!("array indices must be integers, got {}", index.type_tag());
                        return Err(catalog::operator_error("[]", &detail, loc).into());
                    };
                    let mut items = items.borrow_mut();
                    let position = checked_position(i, items.len(), &loc)?;
                    items[position] = value;
                    Ok(())
                }
                Object::Hash(pairs) => {
                    let Some(key) = index.hash_key() else {
                        return Err(catalog::hash_key_error(&index.type_tag(), loc).into());
                    };
                    pairs.borrow_mut().insert(key, HashPair { key: index, value });
                    Ok(())
                }
                Object::Str(_) => Err(catalog::assignment_error("string index", loc).into()),
                other => {
                    let target = format!("index of {}", other.type_tag());
                    Err(catalog::assignment_error(&target, loc).into())
                }
            },
            Place::Field(object, field, loc) => match &object {
                Object::Instance(inst) => {
                    let mut inst = inst.borrow_mut();
                    if !inst.fields.contains_key(&field) {
                        let struct_name = inst.def.name.clone();
                        return Err(catalog::property_not_found(&field, &struct_name, loc).into());
                    }
                    inst.fields.insert(field, value);
                    Ok(())
                }
                Object::Hash(pairs) => {
                    let key = Object::Str(field);
                    if let Some(hash_key) = key.hash_key() {
                        pairs.borrow_mut().insert(hash_key, HashPair { key, value });
                    }
                    Ok(())
                }
                other => Err(catalog::member_access_error(&other.type_tag(), &field, loc).into()),
            },
        }
    }

    pub(super) fn eval_assign(&mut self, e: &AssignExpression, env: EnvId) -> EvalResult {
        let Some(place) = self.resolve_place(&e.target, env)? else {
            return Err(
                catalog::assignment_error(describe_target(&e.target), e.location.clone()).into(),
            );
        };
        let value = match e.operator.binary() {
            Some(op) => {
                let current = self.read_place(&place, env)?;
                let rhs = self.eval_expression(&e.value, env)?;
                self.binary_op(op, &current, &rhs, &e.location)?
            }
            None => self.eval_expression(&e.value, env)?,
        };
        self.write_place(place, value.clone(), env)?;
        Ok(value)
    }

    /// Adds `delta` to the integer at `target`; returns the old and new values.
    pub(super) fn step_place(
        &mut self,
        target: &Expression,
        delta: i64,
        op: &str,
        env: EnvId,
    ) -> Result<(Object, Object), ControlFlow> {
        let Some(place) = self.resolve_place(target, env)? else {
            return Err(catalog::operator_error(
                op,
                "operand must be a variable, index or field",
                target.location().clone(),
            )
            .into());
        };
        let current = self.read_place(&place, env)?;
        let Object::Integer(old) = current else {
            return Err(
                catalog::unknown_operator(op, &current.type_tag(), target.location().clone()).into(),
            );
        };
        let new = match old.checked_add(delta) {
            Some(new) => new,
            None => {
                let sign = if delta > 0 { "+" } else { "-" };
                self.advise(catalog::integer_overflow(old, sign, 1, target.location().clone()));
                old.wrapping_add(delta)
            }
        };
        self.write_place(place, Object::Integer(new), env)?;
        Ok((Object::Integer(old), Object::Integer(new)))
    }
}

/// `container[index]` for arrays, strings, hashes and ranges.
pub(crate) fn index_into(container: &Object, index: &Object, loc: &SourceLocation) -> EvalResult {
    match (container, index) {
        (Object::Array(items), Object::Integer(i)) => {
            let items = items.borrow();
            let position = checked_position(*i, items.len(), loc)?;
            Ok(items[position].clone())
        }
        (Object::Str(s), Object::Integer(i)) => {
            let len = s.chars().count();
            let position = checked_position(*i, len, loc)?;
            Ok(s.chars().nth(position).map(Object::Char).unwrap_or(Object::Null))
        }
        (Object::Range(start, end), Object::Integer(i)) => {
            let len = start.abs_diff(*end) as usize;
            let position = checked_position(*i, len, loc)? as i64;
            Ok(Object::Integer(if start <= end {
                start + position
            } else {
                start - position
            }))
        }
        (Object::Hash(pairs), key) => {
            let Some(hash_key) = key.hash_key() else {
                return Err(catalog::hash_key_error(&key.type_tag(), loc.clone()).into());
            };
            let value = pairs
                .borrow()
                .get(&hash_key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Object::Null);
            Ok(value)
        }
        (Object::Array(_) | Object::Str(_) | Object::Range(..), other) => {
            let detail = format!("indices must be integers, got {}", other.type_tag());
            Err(catalog::operator_error("[]", &detail, loc.clone()).into())
        }
        (other, _) => {
            let detail = format!("cannot index a value of type {}", other.type_tag());
            Err(catalog::operator_error("[]", &detail, loc.clone()).into())
        }
    }
}

/// `object.name` outside of a call.
pub(crate) fn member_value(object: &Object, name: &str, loc: &SourceLocation) -> EvalResult {
    match object {
        Object::Hash(pairs) => {
            let key = Object::str(name);
            let value = key
                .hash_key()
                .and_then(|hk| pairs.borrow().get(&hk).map(|pair| pair.value.clone()))
                .unwrap_or(Object::Null);
            Ok(value)
        }
        Object::Instance(inst) => {
            let inst = inst.borrow();
            if let Some(value) = inst.fields.get(name) {
                return Ok(value.clone());
            }
            // Methods only receive `self` through a call; a bare read would lose it.
            if inst.def.methods.borrow().contains_key(name) {
                return Err(catalog::detached_method(name, &inst.def.name, loc.clone()).into());
            }
            Err(catalog::property_not_found(name, &inst.def.name, loc.clone()).into())
        }
        Object::Enum(def) => match def.variant(name) {
            Some(value) => Ok(Object::EnumValue(value)),
            None => {
                let known: Vec<String> = def.variants.iter().map(|(v, _)| v.clone()).collect();
                Err(catalog::enum_value(&def.name, name, &known, loc.clone()).into())
            }
        },
        Object::EnumValue(value) => match name {
            "value" => Ok(Object::Integer(value.value)),
            "name" => Ok(Object::str(value.variant.to_string())),
            _ => Err(catalog::member_access_error("ENUM_VALUE", name, loc.clone()).into()),
        },
        other => Err(catalog::member_access_error(&other.type_tag(), name, loc.clone()).into()),
    }
}
