//! Boxed compound values: `st-array(...)`, `st-map(...)` and typed shorthands.
//!
//! A [`CustomValue`] type turns the arguments of its CSS function into raw
//! parts, builds a structured [`BoxedValue`] from them, and flattens that
//! value back into CSS text. `value(name, key, ...)` reads into a boxed var.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use smol_str::SmolStr;
use thiserror::Error;

use crate::parser::{ValueNode, parse_value, split_by_comma, stringify_value};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomValueError {
    #[error("{type_name}: {message}")]
    InvalidArgs { type_name: SmolStr, message: String },
    #[error("unknown path \"{path}\" in {type_name}")]
    UnknownPath { type_name: SmolStr, path: String },
    #[error("\"{path}\" does not point into a compound value")]
    NotCompound { path: String },
}

/// A structured value: a leaf string, an ordered list or a keyed map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoxedValue {
    Text(String),
    Array {
        type_name: SmolStr,
        items: Vec<BoxedValue>,
    },
    Map {
        type_name: SmolStr,
        entries: IndexMap<String, BoxedValue>,
    },
}

impl BoxedValue {
    pub fn text(value: impl Into<String>) -> Self {
        BoxedValue::Text(value.into())
    }

    pub fn type_name(&self) -> Option<&str> {
        match self {
            BoxedValue::Text(_) => None,
            BoxedValue::Array { type_name, .. } | BoxedValue::Map { type_name, .. } => {
                Some(type_name)
            }
        }
    }
}

/// Output of [`CustomValue::process_args`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawParts {
    Items(Vec<BoxedValue>),
    Entries(Vec<(String, BoxedValue)>),
}

/// One serialized piece of a flattened value; keyed parts render as `key value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatPart<'a> {
    pub key: Option<&'a str>,
    pub value: &'a BoxedValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatValue<'a> {
    pub delimiter: &'static str,
    pub parts: Vec<FlatPart<'a>>,
}

pub trait CustomValue {
    fn name(&self) -> &str;

    fn process_args(
        &self,
        args: &[ValueNode],
        types: &CustomValueTypes,
    ) -> Result<RawParts, CustomValueError>;

    fn create_value(&self, parts: RawParts) -> Result<BoxedValue, CustomValueError>;

    fn flatten_value<'a>(&self, value: &'a BoxedValue) -> FlatValue<'a>;
}

// ============================================================================
// BUILT-IN TYPES
// ============================================================================

pub const ST_ARRAY: &str = "st-array";
pub const ST_MAP: &str = "st-map";
pub const ST_BORDER: &str = "st-border";

/// `st-array(a, b, c)`
pub struct ArrayValue;

impl CustomValue for ArrayValue {
    fn name(&self) -> &str {
        ST_ARRAY
    }

    fn process_args(
        &self,
        args: &[ValueNode],
        types: &CustomValueTypes,
    ) -> Result<RawParts, CustomValueError> {
        let items = split_by_comma(args)
            .iter()
            .filter(|part| !is_blank(part))
            .map(|part| types.parse_nodes(part))
            .collect::<Result<_, _>>()?;
        Ok(RawParts::Items(items))
    }

    fn create_value(&self, parts: RawParts) -> Result<BoxedValue, CustomValueError> {
        match parts {
            RawParts::Items(items) => Ok(BoxedValue::Array {
                type_name: ST_ARRAY.into(),
                items,
            }),
            RawParts::Entries(_) => Err(invalid(ST_ARRAY, "expected a list of values")),
        }
    }

    fn flatten_value<'a>(&self, value: &'a BoxedValue) -> FlatValue<'a> {
        flatten_generic(value, ", ")
    }
}

/// `st-map(key value, key value)`
pub struct MapValue;

impl CustomValue for MapValue {
    fn name(&self) -> &str {
        ST_MAP
    }

    fn process_args(
        &self,
        args: &[ValueNode],
        types: &CustomValueTypes,
    ) -> Result<RawParts, CustomValueError> {
        let mut entries = Vec::new();
        for part in split_by_comma(args).iter().filter(|part| !is_blank(part)) {
            let significant: Vec<&ValueNode> = part
                .iter()
                .skip_while(|node| node.is_space())
                .collect();
            let Some(ValueNode::Word(key)) = significant.first() else {
                return Err(invalid(ST_MAP, "each entry must start with a key"));
            };
            let rest: Vec<ValueNode> = significant[1..]
                .iter()
                .skip_while(|node| node.is_space())
                .map(|node| (*node).clone())
                .collect();
            if is_blank(&rest) {
                return Err(invalid(ST_MAP, format!("missing value for key \"{key}\"")));
            }
            entries.push((key.clone(), types.parse_nodes(&rest)?));
        }
        Ok(RawParts::Entries(entries))
    }

    fn create_value(&self, parts: RawParts) -> Result<BoxedValue, CustomValueError> {
        match parts {
            RawParts::Entries(entries) => Ok(BoxedValue::Map {
                type_name: ST_MAP.into(),
                entries: entries.into_iter().collect(),
            }),
            RawParts::Items(_) => Err(invalid(ST_MAP, "expected key/value entries")),
        }
    }

    fn flatten_value<'a>(&self, value: &'a BoxedValue) -> FlatValue<'a> {
        flatten_generic(value, ", ")
    }
}

/// A map whose keys are fixed and given positionally, e.g.
/// `st-border(1px, solid, red)` or `st-border(1px solid red)`.
pub struct TypedMapValue {
    name: SmolStr,
    fields: Vec<SmolStr>,
    delimiter: &'static str,
}

impl TypedMapValue {
    pub fn new(name: &str, fields: &[&str], delimiter: &'static str) -> Self {
        Self {
            name: name.into(),
            fields: fields.iter().map(|field| SmolStr::from(*field)).collect(),
            delimiter,
        }
    }

    pub fn border() -> Self {
        Self::new(ST_BORDER, &["size", "style", "color"], " ")
    }
}

impl CustomValue for TypedMapValue {
    fn name(&self) -> &str {
        &self.name
    }

    fn process_args(
        &self,
        args: &[ValueNode],
        types: &CustomValueTypes,
    ) -> Result<RawParts, CustomValueError> {
        let mut parts = split_by_comma(args);
        parts.retain(|part| !is_blank(part));
        if parts.len() == 1 {
            // Space separated form.
            parts = parts[0]
                .split(ValueNode::is_space)
                .filter(|chunk| !chunk.is_empty())
                .map(<[ValueNode]>::to_vec)
                .collect();
        }
        if parts.len() != self.fields.len() {
            return Err(invalid(
                &self.name,
                format!(
                    "expected {} values ({}), got {}",
                    self.fields.len(),
                    self.fields.join(", "),
                    parts.len()
                ),
            ));
        }
        let entries = self
            .fields
            .iter()
            .zip(&parts)
            .map(|(field, part)| Ok((field.to_string(), types.parse_nodes(part)?)))
            .collect::<Result<_, CustomValueError>>()?;
        Ok(RawParts::Entries(entries))
    }

    fn create_value(&self, parts: RawParts) -> Result<BoxedValue, CustomValueError> {
        let RawParts::Entries(entries) = parts else {
            return Err(invalid(&self.name, "expected field values"));
        };
        let entries: IndexMap<String, BoxedValue> = entries.into_iter().collect();
        if let Some(missing) = self
            .fields
            .iter()
            .find(|field| !entries.contains_key(field.as_str()))
        {
            return Err(invalid(&self.name, format!("missing field \"{missing}\"")));
        }
        Ok(BoxedValue::Map {
            type_name: self.name.clone(),
            entries,
        })
    }

    fn flatten_value<'a>(&self, value: &'a BoxedValue) -> FlatValue<'a> {
        let parts = match value {
            BoxedValue::Map { entries, .. } => self
                .fields
                .iter()
                .filter_map(|field| entries.get(field.as_str()))
                .map(|value| FlatPart { key: None, value })
                .collect(),
            other => vec![FlatPart {
                key: None,
                value: other,
            }],
        };
        FlatValue {
            delimiter: self.delimiter,
            parts,
        }
    }
}

fn flatten_generic<'a>(value: &'a BoxedValue, delimiter: &'static str) -> FlatValue<'a> {
    let parts = match value {
        BoxedValue::Text(_) => vec![FlatPart { key: None, value }],
        BoxedValue::Array { items, .. } => items
            .iter()
            .map(|value| FlatPart { key: None, value })
            .collect(),
        BoxedValue::Map { entries, .. } => entries
            .iter()
            .map(|(key, value)| FlatPart {
                key: Some(key.as_str()),
                value,
            })
            .collect(),
    };
    FlatValue { delimiter, parts }
}

fn invalid(type_name: &str, message: impl Into<String>) -> CustomValueError {
    CustomValueError::InvalidArgs {
        type_name: type_name.into(),
        message: message.into(),
    }
}

fn is_blank(nodes: &[ValueNode]) -> bool {
    nodes
        .iter()
        .all(|node| node.is_space() || matches!(node, ValueNode::Comment(_)))
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Known custom value types, looked up by function name.
#[derive(Clone)]
pub struct CustomValueTypes {
    types: IndexMap<SmolStr, Rc<dyn CustomValue>>,
}

impl fmt::Debug for CustomValueTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.types.keys()).finish()
    }
}

impl Default for CustomValueTypes {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomValueTypes {
    /// Registry with `st-array`, `st-map` and `st-border`.
    pub fn new() -> Self {
        let mut types = Self::empty();
        types.register(Rc::new(ArrayValue));
        types.register(Rc::new(MapValue));
        types.register(Rc::new(TypedMapValue::border()));
        types
    }

    pub fn empty() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    pub fn register(&mut self, value_type: Rc<dyn CustomValue>) {
        self.types.insert(value_type.name().into(), value_type);
    }

    pub fn get(&self, name: &str) -> Option<&Rc<dyn CustomValue>> {
        self.types.get(name)
    }

    pub fn is_custom_value(&self, text: &str) -> bool {
        matches!(
            significant(&parse_value(text)).as_slice(),
            [ValueNode::Function { name, .. }] if self.types.contains_key(name.as_str())
        )
    }

    /// Parse a declaration value. Values that are not a single custom value
    /// call become [`BoxedValue::Text`].
    pub fn parse(&self, text: &str) -> Result<BoxedValue, CustomValueError> {
        self.parse_nodes(&parse_value(text))
    }

    fn parse_nodes(&self, nodes: &[ValueNode]) -> Result<BoxedValue, CustomValueError> {
        if let [ValueNode::Function { name, nodes: args }] = significant(nodes).as_slice() {
            if let Some(value_type) = self.types.get(name.as_str()) {
                let parts = value_type.process_args(args, self)?;
                return value_type.create_value(parts);
            }
        }
        Ok(BoxedValue::Text(stringify_value(nodes).trim().to_string()))
    }

    /// Follow `path` (map keys or array indices) into `value`.
    pub fn get_path<'a, S: AsRef<str>>(
        &self,
        value: &'a BoxedValue,
        path: &[S],
    ) -> Result<&'a BoxedValue, CustomValueError> {
        let mut current = value;
        for (depth, key) in path.iter().enumerate() {
            let key = key.as_ref();
            let joined = || {
                path[..=depth]
                    .iter()
                    .map(AsRef::as_ref)
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            current = match current {
                BoxedValue::Array { type_name, items } => key
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| items.get(index))
                    .ok_or_else(|| CustomValueError::UnknownPath {
                        type_name: type_name.clone(),
                        path: joined(),
                    })?,
                BoxedValue::Map { type_name, entries } => {
                    entries
                        .get(key)
                        .ok_or_else(|| CustomValueError::UnknownPath {
                            type_name: type_name.clone(),
                            path: joined(),
                        })?
                }
                BoxedValue::Text(_) => {
                    return Err(CustomValueError::NotCompound { path: joined() });
                }
            };
        }
        Ok(current)
    }

    pub fn flatten<'a>(&self, value: &'a BoxedValue) -> FlatValue<'a> {
        match value.type_name().and_then(|name| self.types.get(name)) {
            Some(value_type) => value_type.flatten_value(value),
            None => flatten_generic(value, ", "),
        }
    }

    /// CSS text of a value.
    pub fn to_css(&self, value: &BoxedValue) -> String {
        if let BoxedValue::Text(text) = value {
            return text.clone();
        }
        let flat = self.flatten(value);
        flat.parts
            .iter()
            .map(|part| match part.key {
                Some(key) => format!("{key} {}", self.to_css(part.value)),
                None => self.to_css(part.value),
            })
            .collect::<Vec<_>>()
            .join(flat.delimiter)
    }

    /// Source form (`st-map(key value, ...)`) that parses back to `value`.
    pub fn serialize(&self, value: &BoxedValue) -> String {
        let Some(type_name) = value.type_name() else {
            return self.to_css(value);
        };
        let parts: Vec<String> = self
            .flatten(value)
            .parts
            .iter()
            .map(|part| match part.key {
                Some(key) => format!("{key} {}", self.serialize(part.value)),
                None => self.serialize(part.value),
            })
            .collect();
        format!("{type_name}({})", parts.join(", "))
    }
}

fn significant(nodes: &[ValueNode]) -> Vec<&ValueNode> {
    nodes
        .iter()
        .filter(|node| !node.is_space() && !matches!(node, ValueNode::Comment(_)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_array_and_map() {
        let types = CustomValueTypes::new();
        let value = types
            .parse("st-map(primary red, sizes st-array(1px, 2px))")
            .unwrap();
        assert_eq!(
            types.get_path(&value, &["primary"]).unwrap(),
            &BoxedValue::text("red")
        );
        let size = types.get_path(&value, &["sizes", "1"]).unwrap();
        assert_eq!(types.to_css(size), "2px");
        assert_eq!(types.to_css(&value), "primary red, sizes 1px, 2px");
    }

    #[test]
    fn test_unknown_path() {
        let types = CustomValueTypes::new();
        let value = types.parse("st-array(a, b)").unwrap();
        assert!(matches!(
            types.get_path(&value, &["5"]),
            Err(CustomValueError::UnknownPath { .. })
        ));
        let text = types.parse("red").unwrap();
        assert!(matches!(
            types.get_path(&text, &["x"]),
            Err(CustomValueError::NotCompound { .. })
        ));
    }

    #[test]
    fn test_border_accepts_both_forms() {
        let types = CustomValueTypes::new();
        let spaced = types.parse("st-border(1px solid red)").unwrap();
        let commas = types.parse("st-border(1px, solid, red)").unwrap();
        assert_eq!(spaced, commas);
        assert_eq!(types.to_css(&spaced), "1px solid red");
        assert_eq!(
            types.get_path(&spaced, &["color"]).unwrap(),
            &BoxedValue::text("red")
        );
        assert!(types.parse("st-border(1px solid)").is_err());
    }

    #[test]
    fn test_serialize_parses_back() {
        let types = CustomValueTypes::new();
        for source in [
            "st-array(a, st-map(k v, j st-array(1, 2)))",
            "st-map(edge st-border(1px, solid, red))",
        ] {
            let value = types.parse(source).unwrap();
            assert_eq!(types.parse(&types.serialize(&value)).unwrap(), value);
        }
    }

    #[test]
    fn test_plain_value_is_text() {
        let types = CustomValueTypes::new();
        assert!(!types.is_custom_value("calc(1px + 2px)"));
        assert!(types.is_custom_value(" st-array(1) "));
        assert_eq!(
            types.parse("calc(1px + 2px)").unwrap(),
            BoxedValue::text("calc(1px + 2px)")
        );
    }
}
