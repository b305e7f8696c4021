// vetting-core/src/ports/bean.rs

// What the engine needs from the object under validation: read a property by
// name. Callers implement this for their own types instead of relying on
// runtime reflection.

use crate::domain::value::FieldValue;
use std::collections::{BTreeMap, HashMap};

pub trait Bean {
    /// Returns the value of the top-level property `name`, or `None` when the
    /// bean has no such property.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// Reads a possibly nested property (`address.city`). The first segment is
/// asked from the bean, the remaining ones walk record values.
pub fn read_property(bean: &dyn Bean, path: &str) -> Option<FieldValue> {
    let mut segments = path.split('.');
    let head = segments.next()?;
    let mut current = bean.field(head)?;
    for segment in segments {
        current = current.get(segment)?.clone();
    }
    Some(current)
}

impl Bean for BTreeMap<String, FieldValue> {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).cloned()
    }
}

impl Bean for HashMap<String, FieldValue> {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).cloned()
    }
}

impl Bean for FieldValue {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.get(name).cloned()
    }
}

impl Bean for serde_json::Value {
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.as_object()
            .and_then(|map| map.get(name))
            .map(|v| FieldValue::from(v.clone()))
    }
}

impl<B: Bean + ?Sized> Bean for &B {
    fn field(&self, name: &str) -> Option<FieldValue> {
        (**self).field(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Person {
        name: String,
        age: i32,
    }

    impl Bean for Person {
        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "name" => Some(FieldValue::Text(self.name.clone())),
                "age" => Some(FieldValue::Int(self.age)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_struct_bean() {
        let p = Person {
            name: "Ada".into(),
            age: 36,
        };
        assert_eq!(read_property(&p, "age"), Some(FieldValue::Int(36)));
        assert_eq!(read_property(&p, "email"), None);
    }

    #[test]
    fn test_nested_json_path() {
        let bean = json!({ "address": { "city": "Lyon", "zip": "69001" } });
        assert_eq!(
            read_property(&bean, "address.city"),
            Some(FieldValue::Text("Lyon".into()))
        );
        assert_eq!(read_property(&bean, "address.street"), None);
        assert_eq!(read_property(&bean, "address.city.name"), None);
    }

    #[test]
    fn test_map_bean() {
        let mut map = BTreeMap::new();
        map.insert("x".to_string(), FieldValue::from("1"));
        assert_eq!(read_property(&map, "x"), Some(FieldValue::from("1")));
    }
}
