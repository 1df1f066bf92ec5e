//! Node identifiers and the node abstraction indexed by [`TreeStore`](crate::domain::TreeStore).

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a node: an integer or a string, compared by value.
///
/// `Int(1)` and `Str("1")` are different identifiers. Floats, booleans and
/// integers outside the `i64` range are rejected when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Str(String),
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NodeIdVisitor;

        impl<'de> Visitor<'de> for NodeIdVisitor {
            type Value = NodeId;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a node id (integer or string)")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(NodeId::Int(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                i64::try_from(v).map(NodeId::Int).map_err(|_| {
                    E::invalid_value(
                        Unexpected::Unsigned(v),
                        &"an integer node id within the signed 64-bit range",
                    )
                })
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Err(E::invalid_type(Unexpected::Float(v), &self))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(NodeId::Str(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(NodeId::Str(v))
            }
        }

        deserializer.deserialize_any(NodeIdVisitor)
    }
}

impl NodeId {
    /// `0` and `""` are falsy; a falsy parent means "no parent".
    pub fn is_truthy(&self) -> bool {
        match self {
            NodeId::Int(n) => *n != 0,
            NodeId::Str(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(n) => write!(f, "{}", n),
            NodeId::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Integers win: `"7"` parses to `Int(7)`, anything else becomes `Str`.
impl FromStr for NodeId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(NodeId::Int)
            .unwrap_or_else(|_| NodeId::Str(s.to_string())))
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        NodeId::Int(n)
    }
}

impl From<i32> for NodeId {
    fn from(n: i32) -> Self {
        NodeId::Int(n.into())
    }
}

impl From<u32> for NodeId {
    fn from(n: u32) -> Self {
        NodeId::Int(n.into())
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::Str(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId::Str(s)
    }
}

impl From<&NodeId> for NodeId {
    fn from(id: &NodeId) -> Self {
        id.clone()
    }
}

/// Anything that can be placed in a [`TreeStore`](crate::domain::TreeStore).
pub trait TreeNode {
    fn id(&self) -> &NodeId;

    /// Declared parent, `None` for roots. Falsy values are treated as roots too.
    fn parent(&self) -> Option<&NodeId>;
}

/// Generic node record: `id`, `parent` and any number of opaque payload fields.
///
/// Payload fields are kept verbatim, so `{"id": 7, "parent": 4, "type": null}`
/// serializes back to exactly that object.
///
/// `parent` is `None` when the key is absent and `Some(None)` for an explicit
/// `"parent": null`, so both shapes serialize back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: NodeId,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<Option<NodeId>>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// Only called when the key exists; a missing key falls back to `default`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<NodeId>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NodeId>::deserialize(deserializer).map(Some)
}

impl Record {
    /// `parent: None` leaves the key out entirely.
    pub fn new(id: impl Into<NodeId>, parent: Option<NodeId>) -> Self {
        Self {
            id: id.into(),
            parent: parent.map(Some),
            payload: Map::new(),
        }
    }

    /// Declared parent value, `None` whether the key is absent or `null`.
    pub fn parent_id(&self) -> Option<&NodeId> {
        self.parent.as_ref().and_then(Option::as_ref)
    }

    /// Builder-style payload setter.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.payload.get(key)
    }
}

impl TreeNode for Record {
    fn id(&self) -> &NodeId {
        &self.id
    }

    fn parent(&self) -> Option<&NodeId> {
        self.parent_id()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(NodeId::Int(0), false)]
    #[case(NodeId::Int(-1), true)]
    #[case(NodeId::Int(42), true)]
    #[case(NodeId::from(""), false)]
    #[case(NodeId::from("root"), true)]
    fn given_node_id_when_checking_truthiness_then_matches(
        #[case] id: NodeId,
        #[case] expected: bool,
    ) {
        assert_eq!(id.is_truthy(), expected);
    }

    #[rstest]
    #[case("7", NodeId::Int(7))]
    #[case("-3", NodeId::Int(-3))]
    #[case("root", NodeId::Str("root".into()))]
    #[case("7a", NodeId::Str("7a".into()))]
    fn given_text_when_parsing_node_id_then_prefers_integers(
        #[case] input: &str,
        #[case] expected: NodeId,
    ) {
        let id: NodeId = input.parse().unwrap();
        assert_eq!(id, expected);
    }

    #[test]
    fn given_int_and_string_with_same_digits_then_ids_differ() {
        assert_ne!(NodeId::from(1), NodeId::from("1"));
    }

    #[test]
    fn given_json_node_when_deserializing_then_keeps_payload_verbatim() {
        let value = json!({"id": 7, "parent": 4, "type": null});
        let record: Record = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(record.id, NodeId::Int(7));
        assert_eq!(record.parent_id(), Some(&NodeId::Int(4)));
        assert_eq!(record.field("type"), Some(&Value::Null));
        assert_eq!(serde_json::to_value(&record).unwrap(), value);
    }

    #[test]
    fn given_string_parent_when_deserializing_then_mixes_id_kinds() {
        let record: Record = serde_json::from_value(json!({"id": 1, "parent": "root"})).unwrap();

        assert_eq!(record.parent_id(), Some(&NodeId::from("root")));
        assert!(record.payload.is_empty());
    }

    #[test]
    fn given_missing_or_null_parent_when_deserializing_then_parent_is_none() {
        let missing: Record = serde_json::from_value(json!({"id": "a"})).unwrap();
        let null: Record = serde_json::from_value(json!({"id": "b", "parent": null})).unwrap();

        assert_eq!(missing.parent_id(), None);
        assert_eq!(null.parent_id(), None);
        assert_eq!(missing.parent, None);
        assert_eq!(null.parent, Some(None));
    }

    #[rstest]
    #[case(json!({"id": "a", "parent": null, "label": "first"}))]
    #[case(json!({"id": "a", "label": "first"}))]
    #[case(json!({"id": 3, "parent": 0}))]
    fn given_parent_key_shape_when_round_tripping_then_serialized_unchanged(
        #[case] value: Value,
    ) {
        let record: Record = serde_json::from_value(value.clone()).unwrap();

        assert_eq!(serde_json::to_value(&record).unwrap(), value);
    }

    #[test]
    fn given_explicit_null_parent_when_serializing_to_text_then_key_kept() {
        let record: Record =
            serde_json::from_str(r#"{"id":"a","parent":null,"label":"first"}"#).unwrap();

        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"id":"a","parent":null,"label":"first"}"#
        );
    }

    #[rstest]
    #[case(json!(1.5), "floating point `1.5`")]
    #[case(json!(1.0), "floating point `1.0`")]
    #[case(json!(u64::MAX), "signed 64-bit range")]
    #[case(json!(true), "boolean `true`")]
    fn given_unsupported_id_type_when_deserializing_then_error_names_it(
        #[case] id: Value,
        #[case] expected: &str,
    ) {
        let err = serde_json::from_value::<NodeId>(id).unwrap_err().to_string();

        assert!(err.contains(expected), "{err}");
    }

    #[test]
    fn given_large_but_signed_integer_when_deserializing_then_int() {
        let id: NodeId = serde_json::from_value(json!(i64::MAX)).unwrap();

        assert_eq!(id, NodeId::Int(i64::MAX));
    }
}
