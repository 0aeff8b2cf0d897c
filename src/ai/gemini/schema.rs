//! Response schema
//!
//! A small, provider-neutral description of the JSON shape we expect back.
//! It is rendered into the provider's `responseSchema` dialect for the
//! request, and reused to point at the first offending field when a response
//! does not match.

use serde_json::{json, Map, Value};
use std::fmt;

/// Node in a response schema tree
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Object {
        /// Properties in declaration order
        properties: Vec<(String, SchemaNode)>,
        required: Vec<String>,
        description: Option<String>,
    },
    Array {
        items: Box<SchemaNode>,
        description: Option<String>,
    },
    String {
        description: Option<String>,
    },
    Number {
        description: Option<String>,
    },
}

/// First place where a value departs from its schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaViolation {
    /// JSON path, e.g. `$.headToHead.confidence`
    pub path: String,
    pub expected: String,
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: expected {}", self.path, self.expected)
    }
}

impl SchemaNode {
    pub fn string() -> Self {
        Self::String { description: None }
    }

    pub fn number() -> Self {
        Self::Number { description: None }
    }

    pub fn array_of(items: SchemaNode) -> Self {
        Self::Array {
            items: Box::new(items),
            description: None,
        }
    }

    /// Object whose properties are all required
    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, SchemaNode)>,
        K: Into<String>,
    {
        let properties: Vec<(String, SchemaNode)> = properties
            .into_iter()
            .map(|(name, node)| (name.into(), node))
            .collect();
        let required = properties.iter().map(|(name, _)| name.clone()).collect();
        Self::Object {
            properties,
            required,
            description: None,
        }
    }

    /// Attach a description for the provider
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match &mut self {
            Self::Object { description, .. }
            | Self::Array { description, .. }
            | Self::String { description }
            | Self::Number { description } => *description = text,
        }
        self
    }

    fn type_name(&self) -> &'static str {
        match self {
            Self::Object { .. } => "OBJECT",
            Self::Array { .. } => "ARRAY",
            Self::String { .. } => "STRING",
            Self::Number { .. } => "NUMBER",
        }
    }

    fn description(&self) -> Option<&str> {
        match self {
            Self::Object { description, .. }
            | Self::Array { description, .. }
            | Self::String { description }
            | Self::Number { description } => description.as_deref(),
        }
    }

    /// Render in the provider's `responseSchema` dialect
    pub fn to_provider_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("type".to_string(), json!(self.type_name()));
        if let Some(text) = self.description() {
            out.insert("description".to_string(), json!(text));
        }

        match self {
            Self::Object {
                properties,
                required,
                ..
            } => {
                let props: Map<String, Value> = properties
                    .iter()
                    .map(|(name, node)| (name.clone(), node.to_provider_json()))
                    .collect();
                out.insert("properties".to_string(), Value::Object(props));
                out.insert("required".to_string(), json!(required));
                out.insert(
                    "propertyOrdering".to_string(),
                    json!(properties.iter().map(|(name, _)| name).collect::<Vec<_>>()),
                );
            }
            Self::Array { items, .. } => {
                out.insert("items".to_string(), items.to_provider_json());
            }
            Self::String { .. } | Self::Number { .. } => {}
        }

        Value::Object(out)
    }

    /// Check that `value` matches this schema
    ///
    /// Extra properties are tolerated; missing required ones are not.
    pub fn check(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.check_at(value, "$")
    }

    fn check_at(&self, value: &Value, path: &str) -> Result<(), SchemaViolation> {
        let violation = |expected: &str| SchemaViolation {
            path: path.to_string(),
            expected: expected.to_string(),
        };

        match self {
            Self::Object {
                properties,
                required,
                ..
            } => {
                let map = value.as_object().ok_or_else(|| violation("object"))?;
                for (name, node) in properties {
                    let child_path = format!("{}.{}", path, name);
                    match map.get(name) {
                        Some(child) => node.check_at(child, &child_path)?,
                        None if required.contains(name) => {
                            return Err(SchemaViolation {
                                path: child_path,
                                expected: format!("required {}", node.type_name().to_lowercase()),
                            });
                        }
                        None => {}
                    }
                }
                Ok(())
            }
            Self::Array { items, .. } => {
                let elements = value.as_array().ok_or_else(|| violation("array"))?;
                for (i, element) in elements.iter().enumerate() {
                    items.check_at(element, &format!("{}[{}]", path, i))?;
                }
                Ok(())
            }
            Self::String { .. } => value.is_string().then_some(()).ok_or_else(|| violation("string")),
            Self::Number { .. } => value.is_number().then_some(()).ok_or_else(|| violation("number")),
        }
    }
}

fn fighter_profile_schema(whose: &str) -> SchemaNode {
    let list = |what: &str| SchemaNode::array_of(SchemaNode::string()).describe(format!("{} of {}", what, whose));

    SchemaNode::object([
        (
            "fightingStyle",
            SchemaNode::string().describe(format!("Overall fighting style of {}", whose)),
        ),
        ("strengths", list("Key strengths")),
        ("weaknesses", list("Exploitable weaknesses")),
        ("fightingHabits", list("Recurring habits and tells")),
        ("fightingPattern", list("Typical patterns and sequences")),
    ])
}

/// Schema of the full analysis result
pub fn analysis_result_schema() -> SchemaNode {
    SchemaNode::object([
        ("fighterAnalysis", fighter_profile_schema("the fighter")),
        ("opponentAnalysis", fighter_profile_schema("the opponent")),
        (
            "headToHead",
            SchemaNode::object([
                (
                    "prediction",
                    SchemaNode::string().describe("Predicted outcome of the fight and how it happens"),
                ),
                (
                    "confidence",
                    SchemaNode::number().describe("Confidence in the prediction, from 0 to 100"),
                ),
            ]),
        ),
        (
            "gamePlan",
            SchemaNode::object([
                (
                    "strategy",
                    SchemaNode::string().describe("Overall strategy for the fighter"),
                ),
                (
                    "keyTactics",
                    SchemaNode::array_of(SchemaNode::string()).describe("Specific tactics to apply"),
                ),
                (
                    "drills",
                    SchemaNode::array_of(SchemaNode::string()).describe("Training drills for camp"),
                ),
            ]),
        ),
    ])
}
