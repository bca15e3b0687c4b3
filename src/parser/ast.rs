// AST (Abstract Syntax Tree) definitions for parsed expressions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value carried by a literal node or a configured literal name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Bool(bool),
    Number(f64),
    String(String),
    Null,
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralValue::Bool(b) => write!(f, "{b}"),
            LiteralValue::Number(n) => write!(f, "{n}"),
            LiteralValue::String(s) => write!(f, "{s:?}"),
            LiteralValue::Null => write!(f, "null"),
        }
    }
}

/// Which scanner produced a literal. Named literals (`true`, `null`) have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralKind {
    Number,
    String,
}

/// Expression tree node.
///
/// Serializes as an ESTree-style object with a `"type"` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    /// Several top-level expressions. Only ever produced at the root.
    Compound { body: Vec<Node> },
    Identifier { name: String },
    Literal {
        value: LiteralValue,
        /// Source text the value was read from.
        raw: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<LiteralKind>,
    },
    /// `object.property` (`computed == false`) or `object[property]`.
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        computed: bool,
    },
    CallExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    UnaryExpression {
        operator: String,
        argument: Box<Node>,
    },
    BinaryExpression {
        operator: String,
        left: Box<Node>,
        right: Box<Node>,
    },
    ConditionalExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    ArrayExpression { elements: Vec<Node> },
}

impl Node {
    pub fn identifier(name: impl Into<String>) -> Self {
        Node::Identifier { name: name.into() }
    }

    pub fn number(value: f64, raw: impl Into<String>) -> Self {
        Node::Literal {
            value: LiteralValue::Number(value),
            raw: raw.into(),
            kind: Some(LiteralKind::Number),
        }
    }

    pub fn string(value: impl Into<String>, raw: impl Into<String>) -> Self {
        Node::Literal {
            value: LiteralValue::String(value.into()),
            raw: raw.into(),
            kind: Some(LiteralKind::String),
        }
    }

    /// Literal produced from the configured literal table.
    pub fn named_literal(value: LiteralValue, name: impl Into<String>) -> Self {
        Node::Literal {
            value,
            raw: name.into(),
            kind: None,
        }
    }

    pub fn member(object: Node, property: Node, computed: bool) -> Self {
        Node::MemberExpression {
            object: Box::new(object),
            property: Box::new(property),
            computed,
        }
    }

    pub fn call(callee: Node, arguments: Vec<Node>) -> Self {
        Node::CallExpression {
            callee: Box::new(callee),
            arguments,
        }
    }

    pub fn unary(operator: impl Into<String>, argument: Node) -> Self {
        Node::UnaryExpression {
            operator: operator.into(),
            argument: Box::new(argument),
        }
    }

    pub fn binary(operator: impl Into<String>, left: Node, right: Node) -> Self {
        Node::BinaryExpression {
            operator: operator.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn conditional(test: Node, consequent: Node, alternate: Node) -> Self {
        Node::ConditionalExpression {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        }
    }

    pub fn array(elements: Vec<Node>) -> Self {
        Node::ArrayExpression { elements }
    }

    /// The `type` tag this node serializes with.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Compound { .. } => "Compound",
            Node::Identifier { .. } => "Identifier",
            Node::Literal { .. } => "Literal",
            Node::MemberExpression { .. } => "MemberExpression",
            Node::CallExpression { .. } => "CallExpression",
            Node::UnaryExpression { .. } => "UnaryExpression",
            Node::BinaryExpression { .. } => "BinaryExpression",
            Node::ConditionalExpression { .. } => "ConditionalExpression",
            Node::ArrayExpression { .. } => "ArrayExpression",
        }
    }

    /// Visits this node and all of its descendants, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        match self {
            Node::Compound { body: nodes } | Node::ArrayExpression { elements: nodes } => {
                nodes.iter().for_each(|n| n.walk(visit))
            }
            Node::Identifier { .. } | Node::Literal { .. } => {}
            Node::MemberExpression {
                object, property, ..
            } => {
                object.walk(visit);
                property.walk(visit);
            }
            Node::CallExpression { callee, arguments } => {
                callee.walk(visit);
                arguments.iter().for_each(|n| n.walk(visit));
            }
            Node::UnaryExpression { argument, .. } => argument.walk(visit),
            Node::BinaryExpression { left, right, .. } => {
                left.walk(visit);
                right.walk(visit);
            }
            Node::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                test.walk(visit);
                consequent.walk(visit);
                alternate.walk(visit);
            }
        }
    }

    /// Renders the ESTree-style JSON form of this tree.
    pub fn to_json(&self) -> serde_json::Value {
        // Only maps with non-string keys can fail here, and nodes have none.
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
