// Integration tests for the expression parser

use exprparse::config::{
    BinaryOperators, LiteralTable, PartialFeatures, PartialLiteralFeatures, PartialMemberFeatures,
};
use exprparse::{Config, ConfigError, LiteralValue, Node, PartialConfig, Parser};
use serde_json::json;

#[test]
fn test_readme_expression() {
    let tree = exprparse::parse("Math.max(a, b[0]) * -2 >= limit ? 'big' : \"small\"").unwrap();

    let expected = json!({
        "type": "ConditionalExpression",
        "test": {
            "type": "BinaryExpression",
            "operator": ">=",
            "left": {
                "type": "BinaryExpression",
                "operator": "*",
                "left": {
                    "type": "CallExpression",
                    "callee": {
                        "type": "MemberExpression",
                        "computed": false,
                        "object": { "type": "Identifier", "name": "Math" },
                        "property": { "type": "Identifier", "name": "max" }
                    },
                    "arguments": [
                        { "type": "Identifier", "name": "a" },
                        {
                            "type": "MemberExpression",
                            "computed": true,
                            "object": { "type": "Identifier", "name": "b" },
                            "property": { "type": "Literal", "value": 0.0, "raw": "0", "kind": "number" }
                        }
                    ]
                },
                "right": {
                    "type": "UnaryExpression",
                    "operator": "-",
                    "argument": { "type": "Literal", "value": 2.0, "raw": "2", "kind": "number" }
                }
            },
            "right": { "type": "Identifier", "name": "limit" }
        },
        "consequent": { "type": "Literal", "value": "big", "raw": "'big'", "kind": "string" },
        "alternate": { "type": "Literal", "value": "small", "raw": "\"small\"", "kind": "string" }
    });

    assert_eq!(tree.to_json(), expected);
}

#[test]
fn test_compound_root_only_at_top() {
    let err = exprparse::parse("a; (b, c)").unwrap_err();
    // Commas only separate at the top level or inside argument lists.
    assert_eq!(err.message, "Unclosed `(`");

    let tree = exprparse::parse("f(a); [b, c]").unwrap();
    match tree {
        Node::Compound { body } => {
            assert_eq!(body.len(), 2);
            assert!(body
                .iter()
                .all(|n| !matches!(n, Node::Compound { .. })));
        }
        other => panic!("Expected compound root, got {other:?}"),
    }
}

#[test]
fn test_longest_match_binary_operators() {
    assert_eq!(
        exprparse::parse("a >>> b").unwrap(),
        Node::binary(">>>", Node::identifier("a"), Node::identifier("b"))
    );
    assert_eq!(
        exprparse::parse("a !== b").unwrap(),
        Node::binary("!==", Node::identifier("a"), Node::identifier("b"))
    );
    // `a >> > b` is two operators, the second of which has no left operand
    assert_eq!(
        exprparse::parse("a >> > b").unwrap_err().message,
        "Expected expression after `>>`"
    );
}

#[test]
fn test_get_config_returns_independent_copy() {
    let parser = Parser::new();
    let mut config = parser.config();
    config.features.calls = false;
    config.literals.clear();

    assert_eq!(
        parser.parse("f(true)").unwrap(),
        Node::call(
            Node::identifier("f"),
            vec![Node::named_literal(LiteralValue::Bool(true), "true")]
        )
    );
    assert_eq!(parser.config(), Parser::default_config());
}

#[test]
fn test_set_config_returns_merged_config() {
    let mut parser = Parser::new();
    let merged = parser
        .set_config(PartialConfig::new().with_features(PartialFeatures {
            members: Some(PartialMemberFeatures {
                computed: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .unwrap();

    assert!(!merged.features.members.computed);
    assert!(merged.features.members.r#static);
    assert_eq!(merged, parser.config());

    assert_eq!(
        parser.parse("a[0]").unwrap_err().message,
        "Unexpected computed member access"
    );
    assert!(parser.parse("a.b").is_ok());
}

#[test]
fn test_rejected_config_keeps_previous() {
    let mut parser = Parser::new();
    let err = parser
        .set_config(PartialConfig::new().with_binary_operators(BinaryOperators::new([(")", 3)])))
        .unwrap_err();
    assert!(matches!(err, ConfigError::ReservedCharacter { ch: ')', .. }));
    assert_eq!(parser.config(), Config::default());
    assert!(parser.parse("(a + b)").is_ok());
}

#[test]
fn test_custom_literal_table() {
    let mut parser = Parser::new();
    let literals: LiteralTable = [
        ("answer".to_string(), LiteralValue::Number(42.0)),
        ("greeting".to_string(), LiteralValue::String("hi".to_string())),
    ]
    .into_iter()
    .collect();
    parser
        .set_config(PartialConfig::new().with_literals(literals))
        .unwrap();

    assert_eq!(
        parser.parse("answer").unwrap(),
        Node::named_literal(LiteralValue::Number(42.0), "answer")
    );
    assert_eq!(
        parser.parse("greeting").unwrap().to_json(),
        json!({ "type": "Literal", "value": "hi", "raw": "greeting" })
    );
    // `true` is no longer special
    assert_eq!(parser.parse("true").unwrap(), Node::identifier("true"));
}

#[test]
fn test_identifiers_disabled() {
    let mut parser = Parser::new();
    parser
        .set_config(PartialConfig::new().with_features(PartialFeatures {
            identifiers: Some(false),
            ..Default::default()
        }))
        .unwrap();

    assert!(parser.parse("true && null").is_ok());
    let err = parser.parse("true && x").unwrap_err();
    assert_eq!(err.message, "Unknown literal `x`");
    assert_eq!(err.index, 9);
}

#[test]
fn test_literal_features_disabled() {
    let mut parser = Parser::new();
    parser
        .set_config(PartialConfig::new().with_features(PartialFeatures {
            literals: Some(PartialLiteralFeatures {
                numeric: Some(false),
                string: Some(false),
                array: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .unwrap();

    assert_eq!(parser.parse("1").unwrap_err().message, "Unexpected `1`");
    assert_eq!(parser.parse("'a'").unwrap_err().message, "Unexpected `'`");
    assert_eq!(parser.parse("[a]").unwrap_err().message, "Unexpected `[`");
    // Computed member access is unaffected by the array switch
    assert!(parser.parse("a[b]").is_ok());
}

#[test]
fn test_conditional_disabled() {
    let mut parser = Parser::new();
    parser
        .set_config(PartialConfig::new().with_features(PartialFeatures {
            conditional: Some(false),
            ..Default::default()
        }))
        .unwrap();

    let err = parser.parse("a ? b : c").unwrap_err();
    assert_eq!(err.message, "Unexpected `?`");
    assert_eq!(err.index, 2);
}

#[test]
fn test_numeric_separator() {
    let mut parser = Parser::new();
    parser
        .set_config(PartialConfig::new().with_features(PartialFeatures {
            literals: Some(PartialLiteralFeatures {
                numeric_separator: Some(Some('_')),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .unwrap();

    assert_eq!(
        parser.parse("1_000.25_5").unwrap(),
        Node::number(1000.255, "1_000.25_5")
    );
    assert_eq!(
        parser.parse("1_").unwrap_err().message,
        "Variable names cannot start with a number `1_`"
    );

    // Without a separator `_` is an identifier start
    let parser = Parser::new();
    assert_eq!(
        parser.parse("1_000").unwrap_err().message,
        "Variable names cannot start with a number `1_`"
    );
}

#[test]
fn test_error_display() {
    let err = exprparse::parse("'abc").unwrap_err();
    assert_eq!(err.to_string(), r#"Index 4 of "'abc": Unclosed quote after `abc`"#);
}

#[test]
fn test_unicode_identifiers_and_offsets() {
    assert_eq!(
        exprparse::parse("größe + 1").unwrap(),
        Node::binary("+", Node::identifier("größe"), Node::number(1.0, "1"))
    );
    let err = exprparse::parse("ü )").unwrap_err();
    assert_eq!(err.index, 2);
}

#[test]
fn test_node_json_round_trip() {
    let tree = exprparse::parse("[a.b, f(1, 'x'), !c ? d : e]").unwrap();
    let json = serde_json::to_string(&tree).unwrap();
    let back: Node = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tree);
}
