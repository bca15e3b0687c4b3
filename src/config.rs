//! Parser configuration
//!
//! A [`Config`] decides which grammar productions the parser accepts:
//! - [`Config::literals`]: names that parse as literal constants (`true`, `null`, ...)
//! - [`Config::operators`]: unary operator spellings and binary operators with precedence
//! - [`Config::features`]: switches that enable or disable whole productions
//!
//! Configurations are plain owned values. [`crate::Parser::config`] hands out a
//! clone, so callers can never alias the tables a parser reads from.
//!
//! Updates go through [`Config::merge`] with a [`PartialConfig`], which only
//! touches the groups present in the update and validates operator spellings
//! before anything is replaced.

use crate::parser::ast::LiteralValue;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters the grammar itself uses as delimiters.
///
/// An operator spelled with one of these would be ambiguous with the
/// structural scans (`,` between arguments, `)` closing a group, ...).
pub const RESERVED_CHARS: &[char] = &['(', ')', '[', ']', ',', ';', '?', ':', '\'', '"'];

/// Table of identifier spellings that parse as literals.
pub type LiteralTable = FxHashMap<String, LiteralValue>;

/// Error raised when a configuration update is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("operator spelling must not be empty")]
    EmptyOperator,

    #[error("operator `{operator}` contains reserved character {ch:?}")]
    ReservedCharacter { operator: String, ch: char },

    #[error("binary operator `{0}` has precedence 0, which is reserved for \"no operator\"")]
    ZeroPrecedence(String),

    #[error("invalid numeric separator {0:?}")]
    InvalidSeparator(String),

    #[error("numeric separator {separator:?} is used by operator `{operator}`")]
    SeparatorInOperator { separator: char, operator: String },
}

/// Set of unary operator spellings.
///
/// The longest spelling is computed when the set is built and cannot drift
/// from its contents afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnaryOperators {
    ops: FxHashSet<String>,
    max_len: usize,
}

impl UnaryOperators {
    pub fn new<I, S>(ops: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ops: FxHashSet<String> = ops.into_iter().map(Into::into).collect();
        let max_len = ops.iter().map(|op| op.chars().count()).max().unwrap_or(0);
        Self { ops, max_len }
    }

    pub fn contains(&self, op: &str) -> bool {
        self.ops.contains(op)
    }

    /// Length in chars of the longest spelling.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().map(String::as_str)
    }
}

impl Serialize for UnaryOperators {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut ops: Vec<&str> = self.iter().collect();
        ops.sort_unstable();
        ops.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UnaryOperators {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ops = Vec::<String>::deserialize(deserializer)?;
        Ok(Self::new(ops))
    }
}

/// Binary operator spellings mapped to their precedence.
///
/// Higher precedence binds tighter. Like [`UnaryOperators`], the longest
/// spelling is derived once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BinaryOperators {
    ops: FxHashMap<String, u32>,
    max_len: usize,
}

impl BinaryOperators {
    pub fn new<I, S>(ops: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let ops: FxHashMap<String, u32> =
            ops.into_iter().map(|(op, prec)| (op.into(), prec)).collect();
        let max_len = ops.keys().map(|op| op.chars().count()).max().unwrap_or(0);
        Self { ops, max_len }
    }

    /// Precedence of `op`, or 0 if it is not a binary operator.
    pub fn precedence(&self, op: &str) -> u32 {
        self.ops.get(op).copied().unwrap_or(0)
    }

    pub fn contains(&self, op: &str) -> bool {
        self.ops.contains_key(op)
    }

    /// Length in chars of the longest spelling.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.ops.iter().map(|(op, prec)| (op.as_str(), *prec))
    }
}

impl Serialize for BinaryOperators {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.ops.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BinaryOperators {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ops = FxHashMap::<String, u32>::deserialize(deserializer)?;
        Ok(Self::new(ops))
    }
}

/// Operator tables.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Operators {
    pub unary: UnaryOperators,
    pub binary: BinaryOperators,
}

/// Member access switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MemberFeatures {
    /// `a.b`
    pub r#static: bool,
    /// `a[b]`
    pub computed: bool,
}

/// Literal switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LiteralFeatures {
    pub numeric: bool,
    /// Character allowed between digits of a numeric literal, e.g. `_` in `1_000`.
    #[serde(with = "separator")]
    pub numeric_separator: Option<char>,
    pub string: bool,
    pub array: bool,
}

/// Grammar feature switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Features {
    /// Several top-level expressions (`a; b`).
    pub compound: bool,
    /// `a ? b : c`
    pub conditional: bool,
    /// Bare names that are not in the literal table.
    pub identifiers: bool,
    /// `f(a, b)`
    pub calls: bool,
    pub members: MemberFeatures,
    pub literals: LiteralFeatures,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            compound: true,
            conditional: true,
            identifiers: true,
            calls: true,
            members: MemberFeatures {
                r#static: true,
                computed: true,
            },
            literals: LiteralFeatures {
                numeric: true,
                numeric_separator: None,
                string: true,
                array: true,
            },
        }
    }
}

/// Full parser configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Config {
    pub literals: LiteralTable,
    pub operators: Operators,
    pub features: Features,
}

impl Default for Config {
    fn default() -> Self {
        let literals = [
            ("true", LiteralValue::Bool(true)),
            ("false", LiteralValue::Bool(false)),
            ("null", LiteralValue::Null),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

        // See https://en.wikipedia.org/wiki/Order_of_operations#Programming_languages
        let binary = BinaryOperators::new([
            ("||", 1),
            ("&&", 2),
            ("|", 3),
            ("^", 4),
            ("&", 5),
            ("==", 6),
            ("!=", 6),
            ("===", 6),
            ("!==", 6),
            ("<", 7),
            (">", 7),
            ("<=", 7),
            (">=", 7),
            ("<<", 8),
            (">>", 8),
            (">>>", 8),
            ("+", 9),
            ("-", 9),
            ("*", 10),
            ("/", 10),
            ("%", 10),
        ]);

        Self {
            literals,
            operators: Operators {
                unary: UnaryOperators::new(["-", "!", "~", "+"]),
                binary,
            },
            features: Features::default(),
        }
    }
}

impl Config {
    /// Applies `partial` on top of this configuration.
    ///
    /// The merged result is validated as a whole before it replaces `self`,
    /// so on error `self` is left exactly as it was.
    pub fn merge(&mut self, partial: PartialConfig) -> Result<(), ConfigError> {
        let mut merged = self.clone();

        if let Some(literals) = partial.literals {
            merged.literals = literals;
        }
        if let Some(operators) = partial.operators {
            if let Some(unary) = operators.unary {
                merged.operators.unary = unary;
            }
            if let Some(binary) = operators.binary {
                merged.operators.binary = binary;
            }
        }
        if let Some(features) = partial.features {
            features.apply(&mut merged.features);
        }

        merged.validate()?;
        *self = merged;
        Ok(())
    }

    /// Checks the invariants a fully built configuration must satisfy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_unary(&self.operators.unary)?;
        validate_binary(&self.operators.binary)?;
        let separator = self.features.literals.numeric_separator;
        validate_separator(separator)?;
        validate_separator_unused(separator, &self.operators)
    }
}

/// A configuration update. Absent fields keep their current value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PartialConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literals: Option<LiteralTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operators: Option<PartialOperators>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<PartialFeatures>,
}

impl PartialConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_literals(mut self, literals: LiteralTable) -> Self {
        self.literals = Some(literals);
        self
    }

    pub fn with_unary_operators(mut self, unary: UnaryOperators) -> Self {
        self.operators.get_or_insert_with(Default::default).unary = Some(unary);
        self
    }

    pub fn with_binary_operators(mut self, binary: BinaryOperators) -> Self {
        self.operators.get_or_insert_with(Default::default).binary = Some(binary);
        self
    }

    pub fn with_features(mut self, features: PartialFeatures) -> Self {
        self.features = Some(features);
        self
    }
}

impl From<Config> for PartialConfig {
    fn from(config: Config) -> Self {
        Self {
            literals: Some(config.literals),
            operators: Some(PartialOperators {
                unary: Some(config.operators.unary),
                binary: Some(config.operators.binary),
            }),
            features: Some(PartialFeatures::from(config.features)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PartialOperators {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unary: Option<UnaryOperators>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary: Option<BinaryOperators>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PartialMemberFeatures {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#static: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computed: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PartialLiteralFeatures {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<bool>,
    /// `Some(None)` clears the separator.
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "optional_separator"
    )]
    pub numeric_separator: Option<Option<char>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PartialFeatures {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compound: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditional: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifiers: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub members: Option<PartialMemberFeatures>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literals: Option<PartialLiteralFeatures>,
}

impl PartialFeatures {
    fn apply(self, features: &mut Features) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut features.compound, self.compound);
        set(&mut features.conditional, self.conditional);
        set(&mut features.identifiers, self.identifiers);
        set(&mut features.calls, self.calls);

        if let Some(members) = self.members {
            set(&mut features.members.r#static, members.r#static);
            set(&mut features.members.computed, members.computed);
        }
        if let Some(literals) = self.literals {
            set(&mut features.literals.numeric, literals.numeric);
            set(
                &mut features.literals.numeric_separator,
                literals.numeric_separator,
            );
            set(&mut features.literals.string, literals.string);
            set(&mut features.literals.array, literals.array);
        }
    }
}

impl From<Features> for PartialFeatures {
    fn from(features: Features) -> Self {
        Self {
            compound: Some(features.compound),
            conditional: Some(features.conditional),
            identifiers: Some(features.identifiers),
            calls: Some(features.calls),
            members: Some(PartialMemberFeatures {
                r#static: Some(features.members.r#static),
                computed: Some(features.members.computed),
            }),
            literals: Some(PartialLiteralFeatures {
                numeric: Some(features.literals.numeric),
                numeric_separator: Some(features.literals.numeric_separator),
                string: Some(features.literals.string),
                array: Some(features.literals.array),
            }),
        }
    }
}

fn validate_spelling(op: &str) -> Result<(), ConfigError> {
    if op.is_empty() {
        return Err(ConfigError::EmptyOperator);
    }
    if let Some(ch) = op
        .chars()
        .find(|ch| ch.is_whitespace() || RESERVED_CHARS.contains(ch))
    {
        return Err(ConfigError::ReservedCharacter {
            operator: op.to_string(),
            ch,
        });
    }
    Ok(())
}

fn validate_unary(ops: &UnaryOperators) -> Result<(), ConfigError> {
    ops.iter().try_for_each(validate_spelling)
}

fn validate_binary(ops: &BinaryOperators) -> Result<(), ConfigError> {
    for (op, prec) in ops.iter() {
        validate_spelling(op)?;
        if prec == 0 {
            return Err(ConfigError::ZeroPrecedence(op.to_string()));
        }
    }
    Ok(())
}

fn validate_separator(separator: Option<char>) -> Result<(), ConfigError> {
    match separator {
        Some(ch)
            if ch.is_ascii_digit()
                || ch.is_whitespace()
                || matches!(ch, '.' | 'e' | 'E') =>
        {
            Err(ConfigError::InvalidSeparator(ch.to_string()))
        }
        _ => Ok(()),
    }
}

fn validate_separator_unused(
    separator: Option<char>,
    operators: &Operators,
) -> Result<(), ConfigError> {
    let Some(ch) = separator else {
        return Ok(());
    };
    let clash = operators
        .unary
        .iter()
        .chain(operators.binary.iter().map(|(op, _)| op))
        .find(|op| op.contains(ch));
    match clash {
        Some(op) => Err(ConfigError::SeparatorInOperator {
            separator: ch,
            operator: op.to_string(),
        }),
        None => Ok(()),
    }
}

/// Parses the JSON spelling of a separator: `""` or a single char.
fn separator_from_str<E: serde::de::Error>(s: &str) -> Result<Option<char>, E> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(ch), None) => Ok(Some(ch)),
        _ => Err(E::custom(ConfigError::InvalidSeparator(s.to_string()))),
    }
}

mod separator {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<char>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(ch) => serializer.serialize_str(ch.encode_utf8(&mut [0; 4])),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<char>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::separator_from_str(&s)
    }
}

mod optional_separator {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Option<char>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => super::separator::serialize(inner, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Option<char>>, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::separator_from_str(&s).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_max_lengths() {
        let config = Config::default();
        assert_eq!(config.operators.unary.max_len(), 1);
        assert_eq!(config.operators.binary.max_len(), 3);
        assert_eq!(config.operators.binary.precedence("*"), 10);
        assert_eq!(config.operators.binary.precedence("=>"), 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_merge_keeps_unspecified_groups() {
        let mut config = Config::default();
        let partial = PartialConfig::new().with_features(PartialFeatures {
            calls: Some(false),
            ..Default::default()
        });
        config.merge(partial).unwrap();

        assert!(!config.features.calls);
        assert!(config.features.compound);
        assert_eq!(config.operators, Config::default().operators);
        assert_eq!(config.literals, Config::default().literals);
    }

    #[test]
    fn test_replacing_binary_table_recomputes_length() {
        let mut config = Config::default();
        let partial =
            PartialConfig::new().with_binary_operators(BinaryOperators::new([("and", 1), ("+", 2)]));
        config.merge(partial).unwrap();

        assert_eq!(config.operators.binary.max_len(), 3);
        assert_eq!(config.operators.binary.iter().count(), 2);
        assert!(!config.operators.binary.contains(">>>"));
        assert_eq!(config.operators.unary.max_len(), 1);
    }

    #[test]
    fn test_rejects_zero_precedence() {
        let mut config = Config::default();
        let partial = PartialConfig::new().with_binary_operators(BinaryOperators::new([("+", 0)]));
        assert_eq!(
            config.merge(partial),
            Err(ConfigError::ZeroPrecedence("+".to_string()))
        );
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_rejects_reserved_operator_spellings() {
        let mut config = Config::default();

        let comma = PartialConfig::new().with_binary_operators(BinaryOperators::new([(",", 1)]));
        assert!(matches!(
            config.merge(comma),
            Err(ConfigError::ReservedCharacter { ch: ',', .. })
        ));

        let empty = PartialConfig::new().with_unary_operators(UnaryOperators::new([""]));
        assert_eq!(config.merge(empty), Err(ConfigError::EmptyOperator));

        let spaced = PartialConfig::new().with_unary_operators(UnaryOperators::new(["not x"]));
        assert!(matches!(
            config.merge(spaced),
            Err(ConfigError::ReservedCharacter { ch: ' ', .. })
        ));
    }

    #[test]
    fn test_rejects_bad_separator() {
        let mut config = Config::default();
        let partial = PartialConfig::new().with_features(PartialFeatures {
            literals: Some(PartialLiteralFeatures {
                numeric_separator: Some(Some('.')),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(
            config.merge(partial),
            Err(ConfigError::InvalidSeparator(".".to_string()))
        );
    }

    #[test]
    fn test_rejects_separator_used_by_operator() {
        let mut config = Config::default();
        let dash = PartialConfig::new().with_features(PartialFeatures {
            literals: Some(PartialLiteralFeatures {
                numeric_separator: Some(Some('-')),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(
            config.merge(dash.clone()),
            Err(ConfigError::SeparatorInOperator {
                separator: '-',
                operator: "-".to_string(),
            })
        );
        assert_eq!(config, Config::default());

        // Allowed once no operator spells it
        let merged = dash
            .with_unary_operators(UnaryOperators::new(["!"]))
            .with_binary_operators(BinaryOperators::new([("+", 1)]));
        config.merge(merged).unwrap();
        assert_eq!(config.features.literals.numeric_separator, Some('-'));

        // A later operator update has to respect the active separator
        let minus = PartialConfig::new().with_binary_operators(BinaryOperators::new([("-", 1)]));
        assert!(matches!(
            config.merge(minus),
            Err(ConfigError::SeparatorInOperator { separator: '-', .. })
        ));
    }

    #[test]
    fn test_partial_from_json() {
        let partial: PartialConfig = serde_json::from_str(
            r#"{
                "Operators": { "Unary": ["not"] },
                "Features": {
                    "Members": { "Computed": false },
                    "Literals": { "NumericSeparator": "_" }
                }
            }"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.merge(partial).unwrap();

        assert!(config.operators.unary.contains("not"));
        assert_eq!(config.operators.unary.max_len(), 3);
        assert!(!config.features.members.computed);
        assert!(config.features.members.r#static);
        assert_eq!(config.features.literals.numeric_separator, Some('_'));
    }

    #[test]
    fn test_separator_must_be_single_char() {
        let result: Result<PartialConfig, _> =
            serde_json::from_str(r#"{ "Features": { "Literals": { "NumericSeparator": "__" } } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_full_config_as_partial_restores_defaults() {
        let mut config = Config::default();
        config
            .merge(PartialConfig::new().with_literals(LiteralTable::default()))
            .unwrap();
        assert!(config.literals.is_empty());

        config.merge(Config::default().into()).unwrap();
        assert_eq!(config, Config::default());
    }
}
