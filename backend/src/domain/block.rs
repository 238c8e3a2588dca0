//! Page blocks: typed content units rendered in position order.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::PageId;

/// Validation failures for block input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockValidationError {
    #[error("block_type must not be empty")]
    EmptyKind,
    #[error("config value for {key} must be a string, number, or boolean")]
    UnsupportedConfigValue { key: String },
    #[error("config keys must not be empty")]
    EmptyConfigKey,
}

/// Identifier of a block within a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(Uuid);

impl BlockId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Block type tag.
///
/// Unrecognised tags are kept verbatim in [`BlockKind::Other`] so stored pages
/// survive catalogue changes; the renderer shows them as a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BlockKind {
    Hero,
    Text,
    Pricing,
    VehicleList,
    BookingForm,
    Contact,
    Image,
    CallToAction,
    Testimonial,
    Footer,
    Other(String),
}

impl BlockKind {
    /// Every recognised kind, in catalogue order.
    pub const KNOWN: [Self; 10] = [
        Self::Hero,
        Self::Text,
        Self::Pricing,
        Self::VehicleList,
        Self::BookingForm,
        Self::Contact,
        Self::Image,
        Self::CallToAction,
        Self::Testimonial,
        Self::Footer,
    ];

    /// Parse a tag, accepting snake_case spellings and legacy aliases.
    ///
    /// # Examples
    /// ```
    /// use lejio::domain::BlockKind;
    ///
    /// assert_eq!(BlockKind::parse("vehicle_list"), Ok(BlockKind::VehicleList));
    /// assert_eq!(BlockKind::parse("cta"), Ok(BlockKind::CallToAction));
    /// assert_eq!(
    ///     BlockKind::parse("carousel"),
    ///     Ok(BlockKind::Other("carousel".to_owned()))
    /// );
    /// ```
    pub fn parse(tag: &str) -> Result<Self, BlockValidationError> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(BlockValidationError::EmptyKind);
        }
        let normalised = trimmed.to_ascii_lowercase().replace('_', "-");
        let kind = match normalised.as_str() {
            "hero" => Self::Hero,
            "text" => Self::Text,
            "pricing" => Self::Pricing,
            "vehicle-list" | "vehicles" => Self::VehicleList,
            "booking-form" => Self::BookingForm,
            "contact" => Self::Contact,
            "image" => Self::Image,
            "call-to-action" | "cta" => Self::CallToAction,
            "testimonial" => Self::Testimonial,
            "footer" => Self::Footer,
            _ => Self::Other(trimmed.to_owned()),
        };
        Ok(kind)
    }

    /// Canonical tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Hero => "hero",
            Self::Text => "text",
            Self::Pricing => "pricing",
            Self::VehicleList => "vehicle-list",
            Self::BookingForm => "booking-form",
            Self::Contact => "contact",
            Self::Image => "image",
            Self::CallToAction => "call-to-action",
            Self::Testimonial => "testimonial",
            Self::Footer => "footer",
            Self::Other(tag) => tag.as_str(),
        }
    }

    /// Editor label for recognised kinds.
    pub fn label(&self) -> Option<&'static str> {
        let label = match self {
            Self::Hero => "Hero banner",
            Self::Text => "Text section",
            Self::Pricing => "Pricing table",
            Self::VehicleList => "Vehicle list",
            Self::BookingForm => "Booking form",
            Self::Contact => "Contact details",
            Self::Image => "Image",
            Self::CallToAction => "Call to action",
            Self::Testimonial => "Testimonial",
            Self::Footer => "Footer",
            Self::Other(_) => return None,
        };
        Some(label)
    }

    /// Config keys the renderer reads for this kind.
    pub fn config_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Hero => &["headline", "subheadline", "cta_text", "cta_link", "bg_color"],
            Self::Text => &["heading", "body"],
            Self::Pricing => &[
                "heading",
                "plan_1_name",
                "plan_1_price",
                "plan_2_name",
                "plan_2_price",
                "plan_3_name",
                "plan_3_price",
                "currency",
            ],
            Self::VehicleList => &["heading", "limit", "show_prices"],
            Self::BookingForm => &["heading", "submit_text"],
            Self::Contact => &["heading", "email", "phone", "address"],
            Self::Image => &["src", "alt", "caption"],
            Self::CallToAction => &["headline", "button_text", "button_link"],
            Self::Testimonial => &["quote", "author", "role"],
            Self::Footer => &["text", "show_contact"],
            Self::Other(_) => &[],
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<BlockKind> for String {
    fn from(value: BlockKind) -> Self {
        match value {
            BlockKind::Other(tag) => tag,
            known => known.as_str().to_owned(),
        }
    }
}

impl TryFrom<String> for BlockKind {
    type Error = BlockValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Primitive configuration value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ConfigValue {
    fn from_json(key: &str, value: Value) -> Result<Option<Self>, BlockValidationError> {
        let converted = match value {
            Value::Null => return Ok(None),
            Value::Bool(flag) => Self::Bool(flag),
            Value::String(text) => Self::Text(text),
            Value::Number(number) => match (number.as_i64(), number.as_f64()) {
                (Some(int), _) => Self::Integer(int),
                (None, Some(float)) => Self::Float(float),
                (None, None) => {
                    return Err(BlockValidationError::UnsupportedConfigValue {
                        key: key.to_owned(),
                    });
                }
            },
            Value::Array(_) | Value::Object(_) => {
                return Err(BlockValidationError::UnsupportedConfigValue {
                    key: key.to_owned(),
                });
            }
        };
        Ok(Some(converted))
    }

    /// Text form used when injecting the value into markup.
    pub fn to_text(&self) -> String {
        match self {
            Self::Bool(flag) => flag.to_string(),
            Self::Integer(int) => int.to_string(),
            Self::Float(float) => float.to_string(),
            Self::Text(text) => text.clone(),
        }
    }

    /// Interpret the value as a flag. Strings `"true"` and `"false"` count.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            Self::Text(text) => text.parse().ok(),
            Self::Integer(_) | Self::Float(_) => None,
        }
    }

    /// Interpret the value as a non-negative count.
    pub fn as_count(&self) -> Option<usize> {
        match self {
            Self::Integer(int) => usize::try_from(*int).ok(),
            Self::Text(text) => text.parse().ok(),
            Self::Bool(_) | Self::Float(_) => None,
        }
    }
}

/// Free-form block configuration made of primitive values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockConfig(BTreeMap<String, ConfigValue>);

impl BlockConfig {
    /// Build a configuration from a JSON object.
    ///
    /// Nested values are rejected; `null` entries are ignored.
    pub fn from_json(object: Map<String, Value>) -> Result<Self, BlockValidationError> {
        let mut values = BTreeMap::new();
        for (key, value) in object {
            if key.trim().is_empty() {
                return Err(BlockValidationError::EmptyConfigKey);
            }
            if let Some(converted) = ConfigValue::from_json(&key, value)? {
                values.insert(key, converted);
            }
        }
        Ok(Self(values))
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    /// Look up a value rendered as text.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).map(ConfigValue::to_text)
    }

    /// Insert or replace a value.
    pub fn set(&mut self, key: impl Into<String>, value: ConfigValue) {
        self.0.insert(key.into(), value);
    }

    /// Merge a patch: present keys overwrite, `null` keys are removed, other
    /// keys are kept.
    pub fn merge(&mut self, patch: BlockConfigPatch) {
        for (key, value) in patch.0 {
            match value {
                Some(value) => {
                    self.0.insert(key, value);
                }
                None => {
                    self.0.remove(&key);
                }
            }
        }
    }

    /// Whether the configuration has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.0.iter()
    }
}

/// Partial configuration update. A `None` value removes the key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockConfigPatch(BTreeMap<String, Option<ConfigValue>>);

impl BlockConfigPatch {
    /// Build a patch from a JSON object.
    pub fn from_json(object: Map<String, Value>) -> Result<Self, BlockValidationError> {
        let mut values = BTreeMap::new();
        for (key, value) in object {
            if key.trim().is_empty() {
                return Err(BlockValidationError::EmptyConfigKey);
            }
            let converted = ConfigValue::from_json(&key, value)?;
            values.insert(key, converted);
        }
        Ok(Self(values))
    }
}

/// One renderable content unit within a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub page_id: PageId,
    pub block_type: BlockKind,
    pub position: u32,
    pub config: BlockConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for appending a block to a page.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDraft {
    pub block_type: BlockKind,
    pub position: Option<u32>,
    pub config: BlockConfig,
}

/// Partial block update; `None` fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockPatch {
    pub block_type: Option<BlockKind>,
    pub position: Option<u32>,
    pub config: Option<BlockConfigPatch>,
}

impl Block {
    /// Apply a patch, refreshing `updated_at`.
    pub fn apply(&mut self, patch: BlockPatch, now: DateTime<Utc>) {
        let BlockPatch {
            block_type,
            position,
            config,
        } = patch;
        if let Some(block_type) = block_type {
            self.block_type = block_type;
        }
        if let Some(position) = position {
            self.position = position;
        }
        if let Some(config) = config {
            self.config.merge(config);
        }
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[rstest]
    #[case("hero", BlockKind::Hero)]
    #[case("Vehicle-List", BlockKind::VehicleList)]
    #[case("vehicles", BlockKind::VehicleList)]
    #[case("booking_form", BlockKind::BookingForm)]
    #[case("call_to_action", BlockKind::CallToAction)]
    #[case("  footer ", BlockKind::Footer)]
    fn parse_recognises_known_tags(#[case] raw: &str, #[case] expected: BlockKind) {
        assert_eq!(BlockKind::parse(raw), Ok(expected));
    }

    #[rstest]
    fn parse_keeps_unknown_tags_verbatim() {
        assert_eq!(
            BlockKind::parse("Carousel"),
            Ok(BlockKind::Other("Carousel".to_owned()))
        );
        assert_eq!(BlockKind::parse("  "), Err(BlockValidationError::EmptyKind));
    }

    #[rstest]
    fn kind_serialises_as_canonical_tag() {
        let value = serde_json::to_value(BlockKind::VehicleList).expect("serialise kind");
        assert_eq!(value, json!("vehicle-list"));
        let kind: BlockKind = serde_json::from_value(json!("cta")).expect("deserialise kind");
        assert_eq!(kind, BlockKind::CallToAction);
    }

    #[rstest]
    fn every_known_kind_has_a_label() {
        assert!(BlockKind::KNOWN.iter().all(|kind| kind.label().is_some()));
    }

    #[rstest]
    fn config_from_json_accepts_primitives() {
        let config = BlockConfig::from_json(object(json!({
            "headline": "Lej en bil",
            "limit": 3,
            "ratio": 1.5,
            "show_prices": true,
            "skipped": null,
        })))
        .expect("valid config");

        assert_eq!(config.text("headline").as_deref(), Some("Lej en bil"));
        assert_eq!(config.get("limit"), Some(&ConfigValue::Integer(3)));
        assert_eq!(config.get("ratio"), Some(&ConfigValue::Float(1.5)));
        assert_eq!(config.get("show_prices"), Some(&ConfigValue::Bool(true)));
        assert!(config.get("skipped").is_none());
    }

    #[rstest]
    #[case(json!({ "nested": { "a": 1 } }))]
    #[case(json!({ "list": [1, 2] }))]
    fn config_from_json_rejects_nested_values(#[case] raw: Value) {
        let result = BlockConfig::from_json(object(raw));
        assert!(matches!(
            result,
            Err(BlockValidationError::UnsupportedConfigValue { .. })
        ));
    }

    #[rstest]
    fn merge_overwrites_removes_and_keeps() {
        let mut config = BlockConfig::from_json(object(json!({
            "headline": "Old",
            "subheadline": "Keep me",
            "bg_color": "#000000",
        })))
        .expect("valid config");
        let patch = BlockConfigPatch::from_json(object(json!({
            "headline": "New",
            "bg_color": null,
        })))
        .expect("valid patch");

        config.merge(patch);

        assert_eq!(config.text("headline").as_deref(), Some("New"));
        assert_eq!(config.text("subheadline").as_deref(), Some("Keep me"));
        assert!(config.get("bg_color").is_none());
    }

    #[rstest]
    #[case(ConfigValue::Integer(4), Some(4))]
    #[case(ConfigValue::Text("2".to_owned()), Some(2))]
    #[case(ConfigValue::Integer(-1), None)]
    #[case(ConfigValue::Bool(true), None)]
    fn as_count_accepts_non_negative_integers(
        #[case] value: ConfigValue,
        #[case] expected: Option<usize>,
    ) {
        assert_eq!(value.as_count(), expected);
    }
}
