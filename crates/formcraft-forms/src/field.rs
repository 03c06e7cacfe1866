//! Field definitions
//!
//! A validated field carries a closed per-kind configuration variant
//! rather than the editor's loose bag of optional attributes: a select
//! cannot smuggle numeric bounds and a text input cannot carry options.
//! Keys the catalog knows nothing about ride along in an opaque `extra`
//! map and re-serialize unchanged.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::registry::FieldKind;

/// One option of a choice field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

/// Inclusive numeric bounds for a number field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Per-kind configuration; each variant carries only what its
/// descriptor declares.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldConfig {
    Text { placeholder: Option<String> },
    Email { placeholder: Option<String> },
    Password { placeholder: Option<String> },
    Number { placeholder: Option<String>, bounds: NumericBounds },
    Tel { placeholder: Option<String> },
    Textarea { placeholder: Option<String>, rows: Option<u32> },
    Checkbox,
    Radio { options: Vec<FieldOption> },
    Select { placeholder: Option<String>, options: Vec<FieldOption> },
    Date,
    File { accept: Option<String> },
}

impl FieldConfig {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldConfig::Text { .. } => FieldKind::Text,
            FieldConfig::Email { .. } => FieldKind::Email,
            FieldConfig::Password { .. } => FieldKind::Password,
            FieldConfig::Number { .. } => FieldKind::Number,
            FieldConfig::Tel { .. } => FieldKind::Tel,
            FieldConfig::Textarea { .. } => FieldKind::Textarea,
            FieldConfig::Checkbox => FieldKind::Checkbox,
            FieldConfig::Radio { .. } => FieldKind::Radio,
            FieldConfig::Select { .. } => FieldKind::Select,
            FieldConfig::Date => FieldKind::Date,
            FieldConfig::File { .. } => FieldKind::File,
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        match self {
            FieldConfig::Text { placeholder }
            | FieldConfig::Email { placeholder }
            | FieldConfig::Password { placeholder }
            | FieldConfig::Number { placeholder, .. }
            | FieldConfig::Tel { placeholder }
            | FieldConfig::Textarea { placeholder, .. }
            | FieldConfig::Select { placeholder, .. } => placeholder.as_deref(),
            _ => None,
        }
    }

    pub fn options(&self) -> Option<&[FieldOption]> {
        match self {
            FieldConfig::Radio { options } | FieldConfig::Select { options, .. } => {
                Some(options.as_slice())
            }
            _ => None,
        }
    }

    pub fn bounds(&self) -> Option<NumericBounds> {
        match self {
            FieldConfig::Number { bounds, .. } => Some(*bounds),
            _ => None,
        }
    }
}

/// A validated field of a form definition.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDefinition {
    /// Editor-assigned id, unique within the form.
    pub id: String,
    pub label: String,
    pub required: bool,
    pub help_text: Option<String>,
    pub config: FieldConfig,
    /// Unknown wire keys, preserved verbatim.
    pub extra: Map<String, Value>,
}

impl FieldDefinition {
    pub fn kind(&self) -> FieldKind {
        self.config.kind()
    }
}

// Fields always serialize through the flat wire shape the editor
// produced, so round-trips keep unknown keys intact.
impl Serialize for FieldDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        RawField::from(self).serialize(serializer)
    }
}

/// An option as the editor sends it: a pair, or a bare string used as
/// both label and value.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawOption {
    Pair { label: String, value: String },
    Bare(String),
}

impl RawOption {
    pub fn normalize(self) -> FieldOption {
        match self {
            RawOption::Pair { label, value } => FieldOption { label, value },
            RawOption::Bare(value) => FieldOption {
                label: value.clone(),
                value,
            },
        }
    }
}

/// A numeric bound as the editor sends it: number or numeric string.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawBound {
    Number(f64),
    Text(String),
}

impl RawBound {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawBound::Number(n) => Some(*n),
            RawBound::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// The flat field shape of the editor wire format.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawField {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<RawOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<RawBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<RawBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<&FieldDefinition> for RawField {
    fn from(field: &FieldDefinition) -> Self {
        let bounds = field.config.bounds().unwrap_or_default();
        let (rows, accept) = match &field.config {
            FieldConfig::Textarea { rows, .. } => (*rows, None),
            FieldConfig::File { accept } => (None, accept.clone()),
            _ => (None, None),
        };

        RawField {
            id: field.id.clone(),
            kind: field.kind().as_str().to_string(),
            label: field.label.clone(),
            placeholder: field.config.placeholder().map(str::to_string),
            required: field.required,
            options: field.config.options().map(|options| {
                options
                    .iter()
                    .map(|option| RawOption::Pair {
                        label: option.label.clone(),
                        value: option.value.clone(),
                    })
                    .collect()
            }),
            help_text: field.help_text.clone(),
            rows,
            min: bounds.min.map(RawBound::Number),
            max: bounds.max.map(RawBound::Number),
            accept,
            extra: field.extra.clone(),
        }
    }
}
