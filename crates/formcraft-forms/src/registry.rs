//! Field type registry
//!
//! Static catalog of the field kinds the builder supports and the
//! structural features each one carries. Read-only after construction;
//! an unknown kind is an error, never a silent default, so a bad field
//! is rejected whole instead of degrading into a text input.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{FormsError, Result};

/// The type tag of a form field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Number,
    Tel,
    Textarea,
    Checkbox,
    Radio,
    Select,
    Date,
    File,
}

impl FieldKind {
    pub const ALL: [FieldKind; 11] = [
        FieldKind::Text,
        FieldKind::Email,
        FieldKind::Password,
        FieldKind::Number,
        FieldKind::Tel,
        FieldKind::Textarea,
        FieldKind::Checkbox,
        FieldKind::Radio,
        FieldKind::Select,
        FieldKind::Date,
        FieldKind::File,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Password => "password",
            FieldKind::Number => "number",
            FieldKind::Tel => "tel",
            FieldKind::Textarea => "textarea",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
            FieldKind::Select => "select",
            FieldKind::Date => "date",
            FieldKind::File => "file",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = FormsError;

    fn from_str(s: &str) -> Result<Self> {
        FieldKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| FormsError::UnknownFieldKind(s.to_string()))
    }
}

/// Structural facts about one field kind.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTypeDescriptor {
    pub kind: FieldKind,
    pub has_placeholder: bool,
    pub has_options: bool,
    pub has_numeric_bounds: bool,
    pub has_file_accept: bool,
    pub default_label: &'static str,
}

/// Catalog of supported field kinds, keyed by kind.
pub struct FieldTypeRegistry {
    descriptors: HashMap<FieldKind, FieldTypeDescriptor>,
}

impl FieldTypeRegistry {
    /// The builder's built-in catalog.
    pub fn builtin() -> Self {
        let entries = [
            (FieldKind::Text, true, false, false, false, "Text Field"),
            (FieldKind::Email, true, false, false, false, "Email"),
            (FieldKind::Password, true, false, false, false, "Password"),
            (FieldKind::Number, true, false, true, false, "Number"),
            (FieldKind::Tel, true, false, false, false, "Phone Number"),
            (FieldKind::Textarea, true, false, false, false, "Text Area"),
            (FieldKind::Checkbox, false, false, false, false, "Checkbox"),
            (
                FieldKind::Radio,
                false,
                true,
                false,
                false,
                "Radio Button Group",
            ),
            (FieldKind::Select, true, true, false, false, "Dropdown"),
            (FieldKind::Date, false, false, false, false, "Date"),
            (FieldKind::File, false, false, false, true, "File Upload"),
        ];

        let descriptors = entries
            .into_iter()
            .map(
                |(kind, has_placeholder, has_options, has_numeric_bounds, has_file_accept, label)| {
                    (
                        kind,
                        FieldTypeDescriptor {
                            kind,
                            has_placeholder,
                            has_options,
                            has_numeric_bounds,
                            has_file_accept,
                            default_label: label,
                        },
                    )
                },
            )
            .collect();

        Self { descriptors }
    }

    /// Resolve a raw kind string from the editor wire format.
    pub fn describe(&self, kind: &str) -> Result<&FieldTypeDescriptor> {
        let kind = FieldKind::from_str(kind)?;
        self.descriptors
            .get(&kind)
            .ok_or_else(|| FormsError::UnknownFieldKind(kind.to_string()))
    }

    /// Descriptor for an already-typed kind.
    pub fn descriptor(&self, kind: FieldKind) -> &FieldTypeDescriptor {
        // builtin() seeds every variant; a miss is a construction bug
        &self.descriptors[&kind]
    }

    pub fn kinds(&self) -> impl Iterator<Item = FieldKind> + '_ {
        self.descriptors.keys().copied()
    }
}

impl Default for FieldTypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
