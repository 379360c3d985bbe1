//! What a save call returns: a descriptor plus the coercion warnings raised
//! on the way.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::logging::WARNING_TARGET;

/// Describes one successful save. Built fresh per call, never mutated after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Descriptor {
    /// Driver that ran (`json`, `npy`, `npz`, `image`, `txt`, `pb`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Name/URL of the sink written.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Vec<usize>>,
    /// Member names of a bundle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
}

impl Descriptor {
    pub fn new(kind: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            url: url.into(),
            shape: None,
            members: None,
        }
    }

    pub fn with_shape(mut self, shape: Vec<usize>) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn with_members(mut self, members: Vec<String>) -> Self {
        self.members = Some(members);
        self
    }
}

/// A value was wrong but coercible; it was converted and saving continued,
/// or (for messages) the failure is about to be returned.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveWarning {
    /// A single array was saved as a one-member bundle.
    SingleArrayBundle,
    /// A non-text line was written via its textual representation.
    LineConverted { index: usize, type_name: String },
    /// A non-text, non-sequence value was written as one text line.
    ValueConverted { type_name: String },
    /// Array values outside the domain were clipped.
    DomainClipped {
        low: f64,
        high: f64,
        domain: (f64, f64),
    },
    /// Image pixels were converted to a color type the codec can store.
    ColorConverted { from: String, to: &'static str },
    /// Wire serialization failed for this value; the failure follows.
    MessageFailed { value: String },
}

impl fmt::Display for SaveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveWarning::SingleArrayBundle => write!(
                f,
                "saving a single array as an npz bundle; did you want npy instead?"
            ),
            SaveWarning::LineConverted { index, type_name } => write!(
                f,
                "line {} is of type {}; using its textual representation",
                index, type_name
            ),
            SaveWarning::ValueConverted { type_name } => write!(
                f,
                "value of type {} is not text; writing its textual representation",
                type_name
            ),
            SaveWarning::DomainClipped { low, high, domain } => write!(
                f,
                "clipping array values from [{}, {}] to domain [{}, {}]",
                low, high, domain.0, domain.1
            ),
            SaveWarning::ColorConverted { from, to } => {
                write!(f, "converting image from {} to {}", from, to)
            }
            SaveWarning::MessageFailed { value } => write!(
                f,
                "wire serialization failed for {}; returning the original error",
                value
            ),
        }
    }
}

/// Warning collector threaded through drivers. Every raised warning is also
/// emitted on the `lodge::warning` tracing target, apart from normal logs.
#[derive(Debug, Default)]
pub struct Warnings {
    items: Vec<SaveWarning>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&mut self, warning: SaveWarning) {
        tracing::warn!(target: WARNING_TARGET, "{}", warning);
        self.items.push(warning);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[SaveWarning] {
        &self.items
    }

    /// Warnings raised after the first `start`.
    pub fn since(&self, start: usize) -> &[SaveWarning] {
        self.items.get(start..).unwrap_or(&[])
    }

    pub fn into_vec(self) -> Vec<SaveWarning> {
        self.items
    }
}

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub descriptor: Descriptor,
    pub warnings: Vec<SaveWarning>,
}

impl SaveOutcome {
    /// True when any coercion happened during the save.
    pub fn is_coerced(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_serializes_type_field() {
        let d = Descriptor::new("npy", "a.npy").with_shape(vec![2, 3]);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["type"], "npy");
        assert_eq!(json["url"], "a.npy");
        assert_eq!(json["shape"], serde_json::json!([2, 3]));
        assert!(json.get("members").is_none());
    }

    #[test]
    fn warnings_since() {
        let mut w = Warnings::new();
        w.raise(SaveWarning::SingleArrayBundle);
        w.raise(SaveWarning::ValueConverted {
            type_name: "int".into(),
        });
        assert_eq!(w.len(), 2);
        assert_eq!(w.since(1).len(), 1);
        assert!(w.since(5).is_empty());
    }

    #[test]
    fn line_converted_names_type() {
        let w = SaveWarning::LineConverted {
            index: 1,
            type_name: "int".into(),
        };
        assert!(w.to_string().contains("int"));
    }
}
