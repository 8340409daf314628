use std::fmt;
use std::str::FromStr;

use crate::error::{ModelError, Result};

/// Largest array index a path may address. Values are laid out densely, so
/// an index allocates every slot before it.
pub const MAX_INDEX: usize = 65_535;

fn index_too_large(index: impl fmt::Display) -> ModelError {
    ModelError::IndexTooLarge {
        index: index.to_string(),
        max: MAX_INDEX,
    }
}

/// Fails for indices past [`MAX_INDEX`].
pub(crate) fn check_index(index: usize) -> Result<usize> {
    if index > MAX_INDEX {
        Err(index_too_large(index))
    } else {
        Ok(index)
    }
}

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// Object member name.
    Key(String),
    /// Array position.
    Index(usize),
}

impl Segment {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(key) => Some(key),
            Segment::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Key(_) => None,
            Segment::Index(index) => Some(*index),
        }
    }
}

impl From<&str> for Segment {
    fn from(value: &str) -> Self {
        Segment::Key(value.to_string())
    }
}

impl From<String> for Segment {
    fn from(value: String) -> Self {
        Segment::Key(value)
    }
}

impl From<usize> for Segment {
    fn from(value: usize) -> Self {
        Segment::Index(value)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Address of a field inside nested form data, e.g. `user.addresses[0].city`.
///
/// A path is never empty and always starts with a name. Two paths are equal
/// iff their segments are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    /// Parse dotted/bracket notation.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyPath);
        }

        let mut segments = Vec::new();
        let mut key = String::new();
        // True right after a closing bracket, where only `.` or `[` may follow.
        let mut after_index = false;
        let mut chars = trimmed.chars();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if key.is_empty() && !after_index {
                        return Err(ModelError::invalid(input, "empty segment"));
                    }
                    if !key.is_empty() {
                        segments.push(Segment::Key(std::mem::take(&mut key)));
                    }
                    after_index = false;
                    match chars.as_str().chars().next() {
                        None => return Err(ModelError::invalid(input, "trailing '.'")),
                        Some('[') => {
                            return Err(ModelError::invalid(input, "expected a name after '.'"));
                        }
                        Some(_) => {}
                    }
                }
                '[' => {
                    if !key.is_empty() {
                        segments.push(Segment::Key(std::mem::take(&mut key)));
                    } else if segments.is_empty() {
                        return Err(ModelError::LeadingIndex {
                            input: input.to_string(),
                        });
                    }
                    let rest = chars.as_str();
                    let Some(end) = rest.find(']') else {
                        return Err(ModelError::invalid(input, "unterminated '['"));
                    };
                    let digits = &rest[..end];
                    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                        return Err(ModelError::invalid(
                            input,
                            format!("index {digits:?} is not a number"),
                        ));
                    }
                    let index = digits
                        .parse::<usize>()
                        .ok()
                        .filter(|index| *index <= MAX_INDEX)
                        .ok_or_else(|| index_too_large(digits))?;
                    segments.push(Segment::Index(index));
                    chars = rest[end + 1..].chars();
                    after_index = true;
                }
                ']' => return Err(ModelError::invalid(input, "unexpected ']'")),
                _ => {
                    if after_index {
                        return Err(ModelError::invalid(
                            input,
                            "expected '.' or '[' after an index",
                        ));
                    }
                    key.push(ch);
                }
            }
        }
        if !key.is_empty() {
            segments.push(Segment::Key(key));
        }
        Self::from_segments(segments)
    }

    /// Build a path from raw segments.
    pub fn from_segments(segments: Vec<Segment>) -> Result<Self> {
        match segments.first() {
            None => Err(ModelError::EmptyPath),
            Some(Segment::Index(_)) => Err(ModelError::LeadingIndex {
                input: render(&segments),
            }),
            Some(Segment::Key(_)) => {
                for segment in &segments {
                    if let Segment::Index(index) = segment {
                        check_index(*index)?;
                    }
                }
                Ok(Self(segments))
            }
        }
    }

    /// Single-segment path for a top-level field name.
    pub fn name(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ModelError::EmptyPath);
        }
        Ok(Self(vec![Segment::Key(name)]))
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.0.push(Segment::Key(key.into()));
        self
    }

    #[must_use]
    pub fn with_index(mut self, index: usize) -> Self {
        self.0.push(Segment::Index(index));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// The leading field group/name.
    pub fn head(&self) -> &str {
        match self.0.first() {
            Some(Segment::Key(key)) => key,
            _ => unreachable!("FieldPath always starts with a key"),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parent path, or `None` for a top-level field.
    pub fn parent(&self) -> Option<FieldPath> {
        if self.0.len() < 2 {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn starts_with(&self, prefix: &FieldPath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

fn render(segments: &[Segment]) -> String {
    let mut out = String::new();
    for (idx, segment) in segments.iter().enumerate() {
        if idx > 0 && matches!(segment, Segment::Key(_)) {
            out.push('.');
        }
        out.push_str(&segment.to_string());
    }
    out
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.0))
    }
}

impl FromStr for FieldPath {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl serde::Serialize for FieldPath {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for FieldPath {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
