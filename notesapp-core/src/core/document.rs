//! The persisted form of a note description.
//!
//! A description is stored as JSON:
//!
//! ```json
//! {"version":2,"text":"Hello world","spans":[{"start":0,"end":5,"formats":["Bold"]}]}
//! ```
//!
//! Each span stores its format set directly, so encoding is lossless.
//! Documents written by older versions carry a single `formatTag` per span
//! instead (`"version":1` or no version at all); those are still read, and
//! [`Document::serialize_tagged`] can still produce them.
//!
//! Reading never fails. Formatting that cannot be understood is dropped and the
//! text is kept: unknown or missing tags, out-of-range offsets, and
//! descriptions that are not JSON at all (loaded as plain text).

use crate::core::text::char_len;
use crate::{FormatKind, FormatSet, FormattingSpan, Result};
use serde::{Deserialize, Serialize};

const FORMAT_VERSION: u32 = 2;
const TAGGED_FORMAT_VERSION: u32 = 1;

/// Text plus the spans that format it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub text: String,
    pub spans: Vec<FormattingSpan>,
}

/// Why a stored span was not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The span named a format this version does not know.
    UnknownFormatTag(String),
    /// A tagged span had no tag (its style matched no single format).
    MissingFormatTag,
    /// Offsets were negative, reversed, past the end of the text, or empty.
    InvalidRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedSpan {
    pub start: i64,
    pub end: i64,
    pub reason: DropReason,
}

/// A decoded document together with whatever formatting had to be dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDocument {
    pub document: Document,
    pub dropped: Vec<DroppedSpan>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredDocument {
    #[serde(default)]
    version: u32,
    text: String,
    #[serde(default)]
    spans: Vec<StoredSpan>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSpan {
    start: i64,
    end: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    formats: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    format_tag: Option<String>,
}

impl Document {
    /// Builds a document, checking every span against the text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotesError::InvalidSpanRange`] for a span that does not
    /// fit the text.
    pub fn new(text: impl Into<String>, spans: Vec<FormattingSpan>) -> Result<Self> {
        let text = text.into();
        let len = char_len(&text);
        for span in &spans {
            span.validate(len)?;
        }
        Ok(Self { text, spans })
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            spans: Vec::new(),
        }
    }

    /// Length of the text in chars.
    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Encodes the document in the current (lossless) format.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotesError::Json`] if encoding fails.
    pub fn serialize(&self) -> Result<String> {
        let stored = StoredDocument {
            version: FORMAT_VERSION,
            text: self.text.clone(),
            spans: self
                .spans
                .iter()
                .filter(|span| !span.is_empty() && !span.formats.is_empty())
                .map(|span| StoredSpan {
                    start: span.start as i64,
                    end: span.end as i64,
                    formats: span.formats.iter().map(|k| k.tag().to_string()).collect(),
                    format_tag: None,
                })
                .collect(),
        };
        Ok(serde_json::to_string(&stored)?)
    }

    /// Encodes the document in the older single-tag format.
    ///
    /// This format is lossy: a span is written with a tag only when its format
    /// set has exactly one kind. Any other span is written without a tag and
    /// will be dropped when read back.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NotesError::Json`] if encoding fails.
    pub fn serialize_tagged(&self) -> Result<String> {
        let stored = StoredDocument {
            version: TAGGED_FORMAT_VERSION,
            text: self.text.clone(),
            spans: self
                .spans
                .iter()
                .filter(|span| !span.is_empty())
                .map(|span| StoredSpan {
                    start: span.start as i64,
                    end: span.end as i64,
                    formats: Vec::new(),
                    format_tag: canonical_tag(&span.formats).map(|k| k.tag().to_string()),
                })
                .collect(),
        };
        Ok(serde_json::to_string(&stored)?)
    }

    /// Decodes a stored description, dropping whatever formatting it cannot use.
    pub fn deserialize(stored: &str) -> Document {
        Self::decode(stored).document
    }

    /// Like [`deserialize`](Self::deserialize), but also reports dropped spans.
    pub fn decode(stored: &str) -> DecodedDocument {
        let parsed: StoredDocument = match serde_json::from_str(stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::debug!("description is not a stored document ({e}); loading as plain text");
                return DecodedDocument {
                    document: Document::plain(stored),
                    dropped: Vec::new(),
                };
            }
        };

        let len = char_len(&parsed.text) as i64;
        let tagged = parsed.version < FORMAT_VERSION;
        let mut spans = Vec::new();
        let mut dropped = Vec::new();

        for stored_span in parsed.spans {
            let (start, end) = (stored_span.start, stored_span.end);
            let mut reject = |reason: DropReason| {
                log::warn!("dropping stored span {start}..{end}: {reason:?}");
                dropped.push(DroppedSpan { start, end, reason });
            };

            if start < 0 || start >= end || end > len {
                reject(DropReason::InvalidRange);
                continue;
            }

            let formats = if tagged {
                match stored_span.format_tag.as_deref() {
                    None => {
                        reject(DropReason::MissingFormatTag);
                        continue;
                    }
                    Some(tag) => match FormatKind::from_tag(tag) {
                        Some(kind) => FormatSet::from([kind]),
                        None => {
                            reject(DropReason::UnknownFormatTag(tag.to_string()));
                            continue;
                        }
                    },
                }
            } else {
                let mut formats = FormatSet::new();
                for name in &stored_span.formats {
                    match FormatKind::from_tag(name) {
                        Some(kind) => {
                            formats.insert(kind);
                        }
                        None => reject(DropReason::UnknownFormatTag(name.clone())),
                    }
                }
                if formats.is_empty() {
                    continue;
                }
                formats
            };

            spans.push(FormattingSpan {
                start: start as usize,
                end: end as usize,
                formats,
            });
        }

        DecodedDocument {
            document: Document {
                text: parsed.text,
                spans,
            },
            dropped,
        }
    }
}

/// The single kind a format set collapses to in the tagged format, if any.
pub fn canonical_tag(formats: &FormatSet) -> Option<FormatKind> {
    let mut kinds = formats.iter();
    match (kinds.next(), kinds.next()) {
        (Some(kind), None) => Some(*kind),
        _ => None,
    }
}
