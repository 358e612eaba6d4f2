//! Visual styles derived from format sets, and rendering of spans into styled runs.
//!
//! Each span contributes a [`VisualStyle`] patch computed from its format set.
//! Rendering overlays the patches of all spans covering a character in span
//! list order, so a later span overrides conflicting attributes of an earlier
//! one (two different font sizes on the same text: the later one wins).

use crate::core::text::{char_len, slice_chars};
use crate::{FormatKind, FormatSet, FormattingSpan, Result};
use serde::Serialize;

/// Point size of Heading text.
pub const HEADING_FONT_SIZE: f32 = 24.0;
/// Point size of Subheading text.
pub const SUBHEADING_FONT_SIZE: f32 = 20.0;
/// Point size of Body (default) text.
pub const BODY_FONT_SIZE: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FontWeight {
    Normal,
    Bold,
}

/// Underline and strikethrough cannot be combined; a span claiming both
/// renders as [`TextDecoration::LineThrough`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TextDecoration {
    Underline,
    LineThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FontSize {
    Heading,
    Subheading,
    Body,
}

impl FontSize {
    pub fn points(self) -> f32 {
        match self {
            Self::Heading => HEADING_FONT_SIZE,
            Self::Subheading => SUBHEADING_FONT_SIZE,
            Self::Body => BODY_FONT_SIZE,
        }
    }
}

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const YELLOW: Color = Color {
        r: 0xFF,
        g: 0xFF,
        b: 0x00,
        a: 0xFF,
    };
}

/// The attributes one span sets. `None` leaves the attribute to earlier spans
/// or the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VisualStyle {
    pub font_weight: Option<FontWeight>,
    pub italic: Option<bool>,
    pub decoration: Option<TextDecoration>,
    pub background: Option<Color>,
    pub font_size: Option<FontSize>,
}

impl VisualStyle {
    /// Derives the visual patch for a set of formats. List kinds have no visual
    /// attributes; their prefixes live in the text.
    pub fn from_formats(formats: &FormatSet) -> Self {
        let has = |kind: FormatKind| formats.contains(&kind);
        let decoration = if has(FormatKind::Strikethrough) {
            Some(TextDecoration::LineThrough)
        } else if has(FormatKind::Underline) {
            Some(TextDecoration::Underline)
        } else {
            None
        };
        let font_size = if has(FormatKind::Heading) {
            Some(FontSize::Heading)
        } else if has(FormatKind::Subheading) {
            Some(FontSize::Subheading)
        } else if has(FormatKind::Body) {
            Some(FontSize::Body)
        } else {
            None
        };
        Self {
            font_weight: has(FormatKind::Bold).then_some(FontWeight::Bold),
            italic: has(FormatKind::Italic).then_some(true),
            decoration,
            background: has(FormatKind::Highlight).then_some(Color::YELLOW),
            font_size,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// The fully resolved style of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub font_weight: FontWeight,
    pub italic: bool,
    pub decoration: Option<TextDecoration>,
    pub background: Option<Color>,
    pub font_size: FontSize,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self {
            font_weight: FontWeight::Normal,
            italic: false,
            decoration: None,
            background: None,
            font_size: FontSize::Body,
        }
    }
}

impl ResolvedStyle {
    fn overlay(&mut self, patch: &VisualStyle) {
        if let Some(weight) = patch.font_weight {
            self.font_weight = weight;
        }
        if let Some(italic) = patch.italic {
            self.italic = italic;
        }
        if let Some(decoration) = patch.decoration {
            self.decoration = Some(decoration);
        }
        if let Some(background) = patch.background {
            self.background = Some(background);
        }
        if let Some(size) = patch.font_size {
            self.font_size = size;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledRun {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub style: ResolvedStyle,
}

/// Text split into consecutive runs of uniform style.
///
/// The runs cover the whole text without gaps; an empty text has no runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledText {
    pub text: String,
    pub runs: Vec<StyledRun>,
}

impl StyledText {
    /// Style of the char at `offset`, or `None` past the end.
    pub fn style_at(&self, offset: usize) -> Option<&ResolvedStyle> {
        self.runs
            .iter()
            .find(|run| run.start <= offset && offset < run.end)
            .map(|run| &run.style)
    }
}

/// Renders `text` with `spans` applied in list order.
///
/// # Errors
///
/// Returns [`crate::NotesError::InvalidSpanRange`] if a span does not fit `text`.
///
/// # Examples
///
/// ```rust
/// use notesapp_core::{apply_styles, FontWeight, FormatKind, FormattingSpan};
///
/// let spans = vec![FormattingSpan::single(0, 5, FormatKind::Bold)];
/// let styled = apply_styles("Hello world", &spans).unwrap();
/// assert_eq!(styled.runs.len(), 2);
/// assert_eq!(styled.runs[0].text, "Hello");
/// assert_eq!(styled.runs[0].style.font_weight, FontWeight::Bold);
/// ```
pub fn apply_styles(text: &str, spans: &[FormattingSpan]) -> Result<StyledText> {
    let len = char_len(text);
    for span in spans {
        span.validate(len)?;
    }

    let patches: Vec<(usize, usize, VisualStyle)> = spans
        .iter()
        .filter(|span| !span.is_empty())
        .map(|span| (span.start, span.end, VisualStyle::from_formats(&span.formats)))
        .collect();

    let mut boundaries: Vec<usize> = patches
        .iter()
        .flat_map(|(start, end, _)| [*start, *end])
        .chain([0, len])
        .collect();
    boundaries.sort_unstable();
    boundaries.dedup();

    let mut runs: Vec<StyledRun> = Vec::new();
    for window in boundaries.windows(2) {
        let (start, end) = (window[0], window[1]);
        let mut style = ResolvedStyle::default();
        for (_, _, patch) in patches.iter().filter(|(s, e, _)| *s <= start && end <= *e) {
            style.overlay(patch);
        }
        match runs.last_mut() {
            Some(last) if last.style == style => {
                last.end = end;
                last.text.push_str(slice_chars(text, start, end));
            }
            _ => runs.push(StyledRun {
                start,
                end,
                text: slice_chars(text, start, end).to_string(),
                style,
            }),
        }
    }

    Ok(StyledText {
        text: text.to_string(),
        runs,
    })
}
