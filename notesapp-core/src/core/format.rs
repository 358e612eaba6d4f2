//! Format kinds and the toolbar's active-format state.

use std::collections::BTreeSet;

/// A single kind of formatting a span can carry.
///
/// The variant name doubles as the canonical tag written to persisted
/// documents (see [`FormatKind::tag`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormatKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Highlight,
    Heading,
    Subheading,
    Body,
    BulletList,
    DashedList,
    NumberedList,
}

/// An ordered set of format kinds. Ordering keeps serialization deterministic.
pub type FormatSet = BTreeSet<FormatKind>;

impl FormatKind {
    /// Every kind, in declaration order.
    pub const ALL: [FormatKind; 11] = [
        Self::Bold,
        Self::Italic,
        Self::Underline,
        Self::Strikethrough,
        Self::Highlight,
        Self::Heading,
        Self::Subheading,
        Self::Body,
        Self::BulletList,
        Self::DashedList,
        Self::NumberedList,
    ];

    /// Canonical persisted name of this kind.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Underline => "Underline",
            Self::Strikethrough => "Strikethrough",
            Self::Highlight => "Highlight",
            Self::Heading => "Heading",
            Self::Subheading => "Subheading",
            Self::Body => "Body",
            Self::BulletList => "BulletList",
            Self::DashedList => "DashedList",
            Self::NumberedList => "NumberedList",
        }
    }

    /// Inverse of [`tag`](Self::tag). Returns `None` for unrecognized names.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.tag() == tag)
    }

    /// `true` for the kinds that turn lines into list items.
    #[must_use]
    pub fn is_list(self) -> bool {
        matches!(self, Self::BulletList | Self::DashedList | Self::NumberedList)
    }
}

/// The set of formats the user has toggled on in the toolbar.
///
/// Heading and Subheading are mutually exclusive; every other kind toggles
/// independently. The state lives as long as the editor screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFormats {
    kinds: FormatSet,
}

impl ActiveFormats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips `kind` and returns whether it is active afterwards.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use notesapp_core::{ActiveFormats, FormatKind};
    ///
    /// let mut active = ActiveFormats::new();
    /// active.toggle(FormatKind::Subheading);
    /// assert!(active.toggle(FormatKind::Heading));
    /// assert!(!active.contains(FormatKind::Subheading));
    /// ```
    pub fn toggle(&mut self, kind: FormatKind) -> bool {
        if self.kinds.remove(&kind) {
            return false;
        }
        match kind {
            FormatKind::Heading => {
                self.kinds.remove(&FormatKind::Subheading);
            }
            FormatKind::Subheading => {
                self.kinds.remove(&FormatKind::Heading);
            }
            _ => {}
        }
        self.kinds.insert(kind);
        true
    }

    pub fn contains(&self, kind: FormatKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn as_set(&self) -> &FormatSet {
        &self.kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trips_for_every_kind() {
        for kind in FormatKind::ALL {
            assert_eq!(FormatKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(FormatKind::from_tag("Sparkle"), None);
    }

    #[test]
    fn test_toggle_heading_deselects_subheading() {
        let mut active = ActiveFormats::new();
        active.toggle(FormatKind::Subheading);
        active.toggle(FormatKind::Heading);
        assert!(active.contains(FormatKind::Heading));
        assert!(!active.contains(FormatKind::Subheading));
    }

    #[test]
    fn test_toggle_subheading_deselects_heading() {
        let mut active = ActiveFormats::new();
        active.toggle(FormatKind::Heading);
        active.toggle(FormatKind::Subheading);
        assert!(active.contains(FormatKind::Subheading));
        assert!(!active.contains(FormatKind::Heading));
    }

    #[test]
    fn test_toggle_other_kinds_is_independent() {
        let mut active = ActiveFormats::new();
        assert!(active.toggle(FormatKind::Bold));
        assert!(active.toggle(FormatKind::Italic));
        assert!(active.toggle(FormatKind::Heading));
        assert!(!active.toggle(FormatKind::Bold));
        assert!(active.contains(FormatKind::Italic));
        assert!(active.contains(FormatKind::Heading));
        assert!(!active.contains(FormatKind::Bold));
    }

    #[test]
    fn test_toggle_active_heading_turns_it_off() {
        let mut active = ActiveFormats::new();
        active.toggle(FormatKind::Heading);
        assert!(!active.toggle(FormatKind::Heading));
        assert!(active.is_empty());
    }
}
