//! Phase Anchor Resolution
//!
//! Turns sparse, possibly missing phase marks from an upstream segmentation
//! step into three anchor frames. Contact is the single signal everything
//! else falls back on: when a mark is missing, the anchor is derived from
//! contact with a fixed frame offset.

use serde::{Deserialize, Serialize};

/// Label of the ball-contact phase
pub const CONTACT: &str = "contact";
/// Label of the follow-through phase
pub const FOLLOW_THROUGH: &str = "follow_through";
/// Label of the unit-turn (shoulder turn) phase
pub const UNIT_TURN: &str = "unit_turn";

/// Default frames from contact to follow-through
pub const DEFAULT_FOLLOW_THROUGH_OFFSET: usize = 12;
/// Default frames from unit turn to contact
pub const DEFAULT_UNIT_TURN_OFFSET: usize = 24;

/// A labelled frame from phase segmentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseMark {
    /// Frame index
    pub frame: usize,
    /// Phase label, compared case-insensitively
    #[serde(rename = "phase")]
    pub label: String,
}

impl PhaseMark {
    pub fn new(frame: usize, label: impl Into<String>) -> Self {
        Self {
            frame,
            label: label.into(),
        }
    }

    /// Case-insensitive label match
    pub fn is(&self, label: &str) -> bool {
        self.label.eq_ignore_ascii_case(label)
    }
}

/// Frames representing the three named phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseAnchors {
    pub unit_turn: usize,
    pub contact: usize,
    pub follow_through: usize,
}

impl PhaseAnchors {
    /// Frames between unit turn and contact, floored at zero
    pub fn unit_turn_to_contact(&self) -> usize {
        self.contact.saturating_sub(self.unit_turn)
    }
}

/// Anchor resolver with configurable fallback offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseResolver {
    /// Frames added to contact when no follow-through mark exists
    pub follow_through_offset: usize,
    /// Frames subtracted from contact when no unit-turn mark exists
    pub unit_turn_offset: usize,
}

impl PhaseResolver {
    /// Create with default offsets
    pub fn new() -> Self {
        Self {
            follow_through_offset: DEFAULT_FOLLOW_THROUGH_OFFSET,
            unit_turn_offset: DEFAULT_UNIT_TURN_OFFSET,
        }
    }

    pub fn with_offsets(follow_through_offset: usize, unit_turn_offset: usize) -> Self {
        Self {
            follow_through_offset,
            unit_turn_offset,
        }
    }

    /// Resolve anchors for a sequence of `len` frames.
    ///
    /// Every anchor lies in `[0, len - 1]`. Returns `None` for an empty
    /// sequence, where no frame can be anchored.
    pub fn resolve(&self, phases: &[PhaseMark], len: usize) -> Option<PhaseAnchors> {
        let last = len.checked_sub(1)?;
        let clamp = |frame: usize| frame.min(last);

        let contact = clamp(first_frame(phases, CONTACT).unwrap_or(len / 2));

        let follow_through = clamp(
            first_frame(phases, FOLLOW_THROUGH)
                .unwrap_or_else(|| contact.saturating_add(self.follow_through_offset).min(last)),
        );

        let unit_turn = clamp(
            first_frame(phases, UNIT_TURN)
                .unwrap_or_else(|| contact.saturating_sub(self.unit_turn_offset)),
        );

        Some(PhaseAnchors {
            unit_turn,
            contact,
            follow_through,
        })
    }
}

impl Default for PhaseResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve anchors with the default offsets
pub fn resolve_anchors(phases: &[PhaseMark], len: usize) -> Option<PhaseAnchors> {
    PhaseResolver::new().resolve(phases, len)
}

/// Frame of the first mark carrying `label`
fn first_frame(phases: &[PhaseMark], label: &str) -> Option<usize> {
    phases.iter().find(|m| m.is(label)).map(|m| m.frame)
}
