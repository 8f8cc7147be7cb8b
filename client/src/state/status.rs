//! Transient status line.
//!
//! Each message carries a sequence number. A clear timer only removes the
//! message it was scheduled for, so a newer message is never cut short by
//! an older timer.

#[cfg(test)]
#[path = "status_test.rs"]
mod status_test;

use std::time::Duration;

/// How long a status message stays visible.
pub const STATUS_TTL: Duration = Duration::from_millis(1600);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Success,
    Error,
}

impl StatusTone {
    /// Text color for the tone.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Success => "#2f855a",
            Self::Error => "#c53030",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub seq: u64,
    pub text: String,
    pub tone: StatusTone,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusLine {
    current: Option<StatusMessage>,
    next_seq: u64,
}

impl StatusLine {
    #[must_use]
    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    /// Replace the visible message. Returns the new message's sequence number.
    pub fn show(&mut self, text: impl Into<String>, tone: StatusTone) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.current = Some(StatusMessage { seq, text: text.into(), tone });
        seq
    }

    /// Clear the message if `seq` is still the visible one.
    pub fn expire(&mut self, seq: u64) -> bool {
        if self.current.as_ref().is_some_and(|m| m.seq == seq) {
            self.current = None;
            true
        } else {
            false
        }
    }
}
