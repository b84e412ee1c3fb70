//! A tagged line of text.

use crate::device::DeviceId;
use crate::tag::Tag;

/// One application message: who/when plus the text itself.
///
/// Immutable once constructed; values move through the outbound queue and
/// the session by value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Sender and send-time identifier.
    pub tag: Tag,
    /// UTF-8 text content.
    pub text: String,
}

impl Message {
    /// Build a message from an existing tag.
    #[must_use]
    pub fn new(tag: Tag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }

    /// Build a message stamped with the current time, as the input source
    /// does when a line is typed.
    #[must_use]
    pub fn now(device: DeviceId, text: impl Into<String>) -> Self {
        Self {
            tag: Tag::now(device),
            text: text.into(),
        }
    }
}
