//! Terminal display sink.
//!
//! Inbound messages print as `[2020-09-13 12:26:40] 0x0002> hello`, the
//! decoded tag showing who sent the message and when.

use chrono::DateTime;

use pairchat_core::{DecodeError, Message};
use pairchat_session::DisplaySink;

/// Prints decoded traffic to stdout and problems to stderr.
pub struct TerminalSink;

impl DisplaySink for TerminalSink {
    fn message(&mut self, message: Message) {
        println!(
            "[{}] {}> {}",
            format_timestamp(message.tag.timestamp_secs()),
            message.tag.device(),
            message.text
        );
    }

    fn decode_failure(&mut self, error: DecodeError) {
        eprintln!("dropped one undecodable message: {error}");
    }

    fn peer_closed(&mut self) {
        println!("peer left the chat");
    }
}

/// Render a tag timestamp as UTC wall-clock time.
fn format_timestamp(secs: u64) -> String {
    // Tag timestamps are 48-bit, so the cast cannot wrap.
    DateTime::from_timestamp(secs as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_known_epoch() {
        assert_eq!(format_timestamp(1_600_000_000), "2020-09-13 12:26:40");
    }

    #[test]
    fn formats_epoch_zero() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
    }
}
