//! Stdin input source.
//!
//! Each typed line becomes one message stamped with the current time and the
//! local device ID, then waits its turn in the outbound queue. EOF closes the
//! queue, which the session treats as a request to finish up.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use pairchat_core::{DeviceId, Message};
use pairchat_session::OutboundProducer;

/// Read stdin lines into the outbound queue until EOF or session close.
pub async fn read_lines(producer: OutboundProducer, device: DeviceId) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.is_empty() {
                    continue;
                }
                if producer.enqueue(Message::now(device, line)).await.is_err() {
                    // Session already closed; nothing more to hand off.
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "stdin read failed");
                break;
            }
        }
    }
    producer.close();
}
