//! Server ↔ Scheduler Link
//!
//! The HTTP task and the scheduler loop run on the same executor. The
//! server pushes a parsed [`Command`] into [`REQUESTS`] and waits on
//! [`REPLIES`]; the scheduler drains requests at the start of each tick
//! and answers each one before dispatching.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::config::REQUEST_QUEUE_DEPTH;
use crate::control::RequestSource;
use crate::protocol::{Command, Response};

/// Commands waiting for the scheduler
pub static REQUESTS: Channel<CriticalSectionRawMutex, Command, REQUEST_QUEUE_DEPTH> = Channel::new();

/// Scheduler answers waiting for the server
pub static REPLIES: Channel<CriticalSectionRawMutex, Response, REQUEST_QUEUE_DEPTH> = Channel::new();

/// Scheduler-side view of the link
#[derive(Clone, Copy, Debug, Default)]
pub struct ChannelRequests;

impl RequestSource for ChannelRequests {
    fn next_request(&mut self) -> Option<Command> {
        REQUESTS.try_receive().ok()
    }

    fn respond(&mut self, response: Response) {
        if REPLIES.try_send(response).is_err() {
            log_warn!("reply dropped, server not waiting");
        }
    }
}

/// Server-side round trip: submit a command and wait for its answer
pub async fn exchange(command: Command) -> Response {
    REQUESTS.send(command).await;
    REPLIES.receive().await
}
