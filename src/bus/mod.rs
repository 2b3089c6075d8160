//! Push channel for real-time client synchronization.
//!
//! Every committed mutation produces one [`Notification`] that is fanned out
//! to all currently connected sessions:
//! - `SessionRegistry`: explicit set of live sessions, added/removed by the
//!   transport layer on connect/disconnect
//! - `Broadcaster`: serializes a notification once and delivers it to every
//!   registered session, skipping any whose channel has closed
//!
//! There are no topics and no per-session filtering; every session receives
//! every notification. Nothing is queued or replayed for sessions that
//! connect later.

mod broadcaster;
mod registry;

pub use broadcaster::{Broadcaster, Notification, NotificationKind};
pub use registry::{SessionId, SessionRegistry};
