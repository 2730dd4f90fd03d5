//! Device-side UPnP AV services
//!
//! [`publisher`] turns a service's current variables into event batches,
//! [`receiver`] implements the OpenHome Receiver service on top of a local
//! player, and [`helper`] manages the external process the receiver relays
//! audio through.

pub mod error;
pub mod helper;
pub mod publisher;
pub mod receiver;

pub use error::{PlayerError, ProcessError, Result, ServiceError};
pub use helper::{ChildProcess, CommandLauncher, HelperProcess, HelperSlot, ProcessLauncher};
pub use publisher::{EventPublisher, EventedService, LoopWaker, ServiceSnapshot};
pub use receiver::{PlayerControl, PlayerState, Playlist, ReceiverConfig, ReceiverService};
