#![forbid(unsafe_code)]

//! Quest runtime.
//!
//! Wraps the quest engine kernel with save files, an activity ledger,
//! configuration and a session facade for interactive front ends.
//!
//! No goal or scoring logic lives here; it is all delegated to the
//! kernel.

pub mod activity;
pub mod config;
pub mod proto_types;
pub mod proto_bridge;
pub mod ledger;
pub mod save_codec;
pub mod session;

pub use config::QuestConfig;
pub use save_codec::{CodecError, LoadDiagnostic, LoadReport};
pub use session::{QuestSession, SessionError};
