//! Stores the session handling shared between the dashboard clients
//! NB: The assumption is made that the async runtime has already been started
//! before any functions from this library are called

#![warn(unused_crate_dependencies)]


mod client;
pub mod guard;
pub mod session;
pub mod store;

pub use client::{Client, UiCallBack, DUMMY_ARGUMENT};
pub use guard::{GuardKind, GuardState, GuardView, Navigator, RouteGuard};
pub use session::{SessionSnapshot, SessionState, WakeFn};
pub use store::{CredentialStore, StorageBackend};
