//! # Osteoview Client
//!
//! HTTP collaborator contracts consumed by the viewer: mesh asset fetch,
//! confidence reports, annotation CRUD with comment threads, asynchronous job
//! polling with a bounded timeout, share-link tokens, and the live update
//! subscription guard.
//!
//! Every failure here converts to a [`ClientError`] at the initiating call
//! site; nothing propagates as an unhandled failure that could take the
//! viewer down. Partial failure is survivable: a missing confidence report
//! degrades the overlay without blocking mesh display.

pub mod error;
pub mod http;
pub mod jobs;
pub mod share;
pub mod subscription;

pub use error::*;
pub use http::*;
pub use jobs::*;
pub use share::*;
pub use subscription::*;
