//! FILENAME: client/src/lib.rs
//! PURPOSE: Main library entry point for the collection client.
//! CONTEXT: Pairs the pure engine with a transport and a session. The
//! controller serializes the fetch/save/delete lifecycle; `CollectionApi`
//! is the seam where tests substitute an in-memory collection for HTTP.

pub mod api;
pub mod controller;
pub mod error;
pub mod session;

pub use api::{CollectionApi, HttpApi};
pub use controller::EntityController;
pub use error::ApiError;
pub use session::{AuthUser, Session};
