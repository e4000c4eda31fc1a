//! Mirage Plugin - Session Layer
//!
//! Owns everything that lives for exactly one plugin session: the logging
//! subscriber, the host event bus and the resolution cache. The host bridge
//! creates a [`Session`] on load, drives [`Session::on_frame`] once per frame
//! and calls [`Session::shutdown`] on unload.

mod frame;
mod logging;
mod session;

pub use frame::FrameStats;
pub use logging::init_logging;
pub use session::Session;

pub use mirage_core as core;
pub use mirage_sdk as sdk;
