// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! Pure types and state machines for the yamux stream multiplexing protocol.
//!
//! This crate has no I/O of its own: it defines the wire frame codec, the
//! session and stream state machines, flow control accounting, and the
//! error taxonomy shared by `yamux-transport` and `yamux`.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod config;
pub mod error;
pub mod flow;
pub mod frame;
pub mod role;
pub mod session;
pub mod state;
pub mod stream;

pub use config::Config;
pub use error::{Error, GoAwayCode};
pub use role::Role;
pub use session::SessionState;
pub use stream::{StreamId, StreamState};

/// A no-op stand-in for `tracing::debug!` when the `state-tracing` feature is disabled.
#[macro_export]
#[doc(hidden)]
macro_rules! __tracing_noop__ {
    ($($arg:tt)*) => {};
}
