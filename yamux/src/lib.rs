// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! A `tokio`-backed implementation of the Yamux stream multiplexing
//! protocol.
//!
//! [`connect`] takes ownership of an already-established transport (a TCP
//! socket, a TLS stream, anything implementing [`tokio::io::AsyncRead`] +
//! [`tokio::io::AsyncWrite`]) and returns a [`Control`] handle for opening
//! outbound streams and an [`Incoming`] handle for accepting the peer's. The
//! protocol engine itself — framing, flow control, the stream state machine
//! — lives in `yamux-core` and `yamux-transport`; this crate is the glue
//! that runs it against a real socket on a real executor.
//!
//! ```no_run
//! # async fn example(socket: tokio::net::TcpStream) -> Result<(), yamux_core::Error> {
//! use yamux_core::Role;
//!
//! let (control, mut incoming) = yamux::connect(socket, Role::Initiator, Default::default());
//! let mut stream = control.open_stream().await?;
//! while let Some(inbound) = incoming.accept().await {
//!     // handle `inbound` concurrently
//!     drop(inbound);
//! }
//! # Ok(())
//! # }
//! ```

mod command;
mod connection;
mod control;
mod stream;

pub use connection::connect;
pub use control::{Control, Incoming};
pub use stream::Stream;

pub use yamux_core::{Config, Error, Role, StreamId, StreamState};

/// The multistream-select / ALPN protocol identifier for this version of the
/// protocol, for callers that negotiate it over a shared transport.
pub const PROTOCOL_ID: &str = "/yamux/1.0.0";
