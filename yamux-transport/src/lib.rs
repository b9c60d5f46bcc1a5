// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The yamux session engine: stream registry, inbound routing, and outbound
//! framing, generic over a [`Delegate`] so it carries no dependency on any
//! particular async runtime.
//!
//! `yamux-transport` does no I/O. It is driven by feeding received bytes into
//! [`Session::receive`] and draining [`Session::take_outbound`]; the `yamux`
//! crate is where a socket and an executor actually live.

mod delegate;
mod registry;
mod session;

pub use delegate::Delegate;
pub use session::{OutboundQueue, Session};
