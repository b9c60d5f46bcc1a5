// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! The command channel `Stream`/`Control` handles use to submit operations
//! to the single executor task that owns the session.

use bytes::Bytes;
use std::time::Duration;
use tokio::sync::oneshot;
use yamux_core::{Error, StreamId};

use crate::stream::Stream;

/// An operation submitted to the connection's executor task.
///
/// Handles never touch the stream table directly: they send a `Command` and
/// await its reply, which is the async rendering of "only the session
/// executor may mutate the stream table."
pub(crate) enum Command {
    Open {
        /// Resolved as soon as the stream ID is allocated, so the caller can
        /// name it in a later `CancelOpen` if the open is abandoned before
        /// `reply` resolves.
        id_reply: oneshot::Sender<Result<StreamId, Error>>,
        reply: oneshot::Sender<Result<Stream, Error>>,
    },
    /// Sent when an in-flight `open_stream()` future is dropped before
    /// completion: an ACK arriving afterwards is answered with an immediate
    /// RST instead of completing the open.
    CancelOpen {
        id: StreamId,
    },
    Write {
        id: StreamId,
        bytes: Bytes,
        reply: oneshot::Sender<Result<usize, Error>>,
    },
    Close {
        id: StreamId,
        reply: oneshot::Sender<Result<(), Error>>,
    },
    Reset {
        id: StreamId,
        reply: oneshot::Sender<Result<(), Error>>,
    },
    Ping {
        reply: oneshot::Sender<Duration>,
    },
    CloseAll {
        reply: oneshot::Sender<()>,
    },
}
