// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Session-wide configuration recognized by the multiplexer.

/// The default initial per-stream receive window: 256 KiB.
pub const DEFAULT_INITIAL_STREAM_WINDOW_BYTES: u32 = 256 * 1024;

/// The default maximum `Data` payload carried by a single frame: 64 KiB.
pub const DEFAULT_MAX_FRAME_PAYLOAD_BYTES: u32 = 64 * 1024;

/// The default number of unaccepted inbound streams the session will queue.
pub const DEFAULT_ACCEPT_BACKLOG: usize = 256;

/// Session-wide tunables for a yamux session.
///
/// Constructed via [`Config::builder`]; unrecognized combinations are caught
/// at `build()` time rather than left to panic deep inside the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    initial_stream_window_bytes: u32,
    max_frame_payload_bytes: u32,
    accept_backlog: usize,
    session_ping_interval: Option<core::time::Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_stream_window_bytes: DEFAULT_INITIAL_STREAM_WINDOW_BYTES,
            max_frame_payload_bytes: DEFAULT_MAX_FRAME_PAYLOAD_BYTES,
            accept_backlog: DEFAULT_ACCEPT_BACKLOG,
            session_ping_interval: None,
        }
    }
}

impl Config {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn initial_stream_window_bytes(&self) -> u32 {
        self.initial_stream_window_bytes
    }

    pub fn max_frame_payload_bytes(&self) -> u32 {
        self.max_frame_payload_bytes
    }

    pub fn accept_backlog(&self) -> usize {
        self.accept_backlog
    }

    pub fn session_ping_interval(&self) -> Option<core::time::Duration> {
        self.session_ping_interval
    }
}

/// Builder for [`Config`], validating inputs before producing a usable config.
#[derive(Clone, Copy, Debug, Default)]
pub struct Builder {
    config: Config,
}

/// An invalid combination of configuration values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// `initial_stream_window_bytes` was zero.
    ZeroInitialWindow,
    /// `max_frame_payload_bytes` was zero.
    ZeroMaxFramePayload,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BuilderError::ZeroInitialWindow => {
                f.write_str("initial_stream_window_bytes must be greater than zero")
            }
            BuilderError::ZeroMaxFramePayload => {
                f.write_str("max_frame_payload_bytes must be greater than zero")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BuilderError {}

impl Builder {
    pub fn initial_stream_window_bytes(mut self, value: u32) -> Self {
        self.config.initial_stream_window_bytes = value;
        self
    }

    pub fn max_frame_payload_bytes(mut self, value: u32) -> Self {
        self.config.max_frame_payload_bytes = value;
        self
    }

    pub fn accept_backlog(mut self, value: usize) -> Self {
        self.config.accept_backlog = value;
        self
    }

    pub fn session_ping_interval(mut self, value: Option<core::time::Duration>) -> Self {
        self.config.session_ping_interval = value;
        self
    }

    pub fn build(self) -> Result<Config, BuilderError> {
        if self.config.initial_stream_window_bytes == 0 {
            return Err(BuilderError::ZeroInitialWindow);
        }
        if self.config.max_frame_payload_bytes == 0 {
            return Err(BuilderError::ZeroMaxFramePayload);
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_recognized_options() {
        let config = Config::default();
        assert_eq!(config.initial_stream_window_bytes(), 262_144);
        assert_eq!(config.max_frame_payload_bytes(), 65_536);
        assert_eq!(config.accept_backlog(), 256);
        assert_eq!(config.session_ping_interval(), None);
    }

    #[test]
    fn builder_rejects_zero_window() {
        let err = Config::builder()
            .initial_stream_window_bytes(0)
            .build()
            .unwrap_err();
        assert_eq!(err, BuilderError::ZeroInitialWindow);
    }

    #[test]
    fn builder_applies_overrides() {
        let config = Config::builder()
            .accept_backlog(16)
            .session_ping_interval(Some(core::time::Duration::from_secs(30)))
            .build()
            .unwrap();
        assert_eq!(config.accept_backlog(), 16);
        assert_eq!(
            config.session_ping_interval(),
            Some(core::time::Duration::from_secs(30))
        );
    }
}
