// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for textprep.

use thiserror::Error;

/// Top-level error type for all textprep operations.
///
/// A failure at any pipeline stage aborts the run; partial buffers are dropped
/// and never handed back alongside an error.
#[derive(Debug, Error)]
pub enum TextprepError {
    // -- Pipeline boundary --
    #[error("failed to decode input image: {0}")]
    DecodeFailure(String),

    #[error("failed to encode processed image: {0}")]
    EncodeFailure(String),

    #[error("invalid preprocessing configuration: {0}")]
    InvalidConfig(String),

    #[error("empty canvas: {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },

    // -- Text recognition boundary --
    #[error("text recognition failed: {0}")]
    Recognition(String),

    // -- Settings persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of a [`TextprepError`], for hosts that branch on the
/// failure category rather than the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DecodeFailure,
    EncodeFailure,
    InvalidConfig,
    EmptyCanvas,
    Recognition,
    Io,
}

impl TextprepError {
    /// Which category this error belongs to.
    ///
    /// Malformed persisted settings count as an invalid configuration.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DecodeFailure(_) => ErrorKind::DecodeFailure,
            Self::EncodeFailure(_) => ErrorKind::EncodeFailure,
            Self::InvalidConfig(_) | Self::Serialization(_) => ErrorKind::InvalidConfig,
            Self::EmptyCanvas { .. } => ErrorKind::EmptyCanvas,
            Self::Recognition(_) => ErrorKind::Recognition,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TextprepError>;
