// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Define the inter-core job dispatch wire format.
// Author: Lukas Bower
#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Word-level protocol spoken over the inter-core mailbox.
//!
//! Inbound to the worker, a job is two words: a selector naming the kernel
//! variant, then the iteration count as `i32` bits. [`SELECTOR_SHUTDOWN`]
//! is a single word with no parameter. Outbound, the worker answers every
//! job with one word: elapsed microseconds, or [`RESULT_REJECTED`] when the
//! selector was not recognised.

use core::fmt;

use thiserror::Error;

/// Selector for the single-precision kernel.
pub const SELECTOR_F32: u32 = 0x0000_0f32;
/// Selector for the double-precision kernel.
pub const SELECTOR_F64: u32 = 0x0000_0f64;
/// Selector asking the worker loop to exit.
pub const SELECTOR_SHUTDOWN: u32 = 0xffff_ffff;

/// Reply word reporting an unrecognised selector.
pub const RESULT_REJECTED: u32 = 0xffff_ffff;
/// Largest elapsed time a reply can carry; longer runs saturate here.
pub const ELAPSED_MAX: u32 = RESULT_REJECTED - 1;

/// Errors raised while decoding mailbox words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Selector word outside the known kernel set.
    #[error("unknown kernel selector 0x{0:08x}")]
    UnknownSelector(u32),
}

/// Kernel variants the worker can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelVariant {
    /// Single-precision (`f32`) kernel.
    Single,
    /// Double-precision (`f64`) kernel.
    Double,
}

impl KernelVariant {
    /// Every variant, in dispatch order.
    pub const ALL: [KernelVariant; 2] = [KernelVariant::Single, KernelVariant::Double];

    /// Selector word naming this variant on the wire.
    #[must_use]
    pub const fn selector(self) -> u32 {
        match self {
            Self::Single => SELECTOR_F32,
            Self::Double => SELECTOR_F64,
        }
    }

    /// Short label used in logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "f32",
            Self::Double => "f64",
        }
    }
}

impl fmt::Display for KernelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded first word of an inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// Run the named kernel; an iteration-count word follows.
    Kernel(KernelVariant),
    /// Leave the worker loop; nothing follows.
    Shutdown,
}

impl Selector {
    /// Decode a selector word.
    pub const fn decode(word: u32) -> Result<Self, ProtocolError> {
        match word {
            SELECTOR_F32 => Ok(Self::Kernel(KernelVariant::Single)),
            SELECTOR_F64 => Ok(Self::Kernel(KernelVariant::Double)),
            SELECTOR_SHUTDOWN => Ok(Self::Shutdown),
            other => Err(ProtocolError::UnknownSelector(other)),
        }
    }

    /// Encode the selector word.
    #[must_use]
    pub const fn encode(self) -> u32 {
        match self {
            Self::Kernel(variant) => variant.selector(),
            Self::Shutdown => SELECTOR_SHUTDOWN,
        }
    }
}

/// One unit of work handed to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    /// Kernel to run.
    pub variant: KernelVariant,
    /// Iteration count passed to the kernel.
    pub iterations: i32,
}

impl Job {
    /// Construct a job.
    #[must_use]
    pub const fn new(variant: KernelVariant, iterations: i32) -> Self {
        Self {
            variant,
            iterations,
        }
    }

    /// Encode as the `[selector, parameter]` word pair.
    #[must_use]
    pub const fn encode(self) -> [u32; 2] {
        [self.variant.selector(), encode_iterations(self.iterations)]
    }
}

/// Encode an iteration count as its two's-complement word.
#[must_use]
pub const fn encode_iterations(iterations: i32) -> u32 {
    iterations as u32
}

/// Decode an iteration-count word.
#[must_use]
pub const fn decode_iterations(word: u32) -> i32 {
    word as i32
}

/// Worker answer to one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Kernel ran for this many microseconds.
    Elapsed(u32),
    /// Selector was not recognised; nothing ran.
    Rejected,
}

impl Reply {
    /// Build an elapsed-time reply, saturating at [`ELAPSED_MAX`].
    #[must_use]
    pub const fn from_elapsed(elapsed_us: u64) -> Self {
        if elapsed_us > ELAPSED_MAX as u64 {
            Self::Elapsed(ELAPSED_MAX)
        } else {
            Self::Elapsed(elapsed_us as u32)
        }
    }

    /// Encode the reply word.
    #[must_use]
    pub const fn encode(self) -> u32 {
        match self {
            Self::Elapsed(us) => us,
            Self::Rejected => RESULT_REJECTED,
        }
    }

    /// Decode a reply word.
    #[must_use]
    pub const fn decode(word: u32) -> Self {
        match word {
            RESULT_REJECTED => Self::Rejected,
            us => Self::Elapsed(us),
        }
    }
}
