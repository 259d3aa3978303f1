//! Multi-channel sample frames for the live EEG relay.
//!
//! A frame is one sweep across every channel for a batch of time steps,
//! stored channel-interleaved: sample `i` belongs to channel
//! `i % channels` at step `i / channels`. On the wire a frame is a single
//! line of comma-separated decimals with four fractional digits,
//! terminated by `\n`.
//!
//! ```
//! use eeg_frame::{Frame, FrameLayout};
//!
//! let layout = FrameLayout::new(2, 3).unwrap();
//! let frame = Frame::from_fn(layout, |channel, step| (channel * 10 + step) as f64);
//! assert_eq!(frame.to_line(), "0.0000,10.0000,1.0000,11.0000,2.0000,12.0000\n");
//! ```

pub mod error;
pub mod frame;
pub mod layout;

pub use error::{FrameError, Result};
pub use frame::Frame;
pub use layout::FrameLayout;

/// Channels per frame in the reference setup
pub const DEFAULT_CHANNELS: usize = 8;

/// Time steps per channel in the reference setup
pub const DEFAULT_SAMPLES_PER_CHANNEL: usize = 1000;

/// Fractional digits written for every sample
pub const SAMPLE_DECIMALS: usize = 4;
