use serde::{Deserialize, Serialize};

use crate::error::{FrameError, Result};
use crate::{DEFAULT_CHANNELS, DEFAULT_SAMPLES_PER_CHANNEL, SAMPLE_DECIMALS};

/// Shape of a frame: how many channels and how many steps per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameLayout {
    channels: usize,
    samples_per_channel: usize,
}

impl FrameLayout {
    pub fn new(channels: usize, samples_per_channel: usize) -> Result<Self> {
        if channels == 0 {
            return Err(FrameError::InvalidLayout(
                "channel count must be at least 1".to_string(),
            ));
        }
        if samples_per_channel == 0 {
            return Err(FrameError::InvalidLayout(
                "samples per channel must be at least 1".to_string(),
            ));
        }
        channels
            .checked_mul(samples_per_channel)
            .ok_or_else(|| FrameError::InvalidLayout("frame size overflows usize".to_string()))?;

        Ok(Self {
            channels,
            samples_per_channel,
        })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn samples_per_channel(&self) -> usize {
        self.samples_per_channel
    }

    /// Total number of samples in one frame
    pub fn total(&self) -> usize {
        self.channels * self.samples_per_channel
    }

    pub fn channel_of(&self, index: usize) -> usize {
        index % self.channels
    }

    pub fn step_of(&self, index: usize) -> usize {
        index / self.channels
    }

    /// Position of `(channel, step)` in the interleaved sample sequence
    pub fn index_of(&self, channel: usize, step: usize) -> usize {
        step * self.channels + channel
    }

    /// Upper bound on the encoded line length (newline included) for a
    /// frame whose finite samples all satisfy `|v| <= max_abs`.
    pub fn max_line_len(&self, max_abs: f64) -> usize {
        // Rounding to the last fractional digit can carry into a new integer digit.
        let rounded = max_abs.abs() + 0.5 * 10f64.powi(-(SAMPLE_DECIMALS as i32));
        let integer_digits = if rounded.is_finite() && rounded >= 10.0 {
            rounded.log10().floor() as usize + 1
        } else {
            1
        };
        // sign + integer part + '.' + fraction, followed by ',' or '\n'
        let token = 1 + integer_digits + 1 + SAMPLE_DECIMALS;
        self.total() * (token + 1)
    }
}

impl Default for FrameLayout {
    fn default() -> Self {
        Self {
            channels: DEFAULT_CHANNELS,
            samples_per_channel: DEFAULT_SAMPLES_PER_CHANNEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = FrameLayout::default();
        assert_eq!(layout.channels(), 8);
        assert_eq!(layout.samples_per_channel(), 1000);
        assert_eq!(layout.total(), 8000);
    }

    #[test]
    fn test_rejects_empty_dimensions() {
        assert!(matches!(
            FrameLayout::new(0, 10),
            Err(FrameError::InvalidLayout(_))
        ));
        assert!(matches!(
            FrameLayout::new(4, 0),
            Err(FrameError::InvalidLayout(_))
        ));
    }

    #[test]
    fn test_interleaved_indexing() {
        let layout = FrameLayout::new(8, 1000).unwrap();

        assert_eq!(layout.channel_of(0), 0);
        assert_eq!(layout.step_of(0), 0);
        assert_eq!(layout.channel_of(7), 7);
        assert_eq!(layout.step_of(7), 0);
        assert_eq!(layout.channel_of(8), 0);
        assert_eq!(layout.step_of(8), 1);
        assert_eq!(layout.channel_of(7999), 7);
        assert_eq!(layout.step_of(7999), 999);

        for index in [0, 1, 9, 123, 4567, 7999] {
            let channel = layout.channel_of(index);
            let step = layout.step_of(index);
            assert_eq!(layout.index_of(channel, step), index);
        }
    }

    #[test]
    fn test_max_line_len_counts_integer_digits() {
        let layout = FrameLayout::new(1, 1).unwrap();
        // "-1.2345\n"
        assert_eq!(layout.max_line_len(1.2345), 8);
        // "-12.3456\n"
        assert_eq!(layout.max_line_len(12.3456), 9);
        // 9.99996 rounds up to "10.0000"
        assert_eq!(layout.max_line_len(9.99996), 9);
    }

    #[test]
    fn test_layout_serializes_to_json() {
        let layout = FrameLayout::new(2, 5).unwrap();
        let json = serde_json::to_value(layout).unwrap();
        assert_eq!(json["channels"], 2);
        assert_eq!(json["samples_per_channel"], 5);
    }
}
