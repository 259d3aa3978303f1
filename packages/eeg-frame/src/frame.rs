use std::fmt::Write as _;

use crate::error::{FrameError, Result};
use crate::layout::FrameLayout;
use crate::SAMPLE_DECIMALS;

/// One batch of channel-interleaved samples
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    layout: FrameLayout,
    samples: Vec<f64>,
}

impl Frame {
    /// Wrap already-interleaved samples, checking the count against `layout`
    pub fn new(layout: FrameLayout, samples: Vec<f64>) -> Result<Self> {
        if samples.len() != layout.total() {
            return Err(FrameError::SampleCount {
                expected: layout.total(),
                actual: samples.len(),
            });
        }
        Ok(Self { layout, samples })
    }

    /// Build a frame by evaluating `sample(channel, step)` in wire order:
    /// every channel for step 0, then every channel for step 1, and so on.
    pub fn from_fn<F>(layout: FrameLayout, mut sample: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut samples = Vec::with_capacity(layout.total());
        for step in 0..layout.samples_per_channel() {
            for channel in 0..layout.channels() {
                samples.push(sample(channel, step));
            }
        }
        Self { layout, samples }
    }

    pub fn layout(&self) -> FrameLayout {
        self.layout
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    pub fn sample(&self, channel: usize, step: usize) -> Option<f64> {
        if channel >= self.layout.channels() || step >= self.layout.samples_per_channel() {
            return None;
        }
        self.samples.get(self.layout.index_of(channel, step)).copied()
    }

    /// Samples of a single channel in step order
    pub fn channel(&self, channel: usize) -> Option<Vec<f64>> {
        if channel >= self.layout.channels() {
            return None;
        }
        Some(
            self.samples
                .iter()
                .skip(channel)
                .step_by(self.layout.channels())
                .copied()
                .collect(),
        )
    }

    /// De-interleave into `channels[channel_idx][step_idx]`
    pub fn channels(&self) -> Vec<Vec<f64>> {
        let mut channels =
            vec![Vec::with_capacity(self.layout.samples_per_channel()); self.layout.channels()];
        for (index, value) in self.samples.iter().enumerate() {
            channels[self.layout.channel_of(index)].push(*value);
        }
        channels
    }

    /// Largest finite absolute sample value
    pub fn max_abs(&self) -> f64 {
        self.samples
            .iter()
            .filter(|v| v.is_finite())
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// Encode into `buf`, replacing its contents with the wire line.
    ///
    /// The buffer is reserved up front to the largest line this frame can
    /// produce, so a reused buffer grows at most once per size class.
    pub fn encode_into(&self, buf: &mut String) {
        buf.clear();
        buf.reserve(self.layout.max_line_len(self.max_abs()));

        for (index, value) in self.samples.iter().enumerate() {
            if index > 0 {
                buf.push(',');
            }
            // Writing into a String cannot fail.
            let _ = write!(buf, "{:.*}", SAMPLE_DECIMALS, value);
        }
        buf.push('\n');
    }

    pub fn to_line(&self) -> String {
        let mut line = String::new();
        self.encode_into(&mut line);
        line
    }

    /// Decode one wire line (trailing `\n` or `\r\n` optional).
    pub fn parse_line(line: &str, layout: FrameLayout) -> Result<Self> {
        let body = line.trim_end_matches(['\n', '\r']);
        if body.is_empty() {
            return Err(FrameError::SampleCount {
                expected: layout.total(),
                actual: 0,
            });
        }

        let mut samples = Vec::with_capacity(layout.total());
        for (index, token) in body.split(',').enumerate() {
            let value = token
                .trim()
                .parse::<f64>()
                .map_err(|_| FrameError::InvalidSample {
                    index,
                    token: token.to_string(),
                })?;
            samples.push(value);
        }

        Self::new(layout, samples)
    }
}
