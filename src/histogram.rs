//! Per-channel intensity histograms and clipping-bound resolution.
//!
//! Workers accumulate into their own `Histogram` values during a scan and
//! hand them back by ownership; the orchestrator merges them additively
//! after join, so no lock is ever held around the hot loop.

use crate::config::Channels;

/// Number of intensity buckets for 8-bit samples.
pub const BUCKETS: usize = 256;

/// Frequency counts of intensity values 0-255 for one channel.
///
/// Plain value semantics: created zeroed, merged additively. The sum of all
/// buckets equals the number of samples recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    bins: [u64; BUCKETS],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            bins: [0; BUCKETS],
        }
    }
}

impl Histogram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one sample.
    #[inline]
    pub fn record(&mut self, value: u8) {
        self.bins[value as usize] += 1;
    }

    /// Occurrences of the given intensity.
    #[inline]
    pub fn count(&self, value: u8) -> u64 {
        self.bins[value as usize]
    }

    /// Total number of samples recorded.
    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    /// Add another histogram's counts into this one.
    pub fn merge(&mut self, other: &Histogram) {
        for (bin, &count) in self.bins.iter_mut().zip(other.bins.iter()) {
            *bin += count;
        }
    }
}

/// Lowest and highest retained intensity after outlier trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: u8,
    pub max: u8,
}

impl Bounds {
    /// Full 0-255 range; also the resolver's sentinel when a side of the
    /// histogram never satisfies the trim condition.
    pub const FULL: Bounds = Bounds { min: 0, max: 255 };

    /// Width of the retained range.
    #[inline]
    pub fn span(self) -> u8 {
        self.max - self.min
    }

    /// True when the range is a single intensity and no scale exists.
    #[inline]
    pub fn is_degenerate(self) -> bool {
        self.min == self.max
    }

    /// Combine per-channel bounds into the shared global range:
    /// min of minima, max of maxima.
    pub fn combine(self, other: Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

/// Resolve clipping bounds from a histogram.
///
/// Scans buckets ascending, accumulating a running sum; the first bucket
/// where the sum reaches `ignore_count` and is nonzero becomes `min`. The
/// descending scan mirrors this for `max`. With `ignore_count` of 0 this
/// finds the first/last nonempty bucket. An all-empty histogram leaves the
/// sentinel defaults (0, 255).
pub fn resolve_bounds(histogram: &Histogram, ignore_count: u64) -> Bounds {
    let mut bounds = Bounds::FULL;

    let mut sum = 0u64;
    for value in 0..BUCKETS {
        sum += histogram.bins[value];
        if sum >= ignore_count && sum != 0 {
            bounds.min = value as u8;
            break;
        }
    }

    sum = 0;
    for value in (0..BUCKETS).rev() {
        sum += histogram.bins[value];
        if sum >= ignore_count && sum != 0 {
            bounds.max = value as u8;
            break;
        }
    }

    bounds
}

/// Scan a channel-aligned byte range of the buffer into fresh per-channel
/// histograms. For interleaved RGB the range must start and end on a pixel
/// boundary; consecutive bytes land in channels 0, 1, 2.
pub(crate) fn scan_range(buffer: &[u8], start: usize, end: usize, channels: Channels) -> Vec<Histogram> {
    let mut histograms = vec![Histogram::new(); channels.stride()];
    scan_range_into(buffer, start, end, channels, &mut histograms);
    histograms
}

/// Accumulate a channel-aligned byte range into existing histograms.
/// Dynamic-mode workers call this once per claimed chunk.
pub(crate) fn scan_range_into(
    buffer: &[u8],
    start: usize,
    end: usize,
    channels: Channels,
    histograms: &mut [Histogram],
) {
    let stride = channels.stride();
    debug_assert_eq!(start % stride, 0);
    debug_assert_eq!(end % stride, 0);
    debug_assert_eq!(histograms.len(), stride);

    match channels {
        Channels::Gray => {
            for &sample in &buffer[start..end] {
                histograms[0].record(sample);
            }
        }
        Channels::Rgb => {
            for pixel in buffer[start..end].chunks_exact(3) {
                histograms[0].record(pixel[0]);
                histograms[1].record(pixel[1]);
                histograms[2].record(pixel[2]);
            }
        }
    }
}

/// Merge per-worker histogram sets into the first one.
pub(crate) fn merge_sets(mut into: Vec<Histogram>, sets: Vec<Vec<Histogram>>) -> Vec<Histogram> {
    for set in &sets {
        debug_assert_eq!(set.len(), into.len());
        for (merged, local) in into.iter_mut().zip(set.iter()) {
            merged.merge(local);
        }
    }
    into
}
