//! Per-block metering snapshots, audio thread to UI thread.

use crate::ring::RingChannel;

/// Queue depth. At a 128-sample block and 48 kHz the audio thread produces
/// ~375 snapshots/s while the UI drains at display rate, so 64 slots absorb
/// several missed refreshes before overflow drops begin.
pub const VISUALIZATION_QUEUE_CAPACITY: usize = 64;

/// Levels measured over one audio block: RMS and peak per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VisualizationSnapshot {
    pub rms_left: f32,
    pub rms_right: f32,
    pub peak_left: f32,
    pub peak_right: f32,
}

/// Lossy metering transport. Display is eventually consistent: a drain keeps
/// only the most recently produced snapshot and discards the rest.
pub struct VisualizationChannel {
    queue: RingChannel<VisualizationSnapshot, VISUALIZATION_QUEUE_CAPACITY>,
}

impl VisualizationChannel {
    pub fn new() -> Self {
        Self {
            queue: RingChannel::new(),
        }
    }

    /// Publish one snapshot. Audio thread, once per block; wait-free.
    ///
    /// Overflow silently drops the snapshot; staleness on screen beats
    /// blocking the audio thread.
    #[inline]
    pub fn produce(&self, snapshot: VisualizationSnapshot) {
        let _ = self.queue.push(snapshot);
    }

    /// Drain everything queued and return the newest snapshot, or `None` when
    /// nothing arrived since the last drain. UI thread, once per refresh tick.
    pub fn drain_latest(&self) -> Option<VisualizationSnapshot> {
        let mut latest = None;
        while let Some(snapshot) = self.queue.pop() {
            latest = Some(snapshot);
        }
        latest
    }
}

impl Default for VisualizationChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(peak: f32) -> VisualizationSnapshot {
        VisualizationSnapshot {
            rms_left: peak * 0.5,
            rms_right: peak * 0.5,
            peak_left: peak,
            peak_right: peak,
        }
    }

    #[test]
    fn test_drain_keeps_newest() {
        let viz = VisualizationChannel::new();
        viz.produce(snapshot(0.1));
        viz.produce(snapshot(0.5));
        viz.produce(snapshot(0.9));

        let latest = viz.drain_latest().expect("update expected");
        assert_eq!(latest.peak_left, 0.9);
        assert_eq!(latest.peak_right, 0.9);

        // Nothing new since: no update.
        assert_eq!(viz.drain_latest(), None);
    }

    #[test]
    fn test_empty_drain_is_none() {
        let viz = VisualizationChannel::new();
        assert_eq!(viz.drain_latest(), None);
    }

    #[test]
    fn test_overflow_drops_newest_silently() {
        let viz = VisualizationChannel::new();
        for i in 0..(VISUALIZATION_QUEUE_CAPACITY * 2) {
            viz.produce(snapshot(i as f32 / 128.0));
        }
        // The oldest N-1 snapshots survive; the drain still reports the
        // newest of those.
        let latest = viz.drain_latest().expect("update expected");
        let last_kept = (VISUALIZATION_QUEUE_CAPACITY - 2) as f32 / 128.0;
        assert_eq!(latest.peak_left, last_kept);
    }
}
