//! Whole-run temperature statistics.
//!
//! Unlike the 100-sample history window these cover every tick since start,
//! in constant space: a running sum, count, minimum and maximum per zone.

use serde::{Deserialize, Serialize};

use crate::model::ThermalState;

/// Running mean/min/max of one temperature series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunningStats {
    samples: u64,
    /// f64 so a long run does not lose precision in the sum.
    sum: f64,
    min: f32,
    max: f32,
}

impl Default for RunningStats {
    fn default() -> Self {
        Self {
            samples: 0,
            sum: 0.0,
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
        }
    }
}

impl RunningStats {
    pub fn record(&mut self, value: f32) {
        self.samples += 1;
        self.sum += f64::from(value);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// `None` until the first sample.
    pub fn mean(&self) -> Option<f32> {
        (self.samples > 0).then(|| (self.sum / self.samples as f64) as f32)
    }

    pub fn min(&self) -> Option<f32> {
        (self.samples > 0).then_some(self.min)
    }

    pub fn max(&self) -> Option<f32> {
        (self.samples > 0).then_some(self.max)
    }
}

/// Statistics for both zones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneStats {
    pub compartment: RunningStats,
    pub freezer: RunningStats,
}

impl ZoneStats {
    pub fn record(&mut self, state: &ThermalState) {
        self.compartment.record(state.compartment_temp);
        self.freezer.record(state.freezer_temp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_have_no_values() {
        let s = RunningStats::default();
        assert_eq!(s.samples(), 0);
        assert!(s.mean().is_none());
        assert!(s.min().is_none());
        assert!(s.max().is_none());
    }

    #[test]
    fn tracks_mean_min_max() {
        let mut s = RunningStats::default();
        for v in [2.0, 4.0, 3.0, 7.0] {
            s.record(v);
        }
        assert_eq!(s.samples(), 4);
        assert!((s.mean().unwrap() - 4.0).abs() < 1e-6);
        assert_eq!(s.min(), Some(2.0));
        assert_eq!(s.max(), Some(7.0));
    }

    #[test]
    fn zone_stats_split_by_zone() {
        let mut z = ZoneStats::default();
        z.record(&ThermalState::default());
        assert_eq!(z.compartment.max(), Some(7.0));
        assert_eq!(z.freezer.min(), Some(-10.0));
    }
}
