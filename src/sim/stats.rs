//! Summary statistics over a balance trajectory.
//!
//! Computed on demand after a run, never during one. Drawdown is
//! measured against the running peak and only counted while that peak
//! is positive; streaks are read off consecutive balance changes, with
//! equal snapshots (skipped rounds) leaving the current streak as is.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub mean: f64,
    pub std_dev: f64,
    /// Largest peak-to-trough fall as a fraction of the peak.
    pub max_drawdown: f64,
    pub max_win_streak: u32,
    pub max_loss_streak: u32,
    /// Volatility bands at mean plus/minus two standard deviations.
    pub upper_band: f64,
    pub lower_band: f64,
}

impl HistoryStats {
    pub fn compute(history: &[f64]) -> Self {
        if history.is_empty() {
            return HistoryStats {
                mean: 0.0,
                std_dev: 0.0,
                max_drawdown: 0.0,
                max_win_streak: 0,
                max_loss_streak: 0,
                upper_band: 0.0,
                lower_band: 0.0,
            };
        }

        let n = history.len() as f64;
        let mean = history.iter().sum::<f64>() / n;
        let variance = history.iter().map(|b| (b - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();

        let mut peak = history[0];
        let mut max_drawdown = 0.0f64;
        for &balance in history {
            peak = peak.max(balance);
            if peak > 0.0 {
                max_drawdown = max_drawdown.max((peak - balance) / peak);
            }
        }

        let mut win_streak = 0u32;
        let mut loss_streak = 0u32;
        let mut max_win_streak = 0u32;
        let mut max_loss_streak = 0u32;
        for pair in history.windows(2) {
            let delta = pair[1] - pair[0];
            if delta > 0.0 {
                win_streak += 1;
                loss_streak = 0;
                max_win_streak = max_win_streak.max(win_streak);
            } else if delta < 0.0 {
                loss_streak += 1;
                win_streak = 0;
                max_loss_streak = max_loss_streak.max(loss_streak);
            }
        }

        HistoryStats {
            mean,
            std_dev,
            max_drawdown,
            max_win_streak,
            max_loss_streak,
            upper_band: mean + 2.0 * std_dev,
            lower_band: mean - 2.0 * std_dev,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    // -- central moment tests --

    #[test]
    fn test_empty_history_is_zeroed() {
        let stats = HistoryStats::compute(&[]);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.max_drawdown, 0.0);
        assert_eq!(stats.max_win_streak, 0);
        assert_eq!(stats.max_loss_streak, 0);
    }

    #[test]
    fn test_single_snapshot() {
        let stats = HistoryStats::compute(&[42.5]);
        assert!(close(stats.mean, 42.5));
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.max_drawdown, 0.0);
        assert_eq!(stats.max_win_streak, 0);
    }

    #[test]
    fn test_population_std_dev() {
        let stats = HistoryStats::compute(&[100.0, 110.0, 90.0]);
        assert!(close(stats.mean, 100.0));
        assert!(close(stats.std_dev, (200.0f64 / 3.0).sqrt()));
    }

    #[test]
    fn test_volatility_bands() {
        let stats = HistoryStats::compute(&[2.0, 4.0]);
        assert!(close(stats.mean, 3.0));
        assert!(close(stats.std_dev, 1.0));
        assert!(close(stats.upper_band, 5.0));
        assert!(close(stats.lower_band, 1.0));
    }

    // -- drawdown tests --

    #[test]
    fn test_drawdown_tracks_running_peak() {
        let stats = HistoryStats::compute(&[100.0, 50.0, 120.0, 60.0]);
        assert!(close(stats.max_drawdown, 0.5));
    }

    #[test]
    fn test_drawdown_ignores_non_positive_peak() {
        let stats = HistoryStats::compute(&[-1.0, -2.0]);
        assert_eq!(stats.max_drawdown, 0.0);

        let recovered = HistoryStats::compute(&[-5.0, 10.0, 5.0]);
        assert!(close(recovered.max_drawdown, 0.5));
    }

    // -- streak tests --

    #[test]
    fn test_streaks_from_balance_changes() {
        let stats = HistoryStats::compute(&[100.0, 110.0, 120.0, 90.0]);
        assert_eq!(stats.max_win_streak, 2);
        assert_eq!(stats.max_loss_streak, 1);
    }

    #[test]
    fn test_equal_snapshots_do_not_break_streaks() {
        let wins = HistoryStats::compute(&[100.0, 101.0, 101.0, 102.0]);
        assert_eq!(wins.max_win_streak, 2);

        let losses = HistoryStats::compute(&[100.0, 99.0, 99.0, 98.0]);
        assert_eq!(losses.max_loss_streak, 2);
    }
}
