//! Operation phases and cosmetic progress animation.
//!
//! Long-running calls (template download, settings save, file save) report
//! a real lifecycle through [`OperationPhase`]. The percentage bar shown
//! while a call is in flight is pure theater: a [`ProgressAnimator`] paces
//! it from a floor toward a ceiling and only the real outcome can force it
//! to a terminal value. Nothing may gate on the animated percentage.

use std::time::Duration;

use serde::Serialize;

/// Lifecycle of one long-running backend operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationPhase {
    #[default]
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl OperationPhase {
    #[must_use]
    pub fn is_running(self) -> bool {
        self == Self::Running
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

/// Pacing of one cosmetic progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    /// Percentage shown as soon as the operation begins.
    pub floor: u8,
    /// Percent added per tick.
    pub step: u8,
    /// Ticks stop advancing once the bar has reached this value.
    pub ceiling: u8,
    /// Pause between ticks, for whoever drives the animation.
    pub interval: Duration,
}

/// Pacing of the config template download bar.
pub const DOWNLOAD_CADENCE: Cadence = Cadence {
    floor: 5,
    step: 5,
    ceiling: 90,
    interval: Duration::from_millis(400),
};

/// Pacing of the settings save bar.
pub const SETTINGS_SAVE_CADENCE: Cadence = Cadence {
    floor: 12,
    step: 6,
    ceiling: 90,
    interval: Duration::from_millis(220),
};

/// Pacing of the config file save bar.
pub const FILE_SAVE_CADENCE: Cadence = Cadence {
    floor: 15,
    step: 7,
    ceiling: 90,
    interval: Duration::from_millis(200),
};

/// Display-only progress state for one operation slot.
///
/// Consumes phase transitions and feeds nothing back: `begin` when the
/// operation starts, `tick` on a timer while it runs, `finish` with the
/// real outcome. A tick can never land the bar on 100; only a successful
/// `finish` shows completion.
#[derive(Debug, Clone)]
pub struct ProgressAnimator {
    cadence: Cadence,
    phase: OperationPhase,
    percent: u8,
}

impl ProgressAnimator {
    #[must_use]
    pub fn new(cadence: Cadence) -> Self {
        Self {
            cadence,
            phase: OperationPhase::Idle,
            percent: 0,
        }
    }

    /// Marks the operation running and seeds the bar at the floor.
    pub fn begin(&mut self) {
        self.phase = OperationPhase::Running;
        self.percent = self.cadence.floor;
    }

    /// Advances the bar by one step while the operation runs.
    ///
    /// Once the bar has reached the ceiling it stops advancing; the final
    /// step may overshoot the ceiling but is clamped below 100. Ticks
    /// outside the running phase are inert, so a stray timer firing after
    /// the outcome landed cannot move the bar.
    pub fn tick(&mut self) -> u8 {
        if self.phase.is_running() && self.percent < self.cadence.ceiling {
            self.percent = self.percent.saturating_add(self.cadence.step).min(99);
        }
        self.percent
    }

    /// Records the real outcome: 100 on success, back to 0 on failure.
    pub fn finish(&mut self, success: bool) -> u8 {
        self.phase = if success {
            OperationPhase::Succeeded
        } else {
            OperationPhase::Failed
        };
        self.percent = if success { 100 } else { 0 };
        self.percent
    }

    /// Returns the slot to idle with an empty bar.
    pub fn reset(&mut self) {
        self.phase = OperationPhase::Idle;
        self.percent = 0;
    }

    #[must_use]
    pub fn percent(&self) -> u8 {
        self.percent
    }

    #[must_use]
    pub fn phase(&self) -> OperationPhase {
        self.phase
    }

    /// Tick pause of the underlying cadence.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.cadence.interval
    }
}
