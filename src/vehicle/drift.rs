use serde::{Deserialize, Serialize};

/// Slip angle a car must exceed to count as drifting.
pub const DRIFT_SLIP_DEG: f32 = 30.0;
/// Speed a car must exceed to count as drifting (m/s).
pub const DRIFT_MIN_SPEED: f32 = 9.0;
/// Seconds of continuous drift the combo saturates at.
pub const COMBO_CAP: f32 = 5.0;
/// Score bonus per second of combo.
pub const COMBO_BONUS: f32 = 0.15;

const STEEP_GRADE: f32 = 6.0;
const STEEP_GRADE_MULTIPLIER: f32 = 1.5;
const VERY_STEEP_GRADE: f32 = 10.0;
const VERY_STEEP_GRADE_MULTIPLIER: f32 = 2.0;

const TIMER_DECAY: f32 = 2.0;
const COMBO_DECAY: f32 = 3.0;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriftPhase {
    Grip,
    Drift,
}

impl DriftPhase {
    /// Phase implied by one tick's slip (degrees) and speed (m/s).
    pub fn classify(slip_deg: f32, speed: f32) -> Self {
        if slip_deg.abs() > DRIFT_SLIP_DEG && speed > DRIFT_MIN_SPEED {
            Self::Drift
        } else {
            Self::Grip
        }
    }
}

/// Score multiplier for drifting on a slope.
pub fn grade_multiplier(grade_percent: f32) -> f32 {
    let grade = grade_percent.abs();
    if grade >= VERY_STEEP_GRADE {
        VERY_STEEP_GRADE_MULTIPLIER
    } else if grade >= STEEP_GRADE {
        STEEP_GRADE_MULTIPLIER
    } else {
        1.0
    }
}

/// Accumulated drift score plus the timers feeding it.
///
/// Score only ever grows. Timer and combo build while drifting and bleed
/// off while gripping.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DriftState {
    pub score: f32,
    /// Seconds spent drifting, decaying while gripping.
    pub time: f32,
    /// Seconds of combo, capped at [`COMBO_CAP`].
    pub combo: f32,
    pub active: bool,
}

impl DriftState {
    pub fn phase(&self) -> DriftPhase {
        if self.active {
            DriftPhase::Drift
        } else {
            DriftPhase::Grip
        }
    }

    pub fn update(&mut self, slip_deg: f32, speed: f32, grade_percent: f32, dt: f32) -> DriftPhase {
        let phase = DriftPhase::classify(slip_deg, speed);
        if phase != self.phase() {
            log::trace!(
                "drift phase {:?} -> {:?} (slip {slip_deg:.1} deg, speed {speed:.1} m/s, score {:.2})",
                self.phase(),
                phase,
                self.score
            );
        }
        self.active = phase == DriftPhase::Drift;

        match phase {
            DriftPhase::Drift => {
                self.time += dt;
                self.combo = (self.combo + dt).min(COMBO_CAP);
                let combo_multiplier = 1.0 + COMBO_BONUS * self.combo;
                self.score += dt * grade_multiplier(grade_percent) * combo_multiplier;
            }
            DriftPhase::Grip => {
                self.time = (self.time - dt * TIMER_DECAY).max(0.0);
                self.combo = (self.combo - dt * COMBO_DECAY).max(0.0);
            }
        }
        phase
    }
}
