//! Spin planning: where the wheel must stop for a given outcome.
//!
//! Geometry (wheel space, degrees, clockwise from the renderer's x axis):
//!   - sector `i` of `n` spans [i * 360/n, (i+1) * 360/n)
//!   - the renderer draws the wheel at `rotation + POINTER_BASE_OFFSET_DEGREES`
//!   - the pointer sits at the top, so the wheel angle under it is
//!     `-rotation mod 360`
//!
//! Landing sector `i` therefore needs `rotation ≡ 360 - center(i) (mod 360)`.

use crate::{
    config::SpinConfig,
    error::{WheelError, WheelResult},
    rng::WheelRng,
    types::{Degrees, FULL_TURN},
};
use serde::{Deserialize, Serialize};

/// Base offset applied by the renderer so that wheel angle 0 is at the top.
pub const POINTER_BASE_OFFSET_DEGREES: Degrees = -90.0;

/// The full breakdown of one planned spin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SpinPlan {
    pub start_rotation:      Degrees,
    pub target_rotation:     Degrees,
    pub chosen_index:        usize,
    pub full_turns:          u32,
    /// `360 - i*step - step/2`: the rotation that centres sector `i`
    /// under the pointer from a zero orientation.
    pub sector_target_angle: Degrees,
    /// Forward rotation (< 360) from the start orientation to the
    /// sector target. Equals `sector_target_angle` when the start is a
    /// whole number of turns.
    pub alignment_degrees:   Degrees,
    pub jitter_degrees:      Degrees,
}

impl SpinPlan {
    /// Total forward rotation applied by this spin.
    pub fn travel(&self) -> Degrees {
        self.target_rotation - self.start_rotation
    }
}

pub fn angle_step(sector_count: usize) -> Degrees {
    FULL_TURN / sector_count as f64
}

/// Wheel-space angle of the middle of sector `index`.
pub fn sector_center(index: usize, sector_count: usize) -> Degrees {
    (index as f64 + 0.5) * angle_step(sector_count)
}

/// Wheel-space [start, end) of sector `index`.
pub fn sector_span(index: usize, sector_count: usize) -> (Degrees, Degrees) {
    let step = angle_step(sector_count);
    (index as f64 * step, (index + 1) as f64 * step)
}

/// Rotation, modulo a full turn, that centres sector `index` under the pointer.
pub fn sector_target_angle(index: usize, sector_count: usize) -> Degrees {
    let step = angle_step(sector_count);
    FULL_TURN - index as f64 * step - step / 2.0
}

/// Which sector sits under the pointer at cumulative `rotation`.
pub fn sector_under_pointer(rotation: Degrees, sector_count: usize) -> usize {
    let wheel_angle = (-rotation).rem_euclid(FULL_TURN);
    let index = (wheel_angle / angle_step(sector_count)).floor() as usize;
    index.min(sector_count.saturating_sub(1))
}

/// Angle the renderer applies for cumulative `rotation`.
pub fn screen_rotation(rotation: Degrees) -> Degrees {
    rotation + POINTER_BASE_OFFSET_DEGREES
}

/// Plan a forward spin from `current_rotation` that lands `chosen_index`
/// under the pointer after a random number of extra full turns.
///
/// Draw order is fixed (turns, then jitter) so seeded runs replay exactly.
pub fn plan_spin(
    current_rotation: Degrees,
    chosen_index: usize,
    sector_count: usize,
    spin: &SpinConfig,
    rng: &mut WheelRng,
) -> WheelResult<SpinPlan> {
    if sector_count == 0 || chosen_index >= sector_count {
        return Err(WheelError::SectorOutOfRange {
            index: chosen_index,
            count: sector_count,
        });
    }
    if !current_rotation.is_finite() {
        return Err(WheelError::InvalidSpinConfig(format!(
            "current rotation {current_rotation} is not finite"
        )));
    }
    spin.validate(sector_count)?;

    let sector_target = sector_target_angle(chosen_index, sector_count);
    let alignment = (sector_target - current_rotation.rem_euclid(FULL_TURN)).rem_euclid(FULL_TURN);
    let full_turns = rng.between_inclusive(spin.min_full_turns, spin.max_full_turns);
    let jitter = rng.symmetric(spin.effective_jitter(sector_count));

    let target = current_rotation + full_turns as f64 * FULL_TURN + alignment + jitter;
    if target <= current_rotation {
        return Err(WheelError::BackwardSpin {
            current: current_rotation,
            target,
        });
    }

    Ok(SpinPlan {
        start_rotation: current_rotation,
        target_rotation: target,
        chosen_index,
        full_turns,
        sector_target_angle: sector_target,
        alignment_degrees: alignment,
        jitter_degrees: jitter,
    })
}
