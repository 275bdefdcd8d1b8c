//! Shared primitive types used across the wheel core.

/// Wheel orientation in degrees. Cumulative: never wrapped to [0, 360).
pub type Degrees = f64;

/// Session clock time in milliseconds since the session was created.
pub type Millis = u64;

/// Stable identifier for one spin session.
pub type SessionId = String;

/// The canonical run identifier (one runner invocation).
pub type RunId = String;

pub const FULL_TURN: Degrees = 360.0;
