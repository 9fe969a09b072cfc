//! Shared test clocks and RNGs for the Story Map workspace.

mod clock;
mod rng;

pub use clock::{FixedClock, ManualClock, fixed_now};
pub use rng::{MockRng, SequenceRng};
