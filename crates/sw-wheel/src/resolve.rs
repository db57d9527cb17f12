//! Spin resolution: random offsets and the angle → segment rule
//!
//! The wheel rotates clockwise with segment 0 starting at the reference
//! angle, and the pointer is fixed at the top. After turning by `normalized`
//! degrees the segment under the pointer is the one `normalized` degrees
//! counter-clockwise from segment 0, hence the `360 - normalized` reflection.

use std::collections::VecDeque;

use rand::prelude::*;

/// Degrees in a full turn
pub const FULL_TURN: u32 = 360;

/// Source of uniform spin offsets in [0, 360)
pub trait DegreeSource: Send {
    fn next_degree(&mut self) -> u32;
}

/// RNG-backed degree source
pub struct RngDegrees {
    rng: StdRng,
}

impl RngDegrees {
    /// Seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seeded when `seed` is set, entropy otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl DegreeSource for RngDegrees {
    fn next_degree(&mut self) -> u32 {
        self.rng.random_range(0..FULL_TURN)
    }
}

/// Scripted degree source; repeats the last value once drained
#[derive(Debug, Clone)]
pub struct FixedDegrees {
    queue: VecDeque<u32>,
    last: u32,
}

impl FixedDegrees {
    pub fn new(degrees: impl IntoIterator<Item = u32>) -> Self {
        Self {
            queue: degrees.into_iter().map(|d| d % FULL_TURN).collect(),
            last: 0,
        }
    }
}

impl DegreeSource for FixedDegrees {
    fn next_degree(&mut self) -> u32 {
        if let Some(next) = self.queue.pop_front() {
            self.last = next;
        }
        self.last
    }
}

/// Rotation after a spin of `min_full_turns` turns plus `degree`
pub fn target_rotation(current: u64, min_full_turns: u32, degree: u32) -> u64 {
    current + u64::from(FULL_TURN) * u64::from(min_full_turns) + u64::from(degree)
}

/// Rotation reduced to [0, 360)
pub fn normalize(rotation: u64) -> u32 {
    (rotation % u64::from(FULL_TURN)) as u32
}

/// Segment under the pointer once the wheel rests at `normalized` degrees
///
/// Returns `None` for a wheel with no segments.
pub fn winning_index(normalized: u32, segments: usize) -> Option<usize> {
    if segments == 0 {
        return None;
    }
    let full = f64::from(FULL_TURN);
    let segment_angle = full / segments as f64;
    let reflected = (full - f64::from(normalized % FULL_TURN)) % full;
    let index = (reflected / segment_angle).floor() as usize;
    Some(index.min(segments - 1))
}

/// Winner among `items` for a wheel resting at `rotation`
pub fn resolve_winner<T>(rotation: u64, items: &[T]) -> Option<(usize, &T)> {
    let index = winning_index(normalize(rotation), items.len())?;
    items.get(index).map(|item| (index, item))
}
