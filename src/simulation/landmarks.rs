//! Landmark map generation
//!
//! Landmarks come from a fixed 13-entry catalog laid out around the
//! 10 x 8 m rectangle course: the four inner corners, the center, the four
//! outer corners, then four inner points. A map of `count` landmarks is the
//! first `count` catalog entries, so landmark ids are stable across runs.

use crate::common::{Landmark, SimResult, SimulationError};

/// Number of predetermined landmark positions
pub const CATALOG_SIZE: usize = 13;

const CATALOG: [(f64, f64); CATALOG_SIZE] = [
    (2.0, 2.0), // bottom-left
    (8.0, 2.0), // bottom-right
    (8.0, 6.0), // top-right
    (2.0, 6.0), // top-left
    (5.0, 4.0), // center
    (1.0, 1.0), // far bottom-left
    (9.0, 1.0), // far bottom-right
    (9.0, 7.0), // far top-right
    (1.0, 7.0), // far top-left
    (3.0, 3.0), // inner bottom-left
    (7.0, 3.0), // inner bottom-right
    (7.0, 5.0), // inner top-right
    (3.0, 5.0), // inner top-left
];

/// Generate the first `count` catalog landmarks, in catalog order
pub fn generate(count: usize) -> SimResult<Vec<Landmark>> {
    if count < 1 || count > CATALOG_SIZE {
        return Err(SimulationError::InvalidParameter(format!(
            "landmark count must be in [1, {}], got {}",
            CATALOG_SIZE, count
        )));
    }
    Ok(CATALOG[..count]
        .iter()
        .enumerate()
        .map(|(id, &(x, y))| Landmark::new(id, x, y))
        .collect())
}
