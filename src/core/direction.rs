//! Direction classification for sprite facing.
//!
//! The player animates in eight compass sectors, enemies in the four
//! isometric quadrants. Both classifiers are pure and invariant under
//! positive rescaling of their input.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// A set of discrete facings an animation table is keyed by.
pub trait Facing: Copy + Eq + std::hash::Hash + std::fmt::Debug + Send + Sync + 'static {
    /// Every facing, in table order.
    const ALL: &'static [Self];
}

/// Eight compass sectors used by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Compass {
    #[default]
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

/// Maps the atan2 bucket (0 = east, counter-clockwise) to a compass sector.
const SECTOR_FROM_BUCKET: [Compass; 8] = [
    Compass::E,
    Compass::NE,
    Compass::N,
    Compass::NW,
    Compass::W,
    Compass::SW,
    Compass::S,
    Compass::SE,
];

impl Compass {
    /// Classify a movement or aim vector. Zero and non-finite vectors have
    /// no sector.
    pub fn from_vector(v: Vec2) -> Option<Self> {
        if v == Vec2::ZERO || !v.is_finite() {
            return None;
        }

        let mut angle = v.y.atan2(v.x).to_degrees();
        if angle < 0.0 {
            angle += 360.0;
        }
        let shifted = (angle + 22.5) % 360.0;
        let bucket = ((shifted / 45.0).floor() as usize).min(7);

        Some(SECTOR_FROM_BUCKET[bucket])
    }
}

impl Facing for Compass {
    const ALL: &'static [Self] = &[
        Compass::N,
        Compass::NE,
        Compass::E,
        Compass::SE,
        Compass::S,
        Compass::SW,
        Compass::W,
        Compass::NW,
    ];
}

/// The four isometric quadrants enemies walk and face in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IsoQuadrant {
    NE,
    NW,
    #[default]
    SE,
    SW,
}

impl IsoQuadrant {
    /// Candidate order used for best-match tie breaking.
    pub const CANDIDATES: [IsoQuadrant; 4] = [
        IsoQuadrant::NE,
        IsoQuadrant::NW,
        IsoQuadrant::SE,
        IsoQuadrant::SW,
    ];

    /// Unnormalized grid step for this quadrant, e.g. `(1, -1)` for SE.
    pub fn step(self) -> Vec2 {
        match self {
            IsoQuadrant::NE => Vec2::new(1.0, 1.0),
            IsoQuadrant::NW => Vec2::new(-1.0, 1.0),
            IsoQuadrant::SE => Vec2::new(1.0, -1.0),
            IsoQuadrant::SW => Vec2::new(-1.0, -1.0),
        }
    }

    /// Quadrant by sign of each axis. Vectors lying on an axis fall back
    /// to SE.
    pub fn from_signs(v: Vec2) -> Self {
        match (v.x, v.y) {
            (x, y) if x > 0.0 && y > 0.0 => IsoQuadrant::NE,
            (x, y) if x < 0.0 && y > 0.0 => IsoQuadrant::NW,
            (x, y) if x > 0.0 && y < 0.0 => IsoQuadrant::SE,
            (x, y) if x < 0.0 && y < 0.0 => IsoQuadrant::SW,
            _ => IsoQuadrant::SE,
        }
    }

    /// Candidate best aligned with `direction`. Ties keep the earliest
    /// candidate.
    pub fn best_match(direction: Vec2) -> Self {
        Self::best_among(&Self::CANDIDATES, direction).unwrap_or(IsoQuadrant::NE)
    }

    /// Best aligned quadrant from a subset, `None` if the subset is empty.
    pub fn best_among(candidates: &[IsoQuadrant], direction: Vec2) -> Option<Self> {
        let mut best: Option<(IsoQuadrant, f32)> = None;

        for &candidate in candidates {
            let score = direction.dot(candidate.step().normalize());
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((candidate, score)),
            }
        }

        best.map(|(quadrant, _)| quadrant)
    }
}

impl Facing for IsoQuadrant {
    const ALL: &'static [Self] = &Self::CANDIDATES;
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn cardinal_and_diagonal_vectors_map_to_their_sector() {
        assert_eq!(Compass::from_vector(Vec2::new(0.0, 1.0)), Some(Compass::N));
        assert_eq!(Compass::from_vector(Vec2::new(1.0, 1.0)), Some(Compass::NE));
        assert_eq!(Compass::from_vector(Vec2::new(1.0, 0.0)), Some(Compass::E));
        assert_eq!(Compass::from_vector(Vec2::new(1.0, -1.0)), Some(Compass::SE));
        assert_eq!(Compass::from_vector(Vec2::new(0.0, -1.0)), Some(Compass::S));
        assert_eq!(Compass::from_vector(Vec2::new(-1.0, -1.0)), Some(Compass::SW));
        assert_eq!(Compass::from_vector(Vec2::new(-1.0, 0.0)), Some(Compass::W));
        assert_eq!(Compass::from_vector(Vec2::new(-1.0, 1.0)), Some(Compass::NW));
    }

    #[test]
    fn sector_edges_wrap_around_east() {
        // 350 degrees is still east, 337 is the first south-east angle.
        let east = Vec2::from_angle(350f32.to_radians());
        let south_east = Vec2::from_angle(330f32.to_radians());
        assert_eq!(Compass::from_vector(east), Some(Compass::E));
        assert_eq!(Compass::from_vector(south_east), Some(Compass::SE));
    }

    #[test]
    fn zero_vector_has_no_sector() {
        assert_eq!(Compass::from_vector(Vec2::ZERO), None);
        assert_eq!(Compass::from_vector(Vec2::new(f32::NAN, 1.0)), None);
    }

    #[test]
    fn quadrant_from_signs_falls_back_to_south_east_on_axes() {
        assert_eq!(IsoQuadrant::from_signs(Vec2::new(2.0, 0.5)), IsoQuadrant::NE);
        assert_eq!(IsoQuadrant::from_signs(Vec2::new(-2.0, 0.5)), IsoQuadrant::NW);
        assert_eq!(IsoQuadrant::from_signs(Vec2::new(-2.0, -0.5)), IsoQuadrant::SW);
        assert_eq!(IsoQuadrant::from_signs(Vec2::new(0.0, 3.0)), IsoQuadrant::SE);
    }

    #[test]
    fn best_match_prefers_earliest_candidate_on_ties() {
        // Straight north is equally close to NE and NW.
        assert_eq!(IsoQuadrant::best_match(Vec2::Y), IsoQuadrant::NE);
        // Straight west is equally close to NW and SW.
        assert_eq!(IsoQuadrant::best_match(Vec2::NEG_X), IsoQuadrant::NW);
        assert_eq!(IsoQuadrant::best_match(Vec2::new(0.2, -3.0)), IsoQuadrant::SE);
    }

    #[test]
    fn best_among_respects_the_subset() {
        let only_west = [IsoQuadrant::NW, IsoQuadrant::SW];
        assert_eq!(
            IsoQuadrant::best_among(&only_west, Vec2::new(1.0, -0.1)),
            Some(IsoQuadrant::SW)
        );
        assert_eq!(IsoQuadrant::best_among(&[], Vec2::X), None);
    }

    proptest! {
        #[test]
        fn compass_is_total_and_scale_invariant(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            exponent in -8i32..8,
        ) {
            let v = Vec2::new(x, y);
            prop_assume!(v.length() > 1e-3);

            let sector = Compass::from_vector(v);
            prop_assert!(sector.is_some());
            prop_assert!(Compass::ALL.contains(&sector.unwrap()));

            // Powers of two scale without rounding.
            let scaled = v * 2f32.powi(exponent);
            prop_assert_eq!(Compass::from_vector(scaled), sector);
        }

        #[test]
        fn best_match_is_scale_invariant(
            x in -1000.0f32..1000.0,
            y in -1000.0f32..1000.0,
            exponent in -8i32..8,
        ) {
            let v = Vec2::new(x, y);
            prop_assume!(v.length() > 1e-3);
            let scaled = v * 2f32.powi(exponent);
            prop_assert_eq!(IsoQuadrant::best_match(scaled), IsoQuadrant::best_match(v));
        }
    }
}
