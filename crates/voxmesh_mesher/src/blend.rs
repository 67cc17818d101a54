//! # Blend Functions
//!
//! Used by [`AdjustableNaive`](crate::placement::AdjustableNaive) to pull a
//! cell's naive centroid towards the cell center.
//!
//! A blend is a pure function of three inputs: the cell's world-space
//! corner, the naive centroid and the cell center, both in cell-local
//! coordinates. The cell spans `0..=2 * center` on every axis. Blends keep
//! no history; the random one is seeded from its inputs, so the same seed
//! always produces the same mesh.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Maps a naive centroid to a final cell-local vertex position.
pub trait Blend {
    /// Returns the placed vertex in cell-local coordinates.
    fn blend(&self, corner: Vec3, smoothed: Vec3, center: Vec3) -> Vec3;
}

/// Keeps the naive centroid.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Smooth;

impl Blend for Smooth {
    #[inline]
    fn blend(&self, _corner: Vec3, smoothed: Vec3, _center: Vec3) -> Vec3 {
        smoothed
    }
}

/// Moves a fixed fraction of the way towards the center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixed {
    /// 0 keeps the centroid, 1 snaps to the center.
    pub factor: f32,
}

impl Default for Fixed {
    fn default() -> Self {
        Self { factor: 0.5 }
    }
}

impl Blend for Fixed {
    #[inline]
    fn blend(&self, _corner: Vec3, smoothed: Vec3, center: Vec3) -> Vec3 {
        smoothed.lerp(center, self.factor)
    }
}

/// Smooth below `low`, snapped to the center above `high`, with a
/// smoothstep transition on the corner's height (world Z).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightSmoothstep {
    /// Height where blending starts.
    pub low: f32,
    /// Height where the vertex is fully centered.
    pub high: f32,
}

impl Blend for HeightSmoothstep {
    fn blend(&self, corner: Vec3, smoothed: Vec3, center: Vec3) -> Vec3 {
        smoothed.lerp(center, smoothstep(self.low, self.high, corner.z))
    }
}

/// Pushes the vertex towards a randomly jittered center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jitter {
    /// Stream seed; combined with the cell corner per call.
    pub seed: u64,
    /// Jitter radius as a fraction of the cell size.
    pub amplitude: f32,
}

impl Jitter {
    /// Default jitter radius.
    pub const DEFAULT_AMPLITUDE: f32 = 0.3;

    /// Creates a jitter blend with the default amplitude.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            amplitude: Self::DEFAULT_AMPLITUDE,
        }
    }

    fn cell_seed(&self, corner: Vec3) -> u64 {
        let mut h = self.seed ^ 0x9E37_79B9_7F4A_7C15;
        for bits in [corner.x.to_bits(), corner.y.to_bits(), corner.z.to_bits()] {
            h = (h ^ u64::from(bits)).wrapping_mul(0x0100_0000_01B3);
            h ^= h >> 29;
        }
        h
    }
}

impl Blend for Jitter {
    fn blend(&self, corner: Vec3, smoothed: Vec3, center: Vec3) -> Vec3 {
        let mut rng = ChaCha8Rng::seed_from_u64(self.cell_seed(corner));
        let offset = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let extent = center * 2.0;
        let target = center + offset * self.amplitude * extent;
        smoothed.lerp(target, 0.5).clamp(Vec3::ZERO, extent)
    }
}

/// Snaps the centroid down to a coarse sub-cell lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantize {
    /// Lattice step as a fraction of the cell size.
    pub step: f32,
}

impl Default for Quantize {
    fn default() -> Self {
        Self { step: 1.0 / 3.0 }
    }
}

impl Blend for Quantize {
    fn blend(&self, _corner: Vec3, smoothed: Vec3, center: Vec3) -> Vec3 {
        let step = center * 2.0 * self.step;
        if step.min_element() <= 0.0 {
            return smoothed;
        }
        (smoothed / step).floor() * step
    }
}

/// World axis used by [`Gated`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    #[default]
    Z,
}

impl Axis {
    /// Component of `v` along this axis.
    #[inline]
    #[must_use]
    pub fn of(self, v: Vec3) -> f32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }
}

/// Uses `lower` for cells whose corner is below `threshold` on `axis`, and
/// `upper` otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gated<L, U> {
    /// Axis compared against the threshold.
    pub axis: Axis,
    /// Plane position along `axis`.
    pub threshold: f32,
    /// Blend below the plane.
    pub lower: L,
    /// Blend at or above the plane.
    pub upper: U,
}

impl<L: Blend, U: Blend> Blend for Gated<L, U> {
    fn blend(&self, corner: Vec3, smoothed: Vec3, center: Vec3) -> Vec3 {
        if self.axis.of(corner) < self.threshold {
            self.lower.blend(corner, smoothed, center)
        } else {
            self.upper.blend(corner, smoothed, center)
        }
    }
}

// =============================================================================
// CONFIGURABLE BLEND
// =============================================================================

/// Any of the provided blends, selectable from configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlendKind {
    /// See [`Smooth`].
    #[default]
    Smooth,
    /// See [`Fixed`].
    Fixed {
        /// Fraction towards the center.
        #[serde(default = "default_factor")]
        factor: f32,
    },
    /// See [`HeightSmoothstep`].
    HeightSmoothstep {
        /// Height where blending starts.
        low: f32,
        /// Height where the vertex is fully centered.
        high: f32,
    },
    /// See [`Jitter`].
    Jitter {
        /// Stream seed.
        #[serde(default)]
        seed: u64,
        /// Jitter radius as a fraction of the cell size.
        #[serde(default = "default_amplitude")]
        amplitude: f32,
    },
    /// See [`Quantize`].
    Quantize {
        /// Lattice step as a fraction of the cell size.
        #[serde(default = "default_step")]
        step: f32,
    },
    /// See [`Gated`].
    Gated {
        /// Axis compared against the threshold.
        #[serde(default)]
        axis: Axis,
        /// Plane position along `axis`.
        threshold: f32,
        /// Blend below the plane.
        lower: Box<BlendKind>,
        /// Blend at or above the plane.
        upper: Box<BlendKind>,
    },
}

fn default_factor() -> f32 {
    Fixed::default().factor
}

fn default_amplitude() -> f32 {
    Jitter::DEFAULT_AMPLITUDE
}

fn default_step() -> f32 {
    Quantize::default().step
}

impl Blend for BlendKind {
    fn blend(&self, corner: Vec3, smoothed: Vec3, center: Vec3) -> Vec3 {
        match self {
            Self::Smooth => Smooth.blend(corner, smoothed, center),
            Self::Fixed { factor } => Fixed { factor: *factor }.blend(corner, smoothed, center),
            Self::HeightSmoothstep { low, high } => HeightSmoothstep {
                low: *low,
                high: *high,
            }
            .blend(corner, smoothed, center),
            Self::Jitter { seed, amplitude } => Jitter {
                seed: *seed,
                amplitude: *amplitude,
            }
            .blend(corner, smoothed, center),
            Self::Quantize { step } => Quantize { step: *step }.blend(corner, smoothed, center),
            Self::Gated {
                axis,
                threshold,
                lower,
                upper,
            } => Gated {
                axis: *axis,
                threshold: *threshold,
                lower: lower.as_ref(),
                upper: upper.as_ref(),
            }
            .blend(corner, smoothed, center),
        }
    }
}

impl<B: Blend + ?Sized> Blend for &B {
    #[inline]
    fn blend(&self, corner: Vec3, smoothed: Vec3, center: Vec3) -> Vec3 {
        (**self).blend(corner, smoothed, center)
    }
}

#[inline]
fn smoothstep(low: f32, high: f32, x: f32) -> f32 {
    if high <= low {
        return if x < low { 0.0 } else { 1.0 };
    }
    let t = ((x - low) / (high - low)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Vec3 = Vec3::splat(0.5);

    #[test]
    fn test_smooth_and_fixed() {
        let p = Vec3::new(0.1, 0.2, 0.9);
        assert_eq!(Smooth.blend(Vec3::ZERO, p, CENTER), p);
        let fixed = Fixed::default().blend(Vec3::ZERO, p, CENTER);
        assert!((fixed - Vec3::new(0.3, 0.35, 0.7)).length() < 1e-6);
    }

    #[test]
    fn test_height_smoothstep() {
        let blend = HeightSmoothstep { low: 0.0, high: 10.0 };
        let p = Vec3::ZERO;
        assert_eq!(blend.blend(Vec3::new(0.0, 0.0, -5.0), p, CENTER), p);
        assert_eq!(blend.blend(Vec3::new(0.0, 0.0, 15.0), p, CENTER), CENTER);
        let mid = blend.blend(Vec3::new(0.0, 0.0, 5.0), p, CENTER);
        assert!((mid - CENTER * 0.5).length() < 1e-6);
    }

    #[test]
    fn test_jitter_is_deterministic_and_bounded() {
        let blend = Jitter::new(42);
        let p = Vec3::new(0.9, 0.1, 0.5);
        let corner = Vec3::new(3.0, -2.0, 7.0);

        let a = blend.blend(corner, p, CENTER);
        let b = blend.blend(corner, p, CENTER);
        assert_eq!(a, b);
        assert!(a.cmpge(Vec3::ZERO).all() && a.cmple(Vec3::ONE).all());

        let other = blend.blend(corner + Vec3::X, p, CENTER);
        assert_ne!(a, other);
        let reseeded = Jitter::new(43).blend(corner, p, CENTER);
        assert_ne!(a, reseeded);
    }

    #[test]
    fn test_quantize_snaps_down() {
        let q = Quantize::default().blend(Vec3::ZERO, Vec3::new(0.1, 0.5, 0.9), CENTER);
        let third = 1.0 / 3.0;
        assert!((q - Vec3::new(0.0, third, 2.0 * third)).length() < 1e-6);
    }

    #[test]
    fn test_gated_selects_by_plane() {
        let gated = Gated {
            axis: Axis::Y,
            threshold: 4.0,
            lower: Smooth,
            upper: Fixed { factor: 1.0 },
        };
        let p = Vec3::ZERO;
        assert_eq!(gated.blend(Vec3::new(0.0, 3.0, 0.0), p, CENTER), p);
        assert_eq!(gated.blend(Vec3::new(0.0, 4.0, 0.0), p, CENTER), CENTER);
    }

    #[test]
    fn test_blend_kind_matches_structs() {
        let kind = BlendKind::Gated {
            axis: Axis::Z,
            threshold: 0.0,
            lower: Box::new(BlendKind::Quantize { step: 0.5 }),
            upper: Box::new(BlendKind::Jitter {
                seed: 7,
                amplitude: 0.3,
            }),
        };
        let p = Vec3::new(0.3, 0.6, 0.8);
        let below = Vec3::new(0.0, 0.0, -1.0);
        let above = Vec3::new(0.0, 0.0, 1.0);
        assert_eq!(
            kind.blend(below, p, CENTER),
            Quantize { step: 0.5 }.blend(below, p, CENTER)
        );
        assert_eq!(kind.blend(above, p, CENTER), Jitter::new(7).blend(above, p, CENTER));
    }
}
