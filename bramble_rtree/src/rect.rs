// Copyright 2026 the Bramble Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis-aligned rectangles in `D` dimensions and the volume metrics used by
//! the insertion and split heuristics.

/// Highest dimension with an entry in the unit-sphere volume table.
pub const MAX_DIMS: usize = 10;

/// Volume of the unit D-ball, for `D` in `0..=MAX_DIMS`.
///
/// `V_0 = 1`, `V_1 = 2`, `V_2 = pi`, `V_3 = 4*pi/3`, and so on; the sequence
/// peaks near `D = 5` and then decays.
const UNIT_SPHERE_VOLUMES: [f64; MAX_DIMS + 1] = [
    1.000000,
    2.000000,
    3.141592653589793,
    4.188790204786391,
    4.934802200544679,
    5.263789013914324,
    5.167712780049970,
    4.724765970331401,
    4.058712126416768,
    3.298508902738707,
    2.550164039877345,
];

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("bramble_rtree requires either the `std` or `libm` feature");

#[cfg(feature = "std")]
#[inline]
fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

#[cfg(all(not(feature = "std"), feature = "libm"))]
#[inline]
fn sqrt(x: f64) -> f64 {
    libm::sqrt(x)
}

#[inline]
fn powi(base: f64, exp: usize) -> f64 {
    let mut out = 1.0;
    for _ in 0..exp {
        out *= base;
    }
    out
}

/// An axis-aligned rectangle with `min` and `max` corners per axis.
///
/// The bounds are closed: a point on a face is inside. A well-formed
/// rectangle has `min[a] <= max[a]` on every axis; the one exception is
/// [`Rect::NULL`], which is inverted on every axis and acts as the identity
/// for [`Rect::union`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect<const D: usize> {
    /// Minimum corner.
    pub min: [f64; D],
    /// Maximum corner.
    pub max: [f64; D],
}

impl<const D: usize> Rect<D> {
    /// The union identity: inverted on every axis, disjoint from everything.
    pub const NULL: Self = Self {
        min: [f64::INFINITY; D],
        max: [f64::NEG_INFINITY; D],
    };

    /// Create a rectangle from min/max corners.
    ///
    /// Debug-asserts `min <= max` per axis; inverted input is caller error
    /// and leads to unspecified tree behavior in release builds.
    #[inline]
    pub fn new(min: [f64; D], max: [f64; D]) -> Self {
        let r = Self { min, max };
        debug_assert!(!r.is_inverted(), "rectangle bounds inverted");
        r
    }

    /// A degenerate rectangle covering a single point.
    #[inline]
    pub fn point(p: [f64; D]) -> Self {
        Self { min: p, max: p }
    }

    /// Whether this is the null rectangle (inverted on every axis).
    #[inline]
    pub fn is_null(&self) -> bool {
        self.is_inverted()
    }

    #[inline]
    fn is_inverted(&self) -> bool {
        (0..D).any(|a| self.max[a] < self.min[a])
    }

    /// Smallest rectangle containing both inputs. `NULL` is the identity.
    #[inline]
    pub fn union(&self, other: &Self) -> Self {
        let mut out = *self;
        for a in 0..D {
            out.min[a] = self.min[a].min(other.min[a]);
            out.max[a] = self.max[a].max(other.max[a]);
        }
        out
    }

    /// Whether the closed intervals intersect on every axis.
    ///
    /// Touching edges count as overlap. The null rectangle overlaps nothing.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        for a in 0..D {
            if self.min[a] > other.max[a] || other.min[a] > self.max[a] {
                return false;
            }
        }
        true
    }

    /// Whether the point lies inside the closed bounds.
    #[inline]
    pub fn contains_point(&self, p: [f64; D]) -> bool {
        for a in 0..D {
            if p[a] < self.min[a] || p[a] > self.max[a] {
                return false;
            }
        }
        true
    }

    /// Exact volume: product of side lengths. Zero for the null rectangle.
    pub fn volume(&self) -> f64 {
        if self.is_null() {
            return 0.0;
        }
        let mut v = 1.0;
        for a in 0..D {
            v *= self.max[a] - self.min[a];
        }
        v
    }

    /// Volume of the D-ball whose diameter is this rectangle's diagonal.
    ///
    /// Smoother than the exact volume across elongated shapes, which makes
    /// it the better default metric for branch selection and split scoring.
    /// Requires `D <= MAX_DIMS`.
    pub fn spherical_volume(&self) -> f64 {
        if self.is_null() {
            return 0.0;
        }
        let mut sum_sq = 0.0;
        for a in 0..D {
            let half = (self.max[a] - self.min[a]) / 2.0;
            sum_sq += half * half;
        }
        UNIT_SPHERE_VOLUMES[D] * powi(sqrt(sum_sq), D)
    }
}

/// Which volume metric drives the insertion and split heuristics.
///
/// The metric is fixed for a tree's whole lifetime; mixing metrics breaks
/// the monotonicity the greedy heuristics rely on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum VolumeMetric {
    /// Product of side lengths.
    Exact,
    /// Enclosing-ball volume of the diagonal ([`Rect::spherical_volume`]).
    #[default]
    Spherical,
}

impl VolumeMetric {
    /// Measure a rectangle with this metric.
    #[inline]
    pub fn measure<const D: usize>(self, r: &Rect<D>) -> f64 {
        match self {
            Self::Exact => r.volume(),
            Self::Spherical => r.spherical_volume(),
        }
    }
}
