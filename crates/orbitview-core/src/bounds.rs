//! Axis-aligned bounding boxes.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{OrbitviewError, Result};

/// An axis-aligned bounding box.
///
/// Always satisfies `min <= max` componentwise with finite corners; the
/// constructors and deserialization reject anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Corners", into = "Corners")]
pub struct BoundingBox {
    min: Vec3,
    max: Vec3,
}

/// Unchecked serialized form of a [`BoundingBox`].
#[derive(Serialize, Deserialize)]
struct Corners {
    min: Vec3,
    max: Vec3,
}

impl TryFrom<Corners> for BoundingBox {
    type Error = OrbitviewError;

    fn try_from(corners: Corners) -> Result<Self> {
        Self::new(corners.min, corners.max)
    }
}

impl From<BoundingBox> for Corners {
    fn from(b: BoundingBox) -> Self {
        Self {
            min: b.min,
            max: b.max,
        }
    }
}

impl BoundingBox {
    /// Creates a bounding box from its corners.
    ///
    /// # Errors
    ///
    /// Returns [`OrbitviewError::InvalidBoundingBox`] if a coordinate is not
    /// finite or `max < min` on any axis.
    pub fn new(min: Vec3, max: Vec3) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || max.cmplt(min).any() {
            return Err(OrbitviewError::InvalidBoundingBox { min, max });
        }
        Ok(Self { min, max })
    }

    /// A zero-sized box at `point`.
    #[must_use]
    pub fn from_point(point: Vec3) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Smallest box containing every finite point.
    ///
    /// Returns `None` when the iterator yields no finite points.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        points
            .into_iter()
            .filter(|p| p.is_finite())
            .fold(None, |acc: Option<Self>, p| match acc {
                Some(b) => Some(b.including(p)),
                None => Some(Self::from_point(p)),
            })
    }

    /// Minimum corner.
    #[must_use]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Maximum corner.
    #[must_use]
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Extent along each axis (`max - min`).
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.max + self.min) * 0.5
    }

    /// Largest extent over the three axes.
    #[must_use]
    pub fn max_dimension(&self) -> f32 {
        self.size().max_element()
    }

    /// Axes with zero extent (a flat or point-like box).
    #[must_use]
    pub fn flat_axes(&self) -> [bool; 3] {
        let size = self.size();
        [size.x == 0.0, size.y == 0.0, size.z == 0.0]
    }

    /// Grows the box to include `point`.
    #[must_use]
    pub fn including(self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The box moved by `offset`.
    ///
    /// Moves the center and keeps the half extent, so translating by
    /// `-self.center()` gives a box centered exactly on the origin. A zero
    /// offset returns the box unchanged.
    #[must_use]
    pub fn translated(&self, offset: Vec3) -> Self {
        if offset == Vec3::ZERO {
            return *self;
        }
        let center = self.center() + offset;
        let half = self.size() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// The box scaled uniformly about the world origin.
    ///
    /// A negative factor mirrors the box; corners are re-sorted so the
    /// result stays valid.
    #[must_use]
    pub fn scaled(&self, factor: f32) -> Self {
        let a = self.min * factor;
        let b = self.max * factor;
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Bounds of the box after an affine transform (all eight corners).
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let (lo, hi) = (self.min, self.max);
        let corners = [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ];
        let first = matrix.transform_point3(corners[0]);
        corners[1..]
            .iter()
            .fold(Self::from_point(first), |acc, &c| {
                acc.including(matrix.transform_point3(c))
            })
    }

    /// Whether `point` lies inside or on the box.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_and_center() {
        let b = BoundingBox::new(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 4.0, 4.0)).unwrap();
        assert_eq!(b.size(), Vec3::new(4.0, 4.0, 2.0));
        assert_eq!(b.center(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(b.max_dimension(), 4.0);
    }

    #[test]
    fn test_rejects_inverted_box() {
        let err = BoundingBox::new(Vec3::ONE, Vec3::ZERO);
        assert!(matches!(err, Err(OrbitviewError::InvalidBoundingBox { .. })));
    }

    #[test]
    fn test_deserialize_validates_corners() {
        let b: BoundingBox =
            serde_json::from_str(r#"{"min":[-1.0,0.0,0.0],"max":[1.0,2.0,3.0]}"#).unwrap();
        assert_eq!(b.max(), Vec3::new(1.0, 2.0, 3.0));

        let inverted = serde_json::from_str::<BoundingBox>(r#"{"min":[5,5,5],"max":[-5,-5,-5]}"#);
        assert!(inverted.is_err());
    }

    #[test]
    fn test_serialize_keeps_corners() {
        let b = BoundingBox::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0)).unwrap();
        let json = serde_json::to_string(&b).unwrap();
        let back: BoundingBox = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn test_translating_by_negated_center_is_exact() {
        let b = BoundingBox::new(
            Vec3::new(-0.822, 9.670, 19.220),
            Vec3::new(38.450, 11.762, 56.510),
        )
        .unwrap();
        let moved = b.translated(-b.center());
        assert_eq!(moved.center(), Vec3::ZERO);
        assert_eq!(moved.min(), -moved.max());
    }

    #[test]
    fn test_rejects_non_finite_box() {
        assert!(BoundingBox::new(Vec3::splat(f32::NEG_INFINITY), Vec3::ZERO).is_err());
        assert!(BoundingBox::new(Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_from_points() {
        let b = BoundingBox::from_points([
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-1.0, 2.0, 0.0),
            Vec3::new(f32::NAN, 100.0, 0.0),
        ])
        .unwrap();
        assert_eq!(b.min(), Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max(), Vec3::new(1.0, 2.0, 0.5));

        assert!(BoundingBox::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_flat_axes() {
        let b = BoundingBox::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0)).unwrap();
        assert_eq!(b.flat_axes(), [false, true, false]);
    }

    #[test]
    fn test_scaled_negative_factor_stays_valid() {
        let b = BoundingBox::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 3.0, 4.0)).unwrap();
        let s = b.scaled(-2.0);
        assert_eq!(s.min(), Vec3::new(-4.0, -6.0, -8.0));
        assert_eq!(s.max(), Vec3::new(-2.0, -2.0, -2.0));
    }

    #[test]
    fn test_transformed_rotation() {
        let b = BoundingBox::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0)).unwrap();
        let rot = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let t = b.transformed(&rot);
        assert!((t.size() - Vec3::new(1.0, 2.0, 1.0)).length() < 1e-5);
        assert!(t.contains(Vec3::new(-0.5, 1.0, 0.5)));
    }

    #[test]
    fn test_union_and_translate() {
        let a = BoundingBox::from_point(Vec3::ZERO);
        let b = BoundingBox::from_point(Vec3::ONE).translated(Vec3::X);
        let u = a.union(&b);
        assert_eq!(u.min(), Vec3::ZERO);
        assert_eq!(u.max(), Vec3::new(2.0, 1.0, 1.0));
    }
}
