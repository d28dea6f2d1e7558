// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounds resolution: turning a control's bounds specification into a rectangle.
//!
//! The tree never interprets bounds itself. It asks a [`BoundsResolver`] for each control's
//! rectangle relative to its container, which is enough for hit testing and for converting
//! pointer positions into control-local coordinates.
//!
//! [`UniRect`] with [`UniResolver`] is the default: every coordinate is a fraction of the
//! container's extent plus a fixed offset.
//!
//! ```
//! use kurbo::Rect;
//! use understory_control_tree::{BoundsResolver, UniRect, UniResolver, UniScalar, UniVector};
//!
//! // Right half of the container, inset by 10 units on every side.
//! let bounds = UniRect::new(
//!     UniVector::new(UniScalar::new(0.5, 10.0), UniScalar::new(0.0, 10.0)),
//!     UniVector::new(UniScalar::new(0.5, -20.0), UniScalar::new(1.0, -20.0)),
//! );
//! let r = UniResolver.resolve(&bounds, Rect::new(0.0, 0.0, 200.0, 100.0));
//! assert_eq!(r, Rect::new(110.0, 10.0, 190.0, 90.0));
//! ```

use kurbo::{Point, Rect, Size};

/// Capability that resolves a bounds specification against a container rectangle.
pub trait BoundsResolver {
    /// Bounds specification stored on each control.
    type Bounds: Clone + core::fmt::Debug;

    /// Resolve `bounds` against the container's rectangle, returning a rectangle in the
    /// same coordinate space as `container`.
    fn resolve(&self, bounds: &Self::Bounds, container: Rect) -> Rect;

    /// Bounds that exactly cover the container. Used for screen roots.
    fn fill(&self) -> Self::Bounds;
}

/// One coordinate: a fraction of the container's extent plus an offset.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct UniScalar {
    /// Fraction of the container extent.
    pub fraction: f64,
    /// Fixed offset added after scaling.
    pub offset: f64,
}

impl UniScalar {
    /// Zero fraction and zero offset.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Create a scalar from a fraction and an offset.
    pub const fn new(fraction: f64, offset: f64) -> Self {
        Self { fraction, offset }
    }

    /// A purely absolute value.
    pub const fn absolute(offset: f64) -> Self {
        Self::new(0.0, offset)
    }

    /// Resolve against an extent.
    pub fn resolve(self, extent: f64) -> f64 {
        self.fraction * extent + self.offset
    }
}

/// A pair of [`UniScalar`]s.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct UniVector {
    /// Horizontal component.
    pub x: UniScalar,
    /// Vertical component.
    pub y: UniScalar,
}

impl UniVector {
    /// Create a vector from two scalars.
    pub const fn new(x: UniScalar, y: UniScalar) -> Self {
        Self { x, y }
    }
}

/// A rectangle specified relative to its container.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct UniRect {
    /// Top-left corner.
    pub location: UniVector,
    /// Width and height.
    pub size: UniVector,
}

impl UniRect {
    /// Covers the whole container.
    pub const FILL: Self = Self {
        location: UniVector::new(UniScalar::ZERO, UniScalar::ZERO),
        size: UniVector::new(UniScalar::new(1.0, 0.0), UniScalar::new(1.0, 0.0)),
    };

    /// Create a rectangle from a location and a size.
    pub const fn new(location: UniVector, size: UniVector) -> Self {
        Self { location, size }
    }

    /// A rectangle at a fixed position and size within its container.
    pub const fn absolute(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            UniVector::new(UniScalar::absolute(x), UniScalar::absolute(y)),
            UniVector::new(UniScalar::absolute(width), UniScalar::absolute(height)),
        )
    }

    /// Resolve against a container rectangle.
    pub fn to_rect(&self, container: Rect) -> Rect {
        let (w, h) = (container.width(), container.height());
        let origin = Point::new(
            container.x0 + self.location.x.resolve(w),
            container.y0 + self.location.y.resolve(h),
        );
        Rect::from_origin_size(
            origin,
            Size::new(self.size.x.resolve(w), self.size.y.resolve(h)),
        )
    }
}

/// Default resolver for [`UniRect`] bounds.
#[derive(Copy, Clone, Debug, Default)]
pub struct UniResolver;

impl BoundsResolver for UniResolver {
    type Bounds = UniRect;

    fn resolve(&self, bounds: &UniRect, container: Rect) -> Rect {
        bounds.to_rect(container)
    }

    fn fill(&self) -> UniRect {
        UniRect::FILL
    }
}

/// Rectangle of a container whose top-left corner is the origin.
pub(crate) fn container_rect(size: Size) -> Rect {
    Rect::from_origin_size(Point::ORIGIN, size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_covers_container() {
        let c = Rect::new(5.0, 5.0, 105.0, 55.0);
        assert_eq!(UniResolver.resolve(&UniRect::FILL, c), c);
    }

    #[test]
    fn absolute_is_offset_by_container_origin() {
        let r = UniRect::absolute(10.0, 20.0, 30.0, 40.0)
            .to_rect(Rect::new(100.0, 100.0, 500.0, 500.0));
        assert_eq!(r, Rect::new(110.0, 120.0, 140.0, 160.0));
    }

    #[test]
    fn fraction_tracks_container_size() {
        let centered = UniRect::new(
            UniVector::new(UniScalar::new(0.5, -10.0), UniScalar::new(0.5, -10.0)),
            UniVector::new(UniScalar::absolute(20.0), UniScalar::absolute(20.0)),
        );
        let small = centered.to_rect(container_rect(Size::new(100.0, 100.0)));
        let large = centered.to_rect(container_rect(Size::new(300.0, 200.0)));
        assert_eq!(small, Rect::new(40.0, 40.0, 60.0, 60.0));
        assert_eq!(large, Rect::new(140.0, 90.0, 160.0, 110.0));
    }
}
