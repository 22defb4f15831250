// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::ops::{Add, Mul, Sub};

/// 2D point/vector in SVG user units.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// A horizontal rounded box whose short ends are semicircles: every point
/// within `radius` of the segment from `(cx - reach, cy)` to
/// `(cx + reach, cy)`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Stadium {
    pub center: Point,
    pub reach: f64,
    pub radius: f64,
}

impl Stadium {
    /// The shape of a `width` by `height` box with fully rounded ends.
    pub fn from_box(center: Point, width: f64, height: f64) -> Self {
        let radius = (height / 2.0).min(width / 2.0);
        Stadium {
            center,
            reach: (width / 2.0 - radius).max(0.0),
            radius,
        }
    }

    /// The outline edges are clipped against: the node box grown by one
    /// unit on every side.
    pub fn boundary(center: Point, width: f64, height: f64) -> Self {
        Stadium::from_box(center, width + 2.0, height + 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        let local = p - self.center;
        let nearest_x = local.x.clamp(-self.reach, self.reach);
        let dx = local.x - nearest_x;
        dx * dx + local.y * local.y <= self.radius * self.radius
    }

    /// Where the ray from the center toward `toward` leaves the outline, as a
    /// fraction of the distance to `toward`.  `None` for a zero-length ray.
    fn exit_fraction(&self, toward: Point) -> Option<f64> {
        let d = toward - self.center;
        let len2 = d.dot(d);
        if len2 == 0.0 {
            return None;
        }

        // flat top/bottom
        if d.y != 0.0 {
            let s = self.radius / d.y.abs();
            if (s * d.x).abs() <= self.reach {
                return Some(s);
            }
        }

        // rounded end on the side the ray heads toward
        let cap = Point::new(self.reach.copysign(d.x), 0.0);
        let b = d.dot(cap);
        let c = cap.dot(cap) - self.radius * self.radius;
        let disc = b * b - len2 * c;
        if disc < 0.0 {
            return None;
        }
        Some((b + disc.sqrt()) / len2)
    }

    /// Point where the segment from the center to `toward` crosses the
    /// outline, or `None` if `toward` lies inside.
    pub fn exit_point(&self, toward: Point) -> Option<Point> {
        let s = self.exit_fraction(toward)?;
        if s > 1.0 {
            return None;
        }
        Some(self.center + (toward - self.center) * s)
    }
}

/// A straight connector between two node outlines.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn midpoint(&self) -> Point {
        (self.start + self.end) * 0.5
    }
}

/// Clip the center-to-center line between two nodes to their outlines.
/// `None` when the outlines overlap so no visible segment remains.
pub fn clip_edge(source: &Stadium, target: &Stadium) -> Option<Segment> {
    let start = source.exit_point(target.center)?;
    let end = target.exit_point(source.center)?;
    Some(Segment { start, end })
}
