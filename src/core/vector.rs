//! 2D-Punkt mit fester Nachkommastellen-Genauigkeit.
//!
//! Jede Operation, die einen neuen Punkt erzeugt, rundet beide Koordinaten auf
//! drei Nachkommastellen. Dadurch driften Positionen über viele Undo/Redo- und
//! Resampling-Zyklen nicht auseinander, und Gleichheitsvergleiche bleiben stabil.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Rundet auf drei Nachkommastellen.
#[inline]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Normalisiert eine Richtung (Grad) auf `[0, 360)` mit zwei Nachkommastellen.
#[inline]
pub fn normalize_heading(degrees: f64) -> f64 {
    let rounded = (degrees.rem_euclid(360.0) * 100.0).round() / 100.0;
    // 359.999 rundet auf 360.0
    if rounded >= 360.0 {
        0.0
    } else {
        rounded
    }
}

/// Punkt/Vektor in der Ebene.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    /// Erstellt einen gerundeten Punkt.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: round3(x),
            y: round3(y),
        }
    }

    pub fn add(&self, other: Vector2) -> Vector2 {
        Vector2::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: Vector2) -> Vector2 {
        Vector2::new(self.x - other.x, self.y - other.y)
    }

    /// Komponentenweise Multiplikation.
    pub fn multiply(&self, other: Vector2) -> Vector2 {
        Vector2::new(self.x * other.x, self.y * other.y)
    }

    /// Komponentenweise Division.
    pub fn divide(&self, other: Vector2) -> Vector2 {
        Vector2::new(self.x / other.x, self.y / other.y)
    }

    pub fn scale(&self, factor: f64) -> Vector2 {
        Vector2::new(self.x * factor, self.y * factor)
    }

    pub fn dot(&self, other: Vector2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn distance(&self, other: Vector2) -> f64 {
        DVec2::from(*self).distance(DVec2::from(other))
    }

    /// Bewegt sich um `distance` in Richtung `target`.
    ///
    /// Die Richtung ergibt sich aus dem Winkel zwischen beiden Punkten, nicht aus
    /// einem Verhältnis; `distance` darf daher größer als der Abstand sein.
    pub fn interpolate(&self, target: Vector2, distance: f64) -> Vector2 {
        let theta = (target.y - self.y).atan2(target.x - self.x);
        Vector2::new(
            self.x + distance * theta.cos(),
            self.y + distance * theta.sin(),
        )
    }

    /// Lineare Interpolation mit Verhältnis `ratio` (0 = self, 1 = target).
    pub fn lerp(&self, target: Vector2, ratio: f64) -> Vector2 {
        DVec2::from(*self).lerp(DVec2::from(target), ratio).into()
    }

    /// Punktspiegelung an `center`.
    pub fn mirror(&self, center: Vector2) -> Vector2 {
        Vector2::new(2.0 * center.x - self.x, 2.0 * center.y - self.y)
    }

    /// Mittelpunkt zwischen zwei Punkten.
    pub fn midpoint(&self, other: Vector2) -> Vector2 {
        Vector2::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Setzt beide Koordinaten (gerundet).
    pub fn set_xy(&mut self, x: f64, y: f64) {
        self.x = round3(x);
        self.y = round3(y);
    }

    /// Übernimmt die Koordinaten eines anderen Punkts.
    pub fn set_from(&mut self, other: Vector2) {
        self.set_xy(other.x, other.y);
    }
}

impl From<Vector2> for DVec2 {
    fn from(v: Vector2) -> Self {
        DVec2::new(v.x, v.y)
    }
}

impl From<DVec2> for Vector2 {
    fn from(v: DVec2) -> Self {
        Vector2::new(v.x, v.y)
    }
}
