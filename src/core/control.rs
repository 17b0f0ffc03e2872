//! Kontrollpunkte eines Pfads: einfache Wegpunkte und gerichtete Endpunkte.

use super::vector::{normalize_heading, Vector2};
use crate::shared::make_uid;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Arena aller Kontrollpunkte eines Pfads, indexiert nach `uid`.
///
/// Segmente halten nur IDs; benachbarte Segmente teilen sich ihren Grenzpunkt
/// über denselben Arena-Eintrag.
pub type ControlArena = IndexMap<String, Control>;

/// Art eines Kontrollpunkts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControlKind {
    /// Innerer Bézier-Stützpunkt ohne Richtung
    Waypoint,
    /// Segment-Endpunkt mit Fahrtrichtung (Grad, `[0, 360)`)
    End { heading: f64 },
}

/// Ein Kontrollpunkt mit Sperr- und Sichtbarkeits-Flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Control {
    /// Eindeutige ID, wird nie neu vergeben
    pub uid: String,
    /// Position (3 Nachkommastellen)
    pub position: Vector2,
    /// Gesperrt gegen Bearbeitung im Host
    pub locked: bool,
    /// Sichtbar im Host
    pub visible: bool,
    /// Wegpunkt oder gerichteter Endpunkt
    pub kind: ControlKind,
}

impl Control {
    /// Erstellt einen inneren Wegpunkt mit frischer ID.
    pub fn waypoint(position: Vector2) -> Self {
        Self {
            uid: make_uid(),
            position,
            locked: false,
            visible: true,
            kind: ControlKind::Waypoint,
        }
    }

    /// Erstellt einen gerichteten Endpunkt mit frischer ID.
    pub fn end(position: Vector2, heading: f64) -> Self {
        Self {
            uid: make_uid(),
            position,
            locked: false,
            visible: true,
            kind: ControlKind::End {
                heading: normalize_heading(heading),
            },
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self.kind, ControlKind::End { .. })
    }

    /// Richtung, falls es sich um einen Endpunkt handelt.
    pub fn heading(&self) -> Option<f64> {
        match self.kind {
            ControlKind::End { heading } => Some(heading),
            ControlKind::Waypoint => None,
        }
    }

    /// Setzt die Richtung eines Endpunkts. Wegpunkte bleiben unverändert.
    pub fn set_heading(&mut self, degrees: f64) -> bool {
        match &mut self.kind {
            ControlKind::End { heading } => {
                *heading = normalize_heading(degrees);
                true
            }
            ControlKind::Waypoint => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_control_normalizes_heading() {
        let c = Control::end(Vector2::new(1.0, 2.0), -45.0);
        assert_eq!(c.heading(), Some(315.0));
        assert!(c.is_end());
    }

    #[test]
    fn waypoint_has_no_heading() {
        let mut c = Control::waypoint(Vector2::new(0.0, 0.0));
        assert_eq!(c.heading(), None);
        assert!(!c.set_heading(90.0));
    }

    #[test]
    fn every_control_gets_a_fresh_uid() {
        let a = Control::waypoint(Vector2::default());
        let b = Control::waypoint(Vector2::default());
        assert_ne!(a.uid, b.uid);
        // Klonen vergibt keine neue ID
        assert_eq!(a.clone().uid, a.uid);
    }
}
