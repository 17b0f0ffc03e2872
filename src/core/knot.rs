//! Abgetastete Fahrknoten und der versionierte Knoten-Cache eines Pfads.

use super::vector::Vector2;
use crate::shared::{GeneralConfig, SpeedConfig};
use serde::{Deserialize, Serialize};

/// Diskreter Punkt entlang eines Pfads, Ergebnis des Resamplings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Knot {
    pub x: f64,
    pub y: f64,
    /// Abstand zum vorherigen Knoten
    pub delta: f64,
    /// Kumulierte Bogenlänge ab Pfadanfang
    pub integral: f64,
    /// Zielgeschwindigkeit
    pub speed: f64,
    /// Fahrtrichtung (nur an Segmentgrenzen gesetzt)
    pub heading: Option<f64>,
}

impl Knot {
    pub fn new(position: Vector2, delta: f64, integral: f64, heading: Option<f64>) -> Self {
        Self {
            x: position.x,
            y: position.y,
            delta,
            integral,
            speed: 0.0,
            heading,
        }
    }

    pub fn position(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }
}

/// Stempel, unter dem ein Knoten-Ergebnis gültig ist.
#[derive(Debug, Clone, PartialEq)]
struct KnotStamp {
    revision: u64,
    general: GeneralConfig,
    speed: SpeedConfig,
}

/// Memoisierte Knotenliste, gültig für genau eine Geometrie-Revision und Konfiguration.
#[derive(Debug, Clone, Default)]
pub struct KnotCache {
    stamp: Option<KnotStamp>,
    knots: Vec<Knot>,
}

impl KnotCache {
    /// Liefert die Knoten für den Stempel; berechnet sie bei Abweichung neu.
    pub fn get_or_compute(
        &mut self,
        revision: u64,
        general: &GeneralConfig,
        speed: &SpeedConfig,
        compute: impl FnOnce() -> Vec<Knot>,
    ) -> &[Knot] {
        let fresh = self.stamp.as_ref().is_some_and(|s| {
            s.revision == revision && &s.general == general && &s.speed == speed
        });
        if !fresh {
            self.knots = compute();
            self.stamp = Some(KnotStamp {
                revision,
                general: general.clone(),
                speed: speed.clone(),
            });
        }
        &self.knots
    }

    /// Knoten, falls sie zur angegebenen Revision berechnet wurden.
    pub fn get(&self, revision: u64) -> Option<&[Knot]> {
        match &self.stamp {
            Some(stamp) if stamp.revision == revision => Some(&self.knots),
            _ => None,
        }
    }

    /// Verwirft das gespeicherte Ergebnis.
    pub fn invalidate(&mut self) {
        self.stamp = None;
        self.knots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn cache_recomputes_only_on_stamp_change() {
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            vec![Knot::new(Vector2::new(1.0, 1.0), 0.0, 0.0, None)]
        };
        let general = GeneralConfig::default();
        let speed = SpeedConfig::default();
        let mut cache = KnotCache::default();

        cache.get_or_compute(1, &general, &speed, compute);
        cache.get_or_compute(1, &general, &speed, compute);
        assert_eq!(calls.get(), 1);

        cache.get_or_compute(2, &general, &speed, compute);
        assert_eq!(calls.get(), 2);

        let mut other = general.clone();
        other.knot_density = 5.0;
        cache.get_or_compute(2, &other, &speed, compute);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn stale_revision_is_not_served() {
        let mut cache = KnotCache::default();
        cache.get_or_compute(4, &GeneralConfig::default(), &SpeedConfig::default(), Vec::new);
        assert!(cache.get(4).is_some());
        assert!(cache.get(5).is_none());
        cache.invalidate();
        assert!(cache.get(4).is_none());
    }
}
