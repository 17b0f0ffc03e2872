//! Geschwindigkeitsformung entlang eines Pfads.
//!
//! Jede Schranke liefert eine Obergrenze; die Zielgeschwindigkeit eines Knotens
//! ist das Minimum aller Schranken. Deaktivierte Schranken liefern `INFINITY`.

use super::knot::Knot;
use crate::shared::SpeedConfig;

/// Auswertung der Geschwindigkeitsschranken für einen Pfad bekannter Länge.
#[derive(Debug, Clone, Copy)]
pub struct SpeedProfile<'a> {
    config: &'a SpeedConfig,
    total_length: f64,
}

impl<'a> SpeedProfile<'a> {
    pub fn new(config: &'a SpeedConfig, total_length: f64) -> Self {
        Self {
            config,
            total_length,
        }
    }

    /// Geschwindigkeit eines Keyframes mit normiertem Wert `y_pos`.
    pub fn keyframe_speed(&self, y_pos: f64) -> f64 {
        self.config.speed_limit.lerp(y_pos)
    }

    /// Schranke aus dem Knotenabstand innerhalb des Anwendungsbereichs.
    pub fn delta_speed(&self, delta: f64) -> f64 {
        let range = self.config.application_range;
        let limit = self.config.speed_limit;
        let width = range.to - range.from;
        if delta == 0.0 || width <= 0.0 || !range.contains(delta) {
            return limit.to;
        }
        limit.lerp((delta - range.from) / width)
    }

    /// Beschleunigungsrampe vor `transition_range.from * Länge`.
    pub fn acceleration_bound(&self, integral: f64) -> f64 {
        let boundary = self.config.transition_range.from * self.total_length;
        if integral < boundary {
            self.config.speed_limit.lerp(integral / boundary)
        } else {
            f64::INFINITY
        }
    }

    /// Verzögerungsrampe nach `transition_range.to * Länge`.
    pub fn deceleration_bound(&self, integral: f64) -> f64 {
        let boundary = self.config.transition_range.to * self.total_length;
        if integral > boundary {
            let remaining = (self.total_length - integral).max(0.0);
            self.config
                .speed_limit
                .lerp(remaining / (self.total_length - boundary))
        } else {
            f64::INFINITY
        }
    }

    /// Minimum aus Keyframe-, Abstands- und Rampenschranken.
    pub fn shape(&self, knot: &Knot, keyframe_speed: f64) -> f64 {
        keyframe_speed
            .min(self.delta_speed(knot.delta))
            .min(self.acceleration_bound(knot.integral))
            .min(self.deceleration_bound(knot.integral))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::NumberRange;
    use approx::assert_relative_eq;

    fn config() -> SpeedConfig {
        SpeedConfig {
            speed_limit: NumberRange::new(20.0, 100.0),
            application_range: NumberRange::new(1.0, 3.0),
            transition_range: NumberRange::new(0.1, 0.9),
        }
    }

    #[test]
    fn delta_speed_inside_and_outside_range() {
        let config = config();
        let profile = SpeedProfile::new(&config, 100.0);
        assert_eq!(profile.delta_speed(0.0), 100.0);
        assert_eq!(profile.delta_speed(0.5), 100.0);
        assert_eq!(profile.delta_speed(1.0), 20.0);
        assert_relative_eq!(profile.delta_speed(2.0), 60.0);
        assert_eq!(profile.delta_speed(5.0), 100.0);
    }

    #[test]
    fn ramps_are_linear_in_position() {
        let config = config();
        let profile = SpeedProfile::new(&config, 100.0);
        assert_eq!(profile.acceleration_bound(0.0), 20.0);
        assert_relative_eq!(profile.acceleration_bound(5.0), 60.0);
        assert!(profile.acceleration_bound(10.0).is_infinite());

        assert!(profile.deceleration_bound(90.0).is_infinite());
        assert_relative_eq!(profile.deceleration_bound(95.0), 60.0);
        assert_eq!(profile.deceleration_bound(100.0), 20.0);
    }

    #[test]
    fn zero_width_ramps_are_disabled() {
        let mut config = config();
        config.transition_range = NumberRange::new(0.0, 1.0);
        config.application_range = NumberRange::new(2.0, 2.0);
        let profile = SpeedProfile::new(&config, 50.0);
        assert!(profile.acceleration_bound(0.0).is_infinite());
        assert!(profile.deceleration_bound(50.0).is_infinite());
        assert_eq!(profile.delta_speed(2.0), 100.0);
    }

    #[test]
    fn shape_takes_minimum() {
        let config = config();
        let profile = SpeedProfile::new(&config, 100.0);
        let knot = Knot {
            x: 0.0,
            y: 0.0,
            delta: 0.2,
            integral: 50.0,
            speed: 0.0,
            heading: None,
        };
        assert_eq!(profile.shape(&knot, 45.0), 45.0);
        assert_eq!(profile.shape(&knot, 1000.0), 100.0);
    }
}
