//! Geschwindigkeits-Keyframes eines Segments.

use crate::shared::make_uid;
use serde::{Deserialize, Serialize};

/// Normierter Geschwindigkeitsmarker auf einem Segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub uid: String,
    /// Position entlang des Segments (Bogenlängen-Anteil, `[0, 1]`)
    pub x_pos: f64,
    /// Geschwindigkeitsfaktor innerhalb von `speed_limit` (`[0, 1]`)
    pub y_pos: f64,
}

impl Keyframe {
    /// Erstellt einen Keyframe mit frischer ID; beide Werte werden auf `[0, 1]` begrenzt.
    pub fn new(x_pos: f64, y_pos: f64) -> Self {
        Self {
            uid: make_uid(),
            x_pos: x_pos.clamp(0.0, 1.0),
            y_pos: y_pos.clamp(0.0, 1.0),
        }
    }

    /// Setzt die Position (begrenzt auf `[0, 1]`).
    pub fn set_position(&mut self, x_pos: f64, y_pos: f64) {
        self.x_pos = x_pos.clamp(0.0, 1.0);
        self.y_pos = y_pos.clamp(0.0, 1.0);
    }
}

/// Fügt `keyframe` sortiert nach `x_pos` ein (hinter gleichen Positionen).
pub fn insert_sorted(keyframes: &mut Vec<Keyframe>, keyframe: Keyframe) -> usize {
    let index = keyframes.partition_point(|k| k.x_pos <= keyframe.x_pos);
    keyframes.insert(index, keyframe);
    index
}

/// Aktiver Keyframe an Position `x`: der letzte mit `x_pos <= x`.
pub fn active_at(keyframes: &[Keyframe], x: f64) -> Option<&Keyframe> {
    let index = keyframes.partition_point(|k| k.x_pos <= x);
    index.checked_sub(1).map(|i| &keyframes[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_keeps_order() {
        let mut list = Vec::new();
        insert_sorted(&mut list, Keyframe::new(0.5, 1.0));
        insert_sorted(&mut list, Keyframe::new(0.1, 1.0));
        insert_sorted(&mut list, Keyframe::new(0.9, 1.0));
        let xs: Vec<f64> = list.iter().map(|k| k.x_pos).collect();
        assert_eq!(xs, vec![0.1, 0.5, 0.9]);
    }

    #[test]
    fn equal_positions_insert_after_existing() {
        let mut list = vec![Keyframe::new(0.5, 0.2)];
        let second = Keyframe::new(0.5, 0.8);
        let uid = second.uid.clone();
        assert_eq!(insert_sorted(&mut list, second), 1);
        assert_eq!(list[1].uid, uid);
    }

    #[test]
    fn active_keyframe_lookup() {
        let list = vec![Keyframe::new(0.2, 0.3), Keyframe::new(0.6, 0.7)];
        assert!(active_at(&list, 0.1).is_none());
        assert_eq!(active_at(&list, 0.2).map(|k| k.y_pos), Some(0.3));
        assert_eq!(active_at(&list, 0.99).map(|k| k.y_pos), Some(0.7));
    }

    #[test]
    fn values_are_clamped() {
        let k = Keyframe::new(-0.5, 1.5);
        assert_eq!((k.x_pos, k.y_pos), (0.0, 1.0));
    }
}
