//! Längeneinheiten und reine Umrechnungsfunktion.

use serde::{Deserialize, Serialize};

/// Unterstützte Längeneinheiten eines Dokuments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitOfLength {
    #[serde(rename = "mm")]
    Millimeter,
    #[default]
    #[serde(rename = "cm")]
    Centimeter,
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "inch")]
    Inch,
    #[serde(rename = "foot")]
    Foot,
    /// Spielfeld-Kachel (600 mm)
    #[serde(rename = "tile")]
    Tile,
}

impl UnitOfLength {
    /// Länge einer Einheit in Millimetern.
    pub fn millimeters(self) -> f64 {
        match self {
            UnitOfLength::Millimeter => 1.0,
            UnitOfLength::Centimeter => 10.0,
            UnitOfLength::Meter => 1000.0,
            UnitOfLength::Inch => 25.4,
            UnitOfLength::Foot => 304.8,
            UnitOfLength::Tile => 600.0,
        }
    }
}

/// Rechnet einen Skalar von `from` nach `to` um.
pub fn convert(value: f64, from: UnitOfLength, to: UnitOfLength) -> f64 {
    if from == to {
        return value;
    }
    value * from.millimeters() / to.millimeters()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn same_unit_is_identity() {
        assert_eq!(convert(12.345, UnitOfLength::Foot, UnitOfLength::Foot), 12.345);
    }

    #[test]
    fn converts_between_metric_and_imperial() {
        assert_relative_eq!(
            convert(1.0, UnitOfLength::Inch, UnitOfLength::Centimeter),
            2.54
        );
        assert_relative_eq!(
            convert(2.0, UnitOfLength::Tile, UnitOfLength::Meter),
            1.2
        );
        assert_relative_eq!(
            convert(304.8, UnitOfLength::Millimeter, UnitOfLength::Foot),
            1.0
        );
    }

    #[test]
    fn unit_names_roundtrip_through_serde() {
        let json = serde_json::to_string(&UnitOfLength::Tile).unwrap();
        assert_eq!(json, "\"tile\"");
        let unit: UnitOfLength = serde_json::from_str("\"cm\"").unwrap();
        assert_eq!(unit, UnitOfLength::Centimeter);
    }
}
