//! Zentrale Konfiguration für Pfad-Engine und History.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use super::units::{convert, UnitOfLength};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ── Knoten-Erzeugung ────────────────────────────────────────────────

/// Einheit, in der `knot_density` angegeben wird.
pub const KNOT_DENSITY_UNIT: UnitOfLength = UnitOfLength::Centimeter;
/// Standard-Abstand zwischen zwei Knoten (Zentimeter).
pub const KNOT_DENSITY: f64 = 2.0;
/// Überabtastung beim Segment-Resampling gegenüber der Ziel-Dichte.
pub const OVERSAMPLING_FACTOR: f64 = 200.0;

// ── Geschwindigkeit ─────────────────────────────────────────────────

/// Standard-Geschwindigkeitsgrenzen (min, max).
pub const SPEED_LIMIT: NumberRange = NumberRange {
    from: 20.0,
    to: 100.0,
};
/// Standard-Anwendungsbereich der Delta-Skalierung (leer = deaktiviert).
pub const APPLICATION_RANGE: NumberRange = NumberRange { from: 0.0, to: 0.0 };
/// Standard-Übergangsbereich (Beschleunigung bis 10 %, Verzögerung ab 90 %).
pub const TRANSITION_RANGE: NumberRange = NumberRange { from: 0.1, to: 0.9 };

// ── History ─────────────────────────────────────────────────────────

/// Zeitfenster, in dem gleichartige Commands zusammengeführt werden.
pub const MERGE_WINDOW_MS: u64 = 500;
/// Maximale Anzahl Undo-Schritte.
pub const HISTORY_DEPTH: usize = 200;

/// Geschlossenes Zahlenintervall `{from, to}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumberRange {
    pub from: f64,
    pub to: f64,
}

impl NumberRange {
    /// Erstellt ein neues Intervall.
    pub const fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    /// Prüft ob `value` im Intervall liegt (inklusive Grenzen).
    pub fn contains(&self, value: f64) -> bool {
        value >= self.from && value <= self.to
    }

    /// Lineare Interpolation zwischen `from` und `to`.
    pub fn lerp(&self, ratio: f64) -> f64 {
        self.from + (self.to - self.from) * ratio
    }
}

/// Allgemeine Dokument-Konfiguration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Arbeitseinheit der Pfad-Geometrie
    pub uol: UnitOfLength,
    /// Abstand zwischen zwei Knoten in `KNOT_DENSITY_UNIT`
    pub knot_density: f64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            uol: UnitOfLength::default(),
            knot_density: KNOT_DENSITY,
        }
    }
}

impl GeneralConfig {
    /// Knotenabstand in der Arbeitseinheit des Pfads.
    pub fn knot_spacing(&self) -> f64 {
        convert(self.knot_density, KNOT_DENSITY_UNIT, self.uol)
    }

    /// Feines Abtastintervall für das Segment-Resampling.
    pub fn sample_interval(&self) -> f64 {
        self.knot_spacing() / OVERSAMPLING_FACTOR
    }
}

/// Parameter der Geschwindigkeitsformung.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedConfig {
    /// Minimale und maximale Zielgeschwindigkeit
    pub speed_limit: NumberRange,
    /// Sehnenlängen-Fenster, in dem linear skaliert wird
    pub application_range: NumberRange,
    /// Normierte Bogenlängen-Grenzen für Beschleunigung/Verzögerung
    pub transition_range: NumberRange,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            speed_limit: SPEED_LIMIT,
            application_range: APPLICATION_RANGE,
            transition_range: TRANSITION_RANGE,
        }
    }
}

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Optionen.
/// Wird als `path_planner_editor.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorOptions {
    /// Merge-Fenster der History in Millisekunden
    #[serde(default = "default_merge_window_ms")]
    pub merge_window_ms: u64,
    /// Maximale Undo-Tiefe
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
    /// Einheit und Knotendichte
    #[serde(default)]
    pub general: GeneralConfig,
    /// Geschwindigkeitsformung
    #[serde(default)]
    pub speed: SpeedConfig,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            merge_window_ms: MERGE_WINDOW_MS,
            history_depth: HISTORY_DEPTH,
            general: GeneralConfig::default(),
            speed: SpeedConfig::default(),
        }
    }
}

/// Serde-Default für `merge_window_ms` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_merge_window_ms() -> u64 {
    MERGE_WINDOW_MS
}

/// Serde-Default für `history_depth`.
fn default_history_depth() -> usize {
    HISTORY_DEPTH
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("path_planner_editor"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("path_planner_editor.toml")
    }

    /// Merge-Fenster als `Duration`.
    pub fn merge_window(&self) -> Duration {
        Duration::from_millis(self.merge_window_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn knot_spacing_follows_document_unit() {
        let mut general = GeneralConfig::default();
        assert_relative_eq!(general.knot_spacing(), 2.0);

        general.uol = UnitOfLength::Millimeter;
        assert_relative_eq!(general.knot_spacing(), 20.0);
        assert_relative_eq!(general.sample_interval(), 0.1);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let opts: EditorOptions = toml::from_str("merge_window_ms = 250\n").unwrap();
        assert_eq!(opts.merge_window_ms, 250);
        assert_eq!(opts.history_depth, HISTORY_DEPTH);
        assert_eq!(opts.speed, SpeedConfig::default());
    }

    #[test]
    fn options_roundtrip_through_file() {
        let dir = std::env::temp_dir().join(format!("ppe_opts_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("options.toml");

        let mut opts = EditorOptions::default();
        opts.general.uol = UnitOfLength::Inch;
        opts.speed.speed_limit = NumberRange::new(10.0, 80.0);
        opts.save_to_file(&file).expect("Speichern muss gelingen");

        let loaded = EditorOptions::load_from_file(&file);
        assert_eq!(loaded, opts);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let opts = EditorOptions::load_from_file(std::path::Path::new("/nonexistent/opts.toml"));
        assert_eq!(opts, EditorOptions::default());
    }
}
