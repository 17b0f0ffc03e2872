//! Austauschformat für Kopieren/Einfügen zwischen Dokumenten.
//!
//! Der Transport (System-Zwischenablage, Fenster-Broadcast) liegt beim Host.
//! Hier wird nur kodiert, fremde oder veraltete Nachrichten werden verworfen,
//! und aus einer gültigen Nachricht entsteht ein `AddPaths`-Command.

use super::commands::{AddPaths, Command};
use crate::core::{Path, Vector2};
use crate::shared::{convert, UnitOfLength};
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Kennung eigener Nachrichten.
pub const CLIPBOARD_FORMAT: &str = "path-planner-editor/paths";
/// Aktuelle Formatversion; ältere Nachrichten gelten als veraltet.
pub const CLIPBOARD_VERSION: u32 = 1;

/// Kopierte Pfade samt Einheit ihrer Koordinaten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClipboardMessage {
    pub format: String,
    pub version: u32,
    pub unit: UnitOfLength,
    pub paths: Vec<Path>,
}

impl ClipboardMessage {
    pub fn new(unit: UnitOfLength, paths: Vec<Path>) -> Self {
        Self {
            format: CLIPBOARD_FORMAT.to_string(),
            version: CLIPBOARD_VERSION,
            unit,
            paths,
        }
    }

    /// Serialisiert die Nachricht als JSON.
    pub fn encode(&self) -> anyhow::Result<String> {
        serde_json::to_string(self).context("Zwischenablage konnte nicht kodiert werden")
    }

    /// Liest eine Nachricht; `None` für fremde, veraltete oder defekte Inhalte.
    pub fn decode(text: &str) -> Option<Self> {
        let message: ClipboardMessage = match serde_json::from_str(text) {
            Ok(message) => message,
            Err(e) => {
                log::warn!("Zwischenablage ignoriert (kein Pfad-Format): {}", e);
                return None;
            }
        };
        if message.format != CLIPBOARD_FORMAT || message.version != CLIPBOARD_VERSION {
            log::warn!(
                "Zwischenablage ignoriert: Format {} v{}",
                message.format,
                message.version
            );
            return None;
        }
        if !message.paths.iter().all(Path::is_continuous) {
            log::warn!("Zwischenablage ignoriert: inkonsistente Pfad-Struktur");
            return None;
        }
        Some(message)
    }

    /// Erzeugt einen Einfüge-Command: Koordinaten in `target_unit`, frische IDs.
    pub fn into_paste_command(self, target_unit: UnitOfLength, index: Option<usize>) -> Command {
        let from = self.unit;
        let paths = self
            .paths
            .iter()
            .map(|path| {
                let mut copy = path.with_fresh_uids();
                copy.normalize_values();
                if from != target_unit {
                    copy.map_positions(|p| {
                        Vector2::new(
                            convert(p.x, from, target_unit),
                            convert(p.y, from, target_unit),
                        )
                    });
                }
                copy
            })
            .collect();
        Command::new(AddPaths::new(paths, index))
    }
}
