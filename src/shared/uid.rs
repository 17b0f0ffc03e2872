//! Vergabe eindeutiger IDs für Kontrollpunkte, Segmente, Keyframes und Pfade.

/// Liefert eine frische, zufällige ID.
///
/// Wird nur beim Erzeugen neuer Entitäten aufgerufen, nie beim reinen Klonen.
pub fn make_uid() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
