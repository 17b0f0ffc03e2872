//! Geteilte, layer-neutrale Bausteine: Konfiguration, Einheiten, ID-Vergabe.

pub mod options;
pub mod uid;
pub mod units;

pub use options::{EditorOptions, GeneralConfig, NumberRange, SpeedConfig};
pub use uid::make_uid;
pub use units::{convert, UnitOfLength};
