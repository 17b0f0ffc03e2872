#![no_main]

use libfuzzer_sys::fuzz_target;
use path_planner_editor::{ClipboardMessage, Document, UnitOfLength};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Fremde Inhalte dürfen nie zu einem Panic führen
    if let Some(message) = ClipboardMessage::decode(text) {
        let mut doc = Document::new();
        let mut command = message.into_paste_command(UnitOfLength::Meter, None);
        if command.execute(&mut doc) {
            command.undo(&mut doc);
            assert!(doc.is_empty());
        }
    }
});
