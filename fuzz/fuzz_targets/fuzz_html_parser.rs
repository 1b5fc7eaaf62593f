#![no_main]

use libfuzzer_sys::fuzz_target;
use pagespy_core::dom::{Document, Dom};

fuzz_target!(|data: &[u8]| {
    if let Ok(html) = std::str::from_utf8(data) {
        let mut doc = Document::parse(html);
        let serialized = doc.to_html();

        // Serialized output must parse again
        let reparsed = Document::parse(&serialized);
        let _ = reparsed.element_count();

        let root = doc.root();
        doc.set_inner_html(root, html);
    }
});
