#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use pagespy::runtime::Trace;
use pagespy_core::content::builtin;
use pagespy_core::dom::Document;
use pagespy_core::page::{Page, PageOptions};
use pagespy_core::render::render_shell;
use pagespy_core::spy::SpyOptions;

fuzz_target!(|data: &[u8]| {
    let Ok(yaml) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(trace) = Trace::parse(yaml, Path::new("fuzz.yaml")) else {
        return;
    };

    let content = builtin::site();
    let mut doc = Document::parse(&render_shell(&content));
    let (mut page, _) = Page::init(
        &mut doc,
        &content,
        SpyOptions::default(),
        PageOptions {
            fragment: trace.fragment.clone(),
            year: 2026,
            viewport: trace.viewport,
        },
    );

    if let Ok(events) = trace.resolve(&doc) {
        for event in events {
            let _ = page.dispatch(&mut doc, event);
        }
        // Exactly one control is marked once anything is active
        if page.active().is_some() {
            assert_eq!(page.spy().navigation().marked_controls(&doc).len(), 1);
        }
    }
});
