#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use pagespy::config::ContentLoader;
use pagespy_core::render::render_shell;

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        let loader = ContentLoader::with_defaults();

        // Anything that loads must also render
        if let Ok(result) = loader.load_str(yaml_str, Path::new("fuzz.yaml")) {
            let _ = render_shell(&result.content);
        }
    }
});
