mod common;

use common::PageSpyProcess;
use serde_json::Value;

fn types(events: &[Value]) -> Vec<&str> {
    events
        .iter()
        .map(|e| e["type"].as_str().unwrap_or_default())
        .collect()
}

#[test]
fn simulate_trace_streams_events() {
    let site = PageSpyProcess::fixture_path("site.yaml");
    let trace = PageSpyProcess::fixture_path("trace.yaml");
    let output = PageSpyProcess::spawn_command(&[
        "simulate",
        trace.to_str().unwrap(),
        "--content",
        site.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "simulate should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let events = PageSpyProcess::parse_events(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(
        types(&events),
        [
            "content_rendered",
            "active_section_changed",
            "page_initialized",
            "active_section_changed",
            "sidebar_opened",
            "sidebar_closed",
            "active_section_changed",
            "focus_moved",
            "run_completed",
        ]
    );

    for (i, event) in events.iter().enumerate() {
        assert_eq!(event["sequence"], i);
    }

    // unknown fragment falls back to the default section
    assert_eq!(events[1]["current"], "overview");
    assert!(events[1]["previous"].is_null());
    assert!(events[1]["ratio"].is_null());

    assert_eq!(events[2]["sidebar"], true);
    assert_eq!(events[0]["modules"], 2);
    assert_eq!(events[0]["phases"], 2);

    assert_eq!(events[3]["previous"], "overview");
    assert_eq!(events[3]["current"], "module-costing");
    assert_eq!(events[6]["current"], "roadmap");
    assert_eq!(events[7]["target"], "main");

    let summary = &events[8]["summary"];
    assert_eq!(summary["events"], 7);
    assert_eq!(summary["batches"], 4);
    assert_eq!(summary["empty_batches"], 1);
    assert_eq!(summary["active_changes"], 2);
    assert_eq!(summary["final_section"], "roadmap");
    assert_eq!(summary["cancelled"], false);
}

#[test]
fn simulate_writes_events_html_and_metrics() {
    let site = PageSpyProcess::fixture_path("site.yaml");
    let trace = PageSpyProcess::fixture_path("trace.yaml");
    let dir = tempfile::tempdir().unwrap();
    let events_path = dir.path().join("events.jsonl");
    let html_path = dir.path().join("final.html");

    let output = PageSpyProcess::spawn_command(&[
        "simulate",
        trace.to_str().unwrap(),
        "--content",
        site.to_str().unwrap(),
        "--events",
        events_path.to_str().unwrap(),
        "--output",
        html_path.to_str().unwrap(),
        "--metrics",
    ]);
    assert!(
        output.status.success(),
        "simulate should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let events = PageSpyProcess::read_events(&events_path);
    assert_eq!(events.last().unwrap()["type"], "run_completed");

    let html = std::fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("<span id=\"year\">2031</span>"));
    assert!(html.contains("class=\"nav__link is-active\" data-nav href=\"#roadmap\""));
    assert_eq!(html.matches("is-active").count(), 1);
    assert!(html.contains("class=\"sidebar\" id=\"sidebar\""));

    let metrics = String::from_utf8_lossy(&output.stdout);
    assert!(metrics.contains("pagespy_visibility_batches_total 4"));
    assert!(metrics.contains("pagespy_active_changes_total 2"));
    assert!(metrics.contains("pagespy_empty_batches_total 1"));
    assert!(metrics.contains("pagespy_sidebar_toggles_total"));
}

#[test]
fn simulate_fragment_override() {
    let trace = PageSpyProcess::fixture_path("trace.yaml");
    let output = PageSpyProcess::spawn_command(&[
        "simulate",
        trace.to_str().unwrap(),
        "--fragment",
        "#modules",
    ]);
    assert!(output.status.success());
    let events = PageSpyProcess::parse_events(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(events[1]["current"], "modules");
}

#[test]
fn simulate_unknown_section_is_trace_error() {
    let trace = PageSpyProcess::fixture_path("bad_trace.yaml");
    let output = PageSpyProcess::spawn_command(&["simulate", trace.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("events[0]: unknown section 'pricing'"));
}

#[test]
fn simulate_missing_trace() {
    let output =
        PageSpyProcess::spawn_command(&["simulate", "/tmp/nonexistent_pagespy_trace.yaml"]);
    assert_eq!(output.status.code(), Some(4));
}
