use std::collections::HashSet;

use pagespy_core::content::{ModuleRecord, RoadmapPhase, SiteContent, builtin};
use pagespy_core::dom::{Document, Dom, Selector};
use pagespy_core::render::{Renderer, render_module, render_phase, render_shell};
use proptest::prelude::*;

fn module(id: &str, name: &str, tags: &[&str]) -> ModuleRecord {
    ModuleRecord {
        id: id.to_string(),
        name: name.to_string(),
        summary: format!("{name} summary"),
        tags: tags.iter().map(ToString::to_string).collect(),
        tables: vec![format!("{id}_items")],
    }
}

fn rendered(content: &SiteContent) -> Document {
    let mut doc = Document::parse(&render_shell(content));
    Renderer::attach(&doc).render(&mut doc, content);
    doc
}

fn all_ids(doc: &Document) -> Vec<String> {
    doc.query_all(&Selector::any().attribute("id"))
        .into_iter()
        .filter_map(|n| doc.attribute(n, "id"))
        .collect()
}

#[test]
fn two_modules_render_two_blocks() {
    let mut content = builtin::site();
    content.modules = vec![
        module("projects", "Projects", &["core"]),
        module("costing", "Costing", &["finance"]),
    ];
    let doc = rendered(&content);

    let blocks = doc.query_all(&Selector::tag("article").class("module"));
    assert_eq!(blocks.len(), 2);
    assert_eq!(doc.attribute(blocks[0], "id").as_deref(), Some("module-projects"));
    assert_eq!(doc.attribute(blocks[1], "id").as_deref(), Some("module-costing"));
}

#[test]
fn slash_tag_renders_literally() {
    let mut content = builtin::site();
    content.modules = vec![module("drawings", "Sketch", &["Konva/Fabric"])];
    let doc = rendered(&content);

    let pills = doc.query_all(&Selector::tag("span").class("pill"));
    assert!(
        pills.iter().any(|&p| doc.text_content(p) == "Konva/Fabric"),
        "tag pill should carry the literal text"
    );
}

#[test]
fn script_tag_never_becomes_an_element() {
    let mut content = builtin::site();
    content.modules = vec![module("x", "<script>alert(1)</script>", &["<script>"])];
    let html = render_module(&content.modules[0]);
    assert!(html.contains("&lt;script&gt;"));

    let doc = rendered(&content);
    assert!(doc.query_all(&Selector::tag("script")).is_empty());
    let name = doc.query_all(&Selector::tag("h3").class("module__name"))[0];
    assert_eq!(doc.text_content(name), "<script>alert(1)</script>");
}

#[test]
fn render_twice_is_idempotent() {
    let content = builtin::site();
    let mut doc = Document::parse(&render_shell(&content));
    let renderer = Renderer::attach(&doc);

    renderer.render(&mut doc, &content);
    let first_blocks = doc.query_all(&Selector::tag("article").class("module")).len();
    let first_phases = doc.query_all(&Selector::tag("div").class("phase")).len();

    renderer.render(&mut doc, &content);
    assert_eq!(
        doc.query_all(&Selector::tag("article").class("module")).len(),
        first_blocks
    );
    assert_eq!(
        doc.query_all(&Selector::tag("div").class("phase")).len(),
        first_phases
    );

    let ids = all_ids(&doc);
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(ids.len(), unique.len(), "duplicate ids after re-render: {ids:?}");
}

#[test]
fn repeated_phase_titles_get_distinct_ids() {
    let mut content = builtin::site();
    let phase = RoadmapPhase {
        phase: "Phase 1".to_string(),
        badge: "Core".to_string(),
        items: vec!["a".to_string()],
    };
    content.roadmap = vec![phase.clone(), phase];
    let doc = rendered(&content);

    let phases = doc.query_all(&Selector::tag("div").class("phase"));
    let ids: Vec<_> = phases.iter().filter_map(|&p| doc.attribute(p, "id")).collect();
    assert_eq!(ids, vec!["roadmap-phase-1", "roadmap-phase-1-2"]);
}

#[test]
fn serialized_document_reparses_to_same_structure() {
    let doc = rendered(&builtin::site());
    let again = Document::parse(&doc.to_html());
    assert_eq!(all_ids(&doc), all_ids(&again));
    assert_eq!(doc.element_count(), again.element_count());
}

#[test]
fn serialization_is_stable_across_reparses() {
    let first = rendered(&builtin::site()).to_html();
    assert!(first.starts_with("<!DOCTYPE html>\n<html"));
    let second = Document::parse(&first).to_html();
    let third = Document::parse(&second).to_html();
    assert_eq!(first, second);
    assert_eq!(second, third);
}

proptest! {
    #[test]
    fn escaped_text_round_trips(text in "[a-zA-Z0-9 &<>\"';#/]{0,40}") {
        let record = module("m", &text, &[text.as_str()]);
        let doc = Document::parse(&render_module(&record));

        let name = doc.query_all(&Selector::tag("h3").class("module__name"))[0];
        prop_assert_eq!(doc.text_content(name), text.clone());

        // Only the markup the renderer wrote may exist as elements.
        prop_assert_eq!(doc.query_all(&Selector::tag("article")).len(), 1);
        prop_assert!(doc.query_all(&Selector::tag("script")).is_empty());
    }

    #[test]
    fn escaped_phase_items_round_trip(items in prop::collection::vec("[a-z<>&\"' ]{1,12}", 1..5)) {
        let phase = RoadmapPhase {
            phase: "Phase".to_string(),
            badge: "&".to_string(),
            items: items.clone(),
        };
        let doc = Document::parse(&render_phase(&phase, "roadmap-phase"));
        let rendered: Vec<String> = doc
            .query_all(&Selector::tag("li"))
            .into_iter()
            .map(|li| doc.text_content(li))
            .collect();
        prop_assert_eq!(rendered, items);
    }
}
