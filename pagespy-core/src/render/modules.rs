//! Module grid markup.

use super::escape::escape_html;
use crate::content::ModuleRecord;

/// Identifier of the module grid mount point.
pub const MODULE_GRID_ID: &str = "moduleGrid";

/// Render one module card.
///
/// The card's DOM id is [`ModuleRecord::dom_id`]. Tables are listed as
/// `<code>` elements joined by `, `; tags become pills.
#[must_use]
pub fn render_module(module: &ModuleRecord) -> String {
    let tags: String = module
        .tags
        .iter()
        .map(|t| format!("<span class=\"pill\">{}</span>", escape_html(t)))
        .collect();
    let tables = module
        .tables
        .iter()
        .map(|t| format!("<code>{}</code>", escape_html(t)))
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = Vec::with_capacity(10);
    lines.push(format!(
        "<article class=\"module\" id=\"{}\">",
        escape_html(&module.dom_id())
    ));
    lines.push("  <div class=\"module__top\">".to_string());
    lines.push(format!(
        "    <h3 class=\"module__name\">{}</h3>",
        escape_html(&module.name)
    ));
    lines.push(format!(
        "    <span class=\"pill pill--info\">{}</span>",
        escape_html(&module.id)
    ));
    lines.push("  </div>".to_string());
    lines.push(format!(
        "  <p class=\"module__desc\">{}</p>",
        escape_html(&module.summary)
    ));
    lines.push(format!("  <div class=\"muted\">Tables: {tables}</div>"));
    lines.push(format!(
        "  <div class=\"module__tags\" aria-label=\"tags\">{tags}</div>"
    ));
    lines.push("</article>".to_string());
    lines.join("\n")
}

/// Render every module card, in order.
#[must_use]
pub fn render_module_grid(modules: &[ModuleRecord]) -> String {
    modules
        .iter()
        .map(render_module)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ModuleRecord {
        ModuleRecord {
            id: id.to_string(),
            name: "Sketch & Drawings".to_string(),
            summary: "walls/openings \u{2192} geometry".to_string(),
            tags: vec!["canvas".to_string(), "Konva/Fabric".to_string()],
            tables: vec!["drawings".to_string(), "drawing_elements".to_string()],
        }
    }

    #[test]
    fn test_card_id_and_escaped_name() {
        let html = render_module(&record("drawings"));
        assert!(html.starts_with("<article class=\"module\" id=\"module-drawings\">"));
        assert!(html.contains("<h3 class=\"module__name\">Sketch &amp; Drawings</h3>"));
        assert!(html.contains("<span class=\"pill pill--info\">drawings</span>"));
    }

    #[test]
    fn test_tables_joined_with_comma() {
        let html = render_module(&record("drawings"));
        assert!(html.contains("Tables: <code>drawings</code>, <code>drawing_elements</code>"));
    }

    #[test]
    fn test_tags_rendered_literally() {
        let html = render_module(&record("drawings"));
        assert!(html.contains("<span class=\"pill\">Konva/Fabric</span>"));
    }

    #[test]
    fn test_empty_tags_and_tables() {
        let mut module = record("bare");
        module.tags.clear();
        module.tables.clear();
        let html = render_module(&module);
        assert!(html.contains("<div class=\"muted\">Tables: </div>"));
        assert!(html.contains("aria-label=\"tags\"></div>"));
    }

    #[test]
    fn test_grid_preserves_order() {
        let html = render_module_grid(&[record("b"), record("a")]);
        let b = html.find("module-b").unwrap();
        let a = html.find("module-a").unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_empty_grid() {
        assert_eq!(render_module_grid(&[]), "");
    }
}
