//! Page shell markup.
//!
//! The shell carries everything the page components look up by id: menu
//! button, sidebar, backdrop, main region, one section per navigation entry,
//! the two content mount points and the footer year slot. Mount points are
//! left empty; [`super::Renderer`] fills them.

use super::escape::escape_html;
use super::modules::MODULE_GRID_ID;
use super::roadmap::TIMELINE_ID;
use crate::content::{NavEntry, SiteContent};

/// Menu toggle button.
pub const MENU_BUTTON_ID: &str = "menuBtn";
/// Navigation panel.
pub const SIDEBAR_ID: &str = "sidebar";
/// Click-to-close overlay behind the open sidebar.
pub const BACKDROP_ID: &str = "backdrop";
/// Main content region.
pub const MAIN_ID: &str = "main";
/// Footer year slot.
pub const YEAR_ID: &str = "year";

/// Element ids the shell itself uses outside the content sections.
pub const SHELL_IDS: [&str; 7] = [
    MENU_BUTTON_ID,
    SIDEBAR_ID,
    BACKDROP_ID,
    MAIN_ID,
    YEAR_ID,
    MODULE_GRID_ID,
    TIMELINE_ID,
];

/// Section that hosts the module grid.
const MODULES_SECTION: &str = "modules";
/// Section that hosts the roadmap timeline.
const ROADMAP_SECTION: &str = "roadmap";

/// Render the full page shell.
#[must_use]
pub fn render_shell(content: &SiteContent) -> String {
    let title = escape_html(&content.site.title);
    let mut lines: Vec<String> = Vec::new();

    lines.push("<!DOCTYPE html>".to_string());
    lines.push("<html lang=\"en\">".to_string());
    lines.push("<head>".to_string());
    lines.push("<meta charset=\"utf-8\">".to_string());
    lines.push(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">".to_string(),
    );
    lines.push(format!("<title>{title}</title>"));
    lines.push("<link rel=\"stylesheet\" href=\"styles.css\">".to_string());
    lines.push("</head>".to_string());
    lines.push("<body>".to_string());

    // Top bar
    lines.push("<header class=\"topbar\">".to_string());
    lines.push(format!(
        "<button class=\"menu-btn\" id=\"{MENU_BUTTON_ID}\" type=\"button\" aria-controls=\"{SIDEBAR_ID}\" aria-expanded=\"false\">Menu</button>"
    ));
    lines.push(format!("<span class=\"topbar__title\">{title}</span>"));
    lines.push("</header>".to_string());

    // Sidebar navigation
    lines.push(format!("<aside class=\"sidebar\" id=\"{SIDEBAR_ID}\">"));
    lines.push("<nav class=\"nav\" aria-label=\"Sections\">".to_string());
    for entry in &content.nav {
        lines.push(nav_link(&entry.id, &entry.label, "nav__link"));
        if entry.id == MODULES_SECTION && !content.modules.is_empty() {
            lines.push("<div class=\"nav__sub\">".to_string());
            for module in &content.modules {
                lines.push(nav_link(
                    &module.dom_id(),
                    &module.name,
                    "nav__link nav__link--sub",
                ));
            }
            lines.push("</div>".to_string());
        }
    }
    lines.push("</nav>".to_string());
    lines.push("</aside>".to_string());
    lines.push(format!(
        "<div class=\"backdrop\" id=\"{BACKDROP_ID}\" aria-hidden=\"true\"></div>"
    ));

    // Main content
    lines.push(format!(
        "<main class=\"main\" id=\"{MAIN_ID}\" tabindex=\"-1\">"
    ));
    for entry in &content.nav {
        render_section(&mut lines, entry, content);
    }
    if !content.nav.iter().any(|n| n.id == MODULES_SECTION) {
        render_section(
            &mut lines,
            &NavEntry::new(MODULES_SECTION, "Modules"),
            content,
        );
    }
    if !content.nav.iter().any(|n| n.id == ROADMAP_SECTION) {
        render_section(
            &mut lines,
            &NavEntry::new(ROADMAP_SECTION, "Roadmap"),
            content,
        );
    }
    lines.push("</main>".to_string());

    lines.push(format!(
        "<footer class=\"footer\">\u{a9} <span id=\"{YEAR_ID}\"></span> {title}</footer>"
    ));
    lines.push("</body>".to_string());
    lines.push("</html>".to_string());

    lines.join("\n")
}

fn nav_link(section_id: &str, label: &str, class: &str) -> String {
    format!(
        "<a class=\"{class}\" data-nav href=\"#{}\">{}</a>",
        escape_html(section_id),
        escape_html(label)
    )
}

fn render_section(lines: &mut Vec<String>, entry: &NavEntry, content: &SiteContent) {
    lines.push(format!(
        "<section class=\"section\" id=\"{}\">",
        escape_html(&entry.id)
    ));
    lines.push(format!("<h2>{}</h2>", escape_html(&entry.label)));
    match entry.id.as_str() {
        MODULES_SECTION => {
            lines.push(format!("<div class=\"grid\" id=\"{MODULE_GRID_ID}\"></div>"));
        }
        ROADMAP_SECTION => {
            lines.push(format!(
                "<div class=\"timeline\" id=\"{TIMELINE_ID}\"></div>"
            ));
        }
        _ if entry.id == content.site.default_section && !content.site.tagline.is_empty() => {
            lines.push(format!(
                "<p class=\"lead\">{}</p>",
                escape_html(&content.site.tagline)
            ));
        }
        _ => {}
    }
    lines.push("</section>".to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::builtin;
    use crate::dom::{Document, Dom, Selector};

    #[test]
    fn test_shell_has_all_fixed_ids() {
        let doc = Document::parse(&render_shell(&builtin::site()));
        for id in SHELL_IDS.into_iter().chain(["overview", "modules", "roadmap"]) {
            assert!(doc.element_by_id(id).is_some(), "missing #{id}");
        }
    }

    #[test]
    fn test_shell_nav_links_include_module_sub_links() {
        let content = builtin::site();
        let doc = Document::parse(&render_shell(&content));
        let links = doc.query_all(&Selector::tag("a").class("nav__link").attribute("data-nav"));
        assert_eq!(links.len(), content.nav.len() + content.modules.len());
        assert_eq!(
            doc.attribute(links[2], "href").as_deref(),
            Some("#module-projects")
        );
    }

    #[test]
    fn test_shell_adds_mount_sections_missing_from_nav() {
        let mut content = builtin::site();
        content.nav = vec![NavEntry::new("overview", "Overview")];
        let doc = Document::parse(&render_shell(&content));
        assert!(doc.element_by_id(MODULE_GRID_ID).is_some());
        assert!(doc.element_by_id(TIMELINE_ID).is_some());
        let links = doc.query_all(&Selector::tag("a").attribute("data-nav"));
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_shell_escapes_title() {
        let mut content = builtin::site();
        content.site.title = "R&D <beta>".to_string();
        let html = render_shell(&content);
        assert!(html.contains("<title>R&amp;D &lt;beta&gt;</title>"));
        let doc = Document::parse(&html);
        assert!(doc.query_all(&Selector::tag("beta")).is_empty());
    }

    #[test]
    fn test_mount_points_start_empty() {
        let doc = Document::parse(&render_shell(&builtin::site()));
        let grid = doc.element_by_id(MODULE_GRID_ID).unwrap();
        assert!(doc.children(grid).is_empty());
    }
}
