//! Compiled-in site content.

use super::model::{
    ModuleRecord, RoadmapPhase, SiteContent, SiteMeta, TrackerSettings, default_nav,
};

fn module(id: &str, name: &str, summary: &str, tags: &[&str], tables: &[&str]) -> ModuleRecord {
    ModuleRecord {
        id: id.to_string(),
        name: name.to_string(),
        summary: summary.to_string(),
        tags: tags.iter().map(ToString::to_string).collect(),
        tables: tables.iter().map(ToString::to_string).collect(),
    }
}

fn phase(title: &str, badge: &str, items: &[&str]) -> RoadmapPhase {
    RoadmapPhase {
        phase: title.to_string(),
        badge: badge.to_string(),
        items: items.iter().map(ToString::to_string).collect(),
    }
}

/// Returns the default product modules.
#[must_use]
pub fn modules() -> Vec<ModuleRecord> {
    vec![
        module(
            "projects",
            "Project Core",
            "Project, client, location, status, budget. The system entrypoint for every workflow.",
            &["projects", "status", "budget", "audit"],
            &["projects"],
        ),
        module(
            "engineering",
            "Engineering Engine",
            "Rule-driven structural validation stored in the database. Backend is authoritative.",
            &["rules", "validation", "limits"],
            &["structural_limits"],
        ),
        module(
            "estimation",
            "Material Estimation Engine",
            "Backend calculation services (testable). Never calculate only in the UI.",
            &["calculator", "services", "unit tests"],
            &["estimations", "estimation_items"],
        ),
        module(
            "costing",
            "Cost Engine",
            "Material + Labour + Equipment + Safety + Overhead + Profit + VAT \u{2192} Quotation.",
            &["quotation", "VAT", "margin"],
            &["cost_sheets", "rates"],
        ),
        module(
            "procurement",
            "Procurement System",
            "Workflow: Estimator \u{2192} PM \u{2192} Procurement \u{2192} Approval. Status-driven lifecycle.",
            &["workflow", "approvals", "suppliers"],
            &["purchase_requests", "purchase_orders", "suppliers"],
        ),
        module(
            "inventory",
            "Inventory",
            "Transaction-based inventory model. Every movement is a transaction.",
            &["transactions", "stock levels", "audit"],
            &["materials", "inventory_transactions", "stock_levels"],
        ),
        module(
            "labour",
            "Labour Norm Engine",
            "Productivity norms drive duration planning: Duration = Area / Productivity.",
            &["productivity", "planning"],
            &["labour_norms"],
        ),
        module(
            "safety",
            "Safety & Equipment",
            "Separate PPE & equipment. Depreciation/rental models for daily costing.",
            &["PPE", "equipment", "depreciation"],
            &["ppe_items", "equipment_items", "equipment_rental_rates"],
        ),
        module(
            "tendering",
            "Tender & Documentation",
            "Server-side PDF generation: BOQ, cost breakdown, specs, method statements.",
            &["PDF", "templates", "exports"],
            &["documents", "templates"],
        ),
        module(
            "drawings",
            "Sketch & Drawings",
            "Start 2D canvas: walls/openings \u{2192} geometry \u{2192} later DXF export + overlays.",
            &["canvas", "Konva/Fabric", "DXF"],
            &["drawings", "drawing_elements"],
        ),
    ]
}

/// Returns the default release roadmap.
#[must_use]
pub fn roadmap() -> Vec<RoadmapPhase> {
    vec![
        phase(
            "Phase 1 (Core)",
            "Core",
            &["Project", "Engineering", "Estimation", "Cost", "BOQ export"],
        ),
        phase("Phase 2", "Operations", &["Procurement", "Inventory", "Labour"]),
        phase("Phase 3", "Controls", &["Safety", "Equipment", "Drawing tool"]),
        phase(
            "Phase 4",
            "SaaS",
            &[
                "Multi-user SaaS",
                "Subscription model",
                "Org billing & tenancy",
            ],
        ),
    ]
}

/// Returns the complete compiled-in site content.
#[must_use]
pub fn site() -> SiteContent {
    SiteContent {
        site: SiteMeta {
            title: "Construction Platform: Modules & Roadmap".to_string(),
            tagline: "Backend-authoritative estimation, costing and operations.".to_string(),
            ..SiteMeta::default()
        },
        nav: default_nav(),
        modules: modules(),
        roadmap: roadmap(),
        tracker: TrackerSettings::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::validation::validate;

    #[test]
    fn test_builtin_content_is_valid() {
        let issues = validate(&site());
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn test_builtin_counts() {
        assert_eq!(modules().len(), 10);
        assert_eq!(roadmap().len(), 4);
    }

    #[test]
    fn test_builtin_module_order() {
        let ids: Vec<String> = modules().into_iter().map(|m| m.id).collect();
        assert_eq!(ids.first().map(String::as_str), Some("projects"));
        assert_eq!(ids.last().map(String::as_str), Some("drawings"));
    }
}
