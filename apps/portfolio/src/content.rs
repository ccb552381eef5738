use presentation_core::{Catalog, CatalogItem};
use serde_json::json;
use shared::domain::ItemId;

pub fn project_catalog() -> Catalog {
    let projects = [
        (1, "Real-Time Chat App", "Full-Stack", &["React", "Supabase", "Tailwind", "WebSocket"][..]),
        (2, "Task Manager Pro", "Frontend", &["React", "TypeScript", "DnD Kit", "LocalStorage"][..]),
        (3, "Weather Dashboard", "Frontend", &["React", "OpenWeather API", "Recharts", "Geolocation"][..]),
        (4, "E-Commerce Store", "Full-Stack", &["React", "Context API", "Tailwind", "Fake Store API"][..]),
        (5, "Portfolio Website", "Frontend", &["React", "TypeScript", "Tailwind", "Framer Motion"][..]),
        (6, "Note Taking App", "Frontend", &["React", "Markdown", "IndexedDB", "Tags"][..]),
    ];

    Catalog::new(
        projects
            .into_iter()
            .map(|(id, title, category, tech)| CatalogItem {
                id: ItemId(id),
                category: category.to_string(),
                display: json!({ "title": title, "tech": tech }),
            })
            .collect(),
    )
}

pub fn title_of(item: &CatalogItem) -> &str {
    item.display
        .get("title")
        .and_then(|title| title.as_str())
        .unwrap_or("untitled")
}

/// Child element keys mounted under each section, in entrance order.
pub fn section_children(section: &str) -> Vec<String> {
    let keys: &[&str] = match section {
        "hero" => &["greeting", "name", "tagline", "cta", "socials"],
        "about" => &["heading", "story", "highlights"],
        "skills" => &["heading", "frontend", "backend", "tools"],
        "projects" => &["heading", "filters", "grid"],
        "experience" => &["heading", "timeline"],
        "education" => &["heading", "degrees", "learning"],
        "contact" => &["heading", "form", "info"],
        _ => &[],
    };
    keys.iter().map(|key| key.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_the_expected_filters() {
        let catalog = project_catalog();
        assert_eq!(catalog.categories(), ["All", "Full-Stack", "Frontend"]);
        assert_eq!(title_of(&catalog.items()[0]), "Real-Time Chat App");
    }
}
