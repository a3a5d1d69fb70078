//! Navigation, menu tree, and footer rendering.

use std::fmt::Write;

use chrono::{Datelike, Utc};
use vellum_content::{LinkTarget, Menu, MenuItem, SiteSettings};

use crate::escape::escape_html;

/// Options for [`render_menu_tree`].
#[derive(Clone, Debug)]
pub struct MenuRenderOptions {
    /// CSS class on the outermost `<ul>`.
    pub css_class: String,
    /// Emit icon spans for items that carry an icon name.
    pub show_icons: bool,
    /// Deepest level to render; levels below are truncated. Level 1 is the
    /// top of the menu.
    pub max_depth: u32,
}

impl Default for MenuRenderOptions {
    fn default() -> Self {
        Self {
            css_class: "menu".to_owned(),
            show_icons: false,
            max_depth: 3,
        }
    }
}

/// Render the header navigation fragment.
///
/// An absent or empty menu emits a single fallback home link. Otherwise one
/// anchor per top-level item, in `order`.
pub fn render_navigation(menu: Option<&Menu>) -> String {
    let mut out = String::from("<nav class=\"site-nav\">");
    match menu {
        Some(menu) if !menu.items.is_empty() => {
            for item in sorted(&menu.items) {
                write_anchor(item, &mut out);
            }
        }
        _ => out.push_str("<a href=\"/\">Home</a>"),
    }
    out.push_str("</nav>");
    out
}

/// Render a menu as nested lists, depth-first, items sorted by `order` at
/// each level (stable tie-break: original array position). Descent stops at
/// `max_depth`.
pub fn render_menu_tree(menu: &Menu, options: &MenuRenderOptions) -> String {
    let mut out = String::new();
    write_level(&menu.items, 1, options, &mut out);
    out
}

fn write_level(items: &[MenuItem], depth: u32, options: &MenuRenderOptions, out: &mut String) {
    if depth > options.max_depth || items.is_empty() {
        return;
    }

    if depth == 1 {
        let _ = write!(out, "<ul class=\"{}\">", escape_html(&options.css_class));
    } else {
        out.push_str("<ul>");
    }
    for item in sorted(items) {
        out.push_str("<li>");
        if options.show_icons && let Some(icon) = &item.icon {
            let _ = write!(out, "<span class=\"icon icon-{}\"></span>", escape_html(icon));
        }
        write_anchor(item, out);
        write_level(&item.children, depth + 1, options, out);
        out.push_str("</li>");
    }
    out.push_str("</ul>");
}

/// Render the site footer: one column per menu whose location starts with
/// `footer`, followed by a fixed contact column, then the copyright line.
pub fn render_footer(settings: &SiteSettings, menus: &[&Menu]) -> String {
    let mut columns: Vec<&Menu> = menus
        .iter()
        .copied()
        .filter(|m| m.location.starts_with("footer"))
        .collect();
    columns.sort_by(|a, b| a.location.cmp(&b.location));

    let mut out = String::from("<footer class=\"site-footer\"><div class=\"footer-columns\">");
    for menu in columns {
        let _ = write!(
            out,
            "<div class=\"footer-column\"><h4>{}</h4><ul>",
            escape_html(&menu.name)
        );
        for item in sorted(&menu.items) {
            out.push_str("<li>");
            write_anchor(item, &mut out);
            out.push_str("</li>");
        }
        out.push_str("</ul></div>");
    }

    // Fixed contact column, always last.
    out.push_str("<div class=\"footer-column footer-contact\"><h4>Contact us</h4><ul>");
    if !settings.contact_email.is_empty() {
        let email = escape_html(&settings.contact_email);
        let _ = write!(out, "<li><a href=\"mailto:{email}\">{email}</a></li>");
    }
    if !settings.contact_phone.is_empty() {
        let _ = write!(out, "<li>{}</li>", escape_html(&settings.contact_phone));
    }
    if !settings.contact_address.is_empty() {
        let _ = write!(out, "<li>{}</li>", escape_html(&settings.contact_address));
    }
    for (network, url) in &settings.social_links {
        let _ = write!(
            out,
            "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a></li>",
            escape_html(url),
            escape_html(network)
        );
    }
    out.push_str("</ul></div></div>");

    let _ = write!(
        out,
        "<p class=\"copyright\">&copy; {} {}. All rights reserved.</p>",
        Utc::now().year(),
        escape_html(settings.copyright_name())
    );
    out.push_str("</footer>");
    out
}

/// Stable order-sorted view of a sibling list.
fn sorted(items: &[MenuItem]) -> Vec<&MenuItem> {
    let mut view: Vec<&MenuItem> = items.iter().collect();
    view.sort_by_key(|item| item.order);
    view
}

fn write_anchor(item: &MenuItem, out: &mut String) {
    let target_attr = match item.target {
        LinkTarget::SameTab => "",
        LinkTarget::NewTab => " target=\"_blank\" rel=\"noopener\"",
    };
    let _ = write!(
        out,
        "<a href=\"{}\"{target_attr}>{}</a>",
        escape_html(&item.url),
        escape_html(&item.label)
    );
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use vellum_content::LinkTarget;

    use super::*;

    fn item(id: &str, label: &str, order: u32) -> MenuItem {
        MenuItem {
            id: id.to_owned(),
            label: label.to_owned(),
            url: format!("/{id}"),
            icon: None,
            target: LinkTarget::SameTab,
            order,
            parent_id: None,
            children: Vec::new(),
        }
    }

    fn menu(items: Vec<MenuItem>) -> Menu {
        Menu {
            id: "m".to_owned(),
            name: "Main".to_owned(),
            location: "primary".to_owned(),
            items,
        }
    }

    #[test]
    fn test_navigation_fallback_when_absent() {
        assert_eq!(
            render_navigation(None),
            "<nav class=\"site-nav\"><a href=\"/\">Home</a></nav>"
        );
    }

    #[test]
    fn test_navigation_fallback_when_empty() {
        let m = menu(vec![]);

        assert_eq!(
            render_navigation(Some(&m)),
            "<nav class=\"site-nav\"><a href=\"/\">Home</a></nav>"
        );
    }

    #[test]
    fn test_navigation_emits_top_level_in_order() {
        let m = menu(vec![item("b", "B", 2), item("a", "A", 1)]);

        assert_eq!(
            render_navigation(Some(&m)),
            "<nav class=\"site-nav\"><a href=\"/a\">A</a><a href=\"/b\">B</a></nav>"
        );
    }

    #[test]
    fn test_navigation_new_tab_target() {
        let mut external = item("docs", "Docs", 1);
        external.target = LinkTarget::NewTab;
        let m = menu(vec![external]);

        assert!(
            render_navigation(Some(&m)).contains("target=\"_blank\" rel=\"noopener\"")
        );
    }

    #[test]
    fn test_menu_tree_nested_lists_in_order() {
        let mut parent = item("p", "Parent", 1);
        parent.children = vec![item("c2", "Second", 2), item("c1", "First", 1)];
        let m = menu(vec![parent, item("q", "Sibling", 2)]);

        let html = render_menu_tree(&m, &MenuRenderOptions::default());

        assert_eq!(
            html,
            "<ul class=\"menu\">\
             <li><a href=\"/p\">Parent</a>\
             <ul><li><a href=\"/c1\">First</a></li><li><a href=\"/c2\">Second</a></li></ul>\
             </li>\
             <li><a href=\"/q\">Sibling</a></li>\
             </ul>"
        );
    }

    #[test]
    fn test_menu_tree_respects_max_depth() {
        let mut grandchild = item("gc", "Grandchild", 1);
        grandchild.children = vec![item("ggc", "Too deep", 1)];
        let mut child = item("c", "Child", 1);
        child.children = vec![grandchild];
        let mut parent = item("p", "Parent", 1);
        parent.children = vec![child];
        let m = menu(vec![parent]);

        let options = MenuRenderOptions {
            max_depth: 2,
            ..MenuRenderOptions::default()
        };
        let html = render_menu_tree(&m, &options);

        assert!(html.contains("Child"));
        assert!(!html.contains("Grandchild"));
    }

    #[test]
    fn test_menu_tree_stable_on_order_collisions() {
        let m = menu(vec![item("x", "X", 1), item("y", "Y", 1)]);

        let html = render_menu_tree(&m, &MenuRenderOptions::default());

        let x = html.find("X").unwrap();
        let y = html.find("Y").unwrap();
        assert!(x < y);
    }

    #[test]
    fn test_menu_tree_icons_only_when_enabled() {
        let mut home = item("home", "Home", 1);
        home.icon = Some("house".to_owned());
        let m = menu(vec![home]);

        let plain = render_menu_tree(&m, &MenuRenderOptions::default());
        assert!(!plain.contains("icon-house"));

        let options = MenuRenderOptions {
            show_icons: true,
            ..MenuRenderOptions::default()
        };
        assert!(render_menu_tree(&m, &options).contains("icon-house"));
    }

    #[test]
    fn test_menu_tree_escapes_labels() {
        let m = menu(vec![item("x", "<script>", 1)]);

        let html = render_menu_tree(&m, &MenuRenderOptions::default());

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_footer_groups_footer_menus_into_columns() {
        let legal = Menu {
            id: "legal".to_owned(),
            name: "Legal".to_owned(),
            location: "footer-2".to_owned(),
            items: vec![item("privacy", "Privacy", 1)],
        };
        let main = Menu {
            id: "footer".to_owned(),
            name: "Footer Navigation".to_owned(),
            location: "footer".to_owned(),
            items: vec![item("about", "About", 1)],
        };
        let header = menu(vec![item("home", "Home", 1)]);
        let settings = SiteSettings::default();

        let html = render_footer(&settings, &[&legal, &main, &header]);

        assert!(html.contains("Legal"));
        assert!(html.contains("Footer Navigation"));
        // Header menus never land in the footer.
        assert!(!html.contains(">Home<"));
        // Footer columns sort by location.
        assert!(html.find("Footer Navigation").unwrap() < html.find("Legal").unwrap());
    }

    #[test]
    fn test_reordered_menu_renders_in_new_sequence() {
        use std::sync::Arc;

        use vellum_content::{MenuItemDraft, MenuStore};
        use vellum_store::{KvStore, MemoryStore};

        let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let menus = MenuStore::new(store);
        let created = menus.create_menu("Footer Links", "footer-2").unwrap();
        let privacy = menus
            .add_menu_item(
                &created.id,
                MenuItemDraft {
                    label: "Privacy".to_owned(),
                    url: "/privacy".to_owned(),
                    ..MenuItemDraft::default()
                },
            )
            .unwrap()
            .unwrap();
        let terms = menus
            .add_menu_item(
                &created.id,
                MenuItemDraft {
                    label: "Terms".to_owned(),
                    url: "/terms".to_owned(),
                    ..MenuItemDraft::default()
                },
            )
            .unwrap()
            .unwrap();

        menus
            .reorder_items(&created.id, &[&terms.id, &privacy.id])
            .unwrap();

        let html = render_menu_tree(
            &menus.get_menu(&created.id).unwrap(),
            &MenuRenderOptions::default(),
        );
        assert!(html.find("Terms").unwrap() < html.find("Privacy").unwrap());
    }

    #[test]
    fn test_footer_always_has_contact_column_and_copyright() {
        let mut settings = SiteSettings::default();
        settings.site_name = "Acme Co".to_owned();
        settings.contact_email = "hi@acme.test".to_owned();

        let html = render_footer(&settings, &[]);

        assert!(html.contains("Contact us"));
        assert!(html.contains("mailto:hi@acme.test"));
        assert!(html.contains(&Utc::now().year().to_string()));
        assert!(html.contains("Acme Co. All rights reserved."));
    }
}
