//! Page content and complete document rendering.

use std::fmt::Write;

use vellum_content::{Menu, Page, Post, SiteSettings};

use crate::escape::escape_html;
use crate::navigation::{MenuRenderOptions, render_footer, render_menu_tree};

/// Markup emitted for a page with no sections.
pub const EMPTY_PAGE_PLACEHOLDER: &str =
    "<div class=\"empty-page\"><p>This page has no content yet. Add a section to get started.</p></div>";

/// Render the main content of a page.
///
/// Zero sections yields [`EMPTY_PAGE_PLACEHOLDER`]. Otherwise section
/// contents are concatenated in ascending `order` (ties broken by list
/// position), joined with a single newline. Section markup is emitted raw;
/// it is trusted, admin-authored HTML.
pub fn render_page_content(page: &Page) -> String {
    if page.sections.is_empty() {
        return EMPTY_PAGE_PLACEHOLDER.to_owned();
    }

    page.sections_in_order()
        .iter()
        .map(|s| s.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a complete HTML document for a page.
///
/// `options` controls the header menu tree (depth, icons, css class).
pub fn render_page_document(
    page: &Page,
    settings: &SiteSettings,
    menus: &[&Menu],
    options: &MenuRenderOptions,
) -> String {
    let title = page.meta_title.as_deref().unwrap_or(&page.title);
    let description = page.meta_description.as_deref().unwrap_or("");

    document_shell(
        title,
        description,
        &render_page_content(page),
        settings,
        menus,
        options,
    )
}

/// Render a complete HTML document for a post.
pub fn render_post_document(
    post: &Post,
    settings: &SiteSettings,
    menus: &[&Menu],
    options: &MenuRenderOptions,
) -> String {
    let mut body = String::from("<article class=\"post\">");
    let _ = write!(body, "<h1>{}</h1>", escape_html(&post.title));

    body.push_str("<div class=\"post-meta\">");
    let date = post.published_at.unwrap_or(post.created_at);
    let _ = write!(
        body,
        "<time datetime=\"{}\">{}</time>",
        date.format("%Y-%m-%d"),
        date.format("%B %e, %Y")
    );
    if let Some(category) = &post.category {
        let _ = write!(body, "<span class=\"post-category\">{}</span>", escape_html(category));
    }
    if let Some(read_time) = &post.read_time {
        let _ = write!(body, "<span class=\"post-read-time\">{}</span>", escape_html(read_time));
    }
    body.push_str("</div>");

    if let Some(image) = &post.featured_image {
        let _ = write!(
            body,
            "<img class=\"post-featured\" src=\"{}\" alt=\"{}\">",
            escape_html(image),
            escape_html(&post.title)
        );
    }

    // Raw, trusted article markup.
    body.push_str(&post.content);
    body.push_str("</article>");

    document_shell(&post.title, "", &body, settings, menus, options)
}

/// Fixed HTML5 shell shared by page and post documents.
///
/// The header nav renders the primary menu as a nested tree truncated at
/// `options.max_depth`, with a single home link when no primary menu exists.
fn document_shell(
    title: &str,
    description: &str,
    main: &str,
    settings: &SiteSettings,
    menus: &[&Menu],
    options: &MenuRenderOptions,
) -> String {
    let primary = menus.iter().copied().find(|m| m.location == "primary");

    let mut out = String::with_capacity(main.len() + 1024);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\" dir=\"ltr\">\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(
        out,
        "<title>{} | {}</title>",
        escape_html(title),
        escape_html(&settings.site_name)
    );
    let _ = writeln!(
        out,
        "<meta name=\"description\" content=\"{}\">",
        escape_html(description)
    );
    out.push_str("<link rel=\"stylesheet\" href=\"/assets/site.css\">\n");
    out.push_str("</head>\n<body>\n");

    out.push_str("<header class=\"site-header\">");
    if !settings.logo_url.is_empty() {
        let _ = write!(
            out,
            "<a class=\"site-logo\" href=\"/\"><img src=\"{}\" alt=\"{}\"></a>",
            escape_html(&settings.logo_url),
            escape_html(&settings.site_name)
        );
    }
    out.push_str("<nav class=\"site-nav\">");
    match primary {
        Some(menu) if !menu.items.is_empty() => out.push_str(&render_menu_tree(menu, options)),
        _ => out.push_str("<a href=\"/\">Home</a>"),
    }
    out.push_str("</nav>");
    out.push_str("</header>\n");

    out.push_str("<main>\n");
    out.push_str(main);
    out.push_str("\n</main>\n");

    out.push_str(&render_footer(settings, menus));
    out.push('\n');

    out.push_str("<script src=\"/assets/site.js\"></script>\n");
    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use vellum_content::{BlockType, LayoutSection, PageStatus};

    use super::*;

    fn page_with_sections(sections: Vec<LayoutSection>) -> Page {
        Page {
            id: "p1".to_owned(),
            title: "About".to_owned(),
            slug: "about".to_owned(),
            status: PageStatus::Draft,
            sections,
            meta_title: None,
            meta_description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            published_at: None,
        }
    }

    fn section(id: &str, content: &str, order: u32) -> LayoutSection {
        LayoutSection {
            id: id.to_owned(),
            block_type: BlockType::Text,
            content: content.to_owned(),
            order,
        }
    }

    #[test]
    fn test_empty_page_renders_placeholder() {
        let page = page_with_sections(vec![]);

        assert_eq!(render_page_content(&page), EMPTY_PAGE_PLACEHOLDER);
    }

    #[test]
    fn test_sections_joined_in_ascending_order() {
        let page = page_with_sections(vec![
            section("b", "<p>second</p>", 2),
            section("a", "<p>first</p>", 1),
        ]);

        assert_eq!(render_page_content(&page), "<p>first</p>\n<p>second</p>");
    }

    #[test]
    fn test_order_ties_broken_by_list_position() {
        let page = page_with_sections(vec![
            section("a", "<p>one</p>", 1),
            section("b", "<p>two</p>", 1),
        ]);

        assert_eq!(render_page_content(&page), "<p>one</p>\n<p>two</p>");
    }

    #[test]
    fn test_section_content_is_not_sanitized() {
        let page = page_with_sections(vec![section(
            "a",
            "<script>alert('authored')</script>",
            1,
        )]);

        assert_eq!(
            render_page_content(&page),
            "<script>alert('authored')</script>"
        );
    }

    #[test]
    fn test_page_document_has_named_shell_sections() {
        let page = page_with_sections(vec![section("a", "<p>hi</p>", 1)]);
        let settings = SiteSettings::default();

        let html = render_page_document(&page, &settings, &[], &MenuRenderOptions::default());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<html lang=\"en\" dir=\"ltr\">"));
        assert!(html.contains("<meta charset=\"utf-8\">"));
        assert!(html.contains("<meta name=\"viewport\""));
        assert!(html.contains("<title>About | My Site</title>"));
        assert!(html.contains("<meta name=\"description\" content=\"\">"));
        assert!(html.contains("<link rel=\"stylesheet\""));
        assert!(html.contains("<header class=\"site-header\">"));
        assert!(html.contains("<main>"));
        assert!(html.contains("<footer class=\"site-footer\">"));
        assert!(html.contains("<script src="));
    }

    fn primary_menu_with_child() -> Menu {
        use vellum_content::{LinkTarget, MenuItem};

        let child = MenuItem {
            id: "widgets".to_owned(),
            label: "Widgets".to_owned(),
            url: "/products/widgets".to_owned(),
            icon: None,
            target: LinkTarget::SameTab,
            order: 1,
            parent_id: Some("products".to_owned()),
            children: Vec::new(),
        };
        let parent = MenuItem {
            id: "products".to_owned(),
            label: "Products".to_owned(),
            url: "/products".to_owned(),
            icon: None,
            target: LinkTarget::SameTab,
            order: 1,
            parent_id: None,
            children: vec![child],
        };
        Menu {
            id: "main".to_owned(),
            name: "Main".to_owned(),
            location: "primary".to_owned(),
            items: vec![parent],
        }
    }

    #[test]
    fn test_page_document_nav_renders_primary_menu_tree() {
        let page = page_with_sections(vec![]);
        let settings = SiteSettings::default();
        let menu = primary_menu_with_child();

        let html =
            render_page_document(&page, &settings, &[&menu], &MenuRenderOptions::default());

        assert!(html.contains("<nav class=\"site-nav\"><ul class=\"menu\">"));
        assert!(html.contains("Products"));
        assert!(html.contains("Widgets"));
    }

    #[test]
    fn test_page_document_nav_truncates_at_max_depth() {
        let page = page_with_sections(vec![]);
        let settings = SiteSettings::default();
        let menu = primary_menu_with_child();
        let options = MenuRenderOptions {
            max_depth: 1,
            ..MenuRenderOptions::default()
        };

        let html = render_page_document(&page, &settings, &[&menu], &options);

        assert!(html.contains("Products"));
        assert!(!html.contains("Widgets"));
    }

    #[test]
    fn test_page_document_title_prefers_meta_title() {
        let mut page = page_with_sections(vec![]);
        page.meta_title = Some("About Acme".to_owned());
        page.meta_description = Some("Who we are".to_owned());
        let settings = SiteSettings::default();

        let html = render_page_document(&page, &settings, &[], &MenuRenderOptions::default());

        assert!(html.contains("<title>About Acme | My Site</title>"));
        assert!(html.contains("content=\"Who we are\""));
    }

    #[test]
    fn test_post_document_article_fields() {
        let post = Post {
            id: "p1".to_owned(),
            title: "Launch day".to_owned(),
            slug: "launch-day".to_owned(),
            content: "<p>We shipped.</p>".to_owned(),
            category: Some("News".to_owned()),
            read_time: Some("3 min read".to_owned()),
            featured_image: Some("/img/launch.png".to_owned()),
            status: PageStatus::Published,
            created_at: Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 5, 2, 9, 0, 0).unwrap(),
            published_at: Some(Utc.with_ymd_and_hms(2025, 5, 3, 9, 0, 0).unwrap()),
        };
        let settings = SiteSettings::default();

        let html = render_post_document(&post, &settings, &[], &MenuRenderOptions::default());

        assert!(html.contains("<h1>Launch day</h1>"));
        assert!(html.contains("datetime=\"2025-05-03\""));
        assert!(html.contains("post-category\">News<"));
        assert!(html.contains("3 min read"));
        assert!(html.contains("src=\"/img/launch.png\""));
        assert!(html.contains("<p>We shipped.</p>"));
    }
}
