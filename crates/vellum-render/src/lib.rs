//! Pure HTML rendering for the Vellum CMS engine.
//!
//! Transforms (page or menu, settings) into navigation fragments or complete
//! HTML documents. No side effects and no storage access; callers load the
//! records and hand them in.
//!
//! # Trust boundary
//!
//! Section and post `content` is emitted raw, matching the admin-only
//! authoring model. Only engine-emitted fields (labels, titles, settings
//! values) pass through [`escape_html`].

mod document;
mod escape;
mod navigation;

pub use document::{
    EMPTY_PAGE_PLACEHOLDER, render_page_content, render_page_document, render_post_document,
};
pub use escape::escape_html;
pub use navigation::{MenuRenderOptions, render_footer, render_menu_tree, render_navigation};
