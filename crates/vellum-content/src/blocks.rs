//! Block types and the section template registry.
//!
//! [`BlockType`] is a closed set of template families. [`BlockRegistry`] maps
//! each type to a pure template function producing the initial markup for a
//! new section. The string-tag boundary (admin UI, import files) is validated
//! by [`BlockType::parse`]; an unknown tag is a hard error at the store layer,
//! never a silently empty section.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::settings::SiteSettings;

/// Template family tag for a layout section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Hero,
    Text,
    Features,
    Cta,
    Stats,
    Team,
    Testimonials,
    Pricing,
    Gallery,
    Contact,
    Spacer,
    Divider,
}

impl BlockType {
    /// All block types, in display order.
    pub const ALL: [Self; 12] = [
        Self::Hero,
        Self::Text,
        Self::Features,
        Self::Cta,
        Self::Stats,
        Self::Team,
        Self::Testimonials,
        Self::Pricing,
        Self::Gallery,
        Self::Contact,
        Self::Spacer,
        Self::Divider,
    ];

    /// String tag as used in persisted data and the admin UI.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Text => "text",
            Self::Features => "features",
            Self::Cta => "cta",
            Self::Stats => "stats",
            Self::Team => "team",
            Self::Testimonials => "testimonials",
            Self::Pricing => "pricing",
            Self::Gallery => "gallery",
            Self::Contact => "contact",
            Self::Spacer => "spacer",
            Self::Divider => "divider",
        }
    }

    /// Parse a string tag. Returns `None` for unknown tags.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|bt| bt.as_str() == tag)
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pure template function producing the initial markup for a new section.
pub type TemplateFn = fn(&SiteSettings) -> String;

/// Registry mapping each [`BlockType`] to its section template.
///
/// Populated at startup with the built-in templates; the enum is closed, so
/// every type always has a template.
pub struct BlockRegistry {
    templates: BTreeMap<BlockType, TemplateFn>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        let mut templates: BTreeMap<BlockType, TemplateFn> = BTreeMap::new();
        templates.insert(BlockType::Hero, hero_template);
        templates.insert(BlockType::Text, text_template);
        templates.insert(BlockType::Features, features_template);
        templates.insert(BlockType::Cta, cta_template);
        templates.insert(BlockType::Stats, stats_template);
        templates.insert(BlockType::Team, team_template);
        templates.insert(BlockType::Testimonials, testimonials_template);
        templates.insert(BlockType::Pricing, pricing_template);
        templates.insert(BlockType::Gallery, gallery_template);
        templates.insert(BlockType::Contact, contact_template);
        templates.insert(BlockType::Spacer, spacer_template);
        templates.insert(BlockType::Divider, divider_template);
        Self { templates }
    }
}

impl BlockRegistry {
    /// Create the registry with the built-in templates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the initial markup for `block_type`.
    #[must_use]
    pub fn render(&self, block_type: BlockType, settings: &SiteSettings) -> String {
        // The enum is closed and Default populates every variant.
        self.templates
            .get(&block_type)
            .map(|template| template(settings))
            .unwrap_or_default()
    }
}

fn hero_template(settings: &SiteSettings) -> String {
    format!(
        "<section class=\"block block-hero\">\n\
         <h1>Welcome to {}</h1>\n\
         <p>{}</p>\n\
         <a class=\"btn btn-primary\" href=\"/contact\">Get in touch</a>\n\
         </section>",
        settings.site_name, settings.tagline
    )
}

fn text_template(_settings: &SiteSettings) -> String {
    "<section class=\"block block-text\">\n\
     <h2>Section title</h2>\n\
     <p>Write your content here.</p>\n\
     </section>"
        .to_owned()
}

fn features_template(_settings: &SiteSettings) -> String {
    "<section class=\"block block-features\">\n\
     <h2>Features</h2>\n\
     <div class=\"feature-grid\">\n\
     <div class=\"feature\"><h3>Feature one</h3><p>Describe it.</p></div>\n\
     <div class=\"feature\"><h3>Feature two</h3><p>Describe it.</p></div>\n\
     <div class=\"feature\"><h3>Feature three</h3><p>Describe it.</p></div>\n\
     </div>\n\
     </section>"
        .to_owned()
}

fn cta_template(settings: &SiteSettings) -> String {
    format!(
        "<section class=\"block block-cta\">\n\
         <h2>Ready to work with {}?</h2>\n\
         <a class=\"btn btn-primary\" href=\"/contact\">Contact us</a>\n\
         </section>",
        settings.site_name
    )
}

fn stats_template(_settings: &SiteSettings) -> String {
    "<section class=\"block block-stats\">\n\
     <div class=\"stat\"><span class=\"stat-value\">100+</span><span class=\"stat-label\">Clients</span></div>\n\
     <div class=\"stat\"><span class=\"stat-value\">10</span><span class=\"stat-label\">Years</span></div>\n\
     <div class=\"stat\"><span class=\"stat-value\">24/7</span><span class=\"stat-label\">Support</span></div>\n\
     </section>"
        .to_owned()
}

fn team_template(_settings: &SiteSettings) -> String {
    "<section class=\"block block-team\">\n\
     <h2>Our team</h2>\n\
     <div class=\"team-grid\">\n\
     <div class=\"member\"><h3>Name</h3><p>Role</p></div>\n\
     </div>\n\
     </section>"
        .to_owned()
}

fn testimonials_template(_settings: &SiteSettings) -> String {
    "<section class=\"block block-testimonials\">\n\
     <h2>What clients say</h2>\n\
     <blockquote><p>Add a testimonial.</p><cite>Client name</cite></blockquote>\n\
     </section>"
        .to_owned()
}

fn pricing_template(_settings: &SiteSettings) -> String {
    "<section class=\"block block-pricing\">\n\
     <h2>Pricing</h2>\n\
     <div class=\"pricing-grid\">\n\
     <div class=\"plan\"><h3>Starter</h3><p class=\"price\">$0</p></div>\n\
     <div class=\"plan\"><h3>Pro</h3><p class=\"price\">$49</p></div>\n\
     </div>\n\
     </section>"
        .to_owned()
}

fn gallery_template(_settings: &SiteSettings) -> String {
    "<section class=\"block block-gallery\">\n\
     <h2>Gallery</h2>\n\
     <div class=\"gallery-grid\"></div>\n\
     </section>"
        .to_owned()
}

fn contact_template(settings: &SiteSettings) -> String {
    format!(
        "<section class=\"block block-contact\">\n\
         <h2>Contact us</h2>\n\
         <p>Email: {}</p>\n\
         <p>Phone: {}</p>\n\
         </section>",
        settings.contact_email, settings.contact_phone
    )
}

fn spacer_template(_settings: &SiteSettings) -> String {
    "<div class=\"block block-spacer\"></div>".to_owned()
}

fn divider_template(_settings: &SiteSettings) -> String {
    "<hr class=\"block block-divider\">".to_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_known_tags() {
        assert_eq!(BlockType::parse("hero"), Some(BlockType::Hero));
        assert_eq!(BlockType::parse("divider"), Some(BlockType::Divider));
    }

    #[test]
    fn test_parse_unknown_tag_is_none() {
        assert_eq!(BlockType::parse("carousel"), None);
        assert_eq!(BlockType::parse(""), None);
    }

    #[test]
    fn test_tag_round_trip() {
        for bt in BlockType::ALL {
            assert_eq!(BlockType::parse(bt.as_str()), Some(bt));
        }
    }

    #[test]
    fn test_registry_covers_every_type() {
        let registry = BlockRegistry::new();
        let settings = SiteSettings::default();

        for bt in BlockType::ALL {
            assert!(
                !registry.render(bt, &settings).is_empty(),
                "no template for {bt}"
            );
        }
    }

    #[test]
    fn test_hero_template_uses_site_name() {
        let registry = BlockRegistry::new();
        let settings = SiteSettings {
            site_name: "Acme Co".to_owned(),
            ..SiteSettings::default()
        };

        let markup = registry.render(BlockType::Hero, &settings);

        assert!(markup.contains("Acme Co"));
    }

    #[test]
    fn test_serde_tag_shape() {
        let json = serde_json::to_string(&BlockType::Testimonials).unwrap();
        assert_eq!(json, "\"testimonials\"");

        let back: BlockType = serde_json::from_str("\"hero\"").unwrap();
        assert_eq!(back, BlockType::Hero);
    }
}
