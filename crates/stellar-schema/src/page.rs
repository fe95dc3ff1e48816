//! Page singletons: documents with a fixed identity and location.

use std::{fmt, str::FromStr, sync::OnceLock};

use serde::{Deserialize, Serialize};

use crate::{
    block::{BlockCatalog, BlockType},
    collection::{description, draft},
    field::Field,
    schema::{BodyField, EntrySchema, RichTextOptions},
};

const PAGE_IMAGES: &str = "src/data/otherPages/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageName {
    Home,
    About,
    PrivacyPolicy,
    Terms,
}

impl PageName {
    pub const ALL: [PageName; 4] = [Self::Home, Self::About, Self::PrivacyPolicy, Self::Terms];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::PrivacyPolicy => "privacyPolicy",
            Self::Terms => "terms",
        }
    }

    /// Storage directory relative to the data directory.
    pub fn directory(self) -> &'static str {
        match self {
            Self::Home => "otherPages/home",
            Self::About => "otherPages/about",
            Self::PrivacyPolicy => "otherPages/privacy-policy",
            Self::Terms => "otherPages/terms",
        }
    }

    /// Site path the page renders at.
    pub fn route(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::About => "/about",
            Self::PrivacyPolicy => "/privacy-policy",
            Self::Terms => "/terms",
        }
    }

    /// Page for a storage directory.
    pub fn from_directory(dir: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.directory() == dir)
    }

    /// Blocks this page's builder accepts, if it has one.
    pub fn catalog(self) -> Option<BlockCatalog> {
        match self {
            Self::Home => Some(BlockCatalog::new([
                BlockType::Hero,
                BlockType::Testimonials,
                BlockType::ServicesSideImage,
                BlockType::FeatureCardsSmall,
                BlockType::TestimonialsSwiper,
                BlockType::FeatureLightboxMarquee,
                BlockType::CtaCardCenter,
                BlockType::FaqAccordions,
            ])),
            Self::About => Some(BlockCatalog::new([
                BlockType::Hero,
                BlockType::Testimonials,
                BlockType::Team,
                BlockType::ServicesSideImage,
                BlockType::CtaCardCenter,
                BlockType::FeatureCardsSmall,
            ])),
            Self::PrivacyPolicy | Self::Terms => None,
        }
    }

    pub fn schema(self) -> &'static EntrySchema {
        static SCHEMAS: OnceLock<[EntrySchema; 4]> = OnceLock::new();
        &SCHEMAS.get_or_init(|| Self::ALL.map(Self::build_schema))[self as usize]
    }

    fn build_schema(self) -> EntrySchema {
        let label = match self {
            Self::Home => "Home",
            Self::About => "About",
            Self::PrivacyPolicy => "Privacy Policy",
            Self::Terms => "Terms of Use",
        };

        let mut schema = EntrySchema::singleton(label, self.directory())
            .preview_url(self.route())
            .field("title", Field::text("Title").required());

        match self.catalog() {
            Some(catalog) => {
                schema = schema
                    .field("description", description())
                    .field("builder", Field::blocks("Page Builder", catalog))
                    .field(
                        "draft",
                        draft("Set this page as draft to prevent it from being published."),
                    )
                    .body(BodyField::new("content", "Page Contents", RichTextOptions::full(PAGE_IMAGES)));
            }
            None => {
                schema = schema
                    .field("description", Field::text("Description").required())
                    .field("draft", Field::checkbox("Draft"))
                    .body(BodyField::new("content", "Content", RichTextOptions::full(PAGE_IMAGES)));
            }
        }

        schema
    }
}

impl fmt::Display for PageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown page '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;

    #[test]
    fn test_directories() {
        assert_eq!(PageName::from_directory("otherPages/privacy-policy"), Some(PageName::PrivacyPolicy));
        assert_eq!(PageName::from_directory("otherPages/contact"), None);
        for page in PageName::ALL {
            assert_eq!(page.schema().path, page.directory());
            assert_eq!(page.schema().preview_url.as_deref(), Some(page.route()));
        }
    }

    #[test]
    fn test_catalogs_differ_per_page() {
        let home = PageName::Home.catalog().expect("home builder");
        let about = PageName::About.catalog().expect("about builder");

        assert!(home.contains(BlockType::FaqAccordions));
        assert!(!home.contains(BlockType::Team));
        assert!(about.contains(BlockType::Team));
        assert!(!about.contains(BlockType::TestimonialsSwiper));
        assert!(PageName::Terms.catalog().is_none());
    }

    #[test]
    fn test_builder_only_on_builder_pages() {
        assert!(matches!(
            PageName::Home.schema().fields["builder"].kind,
            FieldKind::Blocks { .. }
        ));
        assert!(!PageName::PrivacyPolicy.schema().fields.contains_key("builder"));
    }

    #[test]
    fn test_names() {
        assert_eq!("privacyPolicy".parse::<PageName>(), Ok(PageName::PrivacyPolicy));
        assert_eq!(PageName::Terms.to_string(), "terms");
    }
}
