//! The page-builder block catalog and the block-union validator.
//!
//! A builder is an ordered list of `{ discriminant, value }` pairs. The
//! discriminant selects one [`BlockType`] from the page's [`BlockCatalog`];
//! the value is validated against that type's field schema. Every block is
//! judged on its own, so one broken block never hides the others.

use std::{fmt, str::FromStr, sync::OnceLock};

use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap, ser::SerializeStruct};
use serde_json::Value as Raw;
use stellar_core::frontmatter::json_kind;

use crate::{
    collection::{CollectionName, Ref, Services, Testimonials},
    error::ValidationError,
    field::{Field, FieldContext},
    path::FieldPath,
    value::Value,
};

/// Where the authoring UI stores images uploaded inside blocks.
const OVERRIDE_IMAGES: &str = "src/data/otherPages/";

/// Every block type a page builder can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    Hero,
    Testimonials,
    ServicesSideImage,
    FeatureCardsSmall,
    TestimonialsSwiper,
    FeatureLightboxMarquee,
    CtaCardCenter,
    FaqAccordions,
    Team,
}

impl BlockType {
    /// All block types, in declaration order.
    pub const ALL: [BlockType; 9] = [
        Self::Hero,
        Self::Testimonials,
        Self::ServicesSideImage,
        Self::FeatureCardsSmall,
        Self::TestimonialsSwiper,
        Self::FeatureLightboxMarquee,
        Self::CtaCardCenter,
        Self::FaqAccordions,
        Self::Team,
    ];

    /// The discriminant string stored in documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Testimonials => "testimonials",
            Self::ServicesSideImage => "servicesSideImage",
            Self::FeatureCardsSmall => "featureCardsSmall",
            Self::TestimonialsSwiper => "testimonialsSwiper",
            Self::FeatureLightboxMarquee => "featureLightboxMarquee",
            Self::CtaCardCenter => "ctaCardCenter",
            Self::FaqAccordions => "faqAccordions",
            Self::Team => "team",
        }
    }

    /// Label shown in the block picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::Hero => "Hero",
            Self::Testimonials => "Testimonials",
            Self::ServicesSideImage => "Services (Side Image)",
            Self::FeatureCardsSmall => "Feature Cards (Small)",
            Self::TestimonialsSwiper => "Testimonials Swiper",
            Self::FeatureLightboxMarquee => "Feature Lightbox Marquee",
            Self::CtaCardCenter => "CTA Card (Center)",
            Self::FaqAccordions => "FAQ (Accordions)",
            Self::Team => "Team",
        }
    }

    /// Field schema of the block's value.
    pub fn schema(self) -> &'static Field {
        static SCHEMAS: OnceLock<[Field; 9]> = OnceLock::new();
        &SCHEMAS.get_or_init(|| Self::ALL.map(Self::build_schema))[self as usize]
    }

    fn build_schema(self) -> Field {
        let label = self.label();
        match self {
            Self::Hero => Field::object(
                label,
                [
                    ("heading", Field::text("Heading")),
                    ("subheading", Field::text("Subheading").multiline()),
                    ("ctaPrimaryText", Field::text("Primary CTA Text")),
                    ("ctaPrimaryHref", Field::url("Primary CTA Link")),
                    ("ctaSecondaryText", Field::text("Secondary CTA Text")),
                    ("ctaSecondaryHref", Field::url("Secondary CTA Link")),
                ],
            ),
            Self::Testimonials => Field::object(
                label,
                [
                    ("title", Field::text("Section Title")),
                    (
                        "items",
                        Field::array(
                            "Items",
                            Field::object(
                                "Testimonial",
                                [
                                    (
                                        "testimonial",
                                        Field::relationship("Testimonial", CollectionName::Testimonials),
                                    ),
                                    ("nameOverride", Field::text("Name Override")),
                                    ("titleOverride", Field::text("Title/Role Override")),
                                    ("quoteOverride", Field::text("Quote Override").multiline()),
                                    (
                                        "imageOverride",
                                        Field::image("Avatar Override")
                                            .directory(OVERRIDE_IMAGES)
                                            .public_path("../"),
                                    ),
                                ],
                            ),
                        ),
                    ),
                ],
            ),
            Self::ServicesSideImage => Field::object(
                label,
                [
                    ("title", Field::text("Section Title")),
                    (
                        "services",
                        Field::array(
                            "Cards",
                            Field::object(
                                "Card",
                                [
                                    ("service", Field::relationship("Service", CollectionName::Services)),
                                    ("titleOverride", Field::text("Title Override")),
                                    (
                                        "descriptionOverride",
                                        Field::text("Description Override").multiline(),
                                    ),
                                    (
                                        "imageOverride",
                                        Field::image("Image Override")
                                            .directory(OVERRIDE_IMAGES)
                                            .public_path("../"),
                                    ),
                                    ("hrefOverride", Field::url("Link Override")),
                                ],
                            ),
                        )
                        .min_items(1),
                    ),
                ],
            ),
            Self::FeatureCardsSmall => Field::object(
                label,
                [
                    ("title", Field::text("Section Title")),
                    (
                        "items",
                        Field::array(
                            "Features",
                            Field::object(
                                "Feature",
                                [
                                    ("icon", Field::text("Icon (e.g. tabler/paint)")),
                                    ("title", Field::text("Title")),
                                    ("text", Field::text("Text").multiline()),
                                ],
                            ),
                        )
                        .min_items(1),
                    ),
                ],
            ),
            Self::TestimonialsSwiper | Self::FeatureLightboxMarquee => Field::empty(label),
            Self::CtaCardCenter => Field::object(
                label,
                [
                    ("heading", Field::text("Heading")),
                    ("description", Field::text("Description").multiline()),
                    ("ctaText", Field::text("CTA Text")),
                    ("ctaHref", Field::url("CTA Link")),
                ],
            ),
            Self::FaqAccordions | Self::Team => Field::object(label, [("title", Field::text("Section Title"))]),
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown block type '{s}'"))
    }
}

/// The block types one page accepts, in picker order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockCatalog(Vec<BlockType>);

impl BlockCatalog {
    /// Build a catalog; duplicates keep their first position.
    pub fn new(types: impl IntoIterator<Item = BlockType>) -> Self {
        let mut catalog = Vec::new();
        for block_type in types {
            if !catalog.contains(&block_type) {
                catalog.push(block_type);
            }
        }
        Self(catalog)
    }

    /// Whether `block_type` is registered.
    pub fn contains(&self, block_type: BlockType) -> bool {
        self.0.contains(&block_type)
    }

    /// Look up a raw discriminant. Block types outside this catalog are unknown here.
    pub fn lookup(&self, discriminant: &str) -> Option<BlockType> {
        discriminant.parse().ok().filter(|t| self.contains(*t))
    }

    /// Registered types, in order.
    pub fn iter(&self) -> impl Iterator<Item = BlockType> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for BlockCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for block_type in &self.0 {
            map.serialize_entry(block_type.as_str(), block_type.schema())?;
        }
        map.end()
    }
}

/// A block that passed validation, ready for dispatch to its renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBlock {
    /// Which catalog entry this is.
    pub block_type: BlockType,
    /// Validated value.
    pub value: Value,
    /// Index in the source sequence.
    pub position: usize,
}

impl ValidatedBlock {
    /// The discriminant string.
    pub fn discriminant(&self) -> &'static str {
        self.block_type.as_str()
    }

    /// Convert into the typed block view.
    pub fn decode(&self) -> serde_json::Result<Block> {
        serde_json::to_value(self).and_then(serde_json::from_value)
    }
}

impl Serialize for ValidatedBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidatedBlock", 2)?;
        state.serialize_field("discriminant", self.block_type.as_str())?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}

/// Result of validating a builder sequence.
///
/// Valid blocks are kept even when others fail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuilderOutcome {
    /// Valid blocks, in source order.
    pub blocks: Vec<ValidatedBlock>,
    /// Every failure, in source order.
    pub errors: Vec<ValidationError>,
}

impl BuilderOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// All blocks, or every error if any block failed.
    pub fn into_result(self) -> Result<Vec<ValidatedBlock>, Vec<ValidationError>> {
        if self.errors.is_empty() {
            Ok(self.blocks)
        } else {
            Err(self.errors)
        }
    }
}

/// Validate a builder sequence against `catalog`.
///
/// `path` locates the sequence itself and is used for entries that are not
/// block objects at all. Field errors inside a block are reported relative
/// to the block's value and tagged with the block's position and type.
pub fn validate_blocks(raw: &[Raw], catalog: &BlockCatalog, path: &FieldPath, ctx: &FieldContext<'_>) -> BuilderOutcome {
    let mut outcome = BuilderOutcome::default();

    for (index, entry) in raw.iter().enumerate() {
        let entry_path = path.index(index);

        let Some(map) = entry.as_object() else {
            outcome.errors.push(ValidationError::TypeMismatch {
                path: entry_path,
                expected: "block object",
                found: json_kind(entry),
            });
            continue;
        };

        let discriminant = match map.get("discriminant") {
            Some(Raw::String(s)) => s,
            None | Some(Raw::Null) => {
                outcome.errors.push(ValidationError::RequiredFieldMissing {
                    path: entry_path.field("discriminant"),
                });
                continue;
            }
            Some(other) => {
                outcome.errors.push(ValidationError::TypeMismatch {
                    path: entry_path.field("discriminant"),
                    expected: "string",
                    found: json_kind(other),
                });
                continue;
            }
        };

        let Some(block_type) = catalog.lookup(discriminant) else {
            outcome.errors.push(ValidationError::UnknownBlockType {
                index,
                discriminant: discriminant.clone(),
            });
            continue;
        };

        let mut errors = Vec::new();
        let value = block_type
            .schema()
            .validate(map.get("value"), &FieldPath::root(), ctx, &mut errors);

        match value {
            Some(value) if errors.is_empty() => outcome.blocks.push(ValidatedBlock {
                block_type,
                value,
                position: index,
            }),
            _ => outcome
                .errors
                .extend(errors.into_iter().map(|source| ValidationError::BlockFieldValidation {
                    discriminant: block_type,
                    index,
                    source: Box::new(source),
                })),
        }
    }

    outcome
}

/// Typed view of a validated block, one variant per catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "discriminant", content = "value", rename_all = "camelCase")]
pub enum Block {
    Hero(HeroBlock),
    Testimonials(TestimonialsBlock),
    ServicesSideImage(ServicesSideImageBlock),
    FeatureCardsSmall(FeatureCardsSmallBlock),
    TestimonialsSwiper(EmptyBlock),
    FeatureLightboxMarquee(EmptyBlock),
    CtaCardCenter(CtaCardCenterBlock),
    FaqAccordions(SectionBlock),
    Team(SectionBlock),
}

impl Block {
    pub fn block_type(&self) -> BlockType {
        match self {
            Self::Hero(_) => BlockType::Hero,
            Self::Testimonials(_) => BlockType::Testimonials,
            Self::ServicesSideImage(_) => BlockType::ServicesSideImage,
            Self::FeatureCardsSmall(_) => BlockType::FeatureCardsSmall,
            Self::TestimonialsSwiper(_) => BlockType::TestimonialsSwiper,
            Self::FeatureLightboxMarquee(_) => BlockType::FeatureLightboxMarquee,
            Self::CtaCardCenter(_) => BlockType::CtaCardCenter,
            Self::FaqAccordions(_) => BlockType::FaqAccordions,
            Self::Team(_) => BlockType::Team,
        }
    }
}

/// Payload of blocks with nothing to configure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmptyBlock {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_primary_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_primary_href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_secondary_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_secondary_href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestimonialsBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<TestimonialItem>,
}

/// A testimonial reference with optional per-page overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub testimonial: Option<Ref<Testimonials>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_override: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServicesSideImageBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ServiceCard>,
}

/// A service reference with optional per-page overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Ref<Services>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href_override: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCardsSmallBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<FeatureCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaCardCenterBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta_href: Option<String>,
}

/// Block that only carries a section title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}
