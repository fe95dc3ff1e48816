//! Content collections and typed references into them.

use std::{fmt, hash::Hash, marker::PhantomData, str::FromStr, sync::OnceLock};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    field::Field,
    schema::{BodyField, EntrySchema, RichTextOptions},
    value::Reference,
};

/// The content collections of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionName {
    Blog,
    Authors,
    Services,
    Testimonials,
}

impl CollectionName {
    pub const ALL: [CollectionName; 4] = [Self::Blog, Self::Authors, Self::Services, Self::Testimonials];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Authors => "authors",
            Self::Services => "services",
            Self::Testimonials => "testimonials",
        }
    }

    /// Schema of every entry in this collection.
    pub fn schema(self) -> &'static EntrySchema {
        static SCHEMAS: OnceLock<[EntrySchema; 4]> = OnceLock::new();
        &SCHEMAS.get_or_init(|| Self::ALL.map(Self::build_schema))[self as usize]
    }

    fn build_schema(self) -> EntrySchema {
        let dir = self.as_str();
        match self {
            Self::Blog => EntrySchema::collection("Blog", dir, "title")
                .columns(["title", "pubDate"])
                .field(
                    "title",
                    Field::slug("Title", "SEO-friendly slug")
                        .slug_description("Never change the slug once a file is published!")
                        .required(),
                )
                .field("description", description())
                .field("draft", draft("Set this post as draft to prevent it from being published."))
                .field(
                    "authors",
                    Field::array(
                        "Authors",
                        Field::relationship("Post author", CollectionName::Authors),
                    )
                    .min_items(1),
                )
                .field("pubDate", Field::date("Publish Date").required())
                .field(
                    "updatedDate",
                    Field::date("Updated Date")
                        .description("If you update this post at a later date, put that date here."),
                )
                .field(
                    "heroImage",
                    Field::image("Hero Image").public_path("../").required(),
                )
                .field(
                    "categories",
                    Field::array("Categories", Field::text("Category"))
                        .description("This is NOT case sensitive.")
                        .min_items(1),
                )
                .body(BodyField::new("content", "Content", RichTextOptions::full("src/data/blog/"))),

            Self::Authors => EntrySchema::collection("Authors", dir, "name")
                .columns(["name"])
                .field(
                    "name",
                    Field::slug("Name", "SEO-friendly slug")
                        .slug_description("Never change the slug once this file is published!")
                        .required(),
                )
                .field(
                    "avatar",
                    Field::image("Author avatar").public_path("../").required(),
                )
                .field(
                    "about",
                    Field::text("About")
                        .description("A short bio about the author")
                        .required(),
                )
                .field(
                    "email",
                    Field::text("The author's email")
                        .description("This must look something like `you@email.com`")
                        .required(),
                )
                .field(
                    "authorLink",
                    Field::url("Author Website or Social Media Link").required(),
                )
                .body(
                    BodyField::new(
                        "bio",
                        "Full Bio",
                        RichTextOptions {
                            heading: vec![2, 3, 4],
                            table: false,
                            code_block: false,
                            ..RichTextOptions::full("src/data/authors/")
                        },
                    )
                    .description("The author's full bio"),
                ),

            Self::Services => EntrySchema::collection("Services", dir, "title")
                .columns(["title"])
                .field(
                    "title",
                    Field::slug("Title", "SEO-friendly slug")
                        .slug_description("Never change the slug once a file is published!")
                        .required(),
                )
                .field("description", description())
                .field(
                    "image",
                    Field::image("Main Image").public_path("../").required(),
                )
                .field("draft", draft("Set this page as draft to prevent it from being published."))
                .body(BodyField::new(
                    "content",
                    "Page Contents",
                    RichTextOptions {
                        code: false,
                        heading: vec![2, 3, 4],
                        code_block: false,
                        ..RichTextOptions::full("src/data/services/")
                    },
                )),

            // Testimonials are data-only documents.
            Self::Testimonials => EntrySchema::collection("Testimonials", dir, "name")
                .field("name", Field::slug("Name", "Slug").required())
                .field(
                    "title",
                    Field::text("Title / Role").description("e.g. CMO, Acme Co."),
                )
                .field("company", Field::text("Company"))
                .field("quote", Field::text("Quote").multiline().required())
                .field(
                    "image",
                    Field::image("Avatar")
                        .directory("src/data/testimonials/")
                        .public_path("../"),
                )
                .field("link", Field::url("Link").description("Optional"))
                .field("featured", Field::checkbox("Featured"))
                .field("tags", Field::array("Tags", Field::text("Tag"))),
        }
    }
}

/// Summary line shared by every collection that shows up in search results.
pub(crate) fn description() -> Field {
    Field::text("Description").required().length(1, 160)
}

pub(crate) fn draft(help: &str) -> Field {
    Field::checkbox("Draft").description(help)
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown collection '{s}'"))
    }
}

/// Type-level identity of a collection, used to parameterize [`Ref`].
pub trait CollectionKind: 'static {
    const NAME: CollectionName;
}

/// Marker for the blog collection.
#[derive(Debug)]
pub enum Blog {}

/// Marker for the authors collection.
#[derive(Debug)]
pub enum Authors {}

/// Marker for the services collection.
#[derive(Debug)]
pub enum Services {}

/// Marker for the testimonials collection.
#[derive(Debug)]
pub enum Testimonials {}

impl CollectionKind for Blog {
    const NAME: CollectionName = CollectionName::Blog;
}

impl CollectionKind for Authors {
    const NAME: CollectionName = CollectionName::Authors;
}

impl CollectionKind for Services {
    const NAME: CollectionName = CollectionName::Services;
}

impl CollectionKind for Testimonials {
    const NAME: CollectionName = CollectionName::Testimonials;
}

/// A slug reference whose target collection is part of its type.
///
/// Stored as a bare slug string. Resolve it through
/// [`ContentIndex::get`](crate::resolve::ContentIndex::get).
pub struct Ref<C> {
    slug: String,
    _collection: PhantomData<fn() -> C>,
}

impl<C> Ref<C> {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            _collection: PhantomData,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl<C: CollectionKind> Ref<C> {
    /// Target collection.
    pub fn collection(&self) -> CollectionName {
        C::NAME
    }

    /// Narrow an untyped reference, if it points into `C`.
    pub fn from_reference(reference: &Reference) -> Option<Self> {
        (reference.collection == C::NAME).then(|| Self::new(reference.slug.clone()))
    }
}

impl<C> Clone for Ref<C> {
    fn clone(&self) -> Self {
        Self::new(self.slug.clone())
    }
}

impl<C: CollectionKind> fmt::Debug for Ref<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ref<{}>({:?})", C::NAME, self.slug)
    }
}

impl<C> PartialEq for Ref<C> {
    fn eq(&self, other: &Self) -> bool {
        self.slug == other.slug
    }
}

impl<C> Eq for Ref<C> {}

impl<C> Hash for Ref<C> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.slug.hash(state);
    }
}

impl<C> Serialize for Ref<C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.slug)
    }
}

impl<'de, C> Deserialize<'de> for Ref<C> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;

    #[test]
    fn test_names_round_trip() {
        for name in CollectionName::ALL {
            assert_eq!(name.as_str().parse::<CollectionName>(), Ok(name));
            assert_eq!(name.to_string(), name.as_str());
        }
        assert!("otherPages".parse::<CollectionName>().is_err());
    }

    #[test]
    fn test_schema_indexing_matches_name() {
        for name in CollectionName::ALL {
            assert_eq!(name.schema().path, name.as_str());
        }
    }

    #[test]
    fn test_blog_schema() {
        let blog = CollectionName::Blog.schema();
        assert_eq!(blog.slug_field.as_deref(), Some("title"));
        assert_eq!(blog.columns, ["title", "pubDate"]);
        assert!(blog.fields["description"].is_required());
        assert!(blog.fields["pubDate"].is_required());
        assert!(!blog.fields["updatedDate"].is_required());
        assert!(matches!(
            &blog.fields["authors"].kind,
            FieldKind::Array { min_length: Some(1), item } if matches!(
                item.kind,
                FieldKind::Relationship { collection: CollectionName::Authors, .. }
            )
        ));
        assert_eq!(blog.body.as_ref().map(|b| b.name.as_str()), Some("content"));
    }

    #[test]
    fn test_testimonials_have_no_body() {
        let testimonials = CollectionName::Testimonials.schema();
        assert!(testimonials.body.is_none());
        assert!(testimonials.fields["quote"].is_required());
        assert!(!testimonials.fields["image"].is_required());
    }

    #[test]
    fn test_author_bio_options() {
        let body = CollectionName::Authors.schema().body.as_ref().expect("bio");
        assert_eq!(body.name, "bio");
        assert_eq!(body.options.heading, [2, 3, 4]);
        assert!(!body.options.table);
        assert!(body.options.bold);
    }

    #[test]
    fn test_typed_ref() {
        let r: Ref<Authors> = serde_json::from_str("\"jane-doe\"").expect("deserialize");
        assert_eq!(r.slug(), "jane-doe");
        assert_eq!(r.collection(), CollectionName::Authors);
        assert_eq!(format!("{r:?}"), "Ref<authors>(\"jane-doe\")");
        assert_eq!(serde_json::to_string(&r).expect("serialize"), "\"jane-doe\"");

        let untyped = Reference {
            collection: CollectionName::Services,
            slug: "design".into(),
        };
        assert_eq!(Ref::<Services>::from_reference(&untyped), Some(Ref::new("design")));
        assert!(Ref::<Blog>::from_reference(&untyped).is_none());
    }
}
