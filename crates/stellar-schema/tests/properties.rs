use std::path::{Path, PathBuf};

use serde_json::{Value as Raw, json};
use stellar_core::RawFields;
use stellar_schema::{
    Block, BlockType, CollectionName, Document, DocumentId, FieldContext, FieldPath, KnownAssets, PageName, Ref,
    ValidationError, Value, block::validate_blocks, collection::Authors, draft, validate_site,
};

fn document(id: DocumentId, path: &str, fields: Raw) -> Document {
    let fields: RawFields = serde_json::from_value(fields).expect("fields");
    Document {
        id,
        path: PathBuf::from(path),
        fields,
        body: Some("Body".to_string()),
    }
}

fn home_catalog_blocks(raw: Raw) -> stellar_schema::BuilderOutcome {
    let assets = KnownAssets::default();
    let ctx = FieldContext::new(&assets, Path::new("data/otherPages/home"));
    let catalog = PageName::Home.catalog().expect("home has a builder");
    let items = raw.as_array().cloned().expect("array");
    validate_blocks(&items, &catalog, &FieldPath::root().field("builder"), &ctx)
}

fn site_assets() -> KnownAssets {
    KnownAssets::new("public")
        .with("data/blog/hello/hero.jpg")
        .with("data/authors/jane/avatar.jpg")
}

fn blog_post(slug: &str, extra: Raw) -> Document {
    let mut fields = json!({
        "title": "Hello",
        "description": "A first post",
        "authors": ["jane"],
        "pubDate": "2024-01-14",
        "heroImage": "./hero.jpg",
        "categories": ["news"],
    });
    if let (Some(fields), Some(extra)) = (fields.as_object_mut(), extra.as_object()) {
        fields.extend(extra.clone());
    }
    document(
        DocumentId::entry(CollectionName::Blog, slug),
        &format!("data/blog/{slug}/index.mdx"),
        fields,
    )
}

fn author(slug: &str) -> Document {
    document(
        DocumentId::entry(CollectionName::Authors, slug),
        &format!("data/authors/{slug}/index.mdx"),
        json!({
            "name": "Jane Doe",
            "avatar": "./avatar.jpg",
            "about": "Writes things",
            "email": "jane@example.com",
            "authorLink": "https://example.com/jane",
        }),
    )
}

#[test]
fn test_home_page_with_unknown_block() {
    let outcome = home_catalog_blocks(json!([
        { "discriminant": "hero", "value": { "heading": "Welcome" } },
        { "discriminant": "bogus", "value": {} },
    ]));

    assert_eq!(outcome.blocks.len(), 1);
    assert_eq!(outcome.blocks[0].block_type, BlockType::Hero);
    assert_eq!(outcome.blocks[0].position, 0);
    assert_eq!(
        outcome.errors,
        vec![ValidationError::UnknownBlockType {
            index: 1,
            discriminant: "bogus".to_string(),
        }]
    );
}

#[test]
fn test_block_order_is_preserved() {
    let raw = json!([
        { "discriminant": "faqAccordions", "value": { "title": "FAQ" } },
        { "discriminant": "ctaCardCenter", "value": { "heading": "Hi" } },
        { "discriminant": "hero", "value": {} },
        { "discriminant": "ctaCardCenter", "value": { "heading": "Again" } },
    ]);

    let outcome = home_catalog_blocks(raw.clone());
    let expected: Vec<&str> = raw
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|b| b["discriminant"].as_str())
        .collect();
    let actual: Vec<&str> = outcome.blocks.iter().map(|b| b.discriminant()).collect();
    assert_eq!(actual, expected);

    let positions: Vec<usize> = outcome.blocks.iter().map(|b| b.position).collect();
    assert_eq!(positions, [0, 1, 2, 3]);
}

#[test]
fn test_cta_value_round_trips() {
    let value = json!({ "heading": "Hi", "description": "d", "ctaText": "Go", "ctaHref": "/go" });
    let outcome = home_catalog_blocks(json!([{ "discriminant": "ctaCardCenter", "value": value }]));

    let blocks = outcome.into_result().expect("valid");
    assert_eq!(serde_json::to_value(&blocks[0].value).expect("serialize"), value);

    let Block::CtaCardCenter(cta) = blocks[0].decode().expect("decode") else {
        panic!("expected a CTA block");
    };
    assert_eq!(cta.cta_href.as_deref(), Some("/go"));
}

#[test]
fn test_min_length_boundary() {
    let empty = home_catalog_blocks(json!([
        { "discriminant": "featureCardsSmall", "value": { "items": [] } },
    ]));
    assert!(matches!(
        &empty.errors[..],
        [ValidationError::BlockFieldValidation { discriminant: BlockType::FeatureCardsSmall, index: 0, source }]
            if matches!(**source, ValidationError::MinArrayLengthViolation { min: 1, len: 0, .. })
    ));

    let one = home_catalog_blocks(json!([
        { "discriminant": "featureCardsSmall", "value": { "items": [{ "title": "Fast" }] } },
    ]));
    assert!(one.is_valid());
}

#[test]
fn test_site_resolves_and_filters() {
    let documents = [
        author("jane"),
        blog_post("hello", json!({})),
        blog_post("wip", json!({ "draft": true, "heroImage": "../hello/hero.jpg" })),
    ];

    let report = validate_site(&documents, &site_assets());
    assert!(report.is_ok(), "{:?}", report.diagnostics);

    let post = report.index.resolve(CollectionName::Blog, "hello").expect("post");
    let Some(Value::Array(authors)) = post.get("authors") else {
        panic!("authors missing");
    };
    let reference = authors[0].as_reference().expect("reference");
    let target = report
        .index
        .get(&Ref::<Authors>::from_reference(reference).expect("authors ref"))
        .expect("resolves");
    assert_eq!(target.text("name"), Some("Jane Doe"));

    let published = report.index.published();
    assert!(published.resolve(CollectionName::Blog, "hello").is_ok());
    assert!(published.resolve(CollectionName::Blog, "wip").is_err());
    // Authors have no draft field and are always published.
    assert!(published.resolve(CollectionName::Authors, "jane").is_ok());
    assert_eq!(draft::published(report.index.iter()).count(), published.len());
}

#[test]
fn test_deleted_author_leaves_dangling_reference() {
    let documents = [blog_post("hello", json!({}))];

    let report = validate_site(&documents, &site_assets());
    assert!(!report.is_ok());

    let hello = DocumentId::entry(CollectionName::Blog, "hello");
    let errors = report.diagnostics.for_document(&hello).expect("hello errors");
    assert_eq!(errors.id, hello);
    assert!(matches!(
        &errors.errors[..],
        [ValidationError::DanglingReference { collection: CollectionName::Authors, slug, path, .. }]
            if slug == "jane" && path.to_string() == "authors[0]"
    ));
}

#[test]
fn test_invalid_post_reports_every_field() {
    let documents = [
        author("jane"),
        blog_post(
            "bad",
            json!({
                "description": "",
                "authors": [],
                "pubDate": "2024-02-30",
                "heroImage": "./missing.jpg",
            }),
        ),
    ];

    let report = validate_site(&documents, &site_assets());
    let bad = DocumentId::entry(CollectionName::Blog, "bad");
    let errors = &report.diagnostics.for_document(&bad).expect("bad errors").errors;
    assert_eq!(errors.len(), 4, "{errors:?}");
    assert!(matches!(errors[0], ValidationError::RequiredFieldMissing { .. }));
    assert!(matches!(errors[1], ValidationError::MinArrayLengthViolation { .. }));
    assert!(matches!(errors[2], ValidationError::InvalidDate { .. }));
    assert!(matches!(errors[3], ValidationError::MissingAsset { .. }));
}
