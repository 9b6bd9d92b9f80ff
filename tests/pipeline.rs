//! End-to-end path of a post: markdown pasted into the importer, loaded
//! into the editor, edited, and saved through the store.

use chrono::Utc;
use creatorly_content::content::{
    estimate_read_time, slugify, Author, Category, ContentStore, Post, PostStatus, Role,
};
use creatorly_content::editor::{Command, EditorState};
use creatorly_content::importer;
use creatorly_content::sanitize::sanitize;

const DRAFT: &str = "\
# Launch Week

We are shipping **three** new templates.

* Portfolio
* Newsletter
* Storefront

Read the [announcement](https://creatorly.dev/news) for details.";

#[test]
fn test_import_to_editor_to_store() {
    let imported = importer::import(DRAFT).unwrap();
    assert!(imported.html.starts_with("<h1>Launch Week</h1>"));
    assert_eq!(imported.report.headings, 1);
    assert_eq!(imported.report.list_items, 3);
    assert_eq!(imported.report.links, 1);

    // Importer output passes through the sanitizer unchanged apart from
    // attribute ordering, so it is safe to load into the editor.
    let mut editor = EditorState::with_value(&imported.html);
    editor
        .apply(Command::InsertText(" Soon.".to_string()))
        .unwrap();
    let body = editor.submit().unwrap();
    assert!(body.contains("Soon."));

    let mut store = ContentStore::new();
    store
        .insert_author(Author {
            id: "a1".to_string(),
            name: "Ana".to_string(),
            email: "ana@creatorly.dev".to_string(),
            avatar_url: None,
            bio: None,
            role: Role::Admin,
        })
        .unwrap();
    store
        .insert_category(Category {
            id: "c1".to_string(),
            name: "Product".to_string(),
            slug: "product".to_string(),
            description: None,
            color: None,
            icon: None,
            post_count: 0,
        })
        .unwrap();

    let title = "Launch Week";
    let now = Utc::now();
    store
        .insert_post(Post {
            id: "p1".to_string(),
            title: title.to_string(),
            slug: slugify(title),
            excerpt: "Three new templates".to_string(),
            content: body,
            featured_image: None,
            author_id: "a1".to_string(),
            category_id: "c1".to_string(),
            status: PostStatus::Draft,
            featured: false,
            read_time: estimate_read_time(DRAFT),
            views: 0,
            likes: 0,
            published_at: None,
            created_at: now,
            updated_at: now,
        })
        .unwrap();
    store.publish_post("p1").unwrap();

    let view = store.catalog().post_by_slug("launch-week").unwrap();
    assert_eq!(view.author.unwrap().name, "Ana");
    assert_eq!(view.category.unwrap().slug, "product");
    assert!(view.post.content.contains("Soon."));
}

#[test]
fn test_pasted_html_is_reduced_before_editing() {
    let pasted = "<div><h2>Title</h2><script>steal()</script><p>ok</p></div>";
    let clean = sanitize(pasted);
    assert_eq!(clean, "<h2>Title</h2>steal()<p>ok</p>");

    let mut editor = EditorState::new();
    editor
        .apply(Command::Paste {
            html: Some(pasted.to_string()),
            text: None,
        })
        .unwrap();
    let body = editor.submit().unwrap();
    assert!(!body.contains("<script"));
    assert!(!body.contains("<div"));
    assert!(body.contains("<h2>Title</h2>"));
}

#[test]
fn test_empty_import_never_reaches_the_store() {
    assert!(importer::import("   ").is_err());
}
