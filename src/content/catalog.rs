//! Read-side catalog over loaded content: the lookups the public blog
//! pages need, computed from in-memory snapshots of posts, categories,
//! and authors.

use super::types::{Author, Category, Post, PostStatus};

/// A post joined with its author and category records.
#[derive(Debug, Clone, PartialEq)]
pub struct PostView {
    pub post: Post,
    pub author: Option<Author>,
    pub category: Option<Category>,
}

/// Snapshot of published content with join-style lookups.
#[derive(Debug, Clone, Default)]
pub struct BlogCatalog {
    posts: Vec<Post>,
    categories: Vec<Category>,
    authors: Vec<Author>,
}

impl BlogCatalog {
    pub fn new(posts: Vec<Post>, categories: Vec<Category>, authors: Vec<Author>) -> Self {
        Self {
            posts,
            categories,
            authors,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    fn enrich(&self, post: &Post) -> PostView {
        PostView {
            post: post.clone(),
            author: self.authors.iter().find(|a| a.id == post.author_id).cloned(),
            category: self
                .categories
                .iter()
                .find(|c| c.id == post.category_id)
                .cloned(),
        }
    }

    /// Published post with this slug, joined with author and category.
    pub fn post_by_slug(&self, slug: &str) -> Option<PostView> {
        self.posts
            .iter()
            .find(|p| p.slug == slug && p.status == PostStatus::Published)
            .map(|p| self.enrich(p))
    }

    /// Published posts whose category carries this slug.
    pub fn posts_by_category(&self, category_slug: &str) -> Vec<PostView> {
        self.posts
            .iter()
            .filter(|p| {
                p.status == PostStatus::Published
                    && self
                        .categories
                        .iter()
                        .any(|c| c.id == p.category_id && c.slug == category_slug)
            })
            .map(|p| self.enrich(p))
            .collect()
    }

    /// The first published post flagged as featured, if any.
    pub fn featured_post(&self) -> Option<PostView> {
        self.posts
            .iter()
            .find(|p| p.featured && p.status == PostStatus::Published)
            .map(|p| self.enrich(p))
    }

    pub fn published_posts(&self) -> Vec<PostView> {
        self.posts
            .iter()
            .filter(|p| p.status == PostStatus::Published)
            .map(|p| self.enrich(p))
            .collect()
    }

    /// Most recently published posts, newest first.
    pub fn recent_posts(&self, limit: usize) -> Vec<PostView> {
        let mut published: Vec<&Post> = self
            .posts
            .iter()
            .filter(|p| p.status == PostStatus::Published)
            .collect();
        published.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        published
            .into_iter()
            .take(limit)
            .map(|p| self.enrich(p))
            .collect()
    }

    /// Up to five categories that have posts or carry the highlight color.
    pub fn featured_categories(&self) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|c| c.post_count > 0 || c.color.as_deref() == Some("bg-primary"))
            .take(5)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::types::Role;
    use chrono::{TimeZone, Utc};

    fn post(id: &str, slug: &str, status: PostStatus, featured: bool, day: u32) -> Post {
        let ts = Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap();
        Post {
            id: id.to_string(),
            title: slug.to_string(),
            slug: slug.to_string(),
            excerpt: String::new(),
            content: String::new(),
            featured_image: None,
            author_id: "a1".to_string(),
            category_id: "c1".to_string(),
            status,
            featured,
            read_time: 1,
            views: 0,
            likes: 0,
            published_at: Some(ts),
            created_at: ts,
            updated_at: ts,
        }
    }

    fn catalog() -> BlogCatalog {
        BlogCatalog::new(
            vec![
                post("p1", "first", PostStatus::Published, false, 1),
                post("p2", "second", PostStatus::Published, true, 3),
                post("p3", "hidden", PostStatus::Draft, true, 2),
            ],
            vec![Category {
                id: "c1".to_string(),
                name: "News".to_string(),
                slug: "news".to_string(),
                description: None,
                color: None,
                icon: None,
                post_count: 2,
            }],
            vec![Author {
                id: "a1".to_string(),
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                avatar_url: None,
                bio: None,
                role: Role::Editor,
            }],
        )
    }

    #[test]
    fn test_post_by_slug_joins_author_and_category() {
        let view = catalog().post_by_slug("first").unwrap();
        assert_eq!(view.author.unwrap().name, "Ana");
        assert_eq!(view.category.unwrap().slug, "news");
    }

    #[test]
    fn test_post_by_slug_ignores_drafts() {
        assert!(catalog().post_by_slug("hidden").is_none());
    }

    #[test]
    fn test_featured_post_skips_unpublished() {
        let view = catalog().featured_post().unwrap();
        assert_eq!(view.post.slug, "second");
    }

    #[test]
    fn test_posts_by_category() {
        let views = catalog().posts_by_category("news");
        assert_eq!(views.len(), 2);
    }

    #[test]
    fn test_recent_posts_newest_first() {
        let views = catalog().recent_posts(5);
        let slugs: Vec<&str> = views.iter().map(|v| v.post.slug.as_str()).collect();
        assert_eq!(slugs, ["second", "first"]);
    }

    #[test]
    fn test_recent_posts_respects_limit() {
        assert_eq!(catalog().recent_posts(1).len(), 1);
    }

    #[test]
    fn test_featured_categories() {
        let catalog = catalog();
        let cats = catalog.featured_categories();
        assert_eq!(cats.len(), 1);
    }
}
