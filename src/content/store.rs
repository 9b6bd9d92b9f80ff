//! In-memory content store with the same integrity rules the backing
//! database enforces, so admin flows can be exercised and tested without
//! a network.

use tracing::info;

use super::catalog::BlogCatalog;
use super::types::{Author, Category, InvitationCode, Post, PostStatus};
use crate::error::BackendError;

/// Posts, categories, authors, and invitation codes with unique and
/// foreign-key constraints checked on every write.
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    posts: Vec<Post>,
    categories: Vec<Category>,
    authors: Vec<Author>,
    invitations: Vec<InvitationCode>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-side snapshot for the public pages.
    pub fn catalog(&self) -> BlogCatalog {
        BlogCatalog::new(
            self.posts.clone(),
            self.categories.clone(),
            self.authors.clone(),
        )
    }

    pub fn insert_author(&mut self, author: Author) -> Result<(), BackendError> {
        if self.authors.iter().any(|a| a.id == author.id) {
            return Err(BackendError::Duplicate(format!("author {}", author.id)));
        }
        self.authors.push(author);
        Ok(())
    }

    pub fn insert_category(&mut self, category: Category) -> Result<(), BackendError> {
        if self.categories.iter().any(|c| c.slug == category.slug) {
            return Err(BackendError::Duplicate(format!(
                "category slug {}",
                category.slug
            )));
        }
        self.categories.push(category);
        Ok(())
    }

    /// Insert a post, checking the slug stays unique and both the author
    /// and category rows exist.
    pub fn insert_post(&mut self, post: Post) -> Result<(), BackendError> {
        if self.posts.iter().any(|p| p.slug == post.slug) {
            return Err(BackendError::Duplicate(format!("post slug {}", post.slug)));
        }
        self.check_post_references(&post)?;
        info!(slug = %post.slug, status = ?post.status, "post inserted");
        self.posts.push(post);
        Ok(())
    }

    /// Replace an existing post by id, keeping the constraints.
    pub fn update_post(&mut self, post: Post) -> Result<(), BackendError> {
        let Some(index) = self.posts.iter().position(|p| p.id == post.id) else {
            return Err(BackendError::NotFound(format!("post {}", post.id)));
        };
        if self
            .posts
            .iter()
            .any(|p| p.slug == post.slug && p.id != post.id)
        {
            return Err(BackendError::Duplicate(format!("post slug {}", post.slug)));
        }
        self.check_post_references(&post)?;
        self.posts[index] = post;
        Ok(())
    }

    pub fn delete_post(&mut self, id: &str) -> Result<Post, BackendError> {
        let Some(index) = self.posts.iter().position(|p| p.id == id) else {
            return Err(BackendError::NotFound(format!("post {id}")));
        };
        Ok(self.posts.remove(index))
    }

    pub fn publish_post(&mut self, id: &str) -> Result<(), BackendError> {
        let Some(post) = self.posts.iter_mut().find(|p| p.id == id) else {
            return Err(BackendError::NotFound(format!("post {id}")));
        };
        post.status = PostStatus::Published;
        post.published_at = Some(chrono::Utc::now());
        Ok(())
    }

    fn check_post_references(&self, post: &Post) -> Result<(), BackendError> {
        if !self.authors.iter().any(|a| a.id == post.author_id) {
            return Err(BackendError::ForeignKey(format!(
                "author {}",
                post.author_id
            )));
        }
        if !self.categories.iter().any(|c| c.id == post.category_id) {
            return Err(BackendError::ForeignKey(format!(
                "category {}",
                post.category_id
            )));
        }
        Ok(())
    }

    /// Record a new invitation code. The creator must be a known author
    /// when one is given.
    pub fn insert_invitation(&mut self, invite: InvitationCode) -> Result<(), BackendError> {
        if self.invitations.iter().any(|i| i.code == invite.code) {
            return Err(BackendError::Duplicate(format!("code {}", invite.code)));
        }
        if let Some(creator) = &invite.created_by
            && !self.authors.iter().any(|a| &a.id == creator)
        {
            return Err(BackendError::ForeignKey(format!("author {creator}")));
        }
        self.invitations.push(invite);
        Ok(())
    }

    /// Mark a code as used by an author, failing if it is unknown or
    /// already redeemed.
    pub fn redeem_invitation(
        &mut self,
        code: &str,
        author_id: &str,
    ) -> Result<InvitationCode, BackendError> {
        let Some(invite) = self.invitations.iter_mut().find(|i| i.code == code) else {
            return Err(BackendError::NotFound(format!("code {code}")));
        };
        if invite.used_by.is_some() {
            return Err(BackendError::Duplicate(format!("code {code} already used")));
        }
        invite.used_by = Some(author_id.to_string());
        Ok(invite.clone())
    }

    pub fn invitations(&self) -> &[InvitationCode] {
        &self.invitations
    }
}
