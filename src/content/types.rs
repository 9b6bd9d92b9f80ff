//! Content records mirroring the backing store's tables.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    Archived,
}

/// Role granted by an invitation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Moderator,
    Editor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    /// HTML body as produced by the editor.
    pub content: String,
    pub featured_image: Option<String>,
    pub author_id: String,
    pub category_id: String,
    pub status: PostStatus,
    pub featured: bool,
    /// Estimated minutes to read, kept in sync with `content`.
    pub read_time: u32,
    pub views: u64,
    pub likes: u64,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub post_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub role: Role,
}

/// One-time code that grants a role on signup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitationCode {
    pub code: String,
    pub role: Role,
    pub created_by: Option<String>,
    pub used_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl InvitationCode {
    /// Generate a fresh unused code: eight uppercase alphanumerics.
    pub fn generate(role: Role, created_by: Option<String>) -> Self {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
        let mut rng = rand::thread_rng();
        let code: String = (0..8)
            .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
            .collect();
        Self {
            code,
            role,
            created_by,
            used_by: None,
            created_at: Utc::now(),
        }
    }
}

/// URL-safe slug for a title: lowercase, accents folded, everything
/// outside `[a-z0-9 -]` dropped, runs of spaces and hyphens collapsed.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_sep = false;
    for ch in title.chars().map(fold_accent) {
        let ch = ch.to_ascii_lowercase();
        match ch {
            'a'..='z' | '0'..='9' => {
                if pending_sep && !out.is_empty() {
                    out.push('-');
                }
                pending_sep = false;
                out.push(ch);
            }
            ' ' | '-' | '\t' => pending_sep = true,
            _ => {}
        }
    }
    out
}

/// Decompose the common Latin accented letters to their base letter.
/// Anything else passes through unchanged.
fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' | 'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ç' | 'Ç' => 'c',
        'ñ' | 'Ñ' => 'n',
        other => other,
    }
}

/// Estimated reading time in minutes at 200 words per minute, never
/// reported as zero.
pub fn estimate_read_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    (words as u32).div_ceil(200).max(1)
}
