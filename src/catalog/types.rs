use serde::{Deserialize, Serialize};

/// Author shown when the catalog does not name one.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

pub const DEFAULT_COVERS_BASE_URL: &str = "https://covers.openlibrary.org";
pub const DEFAULT_PLACEHOLDER_COVER_URL: &str =
    "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcRYAkd1YLySFcNwImCfMiowVzRXPta5jvQN0A&s";

/// Subjects beyond this many are not shown on the detail page.
pub const MAX_SUBJECTS: usize = 10;

const NO_DESCRIPTION: &str = "No description available";
const NO_BIOGRAPHY: &str = "No biography available";

// ============================================================================
// Domain Types
// ============================================================================

/// A book as shown in result grids and the recently-viewed list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BookSummary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub cover_url: Option<String>,
}

/// One page of search results, already filtered for display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchPage {
    pub books: Vec<BookSummary>,
    /// Total hits reported by the catalog, before the cover filter.
    pub num_found: u64,
    pub total_pages: u32,
    /// Results on this page dropped because they have no cover.
    pub hidden_without_cover: usize,
}

impl SearchPage {
    /// Builds a display page from a raw response.
    ///
    /// Results without a cover are discarded, but `total_pages` still counts
    /// them, so a page can hold fewer than `page_size` books.
    pub fn from_response(response: SearchResponse, page_size: u32, covers: &Covers) -> Self {
        let total = response.docs.len();
        let books: Vec<BookSummary> = response
            .docs
            .into_iter()
            .filter_map(|doc| {
                let cover_id = doc.cover_i.filter(|id| *id > 0)?;
                Some(BookSummary {
                    id: key_id(&doc.key).to_string(),
                    author: doc
                        .author_name
                        .into_iter()
                        .next()
                        .filter(|name| !name.is_empty())
                        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
                    title: doc.title,
                    cover_url: Some(covers.url(cover_id, CoverSize::Medium)),
                })
            })
            .collect();

        Self {
            hidden_without_cover: total - books.len(),
            books,
            num_found: response.num_found,
            total_pages: total_pages(response.num_found, page_size),
        }
    }
}

/// Everything the detail page shows for one work.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDetail {
    pub id: String,
    pub work: WorkDetails,
    /// `None` when the work names no author or the author lookup failed.
    pub author: Option<AuthorDetails>,
}

impl BookDetail {
    /// Resolved author name, then the name embedded in the work.
    pub fn author_name(&self) -> Option<&str> {
        self.author
            .as_ref()
            .map(|a| a.name.as_str())
            .filter(|name| !name.is_empty())
            .or_else(|| {
                self.work
                    .first_author()
                    .and_then(|a| a.name.as_deref())
                    .filter(|name| !name.is_empty())
            })
    }

    pub fn description(&self) -> &str {
        self.work
            .description
            .as_ref()
            .map(TextValue::as_str)
            .filter(|text| !text.is_empty())
            .unwrap_or(NO_DESCRIPTION)
    }

    pub fn cover_url(&self, covers: &Covers) -> String {
        covers.url_or_placeholder(self.work.first_cover(), CoverSize::Large)
    }

    pub fn subjects(&self) -> &[String] {
        let end = self.work.subjects.len().min(MAX_SUBJECTS);
        &self.work.subjects[..end]
    }

    /// The entry recorded in the recently-viewed list for this book.
    pub fn summary(&self, covers: &Covers) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            title: self.work.title.clone(),
            author: self.author_name().unwrap_or(UNKNOWN_AUTHOR).to_string(),
            cover_url: Some(self.cover_url(covers)),
        }
    }
}

impl AuthorDetails {
    pub fn biography(&self) -> &str {
        self.bio
            .as_ref()
            .map(TextValue::as_str)
            .filter(|text| !text.is_empty())
            .unwrap_or(NO_BIOGRAPHY)
    }
}

// ============================================================================
// Covers
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSize {
    /// Thumbnails in result grids.
    Medium,
    /// Detail pages.
    Large,
}

impl CoverSize {
    fn suffix(self) -> &'static str {
        match self {
            CoverSize::Medium => "M",
            CoverSize::Large => "L",
        }
    }
}

/// Derives cover image URLs from catalog cover ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Covers {
    pub base_url: String,
    pub placeholder_url: String,
}

impl Default for Covers {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_COVERS_BASE_URL.to_string(),
            placeholder_url: DEFAULT_PLACEHOLDER_COVER_URL.to_string(),
        }
    }
}

impl Covers {
    pub fn url(&self, cover_id: i64, size: CoverSize) -> String {
        format!(
            "{}/b/id/{}-{}.jpg",
            self.base_url.trim_end_matches('/'),
            cover_id,
            size.suffix()
        )
    }

    pub fn url_or_placeholder(&self, cover_id: Option<i64>, size: CoverSize) -> String {
        match cover_id {
            Some(id) => self.url(id, size),
            None => self.placeholder_url.clone(),
        }
    }
}

// ============================================================================
// Open Library Wire Types
// ============================================================================

/// Free text the catalog sends either bare or as `{"type": "/type/text", "value": ...}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TextValue {
    Plain(String),
    Typed {
        #[serde(rename = "type", default)]
        kind: Option<String>,
        #[serde(default)]
        value: String,
    },
}

impl TextValue {
    pub fn as_str(&self) -> &str {
        match self {
            TextValue::Plain(text) => text,
            TextValue::Typed { value, .. } => value,
        }
    }
}

/// `GET /search.json`
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SearchResponse {
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SearchDoc {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author_name: Vec<String>,
    pub cover_i: Option<i64>,
}

/// `GET /works/<id>.json`
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct WorkDetails {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub authors: Vec<WorkAuthor>,
    pub description: Option<TextValue>,
    #[serde(default)]
    pub covers: Vec<i64>,
    pub first_publish_date: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    pub number_of_pages_median: Option<u32>,
}

impl WorkDetails {
    pub fn first_author(&self) -> Option<&AuthorRef> {
        self.authors.first().and_then(|a| a.author.as_ref())
    }

    /// First usable cover id. The catalog pads some lists with `-1`.
    pub fn first_cover(&self) -> Option<i64> {
        self.covers.first().copied().filter(|id| *id > 0)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct WorkAuthor {
    pub author: Option<AuthorRef>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AuthorRef {
    pub key: String,
    pub name: Option<String>,
}

/// `GET /authors/<id>.json`
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct AuthorDetails {
    #[serde(default)]
    pub name: String,
    pub birth_date: Option<String>,
    pub death_date: Option<String>,
    pub bio: Option<TextValue>,
}

// ============================================================================
// Helpers
// ============================================================================

/// Last path segment of a catalog key: `/works/OL45804W` → `OL45804W`.
pub fn key_id(key: &str) -> &str {
    match key.rsplit('/').next() {
        Some(id) if !id.is_empty() => id,
        _ => key,
    }
}

pub fn total_pages(num_found: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = num_found.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Result offset of a 1-based page.
pub fn page_offset(page: u32, page_size: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(page_size)
}
