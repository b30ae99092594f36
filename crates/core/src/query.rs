//! Facet normalization for the recipe query engine.
//!
//! Raw request parameters are permissive by documented contract:
//! malformed numeric or list facets are silently dropped, never
//! rejected. Numeric fields therefore arrive as strings (so a garbage
//! value degrades to "absent" instead of a deserialization error) and
//! multi-valued facets arrive either comma-separated (`tags=a,b`) or
//! as repeated keys in the array form (`tags[]=a&tags[]=b`).
//!
//! All clamping and canonicalization happens here; no raw user input
//! crosses into the query compiler in the repository layer.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default page number when unset or malformed.
pub const DEFAULT_PAGE: i64 = 1;

/// Default number of recipes per page.
pub const DEFAULT_PAGE_LIMIT: i64 = 20;

/// Maximum number of recipes per page.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Maximum (and default) number of title suggestions.
pub const MAX_SUGGESTION_LIMIT: i64 = 10;

// ---------------------------------------------------------------------------
// Facet enums
// ---------------------------------------------------------------------------

/// Sort direction. Defaults to ascending for any input that is not
/// exactly `asc`/`desc` (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    /// SQL direction keyword for the compiled ORDER BY clause.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Semantics for multi-valued facets (`tags`, `ingredients`).
///
/// `All` requires every listed value on the candidate (set
/// containment); `Any` requires at least one (non-empty intersection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    All,
    Any,
}

impl MatchMode {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("any") => MatchMode::Any,
            _ => MatchMode::All,
        }
    }
}

/// Whitelisted sort columns. Anything outside the whitelist normalizes
/// to `None`, which means store insertion order (`ORDER BY id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Title,
    Category,
    UpdateCount,
    CreatedAt,
}

impl SortKey {
    fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            Some("title") => Some(SortKey::Title),
            Some("category") => Some(SortKey::Category),
            Some("updateCount") => Some(SortKey::UpdateCount),
            Some("createdAt") => Some(SortKey::CreatedAt),
            _ => None,
        }
    }

    /// Column name for the compiled ORDER BY clause.
    pub fn column(&self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Category => "category",
            SortKey::UpdateCount => "update_count",
            SortKey::CreatedAt => "created_at",
        }
    }
}

// ---------------------------------------------------------------------------
// Raw parameters
// ---------------------------------------------------------------------------

/// Facet parameters exactly as they arrive on `GET /recipes`.
///
/// Every field is optional and string-typed; see the module docs for
/// why numeric fields are not deserialized as numbers. Built from
/// decoded query-string pairs via [`RawRecipeQuery::from_pairs`] so
/// the repeated-key array form survives intact.
#[derive(Debug, Default)]
pub struct RawRecipeQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub category: Option<String>,
    /// Comma-separated tag list; `tags[]` occurrences merge into it.
    pub tags: Option<String>,
    pub tag_match_type: Option<String>,
    /// Comma-separated ingredient list; `ingredients[]` occurrences
    /// merge into it.
    pub ingredients: Option<String>,
    pub ingredients_match_type: Option<String>,
    pub number_of_steps: Option<String>,
}

impl RawRecipeQuery {
    /// Collect decoded query-string pairs into raw facet parameters.
    ///
    /// Multi-valued facets accept both forms: `tags=a,b` and the
    /// repeated-key array form `tags[]=a&tags[]=b` (also a bare
    /// repeated `tags=a&tags=b`); all occurrences merge into one
    /// comma-joined list. Scalar fields take the last occurrence.
    /// Unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut raw = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" => raw.page = Some(value),
                "limit" => raw.limit = Some(value),
                "search" => raw.search = Some(value),
                "sortBy" => raw.sort_by = Some(value),
                "order" => raw.order = Some(value),
                "category" => raw.category = Some(value),
                "tags" | "tags[]" => append_list(&mut raw.tags, value),
                "tagMatchType" => raw.tag_match_type = Some(value),
                "ingredients" | "ingredients[]" => append_list(&mut raw.ingredients, value),
                "ingredientsMatchType" => raw.ingredients_match_type = Some(value),
                "numberOfSteps" => raw.number_of_steps = Some(value),
                _ => {}
            }
        }
        raw
    }
}

// ---------------------------------------------------------------------------
// Normalized query
// ---------------------------------------------------------------------------

/// A fully normalized recipe query.
///
/// Invariant: every field is clamped and canonical before this value
/// reaches the repository layer. The `Serialize` impl provides the
/// canonical form used as the result-cache key.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeQuery {
    pub page: i64,
    pub limit: i64,
    pub search: Option<String>,
    pub sort_by: Option<SortKey>,
    pub order: SortOrder,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub tag_match: MatchMode,
    pub ingredients: Option<Vec<String>>,
    pub ingredient_match: MatchMode,
    pub number_of_steps: Option<i32>,
}

impl RecipeQuery {
    /// Normalize raw facet parameters.
    ///
    /// - `page` defaults to 1 and is floored to >= 1.
    /// - `limit` defaults to 20 and is clamped into `[1, 100]`.
    /// - empty or whitespace-only `search`/`category` become absent.
    /// - `tags`/`ingredients` entries are trimmed, empties discarded,
    ///   and the facet dropped entirely when nothing survives.
    /// - `numberOfSteps` must parse as a non-negative integer.
    /// - match types are forced into `{all, any}` (default `all`),
    ///   `order` into `{asc, desc}` (default `asc`).
    pub fn normalize(raw: RawRecipeQuery) -> Self {
        let page = parse_int(raw.page.as_deref())
            .unwrap_or(DEFAULT_PAGE)
            .max(1);
        let limit = parse_int(raw.limit.as_deref())
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT);

        let number_of_steps = parse_int(raw.number_of_steps.as_deref())
            .filter(|n| *n >= 0)
            .and_then(|n| i32::try_from(n).ok());

        Self {
            page,
            limit,
            search: clean_text(raw.search),
            sort_by: SortKey::parse(raw.sort_by.as_deref()),
            order: SortOrder::parse(raw.order.as_deref()),
            category: clean_text(raw.category),
            tags: clean_list(raw.tags.as_deref()),
            tag_match: MatchMode::parse(raw.tag_match_type.as_deref()),
            ingredients: clean_list(raw.ingredients.as_deref()),
            ingredient_match: MatchMode::parse(raw.ingredients_match_type.as_deref()),
            number_of_steps,
        }
    }

    /// Row offset for the compiled LIMIT/OFFSET pair.
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    /// Canonical cache key for this query.
    ///
    /// Field order is fixed by the struct definition, so two normalized
    /// queries with equal facets always produce the same key.
    pub fn cache_key(&self) -> String {
        format!(
            "recipes:{}",
            serde_json::to_string(self).unwrap_or_default()
        )
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Escape free text for use inside a case-insensitive pattern match.
///
/// Shared by the recipe search and suggestion paths. User text must
/// never reach the store as an unescaped pattern, both to prevent
/// pattern-injection denial-of-service and to keep matches literal.
pub fn escape_pattern(text: &str) -> String {
    regex::escape(text)
}

/// Lenient integer parse; malformed input degrades to `None`.
fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw?.trim().parse().ok()
}

/// Merge one more occurrence of a repeatable list parameter.
fn append_list(slot: &mut Option<String>, value: String) {
    match slot {
        Some(existing) => {
            existing.push(',');
            existing.push_str(&value);
        }
        None => *slot = Some(value),
    }
}

/// Trim a text facet; empty input degrades to `None`.
fn clean_text(raw: Option<String>) -> Option<String> {
    let text = raw?.trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Split a comma-separated list facet, trimming entries and discarding
/// empties. A list with nothing left is dropped entirely.
fn clean_list(raw: Option<&str>) -> Option<Vec<String>> {
    let values: Vec<String> = raw?
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
