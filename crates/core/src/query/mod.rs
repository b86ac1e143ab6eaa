//! Request parameter normalization for keyword search.
//!
//! Turns the raw `keyword`, `page` and `order` parameters into a
//! [`NormalizedQuery`] with a fixed-size pagination window.

use serde::{Deserialize, Serialize};

/// Results per page.
pub const PAGE_SIZE: u32 = 20;

/// Highest page that may be requested.
pub const MAX_PAGE: u32 = 20;

/// Requested result ordering. Every explicit order sorts descending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Index relevance order.
    #[default]
    Relevance,
    CreateTime,
    Length,
    Heat,
}

impl SortOrder {
    /// Parse the `order` parameter: `l`, `m` or `h`; anything else means
    /// relevance.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("l") => SortOrder::CreateTime,
            Some("m") => SortOrder::Length,
            Some("h") => SortOrder::Heat,
            _ => SortOrder::Relevance,
        }
    }

    /// Index field to sort on, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            SortOrder::Relevance => None,
            SortOrder::CreateTime => Some("CreateTime"),
            SortOrder::Length => Some("Length"),
            SortOrder::Heat => Some("Heat"),
        }
    }
}

/// A keyword query ready to be admitted and executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub keyword: String,
    pub page: u32,
    pub order: SortOrder,
}

impl NormalizedQuery {
    /// Index offset of the first hit on this page.
    pub fn offset(&self) -> u32 {
        page_offset(self.page)
    }

    pub fn limit(&self) -> u32 {
        PAGE_SIZE
    }
}

/// Normalize raw request parameters.
///
/// Returns `None` when the decoded keyword is empty; no search should be
/// issued in that case.
pub fn normalize(
    raw_keyword: Option<&str>,
    raw_page: Option<&str>,
    raw_order: Option<&str>,
) -> Option<NormalizedQuery> {
    let keyword = decode_keyword(raw_keyword?);
    if keyword.is_empty() {
        return None;
    }

    Some(NormalizedQuery {
        keyword,
        page: parse_page(raw_page),
        order: SortOrder::from_param(raw_order),
    })
}

/// Index offset of the first hit on `page`, with `page` clamped into
/// `1..=MAX_PAGE`.
pub fn page_offset(page: u32) -> u32 {
    (page.clamp(1, MAX_PAGE) - 1) * PAGE_SIZE
}

/// Percent-decode a keyword, treating `+` as a space.
///
/// Undecodable input yields an empty keyword: a `%` not followed by two hex
/// digits, or escapes that do not form UTF-8.
pub fn decode_keyword(raw: &str) -> String {
    if !has_valid_escapes(raw) {
        return String::new();
    }

    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => String::new(),
    }
}

fn has_valid_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

/// Parse the `page` parameter into `1..=MAX_PAGE`.
///
/// Missing, non-numeric, zero and negative values all mean page 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    let page = raw
        .and_then(|p| p.trim().parse::<i64>().ok())
        .unwrap_or(1);

    if page < 1 {
        1
    } else {
        page.min(MAX_PAGE as i64) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_escape_is_undecodable() {
        assert_eq!(decode_keyword("100%"), "");
        assert_eq!(decode_keyword("%zz"), "");
        assert_eq!(decode_keyword("abc%4"), "");
        assert_eq!(decode_keyword("%E4%B8"), "");
        assert!(normalize(Some("100%"), None, None).is_none());
        assert!(normalize(Some("50%off"), Some("2"), Some("h")).is_none());
    }

    #[test]
    fn test_valid_escapes_decode() {
        assert_eq!(decode_keyword("100%25"), "100%");
        assert_eq!(decode_keyword("a%2Bb"), "a+b");
    }

    #[test]
    fn test_page_offset_is_bounded() {
        assert_eq!(page_offset(0), 0);
        assert_eq!(page_offset(1), 0);
        assert_eq!(page_offset(3), 40);
        assert_eq!(page_offset(20), 380);
        assert_eq!(page_offset(500), 380);
        assert_eq!(page_offset(u32::MAX), 380);
    }

    #[test]
    fn test_empty_keyword_is_noop() {
        assert!(normalize(None, None, None).is_none());
        assert!(normalize(Some(""), Some("2"), Some("l")).is_none());
    }

    #[test]
    fn test_keyword_is_percent_decoded() {
        let query = normalize(Some("ubuntu%2024.04+desktop"), None, None).unwrap();
        assert_eq!(query.keyword, "ubuntu 24.04 desktop");
    }

    #[test]
    fn test_keyword_decodes_utf8() {
        assert_eq!(decode_keyword("%E4%B8%AD%E6%96%87"), "中文");
    }

    #[test]
    fn test_invalid_utf8_keyword_is_empty() {
        assert_eq!(decode_keyword("%FF%FE"), "");
        assert!(normalize(Some("%FF"), None, None).is_none());
    }

    #[test]
    fn test_page_defaults_to_one() {
        assert_eq!(parse_page(None), 1);
        assert_eq!(parse_page(Some("")), 1);
        assert_eq!(parse_page(Some("abc")), 1);
        assert_eq!(parse_page(Some("0")), 1);
    }

    #[test]
    fn test_page_is_clamped_to_max() {
        assert_eq!(parse_page(Some("20")), 20);
        assert_eq!(parse_page(Some("21")), 20);
        assert_eq!(parse_page(Some("99999999999")), 20);
    }

    #[test]
    fn test_negative_page_is_clamped_to_one() {
        assert_eq!(parse_page(Some("-3")), 1);
    }

    #[test]
    fn test_page_21_and_20_share_window() {
        let p20 = normalize(Some("k"), Some("20"), None).unwrap();
        let p21 = normalize(Some("k"), Some("21"), None).unwrap();
        assert_eq!(p20.offset(), p21.offset());
        assert_eq!(p20.limit(), p21.limit());
        assert_eq!(p20.offset(), 380);
    }

    #[test]
    fn test_window_for_first_page() {
        let query = normalize(Some("k"), None, None).unwrap();
        assert_eq!(query.offset(), 0);
        assert_eq!(query.limit(), 20);
    }

    #[test]
    fn test_sort_order_tokens() {
        assert_eq!(SortOrder::from_param(Some("l")), SortOrder::CreateTime);
        assert_eq!(SortOrder::from_param(Some("m")), SortOrder::Length);
        assert_eq!(SortOrder::from_param(Some("h")), SortOrder::Heat);
        assert_eq!(SortOrder::from_param(Some("H")), SortOrder::Relevance);
        assert_eq!(SortOrder::from_param(Some("")), SortOrder::Relevance);
        assert_eq!(SortOrder::from_param(None), SortOrder::Relevance);
    }

    #[test]
    fn test_sort_fields() {
        assert_eq!(SortOrder::Relevance.field(), None);
        assert_eq!(SortOrder::CreateTime.field(), Some("CreateTime"));
        assert_eq!(SortOrder::Length.field(), Some("Length"));
        assert_eq!(SortOrder::Heat.field(), Some("Heat"));
    }
}
