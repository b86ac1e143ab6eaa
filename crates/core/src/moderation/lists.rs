//! Compiled block/allow pattern lists.

use regex_lite::Regex;
use tracing::warn;

use super::ModerationLists;
use crate::store::KeywordPatterns;

/// Block and allow lists compiled once at startup.
///
/// Patterns are case-insensitive regular expressions matched anywhere in
/// the keyword. A pattern that fails to compile is matched as a literal
/// substring instead.
#[derive(Debug, Clone, Default)]
pub struct KeywordLists {
    block: Vec<Regex>,
    allow: Vec<Regex>,
}

impl KeywordLists {
    pub fn new(
        block: impl IntoIterator<Item = String>,
        allow: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            block: block.into_iter().filter_map(|p| compile(&p)).collect(),
            allow: allow.into_iter().filter_map(|p| compile(&p)).collect(),
        }
    }

    pub fn from_patterns(patterns: KeywordPatterns) -> Self {
        Self::new(patterns.block, patterns.allow)
    }

    pub fn block_len(&self) -> usize {
        self.block.len()
    }

    pub fn allow_len(&self) -> usize {
        self.allow.len()
    }
}

fn compile(pattern: &str) -> Option<Regex> {
    let pattern = pattern.trim();
    if pattern.is_empty() {
        return None;
    }

    match Regex::new(&format!("(?i){}", pattern)) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!(pattern = pattern, error = %e, "Invalid keyword pattern, matching literally");
            Regex::new(&format!("(?i){}", regex_lite::escape(pattern))).ok()
        }
    }
}

impl ModerationLists for KeywordLists {
    fn in_block_list(&self, keyword: &str) -> bool {
        self.block.iter().any(|re| re.is_match(keyword))
    }

    fn in_allow_list(&self, keyword: &str) -> bool {
        self.allow.iter().any(|re| re.is_match(keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_are_case_insensitive() {
        let lists = KeywordLists::new(vec!["Spam".to_string()], vec![]);
        assert!(lists.in_block_list("SPAM offer"));
        assert!(lists.in_block_list("cheap spam"));
        assert!(!lists.in_block_list("ham"));
    }

    #[test]
    fn test_regex_patterns() {
        let lists = KeywordLists::new(vec![], vec![r"^linux\b".to_string()]);
        assert!(lists.in_allow_list("linux mint"));
        assert!(!lists.in_allow_list("gnu/linux"));
    }

    #[test]
    fn test_invalid_pattern_falls_back_to_literal() {
        let lists = KeywordLists::new(vec!["c++(".to_string()], vec![]);
        assert_eq!(lists.block_len(), 1);
        assert!(lists.in_block_list("learn c++( fast"));
        assert!(!lists.in_block_list("learn c fast"));
    }

    #[test]
    fn test_blank_patterns_are_ignored() {
        let lists = KeywordLists::new(vec!["  ".to_string()], vec![String::new()]);
        assert_eq!(lists.block_len(), 0);
        assert_eq!(lists.allow_len(), 0);
        assert!(!lists.in_block_list("anything"));
    }

    #[test]
    fn test_from_patterns() {
        let lists = KeywordLists::from_patterns(KeywordPatterns {
            block: vec!["bad".to_string()],
            allow: vec!["good".to_string(), "fine".to_string()],
        });
        assert_eq!(lists.block_len(), 1);
        assert_eq!(lists.allow_len(), 2);
    }
}
