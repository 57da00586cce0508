//! Filter predicate engine for record listings
//!
//! Combines free-text search with discrete facet filters (status, category)
//! using logical AND. Filtering is stable: results keep the source order and
//! an empty query is the identity. No match is not an error, just an empty
//! result.

use std::collections::BTreeMap;

/// A record that can be filtered by search term and facet values
pub trait Filterable {
    /// The fields free-text search looks at (id, name, manufacturer, ...)
    fn search_text(&self) -> Vec<String>;

    /// The record's canonical value for a facet key ("status", "category"),
    /// or None if the record has no such facet
    fn facet(&self, key: &str) -> Option<String>;
}

/// A search term plus zero or more facet selections
///
/// The `"all"` facet value is a sentinel meaning "no constraint" and is
/// dropped at construction, so a query built only from empty terms and
/// `"all"` selections is the identity.
#[derive(Debug, Clone, Default)]
pub struct FilterQuery {
    term: Option<String>,
    facets: BTreeMap<String, String>,
}

impl FilterQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the free-text search term; whitespace-only terms count as empty
    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        let trimmed = term.trim();
        self.term = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_lowercase())
        };
        self
    }

    /// Add a facet constraint; the "all" sentinel is a no-op
    pub fn with_facet(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.eq_ignore_ascii_case("all") {
            self.facets.insert(key.into(), value);
        }
        self
    }

    /// True when the query constrains nothing and apply() returns the input
    pub fn is_identity(&self) -> bool {
        self.term.is_none() && self.facets.is_empty()
    }

    /// Check a single record against every predicate (AND semantics)
    pub fn matches<R: Filterable>(&self, record: &R) -> bool {
        if let Some(term) = &self.term {
            let hit = record
                .search_text()
                .iter()
                .any(|field| field.to_lowercase().contains(term.as_str()));
            if !hit {
                return false;
            }
        }

        for (key, want) in &self.facets {
            match record.facet(key) {
                Some(have) if have == *want => {}
                _ => return false,
            }
        }

        true
    }

    /// Filter a sequence, preserving source order
    pub fn apply<'a, R: Filterable>(&self, records: &'a [R]) -> Vec<&'a R> {
        records.iter().filter(|r| self.matches(*r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gadget {
        id: &'static str,
        name: &'static str,
        maker: &'static str,
        status: &'static str,
    }

    impl Filterable for Gadget {
        fn search_text(&self) -> Vec<String> {
            vec![
                self.name.to_string(),
                self.maker.to_string(),
                self.id.to_string(),
            ]
        }

        fn facet(&self, key: &str) -> Option<String> {
            match key {
                "status" => Some(self.status.to_string()),
                _ => None,
            }
        }
    }

    fn fixture() -> Vec<Gadget> {
        vec![
            Gadget {
                id: "NX-001234",
                name: "iPhone 14 Pro",
                maker: "Apple Inc.",
                status: "active",
            },
            Gadget {
                id: "NX-001235",
                name: "MacBook Pro",
                maker: "Apple Inc.",
                status: "in_transit",
            },
            Gadget {
                id: "NX-001236",
                name: "Galaxy S23",
                maker: "Samsung",
                status: "end_of_life",
            },
        ]
    }

    #[test]
    fn test_empty_query_is_identity() {
        let records = fixture();
        let query = FilterQuery::new().with_term("").with_facet("status", "all");
        assert!(query.is_identity());

        let result = query.apply(&records);
        assert_eq!(result.len(), records.len());
        for (got, want) in result.iter().zip(records.iter()) {
            assert_eq!(got.id, want.id);
        }
    }

    #[test]
    fn test_whitespace_term_is_identity() {
        let query = FilterQuery::new().with_term("   ");
        assert!(query.is_identity());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let records = fixture();
        let query = FilterQuery::new().with_term("iphone");
        let result = query.apply(&records);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "iPhone 14 Pro");
    }

    #[test]
    fn test_search_spans_all_fields() {
        let records = fixture();
        // Matches by maker, not name
        let by_maker = FilterQuery::new().with_term("apple").apply(&records);
        assert_eq!(by_maker.len(), 2);

        // Matches by id
        let by_id = FilterQuery::new().with_term("001236").apply(&records);
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].name, "Galaxy S23");
    }

    #[test]
    fn test_facet_narrows_by_equality() {
        let records = fixture();
        let query = FilterQuery::new().with_facet("status", "in_transit");
        let result = query.apply(&records);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "NX-001235");
    }

    #[test]
    fn test_term_and_facet_are_anded() {
        let records = fixture();
        // "apple" matches two records; the facet keeps only the active one
        let query = FilterQuery::new()
            .with_term("apple")
            .with_facet("status", "active");
        let result = query.apply(&records);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "NX-001234");
    }

    #[test]
    fn test_unknown_facet_matches_nothing() {
        let records = fixture();
        let query = FilterQuery::new().with_facet("condition", "good");
        assert!(query.apply(&records).is_empty());
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let records = fixture();
        let query = FilterQuery::new().with_term("zzz-does-not-exist");
        assert!(query.apply(&records).is_empty());
    }

    #[test]
    fn test_soundness_and_completeness() {
        let records = fixture();
        let query = FilterQuery::new()
            .with_term("pro")
            .with_facet("status", "active");

        let result = query.apply(&records);
        for r in &result {
            assert!(query.matches(*r));
        }

        let kept: Vec<&str> = result.iter().map(|r| r.id).collect();
        for r in &records {
            if !kept.contains(&r.id) {
                assert!(!query.matches(r));
            }
        }
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let records = fixture();
        let query = FilterQuery::new().with_term("apple");

        let once: Vec<&str> = query.apply(&records).iter().map(|r| r.id).collect();

        // Re-apply over the surviving subset
        let survivors: Vec<Gadget> = fixture()
            .into_iter()
            .filter(|r| once.contains(&r.id))
            .collect();
        let twice: Vec<&str> = query.apply(&survivors).iter().map(|r| r.id).collect();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_order_is_preserved() {
        let records = fixture();
        let query = FilterQuery::new().with_term("a");
        let result = query.apply(&records);
        let ids: Vec<&str> = result.iter().map(|r| r.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_by_key(|id| records.iter().position(|r| r.id == *id));
        assert_eq!(ids, sorted);
    }
}
