//! Keyword routing of review lines into aspect buckets
//!
//! A line lands in every aspect whose keyword list has at least one entry
//! contained in the lowercased line. Buckets keep insertion order.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Topical aspect of a review. Declaration order is iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    Food,
    Service,
    Ambiance,
    Value,
}

impl Aspect {
    pub const ALL: [Aspect; 4] = [Aspect::Food, Aspect::Service, Aspect::Ambiance, Aspect::Value];

    pub fn name(&self) -> &'static str {
        match self {
            Aspect::Food => "food",
            Aspect::Service => "service",
            Aspect::Ambiance => "ambiance",
            Aspect::Value => "value",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Aspect::Food => "Food",
            Aspect::Service => "Service",
            Aspect::Ambiance => "Ambiance",
            Aspect::Value => "Value",
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Aspect::Food => &[
                "food",
                "dish",
                "portion",
                "ingredient",
                "flavor",
                "taste",
                "chef",
                "menu",
            ],
            Aspect::Service => &[
                "service",
                "staff",
                "waiter",
                "waitress",
                "valet",
                "wait time",
                "customer",
            ],
            Aspect::Ambiance => &[
                "ambiance",
                "atmosphere",
                "interior",
                "noise",
                "decor",
                "seating",
                "environment",
            ],
            Aspect::Value => &[
                "price",
                "value",
                "worth",
                "expensive",
                "cheap",
                "cost",
                "money",
            ],
        }
    }

    /// `lowered` must already be lowercase
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords().iter().any(|keyword| lowered.contains(keyword))
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Review lines grouped by aspect; every aspect is present, possibly empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AspectBuckets {
    buckets: BTreeMap<Aspect, Vec<String>>,
}

impl Default for AspectBuckets {
    fn default() -> Self {
        Self {
            buckets: Aspect::ALL.iter().map(|a| (*a, Vec::new())).collect(),
        }
    }
}

impl AspectBuckets {
    pub fn get(&self, aspect: Aspect) -> &[String] {
        self.buckets.get(&aspect).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All buckets in aspect order
    pub fn iter(&self) -> impl Iterator<Item = (Aspect, &[String])> {
        self.buckets.iter().map(|(a, lines)| (*a, lines.as_slice()))
    }

    /// Buckets with at least one line, in aspect order
    pub fn non_empty(&self) -> impl Iterator<Item = (Aspect, &[String])> {
        self.iter().filter(|(_, lines)| !lines.is_empty())
    }

    /// True when no line matched any aspect
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(Vec::is_empty)
    }

    fn push(&mut self, aspect: Aspect, line: &str) {
        self.buckets.entry(aspect).or_default().push(line.to_string());
    }
}

/// Route each line into every aspect it mentions
pub fn route<I, S>(lines: I) -> AspectBuckets
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut buckets = AspectBuckets::default();
    for line in lines {
        let line = line.as_ref();
        let lowered = line.to_lowercase();
        for aspect in Aspect::ALL {
            if aspect.matches(&lowered) {
                buckets.push(aspect, line);
            }
        }
    }
    buckets
}

/// Split a combined review block on newlines and route each line
pub fn route_text(text: &str) -> AspectBuckets {
    route(text.split('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_multi_membership() {
        let buckets = route([
            "Great food but slow service.",
            "The ambiance was wonderful and prices were fair.",
        ]);

        assert_eq!(buckets.get(Aspect::Food), ["Great food but slow service."]);
        assert_eq!(buckets.get(Aspect::Service), ["Great food but slow service."]);
        assert_eq!(
            buckets.get(Aspect::Ambiance),
            ["The ambiance was wonderful and prices were fair."]
        );
        assert_eq!(
            buckets.get(Aspect::Value),
            ["The ambiance was wonderful and prices were fair."]
        );
    }

    #[test]
    fn test_route_is_case_insensitive_and_keeps_original_text() {
        let buckets = route(["The CHEF was rude"]);
        assert_eq!(buckets.get(Aspect::Food), ["The CHEF was rude"]);
    }

    #[test]
    fn test_route_multi_word_keyword() {
        let buckets = route(["The wait time was long"]);
        assert_eq!(buckets.get(Aspect::Service).len(), 1);
        assert!(buckets.get(Aspect::Food).is_empty());
    }

    #[test]
    fn test_route_unmatched_line() {
        let buckets = route(["Lovely evening overall"]);
        assert!(buckets.is_empty());
        assert_eq!(buckets.non_empty().count(), 0);
        assert_eq!(buckets.iter().count(), 4);
    }

    #[test]
    fn test_route_preserves_insertion_order() {
        let buckets = route(["menu one", "other", "menu two", "menu three"]);
        assert_eq!(
            buckets.get(Aspect::Food),
            ["menu one", "menu two", "menu three"]
        );
    }

    #[test]
    fn test_route_is_deterministic() {
        let lines = ["food and price", "staff", "decor and taste"];
        assert_eq!(route(lines), route(lines));
    }

    #[test]
    fn test_route_text_splits_lines() {
        let buckets = route_text("Good food\n\nFriendly staff\n");
        assert_eq!(buckets.get(Aspect::Food), ["Good food"]);
        assert_eq!(buckets.get(Aspect::Service), ["Friendly staff"]);
    }

    #[test]
    fn test_non_empty_in_aspect_order() {
        let buckets = route(["cheap", "noise", "staff"]);
        let order: Vec<Aspect> = buckets.non_empty().map(|(a, _)| a).collect();
        assert_eq!(order, vec![Aspect::Service, Aspect::Ambiance, Aspect::Value]);
    }

    #[test]
    fn test_aspect_titles() {
        let titles: Vec<&str> = Aspect::ALL.iter().map(Aspect::title).collect();
        assert_eq!(titles, vec!["Food", "Service", "Ambiance", "Value"]);
    }
}
