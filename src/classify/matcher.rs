//! Compiled keyword tables
//!
//! Each table becomes one overlapping Aho-Corasick automaton over its distinct
//! lower-cased keywords. A search yields, per category, how many distinct
//! keywords occur in the text; frequency is ignored.

use super::policy::{Category, PolicyError};
use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use std::collections::HashMap;

/// A keyword table compiled for substring search
#[derive(Debug)]
pub struct KeywordTable {
    automaton: AhoCorasick,
    /// Original spelling of each distinct pattern, for diagnostics
    keywords: Vec<String>,
    /// Categories each pattern belongs to
    members: Vec<Vec<usize>>,
    labels: Vec<String>,
}

impl KeywordTable {
    /// Compile an ordered taxonomy
    pub fn from_categories(categories: &[Category]) -> Result<Self, PolicyError> {
        let mut patterns: Vec<String> = Vec::new();
        let mut keywords: Vec<String> = Vec::new();
        let mut members: Vec<Vec<usize>> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (category, entry) in categories.iter().enumerate() {
            for keyword in &entry.keywords {
                let pattern = keyword.to_lowercase();
                let slot = *index.entry(pattern.clone()).or_insert_with(|| {
                    patterns.push(pattern);
                    keywords.push(keyword.clone());
                    members.push(Vec::new());
                    patterns.len() - 1
                });
                // A keyword listed twice in one category still counts once
                if !members[slot].contains(&category) {
                    members[slot].push(category);
                }
            }
        }

        let automaton = AhoCorasickBuilder::new()
            .match_kind(MatchKind::Standard)
            .build(&patterns)?;

        Ok(Self {
            automaton,
            keywords,
            members,
            labels: categories.iter().map(|c| c.label.clone()).collect(),
        })
    }

    /// Compile a flat keyword list as a single anonymous category
    pub fn from_keywords(label: &str, keywords: &[String]) -> Result<Self, PolicyError> {
        Self::from_categories(&[Category {
            label: label.to_string(),
            keywords: keywords.to_vec(),
        }])
    }

    /// Distinct patterns present in already lower-cased `text`, by pattern index
    fn hits(&self, text: &str) -> Vec<bool> {
        let mut hits = vec![false; self.keywords.len()];
        for mat in self.automaton.find_overlapping_iter(text) {
            hits[mat.pattern().as_usize()] = true;
        }
        hits
    }

    /// Per-category count of distinct keywords present, in declaration order
    pub fn scores(&self, text: &str) -> Vec<usize> {
        let mut scores = vec![0; self.labels.len()];
        for (pattern, hit) in self.hits(text).into_iter().enumerate() {
            if hit {
                for &category in &self.members[pattern] {
                    scores[category] += 1;
                }
            }
        }
        scores
    }

    /// Labels of every category with at least one keyword present
    pub fn matching_labels(&self, text: &str) -> Vec<String> {
        self.scores(text)
            .into_iter()
            .zip(&self.labels)
            .filter(|(score, _)| *score > 0)
            .map(|(_, label)| label.clone())
            .collect()
    }

    /// First keyword, in declaration order, present in `text`
    pub fn first_keyword(&self, text: &str) -> Option<&str> {
        self.hits(text)
            .into_iter()
            .position(|hit| hit)
            .map(|i| self.keywords[i].as_str())
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.automaton.is_match(text)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
