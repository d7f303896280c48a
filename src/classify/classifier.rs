//! Accept/reject decisions and tagging

use super::matcher::KeywordTable;
use super::policy::{Policy, PolicyError, TableKind};
use crate::corpus::{Classification, Paper, RawRecord, RecordError, SeenSet};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that abort a classification batch
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("Structural error: {0}")]
    Record(#[from] RecordError),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),
}

/// What happened to one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Identifier was recorded by an earlier run or earlier in this batch
    AlreadySeen,
    /// An exclusion keyword occurred
    Excluded { keyword: String },
    /// Neither a strong-inclusion nor a representation keyword occurred
    NoGeometrySignal,
    Accepted(Classification),
}

/// Per-batch counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyReport {
    pub skipped: usize,
    pub excluded: usize,
    pub weak: usize,
    pub accepted: usize,
}

impl ClassifyReport {
    fn record(&mut self, decision: &Decision) {
        match decision {
            Decision::AlreadySeen => self.skipped += 1,
            Decision::Excluded { .. } => self.excluded += 1,
            Decision::NoGeometrySignal => self.weak += 1,
            Decision::Accepted(_) => self.accepted += 1,
        }
    }
}

/// Result of classifying a batch
#[derive(Debug, Clone)]
pub struct ClassifyOutcome {
    /// Newly accepted records, tagged, in input order
    pub accepted: Vec<Paper>,
    /// The incoming seen-set extended with every newly evaluated identifier
    pub seen: SeenSet,
    pub report: ClassifyReport,
}

/// A policy compiled for repeated use
#[derive(Debug)]
pub struct Classifier {
    exclusion: KeywordTable,
    strong_inclusion: KeywordTable,
    representations: KeywordTable,
    techniques: KeywordTable,
    domains: KeywordTable,
    fallback_domain: String,
    fallback_tag: String,
}

impl Classifier {
    /// Validate and compile a policy
    pub fn new(policy: &Policy) -> Result<Self, PolicyError> {
        policy.validate()?;
        Ok(Self {
            exclusion: KeywordTable::from_keywords("exclusion", &policy.exclusion)?,
            strong_inclusion: KeywordTable::from_keywords("strong-inclusion", &policy.strong_inclusion)?,
            representations: KeywordTable::from_categories(policy.taxonomy(TableKind::Representation))?,
            techniques: KeywordTable::from_categories(policy.taxonomy(TableKind::Technique))?,
            domains: KeywordTable::from_categories(policy.taxonomy(TableKind::Domain))?,
            fallback_domain: policy.fallback_domain.clone(),
            fallback_tag: policy.fallback_tag.clone(),
        })
    }

    /// Classify a batch against the seen-set
    ///
    /// The whole batch is validated before any decision is made; one
    /// malformed record fails the batch. The incoming seen-set is not
    /// modified; the extended copy is returned in the outcome.
    pub fn classify(&self, records: Vec<RawRecord>, seen: &SeenSet) -> Result<ClassifyOutcome, ClassifyError> {
        let papers = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| record.validate(position))
            .collect::<Result<Vec<_>, _>>()?;

        let mut updated = seen.clone();
        let mut accepted = Vec::new();
        let mut report = ClassifyReport::default();

        for mut paper in papers {
            let decision = if updated.contains(&paper.id) {
                Decision::AlreadySeen
            } else {
                updated.insert(paper.id.clone());
                self.decide(&paper)
            };
            report.record(&decision);

            match decision {
                Decision::AlreadySeen => debug!(id = %paper.id, "skipping already seen record"),
                Decision::Excluded { keyword } => {
                    debug!(id = %paper.id, %keyword, "excluded");
                }
                Decision::NoGeometrySignal => debug!(id = %paper.id, "excluded: no geometry signal"),
                Decision::Accepted(classification) => {
                    debug!(
                        id = %paper.id,
                        domain = %classification.domain,
                        techniques = ?classification.techniques,
                        representations = ?classification.representations,
                        "accepted"
                    );
                    paper.tag(classification);
                    accepted.push(paper);
                }
            }
        }

        info!(
            accepted = report.accepted,
            excluded = report.excluded,
            weak = report.weak,
            skipped = report.skipped,
            seen = updated.len(),
            "classification finished"
        );

        Ok(ClassifyOutcome {
            accepted,
            seen: updated,
            report,
        })
    }

    /// Apply the exclusion, inclusion and tagging steps to one paper,
    /// ignoring the seen-set
    pub fn decide(&self, paper: &Paper) -> Decision {
        let text = paper.search_text();

        if let Some(keyword) = self.exclusion.first_keyword(&text) {
            return Decision::Excluded {
                keyword: keyword.to_string(),
            };
        }

        if !self.strong_inclusion.is_match(&text) && !self.representations.is_match(&text) {
            return Decision::NoGeometrySignal;
        }

        Decision::Accepted(Classification {
            domain: self.domain(&text),
            techniques: self.tags(&self.techniques, &text),
            representations: self.tags(&self.representations, &text),
        })
    }

    /// Arg-max over distinct-keyword scores; the first declared domain wins ties
    fn domain(&self, text: &str) -> String {
        let mut best: Option<(usize, usize)> = None;
        for (index, score) in self.domains.scores(text).into_iter().enumerate() {
            if score > 0 && best.map_or(true, |(_, top)| score > top) {
                best = Some((index, score));
            }
        }
        match best {
            Some((index, _)) => self.domains.labels()[index].clone(),
            None => self.fallback_domain.clone(),
        }
    }

    fn tags(&self, table: &KeywordTable, text: &str) -> Vec<String> {
        let labels = table.matching_labels(text);
        if labels.is_empty() {
            vec![self.fallback_tag.clone()]
        } else {
            labels
        }
    }
}

/// Compile `policy` and classify one batch
pub fn classify(records: Vec<RawRecord>, seen: &SeenSet, policy: &Policy) -> Result<ClassifyOutcome, ClassifyError> {
    Classifier::new(policy)?.classify(records, seen)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, title: &str, abstract_text: &str) -> RawRecord {
        RawRecord {
            id: Some(id.to_string()),
            title: Some(title.to_string()),
            abstract_text: Some(abstract_text.to_string()),
            authors: Some(vec!["A. Smith".to_string(), "B. Lee".to_string()]),
            published_date: Some("2024-01-01".to_string()),
            pdf_link: Some(format!("https://arxiv.org/pdf/{}", id)),
            ..Default::default()
        }
    }

    fn classifier() -> Classifier {
        Classifier::new(&Policy::default()).unwrap()
    }

    #[test]
    fn test_brep_transformer_example() {
        let outcome = classifier()
            .classify(
                vec![record(
                    "1234",
                    "A BREP Transformer for CAD Generation",
                    "We use a transformer on boundary representation graphs for CAD generation.",
                )],
                &SeenSet::new(),
            )
            .unwrap();

        assert_eq!(outcome.accepted.len(), 1);
        let paper = &outcome.accepted[0];
        assert_eq!(paper.domain.as_deref(), Some("CAD Geometry Core"));
        assert_eq!(paper.techniques, Some(vec!["Transformer".to_string()]));
        assert_eq!(paper.representations, Some(vec!["BREP".to_string()]));
        assert!(outcome.seen.contains("1234"));
    }

    #[test]
    fn test_exclusion_precedes_inclusion() {
        let paper = record("1", "Solids", "A finite element study of BREP solids.")
            .validate(0)
            .unwrap();
        assert_eq!(
            classifier().decide(&paper),
            Decision::Excluded {
                keyword: "finite element".to_string()
            }
        );
    }

    #[test]
    fn test_rejected_record_is_still_marked_seen() {
        let outcome = classifier()
            .classify(vec![record("9", "Opinion", "An essay about software.")], &SeenSet::new())
            .unwrap();
        assert!(outcome.accepted.is_empty());
        assert!(outcome.seen.contains("9"));
        assert_eq!(outcome.report.weak, 1);
    }

    #[test]
    fn test_representation_keyword_alone_accepts() {
        let paper = record("2", "Voxel upsampling", "We upsample voxel grids.").validate(0).unwrap();
        match classifier().decide(&paper) {
            Decision::Accepted(c) => {
                assert_eq!(c.representations, vec!["Voxel".to_string()]);
                assert_eq!(c.techniques, vec!["Other".to_string()]);
                assert_eq!(c.domain, "Other");
            }
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn test_domain_tie_goes_to_first_declared() {
        // One hit each for "Computer Vision for Geometry" (vision) and
        // "Sketch / Constraint Understanding" (sketch).
        let paper = record("3", "Vision", "Reading a sketch with vision.").validate(0).unwrap();
        match classifier().decide(&paper) {
            Decision::Accepted(c) => assert_eq!(c.domain, "Computer Vision for Geometry"),
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn test_higher_score_beats_declaration_order() {
        let paper = record("4", "Sketch constraints", "Constraint solving on a drawing and a sketch.")
            .validate(0)
            .unwrap();
        match classifier().decide(&paper) {
            Decision::Accepted(c) => assert_eq!(c.domain, "Sketch / Constraint Understanding"),
            other => panic!("expected acceptance, got {:?}", other),
        }
    }

    #[test]
    fn test_seen_identifier_is_skipped() {
        let seen: SeenSet = ["1234"].into_iter().collect();
        let outcome = classifier()
            .classify(vec![record("1234", "CAD model", "A CAD model.")], &seen)
            .unwrap();
        assert!(outcome.accepted.is_empty());
        assert_eq!(outcome.seen, seen);
        assert_eq!(outcome.report.skipped, 1);
    }

    #[test]
    fn test_duplicate_in_batch_treated_as_seen() {
        let outcome = classifier()
            .classify(
                vec![
                    record("5", "CAD model", "A CAD model."),
                    record("5", "CAD model again", "A CAD model."),
                ],
                &SeenSet::new(),
            )
            .unwrap();
        assert_eq!(outcome.accepted.len(), 1);
        assert_eq!(outcome.accepted[0].title, "CAD model");
        assert_eq!(outcome.report.skipped, 1);
        assert_eq!(outcome.seen.len(), 1);
    }

    #[test]
    fn test_malformed_record_fails_whole_batch() {
        let mut broken = record("7", "CAD model", "A CAD model.");
        broken.pdf_link = None;
        let err = classifier()
            .classify(vec![record("6", "CAD model", "A CAD model."), broken], &SeenSet::new())
            .unwrap_err();
        match err {
            ClassifyError::Record(RecordError::MissingField { position, field, id }) => {
                assert_eq!(position, 1);
                assert_eq!(field, "pdf_link");
                assert_eq!(id, "7");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let mut policy = Policy::default();
        policy.domains.clear();
        let err = classify(vec![], &SeenSet::new(), &policy).unwrap_err();
        assert!(matches!(err, ClassifyError::Policy(PolicyError::EmptyTable(TableKind::Domain))));
    }
}
