//! Shared fixtures for integration tests
//!
//! A small synthetic feed covering accepted, excluded and weak records.

#![allow(dead_code)]

use papergraph::RawRecord;
use serde_json::{json, Value};

/// One raw record in the fetch collaborator's JSON shape
pub fn raw_json(id: &str, title: &str, abstract_text: &str, authors: &[&str]) -> Value {
    json!({
        "arxiv_id": id,
        "title": title,
        "abstract": abstract_text,
        "authors": authors,
        "published_date": "2024-01-15",
        "pdf_link": format!("https://arxiv.org/pdf/{}", id),
        "categories": ["cs.CV", "cs.GR"],
        "fetch_timestamp": "2024-01-16T08:00:00"
    })
}

pub fn raw(id: &str, title: &str, abstract_text: &str, authors: &[&str]) -> RawRecord {
    RawRecord::from_value(0, raw_json(id, title, abstract_text, authors)).unwrap()
}

/// First day's feed
pub fn feed_day_one() -> Vec<RawRecord> {
    vec![
        raw(
            "2401.0001",
            "A BREP Transformer for CAD Generation",
            "We use a transformer on boundary representation graphs for CAD generation.",
            &["A. Smith", "B. Lee"],
        ),
        raw(
            "2401.0002",
            "Stress analysis of turbine blades",
            "A finite element pipeline for BREP solids.",
            &["C. Wu"],
        ),
        raw(
            "2401.0003",
            "Denoising diffusion for point cloud completion",
            "A score-based generative model completes each point cloud.",
            &["B. Lee", "D. Park"],
        ),
        raw(
            "2401.0004",
            "Large language models for email",
            "We summarize inbox threads.",
            &["E. Novak"],
        ),
    ]
}

/// Second day's feed: one repeat, one new paper
pub fn feed_day_two() -> Vec<RawRecord> {
    vec![
        raw(
            "2401.0003",
            "Denoising diffusion for point cloud completion",
            "A score-based generative model completes each point cloud.",
            &["B. Lee", "D. Park"],
        ),
        raw(
            "2401.0005",
            "Sketch constraint inference with graph neural networks",
            "A GNN predicts constraints between sketch primitives.",
            &["A. Smith", "F. Rossi"],
        ),
    ]
}
