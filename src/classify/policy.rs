//! Inclusion/exclusion policy and taxonomy tables
//!
//! Every table is ordinary ordered data. Declaration order matters: it is the
//! tie-break for domain scoring and the output order of tag lists.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Label assigned when no category of a taxonomy matches
pub const FALLBACK_LABEL: &str = "Other";

/// Errors in policy configuration
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("{0} table is empty")]
    EmptyTable(TableKind),

    #[error("{table} category '{label}' has no keywords")]
    EmptyCategory { table: TableKind, label: String },

    #[error("{table} category '{label}' contains a blank keyword")]
    BlankKeyword { table: TableKind, label: String },

    #[error("{table} category '{label}' is declared twice")]
    DuplicateCategory { table: TableKind, label: String },

    #[error("fallback label '{label}' collides with a declared {table} category")]
    FallbackCollision { table: TableKind, label: String },

    #[error("{table} category '{label}' is not declared in the policy")]
    UnknownCategory { table: TableKind, label: String },

    #[error("Keyword automaton error: {0}")]
    Automaton(#[from] aho_corasick::BuildError),

    #[error("Policy parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which policy table an error or lookup refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Exclusion,
    StrongInclusion,
    Representation,
    Technique,
    Domain,
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Exclusion => "exclusion",
            Self::StrongInclusion => "strong-inclusion",
            Self::Representation => "representation",
            Self::Technique => "technique",
            Self::Domain => "domain",
        };
        f.write_str(name)
    }
}

/// A labelled keyword set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub keywords: Vec<String>,
}

impl Category {
    pub fn new(label: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            label: label.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

fn fallback_label() -> String {
    FALLBACK_LABEL.to_string()
}

/// The complete set of keyword tables driving classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Any hit rejects the paper outright
    pub exclusion: Vec<String>,
    /// Any hit is enough to accept (after exclusion)
    pub strong_inclusion: Vec<String>,
    pub representations: Vec<Category>,
    pub techniques: Vec<Category>,
    pub domains: Vec<Category>,
    #[serde(default = "fallback_label")]
    pub fallback_domain: String,
    #[serde(default = "fallback_label")]
    pub fallback_tag: String,
}

impl Policy {
    /// Parse a policy from YAML and validate it
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PolicyError> {
        let policy: Policy = serde_yaml::from_str(yaml)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Load a policy from a YAML file and validate it
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn to_yaml(&self) -> Result<String, PolicyError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check the tables for configuration defects
    pub fn validate(&self) -> Result<(), PolicyError> {
        validate_flat(TableKind::Exclusion, &self.exclusion)?;
        validate_flat(TableKind::StrongInclusion, &self.strong_inclusion)?;
        validate_taxonomy(TableKind::Representation, &self.representations, &self.fallback_tag)?;
        validate_taxonomy(TableKind::Technique, &self.techniques, &self.fallback_tag)?;
        validate_taxonomy(TableKind::Domain, &self.domains, &self.fallback_domain)?;
        Ok(())
    }

    /// The ordered categories of a taxonomy table
    pub fn taxonomy(&self, table: TableKind) -> &[Category] {
        match table {
            TableKind::Representation => &self.representations,
            TableKind::Technique => &self.techniques,
            TableKind::Domain => &self.domains,
            TableKind::Exclusion | TableKind::StrongInclusion => &[],
        }
    }

    /// Every label a taxonomy may assign, fallback included
    pub fn labels(&self, table: TableKind) -> Vec<&str> {
        let fallback = match table {
            TableKind::Domain => self.fallback_domain.as_str(),
            _ => self.fallback_tag.as_str(),
        };
        self.taxonomy(table)
            .iter()
            .map(|c| c.label.as_str())
            .chain(std::iter::once(fallback))
            .collect()
    }

    /// Fail unless `label` is assignable by the given taxonomy
    pub fn require_category(&self, table: TableKind, label: &str) -> Result<(), PolicyError> {
        if self.labels(table).contains(&label) {
            Ok(())
        } else {
            Err(PolicyError::UnknownCategory {
                table,
                label: label.to_string(),
            })
        }
    }
}

fn validate_flat(table: TableKind, keywords: &[String]) -> Result<(), PolicyError> {
    if keywords.is_empty() {
        return Err(PolicyError::EmptyTable(table));
    }
    if keywords.iter().any(|k| k.trim().is_empty()) {
        return Err(PolicyError::BlankKeyword {
            table,
            label: table.to_string(),
        });
    }
    Ok(())
}

fn validate_taxonomy(table: TableKind, categories: &[Category], fallback: &str) -> Result<(), PolicyError> {
    if categories.is_empty() {
        return Err(PolicyError::EmptyTable(table));
    }

    let mut labels = HashSet::new();
    for category in categories {
        if !labels.insert(category.label.as_str()) {
            return Err(PolicyError::DuplicateCategory {
                table,
                label: category.label.clone(),
            });
        }
        if category.keywords.is_empty() {
            return Err(PolicyError::EmptyCategory {
                table,
                label: category.label.clone(),
            });
        }
        if category.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(PolicyError::BlankKeyword {
                table,
                label: category.label.clone(),
            });
        }
    }

    if labels.contains(fallback) {
        return Err(PolicyError::FallbackCollision {
            table,
            label: fallback.to_string(),
        });
    }
    Ok(())
}

fn strings(keywords: &[&str]) -> Vec<String> {
    keywords.iter().map(|k| k.to_string()).collect()
}

/// Geometry-centric CAD/AI tables
impl Default for Policy {
    fn default() -> Self {
        Self {
            exclusion: strings(&[
                // CAE / simulation
                "finite element",
                "FEM",
                "FEA",
                "CAE",
                "structural analysis",
                "stress analysis",
                "modal analysis",
                "thermal analysis",
                "fluid dynamics",
                "CFD",
                // Manufacturing / CAM
                "toolpath",
                "CNC",
                "CAM",
                "machining",
                "additive manufacturing",
                "3D printing",
                "subtractive manufacturing",
                // Materials
                "material properties",
                "material science",
                "metallurgy",
                "composite materials",
                // Robotics without geometry learning
                "robot control",
                "motion planning",
                "path planning",
                "trajectory optimization",
                "manipulation without geometry",
                // Physics simulation
                "physics simulation",
                "rigid body dynamics",
                "collision detection",
                "contact mechanics",
            ]),
            strong_inclusion: strings(&[
                "BREP",
                "B-Rep",
                "boundary representation",
                "sketch",
                "constraint",
                "parametric",
                "feature-based",
                "feature graph",
                "CAD model",
                "solid model",
                "geometric learning",
                "geometry learning",
                "shape representation",
                "shape generation",
                "CAD generation",
                "CAD synthesis",
            ]),
            representations: vec![
                Category::new("BREP", &["brep", "b-rep", "boundary representation", "solid model"]),
                Category::new("Sketch", &["sketch", "drawing", "2d profile"]),
                Category::new("Mesh", &["mesh", "triangular mesh", "polygon mesh"]),
                Category::new("Point Cloud", &["point cloud", "point set"]),
                Category::new("Feature Graph", &["feature graph", "feature tree", "cad graph"]),
                Category::new("Voxel", &["voxel", "volumetric"]),
                Category::new("Implicit", &["implicit", "sdf", "signed distance"]),
            ],
            techniques: vec![
                Category::new("Transformer", &["transformer", "attention", "bert", "gpt"]),
                Category::new("GNN", &["graph neural", "gnn", "graph convolution", "gcn"]),
                Category::new("Diffusion", &["diffusion", "denoising", "score-based"]),
                Category::new("RL", &["reinforcement learning", "rl", "policy"]),
                Category::new("CNN", &["convolutional", "cnn", "resnet", "unet"]),
                Category::new("VAE", &["vae", "variational autoencoder"]),
                Category::new("Hybrid", &["hybrid", "multi-modal"]),
            ],
            domains: vec![
                Category::new(
                    "CAD Geometry Core",
                    &["cad", "parametric", "feature-based", "brep", "solid modeling"],
                ),
                Category::new(
                    "Computer Vision for Geometry",
                    &["image to cad", "vision", "reconstruction", "recognition"],
                ),
                Category::new(
                    "Reinforcement Learning for Geometry",
                    &["reinforcement learning", "rl", "policy", "agent"],
                ),
                Category::new(
                    "Diffusion Models for Geometry",
                    &["diffusion", "denoising", "score-based", "generative"],
                ),
                Category::new(
                    "Multimodal Geometry Models",
                    &["multimodal", "multi-modal", "text to cad", "language"],
                ),
                Category::new("Graph-Based Geometry Learning", &["graph", "gnn", "graph neural"]),
                Category::new(
                    "Sketch / Constraint Understanding",
                    &["sketch", "constraint", "drawing"],
                ),
                Category::new(
                    "Shape Representation Learning",
                    &["shape representation", "geometry representation", "encoding"],
                ),
            ],
            fallback_domain: fallback_label(),
            fallback_tag: fallback_label(),
        }
    }
}
