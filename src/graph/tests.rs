//! Build and serialization tests against snapshot fixtures

use serde_json::{json, Value};

/// Fixture: the single-paper corpus from the render contract
fn tagged_paper_fixture() -> Value {
    json!({
        "arxiv_id": "1234",
        "title": "A BREP Transformer for CAD Generation",
        "abstract": "We use a transformer on boundary representation graphs for CAD generation.",
        "authors": ["A. Smith", "B. Lee"],
        "published_date": "2024-01-01",
        "pdf_link": "https://arxiv.org/pdf/1234",
        "domain": "CAD Geometry Core",
        "techniques": ["Transformer"],
        "representations": ["BREP"]
    })
}

/// Fixture: the paper node the render collaborator expects
fn paper_node_fixture() -> Value {
    json!({
        "id": "paper:1234",
        "type": "paper",
        "properties": {
            "arxiv_id": "1234",
            "title": "A BREP Transformer for CAD Generation",
            "abstract": "We use a transformer on boundary representation graphs for CAD generation.",
            "published_date": "2024-01-01",
            "pdf_link": "https://arxiv.org/pdf/1234",
            "citation_count": 0,
            "venue": "arXiv",
            "year": "2024"
        }
    })
}

#[cfg(test)]
mod build_tests {
    use super::*;
    use crate::classify::Policy;
    use crate::corpus::Paper;
    use crate::graph::{build_graph, EdgeType, GraphBuilder, GraphError, NodeKey, NodeKind};

    fn paper(value: Value) -> Paper {
        serde_json::from_value(value).unwrap()
    }

    fn tagged(id: &str, authors: &[&str], domain: &str, techniques: &[&str], representations: &[&str]) -> Paper {
        let mut value = tagged_paper_fixture();
        value["arxiv_id"] = json!(id);
        value["authors"] = json!(authors);
        value["domain"] = json!(domain);
        value["techniques"] = json!(techniques);
        value["representations"] = json!(representations);
        paper(value)
    }

    #[test]
    fn single_paper_counts() {
        let graph = build_graph(&[paper(tagged_paper_fixture())]).unwrap();

        assert_eq!(graph.nodes_of(NodeKind::Paper).count(), 1);
        assert_eq!(graph.nodes_of(NodeKind::Author).count(), 2);
        assert_eq!(graph.nodes_of(NodeKind::Domain).count(), 1);
        assert_eq!(graph.nodes_of(NodeKind::Technique).count(), 1);
        assert_eq!(graph.nodes_of(NodeKind::Representation).count(), 1);
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.edges_of(EdgeType::Authored).count(), 2);
        assert_eq!(graph.edges_of(EdgeType::BelongsToDomain).count(), 1);
        assert_eq!(graph.edges_of(EdgeType::UsesTechnique).count(), 1);
        assert_eq!(graph.edges_of(EdgeType::UsesRepresentation).count(), 1);

        assert_eq!(graph.metadata.total_papers, 1);
        assert_eq!(graph.metadata.total_nodes, 6);
        assert_eq!(graph.metadata.total_edges, 5);
    }

    #[test]
    fn paper_node_matches_fixture() {
        let graph = build_graph(&[paper(tagged_paper_fixture())]).unwrap();
        let node = graph.node(&NodeKey::new(NodeKind::Paper, "1234")).unwrap();
        assert_eq!(serde_json::to_value(node).unwrap(), paper_node_fixture());
    }

    #[test]
    fn enrichment_fields_flow_into_paper_node() {
        let mut value = tagged_paper_fixture();
        value["citation_count"] = json!(42);
        value["venue"] = json!("SIGGRAPH");
        value["year"] = json!(2025);
        let graph = build_graph(&[paper(value)]).unwrap();

        let node = serde_json::to_value(&graph.nodes[0]).unwrap();
        assert_eq!(node["properties"]["citation_count"], 42);
        assert_eq!(node["properties"]["venue"], "SIGGRAPH");
        assert_eq!(node["properties"]["year"], "2025");
    }

    #[test]
    fn snapshot_serializes_three_sections() {
        let graph = build_graph(&[paper(tagged_paper_fixture())]).unwrap();
        let json = serde_json::to_value(&graph).unwrap();

        assert!(json["nodes"].is_array());
        assert!(json["edges"].is_array());
        assert_eq!(json["metadata"]["top_authors"], json!([["A. Smith", 1], ["B. Lee", 1]]));
        assert_eq!(json["metadata"]["domain_distribution"], json!({"CAD Geometry Core": 1}));

        let back: crate::graph::GraphSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, graph);
    }

    #[test]
    fn shared_nodes_are_not_duplicated() {
        let corpus = vec![
            tagged("1", &["A. Smith"], "CAD Geometry Core", &["GNN"], &["BREP"]),
            tagged("2", &["A. Smith", "C. Wu"], "CAD Geometry Core", &["GNN", "Transformer"], &["Mesh"]),
        ];
        let graph = build_graph(&corpus).unwrap();

        assert_eq!(graph.metadata.total_papers, 2);
        assert_eq!(graph.metadata.total_authors, 2);
        assert_eq!(graph.metadata.total_domains, 1);
        assert_eq!(graph.metadata.total_techniques, 2);
        assert_eq!(graph.metadata.total_representations, 2);
        assert_eq!(graph.metadata.top_authors[0], ("A. Smith".to_string(), 2));
        assert_eq!(graph.metadata.technique_distribution.get("GNN"), Some(&2));
        assert_eq!(graph.metadata.domain_distribution.get("CAD Geometry Core"), Some(&2));
    }

    #[test]
    fn author_variants_collide_on_one_node() {
        let corpus = vec![
            tagged("1", &["A.  Smith"], "Other", &["Other"], &["Other"]),
            tagged("2", &["A. Smith"], "Other", &["Other"], &["Other"]),
        ];
        let graph = build_graph(&corpus).unwrap();

        assert_eq!(graph.metadata.total_authors, 1);
        let author = graph.node(&NodeKey::new(NodeKind::Author, "A. Smith")).unwrap();
        assert_eq!(author.display_name(), "A. Smith");
        assert_eq!(graph.metadata.top_authors, vec![("A. Smith".to_string(), 2)]);
    }

    #[test]
    fn repeated_author_on_one_paper_keeps_both_edges() {
        let corpus = vec![tagged("1", &["A. Smith", "A. Smith"], "Other", &["Other"], &["Other"])];
        let graph = build_graph(&corpus).unwrap();
        assert_eq!(graph.metadata.total_authors, 1);
        assert_eq!(graph.edges_of(EdgeType::Authored).count(), 2);
    }

    #[test]
    fn untagged_record_is_a_schema_error() {
        let mut value = tagged_paper_fixture();
        value.as_object_mut().unwrap().remove("techniques");
        let corpus = vec![paper(tagged_paper_fixture()), paper(value)];

        match build_graph(&corpus).unwrap_err() {
            GraphError::MissingTag { position, field, .. } => {
                assert_eq!(position, 1);
                assert_eq!(field, "techniques");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn empty_tag_list_is_a_schema_error() {
        let corpus = vec![tagged("1", &[], "Other", &[], &["Other"])];
        assert!(matches!(
            build_graph(&corpus),
            Err(GraphError::EmptyTag { field: "techniques", .. })
        ));
    }

    #[test]
    fn taxonomy_check_rejects_unknown_labels() {
        let builder = GraphBuilder::with_taxonomy(&Policy::default());
        builder.build(&[paper(tagged_paper_fixture())]).unwrap();

        let corpus = vec![tagged("1", &[], "Quantum Geometry", &["Other"], &["Other"])];
        assert!(matches!(builder.build(&corpus), Err(GraphError::Taxonomy { position: 0, .. })));
    }

    #[test]
    fn empty_corpus_builds_empty_graph() {
        let graph = build_graph(&[]).unwrap();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.metadata.top_authors.is_empty());
    }

    #[test]
    fn rebuild_is_identical() {
        let corpus = vec![
            tagged("1", &["A. Smith"], "CAD Geometry Core", &["GNN"], &["BREP"]),
            tagged("2", &["C. Wu"], "Other", &["Other"], &["Mesh"]),
        ];
        let first = serde_json::to_string(&build_graph(&corpus).unwrap()).unwrap();
        let second = serde_json::to_string(&build_graph(&corpus).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn duplicate_id_keeps_same_node_in_any_order() {
        let mut first = tagged("7", &["A. Smith"], "Other", &["Other"], &["Mesh"]);
        first.title = "first".to_string();
        let mut second = first.clone();
        second.title = "second".to_string();

        let forward = build_graph(&[first.clone(), second.clone()]).unwrap();
        let backward = build_graph(&[second, first]).unwrap();

        assert_eq!(forward.nodes, backward.nodes);
        assert_eq!(forward.sorted_edges(), backward.sorted_edges());
        let node = forward.node(&NodeKey::new(NodeKind::Paper, "7")).unwrap();
        assert_eq!(node.display_name(), "first");
        assert_eq!(forward.metadata.total_papers, 1);
    }

    #[test]
    fn label_spelling_variants_share_distribution_entry() {
        let corpus = vec![
            tagged("1", &["A. Smith"], "Other", &["Other"], &["Point_Cloud"]),
            tagged("2", &["B. Lee"], "Other", &["Other"], &["Point Cloud"]),
        ];
        let graph = build_graph(&corpus).unwrap();

        assert_eq!(graph.metadata.total_representations, 1);
        assert_eq!(
            graph.metadata.representation_distribution,
            [("Point Cloud".to_string(), 2)].into_iter().collect()
        );
    }
}
