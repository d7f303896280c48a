//! Graph snapshot properties over classified corpora

mod common;

use common::{feed_day_one, feed_day_two, raw};
use papergraph::{build_graph, classify, EdgeType, NodeKey, NodeKind, Paper, Policy, SeenSet};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

fn corpus() -> Vec<Paper> {
    let policy = Policy::default();
    let first = classify(feed_day_one(), &SeenSet::new(), &policy).unwrap();
    let second = classify(feed_day_two(), &first.seen, &policy).unwrap();
    first.accepted.into_iter().chain(second.accepted).collect()
}

#[test]
fn node_set_is_independent_of_corpus_order() {
    let papers = corpus();
    let reference = build_graph(&papers).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..10 {
        let mut shuffled = papers.clone();
        shuffled.shuffle(&mut rng);
        let graph = build_graph(&shuffled).unwrap();

        assert_eq!(graph.nodes, reference.nodes);
        assert_eq!(graph.sorted_edges(), reference.sorted_edges());
        assert_eq!(graph.metadata.total_nodes, reference.metadata.total_nodes);
        assert_eq!(graph.metadata.domain_distribution, reference.metadata.domain_distribution);
    }
}

#[test]
fn totals_match_corpus_and_node_kinds() {
    let papers = corpus();
    let graph = build_graph(&papers).unwrap();
    let meta = &graph.metadata;

    assert_eq!(meta.total_papers, papers.len());
    assert_eq!(meta.total_papers, 3);
    // A. Smith, B. Lee, D. Park, F. Rossi
    assert_eq!(meta.total_authors, 4);
    for kind in NodeKind::ALL {
        assert_eq!(meta.total_for(kind), graph.nodes_of(kind).count(), "{:?}", kind);
    }
    assert_eq!(meta.total_nodes, graph.node_count());
    assert_eq!(meta.total_edges, graph.edge_count());
}

#[test]
fn every_paper_has_one_domain_edge() {
    let graph = build_graph(&corpus()).unwrap();
    let domain_edges: Vec<_> = graph.edges_of(EdgeType::BelongsToDomain).collect();
    assert_eq!(domain_edges.len(), 3);

    for paper in graph.nodes_of(NodeKind::Paper) {
        let count = domain_edges.iter().filter(|e| e.source == paper.id).count();
        assert_eq!(count, 1, "{}", paper.id);
    }
}

#[test]
fn shared_author_counted_per_paper() {
    let graph = build_graph(&corpus()).unwrap();
    let top = &graph.metadata.top_authors;

    assert_eq!(top[0], ("A. Smith".to_string(), 2));
    assert_eq!(top[1], ("B. Lee".to_string(), 2));
    assert_eq!(top.len(), 4);
}

#[test]
fn edges_reference_existing_nodes() {
    let graph = build_graph(&corpus()).unwrap();
    for edge in &graph.edges {
        assert!(graph.node(&edge.source).is_some(), "dangling source {}", edge.source);
        assert!(graph.node(&edge.target).is_some(), "dangling target {}", edge.target);
        let (source, target) = edge.relationship.endpoints();
        assert_eq!(edge.source.kind(), source);
        assert_eq!(edge.target.kind(), target);
    }
}

#[test]
fn fallback_labels_become_nodes() {
    let policy = Policy::default();
    // Matches a representation keyword but nothing in the technique table
    let outcome = classify(
        vec![raw("9", "Voxel shapes", "Occupancy on a voxel grid.", &["H. Kim"])],
        &SeenSet::new(),
        &policy,
    )
    .unwrap();
    let graph = build_graph(&outcome.accepted).unwrap();

    assert!(graph.node(&NodeKey::new(NodeKind::Domain, "Other")).is_some());
    assert!(graph.node(&NodeKey::new(NodeKind::Technique, "Other")).is_some());
    assert!(graph.node(&NodeKey::new(NodeKind::Representation, "Voxel")).is_some());
}
