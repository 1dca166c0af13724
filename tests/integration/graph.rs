//! Graph structure as exposed to the `graph` command.

use crate::fixtures::{Workspace, CLASSIFY};
use scriptgen::core::{EdgeKind, GraphSummary};

#[test]
fn test_classify_graph_edges() {
    let workspace = Workspace::new();
    let plan = workspace
        .generator("classify.toml", CLASSIFY)
        .unwrap()
        .plan()
        .unwrap();
    let graph = &plan.graph;
    let root = plan.root.name();

    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edge(root, "infer"), None);
    assert_eq!(graph.edge("infer", root), Some(EdgeKind::Dependency));
    assert_eq!(graph.edge("loadLabels", root), Some(EdgeKind::Dependency));
    assert_eq!(graph.edge("loadImage", "infer"), Some(EdgeKind::Variable));
    assert_eq!(graph.edge("makeSession", "infer"), Some(EdgeKind::Variable));
    assert_eq!(graph.edge_count(), 4);
}

#[test]
fn test_adjacency_list() {
    let workspace = Workspace::new();
    let plan = workspace
        .generator("classify.toml", CLASSIFY)
        .unwrap()
        .plan()
        .unwrap();
    let root = plan.root.name().to_string();

    assert_eq!(
        plan.graph.adjacency_list(),
        vec![
            format!("loadLabels -> {}", root),
            "loadImage -> infer".to_string(),
            "makeSession -> infer".to_string(),
            format!("infer -> {}", root),
            format!("{} -> ", root),
        ]
    );
}

#[test]
fn test_summary_json() {
    let workspace = Workspace::new();
    let plan = workspace
        .generator("classify.toml", CLASSIFY)
        .unwrap()
        .plan()
        .unwrap();

    let json = serde_json::to_string(&plan.graph.summary()).unwrap();
    assert!(json.contains(r#""kind":"variable""#));
    assert!(json.contains(r#""kind":"dependency""#));

    let parsed: GraphSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, plan.graph.summary());
    assert_eq!(parsed.nodes[..4], ["loadLabels", "loadImage", "makeSession", "infer"]);
}
