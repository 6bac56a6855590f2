//! # Scenario Tests
//!
//! End-to-end checks of neighbor ranking, truncation and node enrichment on
//! small hand-built embeddings.

use pixnet_core::export::write_nodes;
use pixnet_core::{
    DefaultAssetLayout, Dataset, ExportOptions, Metadata, Point, build_network, find_neighbors,
};
use serde_json::{Map, Value, json};

fn names(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

// =============================================================================
// RANKING
// =============================================================================

mod ranking {
    use super::*;

    fn four_points() -> Dataset {
        Dataset::new(
            names(&["origin.jpg", "east.jpg", "north.jpg", "far.jpg"]),
            vec![
                Point::xy(0.0, 0.0),
                Point::xy(1.0, 0.0),
                Point::xy(0.0, 1.0),
                Point::xy(5.0, 5.0),
            ],
        )
    }

    /// Equal distances from (0,0): (1,0) at index 1 precedes (0,1) at index 2.
    #[test]
    fn tie_broken_by_lower_index() {
        let options = ExportOptions {
            neighbors: 2,
            ..ExportOptions::default()
        };
        let network =
            build_network(&four_points(), &options, &DefaultAssetLayout::default()).expect("build");

        let from_origin: Vec<_> = network
            .edges
            .iter()
            .filter(|e| e.source == "origin.jpg")
            .map(|e| (e.target.as_str(), e.rank))
            .collect();
        assert_eq!(from_origin, vec![("east.jpg", 1), ("north.jpg", 2)]);
    }

    /// From (5,5): (1,0) and (0,1) tie and keep index order, (0,0) comes last.
    #[test]
    fn far_point_ranks_all_candidates() {
        let dataset = four_points();
        let lists = find_neighbors(dataset.points(), 3).expect("search");
        assert_eq!(lists[3], vec![1, 2, 0]);

        let lists = find_neighbors(dataset.points(), 2).expect("search");
        assert_eq!(lists[3], vec![1, 2]);
    }

    /// In a scalene triangle the nearest-neighbor relation is one-way.
    #[test]
    fn nearest_neighbor_not_symmetric() {
        let dataset = Dataset::new(
            names(&["a", "b", "c"]),
            vec![Point::xy(0.0, 0.0), Point::xy(1.0, 0.0), Point::xy(3.0, 0.5)],
        );
        let options = ExportOptions {
            neighbors: 1,
            ..ExportOptions::default()
        };
        let network =
            build_network(&dataset, &options, &DefaultAssetLayout::default()).expect("build");

        let has = |s: &str, t: &str| network.edges.iter().any(|e| e.source == s && e.target == t);
        assert!(has("c", "b"));
        assert!(!has("b", "c"));
        assert!(has("a", "b") && has("b", "a"));
    }
}

// =============================================================================
// SHAPE MISMATCH
// =============================================================================

mod truncation {
    use super::*;

    /// Five filenames but three positions: graph over the first three.
    #[test]
    fn five_names_three_positions() {
        let dataset = Dataset::new(
            names(&["a", "b", "c", "d", "e"]),
            vec![Point::xy(0.0, 0.0), Point::xy(1.0, 0.0), Point::xy(2.0, 0.0)],
        );
        assert_eq!(dataset.len(), 3);
        assert!(dataset.truncation().is_some());

        let network = build_network(
            &dataset,
            &ExportOptions::default(),
            &DefaultAssetLayout::default(),
        )
        .expect("build");

        assert_eq!(network.edge_count(), 6);
        assert_eq!(network.node_count(), 3);
        assert!(!network.nodes.contains("d"));
        assert!(!network.nodes.contains("e"));
    }
}

// =============================================================================
// NODE ENRICHMENT
// =============================================================================

mod enrichment {
    use super::*;

    fn five_images_one_without_metadata() -> Dataset {
        let ids = ["1.jpg", "2.jpg", "3.jpg", "4.jpg", "5.jpg"];
        let mut metadata = Metadata::new();
        for (i, id) in ids.iter().enumerate() {
            if *id == "3.jpg" {
                continue;
            }
            metadata.insert(
                id.to_string(),
                object(json!({"filename": id, "category": format!("c{i}")})),
            );
        }
        Dataset::new(
            names(&ids),
            (0..5).map(|i| Point::xy(i as f64, (i * i) as f64)).collect(),
        )
        .with_metadata(metadata)
    }

    /// The image without a metadata file keeps only its base columns.
    #[test]
    fn missing_metadata_file_leaves_empty_cells() {
        let options = ExportOptions {
            neighbors: 2,
            include_thumbs: false,
            include_metadata: true,
        };
        let network = build_network(
            &five_images_one_without_metadata(),
            &options,
            &DefaultAssetLayout::default(),
        )
        .expect("build");

        let bare = network.nodes.get("3.jpg").expect("node");
        assert!(bare.metadata.is_empty());
        for id in ["1.jpg", "2.jpg", "4.jpg", "5.jpg"] {
            let node = network.nodes.get(id).expect("node");
            assert!(node.metadata.contains_key("category"));
            assert!(!node.metadata.contains_key("filename"));
        }

        let mut out = Vec::new();
        write_nodes(&mut out, &network.nodes).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("id,category,x,y\n"));
        assert!(text.lines().any(|l| l.starts_with("3.jpg,,")));
    }

    /// Thumbnail columns are present for every node when requested.
    #[test]
    fn thumbnails_attached_to_every_node() {
        let options = ExportOptions {
            neighbors: 2,
            include_thumbs: true,
            include_metadata: false,
        };
        let network = build_network(
            &five_images_one_without_metadata(),
            &options,
            &DefaultAssetLayout::new("/data"),
        )
        .expect("build");

        for node in network.nodes.iter() {
            assert_eq!(node.assets.len(), 2);
        }

        let mut out = Vec::new();
        write_nodes(&mut out, &network.nodes).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.starts_with("id,original,thumb,x,y\n"));
        assert!(text.contains("/data/thumbs/1.jpg"));
    }
}
