//! Flattening algorithm and related types.
//!
//! Flattening builds a graph-indexed node map from an expanded document and
//! emits the flattened form: an array of subject-labeled nodes, with named
//! graphs attached to shell nodes carrying the graph name.
mod namespace;
mod node_map;

pub use namespace::Namespace;
pub use node_map::{generate_node_map, ConflictingIndexes, NodeMap, NodeMapGraph};

use crate::object;
use crate::syntax::{Object, Value};

/// Flattens the given expanded document.
///
/// A fresh blank node namespace is allocated for the run, so running the
/// algorithm twice on the same input yields isomorphic results.
pub fn flatten(expanded: &Value) -> Result<Value, ConflictingIndexes> {
	let mut namespace = Namespace::new();
	let node_map = generate_node_map(expanded, &mut namespace)?;
	Ok(flatten_node_map(node_map))
}

/// Emits the flattened form of the given node map.
///
/// Graphs are ordered lexicographically (default graph first), and nodes by
/// identifier. Nodes whose only entry is `@id` are skipped.
pub fn flatten_node_map(node_map: NodeMap) -> Value {
	let (mut default_graph, named_graphs) = node_map.into_parts();

	let mut named_graphs: Vec<_> = named_graphs.into_iter().collect();
	named_graphs.sort_by(|(a, _), (b, _)| a.cmp(b));

	for (graph_id, graph) in named_graphs {
		// The graph name becomes a shell node of the default graph,
		// carrying the graph's nodes under `@graph`.
		if default_graph.declare_node(&graph_id, None).is_err() {
			continue;
		}

		let mut nodes: Vec<Object> = graph
			.into_nodes()
			.filter(|node| !is_id_only(node))
			.collect();
		nodes.sort_by(|a, b| node_id_of(a).cmp(&node_id_of(b)));

		let entry = default_graph.get_mut(&graph_id).unwrap();
		entry.insert(
			"@graph".into(),
			Value::Array(nodes.into_iter().map(Value::Object).collect()),
		);
	}

	let mut nodes: Vec<Object> = default_graph
		.into_nodes()
		.filter(|node| !is_id_only(node))
		.collect();
	nodes.sort_by(|a, b| node_id_of(a).cmp(&node_id_of(b)));

	Value::Array(nodes.into_iter().map(Value::Object).collect())
}

fn is_id_only(node: &Object) -> bool {
	node.len() == 1 && object::get(node, "@id").is_some()
}

fn node_id_of(node: &Object) -> Option<String> {
	object::get(node, "@id")
		.and_then(Value::as_str)
		.map(ToOwned::to_owned)
}
