use super::Namespace;
use crate::object;
use crate::syntax::{ErrorCode, Object, Value};
use indexmap::IndexMap;
use json_syntax::object::Entry;

/// Multiple conflicting indexes have been found for the same node.
#[derive(Debug, thiserror::Error)]
#[error("conflicting indexes `{defined_index}` and `{conflicting_index}` for node `{node_id}`")]
pub struct ConflictingIndexes {
	pub node_id: String,
	pub defined_index: String,
	pub conflicting_index: String,
}

impl ConflictingIndexes {
	/// Returns the stable code of this error.
	pub fn code(&self) -> ErrorCode {
		ErrorCode::ConflictingIndexes
	}
}

/// Nodes of a single graph, registered by identifier.
#[derive(Default)]
pub struct NodeMapGraph {
	nodes: IndexMap<String, Object>,
}

impl NodeMapGraph {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains(&self, id: &str) -> bool {
		self.nodes.contains_key(id)
	}

	pub fn get(&self, id: &str) -> Option<&Object> {
		self.nodes.get(id)
	}

	pub fn get_mut(&mut self, id: &str) -> Option<&mut Object> {
		self.nodes.get_mut(id)
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Registers the node `id`, merging the given index.
	///
	/// Registering a node twice with different indexes is a
	/// `conflicting_indexes` error.
	pub fn declare_node(
		&mut self,
		id: &str,
		index: Option<&str>,
	) -> Result<&mut Object, ConflictingIndexes> {
		if let Some(entry) = self.nodes.get_mut(id) {
			match (object::get(entry, "@index").and_then(Value::as_str), index) {
				(Some(entry_index), Some(index)) => {
					if entry_index != index {
						return Err(ConflictingIndexes {
							node_id: id.to_string(),
							defined_index: entry_index.to_string(),
							conflicting_index: index.to_string(),
						});
					}
				}
				(None, Some(index)) => {
					entry.insert("@index".into(), Value::String(index.into()));
				}
				_ => (),
			}
		} else {
			let mut node = Object::default();
			node.insert("@id".into(), Value::String(id.into()));
			if let Some(index) = index {
				node.insert("@index".into(), Value::String(index.into()));
			}

			self.nodes.insert(id.to_string(), node);
		}

		Ok(self.nodes.get_mut(id).unwrap())
	}

	pub fn nodes(&self) -> impl Iterator<Item = (&str, &Object)> {
		self.nodes.iter().map(|(id, node)| (id.as_str(), node))
	}

	pub fn into_nodes(self) -> impl Iterator<Item = Object> {
		self.nodes.into_values()
	}
}

/// Graph-indexed node map.
#[derive(Default)]
pub struct NodeMap {
	default_graph: NodeMapGraph,
	graphs: IndexMap<String, NodeMapGraph>,
}

impl NodeMap {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn graph(&self, id: Option<&str>) -> Option<&NodeMapGraph> {
		match id {
			Some(id) => self.graphs.get(id),
			None => Some(&self.default_graph),
		}
	}

	/// Returns the given graph, creating it if necessary.
	pub fn graph_mut(&mut self, id: Option<&str>) -> &mut NodeMapGraph {
		match id {
			Some(id) => self.graphs.entry(id.to_string()).or_default(),
			None => &mut self.default_graph,
		}
	}

	pub fn into_parts(self) -> (NodeMapGraph, IndexMap<String, NodeMapGraph>) {
		(self.default_graph, self.graphs)
	}
}

/// Node Map Generation.
///
/// Builds a graph-indexed node map from the given expanded document, with
/// fresh blank-node labels drawn from `namespace`.
pub fn generate_node_map(
	expanded: &Value,
	namespace: &mut Namespace,
) -> Result<NodeMap, ConflictingIndexes> {
	let mut node_map = NodeMap::new();

	for item in Value::force_as_array(expanded) {
		extend_node_map(namespace, &mut node_map, item, None)?;
	}

	Ok(node_map)
}

/// Renames blank node identifiers; other identifiers pass through. A missing
/// identifier is given a fresh label.
fn rename(namespace: &mut Namespace, id: Option<&str>) -> String {
	match id {
		Some(id) if id.starts_with("_:") => namespace.assign(Some(id)).to_string(),
		Some(id) => id.to_string(),
		None => namespace.assign(None).to_string(),
	}
}

/// Appends `value` to the array entry `key` of `node`, by value-equal
/// de-duplication against the existing values.
fn add_unique(node: &mut Object, key: &str, value: Value) {
	if object::get(node, key).is_none() {
		node.insert(key.into(), Value::Array(Vec::new()));
	}

	if let Some(Value::Array(array)) = object::get_mut(node, key) {
		if !array.contains(&value) {
			array.push(value)
		}
	}
}

/// Extends the node map with the given element of an expanded document.
///
/// Returns the flattened stand-in for the element: value objects are kept
/// (with relabeled blank `@type`s), list objects recurse into their items,
/// and node objects are registered in the active graph and replaced by a
/// subject reference.
pub(crate) fn extend_node_map(
	namespace: &mut Namespace,
	node_map: &mut NodeMap,
	element: &Value,
	active_graph: Option<&str>,
) -> Result<Value, ConflictingIndexes> {
	match element.as_object() {
		Some(object) => {
			if object::get(object, "@value").is_some() {
				// Value objects are kept as is, with blank node `@type`s
				// relabeled.
				let mut flat_value = Object::default();
				for entry in object.iter() {
					match entry.key.as_str() {
						"@type" => {
							let ty = match entry.value.as_str() {
								Some(ty) if ty.starts_with("_:") => {
									Value::String(namespace.assign(Some(ty)).as_str().into())
								}
								_ => entry.value.clone(),
							};
							flat_value.insert("@type".into(), ty);
						}
						_ => {
							flat_value.insert(entry.key.clone(), entry.value.clone());
						}
					}
				}

				Ok(Value::Object(flat_value))
			} else if let Some(list) = object::get(object, "@list") {
				// List objects recurse into their items.
				let mut flat_list = Vec::new();

				for item in Value::force_as_array(list) {
					flat_list.push(extend_node_map(namespace, node_map, item, active_graph)?);
				}

				let mut flat_object = Object::default();
				flat_object.insert("@list".into(), Value::Array(flat_list));
				if let Some(index) = object::get(object, "@index") {
					flat_object.insert("@index".into(), index.clone());
				}

				Ok(Value::Object(flat_object))
			} else {
				extend_node_map_from_node(namespace, node_map, object, active_graph)
			}
		}
		None => Ok(element.clone()),
	}
}

/// Registers a node object in the node map, returning a subject reference
/// to it.
fn extend_node_map_from_node(
	namespace: &mut Namespace,
	node_map: &mut NodeMap,
	node: &Object,
	active_graph: Option<&str>,
) -> Result<Value, ConflictingIndexes> {
	let id = rename(
		namespace,
		object::get(node, "@id").and_then(Value::as_str),
	);

	let index = object::get(node, "@index").and_then(Value::as_str);
	node_map.graph_mut(active_graph).declare_node(&id, index)?;

	// `@type` values are merged in, relabeling blank node identifiers.
	if let Some(types) = object::get(node, "@type") {
		let flat_types: Vec<Value> = Value::force_as_array(types)
			.iter()
			.filter_map(Value::as_str)
			.map(|ty| {
				if ty.starts_with("_:") {
					Value::String(namespace.assign(Some(ty)).as_str().into())
				} else {
					Value::String(ty.into())
				}
			})
			.collect();

		let flat_node = node_map.graph_mut(active_graph).get_mut(&id).unwrap();
		for ty in flat_types {
			add_unique(flat_node, "@type", ty)
		}
	}

	// Reverse properties set up an inverse edge: each referenced node gains
	// a forward property pointing back at this node.
	if let Some(Value::Object(reverse_properties)) = object::get(node, "@reverse") {
		let mut subject_reference = Object::default();
		subject_reference.insert("@id".into(), Value::String(id.as_str().into()));
		let subject_reference = Value::Object(subject_reference);

		for Entry {
			key: property,
			value: values,
		} in reverse_properties.iter()
		{
			for value in Value::force_as_array(values) {
				if let Some(value_object) = value.as_object() {
					let reference =
						extend_node_map_from_node(namespace, node_map, value_object, active_graph)?;

					if let Some(value_id) = object::node_id(&reference) {
						let value_id = value_id.to_string();
						let referenced_node = node_map
							.graph_mut(active_graph)
							.get_mut(&value_id)
							.unwrap();

						add_unique(
							referenced_node,
							property.as_str(),
							subject_reference.clone(),
						)
					}
				}
			}
		}
	}

	// `@graph` entries recurse with this node's identifier as the new
	// active graph.
	if let Some(graph) = object::get(node, "@graph") {
		node_map.graph_mut(Some(&id));

		for item in Value::force_as_array(graph) {
			extend_node_map(namespace, node_map, item, Some(&id))?;
		}
	}

	// `@included` entries recurse in the same graph.
	if let Some(included) = object::get(node, "@included") {
		for item in Value::force_as_array(included) {
			extend_node_map(namespace, node_map, item, active_graph)?;
		}
	}

	// Remaining properties, ordered lexicographically. Blank node
	// identifiers used as properties are relabeled.
	let mut properties: Vec<&Entry> = node
		.iter()
		.filter(|entry| {
			!matches!(
				entry.key.as_str(),
				"@id" | "@type" | "@index" | "@reverse" | "@graph" | "@included"
			)
		})
		.collect();

	properties.sort_by(|a, b| a.key.cmp(&b.key));

	for entry in properties {
		let property = if entry.key.as_str().starts_with("_:") {
			namespace.assign(Some(entry.key.as_str())).to_string()
		} else {
			entry.key.as_str().to_string()
		};

		for item in Value::force_as_array(&entry.value) {
			let flat_item = extend_node_map(namespace, node_map, item, active_graph)?;

			let flat_node = node_map.graph_mut(active_graph).get_mut(&id).unwrap();
			add_unique(flat_node, &property, flat_item)
		}
	}

	let mut subject_reference = Object::default();
	subject_reference.insert("@id".into(), Value::String(id.as_str().into()));
	Ok(Value::Object(subject_reference))
}
