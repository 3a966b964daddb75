//! Classification predicates over the JSON-LD internal representation.
//!
//! These are pure, total functions over JSON fragments, used by the
//! compaction and flattening algorithms to dispatch on the shape of an
//! expanded document node.
use json_syntax::{Object, Value};

fn has_key(object: &Object, key: &str) -> bool {
	object.iter().any(|entry| entry.key.as_str() == key)
}

/// Returns the value of the given entry, if any.
///
/// Maps are expected to have unique keys; the first matching entry wins.
pub(crate) fn get<'a>(object: &'a Object, key: &str) -> Option<&'a Value> {
	object
		.iter()
		.find(|entry| entry.key.as_str() == key)
		.map(|entry| &entry.value)
}

/// Returns a mutable reference to the value of the given entry, if any.
pub(crate) fn get_mut<'a>(object: &'a mut Object, key: &str) -> Option<&'a mut Value> {
	object
		.iter_mut()
		.find(|(entry_key, _)| entry_key.as_str() == key)
		.map(|(_, value)| value)
}

/// Removes the given entry, returning its value.
pub(crate) fn remove(object: &mut Object, key: &str) -> Option<Value> {
	object
		.remove_unique(key)
		.ok()
		.flatten()
		.map(|entry| entry.value)
}

/// Checks if the given value is a value object (a map containing `@value`).
pub fn is_value_object(value: &Value) -> bool {
	match value.as_object() {
		Some(o) => has_key(o, "@value"),
		None => false,
	}
}

/// Checks if the given value is a list object (a map containing `@list`).
pub fn is_list_object(value: &Value) -> bool {
	match value.as_object() {
		Some(o) => has_key(o, "@list"),
		None => false,
	}
}

/// Checks if the given value is a set object (a map containing `@set`).
pub fn is_set_object(value: &Value) -> bool {
	match value.as_object() {
		Some(o) => has_key(o, "@set"),
		None => false,
	}
}

/// Checks if the given value is a graph object.
///
/// A graph object is a map containing `@graph` whose only other allowed
/// entries are `@id` and `@index`.
pub fn is_graph_object(value: &Value) -> bool {
	match value.as_object() {
		Some(o) => {
			has_key(o, "@graph")
				&& o.iter()
					.all(|entry| matches!(entry.key.as_str(), "@graph" | "@id" | "@index"))
		}
		None => false,
	}
}

/// Checks if the given value is a simple graph object: a graph object
/// without `@id`.
pub fn is_simple_graph_object(value: &Value) -> bool {
	match value.as_object() {
		Some(o) => is_graph_object(value) && !has_key(o, "@id"),
		None => false,
	}
}

/// Checks if the given value is a subject reference (a map whose sole entry
/// is `@id`).
pub fn is_subject_reference(value: &Value) -> bool {
	match value.as_object() {
		Some(o) => o.len() == 1 && has_key(o, "@id"),
		None => false,
	}
}

/// Checks if the given value is a node object.
///
/// A node object is a map that is neither a value, list, set nor graph
/// object, and that either has more than one entry or whose single entry is
/// not `@id`.
pub fn is_node_object(value: &Value) -> bool {
	match value.as_object() {
		Some(o) => {
			!has_key(o, "@value")
				&& !has_key(o, "@list")
				&& !has_key(o, "@set")
				&& !has_key(o, "@graph")
				&& (o.len() > 1 || !has_key(o, "@id"))
		}
		None => false,
	}
}

/// Checks if the given value could denote a blank node.
///
/// A map is a potential blank node when its `@id` is a blank node
/// identifier, when it has no entries at all, or when it has entries other
/// than `@value`, `@set` and `@list`. An absent `@id` does not rule a blank
/// node out; flattening assigns a fresh label to such maps regardless of
/// this predicate.
pub fn is_blank_node(value: &Value) -> bool {
	match value.as_object() {
		Some(o) => match get(o, "@id") {
			Some(id) => matches!(id.as_str(), Some(id) if id.starts_with("_:")),
			None => {
				o.is_empty()
					|| o.iter()
						.any(|entry| !matches!(entry.key.as_str(), "@value" | "@set" | "@list"))
			}
		},
		None => false,
	}
}

/// Returns the `@id` entry value of the given map, if it is a string.
pub fn node_id(value: &Value) -> Option<&str> {
	value
		.as_object()
		.and_then(|o| get(o, "@id"))
		.and_then(Value::as_str)
}

/// Returns the `@index` entry value of the given map, if it is a string.
pub fn node_index(value: &Value) -> Option<&str> {
	value
		.as_object()
		.and_then(|o| get(o, "@index"))
		.and_then(Value::as_str)
}
