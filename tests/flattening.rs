use loam::flattening::{flatten, generate_node_map, Namespace};
use loam::syntax::{BorrowUnordered, Parse, Value};
use loam::{JsonLdProcessor, NoLoader};

fn json(s: &str) -> Value {
	Value::parse_str(s).unwrap().0
}

#[async_std::test]
async fn flatten_assigns_blank_node_labels() {
	let flattened = json(
		r#"{
			"@context": {"name": "http://schema.org/name", "knows": "http://schema.org/knows"},
			"name": "Alice",
			"knows": {"name": "Bob"}
		}"#,
	)
	.flatten(&NoLoader)
	.await
	.unwrap();

	let expected = json(
		r#"[
			{
				"@id": "_:b0",
				"http://schema.org/name": [{"@value": "Alice"}],
				"http://schema.org/knows": [{"@id": "_:b1"}]
			},
			{
				"@id": "_:b1",
				"http://schema.org/name": [{"@value": "Bob"}]
			}
		]"#,
	);
	assert_eq!(flattened.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn flatten_relabels_existing_blank_nodes() {
	let flattened = json(
		r#"[
			{"@id": "_:existing", "http://example.com/p": [{"@id": "_:existing"}]}
		]"#,
	)
	.flatten(&NoLoader)
	.await
	.unwrap();

	let expected = json(
		r#"[
			{"@id": "_:b0", "http://example.com/p": [{"@id": "_:b0"}]}
		]"#,
	);
	assert_eq!(flattened.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn flatten_named_graphs() {
	let flattened = json(
		r#"[
			{
				"@id": "http://example.com/graph",
				"@graph": [
					{"@id": "http://example.com/a", "http://example.com/p": [{"@value": 1}]}
				]
			}
		]"#,
	)
	.flatten(&NoLoader)
	.await
	.unwrap();

	// The graph name becomes a shell node of the default graph, carrying
	// the graph's nodes under `@graph`.
	let expected = json(
		r#"[
			{
				"@id": "http://example.com/graph",
				"@graph": [
					{"@id": "http://example.com/a", "http://example.com/p": [{"@value": 1}]}
				]
			}
		]"#,
	);
	assert_eq!(flattened.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn flatten_merges_duplicate_subjects() {
	let flattened = json(
		r#"[
			{"@id": "http://example.com/a", "http://example.com/p": [{"@value": 1}]},
			{"@id": "http://example.com/a", "http://example.com/p": [{"@value": 1}, {"@value": 2}]}
		]"#,
	)
	.flatten(&NoLoader)
	.await
	.unwrap();

	// Values are de-duplicated by structural equality.
	let expected = json(
		r#"[
			{"@id": "http://example.com/a", "http://example.com/p": [{"@value": 1}, {"@value": 2}]}
		]"#,
	);
	assert_eq!(flattened.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn flatten_reverse_properties() {
	let flattened = json(
		r#"[
			{
				"@id": "http://example.com/a",
				"@reverse": {
					"http://example.com/parent": [{"@id": "http://example.com/b"}]
				}
			}
		]"#,
	)
	.flatten(&NoLoader)
	.await
	.unwrap();

	// The reverse property becomes a forward edge of the referenced node.
	let expected = json(
		r#"[
			{
				"@id": "http://example.com/b",
				"http://example.com/parent": [{"@id": "http://example.com/a"}]
			}
		]"#,
	);
	assert_eq!(flattened.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn flatten_lists() {
	let flattened = json(
		r#"[
			{
				"@id": "http://example.com/a",
				"http://example.com/p": [
					{"@list": [{"@value": "x"}, {"@id": "http://example.com/b", "http://example.com/q": [{"@value": 1}]}]}
				]
			}
		]"#,
	)
	.flatten(&NoLoader)
	.await
	.unwrap();

	// Node objects inside lists are registered and replaced by subject
	// references.
	let expected = json(
		r#"[
			{
				"@id": "http://example.com/a",
				"http://example.com/p": [
					{"@list": [{"@value": "x"}, {"@id": "http://example.com/b"}]}
				]
			},
			{
				"@id": "http://example.com/b",
				"http://example.com/q": [{"@value": 1}]
			}
		]"#,
	);
	assert_eq!(flattened.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn flattening_is_idempotent() {
	let document = json(
		r#"{
			"@context": {"name": "http://schema.org/name", "knows": "http://schema.org/knows"},
			"@id": "http://example.com/alice",
			"name": "Alice",
			"knows": {"@id": "http://example.com/bob", "name": "Bob"}
		}"#,
	);

	let flattened = document.flatten(&NoLoader).await.unwrap();
	let re_flattened = flattened.flatten(&NoLoader).await.unwrap();

	assert_eq!(re_flattened.as_unordered(), flattened.as_unordered());
}

#[test]
fn node_map_generation_is_stable() {
	// Running Node Map Generation twice on the same input with a reset
	// allocator yields isomorphic node maps.
	let expanded = json(
		r#"[
			{"http://example.com/p": [{"http://example.com/q": [{"@value": 1}]}]}
		]"#,
	);

	let first = generate_node_map(&expanded, &mut Namespace::new()).unwrap();
	let second = generate_node_map(&expanded, &mut Namespace::new()).unwrap();

	let first_nodes: Vec<_> = first
		.graph(None)
		.unwrap()
		.nodes()
		.map(|(id, node)| (id.to_string(), Value::Object(node.clone())))
		.collect();
	let second_nodes: Vec<_> = second
		.graph(None)
		.unwrap()
		.nodes()
		.map(|(id, node)| (id.to_string(), Value::Object(node.clone())))
		.collect();

	assert_eq!(first_nodes, second_nodes);
}

#[test]
fn conflicting_indexes_are_rejected() {
	let expanded = json(
		r#"[
			{"@id": "http://example.com/a", "@index": "x"},
			{"@id": "http://example.com/a", "@index": "y"}
		]"#,
	);

	let result = flatten(&expanded);

	match result {
		Err(e) => assert_eq!(e.code(), loam::ErrorCode::ConflictingIndexes),
		Ok(_) => panic!("flattening should fail"),
	}
}

#[async_std::test]
async fn flatten_with_context_compacts() {
	let flattened = json(
		r#"{
			"@context": {"name": "http://schema.org/name"},
			"@id": "http://example.com/alice",
			"name": "Alice"
		}"#,
	)
	.flatten_with(&json(r#"{"name": "http://schema.org/name"}"#), &NoLoader)
	.await
	.unwrap();

	let expected = json(
		r#"{
			"@context": {"name": "http://schema.org/name"},
			"@id": "http://example.com/alice",
			"name": "Alice"
		}"#,
	);
	assert_eq!(flattened.as_unordered(), expected.as_unordered());
}
