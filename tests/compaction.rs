use loam::syntax::{BorrowUnordered, Parse, Value};
use loam::{JsonLdProcessor, NoLoader};

fn json(s: &str) -> Value {
	Value::parse_str(s).unwrap().0
}

async fn compact(document: &str, context: &str) -> Value {
	json(document)
		.compact(&json(context), &NoLoader)
		.await
		.unwrap()
}

#[async_std::test]
async fn compact_with_prefix() {
	let compacted = compact(
		r#"[{"http://schema.org/name": [{"@value": "Alice"}]}]"#,
		r#"{"schema": "http://schema.org/"}"#,
	)
	.await;

	let expected = json(
		r#"{
			"@context": {"schema": "http://schema.org/"},
			"schema:name": "Alice"
		}"#,
	);
	assert_eq!(compacted.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn compact_expand_round_trip() {
	let context = r#"{"schema": "http://schema.org/"}"#;
	let document = r#"{"@context": {"schema": "http://schema.org/"}, "schema:name": "Alice"}"#;

	let expanded = json(document).expand(&NoLoader).await.unwrap();
	let compacted = expanded.compact(&json(context), &NoLoader).await.unwrap();
	let re_expanded = compacted.expand(&NoLoader).await.unwrap();

	assert_eq!(re_expanded.as_unordered(), expanded.as_unordered());
}

#[async_std::test]
async fn compact_language_map_round_trip() {
	let context =
		r#"{"label": {"@id": "http://example.com/label", "@container": "@language"}}"#;
	let document = json(
		r#"{
			"@context": {"label": {"@id": "http://example.com/label", "@container": "@language"}},
			"label": {"en": "Hello", "fr": "Bonjour"}
		}"#,
	);

	let expanded = document.expand(&NoLoader).await.unwrap();
	let compacted = expanded.compact(&json(context), &NoLoader).await.unwrap();
	let re_expanded = compacted.expand(&NoLoader).await.unwrap();

	assert_eq!(re_expanded.as_unordered(), expanded.as_unordered());
}

#[async_std::test]
async fn compact_list() {
	let compacted = compact(
		r#"[{"http://example.com/f": [{"@list": [{"@value": "a"}, {"@value": "b"}]}]}]"#,
		r#"{"friends": {"@id": "http://example.com/f", "@container": "@list"}}"#,
	)
	.await;

	let expected = json(
		r#"{
			"@context": {"friends": {"@id": "http://example.com/f", "@container": "@list"}},
			"friends": ["a", "b"]
		}"#,
	);
	assert_eq!(compacted.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn compact_list_without_container() {
	let compacted = compact(
		r#"[{"http://example.com/f": [{"@list": [{"@value": "a"}]}]}]"#,
		r#"{"f": "http://example.com/f"}"#,
	)
	.await;

	let expected = json(
		r#"{
			"@context": {"f": "http://example.com/f"},
			"f": {"@list": ["a"]}
		}"#,
	);
	assert_eq!(compacted.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn iri_confused_with_prefix() {
	// With a prefix-flagged term `http`, the IRI `http:example` (which has
	// no authority) cannot be compacted.
	let result = json(r#"[{"http://example.com/name": [{"@id": "http:example"}]}]"#)
		.compact(
			&json(r#"{"http": {"@id": "http://example.com/http", "@prefix": true}, "name": "http://example.com/name"}"#),
			&NoLoader,
		)
		.await;

	match result {
		Err(e) => assert_eq!(e.code(), loam::ErrorCode::IriConfusedWithPrefix),
		Ok(_) => panic!("compaction should fail"),
	}
}

#[async_std::test]
async fn compact_type_coerced_id() {
	let compacted = compact(
		r#"[{
			"@id": "http://example.com/alice",
			"http://example.com/knows": [{"@id": "http://example.com/bob"}]
		}]"#,
		r#"{"knows": {"@id": "http://example.com/knows", "@type": "@id"}}"#,
	)
	.await;

	let expected = json(
		r#"{
			"@context": {"knows": {"@id": "http://example.com/knows", "@type": "@id"}},
			"@id": "http://example.com/alice",
			"knows": "http://example.com/bob"
		}"#,
	);
	assert_eq!(compacted.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn compact_arrays_disabled() {
	let document = json(r#"[{"http://schema.org/name": [{"@value": "Alice"}]}]"#);

	let compacted = document
		.compact_full(
			&json(r#"{"name": "http://schema.org/name"}"#),
			&NoLoader,
			loam::Options {
				compact_arrays: false,
				..Default::default()
			},
			(),
		)
		.await
		.unwrap();

	// With `compact_arrays` disabled the top level stays an array, wrapped
	// under `@graph`.
	let expected = json(
		r#"{
			"@context": {"name": "http://schema.org/name"},
			"@graph": [{"name": ["Alice"]}]
		}"#,
	);
	assert_eq!(compacted.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn compact_typed_value_selects_typed_term() {
	// Term selection must prefer the term whose type mapping matches the
	// value.
	let compacted = compact(
		r#"[{
			"http://example.com/date": [
				{"@value": "2026-08-02", "@type": "http://www.w3.org/2001/XMLSchema#date"}
			]
		}]"#,
		r#"{
			"date": {"@id": "http://example.com/date", "@type": "http://www.w3.org/2001/XMLSchema#date"},
			"plain": {"@id": "http://example.com/date"}
		}"#,
	)
	.await;

	let expected = json(
		r#"{
			"@context": {
				"date": {"@id": "http://example.com/date", "@type": "http://www.w3.org/2001/XMLSchema#date"},
				"plain": {"@id": "http://example.com/date"}
			},
			"date": "2026-08-02"
		}"#,
	);
	assert_eq!(compacted.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn compact_language_tagged_selects_language_term() {
	let compacted = compact(
		r#"[{
			"http://example.com/label": [
				{"@value": "Bonjour", "@language": "fr"}
			]
		}]"#,
		r#"{
			"label_fr": {"@id": "http://example.com/label", "@language": "fr"},
			"label": {"@id": "http://example.com/label"}
		}"#,
	)
	.await;

	let expected = json(
		r#"{
			"@context": {
				"label_fr": {"@id": "http://example.com/label", "@language": "fr"},
				"label": {"@id": "http://example.com/label"}
			},
			"label_fr": "Bonjour"
		}"#,
	);
	assert_eq!(compacted.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn compact_vocab_suffix() {
	let compacted = compact(
		r#"[{"http://example.com/ns#name": [{"@value": "Alice"}]}]"#,
		r#"{"@vocab": "http://example.com/ns#"}"#,
	)
	.await;

	let expected = json(
		r#"{
			"@context": {"@vocab": "http://example.com/ns#"},
			"name": "Alice"
		}"#,
	);
	assert_eq!(compacted.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn compact_top_level_array_wraps_in_graph() {
	let compacted = compact(
		r#"[
			{"@id": "http://example.com/a", "http://schema.org/name": [{"@value": "A"}]},
			{"@id": "http://example.com/b", "http://schema.org/name": [{"@value": "B"}]}
		]"#,
		r#"{"name": "http://schema.org/name"}"#,
	)
	.await;

	let expected = json(
		r#"{
			"@context": {"name": "http://schema.org/name"},
			"@graph": [
				{"@id": "http://example.com/a", "name": "A"},
				{"@id": "http://example.com/b", "name": "B"}
			]
		}"#,
	);
	assert_eq!(compacted.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn compact_index_container() {
	let compacted = compact(
		r#"[{
			"http://example.com/post": [
				{"@id": "http://example.com/1", "@index": "en"},
				{"@id": "http://example.com/2", "@index": "fr"}
			]
		}]"#,
		r#"{"post": {"@id": "http://example.com/post", "@container": "@index"}}"#,
	)
	.await;

	let expected = json(
		r#"{
			"@context": {"post": {"@id": "http://example.com/post", "@container": "@index"}},
			"post": {
				"en": {"@id": "http://example.com/1"},
				"fr": {"@id": "http://example.com/2"}
			}
		}"#,
	);
	assert_eq!(compacted.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn compact_reverse_property() {
	let compacted = compact(
		r#"[{
			"@id": "http://example.com/a",
			"@reverse": {
				"http://example.com/parent": [{"@id": "http://example.com/b"}]
			}
		}]"#,
		r#"{"children": {"@reverse": "http://example.com/parent", "@type": "@id"}}"#,
	)
	.await;

	let expected = json(
		r#"{
			"@context": {"children": {"@reverse": "http://example.com/parent", "@type": "@id"}},
			"@id": "http://example.com/a",
			"children": "http://example.com/b"
		}"#,
	);
	assert_eq!(compacted.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn compact_empty_document() {
	let compacted = compact("[]", r#"{"name": "http://schema.org/name"}"#).await;

	let expected = json(r#"{"@context": {"name": "http://schema.org/name"}}"#);
	assert_eq!(compacted.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn round_trip_with_nested_nodes() {
	let document = json(
		r#"{
			"@context": {
				"name": "http://schema.org/name",
				"knows": "http://schema.org/knows"
			},
			"@id": "http://example.com/alice",
			"name": "Alice",
			"knows": {"@id": "http://example.com/bob", "name": "Bob"}
		}"#,
	);

	let context = json(
		r#"{
			"name": "http://schema.org/name",
			"knows": "http://schema.org/knows"
		}"#,
	);

	let expanded = document.expand(&NoLoader).await.unwrap();
	let compacted = expanded.compact(&context, &NoLoader).await.unwrap();
	let re_expanded = compacted.expand(&NoLoader).await.unwrap();

	assert_eq!(re_expanded.as_unordered(), expanded.as_unordered());
}
