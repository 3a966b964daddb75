use loam::syntax::{BorrowUnordered, Parse, Value};
use loam::{JsonLdProcessor, NoLoader};

fn json(s: &str) -> Value {
	Value::parse_str(s).unwrap().0
}

async fn expand(s: &str) -> Value {
	json(s).expand(&NoLoader).await.unwrap()
}

#[async_std::test]
async fn expand_single_term_alias() {
	let expanded = expand(
		r#"{
			"@context": {"name": "http://schema.org/name"},
			"name": "Alice"
		}"#,
	)
	.await;

	let expected = json(r#"[{"http://schema.org/name": [{"@value": "Alice"}]}]"#);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn expand_compact_iri() {
	let expanded = expand(
		r#"{
			"@context": {"schema": "http://schema.org/"},
			"schema:name": "Alice"
		}"#,
	)
	.await;

	let expected = json(r#"[{"http://schema.org/name": [{"@value": "Alice"}]}]"#);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn expand_language_map() {
	let expanded = expand(
		r#"{
			"@context": {
				"label": {"@id": "http://example.com/label", "@container": "@language"}
			},
			"label": {"en": "Hello", "fr": "Bonjour"}
		}"#,
	)
	.await;

	let expected = json(
		r#"[{
			"http://example.com/label": [
				{"@value": "Hello", "@language": "en"},
				{"@value": "Bonjour", "@language": "fr"}
			]
		}]"#,
	);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn expand_list_container() {
	let expanded = expand(
		r#"{
			"@context": {"friends": {"@id": "http://example.com/f", "@container": "@list"}},
			"friends": ["a", "b"]
		}"#,
	)
	.await;

	let expected = json(
		r#"[{
			"http://example.com/f": [
				{"@list": [{"@value": "a"}, {"@value": "b"}]}
			]
		}]"#,
	);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn expand_typed_value() {
	let expanded = expand(
		r#"{
			"@context": {
				"age": {"@id": "http://example.com/age", "@type": "http://www.w3.org/2001/XMLSchema#integer"}
			},
			"age": 13
		}"#,
	)
	.await;

	let expected = json(
		r#"[{
			"http://example.com/age": [
				{"@value": 13, "@type": "http://www.w3.org/2001/XMLSchema#integer"}
			]
		}]"#,
	);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn expand_id_and_type() {
	let expanded = expand(
		r#"{
			"@context": {"@base": "http://example.com/", "@vocab": "http://example.com/ns#"},
			"@id": "alice",
			"@type": "Person"
		}"#,
	)
	.await;

	let expected = json(
		r#"[{
			"@id": "http://example.com/alice",
			"@type": ["http://example.com/ns#Person"]
		}]"#,
	);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn keyword_like_tokens_are_not_iris() {
	// A token matching `@[A-Za-z]+` that is not a keyword is never treated
	// as an IRI: the entry is dropped with a warning.
	let expanded = expand(
		r#"{
			"@context": {"@vocab": "http://example.com/ns#"},
			"@ignoreMe": "dropped",
			"kept": "value"
		}"#,
	)
	.await;

	let expected = json(r#"[{"http://example.com/ns#kept": [{"@value": "value"}]}]"#);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn undefined_prefix_is_kept_as_iri() {
	// A compact IRI whose prefix is undefined is an absolute IRI of its own.
	let expanded = expand(
		r#"{
			"@context": {"name": "http://schema.org/name"},
			"@id": "undef:alice",
			"name": "Alice"
		}"#,
	)
	.await;

	let expected = json(
		r#"[{
			"@id": "undef:alice",
			"http://schema.org/name": [{"@value": "Alice"}]
		}]"#,
	);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn expansion_is_idempotent() {
	let expanded = expand(
		r#"{
			"@context": {"name": "http://schema.org/name", "knows": {"@id": "http://schema.org/knows", "@type": "@id"}},
			"@id": "http://example.com/alice",
			"name": "Alice",
			"knows": "http://example.com/bob"
		}"#,
	)
	.await;

	let re_expanded = expanded.expand(&NoLoader).await.unwrap();
	assert_eq!(re_expanded.as_unordered(), expanded.as_unordered());
}

#[async_std::test]
async fn drop_free_floating_values() {
	// Free-floating values and scalars are dropped from the top level.
	let expanded = expand(r#"[{"@value": "free"}, "floating", {"@id": "http://example.com/a"}]"#).await;
	assert_eq!(expanded, json("[]"));
}

#[async_std::test]
async fn drop_language_only_map() {
	let expanded = expand(r#"{"@language": "en"}"#).await;
	assert_eq!(expanded, json("[]"));
}

#[async_std::test]
async fn unwrap_top_level_graph() {
	let expanded = expand(
		r#"{
			"@graph": [
				{"http://example.org/vocab#a": {"@graph": [{"http://example.org/vocab#b": "Chapter One"}]}}
			]
		}"#,
	)
	.await;

	let expected = json(
		r#"[{
			"http://example.org/vocab#a": [
				{"@graph": [{"http://example.org/vocab#b": [{"@value": "Chapter One"}]}]}
			]
		}]"#,
	);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn expand_nest() {
	let expanded = expand(
		r#"{
			"@context": {
				"@vocab": "http://example.com/ns#",
				"labels": "@nest"
			},
			"@id": "http://example.com/a",
			"labels": {"main": "value"}
		}"#,
	)
	.await;

	let expected = json(
		r#"[{
			"@id": "http://example.com/a",
			"http://example.com/ns#main": [{"@value": "value"}]
		}]"#,
	);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn expand_reverse_property() {
	let expanded = expand(
		r#"{
			"@context": {
				"children": {"@reverse": "http://example.com/parent"}
			},
			"@id": "http://example.com/a",
			"children": {"@id": "http://example.com/b"}
		}"#,
	)
	.await;

	let expected = json(
		r#"[{
			"@id": "http://example.com/a",
			"@reverse": {
				"http://example.com/parent": [{"@id": "http://example.com/b"}]
			}
		}]"#,
	);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn reverse_property_with_value_is_invalid() {
	let result = json(
		r#"{
			"@context": {"children": {"@reverse": "http://example.com/parent"}},
			"children": "just a string"
		}"#,
	)
	.expand(&NoLoader)
	.await;

	match result {
		Err(e) => assert_eq!(
			e.code(),
			loam::ErrorCode::InvalidReversePropertyValue
		),
		Ok(_) => panic!("expansion should fail"),
	}
}

#[async_std::test]
async fn colliding_keywords() {
	let result = json(
		r#"{
			"@context": {"id": "@id"},
			"@id": "http://example.com/a",
			"id": "http://example.com/b"
		}"#,
	)
	.expand(&NoLoader)
	.await;

	match result {
		Err(e) => assert_eq!(e.code(), loam::ErrorCode::CollidingKeywords),
		Ok(_) => panic!("expansion should fail"),
	}
}

#[async_std::test]
async fn expand_json_literal() {
	let expanded = expand(
		r#"{
			"@context": {"data": {"@id": "http://example.com/data", "@type": "@json"}},
			"data": {"nested": [1, 2]}
		}"#,
	)
	.await;

	let expected = json(
		r#"[{
			"http://example.com/data": [
				{"@value": {"nested": [1, 2]}, "@type": "@json"}
			]
		}]"#,
	);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn expand_included_nodes() {
	let expanded = expand(
		r#"{
			"@context": {"@vocab": "http://example.com/ns#"},
			"@id": "http://example.com/a",
			"prop": "x",
			"@included": [{"@id": "http://example.com/b", "prop": "y"}]
		}"#,
	)
	.await;

	let expected = json(
		r#"[{
			"@id": "http://example.com/a",
			"http://example.com/ns#prop": [{"@value": "x"}],
			"@included": [
				{"@id": "http://example.com/b", "http://example.com/ns#prop": [{"@value": "y"}]}
			]
		}]"#,
	);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn expand_index_map() {
	let expanded = expand(
		r#"{
			"@context": {
				"post": {"@id": "http://example.com/post", "@container": "@index"}
			},
			"post": {
				"en": {"@id": "http://example.com/1"},
				"fr": {"@id": "http://example.com/2"}
			}
		}"#,
	)
	.await;

	let expected = json(
		r#"[{
			"http://example.com/post": [
				{"@id": "http://example.com/1", "@index": "en"},
				{"@id": "http://example.com/2", "@index": "fr"}
			]
		}]"#,
	);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn expand_type_scoped_context() {
	let expanded = expand(
		r#"{
			"@context": {
				"@vocab": "http://example.com/ns#",
				"Person": {
					"@id": "http://example.com/Person",
					"@context": {"name": "http://schema.org/name"}
				}
			},
			"@type": "Person",
			"name": "Alice"
		}"#,
	)
	.await;

	let expected = json(
		r#"[{
			"@type": ["http://example.com/Person"],
			"http://schema.org/name": [{"@value": "Alice"}]
		}]"#,
	);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn expand_graph_container() {
	let expanded = expand(
		r#"{
			"@context": {
				"claims": {"@id": "http://example.com/claims", "@container": "@graph"}
			},
			"claims": {"http://example.com/says": "hi"}
		}"#,
	)
	.await;

	let expected = json(
		r#"[{
			"http://example.com/claims": [
				{"@graph": [{"http://example.com/says": [{"@value": "hi"}]}]}
			]
		}]"#,
	);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}

#[async_std::test]
async fn expand_default_language_and_direction() {
	let expanded = expand(
		r#"{
			"@context": {"@language": "en", "@direction": "rtl", "@vocab": "http://example.com/ns#"},
			"label": "value"
		}"#,
	)
	.await;

	let expected = json(
		r#"[{
			"http://example.com/ns#label": [
				{"@value": "value", "@language": "en", "@direction": "rtl"}
			]
		}]"#,
	);
	assert_eq!(expanded.as_unordered(), expected.as_unordered());
}
