use iref::{Iri, IriBuf};
use loam::syntax::{Parse, Value};
use loam::{
	process_context, Context, Environment, ErrorCode, JsonLdProcessor, LoadingResult, NoLoader,
	ProcessingStack, RemoteDocument,
};
use static_iref::iri;
use std::cell::Cell;

fn json(s: &str) -> Value {
	Value::parse_str(s).unwrap().0
}

async fn process(active_context: &Context, s: &str) -> Result<Context, loam::processing::Error> {
	process_context(
		Environment {
			loader: &NoLoader,
			warnings: &mut (),
		},
		active_context,
		&json(s),
		ProcessingStack::new(),
		None,
		loam::processing::Options::default(),
	)
	.await
}

#[async_std::test]
async fn empty_context_definition() {
	let context = process(&Context::new(None), "{}").await.unwrap();
	assert!(context.is_empty());
}

#[async_std::test]
async fn define_simple_term() {
	let context = process(&Context::new(None), r#"{"name": "http://schema.org/name"}"#)
		.await
		.unwrap();

	let definition = context.get("name").unwrap();
	assert_eq!(
		definition.value.as_ref().map(|v| v.as_str()),
		Some("http://schema.org/name")
	);
	assert!(!definition.prefix);
}

#[async_std::test]
async fn term_identical_to_its_expansion() {
	// A term that is an absolute IRI maps to itself.
	let context = process(
		&Context::new(None),
		r#"{"http://example.com/name": {"@type": "@id"}}"#,
	)
	.await
	.unwrap();

	let definition = context.get("http://example.com/name").unwrap();
	assert_eq!(
		definition.value.as_ref().map(|v| v.as_str()),
		Some("http://example.com/name")
	);
}

#[async_std::test]
async fn protected_term_redefinition_fails() {
	let result = process(
		&Context::new(None),
		r#"[
			{"name": {"@id": "http://example.com/n", "@protected": true}},
			{"name": "http://example.com/other"}
		]"#,
	)
	.await;

	match result {
		Err(e) => assert_eq!(e.code(), ErrorCode::ProtectedTermRedefinition),
		Ok(_) => panic!("processing should fail"),
	}
}

#[async_std::test]
async fn protected_term_identical_redefinition_is_allowed() {
	let context = process(
		&Context::new(None),
		r#"[
			{"name": {"@id": "http://example.com/n", "@protected": true}},
			{"name": {"@id": "http://example.com/n"}}
		]"#,
	)
	.await
	.unwrap();

	assert!(context.get("name").unwrap().protected);
}

#[async_std::test]
async fn null_context_with_protected_terms_fails() {
	let result = process(
		&Context::new(None),
		r#"[
			{"name": {"@id": "http://example.com/n", "@protected": true}},
			null
		]"#,
	)
	.await;

	match result {
		Err(e) => assert_eq!(e.code(), ErrorCode::InvalidContextNullification),
		Ok(_) => panic!("processing should fail"),
	}
}

#[async_std::test]
async fn null_context_resets() {
	let context = process(
		&Context::new(Some(iri!("http://example.com/doc").to_owned())),
		r#"[{"name": "http://example.com/n", "@vocab": "http://example.com/ns#"}, null]"#,
	)
	.await
	.unwrap();

	assert!(context.is_empty());
	assert!(context.vocabulary().is_none());
	// The original base URL is retained.
	assert_eq!(context.base_iri().map(Iri::as_str), Some("http://example.com/doc"));
}

#[async_std::test]
async fn empty_vocab_is_document_relative() {
	let context = process(
		&Context::new(Some(iri!("http://example.com/doc").to_owned())),
		r#"{"@vocab": ""}"#,
	)
	.await
	.unwrap();

	assert_eq!(
		context.vocabulary().map(|v| v.as_str()),
		Some("http://example.com/doc")
	);
}

#[async_std::test]
async fn language_null_clears_default_language() {
	let context = process(
		&Context::new(None),
		r#"[{"@language": "en"}, {"@language": null}]"#,
	)
	.await
	.unwrap();

	assert!(context.default_language().is_none());
}

#[async_std::test]
async fn cyclic_iri_mapping_fails() {
	let result = process(&Context::new(None), r#"{"a": "b:suffix", "b": "a:suffix"}"#).await;

	match result {
		Err(e) => assert_eq!(e.code(), ErrorCode::CyclicIriMapping),
		Ok(_) => panic!("processing should fail"),
	}
}

#[async_std::test]
async fn keyword_redefinition_fails() {
	let result = process(&Context::new(None), r#"{"@id": "http://example.com/id"}"#).await;

	match result {
		Err(e) => assert_eq!(e.code(), ErrorCode::KeywordRedefinition),
		Ok(_) => panic!("processing should fail"),
	}
}

#[async_std::test]
async fn invalid_container_mapping_fails() {
	let result = process(
		&Context::new(None),
		r#"{"t": {"@id": "http://example.com/t", "@container": ["@list", "@set"]}}"#,
	)
	.await;

	match result {
		Err(e) => assert_eq!(e.code(), ErrorCode::InvalidContainerMapping),
		Ok(_) => panic!("processing should fail"),
	}
}

#[async_std::test]
async fn type_container_forces_type_mapping() {
	let context = process(
		&Context::new(None),
		r#"{"t": {"@id": "http://example.com/t", "@container": "@type"}}"#,
	)
	.await
	.unwrap();

	// Forcing `@type` into the container without a type mapping defaults
	// the type mapping to `@id`.
	assert_eq!(
		context.get("t").unwrap().typ,
		Some(loam::context::Type::Id)
	);
}

#[async_std::test]
async fn processing_mode_conflict() {
	let document = json(r#"{"@context": {"@version": 1.1}}"#);

	let result = document
		.expand_full(
			&NoLoader,
			loam::Options {
				processing_mode: loam::ProcessingMode::JsonLd1_0,
				..Default::default()
			},
			(),
		)
		.await;

	match result {
		Err(e) => assert_eq!(e.code(), ErrorCode::ProcessingModeConflict),
		Ok(_) => panic!("expansion should fail"),
	}
}

#[async_std::test]
async fn reverse_definition_skips_unknown_entry_check() {
	// A reverse property definition is committed without the trailing
	// unrecognized-entry check.
	let context = process(
		&Context::new(None),
		r#"{"children": {"@reverse": "http://example.com/parent", "unknown": true}}"#,
	)
	.await
	.unwrap();

	assert!(context.get("children").unwrap().reverse_property);

	// The same entry on a regular definition is fatal.
	let result = process(
		&Context::new(None),
		r#"{"children": {"@id": "http://example.com/child", "unknown": true}}"#,
	)
	.await;

	match result {
		Err(e) => assert_eq!(e.code(), ErrorCode::InvalidTermDefinition),
		Ok(_) => panic!("processing should fail"),
	}
}

/// Loader serving a cycle of remote contexts, counting its invocations.
struct CyclicLoader {
	count: Cell<usize>,
}

impl CyclicLoader {
	fn new() -> Self {
		Self {
			count: Cell::new(0),
		}
	}

	fn next_url(url: &Iri) -> IriBuf {
		if url.as_str().ends_with("a") {
			iri!("http://example.com/context-b").to_owned()
		} else {
			iri!("http://example.com/context-a").to_owned()
		}
	}
}

impl loam::Loader for CyclicLoader {
	async fn load(&self, url: &Iri) -> LoadingResult {
		self.count.set(self.count.get() + 1);

		let document = json(&format!(
			r#"{{"@context": "{}"}}"#,
			Self::next_url(url)
		));

		Ok(RemoteDocument::new(Some(url.to_owned()), None, document))
	}
}

#[async_std::test]
async fn remote_context_cycle_overflows() {
	let loader = CyclicLoader::new();

	let result = process_context(
		Environment {
			loader: &loader,
			warnings: &mut (),
		},
		&Context::new(None),
		&json(r#""http://example.com/context-a""#),
		ProcessingStack::new(),
		None,
		loam::processing::Options::default(),
	)
	.await;

	match result {
		Err(e) => assert_eq!(e.code(), ErrorCode::ContextOverflow),
		Ok(_) => panic!("processing should fail"),
	}

	// The loader is touched at most `REMOTE_CONTEXT_LIMIT` times.
	assert!(loader.count.get() <= loam::REMOTE_CONTEXT_LIMIT);
}

#[async_std::test]
async fn load_remote_context_from_file_system() {
	let mut loader = loam::FsLoader::new();
	loader.mount(iri!("http://example.com/").to_owned(), "tests/fixtures");

	let expanded = json(
		r#"{
			"@context": "http://example.com/context.jsonld",
			"name": "Alice"
		}"#,
	)
	.expand(&loader)
	.await
	.unwrap();

	let expected = json(r#"[{"http://schema.org/name": [{"@value": "Alice"}]}]"#);
	assert_eq!(expanded, expected);
}

#[async_std::test]
async fn propagate_false_saves_previous_context() {
	let context = process(
		&Context::new(None),
		r#"{"@propagate": false, "name": "http://example.com/n"}"#,
	)
	.await
	.unwrap();

	assert!(context.previous_context().is_some());
	assert!(context.previous_context().unwrap().is_empty());
}

#[async_std::test]
async fn invalid_scoped_context_fails() {
	let result = process(
		&Context::new(None),
		r#"{"t": {"@id": "http://example.com/t", "@context": {"bad": {"@id": "http://example.com/b", "@unknown": 0}}}}"#,
	)
	.await;

	match result {
		Err(e) => assert_eq!(e.code(), ErrorCode::InvalidScopedContext),
		Ok(_) => panic!("processing should fail"),
	}
}
