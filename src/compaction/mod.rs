//! Compaction algorithm.
//!
//! Transforms an expanded document into compact form using a context. The
//! compactor mirrors the expander's recursion, driving term selection
//! through the active context's inverse index.
mod iri;
mod node;
mod property;
mod value;

pub(crate) use iri::{compact_iri, IriConfusedWithPrefix};
pub(crate) use node::compact_node;
pub(crate) use property::compact_property;
pub(crate) use value::compact_indexed_value;

use crate::object::{self, is_list_object, is_value_object, node_index};
use crate::processing::{process_context, ProcessingStack};
use crate::syntax::{ContainerKind, ErrorCode, Keyword, Object, Value};
use crate::warning;
use crate::{processing, Context, Environment, Loader, ProcessingMode, Term};
use mown::Mown;

/// Errors that can happen during compaction.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("IRI confused with prefix")]
	IriConfusedWithPrefix,

	#[error("invalid `@nest` value")]
	InvalidNestValue,

	#[error("context processing failed: {0}")]
	ContextProcessing(#[from] processing::Error),
}

impl Error {
	/// Returns the stable code of this error.
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::IriConfusedWithPrefix => ErrorCode::IriConfusedWithPrefix,
			Self::InvalidNestValue => ErrorCode::InvalidNestValue,
			Self::ContextProcessing(e) => e.code(),
		}
	}
}

impl From<IriConfusedWithPrefix> for Error {
	fn from(_: IriConfusedWithPrefix) -> Self {
		Self::IriConfusedWithPrefix
	}
}

/// Compaction options.
#[derive(Clone, Copy)]
pub struct Options {
	/// JSON-LD processing mode.
	pub processing_mode: ProcessingMode,

	/// Determines if IRIs are compacted relative to the base IRI when
	/// compacting.
	pub compact_to_relative: bool,

	/// If set to true, arrays with just one element are replaced with that
	/// element during compaction.
	pub compact_arrays: bool,

	/// If set to true, properties are processed by lexical order.
	pub ordered: bool,
}

impl From<Options> for processing::Options {
	fn from(options: Options) -> processing::Options {
		processing::Options {
			processing_mode: options.processing_mode,
			..Default::default()
		}
	}
}

impl Default for Options {
	fn default() -> Options {
		Options {
			processing_mode: ProcessingMode::default(),
			compact_to_relative: true,
			compact_arrays: true,
			ordered: false,
		}
	}
}

/// Compacts the given expanded document.
pub async fn compact<L, W>(
	env: Environment<'_, L, W>,
	expanded: &Value,
	active_context: &Context,
	options: Options,
) -> Result<Value, Error>
where
	L: Loader,
	W: warning::Handler,
{
	match expanded {
		Value::Array(items) => {
			compact_collection(env, items, active_context, active_context, None, options).await
		}
		other => compact_element(env, other, active_context, active_context, None, options).await,
	}
}

/// Compacts a collection of expanded items, inlining singletons where
/// permitted.
pub(crate) async fn compact_collection<L, W>(
	mut env: Environment<'_, L, W>,
	items: &[Value],
	active_context: &Context,
	type_scoped_context: &Context,
	active_property: Option<&str>,
	options: Options,
) -> Result<Value, Error>
where
	L: Loader,
	W: warning::Handler,
{
	let mut result = Vec::new();

	for item in items {
		let compacted_item = Box::pin(compact_element(
			Environment {
				loader: env.loader,
				warnings: env.warnings,
			},
			item,
			active_context,
			type_scoped_context,
			active_property,
			options,
		))
		.await?;

		if !compacted_item.is_null() {
			result.push(compacted_item)
		}
	}

	let mut list_or_set = false;
	if let Some(active_property) = active_property {
		if let Some(active_property_definition) = active_context.get(active_property) {
			list_or_set = active_property_definition
				.container
				.contains(ContainerKind::List)
				|| active_property_definition
					.container
					.contains(ContainerKind::Set);
		}
	}

	if result.is_empty()
		|| result.len() > 1
		|| !options.compact_arrays
		|| active_property == Some("@graph")
		|| active_property == Some("@set")
		|| list_or_set
	{
		return Ok(Value::Array(result));
	}

	Ok(result.into_iter().next().unwrap())
}

/// Compacts a single expanded element, dispatching on its shape.
pub(crate) async fn compact_element<L, W>(
	mut env: Environment<'_, L, W>,
	element: &Value,
	active_context: &Context,
	type_scoped_context: &Context,
	active_property: Option<&str>,
	options: Options,
) -> Result<Value, Error>
where
	L: Loader,
	W: warning::Handler,
{
	if let Value::Array(items) = element {
		return Box::pin(compact_collection(
			env,
			items,
			active_context,
			type_scoped_context,
			active_property,
			options,
		))
		.await;
	}

	if is_value_object(element) {
		return compact_indexed_value(env, element, active_context, active_property, options)
			.await;
	}

	if is_list_object(element) {
		// If the active context has a previous context, the active context
		// is not propagated: the scope of a term-scoped context does not
		// apply when processing new node objects.
		let mut active_context = active_context;
		if let Some(previous_context) = active_context.previous_context() {
			active_context = previous_context
		}

		// If the term definition for `active_property` has a local context,
		// apply it.
		let mut active_context = Mown::Borrowed(active_context);
		let mut list_container = false;
		if let Some(active_property) = active_property {
			if let Some(active_property_definition) = type_scoped_context.get(active_property) {
				if let Some(local_context) = active_property_definition.context.clone() {
					let processed = process_context(
						Environment {
							loader: env.loader,
							warnings: env.warnings,
						},
						active_context.as_ref(),
						&local_context,
						ProcessingStack::new(),
						active_property_definition.base_url.as_deref(),
						processing::Options::from(options).with_override(),
					)
					.await?;

					active_context = Mown::Owned(processed)
				}

				list_container = active_property_definition
					.container
					.contains(ContainerKind::List);
			}
		}

		let list = match element.as_object().and_then(|o| object::get(o, "@list")) {
			Some(Value::Array(items)) => items.as_slice(),
			Some(other) => std::slice::from_ref(other),
			None => &[],
		};

		if list_container {
			// If the container of the active property includes `@list`, the
			// list is inlined.
			return Box::pin(compact_collection(
				env,
				list,
				active_context.as_ref(),
				active_context.as_ref(),
				active_property,
				options,
			))
			.await;
		}

		// Otherwise wrap the compacted list into a `{@list: ...}` map.
		let mut result = Object::default();
		compact_property(
			Environment {
				loader: env.loader,
				warnings: env.warnings,
			},
			&mut result,
			Term::Keyword(Keyword::List),
			list,
			active_context.as_ref(),
			false,
			options,
		)
		.await?;

		// If the original list object carries an `@index` entry and the
		// active property has no index container, the entry is kept.
		if let Some(index) = node_index(element) {
			let mut index_container = false;
			if let Some(active_property) = active_property {
				if let Some(active_property_definition) =
					active_context.get(active_property)
				{
					if active_property_definition
						.container
						.contains(ContainerKind::Index)
					{
						index_container = true;
					}
				}
			}

			if !index_container {
				let alias = compact_iri(
					active_context.as_ref(),
					&Term::Keyword(Keyword::Index),
					None,
					true,
					false,
					options,
				)?
				.unwrap();

				result.insert(alias.as_str().into(), Value::String(index.into()));
			}
		}

		return Ok(Value::Object(result));
	}

	// Node objects, graph objects and subject references.
	compact_node(
		env,
		element,
		active_context,
		type_scoped_context,
		active_property,
		options,
	)
	.await
}

/// Adds a value to the given entry of `map`, promoting the entry to an
/// array when required.
///
/// Default value of `as_array` is false.
pub(crate) fn add_value(map: &mut Object, key: &str, value: Value, as_array: bool) {
	match object::get(map, key).map(Value::is_array) {
		Some(false) => {
			if let Some(existing) = object::remove(map, key) {
				map.insert(key.into(), Value::Array(vec![existing]));
			}
		}
		None if as_array => {
			map.insert(key.into(), Value::Array(Vec::new()));
		}
		_ => (),
	}

	match value {
		Value::Array(values) => {
			for value in values {
				add_value(map, key, value, false)
			}
		}
		value => {
			if let Some(Value::Array(array)) = object::get_mut(map, key) {
				array.push(value);
				return;
			}

			map.insert(key.into(), value);
		}
	}
}
