//! Expansion algorithm.
//!
//! Transforms a document into expanded form: every IRI absolute, every value
//! in a value object, every property value an array.
mod array;
mod element;
mod expanded;
mod node;
mod value;

pub(crate) use array::expand_array;
pub(crate) use element::{expand_element, ExpandedEntry};
pub(crate) use expanded::Expanded;
pub(crate) use node::expand_node;
pub(crate) use value::{expand_literal, expand_value, LiteralValue};

use crate::syntax::{ErrorCode, Value};
use crate::warning;
use crate::{processing, Context, Environment, Loader, ProcessingMode};
use iref::Iri;

/// Errors that can happen during expansion.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("context processing failed: {0}")]
	ContextProcessing(#[from] processing::Error),

	#[error("invalid `@index` value")]
	InvalidIndexValue,

	#[error("invalid set or list object")]
	InvalidSetOrListObject,

	#[error("invalid `@reverse` property map")]
	InvalidReversePropertyMap,

	#[error("invalid `@type` value")]
	InvalidTypeValue,

	#[error("invalid `@reverse` property value")]
	InvalidReversePropertyValue,

	#[error("invalid `@language` map value")]
	InvalidLanguageMapValue,

	#[error("colliding keywords")]
	CollidingKeywords,

	#[error("invalid `@id` value")]
	InvalidIdValue,

	#[error("invalid `@included` value")]
	InvalidIncludedValue,

	#[error("invalid `@reverse` value")]
	InvalidReverseValue,

	#[error("invalid `@nest` value")]
	InvalidNestValue,

	#[error("invalid language-tagged string")]
	InvalidLanguageTaggedString,

	#[error("invalid base `@direction`")]
	InvalidBaseDirection,

	#[error("invalid typed value")]
	InvalidTypedValue,

	#[error("invalid value object")]
	InvalidValueObject,

	#[error("invalid value object value")]
	InvalidValueObjectValue,

	#[error("invalid language-tagged value")]
	InvalidLanguageTaggedValue,
}

impl Error {
	/// Returns the stable code of this error.
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::ContextProcessing(e) => e.code(),
			Self::InvalidIndexValue => ErrorCode::InvalidIndexValue,
			Self::InvalidSetOrListObject => ErrorCode::InvalidSetOrListObject,
			Self::InvalidReversePropertyMap => ErrorCode::InvalidReversePropertyMap,
			Self::InvalidTypeValue => ErrorCode::InvalidTypeValue,
			Self::InvalidReversePropertyValue => ErrorCode::InvalidReversePropertyValue,
			Self::InvalidLanguageMapValue => ErrorCode::InvalidLanguageMapValue,
			Self::CollidingKeywords => ErrorCode::CollidingKeywords,
			Self::InvalidIdValue => ErrorCode::InvalidIdValue,
			Self::InvalidIncludedValue => ErrorCode::InvalidIncludedValue,
			Self::InvalidReverseValue => ErrorCode::InvalidReversePropertyValue,
			Self::InvalidNestValue => ErrorCode::InvalidNestValue,
			Self::InvalidLanguageTaggedString => ErrorCode::InvalidLanguageTaggedString,
			Self::InvalidBaseDirection => ErrorCode::InvalidBaseDirection,
			Self::InvalidTypedValue => ErrorCode::InvalidTypedValue,
			Self::InvalidValueObject => ErrorCode::InvalidValueObject,
			Self::InvalidValueObjectValue => ErrorCode::InvalidValueObjectValue,
			Self::InvalidLanguageTaggedValue => ErrorCode::InvalidLanguageTaggedValue,
		}
	}
}

/// Expansion options.
#[derive(Clone, Copy, Default)]
pub struct Options {
	/// Sets the processing mode.
	pub processing_mode: ProcessingMode,

	/// If set to true, input document entries are processed
	/// lexicographically. If false, order is not considered in processing.
	pub ordered: bool,

	/// If set to true, free-floating nodes are kept in the output, as
	/// required when expanding frames.
	pub frame_expansion: bool,
}

impl From<Options> for processing::Options {
	fn from(options: Options) -> processing::Options {
		processing::Options {
			processing_mode: options.processing_mode,
			..Default::default()
		}
	}
}

/// Expands the given JSON-LD document.
///
/// Returns the expanded form: an array of node objects.
pub async fn expand<L, W>(
	env: Environment<'_, L, W>,
	document: &Value,
	active_context: Context,
	base_url: Option<&Iri>,
	options: Options,
) -> Result<Value, Error>
where
	L: Loader,
	W: warning::Handler,
{
	let expanded = expand_element(
		env,
		&active_context,
		None,
		document,
		base_url,
		options,
		false,
	)
	.await?;

	if expanded.len() == 1 {
		let object = expanded.into_iter().next().unwrap();
		// If the result is a map whose only entry is `@graph`, set the
		// result to the value of that entry.
		match into_unnamed_graph(object) {
			Ok(graph) => Ok(Value::Array(graph)),
			Err(object) => {
				if filter_top_level_item(&object) {
					Ok(Value::Array(vec![object]))
				} else {
					Ok(Value::Array(Vec::new()))
				}
			}
		}
	} else {
		Ok(Value::Array(
			expanded.into_iter().filter(filter_top_level_item).collect(),
		))
	}
}

/// Dangling values are removed from the top level of the expanded document.
pub(crate) fn filter_top_level_item(item: &Value) -> bool {
	!crate::object::is_value_object(item)
}

/// Unwraps a map whose only entry is `@graph`.
fn into_unnamed_graph(object: Value) -> Result<Vec<Value>, Value> {
	match object {
		Value::Object(o) if o.len() == 1 => {
			let mut entries: Vec<_> = o.into_iter().collect();
			let entry = entries.pop().unwrap();
			if entry.key.as_str() == "@graph" {
				match entry.value {
					Value::Array(items) => Ok(items),
					item => Ok(vec![item]),
				}
			} else {
				let mut o = crate::syntax::Object::default();
				o.insert(entry.key, entry.value);
				Err(Value::Object(o))
			}
		}
		object => Err(object),
	}
}
