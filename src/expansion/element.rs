use super::{
	expand_array, expand_literal, expand_node, expand_value, Error, Expanded, LiteralValue,
	Options,
};
use crate::object;
use crate::processing::{expand_iri, process_context, ProcessingStack};
use crate::syntax::{Keyword, Nullable, Value};
use crate::warning::{self, Warning};
use crate::{Context, Environment, Id, Loader, Term};
use iref::Iri;
use json_syntax::object::Entry;
use mown::Mown;
use std::borrow::Cow;

/// Entry of a JSON-LD map whose key has been IRI expanded.
pub(crate) struct ExpandedEntry<'a>(pub &'a str, pub Term, pub &'a Value);

/// Expansion of a single element of a JSON-LD document.
///
/// The default specified value for `ordered` and `from_map` is `false`.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn expand_element<L, W>(
	mut env: Environment<'_, L, W>,
	active_context: &Context,
	active_property: Option<&str>,
	element: &Value,
	base_url: Option<&Iri>,
	options: Options,
	from_map: bool,
) -> Result<Expanded, Error>
where
	L: Loader,
	W: warning::Handler,
{
	// If `element` is null, return null.
	if element.is_null() {
		return Ok(Expanded::Null);
	}

	// If `active_property` has a term definition in `active_context` with a
	// local context, initialize `property_scoped_context` to that local
	// context.
	let active_property_definition =
		active_property.and_then(|property| active_context.get(property));

	let property_scoped_base_url = active_property_definition
		.and_then(|definition| definition.base_url.clone());
	let property_scoped_context =
		active_property_definition.and_then(|definition| definition.context.clone());

	match element {
		Value::Null => unreachable!(),
		Value::Array(element) => {
			expand_array(
				env,
				active_context,
				active_property,
				element,
				base_url,
				options,
				from_map,
			)
			.await
		}

		Value::Object(element) => {
			// Preliminary key expansions, used by the previous-context rule.
			let mut has_value_entry = false;
			let mut has_id_entry = false;
			for entry in element.iter() {
				match expand_iri(
					env.warnings,
					active_context,
					Nullable::Some(entry.key.as_str()),
					false,
					true,
				) {
					Term::Keyword(Keyword::Value) => has_value_entry = true,
					Term::Keyword(Keyword::Id) => has_id_entry = true,
					_ => (),
				}
			}

			// If `active_context` has a previous context, the active context
			// is not propagated. If `from_map` is false, and `element` does
			// not contain an entry expanding to `@value`, and `element` does
			// not consist of a single entry expanding to `@id`, set the
			// active context to the previous context, as the scope of a
			// term-scoped context does not apply when processing new node
			// objects.
			let mut active_context = Mown::Borrowed(active_context);
			if let Some(previous_context) = active_context.previous_context() {
				if !from_map && !has_value_entry && !(element.len() == 1 && has_id_entry) {
					active_context = Mown::Owned(previous_context.clone())
				}
			}

			// If `property_scoped_context` is defined, set `active_context`
			// to the result of the Context Processing algorithm, passing the
			// base URL from the term definition for `active_property` and
			// true for `override_protected`.
			if let Some(property_scoped_context) = &property_scoped_context {
				let processed = process_context(
					Environment {
						loader: env.loader,
						warnings: env.warnings,
					},
					active_context.as_ref(),
					property_scoped_context,
					ProcessingStack::new(),
					property_scoped_base_url.as_deref(),
					crate::processing::Options::from(options).with_override(),
				)
				.await?;

				active_context = Mown::Owned(processed);
			}

			// If `element` contains the entry `@context`, set
			// `active_context` to the result of the Context Processing
			// algorithm, passing the `@context` entry value as the local
			// context and `base_url`.
			if let Some(local_context) = object::get(element, "@context") {
				let processed = process_context(
					Environment {
						loader: env.loader,
						warnings: env.warnings,
					},
					active_context.as_ref(),
					local_context,
					ProcessingStack::new(),
					base_url,
					options.into(),
				)
				.await?;

				active_context = Mown::Owned(processed);
			}

			// Collect the entries whose key IRI expands to `@type`, ordered
			// lexicographically by key.
			let mut type_entries: Vec<&Entry> = Vec::new();
			for entry in element.iter() {
				let expanded_key = expand_iri(
					env.warnings,
					active_context.as_ref(),
					Nullable::Some(entry.key.as_str()),
					false,
					true,
				);

				if let Term::Keyword(Keyword::Type) = expanded_key {
					type_entries.push(entry);
				}
			}

			type_entries.sort_unstable_by(|a, b| a.key.cmp(&b.key));

			// Initialize `type_scoped_context` to `active_context`. This is
			// used for expanding values that may be relevant to any previous
			// type-scoped context.
			let type_scoped_context = active_context.as_ref();
			let mut active_context = Mown::Borrowed(active_context.as_ref());

			// For each `term` that is a value of an entry expanding to
			// `@type`, ordered lexicographically, if the term's definition
			// in `type_scoped_context` has a local context, apply it without
			// propagation.
			for entry in &type_entries {
				let value = Value::force_as_array(&entry.value);

				let mut sorted_value = Vec::with_capacity(value.len());
				for term in value {
					if let Some(s) = term.as_str() {
						sorted_value.push(s);
					}
				}

				sorted_value.sort_unstable();

				for term in sorted_value {
					let scoped = type_scoped_context.get(term).and_then(|definition| {
						definition
							.context
							.clone()
							.map(|context| (context, definition.base_url.clone()))
					});

					if let Some((local_context, base_url)) = scoped {
						let processed = process_context(
							Environment {
								loader: env.loader,
								warnings: env.warnings,
							},
							active_context.as_ref(),
							&local_context,
							ProcessingStack::new(),
							base_url.as_deref(),
							crate::processing::Options::from(options).without_propagation(),
						)
						.await?;

						active_context = Mown::Owned(processed);
					}
				}
			}

			// Initialize `input_type` to the expansion of the last value of
			// the first entry in `element` expanding to `@type`.
			let input_type = match type_entries.first() {
				Some(entry) => Value::force_as_array(&entry.value)
					.last()
					.and_then(Value::as_str)
					.map(|input_type| {
						expand_iri(
							env.warnings,
							active_context.as_ref(),
							Nullable::Some(input_type),
							false,
							true,
						)
					}),
				None => None,
			};

			let entries: Cow<[Entry]> = if options.ordered {
				let mut entries = element.entries().to_vec();
				entries.sort_by(|a, b| a.key.cmp(&b.key));
				Cow::Owned(entries)
			} else {
				Cow::Borrowed(element.entries())
			};

			let mut expanded_entries: Vec<ExpandedEntry> = Vec::with_capacity(element.len());
			let mut list_entry = None;
			let mut set_entry = None;
			let mut value_entry = None;
			for entry in entries.iter() {
				if entry.key.is_empty() {
					env.warnings.handle(Warning::EmptyTerm);
				}

				let expanded_key = expand_iri(
					env.warnings,
					active_context.as_ref(),
					Nullable::Some(entry.key.as_str()),
					false,
					true,
				);

				match &expanded_key {
					// `@context` entries have already been processed.
					Term::Keyword(Keyword::Context) => continue,
					Term::Keyword(Keyword::Value) => value_entry = Some(&entry.value),
					Term::Keyword(Keyword::List) => {
						if active_property.is_some() && active_property != Some("@graph") {
							list_entry = Some(&entry.value)
						}
					}
					Term::Keyword(Keyword::Set) => set_entry = Some(&entry.value),
					Term::Id(Id::Blank(id)) => {
						env.warnings.handle(Warning::BlankNodeIdProperty(id.clone()));
					}
					_ => (),
				}

				expanded_entries.push(ExpandedEntry(entry.key.as_str(), expanded_key, &entry.value))
			}

			if let Some(list_entry) = list_entry {
				// List objects.
				let mut index = None;
				for ExpandedEntry(_, expanded_key, value) in &expanded_entries {
					match expanded_key {
						Term::Keyword(Keyword::Index) => match value.as_str() {
							Some(value) => index = Some(value.to_string()),
							None => return Err(Error::InvalidIndexValue),
						},
						Term::Keyword(Keyword::List) => (),
						_ => return Err(Error::InvalidSetOrListObject),
					}
				}

				// Initialize the expanded value to the result of using this
				// algorithm recursively passing `active_property` and the
				// value of the `@list` entry, ensuring that the result is an
				// array.
				let mut result = Vec::new();
				for item in Value::force_as_array(list_entry) {
					let e = Box::pin(expand_element(
						Environment {
							loader: env.loader,
							warnings: env.warnings,
						},
						active_context.as_ref(),
						active_property,
						item,
						base_url,
						options,
						false,
					))
					.await?;
					result.extend(e)
				}

				let mut list = crate::syntax::Object::default();
				list.insert("@list".into(), Value::Array(result));
				if let Some(index) = index {
					list.insert("@index".into(), Value::String(index.as_str().into()));
				}

				Ok(Expanded::Object(Value::Object(list)))
			} else if let Some(set_entry) = set_entry {
				// Set objects.
				for ExpandedEntry(_, expanded_key, _) in &expanded_entries {
					match expanded_key {
						Term::Keyword(Keyword::Index) => {
							// having an `@index` here is tolerated, but is
							// ignored.
						}
						Term::Keyword(Keyword::Set) => (),
						_ => return Err(Error::InvalidSetOrListObject),
					}
				}

				// The expanded value is the result of expanding the `@set`
				// entry value.
				Box::pin(expand_element(
					env,
					active_context.as_ref(),
					active_property,
					set_entry,
					base_url,
					options,
					false,
				))
				.await
			} else if let Some(value_entry) = value_entry {
				// Value objects.
				let expanded_value = expand_value(
					&mut env,
					options,
					input_type,
					type_scoped_context,
					expanded_entries,
					value_entry,
				)?;

				match expanded_value {
					Some(value) => Ok(Expanded::Object(value)),
					None => Ok(Expanded::Null),
				}
			} else {
				// Node objects.
				let result = expand_node(
					env,
					active_context.as_ref(),
					type_scoped_context,
					active_property,
					expanded_entries,
					base_url,
					options,
				)
				.await?;

				match result {
					Some(result) => Ok(Expanded::Object(result)),
					None => Ok(Expanded::Null),
				}
			}
		}

		_ => {
			// Literals.

			// If `element` is a scalar and `active_property` is null or
			// `@graph`, drop the free-floating scalar by returning null.
			if active_property.is_none() || active_property == Some("@graph") {
				return Ok(Expanded::Null);
			}

			// If `property_scoped_context` is defined, set `active_context`
			// to the result of the Context Processing algorithm.
			let active_context = match &property_scoped_context {
				Some(property_scoped_context) => {
					let processed = process_context(
						Environment {
							loader: env.loader,
							warnings: env.warnings,
						},
						active_context,
						property_scoped_context,
						ProcessingStack::new(),
						property_scoped_base_url.as_deref(),
						options.into(),
					)
					.await?;

					Mown::Owned(processed)
				}
				None => Mown::Borrowed(active_context),
			};

			// Return the result of the Value Expansion algorithm, passing
			// the `active_context`, `active_property`, and `element` as
			// value.
			Ok(Expanded::Object(expand_literal(
				&mut env,
				active_context.as_ref(),
				active_property,
				LiteralValue::Given(element),
			)?))
		}
	}
}
