use super::{add_value, compact_iri, compact_property, Error, Options};
use crate::context::Type;
use crate::object::{self, is_subject_reference, node_id, node_index};
use crate::processing::{process_context, ProcessingStack};
use crate::syntax::{Container, ContainerKind, Keyword, Object, Value};
use crate::warning;
use crate::{processing, Context, Environment, Id, Loader, ProcessingMode, Term};
use json_syntax::object::Entry;
use mown::Mown;

pub(crate) fn optional_string(s: Option<String>) -> Value {
	match s {
		Some(s) => Value::String(s.as_str().into()),
		None => Value::Null,
	}
}

/// Compacts the given node object (or graph object, or subject reference).
pub(crate) async fn compact_node<L, W>(
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
	let element_object = match element.as_object() {
		Some(object) => object,
		None => return Ok(element.clone()),
	};

	// If the active context has a previous context, the active context is
	// not propagated, unless `element` consists of a single `@id` entry:
	// the scope of a term-scoped context does not apply when processing new
	// node objects.
	let mut active_context = active_context;
	if !is_subject_reference(element) {
		if let Some(previous_context) = active_context.previous_context() {
			active_context = previous_context
		}
	}

	// If the term definition for `active_property` has a local context,
	// apply it with `override_protected`.
	let mut active_context = Mown::Borrowed(active_context);
	if let Some(active_property) = active_property {
		let scoped = type_scoped_context.get(active_property).and_then(|definition| {
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
				processing::Options::from(options).with_override(),
			)
			.await?;

			active_context = Mown::Owned(processed)
		}
	}

	// If `element` has an `@type` entry, apply the type-scoped contexts of
	// the compacted types, in lexicographic order of the compacted term.
	let types: Vec<&str> = match element_object
		.iter()
		.find(|entry| entry.key.as_str() == "@type")
	{
		Some(entry) => Value::force_as_array(&entry.value)
			.iter()
			.filter_map(Value::as_str)
			.collect(),
		None => Vec::new(),
	};

	if !types.is_empty() {
		let mut compacted_types = Vec::with_capacity(types.len());
		for ty in &types {
			let compacted_ty = compact_iri(
				type_scoped_context,
				&Term::Id(Id::new(*ty)),
				None,
				true,
				false,
				options,
			)?;
			compacted_types.push(compacted_ty.unwrap_or_default())
		}

		compacted_types.sort();

		for term in &compacted_types {
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
					processing::Options::from(options).without_propagation(),
				)
				.await?;

				active_context = Mown::Owned(processed)
			}
		}
	}

	let mut result = Object::default();

	// If `element` has an `@id` entry:
	if let Some(id) = node_id(element) {
		let id_term = Term::Id(Id::new(id));

		if is_subject_reference(element) {
			// If the type mapping of the active property is set to `@id`
			// or `@vocab`, a subject reference compacts to a plain string.
			let type_mapping = active_property
				.and_then(|property| active_context.get(property))
				.and_then(|definition| definition.typ.clone());

			if type_mapping == Some(Type::Id) {
				let compacted_value =
					compact_iri(active_context.as_ref(), &id_term, None, false, false, options)?;
				return Ok(optional_string(compacted_value));
			}

			if type_mapping == Some(Type::Vocab) {
				let compacted_value =
					compact_iri(active_context.as_ref(), &id_term, None, true, false, options)?;
				return Ok(optional_string(compacted_value));
			}
		}

		// Otherwise, initialize the compacted value by IRI compacting the
		// identifier with `vocab` set to false, under the alias of `@id`.
		let compacted_value =
			compact_iri(active_context.as_ref(), &id_term, None, false, false, options)?;

		let alias = compact_iri(
			active_context.as_ref(),
			&Term::Keyword(Keyword::Id),
			None,
			true,
			false,
			options,
		)?;

		if let Some(alias) = alias {
			result.insert(alias.as_str().into(), optional_string(compacted_value));
		}
	}

	// If `element` has an `@type` entry, compact it using the type-scoped
	// context.
	if !types.is_empty() {
		let compacted_value = if types.len() == 1 {
			optional_string(compact_iri(
				type_scoped_context,
				&Term::Id(Id::new(types[0])),
				None,
				true,
				false,
				options,
			)?)
		} else {
			let mut compacted_value = Vec::with_capacity(types.len());
			for ty in &types {
				compacted_value.push(optional_string(compact_iri(
					type_scoped_context,
					&Term::Id(Id::new(*ty)),
					None,
					true,
					false,
					options,
				)?))
			}

			Value::Array(compacted_value)
		};

		let alias = compact_iri(
			active_context.as_ref(),
			&Term::Keyword(Keyword::Type),
			None,
			true,
			false,
			options,
		)?
		.unwrap();

		// `as_array` is true if processing mode is json-ld-1.1 and the
		// container mapping for the alias includes `@set`, otherwise the
		// negation of `compact_arrays`.
		let container_mapping = active_context
			.get(&alias)
			.map(|definition| definition.container)
			.unwrap_or(Container::None);

		let as_array = (options.processing_mode == ProcessingMode::JsonLd1_1
			&& container_mapping.contains(ContainerKind::Set))
			|| !options.compact_arrays;

		add_value(&mut result, &alias, compacted_value, as_array)
	}

	// If `element` has an `@reverse` entry:
	if let Some(Value::Object(reverse_properties)) = object::get(element_object, "@reverse") {
		if !reverse_properties.is_empty() {
			let scoped = active_context.get("@reverse").and_then(|definition| {
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
					processing::Options::from(options).with_override(),
				)
				.await?;

				active_context = Mown::Owned(processed)
			}

			// Compact each reverse property into `reverse_result`.
			let mut reverse_result = Object::default();
			for entry in reverse_properties.iter() {
				compact_property(
					Environment {
						loader: env.loader,
						warnings: env.warnings,
					},
					&mut reverse_result,
					Term::Id(Id::new(entry.key.as_str())),
					Value::force_as_array(&entry.value),
					active_context.as_ref(),
					true,
					options,
				)
				.await?
			}

			// Properties compacted to a reverse-property term move to the
			// top level of `result`; the rest stays under the `@reverse`
			// alias.
			let mut reverse_map = Object::default();
			for Entry {
				key: property,
				value,
			} in reverse_result
			{
				let reverse_term_definition = active_context.get(property.as_str());

				match reverse_term_definition {
					Some(definition) if definition.reverse_property => {
						let as_array = definition.container.contains(ContainerKind::Set)
							|| !options.compact_arrays;

						add_value(&mut result, property.as_str(), value, as_array);
					}
					_ => {
						reverse_map.insert(property, value);
					}
				}
			}

			if !reverse_map.is_empty() {
				let alias = compact_iri(
					active_context.as_ref(),
					&Term::Keyword(Keyword::Reverse),
					None,
					true,
					false,
					options,
				)?
				.unwrap();

				result.insert(alias.as_str().into(), Value::Object(reverse_map));
			}
		}
	}

	// If `element` has an `@index` entry and the active property has a
	// container mapping that includes `@index`, the compacted result will
	// be inside of an `@index` container: drop the entry. Otherwise keep it
	// under the `@index` alias.
	if let Some(index) = node_index(element) {
		let mut index_container = false;
		if let Some(active_property) = active_property {
			if let Some(active_property_definition) = active_context.get(active_property) {
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

	// For each key-value pair in `element`, ordered lexicographically by
	// key if `ordered` is true:
	let mut entries: Vec<&Entry> = element_object.iter().collect();
	if options.ordered {
		entries.sort_by(|a, b| a.key.cmp(&b.key));
	}

	for entry in entries {
		match entry.key.as_str() {
			// Handled above.
			"@id" | "@type" | "@reverse" | "@index" => (),
			"@graph" => {
				compact_property(
					Environment {
						loader: env.loader,
						warnings: env.warnings,
					},
					&mut result,
					Term::Keyword(Keyword::Graph),
					Value::force_as_array(&entry.value),
					active_context.as_ref(),
					false,
					options,
				)
				.await?
			}
			"@included" => {
				compact_property(
					Environment {
						loader: env.loader,
						warnings: env.warnings,
					},
					&mut result,
					Term::Keyword(Keyword::Included),
					Value::force_as_array(&entry.value),
					active_context.as_ref(),
					false,
					options,
				)
				.await?
			}
			property => {
				compact_property(
					Environment {
						loader: env.loader,
						warnings: env.warnings,
					},
					&mut result,
					Term::Id(Id::new(property)),
					Value::force_as_array(&entry.value),
					active_context.as_ref(),
					false,
					options,
				)
				.await?
			}
		}
	}

	Ok(Value::Object(result))
}
