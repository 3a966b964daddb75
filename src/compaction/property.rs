use super::node::optional_string;
use super::{add_value, compact_collection, compact_element, compact_iri, Error, Options};
use crate::object::{self, is_graph_object, is_list_object, is_simple_graph_object, is_value_object, node_id, node_index};
use crate::syntax::{Container, ContainerKind, Keyword, Object, Value};
use crate::warning;
use crate::{Context, Environment, Id, Loader, Term};

fn list_items(list_object: &Value) -> &[Value] {
	match list_object.as_object().and_then(|o| object::get(o, "@list")) {
		Some(Value::Array(items)) => items.as_slice(),
		Some(other) => std::slice::from_ref(other),
		None => &[],
	}
}

fn graph_items(graph_object: &Value) -> &[Value] {
	match graph_object.as_object().and_then(|o| object::get(o, "@graph")) {
		Some(Value::Array(items)) => items.as_slice(),
		Some(other) => std::slice::from_ref(other),
		None => &[],
	}
}

/// Resolves the object the compacted item must be added to, honoring the
/// `@nest` term of the target definition, along with the container mapping
/// and the `as_array` flag.
fn select_nest_result<'a>(
	result: &'a mut Object,
	active_context: &Context,
	item_active_property: &str,
	compact_arrays: bool,
) -> Result<(&'a mut Object, Container, bool), Error> {
	let (nest_result, container) = match active_context.get(item_active_property) {
		Some(term_definition) => {
			let nest_result = match &term_definition.nest {
				Some(nest_term) => {
					// If the nest term is not `@nest`, it must be a term in
					// the active context that expands to `@nest`.
					if nest_term != "@nest" {
						match active_context.get(nest_term) {
							Some(term_def)
								if term_def.value == Some(Term::Keyword(Keyword::Nest)) => {}
							_ => return Err(Error::InvalidNestValue),
						}
					}

					// If `result` does not have a `nest_term` entry,
					// initialize it to an empty map.
					if object::get(result, nest_term).is_none() {
						result.insert(
							nest_term.as_str().into(),
							Value::Object(Object::default()),
						);
					}

					object::get_mut(result, nest_term)
						.and_then(Value::as_object_mut)
						.unwrap()
				}
				None => result,
			};

			(nest_result, term_definition.container)
		}
		None => (result, Container::None),
	};

	// `as_array` is true if the container includes `@set`, or if
	// `item_active_property` is `@graph` or `@list`, otherwise the negation
	// of `compact_arrays`.
	let as_array = container.contains(ContainerKind::Set)
		|| item_active_property == "@graph"
		|| item_active_property == "@list"
		|| !compact_arrays;

	Ok((nest_result, container, as_array))
}

/// Removes the first value of the `container_key` entry of the compacted
/// item, returning it (when it is a string) along with any remaining values.
fn take_first_value(
	compacted_item: &mut Value,
	container_key: Option<&str>,
) -> (Option<String>, Vec<Value>) {
	match compacted_item.as_object_mut() {
		Some(map) => match container_key.and_then(|key| object::remove(map, key)) {
			Some(Value::String(s)) => (Some(s.to_string()), Vec::new()),
			Some(Value::Array(values)) => {
				let mut values = values.into_iter();
				match values.next() {
					Some(first_value) => (
						first_value.as_str().map(ToOwned::to_owned),
						values.collect(),
					),
					None => (None, Vec::new()),
				}
			}
			Some(other) => (None, vec![other]),
			None => (None, Vec::new()),
		},
		None => (None, Vec::new()),
	}
}

#[allow(clippy::too_many_arguments)]
async fn compact_property_list<L, W>(
	env: Environment<'_, L, W>,
	list_object: &Value,
	nest_result: &mut Object,
	container: Container,
	as_array: bool,
	item_active_property: &str,
	active_context: &Context,
	options: Options,
) -> Result<(), Error>
where
	L: Loader,
	W: warning::Handler,
{
	// If the expanded item is a list object, compact the value of its
	// `@list` entry.
	let mut compacted_item = Box::pin(compact_collection(
		env,
		list_items(list_object),
		active_context,
		active_context,
		Some(item_active_property),
		options,
	))
	.await?;

	// If the compacted item is not an array, then set it to an array
	// containing only itself.
	if !compacted_item.is_array() {
		compacted_item = Value::Array(vec![compacted_item])
	}

	// If `container` does not include `@list`:
	if !container.contains(ContainerKind::List) {
		// Convert the compacted item to a list object, keying the original
		// compacted item under the alias of `@list`.
		let key = compact_iri(
			active_context,
			&Term::Keyword(Keyword::List),
			None,
			true,
			false,
			options,
		)?
		.unwrap();

		let mut compacted_item_list_object = Object::default();
		compacted_item_list_object.insert(key.as_str().into(), compacted_item);

		// If the expanded item contains an `@index` entry, keep it under
		// the alias of `@index`.
		if let Some(index) = node_index(list_object) {
			let key = compact_iri(
				active_context,
				&Term::Keyword(Keyword::Index),
				None,
				true,
				false,
				options,
			)?
			.unwrap();

			compacted_item_list_object.insert(key.as_str().into(), Value::String(index.into()));
		}

		add_value(
			nest_result,
			item_active_property,
			Value::Object(compacted_item_list_object),
			as_array,
		)
	} else {
		// Otherwise, set the value of the item active property entry in
		// `nest_result` to the compacted item.
		nest_result.insert(item_active_property.into(), compacted_item);
	}

	Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn compact_property_graph<L, W>(
	env: Environment<'_, L, W>,
	graph_object: &Value,
	nest_result: &mut Object,
	container: Container,
	as_array: bool,
	item_active_property: &str,
	active_context: &Context,
	options: Options,
) -> Result<(), Error>
where
	L: Loader,
	W: warning::Handler,
{
	let expanded_index = node_index(graph_object);
	let graph_id = node_id(graph_object);
	let is_simple_graph = is_simple_graph_object(graph_object);

	// If the expanded item is a graph object, compact the value of its
	// `@graph` entry.
	let mut compacted_item = Box::pin(compact_collection(
		env,
		graph_items(graph_object),
		active_context,
		active_context,
		Some(item_active_property),
		options,
	))
	.await?;

	if container.contains(ContainerKind::Graph) && container.contains(ContainerKind::Id) {
		// The compacted graphs are collected in a map keyed by the
		// compacted graph name (or the alias of `@none`).
		if object::get(nest_result, item_active_property).is_none() {
			nest_result.insert(
				item_active_property.into(),
				Value::Object(Object::default()),
			);
		}

		let map_object = object::get_mut(nest_result, item_active_property)
			.and_then(Value::as_object_mut)
			.unwrap();

		let (id_value, vocab) = match graph_id {
			Some(id) => (Term::Id(Id::new(id)), false),
			None => (Term::Keyword(Keyword::None), true),
		};

		let map_key = compact_iri(active_context, &id_value, None, vocab, false, options)?.unwrap();

		add_value(map_object, &map_key, compacted_item, as_array)
	} else if container.contains(ContainerKind::Graph)
		&& container.contains(ContainerKind::Index)
		&& is_simple_graph
	{
		// The compacted graphs are collected in a map keyed by index.
		if object::get(nest_result, item_active_property).is_none() {
			nest_result.insert(
				item_active_property.into(),
				Value::Object(Object::default()),
			);
		}

		let map_object = object::get_mut(nest_result, item_active_property)
			.and_then(Value::as_object_mut)
			.unwrap();

		let map_key = expanded_index.unwrap_or("@none");

		add_value(map_object, map_key, compacted_item, as_array)
	} else if container.contains(ContainerKind::Graph) && is_simple_graph {
		// A multi-valued compacted item cannot be represented directly, as
		// multiple objects would be interpreted as different named graphs:
		// it moves under the alias of `@included`.
		compacted_item = match compacted_item {
			Value::Array(items) if items.len() > 1 => {
				let key = compact_iri(
					active_context,
					&Term::Keyword(Keyword::Included),
					None,
					true,
					false,
					options,
				)?
				.unwrap();

				let mut map = Object::default();
				map.insert(key.as_str().into(), Value::Array(items));
				Value::Object(map)
			}
			item => item,
		};

		add_value(nest_result, item_active_property, compacted_item, as_array)
	} else {
		// Otherwise, wrap the compacted item under the alias of `@graph`,
		// keeping the graph name and index entries.
		let key = compact_iri(
			active_context,
			&Term::Keyword(Keyword::Graph),
			None,
			true,
			false,
			options,
		)?
		.unwrap();

		let mut map = Object::default();
		map.insert(key.as_str().into(), compacted_item);

		if let Some(id) = graph_id {
			let key = compact_iri(
				active_context,
				&Term::Keyword(Keyword::Id),
				None,
				true,
				false,
				options,
			)?
			.unwrap();

			let value = compact_iri(
				active_context,
				&Term::Id(Id::new(id)),
				None,
				false,
				false,
				options,
			)?;

			map.insert(key.as_str().into(), optional_string(value));
		}

		if let Some(index) = expanded_index {
			let key = compact_iri(
				active_context,
				&Term::Keyword(Keyword::Index),
				None,
				true,
				false,
				options,
			)?
			.unwrap();

			map.insert(key.as_str().into(), Value::String(index.into()));
		}

		add_value(
			nest_result,
			item_active_property,
			Value::Object(map),
			as_array,
		)
	}

	Ok(())
}

/// Compacts the values of the given expanded property into `result`.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn compact_property<L, W>(
	mut env: Environment<'_, L, W>,
	result: &mut Object,
	expanded_property: Term,
	expanded_value: &[Value],
	active_context: &Context,
	inside_reverse: bool,
	options: Options,
) -> Result<(), Error>
where
	L: Loader,
	W: warning::Handler,
{
	let mut is_empty = true;

	// For each item in the expanded value:
	for expanded_item in expanded_value {
		is_empty = false;

		// Initialize `item_active_property` by IRI compacting the expanded
		// property, using the expanded item for value and `inside_reverse`
		// for reverse.
		let item_active_property = compact_iri(
			active_context,
			&expanded_property,
			Some(expanded_item),
			true,
			inside_reverse,
			options,
		)?;

		if let Some(item_active_property) = item_active_property {
			let (nest_result, container, as_array) = select_nest_result(
				result,
				active_context,
				&item_active_property,
				options.compact_arrays,
			)?;

			if is_list_object(expanded_item) {
				compact_property_list(
					Environment {
						loader: env.loader,
						warnings: env.warnings,
					},
					expanded_item,
					nest_result,
					container,
					as_array,
					&item_active_property,
					active_context,
					options,
				)
				.await?
			} else if is_graph_object(expanded_item) {
				compact_property_graph(
					Environment {
						loader: env.loader,
						warnings: env.warnings,
					},
					expanded_item,
					nest_result,
					container,
					as_array,
					&item_active_property,
					active_context,
					options,
				)
				.await?
			} else {
				// Initialize the compacted item to the result of using this
				// algorithm recursively, passing `item_active_property` for
				// active property.
				let mut compacted_item = Box::pin(compact_element(
					Environment {
						loader: env.loader,
						warnings: env.warnings,
					},
					expanded_item,
					active_context,
					active_context,
					Some(&item_active_property),
					options,
				))
				.await?;

				// If the container includes `@language`, `@index`, `@id` or
				// `@type` and does not include `@graph`, the compacted item
				// goes into a map keyed by the discriminant.
				if !container.contains(ContainerKind::Graph)
					&& (container.contains(ContainerKind::Language)
						|| container.contains(ContainerKind::Index)
						|| container.contains(ContainerKind::Id)
						|| container.contains(ContainerKind::Type))
				{
					if object::get(nest_result, &item_active_property).is_none() {
						nest_result.insert(
							item_active_property.as_str().into(),
							Value::Object(Object::default()),
						);
					}

					let container_type = if container.contains(ContainerKind::Language) {
						ContainerKind::Language
					} else if container.contains(ContainerKind::Index) {
						ContainerKind::Index
					} else if container.contains(ContainerKind::Id) {
						ContainerKind::Id
					} else {
						ContainerKind::Type
					};

					// Initialize the container key by IRI compacting the
					// container discriminant.
					let mut container_key = compact_iri(
						active_context,
						&Term::Keyword(container_type.into_keyword()),
						None,
						true,
						false,
						options,
					)?;

					// Initialize `index_key` to the index mapping of the
					// term definition of `item_active_property`, if any.
					let index_key = active_context
						.get(&item_active_property)
						.and_then(|definition| definition.index.as_deref());

					let map_key = if container_type == ContainerKind::Language
						&& is_value_object(expanded_item)
					{
						// For language maps the compacted item is the bare
						// `@value` entry, keyed by the language tag.
						if let Some(value) = expanded_item
							.as_object()
							.and_then(|o| object::get(o, "@value"))
						{
							compacted_item = value.clone()
						}

						expanded_item
							.as_object()
							.and_then(|o| object::get(o, "@language"))
							.and_then(Value::as_str)
							.map(ToOwned::to_owned)
					} else if container_type == ContainerKind::Index {
						match index_key {
							Some(index_key) => {
								// The index is found under the key's custom
								// index mapping: reinitialize the container
								// key by IRI compacting it, and re-parent
								// its remaining values.
								container_key = compact_iri(
									active_context,
									&Term::Id(Id::new(index_key)),
									None,
									true,
									false,
									options,
								)?;

								let (map_key, remaining_values) = take_first_value(
									&mut compacted_item,
									container_key.as_deref(),
								);

								if !remaining_values.is_empty() {
									if let Some(map) = compacted_item.as_object_mut() {
										for value in remaining_values {
											add_value(
												map,
												container_key.as_deref().unwrap(),
												value,
												false,
											)
										}
									}
								}

								map_key
							}
							None => node_index(expanded_item).map(ToOwned::to_owned),
						}
					} else if container_type == ContainerKind::Id {
						// The map key is the compacted `@id`, removed from
						// the compacted item.
						compacted_item
							.as_object_mut()
							.and_then(|map| {
								object::remove(map, container_key.as_deref().unwrap())
							})
							.and_then(|value| value.as_str().map(ToOwned::to_owned))
					} else {
						// Otherwise, the container includes `@type`: the map
						// key is the first compacted type, the remaining
						// types are re-parented.
						let (map_key, remaining_values) =
							take_first_value(&mut compacted_item, container_key.as_deref());

						if !remaining_values.is_empty() {
							if let Some(map) = compacted_item.as_object_mut() {
								for value in remaining_values {
									add_value(
										map,
										container_key.as_deref().unwrap(),
										value,
										false,
									)
								}
							}
						}

						// If the compacted item contains a single entry
						// whose key expands to `@id`, recompact it from a
						// bare subject reference.
						let recompact = match compacted_item.as_object() {
							Some(map) => map.len() == 1 && object::get(map, "@id").is_some(),
							None => false,
						};

						if recompact {
							let mut reference = Object::default();
							if let Some(id) = node_id(expanded_item) {
								reference
									.insert("@id".into(), Value::String(id.into()));
							}

							compacted_item = Box::pin(compact_element(
								Environment {
									loader: env.loader,
									warnings: env.warnings,
								},
								&Value::Object(reference),
								active_context,
								active_context,
								Some(&item_active_property),
								options,
							))
							.await?
						}

						map_key
					};

					// If the map key is null, use the alias of `@none`.
					let map_key = match map_key {
						Some(key) => key,
						None => compact_iri(
							active_context,
							&Term::Keyword(Keyword::None),
							None,
							true,
							false,
							options,
						)?
						.unwrap(),
					};

					let map_object = object::get_mut(nest_result, &item_active_property)
						.and_then(Value::as_object_mut)
						.unwrap();

					add_value(map_object, &map_key, compacted_item, as_array)
				} else {
					// Otherwise, add the compacted item to the
					// `item_active_property` entry of `nest_result`.
					add_value(nest_result, &item_active_property, compacted_item, as_array)
				}
			}
		}
	}

	// If the expanded value is an empty array:
	if is_empty {
		// Initialize `item_active_property` by IRI compacting the expanded
		// property, using an empty node object for value.
		let empty_node = Value::Object(Object::default());
		let item_active_property = compact_iri(
			active_context,
			&expanded_property,
			Some(&empty_node),
			true,
			inside_reverse,
			options,
		)?;

		if let Some(item_active_property) = item_active_property {
			let (nest_result, _, _) = select_nest_result(
				result,
				active_context,
				&item_active_property,
				options.compact_arrays,
			)?;

			// Add an empty array to the `item_active_property` entry.
			add_value(
				nest_result,
				&item_active_property,
				Value::Array(Vec::new()),
				true,
			)
		}
	}

	Ok(())
}
