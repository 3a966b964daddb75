use super::{
	expand_element, expand_literal, filter_top_level_item, Error, Expanded, ExpandedEntry,
	LiteralValue, Options,
};
use crate::object::{self, is_list_object, is_value_object, node_id, node_index};
use crate::processing::{expand_iri, process_context, ProcessingStack};
use crate::syntax::{Container, ContainerKind, Keyword, LenientLangTagBuf, Nullable, Object, Value};
use crate::warning::{self, Warning};
use crate::{context::Type, Context, Environment, Loader, ProcessingMode, Term};
use iref::Iri;
use json_syntax::object::Entry;
use mown::Mown;

/// Converts an expansion result to a node identifier entry value.
///
/// Returns `None` if the term is `null`, in which case no `@id` entry is
/// produced.
fn term_into_id_string(term: Term) -> Option<String> {
	match term {
		Term::Null => None,
		Term::Keyword(k) => Some(k.into_str().to_string()),
		Term::Id(id) => Some(id.into_string()),
	}
}

/// Checks if the given expanded item may stand for a node: anything that is
/// neither a value object nor a list object.
fn is_node(value: &Value) -> bool {
	!is_value_object(value) && !is_list_object(value)
}

/// Appends the given values to the array entry `key` of `result`, creating
/// it if necessary.
fn insert_all(result: &mut Object, key: &str, values: impl IntoIterator<Item = Value>) {
	if object::get(result, key).is_none() {
		result.insert(key.into(), Value::Array(Vec::new()));
	}

	if let Some(Value::Array(array)) = object::get_mut(result, key) {
		array.extend(values)
	}
}

/// Appends the given nodes under the `@reverse` entry of `result`.
fn insert_reverse(result: &mut Object, property: &str, nodes: Vec<Value>) {
	if object::get(result, "@reverse").is_none() {
		result.insert("@reverse".into(), Value::Object(Object::default()));
	}

	if let Some(Value::Object(reverse_map)) = object::get_mut(result, "@reverse") {
		insert_all(reverse_map, property, nodes)
	}
}

/// Wraps the given item into a graph object.
fn graph_object(item: Value) -> Value {
	let mut node = Object::default();
	node.insert("@graph".into(), Value::Array(vec![item]));
	Value::Object(node)
}

/// Expands a node object.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn expand_node<L, W>(
	env: Environment<'_, L, W>,
	active_context: &Context,
	type_scoped_context: &Context,
	active_property: Option<&str>,
	expanded_entries: Vec<ExpandedEntry<'_>>,
	base_url: Option<&Iri>,
	options: Options,
) -> Result<Option<Value>, Error>
where
	L: Loader,
	W: warning::Handler,
{
	// Initialize two empty maps, `result` and `nests`.
	let (result, has_value_object_entries) = expand_node_entries(
		env,
		Object::default(),
		false,
		active_context,
		type_scoped_context,
		active_property,
		expanded_entries,
		base_url,
		options,
	)
	.await?;

	// If `result` contains only the entry `@language` (which is never
	// stored), return null.
	if has_value_object_entries && result.iter().all(|e| e.key.as_str() == "@index") {
		return Ok(None);
	}

	// If `active_property` is null or `@graph`, drop free-floating values:
	// a map which is empty or whose only entry is `@id` becomes null.
	if !options.frame_expansion
		&& (active_property.is_none() || active_property == Some("@graph"))
		&& result.iter().all(|e| e.key.as_str() == "@id")
	{
		return Ok(None);
	}

	Ok(Some(Value::Object(result)))
}

type ExpandedNode = (Object, bool);

/// Expands the entries of a node object into `result`.
///
/// The boolean flag is set when the node contains value object entries
/// (`@language` or `@direction`).
#[allow(clippy::too_many_arguments)]
async fn expand_node_entries<L, W>(
	mut env: Environment<'_, L, W>,
	mut result: Object,
	mut has_value_object_entries: bool,
	active_context: &Context,
	type_scoped_context: &Context,
	active_property: Option<&str>,
	expanded_entries: Vec<ExpandedEntry<'_>>,
	base_url: Option<&Iri>,
	options: Options,
) -> Result<ExpandedNode, Error>
where
	L: Loader,
	W: warning::Handler,
{
	let mut nests: Vec<(&str, &Value)> = Vec::new();

	// For each `key` and `value` in `element`, ordered lexicographically by
	// key if `ordered` is true (ordering done by the caller):
	for ExpandedEntry(key, expanded_key, value) in expanded_entries {
		match expanded_key {
			Term::Null => (),

			// If `key` is `@context`, continue to the next key.
			Term::Keyword(Keyword::Context) => (),

			// If `expanded_property` is a keyword:
			Term::Keyword(expanded_property) => {
				// If `active_property` equals `@reverse`, an invalid reverse
				// property map error has been detected.
				if active_property == Some("@reverse") {
					return Err(Error::InvalidReversePropertyMap);
				}

				// If `result` already has an `expanded_property` entry,
				// other than `@included` or `@type` (unless processing mode
				// is json-ld-1.0), a colliding keywords error has been
				// detected.
				if (options.processing_mode == ProcessingMode::JsonLd1_0
					|| (expanded_property != Keyword::Included
						&& expanded_property != Keyword::Type))
					&& object::get(&result, expanded_property.into_str()).is_some()
				{
					return Err(Error::CollidingKeywords);
				}

				match expanded_property {
					// If `expanded_property` is `@id`:
					Keyword::Id => {
						// `value` must be a string; the expanded value is
						// the result of IRI expanding it using true for
						// document relative and false for vocab.
						let str_value = value.as_str().ok_or(Error::InvalidIdValue)?;

						let id = expand_iri(
							env.warnings,
							active_context,
							Nullable::Some(str_value),
							true,
							false,
						);

						if let Some(id) = term_into_id_string(id) {
							result.insert("@id".into(), Value::String(id.as_str().into()));
						}
					}
					// If `expanded_property` is `@type`:
					Keyword::Type => {
						// `value` must be a string or an array of strings.
						// Each value is IRI expanded using the type-scoped
						// context and true for document relative.
						for ty in Value::force_as_array(value) {
							let ty = ty.as_str().ok_or(Error::InvalidTypeValue)?;

							match expand_iri(
								env.warnings,
								type_scoped_context,
								Nullable::Some(ty),
								true,
								true,
							) {
								Term::Id(id) => insert_all(
									&mut result,
									"@type",
									std::iter::once(Value::String(id.as_str().into())),
								),
								_ => return Err(Error::InvalidTypeValue),
							}
						}
					}
					// If `expanded_property` is `@graph`:
					Keyword::Graph => {
						// The expanded value is the result of using this
						// algorithm recursively passing `@graph` for active
						// property, ensuring that the result is an array of
						// one or more maps.
						let expanded_value = Box::pin(expand_element(
							Environment {
								loader: env.loader,
								warnings: env.warnings,
							},
							active_context,
							Some("@graph"),
							value,
							base_url,
							options,
							false,
						))
						.await?;

						result.insert(
							"@graph".into(),
							Value::Array(
								expanded_value
									.into_iter()
									.filter(filter_top_level_item)
									.collect(),
							),
						);
					}
					// If `expanded_property` is `@included`:
					Keyword::Included => {
						// If processing mode is json-ld-1.0, continue with
						// the next key.
						if options.processing_mode == ProcessingMode::JsonLd1_0 {
							continue;
						}

						let expanded_value = Box::pin(expand_element(
							Environment {
								loader: env.loader,
								warnings: env.warnings,
							},
							active_context,
							Some("@included"),
							value,
							base_url,
							options,
							false,
						))
						.await?;

						// The expanded value must only contain node objects.
						let mut expanded_nodes = Vec::new();
						for object in expanded_value {
							if is_node(&object) {
								expanded_nodes.push(object)
							} else {
								return Err(Error::InvalidIncludedValue);
							}
						}

						insert_all(&mut result, "@included", expanded_nodes);
					}
					// `@language` and `@direction` entries only make sense
					// in value objects; their presence is recorded so that
					// maps containing only `@language` can be dropped.
					Keyword::Language => has_value_object_entries = true,
					Keyword::Direction => has_value_object_entries = true,
					// If `expanded_property` is `@index`:
					Keyword::Index => {
						let index = value.as_str().ok_or(Error::InvalidIndexValue)?;
						result.insert("@index".into(), Value::String(index.into()));
					}
					// If `expanded_property` is `@reverse`:
					Keyword::Reverse => {
						// `value` must be a map.
						let value = match value.as_object() {
							Some(value) => value,
							None => return Err(Error::InvalidReverseValue),
						};

						let mut reverse_entries: Vec<&Entry> = value.iter().collect();

						if options.ordered {
							reverse_entries.sort_by(|a, b| a.key.cmp(&b.key));
						}

						for Entry {
							key: reverse_key,
							value: reverse_value,
						} in reverse_entries
						{
							match expand_iri(
								env.warnings,
								active_context,
								Nullable::Some(reverse_key.as_str()),
								false,
								true,
							) {
								Term::Keyword(_) => {
									return Err(Error::InvalidReversePropertyMap)
								}
								Term::Id(reverse_prop)
									if reverse_prop.as_str().contains(':') =>
								{
									let reverse_expanded_value = Box::pin(expand_element(
										Environment {
											loader: env.loader,
											warnings: env.warnings,
										},
										active_context,
										Some(reverse_key.as_str()),
										reverse_value,
										base_url,
										options,
										false,
									))
									.await?;

									// A double-reversed property becomes a
									// regular property of the node.
									let is_double_reversed = active_context
										.get(reverse_key.as_str())
										.map(|definition| definition.reverse_property)
										.unwrap_or(false);

									if is_double_reversed {
										insert_all(
											&mut result,
											reverse_prop.as_str(),
											reverse_expanded_value,
										)
									} else {
										let mut reverse_expanded_nodes = Vec::new();
										for object in reverse_expanded_value {
											if is_node(&object) {
												reverse_expanded_nodes.push(object)
											} else {
												return Err(
													Error::InvalidReversePropertyValue,
												);
											}
										}

										insert_reverse(
											&mut result,
											reverse_prop.as_str(),
											reverse_expanded_nodes,
										)
									}
								}
								// Other keys are dropped.
								_ => (),
							}
						}
					}
					// `@nest` entries are deferred and processed after the
					// main loop.
					Keyword::Nest => nests.push((key, value)),
					Keyword::Value => return Err(Error::InvalidNestValue),
					_ => (),
				}
			}

			Term::Id(prop) if prop.as_str().contains(':') => {
				let key_definition = active_context.get(key);
				let mut container_mapping = Container::None;
				let mut is_reverse_property = false;
				let mut is_json = false;

				if let Some(key_definition) = key_definition {
					is_reverse_property = key_definition.reverse_property;

					// Initialize `container_mapping` to the key's container
					// mapping in the active context.
					container_mapping = key_definition.container;

					// If the key's term definition has a type mapping of
					// `@json`, the expanded value is a JSON literal.
					if key_definition.typ == Some(Type::Json) {
						is_json = true;
					}
				}

				let mut expanded_value = if is_json {
					let mut json_value = Object::default();
					json_value.insert("@value".into(), value.clone());
					json_value.insert("@type".into(), Value::String("@json".into()));
					Expanded::Object(Value::Object(json_value))
				} else {
					match value.as_object() {
						Some(value) if container_mapping.contains(ContainerKind::Language) => {
							// The value is expanded from a language map.
							let mut expanded_value = Vec::new();

							// Initialize `direction` to the default base
							// direction, overridden by the key's direction
							// mapping if any.
							let mut direction = active_context.default_base_direction();

							if let Some(key_definition) = key_definition {
								if let Some(key_direction) = key_definition.direction {
									direction = key_direction.option()
								}
							}

							let mut language_entries: Vec<&Entry> =
								value.iter().collect();

							if options.ordered {
								language_entries.sort_by(|a, b| a.key.cmp(&b.key));
							}

							for Entry {
								key: language,
								value: language_value,
							} in language_entries
							{
								// For each item in the language value:
								for item in Value::force_as_array(language_value) {
									match item {
										// Null items are skipped.
										Value::Null => (),
										Value::String(item) => {
											// If the language key is `@none`
											// or expands to `@none`, no
											// `@language` entry is added.
											let language = if expand_iri(
												env.warnings,
												active_context,
												Nullable::Some(language.as_str()),
												false,
												true,
											) == Term::Keyword(Keyword::None)
											{
												None
											} else {
												let (language, error) =
													LenientLangTagBuf::new(
														language.as_str().to_owned(),
													);

												if let Some(error) = error {
													env.warnings.handle(
														Warning::MalformedLanguageTag(
															language.as_str().to_owned(),
															error,
														),
													)
												}

												Some(language)
											};

											let mut v = Object::default();
											v.insert(
												"@value".into(),
												Value::String(item.clone()),
											);

											if let Some(language) = language {
												v.insert(
													"@language".into(),
													Value::String(
														language.as_str().into(),
													),
												);
											}

											if let Some(direction) = direction {
												v.insert(
													"@direction".into(),
													Value::String(
														direction.as_str().into(),
													),
												);
											}

											expanded_value.push(Value::Object(v))
										}
										_ => {
											// Items must be strings.
											return Err(Error::InvalidLanguageMapValue);
										}
									}
								}
							}

							Expanded::Array(expanded_value)
						}
						Some(value)
							if container_mapping.contains(ContainerKind::Index)
								|| container_mapping.contains(ContainerKind::Type)
								|| container_mapping.contains(ContainerKind::Id) =>
						{
							// The value is expanded from an index map.
							let mut expanded_value: Vec<Value> = Vec::new();

							// Initialize `index_key` to the key's index
							// mapping in the active context, or `@index` if
							// it does not exist.
							let index_key = key_definition
								.and_then(|definition| definition.index.as_deref())
								.unwrap_or("@index");

							let mut entries: Vec<&Entry> = value.iter().collect();

							if options.ordered {
								entries.sort_by(|a, b| a.key.cmp(&b.key));
							}

							for Entry {
								key: index,
								value: index_value,
							} in entries
							{
								// If the container mapping includes `@id` or
								// `@type`, initialize `map_context` to the
								// previous context from the active context,
								// if it exists.
								let mut map_context = Mown::Borrowed(active_context);
								if container_mapping.contains(ContainerKind::Type)
									|| container_mapping.contains(ContainerKind::Id)
								{
									if let Some(previous_context) =
										active_context.previous_context()
									{
										map_context = Mown::Borrowed(previous_context)
									}
								}

								// If the container mapping includes `@type`
								// and the index's term definition in
								// `map_context` has a local context, apply
								// it.
								if container_mapping.contains(ContainerKind::Type) {
									let scoped = map_context
										.get(index.as_str())
										.and_then(|definition| {
											definition.context.clone().map(|context| {
												(context, definition.base_url.clone())
											})
										});

									if let Some((local_context, base_url)) = scoped {
										let processed = process_context(
											Environment {
												loader: env.loader,
												warnings: env.warnings,
											},
											map_context.as_ref(),
											&local_context,
											ProcessingStack::new(),
											base_url.as_deref(),
											options.into(),
										)
										.await?;

										map_context = Mown::Owned(processed)
									}
								}

								// Initialize `expanded_index` to the result
								// of IRI expanding the index.
								let expanded_index = match expand_iri(
									env.warnings,
									active_context,
									Nullable::Some(index.as_str()),
									false,
									true,
								) {
									Term::Null | Term::Keyword(Keyword::None) => None,
									key => Some(key),
								};

								// Expand the index value, passing the key as
								// active property and true for `from_map`.
								let expanded_index_value = Box::pin(expand_element(
									Environment {
										loader: env.loader,
										warnings: env.warnings,
									},
									map_context.as_ref(),
									Some(key),
									index_value,
									base_url,
									options,
									true,
								))
								.await?;

								// For each item in the expanded index value:
								for mut item in expanded_index_value {
									// If the container mapping includes
									// `@graph`, and item is not a graph
									// object, wrap it into one.
									if container_mapping.contains(ContainerKind::Graph)
										&& !crate::object::is_graph_object(&item)
									{
										item = graph_object(item);
									}

									if let Some(expanded_index_term) = &expanded_index {
										if container_mapping.contains(ContainerKind::Index)
											&& index_key != "@index"
										{
											// Re-expand the index into the
											// index property of the item.
											let re_expanded_index = expand_literal(
												&mut env,
												active_context,
												Some(index_key),
												LiteralValue::Inferred(index.as_str()),
											)?;

											let expanded_index_key = match expand_iri(
												env.warnings,
												active_context,
												Nullable::Some(index_key),
												false,
												true,
											) {
												Term::Id(prop) => prop,
												_ => continue,
											};

											// Value objects must not contain
											// any extra properties.
											if !is_node(&item) {
												return Err(Error::InvalidValueObject);
											}

											if let Some(item) = item.as_object_mut() {
												insert_all(
													item,
													expanded_index_key.as_str(),
													std::iter::once(re_expanded_index),
												)
											}
										} else if container_mapping
											.contains(ContainerKind::Index)
											&& node_index(&item).is_none()
										{
											// Add the `@index`-index pair to
											// the item.
											if let Some(item) = item.as_object_mut() {
												item.insert(
													"@index".into(),
													Value::String(index.as_str().into()),
												);
											}
										} else if container_mapping
											.contains(ContainerKind::Id)
											&& node_id(&item).is_none()
										{
											// Add the `@id`-expanded index
											// pair to the item, expanding
											// the index using true for
											// document relative.
											if is_node(&item) {
												let id = expand_iri(
													env.warnings,
													active_context,
													Nullable::Some(index.as_str()),
													true,
													false,
												);

												if let (Some(id), Some(item)) = (
													term_into_id_string(id),
													item.as_object_mut(),
												) {
													item.insert(
														"@id".into(),
														Value::String(id.as_str().into()),
													);
												}
											}
										} else if container_mapping
											.contains(ContainerKind::Type)
										{
											// Prepend the expanded index to
											// the `@type` values of the
											// item.
											match expanded_index_term {
												Term::Id(id) => {
													if let Some(item) =
														item.as_object_mut()
													{
														let ty = Value::String(
															id.as_str().into(),
														);

														match object::get_mut(
															item, "@type",
														) {
															Some(Value::Array(types)) => {
																types.insert(0, ty)
															}
															_ => {
																item.insert(
																	"@type".into(),
																	Value::Array(vec![
																		ty,
																	]),
																);
															}
														}
													}
												}
												_ => return Err(Error::InvalidTypeValue),
											}
										}
									}

									// Append the item to the expanded value.
									expanded_value.push(item)
								}
							}

							Expanded::Array(expanded_value)
						}
						_ => {
							// Otherwise, expand the value recursively,
							// passing the key as active property.
							Box::pin(expand_element(
								Environment {
									loader: env.loader,
									warnings: env.warnings,
								},
								active_context,
								Some(key),
								value,
								base_url,
								options,
								false,
							))
							.await?
						}
					}
				};

				// If the container mapping includes `@list` and the expanded
				// value is not already a list object, wrap it into one.
				if container_mapping.contains(ContainerKind::List) && !expanded_value.is_list() {
					let mut list = Object::default();
					list.insert(
						"@list".into(),
						Value::Array(expanded_value.into_iter().collect()),
					);
					expanded_value = Expanded::Object(Value::Object(list));
				}

				// If the container mapping includes `@graph`, and includes
				// neither `@id` nor `@index`, convert each value into a
				// graph object.
				if container_mapping.contains(ContainerKind::Graph)
					&& !container_mapping.contains(ContainerKind::Id)
					&& !container_mapping.contains(ContainerKind::Index)
				{
					expanded_value =
						Expanded::Array(expanded_value.into_iter().map(graph_object).collect());
				}

				if !expanded_value.is_null() {
					// If the term definition associated to the key indicates
					// that it is a reverse property, the expanded value must
					// only contain node objects, accumulated into the
					// `@reverse` entry.
					if is_reverse_property {
						let mut reverse_expanded_nodes = Vec::new();
						for object in expanded_value {
							if is_node(&object) {
								reverse_expanded_nodes.push(object)
							} else {
								return Err(Error::InvalidReversePropertyValue);
							}
						}

						insert_reverse(&mut result, prop.as_str(), reverse_expanded_nodes)
					} else {
						// Otherwise, add the expanded value to the expanded
						// property entry of the result.
						insert_all(&mut result, prop.as_str(), expanded_value);
					}
				}
			}

			// Non-keyword properties that do not include a colon are
			// dropped.
			Term::Id(_) => (),
		}
	}

	// Process the deferred `@nest` entries.
	if options.ordered {
		nests.sort_by(|(a, _), (b, _)| a.cmp(b));
	}

	for (nesting_key, nest_value) in nests {
		for nested_value in Value::force_as_array(nest_value) {
			// The property-scoped context of the nesting key applies to the
			// nested entries.
			let scoped = active_context.get(nesting_key).and_then(|definition| {
				definition
					.context
					.clone()
					.map(|context| (context, definition.base_url.clone()))
			});

			let nest_context = match scoped {
				Some((local_context, scoped_base_url)) => {
					let processed = process_context(
						Environment {
							loader: env.loader,
							warnings: env.warnings,
						},
						active_context,
						&local_context,
						ProcessingStack::new(),
						scoped_base_url.as_deref(),
						crate::processing::Options::from(options).with_override(),
					)
					.await?;

					Mown::Owned(processed)
				}
				None => Mown::Borrowed(active_context),
			};

			// The nested value must be a node object.
			let nested_object = nested_value.as_object().ok_or(Error::InvalidNestValue)?;

			let mut nested_entries: Vec<&Entry> = nested_object.iter().collect();

			if options.ordered {
				nested_entries.sort_by(|a, b| a.key.cmp(&b.key));
			}

			let mut nested_expanded_entries = Vec::with_capacity(nested_entries.len());
			for entry in nested_entries {
				let expanded_key = expand_iri(
					env.warnings,
					nest_context.as_ref(),
					Nullable::Some(entry.key.as_str()),
					false,
					true,
				);

				nested_expanded_entries.push(ExpandedEntry(
					entry.key.as_str(),
					expanded_key,
					&entry.value,
				));
			}

			let (new_result, new_has_value_object_entries) = Box::pin(expand_node_entries(
				Environment {
					loader: env.loader,
					warnings: env.warnings,
				},
				result,
				has_value_object_entries,
				nest_context.as_ref(),
				type_scoped_context,
				active_property,
				nested_expanded_entries,
				base_url,
				options,
			))
			.await?;

			result = new_result;
			has_value_object_entries = new_has_value_object_entries;
		}
	}

	Ok((result, has_value_object_entries))
}
