//! IRI compaction.
use super::Options;
use crate::context::inverse::{LangDir, LangSelection, Selection, TypeSelection};
use crate::context::Type;
use crate::object::{self, is_graph_object, is_list_object, is_value_object, node_id, node_index};
use crate::syntax::{Container, Direction, LenientLangTagBuf, Nullable, Value};
use crate::{Context, Id, ProcessingMode, Term};
use iref::Iri;

/// An IRI whose scheme matches a prefix-flagged term could be confused with
/// a compact IRI.
#[derive(Debug)]
pub(crate) struct IriConfusedWithPrefix;

enum TypeLangValue {
	Type(TypeSelection),
	Lang(LangSelection),
}

/// Parses the `@type` entry of an expanded value object.
fn type_of(ty: &str) -> Option<Type> {
	match ty {
		"@id" => Some(Type::Id),
		"@json" => Some(Type::Json),
		"@none" => Some(Type::None),
		"@vocab" => Some(Type::Vocab),
		_ => Iri::new(ty).ok().map(|iri| Type::Iri(iri.to_owned())),
	}
}

fn lang_dir_of(value: &Value) -> LangDir {
	let object = match value.as_object() {
		Some(object) => object,
		None => return Nullable::Null,
	};

	let language = object::get(object, "@language")
		.and_then(Value::as_str)
		.map(LenientLangTagBuf::from);
	let direction = object::get(object, "@direction")
		.and_then(Value::as_str)
		.and_then(|d| Direction::try_from(d).ok());

	Nullable::Some((language, direction))
}

/// IRI Compaction algorithm.
///
/// Compacts `var` (an IRI, blank node identifier or keyword) to the best
/// available term or compact IRI, taking the shape of `value` into account
/// for term selection.
///
/// Default value for `value` is `None` and `false` for `vocab` and
/// `reverse`.
pub(crate) fn compact_iri(
	active_context: &Context,
	var: &Term,
	value: Option<&Value>,
	vocab: bool,
	reverse: bool,
	options: Options,
) -> Result<Option<String>, IriConfusedWithPrefix> {
	if var.is_null() {
		return Ok(None);
	}

	if vocab {
		if let Some(entry) = active_context.inverse().get(var) {
			// Initialize `containers` to an empty array. This array will be
			// used to keep track of an ordered list of preferred container
			// mappings for a term, based on what is compatible with `value`.
			let mut containers = Vec::new();
			let mut type_lang_value = None;

			let has_index = value.map(|v| node_index(v).is_some()).unwrap_or(false);
			let mut is_simple_value = false;

			if let Some(value) = value {
				if node_index(value).is_some() && !is_graph_object(value) {
					containers.push(Container::Index);
					containers.push(Container::IndexSet);
				}
			}

			if reverse {
				type_lang_value = Some(TypeLangValue::Type(TypeSelection::Reverse));
				containers.push(Container::Set);
			} else {
				match value {
					Some(value) if is_list_object(value) => {
						// If `value` is a list object, prefer a list
						// container, and derive a common type or language
						// across the items.
						if node_index(value).is_none() {
							containers.push(Container::List);
						}

						let list = match value.as_object().and_then(|o| object::get(o, "@list"))
						{
							Some(Value::Array(items)) => items.as_slice(),
							Some(other) => std::slice::from_ref(other),
							None => &[],
						};

						let mut common_type: Option<Option<Type>> = None;
						let mut common_lang_dir: Option<LangDir> = None;

						if list.is_empty() {
							// An empty list sets type and language to
							// `@any`.
							common_lang_dir = Some(Nullable::Some((
								active_context.default_language().cloned(),
								active_context.default_base_direction(),
							)))
						} else {
							for item in list {
								let mut item_type = None;
								let mut item_lang_dir = None;
								let mut is_value = false;

								if is_value_object(item) {
									is_value = true;
									let object = item.as_object().unwrap();

									if object::get(object, "@language").is_some()
										|| object::get(object, "@direction").is_some()
									{
										item_lang_dir = Some(lang_dir_of(item))
									} else if let Some(ty) =
										object::get(object, "@type").and_then(Value::as_str)
									{
										item_type = type_of(ty)
									} else {
										item_lang_dir = Some(Nullable::Null)
									}
								} else {
									item_type = Some(Type::Id)
								}

								if common_lang_dir.is_none() {
									common_lang_dir = item_lang_dir
								} else if is_value && common_lang_dir != item_lang_dir {
									common_lang_dir = Some(Nullable::Some((None, None)))
								}

								if common_type.is_none() {
									common_type = Some(item_type)
								} else if *common_type.as_ref().unwrap() != item_type {
									common_type = Some(None)
								}

								if common_lang_dir == Some(Nullable::Some((None, None)))
									&& common_type == Some(None)
								{
									break;
								}
							}
						}

						let common_lang_dir =
							common_lang_dir.unwrap_or(Nullable::Some((None, None)));
						let common_type = common_type.unwrap_or(None);

						match common_type {
							Some(common_type) => {
								type_lang_value = Some(TypeLangValue::Type(
									TypeSelection::Type(common_type),
								))
							}
							None => {
								type_lang_value = Some(TypeLangValue::Lang(
									LangSelection::Lang(common_lang_dir),
								))
							}
						}
					}
					Some(value) if is_graph_object(value) => {
						// Otherwise, if `value` is a graph object, prefer a
						// mapping most appropriate for the particular value.
						if has_index {
							containers.push(Container::GraphIndex);
							containers.push(Container::GraphIndexSet);
						}

						if node_id(value).is_some() {
							containers.push(Container::GraphId);
							containers.push(Container::GraphIdSet);
						}

						containers.push(Container::Graph);
						containers.push(Container::GraphSet);
						containers.push(Container::Set);

						if !has_index {
							containers.push(Container::GraphIndex);
							containers.push(Container::GraphIndexSet);
						}

						if node_id(value).is_none() {
							containers.push(Container::GraphId);
							containers.push(Container::GraphIdSet);
						}

						containers.push(Container::Index);
						containers.push(Container::IndexSet);

						type_lang_value =
							Some(TypeLangValue::Type(TypeSelection::Type(Type::Id)))
					}
					Some(value) if is_value_object(value) => {
						// If `value` is a value object:
						let object = value.as_object().unwrap();
						let has_lang_dir = object::get(object, "@language").is_some()
							|| object::get(object, "@direction").is_some();

						if has_lang_dir && !has_index {
							type_lang_value = Some(TypeLangValue::Lang(LangSelection::Lang(
								lang_dir_of(value),
							)));
							containers.push(Container::Language);
							containers.push(Container::LanguageSet)
						} else if let Some(ty) =
							object::get(object, "@type").and_then(Value::as_str)
						{
							if let Some(ty) = type_of(ty) {
								type_lang_value =
									Some(TypeLangValue::Type(TypeSelection::Type(ty)))
							}
						} else {
							is_simple_value = !has_lang_dir && !has_index
						}

						containers.push(Container::Set)
					}
					_ => {
						// Otherwise, set type/language to `@type` and
						// type/language value to `@id`.
						type_lang_value =
							Some(TypeLangValue::Type(TypeSelection::Type(Type::Id)));
						containers.push(Container::Id);
						containers.push(Container::IdSet);
						containers.push(Container::Type);
						containers.push(Container::SetType);

						containers.push(Container::Set)
					}
				}
			}

			containers.push(Container::None);

			if options.processing_mode != ProcessingMode::JsonLd1_0 && !has_index {
				containers.push(Container::Index);
				containers.push(Container::IndexSet)
			}

			if options.processing_mode != ProcessingMode::JsonLd1_0 && is_simple_value {
				containers.push(Container::Language);
				containers.push(Container::LanguageSet)
			}

			let is_empty_list = value
				.map(|value| {
					is_list_object(value)
						&& match value.as_object().and_then(|o| object::get(o, "@list")) {
							Some(Value::Array(items)) => items.is_empty(),
							_ => false,
						}
				})
				.unwrap_or(false);

			let selection = if is_empty_list {
				Selection::Any
			} else {
				match type_lang_value {
					Some(TypeLangValue::Type(type_value)) => {
						let mut selection: Vec<TypeSelection> = Vec::new();

						if type_value == TypeSelection::Reverse {
							selection.push(TypeSelection::Reverse);
						}

						let mut has_id_type = false;
						if let Some(value) = value {
							if let Some(id) = node_id(value) {
								if type_value == TypeSelection::Type(Type::Id)
									|| type_value == TypeSelection::Reverse
								{
									// Terms mapping the `@id` value itself
									// through the vocabulary are preferred.
									has_id_type = true;
									let id_term = Term::Id(Id::new(id));
									let compacted_iri = compact_iri(
										active_context,
										&id_term,
										None,
										true,
										false,
										options,
									)?;

									let prefer_vocab = compacted_iri
										.as_deref()
										.and_then(|compacted_iri| {
											active_context.get(compacted_iri)
										})
										.and_then(|definition| definition.value.as_ref())
										.map(|mapping| mapping.as_str() == id)
										.unwrap_or(false);

									if prefer_vocab {
										selection.push(TypeSelection::Type(Type::Vocab));
										selection.push(TypeSelection::Type(Type::Id));
									} else {
										selection.push(TypeSelection::Type(Type::Id));
										selection.push(TypeSelection::Type(Type::Vocab));
									}

									selection.push(TypeSelection::Type(Type::None));
								}
							}
						}

						if !has_id_type {
							selection.push(type_value);
							selection.push(TypeSelection::Type(Type::None));
						}

						selection.push(TypeSelection::Any);

						Selection::Type(selection)
					}
					Some(TypeLangValue::Lang(lang_value)) => {
						let mut selection = vec![
							lang_value.clone(),
							LangSelection::Lang(Nullable::Some((None, None))),
							LangSelection::Any,
						];

						if let LangSelection::Lang(Nullable::Some((Some(_), Some(dir)))) =
							&lang_value
						{
							selection
								.push(LangSelection::Lang(Nullable::Some((None, Some(*dir)))));
						}

						Selection::Lang(selection)
					}
					None => Selection::Lang(vec![
						LangSelection::Lang(Nullable::Null),
						LangSelection::Lang(Nullable::Some((None, None))),
						LangSelection::Any,
					]),
				}
			};

			if let Some(term) = entry.select(&containers, &selection) {
				return Ok(Some(term.to_string()));
			}
		}

		// At this point, there is no simple term that `var` can be compacted
		// to. If `vocab` is true and the active context has a vocabulary
		// mapping:
		if let Some(Term::Id(vocab_mapping)) = active_context.vocabulary() {
			// If `var` begins with the vocabulary mapping's value but is
			// longer, then initialize `suffix` to the substring of `var`
			// that does not match. If `suffix` does not have a term
			// definition in the active context, then return `suffix`.
			if let Some(suffix) = var.as_str().strip_prefix(vocab_mapping.as_str()) {
				if !suffix.is_empty() && active_context.get(suffix).is_none() {
					return Ok(Some(suffix.to_string()));
				}
			}
		}
	}

	// The `var` could not be compacted using the active context's
	// vocabulary mapping. Try to create a compact IRI.
	let mut compact_iri_candidate = String::new();

	// For each term definition in the active context:
	for (key, definition) in active_context.definitions() {
		// A definition can only be used as a prefix with a true prefix flag
		// and a non-null IRI mapping that is a proper prefix of `var`.
		if definition.prefix {
			if let Some(Term::Id(iri_mapping)) = &definition.value {
				if let Some(suffix) = var.as_str().strip_prefix(iri_mapping.as_str()) {
					if !suffix.is_empty() {
						let mut candidate = key.to_string();
						candidate.push(':');
						candidate.push_str(suffix);

						// The candidate is retained if it is shorter (or the
						// same length but lexicographically less) than the
						// current candidate, and either has no term
						// definition, or has one whose IRI mapping equals
						// `var` while `value` is null.
						let candidate_definition = active_context.get(&candidate);
						if (compact_iri_candidate.is_empty()
							|| (candidate.len() <= compact_iri_candidate.len()
								&& candidate < compact_iri_candidate))
							&& (candidate_definition.is_none()
								|| (candidate_definition
									.and_then(|definition| definition.value.as_ref())
									.map(|mapping| mapping.as_str() == var.as_str())
									.unwrap_or(false) && value.is_none()))
						{
							compact_iri_candidate = candidate
						}
					}
				}
			}
		}
	}

	// If a compact IRI candidate was found, return it.
	if !compact_iri_candidate.is_empty() {
		return Ok(Some(compact_iri_candidate));
	}

	// To ensure that `var` is not confused with a compact IRI, if its
	// scheme matches a term with a true prefix flag, and `var` has no IRI
	// authority, an IRI confused with prefix error has been detected.
	if let Some(iri) = var.as_iri() {
		if iri.authority().is_none() {
			if let Some(definition) = active_context.get(iri.scheme().as_str()) {
				if definition.prefix {
					return Err(IriConfusedWithPrefix);
				}
			}
		}
	}

	// If `vocab` is false, transform `var` into a relative IRI reference
	// using the base IRI from the active context, if it exists.
	if !vocab && options.compact_to_relative {
		if let Some(base_iri) = active_context.base_iri() {
			if let Some(iri) = var.as_iri() {
				return Ok(Some(iri.relative_to(base_iri).to_string()));
			}
		}
	}

	// Finally, return `var` as is.
	Ok(Some(var.as_str().to_string()))
}
