//! Inverse context: the lookup structure used by IRI compaction to select
//! the best term for a given IRI, container and type/language shape.
use super::{Context, Type};
use crate::syntax::{Container, Direction, LenientLangTagBuf, Nullable};
use crate::Term;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Type-based selection criterion.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TypeSelection {
	Reverse,
	Any,
	Type(Type),
}

/// Language and direction pair, possibly `null`.
///
/// Language tags are normalized to lower case by the key type itself
/// (case-insensitive equality and hashing).
pub type LangDir = Nullable<(Option<LenientLangTagBuf>, Option<Direction>)>;

/// Language-based selection criterion.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum LangSelection {
	Any,
	Lang(LangDir),
}

/// Selection criteria, scanned in order by term selection.
#[derive(Debug)]
pub enum Selection {
	Any,
	Type(Vec<TypeSelection>),
	Lang(Vec<LangSelection>),
}

struct InverseType {
	reverse: Option<String>,
	any: Option<String>,
	map: HashMap<Type, String>,
}

impl InverseType {
	fn select(&self, selection: &TypeSelection) -> Option<&str> {
		match selection {
			TypeSelection::Reverse => self.reverse.as_deref(),
			TypeSelection::Any => self.any.as_deref(),
			TypeSelection::Type(ty) => self.map.get(ty).map(String::as_str),
		}
	}

	fn set_any(&mut self, term: &str) {
		if self.any.is_none() {
			self.any = Some(term.to_owned())
		}
	}

	fn set_none(&mut self, term: &str) {
		self.set(&Type::None, term)
	}

	fn set(&mut self, ty: &Type, term: &str) {
		if !self.map.contains_key(ty) {
			self.map.insert(ty.clone(), term.to_owned());
		}
	}
}

struct InverseLang {
	any: Option<String>,
	map: HashMap<LangDir, String>,
}

impl InverseLang {
	fn select(&self, selection: &LangSelection) -> Option<&str> {
		match selection {
			LangSelection::Any => self.any.as_deref(),
			LangSelection::Lang(lang_dir) => self.map.get(lang_dir).map(String::as_str),
		}
	}

	fn set_any(&mut self, term: &str) {
		if self.any.is_none() {
			self.any = Some(term.to_owned())
		}
	}

	fn set_none(&mut self, term: &str) {
		self.set(Nullable::Some((None, None)), term)
	}

	fn set(&mut self, lang_dir: LangDir, term: &str) {
		self.map.entry(lang_dir).or_insert_with(|| term.to_owned());
	}
}

struct Any {
	none: String,
}

struct InverseContainer {
	language: InverseLang,
	typ: InverseType,
	any: Any,
}

impl InverseContainer {
	fn new(term: &str) -> Self {
		Self {
			language: InverseLang {
				any: None,
				map: HashMap::new(),
			},
			typ: InverseType {
				reverse: None,
				any: None,
				map: HashMap::new(),
			},
			any: Any {
				none: term.to_owned(),
			},
		}
	}
}

/// Per-IRI branch of the inverse context, keyed by container mapping.
pub struct InverseDefinition {
	map: HashMap<Container, InverseContainer>,
}

impl InverseDefinition {
	fn new() -> Self {
		Self {
			map: HashMap::new(),
		}
	}

	fn get(&self, container: &Container) -> Option<&InverseContainer> {
		self.map.get(container)
	}

	fn reference_mut<F: FnOnce() -> InverseContainer>(
		&mut self,
		container: Container,
		insert: F,
	) -> &mut InverseContainer {
		self.map.entry(container).or_insert_with(insert)
	}

	/// Term selection: scans `containers` in order, then the preferred
	/// values of `selection` in order, returning the first hit.
	pub fn select(&self, containers: &[Container], selection: &Selection) -> Option<&str> {
		for container in containers {
			if let Some(type_lang_map) = self.get(container) {
				match selection {
					Selection::Any => return Some(&type_lang_map.any.none),
					Selection::Type(preferred_values) => {
						for item in preferred_values {
							if let Some(term) = type_lang_map.typ.select(item) {
								return Some(term);
							}
						}
					}
					Selection::Lang(preferred_values) => {
						for item in preferred_values {
							if let Some(term) = type_lang_map.language.select(item) {
								return Some(term);
							}
						}
					}
				}
			}
		}

		None
	}
}

/// Inverse context.
pub struct InverseContext {
	map: HashMap<Term, InverseDefinition>,
}

impl InverseContext {
	pub fn new() -> Self {
		Self {
			map: HashMap::new(),
		}
	}

	pub fn contains(&self, term: &Term) -> bool {
		self.map.contains_key(term)
	}

	pub fn get(&self, term: &Term) -> Option<&InverseDefinition> {
		self.map.get(term)
	}

	fn reference_mut<F: FnOnce() -> InverseDefinition>(
		&mut self,
		term: &Term,
		insert: F,
	) -> &mut InverseDefinition {
		if !self.contains(term) {
			self.map.insert(term.clone(), insert());
		}
		self.map.get_mut(term).unwrap()
	}

	pub fn select(
		&self,
		var: &Term,
		containers: &[Container],
		selection: &Selection,
	) -> Option<&str> {
		self.get(var)
			.and_then(|definition| definition.select(containers, selection))
	}
}

impl Default for InverseContext {
	fn default() -> Self {
		Self::new()
	}
}

impl<'a> From<&'a Context> for InverseContext {
	fn from(context: &'a Context) -> Self {
		let mut result = InverseContext::new();

		// Iterate term definitions by ascending term length, ties broken
		// lexicographically.
		let mut definitions: Vec<_> = context.definitions().collect();
		definitions.sort_by(|(a, _), (b, _)| {
			let ord = a.len().cmp(&b.len());
			if ord == Ordering::Equal {
				a.cmp(b)
			} else {
				ord
			}
		});

		for (term, term_definition) in definitions {
			// Null definitions are skipped.
			if let Some(var) = term_definition.value.as_ref() {
				let container = term_definition.container;
				let container_map = result.reference_mut(var, InverseDefinition::new);
				let type_lang_map =
					container_map.reference_mut(container, || InverseContainer::new(term));

				let type_map = &mut type_lang_map.typ;
				let lang_map = &mut type_lang_map.language;

				if term_definition.reverse_property {
					// If the term definition indicates that the term
					// represents a reverse property:
					if type_map.reverse.is_none() {
						type_map.reverse = Some(term.to_owned())
					}
				} else {
					match &term_definition.typ {
						Some(Type::None) => {
							// Otherwise, if term definition has a type
							// mapping which is @none:
							type_map.set_any(term);
							lang_map.set_any(term);
						}
						Some(typ) => {
							// Otherwise, if term definition has a type
							// mapping:
							type_map.set(typ, term)
						}
						None => {
							match (&term_definition.language, &term_definition.direction) {
								(Some(language), Some(direction)) => {
									// Otherwise, if term definition has both
									// a language mapping and a direction
									// mapping:
									let lang_dir = match (language, direction) {
										(Nullable::Some(language), Nullable::Some(direction)) => {
											Nullable::Some((
												Some(language.clone()),
												Some(*direction),
											))
										}
										(Nullable::Some(language), Nullable::Null) => {
											Nullable::Some((Some(language.clone()), None))
										}
										(Nullable::Null, Nullable::Some(direction)) => {
											Nullable::Some((None, Some(*direction)))
										}
										(Nullable::Null, Nullable::Null) => Nullable::Null,
									};

									lang_map.set(lang_dir, term)
								}
								(Some(language), None) => {
									// Otherwise, if term definition has a
									// language mapping (might be null):
									let lang_dir = match language {
										Nullable::Some(language) => {
											Nullable::Some((Some(language.clone()), None))
										}
										Nullable::Null => Nullable::Null,
									};

									lang_map.set(lang_dir, term)
								}
								(None, Some(direction)) => {
									// Otherwise, if term definition has a
									// direction mapping (might be null):
									let lang_dir = match direction {
										Nullable::Some(direction) => {
											Nullable::Some((None, Some(*direction)))
										}
										Nullable::Null => Nullable::Some((None, None)),
									};

									lang_map.set(lang_dir, term)
								}
								(None, None) => {
									lang_map.set(
										Nullable::Some((
											context.default_language().cloned(),
											context.default_base_direction(),
										)),
										term,
									);
									lang_map.set_none(term);
									type_map.set_none(term);
								}
							}
						}
					}
				}
			}
		}

		result
	}
}
