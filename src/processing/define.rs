//! Create Term Definition algorithm.
use super::{
	as_compact_iri, expand_iri, expand_iri_with, process_context, Error, Merged, Options,
	ProcessingStack,
};
use crate::context::{TermDefinition, Type};
use crate::syntax::{
	is_keyword, is_keyword_like, Container, ContainerKind, Direction, Keyword, LenientLangTagBuf,
	Nullable, Value,
};
use crate::warning::{self, Warning};
use crate::{Context, Environment, Id, Loader, ProcessingMode, Term};
use iref::{Iri, IriRef};
use rdf_types::BlankId;
use std::collections::HashMap;

fn is_gen_delim(c: char) -> bool {
	matches!(c, ':' | '/' | '?' | '#' | '[' | ']' | '@')
}

/// Checks if the given term is an IRI ending with a gen-delim character, or
/// a blank node identifier.
fn is_gen_delim_or_blank(t: &Term) -> bool {
	match t {
		Term::Id(Id::Blank(_)) => true,
		Term::Id(Id::Iri(iri)) => match iri.as_str().chars().last() {
			Some(c) => is_gen_delim(c),
			None => false,
		},
		_ => false,
	}
}

/// Checks if the given character is included in the given string anywhere
/// but at the first or last position.
fn contains_between_boundaries(id: &str, c: char) -> bool {
	if let Some(i) = id.find(c) {
		let j = id.rfind(c).unwrap();
		i > 0 && j < id.len() - 1
	} else {
		false
	}
}

/// Per-`processContext`-call map tracking which terms are defined or
/// currently being defined during recursion.
#[derive(Default)]
pub(crate) struct DefinedTerms(HashMap<String, DefinedTerm>);

impl DefinedTerms {
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts the definition of `key`.
	///
	/// Returns `false` if the term is already defined, and
	/// `cyclic_IRI_mapping` if its definition is in progress.
	pub fn begin(&mut self, key: &str) -> Result<bool, Error> {
		match self.0.get(key) {
			Some(d) => {
				if d.pending {
					Err(Error::CyclicIriMapping)
				} else {
					Ok(false)
				}
			}
			None => {
				self.0.insert(key.to_owned(), DefinedTerm { pending: true });

				Ok(true)
			}
		}
	}

	pub fn end(&mut self, key: &str) {
		if let Some(d) = self.0.get_mut(key) {
			d.pending = false
		}
	}
}

struct DefinedTerm {
	pending: bool,
}

/// Recognized entries of a term definition map.
#[derive(Default)]
struct DefinitionEntries<'a> {
	id: Option<Nullable<&'a str>>,
	typ: Option<&'a Value>,
	reverse: Option<&'a Value>,
	container: Option<&'a Value>,
	context: Option<&'a Value>,
	direction: Option<&'a Value>,
	index: Option<&'a Value>,
	language: Option<&'a Value>,
	nest: Option<&'a Value>,
	prefix: Option<&'a Value>,
	protected: Option<&'a Value>,

	/// First entry that is none of the above, if any.
	///
	/// Checked at the end of the algorithm, except for reverse property
	/// definitions which are committed without this check.
	unrecognized: Option<&'a str>,
}

impl<'a> DefinitionEntries<'a> {
	fn from_value(value: &'a Value) -> Result<(Self, bool), Error> {
		let mut this = Self::default();
		let mut simple_term = false;

		match value {
			// A `null` value is normalized to a map with `@id: null`.
			Value::Null => this.id = Some(Nullable::Null),
			Value::String(id) => {
				this.id = Some(Nullable::Some(id.as_str()));
				simple_term = true
			}
			Value::Object(object) => {
				for entry in object.iter() {
					match entry.key.as_str() {
						"@id" => {
							this.id = Some(match &entry.value {
								Value::Null => Nullable::Null,
								Value::String(id) => Nullable::Some(id.as_str()),
								_ => return Err(Error::InvalidIriMapping),
							})
						}
						"@type" => this.typ = Some(&entry.value),
						"@reverse" => this.reverse = Some(&entry.value),
						"@container" => this.container = Some(&entry.value),
						"@context" => this.context = Some(&entry.value),
						"@direction" => this.direction = Some(&entry.value),
						"@index" => this.index = Some(&entry.value),
						"@language" => this.language = Some(&entry.value),
						"@nest" => this.nest = Some(&entry.value),
						"@prefix" => this.prefix = Some(&entry.value),
						"@protected" => this.protected = Some(&entry.value),
						other => this.unrecognized = Some(other),
					}
				}
			}
			_ => return Err(Error::InvalidTermDefinition),
		}

		Ok((this, simple_term))
	}
}

/// Create Term Definition.
///
/// Default value for `base_url` is `None`. Default values for `protected`
/// and `override_protected` are `false`.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn define<L, W>(
	mut env: Environment<'_, L, W>,
	active_context: &mut Context,
	local_context: &Merged<'_>,
	term: &str,
	defined: &mut DefinedTerms,
	remote_contexts: ProcessingStack,
	base_url: Option<&Iri>,
	protected: bool,
	options: Options,
) -> Result<(), Error>
where
	L: Loader,
	W: warning::Handler,
{
	if !defined.begin(term)? {
		return Ok(());
	}

	if term.is_empty() {
		return Err(Error::InvalidTermDefinition);
	}

	// Initialize `value` to a copy of the value associated with the entry
	// `term` in `local_context`.
	let value = match local_context.get(term) {
		Some(value) => value,
		None => {
			defined.end(term);
			return Ok(());
		}
	};

	// Redefinition of `@type` is permitted in 1.1 when the value is a map
	// with at most `@container: @set` and `@protected` entries.
	if term == "@type" {
		if options.processing_mode == ProcessingMode::JsonLd1_0 {
			return Err(Error::KeywordRedefinition);
		}

		let object = value.as_object().ok_or(Error::KeywordRedefinition)?;

		let mut definition = TermDefinition {
			value: Some(Term::Keyword(Keyword::Type)),
			..Default::default()
		};

		for entry in object.iter() {
			match entry.key.as_str() {
				"@container" if entry.value.as_str() == Some("@set") => {
					definition.container = Container::Set
				}
				"@protected" => match &entry.value {
					Value::Boolean(b) => definition.protected = *b,
					_ => return Err(Error::KeywordRedefinition),
				},
				_ => return Err(Error::KeywordRedefinition),
			}
		}

		let previous_definition = active_context.set(term.to_owned(), None);

		if !options.override_protected {
			if let Some(previous_definition) = &previous_definition {
				if previous_definition.protected {
					if !definition.eq_disregarding_protected(previous_definition) {
						return Err(Error::ProtectedTermRedefinition);
					}

					definition.protected = true;
				}
			}
		}

		active_context.set(term.to_owned(), Some(definition));
		defined.end(term);
		return Ok(());
	}

	// Since keywords cannot be overridden, `term` must not be a keyword.
	if is_keyword(term) {
		return Err(Error::KeywordRedefinition);
	}

	// Keyword-shaped terms are skipped with a warning.
	if is_keyword_like(term) {
		env.warnings.handle(Warning::KeywordLikeTerm(term.to_owned()));
		defined.end(term);
		return Ok(());
	}

	// Initialize `previous_definition` to any existing term definition for
	// `term` in `active_context`, removing that term definition from the
	// active context.
	let previous_definition = active_context.set(term.to_owned(), None);

	let (entries, simple_term) = DefinitionEntries::from_value(value)?;

	// Create a new term definition, `definition`, initializing the `prefix`
	// flag to `false`, `protected` to `protected`, and `reverse_property` to
	// `false`.
	let mut definition = TermDefinition {
		protected,
		..Default::default()
	};

	// If the `@protected` entry in `value` is true, set the `protected` flag
	// in `definition` to true.
	if let Some(protected_value) = entries.protected {
		if options.processing_mode == ProcessingMode::JsonLd1_0 {
			return Err(Error::InvalidTermDefinition);
		}

		definition.protected = match protected_value {
			Value::Boolean(b) => *b,
			_ => return Err(Error::InvalidContextEntry),
		};
	}

	// If `value` contains the entry `@type`:
	if let Some(type_value) = entries.typ {
		let ty = type_value.as_str().ok_or(Error::InvalidTypeMapping)?;

		// Set `typ` to the result of IRI expanding type, using the local
		// context and `defined`.
		let typ = expand_iri_with(
			Environment {
				loader: env.loader,
				warnings: env.warnings,
			},
			active_context,
			Nullable::Some(ty),
			false,
			true,
			local_context,
			defined,
			remote_contexts.clone(),
			options,
		)
		.await?;

		// If the expanded type is `@json` or `@none`, and processing mode is
		// json-ld-1.0, an invalid type mapping error has been detected.
		if options.processing_mode == ProcessingMode::JsonLd1_0
			&& matches!(
				typ,
				Term::Keyword(Keyword::Json) | Term::Keyword(Keyword::None)
			) {
			return Err(Error::InvalidTypeMapping);
		}

		// The expanded type must be `@id`, `@json`, `@none`, `@vocab` or an
		// absolute IRI.
		definition.typ = Some(Type::try_from(typ).map_err(|_| Error::InvalidTypeMapping)?);
	}

	// If `value` contains the entry `@reverse`:
	if let Some(reverse_value) = entries.reverse {
		// If `value` contains `@id` or `@nest` entries, an invalid reverse
		// property error has been detected.
		if entries.id.is_some() || entries.nest.is_some() {
			return Err(Error::InvalidReverseProperty);
		}

		let reverse = reverse_value.as_str().ok_or(Error::InvalidIriMapping)?;

		// If the value associated with the `@reverse` entry is a string
		// having the form of a keyword, return; processors SHOULD generate a
		// warning.
		if is_keyword_like(reverse) && !is_keyword(reverse) {
			env.warnings
				.handle(Warning::KeywordLikeValue(reverse.to_owned()));
			defined.end(term);
			return Ok(());
		}

		// Otherwise, set the IRI mapping of `definition` to the result of
		// IRI expanding the value associated with the `@reverse` entry. If
		// the result does not have the form of an IRI or a blank node
		// identifier, an invalid IRI mapping error has been detected.
		match expand_iri_with(
			Environment {
				loader: env.loader,
				warnings: env.warnings,
			},
			active_context,
			Nullable::Some(reverse),
			false,
			true,
			local_context,
			defined,
			remote_contexts,
			options,
		)
		.await?
		{
			Term::Id(mapping) if mapping.is_valid() => definition.value = Some(Term::Id(mapping)),
			_ => return Err(Error::InvalidIriMapping),
		}

		// If `value` contains an `@container` entry, its value must be
		// `@set`, `@index` or null; reverse properties only support set- and
		// index-containers.
		if let Some(container_value) = entries.container {
			match container_value {
				Value::Null => (),
				Value::String(s) => match ContainerKind::try_from(s.as_str()) {
					Ok(ContainerKind::Set) => definition.container = Container::Set,
					Ok(ContainerKind::Index) => definition.container = Container::Index,
					_ => return Err(Error::InvalidReverseProperty),
				},
				_ => return Err(Error::InvalidReverseProperty),
			}
		}

		// Set the `reverse_property` flag of `definition` to `true`, set the
		// term definition of `term` in `active_context` to `definition` and
		// return.
		definition.reverse_property = true;
		active_context.set(term.to_owned(), Some(definition));
		defined.end(term);
		return Ok(());
	}

	match entries.id {
		// If `value` contains the entry `@id` and its value does not equal
		// `term`:
		Some(Nullable::Some(id)) if id != term => {
			// If the value associated with the `@id` entry is not a keyword,
			// but has the form of a keyword, return; processors SHOULD
			// generate a warning.
			if is_keyword_like(id) && !is_keyword(id) {
				env.warnings.handle(Warning::KeywordLikeValue(id.to_owned()));
				defined.end(term);
				return Ok(());
			}

			// Otherwise, set the IRI mapping of `definition` to the result
			// of IRI expanding the value associated with the `@id` entry.
			definition.value = match expand_iri_with(
				Environment {
					loader: env.loader,
					warnings: env.warnings,
				},
				active_context,
				Nullable::Some(id),
				false,
				true,
				local_context,
				defined,
				remote_contexts.clone(),
				options,
			)
			.await?
			{
				// If it equals `@context`, an invalid keyword alias error
				// has been detected.
				Term::Keyword(Keyword::Context) => return Err(Error::InvalidKeywordAlias),
				// The resulting IRI mapping must be a keyword, an IRI or a
				// blank node identifier.
				Term::Id(mapping) if !mapping.is_valid() => {
					return Err(Error::InvalidIriMapping)
				}
				mapping => Some(mapping),
			};

			// If `term` contains a colon anywhere but as the first or last
			// character, or contains a slash anywhere:
			if contains_between_boundaries(term, ':') || term.contains('/') {
				// Set the value associated with `defined`'s `term` entry to
				// true.
				defined.end(term);

				// The result of IRI expanding `term` itself must agree with
				// the IRI mapping of `definition`.
				let expanded_term = expand_iri_with(
					Environment {
						loader: env.loader,
						warnings: env.warnings,
					},
					active_context,
					Nullable::Some(term),
					false,
					true,
					local_context,
					defined,
					remote_contexts.clone(),
					options,
				)
				.await?;

				if definition.value.as_ref() != Some(&expanded_term) {
					return Err(Error::InvalidIriMapping);
				}
			}

			// If `term` contains neither a colon nor a slash, `simple_term`
			// is true, and the IRI mapping of `definition` ends with a
			// gen-delim character or is a blank node identifier, set the
			// `prefix` flag.
			if !term.contains(':')
				&& !term.contains('/')
				&& simple_term
				&& definition
					.value
					.as_ref()
					.map(is_gen_delim_or_blank)
					.unwrap_or(false)
			{
				definition.prefix = true;
			}
		}
		// If the `@id` entry of `value` is null, the term is not used for
		// IRI expansion, but is retained to detect future redefinitions.
		Some(Nullable::Null) => (),
		_ => {
			// Otherwise, if `term` is a compact IRI with a prefix that is an
			// entry in the local context, a dependency has been found:
			// define the prefix first.
			if let Some((prefix, suffix)) = as_compact_iri(term) {
				Box::pin(define(
					Environment {
						loader: env.loader,
						warnings: env.warnings,
					},
					active_context,
					local_context,
					prefix,
					defined,
					remote_contexts.clone(),
					None,
					false,
					options.with_no_override(),
				))
				.await?;

				// If `term`'s prefix has a term definition in
				// `active_context`, set the IRI mapping of `definition` to
				// the result of concatenating the prefix's IRI mapping and
				// the term's suffix.
				if let Some(prefix_definition) = active_context.get(prefix) {
					let mut result = String::new();

					if let Some(prefix_mapping) = &prefix_definition.value {
						if let Some(prefix_iri) = prefix_mapping.as_iri() {
							result = prefix_iri.to_string()
						}
					}

					result.push_str(suffix);

					match Iri::new(result.as_str()) {
						Ok(_) => definition.value = Some(Term::Id(Id::new(result))),
						Err(_) => return Err(Error::InvalidIriMapping),
					}
				}
			}

			// Not a compact IRI: the term itself may be a blank node
			// identifier, an IRI, or a relative IRI reference containing a
			// slash.
			if definition.value.is_none() {
				if BlankId::new(term).is_ok() {
					definition.value = Some(Term::Id(Id::new(term)))
				} else if let Ok(iri_ref) = IriRef::new(term) {
					match iri_ref.as_iri() {
						Some(iri) => definition.value = Some(Term::Id(Id::Iri(iri.to_owned()))),
						None => {
							if term.contains('/') {
								// Term is a relative IRI reference; the IRI
								// mapping is the result of IRI expanding it,
								// which must be an IRI.
								match expand_iri(
									env.warnings,
									active_context,
									Nullable::Some(term),
									false,
									true,
								) {
									Term::Id(Id::Iri(iri)) => {
										definition.value = Some(Term::Id(Id::Iri(iri)))
									}
									_ => return Err(Error::InvalidIriMapping),
								}
							}
						}
					}
				}
			}

			// Otherwise, if `active_context` has a vocabulary mapping, the
			// IRI mapping of `definition` is the concatenation of the
			// vocabulary mapping and `term`. Without a vocabulary mapping,
			// an invalid IRI mapping error has been detected.
			if definition.value.is_none() {
				match active_context.vocabulary() {
					Some(vocabulary) => match vocabulary.as_iri() {
						Some(vocabulary_iri) => {
							let mut result = vocabulary_iri.to_string();
							result.push_str(term);

							match Iri::new(result.as_str()) {
								Ok(_) => definition.value = Some(Term::Id(Id::new(result))),
								Err(_) => return Err(Error::InvalidIriMapping),
							}
						}
						None => return Err(Error::InvalidIriMapping),
					},
					None => return Err(Error::InvalidIriMapping),
				}
			}
		}
	}

	// If `value` contains the entry `@container`:
	if let Some(container_value) = entries.container {
		// In json-ld-1.0 the container value must be a string that is
		// neither `@graph`, `@id` nor `@type`.
		if options.processing_mode == ProcessingMode::JsonLd1_0 {
			match container_value.as_str() {
				Some("@graph") | Some("@id") | Some("@type") | None => {
					return Err(Error::InvalidContainerMapping)
				}
				Some(_) => (),
			}
		}

		// The value must be a valid container combination.
		definition.container =
			Container::from_value(container_value).map_err(|_| Error::InvalidContainerMapping)?;

		// If the container mapping includes `@type`:
		if definition.container.contains(ContainerKind::Type) {
			match &definition.typ {
				// If the type mapping is undefined, set it to `@id`.
				None => definition.typ = Some(Type::Id),
				// Otherwise it must be `@id` or `@vocab`.
				Some(Type::Id) | Some(Type::Vocab) => (),
				Some(_) => return Err(Error::InvalidTypeMapping),
			}
		}
	}

	// If `value` contains the entry `@index`:
	if let Some(index_value) = entries.index {
		if options.processing_mode == ProcessingMode::JsonLd1_0
			|| !definition.container.contains(ContainerKind::Index)
		{
			return Err(Error::InvalidTermDefinition);
		}

		// The index value must be a string expanding to an IRI.
		let index = index_value.as_str().ok_or(Error::InvalidTermDefinition)?;

		match expand_iri(env.warnings, active_context, Nullable::Some(index), false, true) {
			Term::Id(Id::Iri(_)) => (),
			_ => return Err(Error::InvalidTermDefinition),
		}

		definition.index = Some(index.to_owned())
	}

	// If `value` contains the entry `@context`:
	if let Some(context_value) = entries.context {
		if options.processing_mode == ProcessingMode::JsonLd1_0 {
			return Err(Error::InvalidTermDefinition);
		}

		// Validate the scoped context by invoking the Context Processing
		// algorithm with `override_protected` and without scoped-context
		// validation, discarding the result. Any error becomes an invalid
		// scoped context error.
		Box::pin(process_context(
			Environment {
				loader: env.loader,
				warnings: env.warnings,
			},
			active_context,
			context_value,
			remote_contexts.clone(),
			base_url,
			options.with_override().without_validation(),
		))
		.await
		.map_err(|_| Error::InvalidScopedContext)?;

		// Store the unprocessed local context on the definition, along with
		// the base URL it must be processed against.
		definition.context = Some(Box::new(context_value.clone()));
		definition.base_url = base_url.map(ToOwned::to_owned);
	}

	// If `value` contains the entry `@language` and does not contain the
	// entry `@type`:
	if entries.typ.is_none() {
		if let Some(language_value) = entries.language {
			// The language must be either null or a string. Ill-formed
			// BCP-47 tags are kept, with a warning.
			definition.language = Some(match language_value {
				Value::Null => Nullable::Null,
				Value::String(s) => {
					let (tag, error) = LenientLangTagBuf::new(s.as_str().to_owned());

					if let Some(error) = error {
						env.warnings
							.handle(Warning::MalformedLanguageTag(s.as_str().to_owned(), error));
					}

					Nullable::Some(tag)
				}
				_ => return Err(Error::InvalidLanguageMapping),
			});
		}

		// If `value` contains the entry `@direction` and does not contain
		// the entry `@type`:
		if let Some(direction_value) = entries.direction {
			// The direction must be either null, "ltr", or "rtl".
			definition.direction = Some(match direction_value {
				Value::Null => Nullable::Null,
				Value::String(s) => match Direction::try_from(s.as_str()) {
					Ok(direction) => Nullable::Some(direction),
					Err(_) => return Err(Error::InvalidBaseDirection),
				},
				_ => return Err(Error::InvalidBaseDirection),
			});
		}
	}

	// If `value` contains the entry `@nest`:
	if let Some(nest_value) = entries.nest {
		if options.processing_mode == ProcessingMode::JsonLd1_0 {
			return Err(Error::InvalidTermDefinition);
		}

		// The nest value must be a string which is not a keyword other than
		// `@nest`.
		let nest = nest_value.as_str().ok_or(Error::InvalidNestValue)?;

		if is_keyword(nest) && nest != "@nest" {
			return Err(Error::InvalidNestValue);
		}

		definition.nest = Some(nest.to_owned());
	}

	// If `value` contains the entry `@prefix`:
	if let Some(prefix_value) = entries.prefix {
		// Forbidden in json-ld-1.0 and on terms containing a colon or a
		// slash.
		if term.contains(':')
			|| term.contains('/')
			|| options.processing_mode == ProcessingMode::JsonLd1_0
		{
			return Err(Error::InvalidTermDefinition);
		}

		// The prefix flag must be a boolean.
		definition.prefix = match prefix_value {
			Value::Boolean(b) => *b,
			_ => return Err(Error::InvalidPrefixValue),
		};

		// A prefix term must not map to a keyword.
		if definition.prefix && matches!(definition.value, Some(Term::Keyword(_))) {
			return Err(Error::InvalidTermDefinition);
		}
	}

	// Any entry other than `@id`, `@reverse`, `@container`, `@context`,
	// `@direction`, `@index`, `@language`, `@nest`, `@prefix`, `@protected`,
	// or `@type` is an invalid term definition error.
	if entries.unrecognized.is_some() {
		return Err(Error::InvalidTermDefinition);
	}

	// If `override_protected` is false and `previous_definition` exists and
	// is protected, `definition` must be structurally equal to it, the
	// protected flag excepted.
	if !options.override_protected {
		if let Some(previous_definition) = &previous_definition {
			if previous_definition.protected {
				if !definition.eq_disregarding_protected(previous_definition) {
					return Err(Error::ProtectedTermRedefinition);
				}

				// Retain the value of `protected`.
				definition.protected = true;
			}
		}
	}

	// Set the term definition of `term` in `active_context` to `definition`
	// and the value associated with `defined`'s entry `term` to true.
	active_context.set(term.to_owned(), Some(definition));
	defined.end(term);

	Ok(())
}
