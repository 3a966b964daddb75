//! IRI expansion.
use super::{define, resolve_iri, DefinedTerms, Error, Merged, Options, ProcessingStack};
use crate::syntax::{is_keyword_like, Keyword, Nullable};
use crate::warning::{self, Warning};
use crate::{Context, Environment, Id, Loader, Term};
use iref::{Iri, IriRef};
use rdf_types::BlankId;

/// Splits the given value into a compact IRI prefix and suffix.
///
/// Values whose prefix is an underscore or whose suffix begins with `//` are
/// not compact IRIs.
pub(crate) fn as_compact_iri(value: &str) -> Option<(&str, &str)> {
	match value.split_once(':') {
		Some((prefix, suffix)) if prefix != "_" && !suffix.starts_with("//") => {
			Some((prefix, suffix))
		}
		_ => None,
	}
}

/// IRI expansion against a local context being processed.
///
/// Undefined dependencies encountered during the expansion are defined on
/// demand through the Create Term Definition algorithm, which is why this
/// variant is asynchronous and may fail.
///
/// Default values for `document_relative` and `vocab` are `false` and
/// `true`.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn expand_iri_with<L, W>(
	mut env: Environment<'_, L, W>,
	active_context: &mut Context,
	value: Nullable<&str>,
	document_relative: bool,
	vocab: bool,
	local_context: &Merged<'_>,
	defined: &mut DefinedTerms,
	remote_contexts: ProcessingStack,
	options: Options,
) -> Result<Term, Error>
where
	L: Loader,
	W: warning::Handler,
{
	let value = match value {
		Nullable::Null => return Ok(Term::Null),
		Nullable::Some(value) => value,
	};

	if let Ok(keyword) = Keyword::try_from(value) {
		return Ok(Term::Keyword(keyword));
	}

	if is_keyword_like(value) {
		env.warnings
			.handle(Warning::KeywordLikeValue(value.to_string()));
		return Ok(Term::Null);
	}

	// If `local_context` contains an entry with a key that equals `value`
	// which is not yet fully defined, invoke the Create Term Definition
	// algorithm. This ensures that a term definition is created for `value`
	// in the active context during Context Processing.
	Box::pin(define(
		Environment {
			loader: env.loader,
			warnings: env.warnings,
		},
		active_context,
		local_context,
		value,
		defined,
		remote_contexts.clone(),
		None,
		false,
		options.with_no_override(),
	))
	.await?;

	if let Some(term_definition) = active_context.get(value) {
		// If the active context has a term definition for `value`, and the
		// associated IRI mapping is a keyword, return that keyword.
		if let Some(Term::Keyword(k)) = term_definition.value {
			return Ok(Term::Keyword(k));
		}

		// If `vocab` is true and the active context has a term definition
		// for `value`, return the associated IRI mapping.
		if vocab {
			return match &term_definition.value {
				Some(value) => Ok(value.clone()),
				None => Ok(Term::Null),
			};
		}
	}

	if value.find(':').map(|i| i > 0).unwrap_or(false) {
		if BlankId::new(value).is_ok() {
			return Ok(Term::Id(Id::new(value)));
		}

		if value == "_:" {
			return Ok(Term::Id(Id::Invalid("_:".to_string())));
		}

		if let Some((prefix, suffix)) = as_compact_iri(value) {
			// If `local_context` contains a `prefix` entry that is not yet
			// fully defined, define it first.
			Box::pin(define(
				Environment {
					loader: env.loader,
					warnings: env.warnings,
				},
				active_context,
				local_context,
				prefix,
				defined,
				remote_contexts,
				None,
				false,
				options.with_no_override(),
			))
			.await?;

			// If the active context contains a term definition for `prefix`
			// having a non-null IRI mapping and a true prefix flag, return
			// the concatenation of the IRI mapping and the suffix.
			if let Some(term_definition) = active_context.get(prefix) {
				if term_definition.prefix {
					if let Some(mapping) = &term_definition.value {
						let mut result = mapping.as_str().to_string();
						result.push_str(suffix);

						return Ok(Term::Id(Id::new(result)));
					}
				}
			}
		}

		if Iri::new(value).is_ok() {
			return Ok(Term::Id(Id::new(value)));
		}
	}

	// If `vocab` is true, and the active context has a vocabulary mapping,
	// return the result of concatenating the vocabulary mapping with
	// `value`.
	if vocab {
		match active_context.vocabulary() {
			Some(Term::Id(mapping)) => {
				let mut result = mapping.as_str().to_string();
				result.push_str(value);

				return Ok(Term::Id(Id::new(result)));
			}
			Some(_) => return Ok(invalid_iri(&mut env, value.to_string())),
			None => (),
		}
	}

	// Otherwise, if `document_relative` is true, resolve `value` against the
	// base IRI from the active context. Only the basic algorithm of RFC 3986
	// section 5.2 is used; neither Syntax-Based Normalization nor
	// Scheme-Based Normalization are performed.
	if document_relative {
		if let Ok(iri_ref) = IriRef::new(value) {
			if let Some(iri) = resolve_iri(iri_ref, active_context.base_iri()) {
				return Ok(Term::Id(Id::Iri(iri)));
			}
		}
	}

	// Return `value` as is.
	Ok(invalid_iri(&mut env, value.to_string()))
}

/// IRI expansion.
///
/// Default values for `document_relative` and `vocab` are `false` and
/// `true`.
pub fn expand_iri<W>(
	warnings: &mut W,
	active_context: &Context,
	value: Nullable<&str>,
	document_relative: bool,
	vocab: bool,
) -> Term
where
	W: warning::Handler,
{
	let value = match value {
		Nullable::Null => return Term::Null,
		Nullable::Some(value) => value,
	};

	if let Ok(keyword) = Keyword::try_from(value) {
		return Term::Keyword(keyword);
	}

	if is_keyword_like(value) {
		warnings.handle(Warning::KeywordLikeValue(value.to_string()));
		return Term::Null;
	}

	if let Some(term_definition) = active_context.get(value) {
		// If the active context has a term definition for `value`, and the
		// associated IRI mapping is a keyword, return that keyword.
		if let Some(Term::Keyword(k)) = term_definition.value {
			return Term::Keyword(k);
		}

		// If `vocab` is true and the active context has a term definition
		// for `value`, return the associated IRI mapping.
		if vocab {
			return match &term_definition.value {
				Some(value) => value.clone(),
				None => Term::Null,
			};
		}
	}

	if value.find(':').map(|i| i > 0).unwrap_or(false) {
		if BlankId::new(value).is_ok() {
			return Term::Id(Id::new(value));
		}

		if value == "_:" {
			return Term::Id(Id::Invalid("_:".to_string()));
		}

		if let Some((prefix, suffix)) = as_compact_iri(value) {
			// If the active context contains a term definition for `prefix`
			// having a non-null IRI mapping and a true prefix flag, return
			// the concatenation of the IRI mapping and the suffix.
			if let Some(term_definition) = active_context.get(prefix) {
				if term_definition.prefix {
					if let Some(mapping) = &term_definition.value {
						let mut result = mapping.as_str().to_string();
						result.push_str(suffix);

						return Term::Id(Id::new(result));
					}
				}
			}
		}

		if Iri::new(value).is_ok() {
			return Term::Id(Id::new(value));
		}
	}

	if vocab {
		match active_context.vocabulary() {
			Some(Term::Id(mapping)) => {
				let mut result = mapping.as_str().to_string();
				result.push_str(value);

				return Term::Id(Id::new(result));
			}
			Some(_) => {
				warnings.handle(Warning::MalformedIri(value.to_string()));
				return Term::Id(Id::Invalid(value.to_string()));
			}
			None => (),
		}
	}

	if document_relative {
		if let Ok(iri_ref) = IriRef::new(value) {
			if let Some(iri) = resolve_iri(iri_ref, active_context.base_iri()) {
				return Term::Id(Id::Iri(iri));
			}
		}
	}

	warnings.handle(Warning::MalformedIri(value.to_string()));
	Term::Id(Id::Invalid(value.to_string()))
}

fn invalid_iri<L, W: warning::Handler>(env: &mut Environment<L, W>, value: String) -> Term {
	env.warnings.handle(Warning::MalformedIri(value.clone()));
	Term::Id(Id::Invalid(value))
}
