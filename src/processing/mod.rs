//! Context Processing algorithm and related types.
//!
//! A *local context* (string, map, array or null) is folded into an active
//! context by [`process_context`], defining terms through the Create Term
//! Definition algorithm and dereferencing remote contexts through the
//! injected loader.
mod define;
mod iri;
mod stack;

pub(crate) use define::{define, DefinedTerms};
pub(crate) use iri::{as_compact_iri, expand_iri_with};
pub use iri::expand_iri;
pub use stack::ProcessingStack;

use crate::loader::LoadError;
use crate::object;
use crate::syntax::{Direction, ErrorCode, LenientLangTagBuf, Nullable, Object, Value};
use crate::warning::{self, Warning};
use crate::{Context, Environment, Loader, ProcessingMode, Term};
use iref::{Iri, IriBuf, IriRef};

/// Maximum number of remote contexts dereferenced during a single
/// transformation.
pub const REMOTE_CONTEXT_LIMIT: usize = 50;

/// Errors that can happen during context processing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("invalid context nullification")]
	InvalidContextNullification,

	#[error("remote document loading failed")]
	LoadingDocumentFailed,

	#[error("processing mode conflict")]
	ProcessingModeConflict,

	#[error("maximum number of remote contexts exceeded")]
	ContextOverflow,

	#[error("invalid `@context` entry")]
	InvalidContextEntry,

	#[error("invalid local context")]
	InvalidLocalContext,

	#[error("invalid `@import` value")]
	InvalidImportValue,

	#[error("invalid remote context")]
	InvalidRemoteContext,

	#[error("invalid base IRI")]
	InvalidBaseIri,

	#[error("invalid vocabulary mapping")]
	InvalidVocabMapping,

	#[error("invalid default language")]
	InvalidDefaultLanguage,

	#[error("invalid base direction")]
	InvalidBaseDirection,

	#[error("invalid `@propagate` value")]
	InvalidPropagateValue,

	#[error("invalid `@version` value")]
	InvalidVersionValue,

	#[error("cyclic IRI mapping")]
	CyclicIriMapping,

	#[error("invalid term definition")]
	InvalidTermDefinition,

	#[error("keyword redefinition")]
	KeywordRedefinition,

	#[error("invalid type mapping")]
	InvalidTypeMapping,

	#[error("invalid reverse property")]
	InvalidReverseProperty,

	#[error("invalid IRI mapping")]
	InvalidIriMapping,

	#[error("invalid keyword alias")]
	InvalidKeywordAlias,

	#[error("invalid container mapping")]
	InvalidContainerMapping,

	#[error("invalid scoped context")]
	InvalidScopedContext,

	#[error("invalid language mapping")]
	InvalidLanguageMapping,

	#[error("invalid `@nest` value")]
	InvalidNestValue,

	#[error("invalid `@prefix` value")]
	InvalidPrefixValue,

	#[error("protected term redefinition")]
	ProtectedTermRedefinition,

	#[error(transparent)]
	ContextLoadingFailed(#[from] LoadError),
}

impl Error {
	/// Returns the stable code of this error.
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::InvalidContextNullification => ErrorCode::InvalidContextNullification,
			Self::LoadingDocumentFailed => ErrorCode::LoadingDocumentFailed,
			Self::ProcessingModeConflict => ErrorCode::ProcessingModeConflict,
			Self::ContextOverflow => ErrorCode::ContextOverflow,
			Self::InvalidContextEntry => ErrorCode::InvalidContextEntry,
			Self::InvalidLocalContext => ErrorCode::InvalidLocalContext,
			Self::InvalidImportValue => ErrorCode::InvalidImportValue,
			Self::InvalidRemoteContext => ErrorCode::InvalidRemoteContext,
			Self::InvalidBaseIri => ErrorCode::InvalidBaseIri,
			Self::InvalidVocabMapping => ErrorCode::InvalidVocabMapping,
			Self::InvalidDefaultLanguage => ErrorCode::InvalidDefaultLanguage,
			Self::InvalidBaseDirection => ErrorCode::InvalidBaseDirection,
			Self::InvalidPropagateValue => ErrorCode::InvalidPropagateValue,
			Self::InvalidVersionValue => ErrorCode::InvalidVersionValue,
			Self::CyclicIriMapping => ErrorCode::CyclicIriMapping,
			Self::InvalidTermDefinition => ErrorCode::InvalidTermDefinition,
			Self::KeywordRedefinition => ErrorCode::KeywordRedefinition,
			Self::InvalidTypeMapping => ErrorCode::InvalidTypeMapping,
			Self::InvalidReverseProperty => ErrorCode::InvalidReverseProperty,
			Self::InvalidIriMapping => ErrorCode::InvalidIriMapping,
			Self::InvalidKeywordAlias => ErrorCode::InvalidKeywordAlias,
			Self::InvalidContainerMapping => ErrorCode::InvalidContainerMapping,
			Self::InvalidScopedContext => ErrorCode::InvalidScopedContext,
			Self::InvalidLanguageMapping => ErrorCode::InvalidLanguageMapping,
			Self::InvalidNestValue => ErrorCode::InvalidNestValue,
			Self::InvalidPrefixValue => ErrorCode::InvalidPrefixValue,
			Self::ProtectedTermRedefinition => ErrorCode::ProtectedTermRedefinition,
			Self::ContextLoadingFailed(_) => ErrorCode::LoadingRemoteContextFailed,
		}
	}
}

/// Options of the Context Processing algorithm.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Options {
	/// The processing mode.
	pub processing_mode: ProcessingMode,

	/// Override protected definitions.
	pub override_protected: bool,

	/// Propagate the processed context.
	pub propagate: bool,

	/// Validate scoped contexts.
	///
	/// When disabled, already-dereferenced remote contexts are skipped
	/// instead of being processed again.
	pub validate_scoped_context: bool,
}

impl Options {
	/// Returns the same set of options, but with `override_protected` set to
	/// `true`.
	#[must_use]
	pub fn with_override(&self) -> Options {
		let mut opt = *self;
		opt.override_protected = true;
		opt
	}

	/// Returns the same set of options, but with `override_protected` set to
	/// `false`.
	#[must_use]
	pub fn with_no_override(&self) -> Options {
		let mut opt = *self;
		opt.override_protected = false;
		opt
	}

	/// Returns the same set of options, but with `propagate` set to `false`.
	#[must_use]
	pub fn without_propagation(&self) -> Options {
		let mut opt = *self;
		opt.propagate = false;
		opt
	}

	/// Returns the same set of options, but with `validate_scoped_context`
	/// set to `false`.
	#[must_use]
	pub fn without_validation(&self) -> Options {
		let mut opt = *self;
		opt.validate_scoped_context = false;
		opt
	}
}

impl Default for Options {
	fn default() -> Options {
		Options {
			processing_mode: ProcessingMode::default(),
			override_protected: false,
			propagate: true,
			validate_scoped_context: true,
		}
	}
}

/// Resolves `iri_ref` against the given base IRI.
pub(crate) fn resolve_iri(iri_ref: &IriRef, base_iri: Option<&Iri>) -> Option<IriBuf> {
	match base_iri {
		Some(base_iri) => Some(iri_ref.resolved(base_iri)),
		None => iri_ref.as_iri().map(ToOwned::to_owned),
	}
}

/// Context definition entries that are not term bindings.
const CONTROL_ENTRIES: [&str; 8] = [
	"@base",
	"@direction",
	"@import",
	"@language",
	"@propagate",
	"@protected",
	"@version",
	"@vocab",
];

/// A context definition merged with its `@import`ed context.
///
/// Entries of the importing definition replace common entries of the
/// imported one.
pub(crate) struct Merged<'a> {
	base: &'a Object,
	imported: Option<Object>,
}

impl<'a> Merged<'a> {
	pub fn new(base: &'a Object, imported: Option<Object>) -> Self {
		Self { base, imported }
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		object::get(self.base, key)
			.or_else(|| self.imported.as_ref().and_then(|i| object::get(i, key)))
	}

	pub fn protected(&self) -> Option<bool> {
		match self.get("@protected") {
			Some(Value::Boolean(b)) => Some(*b),
			_ => None,
		}
	}

	/// Term binding keys: imported entries not replaced by the importing
	/// definition first, then the importing definition's own entries.
	pub fn bindings(&self) -> Vec<&str> {
		let mut keys = Vec::new();

		if let Some(imported) = &self.imported {
			for entry in imported.iter() {
				let key = entry.key.as_str();
				if !CONTROL_ENTRIES.contains(&key) && object::get(self.base, key).is_none() {
					keys.push(key)
				}
			}
		}

		for entry in self.base.iter() {
			let key = entry.key.as_str();
			if !CONTROL_ENTRIES.contains(&key) {
				keys.push(key)
			}
		}

		keys
	}
}

/// Extracts the `@context` entry of a dereferenced context document.
fn extract_context(document: &Value) -> Result<Value, Error> {
	document
		.as_object()
		.and_then(|o| object::get(o, "@context"))
		.cloned()
		.ok_or(Error::InvalidRemoteContext)
}

/// Context Processing algorithm.
///
/// Folds `local_context` into `active_context`, returning the new active
/// context. The recommended default value for `remote_contexts` is the empty
/// stack.
pub async fn process_context<L, W>(
	mut env: Environment<'_, L, W>,
	active_context: &Context,
	local_context: &Value,
	mut remote_contexts: ProcessingStack,
	base_url: Option<&Iri>,
	mut options: Options,
) -> Result<Context, Error>
where
	L: Loader,
	W: warning::Handler,
{
	// 1) Initialize `result` to the result of cloning the active context,
	// with the inverse context marked stale.
	let mut result = active_context.clone();

	// 2) If `local_context` is an object containing the entry `@propagate`,
	// its value must be boolean true or false; set `propagate` to that
	// value.
	if let Value::Object(definition) = local_context {
		if let Some(propagate) = object::get(definition, "@propagate") {
			if options.processing_mode == ProcessingMode::JsonLd1_0 {
				return Err(Error::InvalidContextEntry);
			}

			options.propagate = match propagate {
				Value::Boolean(b) => *b,
				_ => return Err(Error::InvalidPropagateValue),
			};
		}
	}

	// 3) If `propagate` is false, and `result` does not have a previous
	// context, set the previous context of `result` to `active_context`.
	if !options.propagate && result.previous_context().is_none() {
		result.set_previous_context(active_context.clone());
	}

	// 4) If `local_context` is not an array, set it to an array containing
	// only `local_context`.
	// 5) For each item `context` in `local_context`:
	for context in Value::force_as_array(local_context) {
		match context {
			// 5.1) If `context` is null:
			Value::Null => {
				// If `override_protected` is false and the active context
				// contains any protected term definitions, an invalid
				// context nullification has been detected.
				if !options.override_protected && result.has_protected_items() {
					return Err(Error::InvalidContextNullification);
				}

				// Otherwise, initialize `result` as a newly-initialized
				// active context, setting both `base_iri` and
				// `original_base_url` to the value of `original_base_url` in
				// the active context, ...
				let previous_result = result;
				result = Context::new(active_context.original_base_url().map(ToOwned::to_owned));

				// ... and, if `propagate` is false, `previous_context` in
				// `result` to the previous value of `result`.
				if !options.propagate {
					result.set_previous_context(previous_result);
				}
			}

			// 5.2) If `context` is a string:
			Value::String(context_url) => {
				// Initialize `context` to the result of resolving it against
				// the base URL.
				let context_iri = IriRef::new(context_url.as_str())
					.ok()
					.and_then(|iri_ref| resolve_iri(iri_ref, base_url))
					.ok_or(Error::LoadingDocumentFailed)?;

				// If the context was previously dereferenced and scoped
				// contexts are not being validated, the processor must not
				// do a further dereference.
				if !options.validate_scoped_context && remote_contexts.contains(&context_iri) {
					continue;
				}

				// If the number of entries in the `remote_contexts` stack
				// exceeds a processor defined limit, a context overflow
				// error has been detected; otherwise, add `context` to
				// `remote_contexts`.
				if remote_contexts.len() >= REMOTE_CONTEXT_LIMIT {
					return Err(Error::ContextOverflow);
				}

				remote_contexts.push(context_iri.clone());

				// Dereference `context`. If it cannot be dereferenced, or
				// the dereferenced document has no top-level map with an
				// `@context` entry, an error has been detected.
				let remote_document = env.loader.load(&context_iri).await?;
				let loaded_context = extract_context(remote_document.document())?;
				let document_url = remote_document.url.clone().unwrap_or(context_iri);

				// Set `result` to the result of recursively calling this
				// algorithm, passing `result` for the active context, the
				// loaded context for the local context, the `documentUrl` of
				// the context document for the base URL, and a copy of
				// `remote_contexts`.
				let new_options = Options {
					processing_mode: options.processing_mode,
					override_protected: false,
					propagate: true,
					validate_scoped_context: options.validate_scoped_context,
				};

				let r = Box::pin(process_context(
					Environment {
						loader: env.loader,
						warnings: env.warnings,
					},
					&result,
					&loaded_context,
					remote_contexts.clone(),
					Some(document_url.as_iri()),
					new_options,
				))
				.await?;

				result = r;
			}

			// 5.4) Otherwise, `context` must be a context definition.
			Value::Object(context) => {
				// 5.5) If `context` has an `@version` entry, its value must
				// be the number 1.1; if processing mode is json-ld-1.0, a
				// processing mode conflict error has been detected.
				if let Some(version) = object::get(context, "@version") {
					match version {
						Value::Number(n) if n.trimmed().as_str() == "1.1" => (),
						_ => return Err(Error::InvalidVersionValue),
					}

					if options.processing_mode == ProcessingMode::JsonLd1_0 {
						return Err(Error::ProcessingModeConflict);
					}
				}

				// 5.6) If `context` has an `@import` entry:
				let import_context = match object::get(context, "@import") {
					Some(import_value) => {
						// 5.6.1) If processing mode is json-ld-1.0, an
						// invalid context entry error has been detected.
						if options.processing_mode == ProcessingMode::JsonLd1_0 {
							return Err(Error::InvalidContextEntry);
						}

						// 5.6.2) Its value must be a string.
						let import_url =
							import_value.as_str().ok_or(Error::InvalidImportValue)?;

						// 5.6.3) Initialize `import` to the result of
						// resolving the value of `@import` against the base
						// URL.
						let import_iri = IriRef::new(import_url)
							.ok()
							.and_then(|iri_ref| resolve_iri(iri_ref, base_url))
							.ok_or(Error::InvalidImportValue)?;

						// 5.6.4) Dereference `import`.
						let import_document = env.loader.load(&import_iri).await?;
						let import_context = extract_context(import_document.document())?;

						// The value of `@context` must be a context
						// definition.
						match import_context {
							Value::Object(import_context) => {
								// If `import_context` has an `@import`
								// entry, an invalid context entry error has
								// been detected.
								if object::get(&import_context, "@import").is_some() {
									return Err(Error::InvalidContextEntry);
								}

								Some(import_context)
							}
							_ => return Err(Error::InvalidRemoteContext),
						}
					}
					None => None,
				};

				// 5.6.7) Merge `context` into `import_context`, replacing
				// common entries with those from `context`.
				let context = Merged::new(context, import_context);

				// 5.7) If `context` has an `@base` entry and
				// `remote_contexts` is empty, i.e. the currently being
				// processed context is not a remote context:
				if remote_contexts.is_empty() {
					if let Some(value) = context.get("@base") {
						match value {
							Value::Null => {
								// If `value` is null, remove the base IRI of
								// `result`.
								result.set_base_iri(None)
							}
							Value::String(iri_ref) => match IriRef::new(iri_ref.as_str()) {
								Ok(iri_ref) => match iri_ref.as_iri() {
									Some(iri) => result.set_base_iri(Some(iri.to_owned())),
									None => {
										let resolved =
											resolve_iri(iri_ref, result.base_iri())
												.ok_or(Error::InvalidBaseIri)?;
										result.set_base_iri(Some(resolved))
									}
								},
								Err(_) => return Err(Error::InvalidBaseIri),
							},
							_ => return Err(Error::InvalidBaseIri),
						}
					}
				}

				// 5.8) If `context` has an `@vocab` entry:
				if let Some(value) = context.get("@vocab") {
					match value {
						Value::Null => {
							// If `value` is null, remove any vocabulary
							// mapping from `result`.
							result.set_vocabulary(None)
						}
						Value::String(value) => {
							// Otherwise, the vocabulary mapping of `result`
							// is set to the result of IRI expanding `value`
							// using true for document relative. It must be
							// an IRI or a blank node identifier.
							// NOTE: the use of blank node identifiers for
							// `@vocab` is obsolete, and may be removed in a
							// future version of JSON-LD.
							match expand_iri(
								env.warnings,
								&result,
								Nullable::Some(value.as_str()),
								true,
								true,
							) {
								Term::Id(id) if id.is_valid() => {
									result.set_vocabulary(Some(Term::Id(id)))
								}
								_ => return Err(Error::InvalidVocabMapping),
							}
						}
						_ => return Err(Error::InvalidVocabMapping),
					}
				}

				// 5.9) If `context` has an `@language` entry:
				if let Some(value) = context.get("@language") {
					match value {
						Value::Null => {
							// If `value` is null, remove any default
							// language from `result`.
							result.set_default_language(None)
						}
						Value::String(tag) => {
							// Ill-formed BCP-47 tags are kept, with a
							// warning.
							let (tag, error) =
								LenientLangTagBuf::new(tag.as_str().to_owned());

							if let Some(error) = error {
								env.warnings.handle(Warning::MalformedLanguageTag(
									tag.as_str().to_owned(),
									error,
								));
							}

							result.set_default_language(Some(tag))
						}
						_ => return Err(Error::InvalidDefaultLanguage),
					}
				}

				// 5.10) If `context` has an `@direction` entry:
				if let Some(value) = context.get("@direction") {
					// 5.10.1) If processing mode is json-ld-1.0, an invalid
					// context entry error has been detected.
					if options.processing_mode == ProcessingMode::JsonLd1_0 {
						return Err(Error::InvalidContextEntry);
					}

					match value {
						Value::Null => result.set_default_base_direction(None),
						Value::String(s) => match Direction::try_from(s.as_str()) {
							Ok(direction) => {
								result.set_default_base_direction(Some(direction))
							}
							Err(_) => return Err(Error::InvalidBaseDirection),
						},
						_ => return Err(Error::InvalidBaseDirection),
					}
				}

				// 5.11/5.13) `@propagate` and `@protected` entry checks.
				if let Some(value) = context.get("@propagate") {
					if options.processing_mode == ProcessingMode::JsonLd1_0 {
						return Err(Error::InvalidContextEntry);
					}

					if !matches!(value, Value::Boolean(_)) {
						return Err(Error::InvalidPropagateValue);
					}
				}

				if let Some(value) = context.get("@protected") {
					if options.processing_mode == ProcessingMode::JsonLd1_0 {
						return Err(Error::InvalidContextEntry);
					}

					if !matches!(value, Value::Boolean(_)) {
						return Err(Error::InvalidContextEntry);
					}
				}

				// 5.12) Create a map `defined` to keep track of whether or
				// not a term has already been defined or is currently being
				// defined during recursion.
				let mut defined = DefinedTerms::new();
				let protected = context.protected().unwrap_or(false);

				// 5.13) For each key-value pair in `context` where key is
				// not a control entry, invoke the Create Term Definition
				// algorithm.
				for key in context.bindings() {
					define(
						Environment {
							loader: env.loader,
							warnings: env.warnings,
						},
						&mut result,
						&context,
						key,
						&mut defined,
						remote_contexts.clone(),
						base_url,
						protected,
						options,
					)
					.await?
				}
			}

			// 5.3) Anything else is an invalid local context.
			_ => return Err(Error::InvalidLocalContext),
		}
	}

	Ok(result)
}
