//! Active context and related types.
mod definition;
pub mod inverse;

use crate::syntax::{Direction, LenientLangTagBuf};
use crate::Term;
use indexmap::IndexMap;
use iref::{Iri, IriBuf};
use once_cell::sync::OnceCell;

pub use definition::{TermDefinition, Type};
pub use inverse::InverseContext;

/// Processed JSON-LD context.
///
/// The accumulated interpretation state used while processing a document:
/// base and vocabulary mappings, default language and direction, term
/// definitions, previous context and a lazily-built inverse index.
///
/// The inverse index is a cache: every mutation marks it stale, and it is
/// recomputed on the next read.
pub struct Context {
	original_base_url: Option<IriBuf>,
	base_iri: Option<IriBuf>,
	vocabulary: Option<Term>,
	default_language: Option<LenientLangTagBuf>,
	default_base_direction: Option<Direction>,
	previous_context: Option<Box<Self>>,
	definitions: IndexMap<String, TermDefinition>,
	inverse: OnceCell<InverseContext>,
}

impl Default for Context {
	fn default() -> Self {
		Self::new(None)
	}
}

impl Context {
	/// Creates a new context with the given base IRI.
	///
	/// The original base URL is an immutable snapshot of the document's
	/// origin; later `@base` entries change the base IRI but not the
	/// original base URL.
	pub fn new(base_iri: Option<IriBuf>) -> Self {
		Self {
			original_base_url: base_iri.clone(),
			base_iri,
			vocabulary: None,
			default_language: None,
			default_base_direction: None,
			previous_context: None,
			definitions: IndexMap::new(),
			inverse: OnceCell::new(),
		}
	}

	/// Returns a reference to the given `term` definition, if any.
	pub fn get(&self, term: &str) -> Option<&TermDefinition> {
		self.definitions.get(term)
	}

	/// Checks if the given `term` is defined.
	pub fn contains_term(&self, term: &str) -> bool {
		self.definitions.contains_key(term)
	}

	/// Returns the original base URL of the context.
	pub fn original_base_url(&self) -> Option<&Iri> {
		self.original_base_url.as_deref()
	}

	/// Returns the base IRI of the context.
	pub fn base_iri(&self) -> Option<&Iri> {
		self.base_iri.as_deref()
	}

	/// Returns the `@vocab` value, if any.
	pub fn vocabulary(&self) -> Option<&Term> {
		self.vocabulary.as_ref()
	}

	/// Returns the default `@language` value.
	pub fn default_language(&self) -> Option<&LenientLangTagBuf> {
		self.default_language.as_ref()
	}

	/// Returns the default `@direction` value.
	pub fn default_base_direction(&self) -> Option<Direction> {
		self.default_base_direction
	}

	/// Returns a reference to the previous context.
	pub fn previous_context(&self) -> Option<&Self> {
		self.previous_context.as_deref()
	}

	/// Returns the number of terms defined.
	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	/// Checks if no terms are defined.
	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}

	/// Returns the term definitions, in insertion order.
	pub fn definitions(&self) -> impl Iterator<Item = (&str, &TermDefinition)> {
		self.definitions.iter().map(|(k, d)| (k.as_str(), d))
	}

	/// Checks if the context has a protected definition.
	pub fn has_protected_items(&self) -> bool {
		self.definitions.values().any(|d| d.protected)
	}

	/// Returns the inverse of this context, building it if it is stale.
	pub fn inverse(&self) -> &InverseContext {
		self.inverse.get_or_init(|| self.into())
	}

	/// Sets (or removes) the definition for the given `term`, returning the
	/// previous definition if any.
	pub fn set(&mut self, term: String, definition: Option<TermDefinition>) -> Option<TermDefinition> {
		self.inverse.take();
		match definition {
			Some(definition) => self.definitions.insert(term, definition),
			None => self.definitions.shift_remove(&term),
		}
	}

	/// Sets the base IRI.
	pub fn set_base_iri(&mut self, iri: Option<IriBuf>) {
		self.inverse.take();
		self.base_iri = iri
	}

	/// Sets the `@vocab` value.
	pub fn set_vocabulary(&mut self, vocab: Option<Term>) {
		self.inverse.take();
		self.vocabulary = vocab
	}

	/// Sets the default `@language` value.
	pub fn set_default_language(&mut self, lang: Option<LenientLangTagBuf>) {
		self.inverse.take();
		self.default_language = lang
	}

	/// Sets the default `@direction` value.
	pub fn set_default_base_direction(&mut self, dir: Option<Direction>) {
		self.inverse.take();
		self.default_base_direction = dir
	}

	/// Sets the previous context.
	///
	/// The pointer is never recursively populated: it saves a snapshot that
	/// traversals use at most once before resetting it.
	pub fn set_previous_context(&mut self, previous: Self) {
		self.inverse.take();
		self.previous_context = Some(Box::new(previous))
	}
}

impl Clone for Context {
	fn clone(&self) -> Self {
		Self {
			original_base_url: self.original_base_url.clone(),
			base_iri: self.base_iri.clone(),
			vocabulary: self.vocabulary.clone(),
			default_language: self.default_language.clone(),
			default_base_direction: self.default_base_direction,
			previous_context: self.previous_context.clone(),
			definitions: self.definitions.clone(),
			inverse: OnceCell::new(),
		}
	}
}
