//! Non-fatal diagnostics.
//!
//! Warnings are surfaced through an injected [`Handler`] and never stop
//! processing.
use langtag::InvalidLangTag;
use rdf_types::BlankIdBuf;
use std::fmt;

/// Warning emitted during document processing.
#[derive(Debug)]
pub enum Warning {
	/// An empty string was used as a term.
	EmptyTerm,

	/// A blank node identifier was used as a property.
	BlankNodeIdProperty(BlankIdBuf),

	/// A term matching `@[A-Za-z]+` that is not a keyword was defined.
	KeywordLikeTerm(String),

	/// A value matching `@[A-Za-z]+` that is not a keyword was used where an
	/// IRI was expected.
	KeywordLikeValue(String),

	/// A value could not be expanded into a well-formed IRI.
	MalformedIri(String),

	/// A language tag is not well-formed according to BCP-47.
	MalformedLanguageTag(String, InvalidLangTag<String>),
}

impl fmt::Display for Warning {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::EmptyTerm => write!(f, "empty term"),
			Self::BlankNodeIdProperty(b) => {
				write!(f, "blank node identifier `{b}` used as property")
			}
			Self::KeywordLikeTerm(s) => write!(f, "keyword-like term `{s}`"),
			Self::KeywordLikeValue(s) => write!(f, "keyword-like value `{s}`"),
			Self::MalformedIri(s) => write!(f, "malformed IRI `{s}`"),
			Self::MalformedLanguageTag(s, _) => write!(f, "malformed language tag `{s}`"),
		}
	}
}

/// Warning handler.
///
/// Implemented by the unit type `()` which ignores warnings. Use [`Print`]
/// to print warnings on the standard error output, or implement your own
/// handler.
pub trait Handler {
	/// Handles a warning.
	fn handle(&mut self, warning: Warning);
}

impl Handler for () {
	fn handle(&mut self, _warning: Warning) {}
}

impl<H: Handler> Handler for &mut H {
	fn handle(&mut self, warning: Warning) {
		H::handle(*self, warning)
	}
}

/// Prints warnings on the standard error output.
pub struct Print;

impl Handler for Print {
	fn handle(&mut self, warning: Warning) {
		eprintln!("{warning}")
	}
}

/// Collects warnings into a vector.
#[derive(Default)]
pub struct Collect(pub Vec<Warning>);

impl Handler for Collect {
	fn handle(&mut self, warning: Warning) {
		self.0.push(warning)
	}
}
