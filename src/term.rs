use crate::syntax::Keyword;
use iref::{Iri, IriBuf};
use rdf_types::{BlankId, BlankIdBuf};
use std::fmt;

/// Node identifier.
///
/// Either a well-formed IRI, a blank node identifier, or a string that is
/// neither. Invalid identifiers are produced when a value cannot be expanded
/// to a well-formed IRI; they are carried through (with a warning) rather
/// than dropped so the output remains faithful to the input.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Id {
	/// Well-formed IRI.
	Iri(IriBuf),

	/// Blank node identifier.
	Blank(BlankIdBuf),

	/// Anything else.
	Invalid(String),
}

impl Id {
	/// Parses the given string as a blank node identifier or an IRI,
	/// falling back to [`Id::Invalid`].
	pub fn new(id: impl Into<String>) -> Self {
		let id = id.into();

		if BlankId::new(&id).is_ok() {
			Self::Blank(BlankIdBuf::new(id).unwrap())
		} else if Iri::new(&id).is_ok() {
			Self::Iri(IriBuf::new(id).unwrap())
		} else {
			Self::Invalid(id)
		}
	}

	pub fn is_valid(&self) -> bool {
		!matches!(self, Self::Invalid(_))
	}

	pub fn is_blank(&self) -> bool {
		matches!(self, Self::Blank(_))
	}

	pub fn as_iri(&self) -> Option<&Iri> {
		match self {
			Self::Iri(iri) => Some(iri),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			Self::Iri(iri) => iri.as_str(),
			Self::Blank(b) => b.as_str(),
			Self::Invalid(s) => s.as_str(),
		}
	}

	pub fn into_string(self) -> String {
		match self {
			Self::Iri(iri) => iri.into_string(),
			Self::Blank(b) => b.to_string(),
			Self::Invalid(s) => s,
		}
	}
}

impl From<IriBuf> for Id {
	fn from(iri: IriBuf) -> Self {
		Self::Iri(iri)
	}
}

impl From<BlankIdBuf> for Id {
	fn from(b: BlankIdBuf) -> Self {
		Self::Blank(b)
	}
}

impl fmt::Display for Id {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}

/// Identifier, keyword or `null`.
///
/// The result of IRI expansion.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Term {
	/// `null` value.
	Null,

	/// Node identifier.
	Id(Id),

	/// Keyword.
	Keyword(Keyword),
}

impl Term {
	/// Checks if this term is `null`.
	pub fn is_null(&self) -> bool {
		matches!(self, Term::Null)
	}

	/// Checks if this term is a keyword.
	pub fn is_keyword(&self) -> bool {
		matches!(self, Term::Keyword(_))
	}

	/// Returns a reference to the IRI representation of the term, if any.
	pub fn as_iri(&self) -> Option<&Iri> {
		match self {
			Term::Id(id) => id.as_iri(),
			_ => None,
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			Term::Id(id) => id.as_str(),
			Term::Keyword(k) => k.into_str(),
			Term::Null => "",
		}
	}

	/// Turns this term into an identifier if possible.
	pub fn into_id(self) -> Result<Id, Self> {
		match self {
			Term::Id(id) => Ok(id),
			term => Err(term),
		}
	}
}

impl From<Id> for Term {
	fn from(id: Id) -> Self {
		Term::Id(id)
	}
}

impl From<IriBuf> for Term {
	fn from(iri: IriBuf) -> Self {
		Term::Id(Id::Iri(iri))
	}
}

impl From<Keyword> for Term {
	fn from(k: Keyword) -> Self {
		Term::Keyword(k)
	}
}

impl fmt::Display for Term {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Term::Id(id) => id.fmt(f),
			Term::Keyword(k) => k.fmt(f),
			Term::Null => "null".fmt(f),
		}
	}
}
