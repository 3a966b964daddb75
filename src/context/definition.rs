use crate::syntax::{Container, Direction, Keyword, LenientLangTagBuf, Nullable};
use crate::Term;
use iref::IriBuf;
use json_syntax::Value;

/// Type mapping of a term definition.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Type {
	/// `@id`.
	Id,

	/// `@json`.
	Json,

	/// `@none`.
	None,

	/// `@vocab`.
	Vocab,

	/// Datatype IRI.
	Iri(IriBuf),
}

impl Type {
	pub fn as_str(&self) -> &str {
		match self {
			Self::Id => "@id",
			Self::Json => "@json",
			Self::None => "@none",
			Self::Vocab => "@vocab",
			Self::Iri(iri) => iri.as_str(),
		}
	}
}

impl TryFrom<Term> for Type {
	type Error = Term;

	fn try_from(term: Term) -> Result<Self, Term> {
		match term {
			Term::Keyword(Keyword::Id) => Ok(Self::Id),
			Term::Keyword(Keyword::Json) => Ok(Self::Json),
			Term::Keyword(Keyword::None) => Ok(Self::None),
			Term::Keyword(Keyword::Vocab) => Ok(Self::Vocab),
			Term::Id(crate::Id::Iri(iri)) => Ok(Self::Iri(iri)),
			term => Err(term),
		}
	}
}

/// Term definition.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct TermDefinition {
	/// IRI mapping.
	///
	/// `None` when the term is explicitly mapped to `null`: such a term is
	/// not used for IRI expansion but is retained to detect future
	/// redefinitions.
	pub value: Option<Term>,

	/// Prefix flag.
	pub prefix: bool,

	/// Protected flag.
	pub protected: bool,

	/// Reverse property flag.
	pub reverse_property: bool,

	/// Base URL, used to resolve the local context.
	pub base_url: Option<IriBuf>,

	/// Local context, stored unprocessed.
	///
	/// Processed when the term comes into play as an active property or as a
	/// type value, never eagerly.
	pub context: Option<Box<Value>>,

	/// Container mapping.
	pub container: Container,

	/// Direction mapping.
	pub direction: Option<Nullable<Direction>>,

	/// Index mapping.
	pub index: Option<String>,

	/// Language mapping.
	pub language: Option<Nullable<LenientLangTagBuf>>,

	/// Nest term.
	pub nest: Option<String>,

	/// Type mapping.
	pub typ: Option<Type>,
}

impl TermDefinition {
	/// Structural equality, disregarding the protected flag.
	///
	/// A protected definition may only be replaced by a definition equal to
	/// it under this comparison.
	pub fn eq_disregarding_protected(&self, other: &Self) -> bool {
		self.value == other.value
			&& self.prefix == other.prefix
			&& self.reverse_property == other.reverse_property
			&& self.base_url == other.base_url
			&& self.context == other.context
			&& self.container == other.container
			&& self.direction == other.direction
			&& self.index == other.index
			&& self.language == other.language
			&& self.nest == other.nest
			&& self.typ == other.typ
	}
}
