use std::fmt;

#[derive(Clone, Copy, Debug)]
pub struct NotAKeyword<T>(pub T);

/// JSON-LD keywords.
///
/// The reserved tokens of the JSON-LD vocabulary, including the framing
/// keywords and the internal `@any`/`@null`/`@preserve` tokens. Any other
/// token of the form `@[A-Za-z]+` is *keyword-like* (see [`is_keyword_like`])
/// and triggers a warning-and-skip path instead of an error.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Keyword {
	/// `@any`.
	/// Used internally by the inverse context as a wildcard selector.
	Any,

	/// `@base`.
	/// Used to set the base IRI against which to resolve those relative IRI
	/// references which are otherwise interpreted relative to the document.
	Base,

	/// `@container`.
	/// Used to set the default container type for a term.
	Container,

	/// `@context`.
	/// Used to define the short-hand names that are used throughout a JSON-LD
	/// document.
	Context,

	/// `@default`.
	/// Used in framing to set the default value of an entry.
	Default,

	/// `@direction`.
	/// Used to set the base direction of a JSON-LD value.
	Direction,

	/// `@embed`.
	/// Framing keyword controlling object embedding.
	Embed,

	/// `@explicit`.
	/// Framing keyword controlling explicit inclusion.
	Explicit,

	/// `@graph`.
	/// Used to express a graph.
	Graph,

	/// `@id`.
	/// Used to uniquely identify node objects with IRIs or blank node
	/// identifiers.
	Id,

	/// `@import`.
	/// Used in a context definition to load an external context within which
	/// the containing context definition is merged.
	Import,

	/// `@included`.
	/// Used in a top-level node object to define an included block.
	Included,

	/// `@index`.
	/// Used to specify that a container is used to index information.
	Index,

	/// `@json`.
	/// Used as the `@type` value of a JSON literal.
	Json,

	/// `@language`.
	/// Used to specify the language of a string value or the default language
	/// of a document.
	Language,

	/// `@list`.
	/// Used to express an ordered set of data.
	List,

	/// `@nest`.
	/// Used to define a property of a node object that groups together
	/// properties of that node, but is not an edge in the graph.
	Nest,

	/// `@none`.
	/// Used as an index value when the indexed node does not have the feature
	/// being indexed.
	None,

	/// `@null`.
	/// Used internally by the inverse context to select terms with a `null`
	/// language mapping.
	Null,

	/// `@omitDefault`.
	/// Framing keyword controlling default omission.
	OmitDefault,

	/// `@prefix`.
	/// With the value `true`, allows the term to be used to construct compact
	/// IRIs.
	Prefix,

	/// `@preserve`.
	/// Used in framing to preserve node patterns.
	Preserve,

	/// `@propagate`.
	/// Used in a context definition to change the scope of that context.
	Propagate,

	/// `@protected`.
	/// Used to prevent term definitions of a context from being overridden by
	/// other contexts.
	Protected,

	/// `@requireAll`.
	/// Framing keyword requiring all entries to match.
	RequireAll,

	/// `@reverse`.
	/// Used to express reverse properties.
	Reverse,

	/// `@set`.
	/// Used to express an unordered set of data and to ensure that values are
	/// always represented as arrays.
	Set,

	/// `@type`.
	/// Used to set the type of a node or the datatype of a typed value.
	Type,

	/// `@value`.
	/// Used to specify the data that is associated with a particular property.
	Value,

	/// `@version`.
	/// Used in a context definition to set the processing mode.
	Version,

	/// `@vocab`.
	/// Used to expand properties and values in `@type` with a common prefix
	/// IRI.
	Vocab,
}

impl Keyword {
	pub fn into_str(self) -> &'static str {
		use Keyword::*;
		match self {
			Any => "@any",
			Base => "@base",
			Container => "@container",
			Context => "@context",
			Default => "@default",
			Direction => "@direction",
			Embed => "@embed",
			Explicit => "@explicit",
			Graph => "@graph",
			Id => "@id",
			Import => "@import",
			Included => "@included",
			Index => "@index",
			Json => "@json",
			Language => "@language",
			List => "@list",
			Nest => "@nest",
			None => "@none",
			Null => "@null",
			OmitDefault => "@omitDefault",
			Prefix => "@prefix",
			Preserve => "@preserve",
			Propagate => "@propagate",
			Protected => "@protected",
			RequireAll => "@requireAll",
			Reverse => "@reverse",
			Set => "@set",
			Type => "@type",
			Value => "@value",
			Version => "@version",
			Vocab => "@vocab",
		}
	}

	pub fn as_str(&self) -> &'static str {
		self.into_str()
	}
}

impl<'a> TryFrom<&'a str> for Keyword {
	type Error = NotAKeyword<&'a str>;

	fn try_from(s: &'a str) -> Result<Keyword, NotAKeyword<&'a str>> {
		use Keyword::*;
		match s {
			"@any" => Ok(Any),
			"@base" => Ok(Base),
			"@container" => Ok(Container),
			"@context" => Ok(Context),
			"@default" => Ok(Default),
			"@direction" => Ok(Direction),
			"@embed" => Ok(Embed),
			"@explicit" => Ok(Explicit),
			"@graph" => Ok(Graph),
			"@id" => Ok(Id),
			"@import" => Ok(Import),
			"@included" => Ok(Included),
			"@index" => Ok(Index),
			"@json" => Ok(Json),
			"@language" => Ok(Language),
			"@list" => Ok(List),
			"@nest" => Ok(Nest),
			"@none" => Ok(None),
			"@null" => Ok(Null),
			"@omitDefault" => Ok(OmitDefault),
			"@prefix" => Ok(Prefix),
			"@preserve" => Ok(Preserve),
			"@propagate" => Ok(Propagate),
			"@protected" => Ok(Protected),
			"@requireAll" => Ok(RequireAll),
			"@reverse" => Ok(Reverse),
			"@set" => Ok(Set),
			"@type" => Ok(Type),
			"@value" => Ok(Value),
			"@version" => Ok(Version),
			"@vocab" => Ok(Vocab),
			_ => Err(NotAKeyword(s)),
		}
	}
}

impl fmt::Display for Keyword {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.into_str().fmt(f)
	}
}

/// Checks if the given token is a JSON-LD keyword.
pub fn is_keyword(s: &str) -> bool {
	Keyword::try_from(s).is_ok()
}

/// Checks if the given token has the form of a keyword (`@[A-Za-z]+`),
/// whether or not it actually is one.
pub fn is_keyword_like(s: &str) -> bool {
	match s.strip_prefix('@') {
		Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphabetic()),
		None => false,
	}
}
