use super::Keyword;
use json_syntax::Value;

/// Atomic container keywords.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ContainerKind {
	Graph,
	Id,
	Index,
	Language,
	List,
	Set,
	Type,
}

impl ContainerKind {
	pub fn into_keyword(self) -> Keyword {
		self.into()
	}

	pub fn as_str(&self) -> &'static str {
		self.into_keyword().into_str()
	}
}

impl<'a> TryFrom<&'a str> for ContainerKind {
	type Error = &'a str;

	fn try_from(str: &'a str) -> Result<ContainerKind, &'a str> {
		use ContainerKind::*;
		match str {
			"@graph" => Ok(Graph),
			"@id" => Ok(Id),
			"@index" => Ok(Index),
			"@language" => Ok(Language),
			"@list" => Ok(List),
			"@set" => Ok(Set),
			"@type" => Ok(Type),
			_ => Err(str),
		}
	}
}

impl From<ContainerKind> for Keyword {
	fn from(c: ContainerKind) -> Keyword {
		use ContainerKind::*;
		match c {
			Graph => Keyword::Graph,
			Id => Keyword::Id,
			Index => Keyword::Index,
			Language => Keyword::Language,
			List => Keyword::List,
			Set => Keyword::Set,
			Type => Keyword::Type,
		}
	}
}

/// Invalid container mapping value.
#[derive(Debug)]
pub struct InvalidContainer;

/// Container mapping.
///
/// The closed set of *valid* container keyword combinations: a single
/// keyword, `@graph` with `@id` or `@index` (optionally with `@set`), or
/// `@set` combined with any of `@graph`, `@id`, `@index`, `@language`,
/// `@type`. Anything else is rejected by [`Container::with`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Container {
	/// Empty container mapping.
	None,

	Graph,
	Id,
	Index,
	Language,
	List,
	Set,
	Type,

	GraphSet,
	GraphId,
	GraphIndex,
	IdSet,
	IndexSet,
	LanguageSet,
	SetType,

	GraphIdSet,
	GraphIndexSet,
}

impl Default for Container {
	fn default() -> Self {
		Self::new()
	}
}

impl Container {
	pub fn new() -> Container {
		Container::None
	}

	/// Parses a `@container` entry value.
	///
	/// The value must be `null`, a container keyword, or an array combining
	/// container keywords in one of the allowed ways.
	pub fn from_value(value: &Value) -> Result<Self, InvalidContainer> {
		match value {
			Value::Null => Ok(Self::None),
			Value::String(s) => match ContainerKind::try_from(s.as_str()) {
				Ok(kind) => Ok(kind.into()),
				Err(_) => Err(InvalidContainer),
			},
			Value::Array(items) => {
				let mut container = Self::new();

				for item in items {
					let kind = item
						.as_str()
						.and_then(|s| ContainerKind::try_from(s).ok())
						.ok_or(InvalidContainer)?;

					if !container.add(kind) {
						return Err(InvalidContainer);
					}
				}

				Ok(container)
			}
			_ => Err(InvalidContainer),
		}
	}

	pub fn as_slice(&self) -> &[ContainerKind] {
		use Container::*;
		match self {
			None => &[],
			Graph => &[ContainerKind::Graph],
			Id => &[ContainerKind::Id],
			Index => &[ContainerKind::Index],
			Language => &[ContainerKind::Language],
			List => &[ContainerKind::List],
			Set => &[ContainerKind::Set],
			Type => &[ContainerKind::Type],
			GraphSet => &[ContainerKind::Graph, ContainerKind::Set],
			GraphId => &[ContainerKind::Graph, ContainerKind::Id],
			GraphIndex => &[ContainerKind::Graph, ContainerKind::Index],
			IdSet => &[ContainerKind::Id, ContainerKind::Set],
			IndexSet => &[ContainerKind::Index, ContainerKind::Set],
			LanguageSet => &[ContainerKind::Language, ContainerKind::Set],
			SetType => &[ContainerKind::Type, ContainerKind::Set],
			GraphIdSet => &[ContainerKind::Graph, ContainerKind::Id, ContainerKind::Set],
			GraphIndexSet => &[
				ContainerKind::Graph,
				ContainerKind::Index,
				ContainerKind::Set,
			],
		}
	}

	pub fn len(&self) -> usize {
		self.as_slice().len()
	}

	pub fn is_empty(&self) -> bool {
		matches!(self, Container::None)
	}

	pub fn contains(&self, c: ContainerKind) -> bool {
		self.as_slice().contains(&c)
	}

	/// Returns this container extended with `c`, if the combination is valid.
	pub fn with(&self, c: ContainerKind) -> Option<Container> {
		let new_container = match (self, c) {
			(Container::None, c) => c.into(),
			(Container::Graph, ContainerKind::Graph) => *self,
			(Container::Graph, ContainerKind::Set) => Container::GraphSet,
			(Container::Graph, ContainerKind::Id) => Container::GraphId,
			(Container::Graph, ContainerKind::Index) => Container::GraphIndex,
			(Container::Id, ContainerKind::Id) => *self,
			(Container::Id, ContainerKind::Graph) => Container::GraphId,
			(Container::Id, ContainerKind::Set) => Container::IdSet,
			(Container::Index, ContainerKind::Index) => *self,
			(Container::Index, ContainerKind::Graph) => Container::GraphIndex,
			(Container::Index, ContainerKind::Set) => Container::IndexSet,
			(Container::Language, ContainerKind::Language) => *self,
			(Container::Language, ContainerKind::Set) => Container::LanguageSet,
			(Container::List, ContainerKind::List) => *self,
			(Container::Set, ContainerKind::Set) => *self,
			(Container::Set, ContainerKind::Graph) => Container::GraphSet,
			(Container::Set, ContainerKind::Id) => Container::IdSet,
			(Container::Set, ContainerKind::Index) => Container::IndexSet,
			(Container::Set, ContainerKind::Language) => Container::LanguageSet,
			(Container::Set, ContainerKind::Type) => Container::SetType,
			(Container::Type, ContainerKind::Type) => *self,
			(Container::Type, ContainerKind::Set) => Container::SetType,
			(Container::GraphSet, ContainerKind::Graph) => *self,
			(Container::GraphSet, ContainerKind::Set) => *self,
			(Container::GraphSet, ContainerKind::Id) => Container::GraphIdSet,
			(Container::GraphSet, ContainerKind::Index) => Container::GraphIndexSet,
			(Container::GraphId, ContainerKind::Graph) => *self,
			(Container::GraphId, ContainerKind::Id) => *self,
			(Container::GraphId, ContainerKind::Set) => Container::GraphIdSet,
			(Container::GraphIndex, ContainerKind::Graph) => *self,
			(Container::GraphIndex, ContainerKind::Index) => *self,
			(Container::GraphIndex, ContainerKind::Set) => Container::GraphIndexSet,
			(Container::IdSet, ContainerKind::Id) => *self,
			(Container::IdSet, ContainerKind::Set) => *self,
			(Container::IdSet, ContainerKind::Graph) => Container::GraphIdSet,
			(Container::IndexSet, ContainerKind::Index) => *self,
			(Container::IndexSet, ContainerKind::Set) => *self,
			(Container::IndexSet, ContainerKind::Graph) => Container::GraphIndexSet,
			(Container::LanguageSet, ContainerKind::Language) => *self,
			(Container::LanguageSet, ContainerKind::Set) => *self,
			(Container::SetType, ContainerKind::Set) => *self,
			(Container::SetType, ContainerKind::Type) => *self,
			(Container::GraphIdSet, ContainerKind::Graph) => *self,
			(Container::GraphIdSet, ContainerKind::Id) => *self,
			(Container::GraphIdSet, ContainerKind::Set) => *self,
			(Container::GraphIndexSet, ContainerKind::Graph) => *self,
			(Container::GraphIndexSet, ContainerKind::Index) => *self,
			(Container::GraphIndexSet, ContainerKind::Set) => *self,
			_ => return None,
		};

		Some(new_container)
	}

	pub fn add(&mut self, c: ContainerKind) -> bool {
		match self.with(c) {
			Some(container) => {
				*self = container;
				true
			}
			None => false,
		}
	}
}

impl From<ContainerKind> for Container {
	fn from(c: ContainerKind) -> Self {
		match c {
			ContainerKind::Graph => Self::Graph,
			ContainerKind::Id => Self::Id,
			ContainerKind::Index => Self::Index,
			ContainerKind::Language => Self::Language,
			ContainerKind::List => Self::List,
			ContainerKind::Set => Self::Set,
			ContainerKind::Type => Self::Type,
		}
	}
}
