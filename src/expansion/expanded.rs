use crate::object::is_list_object;
use crate::syntax::Value;

/// Result of the expansion of a single element in a JSON-LD document.
pub(crate) enum Expanded {
	Null,
	Object(Value),
	Array(Vec<Value>),
}

impl Expanded {
	pub fn len(&self) -> usize {
		match self {
			Expanded::Null => 0,
			Expanded::Object(_) => 1,
			Expanded::Array(ary) => ary.len(),
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Expanded::Null)
	}

	pub fn is_list(&self) -> bool {
		match self {
			Expanded::Object(o) => is_list_object(o),
			_ => false,
		}
	}
}

impl IntoIterator for Expanded {
	type Item = Value;
	type IntoIter = IntoIter;

	fn into_iter(self) -> IntoIter {
		match self {
			Expanded::Null => IntoIter::Null,
			Expanded::Object(o) => IntoIter::Object(Some(o)),
			Expanded::Array(ary) => IntoIter::Array(ary.into_iter()),
		}
	}
}

pub(crate) enum IntoIter {
	Null,
	Object(Option<Value>),
	Array(std::vec::IntoIter<Value>),
}

impl Iterator for IntoIter {
	type Item = Value;

	fn next(&mut self) -> Option<Value> {
		match self {
			IntoIter::Null => None,
			IntoIter::Object(o) => o.take(),
			IntoIter::Array(it) => it.next(),
		}
	}
}

impl From<Value> for Expanded {
	fn from(object: Value) -> Expanded {
		Expanded::Object(object)
	}
}

impl From<Vec<Value>> for Expanded {
	fn from(list: Vec<Value>) -> Expanded {
		Expanded::Array(list)
	}
}
