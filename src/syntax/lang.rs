use langtag::{InvalidLangTag, LangTag};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Language tag that may not be well-formed.
///
/// JSON-LD requires processors to accept ill-formed BCP-47 language tags,
/// issuing a warning instead of failing. This type stores the tag as given;
/// equality, ordering and hashing are case-insensitive, as mandated for
/// language tags.
#[derive(Clone, Debug)]
pub struct LenientLangTagBuf(String);

impl LenientLangTagBuf {
	/// Creates a new lenient tag from the given string.
	///
	/// Returns the tag together with the well-formedness error, if any.
	pub fn new(s: String) -> (Self, Option<InvalidLangTag<String>>) {
		let err = LangTag::new(s.as_str())
			.err()
			.map(|InvalidLangTag(s)| InvalidLangTag(s.to_owned()));
		(Self(s), err)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_well_formed(&self) -> bool {
		LangTag::new(self.0.as_str()).is_ok()
	}

	pub fn into_string(self) -> String {
		self.0
	}

	/// Lower-cased form, used as normalized key material.
	pub fn to_lowercase(&self) -> String {
		self.0.to_lowercase()
	}
}

impl PartialEq for LenientLangTagBuf {
	fn eq(&self, other: &Self) -> bool {
		self.0.eq_ignore_ascii_case(&other.0)
	}
}

impl Eq for LenientLangTagBuf {}

impl PartialEq<str> for LenientLangTagBuf {
	fn eq(&self, other: &str) -> bool {
		self.0.eq_ignore_ascii_case(other)
	}
}

impl Hash for LenientLangTagBuf {
	fn hash<H: Hasher>(&self, state: &mut H) {
		for b in self.0.as_bytes() {
			b.to_ascii_lowercase().hash(state)
		}
	}
}

impl From<&str> for LenientLangTagBuf {
	fn from(s: &str) -> Self {
		Self(s.to_owned())
	}
}

impl fmt::Display for LenientLangTagBuf {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.0.fmt(f)
	}
}
