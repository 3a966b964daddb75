use std::{fmt, str::FromStr};

#[derive(Debug, thiserror::Error)]
#[error("invalid JSON-LD text direction `{0}`")]
pub struct InvalidDirection<T>(pub T);

impl<'a, T: ?Sized + ToOwned> InvalidDirection<&'a T> {
	pub fn into_owned(self) -> InvalidDirection<T::Owned> {
		InvalidDirection(self.0.to_owned())
	}
}

/// Internationalized string direction.
///
/// Specifies the direction used to read a string.
/// This can be either left-to-right (`"ltr"`) or right-to-left (`"rtl"`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Direction {
	/// Left-to-right direction.
	Ltr,

	/// Right-to-left direction.
	Rtl,
}

impl Direction {
	pub fn as_str(&self) -> &'static str {
		match self {
			Direction::Ltr => "ltr",
			Direction::Rtl => "rtl",
		}
	}
}

impl FromStr for Direction {
	type Err = InvalidDirection<String>;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::try_from(s).map_err(InvalidDirection::into_owned)
	}
}

impl<'a> TryFrom<&'a str> for Direction {
	type Error = InvalidDirection<&'a str>;

	#[inline(always)]
	fn try_from(name: &'a str) -> Result<Direction, InvalidDirection<&'a str>> {
		match name {
			"ltr" => Ok(Direction::Ltr),
			"rtl" => Ok(Direction::Rtl),
			_ => Err(InvalidDirection(name)),
		}
	}
}

impl fmt::Display for Direction {
	#[inline(always)]
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}
