//! Syntactic building blocks of the JSON-LD grammar: keywords, container
//! mappings, text directions, language tags and error codes.
mod container;
mod direction;
mod error;
mod keyword;
mod lang;
mod nullable;

pub use container::{Container, ContainerKind, InvalidContainer};
pub use direction::{Direction, InvalidDirection};
pub use error::ErrorCode;
pub use keyword::{is_keyword, is_keyword_like, Keyword, NotAKeyword};
pub use lang::LenientLangTagBuf;
pub use nullable::Nullable;

pub use json_syntax::{
	object, parse, BorrowUnordered, Kind, Number, NumberBuf, Object, Parse, Print, Unordered,
	UnorderedEq, UnorderedHash, UnorderedPartialEq, Value,
};
