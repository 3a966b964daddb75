//! This crate is a Rust implementation of the core algorithms of the
//! [JSON-LD](https://www.w3.org/TR/json-ld/) data interchange format:
//! context processing, expansion, compaction and flattening, operating
//! directly on the JSON-LD internal representation
//! ([`json_syntax::Value`]).
//!
//! [Linked Data (LD)](https://www.w3.org/standards/semanticweb/data)
//! is a [World Wide Web Consortium (W3C)](https://www.w3.org/) initiative
//! built upon standard Web technologies to create an interrelated network
//! of datasets across the Web. JSON-LD brings JSON and Linked Data
//! together, adding semantics to JSON to create a lightweight data
//! serialization format that can organize data and help Web applications to
//! inter-operate at a large scale.
//!
//! # Usage
//!
//! The entry point for this library is the [`JsonLdProcessor`] trait,
//! implemented by [`RemoteDocument`] and by bare [`syntax::Value`]
//! documents. It provides access to all the JSON-LD transformation
//! algorithms.
//!
//! ```
//! use loam::{syntax::{Parse, Value}, JsonLdProcessor, NoLoader};
//!
//! # #[async_std::main]
//! # async fn main() {
//! let (document, _) = Value::parse_str(
//!   r#"{
//!     "@context": {"name": "http://xmlns.com/foaf/0.1/name"},
//!     "@id": "https://www.rust-lang.org",
//!     "name": "Rust Programming Language"
//!   }"#,
//! )
//! .unwrap();
//!
//! // Use `NoLoader` as we won't need to load any remote document.
//! let expanded = document.expand(&NoLoader).await.expect("expansion failed");
//!
//! for object in expanded.as_array().unwrap() {
//!   println!("{}", loam::object::node_id(object).unwrap());
//! }
//! # }
//! ```
#![allow(clippy::result_large_err)]

pub mod compaction;
pub mod context;
pub mod expansion;
pub mod flattening;
pub mod loader;
pub mod object;
mod options;
pub mod processing;
mod processor;
pub mod syntax;
mod term;
pub mod warning;

pub use context::Context;
pub use loader::{
	FsLoader, LoadError, Loader, LoadingResult, NoLoader, Profile, RemoteDocument,
};
pub use options::{Options, ProcessingMode, RdfDirection};
pub use processing::{expand_iri, process_context, ProcessingStack, REMOTE_CONTEXT_LIMIT};
pub use processor::{CompactError, ExpandError, FlattenError, JsonLdProcessor};
pub use syntax::{
	Container, ContainerKind, Direction, ErrorCode, Keyword, LenientLangTagBuf, Nullable,
};
pub use term::{Id, Term};

#[cfg(feature = "reqwest")]
pub use loader::ReqwestLoader;

/// Processing environment.
///
/// Bundles the injected capabilities carried through the recursive
/// algorithms: the document loader and the warning handler.
pub struct Environment<'a, L, W> {
	pub loader: &'a L,
	pub warnings: &'a mut W,
}
