//! Document loaders.
//!
//! Remote document retrieval is an injected capability: every algorithm that
//! may need to dereference a context URL takes a [`Loader`]. The crate ships
//! a dummy loader, map-based loaders, a file-system loader and (behind the
//! `reqwest` feature) an HTTP loader.
use hashbrown::HashSet;
use iref::{Iri, IriBuf};
use json_syntax::Value;
use mime::Mime;
use static_iref::iri;
use std::fmt;

pub mod fs;
mod map;
pub mod none;

#[cfg(feature = "reqwest")]
pub mod reqwest;

pub use fs::FsLoader;
pub use map::EntryNotFound;
pub use none::NoLoader;

#[cfg(feature = "reqwest")]
pub use self::reqwest::ReqwestLoader;

/// Result of a document load.
pub type LoadingResult = Result<RemoteDocument, LoadError>;

/// Document loading error.
///
/// Wraps the URL that failed to load together with the loader-specific
/// cause.
#[derive(Debug, thiserror::Error)]
#[error("unable to load `{url}`: {cause}")]
pub struct LoadError {
	pub url: IriBuf,
	cause: Box<dyn std::error::Error + Send + Sync>,
}

impl LoadError {
	pub fn new(url: IriBuf, cause: impl 'static + std::error::Error + Send + Sync) -> Self {
		Self {
			url,
			cause: Box::new(cause),
		}
	}

	pub fn cause(&self) -> &(dyn std::error::Error + Send + Sync) {
		&*self.cause
	}
}

/// JSON-LD document profile.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Profile {
	/// `http://www.w3.org/ns/json-ld#expanded`.
	Expanded,

	/// `http://www.w3.org/ns/json-ld#compacted`.
	Compacted,

	/// `http://www.w3.org/ns/json-ld#context`.
	Context,

	/// `http://www.w3.org/ns/json-ld#flattened`.
	Flattened,

	/// `http://www.w3.org/ns/json-ld#frame`.
	Frame,

	/// Any other profile IRI.
	Custom(IriBuf),
}

impl Profile {
	pub fn from_iri(iri: &Iri) -> Self {
		match iri.as_str() {
			"http://www.w3.org/ns/json-ld#expanded" => Self::Expanded,
			"http://www.w3.org/ns/json-ld#compacted" => Self::Compacted,
			"http://www.w3.org/ns/json-ld#context" => Self::Context,
			"http://www.w3.org/ns/json-ld#flattened" => Self::Flattened,
			"http://www.w3.org/ns/json-ld#frame" => Self::Frame,
			_ => Self::Custom(iri.to_owned()),
		}
	}

	pub fn iri(&self) -> &Iri {
		match self {
			Self::Expanded => iri!("http://www.w3.org/ns/json-ld#expanded"),
			Self::Compacted => iri!("http://www.w3.org/ns/json-ld#compacted"),
			Self::Context => iri!("http://www.w3.org/ns/json-ld#context"),
			Self::Flattened => iri!("http://www.w3.org/ns/json-ld#flattened"),
			Self::Frame => iri!("http://www.w3.org/ns/json-ld#frame"),
			Self::Custom(iri) => iri,
		}
	}
}

impl fmt::Display for Profile {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.iri().fmt(f)
	}
}

/// Remote document.
///
/// Stores the content of a loaded remote document along with its final URL.
#[derive(Debug, Clone)]
pub struct RemoteDocument {
	/// The final URL of the loaded document, after eventual redirection.
	pub url: Option<IriBuf>,

	/// The HTTP `Content-Type` header value of the loaded document,
	/// exclusive of any optional parameters.
	pub content_type: Option<Mime>,

	/// If available, the value of the HTTP `Link` header using the
	/// `http://www.w3.org/ns/json-ld#context` link relation in the response.
	pub context_url: Option<IriBuf>,

	/// The value of any profile parameter retrieved as part of the original
	/// content type.
	pub profile: HashSet<Profile>,

	/// The retrieved document.
	pub document: Value,
}

impl RemoteDocument {
	/// Creates a new remote document.
	///
	/// `url` is the final URL of the loaded document, after eventual
	/// redirection.
	pub fn new(url: Option<IriBuf>, content_type: Option<Mime>, document: Value) -> Self {
		Self::new_full(url, content_type, None, HashSet::new(), document)
	}

	pub fn new_full(
		url: Option<IriBuf>,
		content_type: Option<Mime>,
		context_url: Option<IriBuf>,
		profile: HashSet<Profile>,
		document: Value,
	) -> Self {
		Self {
			url,
			content_type,
			context_url,
			profile,
			document,
		}
	}

	pub fn url(&self) -> Option<&Iri> {
		self.url.as_deref()
	}

	pub fn document(&self) -> &Value {
		&self.document
	}

	pub fn into_document(self) -> Value {
		self.document
	}
}

/// Document loader.
///
/// Given an absolute URL, returns the corresponding remote document.
/// Dereferencing is the only suspension point of the processor; everything
/// else is synchronous.
pub trait Loader {
	/// Loads the document behind the given URL.
	#[allow(async_fn_in_trait)]
	async fn load(&self, url: &Iri) -> LoadingResult;
}

impl<L: Loader> Loader for &L {
	async fn load(&self, url: &Iri) -> LoadingResult {
		L::load(*self, url).await
	}
}
