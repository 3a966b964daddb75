//! Simple HTTP document loader based on
//! [`reqwest`](https://crates.io/crates/reqwest).
use super::{LoadError, Loader, LoadingResult, Profile, RemoteDocument};
use hashbrown::HashSet;
use iref::{Iri, IriBuf};
use json_syntax::Parse;
use mime::Mime;
use reqwest::{
	header::{ACCEPT, CONTENT_TYPE},
	StatusCode,
};

/// HTTP loading error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("internal error: {0}")]
	Reqwest(reqwest::Error),

	#[error("query failed: status code {0}")]
	QueryFailed(StatusCode),

	#[error("invalid content type")]
	InvalidContentType,

	#[error("invalid redirection URL")]
	InvalidRedirectionUrl,

	#[error("JSON parse error: {0}")]
	Parse(json_syntax::parse::Error),
}

/// `reqwest`-based loader.
///
/// The loader follows HTTP redirections; the `url` of the returned
/// [`RemoteDocument`] is the final URL after redirection.
///
/// Loaded documents are not cached: a new network query is made each time a
/// URL is loaded even if it has already been queried before.
pub struct ReqwestLoader {
	client: reqwest::Client,
	request_profile: Vec<Profile>,
}

impl Default for ReqwestLoader {
	fn default() -> Self {
		Self {
			client: reqwest::Client::new(),
			request_profile: vec![Profile::Context],
		}
	}
}

impl ReqwestLoader {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a new loader using the given HTTP client and request
	/// profiles.
	pub fn new_using(client: reqwest::Client, request_profile: Vec<Profile>) -> Self {
		Self {
			client,
			request_profile,
		}
	}

	fn accept_header(&self) -> String {
		let mut header = "application/ld+json".to_string();

		if !self.request_profile.is_empty() {
			header.push_str("; profile=\"");
			for (i, profile) in self.request_profile.iter().enumerate() {
				if i > 0 {
					header.push(' ')
				}
				header.push_str(profile.iri().as_str())
			}
			header.push('"');
		}

		header.push_str(", application/json");
		header
	}
}

fn parse_content_type(value: &str) -> Option<(Mime, HashSet<Profile>)> {
	let mime: Mime = value.parse().ok()?;

	let mut profile = HashSet::new();
	if let Some(p) = mime.get_param("profile") {
		for iri in p.as_str().split(' ') {
			if let Ok(iri) = Iri::new(iri) {
				profile.insert(Profile::from_iri(iri));
			}
		}
	}

	Some((mime.essence_str().parse().ok()?, profile))
}

impl Loader for ReqwestLoader {
	async fn load(&self, url: &Iri) -> LoadingResult {
		let response = self
			.client
			.get(url.as_str())
			.header(ACCEPT, self.accept_header())
			.send()
			.await
			.map_err(|e| LoadError::new(url.to_owned(), Error::Reqwest(e)))?;

		if !response.status().is_success() {
			return Err(LoadError::new(
				url.to_owned(),
				Error::QueryFailed(response.status()),
			));
		}

		// The final URL, after eventual redirection.
		let document_url = IriBuf::new(response.url().as_str().to_string())
			.map_err(|_| LoadError::new(url.to_owned(), Error::InvalidRedirectionUrl))?;

		let (content_type, profile) = match response
			.headers()
			.get(CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
		{
			Some(value) => {
				let (mime, profile) = parse_content_type(value)
					.ok_or_else(|| LoadError::new(url.to_owned(), Error::InvalidContentType))?;
				(Some(mime), profile)
			}
			None => (None, HashSet::new()),
		};

		let bytes = response
			.text()
			.await
			.map_err(|e| LoadError::new(url.to_owned(), Error::Reqwest(e)))?;

		let (document, _) = json_syntax::Value::parse_str(&bytes)
			.map_err(|e| LoadError::new(url.to_owned(), Error::Parse(e)))?;

		Ok(RemoteDocument::new_full(
			Some(document_url),
			content_type,
			None,
			profile,
			document,
		))
	}
}
