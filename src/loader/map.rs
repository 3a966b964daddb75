use super::{LoadError, Loader, LoadingResult, RemoteDocument};
use iref::{Iri, IriBuf};
use std::collections::{BTreeMap, HashMap};

/// Error returned when using a [`HashMap`] or [`BTreeMap`] as a [`Loader`]
/// and the requested document is not found.
#[derive(Debug, thiserror::Error)]
#[error("document not found")]
pub struct EntryNotFound;

impl Loader for HashMap<IriBuf, RemoteDocument> {
	async fn load(&self, url: &Iri) -> LoadingResult {
		match self.get(url) {
			Some(document) => Ok(document.clone()),
			None => Err(LoadError::new(url.to_owned(), EntryNotFound)),
		}
	}
}

impl Loader for BTreeMap<IriBuf, RemoteDocument> {
	async fn load(&self, url: &Iri) -> LoadingResult {
		match self.get(url) {
			Some(document) => Ok(document.clone()),
			None => Err(LoadError::new(url.to_owned(), EntryNotFound)),
		}
	}
}
