use super::{LoadError, Loader, LoadingResult, RemoteDocument};
use iref::{Iri, IriBuf};
use json_syntax::Parse;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// File-system loading error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// No mount point found for the given IRI.
	#[error("no mount point")]
	NoMountPoint,

	/// IO error.
	#[error(transparent)]
	IO(std::io::Error),

	/// Parse error.
	#[error("parse error: {0}")]
	Parse(json_syntax::parse::Error),
}

/// File-system loader.
///
/// A loader that dereferences URLs from the file system by attaching a
/// directory to specific URL prefixes.
///
/// Loaded documents are not cached: a new file system read is made each time
/// a URL is loaded even if it has already been queried before.
#[derive(Default)]
pub struct FsLoader {
	mount_points: Vec<(IriBuf, PathBuf)>,
}

impl FsLoader {
	pub fn new() -> Self {
		Self::default()
	}

	/// Binds the given URL prefix to the given path.
	///
	/// Any document with a URL matching the given prefix will be loaded from
	/// the referenced local directory.
	#[inline(always)]
	pub fn mount<P: AsRef<Path>>(&mut self, url: IriBuf, path: P) {
		self.mount_points.push((url, path.as_ref().to_path_buf()));
	}

	/// Returns the local file path associated to the given `url`, if any.
	pub fn filepath(&self, url: &Iri) -> Option<PathBuf> {
		for (prefix, path) in &self.mount_points {
			if let Some(suffix) = url.as_str().strip_prefix(prefix.as_str()) {
				let mut filepath = path.clone();
				for seg in suffix.split('/').filter(|s| !s.is_empty()) {
					filepath.push(seg)
				}

				return Some(filepath);
			}
		}

		None
	}
}

impl Loader for FsLoader {
	async fn load(&self, url: &Iri) -> LoadingResult {
		match self.filepath(url) {
			Some(filepath) => {
				let file = File::open(filepath)
					.map_err(|e| LoadError::new(url.to_owned(), Error::IO(e)))?;
				let mut buf_reader = BufReader::new(file);
				let mut contents = String::new();
				buf_reader
					.read_to_string(&mut contents)
					.map_err(|e| LoadError::new(url.to_owned(), Error::IO(e)))?;
				let (document, _) = json_syntax::Value::parse_str(&contents)
					.map_err(|e| LoadError::new(url.to_owned(), Error::Parse(e)))?;
				Ok(RemoteDocument::new(
					Some(url.to_owned()),
					Some("application/ld+json".parse().unwrap()),
					document,
				))
			}
			None => Err(LoadError::new(url.to_owned(), Error::NoMountPoint)),
		}
	}
}
