//! Processor entry points.
//!
//! The [`JsonLdProcessor`] trait provides access to the JSON-LD
//! transformation algorithms (expansion, compaction and flattening) from a
//! [`RemoteDocument`] or a bare [`Value`].
use crate::compaction::{self, compact_iri};
use crate::loader::{LoadError, Loader, RemoteDocument};
use crate::syntax::{ErrorCode, Keyword, Object, Value};
use crate::warning;
use crate::{
	expansion, flattening, object, processing, Context, Environment, Options, Term,
};

/// Error that can be raised by the [`JsonLdProcessor::expand`] function.
#[derive(Debug, thiserror::Error)]
pub enum ExpandError {
	/// Document expansion failed.
	#[error("expansion failed: {0}")]
	Expansion(expansion::Error),

	/// Context processing failed.
	#[error("context processing failed: {0}")]
	ContextProcessing(processing::Error),

	/// Remote document loading failed.
	#[error("remote document loading failed: {0}")]
	Loading(LoadError),
}

impl ExpandError {
	/// Returns the code of this error.
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::Expansion(e) => e.code(),
			Self::ContextProcessing(e) => e.code(),
			Self::Loading(_) => ErrorCode::LoadingDocumentFailed,
		}
	}
}

/// Error that can be raised by the [`JsonLdProcessor::compact`] function.
#[derive(Debug, thiserror::Error)]
pub enum CompactError {
	/// Document expansion failed.
	#[error("expansion failed: {0}")]
	Expand(ExpandError),

	/// Context processing failed.
	#[error("context processing failed: {0}")]
	ContextProcessing(processing::Error),

	/// Document compaction failed.
	#[error("compaction failed: {0}")]
	Compaction(compaction::Error),
}

impl CompactError {
	/// Returns the code of this error.
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::Expand(e) => e.code(),
			Self::ContextProcessing(e) => e.code(),
			Self::Compaction(e) => e.code(),
		}
	}
}

/// Error that can be raised by the [`JsonLdProcessor::flatten`] function.
#[derive(Debug, thiserror::Error)]
pub enum FlattenError {
	#[error("expansion failed: {0}")]
	Expand(ExpandError),

	#[error("compaction failed: {0}")]
	Compact(CompactError),

	#[error(transparent)]
	ConflictingIndexes(flattening::ConflictingIndexes),
}

impl FlattenError {
	/// Returns the code of this error.
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::Expand(e) => e.code(),
			Self::Compact(e) => e.code(),
			Self::ConflictingIndexes(e) => e.code(),
		}
	}
}

/// JSON-LD processor.
///
/// Implemented by [`RemoteDocument`] and by bare [`Value`] documents (in
/// which case no document URL is known).
pub trait JsonLdProcessor {
	/// Expands the document with the given options and warning handler.
	#[allow(async_fn_in_trait)]
	async fn expand_full<L, W>(
		&self,
		loader: &L,
		options: Options,
		warnings: W,
	) -> Result<Value, ExpandError>
	where
		L: Loader,
		W: warning::Handler;

	/// Expands the document with the default options.
	#[allow(async_fn_in_trait)]
	async fn expand<L>(&self, loader: &L) -> Result<Value, ExpandError>
	where
		L: Loader,
	{
		self.expand_full(loader, Options::default(), ()).await
	}

	/// Compacts the document against the given context, with the given
	/// options and warning handler.
	#[allow(async_fn_in_trait)]
	async fn compact_full<L, W>(
		&self,
		context: &Value,
		loader: &L,
		options: Options,
		warnings: W,
	) -> Result<Value, CompactError>
	where
		L: Loader,
		W: warning::Handler;

	/// Compacts the document against the given context with the default
	/// options.
	#[allow(async_fn_in_trait)]
	async fn compact<L>(&self, context: &Value, loader: &L) -> Result<Value, CompactError>
	where
		L: Loader,
	{
		self.compact_full(context, loader, Options::default(), ())
			.await
	}

	/// Flattens the document, compacting the result against the given
	/// context if any.
	#[allow(async_fn_in_trait)]
	async fn flatten_full<L, W>(
		&self,
		context: Option<&Value>,
		loader: &L,
		options: Options,
		warnings: W,
	) -> Result<Value, FlattenError>
	where
		L: Loader,
		W: warning::Handler;

	/// Flattens the document with the default options.
	#[allow(async_fn_in_trait)]
	async fn flatten<L>(&self, loader: &L) -> Result<Value, FlattenError>
	where
		L: Loader,
	{
		self.flatten_full(None, loader, Options::default(), ()).await
	}

	/// Flattens the document and compacts the result against the given
	/// context.
	#[allow(async_fn_in_trait)]
	async fn flatten_with<L>(&self, context: &Value, loader: &L) -> Result<Value, FlattenError>
	where
		L: Loader,
	{
		self.flatten_full(Some(context), loader, Options::default(), ())
			.await
	}
}

impl JsonLdProcessor for RemoteDocument {
	async fn expand_full<L, W>(
		&self,
		loader: &L,
		options: Options,
		mut warnings: W,
	) -> Result<Value, ExpandError>
	where
		L: Loader,
		W: warning::Handler,
	{
		let base_url = options.base.clone().or_else(|| self.url.clone());
		let mut active_context = Context::new(base_url.clone());

		// The `expand_context` option initializes the active context. If it
		// is a map with an `@context` entry, the value of that entry is
		// used.
		if let Some(expand_context) = &options.expand_context {
			let local_context = expand_context
				.as_object()
				.and_then(|o| object::get(o, "@context"))
				.unwrap_or(expand_context);

			active_context = processing::process_context(
				Environment {
					loader,
					warnings: &mut warnings,
				},
				&active_context,
				local_context,
				processing::ProcessingStack::new(),
				base_url.as_deref(),
				options.context_processing_options(),
			)
			.await
			.map_err(ExpandError::ContextProcessing)?;
		}

		// A context URL found in the HTTP `Link` header of the document is
		// processed as a remote context.
		if let Some(context_url) = &self.context_url {
			active_context = processing::process_context(
				Environment {
					loader,
					warnings: &mut warnings,
				},
				&active_context,
				&Value::String(context_url.as_str().into()),
				processing::ProcessingStack::new(),
				base_url.as_deref(),
				options.context_processing_options(),
			)
			.await
			.map_err(ExpandError::ContextProcessing)?;
		}

		expansion::expand(
			Environment {
				loader,
				warnings: &mut warnings,
			},
			&self.document,
			active_context,
			base_url.as_deref(),
			options.expansion_options(),
		)
		.await
		.map_err(ExpandError::Expansion)
	}

	async fn compact_full<L, W>(
		&self,
		context: &Value,
		loader: &L,
		options: Options,
		mut warnings: W,
	) -> Result<Value, CompactError>
	where
		L: Loader,
		W: warning::Handler,
	{
		let expanded = self
			.expand_full(loader, options.clone().unordered(), &mut warnings)
			.await
			.map_err(CompactError::Expand)?;

		let base_url = options.base.clone().or_else(|| {
			if options.compact_to_relative {
				self.url.clone()
			} else {
				None
			}
		});

		// If the context value is a map with an `@context` entry, that
		// entry is used.
		let context_value = context
			.as_object()
			.and_then(|o| object::get(o, "@context"))
			.unwrap_or(context);

		let active_context = processing::process_context(
			Environment {
				loader,
				warnings: &mut warnings,
			},
			&Context::new(base_url.clone()),
			context_value,
			processing::ProcessingStack::new(),
			base_url.as_deref(),
			options.context_processing_options(),
		)
		.await
		.map_err(CompactError::ContextProcessing)?;

		let compacted = compaction::compact(
			Environment {
				loader,
				warnings: &mut warnings,
			},
			&expanded,
			&active_context,
			options.compaction_options(),
		)
		.await
		.map_err(CompactError::Compaction)?;

		finalize_compacted(compacted, context_value, &active_context, &options)
	}

	async fn flatten_full<L, W>(
		&self,
		context: Option<&Value>,
		loader: &L,
		options: Options,
		mut warnings: W,
	) -> Result<Value, FlattenError>
	where
		L: Loader,
		W: warning::Handler,
	{
		let expanded = self
			.expand_full(loader, options.clone().unordered(), &mut warnings)
			.await
			.map_err(FlattenError::Expand)?;

		let flattened = flattening::flatten(&expanded).map_err(FlattenError::ConflictingIndexes)?;

		match context {
			Some(context) => {
				let document = RemoteDocument::new(self.url.clone(), None, flattened);
				document
					.compact_full(context, loader, options, warnings)
					.await
					.map_err(FlattenError::Compact)
			}
			None => Ok(flattened),
		}
	}
}

impl JsonLdProcessor for Value {
	async fn expand_full<L, W>(
		&self,
		loader: &L,
		options: Options,
		warnings: W,
	) -> Result<Value, ExpandError>
	where
		L: Loader,
		W: warning::Handler,
	{
		RemoteDocument::new(None, None, self.clone())
			.expand_full(loader, options, warnings)
			.await
	}

	async fn compact_full<L, W>(
		&self,
		context: &Value,
		loader: &L,
		options: Options,
		warnings: W,
	) -> Result<Value, CompactError>
	where
		L: Loader,
		W: warning::Handler,
	{
		RemoteDocument::new(None, None, self.clone())
			.compact_full(context, loader, options, warnings)
			.await
	}

	async fn flatten_full<L, W>(
		&self,
		context: Option<&Value>,
		loader: &L,
		options: Options,
		warnings: W,
	) -> Result<Value, FlattenError>
	where
		L: Loader,
		W: warning::Handler,
	{
		RemoteDocument::new(None, None, self.clone())
			.flatten_full(context, loader, options, warnings)
			.await
	}
}

/// Wraps top-level arrays under an aliased `@graph` entry and embeds the
/// supplied context into the compacted output.
fn finalize_compacted(
	compacted: Value,
	context_value: &Value,
	active_context: &Context,
	options: &Options,
) -> Result<Value, CompactError> {
	let object = match compacted {
		Value::Null => Object::default(),
		Value::Object(object) => object,
		Value::Array(items) => {
			if items.is_empty() {
				Object::default()
			} else {
				// A top-level array compacts into an aliased `@graph`
				// wrapper.
				let alias = compact_iri(
					active_context,
					&Term::Keyword(Keyword::Graph),
					None,
					true,
					false,
					options.compaction_options(),
				)
				.map_err(|_| CompactError::Compaction(compaction::Error::IriConfusedWithPrefix))?
				.unwrap();

				let mut object = Object::default();
				object.insert(alias.as_str().into(), Value::Array(items));
				object
			}
		}
		other => return Ok(other),
	};

	// Embed the context, unless it is empty.
	let embed_context = match context_value {
		Value::Null => false,
		Value::Object(o) => !o.is_empty(),
		Value::Array(a) => !a.is_empty(),
		_ => true,
	};

	if embed_context {
		let mut result = Object::default();
		result.insert("@context".into(), context_value.clone());
		for entry in object {
			result.insert(entry.key, entry.value);
		}

		return Ok(Value::Object(result));
	}

	Ok(Value::Object(object))
}
