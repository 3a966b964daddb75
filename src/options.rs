use crate::syntax::Value;
use crate::{compaction, expansion, processing};
use iref::IriBuf;
use std::fmt;
use std::str::FromStr;

/// Processing mode.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum ProcessingMode {
	/// JSON-LD 1.0.
	JsonLd1_0,

	/// JSON-LD 1.1.
	#[default]
	JsonLd1_1,
}

impl ProcessingMode {
	pub fn as_str(&self) -> &'static str {
		match self {
			ProcessingMode::JsonLd1_0 => "json-ld-1.0",
			ProcessingMode::JsonLd1_1 => "json-ld-1.1",
		}
	}
}

#[derive(Debug, thiserror::Error)]
#[error("unknown processing mode `{0}`")]
pub struct UnknownProcessingMode(pub String);

impl FromStr for ProcessingMode {
	type Err = UnknownProcessingMode;

	fn from_str(name: &str) -> Result<ProcessingMode, UnknownProcessingMode> {
		match name {
			"json-ld-1.0" => Ok(ProcessingMode::JsonLd1_0),
			"json-ld-1.1" => Ok(ProcessingMode::JsonLd1_1),
			_ => Err(UnknownProcessingMode(name.to_string())),
		}
	}
}

impl fmt::Display for ProcessingMode {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}

/// Determines how value objects containing a base direction are transformed
/// to and from RDF.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RdfDirection {
	/// An RDF literal is generated using a datatype IRI based on
	/// `https://www.w3.org/ns/i18n#` with both the language tag (if present)
	/// and base direction encoded.
	I18nDatatype,

	/// A blank node is emitted instead of a literal, where the blank node is
	/// the subject of `rdf:value`, `rdf:direction`, and `rdf:language` (if
	/// present) properties.
	CompoundLiteral,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown RDF direction mode `{0}`")]
pub struct UnknownRdfDirection(pub String);

impl FromStr for RdfDirection {
	type Err = UnknownRdfDirection;

	fn from_str(name: &str) -> Result<RdfDirection, UnknownRdfDirection> {
		match name {
			"i18n-datatype" => Ok(RdfDirection::I18nDatatype),
			"compound-literal" => Ok(RdfDirection::CompoundLiteral),
			_ => Err(UnknownRdfDirection(name.to_string())),
		}
	}
}

/// JSON-LD processor options.
#[derive(Clone)]
pub struct Options {
	/// The base IRI to use when expanding or compacting the document.
	///
	/// If set, this overrides the input document's IRI.
	pub base: Option<IriBuf>,

	/// If set to true, the processor replaces arrays with just one element
	/// with that element during compaction.
	///
	/// If set to false, all arrays will remain arrays even if they have just
	/// one element.
	///
	/// Defaults to `true`.
	pub compact_arrays: bool,

	/// Determines if IRIs are compacted relative to the base option or
	/// document location when compacting.
	///
	/// Defaults to `true`.
	pub compact_to_relative: bool,

	/// A context that is used to initialize the active context when
	/// expanding a document.
	pub expand_context: Option<Value>,

	/// If set to true, free-floating nodes are kept during expansion, as
	/// required when expanding frames.
	///
	/// Defaults to `false`.
	pub frame_expansion: bool,

	/// If set to true, certain algorithm processing steps where indicated
	/// are ordered lexicographically.
	///
	/// If false, order is not considered in processing.
	///
	/// Defaults to `false`.
	pub ordered: bool,

	/// Sets the processing mode.
	///
	/// Defaults to [`ProcessingMode::JsonLd1_1`].
	pub processing_mode: ProcessingMode,

	/// If set to true, RDF serializers built on top of this crate may emit
	/// blank nodes for triple predicates.
	///
	/// The core algorithms do not consume this option.
	pub produce_generalized_rdf: bool,

	/// Determines how value objects containing a base direction are
	/// transformed to and from RDF.
	///
	/// The core algorithms do not consume this option.
	pub rdf_direction: Option<RdfDirection>,

	/// If set to true, RDF deserializers built on top of this crate convert
	/// XSD literals to native JSON values.
	///
	/// The core algorithms do not consume this option.
	pub use_native_types: bool,

	/// If set to true, RDF deserializers built on top of this crate use the
	/// expanded `rdf:type` IRI instead of `@type`.
	///
	/// The core algorithms do not consume this option.
	pub use_rdf_type: bool,
}

impl Options {
	/// Returns these options with the `ordered` flag set to `false`.
	pub fn unordered(self) -> Self {
		Self {
			ordered: false,
			..self
		}
	}

	/// Returns these options with `expand_context` set to the given context.
	pub fn with_expand_context(self, context: Value) -> Self {
		Self {
			expand_context: Some(context),
			..self
		}
	}

	/// Builds options for the Context Processing algorithm from these
	/// options.
	pub fn context_processing_options(&self) -> processing::Options {
		processing::Options {
			processing_mode: self.processing_mode,
			..Default::default()
		}
	}

	/// Builds options for the expansion algorithm from these options.
	pub fn expansion_options(&self) -> expansion::Options {
		expansion::Options {
			processing_mode: self.processing_mode,
			ordered: self.ordered,
			frame_expansion: self.frame_expansion,
		}
	}

	/// Builds options for the compaction algorithm from these options.
	pub fn compaction_options(&self) -> compaction::Options {
		compaction::Options {
			processing_mode: self.processing_mode,
			compact_to_relative: self.compact_to_relative,
			compact_arrays: self.compact_arrays,
			ordered: self.ordered,
		}
	}
}

impl Default for Options {
	fn default() -> Self {
		Self {
			base: None,
			compact_arrays: true,
			compact_to_relative: true,
			expand_context: None,
			frame_expansion: false,
			ordered: false,
			processing_mode: ProcessingMode::JsonLd1_1,
			produce_generalized_rdf: false,
			rdf_direction: None,
			use_native_types: false,
			use_rdf_type: false,
		}
	}
}
