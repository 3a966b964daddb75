use std::fmt;

/// Stable error code.
///
/// Every fatal processing error maps to one of these identifiers, which test
/// suites assert on.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum ErrorCode {
	/// Two properties which expand to the same keyword have been detected.
	CollidingKeywords,

	/// Multiple conflicting indexes have been found for the same node.
	ConflictingIndexes,

	/// Maximum number of `@context` URLs exceeded.
	ContextOverflow,

	/// A cycle in IRI mappings has been detected.
	CyclicIriMapping,

	/// An IRI could be confused with a compact IRI.
	IriConfusedWithPrefix,

	/// The value of `@direction` is not `"ltr"`, `"rtl"`, or null.
	InvalidBaseDirection,

	/// An invalid base IRI has been detected.
	InvalidBaseIri,

	/// An `@container` entry has an invalid value.
	InvalidContainerMapping,

	/// An entry in a context is invalid due to processing mode
	/// incompatibility.
	InvalidContextEntry,

	/// An attempt was made to nullify a context containing protected term
	/// definitions.
	InvalidContextNullification,

	/// The value of the default language is not a string or null.
	InvalidDefaultLanguage,

	/// An `@id` entry was encountered whose value was not a string.
	InvalidIdValue,

	/// An invalid value for `@import` has been found.
	InvalidImportValue,

	/// An included block contains an invalid value.
	InvalidIncludedValue,

	/// An `@index` entry was encountered whose value was not a string.
	InvalidIndexValue,

	/// An invalid value for `@nest` has been found.
	InvalidNestValue,

	/// An invalid value for `@prefix` has been found.
	InvalidPrefixValue,

	/// An invalid value for `@propagate` has been found.
	InvalidPropagateValue,

	/// An invalid value for `@version` has been found.
	InvalidVersionValue,

	/// A local context contains a term that has an invalid or missing IRI
	/// mapping.
	InvalidIriMapping,

	/// An invalid keyword alias definition has been encountered.
	InvalidKeywordAlias,

	/// An `@language` entry in a term definition has an invalid value.
	InvalidLanguageMapping,

	/// A value in a language map is not valid.
	InvalidLanguageMapValue,

	/// A language-tagged string with an invalid language value was detected.
	InvalidLanguageTaggedString,

	/// A number, true, or false with an associated language tag was detected.
	InvalidLanguageTaggedValue,

	/// An invalid local context was detected.
	InvalidLocalContext,

	/// No valid context document has been found for a referenced remote
	/// context.
	InvalidRemoteContext,

	/// An invalid reverse property definition has been detected.
	InvalidReverseProperty,

	/// An invalid reverse property map has been detected.
	InvalidReversePropertyMap,

	/// An invalid value for a reverse property has been detected.
	InvalidReversePropertyValue,

	/// A scoped context is invalid.
	InvalidScopedContext,

	/// A set object or list object with disallowed entries has been detected.
	InvalidSetOrListObject,

	/// An invalid term definition has been detected.
	InvalidTermDefinition,

	/// An `@type` entry in a term definition has an invalid value.
	InvalidTypeMapping,

	/// An invalid value for an `@type` entry has been detected.
	InvalidTypeValue,

	/// A typed value with an invalid type was detected.
	InvalidTypedValue,

	/// A value object with disallowed entries has been detected.
	InvalidValueObject,

	/// An invalid value for the `@value` entry of a value object has been
	/// detected.
	InvalidValueObjectValue,

	/// An invalid vocabulary mapping has been detected.
	InvalidVocabMapping,

	/// A keyword redefinition has been detected.
	KeywordRedefinition,

	/// The document could not be loaded or parsed.
	LoadingDocumentFailed,

	/// A remote context could not be loaded or parsed.
	LoadingRemoteContextFailed,

	/// An attempt was made to change the processing mode which is
	/// incompatible with the current processing mode.
	ProcessingModeConflict,

	/// An attempt was made to redefine a protected term.
	ProtectedTermRedefinition,
}

impl ErrorCode {
	/// Stable string identifier of the error code.
	pub fn as_str(&self) -> &'static str {
		use ErrorCode::*;
		match self {
			CollidingKeywords => "colliding_keywords",
			ConflictingIndexes => "conflicting_indexes",
			ContextOverflow => "context_overflow",
			CyclicIriMapping => "cyclic_IRI_mapping",
			IriConfusedWithPrefix => "IRI_confused_with_prefix",
			InvalidBaseDirection => "invalid_base_direction",
			InvalidBaseIri => "invalid_base_IRI",
			InvalidContainerMapping => "invalid_container_mapping",
			InvalidContextEntry => "invalid_context_entry",
			InvalidContextNullification => "invalid_context_nullification",
			InvalidDefaultLanguage => "invalid_default_language",
			InvalidIdValue => "invalid_id_value",
			InvalidImportValue => "invalid_import_value",
			InvalidIncludedValue => "invalid_included_value",
			InvalidIndexValue => "invalid_index_value",
			InvalidNestValue => "invalid_nest_value",
			InvalidPrefixValue => "invalid_prefix_value",
			InvalidPropagateValue => "invalid_propagate_value",
			InvalidVersionValue => "invalid_version_value",
			InvalidIriMapping => "invalid_IRI_mapping",
			InvalidKeywordAlias => "invalid_keyword_alias",
			InvalidLanguageMapping => "invalid_language_mapping",
			InvalidLanguageMapValue => "invalid_language_map_value",
			InvalidLanguageTaggedString => "invalid_language_tagged_string",
			InvalidLanguageTaggedValue => "invalid_language_tagged_value",
			InvalidLocalContext => "invalid_local_context",
			InvalidRemoteContext => "invalid_remote_context",
			InvalidReverseProperty => "invalid_reverse_property",
			InvalidReversePropertyMap => "invalid_reverse_property_map",
			InvalidReversePropertyValue => "invalid_reverse_property_value",
			InvalidScopedContext => "invalid_scoped_context",
			InvalidSetOrListObject => "invalid_set_or_list_object",
			InvalidTermDefinition => "invalid_term_definition",
			InvalidTypeMapping => "invalid_type_mapping",
			InvalidTypeValue => "invalid_type_value",
			InvalidTypedValue => "invalid_typed_value",
			InvalidValueObject => "invalid_value_object",
			InvalidValueObjectValue => "invalid_value_object_value",
			InvalidVocabMapping => "invalid_vocab_mapping",
			KeywordRedefinition => "keyword_redefinition",
			LoadingDocumentFailed => "loading_document_failed",
			LoadingRemoteContextFailed => "loading_remote_context_failed",
			ProcessingModeConflict => "processing_mode_conflict",
			ProtectedTermRedefinition => "protected_term_redefinition",
		}
	}
}

impl fmt::Display for ErrorCode {
	#[inline(always)]
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.as_str().fmt(f)
	}
}
