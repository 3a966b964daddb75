use super::{Error, ExpandedEntry, Options};
use crate::context::Type;
use crate::processing::expand_iri;
use crate::syntax::{Direction, Keyword, LenientLangTagBuf, Nullable, Object, Value};
use crate::warning::{self, Warning};
use crate::{Context, Environment, Id, ProcessingMode, Term};

/// Scalar value undergoing value expansion.
pub(crate) enum LiteralValue<'a> {
	/// A value found in the document.
	Given(&'a Value),

	/// A map key re-expanded as a value.
	Inferred(&'a str),
}

impl<'a> LiteralValue<'a> {
	fn is_string(&self) -> bool {
		match self {
			Self::Given(value) => matches!(value, Value::String(_)),
			Self::Inferred(_) => true,
		}
	}

	fn as_str(&self) -> Option<&'a str> {
		match self {
			Self::Given(value) => value.as_str(),
			Self::Inferred(s) => Some(s),
		}
	}

	fn into_json(self) -> Value {
		match self {
			Self::Given(value) => value.clone(),
			Self::Inferred(s) => Value::String(s.into()),
		}
	}
}

/// Value Expansion algorithm.
///
/// Expands a scalar value against the active property's type, language and
/// direction mappings.
pub(crate) fn expand_literal<L, W>(
	env: &mut Environment<'_, L, W>,
	active_context: &Context,
	active_property: Option<&str>,
	value: LiteralValue,
) -> Result<Value, Error>
where
	W: warning::Handler,
{
	let active_property_definition =
		active_property.and_then(|property| active_context.get(property));

	let active_property_type =
		active_property_definition.and_then(|definition| definition.typ.clone());

	match active_property_type {
		// If the active property has a type mapping of `@id`, and the value
		// is a string, return a new map containing a single `@id` entry set
		// to the result of IRI expanding the value using true for document
		// relative and false for vocab.
		Some(Type::Id) if value.is_string() => {
			let mut node = Object::default();

			let id = expand_iri(
				env.warnings,
				active_context,
				Nullable::Some(value.as_str().unwrap()),
				true,
				false,
			);

			if let Some(id) = id_into_string(id) {
				node.insert("@id".into(), Value::String(id.as_str().into()));
			}

			Ok(Value::Object(node))
		}

		// If the active property has a type mapping of `@vocab`, and the
		// value is a string, the `@id` entry is the result of IRI expanding
		// the value using true for document relative.
		Some(Type::Vocab) if value.is_string() => {
			let mut node = Object::default();

			let id = expand_iri(
				env.warnings,
				active_context,
				Nullable::Some(value.as_str().unwrap()),
				true,
				true,
			);

			if let Some(id) = id_into_string(id) {
				node.insert("@id".into(), Value::String(id.as_str().into()));
			}

			Ok(Value::Object(node))
		}

		active_property_type => {
			// Otherwise, initialize `result` to a map with an `@value` entry
			// whose value is set to `value`.
			let mut result = Object::default();

			match active_property_type {
				None | Some(Type::Id) | Some(Type::Vocab) | Some(Type::None) => {
					// If the value is a string, attach the language and
					// direction mappings of the active property, defaulting
					// to those of the active context.
					if value.is_string() {
						let language = match active_property_definition
							.and_then(|definition| definition.language.clone())
						{
							Some(Nullable::Some(language)) => Some(language),
							Some(Nullable::Null) => None,
							None => active_context.default_language().cloned(),
						};

						let direction = match active_property_definition
							.and_then(|definition| definition.direction)
						{
							Some(Nullable::Some(direction)) => Some(direction),
							Some(Nullable::Null) => None,
							None => active_context.default_base_direction(),
						};

						result.insert("@value".into(), value.into_json());

						if let Some(language) = language {
							result.insert(
								"@language".into(),
								Value::String(language.as_str().into()),
							);
						}

						if let Some(direction) = direction {
							result.insert(
								"@direction".into(),
								Value::String(direction.as_str().into()),
							);
						}

						return Ok(Value::Object(result));
					}

					result.insert("@value".into(), value.into_json());
				}
				Some(Type::Json) => {
					result.insert("@value".into(), value.into_json());
					result.insert("@type".into(), Value::String("@json".into()));
				}
				Some(Type::Iri(ty)) => {
					// If the active property has any other type mapping, add
					// it as the `@type` of the result.
					result.insert("@value".into(), value.into_json());
					result.insert("@type".into(), Value::String(ty.as_str().into()));
				}
			}

			Ok(Value::Object(result))
		}
	}
}

fn id_into_string(term: Term) -> Option<String> {
	match term {
		Term::Null => None,
		Term::Keyword(k) => Some(k.into_str().to_string()),
		Term::Id(id) => Some(id.into_string()),
	}
}

/// Value object expansion.
///
/// Expands a map containing an entry expanding to `@value`, validating its
/// key set.
pub(crate) fn expand_value<L, W>(
	env: &mut Environment<'_, L, W>,
	options: Options,
	input_type: Option<Term>,
	type_scoped_context: &Context,
	expanded_entries: Vec<ExpandedEntry>,
	value_entry: &Value,
) -> Result<Option<Value>, Error>
where
	W: warning::Handler,
{
	let mut is_json = input_type
		.as_ref()
		.map(|t| *t == Term::Keyword(Keyword::Json))
		.unwrap_or(false);
	let mut ty: Option<String> = None;
	let mut index = None;
	let mut language = None;
	let mut direction = None;

	for ExpandedEntry(_, expanded_key, value) in expanded_entries {
		match expanded_key {
			// If `expanded_property` is `@language`:
			Term::Keyword(Keyword::Language) => {
				// The value must be a string.
				let value = value.as_str().ok_or(Error::InvalidLanguageTaggedString)?;

				if value != "@none" {
					language = Some(value.to_owned());
				}
			}
			// If `expanded_property` is `@direction`:
			Term::Keyword(Keyword::Direction) => {
				// In json-ld-1.0 the entry is ignored.
				if options.processing_mode == ProcessingMode::JsonLd1_0 {
					continue;
				}

				// The value must be "ltr" or "rtl".
				let value = value
					.as_str()
					.and_then(|v| Direction::try_from(v).ok())
					.ok_or(Error::InvalidBaseDirection)?;

				direction = Some(value);
			}
			// If `expanded_property` is `@index`:
			Term::Keyword(Keyword::Index) => {
				// The value must be a string.
				let value = value.as_str().ok_or(Error::InvalidIndexValue)?;
				index = Some(value.to_owned());
			}
			// If `expanded_property` is `@type`:
			Term::Keyword(Keyword::Type) => {
				let ty_value = value.as_str().ok_or(Error::InvalidTypedValue)?;

				let expanded_ty = expand_iri(
					env.warnings,
					type_scoped_context,
					Nullable::Some(ty_value),
					true,
					true,
				);

				match expanded_ty {
					Term::Keyword(Keyword::Json) => {
						is_json = true;
					}
					Term::Id(Id::Iri(expanded_ty)) => {
						is_json = false;
						ty = Some(expanded_ty.into_string())
					}
					_ => return Err(Error::InvalidTypedValue),
				}
			}
			Term::Keyword(Keyword::Value) => (),
			// The value object must not contain any other entries.
			_ => {
				return Err(Error::InvalidValueObject);
			}
		}
	}

	// If the input type is `@json`, the `@value` entry may contain any value
	// and is treated as a JSON literal.
	if is_json {
		if language.is_some() || direction.is_some() {
			return Err(Error::InvalidValueObject);
		}

		let mut result = Object::default();
		result.insert("@value".into(), value_entry.clone());
		result.insert("@type".into(), Value::String("@json".into()));
		if let Some(index) = index {
			result.insert("@index".into(), Value::String(index.as_str().into()));
		}
		return Ok(Some(Value::Object(result)));
	}

	// Otherwise, if the value is not a scalar or null, an invalid value
	// object value error has been detected.
	match value_entry {
		Value::Null => {
			// If the value of the `@value` entry is null, return null.
			return Ok(None);
		}
		Value::String(_) | Value::Number(_) | Value::Boolean(_) => (),
		_ => return Err(Error::InvalidValueObjectValue),
	}

	// Only strings can be language-tagged.
	if language.is_some() || direction.is_some() {
		if ty.is_some() {
			return Err(Error::InvalidValueObject);
		}

		let s = match value_entry {
			Value::String(s) => s,
			_ => return Err(Error::InvalidLanguageTaggedValue),
		};

		let language = match language {
			Some(language) => {
				let (language, error) = LenientLangTagBuf::new(language);

				if let Some(error) = error {
					env.warnings.handle(Warning::MalformedLanguageTag(
						language.as_str().to_owned(),
						error,
					))
				}

				Some(language)
			}
			None => None,
		};

		let mut result = Object::default();
		result.insert("@value".into(), Value::String(s.clone()));
		if let Some(language) = language {
			result.insert("@language".into(), Value::String(language.as_str().into()));
		}
		if let Some(direction) = direction {
			result.insert("@direction".into(), Value::String(direction.as_str().into()));
		}
		if let Some(index) = index {
			result.insert("@index".into(), Value::String(index.as_str().into()));
		}

		return Ok(Some(Value::Object(result)));
	}

	let mut result = Object::default();
	result.insert("@value".into(), value_entry.clone());
	if let Some(ty) = ty {
		result.insert("@type".into(), Value::String(ty.as_str().into()));
	}
	if let Some(index) = index {
		result.insert("@index".into(), Value::String(index.as_str().into()));
	}

	Ok(Some(Value::Object(result)))
}
