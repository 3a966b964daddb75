use super::{compact_iri, Error, Options};
use crate::context::Type;
use crate::object::{self, node_index};
use crate::processing::{process_context, ProcessingStack};
use crate::syntax::{ContainerKind, Direction, Keyword, Nullable, Object, Value};
use crate::warning;
use crate::{processing, Context, Environment, Id, Loader, Term};
use mown::Mown;

/// Value Compaction algorithm.
///
/// Compacts an expanded value object against the active property's type,
/// language and direction mappings.
pub(crate) async fn compact_indexed_value<L, W>(
	mut env: Environment<'_, L, W>,
	element: &Value,
	active_context: &Context,
	active_property: Option<&str>,
	options: Options,
) -> Result<Value, Error>
where
	L: Loader,
	W: warning::Handler,
{
	let element_object = match element.as_object() {
		Some(object) => object,
		None => return Ok(element.clone()),
	};

	// If the term definition for `active_property` has a local context,
	// apply it with `override_protected`.
	let mut active_context = Mown::Borrowed(active_context);
	if let Some(active_property) = active_property {
		let scoped = active_context.get(active_property).and_then(|definition| {
			definition
				.context
				.clone()
				.map(|context| (context, definition.base_url.clone()))
		});

		if let Some((local_context, base_url)) = scoped {
			let processed = process_context(
				Environment {
					loader: env.loader,
					warnings: env.warnings,
				},
				active_context.as_ref(),
				&local_context,
				ProcessingStack::new(),
				base_url.as_deref(),
				processing::Options::from(options).with_override(),
			)
			.await?;

			active_context = Mown::Owned(processed)
		}
	}

	let active_property_definition =
		active_property.and_then(|property| active_context.get(property));

	// Initialize `language` to the language mapping for the active property,
	// if any, otherwise to the default language of the active context.
	let language = match active_property_definition.and_then(|definition| definition.language.clone())
	{
		Some(Nullable::Some(language)) => Some(language),
		Some(Nullable::Null) => None,
		None => active_context.default_language().cloned(),
	};

	// Initialize `direction` to the direction mapping for the active
	// property, if any, otherwise to the default base direction of the
	// active context.
	let direction = match active_property_definition.and_then(|definition| definition.direction) {
		Some(Nullable::Some(direction)) => Some(direction),
		Some(Nullable::Null) => None,
		None => active_context.default_base_direction(),
	};

	let type_mapping = active_property_definition.and_then(|definition| definition.typ.clone());
	let container_mapping = active_property_definition
		.map(|definition| definition.container)
		.unwrap_or_default();

	let index = node_index(element);
	let remove_index =
		(index.is_some() && container_mapping.contains(ContainerKind::Index)) || index.is_none();

	let null_value = Value::Null;
	let value_value = object::get(element_object, "@value").unwrap_or(&null_value);
	let ty = object::get(element_object, "@type").and_then(Value::as_str);
	let value_language = object::get(element_object, "@language").and_then(Value::as_str);
	let value_direction = object::get(element_object, "@direction")
		.and_then(Value::as_str)
		.and_then(|d| Direction::try_from(d).ok());

	let mut result = Object::default();

	if ty == Some("@json") {
		// A JSON literal whose active property has a type mapping of
		// `@json` compacts to the bare JSON value.
		if type_mapping == Some(Type::Json) && remove_index {
			return Ok(value_value.clone());
		}

		let key = compact_key(active_context.as_ref(), Keyword::Value, options)?;
		result.insert(key.as_str().into(), value_value.clone());

		let key = compact_key(active_context.as_ref(), Keyword::Type, options)?;
		let compact_ty = compact_iri(
			active_context.as_ref(),
			&Term::Keyword(Keyword::Json),
			None,
			true,
			false,
			options,
		)?;
		result.insert(key.as_str().into(), optional_string(compact_ty));
	} else if value_language.is_some() || value_direction.is_some() {
		// Language-tagged (or directed) string.
		let language_matches = match value_language {
			None => true,
			Some(value_language) => language
				.as_ref()
				.map(|language| *language == *value_language)
				.unwrap_or(false),
		};

		let direction_matches = match value_direction {
			None => true,
			Some(value_direction) => direction == Some(value_direction),
		};

		if remove_index && language_matches && direction_matches {
			return Ok(value_value.clone());
		}

		let key = compact_key(active_context.as_ref(), Keyword::Value, options)?;
		result.insert(key.as_str().into(), value_value.clone());

		if let Some(value_language) = value_language {
			let key = compact_key(active_context.as_ref(), Keyword::Language, options)?;
			result.insert(key.as_str().into(), Value::String(value_language.into()));
		}

		if let Some(value_direction) = value_direction {
			let key = compact_key(active_context.as_ref(), Keyword::Direction, options)?;
			result.insert(
				key.as_str().into(),
				Value::String(value_direction.as_str().into()),
			);
		}
	} else {
		// Typed or plain literal.
		let matches_type = match (ty, &type_mapping) {
			(Some(ty), Some(Type::Iri(mapping))) => ty == mapping.as_str(),
			(None, None) => true,
			_ => false,
		};

		if matches_type && remove_index {
			match value_value {
				Value::String(_) => {
					// A plain string stays wrapped when a default language
					// or direction applies, as it would otherwise pick the
					// language up on re-expansion.
					if ty.is_some() || (language.is_none() && direction.is_none()) {
						return Ok(value_value.clone());
					}

					let key = compact_key(active_context.as_ref(), Keyword::Value, options)?;
					result.insert(key.as_str().into(), value_value.clone());
				}
				other => return Ok(other.clone()),
			}
		} else {
			let key = compact_key(active_context.as_ref(), Keyword::Value, options)?;
			result.insert(key.as_str().into(), value_value.clone());

			if let Some(ty) = ty {
				let key = compact_key(active_context.as_ref(), Keyword::Type, options)?;
				let compact_ty = compact_iri(
					active_context.as_ref(),
					&Term::Id(Id::new(ty)),
					None,
					true,
					false,
					options,
				)?;
				result.insert(key.as_str().into(), optional_string(compact_ty));
			}
		}
	}

	if !remove_index {
		if let Some(index) = index {
			let key = compact_key(active_context.as_ref(), Keyword::Index, options)?;
			result.insert(key.as_str().into(), Value::String(index.into()));
		}
	}

	Ok(Value::Object(result))
}

fn compact_key(
	active_context: &Context,
	keyword: Keyword,
	options: Options,
) -> Result<String, Error> {
	Ok(
		compact_iri(active_context, &Term::Keyword(keyword), None, true, false, options)?
			.unwrap(),
	)
}

fn optional_string(s: Option<String>) -> Value {
	match s {
		Some(s) => Value::String(s.as_str().into()),
		None => Value::Null,
	}
}
