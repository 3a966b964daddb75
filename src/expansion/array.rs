use super::{expand_element, Error, Expanded, Options};
use crate::syntax::{ContainerKind, Object, Value};
use crate::warning;
use crate::{Context, Environment, Loader};
use iref::Iri;

/// Expands each item of the given array, flattening the results one level.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn expand_array<L, W>(
	mut env: Environment<'_, L, W>,
	active_context: &Context,
	active_property: Option<&str>,
	element: &[Value],
	base_url: Option<&Iri>,
	options: Options,
	from_map: bool,
) -> Result<Expanded, Error>
where
	L: Loader,
	W: warning::Handler,
{
	// Initialize an empty array, `result`.
	let mut result = Vec::new();

	// If the container mapping of `active_property` includes `@list`, the
	// expanded array becomes a list object.
	let is_list = active_property
		.and_then(|property| active_context.get(property))
		.map(|definition| definition.container.contains(ContainerKind::List))
		.unwrap_or(false);

	// For each `item` in `element`, expand it recursively, flattening one
	// level and dropping `null` values.
	for item in element {
		let e = Box::pin(expand_element(
			Environment {
				loader: env.loader,
				warnings: env.warnings,
			},
			active_context,
			active_property,
			item,
			base_url,
			options,
			from_map,
		))
		.await?;

		result.extend(e);
	}

	if is_list {
		let mut list = Object::default();
		list.insert("@list".into(), Value::Array(result));
		return Ok(Expanded::Object(Value::Object(list)));
	}

	// Return `result`.
	Ok(Expanded::Array(result))
}
