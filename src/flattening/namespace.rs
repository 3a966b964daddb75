use rdf_types::BlankIdBuf;
use std::collections::HashMap;

/// Blank node identifier allocator.
///
/// Emits `_:b<n>` labels from a per-run counter, paired with a map from
/// source identifier to allocated identifier so relabeling is consistent.
/// A fresh namespace is created at the start of each top-level flatten.
#[derive(Default)]
pub struct Namespace {
	count: usize,
	map: HashMap<String, BlankIdBuf>,
}

impl Namespace {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the identifier allocated to `id`, allocating a fresh one on
	/// first use. Passing `None` allocates an unrelated fresh label.
	pub fn assign(&mut self, id: Option<&str>) -> BlankIdBuf {
		match id {
			Some(id) => match self.map.get(id) {
				Some(assigned) => assigned.clone(),
				None => {
					let assigned = self.next();
					self.map.insert(id.to_owned(), assigned.clone());
					assigned
				}
			},
			None => self.next(),
		}
	}

	fn next(&mut self) -> BlankIdBuf {
		let blank_id = BlankIdBuf::new(format!("_:b{}", self.count)).unwrap();
		self.count += 1;
		blank_id
	}
}
