use iref::{Iri, IriBuf};
use std::sync::Arc;

/// Single frame of the context processing stack.
struct StackNode {
	/// Previous frame.
	previous: Option<Arc<StackNode>>,

	/// URL of the last loaded context.
	url: IriBuf,
}

impl StackNode {
	fn new(previous: Option<Arc<StackNode>>, url: IriBuf) -> StackNode {
		StackNode { previous, url }
	}

	fn contains(&self, url: &Iri) -> bool {
		if self.url == *url {
			true
		} else {
			match &self.previous {
				Some(prev) => prev.contains(url),
				None => false,
			}
		}
	}
}

/// Context processing stack.
///
/// Records the remote contexts dereferenced so far, for de-duplication and
/// for the processor-defined depth bound (`context_overflow`).
#[derive(Clone, Default)]
pub struct ProcessingStack {
	head: Option<Arc<StackNode>>,
	len: usize,
}

impl ProcessingStack {
	/// Creates a new empty processing stack.
	pub fn new() -> Self {
		Self::default()
	}

	/// Checks if the stack is empty.
	pub fn is_empty(&self) -> bool {
		self.head.is_none()
	}

	/// Number of remote contexts dereferenced so far.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Checks if the given URL is already in the stack.
	pub fn contains(&self, url: &Iri) -> bool {
		match &self.head {
			Some(head) => head.contains(url),
			None => false,
		}
	}

	/// Pushes a new URL onto the stack.
	pub fn push(&mut self, url: IriBuf) {
		let mut head = None;
		std::mem::swap(&mut head, &mut self.head);
		self.head = Some(Arc::new(StackNode::new(head, url)));
		self.len += 1;
	}
}
