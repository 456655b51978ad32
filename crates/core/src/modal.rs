//! The overlay/iframe pair as one value with a single visibility flag.

use tracing::debug;

use crate::document::{ModalElements, Visibility};

/// A mounted overlay and iframe that are always shown or hidden together.
pub struct Modal<E: ModalElements> {
	elements: E,
	visibility: Visibility,
}

impl<E: ModalElements> Modal<E> {
	/// Wraps freshly inserted elements, which start hidden.
	pub fn new(elements: E) -> Self {
		Self {
			elements,
			visibility: Visibility::Hidden,
		}
	}

	pub fn is_visible(&self) -> bool {
		self.visibility == Visibility::Shown
	}

	/// Flips between shown and hidden and returns the new state.
	pub fn toggle(&mut self) -> Visibility {
		let next = self.visibility.toggled();
		self.apply(next);
		next
	}

	/// Hides both elements, even if already hidden.
	pub fn hide(&mut self) {
		self.apply(Visibility::Hidden);
	}

	/// Detaches both elements from the document.
	pub fn remove(self) {
		self.elements.remove();
	}

	fn apply(&mut self, visibility: Visibility) {
		debug!(target = "beam_link", display = visibility.display(), "modal visibility");
		self.visibility = visibility;
		self.elements.set_visibility(visibility);
	}
}
