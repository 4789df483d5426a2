//! Delete confirmation modal.

use super::Entity;

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteConfirmation<E: Entity> {
    pub target: E,
}

impl<E: Entity> DeleteConfirmation<E> {
    pub fn new(target: E) -> Self {
        Self { target }
    }

    pub fn prompt(&self) -> String {
        self.target.delete_prompt()
    }

    /// Instance path the DELETE goes to.
    pub fn path(&self) -> String {
        E::KIND.instance(self.target.id())
    }
}
