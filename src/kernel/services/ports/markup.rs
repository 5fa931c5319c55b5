use crate::kernel::BinaryDocument;

/// Produces the body markup a view shows for a fully loaded document.
pub trait MarkupProvider: Send + Sync {
    fn render(&self, document: &BinaryDocument) -> String;
}
