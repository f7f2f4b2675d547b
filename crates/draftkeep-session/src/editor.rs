//! The seam to the rich-text engine.
//!
//! The session never looks inside a document. It only asks the editor for
//! its serialized state and hands serialized states back to it.

use anyhow::Result;

pub trait Editor: Default + Send {
    /// Serialize the whole current document
    fn serialize(&self) -> String;

    /// Replace the current document with a serialized one
    fn load(&mut self, state: &str) -> Result<()>;

    /// Return to a blank document
    fn reset(&mut self);
}

/// Load `state`, falling back to a blank document if it cannot be decoded.
pub fn load_or_blank<E: Editor>(editor: &mut E, state: &str) -> bool {
    match editor.load(state) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "failed to deserialize document, starting blank");
            editor.reset();
            false
        }
    }
}
