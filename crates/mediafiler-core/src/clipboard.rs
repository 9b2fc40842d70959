//! Copying entry links to the clipboard.
//!
//! A copy goes through a temporary selection buffer: the text is staged in a
//! buffer, the buffer is selected, and the platform copy action is invoked.
//! The buffer is held by a [`ScopedBuffer`] guard, so it is removed on every
//! way out of [`copy_link`], including a failed copy.

use std::collections::HashMap;

use arboard::Clipboard;

use crate::error::{Error, Result};

/// Handle of a staged buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(u64);

/// Something that can stage text and copy it to a clipboard.
pub trait ClipboardSurface {
    /// Stage `text` in a new buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer cannot be created.
    fn create_buffer(&mut self, text: &str) -> Result<BufferId>;

    /// Make `buffer` the current selection.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer does not exist.
    fn select(&mut self, buffer: BufferId) -> Result<()>;

    /// Copy the current selection to the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform copy fails.
    fn copy_selection(&mut self) -> Result<()>;

    /// Remove a staged buffer. Removing an unknown buffer does nothing.
    fn remove_buffer(&mut self, buffer: BufferId);
}

/// A staged buffer that is removed when the guard goes out of scope.
pub struct ScopedBuffer<'a, S: ClipboardSurface + ?Sized> {
    surface: &'a mut S,
    id: BufferId,
}

impl<'a, S: ClipboardSurface + ?Sized> ScopedBuffer<'a, S> {
    /// Stage `text` on `surface`.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot create the buffer.
    pub fn acquire(surface: &'a mut S, text: &str) -> Result<Self> {
        let id = surface.create_buffer(text)?;
        Ok(Self { surface, id })
    }

    /// Id of the staged buffer.
    #[must_use]
    pub const fn id(&self) -> BufferId {
        self.id
    }

    /// Select the buffer and copy it.
    ///
    /// # Errors
    ///
    /// Returns an error if selecting or copying fails.
    pub fn copy(&mut self) -> Result<()> {
        self.surface.select(self.id)?;
        self.surface.copy_selection()
    }
}

impl<S: ClipboardSurface + ?Sized> Drop for ScopedBuffer<'_, S> {
    fn drop(&mut self) {
        self.surface.remove_buffer(self.id);
    }
}

/// Copy `url` to the clipboard of `surface`.
///
/// Failures are logged and swallowed; the temporary buffer is removed either
/// way. Returns whether the copy went through.
pub fn copy_link<S: ClipboardSurface + ?Sized>(surface: &mut S, url: &str) -> bool {
    let result = ScopedBuffer::acquire(surface, url).and_then(|mut buffer| buffer.copy());
    match result {
        Ok(()) => {
            tracing::debug!("Copied {} to clipboard", url);
            true
        }
        Err(e) => {
            tracing::debug!("Clipboard copy failed: {}", e);
            false
        }
    }
}

/// System clipboard using arboard.
pub struct NativeClipboard {
    clipboard: Clipboard,
    buffers: HashMap<BufferId, String>,
    selected: Option<BufferId>,
    next_id: u64,
}

impl NativeClipboard {
    /// Open the system clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be accessed.
    pub fn new() -> Result<Self> {
        let clipboard = Clipboard::new()
            .map_err(|e| Error::ClipboardError(format!("failed to access clipboard: {e}")))?;
        Ok(Self {
            clipboard,
            buffers: HashMap::new(),
            selected: None,
            next_id: 0,
        })
    }
}

impl ClipboardSurface for NativeClipboard {
    fn create_buffer(&mut self, text: &str) -> Result<BufferId> {
        let id = BufferId(self.next_id);
        self.next_id += 1;
        self.buffers.insert(id, text.to_string());
        Ok(id)
    }

    fn select(&mut self, buffer: BufferId) -> Result<()> {
        if !self.buffers.contains_key(&buffer) {
            return Err(Error::ClipboardError("no such buffer".into()));
        }
        self.selected = Some(buffer);
        Ok(())
    }

    fn copy_selection(&mut self) -> Result<()> {
        let text = self
            .selected
            .and_then(|id| self.buffers.get(&id))
            .cloned()
            .ok_or_else(|| Error::ClipboardError("nothing selected".into()))?;
        self.clipboard
            .set_text(text)
            .map_err(|e| Error::ClipboardError(format!("failed to set text: {e}")))
    }

    fn remove_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(&buffer);
        if self.selected == Some(buffer) {
            self.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeSurface {
        live: HashMap<BufferId, String>,
        selected: Option<BufferId>,
        copied: Vec<String>,
        fail_copy: bool,
        fail_create: bool,
        next: u64,
    }

    impl ClipboardSurface for FakeSurface {
        fn create_buffer(&mut self, text: &str) -> Result<BufferId> {
            if self.fail_create {
                return Err(Error::ClipboardError("no body".into()));
            }
            let id = BufferId(self.next);
            self.next += 1;
            self.live.insert(id, text.to_string());
            Ok(id)
        }

        fn select(&mut self, buffer: BufferId) -> Result<()> {
            self.selected = Some(buffer);
            Ok(())
        }

        fn copy_selection(&mut self) -> Result<()> {
            if self.fail_copy {
                return Err(Error::ClipboardError("denied".into()));
            }
            let text = self.live[&self.selected.unwrap()].clone();
            self.copied.push(text);
            Ok(())
        }

        fn remove_buffer(&mut self, buffer: BufferId) {
            self.live.remove(&buffer);
        }
    }

    #[test]
    fn test_copy_link_removes_buffer() {
        let mut surface = FakeSurface::default();
        assert!(copy_link(&mut surface, "http://h/f/ab"));
        assert_eq!(surface.copied, vec!["http://h/f/ab"]);
        assert!(surface.live.is_empty());
    }

    #[test]
    fn test_failed_copy_still_removes_buffer() {
        let mut surface = FakeSurface {
            fail_copy: true,
            ..Default::default()
        };
        assert!(!copy_link(&mut surface, "http://h/f/ab"));
        assert!(surface.copied.is_empty());
        assert!(surface.live.is_empty());
    }

    #[test]
    fn test_failed_create_is_swallowed() {
        let mut surface = FakeSurface {
            fail_create: true,
            ..Default::default()
        };
        assert!(!copy_link(&mut surface, "http://h/f/ab"));
        assert!(surface.live.is_empty());
    }

    #[test]
    fn test_buffer_removed_on_panic() {
        let mut surface = FakeSurface::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _buffer = ScopedBuffer::acquire(&mut surface, "x").unwrap();
            panic!("boom");
        }));
        assert!(result.is_err());
        assert!(surface.live.is_empty());
    }
}
