//! Editable surfaces and the in-place replace operation.
//!
//! Two structurally different surfaces can hold a caret: flat-buffer form
//! fields ([`FieldSurface`]) and rich free-form regions where the caret lives
//! inside a text-bearing node ([`RichRegionSurface`]). Both are unified
//! behind the small [`EditableSurface`] capability, and the single
//! [`replace`] algorithm works against that capability only - dispatch never
//! learns which concrete kind it is editing.
//!
//! All offsets are byte offsets into UTF-8 text and must lie on char
//! boundaries. Token removal uses the byte length of the matched trailing
//! substring, which is exact for any Unicode content.

use tracing::{trace, warn};

/// Capability exposed by anything that can hold a collapsed text caret.
///
/// The read accessors return `None` when the surface has no active caret
/// (focus was lost between the text-changed signal and its handling); every
/// edit operation treats that as a silent no-op.
pub trait EditableSurface {
    /// Full text of the buffer holding the caret. For a field this is the
    /// whole value; for a rich region it is the caret node's text.
    fn cursor_buffer(&self) -> Option<&str>;

    /// Collapsed caret position as a byte offset into [`cursor_buffer`].
    ///
    /// [`cursor_buffer`]: EditableSurface::cursor_buffer
    fn cursor_offset(&self) -> Option<usize>;

    /// Replaces the caret buffer's text and moves the caret to `cursor`,
    /// collapsed. `cursor` is a byte offset into `text`.
    fn set_text_and_cursor(&mut self, text: String, cursor: usize);

    /// The slice of the caret buffer before the caret, or `None` without an
    /// active caret.
    fn text_before_cursor(&self) -> Option<&str> {
        let buffer = self.cursor_buffer()?;
        let offset = self.cursor_offset()?;
        buffer.get(..offset)
    }
}

/// Replaces the trigger token trailing the caret with `snippet` and places
/// the caret immediately after the inserted text.
///
/// Precondition: `token` is non-empty and a true trailing substring of the
/// text before the caret. A violated precondition or a missing caret no-ops
/// rather than erroring; no text outside the replaced span is ever altered.
pub fn replace(surface: &mut dyn EditableSurface, token: &str, snippet: &str) {
    if token.is_empty() {
        return;
    }
    let edit = {
        let (Some(buffer), Some(offset)) = (surface.cursor_buffer(), surface.cursor_offset())
        else {
            trace!("No active caret, skipping replace");
            return;
        };
        let Some(before) = buffer.get(..offset) else {
            return;
        };
        if !before.ends_with(token) {
            warn!(token, "Token does not trail the caret, skipping replace");
            return;
        }
        splice(buffer, offset, token.len(), snippet)
    };
    surface.set_text_and_cursor(edit.0, edit.1);
}

/// Inserts `snippet` at the caret without removing anything. Used for
/// deferred snippet delivery when no trigger token precedes the caret.
pub fn insert_at_cursor(surface: &mut dyn EditableSurface, snippet: &str) {
    let edit = {
        let (Some(buffer), Some(offset)) = (surface.cursor_buffer(), surface.cursor_offset())
        else {
            trace!("No active caret, skipping insert");
            return;
        };
        if !buffer.is_char_boundary(offset) {
            return;
        }
        splice(buffer, offset, 0, snippet)
    };
    surface.set_text_and_cursor(edit.0, edit.1);
}

/// Builds the new buffer text and caret position: drop `drop_len` bytes
/// before `offset`, insert `snippet` there, keep everything at and after
/// `offset`.
fn splice(buffer: &str, offset: usize, drop_len: usize, snippet: &str) -> (String, usize) {
    let keep = offset - drop_len;
    let mut text = String::with_capacity(buffer.len() - drop_len + snippet.len());
    text.push_str(&buffer[..keep]);
    text.push_str(snippet);
    text.push_str(&buffer[offset..]);
    (text, keep + snippet.len())
}

/// A single-line or multi-line form control with a flat string value and an
/// optional collapsed byte cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSurface {
    value: String,
    cursor: Option<usize>,
}

impl FieldSurface {
    /// A focused field with its caret at `cursor` (a byte offset into
    /// `value`, which must lie on a char boundary).
    pub fn new(value: impl Into<String>, cursor: usize) -> Self {
        let value = value.into();
        assert!(
            value.is_char_boundary(cursor),
            "cursor must lie on a char boundary"
        );
        Self {
            value,
            cursor: Some(cursor),
        }
    }

    /// A field that has lost focus; every edit no-ops.
    pub fn unfocused(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            cursor: None,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }
}

impl EditableSurface for FieldSurface {
    fn cursor_buffer(&self) -> Option<&str> {
        self.cursor.map(|_| self.value.as_str())
    }

    fn cursor_offset(&self) -> Option<usize> {
        self.cursor
    }

    fn set_text_and_cursor(&mut self, text: String, cursor: usize) {
        self.value = text;
        self.cursor = Some(cursor);
    }
}

/// Caret position inside a rich region: a node index plus a byte offset into
/// that node's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caret {
    pub node: usize,
    pub offset: usize,
}

/// Free-form editable content where text lives in a sequence of nodes and
/// the caret sits inside one of them. Edits touch only the caret's node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichRegionSurface {
    nodes: Vec<String>,
    caret: Option<Caret>,
}

impl RichRegionSurface {
    /// A focused region with the caret inside `caret.node` at byte offset
    /// `caret.offset`.
    pub fn new(nodes: Vec<String>, caret: Caret) -> Self {
        Self {
            nodes,
            caret: Some(caret),
        }
    }

    /// A region without an active selection; every edit no-ops.
    pub fn unfocused(nodes: Vec<String>) -> Self {
        Self { nodes, caret: None }
    }

    pub fn node_text(&self, index: usize) -> Option<&str> {
        self.nodes.get(index).map(String::as_str)
    }

    pub fn caret(&self) -> Option<Caret> {
        self.caret
    }
}

impl EditableSurface for RichRegionSurface {
    fn cursor_buffer(&self) -> Option<&str> {
        let caret = self.caret?;
        self.nodes.get(caret.node).map(String::as_str)
    }

    fn cursor_offset(&self) -> Option<usize> {
        self.caret.map(|c| c.offset)
    }

    fn set_text_and_cursor(&mut self, text: String, cursor: usize) {
        let Some(caret) = self.caret else {
            return;
        };
        let Some(node) = self.nodes.get_mut(caret.node) else {
            return;
        };
        *node = text;
        self.caret = Some(Caret {
            node: caret.node,
            offset: cursor,
        });
    }
}
