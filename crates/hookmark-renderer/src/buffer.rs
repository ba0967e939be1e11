//! Output buffer with position checkpoints.

use crate::error::RenderError;
use crate::hooks::HookWriter;

/// Growable output buffer with a stack of checkpoint offsets.
///
/// A checkpoint pushed when entering a node and popped when leaving it
/// isolates the bytes the node's children produced, which can then be taken
/// out of the buffer in one step. One buffer serves exactly one render.
///
/// # Example
///
/// ```
/// use hookmark_renderer::RenderBuffer;
///
/// let mut buf = RenderBuffer::new();
/// buf.push_str("<p>");
/// buf.push_pos();
/// buf.push_str("inner");
/// let pos = buf.pop_pos()?;
///
/// assert_eq!(buf.take_since(pos), "inner");
/// assert_eq!(buf.finish()?, "<p>");
/// # Ok::<(), hookmark_renderer::RenderError>(())
/// ```
#[derive(Debug, Default)]
pub struct RenderBuffer {
    out: String,
    positions: Vec<usize>,
}

impl RenderBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            out: String::with_capacity(4096),
            positions: Vec::new(),
        }
    }

    /// Current length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.out.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn push_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    pub fn push(&mut self, c: char) {
        self.out.push(c);
    }

    /// Record the current length as a checkpoint.
    pub fn push_pos(&mut self) {
        self.positions.push(self.out.len());
    }

    /// Remove and return the most recent checkpoint.
    pub fn pop_pos(&mut self) -> Result<usize, RenderError> {
        self.positions
            .pop()
            .ok_or(RenderError::UnbalancedCapture { depth: 0 })
    }

    /// Cut everything written since `pos` out of the buffer and return it.
    ///
    /// Positions past the end yield an empty string.
    pub fn take_since(&mut self, pos: usize) -> String {
        if pos >= self.out.len() {
            return String::new();
        }
        self.out.split_off(pos)
    }

    /// Shorten the buffer to `pos` bytes.
    pub fn truncate(&mut self, pos: usize) {
        self.out.truncate(pos);
    }

    /// Number of open checkpoints.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.positions.len()
    }

    /// Append-only writer handed to render hooks.
    pub fn writer(&mut self) -> HookWriter<'_> {
        HookWriter::new(&mut self.out)
    }

    pub(crate) fn as_mut_string(&mut self) -> &mut String {
        &mut self.out
    }

    /// Consume the buffer, failing if any checkpoint is still open.
    pub fn finish(self) -> Result<String, RenderError> {
        if self.positions.is_empty() {
            Ok(self.out)
        } else {
            Err(RenderError::UnbalancedCapture {
                depth: self.positions.len(),
            })
        }
    }
}
