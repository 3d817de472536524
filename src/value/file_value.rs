use std::rc::Rc;

/// A first-class but non-callable handle to a file the host's IO layer
/// resolved. The core never opens or reads through this; it only carries it
/// around as an opaque value so DSL scripts can pass file references to host
/// functions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    display: Rc<str>,
}

impl FileHandle {
    pub fn new(display: impl Into<Rc<str>>) -> Self {
        Self {
            display: display.into(),
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }
}
