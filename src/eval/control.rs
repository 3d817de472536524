//! Control-flow-as-distinct-type (§5, §9 REDESIGN FLAG).
//!
//! `continue`/`break`/an early subdir exit are not errors — they never flow
//! through `EvalError`. They're a separate signal returned alongside
//! `Result`, unwound explicitly at the one site each is meaningful: the
//! enclosing `foreach` body for `Continue`/`Break`, the top-level run loop
//! for `SubdirDone`.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    None,
    Continue,
    Break,
    SubdirDone,
}

impl Control {
    pub fn is_none(self) -> bool {
        matches!(self, Control::None)
    }
}
