//! Single-writer runtime and its event stream.

/// Events broadcast by the runtime.
pub mod events;
/// Command handle and runtime loop.
pub mod handle;
