//! Handler error plumbing.
//!
//! Problems the user can fix (bad arguments, missing rights, unknown ids)
//! are answered in chat. Anything that reaches `HandlerError` is an
//! infrastructure failure and is logged by the dispatcher.

pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;
pub type HandlerResult = Result<(), HandlerError>;
