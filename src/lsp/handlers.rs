pub(crate) mod commands;
pub(crate) mod diagnostics;
pub(crate) mod formatting;
