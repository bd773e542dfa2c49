//! Helpers shared by the request builders.

pub(crate) mod encoding;
pub(crate) mod headers;
