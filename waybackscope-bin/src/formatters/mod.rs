pub(crate) mod color;
pub(crate) mod duration;
pub(crate) mod log;
pub(crate) mod summary;
