#![allow(unreachable_pub)]

mod error;
mod outcome;
mod target;

pub use error::ErrorKind;
pub use outcome::Outcome;
pub use target::Target;

/// The waybackscope `Result` type
pub type Result<T> = std::result::Result<T, crate::ErrorKind>;
