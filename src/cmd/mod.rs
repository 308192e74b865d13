mod classify;
mod resolve;

pub use classify::cmd_classify;
pub use resolve::{cmd_resolve, ResolveArgs};
