//! Operation dispatch and the socket daemon.

pub mod daemon;
pub mod dispatch;
pub mod ops;

pub use dispatch::{Dispatcher, Handler};
pub use ops::build_dispatcher;
