mod buffer;
mod invocation;
mod types;

pub use buffer::EventBuffer;
pub use invocation::{Invocation, InvocationBuffer};
pub use types::{EventError, GameEvent};
