mod timed;

pub use timed::*;
