#![forbid(unsafe_code)]

//! Domain core of the certification quiz: questions, banks, sessions and the
//! quiz engine. No I/O happens here.

pub mod engine;
pub mod error;
pub mod model;
pub mod time;

pub use engine::Score;
pub use error::Error;
pub use time::Clock;
