//! Console commands
//!
//! - **`parser`**: turns a console line into a [`Command`] or a [`ParseError`].
//! - **`dispatcher`**: applies a command to the ledgers and reports an [`Outcome`].

pub mod dispatcher;
pub mod parser;

pub use dispatcher::{DispatchError, Dispatcher, Outcome, Tone};
pub use parser::{parse, Action, Command, ParseError};
