//! Text command routing
//!
//! Commands arrive one symbol at a time from a console. The router collects
//! a line, parses it into [`CommandArgs`] and publishes it through the
//! subscriber chain registered for the verb letter.
//!
//! # Grammar
//!
//! ```text
//! ?                       list registered verbs
//! ?<letter>               detailed help for one verb
//! *<rest>                 send <rest> to every registered verb, A to Z
//! <letter>                enter menu mode for that verb
//! <letter><sub> <args>    dispatch to that verb's subscribers
//! ```

pub mod args;
pub mod router;
pub mod table;

pub use args::{CommandArgs, LINE_CAPACITY, MAX_ARGS};
pub use router::{CommandRouter, ROUTER};
pub use table::{letter_index, CommandTable, LETTER_COUNT};
