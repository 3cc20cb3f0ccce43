//! Symbol-at-a-time command line router

use core::fmt;

use heapless::String;

use super::args::{CommandArgs, LINE_CAPACITY};
use super::table::{letter_index, CommandTable};
use crate::bus::{self, EventNotification, PublisherId, SubscriberArena, SubscriberId};

/// Publisher identity carried by command notifications
pub const ROUTER: PublisherId = PublisherId::new(1);

/// Accumulates console input and dispatches complete lines by verb letter
///
/// Input is uppercased as it arrives. Carriage return completes a line;
/// line feed and other control characters except tab are dropped. Once the
/// buffer holds [`LINE_CAPACITY`] symbols, further input for that line is
/// discarded without notice.
///
/// A line holding a single letter switches to menu mode: that letter's
/// help is shown and every following line is prefixed with it until an
/// empty line (or the bare menu letter) is entered.
#[derive(Debug, Default)]
pub struct CommandRouter {
    table: CommandTable,
    buffer: String<LINE_CAPACITY>,
    menu: Option<u8>,
}

impl CommandRouter {
    pub const fn new() -> Self {
        Self {
            table: CommandTable::new(),
            buffer: String::new(),
            menu: None,
        }
    }

    /// Subscribe `subscriber` to verb `letter`
    ///
    /// Returns the previous occupant of the slot, which the subscriber
    /// stores as its command successor.
    pub fn register(&mut self, subscriber: SubscriberId, letter: u8) -> Option<SubscriberId> {
        self.table.subscribe(subscriber, letter)
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Letter of the active menu, if any
    pub fn menu_letter(&self) -> Option<u8> {
        self.menu
    }

    /// Symbols accumulated for the line in progress
    pub fn pending(&self) -> &str {
        self.buffer.as_str()
    }

    /// Accept one input symbol
    ///
    /// Returns `true` when the symbol completed and dispatched a line.
    pub fn feed<A>(&mut self, symbol: u8, arena: &mut A, console: &mut dyn fmt::Write) -> bool
    where
        A: SubscriberArena<CommandArgs> + ?Sized,
    {
        match symbol {
            b'\r' => {
                let line = core::mem::take(&mut self.buffer);
                self.process_line(line.as_str(), arena, console);
                if let Some(letter) = self.menu {
                    self.buffer.push(char::from(letter)).ok();
                }
                true
            }
            b'\t' | b' '..=b'~' => {
                // Overflow drops the symbol.
                self.buffer
                    .push(char::from(symbol.to_ascii_uppercase()))
                    .ok();
                false
            }
            _ => false,
        }
    }

    fn process_line<A>(&mut self, line: &str, arena: &mut A, console: &mut dyn fmt::Write)
    where
        A: SubscriberArena<CommandArgs> + ?Sized,
    {
        if self.ends_session(line) {
            self.menu = None;
            self.list_verbs(arena, console);
            return;
        }

        let mut args = CommandArgs::parse(line);
        let verb = args.verb();
        match verb {
            b'?' => match args.subcommand().filter(|&l| self.table.get(l).is_some()) {
                Some(letter) => {
                    let mut help = CommandArgs::help_request(letter);
                    self.dispatch(letter, &mut help, arena, console);
                }
                None => self.list_verbs(arena, console),
            },
            b'*' => {
                writeln!(console, "\nBroadcasting command: {}", line.get(1..).unwrap_or(""))
                    .ok();
                for letter in b'A'..=b'Z' {
                    if self.table.get(letter).is_some() {
                        self.dispatch(letter, &mut args, arena, console);
                    }
                }
            }
            _ if letter_index(verb).is_some() => {
                if line.trim().len() == 1 {
                    self.menu = Some(verb);
                    args = CommandArgs::help_request(verb);
                }
                if self.table.get(verb).is_some() {
                    self.dispatch(verb, &mut args, arena, console);
                } else {
                    writeln!(console, "No handler for command '{}'", char::from(verb)).ok();
                }
            }
            _ => {
                writeln!(console, "Invalid command").ok();
            }
        }
    }

    /// Empty line, or the bare menu letter while a menu is active
    fn ends_session(&self, line: &str) -> bool {
        let line = line.trim();
        match self.menu {
            None => line.is_empty(),
            Some(letter) => {
                let entered = line.get(1..).unwrap_or("").trim();
                entered.is_empty() || entered.as_bytes() == [letter]
            }
        }
    }

    fn dispatch<A>(
        &self,
        letter: u8,
        args: &mut CommandArgs,
        arena: &mut A,
        console: &mut dyn fmt::Write,
    ) where
        A: SubscriberArena<CommandArgs> + ?Sized,
    {
        let head = self.table.get(letter);
        let mut event = EventNotification::new(ROUTER, letter, args, console);
        bus::publish(arena, head, &mut event);
    }

    fn list_verbs<A>(&self, arena: &A, console: &mut dyn fmt::Write)
    where
        A: SubscriberArena<CommandArgs> + ?Sized,
    {
        write!(console, "\n==================\nAvailable Objects:\n\n").ok();
        for (letter, id) in self.table.iter() {
            let name = arena.subscriber_name(id).unwrap_or("?");
            writeln!(console, "  {} - {}", char::from(letter), name).ok();
        }
        writeln!(console).ok();
    }
}
