//! Waypoint list
//!
//! A fixed-capacity list of `(x, y, radius)` targets edited from the
//! console. The manager answers the `W` verb only; it does not take part
//! in the control chain.

use core::fmt;

use heapless::Vec;

use crate::core::{ArbitrationToken, Behavior, BehaviorCore, CommandArgs, MessageMask};

/// Verb letter
pub const LETTER: u8 = b'W';

/// Maximum number of waypoints
pub const WAYPOINT_CAPACITY: usize = 10;

/// Target position in inches with an arrival radius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Waypoint {
    pub x: i32,
    pub y: i32,
    pub radius: u8,
}

impl Waypoint {
    pub fn new(x: i32, y: i32, radius: u8) -> Self {
        Self { x, y, radius }
    }

    /// Waypoint from command arguments starting at `first`
    fn from_args(args: &CommandArgs, first: usize) -> Self {
        Self::new(
            args.int(first),
            args.int(first + 1),
            args.int(first + 2).clamp(0, i32::from(u8::MAX)) as u8,
        )
    }
}

/// Waypoint list errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaypointError {
    /// List already holds [`WAYPOINT_CAPACITY`] waypoints
    Full,
    /// Index past the end of the list
    OutOfRange,
}

impl fmt::Display for WaypointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaypointError::Full => write!(f, "Waypoint list full."),
            WaypointError::OutOfRange => write!(f, "No such waypoint."),
        }
    }
}

/// Command-only waypoint editor
pub struct WaypointManager {
    core: BehaviorCore,
    waypoints: Vec<Waypoint, WAYPOINT_CAPACITY>,
}

impl WaypointManager {
    pub fn new() -> Self {
        Self {
            core: BehaviorCore::new("Waypoints"),
            waypoints: Vec::new(),
        }
    }

    pub fn append(&mut self, waypoint: Waypoint) -> Result<(), WaypointError> {
        self.waypoints.push(waypoint).map_err(|_| WaypointError::Full)
    }

    /// Insert before `index`; `index == len` appends
    pub fn insert(&mut self, index: usize, waypoint: Waypoint) -> Result<(), WaypointError> {
        if index > self.waypoints.len() {
            return Err(WaypointError::OutOfRange);
        }
        self.waypoints
            .insert(index, waypoint)
            .map_err(|_| WaypointError::Full)
    }

    pub fn delete(&mut self, index: usize) -> Result<Waypoint, WaypointError> {
        if index >= self.waypoints.len() {
            return Err(WaypointError::OutOfRange);
        }
        Ok(self.waypoints.remove(index))
    }

    pub fn replace(&mut self, index: usize, waypoint: Waypoint) -> Result<(), WaypointError> {
        let slot = self
            .waypoints
            .get_mut(index)
            .ok_or(WaypointError::OutOfRange)?;
        *slot = waypoint;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    fn report(
        &self,
        result: Result<(), WaypointError>,
        done: &str,
        console: &mut dyn fmt::Write,
    ) {
        match result {
            Ok(()) if self.core.wants(MessageMask::RESPONSES) => {
                writeln!(console, "{}", done).ok();
            }
            Ok(()) => {}
            Err(e) => {
                writeln!(console, "{}", e).ok();
            }
        }
    }
}

impl Default for WaypointManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Negative indices never name a waypoint
fn index(value: i32) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

impl Behavior for WaypointManager {
    fn core(&self) -> &BehaviorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BehaviorCore {
        &mut self.core
    }

    fn handle_control_event(&mut self, _token: &mut ArbitrationToken, _console: &mut dyn fmt::Write) {}

    fn handle_command_event(&mut self, args: &CommandArgs, console: &mut dyn fmt::Write) {
        let edit = match args.subcommand() {
            Some(b'A' | b'I' | b'D' | b'M' | b'X') => args.subcommand(),
            _ => return,
        };
        if !self.core.is_enabled() {
            if self.core.wants(MessageMask::RESPONSES) {
                writeln!(console, "{} disabled.", self.core.name()).ok();
            }
            return;
        }
        match edit {
            Some(b'A') => {
                let result = self.append(Waypoint::from_args(args, 0));
                self.report(result, "Waypoint added.", console);
            }
            Some(b'I') => {
                let result = self.insert(index(args.int(0)), Waypoint::from_args(args, 1));
                self.report(result, "Waypoint inserted.", console);
            }
            Some(b'D') => {
                let result = self.delete(index(args.int(0))).map(|_| ());
                self.report(result, "Waypoint deleted.", console);
            }
            Some(b'M') => {
                let result = self.replace(index(args.int(0)), Waypoint::from_args(args, 1));
                self.report(result, "Waypoint modified.", console);
            }
            _ => {
                self.clear();
                self.report(Ok(()), "Waypoints cleared.", console);
            }
        }
    }

    fn help(&self) -> &'static str {
        "  A <x> <y> <radius> : Add waypoint\n  I <ix> <x> <y> <radius> : Insert before ix\n  D <ix> : Delete\n  M <ix> <x> <y> <radius> : Modify\n  X : Clear"
    }

    fn print_parameters(&self, console: &mut dyn fmt::Write) -> fmt::Result {
        if self.waypoints.is_empty() {
            return writeln!(console, "\nNo waypoints defined.");
        }
        writeln!(console, "\nDefined waypoints:")?;
        writeln!(console, "x\ty\tradius")?;
        for waypoint in &self.waypoints {
            writeln!(console, "{}\t{}\t{}", waypoint.x, waypoint.y, waypoint.radius)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String;
    use subsumption_core::behavior::dispatch_command;

    fn run(manager: &mut WaypointManager, line: &str) -> String<256> {
        let mut console = String::new();
        dispatch_command(manager, &CommandArgs::parse(line), &mut console);
        console
    }

    #[test]
    fn test_append_and_query() {
        let mut manager = WaypointManager::new();
        assert!(run(&mut manager, "WQ").ends_with("\nNo waypoints defined.\n"));

        assert_eq!(run(&mut manager, "WA 10 20 3").as_str(), "Waypoint added.\n");
        run(&mut manager, "WA -5 7 300");
        assert_eq!(manager.waypoints(), &[Waypoint::new(10, 20, 3), Waypoint::new(-5, 7, 255)]);

        let listing = run(&mut manager, "WQ");
        assert!(listing.starts_with("Waypoints: Enabled"));
        assert!(listing.ends_with("\nDefined waypoints:\nx\ty\tradius\n10\t20\t3\n-5\t7\t255\n"));
    }

    #[test]
    fn test_insert_delete_modify() {
        let mut manager = WaypointManager::new();
        run(&mut manager, "WA 1 1 1");
        run(&mut manager, "WA 3 3 3");

        assert_eq!(run(&mut manager, "WI 1 2 2 2").as_str(), "Waypoint inserted.\n");
        assert_eq!(manager.get(1), Some(&Waypoint::new(2, 2, 2)));
        assert_eq!(manager.len(), 3);

        run(&mut manager, "WM 0 9 9 9");
        assert_eq!(manager.get(0), Some(&Waypoint::new(9, 9, 9)));

        assert_eq!(run(&mut manager, "WD 2").as_str(), "Waypoint deleted.\n");
        assert_eq!(manager.waypoints(), &[Waypoint::new(9, 9, 9), Waypoint::new(2, 2, 2)]);
    }

    #[test]
    fn test_out_of_range() {
        let mut manager = WaypointManager::new();
        assert_eq!(run(&mut manager, "WD 0").as_str(), "No such waypoint.\n");
        assert_eq!(run(&mut manager, "WM -1 0 0 0").as_str(), "No such waypoint.\n");
        assert_eq!(run(&mut manager, "WI 1 0 0 0").as_str(), "No such waypoint.\n");
        assert!(manager.is_empty());
    }

    #[test]
    fn test_full_list() {
        let mut manager = WaypointManager::new();
        for i in 0..WAYPOINT_CAPACITY as i32 {
            manager.append(Waypoint::new(i, i, 1)).unwrap();
        }
        assert_eq!(run(&mut manager, "WA 0 0 0").as_str(), "Waypoint list full.\n");
        assert_eq!(run(&mut manager, "WI 0 0 0 0").as_str(), "Waypoint list full.\n");
        assert_eq!(manager.len(), WAYPOINT_CAPACITY);

        run(&mut manager, "WX");
        assert!(manager.is_empty());
    }

    #[test]
    fn test_disabled_refuses_edits() {
        let mut manager = WaypointManager::new();
        run(&mut manager, "W0");
        assert_eq!(run(&mut manager, "WA 1 2 3").as_str(), "Waypoints disabled.\n");
        assert!(manager.is_empty());
    }
}
