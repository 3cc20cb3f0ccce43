//! Per-letter subscriber table

use crate::bus::SubscriberId;

/// Number of verb letters, `A` through `Z`
pub const LETTER_COUNT: usize = 26;

/// Slot index of a verb letter, case-insensitive
pub fn letter_index(letter: u8) -> Option<usize> {
    let upper = letter.to_ascii_uppercase();
    upper
        .is_ascii_uppercase()
        .then(|| usize::from(upper - b'A'))
}

/// Fixed mapping from the 26 verb letters to one subscriber each
///
/// Subscribing to an occupied letter replaces the occupant and hands the
/// previous one back, so the new subscriber can chain to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTable {
    slots: [Option<SubscriberId>; LETTER_COUNT],
}

impl CommandTable {
    pub const fn new() -> Self {
        Self {
            slots: [None; LETTER_COUNT],
        }
    }

    /// Put `subscriber` at the head of `letter`'s slot
    ///
    /// Returns the previous occupant. Characters outside `A..=Z` (after
    /// uppercasing) are ignored and return `None`.
    pub fn subscribe(&mut self, subscriber: SubscriberId, letter: u8) -> Option<SubscriberId> {
        let index = letter_index(letter)?;
        self.slots[index].replace(subscriber)
    }

    /// Head subscriber for `letter`
    pub fn get(&self, letter: u8) -> Option<SubscriberId> {
        letter_index(letter).and_then(|index| self.slots[index])
    }

    /// Registered `(letter, head)` pairs in ascending letter order
    pub fn iter(&self) -> impl Iterator<Item = (u8, SubscriberId)> + '_ {
        (b'A'..=b'Z')
            .zip(self.slots.iter())
            .filter_map(|(letter, slot)| slot.map(|id| (letter, id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_index() {
        assert_eq!(letter_index(b'A'), Some(0));
        assert_eq!(letter_index(b'z'), Some(25));
        assert_eq!(letter_index(b'?'), None);
        assert_eq!(letter_index(b'5'), None);
    }

    #[test]
    fn test_subscribe_replaces_and_returns_previous() {
        let mut table = CommandTable::new();
        assert_eq!(table.subscribe(SubscriberId::new(1), b'n'), None);
        assert_eq!(
            table.subscribe(SubscriberId::new(2), b'N'),
            Some(SubscriberId::new(1))
        );
        assert_eq!(table.get(b'N'), Some(SubscriberId::new(2)));
    }

    #[test]
    fn test_invalid_letter_ignored() {
        let mut table = CommandTable::new();
        assert_eq!(table.subscribe(SubscriberId::new(1), b'*'), None);
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn test_iter_ascending() {
        let mut table = CommandTable::new();
        table.subscribe(SubscriberId::new(0), b'M');
        table.subscribe(SubscriberId::new(1), b'C');
        let letters: heapless::Vec<u8, 26> = table.iter().map(|(l, _)| l).collect();
        assert_eq!(&letters[..], b"CM");
    }
}
