//! Session score, the top-5 highscore table and name entry.

/// Points for every piece that locks.
pub const LOCK_BONUS: u32 = 5;
/// Points for every cleared row.
pub const ROW_BONUS: u32 = 10;

/// Number of entries kept in the highscore table.
pub const TABLE_LEN: usize = 5;
/// Characters in a highscore name tag.
pub const NAME_LEN: usize = 4;
/// Symbols a name character cycles through (`A`..=`Z`).
pub const ALPHABET_LEN: u8 = 26;

/// A 4-character name tag, stored as alphabet indices.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Name([u8; NAME_LEN]);

impl Name {
    /// Build a name from alphabet indices; out-of-range values wrap.
    pub const fn new(letters: [u8; NAME_LEN]) -> Self {
        let mut out = [0; NAME_LEN];
        let mut i = 0;
        while i < NAME_LEN {
            out[i] = letters[i] % ALPHABET_LEN;
            i += 1;
        }
        Self(out)
    }

    /// A name whose four characters are all the `index`th letter.
    pub const fn repeated(index: u8) -> Self {
        Self::new([index; NAME_LEN])
    }

    /// Parse exactly four ASCII letters (either case).
    pub fn parse(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != NAME_LEN {
            return None;
        }
        let mut letters = [0; NAME_LEN];
        for (slot, &b) in letters.iter_mut().zip(bytes) {
            if !b.is_ascii_alphabetic() {
                return None;
            }
            *slot = b.to_ascii_uppercase() - b'A';
        }
        Some(Self(letters))
    }

    /// Alphabet index of each character.
    pub const fn letters(&self) -> [u8; NAME_LEN] {
        self.0
    }

    /// The name as ASCII bytes, ready for text rendering.
    pub fn to_ascii(&self) -> [u8; NAME_LEN] {
        self.0.map(|l| b'A' + l)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Entry {
    pub name: Name,
    pub score: u32,
}

/// Ranked top-5 list, highest score first. Lives only as long as the
/// program runs.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HighscoreTable {
    entries: [Entry; TABLE_LEN],
}

impl Default for HighscoreTable {
    /// Placeholder tags `AAAA` to `EEEE`, all at zero.
    fn default() -> Self {
        let mut entries = [Entry {
            name: Name::repeated(0),
            score: 0,
        }; TABLE_LEN];
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.name = Name::repeated(i as u8);
        }
        Self { entries }
    }
}

impl HighscoreTable {
    /// Build a table from entries, sorting them highest first.
    pub fn new(mut entries: [Entry; TABLE_LEN]) -> Self {
        entries.sort_unstable_by(|a, b| b.score.cmp(&a.score));
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry; TABLE_LEN] {
        &self.entries
    }

    pub fn score(&self, index: usize) -> u32 {
        self.entries[index].score
    }

    /// Index of the lowest entry, the first one a session has to beat.
    pub const fn last_index() -> usize {
        TABLE_LEN - 1
    }

    /// Insert `score` directly above the last entry it beats, pushing the
    /// lower entries down and dropping the lowest one.
    ///
    /// `target` is the session's current target index (`None` once the top
    /// entry was beaten). It is re-checked against `score` first, so a stale
    /// target still lands the entry in sorted position. Returns the index the
    /// entry was written to, or `None` if it beat nothing.
    pub fn commit(&mut self, name: Name, score: u32, target: Option<usize>) -> Option<usize> {
        let mut target = target.map(|t| t.min(Self::last_index()));
        while let Some(i) = target {
            if self.entries[i].score >= score {
                break;
            }
            target = i.checked_sub(1);
        }

        let slot = target.map_or(0, |i| i + 1);
        if slot >= TABLE_LEN {
            return None;
        }

        self.entries.copy_within(slot..TABLE_LEN - 1, slot + 1);
        self.entries[slot] = Entry { name, score };
        info!("highscore {} stored at rank {}", score, slot);
        Some(slot)
    }
}

/// Score bookkeeping for one session.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ledger {
    score: u32,
    high_score: u32,
    target: Option<usize>,
}

impl Ledger {
    /// Fresh session: zero score, aiming at the lowest table entry.
    pub fn start(table: &HighscoreTable) -> Self {
        let target = HighscoreTable::last_index();
        Self {
            score: 0,
            high_score: table.score(target),
            target: Some(target),
        }
    }

    pub const fn score(&self) -> u32 {
        self.score
    }

    /// The score shown as "high score": the next entry to beat, or the
    /// session score once the whole table is beaten.
    pub const fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Index of the next entry to beat, `None` once the top was exceeded.
    pub const fn target(&self) -> Option<usize> {
        self.target
    }

    pub fn add(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Move the target up past every entry the score now exceeds and
    /// refresh the displayed high score.
    pub fn beat_check(&mut self, table: &HighscoreTable) {
        while let Some(i) = self.target {
            if self.score <= table.score(i) {
                break;
            }
            self.target = i.checked_sub(1);
        }
        self.high_score = match self.target {
            Some(i) => table.score(i),
            None => self.score,
        };
    }

    /// Whether the session beat at least one table entry.
    pub fn qualifies(&self) -> bool {
        self.target != Some(HighscoreTable::last_index())
    }
}

/// State of the name-entry screen: four letter slots and a cursor.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NameEntry {
    letters: [u8; NAME_LEN],
    cursor: usize,
}

impl NameEntry {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn name(&self) -> Name {
        Name::new(self.letters)
    }

    /// Step the letter under the cursor back, `A` wrapping to `Z`.
    pub fn previous_letter(&mut self) {
        let l = &mut self.letters[self.cursor];
        *l = if *l == 0 { ALPHABET_LEN - 1 } else { *l - 1 };
    }

    /// Step the letter under the cursor forward, `Z` wrapping to `A`.
    pub fn next_letter(&mut self) {
        let l = &mut self.letters[self.cursor];
        *l = if *l == ALPHABET_LEN - 1 { 0 } else { *l + 1 };
    }

    /// Move to the next slot, wrapping from the last to the first.
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % NAME_LEN;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn table(scores: [u32; TABLE_LEN]) -> HighscoreTable {
        let mut entries = [Entry {
            name: Name::default(),
            score: 0,
        }; TABLE_LEN];
        for (i, (entry, score)) in entries.iter_mut().zip(scores).enumerate() {
            *entry = Entry {
                name: Name::repeated(i as u8),
                score,
            };
        }
        HighscoreTable::new(entries)
    }

    fn scores(table: &HighscoreTable) -> [u32; TABLE_LEN] {
        table.entries().map(|e| e.score)
    }

    #[test]
    fn default_table_is_placeholder_names_at_zero() {
        let t = HighscoreTable::default();
        assert_eq!(scores(&t), [0; TABLE_LEN]);
        assert_eq!(&t.entries()[4].name.to_ascii(), b"EEEE");
    }

    #[test]
    fn session_starts_aiming_at_the_lowest_entry() {
        let t = table([500, 400, 300, 200, 100]);
        let ledger = Ledger::start(&t);
        assert_eq!(ledger.score(), 0);
        assert_eq!(ledger.target(), Some(4));
        assert_eq!(ledger.high_score(), 100);
        assert!(!ledger.qualifies());
    }

    #[test]
    fn beat_check_stops_at_first_unbeaten_entry() {
        let t = table([500, 400, 300, 200, 100]);
        let mut ledger = Ledger::start(&t);
        ledger.add(250);
        ledger.beat_check(&t);
        assert_eq!(ledger.target(), Some(2));
        assert_eq!(ledger.high_score(), 300);
        assert!(ledger.qualifies());
    }

    #[test]
    fn equal_score_does_not_beat() {
        let t = table([500, 400, 300, 200, 100]);
        let mut ledger = Ledger::start(&t);
        ledger.add(100);
        ledger.beat_check(&t);
        assert_eq!(ledger.target(), Some(4));
    }

    #[test]
    fn beating_the_top_tracks_the_live_score() {
        let t = table([500, 400, 300, 200, 100]);
        let mut ledger = Ledger::start(&t);
        ledger.add(505);
        ledger.beat_check(&t);
        assert_eq!(ledger.target(), None);
        assert_eq!(ledger.high_score(), 505);

        ledger.add(5);
        ledger.beat_check(&t);
        assert_eq!(ledger.high_score(), 510);
    }

    #[test]
    fn commit_inserts_above_last_beaten_entry() {
        let mut t = table([500, 400, 300, 200, 100]);
        let name = Name::parse("AAAA").unwrap();
        assert_eq!(t.commit(name, 350, Some(2)), Some(2));
        assert_eq!(scores(&t), [500, 400, 350, 300, 200]);
        assert_eq!(t.entries()[2].name, name);
        assert_eq!(t.entries().len(), TABLE_LEN);
    }

    #[test]
    fn commit_after_beating_everything_goes_to_the_top() {
        let mut t = table([500, 400, 300, 200, 100]);
        assert_eq!(t.commit(Name::repeated(25), 900, None), Some(0));
        assert_eq!(scores(&t), [900, 500, 400, 300, 200]);
    }

    #[test]
    fn commit_below_the_table_is_dropped() {
        let mut t = table([500, 400, 300, 200, 100]);
        let before = t;
        assert_eq!(t.commit(Name::repeated(1), 50, Some(4)), None);
        assert_eq!(t, before);
    }

    #[test]
    fn name_entry_wraps_letters_and_cursor() {
        let mut entry = NameEntry::default();
        entry.previous_letter();
        assert_eq!(&entry.name().to_ascii(), b"ZAAA");
        entry.next_letter();
        entry.next_letter();
        assert_eq!(&entry.name().to_ascii(), b"BAAA");

        for _ in 0..3 {
            entry.advance();
        }
        assert_eq!(entry.cursor(), 3);
        entry.next_letter();
        entry.advance();
        assert_eq!(entry.cursor(), 0);
        assert_eq!(&entry.name().to_ascii(), b"BAAB");
    }

    #[test]
    fn name_parsing() {
        assert_eq!(Name::parse("abcd").map(|n| n.letters()), Some([0, 1, 2, 3]));
        assert!(Name::parse("AAA_").is_none());
        assert!(Name::parse("ABC").is_none());
    }

    proptest! {
        #[test]
        fn table_stays_sorted(
            start in proptest::array::uniform5(0u32..1000),
            sessions in proptest::collection::vec(0u32..2000, 1..20),
        ) {
            let mut t = table(start);
            for score in sessions {
                let mut ledger = Ledger::start(&t);
                ledger.add(score);
                ledger.beat_check(&t);
                if ledger.qualifies() {
                    prop_assert!(t.commit(Name::default(), score, ledger.target()).is_some());
                }
                let s = scores(&t);
                prop_assert!(s.windows(2).all(|w| w[0] >= w[1]));
            }
        }
    }
}
