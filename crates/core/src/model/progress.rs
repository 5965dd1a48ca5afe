use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::model::ids::{ChapterIndex, LevelNumber};

/// Target of the unlock transition that follows a completed level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unlock {
    pub chapter: ChapterIndex,
    pub level: LevelNumber,
    /// False when the target was already unlocked before the transition.
    pub newly_unlocked: bool,
}

/// Unlocked levels per chapter.
///
/// Serializes as `{"0": [1, 2], "1": []}`. Levels only ever get added during
/// play; the map is replaced wholesale by reset or import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressMap {
    chapters: BTreeMap<ChapterIndex, BTreeSet<LevelNumber>>,
}

impl ProgressMap {
    /// Fresh progress for a bank with `chapter_count` chapters: every chapter
    /// present and empty, except chapter 0 which starts with level 1.
    #[must_use]
    pub fn initialized(chapter_count: u32) -> Self {
        let mut chapters: BTreeMap<_, _> = (0..chapter_count)
            .map(|idx| (ChapterIndex::new(idx), BTreeSet::new()))
            .collect();
        chapters
            .entry(ChapterIndex::FIRST)
            .or_default()
            .insert(LevelNumber::FIRST);
        Self { chapters }
    }

    /// True when no chapter entries exist at all (first run or cleared).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    #[must_use]
    pub fn is_unlocked(&self, chapter: ChapterIndex, level: LevelNumber) -> bool {
        self.chapters
            .get(&chapter)
            .is_some_and(|levels| levels.contains(&level))
    }

    #[must_use]
    pub fn is_chapter_unlocked(&self, chapter: ChapterIndex) -> bool {
        self.chapters
            .get(&chapter)
            .is_some_and(|levels| !levels.is_empty())
    }

    pub fn unlocked_levels(&self, chapter: ChapterIndex) -> impl Iterator<Item = LevelNumber> + '_ {
        self.chapters
            .get(&chapter)
            .into_iter()
            .flat_map(|levels| levels.iter().copied())
    }

    pub fn chapters(&self) -> impl Iterator<Item = ChapterIndex> + '_ {
        self.chapters.keys().copied()
    }

    /// Unlock a single level. Returns true if it was not unlocked before.
    pub fn unlock(&mut self, chapter: ChapterIndex, level: LevelNumber) -> bool {
        self.chapters.entry(chapter).or_default().insert(level)
    }

    /// Apply the transition for completing `level` of `chapter`.
    ///
    /// Levels below the last unlock the next level of the same chapter. The
    /// last level unlocks level 1 of the next chapter, unless `chapter` is the
    /// final one of a bank with `chapter_count` chapters.
    pub fn complete_level(
        &mut self,
        chapter: ChapterIndex,
        level: LevelNumber,
        chapter_count: u32,
    ) -> Option<Unlock> {
        self.chapters.entry(chapter).or_default();

        let (target_chapter, target_level) = match level.next() {
            Some(next) => (chapter, next),
            None if chapter.value().saturating_add(1) < chapter_count => {
                (chapter.next(), LevelNumber::FIRST)
            }
            None => return None,
        };

        let newly_unlocked = self.unlock(target_chapter, target_level);
        Some(Unlock {
            chapter: target_chapter,
            level: target_level,
            newly_unlocked,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lv(value: u8) -> LevelNumber {
        LevelNumber::new(value).unwrap()
    }

    #[test]
    fn initialized_unlocks_only_first_level_of_first_chapter() {
        let map = ProgressMap::initialized(3);
        assert!(map.is_unlocked(ChapterIndex::new(0), lv(1)));
        assert!(!map.is_unlocked(ChapterIndex::new(0), lv(2)));
        assert!(!map.is_chapter_unlocked(ChapterIndex::new(1)));
        assert_eq!(map.chapters().count(), 3);
    }

    #[test]
    fn initialized_with_no_chapters_still_has_chapter_zero() {
        let map = ProgressMap::initialized(0);
        assert!(map.is_unlocked(ChapterIndex::FIRST, LevelNumber::FIRST));
    }

    #[test]
    fn completing_a_level_unlocks_the_next_once() {
        let mut map = ProgressMap::initialized(2);
        let unlock = map.complete_level(ChapterIndex::new(0), lv(1), 2).unwrap();
        assert_eq!(unlock.level, lv(2));
        assert!(unlock.newly_unlocked);

        let again = map.complete_level(ChapterIndex::new(0), lv(1), 2).unwrap();
        assert!(!again.newly_unlocked);
        assert_eq!(map.unlocked_levels(ChapterIndex::new(0)).count(), 2);
    }

    #[test]
    fn completing_last_level_opens_next_chapter() {
        let mut map = ProgressMap::initialized(2);
        let unlock = map.complete_level(ChapterIndex::new(0), lv(10), 2).unwrap();
        assert_eq!(unlock.chapter, ChapterIndex::new(1));
        assert_eq!(unlock.level, LevelNumber::FIRST);
        assert!(map.is_chapter_unlocked(ChapterIndex::new(1)));
    }

    #[test]
    fn completing_last_level_of_final_chapter_unlocks_nothing() {
        let mut map = ProgressMap::initialized(2);
        let before = map.clone();
        assert!(map.complete_level(ChapterIndex::new(1), lv(10), 2).is_none());
        assert!(!map.is_chapter_unlocked(ChapterIndex::new(2)));
        assert_eq!(map, before);
    }

    #[test]
    fn unlocking_is_monotonic() {
        let mut map = ProgressMap::initialized(3);
        for level in LevelNumber::all() {
            map.complete_level(ChapterIndex::new(0), level, 3);
            assert!(map.is_unlocked(ChapterIndex::new(0), LevelNumber::FIRST));
        }
        assert_eq!(map.unlocked_levels(ChapterIndex::new(0)).count(), 10);
        assert!(map.is_unlocked(ChapterIndex::new(1), LevelNumber::FIRST));
    }

    #[test]
    fn serializes_as_chapter_keyed_object() {
        let mut map = ProgressMap::initialized(2);
        map.unlock(ChapterIndex::new(0), lv(2));
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"0":[1,2],"1":[]}"#);

        let back: ProgressMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
