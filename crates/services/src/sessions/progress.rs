/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// Share of the question set already behind the player, 0-100.
    #[must_use]
    pub fn percent_done(&self) -> u8 {
        let answered = u32::try_from(self.answered).unwrap_or(u32::MAX);
        let total = u32::try_from(self.total).unwrap_or(u32::MAX);
        quiz_core::model::percent(answered, total)
    }
}
