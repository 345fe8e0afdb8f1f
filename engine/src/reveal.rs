//! FILENAME: engine/src/reveal.rs
//! PURPOSE: Client-side incremental disclosure of the sorted, filtered list.
//! CONTEXT: Not real pagination. The whole (bounded) page is already in
//! memory; the UI reveals a growing prefix in fixed increments and resets
//! to the first increment whenever the filtered set changes size.

/// Tracks how many of the matched records are currently revealed.
#[derive(Debug, Clone)]
pub struct Reveal {
    step: usize,
    count: usize,
    matched: usize,
}

impl Reveal {
    pub fn new(step: usize) -> Self {
        Reveal {
            step,
            count: 0,
            matched: 0,
        }
    }

    /// Reconciles with the current filtered size. A changed size resets the
    /// reveal back to the first increment.
    pub fn sync(&mut self, matched: usize) {
        if matched != self.matched {
            self.matched = matched;
            self.count = self.step.min(matched);
        }
    }

    /// Reveals one more increment, clamped to the matched size.
    pub fn show_more(&mut self) {
        self.count = (self.count + self.step).min(self.matched);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn has_more(&self) -> bool {
        self.count < self.matched
    }
}

/// Renders a fetched count for display. A page that reached the configured
/// ceiling is reported as "N+" to signal truncation, not an exact count.
pub fn count_label(total: usize, page_size: usize) -> String {
    if page_size > 0 && total >= page_size {
        format!("{}+", page_size)
    } else {
        total.to_string()
    }
}
