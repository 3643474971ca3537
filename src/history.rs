use crate::report::{AnalysisResult, SubjectKind};
use serde::Serialize;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;
const EXCERPT_CHARS: usize = 60;

/// One remembered analysis: what was submitted (truncated) and what
/// came back.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub kind: SubjectKind,
    pub excerpt: String,
    pub result: AnalysisResult,
}

/// Caller-owned ring buffer of recent results, newest first. The
/// analyzers never touch this; it exists purely for the presentation
/// layer's "recent scans" list.
#[derive(Debug)]
pub struct AnalysisHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    next_id: u64,
}

impl Default for AnalysisHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    /// Store a result, evicting the oldest entry once full. Returns the
    /// id assigned to the new entry.
    pub fn record(&mut self, kind: SubjectKind, content: &str, result: AnalysisResult) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        if self.entries.len() == self.capacity {
            self.entries.pop_back();
        }
        self.entries.push_front(HistoryEntry {
            id,
            kind,
            excerpt: excerpt_of(content),
            result,
        });
        id
    }

    /// Entries newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn excerpt_of(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= EXCERPT_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(EXCERPT_CHARS).collect();
        format!("{cut}...")
    }
}
