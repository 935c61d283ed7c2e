use super::{
    models::Record,
    ImportError,
};

/// Navigation widget state derived from a `RecordStore`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavState {
    pub visible: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub label: String,
}

/// The records of the last successful import and the one currently shown.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    position: usize,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored records and moves to the first one.
    pub fn load(&mut self, records: Vec<Record>) -> Result<(), ImportError> {
        if records.is_empty() {
            return Err(ImportError::EmptyImport);
        }
        self.records = records;
        self.position = 0;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.position = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn position(&self) -> Option<usize> {
        (!self.records.is_empty()).then_some(self.position)
    }

    pub fn current(&self) -> Option<&Record> {
        self.records.get(self.position)
    }

    pub fn has_next(&self) -> bool {
        self.position + 1 < self.records.len()
    }

    pub fn has_prev(&self) -> bool {
        !self.records.is_empty() && self.position > 0
    }

    /// Moves forward one record. Returns false at the last record.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.position += 1;
        true
    }

    /// Moves back one record. Returns false at the first record.
    pub fn prev(&mut self) -> bool {
        if !self.has_prev() {
            return false;
        }
        self.position -= 1;
        true
    }

    /// 1-based index and total.
    pub fn position_label(&self) -> Option<(usize, usize)> {
        self.position().map(|p| (p + 1, self.records.len()))
    }

    pub fn nav_state(&self) -> NavState {
        match self.position_label() {
            Some((index, total)) => NavState {
                visible: true,
                prev_enabled: self.has_prev(),
                next_enabled: self.has_next(),
                label: format!("Record {} of {}", index, total),
            },
            None => NavState::default(),
        }
    }
}
