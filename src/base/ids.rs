//! Identifiers for scan batches and discovered files.

use std::fmt;

/// Identifies one `scan()` invocation on a generator.
///
/// Batch ids are handed out in increasing order, so comparing two of them
/// tells which batch ran later. Conflict resolution depends on this: within
/// one batch the first occurrence wins, across batches the later one does.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct BatchId(u32);

impl BatchId {
    /// Create a BatchId from a raw index.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// The id the following batch will receive.
    #[inline]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Debug for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BatchId({})", self.0)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch#{}", self.0)
    }
}

/// Discovery index of a file inside one batch.
///
/// Files are folded into the map in ascending `FileId` order, which keeps
/// the result reproducible even when extraction runs in parallel.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileId(pub u32);

impl FileId {
    /// Create a new FileId from a raw index.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

impl From<u32> for FileId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_ordering() {
        let first = BatchId::new(0);
        let second = first.next();

        assert!(second > first);
        assert_eq!(second.index(), 1);
    }

    #[test]
    fn test_batch_display() {
        assert_eq!(format!("{}", BatchId::new(3)), "batch#3");
        assert_eq!(format!("{:?}", BatchId::new(3)), "BatchId(3)");
    }

    #[test]
    fn test_file_id_sorts_by_discovery() {
        let mut ids = vec![FileId::new(2), FileId::new(0), FileId::new(1)];
        ids.sort();

        assert_eq!(ids, vec![FileId::new(0), FileId::new(1), FileId::new(2)]);
    }

    #[test]
    fn test_file_id_size() {
        assert_eq!(std::mem::size_of::<FileId>(), 4);
    }
}
