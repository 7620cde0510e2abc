//! Tile index built while streaming tiles into a container.

/// Location of one compressed tile inside a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRecord {
    /// `"{level}_{row}_{column}"`.
    pub coordinate_key: String,
    /// File name of the container holding the tile.
    pub container_name: String,
    /// Offset of the first byte of the gzip member.
    pub start_offset: u64,
    /// Length of the gzip member in bytes.
    pub byte_size: u64,
}

impl TileRecord {
    /// One past the last byte of this record.
    pub fn end_offset(&self) -> u64 {
        self.start_offset + self.byte_size
    }
}

/// Ordered set of [`TileRecord`]s for one image, in container append order.
///
/// Records are only ever appended at the current end of the container, so
/// byte ranges are disjoint and contiguous by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileIndex {
    records: Vec<TileRecord>,
}

impl TileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a payload of `byte_size` bytes appended at the current end.
    pub fn append(
        &mut self,
        coordinate_key: impl Into<String>,
        container_name: impl Into<String>,
        byte_size: u64,
    ) -> &TileRecord {
        let start_offset = self.total_bytes();
        self.records.push(TileRecord {
            coordinate_key: coordinate_key.into(),
            container_name: container_name.into(),
            start_offset,
            byte_size,
        });
        &self.records[self.records.len() - 1]
    }

    /// Total bytes covered, which equals the container length.
    pub fn total_bytes(&self) -> u64 {
        self.records.last().map_or(0, TileRecord::end_offset)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TileRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TileRecord> {
        self.records.iter()
    }

    /// Look up a record by coordinate key.
    pub fn get(&self, coordinate_key: &str) -> Option<&TileRecord> {
        self.records
            .iter()
            .find(|r| r.coordinate_key == coordinate_key)
    }
}

impl<'a> IntoIterator for &'a TileIndex {
    type Item = &'a TileRecord;
    type IntoIter = std::slice::Iter<'a, TileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
