use crate::engine::types::ColumnType;

/// Null marker for long and timestamp slots.
pub const LONG_NULL: i64 = i64::MIN;

/// Slot types of an aggregate state buffer, in allocation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueLayout {
    types: Vec<ColumnType>,
}

impl ValueLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve one slot and return its index.
    pub fn add(&mut self, column_type: ColumnType) -> usize {
        self.types.push(column_type);
        self.types.len() - 1
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn column_type(&self, index: usize) -> Option<ColumnType> {
        self.types.get(index).copied()
    }
}

/// Fixed-size scratch buffer holding the aggregate state of one group.
///
/// Every slot is 64 bits wide and read either as a long or as a double.
/// Nulls are `LONG_NULL` for long slots and NaN for double slots.
#[derive(Debug, Clone)]
pub struct SimpleMapValue {
    slots: Vec<u64>,
    layout: ValueLayout,
}

impl SimpleMapValue {
    pub fn new(layout: &ValueLayout) -> Self {
        let mut value = Self {
            slots: vec![0; layout.len()],
            layout: layout.clone(),
        };
        value.clear();
        value
    }

    /// Reset every slot to null.
    pub fn clear(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            *slot = match self.layout.column_type(i) {
                Some(ColumnType::Double) => f64::NAN.to_bits(),
                _ => LONG_NULL as u64,
            };
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn get_long(&self, index: usize) -> i64 {
        self.slots[index] as i64
    }

    #[inline]
    pub fn put_long(&mut self, index: usize, value: i64) {
        self.slots[index] = value as u64;
    }

    #[inline]
    pub fn add_long(&mut self, index: usize, delta: i64) {
        let current = self.get_long(index);
        self.put_long(index, current.wrapping_add(delta));
    }

    /// Add without wrapping. Results clamp to `i64::MAX` above and to
    /// `LONG_NULL + 1` below, so a sum never reads back as null.
    #[inline]
    pub fn saturating_add_long(&mut self, index: usize, delta: i64) {
        let current = self.get_long(index);
        let sum = current.saturating_add(delta).max(LONG_NULL + 1);
        self.put_long(index, sum);
    }

    #[inline]
    pub fn get_double(&self, index: usize) -> f64 {
        f64::from_bits(self.slots[index])
    }

    #[inline]
    pub fn put_double(&mut self, index: usize, value: f64) {
        self.slots[index] = value.to_bits();
    }

    #[inline]
    pub fn add_double(&mut self, index: usize, delta: f64) {
        let current = self.get_double(index);
        self.put_double(index, current + delta);
    }
}
