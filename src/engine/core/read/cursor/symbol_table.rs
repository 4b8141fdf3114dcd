use std::collections::HashMap;

/// Resolves dictionary keys of a symbol column back to strings.
pub trait SymbolTable: Send + Sync {
    fn value_of(&self, key: i32) -> Option<&str>;

    fn size(&self) -> usize;
}

/// Append-only symbol dictionary; keys are dense and assigned in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct MapSymbolTable {
    values: Vec<String>,
    keys: HashMap<String, i32>,
}

impl MapSymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the key for `value`, assigning a new one if unseen.
    pub fn intern(&mut self, value: &str) -> i32 {
        if let Some(key) = self.keys.get(value) {
            return *key;
        }
        let key = self.values.len() as i32;
        self.values.push(value.to_string());
        self.keys.insert(value.to_string(), key);
        key
    }
}

impl SymbolTable for MapSymbolTable {
    fn value_of(&self, key: i32) -> Option<&str> {
        usize::try_from(key)
            .ok()
            .and_then(|k| self.values.get(k))
            .map(String::as_str)
    }

    fn size(&self) -> usize {
        self.values.len()
    }
}
