use crate::engine::errors::SampleByError;
use crate::engine::types::ColumnType;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    pub name: String,
    pub column_type: ColumnType,
}

/// Column names and types of a cursor's rows, plus the designated timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordMetadata {
    columns: Vec<ColumnMeta>,
    timestamp_index: Option<usize>,
}

impl RecordMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, name: impl Into<String>, column_type: ColumnType) -> Self {
        self.add_column(name, column_type);
        self
    }

    pub fn add_column(&mut self, name: impl Into<String>, column_type: ColumnType) -> usize {
        self.columns.push(ColumnMeta {
            name: name.into(),
            column_type,
        });
        self.columns.len() - 1
    }

    /// Mark `index` as the designated timestamp. Ignored when the column is not a timestamp.
    pub fn with_timestamp_index(mut self, index: usize) -> Self {
        if self.column_type(index) == Some(ColumnType::Timestamp) {
            self.timestamp_index = Some(index);
        }
        self
    }

    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column_type(&self, index: usize) -> Option<ColumnType> {
        self.columns.get(index).map(|c| c.column_type)
    }

    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|c| c.name.as_str())
    }

    pub fn timestamp_index(&self) -> Option<usize> {
        self.timestamp_index
    }

    /// Parse `name:type[,name:type...]`. The first timestamp column becomes
    /// the designated timestamp.
    pub fn parse_schema(schema: &str) -> Result<Self, SampleByError> {
        let mut metadata = Self::new();
        for part in schema.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, ty) = part
                .split_once(':')
                .ok_or_else(|| SampleByError::InvalidSchema(format!("missing type in {part:?}")))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(SampleByError::InvalidSchema(format!(
                    "missing name in {part:?}"
                )));
            }
            if metadata.column_index(name).is_some() {
                return Err(SampleByError::InvalidSchema(format!(
                    "duplicate column {name}"
                )));
            }
            let column_type = ty
                .trim()
                .parse::<ColumnType>()
                .map_err(|_| SampleByError::InvalidSchema(format!("unknown type {ty:?}")))?;
            let index = metadata.add_column(name, column_type);
            if column_type == ColumnType::Timestamp && metadata.timestamp_index.is_none() {
                metadata.timestamp_index = Some(index);
            }
        }
        if metadata.columns.is_empty() {
            return Err(SampleByError::InvalidSchema("no columns".to_string()));
        }
        Ok(metadata)
    }
}
