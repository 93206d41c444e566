//! Document structure handed to the index build path.

use serde::{Deserialize, Serialize};

use crate::document::field_value::FieldValue;

/// A document to be indexed.
///
/// A document carries the caller-visible identifier and an ordered list of
/// field values. A field may appear more than once; each occurrence becomes
/// one term of that field.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Document {
    /// The external identifier (e.g. `"list/1"`).
    id: String,
    /// The field values for this document.
    fields: Vec<(String, FieldValue)>,
}

impl Document {
    /// Create a new empty document with the given external identifier.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Document {
            id: id.into(),
            fields: Vec::new(),
        }
    }

    /// The external identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Add a field value to the document.
    pub fn add_field<S: Into<String>>(&mut self, name: S, value: FieldValue) {
        self.fields.push((name.into(), value));
    }

    /// Get the first value of a field.
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.get_field(name).is_some()
    }

    /// All field values in insertion order.
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Get the number of field values.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Create a builder for constructing documents.
    pub fn builder<S: Into<String>>(id: S) -> DocumentBuilder {
        DocumentBuilder::new(id)
    }
}

/// Builder for creating documents.
#[derive(Debug)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new<S: Into<String>>(id: S) -> Self {
        DocumentBuilder {
            document: Document::new(id),
        }
    }

    /// Add a field value.
    pub fn add_field<S: Into<String>>(mut self, name: S, value: FieldValue) -> Self {
        self.document.add_field(name, value);
        self
    }

    /// Add a text field.
    pub fn add_text<S: Into<String>, T: Into<String>>(self, name: S, value: T) -> Self {
        self.add_field(name, FieldValue::Text(value.into()))
    }

    /// Add an integer field.
    pub fn add_integer<S: Into<String>>(self, name: S, value: i64) -> Self {
        self.add_field(name, FieldValue::Integer(value))
    }

    /// Add a float field.
    pub fn add_float<S: Into<String>>(self, name: S, value: f64) -> Self {
        self.add_field(name, FieldValue::Float(value))
    }

    /// Add a boolean field.
    pub fn add_boolean<S: Into<String>>(self, name: S, value: bool) -> Self {
        self.add_field(name, FieldValue::Boolean(value))
    }

    /// Build the document.
    pub fn build(self) -> Document {
        self.document
    }
}
