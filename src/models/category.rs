//! Category model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use super::record::{Record, RecordFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryField {
    Name,
    Description,
}

impl CategoryField {
    pub const ALL: [CategoryField; 2] = [CategoryField::Name, CategoryField::Description];

    pub fn key(&self) -> &'static str {
        match self {
            CategoryField::Name => "nombre",
            CategoryField::Description => "descripcion",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryField::Name => "Nombre",
            CategoryField::Description => "Descripción",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
}

impl CategoryDraft {
    pub fn from_record(record: &Record) -> Self {
        Self {
            nombre: record.get_str("nombre").map(str::to_string),
            descripcion: record.get_str("descripcion").map(str::to_string),
        }
    }

    pub fn to_fields(&self) -> RecordFields {
        self.select(&CategoryField::ALL)
    }

    pub fn select(&self, fields: &[CategoryField]) -> RecordFields {
        fields
            .iter()
            .filter_map(|field| {
                let value = match field {
                    CategoryField::Name => self.nombre.clone(),
                    CategoryField::Description => self.descripcion.clone(),
                };
                value.map(|v| (field.key().to_string(), Value::from(v)))
            })
            .collect()
    }
}
