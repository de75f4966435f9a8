//! Post model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use super::record::{Record, RecordFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostField {
    Title,
    Content,
}

impl PostField {
    pub const ALL: [PostField; 2] = [PostField::Title, PostField::Content];

    pub fn key(&self) -> &'static str {
        match self {
            PostField::Title => "titulo",
            PostField::Content => "contenido",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PostField::Title => "Título",
            PostField::Content => "Contenido",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostDraft {
    pub titulo: Option<String>,
    pub contenido: Option<String>,
}

impl PostDraft {
    pub fn from_record(record: &Record) -> Self {
        Self {
            titulo: record.get_str("titulo").map(str::to_string),
            contenido: record.get_str("contenido").map(str::to_string),
        }
    }

    pub fn to_fields(&self) -> RecordFields {
        self.select(&PostField::ALL)
    }

    pub fn select(&self, fields: &[PostField]) -> RecordFields {
        fields
            .iter()
            .filter_map(|field| {
                let value = match field {
                    PostField::Title => self.titulo.clone(),
                    PostField::Content => self.contenido.clone(),
                };
                value.map(|v| (field.key().to_string(), Value::from(v)))
            })
            .collect()
    }
}
