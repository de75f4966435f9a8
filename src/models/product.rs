//! Product model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use super::record::{price_value, Record, RecordFields};

/// Fields a product flow collects, in prompt order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductField {
    Name,
    Description,
    Price,
    Category,
    Image,
}

impl ProductField {
    pub const ALL: [ProductField; 5] = [
        ProductField::Name,
        ProductField::Description,
        ProductField::Price,
        ProductField::Category,
        ProductField::Image,
    ];

    /// Stored key
    pub fn key(&self) -> &'static str {
        match self {
            ProductField::Name => "nombre",
            ProductField::Description => "descripcion",
            ProductField::Price => "precio",
            ProductField::Category => "categoria",
            ProductField::Image => "imagenUrl",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductField::Name => "Nombre",
            ProductField::Description => "Descripción",
            ProductField::Price => "Precio",
            ProductField::Category => "Categoría",
            ProductField::Image => "Imagen",
        }
    }
}

/// Product values collected so far
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub precio: Option<f64>,
    pub categoria: Option<String>,
    pub imagen_url: Option<String>,
}

impl ProductDraft {
    /// Prefill a draft from a stored product
    pub fn from_record(record: &Record) -> Self {
        Self {
            nombre: record.get_str("nombre").map(str::to_string),
            descripcion: record.get_str("descripcion").map(str::to_string),
            precio: record.get_f64("precio"),
            categoria: record.get_str("categoria").map(str::to_string),
            imagen_url: record.get_str("imagenUrl").map(str::to_string),
        }
    }

    fn value_of(&self, field: ProductField) -> Option<Value> {
        match field {
            ProductField::Name => self.nombre.clone().map(Value::from),
            ProductField::Description => self.descripcion.clone().map(Value::from),
            ProductField::Price => self.precio.map(price_value),
            ProductField::Category => self.categoria.clone().map(Value::from),
            ProductField::Image => self.imagen_url.clone().map(Value::from),
        }
    }

    /// Every collected field
    pub fn to_fields(&self) -> RecordFields {
        self.select(&ProductField::ALL)
    }

    /// Only the given fields, skipping unset ones
    pub fn select(&self, fields: &[ProductField]) -> RecordFields {
        fields
            .iter()
            .filter_map(|field| self.value_of(*field).map(|value| (field.key().to_string(), value)))
            .collect()
    }
}
