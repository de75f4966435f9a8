//! Stored record model

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use chrono::{DateTime, Utc};

/// Key-value payload of a record
pub type RecordFields = Map<String, Value>;

/// Document collections managed by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    #[serde(rename = "productos")]
    Products,
    #[serde(rename = "categorias")]
    Categories,
    #[serde(rename = "publicaciones")]
    Posts,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Products, Collection::Categories, Collection::Posts];

    /// Collection name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Products => "productos",
            Collection::Categories => "categorias",
            Collection::Posts => "publicaciones",
        }
    }

    /// Field used as the human-readable label of a record
    pub fn label_field(&self) -> &'static str {
        match self {
            Collection::Products | Collection::Categories => "nombre",
            Collection::Posts => "titulo",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = crate::utils::errors::ShopAdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "productos" => Ok(Collection::Products),
            "categorias" => Ok(Collection::Categories),
            "publicaciones" => Ok(Collection::Posts),
            other => Err(crate::utils::errors::ShopAdminError::InvalidInput(
                format!("Unknown collection: {}", other)
            )),
        }
    }
}

/// A record as returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub collection: Collection,
    pub fields: RecordFields,
    #[serde(rename = "fechaCreacion")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "fechaActualizacion")]
    pub updated_at: DateTime<Utc>,
}

impl Record {
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64)
    }

    /// Human-readable label of the record (name or title)
    pub fn label(&self) -> &str {
        self.get_str(self.collection.label_field()).unwrap_or("(sin nombre)")
    }
}

/// Encode a price the way it is persisted: integers stay integers.
pub fn price_value(price: f64) -> Value {
    if price.fract() == 0.0 && price.abs() < i64::MAX as f64 {
        Value::from(price as i64)
    } else {
        Value::from(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_names_round_trip() {
        for collection in Collection::ALL {
            assert_eq!(collection.as_str().parse::<Collection>().unwrap(), collection);
        }
        assert!("usuarios".parse::<Collection>().is_err());
    }

    #[test]
    fn test_price_value() {
        assert_eq!(price_value(1200.0), json!(1200));
        assert_eq!(price_value(2990.5), json!(2990.5));
    }

    #[test]
    fn test_record_label() {
        let mut fields = RecordFields::new();
        fields.insert("titulo".to_string(), json!("Oferta"));
        let record = Record {
            id: "1".to_string(),
            collection: Collection::Posts,
            fields,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(record.label(), "Oferta");
    }
}
