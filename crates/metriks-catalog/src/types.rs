//! Wire types for the catalog search endpoint.
//!
//! ## Observed shapes
//!
//! The endpoint answers either `{ "products": [...] }` or a bare JSON array;
//! both are accepted. Any other top-level value is rejected as malformed.
//!
//! Product entries come from several backends and disagree on field names:
//! - identifier: `id` or the legacy `masterproductid` (string or number)
//! - name: `name` or `productname`
//! - retailer: `retailerLabel`, `storename` or `retailer`
//! - price: `unitPrice` or `price`, as a number or a numeric string
//! - image: `imageRef`, `image_url` or `imageurl`; relative paths are unusable
//! - distance: `distanceKm` or `distance_km`, nearby searches only
//!
//! Each name is a separate field so that payloads carrying two spellings at
//! once still parse. Entries are parsed one at a time; a bad entry is dropped
//! without failing the page.

use serde::Deserialize;
use serde_json::Value;

/// Body of a non-2xx response, when the service sends one.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A single product entry as sent by the catalog.
#[derive(Debug, Default, Deserialize)]
pub struct RawProduct {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub masterproductid: Option<Value>,

    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub productname: Option<String>,

    #[serde(default, rename = "retailerLabel")]
    pub retailer_label: Option<String>,
    #[serde(default)]
    pub storename: Option<String>,
    #[serde(default)]
    pub retailer: Option<String>,

    #[serde(default, rename = "unitPrice")]
    pub unit_price: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,

    #[serde(default, rename = "imageRef")]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub imageurl: Option<String>,

    #[serde(default, rename = "distanceKm")]
    pub distance_km: Option<f64>,
    #[serde(default, rename = "distance_km")]
    pub distance_km_snake: Option<f64>,
}

/// Pulls the product entries out of either accepted top-level shape.
///
/// # Errors
///
/// Returns a description of the shape when the value is neither an array
/// nor an object with a `products` array.
pub fn product_entries(body: Value) -> Result<Vec<Value>, String> {
    match body {
        Value::Array(entries) => Ok(entries),
        Value::Object(mut map) => match map.remove("products") {
            Some(Value::Array(entries)) => Ok(entries),
            Some(other) => Err(format!(
                "\"products\" is {} instead of an array",
                json_type_name(&other)
            )),
            None => Err("object has no \"products\" field".to_owned()),
        },
        other => Err(format!(
            "top-level value is {} instead of an array or object",
            json_type_name(&other)
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
