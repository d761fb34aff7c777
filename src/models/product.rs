use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A catalog entry as returned by the product service.
///
/// Decoding is lenient: every field may be absent and falls back to the
/// same defaults the list view uses (empty strings, price 0, in stock).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, alias = "_id", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
    #[serde(default, deserialize_with = "string_or_number")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "optional_string")]
    pub image: Option<String>,
    #[serde(default = "default_in_stock", deserialize_with = "lenient_bool")]
    pub in_stock: bool,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient_timestamp")]
    pub date_added: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub ingredients: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub benefits: Vec<String>,
}

fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Milliseconds since the epoch used for date sorting; missing dates sort as 0.
    pub fn sort_timestamp(&self) -> i64 {
        self.date_added.map(|d| d.timestamp_millis()).unwrap_or(0)
    }

    pub fn display_price(&self) -> String {
        format!("{:.2}", self.price)
    }

    pub fn display_date(&self) -> String {
        self.date_added
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".into())
    }

    pub fn stock_label(&self) -> &'static str {
        if self.in_stock {
            "In Stock"
        } else {
            "Out of Stock"
        }
    }

    /// Absolute image URL, prefixing relative paths with `image_base_url`.
    pub fn image_url(&self, image_base_url: &str) -> Option<String> {
        let raw = self.image.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        if image_base_url.is_empty()
            || raw.starts_with("http://")
            || raw.starts_with("https://")
            || raw.starts_with("data:")
        {
            return Some(raw.to_string());
        }
        Some(format!("{}/{}", image_base_url, raw.trim_start_matches('/')))
    }
}

/// Raw image file attached to a create or update request.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// The full record sent on create and update. Updates overwrite every field.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub in_stock: bool,
    pub ingredients: Vec<String>,
    pub benefits: Vec<String>,
    pub image: Option<ImageUpload>,
}

impl ProductPayload {
    /// Text fields of the multipart body, in submission order.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("price", self.price.to_string()),
            ("category", self.category.clone()),
            ("inStock", self.in_stock.to_string()),
        ];
        if !self.ingredients.is_empty() {
            fields.push(("ingredients", self.ingredients.join(", ")));
        }
        if !self.benefits.is_empty() {
            fields.push(("benefits", self.benefits.join(", ")));
        }
        fields
    }
}

fn value_to_plain_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref().map(value_to_plain_string).unwrap_or_default())
}

fn optional_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(v.as_ref()
        .map(value_to_plain_string)
        .filter(|s| !s.trim().is_empty()))
}

fn lenient_price<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    let price = match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if price.is_finite() { price } else { 0.0 })
}

fn lenient_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => crate::utils::parse_flag(Some(s.as_str()), true),
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        _ => true,
    })
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::String(s)) => parse_timestamp(&s),
        Some(Value::Number(n)) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn lenient_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let v = Option::<Value>::deserialize(d)?;
    Ok(match v {
        Some(Value::Array(items)) => items
            .iter()
            .map(value_to_plain_string)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) => crate::utils::split_list(&s),
        _ => Vec::new(),
    })
}
