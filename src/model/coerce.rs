//! Coercion of `"class"`-tagged model values into named shapes.
//!
//! A model property such as
//!
//! ```json
//! { "price": { "class": "Money", "amount": 12.5, "currency": "EUR" } }
//! ```
//!
//! is decoded as the registered `Money` shape and re-encoded without its
//! tag, normalised and with derived fields filled in. Tags are matched on
//! their last `.`-separated segment, case-insensitively, so qualified names
//! like `com.example.Money` resolve too.
//!
//! Coercion is best effort: unknown tags and values that do not fit their
//! shape are kept unchanged and reported as diagnostics.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Diagnostic, Model, Resolved};

/// Reserved key carrying the shape tag.
pub const CLASS_KEY: &str = "class";

type Decoder = fn(Value) -> Result<Value, String>;

/// Hyperlink.
#[derive(Debug, Deserialize, Serialize)]
pub struct Link {
    pub href: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// Image reference.
#[derive(Debug, Deserialize, Serialize)]
pub struct Image {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Monetary amount; gains a `formatted` field.
#[derive(Debug, Deserialize, Serialize)]
pub struct Money {
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub formatted: String,
}

/// Calendar date; gains an ISO-8601 `iso` field.
#[derive(Debug, Deserialize, Serialize)]
pub struct Date {
    pub year: i32,
    pub month: u8,
    pub day: u8,
    #[serde(default)]
    pub iso: String,
}

fn decode<T: DeserializeOwned + Serialize>(
    value: Value,
    normalize: fn(T) -> Result<T, String>,
) -> Result<Value, String> {
    let shape: T = serde_json::from_value(value).map_err(|e| e.to_string())?;
    let shape = normalize(shape)?;
    serde_json::to_value(shape).map_err(|e| e.to_string())
}

fn decode_link(value: Value) -> Result<Value, String> {
    decode::<Link>(value, |mut link| {
        if link.text.is_none() {
            link.text = Some(link.href.clone());
        }
        Ok(link)
    })
}

fn decode_image(value: Value) -> Result<Value, String> {
    decode::<Image>(value, Ok)
}

fn decode_money(value: Value) -> Result<Value, String> {
    decode::<Money>(value, |mut money| {
        if money.currency.len() != 3 {
            return Err(format!("invalid currency code '{}'", money.currency));
        }
        money.currency = money.currency.to_uppercase();
        money.formatted = format!("{:.2} {}", money.amount, money.currency);
        Ok(money)
    })
}

fn decode_date(value: Value) -> Result<Value, String> {
    decode::<Date>(value, |mut date| {
        let days = match date.month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if date.year % 4 == 0 && (date.year % 100 != 0 || date.year % 400 == 0) => 29,
            2 => 28,
            m => return Err(format!("invalid month {m}")),
        };
        if date.day == 0 || date.day > days {
            return Err(format!("invalid day {} for month {}", date.day, date.month));
        }
        date.iso = format!("{:04}-{:02}-{:02}", date.year, date.month, date.day);
        Ok(date)
    })
}

/// Closed set of shapes a `"class"` tag may name.
#[derive(Debug, Clone)]
pub struct ShapeRegistry {
    decoders: HashMap<String, Decoder>,
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("link", decode_link);
        registry.register("image", decode_image);
        registry.register("money", decode_money);
        registry.register("date", decode_date);
        registry
    }
}

impl ShapeRegistry {
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    pub fn register(&mut self, tag: &str, decoder: Decoder) {
        self.decoders.insert(tag.to_ascii_lowercase(), decoder);
    }

    fn lookup(&self, class: &str) -> Option<Decoder> {
        let simple = class.rsplit('.').next().unwrap_or(class);
        self.decoders.get(&simple.to_ascii_lowercase()).copied()
    }

    /// Coerce every tagged property of `model`; untagged values pass through.
    pub fn process_model(&self, model: &Model) -> Resolved<Model> {
        let mut result = Model::new();
        let mut diagnostics = Vec::new();

        for (key, value) in model {
            let coerced = match value {
                Value::Object(object) => match object.get(CLASS_KEY).and_then(Value::as_str) {
                    Some(class) => self.coerce(key, class, object, &mut diagnostics),
                    None => None,
                },
                _ => None,
            };
            result.insert(key.clone(), coerced.unwrap_or_else(|| value.clone()));
        }

        Resolved {
            value: result,
            diagnostics,
        }
    }

    fn coerce(
        &self,
        key: &str,
        class: &str,
        object: &Model,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Value> {
        let Some(decoder) = self.lookup(class) else {
            diagnostics.push(Diagnostic::UnknownClass {
                key: key.to_string(),
                class: class.to_string(),
            });
            return None;
        };

        let mut data = object.clone();
        data.remove(CLASS_KEY);
        match decoder(Value::Object(data)) {
            Ok(value) => {
                tracing::debug!(property = %key, class = %class, "Coerced model property");
                Some(value)
            }
            Err(error) => {
                diagnostics.push(Diagnostic::Coercion {
                    key: key.to_string(),
                    class: class.to_string(),
                    error,
                });
                None
            }
        }
    }
}
