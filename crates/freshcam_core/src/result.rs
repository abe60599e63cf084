//! Classification results and the strict parse step that produces them.

use crate::error::ClassifyError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Fallback message when the service reports an error without text.
pub const NO_PREDICTIONS: &str = "No predictions returned.";

/// Ripeness category of the photographed fruit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ripeness {
    Ripe,
    Unripe,
    Overripe,
    Unknown,
}

impl Ripeness {
    /// Case-insensitive match of a service label; anything else is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "ripe" => Ripeness::Ripe,
            "unripe" => Ripeness::Unripe,
            "overripe" => Ripeness::Overripe,
            _ => Ripeness::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Ripeness::Ripe => "ripe",
            Ripeness::Unripe => "unripe",
            Ripeness::Overripe => "overripe",
            Ripeness::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Ripeness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nutrition facts for one serving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub carbs_g: f64,
    pub fiber_g: f64,
    pub protein_g: f64,
    #[serde(default)]
    pub sugar_g: Option<f64>,
    #[serde(default)]
    pub vitamin_c_percent: Option<f64>,
    #[serde(default)]
    pub potassium_mg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalImpact {
    pub carbon_footprint_kg: f64,
    pub water_usage_liters: f64,
    #[serde(default)]
    pub sustainability_rating: Option<String>,
    #[serde(default)]
    pub local_season: Option<String>,
}

/// Shelf life and storage advice, present when recipes were requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodSafety {
    pub is_safe_to_eat: Option<bool>,
    pub days_until_discard: Option<u32>,
    pub storage_tips: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub prep_time: Option<String>,
    #[serde(default)]
    pub cook_time: Option<String>,
    #[serde(default)]
    pub why_this_ripeness: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// A successful verdict. Optional sections are `None` or empty when the
/// service left them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub fruit_name: String,
    pub ripeness: Ripeness,
    /// As reported by the service, nominally 0–100.
    pub confidence_percent: f64,
    pub source: Option<String>,
    pub nutrition: Option<Nutrition>,
    pub health_benefits: Vec<String>,
    pub environmental_impact: Option<EnvironmentalImpact>,
    pub waste_reduction_tip: Option<String>,
    pub safety: Option<FoodSafety>,
    pub recipes: Vec<Recipe>,
}

/// Outcome of one classification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ClassificationResult {
    Success(Classification),
    Failure { message: String },
}

/// Classify a raw response body into success, failure or malformed.
///
/// Only the core fields (`ripeness` as a string, `confidence` as a number)
/// are required. Every other block is dropped when absent or unreadable.
pub fn parse_payload(value: &Value) -> Result<ClassificationResult, ClassifyError> {
    let Some(obj) = value.as_object() else {
        return Err(ClassifyError::Malformed(format!(
            "expected an object, got {}",
            kind_of(value)
        )));
    };

    match obj.get("error") {
        None | Some(Value::Null) => {}
        Some(Value::String(message)) if !message.trim().is_empty() => {
            return Ok(ClassificationResult::Failure {
                message: message.clone(),
            });
        }
        Some(Value::String(_)) => {
            return Ok(ClassificationResult::Failure {
                message: NO_PREDICTIONS.to_string(),
            });
        }
        Some(other) => {
            return Ok(ClassificationResult::Failure {
                message: other.to_string(),
            });
        }
    }

    let ripeness = obj
        .get("ripeness")
        .and_then(Value::as_str)
        .ok_or_else(|| ClassifyError::Malformed("missing ripeness label".into()))?;
    let confidence = obj
        .get("confidence")
        .and_then(Value::as_f64)
        .ok_or_else(|| ClassifyError::Malformed("missing numeric confidence".into()))?;

    let fruit_name = text_field(obj, "fruit_name").unwrap_or_else(|| "unknown".to_string());

    Ok(ClassificationResult::Success(Classification {
        fruit_name,
        ripeness: Ripeness::from_label(ripeness),
        confidence_percent: confidence,
        source: text_field(obj, "source"),
        nutrition: optional_block(obj, "nutrition"),
        health_benefits: string_list(obj, "health_benefits"),
        environmental_impact: optional_block(obj, "environmental_impact"),
        waste_reduction_tip: text_field(obj, "waste_reduction_tip"),
        safety: food_safety(obj),
        recipes: optional_block(obj, "recipes").unwrap_or_default(),
    }))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn optional_block<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    match obj.get(key) {
        None | Some(Value::Null) => None,
        Some(raw) => match T::deserialize(raw) {
            Ok(block) => Some(block),
            Err(e) => {
                tracing::debug!("dropping unreadable {key} block: {e}");
                None
            }
        },
    }
}

fn food_safety(obj: &Map<String, Value>) -> Option<FoodSafety> {
    let safety = FoodSafety {
        is_safe_to_eat: obj.get("is_safe_to_eat").and_then(Value::as_bool),
        days_until_discard: obj
            .get("days_until_discard")
            .and_then(Value::as_u64)
            .and_then(|d| u32::try_from(d).ok()),
        storage_tips: text_field(obj, "storage_tips"),
    };
    if safety == FoodSafety::default() {
        None
    } else {
        Some(safety)
    }
}
