//! Display model for the result screen. One variant per pipeline state.

use crate::pipeline::PipelineState;
use crate::result::{Classification, Ripeness};

pub const LOADING_MESSAGE: &str = "Analyzing freshness...";
pub const RESULT_TITLE: &str = "Ripeness Result";
pub const TAKE_ANOTHER: &str = "Take Another Photo";

/// Accent used for the ripeness label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Danger,
}

impl Tone {
    pub fn for_ripeness(ripeness: Ripeness) -> Self {
        match ripeness {
            Ripeness::Unripe => Tone::Info,
            Ripeness::Ripe => Tone::Success,
            Ripeness::Overripe | Ripeness::Unknown => Tone::Danger,
        }
    }
}

/// A labelled row inside an optional section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub label: &'static str,
    pub value: String,
}

impl Fact {
    fn new(label: &'static str, value: String) -> Self {
        Self { label, value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    pub name: String,
    /// Difficulty and timings joined with `·`.
    pub subtitle: Option<String>,
    pub why_this_ripeness: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessView {
    pub fruit_name: String,
    /// Upper-cased category, e.g. `RIPE`.
    pub ripeness_label: String,
    pub tone: Tone,
    /// Formatted percentage, e.g. `92%`.
    pub confidence: String,
    /// Which backend path produced the verdict, when reported.
    pub source: Option<String>,
    /// `None` means the section is not drawn at all.
    pub nutrition: Option<Vec<Fact>>,
    pub environmental_impact: Option<Vec<Fact>>,
    pub safety: Option<Vec<Fact>>,
    pub health_benefits: Vec<String>,
    pub waste_reduction_tip: Option<String>,
    pub recipes: Vec<RecipeView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultView {
    Idle,
    Loading { message: &'static str },
    Success(Box<SuccessView>),
    Failed { reason: String },
}

impl ResultView {
    pub fn from_state(state: &PipelineState) -> Self {
        match state {
            PipelineState::Idle => ResultView::Idle,
            PipelineState::Loading => ResultView::Loading {
                message: LOADING_MESSAGE,
            },
            PipelineState::Succeeded(c) => ResultView::Success(Box::new(SuccessView::from(c))),
            PipelineState::Failed(reason) => ResultView::Failed {
                reason: reason.clone(),
            },
        }
    }
}

impl From<&Classification> for SuccessView {
    fn from(c: &Classification) -> Self {
        let nutrition = c.nutrition.as_ref().map(|n| {
            let mut facts = vec![
                Fact::new("Calories", format_amount(n.calories, "kcal")),
                Fact::new("Carbs", format_amount(n.carbs_g, "g")),
                Fact::new("Fiber", format_amount(n.fiber_g, "g")),
                Fact::new("Protein", format_amount(n.protein_g, "g")),
            ];
            if let Some(sugar) = n.sugar_g {
                facts.push(Fact::new("Sugar", format_amount(sugar, "g")));
            }
            if let Some(vc) = n.vitamin_c_percent {
                facts.push(Fact::new("Vitamin C", format_percent(vc)));
            }
            if let Some(k) = n.potassium_mg {
                facts.push(Fact::new("Potassium", format_amount(k, "mg")));
            }
            facts
        });

        let environmental_impact = c.environmental_impact.as_ref().map(|e| {
            let mut facts = vec![
                Fact::new("Carbon footprint", format_amount(e.carbon_footprint_kg, "kg CO2")),
                Fact::new("Water usage", format_amount(e.water_usage_liters, "L")),
            ];
            if let Some(rating) = &e.sustainability_rating {
                facts.push(Fact::new("Sustainability", rating.clone()));
            }
            if let Some(season) = &e.local_season {
                facts.push(Fact::new("Season", season.clone()));
            }
            facts
        });

        let safety = c.safety.as_ref().map(|s| {
            let mut facts = Vec::new();
            if let Some(safe) = s.is_safe_to_eat {
                let value = if safe { "Yes" } else { "No" };
                facts.push(Fact::new("Safe to eat", value.to_string()));
            }
            if let Some(days) = s.days_until_discard {
                facts.push(Fact::new("Use within", format!("{days} days")));
            }
            if let Some(tips) = &s.storage_tips {
                facts.push(Fact::new("Storage", tips.clone()));
            }
            facts
        });

        let recipes = c
            .recipes
            .iter()
            .map(|r| {
                let parts: Vec<&str> = [
                    r.difficulty.as_deref(),
                    r.prep_time.as_deref(),
                    r.cook_time.as_deref(),
                ]
                .into_iter()
                .flatten()
                .collect();
                RecipeView {
                    name: r.name.clone(),
                    subtitle: (!parts.is_empty()).then(|| parts.join(" · ")),
                    why_this_ripeness: r.why_this_ripeness.clone(),
                    ingredients: r.ingredients.clone(),
                    instructions: r.instructions.clone(),
                }
            })
            .collect();

        SuccessView {
            fruit_name: c.fruit_name.clone(),
            ripeness_label: c.ripeness.as_str().to_uppercase(),
            tone: Tone::for_ripeness(c.ripeness),
            confidence: format_percent(c.confidence_percent),
            source: c.source.clone(),
            nutrition,
            environmental_impact,
            safety,
            health_benefits: c.health_benefits.clone(),
            waste_reduction_tip: c.waste_reduction_tip.clone(),
            recipes,
        }
    }
}

/// `92` → `92%`, `92.5` → `92.5%`.
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_number(value))
}

fn format_amount(value: f64, unit: &str) -> String {
    format!("{} {unit}", format_number(value))
}

/// One decimal at most; values that round to a whole number drop it.
fn format_number(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.0}")
    } else {
        format!("{rounded:.1}")
    }
}
