//! Text renderings of ranked recommendations.
//!
//! Missing slots (fewer neighbors than `k`) render as empty strings in the
//! slot-based styles, so every line of a run has the same shape.

use std::fmt;
use std::str::FromStr;

use crate::core::PhiSpace;
use crate::errors::PhiError;
use crate::ranking::Recommendation;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputStyle {
    /// `A : B, C`
    #[default]
    List,
    /// `Customers Who Bought A also Bought: B and C`
    Sentence,
    /// `A : B (1.00), C (0.50)`
    Scores,
    /// JSON array of all recommendations
    Json,
}

impl FromStr for OutputStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "list" => Ok(OutputStyle::List),
            "sentence" => Ok(OutputStyle::Sentence),
            "scores" => Ok(OutputStyle::Scores),
            "json" => Ok(OutputStyle::Json),
            other => Err(format!(
                "unknown output style '{}', expected list, sentence, scores or json",
                other
            )),
        }
    }
}

impl fmt::Display for OutputStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputStyle::List => "list",
            OutputStyle::Sentence => "sentence",
            OutputStyle::Scores => "scores",
            OutputStyle::Json => "json",
        };
        write!(f, "{}", name)
    }
}

fn slot_names(rec: &Recommendation) -> Vec<&str> {
    rec.slots()
        .into_iter()
        .map(|slot| slot.map(|n| n.item.as_str()).unwrap_or(""))
        .collect()
}

/// `A : B, C`
pub fn render_list(rec: &Recommendation) -> String {
    format!("{} : {}", rec.item, slot_names(rec).join(", "))
}

/// `Customers Who Bought A also Bought: B and C`
///
/// With more than two slots the leading ones are comma separated.
pub fn render_sentence(rec: &Recommendation) -> String {
    let names = slot_names(rec);
    let joined = match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.to_string(),
        Some((last, head)) => format!("{} and {}", head.join(", "), last),
    };
    format!("Customers Who Bought {} also Bought: {}", rec.item, joined)
}

/// `A : B (1.00), C (0.50)`, available neighbors only.
pub fn render_scores(rec: &Recommendation, decimals: u32) -> String {
    let parts: Vec<String> = rec
        .neighbors
        .iter()
        .map(|n| format!("{} ({:.*})", n.item, decimals as usize, n.phi))
        .collect();
    format!("{} : {}", rec.item, parts.join(", "))
}

/// Render one recommendation in a line-based style.
///
/// `OutputStyle::Json` only applies to a whole run and is rejected here, use
/// [`render_space`].
pub fn render(
    rec: &Recommendation,
    style: OutputStyle,
    decimals: u32,
) -> Result<String, PhiError> {
    match style {
        OutputStyle::List => Ok(render_list(rec)),
        OutputStyle::Sentence => Ok(render_sentence(rec)),
        OutputStyle::Scores => Ok(render_scores(rec, decimals)),
        OutputStyle::Json => Err(PhiError::invalid_config(
            "style",
            style,
            "json renders a whole run, use render_space",
        )),
    }
}

/// Render a whole run. Items without neighbors are skipped unless
/// `include_empty` is set.
pub fn render_space(
    space: &PhiSpace,
    style: OutputStyle,
    include_empty: bool,
) -> Result<Vec<String>, PhiError> {
    let selected: Vec<&Recommendation> = space
        .iter()
        .filter(|r| include_empty || !r.is_empty())
        .collect();

    match style {
        OutputStyle::Json => Ok(vec![serde_json::to_string_pretty(&selected)?]),
        _ => selected
            .into_iter()
            .map(|r| render(r, style, space.params().decimals))
            .collect(),
    }
}
