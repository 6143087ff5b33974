//! Turning exported photo documents into gallery cards.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::gallery::ImageCard;

const SPANISH_MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// An astrophoto document as the site exports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub image_url: String,
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = value.parse::<NaiveDateTime>() {
        return Some(dt.date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// `YYYY-MM-DD`, the prefix-comparable form the date filter works on.
pub fn iso_date(value: Option<&str>) -> String {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return String::new();
    };
    match parse_date(value) {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => value.split('T').next().unwrap_or_default().to_owned(),
    }
}

/// Long Spanish form, e.g. `05 de marzo de 2024`.
///
/// Values that do not parse as a date are shown as given.
pub fn spanish_date(value: Option<&str>) -> String {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return String::new();
    };
    match parse_date(value) {
        Some(date) => format!(
            "{:02} de {} de {}",
            date.day(),
            SPANISH_MONTHS[date.month0() as usize],
            date.year()
        ),
        None => value.to_owned(),
    }
}

impl ImageCard {
    pub fn from_record(record: &PhotoRecord) -> Self {
        let uploaded_at = record.uploaded_at.as_deref();
        let mut card = ImageCard::new(
            record.author.as_deref().unwrap_or_default().trim(),
            iso_date(uploaded_at),
            record.image_url.clone(),
        );
        card.id = record.id.clone();
        card.name = record.name.clone();
        card.display_date = spanish_date(uploaded_at);
        card
    }
}

/// Distinct, sorted, non-empty authors for the author filter's options.
pub fn author_options(cards: &[ImageCard]) -> Vec<String> {
    let mut authors: Vec<String> = cards
        .iter()
        .map(|card| card.author.trim())
        .filter(|author| !author.is_empty())
        .map(str::to_owned)
        .collect();
    authors.sort();
    authors.dedup();
    authors
}
