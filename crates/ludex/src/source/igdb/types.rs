//! Raw payload schemas for IGDB's `/games` endpoint.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct IgdbGameRaw {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub storyline: Option<String>,
    /// Unix timestamp (seconds).
    pub first_release_date: Option<i64>,
    pub cover: Option<ImageRef>,
    pub rating: Option<f64>,
    pub rating_count: Option<i32>,
    pub aggregated_rating: Option<f64>,
    pub aggregated_rating_count: Option<i32>,
    pub total_rating: Option<f64>,
    pub total_rating_count: Option<i32>,
    pub category: Option<i32>,
    pub status: Option<i32>,
    pub genres: Option<Vec<Named>>,
    pub platforms: Option<Vec<Named>>,
    pub involved_companies: Option<Vec<InvolvedCompany>>,
    pub screenshots: Option<Vec<ImageRef>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageRef {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvolvedCompany {
    pub company: Option<Named>,
    pub developer: Option<bool>,
    pub publisher: Option<bool>,
}
