//! Racquet label projection and QR payload.
//!
//! A label is a flat, printable view of one job. Sections the caller opts
//! out of are left as `None` so they serialize as `null`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::tension::format_tension;
use crate::types::{DbId, Timestamp};

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Which label sections to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelOptions {
    pub player: bool,
    pub racquet: bool,
    pub strings: bool,
    pub tension: bool,
    pub date: bool,
    pub logo: bool,
    pub qr_code: bool,
    pub size: LabelSize,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            player: true,
            racquet: true,
            strings: true,
            tension: true,
            date: true,
            logo: true,
            qr_code: true,
            size: LabelSize::Medium,
        }
    }
}

/// Brand and model of a racquet or string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandModel {
    pub id: DbId,
    pub brand: String,
    pub model: String,
}

impl BrandModel {
    fn display(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

/// The job data a label is rendered from.
#[derive(Debug, Clone)]
pub struct LabelSource {
    pub job_id: DbId,
    pub player_name: String,
    pub player_last_name: String,
    pub racquet: BrandModel,
    pub main_string: Option<BrandModel>,
    pub cross_string: Option<BrandModel>,
    pub main_tension: f64,
    pub cross_tension: Option<f64>,
    pub is_tension_in_kg: bool,
    pub logo: Option<String>,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl LabelSource {
    /// Completion date if finished, otherwise the intake date.
    pub fn label_date(&self) -> String {
        self.completed_at
            .unwrap_or(self.created_at)
            .format("%Y-%m-%d")
            .to_string()
    }

    pub fn tension_text(&self) -> String {
        format_tension(self.main_tension, self.cross_tension, self.is_tension_in_kg)
    }

    /// Cross string to print, unless it is missing or the same as the main.
    fn distinct_cross(&self) -> Option<&BrandModel> {
        self.cross_string.as_ref().filter(|cross| {
            self.main_string
                .as_ref()
                .map_or(true, |main| main.id != cross.id)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct QrPayload {
    id: DbId,
    player: String,
    racquet: String,
    main_string: String,
    cross_string: Option<String>,
    tension: String,
    date: String,
}

/// Compact JSON blob encoded into the label's QR code.
pub fn qr_code_data(source: &LabelSource) -> Result<String, CoreError> {
    let payload = QrPayload {
        id: source.job_id,
        player: format!("{} {}", source.player_name, source.player_last_name),
        racquet: source.racquet.display(),
        main_string: source
            .main_string
            .as_ref()
            .map_or_else(|| UNKNOWN.to_string(), BrandModel::display),
        cross_string: source.distinct_cross().map(BrandModel::display),
        tension: source.tension_text(),
        date: source.label_date(),
    };
    serde_json::to_string(&payload)
        .map_err(|e| CoreError::Internal(format!("Failed to encode QR payload: {e}")))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub job_id: DbId,
    pub label_size: LabelSize,
    pub player_name: Option<String>,
    pub player_last_name: Option<String>,
    pub racquet_brand: Option<String>,
    pub racquet_model: Option<String>,
    pub string_brand: Option<String>,
    pub string_model: Option<String>,
    pub cross_string_brand: Option<String>,
    pub cross_string_model: Option<String>,
    pub main_tension: Option<f64>,
    pub cross_tension: Option<f64>,
    pub is_tension_in_kg: Option<bool>,
    pub tension_text: Option<String>,
    pub date_completed: Option<String>,
    pub logo: Option<String>,
    pub qr_code_data: Option<String>,
}

pub fn build_label(source: &LabelSource, options: &LabelOptions) -> Result<Label, CoreError> {
    let (string_brand, string_model) = match &source.main_string {
        Some(main) => (main.brand.clone(), main.model.clone()),
        None => (UNKNOWN.to_string(), String::new()),
    };
    let cross = source.cross_string.as_ref();

    Ok(Label {
        job_id: source.job_id,
        label_size: options.size,
        player_name: options.player.then(|| source.player_name.clone()),
        player_last_name: options.player.then(|| source.player_last_name.clone()),
        racquet_brand: options.racquet.then(|| source.racquet.brand.clone()),
        racquet_model: options.racquet.then(|| source.racquet.model.clone()),
        string_brand: options.strings.then_some(string_brand),
        string_model: options.strings.then_some(string_model),
        cross_string_brand: cross.filter(|_| options.strings).map(|c| c.brand.clone()),
        cross_string_model: cross.filter(|_| options.strings).map(|c| c.model.clone()),
        main_tension: options.tension.then_some(source.main_tension),
        cross_tension: source.cross_tension.filter(|_| options.tension),
        is_tension_in_kg: options.tension.then_some(source.is_tension_in_kg),
        tension_text: options.tension.then(|| source.tension_text()),
        date_completed: options.date.then(|| source.label_date()),
        logo: source.logo.clone().filter(|_| options.logo),
        qr_code_data: if options.qr_code {
            Some(qr_code_data(source)?)
        } else {
            None
        },
    })
}
