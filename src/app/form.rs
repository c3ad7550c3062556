//! Update form state - field editing and payload validation

use chrono::{DateTime, Utc};

use crate::models::{Package, PackageStatus, PackageUpdate};
use crate::submit::SubmitTarget;

/// Form fields in tab order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    PackageId,
    Status,
    Latitude,
    Longitude,
    Note,
}

impl FormField {
    const ORDER: [FormField; 5] = [
        FormField::PackageId,
        FormField::Status,
        FormField::Latitude,
        FormField::Longitude,
        FormField::Note,
    ];

    pub fn next(&self) -> FormField {
        let idx = Self::ORDER.iter().position(|f| f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    pub fn prev(&self) -> FormField {
        let idx = Self::ORDER.iter().position(|f| f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FormState {
    pub target: SubmitTarget,
    pub package_id: String,
    pub status: PackageStatus,
    pub lat: String,
    pub lon: String,
    pub note: String,
    pub active_field: FormField,
    pub submitting: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::create()
    }
}

impl FormState {
    /// Blank form; leaving the id empty creates a new package
    pub fn create() -> Self {
        FormState {
            target: SubmitTarget::Create,
            package_id: String::new(),
            status: PackageStatus::Created,
            lat: String::new(),
            lon: String::new(),
            note: String::new(),
            active_field: FormField::PackageId,
            submitting: false,
            error: None,
            success: None,
        }
    }

    /// Form for recording an event on an existing package, prefilled from it
    pub fn update_for(package: &Package) -> Self {
        FormState {
            target: SubmitTarget::Update(package.package_id.clone()),
            package_id: package.package_id.clone(),
            status: package.current_status,
            lat: package.current_lat.map(|v| v.to_string()).unwrap_or_default(),
            lon: package.current_lon.map(|v| v.to_string()).unwrap_or_default(),
            note: String::new(),
            active_field: FormField::Status,
            submitting: false,
            error: None,
            success: None,
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(self.target, SubmitTarget::Update(_))
    }

    pub fn next_field(&mut self) {
        self.active_field = self.active_field.next();
        if self.is_update() && self.active_field == FormField::PackageId {
            self.active_field = self.active_field.next();
        }
    }

    pub fn prev_field(&mut self) {
        self.active_field = self.active_field.prev();
        if self.is_update() && self.active_field == FormField::PackageId {
            self.active_field = self.active_field.prev();
        }
    }

    pub fn next_status(&mut self) {
        self.status = self.status.next();
    }

    pub fn prev_status(&mut self) {
        self.status = self.status.prev();
    }

    fn active_text_mut(&mut self) -> Option<&mut String> {
        match self.active_field {
            FormField::PackageId if !self.is_update() => Some(&mut self.package_id),
            FormField::Latitude => Some(&mut self.lat),
            FormField::Longitude => Some(&mut self.lon),
            FormField::Note => Some(&mut self.note),
            _ => None,
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if self.submitting {
            return;
        }
        if let Some(text) = self.active_text_mut() {
            text.push(c);
        }
    }

    pub fn delete_char(&mut self) {
        if self.submitting {
            return;
        }
        if let Some(text) = self.active_text_mut() {
            text.pop();
        }
    }

    /// Turn the fields into a payload stamped with `now`
    pub fn build_update(&self, now: DateTime<Utc>) -> Result<PackageUpdate, String> {
        let package_id = match &self.target {
            SubmitTarget::Update(id) => Some(id.clone()),
            SubmitTarget::Create => non_empty(&self.package_id),
        };

        let lat = parse_coordinate(&self.lat, "Latitude", 90.0)?;
        let lon = parse_coordinate(&self.lon, "Longitude", 180.0)?;

        Ok(PackageUpdate {
            package_id,
            status: self.status,
            lat,
            lon,
            timestamp: now,
            note: non_empty(&self.note),
        })
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_coordinate(raw: &str, name: &str, limit: f64) -> Result<Option<f64>, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() <= limit => Ok(Some(value)),
        _ => Err(format!("{} must be a number between -{} and {}", name, limit, limit)),
    }
}
