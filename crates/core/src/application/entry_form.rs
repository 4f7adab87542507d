//! Server-side validation of the data-entry form.
//!
//! The raw form is kept as submitted so it can be re-rendered with the user's values when
//! validation or the spreadsheet write fails.

use chrono::NaiveDate;
use serde::Deserialize;
use strum::AsRefStr;
use thiserror::Error;

use crate::domain::driver::{
    entry::{EntryRecord, EntryType, EveningEntry, MorningEntry, RefuelingEntry},
    session::DriverSession,
};

pub const FORM_DATE_FORMAT: &str = "%Y-%m-%d";

/// Field names as they appear in the HTML form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum FormField {
    Date,
    EntryType,
    Mileage,
    MedicMarkTime,
    TachographCardInsertionTime,
    FuelFilled,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntryFormInput {
    pub date: String,
    pub entry_type: String,
    pub mileage: String,
    pub medic_mark_time: String,
    pub tachograph_card_insertion_time: String,
    pub fuel_filled: String,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("A date is required.")]
    DateRequired,
    #[error("Date must look like YYYY-MM-DD.")]
    DateMalformed,
    #[error("Date cannot be in the future.")]
    DateInFuture,
    #[error("Date cannot be before 01.01.1900.")]
    DateTooEarly,
    #[error("Please select an entry type.")]
    EntryTypeRequired,
    #[error("Mileage is required.")]
    MileageRequired,
    #[error("Mileage must be a number.")]
    MileageNotANumber,
    #[error("Medic mark time is required.")]
    MedicMarkTimeRequired,
    #[error("Tachograph card time is required.")]
    TachographTimeRequired,
    #[error("Fuel filled is required.")]
    FuelRequired,
}

impl FieldError {
    pub fn field(&self) -> FormField {
        match self {
            FieldError::DateRequired
            | FieldError::DateMalformed
            | FieldError::DateInFuture
            | FieldError::DateTooEarly => FormField::Date,
            FieldError::EntryTypeRequired => FormField::EntryType,
            FieldError::MileageRequired | FieldError::MileageNotANumber => FormField::Mileage,
            FieldError::MedicMarkTimeRequired => FormField::MedicMarkTime,
            FieldError::TachographTimeRequired => FormField::TachographCardInsertionTime,
            FieldError::FuelRequired => FormField::FuelFilled,
        }
    }
}

/// Every failing field of one submission, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn for_field(&self, field: FormField) -> Option<&FieldError> {
        self.0.iter().find(|error| error.field() == field)
    }
}

fn earliest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn required(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

impl EntryFormInput {
    pub fn entry_type(&self) -> Option<EntryType> {
        self.entry_type.trim().parse().ok()
    }

    fn parse_date(&self, today: NaiveDate) -> Result<NaiveDate, FieldError> {
        let raw = self.date.trim();
        if raw.is_empty() {
            return Err(FieldError::DateRequired);
        }

        let date = NaiveDate::parse_from_str(raw, FORM_DATE_FORMAT)
            .map_err(|_| FieldError::DateMalformed)?;
        if date > today {
            return Err(FieldError::DateInFuture);
        }
        if date < earliest_date() {
            return Err(FieldError::DateTooEarly);
        }

        Ok(date)
    }

    fn parse_mileage(&self) -> Result<String, FieldError> {
        let mileage = required(&self.mileage).ok_or(FieldError::MileageRequired)?;
        mileage
            .parse::<u64>()
            .map_err(|_| FieldError::MileageNotANumber)?;
        Ok(mileage)
    }

    /// Builds the record for `session`, or reports every field that fails.
    ///
    /// Only the fields of the selected entry type are checked; the others are ignored.
    pub fn validate(
        &self,
        session: &DriverSession,
        today: NaiveDate,
    ) -> Result<EntryRecord, FormErrors> {
        let mut errors = Vec::new();

        let date = self.parse_date(today).map_err(|error| errors.push(error)).ok();
        let entry_type = self.entry_type();
        if entry_type.is_none() {
            errors.push(FieldError::EntryTypeRequired);
        }
        let mileage = self.parse_mileage().map_err(|error| errors.push(error)).ok();

        let mut field = |value: &str, missing: FieldError| {
            let value = required(value);
            if value.is_none() {
                errors.push(missing);
            }
            value
        };

        let record = match entry_type {
            Some(EntryType::Morning) => {
                let medic_mark_time =
                    field(&self.medic_mark_time, FieldError::MedicMarkTimeRequired);
                let tachograph_time = field(
                    &self.tachograph_card_insertion_time,
                    FieldError::TachographTimeRequired,
                );
                match (date, mileage, medic_mark_time, tachograph_time) {
                    (Some(date), Some(mileage), Some(medic_mark_time), Some(tachograph_time)) => {
                        Some(EntryRecord::Morning(MorningEntry {
                            date,
                            mileage,
                            medic_mark_time,
                            tachograph_time,
                            vehicle_id: session.vehicle_id().to_owned(),
                        }))
                    }
                    _ => None,
                }
            }
            Some(EntryType::Evening) => {
                let tachograph_time = field(
                    &self.tachograph_card_insertion_time,
                    FieldError::TachographTimeRequired,
                );
                match (date, mileage, tachograph_time) {
                    (Some(date), Some(mileage), Some(tachograph_time)) => {
                        Some(EntryRecord::Evening(EveningEntry {
                            date,
                            mileage,
                            tachograph_time,
                            vehicle_id: session.vehicle_id().to_owned(),
                        }))
                    }
                    _ => None,
                }
            }
            Some(EntryType::Refueling) => {
                let fuel_liters = field(&self.fuel_filled, FieldError::FuelRequired);
                match (date, mileage, fuel_liters) {
                    (Some(date), Some(mileage), Some(fuel_liters)) => {
                        Some(EntryRecord::Refueling(RefuelingEntry {
                            date,
                            mileage,
                            fuel_liters,
                        }))
                    }
                    _ => None,
                }
            }
            None => None,
        };

        match record {
            Some(record) if errors.is_empty() => Ok(record),
            _ => Err(FormErrors(errors)),
        }
    }
}
