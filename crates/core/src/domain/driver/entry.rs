use chrono::NaiveDate;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::layout::{format_sheet_date, EntryRegion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum EntryType {
    Morning,
    Evening,
    Refueling,
}

impl EntryType {
    /// Label shown in the entry-type selector.
    pub fn label(&self) -> &'static str {
        match self {
            EntryType::Morning => "Утренние показания",
            EntryType::Evening => "Вечерние показания",
            EntryType::Refueling => "Заправка",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MorningEntry {
    pub date: NaiveDate,
    pub mileage: String,
    pub medic_mark_time: String,
    pub tachograph_time: String,
    pub vehicle_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EveningEntry {
    pub date: NaiveDate,
    pub mileage: String,
    pub tachograph_time: String,
    pub vehicle_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefuelingEntry {
    pub date: NaiveDate,
    pub mileage: String,
    pub fuel_liters: String,
}

/// One driver submission. Each variant carries only the fields its columns need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRecord {
    Morning(MorningEntry),
    Evening(EveningEntry),
    Refueling(RefuelingEntry),
}

impl EntryRecord {
    pub fn entry_type(&self) -> EntryType {
        match self {
            EntryRecord::Morning(_) => EntryType::Morning,
            EntryRecord::Evening(_) => EntryType::Evening,
            EntryRecord::Refueling(_) => EntryType::Refueling,
        }
    }

    pub fn region(&self) -> EntryRegion {
        match self {
            EntryRecord::Morning(_) | EntryRecord::Evening(_) => EntryRegion::DailyCheck,
            EntryRecord::Refueling(_) => EntryRegion::Refueling,
        }
    }

    /// Cell values in column order for [`EntryRecord::region`].
    pub fn row_values(&self) -> Vec<String> {
        match self {
            EntryRecord::Morning(entry) => vec![
                format_sheet_date(entry.date),
                entry.mileage.clone(),
                entry.medic_mark_time.clone(),
                entry.tachograph_time.clone(),
                entry.vehicle_id.clone(),
            ],
            EntryRecord::Evening(entry) => vec![
                format_sheet_date(entry.date),
                entry.mileage.clone(),
                String::new(),
                entry.tachograph_time.clone(),
                entry.vehicle_id.clone(),
            ],
            EntryRecord::Refueling(entry) => vec![
                format_sheet_date(entry.date),
                entry.mileage.clone(),
                entry.fuel_liters.clone(),
            ],
        }
    }
}
