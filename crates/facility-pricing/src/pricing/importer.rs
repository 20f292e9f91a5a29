//! Area roster import from spreadsheet CSV exports.

use super::domain::{Area, AreaId};
use super::keys::{ConditionLevel, FloorType};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum FacilityImportError {
    #[error("failed to read area export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid area CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

pub struct FacilityCsvImporter;

impl FacilityCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Area>, FacilityImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Rows become areas `area-001`, `area-002`, ... in file order.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Area>, FacilityImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut areas = Vec::new();

        for (index, record) in csv_reader.deserialize::<AreaRow>().enumerate() {
            let row_number = index + 1;
            let row = record?;
            areas.push(row.into_area(row_number)?);
        }

        Ok(areas)
    }
}

#[derive(Debug, Deserialize)]
struct AreaRow {
    #[serde(rename = "Area", default, deserialize_with = "empty_string_as_none")]
    name: Option<String>,
    #[serde(rename = "Area Type")]
    area_type: String,
    #[serde(rename = "Square Feet")]
    square_feet: String,
    #[serde(rename = "Quantity", default, deserialize_with = "empty_string_as_none")]
    quantity: Option<String>,
    #[serde(rename = "Floor Type", default)]
    floor_type: String,
    #[serde(rename = "Condition", default)]
    condition: String,
    #[serde(rename = "Rooms", default, deserialize_with = "empty_string_as_none")]
    rooms: Option<String>,
    #[serde(rename = "Units", default, deserialize_with = "empty_string_as_none")]
    units: Option<String>,
}

impl AreaRow {
    fn into_area(self, row: usize) -> Result<Area, FacilityImportError> {
        if self.area_type.is_empty() {
            return Err(invalid(row, "area type is required"));
        }

        let square_feet: f64 = self.square_feet.replace(',', "").parse().map_err(|_| {
            invalid(
                row,
                &format!("square feet '{}' is not a number", self.square_feet),
            )
        })?;
        if !square_feet.is_finite() || square_feet < 0.0 {
            return Err(invalid(row, "square feet must be zero or greater"));
        }

        let quantity = parse_count(row, "quantity", self.quantity.as_deref())?.unwrap_or(1);
        if quantity == 0 {
            return Err(invalid(row, "quantity must be at least 1"));
        }

        Ok(Area {
            id: AreaId(format!("area-{row:03}")),
            name: self.name,
            area_type: self.area_type,
            square_feet,
            quantity,
            floor_type: FloorType::parse(&self.floor_type),
            condition_level: ConditionLevel::parse(&self.condition),
            room_count: parse_count(row, "rooms", self.rooms.as_deref())?.unwrap_or(0),
            unit_count: parse_count(row, "units", self.units.as_deref())?.unwrap_or(0),
            fixtures: BTreeMap::new(),
        })
    }
}

fn parse_count(
    row: usize,
    column: &str,
    value: Option<&str>,
) -> Result<Option<u32>, FacilityImportError> {
    value
        .map(|raw| {
            raw.parse::<u32>()
                .map_err(|_| invalid(row, &format!("{column} '{raw}' is not a whole number")))
        })
        .transpose()
}

fn invalid(row: usize, reason: &str) -> FacilityImportError {
    FacilityImportError::InvalidRow {
        row,
        reason: reason.to_string(),
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const EXPORT: &str = "\
Area,Area Type,Square Feet,Quantity,Floor Type,Condition,Rooms,Units
Main Lobby,Lobby,\"1,200\",1,Tile,standard,,
,Restroom,180,4,tile,Hard,1,
Open Office,Office,5400,,Carpet,,,
";

    #[test]
    fn imports_rows_with_defaults() {
        let areas =
            FacilityCsvImporter::from_reader(Cursor::new(EXPORT)).expect("import succeeds");
        assert_eq!(areas.len(), 3);

        let lobby = &areas[0];
        assert_eq!(lobby.id, AreaId::new("area-001"));
        assert_eq!(lobby.display_name(), "Main Lobby");
        assert_eq!(lobby.square_feet, 1200.0);
        assert_eq!(lobby.floor_type, FloorType::Tile);

        let restroom = &areas[1];
        assert_eq!(restroom.display_name(), "Restroom");
        assert_eq!(restroom.quantity, 4);
        assert_eq!(restroom.condition_level, ConditionLevel::Hard);
        assert_eq!(restroom.room_count, 1);

        let office = &areas[2];
        assert_eq!(office.quantity, 1);
        assert_eq!(office.floor_type, FloorType::Carpet);
        assert_eq!(office.condition_level, ConditionLevel::Standard);
    }

    #[test]
    fn rejects_negative_square_feet_with_row_number() {
        let export = "Area,Area Type,Square Feet\nStorage,Storage,-20\n";
        match FacilityCsvImporter::from_reader(Cursor::new(export)) {
            Err(FacilityImportError::InvalidRow { row, .. }) => assert_eq!(row, 1),
            other => panic!("expected invalid row error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_numeric_quantity() {
        let export = "Area,Area Type,Square Feet,Quantity\nHall,Corridor,400,two\n";
        let err = FacilityCsvImporter::from_reader(Cursor::new(export)).expect_err("bad quantity");
        assert!(err.to_string().contains("quantity 'two'"));
    }
}
