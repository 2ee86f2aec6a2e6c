//! Yard map helpers
//!
//! The yard is a grid of ten lettered columns (`A`..=`J`) with eight numbered
//! rows each. Slot labels combine both, e.g. `C4`.

use crate::error::{FleetError, Result};
use crate::models::Vaga;
use std::collections::BTreeMap;
use std::fmt;

pub const COLUMNS: [char; 10] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J'];
pub const ROWS_PER_COLUMN: u8 = 8;
pub const TOTAL_SLOTS: usize = COLUMNS.len() * ROWS_PER_COLUMN as usize;

/// Reference point of the yard (column A, row 1)
pub const ORIGIN_LATITUDE: f64 = -23.5505;
pub const ORIGIN_LONGITUDE: f64 = -46.6333;
/// Spacing between neighbouring slots, in degrees
pub const SLOT_SPACING: f64 = 0.0001;

/// Column/row position of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotPosition {
    pub column: char,
    /// 1-based
    pub row: u8,
}

impl SlotPosition {
    pub fn new(column: char, row: u8) -> Result<Self> {
        let column = column.to_ascii_uppercase();
        if !COLUMNS.contains(&column) || row == 0 || row > ROWS_PER_COLUMN {
            return Err(FleetError::InvalidSlotLabel(format!("{}{}", column, row)));
        }
        Ok(Self { column, row })
    }

    /// Parses labels such as `A3` or `j8`.
    pub fn parse(label: &str) -> Result<Self> {
        let label = label.trim();
        let mut chars = label.chars();
        let column = chars
            .next()
            .ok_or_else(|| FleetError::InvalidSlotLabel(label.to_string()))?;
        let row = chars
            .as_str()
            .parse::<u8>()
            .map_err(|_| FleetError::InvalidSlotLabel(label.to_string()))?;
        Self::new(column, row)
    }

    pub fn column_index(&self) -> usize {
        COLUMNS
            .iter()
            .position(|c| *c == self.column)
            .unwrap_or_default()
    }

    pub fn label(&self) -> String {
        format!("{}{}", self.column, self.row)
    }

    /// Map coordinates: columns run east, rows run south from the origin.
    pub fn coordinates(&self) -> (f64, f64) {
        let latitude = ORIGIN_LATITUDE - f64::from(self.row - 1) * SLOT_SPACING;
        let longitude = ORIGIN_LONGITUDE + self.column_index() as f64 * SLOT_SPACING;
        (latitude, longitude)
    }
}

impl fmt::Display for SlotPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

/// Every slot of the grid, column by column.
pub fn all_positions() -> impl Iterator<Item = SlotPosition> {
    COLUMNS.into_iter().flat_map(|column| {
        (1..=ROWS_PER_COLUMN).map(move |row| SlotPosition { column, row })
    })
}

/// Occupancy counters for the yard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YardSummary {
    pub total: usize,
    pub ocupadas: usize,
    pub livres: usize,
}

impl YardSummary {
    pub fn from_vagas(vagas: &[Vaga]) -> Self {
        let ocupadas = vagas.iter().filter(|v| v.is_occupied()).count();
        Self {
            total: vagas.len(),
            ocupadas,
            livres: vagas.len() - ocupadas,
        }
    }

    /// Occupied fraction in `[0, 1]`; zero for an empty yard
    pub fn occupancy_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.ocupadas as f64 / self.total as f64
        }
    }
}

/// Groups slots by column letter, each column ordered by row.
///
/// Slots whose label does not parse are left out.
pub fn group_by_column(vagas: &[Vaga]) -> BTreeMap<char, Vec<&Vaga>> {
    let mut columns: BTreeMap<char, Vec<(u8, &Vaga)>> = BTreeMap::new();
    for vaga in vagas {
        if let Ok(position) = SlotPosition::parse(&vaga.identificacao) {
            columns
                .entry(position.column)
                .or_default()
                .push((position.row, vaga));
        }
    }

    columns
        .into_iter()
        .map(|(column, mut slots)| {
            slots.sort_by_key(|(row, _)| *row);
            (column, slots.into_iter().map(|(_, vaga)| vaga).collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VagaStatus;

    fn vaga(label: &str, status: VagaStatus) -> Vaga {
        Vaga {
            id: label.to_string(),
            identificacao: label.to_string(),
            status,
            latitude: 0.0,
            longitude: 0.0,
            moto_id: None,
        }
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!(
            SlotPosition::parse("A3").unwrap(),
            SlotPosition { column: 'A', row: 3 }
        );
        assert_eq!(SlotPosition::parse(" j8 ").unwrap().label(), "J8");

        for bad in ["", "K1", "A0", "A9", "AA", "3A"] {
            assert!(SlotPosition::parse(bad).is_err(), "{} should fail", bad);
        }
    }

    #[test]
    fn test_grid_has_eighty_slots() {
        let positions: Vec<SlotPosition> = all_positions().collect();
        assert_eq!(positions.len(), TOTAL_SLOTS);
        assert_eq!(positions.len(), 80);
        assert_eq!(positions[0].label(), "A1");
        assert_eq!(positions[79].label(), "J8");
    }

    #[test]
    fn test_coordinates_grow_from_origin() {
        let origin = SlotPosition::parse("A1").unwrap().coordinates();
        assert_eq!(origin, (ORIGIN_LATITUDE, ORIGIN_LONGITUDE));

        let (lat, lon) = SlotPosition::parse("B2").unwrap().coordinates();
        assert!(lat < ORIGIN_LATITUDE);
        assert!(lon > ORIGIN_LONGITUDE);
    }

    #[test]
    fn test_summary() {
        let vagas = vec![
            vaga("A1", VagaStatus::Ocupada),
            vaga("A2", VagaStatus::Livre),
            vaga("A3", VagaStatus::Livre),
            vaga("A4", VagaStatus::Ocupada),
        ];
        let summary = YardSummary::from_vagas(&vagas);
        assert_eq!(
            summary,
            YardSummary {
                total: 4,
                ocupadas: 2,
                livres: 2
            }
        );
        assert_eq!(summary.occupancy_rate(), 0.5);
        assert_eq!(YardSummary::from_vagas(&[]).occupancy_rate(), 0.0);
    }

    #[test]
    fn test_group_by_column_orders_rows() {
        let vagas = vec![
            vaga("B2", VagaStatus::Livre),
            vaga("A8", VagaStatus::Livre),
            vaga("B1", VagaStatus::Ocupada),
            vaga("??", VagaStatus::Livre),
        ];
        let grouped = group_by_column(&vagas);

        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec!['A', 'B']);
        let b: Vec<&str> = grouped[&'B'].iter().map(|v| v.identificacao.as_str()).collect();
        assert_eq!(b, vec!["B1", "B2"]);
    }
}
