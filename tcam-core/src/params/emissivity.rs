//! Selectable emissivity values

/// Emissivity choices in percent, ascending
pub const EMISSIVITY_VALUES: [u8; 23] = [
    10, 20, 30, 40, 50, 60, 70, 80, 82, 84, 86, 88, 90, 91, 92, 93, 94, 95, 96, 97, 98, 99, 100,
];

/// Index of a stored emissivity in [`EMISSIVITY_VALUES`]
///
/// Values that are not in the table map to the last entry.
pub fn emissivity_index(percent: i32) -> u8 {
    EMISSIVITY_VALUES
        .iter()
        .position(|&e| e as i32 == percent)
        .unwrap_or(EMISSIVITY_VALUES.len() - 1) as u8
}

/// Emissivity at a table index, clamped to the last entry
pub fn emissivity_at(index: u8) -> u8 {
    let i = (index as usize).min(EMISSIVITY_VALUES.len() - 1);
    EMISSIVITY_VALUES[i]
}
