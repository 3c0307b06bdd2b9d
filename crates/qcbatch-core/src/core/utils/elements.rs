use phf::{Map, phf_map};

#[rustfmt::skip]
static SYMBOLS: [&str; 118] = [
    "H",                                                                                  "He",
    "Li", "Be",                                                  "B",  "C",  "N",  "O",  "F",  "Ne",
    "Na", "Mg",                                                  "Al", "Si", "P",  "S",  "Cl", "Ar",
    "K",  "Ca", "Sc", "Ti", "V",  "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr",
    "Rb", "Sr", "Y",  "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te", "I",  "Xe",
    "Cs", "Ba",
    "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu",
    "Hf", "Ta", "W",  "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
    "Fr", "Ra",
    "Ac", "Th", "Pa", "U",  "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr",
    "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

// Keys are upper-cased so lookups can ignore the case used in the file.
#[rustfmt::skip]
static ATOMIC_NUMBERS: Map<&'static str, u8> = phf_map! {
    "H" => 1, "HE" => 2,
    "LI" => 3, "BE" => 4, "B" => 5, "C" => 6, "N" => 7, "O" => 8, "F" => 9, "NE" => 10,
    "NA" => 11, "MG" => 12, "AL" => 13, "SI" => 14, "P" => 15, "S" => 16, "CL" => 17, "AR" => 18,
    "K" => 19, "CA" => 20, "SC" => 21, "TI" => 22, "V" => 23, "CR" => 24, "MN" => 25, "FE" => 26,
    "CO" => 27, "NI" => 28, "CU" => 29, "ZN" => 30, "GA" => 31, "GE" => 32, "AS" => 33, "SE" => 34,
    "BR" => 35, "KR" => 36,
    "RB" => 37, "SR" => 38, "Y" => 39, "ZR" => 40, "NB" => 41, "MO" => 42, "TC" => 43, "RU" => 44,
    "RH" => 45, "PD" => 46, "AG" => 47, "CD" => 48, "IN" => 49, "SN" => 50, "SB" => 51, "TE" => 52,
    "I" => 53, "XE" => 54,
    "CS" => 55, "BA" => 56,
    "LA" => 57, "CE" => 58, "PR" => 59, "ND" => 60, "PM" => 61, "SM" => 62, "EU" => 63, "GD" => 64,
    "TB" => 65, "DY" => 66, "HO" => 67, "ER" => 68, "TM" => 69, "YB" => 70, "LU" => 71,
    "HF" => 72, "TA" => 73, "W" => 74, "RE" => 75, "OS" => 76, "IR" => 77, "PT" => 78, "AU" => 79,
    "HG" => 80, "TL" => 81, "PB" => 82, "BI" => 83, "PO" => 84, "AT" => 85, "RN" => 86,
    "FR" => 87, "RA" => 88,
    "AC" => 89, "TH" => 90, "PA" => 91, "U" => 92, "NP" => 93, "PU" => 94, "AM" => 95, "CM" => 96,
    "BK" => 97, "CF" => 98, "ES" => 99, "FM" => 100, "MD" => 101, "NO" => 102, "LR" => 103,
    "RF" => 104, "DB" => 105, "SG" => 106, "BH" => 107, "HS" => 108, "MT" => 109, "DS" => 110,
    "RG" => 111, "CN" => 112, "NH" => 113, "FL" => 114, "MC" => 115, "LV" => 116, "TS" => 117,
    "OG" => 118,
};

pub const MAX_ATOMIC_NUMBER: u8 = 118;

pub fn symbol_for(atomic_number: u8) -> Option<&'static str> {
    if atomic_number == 0 {
        return None;
    }
    SYMBOLS.get(atomic_number as usize - 1).copied()
}

pub fn atomic_number_for(symbol: &str) -> Option<u8> {
    ATOMIC_NUMBERS
        .get(symbol.trim().to_ascii_uppercase().as_str())
        .copied()
}

/// Resolves a species label as it appears in a geometry file.
///
/// Accepts element symbols in any case (`C`, `cl`), symbols followed by a
/// numeric site label (`C1`, `H12`), and bare atomic numbers (`6`).
pub fn parse_species(label: &str) -> Option<u8> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    if let Ok(z) = label.parse::<u8>() {
        return (1..=MAX_ATOMIC_NUMBER).contains(&z).then_some(z);
    }
    let alpha_end = label
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(label.len());
    let (alpha, rest) = label.split_at(alpha_end);
    if !rest.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    atomic_number_for(alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_table_and_lookup_map_agree() {
        for z in 1..=MAX_ATOMIC_NUMBER {
            let symbol = symbol_for(z).unwrap();
            assert_eq!(atomic_number_for(symbol), Some(z), "mismatch for {symbol}");
        }
    }

    #[test]
    fn symbol_for_rejects_out_of_range_numbers() {
        assert_eq!(symbol_for(0), None);
        assert_eq!(symbol_for(119), None);
        assert_eq!(symbol_for(1), Some("H"));
        assert_eq!(symbol_for(118), Some("Og"));
    }

    #[test]
    fn atomic_number_for_ignores_case_and_whitespace() {
        assert_eq!(atomic_number_for("Cl"), Some(17));
        assert_eq!(atomic_number_for("CL"), Some(17));
        assert_eq!(atomic_number_for(" cl "), Some(17));
        assert_eq!(atomic_number_for("Xx"), None);
    }

    #[test]
    fn parse_species_accepts_labels_and_numbers() {
        assert_eq!(parse_species("C"), Some(6));
        assert_eq!(parse_species("C12"), Some(6));
        assert_eq!(parse_species("8"), Some(8));
        assert_eq!(parse_species("Li"), Some(3));
    }

    #[test]
    fn parse_species_rejects_garbage() {
        assert_eq!(parse_species(""), None);
        assert_eq!(parse_species("0"), None);
        assert_eq!(parse_species("200"), None);
        assert_eq!(parse_species("C-1"), None);
        assert_eq!(parse_species("Qq"), None);
    }
}
