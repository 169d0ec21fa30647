// weapon type code -> label, as published by the backend metadata
const WEAPON_LABELS: &[(i64, &str)] = &[
    (0, "All"),
    (11, "TwoHanded"),
    (12, "TwinSword"),
    (13, "OneHanded"),
    (14, "Spear"),
    (21, "Bow"),
    (22, "Dagger"),
    (23, "Rapier"),
    (31, "Staff"),
    (32, "Wand"),
];

// short tags for narrow terminal columns
const WEAPON_GLYPHS: &[(i64, &str)] = &[
    (11, "2H"),
    (12, "TW"),
    (13, "1H"),
    (14, "SP"),
    (21, "BW"),
    (22, "DG"),
    (23, "RP"),
    (31, "ST"),
    (32, "WD"),
];

pub const UNKNOWN_WEAPON: &str = "Unknown";
pub const UNKNOWN_GLYPH: &str = "??";

pub fn weapon_label(code: i64) -> &'static str {
    lookup(WEAPON_LABELS, code).unwrap_or(UNKNOWN_WEAPON)
}

pub fn weapon_glyph(code: i64) -> &'static str {
    lookup(WEAPON_GLYPHS, code).unwrap_or(UNKNOWN_GLYPH)
}

fn lookup(table: &'static [(i64, &'static str)], code: i64) -> Option<&'static str> {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}
