use std::path::Path;

/// Source file name to barangay display name.
const BARANGAY_NAMES: [(&str, &str); 23] = [
    ("Apokon.geojson", "Apokon"),
    ("Bincungan.geojson", "Bincungan"),
    ("Busaon.geojson", "Busaon"),
    ("Canocotan.geojson", "Canocotan"),
    ("cuambogan.geojson", "Cuambogan"),
    ("LaFilipina.geojson", "La Filipina"),
    ("Liboganon.geojson", "Liboganon"),
    ("Madaum.geojson", "Madaum"),
    ("Magdum.geojson", "Magdum"),
    ("MagugpoE.geojson", "Magugpo East"),
    ("MagugpoN.geojson", "Magugpo North"),
    ("MagugpoPoblacion.geojson", "Magugpo Poblacion"),
    ("MagugpoS.geojson", "Magugpo South"),
    ("MagugpoW.geojson", "Magugpo West"),
    ("Mankilam.geojson", "Mankilam"),
    ("newbalamban.geojson", "New Balamban"),
    ("nueva fuerza.geojson", "Nueva Fuerza"),
    ("paagsabangan.geojson", "Pagsabangan"),
    ("Pandapan.geojson", "Pandapan"),
    ("sanagustin.geojson", "San Agustin"),
    ("SanIsidro.geojson", "San Isidro"),
    ("SanMiguel.geojson", "San Miguel"),
    ("VisayanVillage.geojson", "Visayan Village"),
];

/// Display name for a region file: the fixed mapping, else the title-cased stem.
pub fn canonical_region_name(file_name: &str) -> String {
    if let Some((_, name)) = BARANGAY_NAMES.iter().find(|(file, _)| *file == file_name) {
        return (*name).to_string();
    }
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    title_case(stem)
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut previous_is_letter = false;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }
    out
}
