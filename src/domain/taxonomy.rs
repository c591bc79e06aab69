/// Categories typical of Maltese classified-ad sites, in display order.
pub const CATEGORIES: [&str; 12] = [
    "Vehicles",
    "Property",
    "Electronics",
    "Furniture",
    "Clothing",
    "Sports & Leisure",
    "Books & Media",
    "Baby & Kids",
    "Pets",
    "Services",
    "Jobs",
    "Other",
];

/// Towns and islands offered as location filters.
pub const LOCATIONS: [&str; 22] = [
    "Valletta",
    "Sliema",
    "St. Julian's",
    "Birkirkara",
    "Mosta",
    "Qormi",
    "Zabbar",
    "Hamrun",
    "Naxxar",
    "Fgura",
    "Luqa",
    "Marsa",
    "Paola",
    "Tarxien",
    "Pietà",
    "Msida",
    "Gzira",
    "San Gwann",
    "Santa Venera",
    "Pembroke",
    "Gozo",
    "Comino",
];

pub fn categories() -> Vec<String> {
    CATEGORIES.iter().map(ToString::to_string).collect()
}

pub fn locations() -> Vec<String> {
    LOCATIONS.iter().map(ToString::to_string).collect()
}
