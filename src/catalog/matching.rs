//! Normalisation used to match free-form names and formulas against the catalog.

const SUBSCRIPTS: [(char, char); 10] = [
    ('₀', '0'),
    ('₁', '1'),
    ('₂', '2'),
    ('₃', '3'),
    ('₄', '4'),
    ('₅', '5'),
    ('₆', '6'),
    ('₇', '7'),
    ('₈', '8'),
    ('₉', '9'),
];

/// Case-insensitive key for names, with inner whitespace collapsed.
pub fn name_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Key for formulas: subscript digits become ASCII, whitespace is dropped.
/// Case is preserved because it is significant (`Co` is not `CO`).
pub fn formula_key(formula: &str) -> String {
    formula
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            SUBSCRIPTS
                .iter()
                .find(|(sub, _)| *sub == c)
                .map_or(c, |(_, ascii)| *ascii)
        })
        .collect()
}
