/// Fold a free-text ledger label into `snake_case` form.
pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split(|c: char| c.is_whitespace() || c == '-' || c == '/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase()
}

#[cfg(test)]
pub(crate) fn normalize_for_tests(value: &str) -> String {
    normalize_label(value)
}
