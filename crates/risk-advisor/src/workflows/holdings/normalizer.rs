pub(crate) fn normalize_rating(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '*'], "");
    let collapsed = cleaned.split_whitespace().collect::<String>();
    collapsed.to_ascii_uppercase()
}

pub(crate) fn parse_yield(value: &str) -> Option<f64> {
    value
        .trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
}

#[cfg(test)]
pub(crate) fn normalize_for_tests(value: &str) -> String {
    normalize_rating(value)
}
