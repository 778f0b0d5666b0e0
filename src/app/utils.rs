/// Parses the leading minute count out of OMDb's free-text runtime ("148 min").
pub fn parse_runtime_minutes(runtime: &str) -> Option<u32> {
    runtime.split_whitespace().next()?.parse().ok()
}

/// OMDb sends ratings as text and uses "N/A" when it has none.
pub fn parse_rating(rating: &str) -> Option<f32> {
    rating.trim().parse::<f32>().ok().filter(|r| r.is_finite())
}

/// Arithmetic mean, or `None` for an empty input.
pub fn average<I>(values: I) -> Option<f32>
where
    I: IntoIterator<Item = f32>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f32, 0_u32), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f32)
    }
}

/// Placeholder shown wherever a value is missing.
pub const PLACEHOLDER: &str = "–";

pub fn format_average(value: Option<f32>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => PLACEHOLDER.to_string(),
    }
}
