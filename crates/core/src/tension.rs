//! Tension display and distribution buckets.

/// Bucket labels for the kilogram tension distribution, in display order.
pub const TENSION_BUCKETS: [&str; 6] = [
    "<20 kg",
    "20-21.9 kg",
    "22-23.9 kg",
    "24-25.9 kg",
    "26-27.9 kg",
    ">=28 kg",
];

/// Index into [`TENSION_BUCKETS`] for a main tension in kilograms.
pub fn bucket_index(kg: f64) -> usize {
    if kg < 20.0 {
        0
    } else if kg < 22.0 {
        1
    } else if kg < 24.0 {
        2
    } else if kg < 26.0 {
        3
    } else if kg < 28.0 {
        4
    } else {
        5
    }
}

/// Count main tensions per bucket. Every bucket is present, zeros included.
pub fn distribution(tensions: impl IntoIterator<Item = f64>) -> Vec<(&'static str, i64)> {
    let mut counts = [0i64; TENSION_BUCKETS.len()];
    for kg in tensions {
        counts[bucket_index(kg)] += 1;
    }
    TENSION_BUCKETS.iter().copied().zip(counts).collect()
}

pub fn unit_label(is_kg: bool) -> &'static str {
    if is_kg {
        "kg"
    } else {
        "lb"
    }
}

/// "24 kg", or "24/23 kg" when the cross tension differs from the main.
pub fn format_tension(main: f64, cross: Option<f64>, is_kg: bool) -> String {
    let unit = unit_label(is_kg);
    match cross {
        Some(cross) if cross != main => format!("{main}/{cross} {unit}"),
        _ => format!("{main} {unit}"),
    }
}
