//! Fallback display colours for lines the dataset leaves uncoloured.

/// Colour used for any line without a known brand colour.
pub const DEFAULT_LINE_COLOR: &str = "#666666";

/// Brand colour for a London Underground line id, if known.
pub fn known_line_color(line: &str) -> Option<&'static str> {
    let color = match line {
        "bakerloo" => "#B36305",
        "central" => "#E32017",
        "circle" => "#FFD300",
        "district" => "#00782A",
        "hammersmith-city" => "#F3A9BB",
        "jubilee" => "#A0A5A9",
        "metropolitan" => "#9B0056",
        "northern" => "#000000",
        "piccadilly" => "#003688",
        "victoria" => "#0098D4",
        "waterloo-city" => "#95CDBA",
        "elizabeth" => "#6950A1",
        "dlr" => "#00A4A7",
        _ => return None,
    };
    Some(color)
}

/// Human-readable name for a line id: `"waterloo-city"` → `"Waterloo City"`.
pub fn display_name(line: &str) -> String {
    line.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
