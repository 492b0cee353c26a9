// src/style/depth.rs
//! Depth classification and the depth legend

/// Fill color for one depth bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthColor {
    BrightGreen,
    GreenYellow,
    Yellow,
    Orange,
    OrangeRed,
    BrightRed,
}

impl DepthColor {
    /// All buckets, shallowest first
    pub const ALL: [DepthColor; 6] = [
        DepthColor::BrightGreen,
        DepthColor::GreenYellow,
        DepthColor::Yellow,
        DepthColor::Orange,
        DepthColor::OrangeRed,
        DepthColor::BrightRed,
    ];

    /// CSS color token
    pub fn css(&self) -> &'static str {
        match self {
            DepthColor::BrightGreen => "#00FF00",
            DepthColor::GreenYellow => "greenyellow",
            DepthColor::Yellow => "yellow",
            DepthColor::Orange => "orange",
            DepthColor::OrangeRed => "orangered",
            DepthColor::BrightRed => "#FF0000",
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            DepthColor::BrightGreen => (0, 255, 0),
            DepthColor::GreenYellow => (173, 255, 47),
            DepthColor::Yellow => (255, 255, 0),
            DepthColor::Orange => (255, 165, 0),
            DepthColor::OrangeRed => (255, 69, 0),
            DepthColor::BrightRed => (255, 0, 0),
        }
    }

    pub fn hex(&self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }
}

/// Map a depth in kilometres to its color bucket.
///
/// Upper bounds are inclusive, so a depth sitting on a boundary belongs to
/// the shallower bucket. Negative depths land in the first bucket and
/// anything past 90 km (or NaN) in the last.
pub fn classify_depth(depth_km: f64) -> DepthColor {
    if depth_km <= 10.0 {
        DepthColor::BrightGreen
    } else if depth_km <= 30.0 {
        DepthColor::GreenYellow
    } else if depth_km <= 50.0 {
        DepthColor::Yellow
    } else if depth_km <= 70.0 {
        DepthColor::Orange
    } else if depth_km <= 90.0 {
        DepthColor::OrangeRed
    } else {
        DepthColor::BrightRed
    }
}

/// Lower edges of the legend rows, in km
pub const DEPTH_BOUNDARIES: [i32; 6] = [-10, 10, 30, 50, 70, 90];

/// One row of the depth legend
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub lower: i32,
    pub upper: Option<i32>,
    pub color: DepthColor,
}

impl LegendEntry {
    /// Range label, e.g. "10–30", or "90+" for the open-ended last row
    pub fn label(&self) -> String {
        match self.upper {
            Some(upper) => format!("{}\u{2013}{}", self.lower, upper),
            None => format!("{}+", self.lower),
        }
    }
}

/// Build the legend rows.
///
/// Each row samples the classifier one kilometre above its lower edge so
/// that the edge itself is shown with the color of the range it opens.
pub fn legend_entries() -> Vec<LegendEntry> {
    DEPTH_BOUNDARIES
        .iter()
        .enumerate()
        .map(|(i, &lower)| LegendEntry {
            lower,
            upper: DEPTH_BOUNDARIES.get(i + 1).copied(),
            color: classify_depth(f64::from(lower) + 1.0),
        })
        .collect()
}
