//! Dashboard color palette and styles.
//!
//! Dark clinical theme for the chrome, plus the chart colors: pie slices,
//! the systolic/diastolic pair, and a diverging map for the heatmap.

use ratatui::style::{Color, Modifier, Style};

/// Dashboard theme color palette.
pub struct DashboardTheme;

impl DashboardTheme {
    // === Chrome ===

    /// Deep teal - Primary color
    pub const PRIMARY: Color = Color::Rgb(13, 148, 136); // #0D9488

    /// Lighter teal for highlights
    pub const PRIMARY_LIGHT: Color = Color::Rgb(45, 212, 191); // #2DD4BF

    /// Light slate for borders
    pub const SECONDARY_LIGHT: Color = Color::Rgb(148, 163, 184); // #94A3B8

    /// Rose - Error
    pub const DANGER: Color = Color::Rgb(244, 63, 94); // #F43F5E

    /// Near-black with blue tint
    pub const BG_DARK: Color = Color::Rgb(15, 23, 42); // #0F172A

    pub const TEXT_PRIMARY: Color = Color::Rgb(248, 250, 252); // #F8FAFC
    pub const TEXT_SECONDARY: Color = Color::Rgb(148, 163, 184); // #94A3B8
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139); // #64748B

    // === Charts ===

    /// Histogram bars and box fill
    pub const SERIES: Color = Color::Rgb(76, 114, 176); // #4C72B0

    /// Density curves
    pub const DENSITY: Color = Color::Rgb(221, 132, 82); // #DD8452

    pub const SYSTOLIC: Color = Color::Rgb(135, 206, 235); // skyblue
    pub const DIASTOLIC: Color = Color::Rgb(255, 0, 0); // red

    /// Pie slices; the first two match the two-gender chart
    pub const PIE: [Color; 6] = [
        Color::Rgb(255, 153, 153), // #ff9999
        Color::Rgb(102, 179, 255), // #66b3ff
        Color::Rgb(153, 255, 153), // #99ff99
        Color::Rgb(255, 204, 153), // #ffcc99
        Color::Rgb(194, 194, 240), // #c2c2f0
        Color::Rgb(255, 179, 230), // #ffb3e6
    ];

    /// Box plot group fills, cycled
    pub const GROUPS: [Color; 4] = [
        Color::Rgb(76, 114, 176),
        Color::Rgb(221, 132, 82),
        Color::Rgb(85, 168, 104),
        Color::Rgb(196, 78, 82),
    ];

    /// Colour of pie slice `index` out of `len`. The palette cycles, but the
    /// last slice never repeats the colour of the first one it touches.
    #[must_use]
    pub fn pie_slice(index: usize, len: usize) -> Color {
        let slot = index % Self::PIE.len();
        if slot == 0 && index > 0 && index + 1 == len {
            Self::PIE[1]
        } else {
            Self::PIE[slot]
        }
    }

    // === Preset Styles ===

    #[must_use]
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT_PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn subtitle() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT_PRIMARY)
    }

    #[must_use]
    pub fn text_secondary() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    #[must_use]
    pub fn danger() -> Style {
        Style::default().fg(Self::DANGER)
    }

    /// Style for the highlighted selector entry
    #[must_use]
    pub fn selected() -> Style {
        Style::default()
            .fg(Self::BG_DARK)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border() -> Style {
        Style::default().fg(Self::SECONDARY_LIGHT)
    }

    #[must_use]
    pub fn border_focused() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    #[must_use]
    pub fn key_hint() -> Style {
        Style::default()
            .fg(Self::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn key_desc() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    #[must_use]
    pub fn axis() -> Style {
        Style::default().fg(Self::TEXT_SECONDARY)
    }

    /// Diverging blue-white-red color for a coefficient in [-1, 1].
    ///
    /// NaN maps to the muted text color.
    #[must_use]
    pub fn coolwarm(value: f64) -> Color {
        const COOL: (f64, f64, f64) = (59.0, 76.0, 192.0);
        const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
        const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

        if value.is_nan() {
            return Self::TEXT_MUTED;
        }
        let v = value.clamp(-1.0, 1.0);
        let (from, to, t) = if v < 0.0 {
            (NEUTRAL, COOL, -v)
        } else {
            (NEUTRAL, WARM, v)
        };
        let mix = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
        Color::Rgb(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
    }

    /// Readable text on top of a [`Self::coolwarm`] cell.
    #[must_use]
    pub fn coolwarm_text(value: f64) -> Color {
        if value.abs() > 0.5 {
            Self::TEXT_PRIMARY
        } else {
            Self::BG_DARK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coolwarm_endpoints() {
        assert_eq!(DashboardTheme::coolwarm(-1.0), Color::Rgb(59, 76, 192));
        assert_eq!(DashboardTheme::coolwarm(0.0), Color::Rgb(221, 221, 221));
        assert_eq!(DashboardTheme::coolwarm(1.0), Color::Rgb(180, 4, 38));
        assert_eq!(DashboardTheme::coolwarm(3.0), DashboardTheme::coolwarm(1.0));
        assert_eq!(DashboardTheme::coolwarm(f64::NAN), DashboardTheme::TEXT_MUTED);
    }

    #[test]
    fn test_pie_slices_keep_neighbours_distinct() {
        assert_eq!(DashboardTheme::pie_slice(0, 2), Color::Rgb(255, 153, 153));
        assert_eq!(DashboardTheme::pie_slice(1, 2), Color::Rgb(102, 179, 255));

        for len in 2..20 {
            let colours: Vec<Color> = (0..len).map(|i| DashboardTheme::pie_slice(i, len)).collect();
            for i in 0..len {
                let next = (i + 1) % len;
                assert_ne!(colours[i], colours[next], "len {len}, slice {i}");
            }
        }
    }
}
