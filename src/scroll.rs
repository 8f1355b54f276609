/// Page scroll position as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub scroll_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> Self {
        Self {
            scroll_y,
            scroll_height,
            viewport_height,
        }
    }
}

/// Percentage of the scrollable distance covered, clamped to 0..=100.
pub fn scroll_percent(metrics: &ScrollMetrics) -> u8 {
    let max = metrics.scroll_height - metrics.viewport_height;
    if max <= 0.0 || !max.is_finite() {
        return 0;
    }
    let pct = (metrics.scroll_y / max * 100.0).round();
    if pct.is_nan() {
        return 0;
    }
    pct.clamp(0.0, 100.0) as u8
}

/// Two-digit label, e.g. `05%`.
pub fn format_percent(pct: u8) -> String {
    format!("{pct:02}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_percent() {
        assert_eq!(scroll_percent(&ScrollMetrics::new(0.0, 2000.0, 1000.0)), 0);
        assert_eq!(scroll_percent(&ScrollMetrics::new(500.0, 2000.0, 1000.0)), 50);
        assert_eq!(scroll_percent(&ScrollMetrics::new(1000.0, 2000.0, 1000.0)), 100);
        assert_eq!(scroll_percent(&ScrollMetrics::new(3.0, 1000.0, 900.0)), 3);
    }

    #[test]
    fn test_scroll_percent_short_page() {
        assert_eq!(scroll_percent(&ScrollMetrics::new(0.0, 800.0, 1000.0)), 0);
        assert_eq!(scroll_percent(&ScrollMetrics::new(10.0, 1000.0, 1000.0)), 0);
    }

    #[test]
    fn test_scroll_percent_clamps_overscroll() {
        assert_eq!(scroll_percent(&ScrollMetrics::new(-50.0, 2000.0, 1000.0)), 0);
        assert_eq!(scroll_percent(&ScrollMetrics::new(1500.0, 2000.0, 1000.0)), 100);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0), "00%");
        assert_eq!(format_percent(5), "05%");
        assert_eq!(format_percent(42), "42%");
        assert_eq!(format_percent(100), "100%");
    }
}
