#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AspectRatioMode {
    #[default]
    Free,
    Original,
    Square,
    // Landscape
    R3_2,
    R4_3,
    R16_9,
    R16_10,
    // Portrait
    R2_3,
    R3_4,
    R9_16,
    R10_16,
    Custom,
}

impl AspectRatioMode {
    pub const LANDSCAPE: [AspectRatioMode; 4] = [
        AspectRatioMode::R3_2,
        AspectRatioMode::R4_3,
        AspectRatioMode::R16_9,
        AspectRatioMode::R16_10,
    ];

    pub const PORTRAIT: [AspectRatioMode; 4] = [
        AspectRatioMode::R2_3,
        AspectRatioMode::R3_4,
        AspectRatioMode::R9_16,
        AspectRatioMode::R10_16,
    ];

    /// Same shape in the other orientation.
    pub fn counterpart(&self) -> Self {
        match self {
            AspectRatioMode::R3_2 => AspectRatioMode::R2_3,
            AspectRatioMode::R4_3 => AspectRatioMode::R3_4,
            AspectRatioMode::R16_9 => AspectRatioMode::R9_16,
            AspectRatioMode::R16_10 => AspectRatioMode::R10_16,
            AspectRatioMode::R2_3 => AspectRatioMode::R3_2,
            AspectRatioMode::R3_4 => AspectRatioMode::R4_3,
            AspectRatioMode::R9_16 => AspectRatioMode::R16_9,
            AspectRatioMode::R10_16 => AspectRatioMode::R16_10,
            _ => *self,
        }
    }

    /// Width/height in natural pixels, `None` for free cropping.
    pub fn ratio(
        &self,
        natural_w: f64,
        natural_h: f64,
        custom_w: u32,
        custom_h: u32,
    ) -> Option<f64> {
        match self {
            AspectRatioMode::Free => None,
            AspectRatioMode::Original => Some(natural_w / natural_h),
            AspectRatioMode::Square => Some(1.0),
            AspectRatioMode::R3_2 => Some(3.0 / 2.0),
            AspectRatioMode::R4_3 => Some(4.0 / 3.0),
            AspectRatioMode::R16_9 => Some(16.0 / 9.0),
            AspectRatioMode::R16_10 => Some(16.0 / 10.0),
            AspectRatioMode::R2_3 => Some(2.0 / 3.0),
            AspectRatioMode::R3_4 => Some(3.0 / 4.0),
            AspectRatioMode::R9_16 => Some(9.0 / 16.0),
            AspectRatioMode::R10_16 => Some(10.0 / 16.0),
            AspectRatioMode::Custom => Some(custom_w as f64 / custom_h as f64),
        }
    }
}

impl std::fmt::Display for AspectRatioMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AspectRatioMode::Free => "Free",
            AspectRatioMode::Original => "Original",
            AspectRatioMode::Square => "1:1",
            AspectRatioMode::R3_2 => "3:2",
            AspectRatioMode::R4_3 => "4:3",
            AspectRatioMode::R16_9 => "16:9",
            AspectRatioMode::R16_10 => "16:10",
            AspectRatioMode::R2_3 => "2:3",
            AspectRatioMode::R3_4 => "3:4",
            AspectRatioMode::R9_16 => "9:16",
            AspectRatioMode::R10_16 => "10:16",
            AspectRatioMode::Custom => "Custom",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counterparts_swap_orientation() {
        for (landscape, portrait) in AspectRatioMode::LANDSCAPE
            .into_iter()
            .zip(AspectRatioMode::PORTRAIT)
        {
            assert_eq!(landscape.counterpart(), portrait);
            assert_eq!(portrait.counterpart(), landscape);
            let l = landscape.ratio(1.0, 1.0, 1, 1).unwrap();
            let p = portrait.ratio(1.0, 1.0, 1, 1).unwrap();
            assert!((l * p - 1.0).abs() < 1e-12);
        }
        assert_eq!(AspectRatioMode::Square.counterpart(), AspectRatioMode::Square);
    }

    #[test]
    fn ratios() {
        assert_eq!(AspectRatioMode::Free.ratio(800.0, 600.0, 4, 3), None);
        assert_eq!(AspectRatioMode::Original.ratio(800.0, 400.0, 4, 3), Some(2.0));
        assert_eq!(AspectRatioMode::Custom.ratio(800.0, 600.0, 5, 4), Some(1.25));
        assert_eq!(AspectRatioMode::R16_9.to_string(), "16:9");
    }
}
