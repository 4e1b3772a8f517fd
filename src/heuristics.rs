//! Perceptual scores used to classify and invert colors.
//!
//! The affine coefficients below were fit offline against a corpus of rated
//! colors and must be reproduced exactly.

use crate::color::{Component, Components};
use crate::math::{clamp01, map_channels, to_channels, Channels};

/// Estimate how dark a color is perceived to be, in `0..=1`. Channels are in
/// `0..=255`, `alpha` in `0..=1`.
pub fn darkness_score(rgb: Components, alpha: Component) -> Component {
    let Components(red, green, blue) = rgb;

    clamp01(
        alpha
            * (-0.002315205943 * red + 0.724916473719 - 0.00518915994 * green + 1.093306292424
                - 0.001444153598 * blue
                + 0.627977492263),
    )
}

/// The absolute channel differences `|R-G|`, `|G-B|` and `|B-R|`.
fn channel_differences(rgb: Components) -> Channels {
    let Components(red, green, blue) = rgb;
    Channels::new(
        (red - green).abs(),
        (green - blue).abs(),
        (blue - red).abs(),
    )
}

/// Estimate how colorful a color is perceived to be, in `0..=1`.
pub fn vibrancy_score(rgb: Components) -> Component {
    let d = channel_differences(rgb);

    let p = 0.006339594673 * d.x + 0.1357803475 + 0.006733518277 * d.y + 0.1787805054
        + 0.005240646414 * d.z
        + 0.1162090602;

    clamp01(p / 3.0)
}

/// Running count, mean and sum of squared deviations of the three channel
/// difference axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleStats {
    /// The number of samples.
    pub count: usize,
    /// The mean of each axis.
    pub mean: Channels,
    /// The sum of squared deviations from the mean of each axis.
    pub m2: Channels,
}

impl SampleStats {
    /// Statistics of a single sample.
    pub fn single(sample: Channels) -> Self {
        Self {
            count: 1,
            mean: sample,
            m2: Channels::zero(),
        }
    }

    /// Merge two sets of statistics with Chan's parallel variance formula.
    pub fn merge(&self, other: &Self) -> Self {
        let count = self.count + other.count;
        if count == 0 {
            return *self;
        }

        let (na, nb, n) = (
            self.count as Component,
            other.count as Component,
            count as Component,
        );
        let delta = other.mean - self.mean;

        Self {
            count,
            mean: self.mean + delta * (nb / n),
            m2: self.m2 + other.m2 + delta.component_mul(delta) * (na * nb / n),
        }
    }

    /// Population standard deviation of each axis.
    pub fn stdev(&self) -> Channels {
        if self.count == 0 {
            return Channels::zero();
        }
        let variance = self.m2 / self.count as Component;
        map_channels(variance, Component::sqrt)
    }
}

/// Statistics of the channel differences of a fixed reference palette:
/// white, three grays, black and the three primaries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaselineStats(SampleStats);

impl BaselineStats {
    const PALETTE: [Components; 8] = [
        Components(255.0, 255.0, 255.0),
        Components(192.0, 192.0, 192.0),
        Components(128.0, 128.0, 128.0),
        Components(64.0, 64.0, 64.0),
        Components(0.0, 0.0, 0.0),
        Components(255.0, 0.0, 0.0),
        Components(0.0, 255.0, 0.0),
        Components(0.0, 0.0, 255.0),
    ];

    /// Compute the statistics of the reference palette.
    pub fn new() -> Self {
        let stats = Self::PALETTE
            .iter()
            .map(|rgb| SampleStats::single(channel_differences(*rgb)))
            .reduce(|a, b| a.merge(&b))
            .unwrap_or(SampleStats::single(Channels::zero()));
        Self(stats)
    }

    /// The merged statistics.
    pub fn stats(&self) -> &SampleStats {
        &self.0
    }
}

impl Default for BaselineStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Standardize the channel differences of a color against the baseline and
/// average the three z-scores. Axes without spread contribute 0.
pub fn vibrancy_z_score(rgb: Components, baseline: &BaselineStats) -> Component {
    let d = channel_differences(rgb);
    let mean = baseline.stats().mean;
    let stdev = baseline.stats().stdev();

    let z = |value: Component, mean: Component, stdev: Component| {
        if stdev == 0.0 {
            0.0
        } else {
            (value - mean) / stdev
        }
    };

    (z(d.x, mean.x, stdev.x) + z(d.y, mean.y, stdev.y) + z(d.z, mean.z, stdev.z)) / 3.0
}

/// WCAG relative luminance of a color with channels in `0..=255`.
pub fn relative_luminance(rgb: Components) -> Component {
    let linear = map_channels(to_channels(rgb), |c| {
        let c = c / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    });

    0.2126 * linear.x + 0.7152 * linear.y + 0.0722 * linear.z
}

/// WCAG contrast ratio between two luminances, in `1..=21`.
pub fn contrast_ratio(a: Component, b: Component) -> Component {
    (a.max(b) + 0.05) / (a.min(b) + 0.05)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_component_eq;

    #[test]
    fn darkness() {
        assert_eq!(darkness_score(Components(0.0, 0.0, 0.0), 1.0), 1.0);
        assert_eq!(darkness_score(Components(0.0, 0.0, 0.0), 0.0), 0.0);
        assert!(darkness_score(Components(255.0, 255.0, 255.0), 1.0) < 0.2);
        assert!(
            darkness_score(Components(64.0, 64.0, 64.0), 1.0)
                > darkness_score(Components(200.0, 200.0, 200.0), 1.0)
        );
    }

    #[test]
    fn vibrancy() {
        let gray = vibrancy_score(Components(128.0, 128.0, 128.0));
        assert_component_eq!(gray, (0.1357803475 + 0.1787805054 + 0.1162090602) / 3.0);
        assert_eq!(vibrancy_score(Components(255.0, 0.0, 0.0)), 1.0);
        assert!(vibrancy_score(Components(200.0, 100.0, 100.0)) > gray);
    }

    #[test]
    fn merge_matches_direct_computation() {
        let samples = [1.0, 2.0, 4.0, 7.0];
        let stats = samples
            .iter()
            .map(|v| SampleStats::single(Channels::new(*v, 0.0, *v * 2.0)))
            .reduce(|a, b| a.merge(&b))
            .unwrap();

        assert_eq!(stats.count, 4);
        assert_component_eq!(stats.mean.x, 3.5);
        assert_component_eq!(stats.mean.z, 7.0);
        // Population variance of 1, 2, 4, 7 is 5.25.
        assert_component_eq!(stats.stdev().x, (5.25 as Component).sqrt());
        assert_eq!(stats.stdev().y, 0.0);
    }

    #[test]
    fn baseline() {
        let baseline = BaselineStats::new();
        assert_eq!(baseline.stats().count, 8);
        // Each axis sees 255 for two of the primaries.
        assert_component_eq!(baseline.stats().mean.x, 63.75);

        assert!(vibrancy_z_score(Components(128.0, 128.0, 128.0), &baseline) < 0.0);
        assert!(vibrancy_z_score(Components(255.0, 0.0, 0.0), &baseline) > 0.0);
    }

    #[test]
    fn luminance_and_contrast() {
        assert_component_eq!(relative_luminance(Components(255.0, 255.0, 255.0)), 1.0);
        assert_eq!(relative_luminance(Components(0.0, 0.0, 0.0)), 0.0);
        assert_component_eq!(contrast_ratio(1.0, 0.0), 21.0);
        assert_component_eq!(contrast_ratio(0.0, 1.0), 21.0);
        assert_eq!(contrast_ratio(0.5, 0.5), 1.0);
    }
}
