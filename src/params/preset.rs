use crate::params::visual::VisualParams;

/// The closed set of background patterns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Preset {
    /// Stacked wave lines on a transparent layer.
    #[default]
    Calm,
    /// Closed horizontal bands.
    Ribbons,
    /// Jittered grid of rounded squares.
    Pixels,
    /// Full-height vertical bars.
    Bars,
    /// Overlapping soft circles.
    Cloud,
    /// Pulsing quantized block grid.
    Blocks,
    /// Wide bands running past the edges.
    Flow,
    /// Circles masked to noise ridges.
    Blob,
    /// Radial wedges around the centre.
    Burst,
    /// Dot grid sized by noise.
    Halftone,
}

impl Preset {
    /// Every preset, in menu order.
    pub const ALL: [Preset; 10] = [
        Preset::Calm,
        Preset::Ribbons,
        Preset::Pixels,
        Preset::Bars,
        Preset::Cloud,
        Preset::Blocks,
        Preset::Flow,
        Preset::Blob,
        Preset::Burst,
        Preset::Halftone,
    ];

    /// Display and persistence name.
    pub fn name(self) -> &'static str {
        match self {
            Preset::Calm => "Calm",
            Preset::Ribbons => "Ribbons",
            Preset::Pixels => "Pixels",
            Preset::Bars => "Bars",
            Preset::Cloud => "Cloud",
            Preset::Blocks => "Blocks",
            Preset::Flow => "Flow",
            Preset::Blob => "Blob",
            Preset::Burst => "Burst",
            Preset::Halftone => "Halftone",
        }
    }

    /// Case-sensitive name lookup; unknown names fall back to `Calm`.
    pub fn parse(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name.trim())
            .unwrap_or(Preset::Calm)
    }

    /// Full parameter profile for this preset: shared base values, then the overrides.
    pub fn profile(self) -> VisualParams {
        let mut p = VisualParams {
            offset_x: 0.0,
            offset_y: 0.0,
            rotation: 0.0,
            wave_width: 220.0,
            waves_amount: 140.0,
            smoothness: 6.0,
            amplify: 90.0,
            frequency: 70.0,
            uniformity: 80.0,
            speed: 4.8,
            noise_seed: 3135.0,
        };

        // (waveWidth, wavesAmount, smoothness, amplify, frequency, speed)
        let (ww, wa, sm, amp, freq, speed) = match self {
            Preset::Calm => (260.0, 70.0, 10.0, 60.0, 45.0, 3.0),
            Preset::Ribbons => (200.0, 90.0, 5.0, 110.0, 85.0, 6.0),
            Preset::Pixels => (220.0, 120.0, 6.0, 80.0, 65.0, 4.0),
            Preset::Bars => (260.0, 80.0, 4.0, 95.0, 80.0, 7.0),
            Preset::Cloud => (200.0, 160.0, 14.0, 70.0, 40.0, 3.0),
            Preset::Blocks => (210.0, 160.0, 8.0, 80.0, 55.0, 4.5),
            Preset::Flow => (260.0, 60.0, 10.0, 100.0, 50.0, 5.6),
            Preset::Blob => (190.0, 110.0, 9.0, 90.0, 45.0, 4.0),
            Preset::Burst => (280.0, 90.0, 5.0, 115.0, 75.0, 6.5),
            Preset::Halftone => (190.0, 200.0, 12.0, 70.0, 60.0, 3.8),
        };
        p.wave_width = ww;
        p.waves_amount = wa;
        p.smoothness = sm;
        p.amplify = amp;
        p.frequency = freq;
        p.speed = speed;

        match self {
            Preset::Cloud => p.uniformity = 60.0,
            Preset::Blob => p.uniformity = 55.0,
            Preset::Burst => p.rotation = 5.0,
            _ => {}
        }
        p
    }

    /// Overwrite every field of `params` with this preset's profile.
    pub fn apply(self, params: &mut VisualParams) {
        *params = self.profile();
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/preset.rs"]
mod tests;
