//! Quality presets and the Kaiser window tables backing them.
//!
//! All tables are static immutable data, shared by reference across every
//! [`Resampler`](crate::Resampler) instance.

/// Discrete Kaiser window samples plus the oversampling factor at which they
/// were tabulated. Filter design interpolates between entries with a cubic
/// blend, so each table carries a few guard entries past the window's end.
#[derive(Debug)]
pub(crate) struct KaiserTable {
    pub(crate) table: &'static [f64],
    pub(crate) oversample: usize,
}

pub(crate) static KAISER12: KaiserTable = KaiserTable {
    table: &[
        0.99859849, 1.00000000, 0.99859849, 0.99440475, 0.98745105, 0.97779076,
        0.96549770, 0.95066529, 0.93340547, 0.91384741, 0.89213598, 0.86843014,
        0.84290116, 0.81573067, 0.78710866, 0.75723148, 0.72629970, 0.69451601,
        0.66208321, 0.62920216, 0.59606986, 0.56287762, 0.52980938, 0.49704014,
        0.46473455, 0.43304576, 0.40211431, 0.37206735, 0.34301800, 0.31506490,
        0.28829195, 0.26276832, 0.23854851, 0.21567274, 0.19416736, 0.17404546,
        0.15530766, 0.13794294, 0.12192957, 0.10723616, 0.09382272, 0.08164178,
        0.07063950, 0.06075685, 0.05193064, 0.04409466, 0.03718069, 0.03111947,
        0.02584161, 0.02127838, 0.01736250, 0.01402878, 0.01121463, 0.00886058,
        0.00691064, 0.00531256, 0.00401805, 0.00298291, 0.00216702, 0.00153438,
        0.00105297, 0.00069463, 0.00043489, 0.00025272, 0.00013031, 0.0000527734,
        0.00001000, 0.00000000,
    ],
    oversample: 64,
};

pub(crate) static KAISER10: KaiserTable = KaiserTable {
    table: &[
        0.99537781, 1.00000000, 0.99537781, 0.98162644, 0.95908712, 0.92831446,
        0.89005583, 0.84522401, 0.79486424, 0.74011713, 0.68217934, 0.62226347,
        0.56155915, 0.50119680, 0.44221549, 0.38553619, 0.33194107, 0.28205962,
        0.23636152, 0.19515633, 0.15859932, 0.12670280, 0.09935205, 0.07632451,
        0.05731132, 0.04193980, 0.02979584, 0.02044510, 0.01345224, 0.00839739,
        0.00488951, 0.00257636, 0.00115101, 0.00035515, 0.00000000, 0.00000000,
    ],
    oversample: 32,
};

pub(crate) static KAISER8: KaiserTable = KaiserTable {
    table: &[
        0.99635258, 1.00000000, 0.99635258, 0.98548012, 0.96759014, 0.94302200,
        0.91223751, 0.87580811, 0.83439927, 0.78875245, 0.73966538, 0.68797126,
        0.63451750, 0.58014482, 0.52566725, 0.47185369, 0.41941150, 0.36897272,
        0.32108304, 0.27619388, 0.23465776, 0.19672670, 0.16255380, 0.13219758,
        0.10562887, 0.08273982, 0.06335451, 0.04724088, 0.03412321, 0.02369490,
        0.01563093, 0.00959968, 0.00527363, 0.00233883, 0.00050000, 0.00000000,
    ],
    oversample: 32,
};

pub(crate) static KAISER6: KaiserTable = KaiserTable {
    table: &[
        0.99733006, 1.00000000, 0.99733006, 0.98935595, 0.97618418, 0.95799003,
        0.93501423, 0.90755855, 0.87598009, 0.84068475, 0.80211977, 0.76076565,
        0.71712752, 0.67172623, 0.62508937, 0.57774224, 0.53019925, 0.48295561,
        0.43647969, 0.39120616, 0.34752997, 0.30580127, 0.26632152, 0.22934058,
        0.19505503, 0.16360756, 0.13508755, 0.10953262, 0.08693120, 0.06722600,
        0.05031820, 0.03607231, 0.02432151, 0.01487334, 0.00752000, 0.00000000,
    ],
    oversample: 32,
};

/// One entry of the preset table: the filter geometry a quality index maps to.
#[derive(Debug)]
pub(crate) struct QualityPreset {
    /// Number of sinc taps before any down-sampling stretch.
    pub(crate) base_length: usize,
    /// Sinc table resolution per output sample period.
    pub(crate) oversample: usize,
    /// Passband edge when reducing the rate, as a fraction of Nyquist.
    pub(crate) downsample_bandwidth: f64,
    /// Passband edge when raising the rate, as a fraction of Nyquist.
    pub(crate) upsample_bandwidth: f64,
    pub(crate) window: &'static KaiserTable,
}

/// Preset table indexed by quality 0-10. Cost and fidelity rise monotonically.
pub(crate) static QUALITY_MAP: [QualityPreset; 11] = [
    // Q0
    QualityPreset {
        base_length: 8,
        oversample: 4,
        downsample_bandwidth: 0.830,
        upsample_bandwidth: 0.860,
        window: &KAISER6,
    },
    // Q1
    QualityPreset {
        base_length: 16,
        oversample: 4,
        downsample_bandwidth: 0.850,
        upsample_bandwidth: 0.880,
        window: &KAISER6,
    },
    // Q2
    QualityPreset {
        base_length: 32,
        oversample: 4,
        downsample_bandwidth: 0.882,
        upsample_bandwidth: 0.910,
        window: &KAISER6,
    },
    // Q3
    QualityPreset {
        base_length: 48,
        oversample: 8,
        downsample_bandwidth: 0.895,
        upsample_bandwidth: 0.917,
        window: &KAISER8,
    },
    // Q4
    QualityPreset {
        base_length: 64,
        oversample: 8,
        downsample_bandwidth: 0.921,
        upsample_bandwidth: 0.940,
        window: &KAISER8,
    },
    // Q5
    QualityPreset {
        base_length: 80,
        oversample: 16,
        downsample_bandwidth: 0.922,
        upsample_bandwidth: 0.940,
        window: &KAISER10,
    },
    // Q6
    QualityPreset {
        base_length: 96,
        oversample: 16,
        downsample_bandwidth: 0.940,
        upsample_bandwidth: 0.945,
        window: &KAISER10,
    },
    // Q7
    QualityPreset {
        base_length: 128,
        oversample: 16,
        downsample_bandwidth: 0.950,
        upsample_bandwidth: 0.950,
        window: &KAISER10,
    },
    // Q8
    QualityPreset {
        base_length: 160,
        oversample: 16,
        downsample_bandwidth: 0.960,
        upsample_bandwidth: 0.960,
        window: &KAISER10,
    },
    // Q9
    QualityPreset {
        base_length: 192,
        oversample: 32,
        downsample_bandwidth: 0.968,
        upsample_bandwidth: 0.968,
        window: &KAISER12,
    },
    // Q10
    QualityPreset {
        base_length: 256,
        oversample: 32,
        downsample_bandwidth: 0.975,
        upsample_bandwidth: 0.975,
        window: &KAISER12,
    },
];

/// Resampling quality preset, an index from 0 (fastest) to 10 (best).
///
/// Out-of-range indices cannot be represented: [`Quality::new`] returns
/// `None` for anything above 10, so a [`Resampler`](crate::Resampler) can
/// only ever be built from a valid preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u8);

impl Quality {
    /// Fastest preset (8-tap filter).
    pub const MIN: Quality = Quality(0);
    /// Balanced preset, the usual choice (80-tap filter).
    pub const DEFAULT: Quality = Quality(5);
    /// Best preset (256-tap filter).
    pub const MAX: Quality = Quality(10);

    /// Creates a quality preset from its index. Returns `None` when `index`
    /// is above 10.
    pub fn new(index: u8) -> Option<Quality> {
        (index <= 10).then_some(Quality(index))
    }

    /// The preset's index, 0-10.
    pub fn index(self) -> u8 {
        self.0
    }

    pub(crate) fn preset(self) -> &'static QualityPreset {
        &QUALITY_MAP[self.0 as usize]
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality::DEFAULT
    }
}

impl TryFrom<u8> for Quality {
    type Error = u8;

    /// Fails with the rejected index when it is above 10.
    fn try_from(index: u8) -> Result<Self, u8> {
        Quality::new(index).ok_or(index)
    }
}
