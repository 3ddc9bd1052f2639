//! Named unit-conversion and ellipsoid constants, so decoders and this
//! specification can be diffed field-by-field against the RTCM tables.
//! Values are written as literal floats (rather than `2f64.powi(n)`
//! expressions) so they are trivially `const`.

/// WGS84 semi-major axis, metres.
pub const WGS84_A: f64 = 6_378_137.0;
/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = 6.694_379_990_14e-3;
/// Mean Earth radius used for great-circle distance, kilometres.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;
/// Convergence threshold for the iterative ECEF->geodetic latitude
/// solution, radians.
pub const ECEF_LAT_TOLERANCE_RAD: f64 = 1e-11;
/// Safety cap on ECEF->geodetic iterations (convergence is normally
/// reached in under 10 passes).
pub const ECEF_LAT_MAX_ITERATIONS: usize = 50;

/// ARP/antenna position scale (1005/1006): 0.0001 m per unit.
pub const ARP_POSITION_SCALE: f64 = 0.0001;
/// Antenna height scale (1006): 0.0001 m per unit.
pub const ANTENNA_HEIGHT_SCALE: f64 = 0.0001;

/// GLONASS code-phase bias scale (1230): 0.01 ns per unit.
pub const GLONASS_BIAS_SCALE_NS: f64 = 0.01;

/// System parameters (1013) announcement interval scale: 0.1 s per unit.
pub const ANNOUNCE_INTERVAL_SCALE_S: f64 = 0.1;

/// GPS broadcast ephemeris (1019) scale factors, named after the RTCM
/// 10403.3 field they apply to.
pub mod gps_eph {
    pub const AF0_SCALE: f64 = 4.656_612_873_077_393e-10; // 2^-31 s
    pub const AF1_SCALE: f64 = 1.136_868_377_216_160_3e-13; // 2^-43 s/s
    pub const AF2_SCALE: f64 = 2.775_557_561_562_891_4e-17; // 2^-55 s/s^2
    pub const DELTA_N_SCALE: f64 = 3.571_577_341_960_839e-13; // 2^-43 * pi rad/s
    pub const M0_SCALE: f64 = 1.462_918_079_267_159_6e-9; // 2^-31 * pi rad
    pub const CUC_SCALE: f64 = 1.862_645_149_230_957e-9; // 2^-29 rad
    pub const CUS_SCALE: f64 = 1.862_645_149_230_957e-9; // 2^-29 rad
    pub const CRC_SCALE: f64 = 0.03125; // 2^-5 m
    pub const CRS_SCALE: f64 = 0.03125; // 2^-5 m
    pub const CIC_SCALE: f64 = 1.862_645_149_230_957e-9; // 2^-29 rad
    pub const CIS_SCALE: f64 = 1.862_645_149_230_957e-9; // 2^-29 rad
    pub const E_SCALE: f64 = 1.164_153_218_269_348_1e-10; // 2^-33
    pub const SQRT_A_SCALE: f64 = 1.907_348_632_812_5e-6; // 2^-19 sqrt(m)
    pub const TOE_SCALE: f64 = 16.0; // 2^4 s
    pub const TOC_SCALE: f64 = 16.0; // 2^4 s
    pub const IDOT_SCALE: f64 = 3.571_577_341_960_839e-13; // 2^-43 * pi rad/s
    pub const TGD_SCALE: f64 = 4.656_612_873_077_393e-10; // 2^-31 s
    pub const TX_TIME_SCALE: f64 = 16.0; // 2^4 s
}

/// Galileo F/NAV ephemeris (1045) scale factors.
pub mod gal_eph {
    pub const IDOT_SCALE: f64 = 3.571_577_341_960_839e-13; // 2^-43 * pi rad/s
    pub const DELTA_N_SCALE: f64 = 3.571_577_341_960_839e-13; // 2^-43 * pi rad/s
    pub const M0_SCALE: f64 = 1.462_918_079_267_159_6e-9; // 2^-31 * pi rad
    pub const E_SCALE: f64 = 1.164_153_218_269_348_1e-10; // 2^-33
    pub const SQRT_A_SCALE: f64 = 1.907_348_632_812_5e-6; // 2^-19 sqrt(m)
    pub const OMEGA0_SCALE: f64 = 1.462_918_079_267_159_6e-9; // 2^-31 * pi rad
    pub const I0_SCALE: f64 = 1.462_918_079_267_159_6e-9; // 2^-31 * pi rad
    pub const OMEGA_SCALE: f64 = 1.462_918_079_267_159_6e-9; // 2^-31 * pi rad
    pub const OMEGA_DOT_SCALE: f64 = 3.571_577_341_960_839e-13; // 2^-43 * pi rad/s
    pub const CUC_SCALE: f64 = 1.862_645_149_230_957e-9; // 2^-29 rad
    pub const CUS_SCALE: f64 = 1.862_645_149_230_957e-9; // 2^-29 rad
    pub const CRC_SCALE: f64 = 0.03125; // 2^-5 m
    pub const CRS_SCALE: f64 = 0.03125; // 2^-5 m
    pub const CIC_SCALE: f64 = 1.862_645_149_230_957e-9; // 2^-29 rad
    pub const CIS_SCALE: f64 = 1.862_645_149_230_957e-9; // 2^-29 rad
    pub const TOE_SCALE: f64 = 16.0; // 2^4 s
    pub const BGD_SCALE: f64 = 2.328_306_436_538_696_5e-10; // 2^-32 s
}

/// MSM fine-observable scale factors (RTCM 10403.3 §3.5.8).
pub mod msm {
    pub const MSM4_PSEUDORANGE_FINE_SCALE: f64 = 0.02; // m (GPS/GLO/GAL)
    pub const MSM4_PSEUDORANGE_FINE_SCALE_QZSS_1124: f64 = 0.1; // m, per spec
    pub const MSM4_PHASERANGE_FINE_SCALE: f64 = 0.0005; // m
    pub const MSM7_PSEUDORANGE_FINE_SCALE: f64 = 1.862_645_149_230_957e-9; // 2^-29 ms
    pub const MSM7_PHASERANGE_FINE_SCALE: f64 = 4.656_612_873_077_393e-10; // 2^-31 ms
    pub const MSM7_PHASERANGE_RATE_FINE_SCALE: f64 = 0.0001; // m/s
    pub const MSM7_CNR_SCALE: f64 = 0.0625; // dB-Hz
    pub const ROUGH_RANGE_MODULO_SCALE: f64 = 1.0 / 1024.0; // ms
    /// Rough phase-range rate (per-satellite extended info): spec gives
    /// this field's unit as bare m/s, unlike the fine per-cell rate.
    pub const MSM7_ROUGH_PHASERANGE_RATE_SCALE: f64 = 1.0; // m/s
}
