use crate::index::{
    GaoParams, KitohUchiyamaParams, LiMeiyuParams, LiZhangParams, MIN_SLOPE_WINDOW, Wang2004Params,
    WangFanParams, WangLinHoParams, YimParams,
};
use crate::region::Region;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, ops::RangeBounds, path::Path};

const BUILTIN: &str = include_str!("../catalog.toml");

/// Constants of every index: region boxes, thresholds and scan settings.
///
/// Parsed from TOML and validated before use. [`Catalog::builtin`] gives
/// the published values.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub wang_fan_1999: WangFanParams,
    pub wang_etal_2004: Wang2004Params,
    pub gao_etal_2001: GaoParams,
    pub li_etal_2018: LiMeiyuParams,
    pub wang_linho_2002: WangLinHoParams,
    pub kitoh_uchiyama_2006: KitohUchiyamaParams,
    pub li_zhang_2009: LiZhangParams,
    pub yim_etal_2014: YimParams,
}

impl Catalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml(BUILTIN).context("failed to load builtin catalog")
    }

    /// Parse and validate a catalog from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(text).context("failed to deserialize catalog")?;

        catalog.validate().context("failed to validate catalog")?;

        log::debug!("loaded catalog with {} Yim regions", catalog.yim_etal_2014.precip.len());
        Ok(catalog)
    }

    /// Load a [`Catalog`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the catalog values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let text = fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;
        Self::from_toml(&text).with_context(|| format!("failed to load catalog {file:?}"))
    }

    fn validate(&self) -> Result<()> {
        let wf = &self.wang_fan_1999;
        check_level(wf.level_hpa).context("invalid Wang & Fan 1999 level")?;
        check_region(&wf.primary).context("invalid Wang & Fan 1999 primary box")?;
        check_region(&wf.secondary).context("invalid Wang & Fan 1999 secondary box")?;

        let w04 = &self.wang_etal_2004;
        check_level(w04.level_hpa).context("invalid Wang et al. 2004 level")?;
        check_region(&w04.region).context("invalid Wang et al. 2004 box")?;
        check_num(w04.first_pentad, 1..=73).context("invalid Wang et al. 2004 first pentad")?;
        check_num(w04.window, 1..=73).context("invalid Wang et al. 2004 window")?;
        check_num(w04.min_positive, 0..=w04.window)
            .context("invalid Wang et al. 2004 westerly count")?;

        let gao = &self.gao_etal_2001;
        check_level(gao.level_hpa).context("invalid Gao et al. 2001 level")?;
        check_region(&gao.region).context("invalid Gao et al. 2001 box")?;
        check_num(gao.theta_e_threshold, 200.0..500.0)
            .context("invalid Gao et al. 2001 theta_e threshold")?;

        let li18 = &self.li_etal_2018;
        check_level(li18.level_hpa).context("invalid Li et al. 2018 level")?;
        check_region(&li18.region).context("invalid Li et al. 2018 box")?;
        check_num(li18.gradient_threshold, 0.0..1.0)
            .context("invalid Li et al. 2018 gradient threshold")?;
        check_num(li18.reference_resolution, 0.01..10.0)
            .context("invalid Li et al. 2018 reference resolution")?;
        check_num(li18.cell_fraction, 0.0..=1.0).context("invalid Li et al. 2018 cell fraction")?;

        let wlh = &self.wang_linho_2002;
        check_num(wlh.margin, 0.0..100.0).context("invalid Wang & LinHo 2002 margin")?;
        check_num(wlh.sustain, 1..=73).context("invalid Wang & LinHo 2002 sustain count")?;
        check_months(&wlh.north_months).context("invalid Wang & LinHo 2002 northern months")?;
        check_months(&wlh.south_months).context("invalid Wang & LinHo 2002 southern months")?;

        let ku = &self.kitoh_uchiyama_2006;
        check_num(ku.threshold, 0.0..=1.0).context("invalid Kitoh & Uchiyama 2006 threshold")?;
        check_num(ku.sustain, 1..=73).context("invalid Kitoh & Uchiyama 2006 sustain count")?;

        let lz = &self.li_zhang_2009;
        check_level(lz.level_hpa).context("invalid Li & Zhang 2009 level")?;
        check_region(&lz.region).context("invalid Li & Zhang 2009 box")?;
        check_num(lz.sustain_days, 1..=180).context("invalid Li & Zhang 2009 sustain days")?;
        check_num(lz.slope_window, MIN_SLOPE_WINDOW..=60)
            .context("invalid Li & Zhang 2009 slope window")?;
        for (months, what) in [
            (&lz.reference_months, "reference"),
            (&lz.summer_months, "summer"),
            (&lz.onset_months, "onset"),
            (&lz.withdrawal_months, "withdrawal"),
        ] {
            check_months(months).with_context(|| format!("invalid Li & Zhang 2009 {what} months"))?;
        }

        let yim = &self.yim_etal_2014;
        check_level(yim.level_hpa).context("invalid Yim et al. 2014 level")?;
        for (key, region) in &yim.precip {
            check_region(region)
                .with_context(|| format!("invalid Yim et al. 2014 precipitation box {key}"))?;
        }
        for (key, boxes) in &yim.vorticity {
            check_region(&boxes.primary)
                .with_context(|| format!("invalid Yim et al. 2014 primary box {key}"))?;
            if let Some(secondary) = &boxes.secondary {
                check_region(secondary)
                    .with_context(|| format!("invalid Yim et al. 2014 secondary box {key}"))?;
            }
        }

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

fn check_level(level_hpa: f64) -> Result<()> {
    check_num(level_hpa, 1.0..=1100.0)
}

fn check_region(region: &Region) -> Result<()> {
    let [south, north] = region.lat;
    check_num(south, -90.0..=90.0).context("invalid southern bound")?;
    check_num(north, -90.0..=90.0).context("invalid northern bound")?;
    if south > north {
        bail!("southern bound {south} must not exceed northern bound {north}");
    }
    // Western bounds above eastern ones are allowed and wrap.
    for lon in region.lon {
        check_num(lon, -360.0..=360.0).context("invalid longitude bound")?;
    }
    Ok(())
}

fn check_months(months: &[u32]) -> Result<()> {
    if months.is_empty() {
        bail!("month list must not be empty");
    }
    for &month in months {
        check_num(month, 1..=12).context("invalid month")?;
    }
    Ok(())
}
