use once_cell::sync::Lazy;

/// Runtime knobs for merkleization. Protocol limits are not configurable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashingCfg {
    pub parallel: bool,             // gate the rayon path at runtime
    pub min_parallel_fields: usize, // containers with fewer fields hash inline
}

impl Default for HashingCfg {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_fields: 8,
        }
    }
}

impl HashingCfg {
    /// Defaults overridden by `BEACON_SSZ_PARALLEL_HASH` and
    /// `BEACON_SSZ_PARALLEL_MIN_FIELDS`. Unparseable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(raw) = lookup("BEACON_SSZ_PARALLEL_HASH") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "0" | "false" | "off" | "no" => cfg.parallel = false,
                "1" | "true" | "on" | "yes" => cfg.parallel = true,
                other => log::warn!("ignoring BEACON_SSZ_PARALLEL_HASH={other}"),
            }
        }
        if let Some(raw) = lookup("BEACON_SSZ_PARALLEL_MIN_FIELDS") {
            match raw.trim().parse::<usize>() {
                Ok(v) if v > 0 => cfg.min_parallel_fields = v,
                _ => log::warn!("ignoring BEACON_SSZ_PARALLEL_MIN_FIELDS={raw}"),
            }
        }
        cfg
    }
}

static HASHING: Lazy<HashingCfg> = Lazy::new(|| {
    let cfg = HashingCfg::from_env();
    log::debug!(
        "ssz hashing config: parallel={} min_parallel_fields={}",
        cfg.parallel,
        cfg.min_parallel_fields
    );
    cfg
});

/// Process-wide hashing config, read from the environment on first use.
pub fn hashing() -> &'static HashingCfg {
    &HASHING
}
