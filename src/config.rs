use crate::common::error::{SimError, SimResult};
use crate::soc::memory::storage_len;
use serde::Deserialize;

const DEFAULT_DEPTH: usize = 1024;
const DEFAULT_WIDTH: u32 = 8;
const SYMBOL_BITS: u32 = 8;
const DEFAULT_INIT: u64 = 0;

const REQUESTER_COUNT: usize = 4;
const READ_LATENCY: u64 = 1;
const MAX_CYCLES: u64 = 100_000;

/// Word widths the memory model supports.
pub const SUPPORTED_WIDTHS: [u32; 4] = [8, 16, 32, 64];

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
    #[serde(default)]
    pub bus: BusConfig,
}

impl Config {
    /// Parses a TOML document into a configuration.
    pub fn from_toml(text: &str) -> SimResult<Self> {
        toml::from_str(text).map_err(|e| SimError::ConfigurationError(e.to_string()))
    }

    /// Checks cross-field constraints that serde cannot express.
    ///
    /// Memory geometry is validated again by `SinglePortRam::new`; this pass
    /// also covers the bus parameters so a bad file fails before anything is built.
    pub fn validate(&self) -> SimResult<()> {
        self.memory.validate()?;
        self.bus.validate()
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct GeneralConfig {
    #[serde(default)]
    pub trace: bool,

    #[serde(default = "default_max_cycles")]
    pub max_cycles: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            max_cycles: MAX_CYCLES,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct MemoryConfig {
    #[serde(default = "default_depth")]
    pub depth: usize,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_symbol")]
    pub symbol: u32,

    #[serde(default = "default_init")]
    pub init: String,

    #[serde(default = "default_skip_align")]
    pub skip_align: bool,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            width: DEFAULT_WIDTH,
            symbol: SYMBOL_BITS,
            init: default_init(),
            skip_align: true,
        }
    }
}

impl MemoryConfig {
    /// Returns the reset fill value parsed from its hex string.
    pub fn init_val(&self) -> SimResult<u64> {
        parse_hex(&self.init).ok_or_else(|| {
            SimError::ConfigurationError(format!("init '{}' is not a hex value", self.init))
        })
    }

    /// Number of symbols (bytes) per word.
    pub fn body(&self) -> usize {
        (self.width / self.symbol.max(1)) as usize
    }

    pub fn validate(&self) -> SimResult<()> {
        if !SUPPORTED_WIDTHS.contains(&self.width) {
            return Err(SimError::ConfigurationError(format!(
                "width {} is not one of {:?}",
                self.width, SUPPORTED_WIDTHS
            )));
        }
        if self.symbol != SYMBOL_BITS {
            return Err(SimError::ConfigurationError(format!(
                "symbol must be {} bits, got {}",
                SYMBOL_BITS, self.symbol
            )));
        }
        if self.depth == 0 {
            return Err(SimError::ConfigurationError("depth must be nonzero".to_string()));
        }
        storage_len(self.depth, self.body())?;
        self.init_val().map(|_| ())
    }
}

/// Which fabric sits between the requesters and the memory.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Topology {
    /// Arbiter, Wishbone-to-Avalon bridge, latency-bearing Avalon memory.
    #[default]
    Mux,
    /// Two-port arbiter (instruction fetch, loader) in front of a Wishbone RAM.
    Rom,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct BusConfig {
    #[serde(default)]
    pub topology: Topology,

    #[serde(default = "default_requester_count")]
    pub requester_count: usize,

    #[serde(default = "default_read_latency")]
    pub read_latency_min: u64,

    #[serde(default = "default_read_latency")]
    pub read_latency_max: u64,

    #[serde(default)]
    pub latency_seed: u64,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            topology: Topology::Mux,
            requester_count: REQUESTER_COUNT,
            read_latency_min: READ_LATENCY,
            read_latency_max: READ_LATENCY,
            latency_seed: 0,
        }
    }
}

impl BusConfig {
    pub fn validate(&self) -> SimResult<()> {
        if self.requester_count == 0 {
            return Err(SimError::ConfigurationError(
                "requester_count must be at least 1".to_string(),
            ));
        }
        if self.read_latency_min == 0 {
            return Err(SimError::ConfigurationError(
                "read_latency_min must be at least 1 cycle".to_string(),
            ));
        }
        if self.read_latency_max < self.read_latency_min {
            return Err(SimError::ConfigurationError(format!(
                "read_latency_max {} is below read_latency_min {}",
                self.read_latency_max, self.read_latency_min
            )));
        }
        Ok(())
    }
}

fn parse_hex(s: &str) -> Option<u64> {
    let s = s.trim().trim_start_matches("0x");
    u64::from_str_radix(s, 16).ok()
}

fn default_max_cycles() -> u64 {
    MAX_CYCLES
}

fn default_depth() -> usize {
    DEFAULT_DEPTH
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_symbol() -> u32 {
    SYMBOL_BITS
}

fn default_init() -> String {
    format!("{:#x}", DEFAULT_INIT)
}

fn default_skip_align() -> bool {
    true
}

fn default_requester_count() -> usize {
    REQUESTER_COUNT
}

fn default_read_latency() -> u64 {
    READ_LATENCY
}
