//! Fixed catalog of the results archive.
//!
//! These are the defaults for the `[catalog]` and `[scrape]` config
//! sections. Nothing in the pipeline reads them directly; they reach the
//! enumerator through `AppConfig::plan()`.

/// First season published in the archive.
pub const FIRST_YEAR: u16 = 2004;

/// Last season scraped (inclusive).
pub const LAST_YEAR: u16 = 2022;

pub const CONFERENCES: [&str; 6] = ["1A", "2A", "3A", "4A", "5A", "6A"];

pub const LEVELS: [&str; 3] = ["District", "Region", "State"];

/// Event abbreviations accepted by `s_event_abbr`.
pub const EVENTS: [&str; 42] = [
    "ACC", "BJE", "CAL", "COM", "CSC", "CON", "CPY", "CXD", "CIE", "EWR", "FWR", "CAN",
    "DOC", "NAR", "TAN", "HWR", "INF", "JRN", "LHE", "LDO", "LIT", "MTH", "NWR", "NUM",
    "OAP", "PER", "POE", "PRO", "RWR", "RBB", "RBF", "RFF", "SCI", "SOC", "SPE", "SPV",
    "THT", "COS", "GRP", "HMK", "MKT", "SCN",
];

pub const ARCHIVE_URL: &str = "https://utdirect.utexas.edu/nlogon/uil/vlcp_pub_arch.WBX";

pub const USER_AGENT: &str = "uil-scrape/0.1.0";

pub const OUTPUT_DIR: &str = "Data";
