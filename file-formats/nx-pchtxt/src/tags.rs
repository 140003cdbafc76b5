//! Token vocabulary of the Patch Text grammar
//!
//! All tag and flag matching is ASCII case-insensitive; the constants are
//! the lowercase canonical forms.

// meta tags
pub(crate) const TITLE_TAG: &str = "@title";
pub(crate) const PROGRAM_ID_TAG: &str = "@program";
pub(crate) const URL_TAG: &str = "@url";
pub(crate) const NSOBID_TAG: &str = "@nsobid"; // legacy

// parsing tags
pub(crate) const ENABLED_TAG: &str = "@enabled";
pub(crate) const DISABLED_TAG: &str = "@disabled";
pub(crate) const HEAP_TAG: &str = "@heap"; // legacy
pub(crate) const STOP_TAG: &str = "@stop";
pub(crate) const FLAG_TAG: &str = "@flag";

// patch kind keywords following @enabled/@disabled
pub(crate) const HEAP_KEYWORD: &str = "heap";
pub(crate) const CHEAT_KEYWORD: &str = "cheat";

// flags
pub(crate) const BIG_ENDIAN_FLAG: &str = "be";
pub(crate) const LITTLE_ENDIAN_FLAG: &str = "le";
pub(crate) const NSOBID_FLAG: &str = "nsobid";
pub(crate) const NROBID_FLAG: &str = "nrobid";
pub(crate) const OFFSET_SHIFT_FLAG: &str = "offset_shift";
pub(crate) const DEBUG_INFO_FLAG: &str = "debug_info";
pub(crate) const ALT_DEBUG_INFO_FLAG: &str = "print_values"; // legacy

/// Tags consumed by the meta pass; harmless no-ops in the main pass
pub(crate) const META_TAGS: [&str; 3] = [TITLE_TAG, PROGRAM_ID_TAG, URL_TAG];
