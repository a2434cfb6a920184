use std::sync::OnceLock;

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

pub(crate) fn debug_enabled() -> bool {
    *DEBUG_ENABLED.get_or_init(|| std::env::var("QR_DEBUG").is_ok())
}

static MIRROR_RETRY: OnceLock<bool> = OnceLock::new();

/// Default for retrying a failed decode with a mirrored reading
pub(crate) fn mirror_retry_default() -> bool {
    *MIRROR_RETRY.get_or_init(|| parse_env_bool_u8("QR_MIRROR_RETRY", true))
}

static FORMAT_MAX_BIT_ERRORS: OnceLock<u32> = OnceLock::new();

/// Hamming distance tolerated when matching format and version words
pub(crate) fn format_max_bit_errors() -> u32 {
    *FORMAT_MAX_BIT_ERRORS
        .get_or_init(|| parse_env_usize("QR_FORMAT_MAX_BIT_ERRORS", 3).min(3) as u32)
}

static PARALLEL_BATCH_MIN: OnceLock<usize> = OnceLock::new();

/// Smallest batch decoded on the rayon pool; smaller batches run inline
pub(crate) fn parallel_batch_min() -> usize {
    *PARALLEL_BATCH_MIN.get_or_init(|| parse_env_usize("QR_PARALLEL_BATCH_MIN", 4).max(1))
}
