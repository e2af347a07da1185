// Single source of truth for all default values.

// --- Analysis ---
pub const DEFAULT_DECOMPOSITION_ENABLED: bool = true;
pub const DEFAULT_DECOMPOSITION_THRESHOLD: f64 = 0.6;
pub const DEFAULT_MIN_DECOMPOSE_TOKENS: usize = 12;
pub const DEFAULT_MAX_SUBTASKS: usize = 3;

// --- Retrieval ---
pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_RRF_K: u32 = 60;
pub const DEFAULT_RETRIEVAL_TIMEOUT_MS: u64 = 3_000;
pub const DEFAULT_DEDUP_SIMILARITY: f64 = 0.9;

// --- Reranking ---
pub const DEFAULT_RERANK_ENABLED: bool = true;
pub const DEFAULT_RERANK_TOP_K: usize = 20;
pub const DEFAULT_RERANK_ALPHA: f64 = 0.7;
pub const DEFAULT_REDUNDANCY_THRESHOLD: f64 = 0.85;
pub const DEFAULT_CONTEXT_TOKEN_BUDGET: usize = 2_000;
pub const DEFAULT_CONTEXT_ITEM_BUDGET: usize = 8;

// --- Generation ---
pub const DEFAULT_MAX_TOKENS: usize = 256;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_PRIMARY_BACKEND: &str = "primary";
pub const DEFAULT_FALLBACK_BACKEND: &str = "fallback";
pub const DEFAULT_SMALL_CONTEXT_MAX_ITEMS: usize = 3;

// --- Resource ---
pub const DEFAULT_CPU_WARNING: f64 = 80.0;
pub const DEFAULT_CPU_CRITICAL: f64 = 95.0;
pub const DEFAULT_MEMORY_WARNING: f64 = 85.0;
pub const DEFAULT_MEMORY_CRITICAL: f64 = 95.0;
pub const DEFAULT_GPU_WARNING: f64 = 80.0;
pub const DEFAULT_GPU_CRITICAL: f64 = 95.0;
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 5;

// --- Cache ---
pub const DEFAULT_CACHE_ENABLED: bool = true;
pub const DEFAULT_CACHE_CAPACITY: u64 = 1_000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
