//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Domain-specific constants are defined in `ors_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "ors.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "ors";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "ORS";

/// Separator between nested keys in environment variables
/// (`ORS_UPSTREAMS__PRODUCTS__POLICY__RETRY_COUNT`)
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "ORS_LOG";

/// File name prefix for rolled log files
pub const LOG_FILE_PREFIX: &str = "ors";

// ============================================================================
// UPSTREAM CONSTANTS
// ============================================================================

/// Default users directory base URL
pub const USERS_DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default users directory resource path
pub const USERS_DEFAULT_RESOURCE_PATH: &str = "gateway/users";

/// Default product catalog base URL
pub const PRODUCTS_DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default product catalog resource path
pub const PRODUCTS_DEFAULT_RESOURCE_PATH: &str = "gateway/products";

// ============================================================================
// EVENT BUS CONSTANTS
// ============================================================================

/// Default NATS client name
pub const DEFAULT_NATS_CLIENT_NAME: &str = "orders-lookup";

/// Prefix of the durable consumer names (`{prefix}-{stream}`)
pub const DEFAULT_DURABLE_PREFIX: &str = "orders";

/// Default invalidation stream of the users directory
pub const USERS_DEFAULT_STREAM: &str = "users";

/// Default invalidation stream of the product catalog
pub const PRODUCTS_DEFAULT_STREAM: &str = "products";
