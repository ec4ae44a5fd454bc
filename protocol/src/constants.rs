//! Protocol constants

/// Ping binary invoked on the remote host
pub const PING_BIN: &str = "ping";

/// Structured-output formatter the raw ping text is piped through
pub const FORMATTER_CMD: &str = "jc --ping";

/// Echo requests sent per probe when the bundle does not say otherwise
pub const DEFAULT_COUNT: u32 = 5;

/// Tolerated loss for a (host, destination) pair without a threshold entry.
///
/// Zero is the strictest tolerance: any lost packet turns a probe into
/// FLAPPING (or FAIL on total loss).
pub const DEFAULT_MAX_DROP: u32 = 0;
