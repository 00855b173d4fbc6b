/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default number of vendors on the featured grid
pub const DEFAULT_FEATURED_LIMIT: i64 = 12;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role, set as a custom `roles` claim on the provider account
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// UPLOADS
// =============================================================================

/// Maximum vendor image size (10MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];
