// =============================================================================
// PAGINATION
// =============================================================================

/// Page size for a citizen's own grievance list
pub const PERSONAL_PAGE_SIZE: i64 = 10;

/// Page size for the staff grievance list
pub const STAFF_PAGE_SIZE: i64 = 20;

// =============================================================================
// COOKIES
// =============================================================================

/// Cookie carrying the signed session token
pub const SESSION_COOKIE: &str = "gp_session";

/// Cookie carrying a one-shot flash message
pub const FLASH_COOKIE: &str = "gp_flash";

// =============================================================================
// ATTACHMENTS
// =============================================================================

/// Allowed MIME types for grievance attachments
pub const ALLOWED_ATTACHMENT_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
];

/// Maximum attachment size in bytes (10MB)
pub const MAX_ATTACHMENT_SIZE: usize = 10 * 1024 * 1024;
