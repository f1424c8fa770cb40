/// Fixed price of the share/download unlock, in paise (₹1).
pub const ORDER_AMOUNT_PAISE: i64 = 100;

pub const ORDER_CURRENCY: &str = "INR";

/// Random bytes behind a share token; hex-encoded this yields 64 characters.
pub const SHARE_TOKEN_BYTES: usize = 32;

/// Server-relative prefix under which uploaded images are served.
pub const UPLOAD_URL_PREFIX: &str = "/uploads/resumes";

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub const INTRODUCTION_MAX_CHARS: usize = 2000;

pub const DESCRIPTION_MAX_CHARS: usize = 1500;

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
