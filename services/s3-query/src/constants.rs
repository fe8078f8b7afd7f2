use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};

// Env values used by presign services.
pub const PRESIGN_S3_ACCESS_KEY_ID: &str = "PRESIGN_S3_ACCESS_KEY_ID";
pub const PRESIGN_S3_SECRET_ACCESS_KEY: &str = "PRESIGN_S3_SECRET_ACCESS_KEY";
pub const PRESIGN_S3_REGION: &str = "PRESIGN_S3_REGION";
pub const PRESIGN_S3_EXPIRES_IN: &str = "PRESIGN_S3_EXPIRES_IN";

// Query parameters of a signed url, in the order they are emitted.
pub const QUERY_ACCESS_KEY_ID: &str = "AWSAccessKeyId";
pub const QUERY_EXPIRES: &str = "Expires";
pub const QUERY_SIGNATURE: &str = "Signature";

pub const DEFAULT_REGION: &str = "s3";
pub const DEFAULT_EXPIRY_MINUTES: u64 = 3;
/// Upper bound of a configured expiry, 100 years of 365 days.
pub const MAX_EXPIRY_MINUTES: u64 = 100 * 365 * 24 * 60;
pub const ENDPOINT_SUFFIX: &str = "amazonaws.com";

/// AsciiSet for object paths.
///
/// Encode every byte except the unreserved characters 'A'-'Z', 'a'-'z',
/// '0'-'9', '-', '.', '_', '~' and the '/' separator.
pub static OBJECT_PATH_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
