//! API constants for the scanning backend's REST interface

/// Credential collection endpoint (trailing slash required by the backend)
pub const CREDENTIALS_PATH: &str = "/api/v1/credentials/";

/// User agent sent with every request
pub const USER_AGENT: &str = "credential-dialog/1.0";

/// The add-source wizard shows every credential on a single page
pub const WIZARD_CREDENTIALS_PAGE_SIZE: u32 = 1000;
