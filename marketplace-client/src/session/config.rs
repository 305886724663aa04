/// Fixed keys under which the token pair lives in the durable store.
/// These match the storage layout the web frontend uses, so a file-backed
/// store can be shared between clients of the same profile.
pub(crate) const ACCESS_TOKEN_KEY: &str = "access_token";
pub(crate) const REFRESH_TOKEN_KEY: &str = "refresh_token";
