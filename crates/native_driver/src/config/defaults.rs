//! Default endpoints and ports of the in-app NativeDriver server

use lazy_static::lazy_static;
use url::Url;

pub const DEFAULT_SERVER_PORT: u16 = 54129;
pub const DEFAULT_LOCAL_PORT: u16 = 54129;
pub const DEFAULT_REMOTE_PORT: u16 = 54129;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:54129/hub";

/// Instrumentation class that boots the server inside the app under test
pub const SERVER_INSTRUMENTATION: &str =
    "com.google.android.testing.nativedriver.server.ServerInstrumentation";

lazy_static! {
    static ref DEFAULT_SERVER: Url =
        Url::parse(DEFAULT_SERVER_URL).expect("DEFAULT_SERVER_URL must be a valid URL");
}

/// The URL used when no server or executor is given explicitly
pub fn default_server_url() -> Url {
    DEFAULT_SERVER.clone()
}
