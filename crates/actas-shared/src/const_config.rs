//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

pub const PANIC_ON_RARE_ERR: bool = true;

pub mod client {
    /// Used when no base url is configured
    pub const CLIENT_DEFAULT_BASE_URL: &str = "http://localhost:8789";
}

pub mod path {
    mod path_spec;
    pub use path_spec::PathSpec;
    pub const PATH_API_ACTA_LOOKUP: PathSpec = PathSpec::get("/actas/lookup");
    pub const PATH_API_ACTAS: PathSpec = PathSpec::get("/actas");
    pub const PATH_AUTH_LOGIN: PathSpec = PathSpec::post("/auth/login");
    pub const PATH_AUTH_REFRESH: PathSpec = PathSpec::post("/auth/refresh");
    pub const PATH_HEALTH_CHECK: PathSpec = PathSpec::get("/health_check");
}

/// Client side routes the guards redirect to
pub mod route {
    pub const ROUTE_DASHBOARD: &str = "/dashboard";
    pub const ROUTE_DASHBOARD_PRO: &str = "/dashboard-pro";
    pub const ROUTE_LOGIN: &str = "/login";
    pub const ROUTE_REGISTER: &str = "/register";
}

/// Keys used in the persistent key/value storage (`localStorage` on the web)
pub mod storage_key {
    pub const STORAGE_KEY_ACCESS_TOKEN: &str = "accessToken";
    pub const STORAGE_KEY_BASIC_USER_DATA: &str = "BasicUserData";
    pub const STORAGE_KEY_REFRESH_TOKEN: &str = "refreshToken";

    /// Conversational session artifacts, only removed on logout
    pub const STORAGE_KEYS_CHAT: [&str; 2] = ["chatSessionId", "chatHistory"];

    /// Every key removed by a full logout
    pub const STORAGE_KEYS_AUTH: [&str; 5] = [
        STORAGE_KEY_ACCESS_TOKEN,
        STORAGE_KEY_REFRESH_TOKEN,
        STORAGE_KEY_BASIC_USER_DATA,
        STORAGE_KEYS_CHAT[0],
        STORAGE_KEYS_CHAT[1],
    ];
}
