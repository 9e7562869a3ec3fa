use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DnsServerConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_dns_port")]
    pub port: u16,
}

impl Default for DnsServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_dns_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpServerConfig {
    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            port: default_http_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpsServerConfig {
    #[serde(default = "default_false")]
    pub enabled: bool,

    #[serde(default = "default_https_port")]
    pub port: u16,

    #[serde(default = "default_true")]
    pub autocert: bool,

    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

impl Default for HttpsServerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_https_port(),
            autocert: true,
            cache_dir: default_cache_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// If empty, the loader synthesizes a random token and logs it once.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub domain: String,

    #[serde(default)]
    pub dns: DnsServerConfig,

    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub https: HttpsServerConfig,

    #[serde(default)]
    pub api: ApiConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            dns: DnsServerConfig::default(),
            http: HttpServerConfig::default(),
            https: HttpsServerConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

fn default_dns_port() -> u16 {
    53
}

fn default_http_port() -> u16 {
    80
}

fn default_https_port() -> u16 {
    443
}

fn default_cache_dir() -> String {
    "./hookd-certs".to_string()
}
