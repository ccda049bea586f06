//! Keymapp endpoint selection and connection options.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::ClientError;

/// Address Keymapp listens on under Windows.
pub const DEFAULT_WINDOWS_ADDRESS: &str = "localhost:50051";
/// Environment variable holding the directory that contains Keymapp's socket folder.
pub const CONFIG_DIR_ENV: &str = "CONFIG_DIR";
pub const SOCKET_DIR_NAME: &str = ".keymapp";
pub const SOCKET_FILE_NAME: &str = "keymapp.sock";

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the Keymapp gRPC service can be reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymappEndpoint {
    /// HTTP/2 over TCP. Holds a full URI such as `http://localhost:50051`.
    Tcp(String),
    /// HTTP/2 over a Unix domain socket.
    Unix(PathBuf),
}

impl KeymappEndpoint {
    /// Interprets a user supplied address.
    ///
    /// - `unix:<path>` / `unix://<path>` select a socket explicitly
    /// - anything with a scheme (`http://…`) is used as-is
    /// - absolute or `./` paths and `*.sock` files are sockets
    /// - everything else is treated as `host:port`
    pub fn parse(address: &str) -> Self {
        if let Some(path) = address
            .strip_prefix("unix://")
            .or_else(|| address.strip_prefix("unix:"))
        {
            return Self::Unix(PathBuf::from(path));
        }

        if address.contains("://") {
            return Self::Tcp(address.to_string());
        }

        if looks_like_socket_path(address) {
            return Self::Unix(PathBuf::from(address));
        }

        Self::Tcp(format!("http://{address}"))
    }
}

fn looks_like_socket_path(address: &str) -> bool {
    let path = Path::new(address);
    path.is_absolute()
        || address.starts_with("./")
        || address.starts_with("../")
        || path.extension().is_some_and(|ext| ext == "sock")
}

impl From<&str> for KeymappEndpoint {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<String> for KeymappEndpoint {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<PathBuf> for KeymappEndpoint {
    fn from(value: PathBuf) -> Self {
        Self::Unix(value)
    }
}

impl std::fmt::Display for KeymappEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tcp(uri) => write!(f, "{uri}"),
            Self::Unix(path) => write!(f, "unix:{}", path.display()),
        }
    }
}

/// Platform family deciding the default endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Unix
        }
    }
}

/// Default endpoint for the running platform, reading the process environment.
pub fn default_endpoint() -> Result<KeymappEndpoint, ClientError> {
    default_endpoint_for(Platform::current(), |key| std::env::var_os(key))
}

/// Default endpoint for `platform`, resolving environment variables through `lookup`.
///
/// On Windows this is [`DEFAULT_WINDOWS_ADDRESS`]. Elsewhere it is
/// `$CONFIG_DIR/.keymapp/keymapp.sock` and fails when `CONFIG_DIR` is unset or empty.
pub fn default_endpoint_for(
    platform: Platform,
    lookup: impl Fn(&str) -> Option<OsString>,
) -> Result<KeymappEndpoint, ClientError> {
    match platform {
        Platform::Windows => Ok(KeymappEndpoint::parse(DEFAULT_WINDOWS_ADDRESS)),
        Platform::Unix => {
            let config_dir = lookup(CONFIG_DIR_ENV)
                .filter(|dir| !dir.is_empty())
                .ok_or(ClientError::MissingEnvVar(CONFIG_DIR_ENV))?;

            Ok(KeymappEndpoint::Unix(
                PathBuf::from(config_dir)
                    .join(SOCKET_DIR_NAME)
                    .join(SOCKET_FILE_NAME),
            ))
        }
    }
}

/// Channel settings applied when connecting.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub connect_timeout: Option<Duration>,
    /// Deadline for every request. `None` leaves cancellation to the caller.
    pub request_timeout: Option<Duration>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            request_timeout: None,
        }
    }
}
