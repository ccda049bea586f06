use tonic::Status;
use tonic::transport::{Channel, Endpoint};
use tracing::{debug, trace};

use super::KeyboardService;
use crate::endpoint::{ConnectOptions, KeymappEndpoint};
use crate::proto::api;
use crate::proto::api::keyboard_service_client::KeyboardServiceClient;

// tonic needs some URI even when the connector ignores it.
#[cfg(unix)]
const UNIX_PLACEHOLDER_URI: &str = "http://[::]:50051";

#[derive(Debug)]
pub enum TransportError {
    InvalidAddress(tonic::transport::Error),
    Connect {
        endpoint: KeymappEndpoint,
        source: tonic::transport::Error,
    },
    UnsupportedEndpoint(KeymappEndpoint),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAddress(err) => write!(f, "Invalid Keymapp address: {err}"),
            Self::Connect { endpoint, source } => write!(
                f,
                "Failed to connect to Keymapp at {endpoint}: {source}. Is Keymapp running?"
            ),
            Self::UnsupportedEndpoint(endpoint) => {
                write!(f, "Endpoint not supported on this platform: {endpoint}")
            }
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidAddress(err) => Some(err),
            Self::Connect { source, .. } => Some(source),
            Self::UnsupportedEndpoint(_) => None,
        }
    }
}

/// gRPC channel to a running Keymapp daemon.
#[derive(Debug, Clone)]
pub struct GrpcTransport {
    inner: KeyboardServiceClient<Channel>,
}

impl GrpcTransport {
    pub async fn connect(endpoint: &KeymappEndpoint) -> Result<Self, TransportError> {
        Self::connect_with_options(endpoint, &ConnectOptions::default()).await
    }

    pub async fn connect_with_options(
        endpoint: &KeymappEndpoint,
        options: &ConnectOptions,
    ) -> Result<Self, TransportError> {
        debug!(%endpoint, "connecting to keymapp");

        let channel = match endpoint {
            KeymappEndpoint::Tcp(uri) => {
                let builder = Endpoint::from_shared(uri.clone())
                    .map_err(TransportError::InvalidAddress)?;
                configure(builder, options).connect().await
            }
            #[cfg(unix)]
            KeymappEndpoint::Unix(path) => {
                let builder = configure(Endpoint::from_static(UNIX_PLACEHOLDER_URI), options);
                connect_unix(builder, path.clone()).await
            }
            #[cfg(not(unix))]
            KeymappEndpoint::Unix(_) => {
                return Err(TransportError::UnsupportedEndpoint(endpoint.clone()));
            }
        }
        .map_err(|source| TransportError::Connect {
            endpoint: endpoint.clone(),
            source,
        })?;

        Ok(Self::from_channel(channel))
    }

    /// Wraps an already configured channel.
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            inner: KeyboardServiceClient::new(channel),
        }
    }
}

fn configure(mut builder: Endpoint, options: &ConnectOptions) -> Endpoint {
    if let Some(timeout) = options.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(timeout) = options.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder
}

#[cfg(unix)]
async fn connect_unix(
    builder: Endpoint,
    path: std::path::PathBuf,
) -> Result<Channel, tonic::transport::Error> {
    use hyper_util::rt::TokioIo;
    use tokio::net::UnixStream;
    use tonic::transport::Uri;
    use tower::service_fn;

    builder
        .connect_with_connector(service_fn(move |_: Uri| {
            let path = path.clone();
            async move {
                let stream = UnixStream::connect(path).await?;
                Ok::<_, std::io::Error>(TokioIo::new(stream))
            }
        }))
        .await
}

macro_rules! forward_rpcs {
    ($($method:ident($request:ty) -> $reply:ty;)*) => {
        impl KeyboardService for GrpcTransport {
            $(
                async fn $method(&self, request: $request) -> Result<$reply, Status> {
                    trace!(rpc = stringify!($method), "dispatching keymapp rpc");
                    let mut client = self.inner.clone();
                    KeyboardServiceClient::$method(&mut client, request)
                        .await
                        .map(tonic::Response::into_inner)
                }
            )*
        }
    };
}

forward_rpcs! {
    get_status(api::GetStatusRequest) -> api::GetStatusReply;
    get_keyboards(api::GetKeyboardsRequest) -> api::GetKeyboardsReply;
    connect_keyboard(api::ConnectKeyboardRequest) -> api::ConnectKeyboardReply;
    connect_any_keyboard(api::ConnectAnyKeyboardRequest) -> api::ConnectKeyboardReply;
    disconnect_keyboard(api::DisconnectKeyboardRequest) -> api::DisconnectKeyboardReply;
    set_layer(api::SetLayerRequest) -> api::SetLayerReply;
    unset_layer(api::SetLayerRequest) -> api::SetLayerReply;
    set_rgb_led(api::SetRgbLedRequest) -> api::SetRgbLedReply;
    set_rgb_all(api::SetRgbAllRequest) -> api::SetRgbAllReply;
    set_status_led(api::SetStatusLedRequest) -> api::SetStatusLedReply;
    increase_brightness(api::IncreaseBrightnessRequest) -> api::IncreaseBrightnessReply;
    decrease_brightness(api::DecreaseBrightnessRequest) -> api::DecreaseBrightnessReply;
}

#[cfg(test)]
mod tests {
    use super::{GrpcTransport, TransportError};
    use crate::endpoint::KeymappEndpoint;

    #[tokio::test]
    async fn rejects_unparseable_uri() {
        let endpoint = KeymappEndpoint::Tcp("http://bad host:1".to_string());
        let err = GrpcTransport::connect(&endpoint)
            .await
            .expect_err("invalid uri should not connect");
        assert!(matches!(err, TransportError::InvalidAddress(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_socket_reports_endpoint() {
        let path = std::path::PathBuf::from("/nonexistent/keymapp-client-test/keymapp.sock");
        let endpoint = KeymappEndpoint::Unix(path);
        let err = GrpcTransport::connect(&endpoint)
            .await
            .expect_err("missing socket should not connect");

        match &err {
            TransportError::Connect { endpoint: failed, .. } => assert_eq!(failed, &endpoint),
            other => panic!("expected connect error, got {other:?}"),
        }
        assert!(err.to_string().contains("keymapp-client-test"));
    }
}
