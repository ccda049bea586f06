use tracing::{debug, warn};

use crate::color::Rgb;
use crate::endpoint::{ConnectOptions, KeymappEndpoint, default_endpoint};
use crate::proto::api;
use crate::protocol::{ALREADY_CONNECTED, NOT_CONNECTED, expect_success, suppress_benign};
use crate::transport::KeyboardService;
use crate::transport::grpc::{GrpcTransport, TransportError};

// Meaning is undocumented upstream; Keymapp accepts zero.
const SUSTAIN: i32 = 0;

#[derive(Debug)]
pub enum ClientError {
    Transport(TransportError),
    Rpc(tonic::Status),
    Unsuccessful { request: &'static str },
    MissingEnvVar(&'static str),
    LedUpdates(Vec<LedError>),
}

/// A single failed LED update within [`KeymappClient::set_rgb_led`].
#[derive(Debug)]
pub struct LedError {
    pub led: i32,
    pub error: ClientError,
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(err) => write!(f, "Transport error: {err}"),
            Self::Rpc(status) => write!(
                f,
                "RPC failed with code {:?}: {}",
                status.code(),
                status.message()
            ),
            Self::Unsuccessful { request } => write!(f, "unsuccessful {request}"),
            Self::MissingEnvVar(key) => write!(f, "environment key \"{key}\" not set"),
            Self::LedUpdates(failures) => {
                write!(f, "{} LED update(s) failed", failures.len())?;
                for failure in failures {
                    write!(f, "; led {}: {}", failure.led, failure.error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            Self::Rpc(status) => Some(status),
            Self::LedUpdates(failures) => failures
                .first()
                .map(|failure| &failure.error as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<TransportError> for ClientError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

impl From<tonic::Status> for ClientError {
    fn from(value: tonic::Status) -> Self {
        Self::Rpc(value)
    }
}

/// Daemon status as reported by [`KeymappClient::get_status`].
#[derive(Debug, Clone, PartialEq)]
pub struct KeymappStatus {
    /// Keymapp application version.
    pub version: String,
    /// `None` when no keyboard is attached.
    pub keyboard: Option<api::ConnectedKeyboard>,
}

/// Client for the Keymapp keyboard service.
///
/// Every method issues its requests on the calling task; dropping the returned
/// future cancels the in-flight call.
#[derive(Debug, Clone)]
pub struct KeymappClient<S = GrpcTransport> {
    service: S,
}

impl KeymappClient<GrpcTransport> {
    /// Connects to Keymapp at `address` (see [`KeymappEndpoint::parse`]).
    pub async fn connect(address: impl Into<KeymappEndpoint>) -> Result<Self, ClientError> {
        Self::connect_with_options(address, &ConnectOptions::default()).await
    }

    pub async fn connect_with_options(
        address: impl Into<KeymappEndpoint>,
        options: &ConnectOptions,
    ) -> Result<Self, ClientError> {
        let endpoint = address.into();
        let transport = GrpcTransport::connect_with_options(&endpoint, options).await?;
        Ok(Self::new(transport))
    }

    /// Connects using the platform default endpoint.
    ///
    /// On Windows this is `localhost:50051`. Elsewhere it is the socket at
    /// `$CONFIG_DIR/.keymapp/keymapp.sock`; an unset `CONFIG_DIR` fails before
    /// any connection attempt.
    pub async fn connect_default() -> Result<Self, ClientError> {
        Self::connect_default_with_options(&ConnectOptions::default()).await
    }

    pub async fn connect_default_with_options(
        options: &ConnectOptions,
    ) -> Result<Self, ClientError> {
        let endpoint = default_endpoint()?;
        Self::connect_with_options(endpoint, options).await
    }
}

impl<S: KeyboardService> KeymappClient<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn into_inner(self) -> S {
        self.service
    }

    pub async fn get_status(&self) -> Result<KeymappStatus, ClientError> {
        let reply = self
            .service
            .get_status(api::GetStatusRequest {})
            .await?;
        Ok(KeymappStatus {
            version: reply.keymapp_version,
            keyboard: reply.connected_keyboard,
        })
    }

    /// Lists every keyboard Keymapp has detected.
    pub async fn get_keyboards(&self) -> Result<Vec<api::Keyboard>, ClientError> {
        let reply = self
            .service
            .get_keyboards(api::GetKeyboardsRequest {})
            .await?;
        Ok(reply.keyboards)
    }

    /// Connects to whichever keyboard Keymapp picks. Already being connected is not an error.
    pub async fn connect_any_keyboard(&self) -> Result<(), ClientError> {
        let result = expect_success(
            |req| self.service.connect_any_keyboard(req),
            api::ConnectAnyKeyboardRequest {},
        )
        .await;
        suppress_benign(result, ALREADY_CONNECTED)
    }

    /// Connects to the keyboard with the given id. Already being connected is not an error.
    pub async fn connect_keyboard_index(&self, id: i32) -> Result<(), ClientError> {
        let result = expect_success(
            |req| self.service.connect_keyboard(req),
            api::ConnectKeyboardRequest { id },
        )
        .await;
        suppress_benign(result, ALREADY_CONNECTED)
    }

    pub async fn connect_keyboard(&self, keyboard: &api::Keyboard) -> Result<(), ClientError> {
        self.connect_keyboard_index(keyboard.id).await
    }

    /// Disconnects the current keyboard. Having nothing connected is not an error.
    pub async fn disconnect_keyboard(&self) -> Result<(), ClientError> {
        let result = expect_success(
            |req| self.service.disconnect_keyboard(req),
            api::DisconnectKeyboardRequest {},
        )
        .await;
        suppress_benign(result, NOT_CONNECTED)
    }

    pub async fn set_layer(&self, layer: i32) -> Result<(), ClientError> {
        expect_success(
            |req| self.service.set_layer(req),
            api::SetLayerRequest { layer },
        )
        .await
    }

    pub async fn unset_layer(&self, layer: i32) -> Result<(), ClientError> {
        expect_success(
            |req| self.service.unset_layer(req),
            api::SetLayerRequest { layer },
        )
        .await
    }

    /// Sets `leds` to `color`, one request per LED.
    ///
    /// All LEDs are attempted even if some fail; failures are collected into
    /// [`ClientError::LedUpdates`]. Use [`KeymappClient::set_rgb_all`] to change
    /// every LED in a single request.
    pub async fn set_rgb_led(&self, color: Rgb, leds: &[i32]) -> Result<(), ClientError> {
        let (red, green, blue) = color.channels();
        let mut failures = Vec::new();

        for &led in leds {
            let request = api::SetRgbLedRequest {
                led,
                red,
                green,
                blue,
                sustain: SUSTAIN,
            };
            let result = expect_success(|req| self.service.set_rgb_led(req), request).await;
            if let Err(error) = result {
                failures.push(LedError { led, error });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            warn!(
                failed = failures.len(),
                total = leds.len(),
                "some LED updates failed"
            );
            Err(ClientError::LedUpdates(failures))
        }
    }

    pub async fn set_rgb_all(&self, color: Rgb) -> Result<(), ClientError> {
        let (red, green, blue) = color.channels();
        expect_success(
            |req| self.service.set_rgb_all(req),
            api::SetRgbAllRequest {
                red,
                green,
                blue,
                sustain: SUSTAIN,
            },
        )
        .await
    }

    pub async fn set_status_led(&self, led: i32, on: bool) -> Result<(), ClientError> {
        expect_success(
            |req| self.service.set_status_led(req),
            api::SetStatusLedRequest {
                led,
                on,
                sustain: SUSTAIN,
            },
        )
        .await
    }

    pub async fn increase_brightness(&self) -> Result<(), ClientError> {
        expect_success(
            |req| self.service.increase_brightness(req),
            api::IncreaseBrightnessRequest {},
        )
        .await
    }

    pub async fn decrease_brightness(&self) -> Result<(), ClientError> {
        expect_success(
            |req| self.service.decrease_brightness(req),
            api::DecreaseBrightnessRequest {},
        )
        .await
    }

    /// Releases the connection.
    pub fn close(self) {
        debug!("closing keymapp client");
        drop(self.service);
    }
}
