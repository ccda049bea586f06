use std::future::Future;

use tonic::Status;

use crate::proto::api;

pub mod grpc;

/// Raw Keymapp RPC surface used by [`crate::KeymappClient`].
///
/// [`grpc::GrpcTransport`] talks to a running daemon. Any other implementation
/// (an in-process fake, a recording proxy) can be plugged into the client instead.
pub trait KeyboardService: Send + Sync {
    fn get_status(
        &self,
        request: api::GetStatusRequest,
    ) -> impl Future<Output = Result<api::GetStatusReply, Status>> + Send;

    fn get_keyboards(
        &self,
        request: api::GetKeyboardsRequest,
    ) -> impl Future<Output = Result<api::GetKeyboardsReply, Status>> + Send;

    fn connect_keyboard(
        &self,
        request: api::ConnectKeyboardRequest,
    ) -> impl Future<Output = Result<api::ConnectKeyboardReply, Status>> + Send;

    fn connect_any_keyboard(
        &self,
        request: api::ConnectAnyKeyboardRequest,
    ) -> impl Future<Output = Result<api::ConnectKeyboardReply, Status>> + Send;

    fn disconnect_keyboard(
        &self,
        request: api::DisconnectKeyboardRequest,
    ) -> impl Future<Output = Result<api::DisconnectKeyboardReply, Status>> + Send;

    fn set_layer(
        &self,
        request: api::SetLayerRequest,
    ) -> impl Future<Output = Result<api::SetLayerReply, Status>> + Send;

    fn unset_layer(
        &self,
        request: api::SetLayerRequest,
    ) -> impl Future<Output = Result<api::SetLayerReply, Status>> + Send;

    fn set_rgb_led(
        &self,
        request: api::SetRgbLedRequest,
    ) -> impl Future<Output = Result<api::SetRgbLedReply, Status>> + Send;

    fn set_rgb_all(
        &self,
        request: api::SetRgbAllRequest,
    ) -> impl Future<Output = Result<api::SetRgbAllReply, Status>> + Send;

    fn set_status_led(
        &self,
        request: api::SetStatusLedRequest,
    ) -> impl Future<Output = Result<api::SetStatusLedReply, Status>> + Send;

    fn increase_brightness(
        &self,
        request: api::IncreaseBrightnessRequest,
    ) -> impl Future<Output = Result<api::IncreaseBrightnessReply, Status>> + Send;

    fn decrease_brightness(
        &self,
        request: api::DecreaseBrightnessRequest,
    ) -> impl Future<Output = Result<api::DecreaseBrightnessReply, Status>> + Send;
}
