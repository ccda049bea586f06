//! Reply normalization for Keymapp RPC calls.

use std::future::Future;

use tonic::Status;
use tracing::{debug, trace};

use crate::client::ClientError;
use crate::proto::api;

/// Reply message carrying the daemon's application-level success flag.
pub trait SuccessReply {
    fn success(&self) -> bool;
}

macro_rules! impl_success_reply {
    ($($reply:ty),* $(,)?) => {
        $(
            impl SuccessReply for $reply {
                fn success(&self) -> bool {
                    self.success
                }
            }
        )*
    };
}

impl_success_reply!(
    api::ConnectKeyboardReply,
    api::DisconnectKeyboardReply,
    api::SetLayerReply,
    api::SetRgbLedReply,
    api::SetRgbAllReply,
    api::SetStatusLedReply,
    api::IncreaseBrightnessReply,
    api::DecreaseBrightnessReply,
);

/// Message text the daemon uses when a keyboard is already attached.
pub const ALREADY_CONNECTED: &str = "keyboard already connected";
/// Message text the daemon uses when there is nothing to detach.
pub const NOT_CONNECTED: &str = "no keyboard is connected";

/// Invokes `call` with `request` and folds the reply's success flag into the error channel.
///
/// RPC failures are returned untouched as [`ClientError::Rpc`]. A reply with
/// `success == false` becomes [`ClientError::Unsuccessful`] naming the request type.
pub async fn expect_success<Req, Rep, F, Fut>(call: F, request: Req) -> Result<(), ClientError>
where
    F: FnOnce(Req) -> Fut,
    Fut: Future<Output = Result<Rep, Status>>,
    Rep: SuccessReply,
{
    let request_name = short_type_name::<Req>();
    trace!(request = request_name, "sending keymapp request");

    let reply = call(request).await?;
    if reply.success() {
        Ok(())
    } else {
        Err(ClientError::Unsuccessful {
            request: request_name,
        })
    }
}

/// Drops `result`'s error when its text contains `benign`.
pub(crate) fn suppress_benign(
    result: Result<(), ClientError>,
    benign: &'static str,
) -> Result<(), ClientError> {
    match result {
        Err(err) if err.to_string().contains(benign) => {
            debug!(reason = benign, "ignoring benign keymapp error");
            Ok(())
        }
        other => other,
    }
}

pub(crate) fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    // Request messages are never generic, so the last path segment is the type name.
    full.rsplit("::").next().unwrap_or(full)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use tonic::{Code, Status};

    use super::{ALREADY_CONNECTED, expect_success, short_type_name, suppress_benign};
    use crate::client::ClientError;
    use crate::proto::api;

    #[tokio::test]
    async fn unsuccessful_reply_names_request_type() {
        let err = expect_success(
            |_req: api::SetLayerRequest| async {
                Ok::<_, Status>(api::SetLayerReply { success: false })
            },
            api::SetLayerRequest { layer: 2 },
        )
        .await
        .expect_err("unsuccessful reply should be an error");

        assert!(matches!(
            err,
            ClientError::Unsuccessful {
                request: "SetLayerRequest"
            }
        ));
        assert_eq!(err.to_string(), "unsuccessful SetLayerRequest");
    }

    #[tokio::test]
    async fn successful_reply_is_ok() {
        let result = expect_success(
            |_req: api::IncreaseBrightnessRequest| async {
                Ok::<_, Status>(api::IncreaseBrightnessReply { success: true })
            },
            api::IncreaseBrightnessRequest {},
        )
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn rpc_failure_is_passed_through() {
        let err = expect_success(
            |_req: api::SetRgbAllRequest| async {
                Err::<api::SetRgbAllReply, _>(Status::new(Code::Unavailable, "socket closed"))
            },
            api::SetRgbAllRequest::default(),
        )
        .await
        .expect_err("rpc failure should be an error");

        match err {
            ClientError::Rpc(status) => {
                assert_eq!(status.code(), Code::Unavailable);
                assert_eq!(status.message(), "socket closed");
            }
            other => panic!("expected rpc error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn request_is_forwarded_once() {
        let calls = Cell::new(0);
        let result = expect_success(
            |req: api::SetStatusLedRequest| {
                calls.set(calls.get() + 1);
                assert_eq!(req.led, 3);
                assert!(req.on);
                async { Ok::<_, Status>(api::SetStatusLedReply { success: true }) }
            },
            api::SetStatusLedRequest {
                led: 3,
                on: true,
                sustain: 0,
            },
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn benign_rpc_message_is_suppressed() {
        let result = suppress_benign(
            Err(ClientError::Rpc(Status::new(
                Code::Unknown,
                "keyboard already connected",
            ))),
            ALREADY_CONNECTED,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn other_errors_survive_benign_filter() {
        let result = suppress_benign(
            Err(ClientError::Unsuccessful {
                request: "ConnectKeyboardRequest",
            }),
            ALREADY_CONNECTED,
        );
        assert!(matches!(result, Err(ClientError::Unsuccessful { .. })));
    }

    #[test]
    fn short_type_name_strips_module_path() {
        assert_eq!(
            short_type_name::<api::ConnectAnyKeyboardRequest>(),
            "ConnectAnyKeyboardRequest"
        );
    }
}
