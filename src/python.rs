use std::future::Future;
use std::sync::Mutex;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyModule;
use tokio::runtime::Runtime;

use crate::{ClientError, KeymappClient, Rgb};

#[pyclass(name = "KeymappClient")]
pub struct PyKeymappClient {
    runtime: Runtime,
    inner: Mutex<Option<KeymappClient>>,
}

#[pymethods]
impl PyKeymappClient {
    #[staticmethod]
    pub fn connect(address: &str) -> PyResult<Self> {
        let runtime = new_runtime()?;
        let client = runtime
            .block_on(KeymappClient::connect(address))
            .map_err(to_py_err)?;
        Ok(Self::wrap(runtime, client))
    }

    #[staticmethod]
    pub fn connect_default() -> PyResult<Self> {
        let runtime = new_runtime()?;
        let client = runtime
            .block_on(KeymappClient::connect_default())
            .map_err(to_py_err)?;
        Ok(Self::wrap(runtime, client))
    }

    /// Returns `(keymapp_version, connected_keyboard_name_or_None)`.
    pub fn get_status(&self) -> PyResult<(String, Option<String>)> {
        let status =
            self.with_client(move |client| async move { client.get_status().await })?;
        Ok((
            status.version,
            status.keyboard.map(|keyboard| keyboard.friendly_name),
        ))
    }

    /// Returns `[(id, friendly_name, is_connected), ...]`.
    pub fn get_keyboards(&self) -> PyResult<Vec<(i32, String, bool)>> {
        let keyboards =
            self.with_client(move |client| async move { client.get_keyboards().await })?;
        Ok(keyboards
            .into_iter()
            .map(|keyboard| (keyboard.id, keyboard.friendly_name, keyboard.is_connected))
            .collect())
    }

    pub fn connect_any_keyboard(&self) -> PyResult<()> {
        self.with_client(move |client| async move { client.connect_any_keyboard().await })
    }

    pub fn connect_keyboard(&self, id: i32) -> PyResult<()> {
        self.with_client(move |client| async move { client.connect_keyboard_index(id).await })
    }

    pub fn disconnect_keyboard(&self) -> PyResult<()> {
        self.with_client(move |client| async move { client.disconnect_keyboard().await })
    }

    pub fn set_layer(&self, layer: i32) -> PyResult<()> {
        self.with_client(move |client| async move { client.set_layer(layer).await })
    }

    pub fn unset_layer(&self, layer: i32) -> PyResult<()> {
        self.with_client(move |client| async move { client.unset_layer(layer).await })
    }

    /// `color` is a `#rrggbb` string.
    pub fn set_rgb_led(&self, color: &str, leds: Vec<i32>) -> PyResult<()> {
        let color = parse_color(color)?;
        self.with_client(move |client| async move { client.set_rgb_led(color, &leds).await })
    }

    pub fn set_rgb_all(&self, color: &str) -> PyResult<()> {
        let color = parse_color(color)?;
        self.with_client(move |client| async move { client.set_rgb_all(color).await })
    }

    pub fn set_status_led(&self, led: i32, on: bool) -> PyResult<()> {
        self.with_client(move |client| async move { client.set_status_led(led, on).await })
    }

    pub fn increase_brightness(&self) -> PyResult<()> {
        self.with_client(move |client| async move { client.increase_brightness().await })
    }

    pub fn decrease_brightness(&self) -> PyResult<()> {
        self.with_client(move |client| async move { client.decrease_brightness().await })
    }

    pub fn close(&self) -> PyResult<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| PyRuntimeError::new_err("client mutex is poisoned"))?;
        if let Some(client) = guard.take() {
            client.close();
        }
        Ok(())
    }
}

impl PyKeymappClient {
    fn wrap(runtime: Runtime, client: KeymappClient) -> Self {
        Self {
            runtime,
            inner: Mutex::new(Some(client)),
        }
    }

    fn with_client<R, F, Fut>(&self, f: F) -> PyResult<R>
    where
        F: FnOnce(KeymappClient) -> Fut,
        Fut: Future<Output = Result<R, ClientError>>,
    {
        // Cloning shares the channel and keeps the lock out of the await.
        let client = self
            .inner
            .lock()
            .map_err(|_| PyRuntimeError::new_err("client mutex is poisoned"))?
            .clone()
            .ok_or_else(|| PyRuntimeError::new_err("client is closed"))?;
        self.runtime.block_on(f(client)).map_err(to_py_err)
    }
}

fn new_runtime() -> PyResult<Runtime> {
    Runtime::new()
        .map_err(|err| PyRuntimeError::new_err(format!("failed to start tokio runtime: {err}")))
}

fn parse_color(color: &str) -> PyResult<Rgb> {
    color
        .parse::<Rgb>()
        .map_err(|err| PyValueError::new_err(err.to_string()))
}

fn to_py_err(err: ClientError) -> PyErr {
    PyRuntimeError::new_err(err.to_string())
}

#[pymodule]
fn keymapp_client(module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<PyKeymappClient>()?;
    Ok(())
}
