//! Remote dataset access.
//!
//! Opens datasets on a remote marine data service through the NetCDF DAP
//! layer. Credentials are an explicit object constructed once at startup from
//! environment variables and passed to every component that needs them; they
//! are never read ad hoc mid-run, and a missing credential is a fatal error
//! raised before any network call is issued.

use thiserror::Error;
use tracing::info;

use crate::env::{DatasetError, GriddedDataset, VariableMapping};

/// Environment variable holding the data-service username.
pub const USERNAME_ENV: &str = "COPERNICUS_USERNAME";
/// Environment variable holding the data-service password.
pub const PASSWORD_ENV: &str = "COPERNICUS_PASSWORD";

/// Default service endpoint serving the gridded products.
const DEFAULT_ENDPOINT: &str = "https://nrt.cmems-du.eu/thredds/dodsC";

/// Error type for remote dataset access.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Credential environment variable absent or empty
    #[error("missing credentials: set {USERNAME_ENV} and {PASSWORD_ENV}")]
    MissingCredentials,

    /// Remote open failed (network, authentication, unknown dataset id)
    #[error("failed to open remote dataset '{dataset_id}': {source}")]
    OpenFailed {
        /// Requested dataset identifier
        dataset_id: String,
        /// Underlying NetCDF error
        #[source]
        source: netcdf::Error,
    },

    /// Dataset opened but could not be adapted
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Credential pair for the remote data service.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Build credentials from explicit values.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Read the credential pair from the process environment.
    ///
    /// Fails when either variable is absent or empty, so a run can never
    /// proceed with placeholder values.
    pub fn from_env() -> Result<Self, RemoteError> {
        let username = std::env::var(USERNAME_ENV).unwrap_or_default();
        let password = std::env::var(PASSWORD_ENV).unwrap_or_default();
        if username.is_empty() || password.is_empty() {
            return Err(RemoteError::MissingCredentials);
        }
        Ok(Self { username, password })
    }

    /// Username, exposed for URL construction.
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never leak the password through Debug output.
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Remote data service handle: endpoint, credentials, transfer options.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    endpoint: String,
    credentials: Credentials,
    /// DAP client chunk-size limit; 0 disables server-side chunking warnings.
    chunk_size_limit: usize,
}

impl RemoteSource {
    /// Create a source against the default endpoint.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            credentials,
            chunk_size_limit: 0,
        }
    }

    /// Override the service endpoint (e.g. a THREDDS mirror).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the chunk-size limit client parameter.
    pub fn with_chunk_size_limit(mut self, limit: usize) -> Self {
        self.chunk_size_limit = limit;
        self
    }

    /// Build the authenticated DAP URL for a dataset id.
    ///
    /// The chunk-size limit rides along as a bracketed DAP client parameter.
    fn dataset_url(&self, dataset_id: &str) -> String {
        let endpoint = self
            .endpoint
            .strip_prefix("https://")
            .unwrap_or(&self.endpoint);
        format!(
            "[chunk_size_limit={}]https://{}:{}@{}/{}",
            self.chunk_size_limit,
            self.credentials.username,
            self.credentials.password,
            endpoint,
            dataset_id
        )
    }

    /// Open a remote dataset, returning the raw NetCDF handle.
    pub fn open(&self, dataset_id: &str) -> Result<netcdf::File, RemoteError> {
        info!(dataset_id, endpoint = %self.endpoint, "opening remote dataset");
        netcdf::open(self.dataset_url(dataset_id)).map_err(|source| RemoteError::OpenFailed {
            dataset_id: dataset_id.to_string(),
            source,
        })
    }

    /// Open a remote dataset and adapt it with a variable mapping.
    pub fn open_dataset(
        &self,
        dataset_id: &str,
        mapping: VariableMapping,
    ) -> Result<GriddedDataset, RemoteError> {
        let file = self.open(dataset_id)?;
        Ok(GriddedDataset::from_netcdf(&file, dataset_id, mapping)?)
    }
}
