//! Client construction and endpoint group accessors.

use crate::cluster::ClustersClient;
use crate::dbfs::DbfsClient;
use crate::groups::GroupsClient;
use crate::jobs::JobsClient;
use crate::libraries::LibrariesClient;
use crate::profiles::ProfilesClient;
use crate::secrets::SecretsClient;
use crate::token::TokenClient;
use crate::workspace::WorkspaceClient;
use crate::Result;
use databricks_core::auth::{BearerTransport, NetrcTransport};
use databricks_core::config::{base_url_for_account, normalize_base_url, validate_account};
use databricks_core::transport::ReqwestTransport;
use databricks_core::{ApiClient, DatabricksConfig, Error, HttpConfig, SharedTransport, Transport};
use secrecy::SecretString;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use url::Url;
use validator::Validate;

/// Where a netrc file is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetrcLookup {
    /// `$NETRC`, else the netrc file in the home directory
    Default,
    /// An explicit file
    Path(PathBuf),
}

/// Settings accumulated by the options of a [`ClientBuilder`].
///
/// Custom options passed to [`ClientBuilder::with_option`] mutate this value.
pub struct ClientSettings {
    /// Override of the base URL derived from the account
    pub base_url: Option<Url>,
    /// Configuration of the default transport
    pub http_config: HttpConfig,
    /// Transport replacing the default one
    pub transport: Option<SharedTransport>,
    /// Personal access token sent as a bearer credential
    pub token: Option<SecretString>,
    /// Netrc credential lookup
    pub netrc: Option<NetrcLookup>,
}

impl ClientSettings {
    fn new() -> Self {
        Self {
            base_url: None,
            http_config: HttpConfig::default(),
            transport: None,
            token: None,
            netrc: None,
        }
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .field("http_config", &self.http_config)
            .field("custom_transport", &self.transport.is_some())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("netrc", &self.netrc)
            .finish()
    }
}

type ClientOption = Box<dyn FnOnce(&mut ClientSettings) -> Result<()> + Send>;

/// Builder for [`Client`].
///
/// Options are recorded in call order and applied by [`build`](Self::build);
/// the first option that fails aborts construction.
pub struct ClientBuilder {
    account: String,
    options: Vec<ClientOption>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("account", &self.account)
            .field("options", &self.options.len())
            .finish()
    }
}

impl ClientBuilder {
    /// Create a builder for the named account.
    #[must_use]
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            options: Vec::new(),
        }
    }

    /// Replace the default transport.
    #[must_use]
    pub fn with_transport<T>(self, transport: T) -> Self
    where
        T: Transport + 'static,
    {
        self.with_shared_transport(Arc::new(transport))
    }

    /// Replace the default transport with an already shared one.
    #[must_use]
    pub fn with_shared_transport(self, transport: SharedTransport) -> Self {
        self.with_option(move |settings| {
            settings.transport = Some(transport);
            Ok(())
        })
    }

    /// Override the HTTP configuration of the default transport.
    #[must_use]
    pub fn with_http_config(self, config: HttpConfig) -> Self {
        self.with_option(move |settings| {
            settings.http_config = config;
            Ok(())
        })
    }

    /// Authenticate with a personal access token.
    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.with_secret_token(SecretString::from(token.into()))
    }

    /// Authenticate with a personal access token already held as a secret.
    #[must_use]
    pub fn with_secret_token(self, token: SecretString) -> Self {
        self.with_option(move |settings| {
            settings.token = Some(token);
            Ok(())
        })
    }

    /// Resolve Basic credentials from `$NETRC` or the home directory netrc.
    #[must_use]
    pub fn with_netrc(self) -> Self {
        self.with_option(|settings| {
            settings.netrc = Some(NetrcLookup::Default);
            Ok(())
        })
    }

    /// Resolve Basic credentials from the netrc file at `path`.
    #[must_use]
    pub fn with_netrc_path(self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.with_option(move |settings| {
            settings.netrc = Some(NetrcLookup::Path(path));
            Ok(())
        })
    }

    /// Override the base URL derived from the account.
    ///
    /// The URL is validated when the builder is built.
    #[must_use]
    pub fn with_base_url(self, base_url: impl Into<String>) -> Self {
        let raw = base_url.into();
        self.with_option(move |settings| {
            settings.base_url = Some(normalize_base_url(&raw)?);
            Ok(())
        })
    }

    /// Append a custom option.
    #[must_use]
    pub fn with_option<F>(mut self, option: F) -> Self
    where
        F: FnOnce(&mut ClientSettings) -> Result<()> + Send + 'static,
    {
        self.options.push(Box::new(option));
        self
    }

    /// Apply the options in order and build the client.
    ///
    /// # Errors
    ///
    /// Returns the error of the first failing option, or an error if the
    /// account does not form a valid base URL or the default transport cannot
    /// be built.
    pub fn build(self) -> Result<Client> {
        let Self { account, options } = self;

        let mut settings = ClientSettings::new();
        for option in options {
            option(&mut settings)?;
        }

        let base_url = match settings.base_url {
            Some(url) => url,
            None => {
                validate_account(&account)?;
                base_url_for_account(&account)?
            }
        };

        let mut transport: SharedTransport = match settings.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&settings.http_config)?),
        };
        if let Some(lookup) = settings.netrc {
            transport = match lookup {
                NetrcLookup::Default => Arc::new(NetrcTransport::new(transport)),
                NetrcLookup::Path(path) => Arc::new(NetrcTransport::with_path(transport, path)),
            };
        }
        if let Some(token) = settings.token {
            transport = Arc::new(BearerTransport::new(transport, token));
        }

        debug!(account = %account, base_url = %base_url, "built Databricks client");
        Ok(Client {
            account,
            api: ApiClient::new(base_url, transport),
        })
    }
}

/// Databricks REST API client.
///
/// Cloning is cheap; clones and every handle returned by the accessors share
/// the same base URL and transport.
#[derive(Debug, Clone)]
pub struct Client {
    account: String,
    api: ApiClient,
}

impl Client {
    /// Construct a client for the account with the default transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is not a valid hostname label or the
    /// default transport cannot be built.
    pub fn new(account: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(account).build()
    }

    /// Start building a client for the account.
    #[must_use]
    pub fn builder(account: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(account)
    }

    /// Construct a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate or the client
    /// cannot be built from it.
    pub fn from_config(config: &DatabricksConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| Error::Config(format!("Invalid configuration: {e}")))?;

        let mut builder = ClientBuilder::new(config.account.clone())
            .with_http_config(HttpConfig::new().with_timeout(config.timeout()));
        if let Some(base_url) = &config.base_url {
            builder = builder.with_base_url(base_url.clone());
        }
        if config.use_netrc {
            builder = builder.with_netrc();
        }
        if let Some(token) = &config.token {
            builder = builder.with_secret_token(token.clone());
        }
        builder.build()
    }

    /// Return the account name.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Return the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.api.base_url()
    }

    /// Return the shared invocation helper, for endpoints without a typed wrapper.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Cluster endpoints.
    #[must_use]
    pub fn cluster(&self) -> ClustersClient {
        ClustersClient::new(self.api.clone())
    }

    /// DBFS endpoints.
    #[must_use]
    pub fn dbfs(&self) -> DbfsClient {
        DbfsClient::new(self.api.clone())
    }

    /// Group endpoints.
    #[must_use]
    pub fn groups(&self) -> GroupsClient {
        GroupsClient::new(self.api.clone())
    }

    /// Job endpoints.
    #[must_use]
    pub fn jobs(&self) -> JobsClient {
        JobsClient::new(self.api.clone())
    }

    /// Library endpoints.
    #[must_use]
    pub fn libraries(&self) -> LibrariesClient {
        LibrariesClient::new(self.api.clone())
    }

    /// Instance profile endpoints.
    #[must_use]
    pub fn profiles(&self) -> ProfilesClient {
        ProfilesClient::new(self.api.clone())
    }

    /// Secret endpoints.
    #[must_use]
    pub fn secrets(&self) -> SecretsClient {
        SecretsClient::new(self.api.clone())
    }

    /// Token endpoints.
    #[must_use]
    pub fn token(&self) -> TokenClient {
        TokenClient::new(self.api.clone())
    }

    /// Workspace endpoints.
    #[must_use]
    pub fn workspace(&self) -> WorkspaceClient {
        WorkspaceClient::new(self.api.clone())
    }
}
