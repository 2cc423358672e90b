//! Authentication expressed as transport decorators.
//!
//! Credentials are attached by wrapping the transport that performs the
//! exchange: [`BearerTransport`] adds a personal access token and
//! [`NetrcTransport`] adds HTTP Basic credentials found in a netrc file.
//! Neither decorator overwrites an `Authorization` header already present.

use crate::error::{Error, Result, TransportError};
use crate::transport::{HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use secrecy::{ExposeSecret, SecretString};
use std::env;
use std::fmt;
use std::io::ErrorKind;
use std::iter::Enumerate;
use std::path::{Path, PathBuf};
use std::str::{Lines, SplitWhitespace};
use tracing::debug;

/// Environment variable naming an explicit netrc file
pub const NETRC_ENV: &str = "NETRC";

#[cfg(windows)]
const NETRC_FILE_NAME: &str = "_netrc";
#[cfg(not(windows))]
const NETRC_FILE_NAME: &str = ".netrc";

/// Transport decorator adding `Authorization: Bearer <token>`.
pub struct BearerTransport<T> {
    inner: T,
    token: SecretString,
}

impl<T> BearerTransport<T> {
    /// Wrap `inner`, authenticating every request with `token`.
    #[must_use]
    pub fn new(inner: T, token: SecretString) -> Self {
        Self { inner, token }
    }

    /// Return the wrapped transport.
    #[must_use]
    pub const fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T> fmt::Debug for BearerTransport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTransport")
            .field("token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: Transport> Transport for BearerTransport<T> {
    async fn execute(
        &self,
        mut request: HttpRequest,
    ) -> std::result::Result<HttpResponse, TransportError> {
        if !request.headers.contains_key(AUTHORIZATION) {
            let mut value =
                HeaderValue::from_str(&format!("Bearer {}", self.token.expose_secret()))
                    .map_err(|_| {
                        TransportError::Credentials(
                            "token contains characters not allowed in a header".to_string(),
                        )
                    })?;
            value.set_sensitive(true);
            request.headers.insert(AUTHORIZATION, value);
        }

        self.inner.execute(request).await
    }
}

/// Transport decorator adding HTTP Basic credentials from a netrc file.
///
/// The file is read for every request. A missing file, or a path naming a
/// directory, leaves the request unchanged; an unreadable or malformed file
/// fails the request with [`TransportError::Credentials`].
pub struct NetrcTransport<T> {
    inner: T,
    path: Option<PathBuf>,
}

impl<T> NetrcTransport<T> {
    /// Wrap `inner`, reading `$NETRC` or the netrc file in the home directory.
    #[must_use]
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            path: default_netrc_path(),
        }
    }

    /// Wrap `inner`, reading the netrc file at `path`.
    #[must_use]
    pub fn with_path(inner: T, path: impl Into<PathBuf>) -> Self {
        Self {
            inner,
            path: Some(path.into()),
        }
    }

    /// Return the netrc path consulted by this transport.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn load(&self) -> std::result::Result<Option<Netrc>, TransportError> {
        let Some(path) = &self.path else {
            return Ok(None);
        };

        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) if path.is_dir() => {
                debug!(path = %path.display(), error = %err, "netrc path is a directory");
                return Ok(None);
            }
            Err(err) => {
                return Err(TransportError::Credentials(format!(
                    "failed to read {}: {err}",
                    path.display()
                )))
            }
        };

        Netrc::parse(&text)
            .map(Some)
            .map_err(|err| TransportError::Credentials(format!("{}: {err}", path.display())))
    }
}

impl<T> fmt::Debug for NetrcTransport<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetrcTransport")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: Transport> Transport for NetrcTransport<T> {
    async fn execute(
        &self,
        mut request: HttpRequest,
    ) -> std::result::Result<HttpResponse, TransportError> {
        if request.headers.contains_key(AUTHORIZATION) {
            return self.inner.execute(request).await;
        }

        if let Some(netrc) = self.load().await? {
            let host = request.url.host_str().unwrap_or_default();
            if let Some(machine) = netrc.find(host) {
                let value = machine.basic_auth_header()?;
                request.headers.insert(AUTHORIZATION, value);
            }
        }

        self.inner.execute(request).await
    }
}

fn default_netrc_path() -> Option<PathBuf> {
    if let Some(path) = env::var_os(NETRC_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::home_dir().map(|home| home.join(NETRC_FILE_NAME))
}

/// A single `machine` or `default` entry of a netrc file.
#[derive(Debug, Clone, Default)]
pub struct NetrcMachine {
    /// Host name; `None` for the `default` entry
    pub name: Option<String>,
    /// Login name
    pub login: Option<String>,
    /// Password
    pub password: Option<SecretString>,
    /// Account name
    pub account: Option<String>,
}

impl NetrcMachine {
    fn basic_auth_header(&self) -> std::result::Result<HeaderValue, TransportError> {
        let login = self.login.as_deref().unwrap_or_default();
        let password = self
            .password
            .as_ref()
            .map(ExposeSecret::expose_secret)
            .unwrap_or_default();
        let encoded = STANDARD.encode(format!("{login}:{password}"));
        let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
            .map_err(|err| TransportError::Credentials(err.to_string()))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

/// A parsed netrc file.
#[derive(Debug, Clone, Default)]
pub struct Netrc {
    machines: Vec<NetrcMachine>,
    default: Option<NetrcMachine>,
}

impl Netrc {
    /// Parse the contents of a netrc file.
    ///
    /// Recognized tokens are `machine`, `default`, `login`, `password`,
    /// `account` and `macdef`; macro bodies run until the next blank line and
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file is malformed.
    pub fn parse(text: &str) -> Result<Self> {
        let mut netrc = Self::default();
        let mut current: Option<NetrcMachine> = None;
        let mut tokens = Tokens::new(text);

        while let Some(token) = tokens.next() {
            match token {
                "machine" => {
                    let name = tokens.value_of(token)?;
                    netrc.finish(current.take());
                    current = Some(NetrcMachine {
                        name: Some(name),
                        ..NetrcMachine::default()
                    });
                }
                "default" => {
                    netrc.finish(current.take());
                    current = Some(NetrcMachine::default());
                }
                "login" | "password" | "account" => {
                    let value = tokens.value_of(token)?;
                    let machine = current
                        .as_mut()
                        .ok_or_else(|| tokens.malformed(&format!("`{token}` before `machine`")))?;
                    match token {
                        "login" => machine.login = Some(value),
                        "password" => machine.password = Some(SecretString::from(value)),
                        _ => machine.account = Some(value),
                    }
                }
                "macdef" => {
                    tokens.value_of(token)?;
                    tokens.skip_macro_body();
                }
                other => {
                    return Err(tokens.malformed(&format!("unknown token `{other}`")));
                }
            }
        }

        netrc.finish(current);
        Ok(netrc)
    }

    /// Find the entry for `host`, falling back to the `default` entry.
    #[must_use]
    pub fn find(&self, host: &str) -> Option<&NetrcMachine> {
        self.machines
            .iter()
            .find(|machine| machine.name.as_deref() == Some(host))
            .or(self.default.as_ref())
    }

    /// Return all named machine entries in file order.
    #[must_use]
    pub fn machines(&self) -> &[NetrcMachine] {
        &self.machines
    }

    fn finish(&mut self, machine: Option<NetrcMachine>) {
        match machine {
            Some(machine) if machine.name.is_some() => self.machines.push(machine),
            Some(machine) => {
                if self.default.is_none() {
                    self.default = Some(machine);
                }
            }
            None => {}
        }
    }
}

/// Whitespace separated netrc tokens across the whole file.
///
/// A token starting with `#` comments out the rest of its line.
struct Tokens<'a> {
    lines: Enumerate<Lines<'a>>,
    words: SplitWhitespace<'a>,
    line_number: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            words: "".split_whitespace(),
            line_number: 0,
        }
    }

    fn value_of(&mut self, keyword: &str) -> Result<String> {
        self.next()
            .map(str::to_string)
            .ok_or_else(|| self.malformed(&format!("`{keyword}` without a value")))
    }

    /// Drop the rest of the current line and every line up to the next blank one.
    fn skip_macro_body(&mut self) {
        self.words = "".split_whitespace();
        for (index, line) in self.lines.by_ref() {
            self.line_number = index + 1;
            if line.trim().is_empty() {
                break;
            }
        }
    }

    fn malformed(&self, detail: &str) -> Error {
        Error::Config(format!(
            "malformed netrc at line {}: {detail}",
            self.line_number
        ))
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.words.next() {
                Some(word) if word.starts_with('#') => self.words = "".split_whitespace(),
                Some(word) => return Some(word),
                None => {
                    let (index, line) = self.lines.next()?;
                    self.line_number = index + 1;
                    self.words = line.split_whitespace();
                }
            }
        }
    }
}
