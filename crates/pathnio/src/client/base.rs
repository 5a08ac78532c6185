//! Backend origin normalization.

use reqwest::Url;

use crate::error::{Error, Result};

/// Path segment every resource lives under.
const API_PREFIX: &str = "api/";

/// The normalized request prefix, `<origin>/api/`.
///
/// Built once from the configured origin. Trailing slashes on the origin are
/// trimmed before the prefix is appended, so `https://example.com/` and
/// `https://example.com` both yield `https://example.com/api/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    origin: String,
    prefix: Url,
}

impl ApiBase {
    /// Normalize an origin such as `https://example.com/`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBaseUrl`] if the origin is empty, does not
    /// parse, or uses a scheme other than `http` or `https`.
    pub fn new(origin: &str) -> Result<Self> {
        let invalid = |message: &str| Error::InvalidBaseUrl {
            url: origin.to_string(),
            message: message.to_string(),
        };

        let trimmed = origin.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(invalid("origin is empty"));
        }

        let prefix = Url::parse(&format!("{trimmed}/{API_PREFIX}"))
            .map_err(|e| invalid(&e.to_string()))?;
        if !matches!(prefix.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if prefix.host_str().is_none() {
            return Err(invalid("missing host"));
        }

        Ok(Self {
            origin: trimmed.to_string(),
            prefix,
        })
    }

    /// The origin without trailing slashes, used to resolve media paths.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The request prefix, always ending in `/api/`.
    #[must_use]
    pub fn prefix(&self) -> &Url {
        &self.prefix
    }

    /// Resolve a resource path such as `accounts/profile/`.
    ///
    /// A leading `/` is ignored so the path stays under the prefix. Absolute
    /// URLs (pagination links) must name the API host and a path under the
    /// prefix. They are re-rooted on the prefix and keep the configured scheme
    /// and port.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBaseUrl`] if the joined URL does not parse, or
    /// if an absolute URL points at another host or outside the prefix.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        match Url::parse(path) {
            Ok(link) => self.rebase(&link),
            Err(_) => self.join(path.trim_start_matches('/')),
        }
    }

    fn rebase(&self, link: &Url) -> Result<Url> {
        let outside = |message: &str| Error::InvalidBaseUrl {
            url: link.to_string(),
            message: message.to_string(),
        };

        if link.host_str() != self.prefix.host_str() {
            return Err(outside("link points at another host"));
        }
        let Some(rest) = link.path().strip_prefix(self.prefix.path()) else {
            return Err(outside("link points outside the API prefix"));
        };

        let mut url = self.join(rest)?;
        url.set_query(link.query());
        Ok(url)
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.prefix.join(path).map_err(|e| Error::InvalidBaseUrl {
            url: format!("{}{path}", self.prefix),
            message: e.to_string(),
        })
    }
}

impl std::fmt::Display for ApiBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.prefix.as_str())
    }
}
