//! Fixed client-identification headers expected by the portal gateway

use crate::error::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION, ORIGIN, REFERER, USER_AGENT};

/// Client id registered for the web portal
pub const CLIENT_ID: &str = "41aed706-8fdf-4b1e-883e-91e44d7f379b";

/// Origin of the web portal the gateway expects requests from
pub const PORTAL_ORIGIN: &str = "https://myslt.slt.lk";

const PORTAL_REFERER: &str = "https://myslt.slt.lk/";
const ACCEPT_JSON: &str = "application/json, text/plain, */*";

const FIREFOX_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:102.0) Gecko/20100101 Firefox/102.0";
const CHROMIUM_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/118.0.5993.90 Safari/537.36";

/// Which browser fingerprint a request carries.
///
/// Login, account lookup and usage go through the portal gateway; profile
/// and billing go through the self-care backend, which checks the
/// Chromium client hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderProfile {
    Portal,
    SelfCare,
}

impl HeaderProfile {
    /// Build the header set, adding `Authorization` when a header value is given
    pub fn headers(self, authorization: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
        headers.insert(
            HeaderName::from_static("x-ibm-client-id"),
            HeaderValue::from_static(CLIENT_ID),
        );
        headers.insert(ORIGIN, HeaderValue::from_static(PORTAL_ORIGIN));
        headers.insert(REFERER, HeaderValue::from_static(PORTAL_REFERER));
        headers.insert(
            HeaderName::from_static("sec-fetch-dest"),
            HeaderValue::from_static("empty"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-mode"),
            HeaderValue::from_static("cors"),
        );
        headers.insert(
            HeaderName::from_static("sec-fetch-site"),
            HeaderValue::from_static("same-site"),
        );

        match self {
            HeaderProfile::Portal => {
                headers.insert(USER_AGENT, HeaderValue::from_static(FIREFOX_USER_AGENT));
                headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
                headers.insert(HeaderName::from_static("dnt"), HeaderValue::from_static("1"));
            }
            HeaderProfile::SelfCare => {
                headers.insert(USER_AGENT, HeaderValue::from_static(CHROMIUM_USER_AGENT));
                headers.insert(
                    ACCEPT_LANGUAGE,
                    HeaderValue::from_static("en-GB,en-US;q=0.9,en;q=0.8"),
                );
                headers.insert(
                    HeaderName::from_static("sec-ch-ua"),
                    HeaderValue::from_static("\"Not=A?Brand\";v=\"99\", \"Chromium\";v=\"118\""),
                );
                headers.insert(
                    HeaderName::from_static("sec-ch-ua-mobile"),
                    HeaderValue::from_static("?0"),
                );
                headers.insert(
                    HeaderName::from_static("sec-ch-ua-platform"),
                    HeaderValue::from_static("\"Linux\""),
                );
            }
        }

        if let Some(value) = authorization {
            let mut value = HeaderValue::from_str(value)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }
}
