//! Single HTTP attempt.
//!
//! `execute` sends exactly one request and never follows redirects; the
//! controller decides what happens next based on the returned outcome.

use log::{debug, trace};
use reqwest::header::{LOCATION, USER_AGENT};
use reqwest::Method;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::ProbeOptions;
use crate::error_handling::{classify_send_error, ProbeError};
use crate::models::TlsCertificateInfo;
use crate::tls::capture_tls_info;
use crate::user_agent::user_agent_for_attempt;

/// What one attempt produced when a response came back.
#[derive(Debug)]
pub struct ProbeOutcome {
    /// URL that was requested
    pub url: Url,
    pub status: u16,
    /// Raw `Location` header, if present and valid UTF-8
    pub location: Option<String>,
    pub tls_data: Option<TlsCertificateInfo>,
    /// Body bytes read (bounded by `max_response_bytes_to_read`)
    pub content_length: usize,
    /// Body bytes kept (bounded by `max_response_bytes_to_save`)
    pub body: Vec<u8>,
    /// The body stream failed after the response head arrived
    pub body_read_failed: bool,
}

/// Sends one request to `url` with `method`.
///
/// The per-attempt deadline comes from the client, and the User-Agent is
/// picked per attempt. When `capture_tls` is set and the connection used TLS,
/// the peer certificate is inspected. The body is streamed until
/// `max_response_bytes_to_read` bytes have been read; only the first
/// `max_response_bytes_to_save` are kept.
///
/// # Errors
///
/// - `InvalidMethod` if `method` is not an HTTP token
/// - `Request`, `Timeout`, `Tls` or `Transport` when `send()` fails
/// - `Cancelled` if `cancel` fires before the response head arrives
pub async fn execute(
    client: &reqwest::Client,
    url: &Url,
    method: &str,
    options: &ProbeOptions,
    cancel: &CancellationToken,
) -> Result<ProbeOutcome, ProbeError> {
    if cancel.is_cancelled() {
        return Err(ProbeError::Cancelled);
    }
    let method = Method::from_bytes(method.as_bytes())
        .map_err(|_| ProbeError::InvalidMethod(method.to_string()))?;

    let request = client
        .request(method.clone(), url.clone())
        .header(USER_AGENT, user_agent_for_attempt(options));

    debug!("{method} {url}");
    let mut response = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(ProbeError::Cancelled),
        sent = request.send() => sent.map_err(|e| classify_send_error(url.as_str(), e))?,
    };

    let status = response.status().as_u16();
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let tls_data = if options.capture_tls {
        capture_tls_info(&response)
    } else {
        None
    };

    let mut body = Vec::new();
    let mut content_length = 0usize;
    let mut body_read_failed = false;
    let read_cap = options.max_response_bytes_to_read;
    let save_cap = options.max_response_bytes_to_save.min(read_cap);

    while content_length < read_cap {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            chunk = response.chunk() => chunk,
        };
        match chunk {
            Ok(Some(bytes)) => {
                let take = bytes.len().min(read_cap - content_length);
                let keep = take.min(save_cap.saturating_sub(body.len()));
                body.extend_from_slice(&bytes[..keep]);
                content_length += take;
            }
            Ok(None) => break,
            Err(e) => {
                debug!("Body read from {url} failed after {content_length} bytes: {e}");
                body_read_failed = true;
                break;
            }
        }
    }
    trace!("{url} answered {status}, read {content_length} body bytes");

    Ok(ProbeOutcome {
        url: url.clone(),
        status,
        location,
        tls_data,
        content_length,
        body,
        body_read_failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves one canned HTTP/1.1 response per connection.
    async fn canned_server(response: &'static str) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 2048];
                let _ = socket.read(&mut buf).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        Url::parse(&format!("http://{addr}/")).expect("url")
    }

    fn client() -> reqwest::Client {
        crate::initialization::init_crypto_provider();
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("client")
    }

    #[tokio::test]
    async fn test_execute_caps_saved_and_read_body() {
        let url = canned_server(
            "HTTP/1.1 200 OK\r\nContent-Length: 10\r\nConnection: close\r\n\r\n0123456789",
        )
        .await;
        let options = ProbeOptions {
            max_response_bytes_to_save: 4,
            max_response_bytes_to_read: 8,
            ..Default::default()
        };
        let outcome = execute(&client(), &url, "GET", &options, &CancellationToken::new())
            .await
            .expect("response");
        assert_eq!(outcome.status, 200);
        assert_eq!(outcome.body, b"0123");
        assert_eq!(outcome.content_length, 8);
        assert!(outcome.tls_data.is_none());
        assert!(!outcome.body_read_failed);
    }

    #[tokio::test]
    async fn test_execute_captures_location() {
        let url = canned_server(
            "HTTP/1.1 302 Found\r\nLocation: /next\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let outcome = execute(
            &client(),
            &url,
            "GET",
            &ProbeOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .expect("response");
        assert_eq!(outcome.status, 302);
        assert_eq!(outcome.location.as_deref(), Some("/next"));
        assert!(outcome.body.is_empty());
    }

    #[tokio::test]
    async fn test_execute_rejects_invalid_method() {
        let url = Url::parse("http://127.0.0.1:9/").expect("url");
        let err = execute(
            &client(),
            &url,
            "GE T",
            &ProbeOptions::default(),
            &CancellationToken::new(),
        )
        .await
        .expect_err("invalid method");
        assert!(matches!(err, ProbeError::InvalidMethod(ref m) if m == "GE T"));
    }

    #[tokio::test]
    async fn test_execute_after_cancel_sends_nothing() {
        let url = Url::parse("http://127.0.0.1:9/").expect("url");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = execute(&client(), &url, "GET", &ProbeOptions::default(), &cancel)
            .await
            .expect_err("cancelled");
        assert!(matches!(err, ProbeError::Cancelled));
    }
}
