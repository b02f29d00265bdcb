use playlist_core::error::FetchError;
use playlist_core::ports::{Result, SourceFetcher};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

const USER_AGENT: &str = concat!("iptv-merge/", env!("CARGO_PKG_VERSION"));

/// HTTP implementation of the SourceFetcher trait. One GET per source, no retries.
pub struct HttpSourceFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpSourceFetcher {
    /// Creates a new HttpSourceFetcher with the given total request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    fn classify(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout(self.timeout.as_secs())
        } else if let Some(status) = error.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(error.to_string())
        }
    }
}

impl SourceFetcher for HttpSourceFetcher {
    fn fetch(&self, location: &str) -> Result<String> {
        let response = self
            .client
            .get(location)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| self.classify(e))?;

        debug!("{} answered {}", location, response.status());

        response.text().map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(self.timeout.as_secs())
            } else {
                FetchError::Body(e.to_string())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serves exactly one HTTP response on an ephemeral port.
    fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let mut stream = stream;
            write!(
                stream,
                "{}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            )
            .unwrap();
        });
        format!("http://{}/index.m3u", addr)
    }

    #[test]
    fn test_fetch_returns_body() {
        let url = serve_once("HTTP/1.1 200 OK", "#EXTM3U\n#EXTINF:-1,A\nhttp://a\n");
        let fetcher = HttpSourceFetcher::new(Duration::from_secs(5)).unwrap();
        let text = fetcher.fetch(&url).unwrap();
        assert!(text.starts_with("#EXTM3U"));
    }

    #[test]
    fn test_fetch_non_success_status() {
        let url = serve_once("HTTP/1.1 404 Not Found", "missing");
        let fetcher = HttpSourceFetcher::new(Duration::from_secs(5)).unwrap();
        match fetcher.fetch(&url) {
            Err(FetchError::Status(code)) => assert_eq!(code, 404),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[test]
    fn test_fetch_unreachable_host() {
        // Bind then drop to get a port with nothing listening.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let fetcher = HttpSourceFetcher::new(Duration::from_secs(2)).unwrap();
        let result = fetcher.fetch(&format!("http://127.0.0.1:{}/", port));
        assert!(result.is_err());
    }

    #[test]
    fn test_fetch_invalid_url() {
        let fetcher = HttpSourceFetcher::new(DEFAULT_TIMEOUT).unwrap();
        assert!(matches!(
            fetcher.fetch("not a url"),
            Err(FetchError::Transport(_))
        ));
    }
}
