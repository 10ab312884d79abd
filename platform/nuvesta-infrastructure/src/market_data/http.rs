use nuvesta_domain::repositories::price_series::{PriceSeriesProvider, PriceSeriesQuery};
use nuvesta_domain::value_objects::price_point::PricePoint;
use nuvesta_domain::value_objects::trade_date::format_trade_date;
use reqwest::blocking::Client;
use std::time::{Duration, Instant};

/// Client for the market-data service's `GET /api/prices` endpoint.
pub struct HttpPriceSeriesProvider {
    pub base_url: String,
    pub timeout_ms: u64,
    pub retries: u32,
    client: Client,
}

impl HttpPriceSeriesProvider {
    pub fn new(base_url: String, timeout_ms: u64, retries: u32) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;
        Ok(Self {
            base_url,
            timeout_ms,
            retries,
            client,
        })
    }

    pub fn prices_endpoint(&self) -> String {
        format!("{}/api/prices", self.base_url.trim_end_matches('/'))
    }

    fn fetch(&self, query: &PriceSeriesQuery) -> Result<Vec<PricePoint>, String> {
        let endpoint = self.prices_endpoint();
        let span = tracing::info_span!(
            "infra.prices.fetch",
            endpoint = %endpoint,
            symbol = %query.symbol,
            timeout_ms = self.timeout_ms,
            retries = self.retries
        );
        let _enter = span.enter();

        let params = query_params(query);
        let start = Instant::now();
        let mut attempts = 0u32;
        let mut last_status: Option<u16> = None;
        let mut last_error: Option<String> = None;
        let mut last_error_kind: &'static str = "unknown";

        while attempts <= self.retries {
            attempts += 1;
            if attempts > 1 {
                metrics::counter!("nuvesta.infra.prices.retries_total").increment(1);
                tracing::debug!(attempt = attempts, "retrying price request");
            }

            let response = self.client.get(&endpoint).query(&params).send();
            match response {
                Ok(resp) => {
                    let status = resp.status();
                    last_status = Some(status.as_u16());
                    if status.is_success() {
                        match resp.json::<Vec<PricePoint>>() {
                            Ok(points) => {
                                metrics::counter!(
                                    "nuvesta.infra.prices.requests_total",
                                    "source" => "http",
                                    "result" => "ok"
                                )
                                .increment(1);
                                metrics::histogram!("nuvesta.infra.prices.call_ms", "source" => "http")
                                    .record(start.elapsed().as_millis() as f64);
                                tracing::debug!(attempts, points = points.len(), "prices fetched");
                                return Ok(points);
                            }
                            Err(err) => {
                                last_error = Some(format!("failed to parse price response: {err}"));
                                last_error_kind = "decode";
                                break;
                            }
                        }
                    }

                    last_error = Some(format!("price service http error: status {}", status.as_u16()));
                    last_error_kind = "http_status";
                    if status.is_server_error() && attempts <= self.retries {
                        continue;
                    }
                    break;
                }
                Err(err) => {
                    last_error = Some(format!("price request failed: {err}"));
                    last_error_kind = "transport";
                    if attempts <= self.retries {
                        continue;
                    }
                    break;
                }
            }
        }

        metrics::counter!(
            "nuvesta.infra.prices.requests_total",
            "source" => "http",
            "result" => "err",
            "kind" => last_error_kind
        )
        .increment(1);
        metrics::histogram!("nuvesta.infra.prices.call_ms", "source" => "http")
            .record(start.elapsed().as_millis() as f64);
        let error = last_error.unwrap_or_else(|| "price request failed after retries".to_string());
        tracing::warn!(
            attempts,
            status = ?last_status,
            error = %error,
            "price request failed"
        );
        Err(format!("{error} (symbol={}, attempts={attempts})", query.symbol))
    }
}

fn query_params(query: &PriceSeriesQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("symbol", query.symbol.trim().to_string())];
    if let Some(from) = query.from {
        params.push(("from", format_trade_date(from)));
    }
    params.push(("autofetch", query.autofetch.to_string()));
    params
}

impl PriceSeriesProvider for HttpPriceSeriesProvider {
    fn load_series(&self, query: &PriceSeriesQuery) -> Result<Vec<PricePoint>, String> {
        self.fetch(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serves one canned response per entry, sending each request line back.
    fn serve(responses: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept() else {
                    return;
                };
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }
                let request = String::from_utf8_lossy(&buf);
                let _ = tx.send(request.lines().next().unwrap_or_default().to_string());
                let reply = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(reply.as_bytes());
            }
        });
        (format!("http://{addr}/"), rx)
    }

    #[test]
    fn query_params_include_optional_from() {
        let mut query = PriceSeriesQuery::for_symbol(" ACME ");
        query.autofetch = false;
        assert_eq!(
            query_params(&query),
            vec![
                ("symbol", "ACME".to_string()),
                ("autofetch", "false".to_string())
            ]
        );
        query.from = NaiveDate::from_ymd_opt(2024, 1, 2);
        assert_eq!(query_params(&query)[1], ("from", "2024-01-02".to_string()));
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let provider =
            HttpPriceSeriesProvider::new("http://localhost:8080/".to_string(), 1_000, 0)
                .expect("client");
        assert_eq!(provider.prices_endpoint(), "http://localhost:8080/api/prices");
    }

    #[test]
    fn fetches_and_decodes_price_points() {
        let (base_url, requests) = serve(vec![(
            200,
            r#"[{"time":1704153600000,"price":100.0},{"time":1704240000000,"price":102.5}]"#,
        )]);
        let provider = HttpPriceSeriesProvider::new(base_url, 2_000, 0).expect("client");

        let points = provider
            .load_series(&PriceSeriesQuery::for_symbol("ACME"))
            .expect("load");
        assert_eq!(points.len(), 2);
        assert!((points[1].price - 102.5).abs() < 1e-9);

        let request_line = requests.recv().expect("request line");
        assert!(request_line.starts_with("GET /api/prices?symbol=ACME&autofetch=true"));
    }

    #[test]
    fn retries_server_errors_then_succeeds() {
        let (base_url, _requests) = serve(vec![(503, "{}"), (200, "[]")]);
        let provider = HttpPriceSeriesProvider::new(base_url, 2_000, 1).expect("client");
        let points = provider
            .load_series(&PriceSeriesQuery::for_symbol("ACME"))
            .expect("load after retry");
        assert!(points.is_empty());
    }

    #[test]
    fn client_errors_are_not_retried() {
        let (base_url, requests) = serve(vec![(404, "{}")]);
        let provider = HttpPriceSeriesProvider::new(base_url, 2_000, 3).expect("client");
        let err = provider
            .load_series(&PriceSeriesQuery::for_symbol("NOPE"))
            .expect_err("404");
        assert!(err.contains("status 404"));
        assert!(err.contains("attempts=1"));
        assert_eq!(requests.try_iter().count(), 1);
    }

    #[test]
    fn any_success_status_is_decoded() {
        let (base_url, _requests) = serve(vec![(
            203,
            r#"[{"time":1704153600000,"price":100.0}]"#,
        )]);
        let provider = HttpPriceSeriesProvider::new(base_url, 2_000, 0).expect("client");
        let points = provider
            .load_series(&PriceSeriesQuery::for_symbol("ACME"))
            .expect("non-200 success");
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn transport_errors_are_retried_until_exhausted() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr")
        };
        let provider =
            HttpPriceSeriesProvider::new(format!("http://{addr}"), 1_000, 2).expect("client");
        let err = provider
            .load_series(&PriceSeriesQuery::for_symbol("ACME"))
            .expect_err("closed port");
        assert!(err.contains("price request failed"));
        assert!(err.contains("attempts=3"));
    }
}
