use crate::application::builders::request_builder::RequestBuilder;
use crate::infrastructure::config::ClientConfig;
use crate::infrastructure::http_client::HyperHttpClient;
use crate::infrastructure::output::{self, StdoutProgress};
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

/// CLI configuration for hurl-probe
#[derive(Parser, Debug)]
#[command(name = "hurl-probe", version)]
#[command(
    about = "hurl-probe: send one HTTP request and report what went over the wire",
    long_about = None
)]
pub struct Cli {
    /// Target URL
    #[arg(long, env = "HURL_PROBE_URL", default_value = "")]
    pub url: String,

    /// HTTP method, case-insensitive
    #[arg(short = 'X', long, env = "HURL_PROBE_METHOD", default_value = "GET")]
    pub method: String,

    /// Request headers as a JSON object, e.g. {"name":"age"}
    #[arg(short = 'H', long, env = "HURL_PROBE_HEADER", default_value = "")]
    pub header: String,

    /// Form data as a JSON object; ignored when --json is set
    #[arg(short = 'd', long, env = "HURL_PROBE_DATA", default_value = "")]
    pub data: String,

    /// Raw JSON body, sent verbatim
    #[arg(long, env = "HURL_PROBE_JSON", default_value = "")]
    pub json: String,

    /// Files to upload as a JSON object of field name to path
    #[arg(short = 'F', long, env = "HURL_PROBE_FILE", default_value = "")]
    pub file: String,

    /// Save the response body to this path (GET only)
    #[arg(short, long, env = "HURL_PROBE_OUTPUT", default_value = "")]
    pub output: String,

    /// Query parameters as a JSON object
    #[arg(long, env = "HURL_PROBE_PARAMS", default_value = "")]
    pub params: String,

    /// Basic auth credentials as user:password
    #[arg(long, env = "HURL_PROBE_USER", default_value = "")]
    pub user: String,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long, env = "HURL_PROBE_INSECURE")]
    pub insecure: bool,

    /// Give up after this many seconds
    #[arg(long, env = "HURL_PROBE_TIMEOUT")]
    pub timeout: Option<f64>,

    #[arg(long, env = "HURL_PROBE_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,

    /// Print a timing chart to stderr
    #[arg(long)]
    pub stat: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.user_agent.as_deref(), self.timeout, self.insecure)
    }

    pub async fn run(&self) -> Result<()> {
        let request = RequestBuilder::new()
            .method(&self.method)?
            .url(&self.url)
            .headers(&self.header)?
            .output(&self.output)
            .files(&self.file)?
            .body(&self.data, &self.json)?
            .params(&self.params)?
            .auth(&self.user)?
            .build();

        let request_service =
            HyperHttpClient::new(self.client_config()).create_request_service(Arc::new(StdoutProgress));
        let report = request_service.execute(request).await?;

        if self.stat {
            output::print_stat(&report.trace);
        }
        output::print_report(&report, self.pretty)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_flag_table() {
        let cli = Cli::try_parse_from(["hurl-probe"]).unwrap();
        assert_eq!(cli.url, "");
        assert_eq!(cli.method, "GET");
        assert_eq!(cli.header, "");
        assert_eq!(cli.output, "");
        assert_eq!(cli.client_config().timeout, None);
    }

    #[test]
    fn parses_every_flag() {
        let cli = Cli::try_parse_from([
            "hurl-probe",
            "--url",
            "http://example.com",
            "-X",
            "post",
            "-H",
            r#"{"a":"b"}"#,
            "--json",
            r#"{"a":1}"#,
            "--timeout",
            "2.5",
            "-k",
            "--pretty",
        ])
        .unwrap();
        assert_eq!(cli.url, "http://example.com");
        assert_eq!(cli.method, "post");
        assert_eq!(cli.json, r#"{"a":1}"#);
        assert!(cli.pretty);
        assert!(cli.client_config().insecure);
    }

    #[tokio::test]
    async fn invalid_header_fails_before_any_io() {
        let cli = Cli::try_parse_from([
            "hurl-probe",
            "--url",
            "http://127.0.0.1:9/",
            "--header",
            "{not json}",
        ])
        .unwrap();
        let err = cli.run().await.unwrap_err();
        assert!(err.to_string().contains("--header"), "{err}");
    }

    #[tokio::test]
    async fn unknown_method_fails() {
        let cli = Cli::try_parse_from(["hurl-probe", "--url", "http://127.0.0.1:9/", "-X", "FOO"]).unwrap();
        let err = cli.run().await.unwrap_err();
        assert!(err.to_string().contains("Method does not exist"), "{err}");
    }
}
