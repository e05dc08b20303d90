use crate::application::report::ExecutionReport;
use crate::application::services::ProgressSink;
use crate::domain::entities::TraceInfo;
use crate::domain::errors::ProbeResult;
use colored::Colorize;
use std::time::Duration;

pub fn print_report(report: &ExecutionReport, pretty: bool) -> ProbeResult<()> {
    let json = report.to_json(pretty)?;
    println!("{}", json);
    Ok(())
}

/// Prints progress lines to stdout, ahead of the report.
pub struct StdoutProgress;

impl ProgressSink for StdoutProgress {
    fn uploaded(&self, file_name: &str, uploaded: u64, total: u64) {
        println!("{}", upload_line(file_name, uploaded, total));
    }

    fn downloaded(&self, downloaded: u64, total: Option<u64>) {
        if let Some(line) = download_line(downloaded, total) {
            println!("{}", line);
        }
    }
}

fn percent(done: u64, total: u64) -> f64 {
    if total == 0 {
        100.0
    } else {
        done as f64 / total as f64 * 100.0
    }
}

pub fn upload_line(file_name: &str, uploaded: u64, total: u64) -> String {
    format!("{:?} uploaded {:.2}%", file_name, percent(uploaded, total))
}

/// Without a Content-Length there is nothing to take a percentage of.
pub fn download_line(downloaded: u64, total: Option<u64>) -> Option<String> {
    total.map(|total| format!("downloaded {:.2}%", percent(downloaded, total)))
}

const HTTPS_TEMPLATE: &str = "  DNS Lookup   TCP Connection   TLS Handshake   Server Processing   Content Transfer
[   {a0000}  |     {a0001}    |    {a0002}    |      {a0003}      |      {a0004}     ]
             |                |               |                   |                  |
    namelookup:{b0000}        |               |                   |                  |
                        connect:{b0001}       |                   |                  |
                                    pretransfer:{b0002}           |                  |
                                                      starttransfer:{b0003}          |
                                                                                 total:{b0004}
";

const HTTP_TEMPLATE: &str = "  DNS Lookup   TCP Connection   Server Processing   Content Transfer
[   {a0000}  |     {a0001}    |      {a0003}      |      {a0004}     ]
             |                |                   |                  |
    namelookup:{b0000}        |                   |                  |
                        connect:{b0001}           |                  |
                                      starttransfer:{b0003}          |
                                                                 total:{b0004}
";

fn ms(duration: Duration) -> u128 {
    duration.as_millis()
}

/// httpstat-style chart: phase ranges on top, cumulative marks below.
pub fn render_stat(trace: &TraceInfo) -> String {
    let ranged = |d: Duration| format!("{:^7}", format!("{}ms", ms(d))).cyan().to_string();
    let marked = |d: Duration| format!("{:<7}", format!("{}ms", ms(d))).cyan().to_string();

    let namelookup = trace.dns_lookup;
    let connect = trace.dns_lookup + trace.tcp_connect;
    let pretransfer = trace.pretransfer();
    let starttransfer = trace.starttransfer();

    let template = if trace.is_tls { HTTPS_TEMPLATE } else { HTTP_TEMPLATE };
    template
        .replace("{a0000}", &ranged(namelookup))
        .replace("{a0001}", &ranged(connect - namelookup))
        .replace("{a0002}", &ranged(pretransfer - connect))
        .replace("{a0003}", &ranged(starttransfer - pretransfer))
        .replace("{a0004}", &ranged(trace.total.saturating_sub(starttransfer)))
        .replace("{b0000}", &marked(namelookup))
        .replace("{b0001}", &marked(connect))
        .replace("{b0002}", &marked(pretransfer))
        .replace("{b0003}", &marked(starttransfer))
        .replace("{b0004}", &marked(trace.total))
}

pub fn print_stat(trace: &TraceInfo) {
    eprint!("{}", render_stat(trace));
}
