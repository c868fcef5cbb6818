//! Structured fuzz target for the DSN parser.
//!
//! Builds DSNs that are shaped like real ones so the fuzzer spends its time in
//! parameter handling instead of URL syntax errors.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_dsn_structured
//! ```

#![no_main]

use arbitrary::Arbitrary;
use chconf_options::{OptionsError, Protocol, parse_dsn};
use libfuzzer_sys::fuzz_target;

const KEYS: [&str; 8] = [
    "debug",
    "compress",
    "dial_timeout",
    "read_timeout",
    "secure",
    "skip_verify",
    "connection_open_strategy",
    "max_threads",
];

#[derive(Debug, Arbitrary)]
struct FuzzDsn {
    scheme: u8,
    user: Option<String>,
    password: Option<String>,
    hosts: Vec<(String, Option<u16>)>,
    database: Option<String>,
    params: Vec<(u8, String)>,
}

impl FuzzDsn {
    fn scheme(&self) -> &'static str {
        match self.scheme % 4 {
            0 => "clickhouse",
            1 => "http",
            2 => "https",
            _ => "tcp",
        }
    }

    fn to_dsn(&self) -> String {
        let mut dsn = format!("{}://", self.scheme());
        if let Some(user) = &self.user {
            dsn.push_str(&sanitize(user));
            if let Some(password) = &self.password {
                dsn.push(':');
                dsn.push_str(&sanitize(password));
            }
            dsn.push('@');
        }

        let hosts: Vec<String> = self
            .hosts
            .iter()
            .take(4)
            .map(|(host, port)| match port {
                Some(port) => format!("{}:{}", sanitize(host), port),
                None => sanitize(host),
            })
            .collect();
        dsn.push_str(&hosts.join(","));

        if let Some(database) = &self.database {
            dsn.push('/');
            dsn.push_str(&sanitize(database));
        }

        let params: Vec<String> = self
            .params
            .iter()
            .take(8)
            .map(|(key, value)| format!("{}={}", KEYS[*key as usize % KEYS.len()], sanitize(value)))
            .collect();
        if !params.is_empty() {
            dsn.push('?');
            dsn.push_str(&params.join("&"));
        }

        dsn
    }
}

fn sanitize(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .take(32)
        .collect()
}

fuzz_target!(|input: FuzzDsn| {
    let dsn = input.to_dsn();
    match parse_dsn(&dsn) {
        Ok(options) => {
            if options.scheme() == "http" {
                assert!(options.tls.is_none());
            }
            if options.scheme() == "https" {
                assert!(options.tls.is_some());
            }
            if options.protocol == Protocol::Native {
                assert!(options.scheme() != "http" && options.scheme() != "https");
            }
        }
        Err(OptionsError::MalformedDsn(_))
        | Err(OptionsError::SchemeTlsConflict { .. })
        | Err(OptionsError::SchemeTlsMissing { .. }) => {}
        Err(other) => panic!("unexpected error kind for {dsn}: {other}"),
    }
});
