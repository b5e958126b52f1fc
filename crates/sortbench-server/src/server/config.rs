use anyhow::bail;
use clap::Parser;
use core::time::Duration;

/// Runtime configuration for the `sortbench-server` binary.
///
/// These settings control where the service listens, how many threads serve
/// HTTP, and how many threads the concurrent sort fans out over. All values
/// are parsed from CLI arguments or environment variables.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "sortbench-server",
    version,
    about = "An HTTP service comparing sequential and concurrent batch sorting"
)]
pub struct CliArgs {
    /// TCP address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:10000"))]
    pub server_addr: String,

    /// Number of async runtime worker threads serving HTTP connections.
    ///
    /// Defaults to the number of logical CPUs.
    ///
    /// Environment variable: `WORKER_THREADS`
    #[arg(long, env = "WORKER_THREADS")]
    pub worker_threads: Option<usize>,

    /// Number of threads in the pool that runs concurrent sort tasks.
    ///
    /// The concurrent strategy queues one task per array on this pool, so
    /// this caps the degree of parallelism, not the batch size. Defaults to
    /// the number of logical CPUs.
    ///
    /// Environment variable: `SORT_THREADS`
    #[arg(long, env = "SORT_THREADS")]
    pub sort_threads: Option<usize>,

    /// Maximum accepted request body size in bytes. Unlimited when unset.
    ///
    /// Environment variable: `MAX_BODY_BYTES`
    #[arg(long, env = "MAX_BODY_BYTES")]
    pub max_body_bytes: Option<usize>,

    /// Seconds to let in-flight requests finish after a shutdown signal.
    ///
    /// Environment variable: `SHUTDOWN_TIMEOUT`
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 5)]
    pub shutdown_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: String,
    pub worker_threads: usize,
    pub sort_threads: usize,
    pub max_body_bytes: Option<usize>,
    pub shutdown_timeout: Duration,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let worker_threads = args.worker_threads.unwrap_or_else(num_cpus::get);

        if worker_threads == 0 {
            bail!("WORKER_THREADS must be greater than 0");
        }

        let sort_threads = args.sort_threads.unwrap_or_else(num_cpus::get);

        if sort_threads == 0 {
            bail!("SORT_THREADS must be greater than 0");
        }

        if args.max_body_bytes == Some(0) {
            bail!("MAX_BODY_BYTES must be greater than 0 when set");
        }

        Ok(Self {
            server_addr: args.server_addr,
            worker_threads,
            sort_threads,
            max_body_bytes: args.max_body_bytes,
            shutdown_timeout: Duration::from_secs(args.shutdown_timeout),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn parse(args: &[&str]) -> anyhow::Result<ServerConfig> {
        let argv = core::iter::once("sortbench-server").chain(args.iter().copied());
        let args = CliArgs::try_parse_from(argv)?;
        ServerConfig::try_from(args)
    }

    #[test]
    fn defaults_listen_on_port_10000() {
        let config = parse(&[]).unwrap();
        assert!(config.server_addr.ends_with(":10000"));
        assert!(config.worker_threads > 0);
        assert_eq!(config.sort_threads, num_cpus::get());
        assert_eq!(config.shutdown_timeout, Duration::from_secs(5));
        assert_eq!(config.max_body_bytes, None);
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--server-addr",
            "127.0.0.1:8080",
            "--worker-threads",
            "2",
            "--sort-threads",
            "16",
            "--max-body-bytes",
            "1024",
            "--shutdown-timeout",
            "1",
        ])
        .unwrap();
        assert_eq!(config.server_addr, "127.0.0.1:8080");
        assert_eq!(config.worker_threads, 2);
        assert_eq!(config.sort_threads, 16);
        assert_eq!(config.max_body_bytes, Some(1024));
        assert_eq!(config.shutdown_timeout, Duration::from_secs(1));
    }

    #[test]
    fn rejects_zero_threads() {
        assert!(parse(&["--worker-threads", "0"]).is_err());
        assert!(parse(&["--sort-threads", "0"]).is_err());
        assert!(parse(&["--max-body-bytes", "0"]).is_err());
    }
}
