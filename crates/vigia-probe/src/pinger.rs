use crate::PingProbe;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

/// Echo-request probe backed by the platform `ping` binary.
///
/// One echo per check, with the wait bounded by `timeout_secs`. An outer
/// timeout one second above the ping's own covers a hung child process.
pub struct SystemPing {
    timeout_secs: u64,
}

impl SystemPing {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }

    fn command(&self, address: &str) -> Command {
        let mut cmd = Command::new("ping");
        #[cfg(target_os = "windows")]
        {
            let wait_ms = (self.timeout_secs * 1000).to_string();
            cmd.args(["-n", "1", "-w", &wait_ms]);
        }
        #[cfg(not(target_os = "windows"))]
        {
            let wait_s = self.timeout_secs.to_string();
            cmd.args(["-c", "1", "-W", &wait_s]);
        }
        cmd.arg(address)
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

#[async_trait]
impl PingProbe for SystemPing {
    async fn check(&self, address: &str) -> bool {
        let mut cmd = self.command(address);
        let outer = Duration::from_secs(self.timeout_secs + 1);
        match timeout(outer, cmd.status()).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(e)) => {
                tracing::debug!(address, error = %e, "ping could not be spawned");
                false
            }
            Err(_) => {
                tracing::debug!(address, "ping timed out");
                false
            }
        }
    }
}
