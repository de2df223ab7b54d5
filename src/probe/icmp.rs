//! ICMP echo prober backed by `surge-ping`

use super::{resolve_host, ProbeSettings, Prober};
use crate::{
    error::{AppError, Result},
    models::ProbeStats,
};
use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;
use surge_ping::{Client, Config as PingConfig, PingIdentifier, PingSequence, ICMP};

/// Sends `echo_count` ICMP echo requests per probe and reports their mean RTT
#[derive(Debug, Clone, Default)]
pub struct IcmpProber {
    settings: ProbeSettings,
}

impl IcmpProber {
    pub fn new(settings: ProbeSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    fn client_for(ip: IpAddr) -> Result<Client> {
        let client = match ip {
            IpAddr::V4(_) => Client::new(&PingConfig::default()),
            IpAddr::V6(_) => Client::new(&PingConfig::builder().kind(ICMP::V6).build()),
        };

        client.map_err(|e| AppError::network(format!("failed to open ICMP socket: {}", e)))
    }

    async fn echo_burst(&self, ip: IpAddr) -> Result<ProbeStats> {
        let client = Self::client_for(ip)?;
        let mut pinger = client.pinger(ip, PingIdentifier(rand::random())).await;
        pinger.timeout(self.settings.echo_timeout);

        let payload = vec![0u8; self.settings.payload_size];
        let mut rtts = Vec::with_capacity(usize::from(self.settings.echo_count));
        let mut last_error = None;

        for seq in 0..self.settings.echo_count {
            if seq > 0 {
                tokio::time::sleep(self.settings.echo_interval).await;
            }

            match pinger.ping(PingSequence(seq), &payload).await {
                Ok((_packet, rtt)) => rtts.push(rtt),
                Err(e) => last_error = Some(AppError::from(e)),
            }
        }

        burst_outcome(ip, self.settings.echo_count, &rtts, last_error)
    }
}

/// Stats for a finished burst, or a probe error when no reply came back
fn burst_outcome(
    ip: IpAddr,
    sent: u16,
    rtts: &[Duration],
    last_error: Option<AppError>,
) -> Result<ProbeStats> {
    if rtts.is_empty() {
        let detail = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no reply".to_string());
        return Err(AppError::probe(format!(
            "{}: {} packets transmitted, 0 received, 100% packet loss ({})",
            ip, sent, detail
        )));
    }

    Ok(ProbeStats::from_rtts(Some(ip), sent, rtts))
}

#[async_trait]
impl Prober for IcmpProber {
    async fn probe(&self, destination: &str) -> Result<ProbeStats> {
        let ip = resolve_host(destination).await?;
        self.echo_burst(ip).await
    }
}
